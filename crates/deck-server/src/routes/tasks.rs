//! `/api/tasks` handlers.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use deck_core::entities::Task;
use deck_core::enums::{Schedule, TaskStatus};
use deck_core::responses::{MessageResponse, TaskBuckets};
use deck_db::repos::task::NewTask;
use deck_db::updates::task::TaskUpdate;
use serde::Deserialize;

use super::payload::double_option;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub schedule: Option<String>,
}

impl CreateTaskRequest {
    fn into_new_task(self) -> Result<NewTask, ApiError> {
        let title = self
            .title
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ApiError::Validation("Invalid task data: title is required".into()))?;
        let schedule = self
            .schedule
            .ok_or_else(|| ApiError::Validation("Invalid task data: schedule is required".into()))?;
        let schedule = Schedule::parse(&schedule)?;
        Ok(NewTask::new(title, schedule).with_description(self.description.unwrap_or_default()))
    }
}

#[derive(Debug, Deserialize)]
pub struct BulkCreateRequest {
    pub text: String,
    #[serde(default)]
    pub schedule: Option<String>,
}

/// Partial task update. Unknown fields are ignored; `chunk_id: null` unchunks.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTaskRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub schedule: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub chunk_id: Option<Option<String>>,
    #[serde(default, alias = "completedAt", deserialize_with = "double_option")]
    pub completed_at: Option<Option<i64>>,
}

impl TryFrom<UpdateTaskRequest> for TaskUpdate {
    type Error = ApiError;

    fn try_from(req: UpdateTaskRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            title: req.title,
            description: req.description,
            schedule: req.schedule.as_deref().map(Schedule::parse).transpose()?,
            status: req.status.as_deref().map(TaskStatus::parse).transpose()?,
            chunk_id: req.chunk_id,
            completed_at: req.completed_at,
        })
    }
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let Json(req) = payload?;
    let task = state.service.create_task(req.into_new_task()?).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn create_bulk(
    State(state): State<AppState>,
    payload: Result<Json<BulkCreateRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Vec<Task>>), ApiError> {
    let Json(req) = payload?;
    let schedule = req
        .schedule
        .as_deref()
        .map(Schedule::parse)
        .transpose()?
        .unwrap_or(Schedule::Today);
    let tasks = state.service.create_tasks_bulk(&req.text, schedule).await?;
    Ok((StatusCode::CREATED, Json(tasks)))
}

pub async fn list(State(state): State<AppState>) -> Result<Json<TaskBuckets>, ApiError> {
    Ok(Json(state.service.task_buckets().await?))
}

pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    Ok(Json(state.service.get_task(&id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> Result<Json<Task>, ApiError> {
    let Json(req) = payload?;
    let task = state.service.update_task(&id, req.try_into()?).await?;
    Ok(Json(task))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.service.delete_task(&id).await?;
    Ok(Json(MessageResponse::new("Task deleted successfully")))
}
