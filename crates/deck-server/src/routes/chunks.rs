//! `/api/chunks` handlers.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use deck_core::entities::{Chunk, ChunkWithTasks};
use deck_core::enums::ChunkStatus;
use deck_core::responses::{ChunkStartResponse, MessageResponse};
use deck_db::updates::chunk::ChunkUpdate;
use serde::Deserialize;

use super::payload::double_option;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateChunkRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "taskIds", alias = "task_ids")]
    pub task_ids: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateChunkRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, alias = "completedAt", deserialize_with = "double_option")]
    pub completed_at: Option<Option<DateTime<Utc>>>,
    #[serde(default, alias = "totalElapsed")]
    pub total_elapsed: Option<i64>,
}

impl TryFrom<UpdateChunkRequest> for ChunkUpdate {
    type Error = ApiError;

    fn try_from(req: UpdateChunkRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: req.name,
            status: req.status.as_deref().map(ChunkStatus::parse).transpose()?,
            completed_at: req.completed_at,
            total_elapsed: req.total_elapsed,
        })
    }
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateChunkRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ChunkWithTasks>), ApiError> {
    let Json(req) = payload?;
    let task_ids = req
        .task_ids
        .ok_or_else(|| ApiError::Validation("Invalid chunk data: taskIds is required".into()))?;
    let chunk = state
        .service
        .create_chunk(req.name.as_deref(), &task_ids)
        .await?;
    Ok((StatusCode::CREATED, Json(chunk)))
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<ChunkWithTasks>>, ApiError> {
    Ok(Json(state.service.list_chunks_with_tasks().await?))
}

pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ChunkWithTasks>, ApiError> {
    Ok(Json(state.service.get_chunk_with_tasks(&id).await?))
}

/// Start a focus session on the chunk.
pub async fn start(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ChunkStartResponse>, ApiError> {
    let (chunk, session) = state.focus.start(&id).await?;
    Ok(Json(ChunkStartResponse {
        message: "Chunk started".into(),
        chunk,
        session,
    }))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateChunkRequest>, JsonRejection>,
) -> Result<Json<Chunk>, ApiError> {
    let Json(req) = payload?;
    let chunk = state.service.update_chunk(&id, req.try_into()?).await?;
    Ok(Json(chunk))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.service.delete_chunk(&id).await?;
    Ok(Json(MessageResponse::new("Chunk deleted successfully")))
}
