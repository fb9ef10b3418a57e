//! `/api/focus` handlers. All return the session snapshot after the command.

use axum::Json;
use axum::extract::{Path, State};
use deck_core::focus::FocusSnapshot;

use crate::error::ApiError;
use crate::state::AppState;

type SnapshotResult = Result<Json<FocusSnapshot>, ApiError>;

pub async fn current(State(state): State<AppState>) -> SnapshotResult {
    Ok(Json(state.focus.snapshot().await?))
}

pub async fn pause(State(state): State<AppState>) -> SnapshotResult {
    Ok(Json(state.focus.pause().await?))
}

pub async fn resume(State(state): State<AppState>) -> SnapshotResult {
    Ok(Json(state.focus.resume().await?))
}

pub async fn stop(State(state): State<AppState>) -> SnapshotResult {
    Ok(Json(state.focus.stop().await?))
}

pub async fn finish(State(state): State<AppState>) -> SnapshotResult {
    Ok(Json(state.focus.finish().await?))
}

pub async fn toggle_task(State(state): State<AppState>, Path(id): Path<String>) -> SnapshotResult {
    Ok(Json(state.focus.toggle_task(&id).await?))
}

pub async fn remove_task(State(state): State<AppState>, Path(id): Path<String>) -> SnapshotResult {
    Ok(Json(state.focus.remove_task(&id).await?))
}
