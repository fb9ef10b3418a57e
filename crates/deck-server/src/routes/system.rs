use axum::Json;
use axum::extract::State;
use chrono::Local;
use deck_core::board::Board;
use deck_core::responses::ResetReport;
use serde_json::{Value, json};

use crate::error::ApiError;
use crate::state::AppState;

pub async fn board(State(state): State<AppState>) -> Result<Json<Board>, ApiError> {
    Ok(Json(state.service.board().await?))
}

/// Run the daily reset now and record today as done.
pub async fn reset(State(state): State<AppState>) -> Result<Json<ResetReport>, ApiError> {
    let report = state
        .service
        .run_daily_reset(Local::now().date_naive())
        .await?;
    Ok(Json(report))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
