//! HTTP error mapping.
//!
//! Every handler returns `Result<_, ApiError>`. The response body is always
//! `{"message": "..."}`; storage failures are logged and never leak details.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use deck_core::errors::CoreError;
use deck_core::responses::MessageResponse;
use deck_db::error::DatabaseError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed payload or rejected field values.
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// The focus session or chunk is in a state that rules the command out.
    #[error("{0}")]
    Conflict(String),

    #[error("Database error")]
    Database(#[source] DatabaseError),
}

impl ApiError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DatabaseError> for ApiError {
    fn from(error: DatabaseError) -> Self {
        match error {
            DatabaseError::Validation(msg) => Self::Validation(msg),
            DatabaseError::NotFound { entity, .. } => {
                Self::NotFound(format!("{} not found", entity.label()))
            }
            DatabaseError::InvalidState(msg) => Self::Conflict(msg),
            other => Self::Database(other),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(error: CoreError) -> Self {
        DatabaseError::from(error).into()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Database(source) = &self {
            tracing::error!(error = %source, "storage failure");
        }
        let status = self.status();
        (status, Json(MessageResponse::new(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use deck_core::enums::EntityType;

    use super::*;

    #[test]
    fn maps_database_errors_to_status_codes() {
        let cases = [
            (
                ApiError::from(DatabaseError::Validation("bad".into())),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::from(DatabaseError::NotFound {
                    entity: EntityType::Chunk,
                    id: "chk-1".into(),
                }),
                StatusCode::NOT_FOUND,
            ),
            (
                ApiError::from(DatabaseError::InvalidState("done".into())),
                StatusCode::CONFLICT,
            ),
            (
                ApiError::from(DatabaseError::Query("boom".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, expected) in cases {
            assert_eq!(error.status(), expected, "{error:?}");
        }
    }

    #[test]
    fn not_found_message_uses_entity_label() {
        let error = ApiError::from(DatabaseError::NotFound {
            entity: EntityType::Task,
            id: "tsk-1".into(),
        });
        assert_eq!(error.to_string(), "Task not found");
    }

    #[test]
    fn database_message_is_generic() {
        let error = ApiError::from(DatabaseError::Query("secret detail".into()));
        assert_eq!(error.to_string(), "Database error");
    }

    #[test]
    fn ended_session_maps_to_conflict() {
        let error = ApiError::from(CoreError::InvalidState("finished".into()));
        assert_eq!(error.status(), StatusCode::CONFLICT);
    }
}
