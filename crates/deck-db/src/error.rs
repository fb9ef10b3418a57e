//! Database error types for deck-db.

use deck_core::enums::EntityType;
use deck_core::errors::CoreError;
use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed or returned unparsable data.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// The addressed entity does not exist.
    #[error("{} not found: {id}", entity.label())]
    NotFound { entity: EntityType, id: String },

    /// Caller-supplied data was rejected before touching the store.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The entity is in a state that does not allow the operation.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DatabaseError {
    pub(crate) fn not_found(entity: EntityType, id: &str) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

impl From<CoreError> for DatabaseError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::Validation(msg) => Self::Validation(msg),
            CoreError::InvalidState(msg) => Self::InvalidState(msg),
            CoreError::InvalidTransition { .. } => Self::InvalidState(error.to_string()),
            CoreError::NotFound { entity_type, id } => {
                let entity = match entity_type.as_str() {
                    "chunk" => EntityType::Chunk,
                    "focus_session" => EntityType::FocusSession,
                    _ => EntityType::Task,
                };
                Self::NotFound { entity, id }
            }
            CoreError::Other(e) => Self::Other(e),
        }
    }
}
