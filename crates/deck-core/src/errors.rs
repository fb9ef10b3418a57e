//! Cross-cutting error types for focusdeck.
//!
//! Storage errors live in `deck-db` (`DatabaseError`) and HTTP mapping in
//! `deck-server` (`ApiError`). Both convert from `CoreError`.

use thiserror::Error;

/// Errors that can be raised by any focusdeck crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// A state machine transition was attempted that is not allowed.
    #[error("Invalid state transition: {entity_type} {id} from {from} to {to}")]
    InvalidTransition {
        entity_type: String,
        id: String,
        from: String,
        to: String,
    },

    /// The entity exists but its current state rules the operation out.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Data failed validation (missing title, unknown schedule, ...).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
