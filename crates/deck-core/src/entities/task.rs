use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{Schedule, TaskStatus};

/// A single to-do item, optionally grouped into a chunk.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub schedule: Schedule,
    pub status: TaskStatus,
    /// Weak reference to the owning chunk. `None` means unchunked.
    pub chunk_id: Option<String>,
    /// Seconds into a focus session at which the task was completed.
    /// Always `None` while the task is pending.
    pub completed_at: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    #[must_use]
    pub fn is_unchunked(&self) -> bool {
        self.chunk_id.is_none()
    }
}
