use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::Task;
use crate::enums::ChunkStatus;

/// A named batch of tasks worked on together in one focus session.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Chunk {
    pub id: String,
    pub name: String,
    pub status: ChunkStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Total focus time spent on the chunk, in seconds.
    pub total_elapsed: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A chunk together with the tasks currently pointing at it.
///
/// Serializes flat (`{ ...chunk, "tasks": [...] }`) so clients see the chunk
/// fields at the top level.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ChunkWithTasks {
    #[serde(flatten)]
    pub chunk: Chunk,
    pub tasks: Vec<Task>,
}
