//! Response types returned as JSON by the HTTP surface.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{ChunkWithTasks, Task};
use crate::enums::Schedule;
use crate::focus::FocusSnapshot;

/// Pending tasks split by schedule (`GET /api/tasks`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TaskBuckets {
    pub today: Vec<Task>,
    pub tomorrow: Vec<Task>,
}

impl TaskBuckets {
    /// Place each task in the bucket matching its schedule.
    #[must_use]
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let (today, tomorrow) = tasks
            .into_iter()
            .partition(|t| t.schedule == Schedule::Today);
        Self { today, tomorrow }
    }
}

/// Plain acknowledgement body (`{"message": "..."}`).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Response from `POST /api/chunks/{id}/start`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ChunkStartResponse {
    pub message: String,
    pub chunk: ChunkWithTasks,
    pub session: FocusSnapshot,
}

/// What a daily reset touched.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ResetReport {
    pub tasks_unchunked: u64,
    pub chunks_removed: u64,
}

impl ResetReport {
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.tasks_unchunked == 0 && self.chunks_removed == 0
    }
}
