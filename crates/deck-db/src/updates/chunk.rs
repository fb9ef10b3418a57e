//! Chunk update builder.

use chrono::{DateTime, Utc};
use deck_core::enums::ChunkStatus;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChunkUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ChunkStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Option<DateTime<Utc>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_elapsed: Option<i64>,
}

impl ChunkUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.status.is_none()
            && self.completed_at.is_none()
            && self.total_elapsed.is_none()
    }
}

#[derive(Debug, Default)]
pub struct ChunkUpdateBuilder(ChunkUpdate);

impl ChunkUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.0.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn status(mut self, status: ChunkStatus) -> Self {
        self.0.status = Some(status);
        self
    }

    #[must_use]
    pub fn completed_at(mut self, completed_at: Option<DateTime<Utc>>) -> Self {
        self.0.completed_at = Some(completed_at);
        self
    }

    #[must_use]
    pub fn total_elapsed(mut self, seconds: i64) -> Self {
        self.0.total_elapsed = Some(seconds);
        self
    }

    #[must_use]
    pub fn build(self) -> ChunkUpdate {
        self.0
    }
}
