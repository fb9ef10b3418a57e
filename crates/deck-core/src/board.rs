//! Board aggregation: the "unchunked vs per-chunk" view consumed by clients.
//!
//! The board is rebuilt from store state on every request. Tasks whose
//! `chunk_id` points at a chunk the aggregator was not given are left out of
//! every bucket and only counted in [`Board::dangling`]; nothing here repairs
//! them.

use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Chunk, ChunkWithTasks, Task};
use crate::enums::ChunkStatus;

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Board {
    /// Tasks with no chunk assignment.
    pub unchunked: Vec<Task>,
    /// Pending chunks, in the order they were supplied (creation order).
    pub chunks: Vec<ChunkWithTasks>,
    /// Completed chunks, most recently completed first.
    pub completed_chunks: Vec<ChunkWithTasks>,
    /// Number of tasks referencing a chunk that is not on the board.
    pub dangling: usize,
}

impl Board {
    /// Partition `tasks` into the unchunked bucket and one bucket per chunk.
    ///
    /// Task order inside each bucket follows the input order.
    #[must_use]
    pub fn build(tasks: Vec<Task>, chunks: Vec<Chunk>) -> Self {
        let index: HashMap<String, usize> = chunks
            .iter()
            .enumerate()
            .map(|(i, chunk)| (chunk.id.clone(), i))
            .collect();

        let mut buckets: Vec<Vec<Task>> = vec![Vec::new(); chunks.len()];
        let mut unchunked = Vec::new();
        let mut dangling = 0;

        for task in tasks {
            match task.chunk_id.as_deref() {
                None => unchunked.push(task),
                Some(chunk_id) => match index.get(chunk_id) {
                    Some(&i) => buckets[i].push(task),
                    None => dangling += 1,
                },
            }
        }

        let mut pending = Vec::new();
        let mut completed = Vec::new();
        for (chunk, tasks) in chunks.into_iter().zip(buckets) {
            let bucket = ChunkWithTasks { chunk, tasks };
            match bucket.chunk.status {
                ChunkStatus::Pending => pending.push(bucket),
                ChunkStatus::Completed => completed.push(bucket),
            }
        }
        // `None` sorts before `Some`, so reversing puts undated completions last.
        completed.sort_by(|a, b| b.chunk.completed_at.cmp(&a.chunk.completed_at));

        Self {
            unchunked,
            chunks: pending,
            completed_chunks: completed,
            dangling,
        }
    }

    /// Tasks in the bucket for `chunk_id`, pending or completed.
    #[must_use]
    pub fn bucket(&self, chunk_id: &str) -> Option<&[Task]> {
        self.chunks
            .iter()
            .chain(&self.completed_chunks)
            .find(|bucket| bucket.chunk.id == chunk_id)
            .map(|bucket| bucket.tasks.as_slice())
    }
}
