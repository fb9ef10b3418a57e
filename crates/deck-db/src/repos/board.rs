//! Read models assembled from the task and chunk tables.

use deck_core::board::Board;
use deck_core::responses::TaskBuckets;

use crate::error::DatabaseError;
use crate::service::DeckService;

impl DeckService {
    /// Pending tasks split into `today` and `tomorrow`.
    pub async fn task_buckets(&self) -> Result<TaskBuckets, DatabaseError> {
        Ok(TaskBuckets::from_tasks(self.list_pending_tasks().await?))
    }

    /// The unchunked/per-chunk board, rebuilt from the store.
    pub async fn board(&self) -> Result<Board, DatabaseError> {
        let tasks = self.list_board_tasks().await?;
        let chunks = self.list_chunks().await?;
        Ok(Board::build(tasks, chunks))
    }
}
