//! Daily reset: once per calendar day, pending work is ungrouped.
//!
//! The reset unchunks every pending task and deletes every pending chunk.
//! Completed tasks and chunks are history and stay untouched. The date of the
//! last successful reset is kept in `app_meta` under [`LAST_RESET_KEY`] and is
//! written in the same transaction as the reset itself, so a failed reset
//! leaves the marker behind and the next check retries.

use chrono::{NaiveDate, Utc};

use deck_core::enums::{ChunkStatus, TaskStatus};
use deck_core::responses::ResetReport;

use crate::error::DatabaseError;
use crate::service::DeckService;

/// `app_meta` key holding the last reset date as `YYYY-MM-DD`.
pub const LAST_RESET_KEY: &str = "last_reset_date";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Outcome of [`DeckService::check_and_run_reset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetCheck {
    /// The marker already holds today's date.
    AlreadyDone,
    /// The reset ran and the marker now holds today's date.
    Ran(ResetReport),
}

impl DeckService {
    /// Reset unconditionally and record `today` as the last reset date.
    ///
    /// Used by the midnight trigger and the manual `POST /api/reset`.
    pub async fn run_daily_reset(&self, today: NaiveDate) -> Result<ResetReport, DatabaseError> {
        let _guard = self.lock_writes().await;
        self.reset_locked(today).await
    }

    /// Reset only if the stored marker is not `today`. Called at startup.
    pub async fn check_and_run_reset(&self, today: NaiveDate) -> Result<ResetCheck, DatabaseError> {
        let _guard = self.lock_writes().await;
        if self.last_reset_date().await? == Some(today) {
            tracing::debug!(%today, "daily reset already ran");
            return Ok(ResetCheck::AlreadyDone);
        }
        self.reset_locked(today).await.map(ResetCheck::Ran)
    }

    /// The stored marker. An unparsable value reads as "never reset".
    pub async fn last_reset_date(&self) -> Result<Option<NaiveDate>, DatabaseError> {
        let Some(raw) = self.get_meta(LAST_RESET_KEY).await? else {
            return Ok(None);
        };
        match NaiveDate::parse_from_str(&raw, DATE_FORMAT) {
            Ok(date) => Ok(Some(date)),
            Err(e) => {
                tracing::warn!(value = %raw, error = %e, "ignoring malformed reset marker");
                Ok(None)
            }
        }
    }

    async fn reset_locked(&self, today: NaiveDate) -> Result<ResetReport, DatabaseError> {
        let tx = self.db().conn().transaction().await?;

        let report = match self.reset_statements(today).await {
            Ok(report) => report,
            Err(error) => {
                if let Err(rollback) = tx.rollback().await {
                    tracing::error!(error = %rollback, "failed to roll back daily reset");
                }
                tracing::error!(%today, %error, "daily reset failed; marker unchanged");
                return Err(error);
            }
        };
        tx.commit().await?;

        tracing::info!(
            %today,
            tasks_unchunked = report.tasks_unchunked,
            chunks_removed = report.chunks_removed,
            "daily reset complete"
        );
        Ok(report)
    }

    /// The reset's statements, run inside the caller's transaction.
    async fn reset_statements(&self, today: NaiveDate) -> Result<ResetReport, DatabaseError> {
        let tasks_unchunked = self
            .db()
            .conn()
            .execute(
                "UPDATE tasks SET chunk_id = NULL, updated_at = ?1
                 WHERE status = ?2 AND chunk_id IS NOT NULL",
                libsql::params![Utc::now().to_rfc3339(), TaskStatus::Pending.as_str()],
            )
            .await?;
        let chunks_removed = self
            .db()
            .conn()
            .execute(
                "DELETE FROM chunks WHERE status = ?1",
                [ChunkStatus::Pending.as_str()],
            )
            .await?;
        self.upsert_meta(LAST_RESET_KEY, &today.format(DATE_FORMAT).to_string())
            .await?;

        Ok(ResetReport {
            tasks_unchunked,
            chunks_removed,
        })
    }
}
