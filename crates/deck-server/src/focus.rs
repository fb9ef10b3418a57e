//! Server-side focus session driver.
//!
//! Holds at most one [`FocusSession`], feeds it one tick per interval, and
//! applies the store effects each command returns. The session lock is held
//! while effects are written so they land in the order they were produced.

use std::sync::Arc;
use std::time::Duration;

use deck_core::entities::ChunkWithTasks;
use deck_core::enums::EntityType;
use deck_core::focus::{FocusEffect, FocusSession, FocusSnapshot};
use deck_db::error::DatabaseError;
use deck_db::service::DeckService;
use deck_db::updates::task::TaskUpdateBuilder;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::error::ApiError;

pub struct FocusDriver {
    service: Arc<DeckService>,
    duration_secs: u32,
    session: Mutex<Option<FocusSession>>,
}

impl FocusDriver {
    #[must_use]
    pub fn new(service: Arc<DeckService>, duration_secs: u32) -> Self {
        Self {
            service,
            duration_secs,
            session: Mutex::new(None),
        }
    }

    /// Start a session on `chunk_id`, replacing (stopping) any previous one.
    pub async fn start(&self, chunk_id: &str) -> Result<(ChunkWithTasks, FocusSnapshot), ApiError> {
        let chunk = self.service.start_chunk(chunk_id).await?;

        let mut slot = self.session.lock().await;
        if let Some(previous) = slot.as_mut() {
            if previous.state().is_active() {
                tracing::info!(
                    chunk_id = previous.chunk_id(),
                    "stopping previous focus session"
                );
                previous.stop()?;
            }
        }

        let session = FocusSession::start(&chunk.chunk, &chunk.tasks, self.duration_secs);
        let snapshot = session.snapshot();
        *slot = Some(session);

        tracing::info!(
            %chunk_id,
            tasks = chunk.tasks.len(),
            duration_secs = self.duration_secs,
            "focus session started"
        );
        Ok((chunk, snapshot))
    }

    /// Snapshot of the current (or last ended) session.
    pub async fn snapshot(&self) -> Result<FocusSnapshot, ApiError> {
        let slot = self.session.lock().await;
        slot.as_ref()
            .map(FocusSession::snapshot)
            .ok_or_else(no_session)
    }

    pub async fn pause(&self) -> Result<FocusSnapshot, ApiError> {
        let mut slot = self.session.lock().await;
        let session = slot.as_mut().ok_or_else(no_session)?;
        session.pause()?;
        Ok(session.snapshot())
    }

    pub async fn resume(&self) -> Result<FocusSnapshot, ApiError> {
        let mut slot = self.session.lock().await;
        let session = slot.as_mut().ok_or_else(no_session)?;
        session.resume()?;
        Ok(session.snapshot())
    }

    pub async fn stop(&self) -> Result<FocusSnapshot, ApiError> {
        let mut slot = self.session.lock().await;
        let session = slot.as_mut().ok_or_else(no_session)?;
        session.stop()?;
        tracing::info!(chunk_id = session.chunk_id(), elapsed = session.elapsed(), "focus session stopped");
        Ok(session.snapshot())
    }

    /// Complete every open task now and close the chunk.
    pub async fn finish(&self) -> Result<FocusSnapshot, ApiError> {
        let mut slot = self.session.lock().await;
        let session = slot.as_mut().ok_or_else(no_session)?;
        let effects = session.finish()?;
        self.apply_all(effects).await?;
        tracing::info!(chunk_id = session.chunk_id(), elapsed = session.elapsed(), "focus session finished");
        Ok(session.snapshot())
    }

    pub async fn toggle_task(&self, task_id: &str) -> Result<FocusSnapshot, ApiError> {
        let mut slot = self.session.lock().await;
        let session = slot.as_mut().ok_or_else(no_session)?;
        let effect = session.toggle_task(task_id)?;
        self.apply(effect).await?;
        Ok(session.snapshot())
    }

    pub async fn remove_task(&self, task_id: &str) -> Result<FocusSnapshot, ApiError> {
        let mut slot = self.session.lock().await;
        let session = slot.as_mut().ok_or_else(no_session)?;
        let effect = session.remove_task(task_id)?;
        self.apply(effect).await?;
        Ok(session.snapshot())
    }

    /// Advance the active session by one second.
    ///
    /// Storage errors are logged rather than returned; the countdown itself
    /// has already moved on.
    pub async fn tick(&self) {
        let mut slot = self.session.lock().await;
        let Some(session) = slot.as_mut() else {
            return;
        };
        let effects = session.tick();
        if effects.is_empty() {
            return;
        }
        tracing::info!(chunk_id = session.chunk_id(), "focus countdown reached zero");
        if let Err(error) = self.apply_all(effects).await {
            tracing::error!(%error, chunk_id = session.chunk_id(), "failed to persist finished session");
        }
    }

    /// Spawn the ticker loop. The first tick fires one `period` after start.
    pub fn spawn_ticker(self: Arc<Self>, period: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            loop {
                interval.tick().await;
                self.tick().await;
            }
        })
    }

    /// Apply every effect, even after one fails, so the chunk is still
    /// closed. Returns the first failure.
    async fn apply_all(&self, effects: Vec<FocusEffect>) -> Result<(), DatabaseError> {
        let mut first_error = None;
        for effect in effects {
            if let Err(error) = self.apply(effect).await {
                tracing::error!(%error, "failed to persist focus effect");
                first_error.get_or_insert(error);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Persist one effect. A task deleted while the session ran is skipped.
    async fn apply(&self, effect: FocusEffect) -> Result<(), DatabaseError> {
        let result = match effect {
            FocusEffect::SetTaskStatus {
                task_id,
                status,
                completed_at,
            } => {
                let update = TaskUpdateBuilder::new()
                    .status(status)
                    .completed_at(completed_at)
                    .build();
                self.service.update_task(&task_id, update).await.map(drop)
            }
            FocusEffect::UnchunkTask { task_id } => {
                let update = TaskUpdateBuilder::new().chunk_id(None).build();
                self.service.update_task(&task_id, update).await.map(drop)
            }
            FocusEffect::CompleteChunk {
                chunk_id,
                total_elapsed,
            } => self
                .service
                .complete_chunk(&chunk_id, total_elapsed)
                .await
                .map(drop),
        };
        match result {
            Err(DatabaseError::NotFound {
                entity: EntityType::Task,
                id,
            }) => {
                tracing::warn!(task_id = %id, "session task no longer exists; skipping");
                Ok(())
            }
            other => other,
        }
    }
}

fn no_session() -> ApiError {
    ApiError::NotFound(format!("No active {}", EntityType::FocusSession.label().to_lowercase()))
}
