//! Focus session state machine.
//!
//! A session runs a countdown against one chunk's tasks. It holds no I/O:
//! every command returns the [`FocusEffect`]s the caller must persist, in
//! order. Nothing here survives a restart; only effects already applied to
//! the store do.
//!
//! ```text
//! running ⇄ paused
//! running | paused → stopped   (no forced completion)
//! running | paused → finished  (remaining tasks completed, chunk closed)
//! ```

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Chunk, Task};
use crate::enums::{EntityType, TaskStatus};
use crate::errors::CoreError;

/// Countdown length used when nothing else is configured (20 minutes).
pub const DEFAULT_FOCUS_DURATION_SECS: u32 = 1200;

/// Lifecycle state of a focus session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FocusState {
    Running,
    Paused,
    Stopped,
    Finished,
}

impl FocusState {
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Running => &[Self::Paused, Self::Stopped, Self::Finished],
            Self::Paused => &[Self::Running, Self::Stopped, Self::Finished],
            Self::Stopped | Self::Finished => &[],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Running | Self::Paused)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Stopped => "stopped",
            Self::Finished => "finished",
        }
    }
}

impl fmt::Display for FocusState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A task as seen by the running session.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct FocusTask {
    pub id: String,
    pub title: String,
    pub is_completed: bool,
    /// Session-elapsed seconds at completion; only set while completed.
    pub completed_at: Option<i64>,
}

/// A store write produced by a session command.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FocusEffect {
    /// Persist `{status, completed_at}` on a task.
    SetTaskStatus {
        task_id: String,
        status: TaskStatus,
        completed_at: Option<i64>,
    },
    /// Persist `chunk_id = null` on a task.
    UnchunkTask { task_id: String },
    /// Mark the chunk completed with the total elapsed session time.
    CompleteChunk { chunk_id: String, total_elapsed: i64 },
}

/// Serializable view of a session for clients.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct FocusSnapshot {
    pub chunk_id: String,
    pub chunk_name: String,
    pub state: FocusState,
    pub initial_duration: u32,
    pub remaining: u32,
    pub elapsed: u32,
    pub tasks: Vec<FocusTask>,
}

#[derive(Debug, Clone)]
pub struct FocusSession {
    chunk_id: String,
    chunk_name: String,
    initial_duration: u32,
    remaining: u32,
    state: FocusState,
    tasks: Vec<FocusTask>,
}

impl FocusSession {
    /// Start a running session over `tasks`.
    ///
    /// Tasks already completed in the store start out completed; their
    /// stored `completed_at` is carried over.
    #[must_use]
    pub fn start(chunk: &Chunk, tasks: &[Task], duration_secs: u32) -> Self {
        let tasks = tasks
            .iter()
            .map(|task| {
                let is_completed = task.status.is_completed();
                FocusTask {
                    id: task.id.clone(),
                    title: task.title.clone(),
                    is_completed,
                    completed_at: if is_completed { task.completed_at } else { None },
                }
            })
            .collect();

        Self {
            chunk_id: chunk.id.clone(),
            chunk_name: chunk.name.clone(),
            initial_duration: duration_secs,
            remaining: duration_secs,
            state: FocusState::Running,
            tasks,
        }
    }

    #[must_use]
    pub fn chunk_id(&self) -> &str {
        &self.chunk_id
    }

    #[must_use]
    pub const fn state(&self) -> FocusState {
        self.state
    }

    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    #[must_use]
    pub fn tasks(&self) -> &[FocusTask] {
        &self.tasks
    }

    /// Seconds of countdown consumed so far.
    #[must_use]
    pub const fn elapsed(&self) -> u32 {
        self.initial_duration - self.remaining
    }

    #[must_use]
    pub fn snapshot(&self) -> FocusSnapshot {
        FocusSnapshot {
            chunk_id: self.chunk_id.clone(),
            chunk_name: self.chunk_name.clone(),
            state: self.state,
            initial_duration: self.initial_duration,
            remaining: self.remaining,
            elapsed: self.elapsed(),
            tasks: self.tasks.clone(),
        }
    }

    /// Advance the countdown by one second.
    ///
    /// Does nothing unless running. When the countdown reaches zero the
    /// session finishes and the finishing effects are returned.
    pub fn tick(&mut self) -> Vec<FocusEffect> {
        if self.state != FocusState::Running || self.remaining == 0 {
            return Vec::new();
        }
        self.remaining -= 1;
        if self.remaining == 0 {
            return self.complete();
        }
        Vec::new()
    }

    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` unless the session is running.
    pub fn pause(&mut self) -> Result<(), CoreError> {
        self.transition(FocusState::Running, FocusState::Paused)
    }

    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` unless the session is paused.
    pub fn resume(&mut self) -> Result<(), CoreError> {
        self.transition(FocusState::Paused, FocusState::Running)
    }

    /// Halt the countdown and leave without completing anything.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` if the session already ended.
    pub fn stop(&mut self) -> Result<(), CoreError> {
        self.ensure_can(FocusState::Stopped)?;
        self.state = FocusState::Stopped;
        Ok(())
    }

    /// Flip a task's completion, stamping it with the current elapsed time.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidState` if the session ended, or
    /// `CoreError::NotFound` if the task is not part of the session.
    pub fn toggle_task(&mut self, task_id: &str) -> Result<FocusEffect, CoreError> {
        self.ensure_active()?;
        let elapsed = i64::from(self.elapsed());
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or_else(|| not_found(task_id))?;

        task.is_completed = !task.is_completed;
        task.completed_at = task.is_completed.then_some(elapsed);

        Ok(FocusEffect::SetTaskStatus {
            task_id: task.id.clone(),
            status: if task.is_completed {
                TaskStatus::Completed
            } else {
                TaskStatus::Pending
            },
            completed_at: task.completed_at,
        })
    }

    /// Drop a task from the session and unassign it from the chunk.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidState` if the session ended, or
    /// `CoreError::NotFound` if the task is not part of the session.
    pub fn remove_task(&mut self, task_id: &str) -> Result<FocusEffect, CoreError> {
        self.ensure_active()?;
        let pos = self
            .tasks
            .iter()
            .position(|t| t.id == task_id)
            .ok_or_else(|| not_found(task_id))?;
        let task = self.tasks.remove(pos);
        Ok(FocusEffect::UnchunkTask { task_id: task.id })
    }

    /// Finish early: complete every open task and close the chunk.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` if the session already ended.
    pub fn finish(&mut self) -> Result<Vec<FocusEffect>, CoreError> {
        self.ensure_can(FocusState::Finished)?;
        Ok(self.complete())
    }

    fn complete(&mut self) -> Vec<FocusEffect> {
        let elapsed = i64::from(self.elapsed());
        let mut effects = Vec::new();
        for task in self.tasks.iter_mut().filter(|t| !t.is_completed) {
            task.is_completed = true;
            task.completed_at = Some(elapsed);
            effects.push(FocusEffect::SetTaskStatus {
                task_id: task.id.clone(),
                status: TaskStatus::Completed,
                completed_at: Some(elapsed),
            });
        }
        effects.push(FocusEffect::CompleteChunk {
            chunk_id: self.chunk_id.clone(),
            total_elapsed: elapsed,
        });
        self.state = FocusState::Finished;
        effects
    }

    fn transition(&mut self, from: FocusState, to: FocusState) -> Result<(), CoreError> {
        if self.state != from {
            return Err(self.invalid(to));
        }
        self.ensure_can(to)?;
        self.state = to;
        Ok(())
    }

    fn ensure_can(&self, next: FocusState) -> Result<(), CoreError> {
        if self.state.can_transition_to(next) {
            Ok(())
        } else {
            Err(self.invalid(next))
        }
    }

    fn ensure_active(&self) -> Result<(), CoreError> {
        if self.state.is_active() {
            Ok(())
        } else {
            Err(CoreError::InvalidState(format!(
                "focus session for chunk {} is {}",
                self.chunk_id, self.state
            )))
        }
    }

    fn invalid(&self, to: FocusState) -> CoreError {
        CoreError::InvalidTransition {
            entity_type: EntityType::FocusSession.as_str().to_string(),
            id: self.chunk_id.clone(),
            from: self.state.as_str().to_string(),
            to: to.as_str().to_string(),
        }
    }
}

fn not_found(task_id: &str) -> CoreError {
    CoreError::NotFound {
        entity_type: EntityType::Task.as_str().to_string(),
        id: task_id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::enums::{ChunkStatus, Schedule};

    fn chunk() -> Chunk {
        let now = Utc::now();
        Chunk {
            id: "chk-00000001".into(),
            name: "Morning".into(),
            status: ChunkStatus::Pending,
            started_at: None,
            completed_at: None,
            total_elapsed: 0,
            created_at: now,
            updated_at: now,
        }
    }

    fn task(id: &str, status: TaskStatus) -> Task {
        let now = Utc::now();
        Task {
            id: id.into(),
            title: format!("task {id}"),
            description: String::new(),
            schedule: Schedule::Today,
            status,
            chunk_id: Some("chk-00000001".into()),
            completed_at: status.is_completed().then_some(12),
            created_at: now,
            updated_at: now,
        }
    }

    fn session(tasks: &[Task]) -> FocusSession {
        FocusSession::start(&chunk(), tasks, DEFAULT_FOCUS_DURATION_SECS)
    }

    fn tick_n(session: &mut FocusSession, n: u32) -> Vec<FocusEffect> {
        let mut effects = Vec::new();
        for _ in 0..n {
            effects.extend(session.tick());
        }
        effects
    }

    #[test]
    fn start_derives_completion_from_status() {
        let s = session(&[
            task("t1", TaskStatus::Pending),
            task("t2", TaskStatus::Completed),
        ]);
        assert_eq!(s.state(), FocusState::Running);
        assert_eq!(s.remaining(), 1200);
        assert!(!s.tasks()[0].is_completed);
        assert_eq!(s.tasks()[0].completed_at, None);
        assert!(s.tasks()[1].is_completed);
        assert_eq!(s.tasks()[1].completed_at, Some(12));
    }

    #[test]
    fn toggle_records_elapsed_seconds() {
        let mut s = session(&[task("t1", TaskStatus::Pending)]);
        tick_n(&mut s, 50);
        assert_eq!(s.remaining(), 1150);

        let effect = s.toggle_task("t1").unwrap();
        assert_eq!(
            effect,
            FocusEffect::SetTaskStatus {
                task_id: "t1".into(),
                status: TaskStatus::Completed,
                completed_at: Some(50),
            }
        );
    }

    #[test]
    fn toggle_back_to_pending_clears_completed_at() {
        let mut s = session(&[task("t1", TaskStatus::Pending)]);
        tick_n(&mut s, 5);
        s.toggle_task("t1").unwrap();
        let effect = s.toggle_task("t1").unwrap();
        assert_eq!(
            effect,
            FocusEffect::SetTaskStatus {
                task_id: "t1".into(),
                status: TaskStatus::Pending,
                completed_at: None,
            }
        );
        assert!(!s.tasks()[0].is_completed);
    }

    #[test]
    fn pause_suspends_ticking_without_resetting() {
        let mut s = session(&[]);
        tick_n(&mut s, 10);
        s.pause().unwrap();
        tick_n(&mut s, 100);
        assert_eq!(s.elapsed(), 10);

        s.resume().unwrap();
        tick_n(&mut s, 5);
        assert_eq!(s.elapsed(), 15);
    }

    #[test]
    fn pause_twice_is_rejected() {
        let mut s = session(&[]);
        s.pause().unwrap();
        assert!(matches!(
            s.pause(),
            Err(CoreError::InvalidTransition { .. })
        ));
        assert!(s.resume().is_ok());
        assert!(s.resume().is_err());
    }

    #[test]
    fn countdown_to_zero_completes_everything() {
        let mut s = session(&[
            task("t1", TaskStatus::Pending),
            task("t2", TaskStatus::Pending),
        ]);
        tick_n(&mut s, 50);
        s.toggle_task("t1").unwrap();

        let effects = tick_n(&mut s, 2000);
        assert_eq!(s.state(), FocusState::Finished);
        assert_eq!(s.remaining(), 0);
        assert_eq!(
            effects,
            vec![
                FocusEffect::SetTaskStatus {
                    task_id: "t2".into(),
                    status: TaskStatus::Completed,
                    completed_at: Some(1200),
                },
                FocusEffect::CompleteChunk {
                    chunk_id: "chk-00000001".into(),
                    total_elapsed: 1200,
                },
            ]
        );
        assert_eq!(s.tasks()[0].completed_at, Some(50));
    }

    #[test]
    fn finish_early_uses_elapsed_at_that_moment() {
        let mut s = session(&[task("t1", TaskStatus::Pending)]);
        tick_n(&mut s, 300);
        let effects = s.finish().unwrap();
        assert_eq!(
            effects.last(),
            Some(&FocusEffect::CompleteChunk {
                chunk_id: "chk-00000001".into(),
                total_elapsed: 300,
            })
        );
        assert!(s.finish().is_err());
        assert!(s.tick().is_empty());
    }

    #[test]
    fn stop_does_not_complete_tasks() {
        let mut s = session(&[task("t1", TaskStatus::Pending)]);
        tick_n(&mut s, 30);
        s.stop().unwrap();
        assert_eq!(s.state(), FocusState::Stopped);
        assert!(!s.tasks()[0].is_completed);
        assert!(s.tick().is_empty());
        assert!(matches!(
            s.toggle_task("t1"),
            Err(CoreError::InvalidState(_))
        ));
        assert!(s.finish().is_err());
    }

    #[test]
    fn remove_task_unchunks_and_drops_it() {
        let mut s = session(&[
            task("t1", TaskStatus::Pending),
            task("t2", TaskStatus::Pending),
        ]);
        let effect = s.remove_task("t1").unwrap();
        assert_eq!(effect, FocusEffect::UnchunkTask { task_id: "t1".into() });
        assert_eq!(s.tasks().len(), 1);

        let effects = s.finish().unwrap();
        assert!(effects.iter().all(|e| !matches!(
            e,
            FocusEffect::SetTaskStatus { task_id, .. } if task_id == "t1"
        )));
    }

    #[test]
    fn unknown_task_is_not_found() {
        let mut s = session(&[]);
        assert!(matches!(
            s.toggle_task("nope"),
            Err(CoreError::NotFound { .. })
        ));
        assert!(matches!(
            s.remove_task("nope"),
            Err(CoreError::NotFound { .. })
        ));
    }

    #[test]
    fn snapshot_reports_progress() {
        let mut s = session(&[task("t1", TaskStatus::Pending)]);
        tick_n(&mut s, 7);
        let snap = s.snapshot();
        assert_eq!(snap.chunk_name, "Morning");
        assert_eq!(snap.elapsed, 7);
        assert_eq!(snap.remaining, 1193);
        assert_eq!(snap.state, FocusState::Running);
    }
}
