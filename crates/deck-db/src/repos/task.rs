//! Task repository: create, bulk create, list, partial update, delete.

use chrono::Utc;

use deck_core::entities::Task;
use deck_core::enums::{EntityType, Schedule, TaskStatus};
use deck_core::ids::PREFIX_TASK;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum, require_text};
use crate::service::DeckService;
use crate::updates::task::TaskUpdate;

pub(crate) const SELECT_COLS: &str = "id, title, description, schedule, status, chunk_id, \
     completed_at, created_at, updated_at";

pub(crate) fn row_to_task(row: &libsql::Row) -> Result<Task, DatabaseError> {
    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        schedule: parse_enum(&row.get::<String>(3)?)?,
        status: parse_enum(&row.get::<String>(4)?)?,
        chunk_id: get_opt_string(row, 5)?,
        completed_at: row.get::<Option<i64>>(6)?,
        created_at: parse_datetime(&row.get::<String>(7)?)?,
        updated_at: parse_datetime(&row.get::<String>(8)?)?,
    })
}

pub(crate) async fn collect_tasks(mut rows: libsql::Rows) -> Result<Vec<Task>, DatabaseError> {
    let mut tasks = Vec::new();
    while let Some(row) = rows.next().await? {
        tasks.push(row_to_task(&row)?);
    }
    Ok(tasks)
}

/// Input for [`DeckService::create_task`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub schedule: Schedule,
}

impl NewTask {
    #[must_use]
    pub fn new(title: impl Into<String>, schedule: Schedule) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            schedule,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

impl DeckService {
    /// Insert one pending, unchunked task.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Validation` if the title is blank.
    pub async fn create_task(&self, new: NewTask) -> Result<Task, DatabaseError> {
        let title = require_text("title", &new.title)?;
        let _guard = self.lock_writes().await;
        self.insert_task(&title, &new.description, new.schedule).await
    }

    /// Create one task per non-blank line of `text`, all with `schedule`.
    ///
    /// Runs in a single transaction: either every line becomes a task or none does.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Validation` if `text` has no non-blank line.
    pub async fn create_tasks_bulk(
        &self,
        text: &str,
        schedule: Schedule,
    ) -> Result<Vec<Task>, DatabaseError> {
        let titles: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if titles.is_empty() {
            return Err(DatabaseError::Validation(
                "text must contain at least one task title".into(),
            ));
        }

        let _guard = self.lock_writes().await;
        let tx = self.db().conn().transaction().await?;
        let mut tasks = Vec::with_capacity(titles.len());
        for title in titles {
            tasks.push(self.insert_task(title, "", schedule).await?);
        }
        tx.commit().await?;

        tracing::debug!(count = tasks.len(), %schedule, "bulk-created tasks");
        Ok(tasks)
    }

    async fn insert_task(
        &self,
        title: &str,
        description: &str,
        schedule: Schedule,
    ) -> Result<Task, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_TASK).await?;

        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO tasks ({SELECT_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, NULL, NULL, ?6, ?7)"
                ),
                libsql::params![
                    id.as_str(),
                    title,
                    description,
                    schedule.as_str(),
                    TaskStatus::Pending.as_str(),
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        Ok(Task {
            id,
            title: title.to_string(),
            description: description.to_string(),
            schedule,
            status: TaskStatus::Pending,
            chunk_id: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if no task has this id.
    pub async fn get_task(&self, id: &str) -> Result<Task, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM tasks WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::Task, id))?;
        row_to_task(&row)
    }

    /// Every pending task, oldest first. Chunked or not.
    pub async fn list_pending_tasks(&self) -> Result<Vec<Task>, DatabaseError> {
        let rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM tasks WHERE status = ?1 ORDER BY created_at, rowid"
                ),
                [TaskStatus::Pending.as_str()],
            )
            .await?;
        collect_tasks(rows).await
    }

    /// Tasks the board needs: every pending task plus every task still
    /// attached to an existing chunk (so completed chunks keep their history).
    pub async fn list_board_tasks(&self) -> Result<Vec<Task>, DatabaseError> {
        let rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM tasks
                     WHERE status = ?1 OR chunk_id IN (SELECT id FROM chunks)
                     ORDER BY created_at, rowid"
                ),
                [TaskStatus::Pending.as_str()],
            )
            .await?;
        collect_tasks(rows).await
    }

    /// Tasks currently pointing at `chunk_id`, oldest first.
    pub async fn list_tasks_for_chunk(&self, chunk_id: &str) -> Result<Vec<Task>, DatabaseError> {
        let rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM tasks WHERE chunk_id = ?1 ORDER BY created_at, rowid"
                ),
                [chunk_id],
            )
            .await?;
        collect_tasks(rows).await
    }

    /// Apply a partial update.
    ///
    /// Whenever the resulting status is `pending`, `completed_at` is cleared
    /// regardless of what the update carried.
    ///
    /// # Errors
    ///
    /// - `DatabaseError::Validation` for an empty update or a blank title.
    /// - `DatabaseError::NotFound` if the task, or the chunk named by
    ///   `chunk_id`, does not exist.
    pub async fn update_task(
        &self,
        task_id: &str,
        update: TaskUpdate,
    ) -> Result<Task, DatabaseError> {
        if update.is_empty() {
            return Err(DatabaseError::Validation(
                "No valid fields provided for update".into(),
            ));
        }
        let title = update
            .title
            .as_deref()
            .map(|t| require_text("title", t))
            .transpose()?;

        let _guard = self.lock_writes().await;
        let current = self.get_task(task_id).await?;
        if let Some(Some(chunk_id)) = &update.chunk_id {
            self.ensure_chunk_exists(chunk_id).await?;
        }

        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1usize;

        if let Some(title) = title {
            sets.push(format!("title = ?{idx}"));
            params.push(title.into());
            idx += 1;
        }
        if let Some(ref description) = update.description {
            sets.push(format!("description = ?{idx}"));
            params.push(description.clone().into());
            idx += 1;
        }
        if let Some(schedule) = update.schedule {
            sets.push(format!("schedule = ?{idx}"));
            params.push(schedule.as_str().into());
            idx += 1;
        }
        if let Some(status) = update.status {
            sets.push(format!("status = ?{idx}"));
            params.push(status.as_str().into());
            idx += 1;
        }
        if let Some(ref chunk_id) = update.chunk_id {
            sets.push(format!("chunk_id = ?{idx}"));
            params.push(chunk_id.clone().map_or(libsql::Value::Null, Into::into));
            idx += 1;
        }

        let effective_status = update.status.unwrap_or(current.status);
        let completed_at = if effective_status.is_completed() {
            update.completed_at
        } else {
            Some(None)
        };
        if let Some(completed_at) = completed_at {
            sets.push(format!("completed_at = ?{idx}"));
            params.push(completed_at.map_or(libsql::Value::Null, Into::into));
            idx += 1;
        }

        sets.push(format!("updated_at = ?{idx}"));
        params.push(Utc::now().to_rfc3339().into());
        idx += 1;

        params.push(task_id.into());
        let sql = format!("UPDATE tasks SET {} WHERE id = ?{idx}", sets.join(", "));
        self.db()
            .conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await?;

        self.get_task(task_id).await
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if no task has this id.
    pub async fn delete_task(&self, task_id: &str) -> Result<(), DatabaseError> {
        let _guard = self.lock_writes().await;
        let affected = self
            .db()
            .conn()
            .execute("DELETE FROM tasks WHERE id = ?1", [task_id])
            .await?;
        if affected == 0 {
            return Err(DatabaseError::not_found(EntityType::Task, task_id));
        }
        Ok(())
    }
}
