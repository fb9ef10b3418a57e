//! Chunk repository: create with task assignment, list with tasks, start,
//! partial update, delete with cascade-to-null.

use std::collections::HashMap;

use chrono::Utc;

use deck_core::entities::{Chunk, ChunkWithTasks, Task};
use deck_core::enums::{ChunkStatus, EntityType};
use deck_core::ids::PREFIX_CHUNK;

use crate::error::DatabaseError;
use crate::helpers::{
    get_opt_string, parse_datetime, parse_enum, parse_optional_datetime, placeholders,
    require_text,
};
use crate::repos::task::{self, collect_tasks};
use crate::service::DeckService;
use crate::updates::chunk::{ChunkUpdate, ChunkUpdateBuilder};

const SELECT_COLS: &str =
    "id, name, status, started_at, completed_at, total_elapsed, created_at, updated_at";

fn row_to_chunk(row: &libsql::Row) -> Result<Chunk, DatabaseError> {
    let started_at = get_opt_string(row, 3)?;
    let completed_at = get_opt_string(row, 4)?;
    Ok(Chunk {
        id: row.get(0)?,
        name: row.get(1)?,
        status: parse_enum(&row.get::<String>(2)?)?,
        started_at: parse_optional_datetime(started_at.as_deref())?,
        completed_at: parse_optional_datetime(completed_at.as_deref())?,
        total_elapsed: row.get(5)?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
        updated_at: parse_datetime(&row.get::<String>(7)?)?,
    })
}

impl DeckService {
    /// Create a pending chunk and move `task_ids` into it.
    ///
    /// A missing or blank `name` becomes `Chunk N`, where N counts the chunks
    /// created on the current UTC date, plus one. Ids that match no task are
    /// skipped.
    pub async fn create_chunk(
        &self,
        name: Option<&str>,
        task_ids: &[String],
    ) -> Result<ChunkWithTasks, DatabaseError> {
        let _guard = self.lock_writes().await;
        let now = Utc::now();
        let tx = self.db().conn().transaction().await?;

        let name = match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => name.to_string(),
            None => {
                let today = now.date_naive().format("%Y-%m-%d").to_string();
                let mut rows = self
                    .db()
                    .conn()
                    .query(
                        "SELECT COUNT(*) FROM chunks WHERE substr(created_at, 1, 10) = ?1",
                        [today],
                    )
                    .await?;
                let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
                format!("Chunk {}", row.get::<i64>(0)? + 1)
            }
        };

        let id = self.db().generate_id(PREFIX_CHUNK).await?;
        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO chunks ({SELECT_COLS})
                     VALUES (?1, ?2, ?3, NULL, NULL, 0, ?4, ?5)"
                ),
                libsql::params![
                    id.as_str(),
                    name.as_str(),
                    ChunkStatus::Pending.as_str(),
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        if !task_ids.is_empty() {
            let sql = format!(
                "UPDATE tasks SET chunk_id = ?1, updated_at = ?2 WHERE id IN ({})",
                placeholders(3, task_ids.len())
            );
            let mut params: Vec<libsql::Value> = vec![id.clone().into(), now.to_rfc3339().into()];
            params.extend(task_ids.iter().map(|t| libsql::Value::from(t.clone())));
            self.db()
                .conn()
                .execute(&sql, libsql::params_from_iter(params))
                .await?;
        }
        tx.commit().await?;

        tracing::info!(chunk_id = %id, %name, tasks = task_ids.len(), "chunk created");
        self.get_chunk_with_tasks(&id).await
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if no chunk has this id.
    pub async fn get_chunk(&self, id: &str) -> Result<Chunk, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM chunks WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::Chunk, id))?;
        row_to_chunk(&row)
    }

    pub async fn get_chunk_with_tasks(&self, id: &str) -> Result<ChunkWithTasks, DatabaseError> {
        let chunk = self.get_chunk(id).await?;
        let tasks = self.list_tasks_for_chunk(id).await?;
        Ok(ChunkWithTasks { chunk, tasks })
    }

    pub(crate) async fn ensure_chunk_exists(&self, id: &str) -> Result<(), DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query("SELECT 1 FROM chunks WHERE id = ?1", [id])
            .await?;
        match rows.next().await? {
            Some(_) => Ok(()),
            None => Err(DatabaseError::not_found(EntityType::Chunk, id)),
        }
    }

    /// Every chunk in creation order.
    pub async fn list_chunks(&self) -> Result<Vec<Chunk>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM chunks ORDER BY created_at, rowid"),
                (),
            )
            .await?;
        let mut chunks = Vec::new();
        while let Some(row) = rows.next().await? {
            chunks.push(row_to_chunk(&row)?);
        }
        Ok(chunks)
    }

    /// Every chunk with its tasks, using two queries in total.
    pub async fn list_chunks_with_tasks(&self) -> Result<Vec<ChunkWithTasks>, DatabaseError> {
        let chunks = self.list_chunks().await?;
        let rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {} FROM tasks WHERE chunk_id IS NOT NULL ORDER BY created_at, rowid",
                    task::SELECT_COLS
                ),
                (),
            )
            .await?;

        let mut by_chunk: HashMap<String, Vec<Task>> = HashMap::new();
        for task in collect_tasks(rows).await? {
            if let Some(chunk_id) = task.chunk_id.clone() {
                by_chunk.entry(chunk_id).or_default().push(task);
            }
        }

        Ok(chunks
            .into_iter()
            .map(|chunk| {
                let tasks = by_chunk.remove(&chunk.id).unwrap_or_default();
                ChunkWithTasks { chunk, tasks }
            })
            .collect())
    }

    /// Mark a chunk as started. Only the first start stamps `started_at`.
    ///
    /// # Errors
    ///
    /// - `DatabaseError::NotFound` if the chunk does not exist.
    /// - `DatabaseError::InvalidState` if the chunk is already completed.
    pub async fn start_chunk(&self, id: &str) -> Result<ChunkWithTasks, DatabaseError> {
        {
            let _guard = self.lock_writes().await;
            let chunk = self.get_chunk(id).await?;
            if chunk.status == ChunkStatus::Completed {
                return Err(DatabaseError::InvalidState(format!(
                    "chunk {id} is already completed"
                )));
            }
            let now = Utc::now().to_rfc3339();
            self.db()
                .conn()
                .execute(
                    "UPDATE chunks SET started_at = COALESCE(started_at, ?1), updated_at = ?1
                     WHERE id = ?2",
                    libsql::params![now, id],
                )
                .await?;
        }
        self.get_chunk_with_tasks(id).await
    }

    /// Apply a partial update.
    ///
    /// Moving to `completed` without an explicit `completed_at` stamps the
    /// current time unless one is already stored.
    ///
    /// # Errors
    ///
    /// - `DatabaseError::Validation` for an empty update, a blank name, or a
    ///   negative `total_elapsed`.
    /// - `DatabaseError::NotFound` if the chunk does not exist.
    /// - `DatabaseError::InvalidState` when reopening a completed chunk.
    pub async fn update_chunk(
        &self,
        chunk_id: &str,
        update: ChunkUpdate,
    ) -> Result<Chunk, DatabaseError> {
        if update.is_empty() {
            return Err(DatabaseError::Validation(
                "No valid fields provided for update".into(),
            ));
        }
        let name = update
            .name
            .as_deref()
            .map(|n| require_text("name", n))
            .transpose()?;
        if update.total_elapsed.is_some_and(|s| s < 0) {
            return Err(DatabaseError::Validation(
                "total_elapsed must not be negative".into(),
            ));
        }

        let _guard = self.lock_writes().await;
        let current = self.get_chunk(chunk_id).await?;
        if let Some(next) = update.status {
            if next != current.status && !current.status.can_transition_to(next) {
                return Err(DatabaseError::InvalidState(format!(
                    "Cannot transition chunk {chunk_id} from {} to {next}",
                    current.status
                )));
            }
        }

        let now = Utc::now();
        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1usize;

        if let Some(name) = name {
            sets.push(format!("name = ?{idx}"));
            params.push(name.into());
            idx += 1;
        }
        if let Some(status) = update.status {
            sets.push(format!("status = ?{idx}"));
            params.push(status.as_str().into());
            idx += 1;
        }

        let completing = update.status == Some(ChunkStatus::Completed)
            && current.completed_at.is_none()
            && update.completed_at.is_none();
        let completed_at = if completing {
            Some(Some(now))
        } else {
            update.completed_at
        };
        if let Some(completed_at) = completed_at {
            sets.push(format!("completed_at = ?{idx}"));
            params.push(completed_at.map_or(libsql::Value::Null, |t| t.to_rfc3339().into()));
            idx += 1;
        }
        if let Some(total_elapsed) = update.total_elapsed {
            sets.push(format!("total_elapsed = ?{idx}"));
            params.push(total_elapsed.into());
            idx += 1;
        }

        sets.push(format!("updated_at = ?{idx}"));
        params.push(now.to_rfc3339().into());
        idx += 1;

        params.push(chunk_id.into());
        let sql = format!("UPDATE chunks SET {} WHERE id = ?{idx}", sets.join(", "));
        self.db()
            .conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await?;

        self.get_chunk(chunk_id).await
    }

    /// Close a chunk after a focus session: `completed`, `completed_at = now`,
    /// and the session's elapsed seconds.
    pub async fn complete_chunk(
        &self,
        chunk_id: &str,
        total_elapsed: i64,
    ) -> Result<Chunk, DatabaseError> {
        let update = ChunkUpdateBuilder::new()
            .status(ChunkStatus::Completed)
            .completed_at(Some(Utc::now()))
            .total_elapsed(total_elapsed)
            .build();
        self.update_chunk(chunk_id, update).await
    }

    /// Unassign every task from the chunk, then delete it.
    ///
    /// Returns the number of tasks that were unassigned.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the chunk does not exist; nothing
    /// is changed in that case.
    pub async fn delete_chunk(&self, chunk_id: &str) -> Result<u64, DatabaseError> {
        let _guard = self.lock_writes().await;
        let tx = self.db().conn().transaction().await?;

        let unassigned = self
            .db()
            .conn()
            .execute(
                "UPDATE tasks SET chunk_id = NULL, updated_at = ?1 WHERE chunk_id = ?2",
                libsql::params![Utc::now().to_rfc3339(), chunk_id],
            )
            .await?;
        let deleted = self
            .db()
            .conn()
            .execute("DELETE FROM chunks WHERE id = ?1", [chunk_id])
            .await?;
        if deleted == 0 {
            tx.rollback().await?;
            return Err(DatabaseError::not_found(EntityType::Chunk, chunk_id));
        }
        tx.commit().await?;

        tracing::info!(%chunk_id, unassigned, "chunk deleted");
        Ok(unassigned)
    }
}
