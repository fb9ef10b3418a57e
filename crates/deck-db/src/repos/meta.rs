//! `app_meta` key/value repository.
//!
//! Holds small durable markers that must survive restarts, such as the date
//! of the last daily reset.

use crate::error::DatabaseError;
use crate::service::DeckService;

impl DeckService {
    /// Insert or overwrite `key`.
    pub async fn set_meta(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        let _guard = self.lock_writes().await;
        self.upsert_meta(key, value).await
    }

    /// Upsert without taking the write lock; callers must already hold it.
    pub(crate) async fn upsert_meta(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.db()
            .conn()
            .execute(
                "INSERT INTO app_meta (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
                 ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
                libsql::params![key, value],
            )
            .await?;
        Ok(())
    }

    pub async fn get_meta(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query("SELECT value FROM app_meta WHERE key = ?1", [key])
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row.get::<String>(0)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::helpers::test_service;

    #[tokio::test]
    async fn missing_key_is_none() {
        let svc = test_service().await;
        assert_eq!(svc.get_meta("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_meta_overwrites() {
        let svc = test_service().await;
        svc.set_meta("last_reset_date", "2026-10-18").await.unwrap();
        svc.set_meta("last_reset_date", "2026-10-19").await.unwrap();
        assert_eq!(
            svc.get_meta("last_reset_date").await.unwrap().as_deref(),
            Some("2026-10-19")
        );
    }
}
