//! Service layer owning the database handle.
//!
//! `DeckService` wraps `DeckDb` (raw database access) and an in-process write
//! lock. All repo methods are implemented as `impl DeckService` blocks under
//! `repos/` and in `reset.rs`.

use tokio::sync::{Mutex, MutexGuard};

use crate::DeckDb;
use crate::error::DatabaseError;

/// Serializes store mutations on top of a single libSQL connection.
///
/// Every mutation method follows this protocol:
/// 1. Acquire the write lock
/// 2. Begin a transaction when more than one statement is involved
/// 3. Execute SQL
/// 4. Commit, release the lock, then read back the result
///
/// The connection is shared, so a write issued while another command holds an
/// open transaction would otherwise land inside that transaction.
pub struct DeckService {
    db: DeckDb,
    write_lock: Mutex<()>,
}

impl DeckService {
    /// Open a local database and wrap it.
    ///
    /// # Arguments
    ///
    /// * `db_path` - Path to the libSQL database file, or `":memory:"` for tests.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or migrated.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = DeckDb::open_local(db_path).await?;
        Ok(Self::from_db(db))
    }

    /// Create from an existing `DeckDb`.
    #[must_use]
    pub fn from_db(db: DeckDb) -> Self {
        Self {
            db,
            write_lock: Mutex::new(()),
        }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &DeckDb {
        &self.db
    }

    /// Wait for exclusive write access. Held until the guard drops.
    pub(crate) async fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }
}
