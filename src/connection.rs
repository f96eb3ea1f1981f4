//! Lazily opened SQLite connection pool
//!
//! The manager is a two-state machine: either no pool is held (unopened) or
//! exactly one pool is held (open). Opening is idempotent and never fails
//! loudly; a failed open simply leaves the manager unopened so the next
//! caller retries. Query-time failures call [`ConnectionManager::invalidate`],
//! which drops back to unopened.

use crate::error::{Result, SqliteFsError};
use parking_lot::Mutex;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, warn};

/// Holds at most one pool ("handle generation") to the backing database
#[derive(Debug)]
pub struct ConnectionManager {
    db_path: String,
    pool: Mutex<Option<SqlitePool>>,
    generation: AtomicU64,
}

impl ConnectionManager {
    /// Create an unopened manager for the database at `db_path`.
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
            pool: Mutex::new(None),
            generation: AtomicU64::new(0),
        }
    }

    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    /// Return the held pool, opening a new one if none is held.
    ///
    /// Returns `None` when the open fails. The failure is logged and
    /// swallowed; the manager stays unopened and the next call retries.
    ///
    /// No I/O happens here: connections are established when the pool is
    /// first queried, so a missing or corrupt database surfaces at query time.
    pub fn ensure_open(&self) -> Option<SqlitePool> {
        let mut slot = self.pool.lock();
        if let Some(pool) = slot.as_ref() {
            return Some(pool.clone());
        }

        match self.open_pool() {
            Ok(pool) => {
                let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
                debug!(db_path = %self.db_path, generation, "opened sqlite pool");
                *slot = Some(pool.clone());
                Some(pool)
            }
            Err(e) => {
                warn!(db_path = %self.db_path, error = %e, "failed to open sqlite database");
                None
            }
        }
    }

    /// Drop the held pool so the next [`ensure_open`](Self::ensure_open) reopens.
    ///
    /// Lookups already holding a clone of the old pool finish against it.
    pub fn invalidate(&self) {
        if self.pool.lock().take().is_some() {
            debug!(
                db_path = %self.db_path,
                generation = self.generation(),
                "invalidated sqlite pool"
            );
        }
    }

    /// Close the held pool, if any, and return to the unopened state.
    pub async fn cleanup(&self) -> Result<()> {
        let pool = self.pool.lock().take();
        if let Some(pool) = pool {
            pool.close().await;
            info!(db_path = %self.db_path, "closed sqlite pool");
        }
        Ok(())
    }

    /// Whether a pool is currently held.
    pub fn is_open(&self) -> bool {
        self.pool.lock().is_some()
    }

    /// Number of successful opens so far. Unchanged while one pool stays in use.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn open_pool(&self) -> Result<SqlitePool> {
        if self.db_path.is_empty() {
            return Err(SqliteFsError::NotConfigured);
        }

        // The pool spawns its maintenance task on the current runtime.
        if tokio::runtime::Handle::try_current().is_err() {
            return Err(SqliteFsError::Config(
                "no tokio runtime available to drive the pool".to_string(),
            ));
        }

        let options = SqliteConnectOptions::new()
            .filename(&self.db_path)
            .journal_mode(SqliteJournalMode::Wal);

        Ok(SqlitePoolOptions::new().connect_lazy_with(options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ensure_open_is_idempotent() {
        let manager = ConnectionManager::new("site.db");
        assert!(!manager.is_open());
        assert_eq!(manager.generation(), 0);

        assert!(manager.ensure_open().is_some());
        assert!(manager.ensure_open().is_some());
        assert!(manager.is_open());
        assert_eq!(manager.generation(), 1);
    }

    #[tokio::test]
    async fn test_invalidate_starts_new_generation() {
        let manager = ConnectionManager::new("site.db");
        manager.ensure_open();
        manager.invalidate();
        assert!(!manager.is_open());

        // Invalidating an unopened manager is a no-op
        manager.invalidate();

        manager.ensure_open();
        assert!(manager.is_open());
        assert_eq!(manager.generation(), 2);
    }

    #[tokio::test]
    async fn test_empty_path_stays_unopened() {
        let manager = ConnectionManager::new("");
        assert!(manager.ensure_open().is_none());
        assert!(manager.ensure_open().is_none());
        assert!(!manager.is_open());
        assert_eq!(manager.generation(), 0);
    }

    #[test]
    fn test_open_without_runtime_is_swallowed() {
        let manager = ConnectionManager::new("site.db");
        assert!(manager.ensure_open().is_none());
        assert!(!manager.is_open());
    }

    #[tokio::test]
    async fn test_cleanup_returns_to_unopened() {
        let manager = ConnectionManager::new("site.db");
        manager.cleanup().await.unwrap();

        manager.ensure_open();
        manager.cleanup().await.unwrap();
        assert!(!manager.is_open());

        manager.ensure_open();
        assert_eq!(manager.generation(), 2);
    }
}
