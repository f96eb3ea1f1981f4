//! SQLite-backed read-only filesystem
//!
//! Every [`FileSystem::open`] issues one point lookup against the `files`
//! table and materializes the row into an in-memory [`SqliteFile`]. Callers
//! only ever see a file or [`SqliteFsError::NotFound`]; query and decode
//! failures are logged, invalidate the connection, and report not-found.

use crate::{
    config::SqliteFsConfig,
    connection::ConnectionManager,
    error::{Result, SqliteFsError},
    file::{FileMode, SqliteFile},
    fs::{FileSystem, Lifecycle},
    schema::LOOKUP_QUERY,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqlitePool, Row};
use tracing::{debug, info, warn};

/// Outcome of a single lookup
enum Lookup {
    Found(SqliteFile),
    NotFound,
}

/// Fetch and materialize the visible entry named `name`.
///
/// `Ok(Lookup::NotFound)` means no visible row; any `Err` is an
/// infrastructure or decode failure.
async fn lookup(pool: &SqlitePool, name: &str) -> Result<Lookup> {
    let now = Utc::now().timestamp();

    let row = sqlx::query(LOOKUP_QUERY)
        .bind(name)
        .bind(now)
        .fetch_optional(pool)
        .await?;

    let Some(row) = row else {
        return Ok(Lookup::NotFound);
    };

    let content: Option<Vec<u8>> = row.try_get(0)?;
    let modified: Option<i64> = row.try_get(1)?;
    // Decoded wide: SQLite hands back the low 32 bits for a narrow read.
    let mode: Option<i64> = row.try_get(2)?;

    let mode = match mode {
        Some(bits) => {
            let bits = i32::try_from(bits)
                .map_err(|_| SqliteFsError::Decode(format!("mode out of range: {bits}")))?;
            FileMode::new(bits as u32)
        }
        None => FileMode::default(),
    };

    Ok(Lookup::Found(SqliteFile::new(
        name,
        content.unwrap_or_default(),
        modified.map(mod_time_from_secs),
        mode,
    )))
}

/// Any epoch-seconds value is a valid `modified`; values past chrono's
/// range clamp to its bounds.
fn mod_time_from_secs(secs: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(secs, 0).unwrap_or(if secs < 0 {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    })
}

/// Virtual filesystem whose files are rows of an SQLite database
#[derive(Debug)]
pub struct SqliteFs {
    config: SqliteFsConfig,
    conn: ConnectionManager,
}

impl SqliteFs {
    /// Identifier a host registry can key this filesystem by
    pub const MODULE_ID: &'static str = "fs.sqlite";

    /// Create an unopened filesystem. Nothing touches the database until
    /// [`Lifecycle::provision`] or the first `open`.
    pub fn new(config: SqliteFsConfig) -> Self {
        let conn = ConnectionManager::new(config.db_path.clone());
        Self { config, conn }
    }

    /// Convenience constructor from a database path
    pub fn sqlite(db_path: impl Into<String>) -> Self {
        Self::new(SqliteFsConfig::new(db_path))
    }

    pub fn config(&self) -> &SqliteFsConfig {
        &self.config
    }

    pub fn connection(&self) -> &ConnectionManager {
        &self.conn
    }
}

#[async_trait]
impl FileSystem for SqliteFs {
    type File = SqliteFile;

    async fn open(&self, name: &str) -> Result<SqliteFile> {
        let Some(pool) = self.conn.ensure_open() else {
            return Err(SqliteFsError::NotFound(name.to_string()));
        };

        match lookup(&pool, name).await {
            Ok(Lookup::Found(file)) => {
                debug!(path = name, size = file.info().size(), "opened file");
                Ok(file)
            }
            Ok(Lookup::NotFound) => {
                debug!(path = name, "no visible entry");
                Err(SqliteFsError::NotFound(name.to_string()))
            }
            Err(e) => {
                warn!(
                    path = name,
                    db_path = %self.config.db_path,
                    error = %e,
                    "lookup failed, invalidating connection"
                );
                self.conn.invalidate();
                Err(SqliteFsError::NotFound(name.to_string()))
            }
        }
    }
}

#[async_trait]
impl Lifecycle for SqliteFs {
    /// Open the pool eagerly. Always succeeds; a bad configuration shows up
    /// as not-found on every `open`.
    async fn provision(&self) -> Result<()> {
        self.conn.ensure_open();
        info!(
            module = Self::MODULE_ID,
            db_path = %self.config.db_path,
            open = self.conn.is_open(),
            "provisioned sqlite filesystem"
        );
        Ok(())
    }

    async fn cleanup(&self) -> Result<()> {
        self.conn.cleanup().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::File;
    use crate::schema::FILES_SCHEMA;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use std::io::Read;

    #[test]
    fn test_mod_time_clamps_to_chrono_range() {
        assert_eq!(mod_time_from_secs(0).timestamp(), 0);
        assert_eq!(mod_time_from_secs(1_700_000_000).timestamp(), 1_700_000_000);
        assert_eq!(mod_time_from_secs(i64::MIN), DateTime::<Utc>::MIN_UTC);
        assert_eq!(mod_time_from_secs(i64::MAX), DateTime::<Utc>::MAX_UTC);
    }

    async fn writer(path: &std::path::Path) -> SqlitePool {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();
        for statement in FILES_SCHEMA.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            sqlx::query(statement).execute(&pool).await.unwrap();
        }
        pool
    }

    #[tokio::test]
    async fn test_sqlite_fs_operations() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("files.db");
        let db = writer(&path).await;

        sqlx::query("INSERT INTO files (name, content, modified, mode) VALUES (?1, ?2, ?3, ?4)")
            .bind("/index.html")
            .bind(b"<h1>hi</h1>".to_vec())
            .bind(1_700_000_000i64)
            .bind(0o644i32)
            .execute(&db)
            .await
            .unwrap();

        let fs = SqliteFs::sqlite(path.to_string_lossy());
        fs.validate().unwrap();
        fs.provision().await.unwrap();

        // Test open/read
        let mut file = fs.open("/index.html").await.unwrap();
        let mut body = String::new();
        file.read_to_string(&mut body).unwrap();
        assert_eq!(body, "<h1>hi</h1>");
        assert_eq!(file.stat().unwrap().name(), "index.html");

        // Test not found
        let err = fs.open("/missing.html").await.unwrap_err();
        assert!(err.is_not_found());
        assert!(fs.connection().is_open());

        fs.cleanup().await.unwrap();
        assert!(!fs.connection().is_open());
    }

    #[tokio::test]
    async fn test_unconfigured_fs_reports_not_found() {
        let fs = SqliteFs::new(SqliteFsConfig::default());
        fs.provision().await.unwrap();

        let err = fs.open("/index.html").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(fs.connection().generation(), 0);
    }
}
