//! Error types for SqliteFS

use thiserror::Error;

/// Result type for SqliteFS operations
pub type Result<T> = std::result::Result<T, SqliteFsError>;

/// SqliteFS error types
///
/// Only [`SqliteFsError::NotFound`] ever leaves [`crate::SqliteFs::open`];
/// the remaining variants are produced internally and collapsed into it.
#[derive(Error, Debug)]
pub enum SqliteFsError {
    #[error("file does not exist: {0}")]
    NotFound(String),

    #[error("db_path is not set")]
    NotConfigured,

    #[error("SQLx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Malformed row: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SqliteFsError {
    /// True for the "does not exist" outcome.
    pub fn is_not_found(&self) -> bool {
        matches!(self, SqliteFsError::NotFound(_))
    }
}

impl From<SqliteFsError> for std::io::Error {
    fn from(err: SqliteFsError) -> Self {
        use std::io::ErrorKind;

        match err {
            SqliteFsError::NotFound(name) => {
                std::io::Error::new(ErrorKind::NotFound, format!("file does not exist: {name}"))
            }
            SqliteFsError::Config(msg) => std::io::Error::new(ErrorKind::InvalidInput, msg),
            SqliteFsError::Serialization(e) => std::io::Error::new(ErrorKind::InvalidData, e),
            SqliteFsError::Decode(msg) => std::io::Error::new(ErrorKind::InvalidData, msg),
            other => std::io::Error::other(other.to_string()),
        }
    }
}
