//! Configuration surface for SqliteFS

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Configuration for the SQLite-backed filesystem
///
/// Only the database location is configurable. An empty path is accepted
/// here and only discovered when the connection is first opened.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqliteFsConfig {
    /// Path to the SQLite database file
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub db_path: String,
}

impl SqliteFsConfig {
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    /// Parse the configuration from a JSON object such as `{"db_path": "files.db"}`.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json() {
        let config = SqliteFsConfig::from_json(r#"{"db_path": "/var/lib/site.db"}"#).unwrap();
        assert_eq!(config.db_path, "/var/lib/site.db");
    }

    #[test]
    fn test_missing_path_defaults_to_empty() {
        let config = SqliteFsConfig::from_json("{}").unwrap();
        assert!(config.db_path.is_empty());
        assert_eq!(serde_json::to_string(&config).unwrap(), "{}");
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(SqliteFsConfig::from_json("{\"db_path\": 3}").is_err());
    }
}
