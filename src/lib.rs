//! # SqliteFS - Read-Only Virtual Filesystem over SQLite
//!
//! SqliteFS serves file-like entries (content, modification time, mode bits)
//! out of rows of an embedded SQLite database, so a host such as a static
//! file server can treat database rows as files on disk.
//!
//! ## Behavior
//!
//! - **Lazy connection**: the pool is opened on first use and reopened after
//!   any query failure; open failures are swallowed.
//! - **Expiry**: rows whose `expired_at` is in the past are invisible.
//! - **Fail closed**: `open` returns a file or "does not exist", nothing else.
//!
//! ## Example
//!
//! ```rust,ignore
//! use sqlitefs::{File, FileSystem, Lifecycle, SqliteFs};
//! use std::io::Read;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let fs = SqliteFs::sqlite("site.db");
//!     fs.provision().await?;
//!
//!     let mut file = fs.open("/index.html").await?;
//!     let mut body = Vec::new();
//!     file.read_to_end(&mut body)?;
//!     println!("{} bytes, mode {}", file.stat()?.size(), file.stat()?.mode());
//!
//!     fs.cleanup().await?;
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod config;
pub mod connection;
pub mod error;
pub mod file;
pub mod fs;
pub mod schema;

pub use backend::SqliteFs;
pub use config::SqliteFsConfig;
pub use connection::ConnectionManager;
pub use error::{Result, SqliteFsError};
pub use file::{FileInfo, FileMode, SqliteFile};
pub use fs::{File, FileSystem, Lifecycle};
