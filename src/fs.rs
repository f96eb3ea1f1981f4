//! Filesystem capability traits
//!
//! A host that serves files only needs [`FileSystem`] and [`File`];
//! [`Lifecycle`] is how the host starts and stops a mounted filesystem.

use crate::error::Result;
use crate::file::FileInfo;
use async_trait::async_trait;
use std::io::Read;

/// Read-only filesystem: open a file by path
#[async_trait]
pub trait FileSystem: Send + Sync {
    type File: File;

    /// Open the file at `name`. Paths are used exactly as given.
    async fn open(&self, name: &str) -> Result<Self::File>;
}

/// An opened file: a forward-only byte stream plus a metadata snapshot
pub trait File: Read + Send {
    /// Metadata captured when the file was opened
    fn stat(&self) -> Result<FileInfo>;

    /// Release the file's resources. Safe to call more than once.
    fn close(&mut self) -> Result<()>;
}

/// Start/stop hooks a host calls around a filesystem's lifetime
#[async_trait]
pub trait Lifecycle: Send + Sync {
    /// Prepare for use. Called once before the first `open`.
    async fn provision(&self) -> Result<()>;

    /// Check configuration sanity.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Release resources at shutdown.
    async fn cleanup(&self) -> Result<()>;
}
