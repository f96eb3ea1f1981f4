//! In-memory file handles materialized from database rows

use crate::error::Result;
use crate::fs::File;
use crate::schema::mode::{PERM_MASK, S_IFDIR, S_IFLNK, S_IFMT, S_IFREG};
use chrono::{DateTime, Utc};
use std::fmt;
use std::io::{Cursor, Read};

/// Permission and type bits in the Unix `st_mode` encoding
///
/// The default value has no bits set: a regular file with no permissions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FileMode(u32);

impl FileMode {
    pub const fn new(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub fn file_type(self) -> u32 {
        self.0 & S_IFMT
    }

    pub fn permissions(self) -> u32 {
        self.0 & PERM_MASK
    }

    pub fn is_dir(self) -> bool {
        self.file_type() == S_IFDIR
    }

    pub fn is_symlink(self) -> bool {
        self.file_type() == S_IFLNK
    }

    /// Rows often store bare permissions, so no type bits also counts as regular.
    pub fn is_file(self) -> bool {
        matches!(self.file_type(), 0 | S_IFREG)
    }
}

impl From<u32> for FileMode {
    fn from(bits: u32) -> Self {
        Self(bits)
    }
}

impl fmt::Display for FileMode {
    /// `ls -l` style, e.g. `drwxr-xr-x`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_dir() {
            'd'
        } else if self.is_symlink() {
            'l'
        } else {
            '-'
        };
        let mut out = String::with_capacity(10);
        out.push(kind);
        for (i, c) in "rwxrwxrwx".chars().enumerate() {
            let bit = 1 << (8 - i);
            out.push(if self.0 & bit != 0 { c } else { '-' });
        }
        f.write_str(&out)
    }
}

/// Metadata snapshot taken when a file is materialized
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileInfo {
    path: String,
    size: u64,
    mod_time: Option<DateTime<Utc>>,
    mode: FileMode,
}

impl FileInfo {
    pub fn new(
        path: impl Into<String>,
        size: u64,
        mod_time: Option<DateTime<Utc>>,
        mode: FileMode,
    ) -> Self {
        Self {
            path: path.into(),
            size,
            mod_time,
            mode,
        }
    }

    /// Base name of the entry (the last `/`-separated segment of its path).
    pub fn name(&self) -> &str {
        let trimmed = self.path.trim_end_matches('/');
        if trimmed.is_empty() {
            return if self.path.is_empty() { "." } else { "/" };
        }
        trimmed.rsplit('/').next().unwrap_or(trimmed)
    }

    /// Full path the entry was opened with.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Modification time, `None` when the row did not record one.
    pub fn mod_time(&self) -> Option<DateTime<Utc>> {
        self.mod_time
    }

    pub fn mode(&self) -> FileMode {
        self.mode
    }

    pub fn is_dir(&self) -> bool {
        self.mode.is_dir()
    }
}

/// A read-only file whose content lives entirely in memory
///
/// Reads are forward-only. After [`File::close`] the handle reads as empty
/// and its metadata is cleared.
#[derive(Debug)]
pub struct SqliteFile {
    reader: Option<Cursor<Vec<u8>>>,
    info: FileInfo,
}

impl SqliteFile {
    /// Wrap `content`, recording its length as the file size.
    pub fn new(
        path: impl Into<String>,
        content: Vec<u8>,
        mod_time: Option<DateTime<Utc>>,
        mode: FileMode,
    ) -> Self {
        let info = FileInfo::new(path, content.len() as u64, mod_time, mode);
        Self {
            reader: Some(Cursor::new(content)),
            info,
        }
    }

    pub fn info(&self) -> &FileInfo {
        &self.info
    }

    pub fn is_closed(&self) -> bool {
        self.reader.is_none()
    }
}

impl Read for SqliteFile {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self.reader.as_mut() {
            Some(reader) => reader.read(buf),
            None => Ok(0),
        }
    }
}

impl File for SqliteFile {
    fn stat(&self) -> Result<FileInfo> {
        Ok(self.info.clone())
    }

    fn close(&mut self) -> Result<()> {
        self.reader = None;
        self.info = FileInfo::default();
        Ok(())
    }
}
