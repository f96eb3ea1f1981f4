//! Database schema definitions for SqliteFS
//!
//! The `files` table is owned by an external writer. This crate only reads it;
//! [`FILES_SCHEMA`] documents the expected shape and is handy for writers and tests.

/// File type constants for the mode column (Unix `st_mode` encoding)
pub mod mode {
    pub const S_IFMT: u32 = 0o170000;   // File type mask
    pub const S_IFREG: u32 = 0o100000;  // Regular file
    pub const S_IFDIR: u32 = 0o040000;  // Directory
    pub const S_IFLNK: u32 = 0o120000;  // Symbolic link

    /// Permission bits, including setuid/setgid/sticky
    pub const PERM_MASK: u32 = 0o7777;
}

/// Expected layout of the entries table.
///
/// `name` is not declared unique: if several visible rows share a name the
/// lookup returns whichever one SQLite yields first. Writers that need a
/// deterministic answer should add a unique index on `name`.
pub const FILES_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS files (
    name TEXT NOT NULL,
    content BLOB,
    modified INTEGER,
    mode INTEGER,
    expired_at INTEGER
);
CREATE INDEX IF NOT EXISTS idx_files_name ON files(name);
"#;

/// Point lookup of one visible entry. Binds `name` then the current epoch seconds.
pub const LOOKUP_QUERY: &str = "SELECT content, modified, mode FROM files \
    WHERE name = ?1 AND (expired_at IS NULL OR expired_at > ?2) LIMIT 1";
