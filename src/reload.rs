//! Modification-time tracking for hot reload.

use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// A source file path and the mtime of the bytes last read from or written to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceStamp {
    path: PathBuf,
    modified: Option<SystemTime>,
}

impl SourceStamp {
    /// Stamp `path` with its current mtime, if it can be read
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let modified = Self::read_mtime(&path).ok();
        Self { path, modified }
    }

    /// Stamp `path` with an mtime observed earlier
    pub fn with_modified(path: impl Into<PathBuf>, modified: Option<SystemTime>) -> Self {
        Self {
            path: path.into(),
            modified,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn modified(&self) -> Option<SystemTime> {
        self.modified
    }

    /// Current mtime of `path`
    pub fn read_mtime(path: &Path) -> io::Result<SystemTime> {
        std::fs::metadata(path)?.modified()
    }

    /// True when `observed` is strictly newer than the stamp.
    ///
    /// A stamp with no recorded mtime treats any observed mtime as newer.
    pub fn is_newer(&self, observed: SystemTime) -> bool {
        self.modified.is_none_or(|cached| observed > cached)
    }

    /// True when the file on disk has a strictly newer mtime.
    ///
    /// A file that cannot be stat'ed is never stale.
    pub fn is_stale(&self) -> bool {
        Self::read_mtime(&self.path).is_ok_and(|observed| self.is_newer(observed))
    }

    /// Re-read the mtime from disk
    pub fn refresh(&mut self) {
        self.modified = Self::read_mtime(&self.path).ok();
    }

    pub fn set_modified(&mut self, modified: SystemTime) {
        self.modified = Some(modified);
    }
}
