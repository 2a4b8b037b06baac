//! The filesystem provider trait.

use crate::types::ByteRange;
use std::fmt;
use std::io;

/// Whether a filesystem entry is a file or a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// A regular file.
    File,
    /// A directory.
    Directory,
}

/// Metadata for one filesystem entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    /// Full path of the entry, `/`-separated.
    pub name: String,
    /// File or directory.
    pub kind: FileKind,
    /// Size in bytes (0 for directories).
    pub size: u64,
}

impl FileInfo {
    /// Returns the last path segment of the entry.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }
}

/// A hierarchical filesystem reachable through `/`-separated string paths.
///
/// This is the seam for local disk, in-memory trees and remote object
/// stores. All calls are blocking.
///
/// # Errors
///
/// Failures are reported as [`io::Error`]. Providers must use
/// [`io::ErrorKind::NotFound`] for missing paths,
/// [`io::ErrorKind::IsADirectory`] when a file operation hits a directory and
/// [`io::ErrorKind::NotADirectory`] when a path goes through a file.
pub trait FileSystem: Send + Sync + fmt::Debug {
    /// The protocol name used in connection strings.
    fn protocol(&self) -> &'static str;

    /// Returns `path` in the form this provider reports paths in.
    ///
    /// The default returns `path` unchanged.
    fn canonical_path(&self, path: &str) -> String {
        path.to_string()
    }

    /// Reads the full contents of the file at `path`.
    fn cat(&self, path: &str) -> io::Result<Vec<u8>>;

    /// Reads bytes `start..end` of the file at `path`, clamped to its length.
    ///
    /// The default reads the whole file.
    fn cat_range(&self, path: &str, start: usize, end: usize) -> io::Result<Vec<u8>> {
        let data = self.cat(path)?;
        Ok(ByteRange::new(start, end).slice(&data))
    }

    /// Creates or truncates the file at `path` and writes `data` to it.
    ///
    /// The parent directory must exist.
    fn write(&self, path: &str, data: &[u8]) -> io::Result<()>;

    /// Creates the directory at `path` and all of its ancestors.
    ///
    /// Succeeds if the directory already exists.
    fn mkdirs(&self, path: &str) -> io::Result<()>;

    /// Removes the file at `path`.
    fn rm(&self, path: &str) -> io::Result<()>;

    /// Returns metadata for `path`.
    fn info(&self, path: &str) -> io::Result<FileInfo>;

    /// Lists the entries directly inside the directory at `path`.
    fn ls(&self, path: &str) -> io::Result<Vec<FileInfo>>;

    /// Lists every file below `path`, recursively, as full paths.
    ///
    /// Directories are not included. A missing `path` yields an empty list;
    /// a file `path` yields just itself.
    fn find(&self, path: &str) -> io::Result<Vec<String>>;

    /// Returns `true` if anything exists at `path`.
    fn exists(&self, path: &str) -> bool {
        self.info(path).is_ok()
    }
}

/// Returns the parent of a `/`-separated path.
///
/// The parent of a top-level path is `/`; a path with no separator has an
/// empty parent.
#[must_use]
pub fn parent(path: &str) -> &str {
    match path.trim_end_matches('/').rsplit_once('/') {
        Some(("", _)) => "/",
        Some((parent, _)) => parent,
        None => "",
    }
}

/// Returns `true` for the error kinds that mean "nothing usable at this path".
#[must_use]
pub fn is_missing(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::IsADirectory | io::ErrorKind::NotADirectory
    )
}
