//! Local disk provider.

use super::provider::{is_missing, FileInfo, FileKind, FileSystem};
use crate::types::ByteRange;
use std::fs::{self, File};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;
use tracing::{trace, warn};
use walkdir::WalkDir;

/// A provider over the local filesystem using OS file APIs.
///
/// Paths are passed to the OS unchanged. Symbolic links are followed.
/// Listings skip dangling links and entries whose names are not valid UTF-8,
/// since neither can be read back through a string path.
///
/// # Durability
///
/// By default `write` leaves flushing to the OS. With
/// [`with_sync_on_write`](Self::with_sync_on_write) every write ends with
/// `File::sync_all()`.
///
/// # Example
///
/// ```no_run
/// use chunkstore_storage::{FileSystem, LocalFileSystem};
///
/// let fs = LocalFileSystem::new();
/// fs.mkdirs("/tmp/chunks/a").unwrap();
/// fs.write("/tmp/chunks/a/0", b"data").unwrap();
/// assert_eq!(fs.cat("/tmp/chunks/a/0").unwrap(), b"data");
/// ```
#[derive(Debug, Clone, Default)]
pub struct LocalFileSystem {
    sync_on_write: bool,
}

impl LocalFileSystem {
    /// Creates a provider that does not sync after writes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether every write is synced to durable storage.
    #[must_use]
    pub const fn with_sync_on_write(mut self, value: bool) -> Self {
        self.sync_on_write = value;
        self
    }

    fn file_info(name: String, metadata: &fs::Metadata) -> FileInfo {
        let (kind, size) = if metadata.is_dir() {
            (FileKind::Directory, 0)
        } else {
            (FileKind::File, metadata.len())
        };
        FileInfo { name, kind, size }
    }
}

impl FileSystem for LocalFileSystem {
    fn protocol(&self) -> &'static str {
        "file"
    }

    fn cat(&self, path: &str) -> io::Result<Vec<u8>> {
        trace!(path, "reading file");
        fs::read(path)
    }

    fn cat_range(&self, path: &str, start: usize, end: usize) -> io::Result<Vec<u8>> {
        trace!(path, start, end, "reading file range");
        let mut file = File::open(path)?;
        let metadata = file.metadata()?;
        if metadata.is_dir() {
            return Err(io::ErrorKind::IsADirectory.into());
        }

        let len = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
        let range = ByteRange::new(start, end).clamp(len);
        if range.is_empty() {
            return Ok(Vec::new());
        }

        file.seek(SeekFrom::Start(range.start as u64))?;
        let mut buffer = Vec::with_capacity(range.len());
        file.take(range.len() as u64).read_to_end(&mut buffer)?;
        Ok(buffer)
    }

    fn write(&self, path: &str, data: &[u8]) -> io::Result<()> {
        trace!(path, len = data.len(), "writing file");
        let mut file = File::create(path)?;
        file.write_all(data)?;
        if self.sync_on_write {
            file.sync_all()?;
        }
        Ok(())
    }

    fn mkdirs(&self, path: &str) -> io::Result<()> {
        if path.is_empty() {
            return Ok(());
        }
        fs::create_dir_all(path)
    }

    fn rm(&self, path: &str) -> io::Result<()> {
        trace!(path, "removing file");
        fs::remove_file(path)
    }

    fn info(&self, path: &str) -> io::Result<FileInfo> {
        let metadata = fs::metadata(path)?;
        Ok(Self::file_info(path.trim_end_matches('/').to_string(), &metadata))
    }

    fn ls(&self, path: &str) -> io::Result<Vec<FileInfo>> {
        let base = path.trim_end_matches('/');
        let mut out = Vec::new();
        for entry in fs::read_dir(if base.is_empty() { "/" } else { base })? {
            let entry = entry?;
            let Some(file_name) = entry.file_name().to_str().map(str::to_string) else {
                warn!(path = %entry.path().display(), "skipping entry with non UTF-8 name");
                continue;
            };
            // Follow links so a linked directory lists as a directory.
            let metadata = match fs::metadata(entry.path()) {
                Ok(metadata) => metadata,
                Err(err) if is_missing(&err) => {
                    warn!(path = %entry.path().display(), "skipping dangling link");
                    continue;
                }
                Err(err) => return Err(err),
            };
            out.push(Self::file_info(format!("{base}/{file_name}"), &metadata));
        }
        Ok(out)
    }

    fn find(&self, path: &str) -> io::Result<Vec<String>> {
        let base = path.trim_end_matches('/');
        let root = if base.is_empty() { "/" } else { base };

        match fs::metadata(root) {
            Err(err) if is_missing(&err) => return Ok(Vec::new()),
            Err(err) => return Err(err),
            Ok(metadata) if !metadata.is_dir() => return Ok(vec![base.to_string()]),
            Ok(_) => {}
        }

        let mut out = Vec::new();
        for entry in WalkDir::new(root).follow_links(true).min_depth(1) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if err.io_error().is_some_and(is_missing) => {
                    warn!(path = ?err.path(), "skipping dangling link");
                    continue;
                }
                Err(err) => return Err(err.into()),
            };
            if !entry.file_type().is_file() {
                continue;
            }
            match relative_path(entry.path(), Path::new(root))? {
                Some(relative) => out.push(format!("{base}/{relative}")),
                None => warn!(path = %entry.path().display(), "skipping file with non UTF-8 name"),
            }
        }
        Ok(out)
    }
}

/// Returns `path` relative to `root`, `/`-joined, or `None` if a component
/// is not valid UTF-8.
fn relative_path(path: &Path, root: &Path) -> io::Result<Option<String>> {
    let relative = path
        .strip_prefix(root)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
    Ok(relative
        .components()
        .map(|component| component.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()
        .map(|segments| segments.join("/")))
}
