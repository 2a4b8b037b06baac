//! Store over a filesystem provider.

use super::provider::{is_missing, parent, FileKind, FileSystem};
use super::resolve::url_to_fs;
use crate::error::{StoreError, StoreResult};
use crate::options::StorageOptions;
use crate::store::{ListableStore, ReadableStore, StoreCapabilities, WriteableStore};
use crate::types::{ByteRange, Capabilities, Key, ListDirResult, Value};
use std::collections::BTreeSet;
use std::fmt;
use std::io;
use std::sync::Arc;
use tracing::debug;

/// A readable, listable, writeable store that keeps one file per key.
///
/// The key `a/b/c` lives at `<root>/a/b/c`. Directories are created on
/// demand and mirror the `/` segments of the key; no other files are written.
///
/// Directory listings come straight from the provider, so an empty directory
/// left behind by [`erase`](WriteableStore::erase) still shows up as a child
/// prefix in [`list_dir`](ListableStore::list_dir).
///
/// Keys that cannot name a file under the root (empty, absolute, ending in
/// `/`, or holding empty, `.` or `..` segments) are rejected by `set` and
/// `erase` with [`StoreError::InvalidKey`]. Reads treat them as absent.
///
/// # Example
///
/// ```no_run
/// use chunkstore_storage::{FileSystemStore, ReadableStore, StorageOptions, WriteableStore};
///
/// let store = FileSystemStore::open("/tmp/data.zarr", StorageOptions::new().auto_mkdir(true)).unwrap();
/// store.set("arr/c/0/0", b"chunk").unwrap();
/// assert_eq!(store.get("arr/c/0/0").unwrap(), b"chunk");
/// ```
#[derive(Debug, Clone)]
pub struct FileSystemStore {
    fs: Arc<dyn FileSystem>,
    root: String,
}

impl FileSystemStore {
    /// Opens a store from a connection string.
    ///
    /// See [`url_to_fs`] for the accepted forms.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection string cannot be resolved or, with
    /// `auto_mkdir`, the root directory cannot be created.
    pub fn open(url: &str, options: StorageOptions) -> StoreResult<Self> {
        let (fs, root) = url_to_fs(url, &options)?;
        let store = Self::with_filesystem(fs, root);
        if options.auto_mkdir {
            store.fs.mkdirs(store.root_dir())?;
        }
        debug!(store = %store, "opened filesystem store");
        Ok(store)
    }

    /// Creates a store over an existing provider, rooted at `root`.
    #[must_use]
    pub fn with_filesystem(fs: Arc<dyn FileSystem>, root: impl AsRef<str>) -> Self {
        let root = fs
            .canonical_path(root.as_ref())
            .trim_end_matches('/')
            .to_string();
        Self { fs, root }
    }

    /// Returns the root path, without a trailing `/`.
    #[must_use]
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Returns the provider.
    #[must_use]
    pub fn filesystem(&self) -> &Arc<dyn FileSystem> {
        &self.fs
    }

    fn root_dir(&self) -> &str {
        if self.root.is_empty() {
            "/"
        } else {
            &self.root
        }
    }

    fn key_path(&self, key: &str) -> StoreResult<String> {
        validate_key(key)?;
        Ok(format!("{}/{}", self.root, key))
    }

    fn prefix_path(&self, prefix: &str) -> String {
        format!("{}/{}", self.root, prefix)
    }

    /// Turns a provider path under the root back into a key.
    fn strip_root<'a>(&self, path: &'a str) -> Option<&'a str> {
        path.strip_prefix(self.root.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
    }
}

impl fmt::Display for FileSystemStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.fs.protocol(), self.root)
    }
}

/// Rejects keys that cannot name a file under the root.
fn validate_key(key: &str) -> StoreResult<()> {
    let reason = if key.is_empty() {
        "key is empty"
    } else if key.starts_with('/') {
        "key must not start with '/'"
    } else if key.ends_with('/') {
        "key ends with '/' and names a prefix"
    } else if key.split('/').any(|s| s.is_empty() || s == "." || s == "..") {
        "key contains an empty or relative segment"
    } else {
        return Ok(());
    };
    Err(StoreError::InvalidKey {
        key: key.to_string(),
        reason,
    })
}

fn require_dir_prefix(prefix: &str) -> StoreResult<()> {
    if prefix.ends_with('/') {
        Ok(())
    } else {
        Err(StoreError::InvalidPrefix {
            prefix: prefix.to_string(),
        })
    }
}

/// Maps "nothing usable at this path" to `NotFound`; other errors pass through.
fn normalize_missing(err: io::Error, key: &str) -> StoreError {
    if is_missing(&err) {
        StoreError::not_found(key)
    } else {
        StoreError::Io(err)
    }
}

impl ReadableStore for FileSystemStore {
    fn get(&self, key: &str) -> StoreResult<Value> {
        // A key that cannot name a file was never stored.
        let Ok(path) = self.key_path(key) else {
            return Err(StoreError::not_found(key));
        };
        self.fs.cat(&path).map_err(|err| normalize_missing(err, key))
    }

    fn get_partial_values(&self, key_ranges: &[(Key, ByteRange)]) -> StoreResult<Vec<Option<Value>>> {
        let mut out = Vec::with_capacity(key_ranges.len());
        for (key, range) in key_ranges {
            let Ok(path) = self.key_path(key) else {
                out.push(None);
                continue;
            };
            match self.fs.cat_range(&path, range.start, range.end) {
                Ok(value) => out.push(Some(value)),
                Err(err) if is_missing(&err) => out.push(None),
                Err(err) => return Err(err.into()),
            }
        }
        Ok(out)
    }
}

impl WriteableStore for FileSystemStore {
    fn set(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        let path = self.key_path(key)?;
        self.fs.mkdirs(parent(&path))?;
        self.fs.write(&path, value)?;
        Ok(())
    }

    fn erase(&self, key: &str) -> StoreResult<()> {
        let path = self.key_path(key)?;
        self.fs.rm(&path).map_err(|err| normalize_missing(err, key))
    }

    fn as_readable(&self) -> Option<&dyn ReadableStore> {
        Some(self)
    }

    fn as_listable(&self) -> Option<&dyn ListableStore> {
        Some(self)
    }
}

impl ListableStore for FileSystemStore {
    fn list(&self) -> StoreResult<BTreeSet<Key>> {
        Ok(self
            .fs
            .find(self.root_dir())?
            .iter()
            .filter_map(|path| self.strip_root(path))
            .map(str::to_string)
            .collect())
    }

    fn list_prefix(&self, prefix: &str) -> StoreResult<BTreeSet<Key>> {
        require_dir_prefix(prefix)?;
        let found = match self.fs.find(&self.prefix_path(prefix)) {
            Ok(found) => found,
            Err(err) if is_missing(&err) => return Ok(BTreeSet::new()),
            Err(err) => return Err(err.into()),
        };
        Ok(found
            .iter()
            .filter_map(|path| self.strip_root(path))
            .filter(|key| key.starts_with(prefix))
            .map(str::to_string)
            .collect())
    }

    fn list_dir(&self, prefix: &str) -> StoreResult<ListDirResult> {
        if !prefix.is_empty() {
            require_dir_prefix(prefix)?;
        }

        let path = self.prefix_path(prefix);
        let entries = match self.fs.ls(&path) {
            Ok(entries) => entries,
            Err(err) if is_missing(&err) => return Ok(ListDirResult::default()),
            Err(err) => return Err(err.into()),
        };

        let mut out = ListDirResult::default();
        for entry in &entries {
            let name = entry.file_name().to_string();
            match entry.kind {
                FileKind::File => out.keys.insert(name),
                FileKind::Directory => out.prefixes.insert(name),
            };
        }
        Ok(out)
    }
}

impl StoreCapabilities for FileSystemStore {
    fn capabilities(&self) -> Capabilities {
        Capabilities::ALL
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFileSystem;
    use tempfile::tempdir;

    fn keys(items: &[&str]) -> BTreeSet<Key> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn memory_store() -> FileSystemStore {
        FileSystemStore::with_filesystem(Arc::new(MemoryFileSystem::new()), "/data")
    }

    #[test]
    fn open_local_with_auto_mkdir() {
        let dir = tempdir().unwrap();
        let url = format!("{}/nested/root", dir.path().display());

        let store = FileSystemStore::open(&url, StorageOptions::new().auto_mkdir(true)).unwrap();
        assert!(dir.path().join("nested/root").is_dir());
        assert_eq!(store.to_string(), format!("file://{url}"));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn set_writes_one_file_per_key() {
        let dir = tempdir().unwrap();
        let store = FileSystemStore::open(&dir.path().to_string_lossy(), StorageOptions::new()).unwrap();

        store.set("arr/c/0/1", b"chunk").unwrap();
        let on_disk = std::fs::read(dir.path().join("arr/c/0/1")).unwrap();
        assert_eq!(on_disk, b"chunk");
    }

    #[test]
    fn get_missing_and_directory_are_not_found() {
        let store = memory_store();
        store.set("a/b", b"x").unwrap();

        assert!(store.get("nope").unwrap_err().is_not_found());
        assert!(store.get("a").unwrap_err().is_not_found());
        assert!(store.get("a/b/c").unwrap_err().is_not_found());
    }

    #[test]
    fn invalid_keys_are_rejected() {
        let store = memory_store();
        for key in ["", "/abs", "dir/", "a//b", "../escape", "a/./b"] {
            let err = store.set(key, b"x").unwrap_err();
            assert!(matches!(err, StoreError::InvalidKey { .. }), "{key:?}");
            let err = store.erase(key).unwrap_err();
            assert!(matches!(err, StoreError::InvalidKey { .. }), "{key:?}");
        }
    }

    #[test]
    fn invalid_keys_read_as_absent() {
        let store = memory_store();
        store.set("x", b"0123").unwrap();

        for key in ["", "dir/", "a//b", "../escape"] {
            assert!(store.get(key).unwrap_err().is_not_found(), "{key:?}");
            assert_eq!(store.get_or(key, Some(b"D".to_vec())).unwrap(), b"D");
        }

        let out = store
            .get_partial_values(&[
                ("x".to_string(), ByteRange::new(1, 3)),
                ("dir/".to_string(), ByteRange::new(0, 1)),
                ("a//b".to_string(), ByteRange::new(0, 1)),
            ])
            .unwrap();
        assert_eq!(out, vec![Some(b"12".to_vec()), None, None]);
    }

    #[test]
    fn erase_missing_is_not_found() {
        let store = memory_store();
        assert!(store.erase("nope").unwrap_err().is_not_found());
    }

    #[test]
    fn list_strips_root() {
        let store = memory_store();
        store.set("a/b", b"").unwrap();
        store.set("top", b"").unwrap();
        assert_eq!(store.list().unwrap(), keys(&["a/b", "top"]));
    }

    #[test]
    fn list_prefix_returns_full_keys() {
        let store = memory_store();
        for key in ["a/1", "a/2/x", "ab/1", "b/1"] {
            store.set(key, b"").unwrap();
        }
        assert_eq!(store.list_prefix("a/").unwrap(), keys(&["a/1", "a/2/x"]));
        assert!(store.list_prefix("zzz/").unwrap().is_empty());
        assert!(store.list_prefix("b/1/").unwrap().is_empty());
    }

    #[test]
    fn list_prefix_requires_trailing_slash() {
        let store = memory_store();
        let err = store.list_prefix("a").unwrap_err();
        assert!(matches!(err, StoreError::InvalidPrefix { .. }));
    }

    #[test]
    fn list_dir_uses_entry_kinds() {
        let store = memory_store();
        for key in ["a/b", "a/c", "a/d/e"] {
            store.set(key, b"").unwrap();
        }

        let result = store.list_dir("a/").unwrap();
        assert_eq!(result.keys, keys(&["b", "c"]));
        assert_eq!(result.prefixes, keys(&["d"]));

        let root = store.list_dir("").unwrap();
        assert!(root.keys.is_empty());
        assert_eq!(root.prefixes, keys(&["a"]));

        assert!(store.list_dir("missing/").unwrap().is_empty());
        assert!(store.list_dir("a/b/").unwrap().is_empty());
    }

    #[test]
    fn partial_values_use_range_reads() {
        let store = memory_store();
        store.set("k", b"0123456789").unwrap();

        let out = store
            .get_partial_values(&[
                ("k".to_string(), ByteRange::new(3, 6)),
                ("gone".to_string(), ByteRange::new(0, 2)),
            ])
            .unwrap();
        assert_eq!(out, vec![Some(b"345".to_vec()), None]);
    }

    #[test]
    fn relative_memory_root_is_canonicalised() {
        let store = FileSystemStore::with_filesystem(Arc::new(MemoryFileSystem::new()), "data/");
        assert_eq!(store.root(), "/data");
        store.set("k", b"v").unwrap();
        assert_eq!(store.list().unwrap(), keys(&["k"]));
    }

    #[test]
    fn root_of_provider() {
        let store = FileSystemStore::with_filesystem(Arc::new(MemoryFileSystem::new()), "/");
        assert_eq!(store.root(), "");
        store.set("x", b"1").unwrap();
        assert_eq!(store.list().unwrap(), keys(&["x"]));
        assert_eq!(store.list_dir("").unwrap().keys, keys(&["x"]));
        assert_eq!(store.to_string(), "memory://");
    }

    #[cfg(unix)]
    #[test]
    fn local_listings_skip_dangling_links() {
        let dir = tempdir().unwrap();
        let store = FileSystemStore::open(&dir.path().to_string_lossy(), StorageOptions::new()).unwrap();
        store.set("a/b", b"1").unwrap();
        store.set("a/c", b"2").unwrap();
        std::os::unix::fs::symlink(dir.path().join("nowhere"), dir.path().join("a/dangling"))
            .unwrap();

        let result = store.list_dir("a/").unwrap();
        assert_eq!(result.keys, keys(&["b", "c"]));
        assert!(result.prefixes.is_empty());
        assert_eq!(store.list().unwrap(), keys(&["a/b", "a/c"]));
        assert_eq!(store.list_prefix("a/").unwrap(), keys(&["a/b", "a/c"]));
    }
}
