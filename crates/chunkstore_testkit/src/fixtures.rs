//! Test fixtures and store helpers.
//!
//! Provides fresh, empty stores for every shipped backend so the same test
//! can run against each of them.

use chunkstore_storage::{
    FileSystemStore, MemoryFileSystem, MutableMappingStore, StorageOptions, Store,
};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

/// The backends a [`TestStore`] can be built on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// [`MutableMappingStore`] over a `HashMap`.
    Mapping,
    /// [`FileSystemStore`] on a [`MemoryFileSystem`].
    MemoryFs,
    /// [`FileSystemStore`] on local disk, in a temporary directory.
    LocalFs,
}

impl Backend {
    /// Every backend.
    pub const ALL: [Backend; 3] = [Backend::Mapping, Backend::MemoryFs, Backend::LocalFs];
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Backend::Mapping => "mapping",
            Backend::MemoryFs => "memory-fs",
            Backend::LocalFs => "local-fs",
        })
    }
}

/// An empty store with automatic cleanup.
pub struct TestStore {
    /// The store instance.
    pub store: Box<dyn Store>,
    /// Which backend the store runs on.
    pub backend: Backend,
    /// The temporary directory (kept alive to prevent cleanup).
    _temp_dir: Option<TempDir>,
}

impl TestStore {
    /// Creates an empty store on `backend`.
    pub fn new(backend: Backend) -> Self {
        match backend {
            Backend::Mapping => Self::mapping(),
            Backend::MemoryFs => Self::memory_fs(),
            Backend::LocalFs => Self::local_fs(),
        }
    }

    /// Creates an empty mapping store.
    pub fn mapping() -> Self {
        let store: MutableMappingStore<HashMap<String, Vec<u8>>> = MutableMappingStore::default();
        Self {
            store: Box::new(store),
            backend: Backend::Mapping,
            _temp_dir: None,
        }
    }

    /// Creates an empty filesystem store on a fresh in-memory tree.
    pub fn memory_fs() -> Self {
        let store = FileSystemStore::with_filesystem(Arc::new(MemoryFileSystem::new()), "/root");
        Self {
            store: Box::new(store),
            backend: Backend::MemoryFs,
            _temp_dir: None,
        }
    }

    /// Creates an empty filesystem store in a temporary directory.
    pub fn local_fs() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let url = temp_dir.path().join("store").to_string_lossy().into_owned();
        let store = FileSystemStore::open(&url, StorageOptions::new().auto_mkdir(true))
            .expect("Failed to open local filesystem store");
        Self {
            store: Box::new(store),
            backend: Backend::LocalFs,
            _temp_dir: Some(temp_dir),
        }
    }

    /// Returns the temporary directory if disk-based, None otherwise.
    pub fn path(&self) -> Option<&Path> {
        self._temp_dir.as_ref().map(TempDir::path)
    }
}

impl std::ops::Deref for TestStore {
    type Target = dyn Store;

    fn deref(&self) -> &Self::Target {
        self.store.as_ref()
    }
}

/// Runs `f` once against a fresh empty store on every backend.
///
/// # Example
///
/// ```rust
/// use chunkstore_storage::{ReadableStore, WriteableStore};
/// use chunkstore_testkit::for_each_backend;
///
/// for_each_backend(|store, _backend| {
///     store.set("k", b"v").unwrap();
///     assert_eq!(store.get("k").unwrap(), b"v");
/// });
/// ```
pub fn for_each_backend<F>(mut f: F)
where
    F: FnMut(&dyn Store, Backend),
{
    for backend in Backend::ALL {
        let test_store = TestStore::new(backend);
        f(&*test_store, backend);
    }
}

/// Installs a `tracing` subscriber for tests, honouring `RUST_LOG`.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
