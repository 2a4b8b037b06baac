//! # ChunkStore Storage
//!
//! Key/value stores for chunked array data.
//!
//! This crate is the persistence layer underneath a chunked-array format.
//! Stores are **opaque byte stores** keyed by `/`-delimited paths - they do
//! not interpret the arrays, chunks or metadata documents they hold.
//!
//! ## Capabilities
//!
//! A backend implements any combination of three traits:
//!
//! - [`ReadableStore`] - `get`, plus derived `get_or` and `get_partial_values`
//! - [`ListableStore`] - `list`, plus derived `list_prefix` and `list_dir`
//! - [`WriteableStore`] - `set` and `erase`, plus derived `set_values`,
//!   `set_partial_values`, `erase_values` and `erase_prefix`
//!
//! Operations that need two capabilities are also available as free
//! functions in [`compose`], checked at compile time.
//!
//! ## Available Backends
//!
//! - [`MappingStore`] / [`MutableMappingStore`] - over an in-memory map
//! - [`FileSystemStore`] - one file per key on a [`FileSystem`] provider
//!
//! ## Example
//!
//! ```rust
//! use chunkstore_storage::{ListableStore, MutableMappingStore, ReadableStore, WriteableStore};
//! use std::collections::BTreeMap;
//!
//! let store: MutableMappingStore<BTreeMap<String, Vec<u8>>> = MutableMappingStore::default();
//! store.set("a/b", b"1").unwrap();
//! store.set("a/d/e", b"2").unwrap();
//!
//! let children = store.list_dir("a/").unwrap();
//! assert!(children.keys.contains("b"));
//! assert!(children.prefixes.contains("d"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
pub mod fs;
mod mapping;
mod options;
mod store;
mod types;

pub use error::{StoreError, StoreResult};
pub use fs::{
    url_to_fs, FileInfo, FileKind, FileSystem, FileSystemStore, LocalFileSystem, MemoryFileSystem,
};
pub use mapping::{Mapping, MappingStore, MutableMapping, MutableMappingStore};
pub use options::StorageOptions;
pub use store::{
    compose, partition_children, ListableStore, ReadableStore, Store, StoreCapabilities,
    WriteableStore,
};
pub use types::{ByteRange, Capabilities, Capability, Key, ListDirResult, Value};
