//! Stores backed by an in-process associative container.

use crate::error::{StoreError, StoreResult};
use crate::store::{ListableStore, ReadableStore, StoreCapabilities, WriteableStore};
use crate::types::{Capabilities, Key, Value};
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::hash::BuildHasher;
use std::sync::Arc;

/// A read-only associative container of keys to values.
pub trait Mapping: Send + Sync {
    /// Returns the value stored under `key`.
    fn lookup(&self, key: &str) -> Option<&[u8]>;

    /// Returns every key.
    fn key_set(&self) -> BTreeSet<Key>;
}

/// An associative container that can be modified.
pub trait MutableMapping: Mapping {
    /// Stores `value` under `key`, replacing any previous value.
    fn insert_value(&mut self, key: Key, value: Value);

    /// Removes and returns the value stored under `key`.
    fn remove_value(&mut self, key: &str) -> Option<Value>;
}

impl<S> Mapping for HashMap<Key, Value, S>
where
    S: BuildHasher + Send + Sync,
{
    fn lookup(&self, key: &str) -> Option<&[u8]> {
        self.get(key).map(Vec::as_slice)
    }

    fn key_set(&self) -> BTreeSet<Key> {
        self.keys().cloned().collect()
    }
}

impl<S> MutableMapping for HashMap<Key, Value, S>
where
    S: BuildHasher + Send + Sync,
{
    fn insert_value(&mut self, key: Key, value: Value) {
        self.insert(key, value);
    }

    fn remove_value(&mut self, key: &str) -> Option<Value> {
        self.remove(key)
    }
}

impl Mapping for BTreeMap<Key, Value> {
    fn lookup(&self, key: &str) -> Option<&[u8]> {
        self.get(key).map(Vec::as_slice)
    }

    fn key_set(&self) -> BTreeSet<Key> {
        self.keys().cloned().collect()
    }
}

impl MutableMapping for BTreeMap<Key, Value> {
    fn insert_value(&mut self, key: Key, value: Value) {
        self.insert(key, value);
    }

    fn remove_value(&mut self, key: &str) -> Option<Value> {
        self.remove(key)
    }
}

/// A readable, listable store over a shared mapping.
///
/// Useful as a reference backend for tests and for wrapping data that is
/// already in memory.
///
/// # Thread Safety
///
/// The mapping sits behind a [`RwLock`] and may be shared with other holders
/// of the same [`Arc`]. Each store call takes the lock once.
///
/// # Example
///
/// ```rust
/// use chunkstore_storage::{ListableStore, MappingStore, ReadableStore};
/// use std::collections::BTreeMap;
///
/// let mut data = BTreeMap::new();
/// data.insert("zarr.json".to_string(), b"{}".to_vec());
///
/// let store = MappingStore::new(data);
/// assert_eq!(store.get("zarr.json").unwrap(), b"{}");
/// assert!(store.get("missing").unwrap_err().is_not_found());
/// assert_eq!(store.list().unwrap().len(), 1);
/// ```
#[derive(Debug)]
pub struct MappingStore<M> {
    mapping: Arc<RwLock<M>>,
}

impl<M> Clone for MappingStore<M> {
    fn clone(&self) -> Self {
        Self {
            mapping: Arc::clone(&self.mapping),
        }
    }
}

impl<M: Default> Default for MappingStore<M> {
    fn default() -> Self {
        Self::new(M::default())
    }
}

impl<M> MappingStore<M> {
    /// Wraps `mapping`.
    #[must_use]
    pub fn new(mapping: M) -> Self {
        Self::from_shared(Arc::new(RwLock::new(mapping)))
    }

    /// Wraps a mapping that other code also holds.
    #[must_use]
    pub fn from_shared(mapping: Arc<RwLock<M>>) -> Self {
        Self { mapping }
    }

    /// Returns the shared mapping.
    #[must_use]
    pub fn shared(&self) -> Arc<RwLock<M>> {
        Arc::clone(&self.mapping)
    }
}

impl<M: Mapping> ReadableStore for MappingStore<M> {
    fn get(&self, key: &str) -> StoreResult<Value> {
        self.mapping
            .read()
            .lookup(key)
            .map(<[u8]>::to_vec)
            .ok_or_else(|| StoreError::not_found(key))
    }
}

impl<M: Mapping> ListableStore for MappingStore<M> {
    fn list(&self) -> StoreResult<BTreeSet<Key>> {
        Ok(self.mapping.read().key_set())
    }
}

impl<M> StoreCapabilities for MappingStore<M> {
    fn capabilities(&self) -> Capabilities {
        Capabilities::READ_ONLY
    }
}

/// A [`MappingStore`] that can also be written to.
///
/// # Example
///
/// ```rust
/// use chunkstore_storage::{ListableStore, MutableMappingStore, ReadableStore, WriteableStore};
/// use std::collections::HashMap;
///
/// let store: MutableMappingStore<HashMap<String, Vec<u8>>> = MutableMappingStore::default();
/// store.set("x", b"1").unwrap();
/// assert_eq!(store.get("x").unwrap(), b"1");
/// assert!(store.list().unwrap().contains("x"));
/// ```
#[derive(Debug)]
pub struct MutableMappingStore<M> {
    inner: MappingStore<M>,
}

impl<M> Clone for MutableMappingStore<M> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<M: Default> Default for MutableMappingStore<M> {
    fn default() -> Self {
        Self::new(M::default())
    }
}

impl<M> MutableMappingStore<M> {
    /// Wraps `mapping`.
    #[must_use]
    pub fn new(mapping: M) -> Self {
        Self {
            inner: MappingStore::new(mapping),
        }
    }

    /// Wraps a mapping that other code also holds.
    #[must_use]
    pub fn from_shared(mapping: Arc<RwLock<M>>) -> Self {
        Self {
            inner: MappingStore::from_shared(mapping),
        }
    }

    /// Returns the shared mapping.
    #[must_use]
    pub fn shared(&self) -> Arc<RwLock<M>> {
        self.inner.shared()
    }

    /// Returns a read-only view over the same mapping.
    #[must_use]
    pub fn read_only(&self) -> MappingStore<M> {
        self.inner.clone()
    }
}

impl<M: Mapping> ReadableStore for MutableMappingStore<M> {
    fn get(&self, key: &str) -> StoreResult<Value> {
        self.inner.get(key)
    }
}

impl<M: Mapping> ListableStore for MutableMappingStore<M> {
    fn list(&self) -> StoreResult<BTreeSet<Key>> {
        self.inner.list()
    }
}

impl<M: MutableMapping> WriteableStore for MutableMappingStore<M> {
    fn set(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        self.inner
            .mapping
            .write()
            .insert_value(key.to_string(), value.to_vec());
        Ok(())
    }

    fn erase(&self, key: &str) -> StoreResult<()> {
        self.inner
            .mapping
            .write()
            .remove_value(key)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found(key))
    }

    fn as_readable(&self) -> Option<&dyn ReadableStore> {
        Some(self)
    }

    fn as_listable(&self) -> Option<&dyn ListableStore> {
        Some(self)
    }
}

impl<M> StoreCapabilities for MutableMappingStore<M> {
    fn capabilities(&self) -> Capabilities {
        Capabilities::ALL
    }
}
