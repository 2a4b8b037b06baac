//! Model-checking harness.
//!
//! Mirrors every write into a plain `BTreeMap` and checks that the store
//! agrees with it.

use chunkstore_storage::{ListableStore, ReadableStore, Store, StoreResult, WriteableStore};
use std::collections::{BTreeMap, BTreeSet};

/// A store paired with the contents it is expected to hold.
pub struct ModelHarness<'a> {
    store: &'a dyn Store,
    model: BTreeMap<String, Vec<u8>>,
}

impl<'a> ModelHarness<'a> {
    /// Wraps an empty store.
    pub fn new(store: &'a dyn Store) -> Self {
        Self {
            store,
            model: BTreeMap::new(),
        }
    }

    /// Stores a value and records it in the model.
    pub fn set(&mut self, key: &str, value: &[u8]) -> StoreResult<()> {
        self.store.set(key, value)?;
        self.model.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    /// Erases a key and removes it from the model.
    pub fn erase(&mut self, key: &str) -> StoreResult<()> {
        self.store.erase(key)?;
        self.model.remove(key);
        Ok(())
    }

    /// Erases a prefix and removes its keys from the model.
    pub fn erase_prefix(&mut self, prefix: &str) -> StoreResult<()> {
        self.store.erase_prefix(prefix)?;
        self.model.retain(|key, _| !key.starts_with(prefix));
        Ok(())
    }

    /// Splices a fragment into a value in both the store and the model.
    pub fn set_partial(&mut self, key: &str, start: usize, fragment: &[u8]) -> StoreResult<()> {
        self.store
            .set_partial_values(&[(key.to_string(), start, fragment.to_vec())])?;
        if let Some(value) = self.model.get_mut(key) {
            *value = chunkstore_storage::compose::splice(value, start, fragment);
        }
        Ok(())
    }

    /// Asserts that the store holds exactly the modelled contents.
    pub fn verify_all(&self) {
        let listed = self.store.list().expect("Failed to list store");
        let expected: BTreeSet<String> = self.model.keys().cloned().collect();
        assert_eq!(listed, expected, "Key set mismatch");

        for (key, expected) in &self.model {
            let actual = self.store.get(key).expect("Failed to get value");
            assert_eq!(&actual, expected, "Value mismatch for {:?}", key);
        }
    }

    /// Returns the number of modelled keys.
    pub fn tracked_count(&self) -> usize {
        self.model.len()
    }
}
