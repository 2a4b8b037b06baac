//! The writeable capability.

use super::compose::{erase_listed, splice_each};
use super::{ListableStore, ReadableStore};
use crate::error::{StoreError, StoreResult};
use crate::types::{Capability, Key, Value};
use tracing::warn;

/// A store whose values can be stored and erased.
///
/// Implementors supply [`set`](Self::set) and [`erase`](Self::erase).
///
/// The composed operations [`set_partial_values`](Self::set_partial_values)
/// and [`erase_prefix`](Self::erase_prefix) also need a second capability.
/// Stores that have it expose it through [`as_readable`](Self::as_readable)
/// or [`as_listable`](Self::as_listable); otherwise those operations fail with
/// [`StoreError::Capability`]. The free functions in [`crate::compose`] offer
/// the same operations with the capability checked at compile time.
///
/// # Concurrency
///
/// Neither composed operation is atomic. `set_partial_values` is a read
/// followed by a write and loses updates made by another writer in between.
/// `erase_prefix` lists first and erases afterwards, so keys added under the
/// prefix meanwhile survive, and a failure part way leaves earlier keys
/// erased.
pub trait WriteableStore: Send + Sync {
    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// Any parent structure implied by the key is created.
    ///
    /// # Errors
    ///
    /// Returns any provider error.
    fn set(&self, key: &str, value: &[u8]) -> StoreResult<()>;

    /// Removes the value stored under `key`.
    ///
    /// Must succeed for an existing key. What happens for a missing key is up
    /// to the backend; both shipped backends report `NotFound`.
    ///
    /// # Errors
    ///
    /// Returns any provider error.
    fn erase(&self, key: &str) -> StoreResult<()>;

    /// Returns this store as a readable store, if it is one.
    fn as_readable(&self) -> Option<&dyn ReadableStore> {
        None
    }

    /// Returns this store as a listable store, if it is one.
    fn as_listable(&self) -> Option<&dyn ListableStore> {
        None
    }

    /// Stores several values in order.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first failure; earlier writes are kept.
    fn set_values(&self, items: &[(Key, Value)]) -> StoreResult<()> {
        for (key, value) in items {
            self.set(key, value)?;
        }
        Ok(())
    }

    /// Overwrites part of existing values.
    ///
    /// Each entry `(key, start, fragment)` replaces `fragment.len()` bytes of
    /// the value at `start`, growing the value when the fragment runs past its
    /// end. This is a read-modify-write per entry and is not atomic.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Capability`] if the store is not readable,
    /// `NotFound` if a key is missing, or any provider error.
    fn set_partial_values(&self, items: &[(Key, usize, Value)]) -> StoreResult<()> {
        let reader = self.as_readable().ok_or(StoreError::Capability {
            operation: "set_partial_values",
            required: Capability::Readable,
        })?;
        splice_each(reader, self, items)
    }

    /// Erases each of `keys` independently.
    ///
    /// Every key is attempted even if an earlier one fails, and nothing is
    /// rolled back.
    ///
    /// # Errors
    ///
    /// Returns the first failure after all keys were attempted.
    fn erase_values(&self, keys: &[Key]) -> StoreResult<()> {
        let mut first_error = None;
        for key in keys {
            if let Err(err) = self.erase(key) {
                warn!(key = %key, error = %err, "failed to erase key");
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Erases every key under `prefix`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Capability`] if the store is not listable, or the
    /// errors of [`erase_values`](Self::erase_values).
    fn erase_prefix(&self, prefix: &str) -> StoreResult<()> {
        let lister = self.as_listable().ok_or(StoreError::Capability {
            operation: "erase_prefix",
            required: Capability::Listable,
        })?;
        erase_listed(lister, self, prefix)
    }
}
