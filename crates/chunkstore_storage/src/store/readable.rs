//! The readable capability.

use crate::error::StoreResult;
use crate::types::{ByteRange, Key, Value};

/// A store whose values can be fetched by key.
///
/// Implementors supply [`get`](Self::get); everything else is derived from it.
///
/// # Invariants
///
/// - A key that was never stored yields [`StoreError::NotFound`], never a
///   default value
/// - Values are returned byte-exact, with no transformation
///
/// [`StoreError::NotFound`]: crate::StoreError::NotFound
pub trait ReadableStore: Send + Sync {
    /// Fetches the full value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`](crate::StoreError::NotFound) if the key
    /// is absent, or any provider error.
    fn get(&self, key: &str) -> StoreResult<Value>;

    /// Fetches `key`, falling back to `default` if it is absent.
    ///
    /// A `None` default behaves exactly like [`get`](Self::get).
    ///
    /// # Errors
    ///
    /// Returns `NotFound` only when the key is absent and no default was
    /// given. Provider errors are never replaced by the default.
    fn get_or(&self, key: &str, default: Option<Value>) -> StoreResult<Value> {
        match self.get(key) {
            Err(err) if err.is_not_found() => default.ok_or(err),
            other => other,
        }
    }

    /// Returns `true` if a value is stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns any provider error other than `NotFound`.
    fn contains(&self, key: &str) -> StoreResult<bool> {
        match self.get(key) {
            Ok(_) => Ok(true),
            Err(err) if err.is_not_found() => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Reads a byte range from each of several keys.
    ///
    /// The output has one entry per input, in the same order. A missing key
    /// produces `None` rather than failing the batch.
    ///
    /// The default reads each value in full and slices it in memory. Backends
    /// with native range reads may override this, but must keep the
    /// per-element absence semantics.
    ///
    /// # Errors
    ///
    /// Returns the first provider error other than `NotFound`.
    fn get_partial_values(&self, key_ranges: &[(Key, ByteRange)]) -> StoreResult<Vec<Option<Value>>> {
        key_ranges
            .iter()
            .map(|(key, range)| match self.get(key) {
                Ok(value) => Ok(Some(range.slice(&value))),
                Err(err) if err.is_not_found() => Ok(None),
                Err(err) => Err(err),
            })
            .collect()
    }
}
