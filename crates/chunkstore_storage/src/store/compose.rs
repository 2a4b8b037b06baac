//! Operations composed from two capabilities.
//!
//! The functions here take the capabilities they need as trait bounds, so a
//! store lacking one is rejected at compile time. [`WriteableStore`] exposes
//! the same operations as methods with a runtime capability check.

use super::{ListableStore, ReadableStore, WriteableStore};
use crate::error::StoreResult;
use crate::types::{Key, Value};
use tracing::debug;

/// Overwrites part of existing values by read-modify-write.
///
/// See [`WriteableStore::set_partial_values`]. Not atomic.
///
/// # Errors
///
/// Returns `NotFound` if a key is missing, or any provider error.
pub fn set_partial_values<S>(store: &S, items: &[(Key, usize, Value)]) -> StoreResult<()>
where
    S: ReadableStore + WriteableStore + ?Sized,
{
    splice_each(store, store, items)
}

/// Erases every key under `prefix`.
///
/// See [`WriteableStore::erase_prefix`]. Not atomic.
///
/// # Errors
///
/// Returns the first erase failure, after all keys were attempted.
pub fn erase_prefix<S>(store: &S, prefix: &str) -> StoreResult<()>
where
    S: ListableStore + WriteableStore + ?Sized,
{
    erase_listed(store, store, prefix)
}

/// Replaces `fragment.len()` bytes of `original` at `start`.
///
/// `start` and the end of the replaced span are clamped to the length of
/// `original`, so a fragment past the end is appended.
#[must_use]
pub fn splice(original: &[u8], start: usize, fragment: &[u8]) -> Value {
    let head = start.min(original.len());
    let tail = start.saturating_add(fragment.len()).min(original.len());

    let mut out = Vec::with_capacity(head + fragment.len() + (original.len() - tail));
    out.extend_from_slice(&original[..head]);
    out.extend_from_slice(fragment);
    out.extend_from_slice(&original[tail..]);
    out
}

pub(crate) fn splice_each<R, W>(reader: &R, writer: &W, items: &[(Key, usize, Value)]) -> StoreResult<()>
where
    R: ReadableStore + ?Sized,
    W: WriteableStore + ?Sized,
{
    for (key, start, fragment) in items {
        debug!(key = %key, start, len = fragment.len(), "splicing partial value");
        let original = reader.get(key)?;
        writer.set(key, &splice(&original, *start, fragment))?;
    }
    Ok(())
}

pub(crate) fn erase_listed<L, W>(lister: &L, writer: &W, prefix: &str) -> StoreResult<()>
where
    L: ListableStore + ?Sized,
    W: WriteableStore + ?Sized,
{
    let keys: Vec<Key> = lister.list_prefix(prefix)?.into_iter().collect();
    debug!(prefix, count = keys.len(), "erasing prefix");
    writer.erase_values(&keys)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splice_inside() {
        assert_eq!(splice(b"0123456789", 3, b"XY"), b"012XY56789");
    }

    #[test]
    fn splice_at_start_and_end() {
        assert_eq!(splice(b"0123", 0, b"AB"), b"AB23");
        assert_eq!(splice(b"0123", 2, b"AB"), b"01AB");
    }

    #[test]
    fn splice_grows_past_end() {
        assert_eq!(splice(b"0123", 3, b"XYZ"), b"012XYZ");
        assert_eq!(splice(b"0123", 4, b"XY"), b"0123XY");
    }

    #[test]
    fn splice_start_beyond_end_appends() {
        assert_eq!(splice(b"01", 10, b"XY"), b"01XY");
    }

    #[test]
    fn splice_empty_fragment_is_identity() {
        assert_eq!(splice(b"0123", 2, b""), b"0123");
    }
}
