//! The listable capability and directory emulation over flat keys.

use crate::error::StoreResult;
use crate::types::{Key, ListDirResult};
use std::collections::BTreeSet;
use tracing::warn;

/// A store whose key set can be enumerated.
///
/// Implementors supply [`list`](Self::list). Prefix and directory listings are
/// derived from it by string matching, so they always reflect the backend
/// state at call time.
pub trait ListableStore: Send + Sync {
    /// Returns every key in the store.
    ///
    /// # Errors
    ///
    /// Returns any provider error.
    fn list(&self) -> StoreResult<BTreeSet<Key>>;

    /// Returns every key that starts with `prefix`.
    ///
    /// `prefix` is expected to end in `/`. Other prefixes are still matched as
    /// plain substrings, which is ambiguous (`"a"` matches `"ab/c"`), so a
    /// warning is logged.
    ///
    /// # Errors
    ///
    /// Returns any provider error.
    fn list_prefix(&self, prefix: &str) -> StoreResult<BTreeSet<Key>> {
        if !prefix.is_empty() && !prefix.ends_with('/') {
            warn!(
                prefix,
                "behaviour of list_prefix is undefined if the prefix does not end in '/'"
            );
        }

        Ok(self
            .list()?
            .into_iter()
            .filter(|key| key.starts_with(prefix))
            .collect())
    }

    /// Returns the immediate children of `prefix`.
    ///
    /// A key with exactly one path segment after the prefix is a child key;
    /// a key with more contributes its first segment as a child prefix.
    ///
    /// Both sets hold names relative to `prefix`, not full keys: keys
    /// `a/b` and `a/d/e` listed under `a/` give key `b` and prefix `d`.
    /// Prepend `prefix` to turn a child back into a key or a listing prefix.
    ///
    /// # Errors
    ///
    /// Returns any provider error.
    fn list_dir(&self, prefix: &str) -> StoreResult<ListDirResult> {
        let keys = if prefix.is_empty() {
            self.list()?
        } else {
            self.list_prefix(prefix)?
        };
        Ok(partition_children(prefix, keys.iter().map(String::as_str)))
    }
}

/// Splits `keys` into the immediate children of `prefix`.
///
/// Keys that do not start with `prefix` are ignored. Each remaining key lands
/// in exactly one of the two result sets.
pub fn partition_children<'a, I>(prefix: &str, keys: I) -> ListDirResult
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out = ListDirResult::default();
    for key in keys {
        let Some(tail) = key.strip_prefix(prefix) else {
            continue;
        };
        match tail.split_once('/') {
            Some((head, _)) => {
                out.prefixes.insert(head.to_string());
            }
            None => {
                out.keys.insert(tail.to_string());
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn partition_splits_keys_and_prefixes() {
        let result = partition_children("a/", ["a/b", "a/c", "a/d/e"]);
        assert_eq!(result.keys, set(&["b", "c"]));
        assert_eq!(result.prefixes, set(&["d"]));
    }

    #[test]
    fn partition_deduplicates_prefixes() {
        let result = partition_children("", ["x/1", "x/2", "x/y/3", "top"]);
        assert_eq!(result.keys, set(&["top"]));
        assert_eq!(result.prefixes, set(&["x"]));
    }

    #[test]
    fn partition_ignores_foreign_keys() {
        let result = partition_children("a/", ["b/c", "ab"]);
        assert!(result.is_empty());
    }
}
