//! Property-based test generators using proptest.
//!
//! Provides strategies for keys, values and key sets that every backend,
//! including the filesystem store, can hold.

use proptest::prelude::*;
use std::collections::BTreeSet;

/// Strategy for one key segment.
///
/// Segments never start with `.`, so `.` and `..` cannot occur.
pub fn key_segment_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z0-9_][a-z0-9_.-]{0,7}").expect("Invalid regex")
}

/// Strategy for a key of one to four segments.
pub fn key_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(key_segment_strategy(), 1..=4).prop_map(|segments| segments.join("/"))
}

/// Strategy for values (arbitrary bytes, possibly empty).
pub fn value_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..512)
}

/// Strategy for a value together with a valid range into it.
pub fn value_with_range_strategy() -> impl Strategy<Value = (Vec<u8>, usize, usize)> {
    value_strategy()
        .prop_flat_map(|value| {
            let len = value.len();
            (Just(value), 0..=len)
        })
        .prop_flat_map(|(value, start)| {
            let len = value.len();
            (Just(value), Just(start), start..=len)
        })
}

/// Strategy for a set of keys that can coexist on a filesystem.
///
/// No key is an ancestor directory of another (`a` and `a/b` cannot both be
/// files).
pub fn key_set_strategy() -> impl Strategy<Value = BTreeSet<String>> {
    prop::collection::btree_set(key_strategy(), 0..16)
        .prop_filter("No key may be a directory of another", |keys| {
            !keys
                .iter()
                .any(|a| keys.iter().any(|b| b.starts_with(&format!("{a}/"))))
        })
}
