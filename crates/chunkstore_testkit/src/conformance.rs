//! Backend conformance checks.
//!
//! Every backend must give the same answers to the same sequence of calls.
//! Each check uses its own key namespace, so all of them can run against one
//! store; [`check_store`] does exactly that.

use chunkstore_storage::{ByteRange, ListableStore, ReadableStore, Store, WriteableStore};
use std::collections::BTreeSet;

fn key_set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Runs every conformance check against an empty store.
pub fn check_store(store: &dyn Store) {
    check_missing_keys(store);
    check_write_then_read(store);
    check_overwrite(store);
    check_partial_reads(store);
    check_erase(store);
    check_list_tracks_writes(store);
    check_list_dir_partition(store);
    check_set_partial_values(store);
    check_erase_prefix(store);
}

/// A key never set is absent; a default is returned only when given.
///
/// This holds for key shapes a backend would refuse to store, too.
pub fn check_missing_keys(store: &dyn Store) {
    let err = store.get("missing/key").unwrap_err();
    assert!(err.is_not_found(), "expected NotFound, got {err}");

    let value = store
        .get_or("missing/key", Some(b"default".to_vec()))
        .expect("get_or with default");
    assert_eq!(value, b"default");

    assert!(!store.contains("missing/key").expect("contains"));

    // Keys some backends cannot store are still just absent on read.
    for key in ["", "dir/", "a//b"] {
        let err = store.get(key).unwrap_err();
        assert!(err.is_not_found(), "expected NotFound for {key:?}, got {err}");
        let value = store
            .get_or(key, Some(b"D".to_vec()))
            .expect("get_or with default");
        assert_eq!(value, b"D", "default for {key:?}");
    }
    let out = store
        .get_partial_values(&[
            ("missing/key".to_string(), ByteRange::new(0, 1)),
            ("dir/".to_string(), ByteRange::new(0, 1)),
            ("a//b".to_string(), ByteRange::new(0, 1)),
        ])
        .expect("get_partial_values");
    assert_eq!(out, vec![None, None, None]);
}

/// Values come back byte-exact, including empty and non-UTF-8 values.
pub fn check_write_then_read(store: &dyn Store) {
    let binary: Vec<u8> = (0..=255).collect();
    for (key, value) in [
        ("rw/empty", Vec::new()),
        ("rw/text", b"hello".to_vec()),
        ("rw/binary", binary),
    ] {
        store.set(key, &value).expect("set");
        assert_eq!(store.get(key).expect("get"), value, "round trip for {key}");
    }
}

/// A second `set` replaces the whole value.
pub fn check_overwrite(store: &dyn Store) {
    store.set("ow/k", b"a much longer first value").expect("set");
    store.set("ow/k", b"short").expect("set");
    assert_eq!(store.get("ow/k").expect("get"), b"short");
}

/// Range reads slice the value, clamped to its length, and mark missing
/// keys as `None`.
pub fn check_partial_reads(store: &dyn Store) {
    store.set("pr/k", b"0123456789").expect("set");

    let out = store
        .get_partial_values(&[
            ("pr/k".to_string(), ByteRange::new(0, 10)),
            ("pr/missing".to_string(), ByteRange::new(0, 4)),
            ("pr/k".to_string(), ByteRange::new(3, 7)),
            ("pr/k".to_string(), ByteRange::new(5, 5)),
            ("pr/k".to_string(), ByteRange::new(8, 100)),
            ("pr/k".to_string(), ByteRange::new(2, usize::MAX)),
            ("pr/k".to_string(), ByteRange::new(20, 30)),
        ])
        .expect("get_partial_values");

    assert_eq!(
        out,
        vec![
            Some(b"0123456789".to_vec()),
            None,
            Some(b"3456".to_vec()),
            Some(Vec::new()),
            Some(b"89".to_vec()),
            Some(b"23456789".to_vec()),
            Some(Vec::new()),
        ]
    );
}

/// An erased key reads as missing.
pub fn check_erase(store: &dyn Store) {
    store.set("er/k", b"v").expect("set");
    store.erase("er/k").expect("erase");
    assert!(store.get("er/k").unwrap_err().is_not_found());
}

/// `list` contains a key after `set` and not after `erase`.
pub fn check_list_tracks_writes(store: &dyn Store) {
    store.set("ls/k", b"v").expect("set");
    assert!(store.list().expect("list").contains("ls/k"));

    store.erase("ls/k").expect("erase");
    assert!(!store.list().expect("list").contains("ls/k"));
}

/// Directory listing splits children into keys and prefixes.
pub fn check_list_dir_partition(store: &dyn Store) {
    for key in ["ld/a/b", "ld/a/c", "ld/a/d/e", "ld/a/d/f/g"] {
        store.set(key, b"").expect("set");
    }

    let result = store.list_dir("ld/a/").expect("list_dir");
    assert_eq!(result.keys, key_set(&["b", "c"]));
    assert_eq!(result.prefixes, key_set(&["d"]));

    assert_eq!(
        store.list_prefix("ld/a/d/").expect("list_prefix"),
        key_set(&["ld/a/d/e", "ld/a/d/f/g"])
    );
    assert!(store.list_dir("ld/none/").expect("list_dir").is_empty());
}

/// Partial writes splice fragments into existing values.
pub fn check_set_partial_values(store: &dyn Store) {
    store.set("pw/k", b"0123456789").expect("set");
    store
        .set_partial_values(&[("pw/k".to_string(), 3, b"XY".to_vec())])
        .expect("set_partial_values");
    assert_eq!(store.get("pw/k").expect("get"), b"012XY56789");

    store
        .set_partial_values(&[("pw/k".to_string(), 8, b"ABCD".to_vec())])
        .expect("set_partial_values");
    assert_eq!(store.get("pw/k").expect("get"), b"012XY567ABCD");

    let err = store
        .set_partial_values(&[("pw/missing".to_string(), 0, b"x".to_vec())])
        .unwrap_err();
    assert!(err.is_not_found());
}

/// Erasing a prefix removes exactly the keys under it.
pub fn check_erase_prefix(store: &dyn Store) {
    store
        .set_values(&[
            ("ep/a/1".to_string(), b"1".to_vec()),
            ("ep/a/2".to_string(), b"2".to_vec()),
            ("ep/b/1".to_string(), b"3".to_vec()),
        ])
        .expect("set_values");

    store.erase_prefix("ep/a/").expect("erase_prefix");
    assert_eq!(store.list_prefix("ep/").expect("list_prefix"), key_set(&["ep/b/1"]));
}
