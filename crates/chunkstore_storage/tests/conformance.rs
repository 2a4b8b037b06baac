//! Integration tests running the conformance suite against every backend.

use chunkstore_storage::{
    compose, url_to_fs, ByteRange, Capability, FileSystemStore, ListableStore, MappingStore,
    MemoryFileSystem, MutableMappingStore, ReadableStore, StorageOptions, StoreError,
    StoreResult, WriteableStore,
};
use chunkstore_testkit::prelude::*;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// A store that can only be written to.
#[derive(Default)]
struct WriteOnlyStore {
    values: Mutex<HashMap<String, Vec<u8>>>,
}

impl WriteableStore for WriteOnlyStore {
    fn set(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        self.values.lock().insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn erase(&self, key: &str) -> StoreResult<()> {
        self.values
            .lock()
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found(key))
    }
}

#[test]
fn every_backend_conforms() {
    init_tracing();
    for_each_backend(|store, backend| {
        tracing::info!(%backend, "running conformance checks");
        check_store(store);
    });
}

#[test]
fn model_harness_tracks_mixed_workload() {
    for_each_backend(|store, backend| {
        let mut harness = ModelHarness::new(store);

        for i in 0..20 {
            harness
                .set(&format!("arr/c/{}/{}", i / 5, i % 5), &[i as u8; 16])
                .unwrap();
        }
        harness.set("arr/zarr.json", b"{}").unwrap();
        harness.erase("arr/c/0/0").unwrap();
        harness.set_partial("arr/c/1/1", 12, b"tail-grows").unwrap();
        harness.erase_prefix("arr/c/3/").unwrap();

        assert_eq!(harness.tracked_count(), 15, "backend {backend}");
        harness.verify_all();
    });
}

#[test]
fn composed_operations_need_capabilities() {
    let store = WriteOnlyStore::default();
    store.set("a/b", b"0123").unwrap();

    let err = store
        .set_partial_values(&[("a/b".to_string(), 1, b"X".to_vec())])
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Capability {
            operation: "set_partial_values",
            required: Capability::Readable,
        }
    ));

    let err = store.erase_prefix("a/").unwrap_err();
    assert!(matches!(
        err,
        StoreError::Capability {
            required: Capability::Listable,
            ..
        }
    ));
    assert_eq!(err.to_string(), "erase_prefix requires a listable store");

    // Nothing was modified by the failed calls.
    assert_eq!(store.values.lock().get("a/b").map(Vec::as_slice), Some(&b"0123"[..]));
}

#[test]
fn batch_writes_and_erases() {
    for_each_backend(|store, _| {
        store
            .set_values(&[
                ("b/1".to_string(), b"one".to_vec()),
                ("b/2".to_string(), b"two".to_vec()),
            ])
            .unwrap();

        let err = store
            .erase_values(&["b/1".to_string(), "b/missing".to_string(), "b/2".to_string()])
            .unwrap_err();
        assert!(err.is_not_found());

        // Keys after the failing one are still erased.
        assert!(!store.contains("b/1").unwrap());
        assert!(!store.contains("b/2").unwrap());
    });
}

#[test]
fn compose_functions_match_trait_methods() {
    let store: MutableMappingStore<BTreeMap<String, Vec<u8>>> = MutableMappingStore::default();
    store.set("x/a", b"abcdef").unwrap();
    store.set("x/b", b"1").unwrap();
    store.set("y/a", b"2").unwrap();

    compose::set_partial_values(&store, &[("x/a".to_string(), 2, b"ZZ".to_vec())]).unwrap();
    assert_eq!(store.get("x/a").unwrap(), b"abZZef");

    compose::erase_prefix(&store, "x/").unwrap();
    assert_eq!(store.list().unwrap().into_iter().collect::<Vec<_>>(), vec!["y/a"]);
}

#[test]
fn read_only_view_shares_contents() {
    let store: MutableMappingStore<HashMap<String, Vec<u8>>> = MutableMappingStore::default();
    let view: MappingStore<HashMap<String, Vec<u8>>> = store.read_only();

    store.set("k", b"v").unwrap();
    assert_eq!(view.get("k").unwrap(), b"v");
    assert!(view.list().unwrap().contains("k"));
}

#[test]
fn stores_share_one_memory_filesystem() {
    let fs = Arc::new(MemoryFileSystem::new());
    let writer = FileSystemStore::with_filesystem(fs.clone(), "/shared");
    let reader = FileSystemStore::with_filesystem(fs, "/shared/arr");

    writer.set("arr/c/0", b"chunk").unwrap();
    assert_eq!(reader.get("c/0").unwrap(), b"chunk");
    assert_eq!(
        reader
            .get_partial_values(&[("c/0".to_string(), ByteRange::new(1, 3))])
            .unwrap(),
        vec![Some(b"hu".to_vec())]
    );
}

#[test]
fn local_store_persists_across_instances() {
    let temp_dir = tempfile::tempdir().unwrap();
    let url = temp_dir.path().join("data").to_string_lossy().into_owned();
    let options = StorageOptions::new().auto_mkdir(true);

    {
        let store = FileSystemStore::open(&url, options).unwrap();
        store.set("group/arr/c/0/0", b"persisted").unwrap();
    }

    let store = FileSystemStore::open(&url, options).unwrap();
    assert_eq!(store.get("group/arr/c/0/0").unwrap(), b"persisted");
    assert!(temp_dir.path().join("data/group/arr/c/0/0").is_file());
}

#[test]
fn unsupported_protocol_is_rejected() {
    let err = url_to_fs("s3://bucket/path", &StorageOptions::default()).unwrap_err();
    assert!(matches!(err, StoreError::UnsupportedProtocol { ref protocol } if protocol == "s3"));
}
