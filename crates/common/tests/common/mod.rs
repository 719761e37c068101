//! Shared test utilities for store integration tests
#![allow(dead_code)]

use std::path::Path;

use common::id::RecordId;
use common::store::{Store, StoreOptions};
use tempfile::TempDir;

/// Set up a fresh storage root holding only the root directory
pub fn setup_test_store() -> (Store, RecordId, TempDir) {
    setup_test_store_with(StoreOptions::default())
}

pub fn setup_test_store_with(options: StoreOptions) -> (Store, RecordId, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let files = temp_dir.path().join("files");
    let root = Store::init(&files).unwrap();
    let store = Store::open(&files, root, options).unwrap();
    (store, root, temp_dir)
}

/// Path of the storage root created by `setup_test_store`
pub fn files_dir(temp_dir: &TempDir) -> std::path::PathBuf {
    temp_dir.path().join("files")
}

/// Reload the store from disk, as a restarted process would
pub fn reopen(temp_dir: &TempDir, root: RecordId) -> Store {
    Store::open(&files_dir(temp_dir), root, StoreOptions::default()).unwrap()
}

pub fn refs(store: &Store, id: &RecordId) -> u64 {
    store.stat(id).unwrap().refs
}

pub fn section_file(dir: &Path, id: &RecordId, section: &str) -> std::path::PathBuf {
    dir.join(format!("{}.{}", id, section))
}
