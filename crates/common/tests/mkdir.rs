//! Integration tests for creating records

mod common;

use ::common::id::RecordId;
use ::common::store::StoreError;

#[test]
fn test_create_child() {
    let (store, root, _temp) = common::setup_test_store();

    let file = store.create_child(&root, "a.txt", false).unwrap();

    let children = store.get_children(&root).unwrap();
    assert_eq!(children.iter().filter(|c| **c == file).count(), 1);
    assert_eq!(common::refs(&store, &file), 1);

    let info = store.stat(&file).unwrap();
    assert_eq!(info.name, "a.txt");
    assert!(!info.is_dir);
    assert!(info.children.is_empty());
}

#[test]
fn test_mkdir_and_touch() {
    let (store, root, _temp) = common::setup_test_store();

    let dir = store.mkdir(&root, "photos").unwrap();
    let file = store.touch(&dir, "a.jpg").unwrap();

    assert!(store.stat(&dir).unwrap().is_dir);
    assert!(!store.stat(&file).unwrap().is_dir);
    assert_eq!(store.get_children(&dir).unwrap(), vec![file]);
    assert_eq!(store.get_children(&root).unwrap(), vec![dir]);
}

#[test]
fn test_create_child_persists_both_records() {
    let (store, root, temp) = common::setup_test_store();
    let dir = common::files_dir(&temp);

    let file = store.touch(&root, "notes.md").unwrap();

    assert!(dir.join(file.to_string()).exists());
    let root_doc: serde_json::Value =
        serde_json::from_slice(&std::fs::read(dir.join(root.to_string())).unwrap()).unwrap();
    assert_eq!(root_doc["children"], serde_json::json!([file.to_string()]));
    assert_eq!(root_doc["isDir"], serde_json::json!(true));

    let file_doc: serde_json::Value =
        serde_json::from_slice(&std::fs::read(dir.join(file.to_string())).unwrap()).unwrap();
    assert_eq!(
        file_doc,
        serde_json::json!({"children": [], "isDir": false, "name": "notes.md"})
    );
}

#[test]
fn test_create_child_unknown_parent() {
    let (store, _root, _temp) = common::setup_test_store();

    let missing = RecordId::from_bytes([42; 16]);
    let result = store.create_child(&missing, "x", false);
    assert!(matches!(result, Err(StoreError::NotFound(_))));
    assert_eq!(store.len(), 1);
}

#[test]
fn test_same_name_twice_makes_two_records() {
    let (store, root, _temp) = common::setup_test_store();

    let a = store.touch(&root, "dup").unwrap();
    let b = store.touch(&root, "dup").unwrap();

    assert_ne!(a, b);
    assert_eq!(store.get_children(&root).unwrap().len(), 2);
}

#[test]
fn test_get_children_unknown() {
    let (store, _root, _temp) = common::setup_test_store();

    let result = store.get_children(&RecordId::from_bytes([1; 16]));
    assert!(matches!(result, Err(StoreError::NotFound(_))));
}
