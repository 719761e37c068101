//! Integration tests for mount, unmount and cascading deletion

mod common;

use ::common::store::{StoreError, StoreOptions};

#[test]
fn test_mount_second_parent() {
    let (store, root, _temp) = common::setup_test_store();

    let p1 = store.mkdir(&root, "p1").unwrap();
    let p2 = store.mkdir(&root, "p2").unwrap();
    let child = store.touch(&p1, "shared.txt").unwrap();
    assert_eq!(common::refs(&store, &child), 1);

    store.mount(&p2, &child).unwrap();

    assert_eq!(common::refs(&store, &child), 2);
    assert!(store.get_children(&p1).unwrap().contains(&child));
    assert!(store.get_children(&p2).unwrap().contains(&child));
}

#[test]
fn test_mount_duplicate_edge() {
    let (store, root, _temp) = common::setup_test_store();

    let dir = store.mkdir(&root, "dir").unwrap();
    let child = store.touch(&dir, "file").unwrap();

    let result = store.mount(&dir, &child);
    assert!(matches!(result, Err(StoreError::InvalidArgument(_))));

    assert_eq!(common::refs(&store, &child), 1);
    assert_eq!(store.get_children(&dir).unwrap(), vec![child]);
}

#[test]
fn test_mount_unknown_records() {
    let (store, root, _temp) = common::setup_test_store();

    let dir = store.mkdir(&root, "dir").unwrap();
    let missing = ::common::id::RecordId::from_bytes([3; 16]);

    assert!(matches!(
        store.mount(&dir, &missing),
        Err(StoreError::NotFound(_))
    ));
    assert!(matches!(
        store.mount(&missing, &dir),
        Err(StoreError::NotFound(_))
    ));
    assert_eq!(common::refs(&store, &dir), 1);
}

#[test]
fn test_unmount_keeps_shared_record() {
    let (store, root, temp) = common::setup_test_store();
    let files = common::files_dir(&temp);

    let p1 = store.mkdir(&root, "p1").unwrap();
    let p2 = store.mkdir(&root, "p2").unwrap();
    let child = store.touch(&p1, "shared.txt").unwrap();
    store.write_section(&child, "data", b"payload").unwrap();
    store.mount(&p2, &child).unwrap();

    store.unmount(&p1, &child).unwrap();

    assert_eq!(common::refs(&store, &child), 1);
    assert!(!store.get_children(&p1).unwrap().contains(&child));
    assert!(store.get_children(&p2).unwrap().contains(&child));
    assert!(common::section_file(&files, &child, "data").exists());
    assert_eq!(store.read_section(&child, "data").unwrap(), b"payload");
}

#[test]
fn test_unmount_last_reference_deletes() {
    let (store, root, temp) = common::setup_test_store();
    let files = common::files_dir(&temp);

    let dir = store.mkdir(&root, "dir").unwrap();
    let file = store.touch(&dir, "f").unwrap();
    store.write_section(&file, "data", &[1, 2, 3]).unwrap();
    store.write_section(&file, "meta", b"{}").unwrap();

    store.unmount(&dir, &file).unwrap();

    assert!(matches!(
        store.get_children(&file),
        Err(StoreError::NotFound(_))
    ));
    assert!(!store.contains(&file));
    assert!(!files.join(file.to_string()).exists());
    assert!(!common::section_file(&files, &file, "data").exists());
    assert!(!common::section_file(&files, &file, "meta").exists());
    assert!(store.get_children(&dir).unwrap().is_empty());
}

#[test]
fn test_unmount_cascades_into_subtree() {
    let (store, root, temp) = common::setup_test_store();
    let files = common::files_dir(&temp);

    let a = store.mkdir(&root, "a").unwrap();
    let b = store.mkdir(&a, "b").unwrap();
    let c = store.touch(&b, "c").unwrap();
    let d = store.touch(&a, "d").unwrap();
    store.write_section(&c, "data", b"c").unwrap();

    store.unmount(&root, &a).unwrap();

    for id in [a, b, c, d] {
        assert!(matches!(store.get_children(&id), Err(StoreError::NotFound(_))));
        assert!(!files.join(id.to_string()).exists());
    }
    assert!(!common::section_file(&files, &c, "data").exists());
    assert_eq!(store.len(), 1);
    assert!(store.get_children(&root).unwrap().is_empty());
}

#[test]
fn test_cascade_spares_records_mounted_elsewhere() {
    let (store, root, _temp) = common::setup_test_store();

    let doomed = store.mkdir(&root, "doomed").unwrap();
    let keep = store.mkdir(&root, "keep").unwrap();
    let shared = store.mkdir(&doomed, "shared").unwrap();
    let inner = store.touch(&shared, "inner").unwrap();
    let private = store.touch(&doomed, "private").unwrap();
    store.mount(&keep, &shared).unwrap();

    store.unmount(&root, &doomed).unwrap();

    assert!(!store.contains(&doomed));
    assert!(!store.contains(&private));
    assert_eq!(common::refs(&store, &shared), 1);
    assert_eq!(store.get_children(&shared).unwrap(), vec![inner]);
    assert_eq!(common::refs(&store, &inner), 1);
}

#[test]
fn test_diamond_deletes_once() {
    let (store, root, _temp) = common::setup_test_store();

    let top = store.mkdir(&root, "top").unwrap();
    let left = store.mkdir(&top, "left").unwrap();
    let right = store.mkdir(&top, "right").unwrap();
    let bottom = store.touch(&left, "bottom").unwrap();
    store.mount(&right, &bottom).unwrap();
    assert_eq!(common::refs(&store, &bottom), 2);

    store.unmount(&root, &top).unwrap();

    assert_eq!(store.len(), 1);
    assert!(store.verify().is_empty());
}

#[test]
fn test_unmount_missing_edge() {
    let (store, root, _temp) = common::setup_test_store();

    let a = store.mkdir(&root, "a").unwrap();
    let b = store.mkdir(&root, "b").unwrap();

    let result = store.unmount(&a, &b);
    assert!(matches!(result, Err(StoreError::NotFound(_))));
    assert_eq!(common::refs(&store, &b), 1);
}

#[test]
fn test_root_is_never_deleted() {
    let (store, root, _temp) = common::setup_test_store();

    let dir = store.mkdir(&root, "dir").unwrap();
    store.mount(&dir, &root).unwrap();
    assert_eq!(common::refs(&store, &root), 2);

    store.unmount(&dir, &root).unwrap();

    assert_eq!(common::refs(&store, &root), 1);
    assert_eq!(store.get_children(&root).unwrap(), vec![dir]);
}

#[test]
fn test_self_mount_without_cycle_check() {
    let (store, root, _temp) = common::setup_test_store();

    let dir = store.mkdir(&root, "loop").unwrap();
    store.mount(&dir, &dir).unwrap();
    assert_eq!(common::refs(&store, &dir), 2);

    store.unmount(&dir, &dir).unwrap();
    assert_eq!(common::refs(&store, &dir), 1);
    assert!(store.get_children(&dir).unwrap().is_empty());
}

#[test]
fn test_reject_cycles() {
    let (store, root, _temp) = common::setup_test_store_with(StoreOptions {
        reject_cycles: true,
    });

    let a = store.mkdir(&root, "a").unwrap();
    let b = store.mkdir(&a, "b").unwrap();
    let c = store.mkdir(&b, "c").unwrap();

    for (parent, child) in [(c, a), (c, root), (a, a), (b, a)] {
        assert!(matches!(
            store.mount(&parent, &child),
            Err(StoreError::InvalidArgument(_))
        ));
    }

    // sideways mounts are still fine
    let d = store.mkdir(&root, "d").unwrap();
    store.mount(&d, &c).unwrap();
    assert_eq!(common::refs(&store, &c), 2);
}

#[test]
fn test_end_to_end() {
    let (store, root, temp) = common::setup_test_store();
    let files = common::files_dir(&temp);

    let photos = store.create_child(&root, "photos", true).unwrap();
    let photo = store.create_child(&photos, "a.jpg", false).unwrap();
    store.write_section(&photo, "data", &[1, 2, 3]).unwrap();

    store.mount(&root, &photo).unwrap();
    store.unmount(&photos, &photo).unwrap();
    assert_eq!(store.read_section(&photo, "data").unwrap(), vec![1, 2, 3]);

    store.unmount(&root, &photo).unwrap();

    assert!(matches!(
        store.get_children(&photo),
        Err(StoreError::NotFound(_))
    ));
    assert!(!common::section_file(&files, &photo, "data").exists());
    assert_eq!(store.get_children(&root).unwrap(), vec![photos]);
}
