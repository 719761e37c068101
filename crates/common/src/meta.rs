//! File metadata
//!
//! [`FileMeta`] is stored as JSON in the reserved `meta` section of a record.
//! The permission bits are recorded here but never enforced by the store.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::id::RecordId;
use crate::serde_ext::null_as_default;
use crate::store::{Store, StoreError};

/// Name of the section holding a record's metadata
pub const META_SECTION: &str = "meta";

pub const PERM_OWNER: u8 = 1 << 0;
pub const PERM_READ: u8 = 1 << 1;
pub const PERM_WRITE: u8 = 1 << 2;
pub const PERM_ALL: u8 = PERM_OWNER | PERM_READ | PERM_WRITE;

#[derive(Debug, thiserror::Error)]
pub enum MetaError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("metadata decode error: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("metadata encode error: {0}")]
    Encode(#[source] serde_json::Error),
}

impl MetaError {
    /// Whether the process should stop instead of handling this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, MetaError::Store(e) if e.is_fatal())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMeta {
    pub id: RecordId,
    #[serde(rename = "type")]
    pub file_type: String,
    /// Permission bits per subject (user name)
    #[serde(default, deserialize_with = "null_as_default")]
    pub perms: BTreeMap<String, u8>,
    /// Names of hooks that keep their own sections on this record
    #[serde(default, deserialize_with = "null_as_default")]
    pub hooks: Vec<String>,
    #[serde(rename = "createdBy")]
    pub created_by: String,
    /// Seconds since the Unix epoch
    #[serde(rename = "createdAt")]
    pub created_at: u64,
}

impl FileMeta {
    /// Metadata for a freshly created record, with its creator as owner.
    pub fn new(id: RecordId, file_type: impl Into<String>, created_by: impl Into<String>) -> Self {
        let created_by = created_by.into();
        let mut perms = BTreeMap::new();
        perms.insert(created_by.clone(), PERM_ALL);
        Self {
            id,
            file_type: file_type.into(),
            perms,
            hooks: Vec::new(),
            created_by,
            created_at: chrono::Utc::now().timestamp().max(0) as u64,
        }
    }

    pub fn grant(&mut self, subject: &str, bits: u8) {
        *self.perms.entry(subject.to_string()).or_default() |= bits;
    }

    pub fn revoke(&mut self, subject: &str, bits: u8) {
        if let Some(perm) = self.perms.get_mut(subject) {
            *perm &= !bits;
            if *perm == 0 {
                self.perms.remove(subject);
            }
        }
    }

    pub fn has_perm(&self, subject: &str, bits: u8) -> bool {
        self.perms
            .get(subject)
            .is_some_and(|perm| perm & bits == bits)
    }
}

pub fn read_file_meta(store: &Store, id: &RecordId) -> Result<FileMeta, MetaError> {
    let reader = store.open_section_reader(id, META_SECTION)?;
    serde_json::from_reader(reader).map_err(MetaError::Decode)
}

pub fn write_file_meta(store: &Store, id: &RecordId, meta: &FileMeta) -> Result<(), MetaError> {
    let mut bytes = serde_json::to_vec(meta).map_err(MetaError::Encode)?;
    bytes.push(b'\n');
    store.write_section(id, META_SECTION, &bytes)?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_meta_json_layout() {
        let id = RecordId::from_bytes([9; 16]);
        let meta = FileMeta {
            id,
            file_type: "file".to_string(),
            perms: BTreeMap::from([("alice".to_string(), PERM_OWNER | PERM_READ)]),
            hooks: vec!["thumbnail".to_string()],
            created_by: "alice".to_string(),
            created_at: 1_700_000_000,
        };

        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": id.to_string(),
                "type": "file",
                "perms": {"alice": 3},
                "hooks": ["thumbnail"],
                "createdBy": "alice",
                "createdAt": 1_700_000_000u64,
            })
        );
        assert_eq!(serde_json::from_value::<FileMeta>(json).unwrap(), meta);
    }

    #[test]
    fn test_null_collections_decode_empty() {
        let id = RecordId::from_bytes([9; 16]);
        let json = serde_json::json!({
            "id": id.to_string(),
            "type": "dir",
            "perms": null,
            "hooks": null,
            "createdBy": "alice",
            "createdAt": 1_700_000_000u64,
        });

        let meta: FileMeta = serde_json::from_value(json).unwrap();
        assert!(meta.perms.is_empty());
        assert!(meta.hooks.is_empty());
    }

    #[test]
    fn test_permissions() {
        let id = RecordId::from_bytes([9; 16]);
        let mut meta = FileMeta::new(id, "file", "alice");
        assert!(meta.has_perm("alice", PERM_ALL));
        assert!(!meta.has_perm("bob", PERM_READ));

        meta.grant("bob", PERM_READ);
        assert!(meta.has_perm("bob", PERM_READ));
        assert!(!meta.has_perm("bob", PERM_READ | PERM_WRITE));

        meta.revoke("bob", PERM_READ);
        assert!(!meta.perms.contains_key("bob"));
    }

    #[test]
    fn test_new_stamps_creation_time() {
        let meta = FileMeta::new(RecordId::from_bytes([1; 16]), "dir", "root");
        assert!(meta.created_at > 1_600_000_000);
        assert_eq!(meta.created_by, "root");
        assert!(meta.hooks.is_empty());
    }
}
