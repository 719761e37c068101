use parking_lot::{Mutex, MutexGuard};
use serde::{Deserialize, Serialize};

use crate::id::RecordId;
use crate::serde_ext::null_as_default;

use super::error::{Result, StoreError};

/// The persisted part of a record, stored as JSON under the record's id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct RecordDoc {
    #[serde(default, deserialize_with = "null_as_default")]
    pub children: Vec<RecordId>,
    #[serde(rename = "isDir", alias = "is_dir", default)]
    pub is_dir: bool,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug)]
pub(crate) struct RecordState {
    pub doc: RecordDoc,
    // in-degree, plus one for the pinned root; never persisted
    pub refs: u64,
    // set once refs hits zero; stale handles see NotFound from then on
    pub deleted: bool,
}

impl RecordState {
    pub(crate) fn has_child(&self, child: &RecordId) -> bool {
        self.doc.children.contains(child)
    }

    /// Drop one reference. Returns the children to release in turn when
    /// this was the last one.
    pub(crate) fn release(&mut self) -> Option<Vec<RecordId>> {
        self.refs = self.refs.saturating_sub(1);
        if self.refs == 0 {
            self.deleted = true;
            Some(std::mem::take(&mut self.doc.children))
        } else {
            None
        }
    }
}

/// A node in the record graph, shared between the index and callers as an
/// `Arc<Record>` handle.
#[derive(Debug)]
pub(crate) struct Record {
    id: RecordId,
    state: Mutex<RecordState>,
}

impl Record {
    pub(crate) fn new(id: RecordId, doc: RecordDoc, refs: u64) -> Self {
        Self {
            id,
            state: Mutex::new(RecordState {
                doc,
                refs,
                deleted: false,
            }),
        }
    }

    pub(crate) fn id(&self) -> &RecordId {
        &self.id
    }

    /// Lock the record, failing if it was deleted after the handle was taken.
    pub(crate) fn live(&self) -> Result<MutexGuard<'_, RecordState>> {
        let state = self.state.lock();
        if state.deleted {
            return Err(StoreError::NotFound(format!("record {}", self.id)));
        }
        Ok(state)
    }

    /// Lock the record regardless of whether it is deleted.
    pub(crate) fn lock(&self) -> MutexGuard<'_, RecordState> {
        self.state.lock()
    }
}
