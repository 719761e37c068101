use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};

use crate::id::RecordId;

use super::error::{Result, StoreError};
use super::layout::Layout;
use super::record::{Record, RecordDoc, RecordState};

/// Tunable hardening for a [`Store`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreOptions {
    /// Refuse mounts that would close a cycle in the record graph.
    ///
    /// While set, mounts run one at a time so that two opposite mounts
    /// cannot both pass the check.
    #[serde(default)]
    pub reject_cycles: bool,
}

/// Snapshot of a record, as returned by [`Store::stat`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordInfo {
    pub id: RecordId,
    pub name: String,
    pub is_dir: bool,
    pub refs: u64,
    pub children: Vec<RecordId>,
}

/// Reference-counted record graph backed by a storage root directory.
///
/// The index lock is only ever held to fetch or insert an `Arc<Record>`
/// handle; all mutation happens under the record's own lock. Operations that
/// touch two records lock the parent before the child.
#[derive(Debug)]
pub struct Store {
    pub(super) layout: Layout,
    pub(super) root: RecordId,
    pub(super) records: RwLock<HashMap<RecordId, Arc<Record>>>,
    pub(super) options: StoreOptions,
    // held across check_acyclic and attach when reject_cycles is set
    pub(super) mount_guard: Mutex<()>,
}

impl Store {
    pub fn get_root(&self) -> RecordId {
        self.root
    }

    pub fn options(&self) -> StoreOptions {
        self.options
    }

    /// Number of live records in the index.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.records.read().contains_key(id)
    }

    pub(super) fn record(&self, id: &RecordId) -> Result<Arc<Record>> {
        self.records
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("record {}", id)))
    }

    pub fn get_children(&self, id: &RecordId) -> Result<Vec<RecordId>> {
        let record = self.record(id)?;
        let state = record.live()?;
        Ok(state.doc.children.clone())
    }

    pub fn stat(&self, id: &RecordId) -> Result<RecordInfo> {
        let record = self.record(id)?;
        let state = record.live()?;
        Ok(RecordInfo {
            id: *id,
            name: state.doc.name.clone(),
            is_dir: state.doc.is_dir,
            refs: state.refs,
            children: state.doc.children.clone(),
        })
    }

    /// Create a new directory under `parent`.
    pub fn mkdir(&self, parent: &RecordId, name: &str) -> Result<RecordId> {
        self.create_child(parent, name, true)
    }

    /// Create a new file under `parent`.
    pub fn touch(&self, parent: &RecordId, name: &str) -> Result<RecordId> {
        self.create_child(parent, name, false)
    }

    /// Mint a new record and attach it under `parent` with a refcount of one.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] if `parent` does not exist
    /// - [`StoreError::EntropyExhausted`] if no id could be minted
    /// - [`StoreError::Io`] if either record could not be persisted
    pub fn create_child(&self, parent: &RecordId, name: &str, is_dir: bool) -> Result<RecordId> {
        let parent_record = self.record(parent)?;
        let id = RecordId::generate()?;
        let doc = RecordDoc {
            children: Vec::new(),
            is_dir,
            name: name.to_string(),
        };

        // holding the parent keeps it from being purged under a half-built child
        let mut parent_state = parent_record.live()?;
        check_not_child(parent, &parent_state, &id)?;

        self.layout.write_record(&id, &doc)?;
        self.records
            .write()
            .insert(id, Arc::new(Record::new(id, doc, 1)));

        if let Err(e) = self.attach(parent, &mut parent_state, &id) {
            self.records.write().remove(&id);
            if let Err(cleanup) = self.layout.remove_record(&id) {
                tracing::warn!(%id, error = %cleanup, "failed to remove unattached record");
            }
            return Err(e);
        }

        tracing::debug!(%parent, %id, name, is_dir, "created record");
        Ok(id)
    }

    /// Attach an existing record under another parent.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] if either record does not exist
    /// - [`StoreError::InvalidArgument`] if the edge already exists, or if it
    ///   would close a cycle and [`StoreOptions::reject_cycles`] is set
    pub fn mount(&self, parent: &RecordId, child: &RecordId) -> Result<()> {
        let parent_record = self.record(parent)?;
        let child_record = self.record(child)?;

        let _serial = self.options.reject_cycles.then(|| self.mount_guard.lock());
        if self.options.reject_cycles {
            self.check_acyclic(parent, child)?;
        }

        let mut parent_state = parent_record.live()?;
        // an existing edge must fail before the child is locked
        check_not_child(parent, &parent_state, child)?;
        if parent == child {
            self.attach(parent, &mut parent_state, child)?;
            parent_state.refs += 1;
        } else {
            let mut child_state = child_record.live()?;
            self.attach(parent, &mut parent_state, child)?;
            child_state.refs += 1;
        }

        tracing::debug!(%parent, %child, "mounted record");
        Ok(())
    }

    /// Detach `child` from `parent`, deleting it once nothing references it.
    ///
    /// Deleting a record releases each of its own children in turn, so a
    /// whole subtree goes away when its last mount is removed. Records that
    /// are still mounted elsewhere survive.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] if either record, or the edge, does not exist
    /// - [`StoreError::Io`] if a record or section file could not be updated
    pub fn unmount(&self, parent: &RecordId, child: &RecordId) -> Result<()> {
        let parent_record = self.record(parent)?;
        let child_record = self.record(child)?;

        let orphaned = {
            let mut parent_state = parent_record.live()?;
            // the child is only locked once the edge is known to exist
            self.detach(parent, &mut parent_state, child)?;
            if parent == child {
                parent_state.release()
            } else {
                // the removed edge still counts, so the child cannot be gone
                child_record.lock().release()
            }
        };

        tracing::debug!(%parent, %child, "unmounted record");

        match orphaned {
            Some(children) => self.purge(*child, children),
            None => Ok(()),
        }
    }

    fn attach(&self, parent: &RecordId, state: &mut RecordState, child: &RecordId) -> Result<()> {
        check_not_child(parent, state, child)?;
        state.doc.children.push(*child);
        if let Err(e) = self.layout.write_record(parent, &state.doc) {
            state.doc.children.pop();
            return Err(e);
        }
        Ok(())
    }

    fn detach(&self, parent: &RecordId, state: &mut RecordState, child: &RecordId) -> Result<()> {
        let pos = state
            .doc
            .children
            .iter()
            .position(|c| c == child)
            .ok_or_else(|| {
                StoreError::NotFound(format!("{} is not a child of {}", child, parent))
            })?;
        let removed = state.doc.children.swap_remove(pos);
        if let Err(e) = self.layout.write_record(parent, &state.doc) {
            // put it back where it was
            state.doc.children.push(removed);
            let last = state.doc.children.len() - 1;
            state.doc.children.swap(pos, last);
            return Err(e);
        }
        Ok(())
    }

    /// Delete a record whose refcount just hit zero, cascading into every
    /// descendant that loses its last reference along the way.
    pub(super) fn purge(&self, id: RecordId, children: Vec<RecordId>) -> Result<()> {
        let mut doomed = vec![id];
        let mut pending = children;

        while let Some(next) = pending.pop() {
            let Ok(record) = self.record(&next) else {
                continue;
            };
            let mut state = record.lock();
            if state.deleted {
                continue;
            }
            if let Some(grandchildren) = state.release() {
                doomed.push(next);
                pending.extend(grandchildren);
            }
        }

        if doomed.len() > 1 {
            tracing::warn!(%id, count = doomed.len(), "cascading delete of unreferenced records");
        } else {
            tracing::debug!(%id, "deleting unreferenced record");
        }

        // ancestors first: a record file on disk never lists a child whose
        // file is already gone. After a failure the rest stay on disk as
        // unreferenced records, which the next open collects.
        let mut result = Ok(());
        for id in &doomed {
            if result.is_ok() {
                if let Err(e) = self.remove_files(id) {
                    tracing::error!(%id, error = %e, "failed to remove record files");
                    result = Err(e);
                }
            }
            self.records.write().remove(id);
        }
        result
    }

    fn remove_files(&self, id: &RecordId) -> Result<()> {
        // sections before the record itself: a crash in between must not
        // leave sections without an owner
        self.layout.remove_sections(id)?;
        self.layout.remove_record(id)
    }

    /// Walk down from `child`; reaching `parent` means the mount would close
    /// a cycle.
    fn check_acyclic(&self, parent: &RecordId, child: &RecordId) -> Result<()> {
        let mut seen = HashSet::new();
        let mut pending = vec![*child];

        while let Some(next) = pending.pop() {
            if next == *parent {
                return Err(StoreError::InvalidArgument(format!(
                    "mounting {} under {} would create a cycle",
                    child, parent
                )));
            }
            if !seen.insert(next) {
                continue;
            }
            if let Ok(record) = self.record(&next) {
                pending.extend(record.lock().doc.children.iter().copied());
            }
        }
        Ok(())
    }

    pub(super) fn handles(&self) -> Vec<Arc<Record>> {
        self.records.read().values().cloned().collect()
    }
}

fn check_not_child(parent: &RecordId, state: &RecordState, child: &RecordId) -> Result<()> {
    if state.has_child(child) {
        return Err(StoreError::InvalidArgument(format!(
            "{} is already a child of {}",
            child, parent
        )));
    }
    Ok(())
}
