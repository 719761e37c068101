use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::id::RecordId;

use super::error::{Result, StoreError};
use super::graph::{Store, StoreOptions};
use super::layout::{Entry, Layout};
use super::record::{Record, RecordDoc};

impl Store {
    /// Prepare an empty storage root holding a single root directory record.
    ///
    /// Creates `dir` if it does not exist yet. Returns the id of the new root,
    /// which must be handed back to [`Store::open`].
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidArgument`] if `dir` exists and is not empty
    /// - [`StoreError::EntropyExhausted`] if no id could be minted
    /// - [`StoreError::Io`] on filesystem failures
    pub fn init(dir: &Path) -> Result<RecordId> {
        fs::create_dir_all(dir)?;
        if fs::read_dir(dir)?.next().is_some() {
            return Err(StoreError::InvalidArgument(format!(
                "storage root {} is not empty",
                dir.display()
            )));
        }

        let root = RecordId::generate()?;
        let doc = RecordDoc {
            is_dir: true,
            ..Default::default()
        };
        Layout::new(dir).write_record(&root, &doc)?;

        tracing::info!(%root, dir = %dir.display(), "initialized storage root");
        Ok(root)
    }

    /// Load every record in `dir` into a fresh in-memory index.
    ///
    /// Refcounts are not stored on disk; they are rebuilt from the loaded
    /// children lists. The root carries one extra reference so it can never
    /// be deleted. Records no parent lists are deleted along with anything
    /// only they kept alive.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Corrupt`] for a directory or a foreign file in `dir`,
    ///   an undecodable record, a duplicate child, a child that names an
    ///   unknown record, or a section whose record is missing
    /// - [`StoreError::NotFound`] if `root` is not among the loaded records
    /// - [`StoreError::Io`] on filesystem failures, including failing to
    ///   delete an unreferenced record
    pub fn open(dir: &Path, root: RecordId, options: StoreOptions) -> Result<Store> {
        let layout = Layout::new(dir);

        let mut record_ids = Vec::new();
        let mut section_owners = BTreeSet::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let file_name = entry.file_name();
            let name = file_name.to_string_lossy();

            if entry.file_type()?.is_dir() {
                return Err(StoreError::Corrupt(format!(
                    "directory {:?} in storage root",
                    name
                )));
            }

            match Entry::classify(&name) {
                Some(Entry::Record(id)) => record_ids.push(id),
                Some(Entry::Section(id, _)) => {
                    section_owners.insert(id);
                }
                None => {
                    return Err(StoreError::Corrupt(format!(
                        "unexpected file {:?} in storage root",
                        name
                    )))
                }
            }
        }

        let mut docs = HashMap::with_capacity(record_ids.len());
        for id in record_ids {
            let doc = layout.read_record(&id)?;
            let mut unique = BTreeSet::new();
            if let Some(dup) = doc.children.iter().find(|c| !unique.insert(**c)) {
                return Err(StoreError::Corrupt(format!(
                    "record {} lists child {} more than once",
                    id, dup
                )));
            }
            docs.insert(id, doc);
        }

        if let Some(orphan) = section_owners.iter().find(|id| !docs.contains_key(id)) {
            return Err(StoreError::Corrupt(format!(
                "sections found for missing record {}",
                orphan
            )));
        }

        let mut refs: HashMap<RecordId, u64> = docs.keys().map(|id| (*id, 0)).collect();
        for (id, doc) in &docs {
            for child in &doc.children {
                let count = refs.get_mut(child).ok_or_else(|| {
                    StoreError::Corrupt(format!("record {} lists unknown child {}", id, child))
                })?;
                *count += 1;
            }
        }

        match refs.get_mut(&root) {
            Some(count) => *count += 1,
            None => {
                return Err(StoreError::NotFound(format!(
                    "root record {} not in {}",
                    root,
                    dir.display()
                )))
            }
        }

        let mut unreferenced: Vec<RecordId> = refs
            .iter()
            .filter(|(_, count)| **count == 0)
            .map(|(id, _)| *id)
            .collect();
        unreferenced.sort();

        let records: HashMap<RecordId, Arc<Record>> = docs
            .into_iter()
            .map(|(id, doc)| {
                let count = refs.get(&id).copied().unwrap_or_default();
                (id, Arc::new(Record::new(id, doc, count)))
            })
            .collect();

        let store = Store {
            layout,
            root,
            records: RwLock::new(records),
            options,
            mount_guard: Mutex::new(()),
        };
        store.collect_unreferenced(&unreferenced)?;

        tracing::info!(
            %root,
            dir = %dir.display(),
            records = store.len(),
            collected = unreferenced.len(),
            "loaded storage root"
        );

        Ok(store)
    }

    /// Delete records that no parent lists, as left behind by a crash
    /// during create or a cascade that stopped part way.
    fn collect_unreferenced(&self, ids: &[RecordId]) -> Result<()> {
        for id in ids {
            let children = {
                let record = self.record(id)?;
                let mut state = record.lock();
                if state.deleted {
                    continue;
                }
                state.release()
            };
            if let Some(children) = children {
                tracing::warn!(%id, "collecting unreferenced record");
                self.purge(*id, children)?;
            }
        }
        Ok(())
    }
}
