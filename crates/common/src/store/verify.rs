use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::Serialize;

use crate::id::RecordId;

use super::graph::Store;

/// A disagreement between a record's refcount and the graph around it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Inconsistency {
    /// The refcount does not match the number of parents listing the record
    RefcountMismatch {
        id: RecordId,
        refs: u64,
        expected: u64,
    },
    /// The record cannot be reached from the root
    Unreachable { id: RecordId },
}

impl fmt::Display for Inconsistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Inconsistency::RefcountMismatch { id, refs, expected } => {
                write!(f, "{}: refcount {} but {} references", id, refs, expected)
            }
            Inconsistency::Unreachable { id } => write!(f, "{}: unreachable from root", id),
        }
    }
}

impl Store {
    /// Recompute every refcount from the current graph and report records
    /// that disagree, plus records that are no longer reachable from the root.
    ///
    /// Each record is snapshotted under its own lock, so concurrent mutation
    /// can produce transient reports; run it on a quiet store.
    pub fn verify(&self) -> Vec<Inconsistency> {
        let mut snapshot: HashMap<RecordId, (u64, Vec<RecordId>)> = HashMap::new();
        for record in self.handles() {
            let state = record.lock();
            if !state.deleted {
                snapshot.insert(*record.id(), (state.refs, state.doc.children.clone()));
            }
        }

        let mut expected: HashMap<RecordId, u64> = snapshot.keys().map(|id| (*id, 0)).collect();
        if let Some(count) = expected.get_mut(&self.root) {
            *count += 1;
        }
        for (_, children) in snapshot.values() {
            for child in children {
                if let Some(count) = expected.get_mut(child) {
                    *count += 1;
                }
            }
        }

        let mut reachable = HashSet::new();
        let mut pending = vec![self.root];
        while let Some(next) = pending.pop() {
            if !reachable.insert(next) {
                continue;
            }
            if let Some((_, children)) = snapshot.get(&next) {
                pending.extend(children.iter().copied());
            }
        }

        let mut ids: Vec<&RecordId> = snapshot.keys().collect();
        ids.sort();

        let mut report = Vec::new();
        for id in ids {
            let refs = snapshot[id].0;
            let want = expected[id];
            if refs != want {
                report.push(Inconsistency::RefcountMismatch {
                    id: *id,
                    refs,
                    expected: want,
                });
            }
            if !reachable.contains(id) {
                report.push(Inconsistency::Unreachable { id: *id });
            }
        }
        report
    }
}
