//! Record graph store
//!
//! A storage root directory holds one JSON document per record plus any
//! number of raw byte sections per record. While the process runs, the
//! in-memory index built by [`Store::open`] is the only authority; the files
//! are authoritative again on the next start.
//!
//! # Graph
//!
//! Records form a directed graph through their children lists. A record
//! may be mounted under several parents and carries a refcount equal to the
//! number of parents listing it:
//!
//! ```text
//!            root
//!           /    \
//!       photos   shared ──┐
//!         |               │
//!       a.jpg  <──────────┘   refcount(a.jpg) == 2
//! ```
//!
//! Unmounting the last edge deletes the record, its sections, and every
//! descendant that thereby loses its last reference. Cycles are forbidden
//! but only rejected when [`StoreOptions::reject_cycles`] is set; a record
//! inside a cycle is never freed.
//!
//! # Locking
//!
//! One `RwLock` guards the id → handle index and is held only for lookups,
//! inserts and removals. Each record has its own `Mutex`. Mount and unmount
//! always lock the parent before the child.
//!
//! # Durability
//!
//! Every mutation writes the affected record documents immediately, one
//! file at a time. There is no journal: a crash between two writes can
//! leave an edge on disk that the other record no longer agrees with.
//! [`Store::verify`] reports such drift on a running store.

mod error;
mod graph;
mod layout;
mod load;
mod record;
mod section;
mod verify;

pub use error::{Result, StoreError};
pub use graph::{RecordInfo, Store, StoreOptions};
pub use section::{SectionReader, SectionWriter};
pub use verify::Inconsistency;
