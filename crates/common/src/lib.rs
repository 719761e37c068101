/**
 * Record identifiers.
 *  - 128-bit random ids
 *  - Fixed-width base-58 text form used for
 *    file names and on the wire
 */
pub mod id;
/**
 * Typed metadata document kept in each
 *  record's reserved `meta` section.
 */
pub mod meta;
/**
 * The record graph store: a reference-counted
 *  graph of files and directories backed by a
 *  storage root directory, plus per-record
 *  byte sections.
 */
pub mod store;

mod serde_ext;

pub mod prelude {
    pub use crate::id::{IdError, RecordId};
    pub use crate::meta::{read_file_meta, write_file_meta, FileMeta, MetaError};
    pub use crate::store::{RecordInfo, Store, StoreError, StoreOptions};
}
