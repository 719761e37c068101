//! On-disk layout of a storage root.
//!
//! ```text
//! <root>/
//! ├── <id>            record document (JSON)
//! ├── <id>.meta       FileMeta section
//! ├── <id>.data       file payload section
//! └── <id>.<section>  any other section
//! ```
//!
//! Nothing else may live in the storage root, directories included.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::id::RecordId;

use super::error::{Result, StoreError};
use super::record::RecordDoc;

const SECTION_PATTERN: &str = r"[A-Za-z0-9_-]+";
const ID_PATTERN: &str = r"[1-9A-HJ-NP-Za-km-z]{22}";

static SECTION_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^{}$", SECTION_PATTERN)).unwrap());

static ENTRY_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^(?P<id>{})(?:\.(?P<section>{}))?$",
        ID_PATTERN, SECTION_PATTERN
    ))
    .unwrap()
});

/// A recognized file in the storage root
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Entry {
    Record(RecordId),
    Section(RecordId, String),
}

impl Entry {
    /// Classify a file name; `None` for anything that does not belong here.
    pub(crate) fn classify(name: &str) -> Option<Entry> {
        let caps = ENTRY_NAME_REGEX.captures(name)?;
        let id = RecordId::parse(caps.name("id")?.as_str()).ok()?;
        match caps.name("section") {
            Some(section) => Some(Entry::Section(id, section.as_str().to_string())),
            None => Some(Entry::Record(id)),
        }
    }
}

pub(crate) fn check_section_name(section: &str) -> Result<()> {
    if SECTION_NAME_REGEX.is_match(section) {
        Ok(())
    } else {
        Err(StoreError::InvalidArgument(format!(
            "section name {:?} must match {}",
            section, SECTION_PATTERN
        )))
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Layout {
    dir: PathBuf,
}

impl Layout {
    pub(crate) fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub(crate) fn record_path(&self, id: &RecordId) -> PathBuf {
        self.dir.join(id.to_string())
    }

    pub(crate) fn section_path(&self, id: &RecordId, section: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", id, section))
    }

    pub(crate) fn write_record(&self, id: &RecordId, doc: &RecordDoc) -> Result<()> {
        let mut bytes = serde_json::to_vec(doc).map_err(std::io::Error::from)?;
        bytes.push(b'\n');
        fs::write(self.record_path(id), bytes)?;
        Ok(())
    }

    pub(crate) fn read_record(&self, id: &RecordId) -> Result<RecordDoc> {
        let bytes = fs::read(self.record_path(id))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| StoreError::Corrupt(format!("record {}: {}", id, e)))
    }

    pub(crate) fn remove_record(&self, id: &RecordId) -> Result<()> {
        remove_if_present(&self.record_path(id))
    }

    /// Names of all sections stored for `id`, sorted.
    pub(crate) fn sections(&self, id: &RecordId) -> Result<Vec<String>> {
        let prefix = format!("{}.", id);
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let file_name = entry.file_name();
            if let Some(section) = file_name.to_str().and_then(|n| n.strip_prefix(&prefix)) {
                names.push(section.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    pub(crate) fn remove_sections(&self, id: &RecordId) -> Result<()> {
        for section in self.sections(id)? {
            remove_if_present(&self.section_path(id, &section))?;
        }
        Ok(())
    }
}

fn remove_if_present(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
