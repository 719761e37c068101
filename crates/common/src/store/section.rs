use std::fs::{File, OpenOptions};
use std::io::{self, ErrorKind, Read, Write};

use crate::id::RecordId;

use super::error::{Result, StoreError};
use super::graph::Store;
use super::layout::check_section_name;

/// Readable handle to one section of a record.
#[derive(Debug)]
pub struct SectionReader(File);

impl Read for SectionReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.0.read(buf)
    }
}

/// Writable handle to one section of a record; the section starts empty.
#[derive(Debug)]
pub struct SectionWriter(File);

impl SectionWriter {
    /// Flush and sync the section to disk.
    pub fn commit(mut self) -> Result<()> {
        self.0.flush()?;
        self.0.sync_all()?;
        Ok(())
    }
}

impl Write for SectionWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}

fn section_not_found(id: &RecordId, section: &str) -> StoreError {
    StoreError::NotFound(format!("section {} of {}", section, id))
}

impl Store {
    pub fn open_section_reader(&self, id: &RecordId, section: &str) -> Result<SectionReader> {
        check_section_name(section)?;
        let record = self.record(id)?;
        let _state = record.live()?;

        match File::open(self.layout.section_path(id, section)) {
            Ok(file) => Ok(SectionReader(file)),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(section_not_found(id, section)),
            Err(e) => Err(e.into()),
        }
    }

    /// Open a section for writing, creating it or truncating what was there.
    pub fn open_section_writer(&self, id: &RecordId, section: &str) -> Result<SectionWriter> {
        check_section_name(section)?;
        let record = self.record(id)?;
        // the file must exist before the lock is released, so a concurrent
        // purge either sees it or this call sees the tombstone
        let _state = record.live()?;

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(self.layout.section_path(id, section))?;
        Ok(SectionWriter(file))
    }

    pub fn delete_section(&self, id: &RecordId, section: &str) -> Result<()> {
        check_section_name(section)?;
        let record = self.record(id)?;
        let _state = record.live()?;

        match std::fs::remove_file(self.layout.section_path(id, section)) {
            Ok(()) => {
                tracing::debug!(%id, section, "deleted section");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(section_not_found(id, section)),
            Err(e) => Err(e.into()),
        }
    }

    /// Names of every section currently stored for `id`, sorted.
    pub fn list_sections(&self, id: &RecordId) -> Result<Vec<String>> {
        let record = self.record(id)?;
        let _state = record.live()?;
        self.layout.sections(id)
    }

    /// Read a whole section into memory.
    pub fn read_section(&self, id: &RecordId, section: &str) -> Result<Vec<u8>> {
        let mut reader = self.open_section_reader(id, section)?;
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        Ok(buf)
    }

    /// Replace a section with `data`.
    pub fn write_section(&self, id: &RecordId, section: &str, data: &[u8]) -> Result<()> {
        let mut writer = self.open_section_writer(id, section)?;
        writer.write_all(data)?;
        writer.commit()
    }
}
