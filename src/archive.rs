//! In-memory archive decoding
//!
//! Opens an uploaded export archive from a byte buffer and enumerates its
//! members in archive order. Directories and non-HTML members are surfaced
//! as-is; filtering is the caller's job.

use crate::error::{Error, Result};
use std::io::{Cursor, Read};
use zip::ZipArchive;

/// Metadata for one archive member, read without decompressing its data
#[derive(Clone, Debug)]
pub struct EntryMeta {
    /// Full member path inside the archive
    pub name: String,
    /// Whether the member is a directory entry
    pub is_dir: bool,
}

/// One fully-read archive member
#[derive(Clone, Debug)]
pub struct ArchiveEntry {
    /// Full member path inside the archive
    pub name: String,
    /// Whether the member is a directory entry
    pub is_dir: bool,
    /// Decompressed member bytes (empty for directories)
    pub data: Vec<u8>,
}

impl ArchiveEntry {
    /// The member's file name (last path segment)
    pub fn file_name(&self) -> &str {
        self.name
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(&self.name)
    }
}

/// Reader over an in-memory archive buffer
///
/// Members are addressed by index, in archive member order (not sorted).
#[derive(Debug)]
pub struct ArchiveReader<'a> {
    archive: ZipArchive<Cursor<&'a [u8]>>,
}

impl<'a> ArchiveReader<'a> {
    /// Open an archive from a byte buffer
    ///
    /// Fails with [`Error::ArchiveCorrupt`] if the buffer is not a valid
    /// archive container.
    pub fn open(bytes: &'a [u8]) -> Result<Self> {
        let archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| Error::ArchiveCorrupt(e.to_string()))?;
        Ok(Self { archive })
    }

    /// Validate that a buffer is an openable archive without reading members
    pub fn probe(bytes: &[u8]) -> Result<()> {
        ZipArchive::new(Cursor::new(bytes))
            .map(|_| ())
            .map_err(|e| Error::ArchiveCorrupt(e.to_string()))
    }

    /// Number of members in the archive
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    /// Whether the archive has no members
    pub fn is_empty(&self) -> bool {
        self.archive.len() == 0
    }

    /// Read the name and kind of a member without decompressing it
    pub fn entry_meta(&mut self, index: usize) -> Result<EntryMeta> {
        let entry = self
            .archive
            .by_index_raw(index)
            .map_err(|e| Error::ArchiveCorrupt(format!("failed to read member {index}: {e}")))?;
        Ok(EntryMeta {
            name: entry.name().to_string(),
            is_dir: entry.is_dir(),
        })
    }

    /// Read a member's metadata and decompressed bytes
    pub fn read_entry(&mut self, index: usize) -> Result<ArchiveEntry> {
        let mut entry = self
            .archive
            .by_index(index)
            .map_err(|e| Error::ArchiveCorrupt(format!("failed to read member {index}: {e}")))?;
        let name = entry.name().to_string();
        let is_dir = entry.is_dir();

        let mut data = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut data)?;

        Ok(ArchiveEntry { name, is_dir, data })
    }
}
