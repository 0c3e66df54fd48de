//! The interface shared by every archive backend
//!

use aurora_common::{ByteSource, ResourceKey};
use std::{
    fmt::{self, Debug},
    io::{Read, Seek, SeekFrom, Take},
};
use tracing::trace;

use crate::error::{Error, Result};

/// Location of one resource inside an archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Name and type of the resource
    pub key: ResourceKey,

    /// Offset of the data from the start of the archive
    pub offset: u64,

    /// Size of the data in bytes
    pub size: u64,
}

/// A resource opened for reading
///
/// Holds its own handle on the archive, which is released when the file is dropped.
pub struct ArchiveFile<'a, R: Read + Seek> {
    entry: &'a ArchiveEntry,
    reader: Take<R>,
}

impl<R: Read + Seek> Debug for ArchiveFile<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ArchiveFile({:#?})", self.entry)
    }
}

impl<'a, R: Read + Seek> ArchiveFile<'a, R> {
    pub(crate) fn new(mut reader: R, entry: &'a ArchiveEntry) -> Result<Self> {
        reader.seek(SeekFrom::Start(entry.offset))?;
        Ok(ArchiveFile {
            entry,
            reader: reader.take(entry.size),
        })
    }

    pub fn key(&self) -> &ResourceKey {
        &self.entry.key
    }

    /// Get the file name the resource would have when extracted
    pub fn name(&self) -> String {
        self.entry.key.file_name()
    }

    /// Get the size of the resource in bytes
    pub fn size(&self) -> u64 {
        self.entry.size
    }

    /// Get the starting offset of the data of the resource
    pub fn data_start(&self) -> u64 {
        self.entry.offset
    }

    /// Read the remaining data of the resource
    pub fn into_bytes(mut self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.reader.read_to_end(&mut buffer)?;
        Ok(buffer)
    }
}

impl<R: Read + Seek> Read for ArchiveFile<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.reader.read(buf)
    }
}

/// Read exactly the extent of `entry` from a fresh handle on `source`
pub(crate) fn read_entry<S: ByteSource>(source: &S, entry: &ArchiveEntry) -> Result<Vec<u8>> {
    trace!(key = %entry.key, offset = entry.offset, size = entry.size, "reading resource");
    let mut reader = source.open()?;
    let len = reader.seek(SeekFrom::End(0))?;
    if entry.offset.checked_add(entry.size).map_or(true, |end| end > len) {
        return Err(Error::EntryOutOfBounds {
            key: entry.key.clone(),
            offset: entry.offset,
            size: entry.size,
            len,
        });
    }

    reader.seek(SeekFrom::Start(entry.offset))?;
    let mut buffer = vec![0u8; entry.size as usize];
    reader.read_exact(&mut buffer)?;
    Ok(buffer)
}

/// A backend that maps resource keys to bytes
///
/// Implemented by every archive format and by loose-file directories so the resolution service
/// can layer them without knowing their format.
pub trait ResourceContainer {
    /// Human readable name used in log messages
    fn name(&self) -> String;

    /// Whether the container holds `key`
    fn contains(&self, key: &ResourceKey) -> bool;

    /// Read the resource stored under `key`, or `None` when it is absent
    fn read(&self, key: &ResourceKey) -> Result<Option<Vec<u8>>>;

    /// Keys of every resource in the container, in index order
    fn keys(&self) -> Vec<ResourceKey>;
}

impl<C: ResourceContainer + ?Sized> ResourceContainer for Box<C> {
    fn name(&self) -> String {
        (**self).name()
    }

    fn contains(&self, key: &ResourceKey) -> bool {
        (**self).contains(key)
    }

    fn read(&self, key: &ResourceKey) -> Result<Option<Vec<u8>>> {
        (**self).read(key)
    }

    fn keys(&self) -> Vec<ResourceKey> {
        (**self).keys()
    }
}
