//! Types for reading RIM archives
//!
//! Modules ship as a pair of RIM files: `<module>.rim` holding the module and area descriptions
//! and `<module>_s.rim` holding everything the area instantiates.

use aurora_common::{cursor::SeekExt, ByteSource, ResourceKey};
use binrw::BinRead;
use indexmap::IndexMap;
use std::io::{Seek, SeekFrom};
use tracing::{debug, instrument};

use crate::{
    container::{read_entry, ArchiveEntry, ArchiveFile, ResourceContainer},
    error::{Error, NotFoundError, Result},
    types::{RimEntry, RimHeader, RIM_ENTRY_SIZE},
};

/// RIM archive reader
pub struct RimArchive<S> {
    source: S,
    entries: IndexMap<ResourceKey, ArchiveEntry>,
}

impl<S: ByteSource> RimArchive<S> {
    /// Read the index of a RIM archive
    #[instrument(skip_all, fields(source = %source.describe()), err)]
    pub fn new(source: S) -> Result<RimArchive<S>> {
        let mut reader = source.open()?;
        let header = RimHeader::read(&mut reader).map_err(|e| Error::from_header("rim", e))?;

        reader.seek(SeekFrom::Start(header.entry_offset as u64))?;
        let capacity = reader.capacity_for(header.entry_count as u64, RIM_ENTRY_SIZE as u64)?;
        let mut entries = IndexMap::with_capacity(capacity);
        for _ in 0..header.entry_count {
            let record = RimEntry::read(&mut reader)?;
            let key = record.key();
            entries.entry(key.clone()).or_insert(ArchiveEntry {
                key,
                offset: record.offset as u64,
                size: record.size as u64,
            });
        }
        drop(reader);

        debug!(resources = entries.len(), "indexed rim");
        Ok(RimArchive { source, entries })
    }

    /// Number of resources in the archive
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the archive holds no resources
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the index in archive order
    pub fn entries(&self) -> impl Iterator<Item = &ArchiveEntry> {
        self.entries.values()
    }

    /// Get a contained resource by index
    pub fn by_index(&self, index: usize) -> Result<ArchiveFile<'_, S::Reader<'_>>> {
        let (_, entry) = self
            .entries
            .get_index(index)
            .ok_or(Error::ResourceNotFound(NotFoundError::Index(index)))?;
        ArchiveFile::new(self.source.open()?, entry)
    }

    /// Unwrap and return the byte source
    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<S: ByteSource> ResourceContainer for RimArchive<S> {
    fn name(&self) -> String {
        self.source.describe()
    }

    fn contains(&self, key: &ResourceKey) -> bool {
        self.entries.contains_key(key)
    }

    fn read(&self, key: &ResourceKey) -> Result<Option<Vec<u8>>> {
        self.entries
            .get(key)
            .map(|entry| read_entry(&self.source, entry))
            .transpose()
    }

    fn keys(&self) -> Vec<ResourceKey> {
        self.entries.keys().cloned().collect()
    }
}

#[cfg(test)]
mod test {
    use aurora_common::{ResourceKey, ResourceType};
    use pretty_assertions::assert_eq;

    use crate::{
        container::ResourceContainer,
        error::{Error, Result},
        rim::RimArchive,
    };

    #[rustfmt::skip]
    fn single_area() -> Vec<u8> {
        let mut input = vec![
            // Header
            0x52, 0x49, 0x4D, 0x20, 0x56, 0x31, 0x2E, 0x30,
            0x00, 0x00, 0x00, 0x00,
            0x01, 0x00, 0x00, 0x00,
            0xA0, 0x00, 0x00, 0x00,
        ];
        input.resize(160, 0);
        input.extend([
            // Entry (32): "tar_m02aa", are, id 0, offset 192, 4 bytes
            0x74, 0x61, 0x72, 0x5F, 0x6D, 0x30, 0x32, 0x61,
            0x61, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0xDC, 0x07, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0xC0, 0x00, 0x00, 0x00,
            0x04, 0x00, 0x00, 0x00,
            // Data
            0x41, 0x52, 0x45, 0x20,
        ]);
        input
    }

    #[test]
    fn read_area() -> Result<()> {
        let rim = RimArchive::new(single_area())?;
        assert_eq!(rim.len(), 1);

        let key = ResourceKey::new("TAR_M02AA", ResourceType::Are);
        assert!(rim.contains(&key));
        assert_eq!(rim.read(&key)?, Some(b"ARE ".to_vec()));
        assert_eq!(rim.by_index(0)?.name(), "tar_m02aa.are");

        Ok(())
    }

    #[test]
    fn invalid_magic() {
        let mut input = single_area();
        input[3] = b'X';
        assert!(matches!(
            RimArchive::new(input),
            Err(Error::InvalidArchive("rim"))
        ));
    }

    #[test]
    fn entry_count_past_the_end_of_the_file() {
        let mut input = single_area();
        input[12..16].copy_from_slice(&u32::MAX.to_le_bytes());
        assert!(matches!(
            RimArchive::new(input),
            Err(Error::BinRWError(_))
        ));
    }
}
