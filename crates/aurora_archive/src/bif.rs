//! Types for reading BIF data files
//!

use aurora_common::{cursor::SeekExt, ByteSource, ResourceKey, ResourceType};
use binrw::BinRead;
use indexmap::IndexMap;
use std::io::{Seek, SeekFrom};
use tracing::{debug, instrument};

use crate::{
    container::{read_entry, ArchiveEntry, ArchiveFile},
    error::{Error, NotFoundError, Result},
    types::{BifHeader, BifRecord, BIF_RECORD_SIZE, LOCAL_ID_MASK},
};

/// BIF data file reader
///
/// BIF files carry no names; their resources are addressed by the ids stored in the KEY file.
/// Only the index is kept in memory, every read opens a new handle on the source.
///
/// ```no_run
/// use std::path::PathBuf;
///
/// fn first_model() -> aurora_archive::error::Result<Vec<u8>> {
///     let bif = aurora_archive::BifArchive::new(PathBuf::from("data/models.bif"))?;
///     let record = *bif.by_id(0)?;
///     bif.read(&record)
/// }
/// ```
pub struct BifArchive<S> {
    source: S,
    header: BifHeader,
    records: IndexMap<u32, BifRecord>,
}

impl<S: ByteSource> BifArchive<S> {
    /// Read the resource table of a BIF file
    #[instrument(skip_all, fields(source = %source.describe()), err)]
    pub fn new(source: S) -> Result<BifArchive<S>> {
        let mut reader = source.open()?;
        let header = BifHeader::read(&mut reader).map_err(|e| Error::from_header("bif", e))?;

        reader.seek(SeekFrom::Start(header.variable_table_offset as u64))?;
        let capacity = reader.capacity_for(header.variable_count as u64, BIF_RECORD_SIZE as u64)?;
        let mut records = IndexMap::with_capacity(capacity);
        for _ in 0..header.variable_count {
            let record = BifRecord::read(&mut reader)?;
            records.insert(record.local_id(), record);
        }
        drop(reader);

        debug!(resources = records.len(), "indexed bif");
        Ok(BifArchive {
            source,
            header,
            records,
        })
    }

    /// Number of variable resources in the file
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the file holds no resources
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn header(&self) -> &BifHeader {
        &self.header
    }

    /// Iterate over the resource records in table order
    pub fn records(&self) -> impl Iterator<Item = &BifRecord> {
        self.records.values()
    }

    /// Find a resource record by id
    ///
    /// Only the low 20 bits are compared, so both the full id from a KEY file and the bare index
    /// inside the BIF are accepted.
    pub fn by_id(&self, id: u32) -> Result<&BifRecord> {
        self.records
            .get(&(id & LOCAL_ID_MASK))
            .ok_or(Error::ResourceNotFound(NotFoundError::Id(id)))
    }

    /// Every resource record of the given type
    pub fn by_type(&self, restype: ResourceType) -> Vec<&BifRecord> {
        self.records
            .values()
            .filter(|r| r.resource_type() == restype)
            .collect()
    }

    /// Read the data of a resource
    pub fn read(&self, record: &BifRecord) -> Result<Vec<u8>> {
        read_entry(&self.source, &Self::entry(record))
    }

    /// Open a resource for streaming
    ///
    /// The returned file owns its handle on the source.
    pub fn open<'a>(&'a self, entry: &'a ArchiveEntry) -> Result<ArchiveFile<'a, S::Reader<'a>>> {
        ArchiveFile::new(self.source.open()?, entry)
    }

    /// Location of a record as an archive entry; BIFs store no names, so the key is the local id
    pub fn entry(record: &BifRecord) -> ArchiveEntry {
        ArchiveEntry {
            key: ResourceKey::new(record.local_id().to_string(), record.resource_type()),
            offset: record.offset as u64,
            size: record.size as u64,
        }
    }

    /// Unwrap and return the byte source
    pub fn into_inner(self) -> S {
        self.source
    }
}

#[cfg(test)]
mod test {
    use aurora_common::ResourceType;
    use pretty_assertions::assert_eq;

    use crate::{
        bif::BifArchive,
        error::{Error, NotFoundError, Result},
    };

    #[rustfmt::skip]
    fn single_model() -> Vec<u8> {
        vec![
            // Header (20)
            0x42, 0x49, 0x46, 0x46, 0x56, 0x31, 0x20, 0x20,
            0x01, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x14, 0x00, 0x00, 0x00,
            // Record (16): id 5, offset 36, size 8, type 2002
            0x05, 0x00, 0x00, 0x00,
            0x24, 0x00, 0x00, 0x00,
            0x08, 0x00, 0x00, 0x00,
            0xD2, 0x07, 0x00, 0x00,
            // Data (8)
            0x62, 0x69, 0x6E, 0x61, 0x72, 0x79, 0x00, 0x00,
        ]
    }

    #[test]
    fn lookup_by_id() -> Result<()> {
        let bif = BifArchive::new(single_model())?;
        assert_eq!(bif.len(), 1);

        let record = *bif.by_id(5)?;
        assert_eq!(record.offset, 36);
        assert_eq!(record.size, 8);
        assert_eq!(record.resource_type(), ResourceType::Mdl);
        assert_eq!(bif.read(&record)?, b"binary\0\0");

        assert!(matches!(
            bif.by_id(6),
            Err(Error::ResourceNotFound(NotFoundError::Id(6)))
        ));

        Ok(())
    }

    #[test]
    fn key_ids_match_on_local_index() -> Result<()> {
        let bif = BifArchive::new(single_model())?;
        assert_eq!(bif.by_id((7 << 20) | 5)?.id, 5);
        assert_eq!(bif.by_type(ResourceType::Mdl).len(), 1);
        assert!(bif.by_type(ResourceType::Tpc).is_empty());
        Ok(())
    }

    #[test]
    fn invalid_magic() {
        let mut input = single_model();
        input[0] = b'X';
        assert!(matches!(
            BifArchive::new(input),
            Err(Error::InvalidArchive("bif"))
        ));
    }

    #[test]
    fn record_count_past_the_end_of_the_file() {
        let mut input = single_model();
        input[8..12].copy_from_slice(&u32::MAX.to_le_bytes());
        assert!(matches!(
            BifArchive::new(input),
            Err(Error::BinRWError(_))
        ));
    }
}
