//! Types for reading KEY index files and the BIF files they reference
//!

use aurora_common::{cursor::SeekExt, source::find_case_insensitive, ByteSource, ResourceKey};
use binrw::BinRead;
use indexmap::IndexMap;
use std::{
    io::{Read, Seek, SeekFrom},
    path::{Path, PathBuf},
};
use tracing::{debug, instrument, trace, warn};

use crate::{
    bif::BifArchive,
    container::ResourceContainer,
    error::{Error, Result},
    types::{KeyFileRecord, KeyHeader, KeyRecord, DATA_FILE_SHIFT, KEY_ENTRY_SIZE},
};

/// Name of the KEY file at the root of a game installation
pub const CHITIN_KEY: &str = "chitin.key";

/// A data file listed in a KEY file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDataFile {
    /// Path relative to the game root, with `/` separators
    pub file_name: String,

    /// Size of the file in bytes
    pub file_size: u32,

    pub drives: u16,
}

/// A decoded KEY file: the list of BIF files and the id of every resource they hold
#[derive(Debug, Clone, Default)]
pub struct KeyFile {
    header: KeyHeader,
    files: Vec<KeyDataFile>,
    keys: IndexMap<ResourceKey, u32>,
}

impl KeyFile {
    /// Read a KEY file
    #[instrument(skip(reader), err)]
    pub fn read<R: Read + Seek>(mut reader: R) -> Result<KeyFile> {
        let header = KeyHeader::read(&mut reader).map_err(|e| Error::from_header("key", e))?;

        reader.seek(SeekFrom::Start(header.file_table_offset as u64))?;
        let files = (0..header.file_count)
            .map(|_| -> Result<KeyDataFile> {
                let record = KeyFileRecord::read(&mut reader)?;
                let file_name = reader.peek_at(record.name_offset as u64, |r| {
                    r.read_fixed_str(record.name_size as usize)
                })?;
                Ok(KeyDataFile {
                    file_name: file_name.replace('\\', "/"),
                    file_size: record.file_size,
                    drives: record.drives,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        reader.seek(SeekFrom::Start(header.key_table_offset as u64))?;
        let capacity = reader.capacity_for(header.key_count as u64, KEY_ENTRY_SIZE as u64)?;
        let mut keys = IndexMap::with_capacity(capacity);
        for _ in 0..header.key_count {
            let record = KeyRecord::read(&mut reader)?;
            let key = record.key();
            if keys.contains_key(&key) {
                trace!(%key, "duplicate key, keeping the first");
                continue;
            }
            keys.insert(key, record.id);
        }

        debug!(files = files.len(), keys = keys.len(), "indexed key file");
        Ok(KeyFile {
            header,
            files,
            keys,
        })
    }

    pub fn header(&self) -> &KeyHeader {
        &self.header
    }

    /// Data files in index order
    pub fn files(&self) -> &[KeyDataFile] {
        &self.files
    }

    /// Number of resource keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Full resource id of a key
    pub fn resource_id(&self, key: &ResourceKey) -> Option<u32> {
        self.keys.get(key).copied()
    }

    /// Iterate over every key with its resource id
    pub fn iter(&self) -> impl Iterator<Item = (&ResourceKey, u32)> {
        self.keys.iter().map(|(k, id)| (k, *id))
    }
}

/// The primary index of a game installation: `chitin.key` and every BIF it lists
pub struct ChitinIndex<S> {
    key: KeyFile,
    bifs: Vec<BifArchive<S>>,
}

impl ChitinIndex<PathBuf> {
    /// Open `chitin.key` below `root` and every BIF it lists
    ///
    /// File names are matched case-insensitively. A missing or malformed file is an error.
    #[instrument(skip_all, fields(root = %root.display()), err)]
    pub fn open(root: &Path) -> Result<ChitinIndex<PathBuf>> {
        let key_path = find_case_insensitive(root, CHITIN_KEY)
            .ok_or_else(|| Error::MissingFile(root.join(CHITIN_KEY)))?;
        let key = KeyFile::read(PathBuf::open(&key_path)?)?;

        let bifs = key
            .files()
            .iter()
            .map(|file| -> Result<BifArchive<PathBuf>> {
                let path = resolve_relative(root, &file.file_name)
                    .ok_or_else(|| Error::MissingFile(root.join(&file.file_name)))?;
                BifArchive::new(path)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ChitinIndex { key, bifs })
    }
}

impl<S: ByteSource> ChitinIndex<S> {
    /// Combine a decoded KEY file with its BIF files, which must be given in KEY order
    pub fn new(key: KeyFile, bifs: Vec<BifArchive<S>>) -> ChitinIndex<S> {
        ChitinIndex { key, bifs }
    }

    pub fn key_file(&self) -> &KeyFile {
        &self.key
    }

    pub fn bifs(&self) -> &[BifArchive<S>] {
        &self.bifs
    }

    /// Read a resource through the two level id lookup
    ///
    /// The top 12 bits of the id select the BIF, the BIF resolves the rest.
    ///
    /// A key whose record is missing from its BIF reads as absent, so lower layers still get a
    /// chance to provide it.
    pub fn read_key(&self, key: &ResourceKey) -> Result<Option<Vec<u8>>> {
        let Some(id) = self.key.resource_id(key) else {
            return Ok(None);
        };

        let index = (id >> DATA_FILE_SHIFT) as usize;
        let bif = self.bifs.get(index).ok_or(Error::DataFileOutOfRange {
            id,
            index,
            count: self.bifs.len(),
        })?;

        let Ok(record) = bif.by_id(id) else {
            warn!(%key, id, bif = index, "listed in the key file but missing from its bif");
            return Ok(None);
        };

        trace!(%key, id, bif = index, "resolved through key file");
        bif.read(record).map(Some)
    }
}

impl<S: ByteSource> ResourceContainer for ChitinIndex<S> {
    fn name(&self) -> String {
        CHITIN_KEY.to_owned()
    }

    fn contains(&self, key: &ResourceKey) -> bool {
        self.key.resource_id(key).is_some_and(|id| {
            self.bifs
                .get((id >> DATA_FILE_SHIFT) as usize)
                .is_some_and(|bif| bif.by_id(id).is_ok())
        })
    }

    fn read(&self, key: &ResourceKey) -> Result<Option<Vec<u8>>> {
        self.read_key(key)
    }

    fn keys(&self) -> Vec<ResourceKey> {
        self.key.keys.keys().cloned().collect()
    }
}

/// Resolve a `/` separated relative path below `root`, matching every component ignoring case
fn resolve_relative(root: &Path, relative: &str) -> Option<PathBuf> {
    relative
        .split('/')
        .filter(|part| !part.is_empty())
        .try_fold(root.to_path_buf(), |dir, part| {
            find_case_insensitive(&dir, part)
        })
}

#[cfg(test)]
mod test {
    use aurora_common::{ResourceKey, ResourceType};
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    use crate::{
        error::{Error, Result},
        key::KeyFile,
    };

    #[rustfmt::skip]
    fn two_tables() -> Vec<u8> {
        vec![
            // Header (32)
            0x4B, 0x45, 0x59, 0x20, 0x56, 0x31, 0x20, 0x20,
            0x01, 0x00, 0x00, 0x00,
            0x02, 0x00, 0x00, 0x00,
            0x20, 0x00, 0x00, 0x00,
            0x3B, 0x00, 0x00, 0x00,
            0x67, 0x00, 0x00, 0x00,
            0x2A, 0x00, 0x00, 0x00,
            // File table (12): size 1024, name at 44, 15 bytes
            0x00, 0x04, 0x00, 0x00,
            0x2C, 0x00, 0x00, 0x00,
            0x0F, 0x00,
            0x01, 0x00,
            // Name (15) "data\2da.bif"
            0x64, 0x61, 0x74, 0x61, 0x5C, 0x32, 0x64, 0x61,
            0x2E, 0x62, 0x69, 0x66, 0x00, 0x00, 0x00,
            // Key table (44)
            0x41, 0x70, 0x70, 0x65, 0x61, 0x72, 0x61, 0x6E,
            0x63, 0x65, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0xE1, 0x07,
            0x00, 0x00, 0x00, 0x00,
            0x70, 0x6F, 0x72, 0x74, 0x72, 0x61, 0x69, 0x74,
            0x73, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0xE1, 0x07,
            0x01, 0x00, 0x00, 0x00,
        ]
    }

    #[test]
    fn read_key_file() -> Result<()> {
        let key = KeyFile::read(Cursor::new(two_tables()))?;
        assert_eq!(key.header().build_year, 103);
        assert_eq!(key.files().len(), 1);
        assert_eq!(key.files()[0].file_name, "data/2da.bif");
        assert_eq!(key.files()[0].file_size, 1024);
        assert_eq!(key.len(), 2);
        assert_eq!(
            key.resource_id(&ResourceKey::new("APPEARANCE", ResourceType::TwoDa)),
            Some(0)
        );
        assert_eq!(
            key.resource_id(&ResourceKey::new("portraits", ResourceType::TwoDa)),
            Some(1)
        );
        assert_eq!(
            key.resource_id(&ResourceKey::new("portraits", ResourceType::Utc)),
            None
        );

        Ok(())
    }

    #[test]
    fn key_count_past_the_end_of_the_file() {
        let mut input = two_tables();
        input[12..16].copy_from_slice(&u32::MAX.to_le_bytes());
        assert!(matches!(
            KeyFile::read(Cursor::new(input)),
            Err(Error::BinRWError(_))
        ));
    }
}
