//! Types for reading ERF archives
//!
//! The same layout is used for `.erf`, `.mod`, `.sav` and `.hak` files; only the file type in
//! the header differs.

use aurora_common::{cursor::SeekExt, ByteSource, ResourceKey};
use binrw::BinRead;
use indexmap::IndexMap;
use std::io::{Read, Seek, SeekFrom};
use tracing::{debug, instrument, trace};

use crate::{
    container::{read_entry, ArchiveEntry, ArchiveFile, ResourceContainer},
    error::{Error, NotFoundError, Result},
    types::{ErfHeader, ErfKey, ErfResource, ErfStringHeader, ERF_KEY_SIZE},
};

/// File types accepted in the ERF header
pub const ERF_FILE_TYPES: [&[u8; 4]; 4] = [b"ERF ", b"MOD ", b"SAV ", b"HAK "];

/// A localized description of an archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErfDescription {
    /// Language id of the text
    pub language: u32,
    pub text: String,
}

/// ERF archive reader
///
/// ```no_run
/// use aurora_common::{ResourceKey, ResourceType};
/// use std::path::PathBuf;
///
/// fn load_icon() -> aurora_archive::error::Result<Vec<u8>> {
///     let erf = aurora_archive::ErfArchive::new(PathBuf::from("TexturePacks/swpc_tex_gui.erf"))?;
///     let mut file = erf.by_key(&ResourceKey::new("lbl_miscroll", ResourceType::Tpc))?;
///
///     let mut data = Vec::new();
///     std::io::copy(&mut file, &mut data)?;
///     Ok(data)
/// }
/// ```
pub struct ErfArchive<S> {
    source: S,
    header: ErfHeader,
    descriptions: Vec<ErfDescription>,
    entries: IndexMap<ResourceKey, ArchiveEntry>,
}

impl<S: ByteSource> ErfArchive<S> {
    /// Read the index of an ERF archive
    #[instrument(skip_all, fields(source = %source.describe()), err)]
    pub fn new(source: S) -> Result<ErfArchive<S>> {
        let mut reader = source.open()?;
        let (header, descriptions, entries) = Self::get_metadata(&mut reader)?;
        drop(reader);

        debug!(resources = entries.len(), "indexed erf");
        Ok(ErfArchive {
            source,
            header,
            descriptions,
            entries,
        })
    }

    fn get_metadata<R: Read + Seek>(
        reader: &mut R,
    ) -> Result<(ErfHeader, Vec<ErfDescription>, IndexMap<ResourceKey, ArchiveEntry>)> {
        let header = ErfHeader::read(reader)?;
        if !ERF_FILE_TYPES.contains(&&header.file_type) {
            return Err(Error::InvalidArchive("erf"));
        }
        if &header.version != b"V1.0" {
            return Err(Error::UnsupportedVersion {
                kind: "erf",
                version: String::from_utf8_lossy(&header.version).into_owned(),
            });
        }

        reader.seek(SeekFrom::Start(header.localized_string_offset as u64))?;
        let descriptions = (0..header.language_count)
            .map(|_| -> Result<ErfDescription> {
                let prefix = ErfStringHeader::read(reader)?;
                let text = reader.read_bytes(prefix.size as usize)?;
                Ok(ErfDescription {
                    language: prefix.language_id,
                    text: String::from_utf8_lossy(&text)
                        .trim_end_matches('\0')
                        .to_owned(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let resources = reader.peek_at(header.resource_list_offset as u64, |r| {
            (0..header.entry_count)
                .map(|_| ErfResource::read(r))
                .collect::<binrw::BinResult<Vec<_>>>()
        })?;

        reader.seek(SeekFrom::Start(header.key_list_offset as u64))?;
        let capacity = reader.capacity_for(header.entry_count as u64, ERF_KEY_SIZE as u64)?;
        let mut entries = IndexMap::with_capacity(capacity);
        for _ in 0..header.entry_count {
            let record = ErfKey::read(reader)?;
            let key = record.key();
            let resource = resources
                .get(record.resource_id as usize)
                .ok_or(Error::ResourceNotFound(NotFoundError::Index(
                    record.resource_id as usize,
                )))?;
            if entries.contains_key(&key) {
                trace!(%key, "duplicate key, keeping the first");
                continue;
            }
            entries.insert(
                key.clone(),
                ArchiveEntry {
                    key,
                    offset: resource.offset as u64,
                    size: resource.size as u64,
                },
            );
        }

        Ok((header, descriptions, entries))
    }

    /// Number of resources in the archive
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the archive holds no resources
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn header(&self) -> &ErfHeader {
        &self.header
    }

    /// The four character file type with trailing spaces removed, e.g. `MOD`
    pub fn file_type(&self) -> String {
        String::from_utf8_lossy(&self.header.file_type)
            .trim_end()
            .to_owned()
    }

    /// Localized descriptions of the archive
    pub fn descriptions(&self) -> &[ErfDescription] {
        &self.descriptions
    }

    /// Iterate over the index in archive order
    pub fn entries(&self) -> impl Iterator<Item = &ArchiveEntry> {
        self.entries.values()
    }

    /// Get the index of a resource, if it's present
    #[inline(always)]
    pub fn index_for_key(&self, key: &ResourceKey) -> Option<usize> {
        self.entries.get_index_of(key)
    }

    /// Search for a resource by key
    pub fn by_key(&self, key: &ResourceKey) -> Result<ArchiveFile<'_, S::Reader<'_>>> {
        let Some(index) = self.index_for_key(key) else {
            return Err(Error::ResourceNotFound(NotFoundError::Key(key.clone())));
        };
        self.by_index(index)
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

impl<S: ByteSource> ResourceContainer for ErfArchive<S> {
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
