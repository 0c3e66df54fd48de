//! Base types for the on-disk structure of the archive formats.

use aurora_common::{ResRef, ResourceKey, ResourceType};
use binrw::{BinRead, BinWrite};

/// Size of the fixed BIF header
pub const BIF_HEADER_SIZE: u32 = 20;
/// Size of one BIF variable resource record
pub const BIF_RECORD_SIZE: u32 = 16;
/// Size of the fixed KEY header
pub const KEY_HEADER_SIZE: u32 = 32;
/// Size of one KEY data file record
pub const KEY_FILE_SIZE: u32 = 12;
/// Size of one KEY resource record
pub const KEY_ENTRY_SIZE: u32 = 22;
/// Size of the ERF and RIM headers
pub const ERF_HEADER_SIZE: u32 = 160;
/// Size of one ERF key record
pub const ERF_KEY_SIZE: u32 = 24;
/// Size of one ERF resource record
pub const ERF_RESOURCE_SIZE: u32 = 8;
/// Size of one RIM entry
pub const RIM_ENTRY_SIZE: u32 = 32;

/// Bits of a KEY resource id that address the resource inside its BIF
pub const LOCAL_ID_MASK: u32 = 0x000F_FFFF;
/// Shift that moves the data file index of a KEY resource id into the low bits
pub const DATA_FILE_SHIFT: u32 = 20;

/// BIF file header
///
/// Always starts with `BIFF` followed by the version `V1  `.
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq)]
#[brw(magic = b"BIFFV1  ", little)]
pub struct BifHeader {
    /// Number of variable sized resources
    pub variable_count: u32,

    /// Number of fixed sized resources, unused by the games
    pub fixed_count: u32,

    /// Offset of the variable resource table from the start of the file
    pub variable_table_offset: u32,
}

/// BIF variable resource record
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq)]
#[brw(little)]
pub struct BifRecord {
    /// Resource id; the low 20 bits are the index inside the BIF
    pub id: u32,

    /// Offset of the data from the start of the file
    pub offset: u32,

    /// Size of the data in bytes
    pub size: u32,

    /// Resource type code
    pub restype: u32,
}

impl BifRecord {
    /// Index of the resource inside its BIF
    pub fn local_id(&self) -> u32 {
        self.id & LOCAL_ID_MASK
    }

    pub fn resource_type(&self) -> ResourceType {
        ResourceType::from(self.restype as u16)
    }
}

/// KEY file header
///
/// Always starts with `KEY ` followed by the version `V1  `.
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq)]
#[brw(magic = b"KEY V1  ", little)]
pub struct KeyHeader {
    /// Number of data files listed
    pub file_count: u32,

    /// Number of resource records
    pub key_count: u32,

    /// Offset of the data file table
    pub file_table_offset: u32,

    /// Offset of the resource table
    pub key_table_offset: u32,

    /// Years since 1900
    pub build_year: u32,

    /// Days since January 1st
    pub build_day: u32,
}

/// KEY data file record
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq)]
#[brw(little)]
pub struct KeyFileRecord {
    /// Size of the data file in bytes
    pub file_size: u32,

    /// Offset of the file name from the start of the KEY file
    pub name_offset: u32,

    /// Length of the file name, including any trailing null
    pub name_size: u16,

    /// Bit field of the media the file is installed on
    pub drives: u16,
}

/// KEY resource record
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq)]
#[brw(little)]
pub struct KeyRecord {
    pub resref: [u8; 16],
    pub restype: u16,

    /// Data file index in the top 12 bits, index inside that file in the low 20
    pub id: u32,
}

impl KeyRecord {
    pub fn key(&self) -> ResourceKey {
        ResourceKey::new(ResRef::from_bytes(&self.resref), self.restype.into())
    }

    /// Index of the data file holding the resource
    pub fn data_file(&self) -> usize {
        (self.id >> DATA_FILE_SHIFT) as usize
    }
}

/// ERF (and MOD/SAV/HAK) file header
#[derive(BinRead, BinWrite, Debug, Copy, Clone, PartialEq)]
#[brw(little)]
pub struct ErfHeader {
    /// `ERF `, `MOD `, `SAV ` or `HAK `
    pub file_type: [u8; 4],

    /// `V1.0`
    pub version: [u8; 4],

    /// Number of localized descriptions
    pub language_count: u32,

    /// Total size of the localized description block
    pub localized_string_size: u32,

    pub entry_count: u32,
    pub localized_string_offset: u32,
    pub key_list_offset: u32,
    pub resource_list_offset: u32,

    /// Years since 1900
    pub build_year: u32,

    /// Days since January 1st
    pub build_day: u32,

    /// Talk table reference of the description, `0xFFFFFFFF` for none
    #[brw(pad_after = 116)]
    pub description_strref: u32,
}

impl Default for ErfHeader {
    fn default() -> Self {
        Self {
            file_type: *b"ERF ",
            version: *b"V1.0",
            language_count: 0,
            localized_string_size: 0,
            entry_count: 0,
            localized_string_offset: ERF_HEADER_SIZE,
            key_list_offset: ERF_HEADER_SIZE,
            resource_list_offset: ERF_HEADER_SIZE,
            build_year: 0,
            build_day: 0,
            description_strref: u32::MAX,
        }
    }
}

/// ERF key record
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq)]
#[brw(little)]
pub struct ErfKey {
    pub resref: [u8; 16],

    /// Index into the resource list
    pub resource_id: u32,

    #[brw(pad_after = 2)]
    pub restype: u16,
}

impl ErfKey {
    pub fn key(&self) -> ResourceKey {
        ResourceKey::new(ResRef::from_bytes(&self.resref), self.restype.into())
    }
}

/// ERF resource record
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq)]
#[brw(little)]
pub struct ErfResource {
    pub offset: u32,
    pub size: u32,
}

/// Prefix of one localized description in an ERF
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq)]
#[brw(little)]
pub struct ErfStringHeader {
    pub language_id: u32,
    pub size: u32,
}

/// RIM file header
///
/// Always starts with `RIM ` followed by the version `V1.0`.
#[derive(BinRead, BinWrite, Debug, Copy, Clone, PartialEq)]
#[brw(magic = b"RIM V1.0", little)]
pub struct RimHeader {
    pub unknown: u32,
    pub entry_count: u32,

    /// Offset of the entry table from the start of the file
    #[brw(pad_after = 140)]
    pub entry_offset: u32,
}

impl Default for RimHeader {
    fn default() -> Self {
        Self {
            unknown: 0,
            entry_count: 0,
            entry_offset: ERF_HEADER_SIZE,
        }
    }
}

/// RIM entry
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq)]
#[brw(little)]
pub struct RimEntry {
    pub resref: [u8; 16],

    #[brw(pad_after = 2)]
    pub restype: u16,

    pub id: u32,
    pub offset: u32,
    pub size: u32,
}

impl RimEntry {
    pub fn key(&self) -> ResourceKey {
        ResourceKey::new(ResRef::from_bytes(&self.resref), self.restype.into())
    }
}

#[cfg(test)]
mod test {
    use aurora_common::{ResourceKey, ResourceType};
    use binrw::{BinRead, BinWrite};
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    use crate::error::Result;
    use crate::types::{
        BifHeader, BifRecord, ErfHeader, ErfKey, KeyHeader, KeyRecord, RimEntry, RimHeader,
        BIF_HEADER_SIZE, ERF_HEADER_SIZE, ERF_KEY_SIZE, KEY_ENTRY_SIZE, KEY_HEADER_SIZE,
        RIM_ENTRY_SIZE,
    };

    fn encoded_len<T>(record: &T) -> Result<u32>
    where
        T: BinWrite,
        for<'a> T::Args<'a>: Default,
    {
        let mut out = Cursor::new(Vec::new());
        record.write_le(&mut out)?;
        Ok(out.into_inner().len() as u32)
    }

    #[test]
    fn record_sizes() -> Result<()> {
        assert_eq!(encoded_len(&BifHeader::default())?, BIF_HEADER_SIZE);
        assert_eq!(encoded_len(&KeyHeader::default())?, KEY_HEADER_SIZE);
        assert_eq!(encoded_len(&KeyRecord::default())?, KEY_ENTRY_SIZE);
        assert_eq!(encoded_len(&ErfHeader::default())?, ERF_HEADER_SIZE);
        assert_eq!(encoded_len(&ErfKey::default())?, ERF_KEY_SIZE);
        assert_eq!(encoded_len(&RimHeader::default())?, ERF_HEADER_SIZE);
        assert_eq!(encoded_len(&RimEntry::default())?, RIM_ENTRY_SIZE);
        Ok(())
    }

    #[test]
    fn read_bif_header() -> Result<()> {
        #[rustfmt::skip]
        let mut input = Cursor::new(vec![
            0x42, 0x49, 0x46, 0x46, 0x56, 0x31, 0x20, 0x20,
            0x01, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x14, 0x00, 0x00, 0x00,
        ]);

        let expected = BifHeader {
            variable_count: 1,
            fixed_count: 0,
            variable_table_offset: 20,
        };

        assert_eq!(BifHeader::read(&mut input)?, expected);

        Ok(())
    }

    #[test]
    fn read_bif_header_with_bad_magic() {
        #[rustfmt::skip]
        let mut input = Cursor::new(vec![
            0x42, 0x49, 0x46, 0x46, 0x56, 0x32, 0x20, 0x20,
            0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x14, 0x00, 0x00, 0x00,
        ]);

        assert!(BifHeader::read(&mut input).is_err());
    }

    #[test]
    fn key_record_splits_id() -> Result<()> {
        #[rustfmt::skip]
        let mut input = Cursor::new(vec![
            // resref
            0x41, 0x70, 0x70, 0x65, 0x61, 0x72, 0x61, 0x6E,
            0x63, 0x65, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            // restype 2017
            0xE1, 0x07,
            // id: data file 3, local index 7
            0x07, 0x00, 0x30, 0x00,
        ]);

        let record = KeyRecord::read(&mut input)?;
        assert_eq!(record.data_file(), 3);
        assert_eq!(record.id & 0xFFFFF, 7);
        assert_eq!(
            record.key(),
            ResourceKey::new("appearance", ResourceType::TwoDa)
        );

        Ok(())
    }

    #[test]
    fn bif_record_local_id() {
        let record = BifRecord {
            id: (2 << 20) | 5,
            offset: 20,
            size: 8,
            restype: 2002,
        };
        assert_eq!(record.local_id(), 5);
        assert_eq!(record.resource_type(), ResourceType::Mdl);
    }
}
