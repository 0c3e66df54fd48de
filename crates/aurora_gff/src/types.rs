//! Base types for the structure of a GFF file.

use binrw::{BinRead, BinWrite};

/// Size of [`GffHeader`] on disk
pub const HEADER_SIZE: u32 = 56;

/// Size of [`StructRecord`] on disk
pub const STRUCT_SIZE: u32 = 12;

/// Size of [`FieldRecord`] on disk
pub const FIELD_SIZE: u32 = 12;

/// Size of one label on disk
pub const LABEL_SIZE: u32 = 16;

/// Location of one of the header's tables
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct Section {
    /// Offset from the start of the file
    pub offset: u32,

    /// Number of entries, or number of bytes for the blob tables
    pub count: u32,
}

/// GFF file header
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct GffHeader {
    /// Four character file type, padded with spaces
    pub file_type: [u8; 4],

    /// Four character version, `V3.2` for every file shipped with the games
    pub version: [u8; 4],

    /// The struct record table
    pub structs: Section,

    /// The field record table
    pub fields: Section,

    /// The label table
    pub labels: Section,

    /// The field data blob
    pub field_data: Section,

    /// The field indices blob
    pub field_indices: Section,

    /// The list indices blob
    pub list_indices: Section,
}

/// A struct record
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct StructRecord {
    /// Programmer defined id of the struct
    pub struct_id: u32,

    /// Field index for single field structs, field indices offset otherwise
    pub data: u32,

    /// Number of fields
    pub field_count: u32,
}

/// A field record
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct FieldRecord {
    /// Field type code
    pub field_type: u32,

    /// Index into the label table
    pub label_index: u32,

    /// Inline value or offset
    pub data: u32,
}

#[cfg(test)]
mod test {
    use binrw::BinRead;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    use crate::error::Result;
    use crate::types::{GffHeader, Section};

    #[test]
    fn read_header() -> Result<()> {
        #[rustfmt::skip]
        let mut input = Cursor::new(vec![
            b'U', b'T', b'C', b' ', b'V', b'3', b'.', b'2',
            0x38, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00,
            0x44, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00,
            0x5C, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00,
            0x7C, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x7C, 0x00, 0x00, 0x00, 0x08, 0x00, 0x00, 0x00,
            0x84, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        ]);

        let expected = GffHeader {
            file_type: *b"UTC ",
            version: *b"V3.2",
            structs: Section { offset: 56, count: 1 },
            fields: Section { offset: 68, count: 2 },
            labels: Section { offset: 92, count: 2 },
            field_data: Section { offset: 124, count: 0 },
            field_indices: Section { offset: 124, count: 8 },
            list_indices: Section { offset: 132, count: 0 },
        };

        assert_eq!(GffHeader::read(&mut input)?, expected);

        Ok(())
    }
}
