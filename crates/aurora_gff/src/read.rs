//! Types for reading GFF files
//!

use aurora_common::{coords::remap_position, cursor::SeekExt, ResRef};
use binrw::BinRead;
use byteorder::{LittleEndian, ReadBytesExt};
use derive_more::derive::Deref;
use glam::Quat;
use indexmap::IndexMap;
use std::io::{Read, Seek};
use tracing::{instrument, warn};

use crate::{
    error::{Error, Result},
    node::{FieldType, GffNode, GffValue, LocString, LocalizedString},
    types::{FieldRecord, GffHeader, StructRecord, FIELD_SIZE, LABEL_SIZE, STRUCT_SIZE},
};

/// Deepest struct nesting accepted before the file is considered corrupt
pub const MAX_DEPTH: usize = 64;

/// A decoded GFF file
///
/// Dereferences to its root struct node.
#[derive(Deref, Debug, Clone, PartialEq)]
pub struct Gff {
    /// Four character file type with trailing spaces removed, e.g. `UTC`
    pub file_type: String,

    /// Four character version, e.g. `V3.2`
    pub version: String,

    /// The root struct
    #[deref]
    pub root: GffNode,
}

impl Gff {
    /// Decode a complete GFF file
    ///
    /// ```no_run
    /// use std::fs::File;
    ///
    /// fn entry_area() -> aurora_gff::error::Result<String> {
    ///     let ifo = aurora_gff::Gff::read(File::open("module.ifo")?)?;
    ///     Ok(ifo.get("Mod_Entry_Area")?.as_resref()?.to_string())
    /// }
    /// ```
    pub fn read<R: Read + Seek>(reader: R) -> Result<Gff> {
        let mut reader = GffReader::new(reader)?;
        let root = reader.read_root()?;
        Ok(Gff {
            file_type: reader.file_type(),
            version: reader.version(),
            root,
        })
    }

    /// Consume the file, returning the root struct
    pub fn into_root(self) -> GffNode {
        self.root
    }
}

/// GFF file reader
///
/// Every table access seeks to the absolute position of the record and returns to the previous
/// position afterwards, so structs, fields and lists may appear in any order in the file.
pub struct GffReader<R> {
    reader: R,
    header: GffHeader,
}

impl<R: Read + Seek> GffReader<R> {
    /// Read and validate the header
    #[instrument(skip(reader), err)]
    pub fn new(mut reader: R) -> Result<GffReader<R>> {
        let header = GffHeader::read(&mut reader)?;
        if !header.version.starts_with(b"V3.") {
            return Err(Error::UnsupportedVersion(
                String::from_utf8_lossy(&header.version).into_owned(),
            ));
        }

        Ok(GffReader { reader, header })
    }

    /// The parsed header
    pub fn header(&self) -> &GffHeader {
        &self.header
    }

    /// File type with trailing spaces removed
    pub fn file_type(&self) -> String {
        String::from_utf8_lossy(&self.header.file_type)
            .trim_end()
            .to_owned()
    }

    /// File version
    pub fn version(&self) -> String {
        String::from_utf8_lossy(&self.header.version).into_owned()
    }

    /// Decode the whole tree starting at the first struct
    #[instrument(skip(self), err)]
    pub fn read_root(&mut self) -> Result<GffNode> {
        self.read_struct(0, 0)
    }

    /// Unwrap and return the inner reader object
    pub fn into_inner(self) -> R {
        self.reader
    }

    fn read_struct(&mut self, index: u32, depth: usize) -> Result<GffNode> {
        if depth >= MAX_DEPTH {
            return Err(Error::RecursionLimit(MAX_DEPTH));
        }

        let position = self.header.structs.offset as u64 + STRUCT_SIZE as u64 * index as u64;
        let record = self
            .reader
            .peek_at(position, |r| StructRecord::read(r).map_err(Error::from))?;

        let field_indices = match record.field_count {
            0 => Vec::new(),
            1 => vec![record.data],
            count => {
                let position = self.header.field_indices.offset as u64 + record.data as u64;
                self.reader.peek_at(position, |r| {
                    (0..count)
                        .map(|_| r.read_u32::<LittleEndian>().map_err(Error::from))
                        .collect::<Result<Vec<_>>>()
                })?
            }
        };

        let mut fields = IndexMap::with_capacity(field_indices.len());
        for field_index in field_indices {
            let field = self.read_field(field_index, depth)?;
            let label = field.label().unwrap_or_default().to_owned();
            if fields.insert(label.clone(), field).is_some() {
                warn!(
                    label = %label,
                    struct_index = index,
                    "duplicate field label, keeping the last"
                );
            }
        }

        Ok(GffNode::from_fields(record.struct_id, fields))
    }

    fn read_label(&mut self, index: u32) -> Result<String> {
        let position = self.header.labels.offset as u64 + LABEL_SIZE as u64 * index as u64;
        Ok(self
            .reader
            .peek_at(position, |r| r.read_fixed_str(LABEL_SIZE as usize))?)
    }

    fn read_field(&mut self, index: u32, depth: usize) -> Result<GffNode> {
        let position = self.header.fields.offset as u64 + FIELD_SIZE as u64 * index as u64;
        let record = self
            .reader
            .peek_at(position, |r| FieldRecord::read(r).map_err(Error::from))?;

        let label = self.read_label(record.label_index)?;
        let data = record.data;

        let value = match FieldType::from(record.field_type) {
            FieldType::Byte => GffValue::Byte(data as u8),
            FieldType::Char => GffValue::Char(data as u8 as i8),
            FieldType::Word => GffValue::Word(data as u16),
            FieldType::Short => GffValue::Short(data as u16 as i16),
            FieldType::DWord => GffValue::DWord(data),
            FieldType::Int => GffValue::Int(data as i32),
            FieldType::Float => GffValue::Float(f32::from_bits(data)),
            FieldType::DWord64 => {
                GffValue::DWord64(self.peek_data(data, |r| r.read_u64::<LittleEndian>())?)
            }
            FieldType::Int64 => {
                GffValue::Int64(self.peek_data(data, |r| r.read_i64::<LittleEndian>())?)
            }
            FieldType::Double => {
                GffValue::Double(self.peek_data(data, |r| r.read_f64::<LittleEndian>())?)
            }
            FieldType::CExoString => GffValue::String(self.peek_data(data, |r| {
                let length = r.read_u32::<LittleEndian>()? as usize;
                let raw = r.read_bytes(length)?;
                Ok(String::from_utf8_lossy(&raw).into_owned())
            })?),
            FieldType::ResRef => GffValue::ResRef(self.peek_data(data, |r| {
                let length = r.read_u8()? as usize;
                let raw = r.read_bytes(length)?;
                Ok(ResRef::new(String::from_utf8_lossy(&raw)))
            })?),
            FieldType::CExoLocString => {
                GffValue::LocString(self.peek_data(data, read_loc_string)?)
            }
            FieldType::Void => GffValue::Void(self.peek_data(data, |r| {
                let length = r.read_u32::<LittleEndian>()? as usize;
                r.read_bytes(length)
            })?),
            FieldType::Struct => {
                let node = self.read_struct(data, depth + 1)?;
                return Ok(node.with_label(Some(label)));
            }
            FieldType::List => GffValue::List(self.read_list(data, depth + 1)?),
            FieldType::Quaternion => GffValue::Quaternion(self.peek_data(data, |r| {
                let raw = r.read_f32_array(4)?;
                Ok(Quat::from_xyzw(raw[0], raw[1], raw[2], raw[3]))
            })?),
            FieldType::Vector3 => {
                GffValue::Vector(remap_position(self.peek_data(data, |r| r.read_vec3())?))
            }
            FieldType::Unknown(code) => {
                warn!(label = %label, code, "unknown gff field type");
                return Ok(GffNode::unknown(Some(label), code));
            }
        };

        Ok(GffNode::labeled(label, value))
    }

    fn peek_data<T, F>(&mut self, offset: u32, f: F) -> Result<T>
    where
        F: FnOnce(&mut R) -> std::io::Result<T>,
    {
        let position = self.header.field_data.offset as u64 + offset as u64;
        Ok(self.reader.peek_at(position, f)?)
    }

    fn read_list(&mut self, offset: u32, depth: usize) -> Result<Vec<GffNode>> {
        if depth >= MAX_DEPTH {
            return Err(Error::RecursionLimit(MAX_DEPTH));
        }

        let position = self.header.list_indices.offset as u64 + offset as u64;
        let indices = self.reader.peek_at(position, |r| {
            let count = r.read_u32::<LittleEndian>()?;
            (0..count)
                .map(|_| r.read_u32::<LittleEndian>())
                .collect::<std::io::Result<Vec<_>>>()
        })?;

        indices
            .into_iter()
            .map(|index| self.read_struct(index, depth))
            .collect()
    }
}

fn read_loc_string<R: Read + Seek>(reader: &mut R) -> std::io::Result<LocString> {
    // total size of the record
    reader.read_u32::<LittleEndian>()?;
    let string_ref = reader.read_u32::<LittleEndian>()?;
    let count = reader.read_u32::<LittleEndian>()?;

    let mut strings = Vec::new();
    for _ in 0..count {
        let id = reader.read_u32::<LittleEndian>()?;
        let length = reader.read_u32::<LittleEndian>()? as usize;
        let raw = reader.read_bytes(length)?;
        strings.push(LocalizedString::from_id(
            id,
            String::from_utf8_lossy(&raw).into_owned(),
        ));
    }

    Ok(LocString {
        string_ref: (string_ref != LocString::NO_STRING_REF).then_some(string_ref),
        strings,
    })
}

#[cfg(test)]
mod test {
    use glam::{Quat, Vec3};
    use pretty_assertions::assert_eq;
    use std::io::Cursor;
    use tracing_test::traced_test;

    use crate::{
        error::{Error, Result},
        node::{FieldType, Gender, GffValue, Language},
        read::Gff,
    };

    /// Root struct with a single list field holding two empty structs
    fn list_of_two() -> Vec<u8> {
        #[rustfmt::skip]
        let input = vec![
            // Header
            b'G', b'F', b'F', b' ', b'V', b'3', b'.', b'2',
            0x38, 0x00, 0x00, 0x00, 0x03, 0x00, 0x00, 0x00, // structs @56 x3
            0x5C, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, // fields @92 x1
            0x68, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, // labels @104 x1
            0x78, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // field data @120
            0x78, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // field indices @120
            0x78, 0x00, 0x00, 0x00, 0x0C, 0x00, 0x00, 0x00, // list indices @120
            // Structs
            0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00,
            0x0A, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x0B, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            // Fields
            0x0F, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            // Labels
            b'I', b't', b'e', b'm', b'L', b'i', b's', b't',
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            // List indices
            0x02, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00,
        ];
        input
    }

    #[traced_test]
    #[test]
    fn read_list_of_structs() -> Result<()> {
        let gff = Gff::read(Cursor::new(list_of_two()))?;

        assert_eq!(gff.file_type, "GFF");
        assert_eq!(gff.field_type(), FieldType::Struct);
        assert_eq!(gff.struct_id(), Some(0xFFFF_FFFF));

        let list = gff.get("ItemList")?;
        assert_eq!(list.field_type(), FieldType::List);
        assert_eq!(list.len()?, 2);
        assert_eq!(list.at(0)?.struct_id(), Some(10));
        assert_eq!(list.at(1)?.struct_id(), Some(11));
        assert_eq!(list.at(0)?.label(), None);
        assert!(matches!(list.get("0"), Err(Error::TypeMismatch { .. })));
        assert!(matches!(gff.at(0), Err(Error::TypeMismatch { .. })));

        Ok(())
    }

    #[test]
    fn decoding_is_deterministic() -> Result<()> {
        let first = Gff::read(Cursor::new(list_of_two()))?;
        let second = Gff::read(Cursor::new(list_of_two()))?;
        assert_eq!(first, second);
        Ok(())
    }

    /// Root struct with three fields listed through the field indices table
    #[traced_test]
    #[test]
    fn duplicate_labels_keep_the_last() -> Result<()> {
        #[rustfmt::skip]
        let input = vec![
            // Header
            b'G', b'F', b'F', b' ', b'V', b'3', b'.', b'2',
            0x38, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, // structs @56 x1
            0x44, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, // fields @68 x2
            0x5C, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, // labels @92 x1
            0x6C, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // field data @108
            0x6C, 0x00, 0x00, 0x00, 0x08, 0x00, 0x00, 0x00, // field indices @108, 8 bytes
            0x74, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // list indices @116
            // Struct
            0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00,
            // Fields, both labelled "Tag"
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, // Byte 1
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, // Byte 2
            // Labels
            b'T', b'a', b'g', 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            // Field indices
            0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00,
        ];

        let gff = Gff::read(Cursor::new(input))?;
        assert_eq!(gff.len()?, 1);
        assert_eq!(gff.get("Tag")?.as_u8()?, 2);
        assert!(logs_contain("duplicate field label"));

        Ok(())
    }

    fn scalars() -> Vec<u8> {
        #[rustfmt::skip]
        let input = vec![
            // Header
            b'U', b'T', b'C', b' ', b'V', b'3', b'.', b'2',
            0x38, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, // structs @56 x1
            0x44, 0x00, 0x00, 0x00, 0x06, 0x00, 0x00, 0x00, // fields @68 x6
            0x8C, 0x00, 0x00, 0x00, 0x06, 0x00, 0x00, 0x00, // labels @140 x6
            0xEC, 0x00, 0x00, 0x00, 0x31, 0x00, 0x00, 0x00, // field data @236, 49 bytes
            0x1D, 0x01, 0x00, 0x00, 0x18, 0x00, 0x00, 0x00, // field indices @285, 24 bytes
            0x35, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // list indices @309
            // Struct
            0x2A, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x06, 0x00, 0x00, 0x00,
            // Fields
            0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFE, 0x00, 0x00, 0x00, // Char -2
            0x03, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x9C, 0xFF, 0x00, 0x00, // Short -100
            0x0B, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // ResRef @0
            0x0C, 0x00, 0x00, 0x00, 0x03, 0x00, 0x00, 0x00, 0x09, 0x00, 0x00, 0x00, // LocString @9
            0x11, 0x00, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0x21, 0x00, 0x00, 0x00, // Vector @33
            0x10, 0x00, 0x00, 0x00, 0x05, 0x00, 0x00, 0x00, 0x21, 0x00, 0x00, 0x00, // Quaternion @33
            // Labels
            b'C', b'h', b'a', b'r', 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            b'S', b'h', b'o', b'r', b't', 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            b'T', b'e', b'm', b'p', b'l', b'a', b't', b'e', 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            b'N', b'a', b'm', b'e', 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            b'P', b'o', b's', 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            b'R', b'o', b't', 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            // Field data
            0x08, b'N', b'_', b'D', b'r', b'o', b'i', b'd', b'1',        // ResRef (9 bytes)
            0x14, 0x00, 0x00, 0x00,                                      // LocString size
            0xFF, 0xFF, 0xFF, 0xFF,                                      // no string ref
            0x01, 0x00, 0x00, 0x00,                                      // one substring
            0x01, 0x00, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00,              // English female
            b'T', b'-', b'3', b'M',
            0x00, 0x00, 0x80, 0x3F, 0x00, 0x00, 0x00, 0x40,              // Vector 1, 2
            0x00, 0x00, 0x40, 0x40, 0x00, 0x00, 0x80, 0x40,              // 3 (and quaternion w 4)
            // Field indices
            0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00,
            0x02, 0x00, 0x00, 0x00, 0x03, 0x00, 0x00, 0x00,
            0x04, 0x00, 0x00, 0x00, 0x05, 0x00, 0x00, 0x00,
        ];
        input
    }

    #[test]
    fn read_scalar_fields() -> Result<()> {
        let gff = Gff::read(Cursor::new(scalars()))?;

        assert_eq!(gff.struct_id(), Some(42));
        assert_eq!(gff.len()?, 6);
        assert_eq!(*gff.get("Char")?.value(), GffValue::Char(-2));
        assert_eq!(*gff.get("Short")?.value(), GffValue::Short(-100));
        assert_eq!(gff.get("Template")?.as_resref()?.as_str(), "n_droid1");

        let name = gff.get("Name")?.as_loc_string()?;
        assert_eq!(name.string_ref, None);
        assert_eq!(name.strings.len(), 1);
        assert_eq!(name.strings[0].language, Language::English);
        assert_eq!(name.strings[0].gender, Gender::Female);
        assert_eq!(name.text(), Some("T-3M"));

        assert_eq!(gff.get("Pos")?.as_vector()?, Vec3::new(1.0, 3.0, 2.0));
        assert_eq!(
            gff.get("Rot")?.as_quaternion()?,
            Quat::from_xyzw(1.0, 2.0, 3.0, 4.0)
        );

        let labels: Vec<_> = gff.fields()?.keys().map(String::as_str).collect();
        assert_eq!(labels, ["Char", "Short", "Template", "Name", "Pos", "Rot"]);

        Ok(())
    }

    #[traced_test]
    #[test]
    fn unknown_field_type_is_null() -> Result<()> {
        let mut input = list_of_two();
        // change the list field into type 99
        input[92] = 99;

        let gff = Gff::read(Cursor::new(input))?;
        let field = gff.get("ItemList")?;
        assert_eq!(field.field_type(), FieldType::Unknown(99));
        assert_eq!(*field.value(), GffValue::Null);
        assert!(logs_contain("unknown gff field type"));

        Ok(())
    }

    #[test]
    fn self_referencing_struct_hits_limit() {
        let mut input = list_of_two();
        // the first list element becomes the root struct again
        input[124] = 0x00;

        assert!(matches!(
            Gff::read(Cursor::new(input)),
            Err(Error::RecursionLimit(_))
        ));
    }

    #[test]
    fn unsupported_version() {
        let mut input = list_of_two();
        input[5] = b'4';

        assert!(matches!(
            Gff::read(Cursor::new(input)),
            Err(Error::UnsupportedVersion(_))
        ));
    }
}
