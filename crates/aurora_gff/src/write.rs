//! Types for writing GFF files
//!

use aurora_common::coords::remap_position;
use binrw::BinWrite;
use bon::Builder;
use byteorder::{LittleEndian, WriteBytesExt};
use indexmap::IndexSet;
use std::io::{Cursor, Write};
use tracing::instrument;

use crate::{
    error::{Error, Result},
    node::{GffNode, GffValue, LocString},
    types::{
        FieldRecord, GffHeader, Section, StructRecord, FIELD_SIZE, HEADER_SIZE, LABEL_SIZE,
        STRUCT_SIZE,
    },
};

/// GFF file generator
///
/// ```
/// # fn doit() -> aurora_gff::error::Result<()>
/// # {
/// use aurora_gff::{Gff, GffNode, GffValue, GffWriter};
///
/// let mut root = GffNode::new_struct(u32::MAX);
/// root.insert("Mod_Entry_X", GffNode::new(GffValue::Float(12.5)))?;
///
/// let bytes = GffWriter::builder().file_type(*b"IFO ").build().to_bytes(&root)?;
/// let ifo = Gff::read(std::io::Cursor::new(bytes))?;
///
/// assert_eq!(ifo.file_type, "IFO");
/// assert_eq!(ifo.get("Mod_Entry_X")?.as_f32()?, 12.5);
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
#[derive(Debug, Clone, Copy, Builder)]
pub struct GffWriter {
    /// Four character file type, padded with spaces
    #[builder(default = *b"GFF ")]
    pub file_type: [u8; 4],

    /// Four character version
    #[builder(default = *b"V3.2")]
    pub version: [u8; 4],
}

impl GffWriter {
    /// Writer for a file type given as an extension such as `utc`
    pub fn for_extension(extension: &str) -> GffWriter {
        let mut file_type = *b"    ";
        for (slot, byte) in file_type
            .iter_mut()
            .zip(extension.to_ascii_uppercase().bytes())
        {
            *slot = byte;
        }
        GffWriter::builder().file_type(file_type).build()
    }

    /// Encode a tree whose root is a struct node
    pub fn to_bytes(&self, root: &GffNode) -> Result<Vec<u8>> {
        self.write(root, Vec::new())
    }

    /// Encode a tree into `inner`, returning the writer afterwards
    #[instrument(skip(self, root, inner), err)]
    pub fn write<W: Write>(&self, root: &GffNode, mut inner: W) -> Result<W> {
        let mut tables = Tables::default();
        tables.add_struct(root)?;

        let mut offset = HEADER_SIZE;
        let mut section = |count: u32, size: u32| {
            let section = Section { offset, count };
            offset += size;
            section
        };

        let structs = tables.structs.len() as u32;
        let fields = tables.fields.len() as u32;
        let labels = tables.labels.len() as u32;
        let header = GffHeader {
            file_type: self.file_type,
            version: self.version,
            structs: section(structs, structs * STRUCT_SIZE),
            fields: section(fields, fields * FIELD_SIZE),
            labels: section(labels, labels * LABEL_SIZE),
            field_data: section(
                tables.field_data.len() as u32,
                tables.field_data.len() as u32,
            ),
            field_indices: section(
                tables.field_indices.len() as u32,
                tables.field_indices.len() as u32,
            ),
            list_indices: section(
                tables.list_indices.len() as u32,
                tables.list_indices.len() as u32,
            ),
        };

        let mut records = Cursor::new(Vec::new());
        header.write(&mut records)?;
        for record in &tables.structs {
            record.write(&mut records)?;
        }
        for record in &tables.fields {
            record.write(&mut records)?;
        }

        inner.write_all(records.get_ref())?;
        for label in &tables.labels {
            let mut raw = [0u8; LABEL_SIZE as usize];
            raw[..label.len()].copy_from_slice(label.as_bytes());
            inner.write_all(&raw)?;
        }
        inner.write_all(&tables.field_data)?;
        inner.write_all(&tables.field_indices)?;
        inner.write_all(&tables.list_indices)?;

        Ok(inner)
    }
}

#[derive(Default)]
struct Tables {
    structs: Vec<StructRecord>,
    fields: Vec<FieldRecord>,
    labels: IndexSet<String>,
    field_data: Vec<u8>,
    field_indices: Vec<u8>,
    list_indices: Vec<u8>,
}

impl Tables {
    fn add_struct(&mut self, node: &GffNode) -> Result<u32> {
        let children = node.fields()?;
        let index = self.structs.len();
        self.structs.push(StructRecord {
            struct_id: node.struct_id().unwrap_or_default(),
            data: 0,
            field_count: children.len() as u32,
        });

        let mut field_ids = Vec::with_capacity(children.len());
        for (label, child) in children {
            field_ids.push(self.add_field(label, child)?);
        }

        self.structs[index].data = match field_ids.as_slice() {
            [] => 0,
            [single] => *single,
            many => {
                let offset = self.field_indices.len() as u32;
                for id in many {
                    self.field_indices.write_u32::<LittleEndian>(*id)?;
                }
                offset
            }
        };

        Ok(index as u32)
    }

    fn add_label(&mut self, label: &str) -> Result<u32> {
        if label.len() > LABEL_SIZE as usize {
            return Err(Error::LabelTooLong(label.to_owned()));
        }
        let (index, _) = self.labels.insert_full(label.to_owned());
        Ok(index as u32)
    }

    fn add_field(&mut self, label: &str, node: &GffNode) -> Result<u32> {
        let label_index = self.add_label(label)?;
        let data_offset = self.field_data.len() as u32;
        let data = &mut self.field_data;

        let inline = match node.value() {
            GffValue::Byte(v) => *v as u32,
            GffValue::Char(v) => *v as u8 as u32,
            GffValue::Word(v) => *v as u32,
            GffValue::Short(v) => *v as u16 as u32,
            GffValue::DWord(v) => *v,
            GffValue::Int(v) => *v as u32,
            GffValue::Float(v) => v.to_bits(),
            GffValue::DWord64(v) => {
                data.write_u64::<LittleEndian>(*v)?;
                data_offset
            }
            GffValue::Int64(v) => {
                data.write_i64::<LittleEndian>(*v)?;
                data_offset
            }
            GffValue::Double(v) => {
                data.write_f64::<LittleEndian>(*v)?;
                data_offset
            }
            GffValue::String(v) => {
                data.write_u32::<LittleEndian>(v.len() as u32)?;
                data.write_all(v.as_bytes())?;
                data_offset
            }
            GffValue::ResRef(v) => {
                data.write_u8(v.len() as u8)?;
                data.write_all(v.as_bytes())?;
                data_offset
            }
            GffValue::LocString(v) => {
                write_loc_string(data, v)?;
                data_offset
            }
            GffValue::Void(v) => {
                data.write_u32::<LittleEndian>(v.len() as u32)?;
                data.write_all(v)?;
                data_offset
            }
            GffValue::Quaternion(v) => {
                for component in v.to_array() {
                    data.write_f32::<LittleEndian>(component)?;
                }
                data_offset
            }
            GffValue::Vector(v) => {
                for component in remap_position(*v).to_array() {
                    data.write_f32::<LittleEndian>(component)?;
                }
                data_offset
            }
            GffValue::Struct(_) => self.add_struct(node)?,
            GffValue::List(items) => {
                let indices = items
                    .iter()
                    .map(|item| self.add_struct(item))
                    .collect::<Result<Vec<_>>>()?;
                let offset = self.list_indices.len() as u32;
                self.list_indices
                    .write_u32::<LittleEndian>(indices.len() as u32)?;
                for index in indices {
                    self.list_indices.write_u32::<LittleEndian>(index)?;
                }
                offset
            }
            GffValue::Null => 0,
        };

        let index = self.fields.len() as u32;
        self.fields.push(FieldRecord {
            field_type: node.field_type().code(),
            label_index,
            data: inline,
        });
        Ok(index)
    }
}

fn write_loc_string(data: &mut Vec<u8>, value: &LocString) -> Result<()> {
    let mut body = Vec::new();
    body.write_u32::<LittleEndian>(value.string_ref.unwrap_or(LocString::NO_STRING_REF))?;
    body.write_u32::<LittleEndian>(value.strings.len() as u32)?;
    for string in &value.strings {
        body.write_u32::<LittleEndian>(string.id())?;
        body.write_u32::<LittleEndian>(string.text.len() as u32)?;
        body.write_all(string.text.as_bytes())?;
    }

    data.write_u32::<LittleEndian>(body.len() as u32)?;
    data.write_all(&body)?;
    Ok(())
}
