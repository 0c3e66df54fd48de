#![allow(dead_code)]

use aurora_archive::{write::ErfWriterOptions, ErfWriter};
use aurora_common::{ByteSource, ResourceKey, ResourceType};
use aurora_gff::{GffNode, GffValue, GffWriter};
use aurora_resources::error::Result;
use indexmap::IndexMap;
use std::io::{self, Cursor, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// In-memory byte source counting how often it is opened
#[derive(Clone)]
pub struct CountingSource {
    data: Arc<[u8]>,
    opens: Arc<AtomicUsize>,
}

impl CountingSource {
    pub fn new(data: Vec<u8>) -> CountingSource {
        CountingSource {
            data: Arc::from(data),
            opens: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
}

impl ByteSource for CountingSource {
    type Reader<'a> = Cursor<&'a [u8]>;

    fn open(&self) -> io::Result<Self::Reader<'_>> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        Ok(Cursor::new(self.data.as_ref()))
    }

    fn describe(&self) -> String {
        format!("<{} counted bytes>", self.data.len())
    }
}

/// A BIF holding `files` with local ids 0, 1, 2...
pub fn bif(files: &[(ResourceType, &[u8])]) -> Vec<u8> {
    let table = 20u32;
    let mut offset = table + 16 * files.len() as u32;

    let mut out = Vec::new();
    out.extend_from_slice(b"BIFFV1  ");
    out.extend_from_slice(&(files.len() as u32).to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&table.to_le_bytes());
    for (id, (restype, data)) in files.iter().enumerate() {
        out.extend_from_slice(&(id as u32).to_le_bytes());
        out.extend_from_slice(&offset.to_le_bytes());
        out.extend_from_slice(&(data.len() as u32).to_le_bytes());
        out.extend_from_slice(&(restype.code() as u32).to_le_bytes());
        offset += data.len() as u32;
    }
    for (_, data) in files {
        out.extend_from_slice(data);
    }
    out
}

/// A KEY file listing one BIF whose resources are `names`, in BIF order
pub fn key(bif_name: &str, bif_size: u32, names: &[(&str, ResourceType)]) -> Vec<u8> {
    let name = format!("{bif_name}\0");
    let file_table = 32u32;
    let name_offset = file_table + 12;
    let key_table = name_offset + name.len() as u32;

    let mut out = Vec::new();
    out.extend_from_slice(b"KEY V1  ");
    out.extend_from_slice(&1u32.to_le_bytes());
    out.extend_from_slice(&(names.len() as u32).to_le_bytes());
    out.extend_from_slice(&file_table.to_le_bytes());
    out.extend_from_slice(&key_table.to_le_bytes());
    out.extend_from_slice(&103u32.to_le_bytes());
    out.extend_from_slice(&42u32.to_le_bytes());

    out.extend_from_slice(&bif_size.to_le_bytes());
    out.extend_from_slice(&name_offset.to_le_bytes());
    out.extend_from_slice(&(name.len() as u16).to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(name.as_bytes());

    for (id, (resref, restype)) in names.iter().enumerate() {
        out.extend_from_slice(&ResourceKey::new(*resref, *restype).resref.to_bytes());
        out.extend_from_slice(&restype.code().to_le_bytes());
        out.extend_from_slice(&(id as u32).to_le_bytes());
    }
    out
}

pub fn erf(file_type: [u8; 4], files: &[(&str, ResourceType, &[u8])]) -> Result<Vec<u8>> {
    let mut writer = ErfWriter::new(
        Cursor::new(Vec::new()),
        ErfWriterOptions::builder().file_type(file_type).build(),
    );
    for (name, restype, data) in files {
        writer.start_file(ResourceKey::new(*name, *restype))?;
        writer.write_all(data)?;
    }
    Ok(writer.finish()?.into_inner())
}

/// A RIM archive holding `files`
pub fn rim(files: &[(&str, ResourceType, &[u8])]) -> Vec<u8> {
    let table = 160u32;
    let mut offset = table + 32 * files.len() as u32;

    let mut out = Vec::new();
    out.extend_from_slice(b"RIM V1.0");
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&(files.len() as u32).to_le_bytes());
    out.extend_from_slice(&table.to_le_bytes());
    out.resize(table as usize, 0);
    for (id, (resref, restype, data)) in files.iter().enumerate() {
        out.extend_from_slice(&ResourceKey::new(*resref, *restype).resref.to_bytes());
        out.extend_from_slice(&restype.code().to_le_bytes());
        out.extend_from_slice(&[0, 0]);
        out.extend_from_slice(&(id as u32).to_le_bytes());
        out.extend_from_slice(&offset.to_le_bytes());
        out.extend_from_slice(&(data.len() as u32).to_le_bytes());
        offset += data.len() as u32;
    }
    for (_, _, data) in files {
        out.extend_from_slice(data);
    }
    out
}

pub fn two_da(columns: &[&str], rows: &[&[&str]]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"2DA V2.b\n");
    for column in columns {
        out.extend_from_slice(column.as_bytes());
        out.push(b'\t');
    }
    out.push(0);
    out.extend_from_slice(&(rows.len() as u32).to_le_bytes());
    for row in 0..rows.len() {
        out.extend_from_slice(format!("{row}\t").as_bytes());
    }

    let mut data = Vec::new();
    let mut offsets = IndexMap::new();
    for row in rows {
        for cell in row.iter() {
            let offset = *offsets.entry(cell.to_string()).or_insert_with(|| {
                let offset = data.len() as u16;
                data.extend_from_slice(cell.as_bytes());
                data.push(0);
                offset
            });
            out.extend_from_slice(&offset.to_le_bytes());
        }
    }
    out.extend_from_slice(&(data.len() as u16).to_le_bytes());
    out.extend_from_slice(&data);
    out
}

pub fn gff(extension: &str, fields: Vec<(&str, GffValue)>) -> Result<Vec<u8>> {
    Ok(GffWriter::for_extension(extension).to_bytes(&structure(u32::MAX, fields))?)
}

pub fn structure(struct_id: u32, fields: Vec<(&str, GffValue)>) -> GffNode {
    GffNode::from_fields(
        struct_id,
        fields
            .into_iter()
            .map(|(label, value)| (label.to_owned(), GffNode::labeled(label, value)))
            .collect(),
    )
}

/// A game installation in a temporary directory, removed on drop
pub struct Installation {
    pub root: PathBuf,
}

impl Installation {
    pub fn new(name: &str) -> Result<Installation> {
        let root = std::env::temp_dir().join(format!("aurora_{name}_{}", std::process::id()));
        if root.exists() {
            std::fs::remove_dir_all(&root)?;
        }
        std::fs::create_dir_all(&root)?;
        Ok(Installation { root })
    }

    pub fn write(&self, relative: impl AsRef<Path>, data: &[u8]) -> Result<()> {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, data)?;
        Ok(())
    }
}

impl Drop for Installation {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}
