#![allow(dead_code)]

use aurora_mdl::types::{
    ArrayDef, CurveKey, FileHeader, GeometryHeader, LightHeader, MeshHeader, ModelHeader,
    NodeHeader, SkinHeader,
};
use binrw::BinWrite;
use std::io::Cursor;

/// Geometry header plus model header, super model, and name table definition
const HEADERS_SIZE: usize = 80 + 116;

/// Assembles MDL/MDX images; offsets returned are relative to the model data
pub struct ModelBuilder {
    data: Vec<u8>,
    pub mdx: Vec<u8>,
}

impl Default for ModelBuilder {
    fn default() -> Self {
        ModelBuilder {
            data: vec![0; HEADERS_SIZE],
            mdx: Vec::new(),
        }
    }
}

pub fn name(value: &str) -> [u8; 32] {
    let mut out = [0u8; 32];
    out[..value.len()].copy_from_slice(value.as_bytes());
    out
}

pub fn short_name(value: &str) -> [u8; 12] {
    let mut out = [0u8; 12];
    out[..value.len()].copy_from_slice(value.as_bytes());
    out
}

fn encode<T>(record: &T) -> Vec<u8>
where
    T: BinWrite,
    for<'a> T::Args<'a>: Default,
{
    let mut out = Cursor::new(Vec::new());
    record.write_le(&mut out).unwrap();
    out.into_inner()
}

impl ModelBuilder {
    /// Offset the next appended byte will land at
    pub fn len(&self) -> u32 {
        self.data.len() as u32
    }

    pub fn record<T>(&mut self, record: &T) -> u32
    where
        T: BinWrite,
        for<'a> T::Args<'a>: Default,
    {
        self.append(&encode(record))
    }

    pub fn append(&mut self, bytes: &[u8]) -> u32 {
        let offset = self.data.len() as u32;
        self.data.extend_from_slice(bytes);
        offset
    }

    pub fn u32s(&mut self, values: &[u32]) -> ArrayDef {
        let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        ArrayDef::new(self.append(&bytes), values.len() as u32)
    }

    pub fn f32s(&mut self, values: &[f32]) -> ArrayDef {
        let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        ArrayDef::new(self.append(&bytes), values.len() as u32)
    }

    pub fn cstring(&mut self, value: &str) -> u32 {
        let offset = self.append(value.as_bytes());
        self.append(&[0]);
        offset
    }

    /// Name table for the given names
    pub fn names(&mut self, names: &[&str]) -> ArrayDef {
        let offsets: Vec<u32> = names.iter().map(|n| self.cstring(n)).collect();
        self.u32s(&offsets)
    }

    /// Curve key table and value blob; floats are passed as their bits
    pub fn curves(&mut self, keys: &[CurveKey], data: &[u32]) -> (ArrayDef, ArrayDef) {
        let key_bytes: Vec<u8> = keys.iter().flat_map(encode).collect();
        let keys_def = ArrayDef::new(self.append(&key_bytes), keys.len() as u32);
        (keys_def, self.u32s(data))
    }

    pub fn plain_node(&mut self, header: NodeHeader) -> u32 {
        self.append(&encode(&header))
    }

    pub fn mesh_node(&mut self, header: NodeHeader, mesh: &MeshHeader) -> u32 {
        let offset = self.append(&encode(&header));
        self.append(&encode(mesh));
        offset
    }

    pub fn skin_node(&mut self, header: NodeHeader, mesh: &MeshHeader, skin: &SkinHeader) -> u32 {
        let offset = self.append(&encode(&header));
        self.append(&encode(mesh));
        self.append(&encode(skin));
        offset
    }

    pub fn light_node(&mut self, header: NodeHeader, light: &LightHeader) -> u32 {
        let offset = self.append(&encode(&header));
        self.append(&encode(light));
        offset
    }

    /// Append raw MDX vertex records, returning their absolute offset
    pub fn mdx_records(&mut self, records: &[Vec<f32>]) -> u32 {
        let offset = self.mdx.len() as u32;
        for value in records.iter().flatten() {
            self.mdx.extend_from_slice(&value.to_le_bytes());
        }
        offset
    }

    pub fn finish(mut self, geometry: GeometryHeader, header: ModelHeader) -> (Vec<u8>, Vec<u8>) {
        let mut headers = encode(&geometry);
        headers.extend(encode(&header));
        self.data[..HEADERS_SIZE].copy_from_slice(&headers);

        let mut mdl = encode(&FileHeader {
            binary_flag: 0,
            model_data_size: self.data.len() as u32,
            raw_data_size: 0,
        });
        mdl.extend(self.data);
        (mdl, self.mdx)
    }
}
