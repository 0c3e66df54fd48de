//! JSON export view of a decoded tree
//!
//! Structs become objects keyed by label, lists become arrays. Leaf values keep their natural
//! JSON representation; vectors and quaternions are arrays of components.

use serde::{
    ser::{SerializeMap, SerializeStruct},
    Serialize, Serializer,
};

use crate::{
    error::Result,
    node::{GffNode, GffValue},
    read::Gff,
};

impl Serialize for GffNode {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.value() {
            GffValue::Byte(v) => serializer.serialize_u8(*v),
            GffValue::Char(v) => serializer.serialize_i8(*v),
            GffValue::Word(v) => serializer.serialize_u16(*v),
            GffValue::Short(v) => serializer.serialize_i16(*v),
            GffValue::DWord(v) => serializer.serialize_u32(*v),
            GffValue::Int(v) => serializer.serialize_i32(*v),
            GffValue::DWord64(v) => serializer.serialize_u64(*v),
            GffValue::Int64(v) => serializer.serialize_i64(*v),
            GffValue::Float(v) => serializer.serialize_f32(*v),
            GffValue::Double(v) => serializer.serialize_f64(*v),
            GffValue::String(v) => serializer.serialize_str(v),
            GffValue::ResRef(v) => serializer.serialize_str(v.as_str()),
            GffValue::LocString(v) => v.serialize(serializer),
            GffValue::Void(v) => serializer.collect_seq(v),
            GffValue::Struct(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (label, child) in fields {
                    map.serialize_entry(label, child)?;
                }
                map.end()
            }
            GffValue::List(items) => serializer.collect_seq(items),
            GffValue::Quaternion(v) => v.to_array().serialize(serializer),
            GffValue::Vector(v) => v.to_array().serialize(serializer),
            GffValue::Null => serializer.serialize_none(),
        }
    }
}

impl Serialize for Gff {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Gff", 3)?;
        state.serialize_field("file_type", &self.file_type)?;
        state.serialize_field("version", &self.version)?;
        state.serialize_field("root", &self.root)?;
        state.end()
    }
}

impl GffNode {
    /// Render the subtree as pretty printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Gff {
    /// Render the file, including its type and version, as pretty printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
