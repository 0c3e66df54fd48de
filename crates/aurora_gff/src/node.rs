//! In-memory tree of a decoded GFF file
//!

use aurora_common::ResRef;
use derive_more::derive::Display;
use glam::{Quat, Vec3};
use indexmap::IndexMap;
use std::ops::Index;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Type tag of a GFF field
#[derive(Display, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FieldType {
    Byte,
    Char,
    Word,
    Short,
    DWord,
    Int,
    DWord64,
    Int64,
    Float,
    Double,
    CExoString,
    ResRef,
    CExoLocString,
    Void,
    Struct,
    List,
    Quaternion,
    Vector3,
    /// A type code without a known meaning
    #[display("Unknown({_0})")]
    Unknown(u32),
}

impl FieldType {
    /// The on-disk code of the type
    pub fn code(self) -> u32 {
        match self {
            FieldType::Byte => 0,
            FieldType::Char => 1,
            FieldType::Word => 2,
            FieldType::Short => 3,
            FieldType::DWord => 4,
            FieldType::Int => 5,
            FieldType::DWord64 => 6,
            FieldType::Int64 => 7,
            FieldType::Float => 8,
            FieldType::Double => 9,
            FieldType::CExoString => 10,
            FieldType::ResRef => 11,
            FieldType::CExoLocString => 12,
            FieldType::Void => 13,
            FieldType::Struct => 14,
            FieldType::List => 15,
            FieldType::Quaternion => 16,
            FieldType::Vector3 => 17,
            FieldType::Unknown(code) => code,
        }
    }
}

impl From<u32> for FieldType {
    fn from(code: u32) -> Self {
        match code {
            0 => FieldType::Byte,
            1 => FieldType::Char,
            2 => FieldType::Word,
            3 => FieldType::Short,
            4 => FieldType::DWord,
            5 => FieldType::Int,
            6 => FieldType::DWord64,
            7 => FieldType::Int64,
            8 => FieldType::Float,
            9 => FieldType::Double,
            10 => FieldType::CExoString,
            11 => FieldType::ResRef,
            12 => FieldType::CExoLocString,
            13 => FieldType::Void,
            14 => FieldType::Struct,
            15 => FieldType::List,
            16 => FieldType::Quaternion,
            17 => FieldType::Vector3,
            other => FieldType::Unknown(other),
        }
    }
}

/// Language of a localized substring
#[derive(Display, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Language {
    English,
    French,
    German,
    Italian,
    Spanish,
    Polish,
    Korean,
    ChineseTraditional,
    ChineseSimplified,
    Japanese,
    #[display("Language({_0})")]
    Other(u32),
}

impl Language {
    /// The on-disk language id
    pub fn code(self) -> u32 {
        match self {
            Language::English => 0,
            Language::French => 1,
            Language::German => 2,
            Language::Italian => 3,
            Language::Spanish => 4,
            Language::Polish => 5,
            Language::Korean => 128,
            Language::ChineseTraditional => 129,
            Language::ChineseSimplified => 130,
            Language::Japanese => 131,
            Language::Other(code) => code,
        }
    }
}

impl From<u32> for Language {
    fn from(code: u32) -> Self {
        match code {
            0 => Language::English,
            1 => Language::French,
            2 => Language::German,
            3 => Language::Italian,
            4 => Language::Spanish,
            5 => Language::Polish,
            128 => Language::Korean,
            129 => Language::ChineseTraditional,
            130 => Language::ChineseSimplified,
            131 => Language::Japanese,
            other => Language::Other(other),
        }
    }
}

/// Grammatical gender of a localized substring
#[derive(Display, Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Gender {
    #[default]
    Male,
    Female,
}

/// One substring of a [`LocString`]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LocalizedString {
    pub language: Language,
    pub gender: Gender,
    pub text: String,
}

impl LocalizedString {
    /// Split an on-disk substring id (`2 * language + gender`)
    pub fn from_id(id: u32, text: String) -> Self {
        let gender = if id % 2 == 1 {
            Gender::Female
        } else {
            Gender::Male
        };
        Self {
            language: Language::from(id / 2),
            gender,
            text,
        }
    }

    /// The on-disk substring id
    pub fn id(&self) -> u32 {
        self.language.code() * 2 + self.gender as u32
    }
}

/// A localized string: an optional talk table reference plus embedded substrings
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LocString {
    /// Index into the talk table, `None` when the string is stored inline only
    pub string_ref: Option<u32>,

    /// Embedded substrings
    pub strings: Vec<LocalizedString>,
}

impl LocString {
    /// On-disk value of a missing talk table reference
    pub const NO_STRING_REF: u32 = u32::MAX;

    /// Find the substring for a language and gender
    pub fn get(&self, language: Language, gender: Gender) -> Option<&str> {
        self.strings
            .iter()
            .find(|s| s.language == language && s.gender == gender)
            .map(|s| s.text.as_str())
    }

    /// The English text if present, otherwise the first substring
    pub fn text(&self) -> Option<&str> {
        self.get(Language::English, Gender::Male)
            .or_else(|| self.strings.first().map(|s| s.text.as_str()))
    }
}

/// Value of a GFF node
#[derive(Debug, Clone, PartialEq)]
pub enum GffValue {
    Byte(u8),
    Char(i8),
    Word(u16),
    Short(i16),
    DWord(u32),
    Int(i32),
    DWord64(u64),
    Int64(i64),
    Float(f32),
    Double(f64),
    String(String),
    ResRef(ResRef),
    LocString(LocString),
    Void(Vec<u8>),
    Struct(IndexMap<String, GffNode>),
    List(Vec<GffNode>),
    Quaternion(Quat),
    Vector(Vec3),
    /// Value of a field whose type code is unknown
    Null,
}

impl GffValue {
    /// The field type matching the shape of the value
    ///
    /// [`GffValue::Null`] has no type of its own, it is reported as `Unknown(u32::MAX)`.
    pub fn field_type(&self) -> FieldType {
        match self {
            GffValue::Byte(_) => FieldType::Byte,
            GffValue::Char(_) => FieldType::Char,
            GffValue::Word(_) => FieldType::Word,
            GffValue::Short(_) => FieldType::Short,
            GffValue::DWord(_) => FieldType::DWord,
            GffValue::Int(_) => FieldType::Int,
            GffValue::DWord64(_) => FieldType::DWord64,
            GffValue::Int64(_) => FieldType::Int64,
            GffValue::Float(_) => FieldType::Float,
            GffValue::Double(_) => FieldType::Double,
            GffValue::String(_) => FieldType::CExoString,
            GffValue::ResRef(_) => FieldType::ResRef,
            GffValue::LocString(_) => FieldType::CExoLocString,
            GffValue::Void(_) => FieldType::Void,
            GffValue::Struct(_) => FieldType::Struct,
            GffValue::List(_) => FieldType::List,
            GffValue::Quaternion(_) => FieldType::Quaternion,
            GffValue::Vector(_) => FieldType::Vector3,
            GffValue::Null => FieldType::Unknown(u32::MAX),
        }
    }
}

/// A node of a decoded GFF tree
///
/// Struct nodes own their children keyed by label, in file order. List nodes own a sequence of
/// anonymous struct nodes. Every other node is a leaf.
///
/// ```
/// use aurora_gff::{GffNode, GffValue};
///
/// let mut root = GffNode::new_struct(0xFFFF_FFFF);
/// root.insert("Tag", GffNode::new(GffValue::String("n_bastila".into())))?;
///
/// assert_eq!(root.get("Tag")?.as_str()?, "n_bastila");
/// assert!(root.at(0).is_err());
/// # Ok::<(), aurora_gff::error::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GffNode {
    label: Option<String>,
    field_type: FieldType,
    value: GffValue,
    struct_id: Option<u32>,
}

impl GffNode {
    /// Create an unlabeled node
    pub fn new(value: GffValue) -> Self {
        Self {
            label: None,
            field_type: value.field_type(),
            value,
            struct_id: None,
        }
    }

    /// Create a labeled node
    pub fn labeled(label: impl Into<String>, value: GffValue) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::new(value)
        }
    }

    /// Create an empty struct node with the given struct id
    pub fn new_struct(struct_id: u32) -> Self {
        Self {
            struct_id: Some(struct_id),
            ..Self::new(GffValue::Struct(IndexMap::new()))
        }
    }

    /// Create a struct node from its children
    pub fn from_fields(struct_id: u32, fields: IndexMap<String, GffNode>) -> Self {
        Self {
            struct_id: Some(struct_id),
            ..Self::new(GffValue::Struct(fields))
        }
    }

    /// Create a list node from its elements
    pub fn from_list(items: Vec<GffNode>) -> Self {
        Self::new(GffValue::List(items))
    }

    /// Create the placeholder node of a field whose type code is unknown
    pub fn unknown(label: Option<String>, code: u32) -> Self {
        Self {
            label,
            field_type: FieldType::Unknown(code),
            value: GffValue::Null,
            struct_id: None,
        }
    }

    pub(crate) fn with_label(mut self, label: Option<String>) -> Self {
        self.label = label;
        self
    }

    /// Label of the node, `None` for the root and for list elements
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Type of the node
    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Value of the node
    pub fn value(&self) -> &GffValue {
        &self.value
    }

    /// Consume the node, returning its value
    pub fn into_value(self) -> GffValue {
        self.value
    }

    /// Replace the value, and with it the type, of the node
    pub fn set_value(&mut self, value: GffValue) {
        self.field_type = value.field_type();
        self.value = value;
    }

    /// Struct id of a struct node
    pub fn struct_id(&self) -> Option<u32> {
        self.struct_id
    }

    fn display_label(&self) -> String {
        self.label.clone().unwrap_or_else(|| "<anonymous>".to_owned())
    }

    fn mismatch(&self, expected: FieldType) -> Error {
        Error::TypeMismatch {
            label: self.display_label(),
            expected,
            actual: self.field_type,
        }
    }

    /// Children of a struct node
    pub fn fields(&self) -> Result<&IndexMap<String, GffNode>> {
        match &self.value {
            GffValue::Struct(fields) => Ok(fields),
            _ => Err(self.mismatch(FieldType::Struct)),
        }
    }

    /// Elements of a list node
    pub fn items(&self) -> Result<&[GffNode]> {
        match &self.value {
            GffValue::List(items) => Ok(items),
            _ => Err(self.mismatch(FieldType::List)),
        }
    }

    /// Look up the child of a struct node by label
    pub fn get(&self, label: &str) -> Result<&GffNode> {
        self.fields()?
            .get(label)
            .ok_or_else(|| Error::MissingField {
                parent: self.display_label(),
                label: label.to_owned(),
            })
    }

    /// Look up the child of a struct node by label, allowing it to be absent
    pub fn try_get(&self, label: &str) -> Result<Option<&GffNode>> {
        Ok(self.fields()?.get(label))
    }

    /// Mutable access to the child of a struct node
    pub fn get_mut(&mut self, label: &str) -> Result<&mut GffNode> {
        let parent = self.display_label();
        match &mut self.value {
            GffValue::Struct(fields) => fields.get_mut(label).ok_or(Error::MissingField {
                parent,
                label: label.to_owned(),
            }),
            _ => Err(Error::TypeMismatch {
                label: parent,
                expected: FieldType::Struct,
                actual: self.field_type,
            }),
        }
    }

    /// Add or replace the child of a struct node, returning the replaced child
    pub fn insert(&mut self, label: &str, node: GffNode) -> Result<Option<GffNode>> {
        match &mut self.value {
            GffValue::Struct(fields) => {
                Ok(fields.insert(label.to_owned(), node.with_label(Some(label.to_owned()))))
            }
            _ => Err(self.mismatch(FieldType::Struct)),
        }
    }

    /// Look up the element of a list node by position
    pub fn at(&self, index: usize) -> Result<&GffNode> {
        let items = self.items()?;
        items.get(index).ok_or_else(|| Error::IndexOutOfRange {
            label: self.display_label(),
            index,
            len: items.len(),
        })
    }

    /// Mutable access to the element of a list node
    pub fn at_mut(&mut self, index: usize) -> Result<&mut GffNode> {
        let label = self.display_label();
        match &mut self.value {
            GffValue::List(items) => {
                let len = items.len();
                items
                    .get_mut(index)
                    .ok_or(Error::IndexOutOfRange { label, index, len })
            }
            _ => Err(Error::TypeMismatch {
                label,
                expected: FieldType::List,
                actual: self.field_type,
            }),
        }
    }

    /// Replace the element of a list node at a position
    pub fn set_at(&mut self, index: usize, node: GffNode) -> Result<()> {
        *self.at_mut(index)? = node.with_label(None);
        Ok(())
    }

    /// Append an element to a list node
    pub fn push(&mut self, node: GffNode) -> Result<()> {
        match &mut self.value {
            GffValue::List(items) => {
                items.push(node.with_label(None));
                Ok(())
            }
            _ => Err(self.mismatch(FieldType::List)),
        }
    }

    /// Number of children of a struct node or elements of a list node
    pub fn len(&self) -> Result<usize> {
        match &self.value {
            GffValue::Struct(fields) => Ok(fields.len()),
            GffValue::List(items) => Ok(items.len()),
            _ => Err(self.mismatch(FieldType::List)),
        }
    }

    /// Whether a struct or list node has no children
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Any integer value widened to `i64`
    pub fn as_int(&self) -> Result<i64> {
        match self.value {
            GffValue::Byte(v) => Ok(v as i64),
            GffValue::Char(v) => Ok(v as i64),
            GffValue::Word(v) => Ok(v as i64),
            GffValue::Short(v) => Ok(v as i64),
            GffValue::DWord(v) => Ok(v as i64),
            GffValue::Int(v) => Ok(v as i64),
            GffValue::DWord64(v) => Ok(v as i64),
            GffValue::Int64(v) => Ok(v),
            _ => Err(self.mismatch(FieldType::Int)),
        }
    }

    /// Value of a `Byte` node
    pub fn as_u8(&self) -> Result<u8> {
        match self.value {
            GffValue::Byte(v) => Ok(v),
            _ => Err(self.mismatch(FieldType::Byte)),
        }
    }

    /// Value of a `DWord` node
    pub fn as_u32(&self) -> Result<u32> {
        match self.value {
            GffValue::DWord(v) => Ok(v),
            _ => Err(self.mismatch(FieldType::DWord)),
        }
    }

    /// Value of an `Int` node
    pub fn as_i32(&self) -> Result<i32> {
        match self.value {
            GffValue::Int(v) => Ok(v),
            _ => Err(self.mismatch(FieldType::Int)),
        }
    }

    /// Value of a `Float` node
    pub fn as_f32(&self) -> Result<f32> {
        match self.value {
            GffValue::Float(v) => Ok(v),
            _ => Err(self.mismatch(FieldType::Float)),
        }
    }

    /// Value of a `CExoString` node
    pub fn as_str(&self) -> Result<&str> {
        match &self.value {
            GffValue::String(v) => Ok(v),
            _ => Err(self.mismatch(FieldType::CExoString)),
        }
    }

    /// Value of a `ResRef` node
    pub fn as_resref(&self) -> Result<&ResRef> {
        match &self.value {
            GffValue::ResRef(v) => Ok(v),
            _ => Err(self.mismatch(FieldType::ResRef)),
        }
    }

    /// Value of a `CExoLocString` node
    pub fn as_loc_string(&self) -> Result<&LocString> {
        match &self.value {
            GffValue::LocString(v) => Ok(v),
            _ => Err(self.mismatch(FieldType::CExoLocString)),
        }
    }

    /// Value of a `Void` node
    pub fn as_bytes(&self) -> Result<&[u8]> {
        match &self.value {
            GffValue::Void(v) => Ok(v),
            _ => Err(self.mismatch(FieldType::Void)),
        }
    }

    /// Value of a `Vector3` node
    pub fn as_vector(&self) -> Result<Vec3> {
        match self.value {
            GffValue::Vector(v) => Ok(v),
            _ => Err(self.mismatch(FieldType::Vector3)),
        }
    }

    /// Value of a `Quaternion` node
    pub fn as_quaternion(&self) -> Result<Quat> {
        match self.value {
            GffValue::Quaternion(v) => Ok(v),
            _ => Err(self.mismatch(FieldType::Quaternion)),
        }
    }
}

impl Index<&str> for GffNode {
    type Output = GffNode;

    /// # Panics
    ///
    /// Panics if the node is not a struct or has no field with the label.
    fn index(&self, label: &str) -> &Self::Output {
        match self.get(label) {
            Ok(node) => node,
            Err(e) => panic!("{e}"),
        }
    }
}

impl Index<usize> for GffNode {
    type Output = GffNode;

    /// # Panics
    ///
    /// Panics if the node is not a list or the index is out of range.
    fn index(&self, index: usize) -> &Self::Output {
        match self.at(index) {
            Ok(node) => node,
            Err(e) => panic!("{e}"),
        }
    }
}
