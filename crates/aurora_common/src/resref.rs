//! Resource names and resource identity keys

use derive_more::derive::{AsRef, Deref, Display};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::restype::ResourceType;

/// A case-insensitive resource name.
///
/// Names are normalised to lowercase and truncated to [`ResRef::MAX_LEN`] bytes, which is the
/// width of the name field in every on-disk index.
#[derive(Display, Deref, AsRef, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[as_ref(str)]
#[deref(forward)]
pub struct ResRef(String);

impl ResRef {
    /// Maximum length of a resource name in bytes
    pub const MAX_LEN: usize = 16;

    /// Normalise a name into a resref
    pub fn new(name: impl AsRef<str>) -> Self {
        let mut name = name.as_ref().trim_end_matches('\0').to_ascii_lowercase();
        if name.len() > Self::MAX_LEN {
            let mut end = Self::MAX_LEN;
            while !name.is_char_boundary(end) {
                end -= 1;
            }
            name.truncate(end);
        }
        ResRef(name)
    }

    /// Decode a null padded name field as stored in archive indices
    pub fn from_bytes(raw: &[u8]) -> Self {
        let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
        Self::new(String::from_utf8_lossy(&raw[..end]))
    }

    /// Encode the name as a null padded on-disk field
    pub fn to_bytes(&self) -> [u8; Self::MAX_LEN] {
        let mut raw = [0u8; Self::MAX_LEN];
        let bytes = self.0.as_bytes();
        raw[..bytes.len()].copy_from_slice(bytes);
        raw
    }

    /// Borrow the normalised name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ResRef {
    fn from(value: &str) -> Self {
        ResRef::new(value)
    }
}

impl From<String> for ResRef {
    fn from(value: String) -> Self {
        ResRef::new(value)
    }
}

/// Identity of a resource: its name together with its type
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ResourceKey {
    /// The case-insensitive name
    pub resref: ResRef,

    /// The type of data stored under the name
    pub restype: ResourceType,
}

impl ResourceKey {
    /// Create a key, normalising the name
    pub fn new(resref: impl Into<ResRef>, restype: ResourceType) -> Self {
        Self {
            resref: resref.into(),
            restype,
        }
    }

    /// Parse a file name such as `c_bantha.mdl` into a key
    pub fn from_file_name(name: &str) -> crate::error::Result<Self> {
        let (stem, extension) = name
            .rsplit_once('.')
            .ok_or_else(|| crate::error::Error::MissingExtension(name.to_owned()))?;
        let restype = ResourceType::from_extension(extension)
            .ok_or_else(|| crate::error::Error::UnknownExtension(extension.to_owned()))?;
        Ok(Self::new(stem, restype))
    }

    /// The file name this resource would have when extracted
    pub fn file_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.resref, self.restype.extension())
    }
}
