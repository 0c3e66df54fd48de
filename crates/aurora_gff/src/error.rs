//! Error types that can be emitted from this library

use miette::Diagnostic;
use thiserror::Error;

use crate::node::FieldType;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent warpper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    /// Transparent warpper for [`serde_json::Error`]
    #[cfg(feature = "serde")]
    #[error(transparent)]
    JsonError(#[from] serde_json::Error),

    /// The header names a version this library does not understand
    #[error("unsupported gff version {0:?}")]
    UnsupportedVersion(String),

    /// Structs reference each other deeper than any real file does
    #[error("struct nesting exceeds {0} levels")]
    #[diagnostic(help("the struct or list indices of the file probably form a cycle"))]
    RecursionLimit(usize),

    /// An accessor was used on a node of the wrong type
    #[error("field {label} is a {actual}, not a {expected}")]
    TypeMismatch {
        /// Label of the node the accessor was used on
        label: String,
        /// The type the accessor works on
        expected: FieldType,
        /// The type of the node
        actual: FieldType,
    },

    /// A struct has no field with the requested label
    #[error("struct {parent} has no field {label}")]
    MissingField {
        /// Label of the struct
        parent: String,
        /// The requested label
        label: String,
    },

    /// A list index is past the end of the list
    #[error("index {index} is out of range for list {label} of length {len}")]
    IndexOutOfRange {
        /// Label of the list
        label: String,
        /// The requested index
        index: usize,
        /// The length of the list
        len: usize,
    },

    /// A label does not fit into the 16 byte label table
    #[error("label {0} is longer than 16 bytes")]
    LabelTooLong(String),
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
