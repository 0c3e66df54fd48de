//! Error types that can be emitted from this library

use aurora_common::ResourceKey;
use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent warpper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    /// The signature of the file does not match the archive format
    #[error("file is an invalid {0} archive")]
    InvalidArchive(&'static str),

    /// The archive signature is known but its version is not
    #[error("unsupported {kind} version {version:?}")]
    UnsupportedVersion {
        /// Archive format
        kind: &'static str,
        /// Version found in the header
        version: String,
    },

    /// unable to find requested resource
    #[error("unable to find requested resource")]
    ResourceNotFound(#[from] NotFoundError),

    /// A key references a data file the index does not list
    #[error("resource id {id:#x} references data file {index}, but only {count} are listed")]
    DataFileOutOfRange {
        /// The full resource id
        id: u32,
        /// The data file index stored in the id
        index: usize,
        /// Number of data files listed in the key file
        count: usize,
    },

    /// An index entry points past the end of its archive
    #[error("{key} spans {offset}..{offset}+{size}, but the archive is {len} bytes")]
    EntryOutOfBounds {
        /// The resource the entry describes
        key: ResourceKey,
        /// Offset stored in the entry
        offset: u64,
        /// Size stored in the entry
        size: u64,
        /// Length of the archive
        len: u64,
    },

    /// A file the game installation must contain is absent
    #[error("missing {0}")]
    #[diagnostic(help("check that the directory points at a game installation"))]
    MissingFile(PathBuf),
}

impl Error {
    /// Report a signature mismatch as [`Error::InvalidArchive`], other failures unchanged
    pub(crate) fn from_header(kind: &'static str, error: binrw::Error) -> Error {
        match error {
            binrw::Error::BadMagic { .. } => Error::InvalidArchive(kind),
            other => Error::BinRWError(other),
        }
    }
}

/// Error type to provide further information when a resource has not been found
#[derive(Error, Diagnostic, Debug)]
#[error("unable to find requested resource")]
pub enum NotFoundError {
    /// with id {0}
    #[error("with id {0}")]
    Id(u32),

    /// at index {0}
    #[error("at index {0}")]
    Index(usize),

    /// by key {0}
    #[error("by key {0}")]
    Key(ResourceKey),
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
