//! Error types that can be emitted from this library

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// The extension does not name a known resource type
    #[error("unknown resource extension {0}")]
    UnknownExtension(String),

    /// A resource file name has no extension to derive its type from
    #[error("{0} has no resource extension")]
    MissingExtension(String),
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
