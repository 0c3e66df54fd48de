//! Error types that can be emitted from this library

use miette::Diagnostic;
use thiserror::Error;

use crate::types::PixelFormat;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent warpper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    /// The header names an encoding this library does not understand
    #[error("unknown texture encoding {0}")]
    UnknownEncoding(u8),

    /// A level is wider or taller than any texture the games can hold
    #[error("invalid texture dimensions {width}x{height}")]
    InvalidDimensions {
        /// Width of the level
        width: u32,
        /// Height of the level
        height: u32,
    },

    /// The file ends inside a level
    #[error("level {level} needs {expected} bytes, but only {found} remain")]
    Truncated {
        /// Index of the level, largest first
        level: u32,
        /// Size the header implies
        expected: usize,
        /// Bytes left in the file
        found: usize,
    },

    /// Conversion to RGBA was requested for block compressed data
    #[error("{0} data cannot be converted to rgba")]
    #[diagnostic(help("block compressed levels must be uploaded as-is or decoded by the renderer"))]
    Compressed(PixelFormat),
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
