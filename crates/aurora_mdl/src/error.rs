//! Error types that can be emitted from this library

use miette::Diagnostic;
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

    /// The file is an ASCII model
    #[error("model is not in binary format")]
    #[diagnostic(help("only compiled models can be decoded, ascii models must be compiled first"))]
    TextFormatModel,

    /// Nodes reference each other deeper than any real model does
    #[error("node nesting exceeds {0} levels")]
    #[diagnostic(help("the child arrays of the file probably form a cycle"))]
    RecursionLimit(usize),

    /// A curve key points outside of its node's curve data
    #[error("curve data index {index} is out of range for {len} values")]
    CurveIndexOutOfRange {
        /// The requested index
        index: usize,
        /// Number of values in the curve data
        len: usize,
    },
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
