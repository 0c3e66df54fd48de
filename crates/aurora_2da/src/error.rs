//! Error types that can be emitted from this library
//!

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// The file does not start with the 2DA V2.b tag
    #[error("not a 2da file, found tag {found:?}")]
    InvalidMagic {
        /// The tag found at the start of the stream
        found: String,
    },

    /// The table has no column with the requested name
    #[error("2da has no column named {0}")]
    #[diagnostic(help("column names are matched exactly, including case"))]
    UnknownColumn(String),

    /// The requested row is past the end of the table
    #[error("row {row} is out of range for a 2da with {rows} rows")]
    RowOutOfRange {
        /// The requested row
        row: usize,
        /// The number of rows in the table
        rows: usize,
    },
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
