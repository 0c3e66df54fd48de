//! Error types that can be emitted from this library

use aurora_common::{ResourceKey, ResourceType};
use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent warpper for [`aurora_archive::error::Error`]
    #[error(transparent)]
    #[diagnostic(transparent)]
    ArchiveError(#[from] aurora_archive::error::Error),

    /// Transparent warpper for [`aurora_2da::error::Error`]
    #[error(transparent)]
    #[diagnostic(transparent)]
    TableError(#[from] aurora_2da::error::Error),

    /// Transparent warpper for [`aurora_gff::error::Error`]
    #[error(transparent)]
    #[diagnostic(transparent)]
    GffError(#[from] aurora_gff::error::Error),

    /// Transparent warpper for [`aurora_mdl::error::Error`]
    #[error(transparent)]
    #[diagnostic(transparent)]
    ModelError(#[from] aurora_mdl::error::Error),

    /// Transparent warpper for [`aurora_tpc::error::Error`]
    #[error(transparent)]
    #[diagnostic(transparent)]
    TextureError(#[from] aurora_tpc::error::Error),

    /// The room layout text could not be parsed
    #[error("invalid room layout at byte {offset}: {message}")]
    InvalidLayout {
        /// Byte offset of the first unparsable input
        offset: usize,
        /// What the parser expected there
        message: String,
    },

    /// A resource the caller cannot do without is absent from every layer
    #[error("resource {0} was not found")]
    MissingResource(ResourceKey),

    /// A template loader was asked for a resource that is not a template
    #[error("{} is not a template type", .0.extension())]
    #[diagnostic(help("templates are the ut* types such as utc, utd or utp"))]
    NotATemplate(ResourceType),

    /// A module archive does not exist
    #[error("module archive {0} does not exist")]
    #[diagnostic(help("module names match the rim files of the modules directory"))]
    MissingModule(PathBuf),
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
