use aurora_archive::{ChitinIndex, DirectoryContainer, ErfArchive, ResourceContainer, RimArchive};
use miette::{miette, Result};
use std::path::Path;

pub mod diff;
pub mod extract;
pub mod list;
pub mod pack;

#[derive(clap::Subcommand)]
pub enum ArchiveCommands {
    /// Compare the contents of two archives
    Diff(diff::DiffArgs),
    /// Extract an archive into a directory
    Extract(extract::ExtractArgs),
    /// List the resources of an archive
    List(list::ListArgs),
    /// Pack a directory into an ERF file
    Pack(pack::PackArgs),
}

impl ArchiveCommands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            ArchiveCommands::Diff(diff) => diff.handle(),
            ArchiveCommands::Extract(extract) => extract.handle(),
            ArchiveCommands::List(list) => list.handle(),
            ArchiveCommands::Pack(pack) => pack.handle(),
        }
    }
}

pub type Archive = Box<dyn ResourceContainer>;

/// Open `path` with the reader its extension calls for
///
/// A `chitin.key` opens the whole installation index next to it and a directory is read as
/// loose files.
pub fn open(path: &Path) -> Result<Archive> {
    if path.is_dir() {
        return Ok(Box::new(DirectoryContainer::new(path)?));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let archive: Archive = match extension.as_str() {
        "erf" | "mod" | "sav" | "hak" => Box::new(ErfArchive::new(path.to_path_buf())?),
        "rim" => Box::new(RimArchive::new(path.to_path_buf())?),
        "key" => {
            let root = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent,
                _ => Path::new("."),
            };
            Box::new(ChitinIndex::open(root)?)
        }
        "bif" => {
            return Err(miette!(
                help = "open the chitin.key of the installation instead",
                "{} carries no resource names",
                path.display()
            ))
        }
        other => return Err(miette!("unsupported archive type '{other}'")),
    };
    Ok(archive)
}
