use aurora_gff::Gff;
use miette::{Context, IntoDiagnostic, Result};
use std::{fs::File, io::BufReader, path::Path};

pub mod diff;
pub mod dump;

#[derive(clap::Subcommand)]
pub enum GffCommands {
    /// Compare two GFF files field by field
    Diff(diff::DiffArgs),
    /// Print a GFF file as JSON
    Dump(dump::DumpArgs),
}

impl GffCommands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            GffCommands::Diff(diff) => diff.handle(),
            GffCommands::Dump(dump) => dump.handle(),
        }
    }
}

fn read(path: &Path) -> Result<Gff> {
    let f = File::open(path)
        .into_diagnostic()
        .context(format!("path: {}", path.display()))?;
    Ok(Gff::read(BufReader::new(f))?)
}
