use aurora_common::ResourceType;
use clap::Args;
use miette::{miette, Result};
use std::path::PathBuf;
use tracing::info;

use super::open;

#[derive(Args)]
pub struct ListArgs {
    /// An input archive, chitin.key or directory
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Only list resources with this extension
    #[arg(short = 't', long = "type", value_name = "EXT")]
    restype: Option<String>,
}

impl ListArgs {
    pub fn handle(&self) -> Result<()> {
        let restype = self
            .restype
            .as_deref()
            .map(|ext| {
                ResourceType::from_extension(ext).ok_or_else(|| miette!("unknown resource type '{ext}'"))
            })
            .transpose()?;

        let archive = open(&self.file)?;
        let keys = archive
            .keys()
            .into_iter()
            .filter(|key| restype.map_or(true, |restype| key.restype == restype))
            .collect::<Vec<_>>();

        for key in &keys {
            println!("{key}");
        }
        info!("{} resources in {}", keys.len(), archive.name());
        Ok(())
    }
}
