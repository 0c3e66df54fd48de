use clap::Args;
use miette::Result;
use std::path::PathBuf;
use tracing::info;

use crate::commands::change::{text_changes, Change};

#[derive(Args)]
pub struct DiffArgs {
    /// An input GFF file
    #[arg(short, long, value_name = "FILE")]
    left: PathBuf,

    /// An input GFF file
    #[arg(short, long, value_name = "FILE")]
    right: PathBuf,
}

impl DiffArgs {
    pub fn handle(&self) -> Result<()> {
        let left = super::read(&self.left)?;
        let right = super::read(&self.right)?;

        let name = self.left.to_string_lossy();
        let mut result = None;
        if left.file_type != right.file_type {
            Change::record(
                &mut result,
                &name,
                Change::Comparison("type".into(), left.file_type.clone(), right.file_type.clone()),
            );
        }
        if let Some(change) = text_changes(&left.root.to_json()?, &right.root.to_json()?) {
            Change::record(&mut result, &name, change);
        }

        match result {
            Some(d) => println!("{}", d),
            None => info!("no differences"),
        }
        Ok(())
    }
}
