use aurora_common::ResourceKey;
use aurora_gff::Gff;
use clap::{Args, ValueEnum};
use miette::{Context, Result};
use std::{collections::BTreeSet, io::Cursor, path::PathBuf};

use super::{open, Archive};
use crate::commands::change::{text_changes, Change};

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum Mode {
    /// Compare the resource lists and sizes
    #[default]
    Summary,
    /// Also compare the fields of GFF resources
    Full,
}

#[derive(Args)]
pub struct DiffArgs {
    /// An input archive
    #[arg(short, long, value_name = "FILE")]
    left: PathBuf,

    /// An input archive
    #[arg(short, long, value_name = "FILE")]
    right: PathBuf,

    /// Comparison mode
    #[arg(short, long, value_enum, default_value_t = Mode::Summary)]
    mode: Mode,
}

impl DiffArgs {
    fn handle_resource(&self, key: &ResourceKey, left: &[u8], right: &[u8]) -> Result<Option<Change>> {
        let name = key.file_name();
        let mut result = None;

        if left.len() != right.len() {
            Change::record(
                &mut result,
                &name,
                Change::Comparison("size".into(), left.len().to_string(), right.len().to_string()),
            );
        } else if left != right && self.mode == Mode::Summary {
            Change::record(&mut result, &name, Change::Context(vec!["contents differ\n".into()]));
        }

        if self.mode == Mode::Full && left != right {
            if key.restype.is_gff() {
                let old = Gff::read(Cursor::new(left))?.to_json()?;
                let new = Gff::read(Cursor::new(right))?.to_json()?;
                if let Some(change) = text_changes(&old, &new) {
                    Change::record(&mut result, &name, change);
                }
            } else if left.len() == right.len() {
                Change::record(&mut result, &name, Change::Context(vec!["contents differ\n".into()]));
            }
        }

        Ok(result)
    }

    fn handle_archives(&self, left: &Archive, right: &Archive) -> Result<Option<Change>> {
        let name = self.left.to_string_lossy();
        let mut result = None;

        let left_keys = left.keys().into_iter().collect::<BTreeSet<_>>();
        let right_keys = right.keys().into_iter().collect::<BTreeSet<_>>();

        if left_keys.len() != right_keys.len() {
            Change::record(
                &mut result,
                &name,
                Change::Comparison(
                    "entries".into(),
                    left_keys.len().to_string(),
                    right_keys.len().to_string(),
                ),
            );
        }

        for key in right_keys.difference(&left_keys) {
            Change::record(&mut result, &name, Change::Added(key.file_name()));
        }
        for key in left_keys.difference(&right_keys) {
            Change::record(&mut result, &name, Change::Removed(key.file_name()));
        }

        for key in left_keys.intersection(&right_keys) {
            let (Some(data_left), Some(data_right)) = (left.read(key)?, right.read(key)?) else {
                continue;
            };
            if let Some(change) = self
                .handle_resource(key, &data_left, &data_right)
                .context(format!("comparing {key}"))?
            {
                Change::record(&mut result, &name, change);
            }
        }

        Ok(result)
    }

    pub fn handle(&self) -> Result<()> {
        let left = open(&self.left).context(format!("path: {}", &self.left.display()))?;
        let right = open(&self.right).context(format!("path: {}", &self.right.display()))?;

        if let Some(d) = self.handle_archives(&left, &right)? {
            println!("{}", d);
        }

        Ok(())
    }
}
