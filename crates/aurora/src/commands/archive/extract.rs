use clap::Args;
use miette::{miette, Context, IntoDiagnostic, Result};
use std::{fs::File, io::Write, path::PathBuf};
use tracing::info;

use super::open;

#[derive(Args)]
pub struct ExtractArgs {
    /// An input archive or chitin.key
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// A target directory
    #[arg(short, long, value_name = "DIR")]
    directory: PathBuf,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl ExtractArgs {
    pub fn handle(&self) -> Result<()> {
        let archive = open(&self.file).context(format!("path: {}", &self.file.display()))?;

        std::fs::create_dir_all(&self.directory)
            .into_diagnostic()
            .context(format!("creating {}", &self.directory.display()))?;

        for key in archive.keys() {
            let data = archive
                .read(&key)?
                .ok_or_else(|| miette!("{key} is listed but cannot be read"))?;

            let p = self.directory.join(key.file_name());
            info!("writing {}", p.display());

            let mut out = if !self.overwrite {
                File::create_new(&p)
                    .into_diagnostic()
                    .context(format!("creating {}", &p.display()))?
            } else {
                File::create(&p)
                    .into_diagnostic()
                    .context(format!("creating {}", &p.display()))?
            };
            out.write_all(&data).into_diagnostic()?;
        }
        Ok(())
    }
}
