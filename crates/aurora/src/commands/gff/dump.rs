use clap::Args;
use miette::{Context, IntoDiagnostic, Result};
use std::{fs::File, io::Write, path::PathBuf};
use tracing::info;

#[derive(Args)]
pub struct DumpArgs {
    /// An input GFF file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Write the JSON here instead of to stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl DumpArgs {
    pub fn handle(&self) -> Result<()> {
        let gff = super::read(&self.file)?;
        let json = gff.to_json()?;

        let Some(p) = &self.output else {
            println!("{json}");
            return Ok(());
        };

        info!("writing {}", p.display());
        let mut out = if !self.overwrite {
            File::create_new(p)
                .into_diagnostic()
                .context(format!("creating {}", p.display()))?
        } else {
            File::create(p)
                .into_diagnostic()
                .context(format!("creating {}", p.display()))?
        };
        out.write_all(json.as_bytes()).into_diagnostic()?;
        Ok(())
    }
}
