use aurora_archive::{write::ErfWriterOptions, ErfWriter};
use aurora_common::ResourceKey;
use clap::Args;
use miette::{miette, Context, IntoDiagnostic, Result};
use std::{fs::File, io::Write, path::PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

#[derive(Args)]
pub struct PackArgs {
    /// An input directory
    #[arg(short, long, value_name = "DIR")]
    directory: PathBuf,

    /// The ERF file to create
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// File type written to the header, `ERF`, `MOD`, `SAV` or `HAK`
    #[arg(short = 't', long, default_value = "ERF")]
    file_type: String,

    /// Descend into subdirectories
    #[arg(short, long, default_value_t = false)]
    recursive: bool,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl PackArgs {
    fn file_type(&self) -> Result<[u8; 4]> {
        let name = self.file_type.to_ascii_uppercase();
        if !matches!(name.as_str(), "ERF" | "MOD" | "SAV" | "HAK") {
            return Err(miette!("unsupported file type '{}'", self.file_type));
        }
        let mut file_type = *b"    ";
        file_type[..name.len()].copy_from_slice(name.as_bytes());
        Ok(file_type)
    }

    pub fn handle(&self) -> Result<()> {
        let options = ErfWriterOptions::builder()
            .file_type(self.file_type()?)
            .build();

        let mut resources = Vec::new();
        let depth = if self.recursive { usize::MAX } else { 1 };
        for entry in WalkDir::new(&self.directory).max_depth(depth).sort_by_file_name() {
            let entry = entry.into_diagnostic()?;
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            match ResourceKey::from_file_name(&name) {
                Ok(key) => resources.push((key, entry.into_path())),
                Err(e) => warn!("skipping {}: {e}", entry.path().display()),
            }
        }

        if resources.is_empty() {
            return Err(miette!("{} holds no resources", self.directory.display()));
        }

        let out = if !self.overwrite {
            File::create_new(&self.file)
                .into_diagnostic()
                .context(format!("creating {}", &self.file.display()))?
        } else {
            File::create(&self.file)
                .into_diagnostic()
                .context(format!("creating {}", &self.file.display()))?
        };

        let mut erf = ErfWriter::new(out, options);
        for (key, path) in resources {
            info!("adding {}", path.display());
            let data = std::fs::read(&path)
                .into_diagnostic()
                .context(format!("reading {}", path.display()))?;
            erf.start_file(key)?;
            erf.write_all(&data).into_diagnostic()?;
        }
        erf.finish()?;

        info!("wrote {}", self.file.display());
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    use super::PackArgs;

    fn args(file_type: &str) -> PackArgs {
        PackArgs {
            directory: PathBuf::from("in"),
            file: PathBuf::from("out.mod"),
            file_type: file_type.into(),
            recursive: false,
            overwrite: false,
        }
    }

    #[test]
    fn file_type_is_padded() -> miette::Result<()> {
        assert_eq!(&args("mod").file_type()?, b"MOD ");
        assert_eq!(&args("ERF").file_type()?, b"ERF ");
        assert!(args("TRE").file_type().is_err());
        Ok(())
    }
}
