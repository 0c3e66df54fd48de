use aurora_common::{Game, ResourceKey};
use aurora_resources::{Module, Resources, ResourcesOptions};
use clap::Args;
use miette::{miette, Context, IntoDiagnostic, Result};
use std::{fs::File, io::Write, path::PathBuf};
use tracing::info;

#[derive(Args)]
pub struct ResolveArgs {
    /// The resource to look up, e.g. `appearance.2da`
    name: String,

    /// The game installation directory
    #[arg(short, long, value_name = "DIR")]
    root: PathBuf,

    /// The game installed at the root
    #[arg(short, long, default_value_t = Game::Kotor)]
    game: Game,

    /// Load this module before looking the resource up
    #[arg(short, long)]
    module: Option<String>,

    /// Skip the override directory
    #[arg(long, default_value_t = false)]
    no_override: bool,

    /// Write the resource here
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl ResolveArgs {
    pub fn handle(&self) -> Result<()> {
        let key = ResourceKey::from_file_name(&self.name)?;

        let options = ResourcesOptions::builder()
            .game(self.game)
            .use_override_directory(!self.no_override)
            .build();
        let mut resources = Resources::open(&self.root, options)
            .context(format!("opening {}", self.root.display()))?;

        if let Some(module) = &self.module {
            let module = Module::load(&mut resources, module)?;
            info!("loaded module {} entering {}", module.name, module.area);
        }

        let provider = resources
            .provider(&key)
            .ok_or_else(|| miette!("{key} was not found"))?;
        let data = resources
            .resolve(&key)?
            .ok_or_else(|| miette!("{key} was not found"))?;
        println!("{key}: {} bytes from {provider}", data.len());

        let Some(p) = &self.output else {
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
        out.write_all(&data).into_diagnostic()?;
        Ok(())
    }
}
