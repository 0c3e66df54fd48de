use aurora_tpc::Texture;
use clap::Args;
use miette::{miette, Context, IntoDiagnostic, Result};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::PathBuf,
};
use tracing::info;

#[derive(Args)]
pub struct TextureArgs {
    /// An input TPC file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Print the embedded TXI text
    #[arg(long, default_value_t = false)]
    txi: bool,

    /// Write the top mipmap as raw RGBA8 pixels
    #[arg(long, value_name = "FILE")]
    rgba: Option<PathBuf>,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl TextureArgs {
    pub fn handle(&self) -> Result<()> {
        let f = File::open(&self.file)
            .into_diagnostic()
            .context(format!("path: {}", &self.file.display()))?;
        let texture = Texture::read(BufReader::new(f))?;

        println!("{}x{} {}", texture.width(), texture.height(), texture.format);
        println!("encoding: {:?}", texture.encoding);
        println!("alpha test: {}", texture.alpha_test);
        println!("{} mipmaps", texture.mipmaps.len());
        if let Some(env_map) = &texture.env_map {
            println!("environment map: {env_map}");
        }
        if self.txi {
            match &texture.txi {
                Some(txi) => println!("{txi}"),
                None => info!("{} has no txi", self.file.display()),
            }
        }

        let Some(p) = &self.rgba else {
            return Ok(());
        };
        let top = texture
            .mipmaps
            .first()
            .ok_or_else(|| miette!("{} has no image data", self.file.display()))?;

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
        out.write_all(&top.to_rgba8()?).into_diagnostic()?;
        Ok(())
    }
}
