pub mod archive;
pub mod change;
pub mod gff;
pub mod model;
pub mod resolve;
pub mod table;
pub mod texture;

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Handle ERF, MOD, RIM and KEY/BIF archives
    Archive {
        #[command(subcommand)]
        command: archive::ArchiveCommands,
    },
    /// Handle GFF files
    Gff {
        #[command(subcommand)]
        command: gff::GffCommands,
    },
    /// Print a 2DA table
    Table(table::TableArgs),
    /// Summarize a MDL/MDX model
    Model(model::ModelArgs),
    /// Summarize a TPC texture
    Texture(texture::TextureArgs),
    /// Look a resource up the way the game does
    Resolve(resolve::ResolveArgs),
}

impl Commands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            Commands::Archive { command } => command.handle(),
            Commands::Gff { command } => command.handle(),
            Commands::Table(table) => table.handle(),
            Commands::Model(model) => model.handle(),
            Commands::Texture(texture) => texture.handle(),
            Commands::Resolve(resolve) => resolve.handle(),
        }
    }
}
