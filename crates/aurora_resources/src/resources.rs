//! The resource context of a game installation
//!

use aurora_2da::TwoDa;
use aurora_archive::{ChitinIndex, DirectoryContainer, ErfArchive, ResourceContainer};
use aurora_common::source::find_case_insensitive;
use aurora_common::{Game, ResourceKey, ResourceType};
use aurora_gff::Gff;
use aurora_mdl::Model;
use aurora_tpc::Texture;
use bon::Builder;
use std::collections::HashMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, instrument, trace, warn};

use crate::error::{Error, Result};
use crate::layout::Layout;

/// A boxed resource container as stored by [`Resources`]
pub type Container = Box<dyn ResourceContainer + Send + Sync>;

pub const OVERRIDE_DIRECTORY: &str = "override";
pub const MODULE_DIRECTORY: &str = "modules";
pub const TEXTURE_PACK_DIRECTORY: &str = "TexturePacks";

/// Options for how a game installation is opened
#[derive(Debug, Clone, Builder)]
pub struct ResourcesOptions {
    /// The game the installation belongs to
    #[builder(default)]
    pub game: Game,

    /// Texture packs consulted after the chitin index, in order
    #[builder(default = vec!["swpc_tex_tpa.erf".to_owned(), "swpc_tex_gui.erf".to_owned()])]
    pub texture_packs: Vec<String>,

    /// Whether loose files of the `override` directory shadow every archive
    #[builder(default = true)]
    pub use_override_directory: bool,
}

impl Default for ResourcesOptions {
    fn default() -> Self {
        ResourcesOptions::builder().build()
    }
}

/// Resolves resources across the layered containers of a game installation
///
/// Lookups consult, in order:
///
/// 1. pinned overrides (the `override` directory), in registration order
/// 2. session layers (loaded modules), in registration order
/// 3. the primary index (`chitin.key` and its BIF files)
/// 4. global containers (texture packs), in registration order
///
/// The first container holding the key wins. Parsed 2DA tables are cached for the lifetime of
/// the context.
pub struct Resources {
    root: Option<PathBuf>,
    game: Game,
    pinned: Vec<Container>,
    session: Vec<Container>,
    primary: Option<Container>,
    globals: Vec<Container>,
    tables: RwLock<HashMap<String, Arc<TwoDa>>>,
}

impl Resources {
    /// A context without any container
    pub fn new(game: Game) -> Resources {
        Resources {
            root: None,
            game,
            pinned: Vec::new(),
            session: Vec::new(),
            primary: None,
            globals: Vec::new(),
            tables: RwLock::new(HashMap::new()),
        }
    }

    /// Open the game installation at `root`
    ///
    /// A missing or malformed `chitin.key` is fatal, as is a malformed texture pack. Missing
    /// texture packs are skipped.
    #[instrument(skip(options), fields(game = %options.game), err)]
    pub fn open(root: &Path, options: ResourcesOptions) -> Result<Resources> {
        let mut resources = Resources::new(options.game);
        resources.root = Some(root.to_path_buf());
        resources.set_primary(Box::new(ChitinIndex::open(root)?));

        if options.use_override_directory {
            match find_case_insensitive(root, OVERRIDE_DIRECTORY).filter(|dir| dir.is_dir()) {
                Some(dir) => resources.add_override(Box::new(DirectoryContainer::new(dir)?)),
                None => debug!("no override directory"),
            }
        }

        let packs = find_case_insensitive(root, TEXTURE_PACK_DIRECTORY);
        for pack in &options.texture_packs {
            match packs
                .as_deref()
                .and_then(|dir| find_case_insensitive(dir, pack))
            {
                Some(path) => resources.add_global(Box::new(ErfArchive::new(path)?)),
                None => warn!("texture pack {pack} not found, skipping"),
            }
        }

        Ok(resources)
    }

    /// Root directory of the installation, if the context was opened from one
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub fn game(&self) -> Game {
        self.game
    }

    /// The `modules` directory of the installation
    pub fn module_directory(&self) -> Option<PathBuf> {
        self.root
            .as_deref()
            .and_then(|root| find_case_insensitive(root, MODULE_DIRECTORY))
    }

    /// Replace the primary index
    pub fn set_primary(&mut self, container: Container) {
        debug!("primary index {}", container.name());
        self.primary = Some(container);
    }

    /// Add a container that shadows every other layer and survives [`Resources::clear_session_layers`]
    pub fn add_override(&mut self, container: Container) {
        debug!("override layer {}", container.name());
        self.pinned.push(container);
    }

    /// Add a container consulted before the primary index, such as a module archive
    pub fn add_session_layer(&mut self, container: Container) {
        debug!("session layer {}", container.name());
        self.session.push(container);
    }

    /// Add a container consulted after the primary index
    pub fn add_global(&mut self, container: Container) {
        debug!("global layer {}", container.name());
        self.globals.push(container);
    }

    /// Drop the session layers, keeping overrides, the primary index and globals
    pub fn clear_session_layers(&mut self) {
        self.session.clear();
    }

    /// Every container in resolution order
    pub fn layers(&self) -> impl Iterator<Item = &Container> {
        self.pinned
            .iter()
            .chain(self.session.iter())
            .chain(self.primary.iter())
            .chain(self.globals.iter())
    }

    /// Name of the first container holding `key`
    pub fn provider(&self, key: &ResourceKey) -> Option<String> {
        self.layers()
            .find(|layer| layer.contains(key))
            .map(|layer| layer.name())
    }

    pub fn contains(&self, key: &ResourceKey) -> bool {
        self.layers().any(|layer| layer.contains(key))
    }

    /// Bytes of the resource from the first container holding it, `None` when no container does
    pub fn resolve(&self, key: &ResourceKey) -> Result<Option<Vec<u8>>> {
        for layer in self.layers() {
            if let Some(data) = layer.read(key)? {
                debug!("resolved {key} from {}", layer.name());
                return Ok(Some(data));
            }
        }

        debug!("{key} not found");
        Ok(None)
    }

    /// Every key known to any container, without duplicates, sorted
    pub fn keys(&self) -> Vec<ResourceKey> {
        let mut keys = self
            .layers()
            .flat_map(|layer| layer.keys())
            .collect::<Vec<_>>();
        keys.sort();
        keys.dedup();
        keys
    }

    /// Load a 2DA table by name
    ///
    /// Tables are parsed once and shared afterwards. A resource that is not a 2DA file is logged
    /// and cached as an empty table; a missing table is not cached.
    pub fn load_table(&self, name: &str) -> Result<Option<Arc<TwoDa>>> {
        let name = name.to_ascii_lowercase();
        if let Some(table) = self
            .tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&name)
        {
            trace!("table {name} is cached");
            return Ok(Some(Arc::clone(table)));
        }

        let key = ResourceKey::new(name.as_str(), ResourceType::TwoDa);
        let Some(data) = self.resolve(&key)? else {
            warn!("missing table {name}");
            return Ok(None);
        };

        let table = match TwoDa::read(Cursor::new(data)) {
            Ok(table) => table,
            Err(aurora_2da::error::Error::InvalidMagic { found }) => {
                warn!("{key} is not a 2da file (found {found:?}), using an empty table");
                TwoDa::default()
            }
            Err(e) => return Err(e.into()),
        };

        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Some(Arc::clone(
            tables.entry(name).or_insert_with(|| Arc::new(table)),
        )))
    }

    /// Load any GFF resource
    pub fn load_gff(&self, key: &ResourceKey) -> Result<Option<Gff>> {
        self.resolve(key)?
            .map(|data| Ok(Gff::read(Cursor::new(data))?))
            .transpose()
    }

    /// Load a creature, door, placeable or other `ut*` template
    pub fn load_template(&self, key: &ResourceKey) -> Result<Option<Gff>> {
        if !key.restype.is_template() {
            return Err(Error::NotATemplate(key.restype));
        }
        self.load_gff(key)
    }

    /// Load a model from its MDL and MDX resources
    ///
    /// Models without vertex data have no MDX resource; they decode against an empty stream.
    #[instrument(skip(self), err)]
    pub fn load_model(&self, name: &str) -> Result<Option<Model>> {
        let Some(mdl) = self.resolve(&ResourceKey::new(name, ResourceType::Mdl))? else {
            return Ok(None);
        };
        let mdx = match self.resolve(&ResourceKey::new(name, ResourceType::Mdx))? {
            Some(mdx) => mdx,
            None => {
                debug!("model {name} has no mdx");
                Vec::new()
            }
        };

        Ok(Some(Model::read(
            Cursor::new(mdl),
            Cursor::new(mdx),
            self.game,
        )?))
    }

    /// Load a TPC texture
    pub fn load_texture(&self, name: &str) -> Result<Option<Texture>> {
        self.resolve(&ResourceKey::new(name, ResourceType::Tpc))?
            .map(|data| Ok(Texture::read(Cursor::new(data))?))
            .transpose()
    }

    /// Load the room layout of an area
    pub fn load_layout(&self, name: &str) -> Result<Option<Layout>> {
        self.resolve(&ResourceKey::new(name, ResourceType::Lyt))?
            .map(|data| Layout::parse(&String::from_utf8_lossy(&data)))
            .transpose()
    }
}

#[cfg(test)]
mod test {
    use aurora_archive::{write::ErfWriterOptions, ErfArchive, ErfWriter};
    use aurora_common::{Game, ResourceKey, ResourceType};
    use pretty_assertions::assert_eq;
    use std::io::{Cursor, Write};
    use std::sync::Arc;
    use tracing_test::traced_test;

    use crate::error::{Error, Result};
    use crate::resources::{Resources, ResourcesOptions};

    fn erf(files: &[(&str, ResourceType, &[u8])]) -> Result<ErfArchive<Vec<u8>>> {
        let mut writer = ErfWriter::new(
            Cursor::new(Vec::new()),
            ErfWriterOptions::builder().build(),
        );
        for (name, restype, data) in files {
            writer.start_file(ResourceKey::new(*name, *restype))?;
            writer.write_all(data)?;
        }
        Ok(ErfArchive::new(writer.finish()?.into_inner())?)
    }

    #[test]
    fn default_options() {
        let options = ResourcesOptions::default();
        assert_eq!(options.game, Game::Kotor);
        assert_eq!(
            options.texture_packs,
            vec!["swpc_tex_tpa.erf", "swpc_tex_gui.erf"]
        );
        assert!(options.use_override_directory);
    }

    #[traced_test]
    #[test]
    fn layers_resolve_in_order() -> Result<()> {
        let key = ResourceKey::new("p_bastila", ResourceType::Utc);

        let mut resources = Resources::new(Game::Kotor);
        resources.add_global(Box::new(erf(&[("p_bastila", ResourceType::Utc, b"global")])?));
        assert_eq!(resources.resolve(&key)?, Some(b"global".to_vec()));

        resources.set_primary(Box::new(erf(&[("p_bastila", ResourceType::Utc, b"primary")])?));
        assert_eq!(resources.resolve(&key)?, Some(b"primary".to_vec()));

        resources.add_session_layer(Box::new(erf(&[("p_bastila", ResourceType::Utc, b"module")])?));
        assert_eq!(resources.resolve(&key)?, Some(b"module".to_vec()));

        resources.add_override(Box::new(erf(&[("p_bastila", ResourceType::Utc, b"override")])?));
        assert_eq!(resources.resolve(&key)?, Some(b"override".to_vec()));

        resources.clear_session_layers();
        assert_eq!(resources.layers().count(), 3);
        assert!(resources.contains(&key));
        assert_eq!(
            resources.resolve(&ResourceKey::new("p_carth", ResourceType::Utc))?,
            None
        );
        Ok(())
    }

    #[traced_test]
    #[test]
    fn tables_are_cached() -> Result<()> {
        let mut resources = Resources::new(Game::Kotor);
        resources.add_session_layer(Box::new(erf(&[
            (
                "ambientmusic",
                ResourceType::TwoDa,
                b"2DA V2.b\nlabel\tresource\t\x00\x01\x00\x00\x000\t\x00\x00\x06\x00\x15\x00\
                  Taris\x00mus_area_taris\x00",
            ),
            ("broken", ResourceType::TwoDa, b"2DA V1.0\n"),
        ])?));

        let first = resources
            .load_table("AmbientMusic")?
            .ok_or(Error::MissingResource(ResourceKey::new("ambientmusic", ResourceType::TwoDa)))?;
        let second = resources
            .load_table("ambientmusic")?
            .ok_or(Error::MissingResource(ResourceKey::new("ambientmusic", ResourceType::TwoDa)))?;
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.get(0, "resource")?, Some("mus_area_taris"));

        let broken = resources
            .load_table("broken")?
            .ok_or(Error::MissingResource(ResourceKey::new("broken", ResourceType::TwoDa)))?;
        assert!(broken.is_empty());
        assert!(logs_contain("is not a 2da file"));

        assert!(resources.load_table("missing")?.is_none());
        Ok(())
    }

    #[test]
    fn templates_only() {
        let resources = Resources::new(Game::Kotor);
        let result = resources.load_template(&ResourceKey::new("tar_m02aa", ResourceType::Are));
        assert!(matches!(result, Err(Error::NotATemplate(ResourceType::Are))));
    }
}
