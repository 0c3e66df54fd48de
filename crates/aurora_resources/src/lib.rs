//! Resource resolution for *Aurora* (Odyssey) engine game installations.
//!
//! A [`Resources`] context is opened once per installation directory. It owns the archive
//! indices of the installation and answers "give me the bytes of `name.ext`" by consulting its
//! containers in a fixed order:
//!
//! | Layer     | Source                                   | Lifetime                     |
//! |-----------|------------------------------------------|------------------------------|
//! | Override  | loose files of `override/`               | the context                  |
//! | Session   | module archives (`modules/*.rim`, `.mod`)| until the module is unloaded |
//! | Primary   | `chitin.key` and its BIF files           | the context                  |
//! | Global    | texture packs (`TexturePacks/*.erf`)     | the context                  |
//!
//! On top of [`Resources::resolve`] the context offers typed loaders for tables, GFF files,
//! templates, models, textures and room layouts. 2DA tables are cached by name.
//!
//! ```no_run
//! use aurora_common::{ResourceKey, ResourceType};
//! use aurora_resources::{Module, Resources, ResourcesOptions};
//!
//! # fn doit() -> aurora_resources::error::Result<()> {
//! let mut resources = Resources::open(
//!     "/games/swkotor".as_ref(),
//!     ResourcesOptions::builder().build(),
//! )?;
//! let module = Module::load(&mut resources, "danm13")?;
//! let bastila = resources.load_template(&ResourceKey::new("p_bastila", ResourceType::Utc))?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod layout;
pub mod module;
pub mod resources;

pub use layout::Layout;
pub use module::{Instance, Module};
pub use resources::{Container, Resources, ResourcesOptions};
