//! Shared building blocks for the *Aurora* (Odyssey) engine crates.
//!
//! Every resource shipped with the game is identified by a [`ResourceKey`]: a case-insensitive,
//! at most 16 character name (the *resref*) paired with a numeric [`ResourceType`]. The archive
//! crates map keys to byte ranges, the codec crates decode those byte ranges.
//!
//! The codecs all share the same reading discipline: structures reference each other through
//! absolute byte offsets, so a decoder seeks to an offset, reads what it needs and then restores
//! the position it came from. [`cursor::SeekExt::peek_at`] implements that save/seek/restore step
//! once for every reader in the workspace.
//!
//! ## Coordinate system
//!
//! The game stores geometry with Z up. Decoded positions are converted to a Y up convention by
//! swapping the second and third components, and orientations additionally negate their vector
//! part to account for the change of handedness. See [`coords`].
//!
//! ## Additional Information
//!
//! - **Endianness**: Little-endian for all multi-byte integers and floats
//! - **Strings**: fixed-length byte regions are trimmed at the first null byte
//!

pub mod coords;
pub mod cursor;
pub mod error;
pub mod game;
pub mod resref;
pub mod restype;
pub mod source;

pub use game::Game;
pub use resref::{ResRef, ResourceKey};
pub use restype::ResourceType;
pub use source::ByteSource;
