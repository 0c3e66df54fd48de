//! # TPC Format Documentation
//!
//! This crate reads the **TPC** texture containers used by *Aurora* engine games. A TPC file is a
//! fixed size header, a chain of mipmap levels and an optional plain text TXI trailer carrying
//! material hints such as the environment map to use.
//!
//! ## File Structure
//!
//! | Offset (bytes) | Field        | Description                                                     |
//! |----------------|--------------|-----------------------------------------------------------------|
//! | 0x0000         | Data size    | 4 bytes: Size of the first level when compressed, 0 otherwise   |
//! | 0x0004         | Alpha test   | 4 bytes: `f32` alpha cutoff                                     |
//! | 0x0008         | Width        | 2 bytes: Width of the first level                               |
//! | 0x000A         | Height       | 2 bytes: Height of the first level                              |
//! | 0x000C         | Encoding     | 1 byte: See [`Encoding`]                                        |
//! | 0x000D         | Mipmap count | 1 byte: Number of levels, at least one is always present        |
//! | 0x000E         | Reserved     | 114 bytes                                                       |
//! | 0x0080         | Pixel data   | Every level back to back                                        |
//! | ...            | TXI          | Remainder of the file, whitespace separated text                |
//!
//! ## Encodings
//!
//! | Code | Encoding | Uncompressed   | Compressed |
//! |------|----------|----------------|------------|
//! | 1    | Gray     | 8 bit gray     | -          |
//! | 2    | RGB      | 24 bit RGB     | DXT1       |
//! | 4    | RGBA     | 32 bit RGBA    | DXT5       |
//! | 12   | BGRA     | 32 bit BGRA    | -          |
//!
//! Gray levels are expanded to RGB while reading, so a decoded [`Texture`] never exposes them.
//!
//! Each level halves the dimensions of the previous one, never going below one pixel.

pub mod error;
pub mod read;
pub mod types;

pub use read::{MipMap, Texture};
pub use types::{data_size, Encoding, PixelFormat};
