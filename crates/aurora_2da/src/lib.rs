//! # 2DA Format Documentation
//!
//! This crate reads the binary **2DA** lookup tables used by *Aurora* engine games. A 2DA file is
//! a grid of optional strings addressed by row index and column name, used for everything from
//! creature appearances to ambient music tracks.
//!
//! ## File Structure
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Magic number           | 8 bytes: `2DA V2.b`                                        |
//! | 0x0008         | Newline                | 1 byte: 0x0A                                               |
//! | 0x0009         | Column names           | Tab separated names, terminated by a null byte             |
//! | variable       | Row count              | 4 bytes: Number of rows                                    |
//! | variable       | Row labels             | One tab terminated label per row, not null terminated      |
//! | variable       | Cell offsets           | rows * columns * 2 bytes: offsets into the data region     |
//! | variable       | Data size              | 2 bytes: Size of the data region                           |
//! | variable       | Data region            | Null terminated cell strings                               |
//!
//! ### Cells
//!
//! Cell offsets are stored row-major. Every offset is relative to the start of the data region,
//! so identical strings are usually stored once and shared between cells. A cell holding an empty
//! string or the placeholder `****` has no value.
//!
//! ## Additional Information
//!
//! - **File Extension**: `.2da`
//! - **Endianness**: Little-endian for all multi-byte integers
//! - **Row labels**: Only their count matters, the labels themselves are discarded
//!

pub mod error;
pub mod read;

pub use read::TwoDa;
