//! This library handles reading the resource archives of *Aurora* (Odyssey) engine games and
//! creating ERF archives.
//!
//! # Archive Format Documentation
//!
//! Every archive maps a [`ResourceKey`](aurora_common::ResourceKey), a resource name together
//! with a numeric type, to a byte range of the archive file. Three layouts exist:
//!
//! - **KEY + BIF**: `chitin.key` lists the BIF data files and the id of every resource; the BIF
//!   files hold the data, addressed by id only.
//! - **ERF**: a self-contained archive with its own key table (`.erf`, `.mod`, `.sav`).
//! - **RIM**: a simpler self-contained archive used for modules (`.rim`).
//!
//! ## BIF
//!
//! | Offset (bytes) | Field                  | Description                                     |
//! |----------------|------------------------|-------------------------------------------------|
//! | 0x0000         | Signature              | 8 bytes: `BIFFV1  `                             |
//! | 0x0008         | Variable Count         | 4 bytes: Number of variable resources           |
//! | 0x000C         | Fixed Count            | 4 bytes: Number of fixed resources, always 0    |
//! | 0x0010         | Variable Table Offset  | 4 bytes: Offset to the variable resource table  |
//!
//! Each variable resource record is 16 bytes: id, offset, size and type, all 4 bytes. Only the
//! low 20 bits of the id are meaningful inside the BIF.
//!
//! ## KEY
//!
//! | Offset (bytes) | Field                  | Description                                     |
//! |----------------|------------------------|-------------------------------------------------|
//! | 0x0000         | Signature              | 8 bytes: `KEY V1  `                             |
//! | 0x0008         | File Count             | 4 bytes: Number of BIF files                    |
//! | 0x000C         | Key Count              | 4 bytes: Number of resource keys                |
//! | 0x0010         | File Table Offset      | 4 bytes: Offset to the BIF file table           |
//! | 0x0014         | Key Table Offset       | 4 bytes: Offset to the resource key table       |
//! | 0x0018         | Build Year             | 4 bytes: Years since 1900                       |
//! | 0x001C         | Build Day              | 4 bytes: Days since January 1st                 |
//!
//! File records are 12 bytes: file size (4), name offset (4), name size (2) and drives (2).
//! Key records are 22 bytes: a null padded 16 byte resref, the type (2) and the resource id (4).
//! The top 12 bits of the id are the index of the BIF in the file table, the low 20 bits the
//! index of the resource inside that BIF.
//!
//! ## ERF
//!
//! | Offset (bytes) | Field                  | Description                                     |
//! |----------------|------------------------|-------------------------------------------------|
//! | 0x0000         | File Type              | 4 bytes: `ERF `, `MOD `, `SAV ` or `HAK `       |
//! | 0x0004         | Version                | 4 bytes: `V1.0`                                 |
//! | 0x0008         | Language Count         | 4 bytes: Number of localized descriptions       |
//! | 0x000C         | Localized String Size  | 4 bytes: Size of the description block          |
//! | 0x0010         | Entry Count            | 4 bytes: Number of resources                    |
//! | 0x0014         | Localized String Offset| 4 bytes: Offset to the description block        |
//! | 0x0018         | Key List Offset        | 4 bytes: Offset to the key list                 |
//! | 0x001C         | Resource List Offset   | 4 bytes: Offset to the resource list            |
//! | 0x0020         | Build Year             | 4 bytes: Years since 1900                       |
//! | 0x0024         | Build Day              | 4 bytes: Days since January 1st                 |
//! | 0x0028         | Description StrRef     | 4 bytes: Talk table reference, or `0xFFFFFFFF`  |
//! | 0x002C         | Reserved               | 116 bytes                                       |
//!
//! Descriptions are a language id (4), a size (4) and that many bytes of text. Key records are
//! 24 bytes: resref (16), resource index (4), type (2) and 2 unused bytes. Resource records are
//! 8 bytes: offset and size.
//!
//! ## RIM
//!
//! | Offset (bytes) | Field                  | Description                                     |
//! |----------------|------------------------|-------------------------------------------------|
//! | 0x0000         | Signature              | 8 bytes: `RIM V1.0`                             |
//! | 0x0008         | Unknown                | 4 bytes                                         |
//! | 0x000C         | Entry Count            | 4 bytes: Number of resources                    |
//! | 0x0010         | Entry Offset           | 4 bytes: Offset to the entry table              |
//! | 0x0014         | Reserved               | 140 bytes                                       |
//!
//! Entries are 32 bytes: resref (16), type (2), 2 unused bytes, id (4), offset (4) and size (4).
//!
//! ## Additional Information
//!
//! - **Endianness**: Little-endian for all multi-byte integers
//! - **Names**: resrefs are case-insensitive and at most 16 bytes
//!

pub mod bif;
pub mod container;
pub mod dir;
pub mod erf;
pub mod error;
pub mod key;
pub mod rim;
pub mod types;
pub mod write;

pub use bif::BifArchive;
pub use container::{ArchiveEntry, ArchiveFile, ResourceContainer};
pub use dir::DirectoryContainer;
pub use erf::ErfArchive;
pub use key::{ChitinIndex, KeyFile};
pub use rim::RimArchive;
pub use write::ErfWriter;
