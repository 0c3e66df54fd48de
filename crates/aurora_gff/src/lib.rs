//! # GFF Format Documentation
//!
//! This crate reads and writes the **GFF** (Generic File Format) files used by *Aurora* engine
//! games for nearly every kind of game object definition: module information (`.ifo`), areas
//! (`.are`, `.git`), creature/door/placeable/item templates (`.utc`, `.utd`, `.utp`, `.uti`),
//! dialogues and more. All of them share the same self describing binary tree layout.
//!
//! ## File Structure
//!
//! A GFF file starts with a 56 byte header, followed by six tables located through the header.
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | File type              | 4 bytes: e.g. `UTC `, `GIT `, `IFO `                       |
//! | 0x0004         | Version                | 4 bytes: `V3.2` (any `V3.x` is accepted)                   |
//! | 0x0008         | Struct offset / count  | 8 bytes: table of 12 byte struct records                   |
//! | 0x0010         | Field offset / count   | 8 bytes: table of 12 byte field records                    |
//! | 0x0018         | Label offset / count   | 8 bytes: table of 16 byte labels                           |
//! | 0x0020         | Field data offset/size | 8 bytes: blob holding variable length field payloads       |
//! | 0x0028         | Field indices off/size | 8 bytes: arrays of field indices for multi-field structs   |
//! | 0x0030         | List indices off/size  | 8 bytes: count prefixed arrays of struct indices           |
//!
//! ### Struct records
//!
//! | Offset (bytes) | Field                  | Description                                             |
//! |----------------|------------------------|---------------------------------------------------------|
//! | 0x0000         | Struct id              | 4 bytes: Programmer defined type of the struct          |
//! | 0x0004         | Data                   | 4 bytes: Field index, or offset into the field indices  |
//! | 0x0008         | Field count            | 4 bytes: Number of fields in the struct                 |
//!
//! When a struct has exactly one field, the data word is the index of that field. With more than
//! one field it is a byte offset into the field indices table, where `field count` indices follow.
//!
//! ### Field records
//!
//! | Offset (bytes) | Field                  | Description                                             |
//! |----------------|------------------------|---------------------------------------------------------|
//! | 0x0000         | Type                   | 4 bytes: One of the [`FieldType`] codes                 |
//! | 0x0004         | Label index            | 4 bytes: Index into the label table                     |
//! | 0x0008         | Data                   | 4 bytes: Inline value or offset, depending on the type  |
//!
//! Values of up to four bytes (`Byte`, `Char`, `Word`, `Short`, `DWord`, `Int`, `Float`) are
//! stored inline. Every other value lives in the field data blob and the data word is its offset,
//! except for `Struct` (a struct index) and `List` (an offset into the list indices table).
//!
//! ## Additional Information
//!
//! - **Endianness**: Little-endian for all multi-byte integers and floats
//! - **Vectors**: stored Z up, decoded with their Y and Z components swapped
//! - **ResRefs**: one length byte followed by the name, decoded in lowercase
//!

pub mod error;
pub mod node;
pub mod read;
#[cfg(feature = "serde")]
pub mod serde;
pub mod types;
pub mod write;

pub use node::{FieldType, Gender, GffNode, GffValue, Language, LocString, LocalizedString};
pub use read::{Gff, GffReader};
pub use write::GffWriter;
