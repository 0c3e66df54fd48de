//! # MDL Format Documentation
//!
//! This crate reads the compiled models of *Aurora* engine games. A model is split over two
//! files: the **MDL** holds the node hierarchy, materials, animation curves and face indices,
//! while the **MDX** holds interleaved per-vertex records (positions, normals, texture
//! coordinates and skin weights).
//!
//! ## File Structure
//!
//! | Offset (bytes) | Field             | Description                                              |
//! |----------------|-------------------|----------------------------------------------------------|
//! | 0x0000         | Binary flag       | 4 bytes: zero for compiled models                        |
//! | 0x0004         | Model data size   | 4 bytes                                                  |
//! | 0x0008         | Raw data size     | 4 bytes                                                  |
//! | 0x000C         | Geometry header   | 80 bytes: name, root node offset, node count             |
//! | 0x005C         | Model header      | 56 bytes: classification, animations, bounds, scale      |
//! | 0x0094         | Super model       | 32 bytes: model providing shared animations              |
//! | 0x00B4         | ...               | 16 bytes                                                 |
//! | 0x00C4         | Name table        | 12 bytes: offset and count of the node name offsets      |
//!
//! Every offset stored inside the MDL is relative to 0x000C. Offsets into the MDX are absolute.
//!
//! ## Nodes
//!
//! Each node starts with an 80 byte header carrying its [`node::NodeFlags`], the index of its
//! name, its position and orientation, and arrays locating its children and animation curves.
//! The flags select a trailer that directly follows the header:
//!
//! | Flag   | Trailer                                                   |
//! |--------|-----------------------------------------------------------|
//! | Saber  | Mesh trailer, then 12 bytes of blade offsets              |
//! | Skin   | Mesh trailer, then 102 bytes of skinning data             |
//! | Mesh   | 332 bytes, 340 in files of the second game                |
//! | Light  | 92 bytes of light and flare settings                      |
//!
//! Children are located purely through the child offset array, so the decoded tree follows the
//! offsets rather than the physical order of the records.
//!
//! ## Axes
//!
//! Positions are converted from the game's Z up axes by swapping Y and Z; orientations are
//! additionally negated, see [`aurora_common::coords`].

pub mod curve;
pub mod error;
pub mod model;
pub mod node;
pub mod read;
pub mod types;

pub use aurora_common::Game;
pub use model::{Animation, Event, Model};
pub use node::{ModelNode, NodeFlags, NodeId, NodeKind, NodeTree};
pub use read::ModelReader;
