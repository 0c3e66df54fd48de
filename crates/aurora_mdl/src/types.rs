//! Fixed size records of the binary model format
//!
//! Offsets stored in these records are relative to [`MODEL_DATA_OFFSET`] in the MDL stream, and
//! absolute in the MDX stream.

use binrw::{BinRead, BinWrite};

/// Size of [`FileHeader`]; every offset in the MDL stream is relative to this
pub const MODEL_DATA_OFFSET: u64 = 12;

/// Size of [`NodeHeader`] on disk
pub const NODE_HEADER_SIZE: u32 = 80;

/// Size of [`CurveKey`] on disk
pub const CURVE_KEY_SIZE: u32 = 16;

/// Size of [`EventRecord`] on disk
pub const EVENT_SIZE: u32 = 40;

/// The 12 byte header in front of the model data
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct FileHeader {
    /// Zero for binary models
    pub binary_flag: u32,

    /// Size of the model data
    pub model_data_size: u32,

    /// Size of the raw data following the model data
    pub raw_data_size: u32,
}

impl FileHeader {
    /// Absolute offset of the raw data
    pub fn raw_data_offset(&self) -> u64 {
        MODEL_DATA_OFFSET + self.model_data_size as u64
    }
}

/// Offset, length and allocated capacity of an on-disk array
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct ArrayDef {
    pub offset: u32,
    pub count: u32,
    pub capacity: u32,
}

impl ArrayDef {
    pub fn new(offset: u32, count: u32) -> ArrayDef {
        ArrayDef {
            offset,
            count,
            capacity: count,
        }
    }

    /// Absolute offset of the first element in the MDL stream
    pub fn position(&self) -> u64 {
        MODEL_DATA_OFFSET + self.offset as u64
    }
}

/// Header shared by the model and its animations
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq)]
#[brw(little)]
pub struct GeometryHeader {
    pub function_pointers: [u32; 2],
    pub name: [u8; 32],
    pub root_node_offset: u32,
    pub node_count: u32,
    pub unknown: [u32; 6],
    pub reference_count: u32,
    #[brw(pad_after = 3)]
    pub geometry_type: u8,
}

/// Model wide properties following the geometry header
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq)]
#[brw(little)]
pub struct ModelHeader {
    pub classification: u8,
    pub sub_classification: u8,
    pub smoothing: u8,
    pub fogged: u8,
    pub child_model_count: u32,
    pub animations: ArrayDef,
    pub parent_model_pointer: u32,
    pub bounds_min: [f32; 3],
    pub bounds_max: [f32; 3],
    pub radius: f32,
    pub scale: f32,
    pub super_model: [u8; 32],
    pub root_node_offset: u32,
    pub unknown: u32,
    pub mdx_size: u32,
    pub mdx_offset: u32,
    pub names: ArrayDef,
}

/// Animation header, found through the model header's animation offsets
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq)]
#[brw(little)]
pub struct AnimationHeader {
    pub geometry: GeometryHeader,
    pub length: f32,
    pub transition: f32,
    pub anim_root: [u8; 32],
    pub events: ArrayDef,
    pub unknown: u32,
}

/// A timed event of an animation
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq)]
#[brw(little)]
pub struct EventRecord {
    pub time: f32,
    #[brw(pad_after = 4)]
    pub name: [u8; 32],
}

/// Fields common to every node
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq)]
#[brw(little)]
pub struct NodeHeader {
    /// Raw [`crate::node::NodeFlags`]
    pub node_type: u16,

    /// Index of the geometry node an animation node animates
    pub super_index: u16,

    /// Index into the name table
    pub name_index: u16,
    pub padding: u16,
    pub root_pointer: u32,
    pub parent_pointer: u32,

    /// Local position as stored (x, y, z)
    pub position: [f32; 3],

    /// Local orientation as stored (w, x, y, z)
    pub orientation: [f32; 4],

    /// Offsets of the child node headers
    pub children: ArrayDef,

    /// Curve key table
    pub curve_keys: ArrayDef,

    /// Curve data blob, counted in 4 byte values
    pub curve_data: ArrayDef,
}

/// One entry of a node's curve key table
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct CurveKey {
    pub curve_type: u32,
    pub unknown: u16,
    pub frame_count: u16,
    pub time_index: u16,
    pub data_index: u16,
    #[brw(pad_after = 3)]
    pub columns: u8,
}

/// Mesh properties following the node header of mesh nodes
#[derive(BinRead, BinWrite, Debug, Default, Clone, PartialEq)]
#[brw(little)]
#[br(import(tsl: bool))]
pub struct MeshHeader {
    pub function_pointers: [u32; 2],
    pub faces: ArrayDef,
    pub bounds_min: [f32; 3],
    pub bounds_max: [f32; 3],
    pub radius: f32,
    pub average: [f32; 3],
    pub diffuse: [f32; 3],
    pub ambient: [f32; 3],
    pub transparency_hint: u32,
    pub texture_0: [u8; 32],
    pub texture_1: [u8; 32],
    pub texture_2: [u8; 12],
    pub texture_3: [u8; 12],
    pub indices: ArrayDef,

    /// Offsets of the face index arrays, the first one is used
    pub face_offsets: ArrayDef,
    pub inverted_counters: ArrayDef,
    pub unknown: [u32; 3],
    pub saber_bytes: [u8; 8],
    pub animate_uv: u32,
    pub uv_direction: [f32; 2],
    pub uv_jitter: f32,
    pub uv_jitter_speed: f32,

    /// Size of one vertex record in the MDX stream
    pub mdx_data_size: u32,
    pub mdx_data_bitmap: u32,
    pub mdx_vertex_offset: u32,
    pub mdx_normal_offset: u32,
    pub mdx_unused_offset: u32,
    pub mdx_uv_offsets: [u32; 4],
    pub mdx_tangent_offsets: [u32; 4],
    pub vertex_count: u16,
    pub texture_count: u16,
    pub has_lightmap: u8,
    pub rotate_texture: u8,
    pub background_geometry: u8,
    pub shadow: u8,
    pub beaming: u8,
    pub render: u8,

    /// Only present in files of the second game
    #[br(if(tsl))]
    pub tsl: Option<TslMeshFields>,
    pub padding: u16,
    pub total_area: f32,
    pub unknown_tail: u32,

    /// Absolute offset of the first vertex record in the MDX stream
    pub mdx_node_data_offset: u32,
    pub vertex_coords_offset: u32,
}

/// Mesh fields added by the second game
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct TslMeshFields {
    #[brw(pad_after = 1)]
    pub dirt_enabled: u8,
    pub dirt_texture: u16,
    pub dirt_coord_space: u16,
    #[brw(pad_after = 1)]
    pub hide_in_holograms: u8,
}

/// Skin properties following the mesh header of skinned meshes
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct SkinHeader {
    pub weights: ArrayDef,

    /// Offset of the four bone weights inside each MDX vertex record
    pub mdx_weights_offset: u32,

    /// Offset of the four bone indices inside each MDX vertex record
    pub mdx_bones_offset: u32,
    pub bone_map_offset: u32,
    pub bone_map_count: u32,
    pub bone_orientations: ArrayDef,
    pub bone_positions: ArrayDef,
    pub bone_constants: ArrayDef,
    #[brw(pad_after = 6)]
    pub bone_to_node: [i16; 16],
}

/// Light properties following the node header of lights
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq)]
#[brw(little)]
pub struct LightHeader {
    pub flare_radius: f32,
    pub unknown: ArrayDef,
    pub flare_sizes: ArrayDef,
    pub flare_positions: ArrayDef,
    pub flare_color_shifts: ArrayDef,
    pub flare_textures: ArrayDef,
    pub priority: u32,
    pub ambient_only: u32,
    pub dynamic_type: u32,
    pub affect_dynamic: u32,
    pub shadow: u32,
    pub generate_flare: u32,
    pub fading_light: u32,
}

/// Lightsaber blade offsets following the mesh header of saber nodes
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct SaberHeader {
    pub vertex_coords_offset: u32,
    pub tex_coords_offset: u32,
    pub saber_data_offset: u32,
}
