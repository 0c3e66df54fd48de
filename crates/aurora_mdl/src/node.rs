//! Decoded model nodes
//!
//! Nodes live in a [`NodeTree`] arena in the order they were decoded, which is a pre-order walk
//! of the on-disk hierarchy. Parent, child and super links are [`NodeId`]s into that arena.

use bitflags::bitflags;
use glam::{Quat, Vec2, Vec3};
use std::fmt;

use crate::curve::Curve;

bitflags! {
    /// Node type bits; a node combines several of them
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct NodeFlags: u16 {
        const HEADER    = 0x0001;
        const LIGHT     = 0x0002;
        const EMITTER   = 0x0004;
        const REFERENCE = 0x0010;
        const MESH      = 0x0020;
        const SKIN      = 0x0040;
        const ANIM      = 0x0080;
        const DANGLY    = 0x0100;
        const AABB      = 0x0200;
        const SABER     = 0x0800;
    }
}

/// Index of a node in its [`NodeTree`]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A model node
#[derive(Debug, Clone, PartialEq)]
pub struct ModelNode {
    /// Name resolved through the model's name table, empty when the index is out of range
    pub name: String,
    pub flags: NodeFlags,

    /// Index of the geometry node this node stands in for
    pub super_index: u16,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,

    /// Local position, axis remapped
    pub position: Vec3,

    /// Local orientation, axis remapped
    pub orientation: Quat,
    pub curves: Vec<Curve>,
    pub kind: NodeKind,
}

impl ModelNode {
    /// Geometry of mesh, skin and saber nodes
    pub fn mesh(&self) -> Option<&Mesh> {
        match &self.kind {
            NodeKind::Mesh(mesh) | NodeKind::Skin(mesh, _) | NodeKind::Saber(mesh, _) => Some(mesh),
            _ => None,
        }
    }

    pub fn skin(&self) -> Option<&Skin> {
        match &self.kind {
            NodeKind::Skin(_, skin) => Some(skin),
            _ => None,
        }
    }

    pub fn light(&self) -> Option<&Light> {
        match &self.kind {
            NodeKind::Light(light) => Some(light),
            _ => None,
        }
    }

    /// Whether this node is a walkmesh
    pub fn is_walkmesh(&self) -> bool {
        self.flags.contains(NodeFlags::AABB)
    }
}

/// Node payload, selected from the flags with saber > skin > mesh > light precedence
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Plain,
    Light(Light),
    Mesh(Mesh),
    Skin(Mesh, Skin),
    Saber(Mesh, Saber),
}

/// Triangle mesh geometry and material
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub bounds_min: Vec3,
    pub bounds_max: Vec3,
    pub radius: f32,
    pub average: Vec3,
    pub diffuse: Vec3,
    pub ambient: Vec3,
    pub transparency_hint: u32,

    /// Texture names; the first is the diffuse map and the second the lightmap
    pub textures: [String; 4],
    pub animate_uv: bool,
    pub uv_direction: Vec2,
    pub uv_jitter: f32,
    pub uv_jitter_speed: f32,
    pub has_lightmap: bool,
    pub rotate_texture: bool,
    pub background_geometry: bool,
    pub shadow: bool,
    pub beaming: bool,
    pub render: bool,
    pub total_area: f32,
    pub dirt: Option<Dirt>,

    /// Vertex positions, axis remapped
    pub vertices: Vec<Vec3>,

    /// Vertex normals, axis remapped and negated
    pub normals: Vec<Vec3>,

    /// One coordinate set per texture
    pub uvs: Vec<Vec<Vec2>>,

    /// Triangles with their winding flipped to match the remapped axes
    pub faces: Vec<[u16; 3]>,
}

impl Mesh {
    pub fn diffuse_map(&self) -> Option<&str> {
        texture_name(&self.textures[0])
    }

    pub fn lightmap(&self) -> Option<&str> {
        texture_name(&self.textures[1])
    }

    /// Flattened triangle list
    pub fn triangles(&self) -> impl Iterator<Item = u32> + '_ {
        self.faces.iter().flatten().map(|&i| i as u32)
    }
}

fn texture_name(name: &str) -> Option<&str> {
    (!name.is_empty() && !name.eq_ignore_ascii_case("null")).then_some(name)
}

/// Dirt settings of meshes from the second game
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Dirt {
    pub enabled: bool,
    pub texture: u16,
    pub coord_space: u16,
    pub hide_in_holograms: bool,
}

/// Per vertex bone weights
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct BoneWeight {
    pub weights: [f32; 4],
    pub bones: [i32; 4],
}

/// Skinning data
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Skin {
    /// One entry per mesh vertex
    pub weights: Vec<BoneWeight>,

    /// Bone index of each model node, or -1
    pub node_to_bone: Vec<f32>,
    pub bone_to_node: [i16; 16],

    /// Rest pose orientations in file axes
    pub bone_orientations: Vec<Quat>,

    /// Rest pose positions, axis remapped
    pub bone_positions: Vec<Vec3>,
}

/// Light and lens flare settings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Light {
    pub flare_radius: f32,
    pub flare_sizes: Vec<f32>,
    pub flare_positions: Vec<f32>,
    pub flare_color_shifts: Vec<Vec3>,
    pub flare_textures: Vec<String>,
    pub priority: u32,
    pub ambient_only: bool,
    pub dynamic_type: u32,
    pub affect_dynamic: bool,
    pub shadow: bool,
    pub generate_flare: bool,
    pub fading_light: bool,
}

/// Raw lightsaber blade offsets, kept as stored
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Saber {
    pub vertex_coords_offset: u32,
    pub tex_coords_offset: u32,
    pub saber_data_offset: u32,
}

/// Arena of nodes in decode order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeTree {
    nodes: Vec<ModelNode>,
}

impl NodeTree {
    pub(crate) fn push(&mut self, node: ModelNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut ModelNode> {
        self.nodes.get_mut(id.0)
    }

    /// The first decoded node
    pub fn root(&self) -> Option<&ModelNode> {
        self.nodes.first()
    }

    pub fn get(&self, id: NodeId) -> Option<&ModelNode> {
        self.nodes.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in pre-order with their ids
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &ModelNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &ModelNode> {
        self.get(id)
            .into_iter()
            .flat_map(|n| n.children.iter())
            .filter_map(|&c| self.get(c))
    }

    /// Find a node by name, ignoring case
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.name.eq_ignore_ascii_case(name))
            .map(NodeId)
    }

    /// Names from the root down to `id`, joined with `/`
    pub fn path(&self, id: NodeId) -> String {
        let mut names = Vec::new();
        let mut current = self.get(id);
        while let Some(node) = current {
            names.push(node.name.as_str());
            current = node.parent.and_then(|p| self.get(p));
        }
        names.reverse();
        names.join("/")
    }
}

impl std::ops::Index<NodeId> for NodeTree {
    type Output = ModelNode;

    fn index(&self, id: NodeId) -> &ModelNode {
        &self.nodes[id.0]
    }
}

#[cfg(test)]
mod test {
    use glam::{Quat, Vec3};
    use pretty_assertions::assert_eq;

    use crate::node::{Mesh, ModelNode, NodeFlags, NodeId, NodeKind, NodeTree};

    fn node(name: &str, parent: Option<NodeId>) -> ModelNode {
        ModelNode {
            name: name.into(),
            flags: NodeFlags::HEADER,
            super_index: 0,
            parent,
            children: Vec::new(),
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            curves: Vec::new(),
            kind: NodeKind::Plain,
        }
    }

    #[test]
    fn paths_and_lookup() {
        let mut tree = NodeTree::default();
        let root = tree.push(node("c_drdastro", None));
        let torso = tree.push(node("torso_g", Some(root)));
        let head = tree.push(node("Head_g", Some(torso)));
        tree.get_mut(root).unwrap().children.push(torso);
        tree.get_mut(torso).unwrap().children.push(head);

        assert_eq!(tree.path(head), "c_drdastro/torso_g/Head_g");
        assert_eq!(tree.find("head_G"), Some(head));
        assert_eq!(tree.find("hand_g"), None);
        assert_eq!(
            tree.children(root).map(|n| n.name.as_str()).collect::<Vec<_>>(),
            vec!["torso_g"]
        );
        assert_eq!(tree[head].parent, Some(torso));
    }

    #[test]
    fn skin_implies_mesh_access() {
        let mut skinned = node("body", None);
        skinned.flags = NodeFlags::HEADER | NodeFlags::MESH | NodeFlags::SKIN;
        skinned.kind = NodeKind::Skin(Mesh::default(), Default::default());

        assert!(skinned.mesh().is_some());
        assert!(skinned.skin().is_some());
        assert!(skinned.light().is_none());
    }

    #[test]
    fn null_textures_are_absent() {
        let mesh = Mesh {
            textures: ["lda_wall01".into(), "NULL".into(), String::new(), String::new()],
            ..Default::default()
        };
        assert_eq!(mesh.diffuse_map(), Some("lda_wall01"));
        assert_eq!(mesh.lightmap(), None);
    }
}
