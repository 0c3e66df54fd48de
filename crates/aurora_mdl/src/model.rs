//! Decoded models and animations

use aurora_common::Game;
use bitflags::bitflags;
use glam::Vec3;
use std::io::{Read, Seek};

use crate::{
    curve::CurveType,
    error::Result,
    node::{ModelNode, NodeId, NodeTree},
    read::ModelReader,
};

bitflags! {
    /// What the model is used for
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Classification: u8 {
        const EFFECT    = 0x01;
        const TILE      = 0x02;
        const CHARACTER = 0x04;
        const DOOR      = 0x08;
    }
}

/// A decoded MDL/MDX pair
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub name: String,

    /// Model whose animations this one borrows, `None` for `NULL`
    pub super_model: Option<String>,
    pub classification: Classification,

    /// Bounding box as stored
    pub bounds_min: Vec3,
    pub bounds_max: Vec3,
    pub radius: f32,
    pub scale: f32,
    pub child_model_count: u32,

    /// Absolute offset of the raw data section of the MDL stream
    pub raw_data_offset: u64,

    /// Geometry nodes
    pub nodes: NodeTree,
    pub animations: Vec<Animation>,
}

/// An animation with its own node tree
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    pub name: String,

    /// Length in seconds
    pub length: f32,

    /// Blend time from the previous animation, in seconds
    pub transition: f32,

    /// Name of the node the animation is rooted at
    pub anim_root: String,
    pub events: Vec<Event>,

    /// Animation nodes; their super index points into the model's geometry nodes
    pub nodes: NodeTree,
}

/// A named trigger at a point of an animation
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub time: f32,
    pub name: String,
}

impl Model {
    /// Decode a model from its MDL and MDX streams
    ///
    /// `game` selects the mesh layout, which grew by 8 bytes in the second game.
    pub fn read<M, X>(mdl: M, mdx: X, game: Game) -> Result<Model>
    where
        M: Read + Seek,
        X: Read + Seek,
    {
        ModelReader::new(mdl, mdx, game).read_model()
    }

    pub fn animation(&self, name: &str) -> Option<&Animation> {
        self.animations
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
    }

    /// Geometry node an animation node stands in for, or the node itself when its super index is
    /// out of range
    pub fn super_node<'a>(&'a self, node: &'a ModelNode) -> &'a ModelNode {
        self.nodes
            .get(NodeId(node.super_index as usize))
            .unwrap_or(node)
    }

    /// Position keys of an animation node offset by the rest position of its super node
    ///
    /// Position curves of animations are relative to the geometry they move.
    pub fn absolute_positions(&self, node: &ModelNode) -> Vec<(f32, Vec3)> {
        let rest = self.super_node(node).position;
        node.curves
            .iter()
            .filter(|c| c.curve_type == CurveType::Position)
            .flat_map(|c| c.keys.iter())
            .filter_map(|k| Some((k.time, k.value.as_vector()? + rest)))
            .collect()
    }
}
