//! Animation curves attached to nodes
//!
//! A node stores its curves as a table of 16 byte keys and a blob of 4 byte values. Each key
//! names the animated property, where the frame times start in the blob, where the values start,
//! and how many columns each value occupies. The same blob is read both as floats and as packed
//! integers, depending on the key.

use aurora_common::coords::{remap_orientation, remap_position};
use glam::{Quat, Vec3};
use std::fmt;
use tracing::warn;

use crate::{
    error::{Error, Result},
    node::NodeFlags,
    types::CurveKey,
};

/// Property animated by a curve
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CurveType {
    Position,
    Orientation,
    Scale,

    // Lights
    Color,
    Radius,
    ShadowRadius,
    Multiplier,

    // Meshes
    SelfIllumColor,
    Alpha,

    // Emitters
    AlphaEnd,
    AlphaStart,
    AlphaMid,
    BirthRate,
    BounceCo,
    ColorEnd,
    ColorStart,
    ColorMid,
    CombineTime,
    Drag,
    Fps,
    FrameEnd,
    FrameStart,
    Grav,
    LifeExp,
    Mass,
    P2PBezier2,
    P2PBezier3,
    ParticleRot,
    RandVel,
    SizeStart,
    SizeEnd,
    SizeMid,
    SizeStartY,
    SizeEndY,
    SizeMidY,
    Spread,
    Threshold,
    Velocity,
    XSize,
    YSize,
    BlurLength,
    LightningDelay,
    LightningRadius,
    LightningScale,
    Detonate,
    PercentStart,
    PercentMid,
    PercentEnd,
}

/// How the values of a curve are laid out
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ValueKind {
    Vector,
    Orientation,
    Color,
    Scalar,
}

impl CurveType {
    /// Resolve a curve type code in the context of the node carrying it
    ///
    /// Codes overlap between node classes, so the node's flags choose the table first. Nodes
    /// whose flags match no table fall back to the mesh, emitter and light tables in that order.
    /// Code 100 is a self illumination color on every node class.
    ///
    /// ```
    /// use aurora_mdl::{curve::CurveType, node::NodeFlags};
    ///
    /// let light = NodeFlags::HEADER | NodeFlags::LIGHT;
    /// let mesh = NodeFlags::HEADER | NodeFlags::MESH;
    ///
    /// assert_eq!(CurveType::resolve(8, mesh), Some(CurveType::Position));
    /// assert_eq!(CurveType::resolve(100, light), Some(CurveType::SelfIllumColor));
    /// assert_eq!(CurveType::resolve(100, mesh), Some(CurveType::SelfIllumColor));
    /// assert_eq!(CurveType::resolve(1, mesh), None);
    /// ```
    pub fn resolve(code: u32, flags: NodeFlags) -> Option<CurveType> {
        match code {
            8 => return Some(CurveType::Position),
            20 => return Some(CurveType::Orientation),
            36 => return Some(CurveType::Scale),
            _ => {}
        }

        if flags.contains(NodeFlags::LIGHT) {
            if let Some(t) = Self::light(code) {
                return Some(t);
            }
        }
        if flags.contains(NodeFlags::EMITTER) {
            if let Some(t) = Self::emitter(code) {
                return Some(t);
            }
        }

        Self::mesh(code)
            .or_else(|| Self::emitter(code))
            .or_else(|| Self::light(code))
    }

    fn light(code: u32) -> Option<CurveType> {
        Some(match code {
            76 => CurveType::Color,
            88 => CurveType::Radius,
            96 => CurveType::ShadowRadius,
            140 => CurveType::Multiplier,
            _ => return None,
        })
    }

    fn mesh(code: u32) -> Option<CurveType> {
        Some(match code {
            100 => CurveType::SelfIllumColor,
            128 => CurveType::Alpha,
            _ => return None,
        })
    }

    fn emitter(code: u32) -> Option<CurveType> {
        Some(match code {
            80 => CurveType::AlphaEnd,
            84 => CurveType::AlphaStart,
            88 => CurveType::BirthRate,
            92 => CurveType::BounceCo,
            96 => CurveType::ColorEnd,
            108 => CurveType::ColorStart,
            120 => CurveType::CombineTime,
            124 => CurveType::Drag,
            128 => CurveType::Fps,
            132 => CurveType::FrameEnd,
            136 => CurveType::FrameStart,
            140 => CurveType::Grav,
            144 => CurveType::LifeExp,
            148 => CurveType::Mass,
            152 => CurveType::P2PBezier2,
            156 => CurveType::P2PBezier3,
            160 => CurveType::ParticleRot,
            164 => CurveType::RandVel,
            168 => CurveType::SizeStart,
            172 => CurveType::SizeEnd,
            176 => CurveType::SizeStartY,
            180 => CurveType::SizeEndY,
            184 => CurveType::Spread,
            188 => CurveType::Threshold,
            192 => CurveType::Velocity,
            196 => CurveType::XSize,
            200 => CurveType::YSize,
            204 => CurveType::BlurLength,
            208 => CurveType::LightningDelay,
            212 => CurveType::LightningRadius,
            216 => CurveType::LightningScale,
            228 => CurveType::Detonate,
            464 => CurveType::AlphaMid,
            468 => CurveType::ColorMid,
            480 => CurveType::PercentStart,
            481 => CurveType::PercentMid,
            482 => CurveType::PercentEnd,
            484 => CurveType::SizeMid,
            488 => CurveType::SizeMidY,
            _ => return None,
        })
    }

    pub fn value_kind(self) -> ValueKind {
        match self {
            CurveType::Position | CurveType::P2PBezier3 => ValueKind::Vector,
            CurveType::Orientation => ValueKind::Orientation,
            CurveType::Color
            | CurveType::ColorStart
            | CurveType::ColorMid
            | CurveType::ColorEnd
            | CurveType::SelfIllumColor => ValueKind::Color,
            _ => ValueKind::Scalar,
        }
    }
}

impl fmt::Display for CurveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Value of one frame
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum KeyValue {
    Scalar(f32),
    Vector(Vec3),

    /// Value followed by its two tangents, all axis remapped
    Bezier([Vec3; 3]),
    Orientation(Quat),

    /// RGB in the 0..=1 range
    Color(Vec3),
}

impl KeyValue {
    /// Sampled vector of vector and bezier frames
    pub fn as_vector(&self) -> Option<Vec3> {
        match self {
            KeyValue::Vector(v) | KeyValue::Bezier([v, _, _]) => Some(*v),
            _ => None,
        }
    }

    pub fn as_quat(&self) -> Option<Quat> {
        match self {
            KeyValue::Orientation(q) => Some(*q),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<f32> {
        match self {
            KeyValue::Scalar(v) => Some(*v),
            _ => None,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Keyframe {
    pub time: f32,
    pub value: KeyValue,
}

/// A frame indexed animation channel
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    pub curve_type: CurveType,
    pub keys: Vec<Keyframe>,
}

/// Unpack an orientation quantized into 11, 11 and 10 bits
///
/// The vector part is stored as fixed point values in `[-1, 1]`; `w` is rebuilt from the unit
/// length constraint. Components that are already too long are normalized and `w` is zero.
pub fn unpack_quaternion(packed: u32) -> Quat {
    let mut x = (packed & 0x07FF) as f32 / 1023.0 - 1.0;
    let mut y = ((packed >> 11) & 0x07FF) as f32 / 1023.0 - 1.0;
    let mut z = ((packed >> 22) & 0x03FF) as f32 / 511.0 - 1.0;

    let mag_squared = x * x + y * y + z * z;
    let w = if mag_squared < 1.0 {
        (1.0 - mag_squared).sqrt()
    } else {
        let magnitude = mag_squared.sqrt();
        x /= magnitude;
        y /= magnitude;
        z /= magnitude;
        0.0
    };

    Quat::from_xyzw(x, y, z, w)
}

/// Decode a node's curves from its key table and value blob
pub(crate) fn decode_curves(
    keys: &[CurveKey],
    data: &[u32],
    flags: NodeFlags,
    node: &str,
) -> Result<Vec<Curve>> {
    let word = |index: usize| -> Result<u32> {
        data.get(index).copied().ok_or(Error::CurveIndexOutOfRange {
            index,
            len: data.len(),
        })
    };
    let float = |index: usize| word(index).map(f32::from_bits);
    let vec3 = |index: usize| -> Result<Vec3> {
        Ok(Vec3::new(float(index)?, float(index + 1)?, float(index + 2)?))
    };

    let mut curves = Vec::with_capacity(keys.len());
    for key in keys {
        let Some(curve_type) = CurveType::resolve(key.curve_type, flags) else {
            warn!(code = key.curve_type, node, "unknown curve type");
            continue;
        };

        let columns = key.columns as usize;
        let base = key.data_index as usize;
        let mut frames = Vec::with_capacity(key.frame_count as usize);
        for frame in 0..key.frame_count as usize {
            let time = float(key.time_index as usize + frame)?;
            let value = match curve_type.value_kind() {
                ValueKind::Vector => match columns {
                    1 => KeyValue::Vector(Vec3::splat(float(base + frame)?)),
                    3 => KeyValue::Vector(remap_position(vec3(base + frame * 3)?)),
                    _ => {
                        let at = base + frame * 9;
                        KeyValue::Bezier([
                            remap_position(vec3(at)?),
                            remap_position(vec3(at + 3)?),
                            remap_position(vec3(at + 6)?),
                        ])
                    }
                },
                ValueKind::Orientation => {
                    let raw = if columns == 2 {
                        unpack_quaternion(word(base + frame)?)
                    } else {
                        let at = base + frame * columns;
                        Quat::from_xyzw(
                            float(at)?,
                            float(at + 1)?,
                            float(at + 2)?,
                            float(at + 3)?,
                        )
                    };
                    KeyValue::Orientation(remap_orientation(raw))
                }
                ValueKind::Color => KeyValue::Color(vec3(base + frame * columns)? / 255.0),
                ValueKind::Scalar => KeyValue::Scalar(float(base + frame * columns)?),
            };
            frames.push(Keyframe { time, value });
        }

        curves.push(Curve {
            curve_type,
            keys: frames,
        });
    }

    Ok(curves)
}
