//! Conversion from the game's Z up axes to Y up axes
//!
//! Both conversions are their own inverse, so the same functions convert back.

use glam::{Quat, Vec3};

/// Swap the Y and Z components of a position
#[inline]
pub fn remap_position(v: Vec3) -> Vec3 {
    Vec3::new(v.x, v.z, v.y)
}

/// Swap the Y and Z components of an orientation and negate its vector part
#[inline]
pub fn remap_orientation(q: Quat) -> Quat {
    Quat::from_xyzw(-q.x, -q.z, -q.y, q.w)
}

/// Build a position from raw on-disk components
#[inline]
pub fn position_from_raw(x: f32, y: f32, z: f32) -> Vec3 {
    remap_position(Vec3::new(x, y, z))
}

/// Build an orientation from raw on-disk components
#[inline]
pub fn orientation_from_raw(x: f32, y: f32, z: f32, w: f32) -> Quat {
    remap_orientation(Quat::from_xyzw(x, y, z, w))
}
