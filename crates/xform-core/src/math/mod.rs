// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Double-precision math helpers: vectors, quaternions, row-vector affine
//! matrices and Euler rotation orders.
//!
//! Everything is computed in `f64` regardless of how op values are stored;
//! narrower storage is converted at the op read/write boundary only.

mod euler;
mod mat4;
mod quat;
mod vec3;

pub use euler::{Axis, RotationOrder};
pub use mat4::Mat4;
pub use quat::Quat;
pub use vec3::Vec3;

/// Threshold below which edits and degenerate values are treated as zero.
pub const EPSILON: f64 = 1e-6;

/// Converts degrees to radians.
pub fn deg_to_rad(value: f64) -> f64 {
    value.to_radians()
}

/// Converts radians to degrees.
pub fn rad_to_deg(value: f64) -> f64 {
    value.to_degrees()
}

/// Converts a vector of degrees to radians componentwise.
pub fn deg_to_rad3(v: &Vec3) -> Vec3 {
    Vec3::new(deg_to_rad(v.x()), deg_to_rad(v.y()), deg_to_rad(v.z()))
}

/// Converts a vector of radians to degrees componentwise.
pub fn rad_to_deg3(v: &Vec3) -> Vec3 {
    Vec3::new(rad_to_deg(v.x()), rad_to_deg(v.y()), rad_to_deg(v.z()))
}
