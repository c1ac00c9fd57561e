// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shear stored in the 4x4 matrix convention.
//!
//! The Y axis row leans along X by `xy`; the Z axis row leans along X by
//! `xz` and along Y by `yz`.

use crate::math::{Mat4, Vec3};

/// Builds the shear matrix with rows `(1,0,0)`, `(xy,1,0)`, `(xz,yz,1)`.
///
/// ```
/// use xform_core::shear::{read_shear, shear_matrix};
/// let m = shear_matrix(0.5, 0.25, -1.0);
/// assert_eq!(read_shear(&m).to_array(), [0.5, 0.25, -1.0]);
/// ```
pub fn shear_matrix(xy: f64, xz: f64, yz: f64) -> Mat4 {
    Mat4::from_rows(
        Vec3::UNIT_X,
        Vec3::new(xy, 1.0, 0.0),
        Vec3::new(xz, yz, 1.0),
        Vec3::ZERO,
    )
}

/// Reads `(xy, xz, yz)` back from a shear matrix.
pub fn read_shear(m: &Mat4) -> Vec3 {
    Vec3::new(m.at(1, 0), m.at(2, 0), m.at(2, 1))
}
