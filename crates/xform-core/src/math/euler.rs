// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Euler rotation orders driven by one per-order table.
//!
//! Each order names the axis applied first, second and third (`Xyz` rotates
//! about X, then Y, then Z, giving the row-vector matrix `Rx * Ry * Rz`). The
//! same table row supplies the index into the gimbal-aware extraction tuple,
//! so quaternion construction and Euler recovery can never disagree.

use core::f64::consts::FRAC_PI_2;

use crate::math::{Mat4, Quat, Vec3};

/// One of the three principal axes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    /// +X.
    X,
    /// +Y.
    Y,
    /// +Z.
    Z,
}

impl Axis {
    /// Component index of the axis (0, 1 or 2).
    pub const fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }

    /// Unit vector along the axis.
    pub const fn unit(self) -> Vec3 {
        match self {
            Self::X => Vec3::UNIT_X,
            Self::Y => Vec3::UNIT_Y,
            Self::Z => Vec3::UNIT_Z,
        }
    }
}

/// Intrinsic application order of a three-axis rotation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RotationOrder {
    /// X, then Y, then Z.
    Xyz,
    /// X, then Z, then Y.
    Xzy,
    /// Y, then X, then Z.
    Yxz,
    /// Y, then Z, then X.
    Yzx,
    /// Z, then X, then Y.
    Zxy,
    /// Z, then Y, then X.
    Zyx,
}

struct OrderEntry {
    axes: [Axis; 3],
    extract: usize,
}

const MOD3: [usize; 6] = [0, 1, 2, 0, 1, 2];

impl RotationOrder {
    /// All six orders.
    pub const ALL: [Self; 6] = [
        Self::Xyz,
        Self::Xzy,
        Self::Yxz,
        Self::Yzx,
        Self::Zxy,
        Self::Zyx,
    ];

    const fn entry(self) -> OrderEntry {
        use Axis::{X, Y, Z};
        match self {
            Self::Xyz => OrderEntry { axes: [X, Y, Z], extract: 0 },
            Self::Yzx => OrderEntry { axes: [Y, Z, X], extract: 1 },
            Self::Zxy => OrderEntry { axes: [Z, X, Y], extract: 2 },
            Self::Xzy => OrderEntry { axes: [X, Z, Y], extract: 3 },
            Self::Yxz => OrderEntry { axes: [Y, X, Z], extract: 4 },
            Self::Zyx => OrderEntry { axes: [Z, Y, X], extract: 5 },
        }
    }

    /// Axes in application order.
    pub const fn axes(self) -> [Axis; 3] {
        self.entry().axes
    }

    /// The axis applied first (the most local one).
    pub const fn leading_axis(self) -> Axis {
        self.entry().axes[0]
    }

    /// Builds the unit quaternion for `angles` (radians, indexed by axis).
    ///
    /// ```
    /// use xform_core::math::{Quat, RotationOrder, Vec3};
    /// let q = RotationOrder::Zyx.to_quat(&Vec3::new(0.0, 0.0, 0.3));
    /// let z = Quat::about_axis(xform_core::math::Axis::Z, 0.3);
    /// assert!((q.dot(&z) - 1.0).abs() < 1e-12);
    /// ```
    pub fn to_quat(self, angles: &Vec3) -> Quat {
        let [a, b, c] = self.axes();
        let qa = Quat::about_axis(a, angles.component(a.index()));
        let qb = Quat::about_axis(b, angles.component(b.index()));
        let qc = Quat::about_axis(c, angles.component(c.index()));
        qc.multiply(&qb).multiply(&qa)
    }

    /// Rotation matrix for `angles` (radians, indexed by axis).
    pub fn to_mat4(self, angles: &Vec3) -> Mat4 {
        self.to_quat(angles).to_mat4()
    }

    /// Recovers Euler angles (radians, indexed by axis) from the rotation in
    /// the upper 3×3 of `m`. Rows are normalised first.
    ///
    /// When the middle axis sits at ±90° the first angle absorbs the whole
    /// remaining rotation and the last angle is reported as zero.
    pub fn extract(self, m: &Mat4) -> Vec3 {
        let r = m.orthonormalized();
        let idx = self.entry().extract;
        let k1 = if idx > 2 { 2 } else { 1 };
        let k2 = 3 - k1;
        let row = MOD3[idx];
        let col = MOD3[k2 + row];
        let col_cos = MOD3[col + k1];
        let col_sin = MOD3[col + k2];
        let row_sin = MOD3[row + k1];
        let row_cos = MOD3[row + k2];
        let s = if idx < 3 { -1.0 } else { 1.0 };

        let mut rot = [0.0; 3];
        let pivot = r.at(row, col);
        if (pivot - 1.0).abs() < f64::EPSILON {
            rot[row] = (s * r.at(row_sin, col_cos)).atan2(r.at(row_sin, col_sin));
            rot[row_sin] = s * FRAC_PI_2;
            rot[row_cos] = 0.0;
        } else if (pivot + 1.0).abs() < f64::EPSILON {
            rot[row] = (-s * r.at(row_sin, col_cos)).atan2(r.at(row_sin, col_sin));
            rot[row_sin] = -s * FRAC_PI_2;
            rot[row_cos] = 0.0;
        } else {
            rot[row] = (-s * r.at(row_sin, col)).atan2(r.at(row_cos, col));
            rot[row_sin] = (s * pivot).clamp(-1.0, 1.0).asin();
            rot[row_cos] = (-s * r.at(row, col_sin)).atan2(r.at(row, col_cos));
        }
        Vec3::from(rot)
    }
}
