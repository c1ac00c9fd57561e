// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use crate::math::{Axis, Mat4, Vec3, EPSILON};

/// Quaternion stored as `(x, y, z, w)` in double precision.
///
/// * All angles are expressed in radians.
/// * Matrices produced by [`Quat::to_mat4`] follow the row-vector convention
///   of [`Mat4`], so `(p * c).to_mat4() == c.to_mat4() * p.to_mat4()`: the
///   right-hand operand of a product is the more local rotation.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Quat {
    data: [f64; 4],
}

impl Default for Quat {
    fn default() -> Self {
        Self::identity()
    }
}

impl Quat {
    /// Creates a quaternion from components.
    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { data: [x, y, z, w] }
    }

    /// Returns the identity quaternion.
    pub const fn identity() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }

    /// Returns the quaternion as an array `(x, y, z, w)`.
    pub fn to_array(self) -> [f64; 4] {
        self.data
    }

    /// Returns component `idx` (0..3 imaginary, 3 real).
    pub fn component(&self, idx: usize) -> f64 {
        self.data[idx]
    }

    /// Real part.
    pub fn w(&self) -> f64 {
        self.data[3]
    }

    /// Imaginary part as a vector.
    pub fn imaginary(&self) -> Vec3 {
        Vec3::new(self.data[0], self.data[1], self.data[2])
    }

    /// Constructs a quaternion from a rotation axis and angle in radians.
    ///
    /// Returns the identity quaternion when the axis length is ≤ `EPSILON`.
    pub fn from_axis_angle(axis: Vec3, angle: f64) -> Self {
        let len_sq = axis.length_squared();
        if len_sq <= EPSILON * EPSILON {
            return Self::identity();
        }
        let norm_axis = axis.scale(1.0 / len_sq.sqrt());
        let (sin_half, cos_half) = (angle * 0.5).sin_cos();
        let v = norm_axis.scale(sin_half);
        Self::new(v.x(), v.y(), v.z(), cos_half)
    }

    /// Rotation of `angle` radians about a principal axis.
    ///
    /// ```
    /// use xform_core::math::{Axis, Quat};
    /// let q = Quat::about_axis(Axis::X, core::f64::consts::PI);
    /// assert!((q.to_array()[0] - 1.0).abs() < 1e-12);
    /// ```
    pub fn about_axis(axis: Axis, angle: f64) -> Self {
        let (s, c) = (angle * 0.5).sin_cos();
        let mut data = [0.0, 0.0, 0.0, c];
        data[axis.index()] = s;
        Self { data }
    }

    /// Hamilton product of two quaternions (`self * other`).
    ///
    /// Operand order matters. Under the row-vector convention `other` is
    /// applied first, `self` second.
    pub fn multiply(&self, other: &Self) -> Self {
        let [ax, ay, az, aw] = self.data;
        let [bx, by, bz, bw] = other.data;
        Self::new(
            aw * bx + ax * bw + ay * bz - az * by,
            aw * by - ax * bz + ay * bw + az * bx,
            aw * bz + ax * by - ay * bx + az * bw,
            aw * bw - ax * bx - ay * by - az * bz,
        )
    }

    /// Conjugate, which is the inverse for unit quaternions.
    pub fn conjugate(&self) -> Self {
        let [x, y, z, w] = self.data;
        Self::new(-x, -y, -z, w)
    }

    /// Negates every component (the same rotation).
    pub fn negate(&self) -> Self {
        let [x, y, z, w] = self.data;
        Self::new(-x, -y, -z, -w)
    }

    /// Four-component dot product.
    pub fn dot(&self, other: &Self) -> f64 {
        self.data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| a * b)
            .sum()
    }

    /// Normalises the quaternion; returns identity when norm is ~0.
    pub fn normalize(&self) -> Self {
        let len = self.dot(self).sqrt();
        if len <= EPSILON {
            return Self::identity();
        }
        let inv = 1.0 / len;
        let [x, y, z, w] = self.data;
        Self::new(x * inv, y * inv, z * inv, w * inv)
    }

    /// True when every component lies within `eps` of the identity.
    pub fn is_near_identity(&self, eps: f64) -> bool {
        let [x, y, z, w] = self.data;
        x.abs() <= eps && y.abs() <= eps && z.abs() <= eps && (w - 1.0).abs() <= eps
    }

    /// Converts the quaternion to a rotation matrix (row-vector 4×4).
    pub fn to_mat4(&self) -> Mat4 {
        let q = self.normalize();
        let [x, y, z, w] = q.data;

        let xx = x * x;
        let yy = y * y;
        let zz = z * z;
        let xy = x * y;
        let xz = x * z;
        let yz = y * z;
        let wx = w * x;
        let wy = w * y;
        let wz = w * z;

        Mat4::new([
            1.0 - 2.0 * (yy + zz),
            2.0 * (xy + wz),
            2.0 * (xz - wy),
            0.0,
            2.0 * (xy - wz),
            1.0 - 2.0 * (xx + zz),
            2.0 * (yz + wx),
            0.0,
            2.0 * (xz + wy),
            2.0 * (yz - wx),
            1.0 - 2.0 * (xx + yy),
            0.0,
            0.0,
            0.0,
            0.0,
            1.0,
        ])
    }

    /// Extracts the rotation of the upper 3×3 of `m` as a unit quaternion.
    ///
    /// Rows are normalised first so scaled frames are accepted. The branch
    /// on the largest diagonal term keeps the square root well away from
    /// zero for every rotation.
    pub fn from_mat4(m: &Mat4) -> Self {
        let r = m.orthonormalized();
        let (m00, m01, m02) = (r.at(0, 0), r.at(0, 1), r.at(0, 2));
        let (m10, m11, m12) = (r.at(1, 0), r.at(1, 1), r.at(1, 2));
        let (m20, m21, m22) = (r.at(2, 0), r.at(2, 1), r.at(2, 2));
        let trace = m00 + m11 + m22;

        let q = if trace > 0.0 {
            let root = (1.0 + trace).sqrt();
            let s = 0.5 / root;
            Self::new((m12 - m21) * s, (m20 - m02) * s, (m01 - m10) * s, 0.5 * root)
        } else if m00 >= m11 && m00 >= m22 {
            let root = (1.0 + m00 - m11 - m22).sqrt();
            let s = 0.5 / root;
            Self::new(0.5 * root, (m01 + m10) * s, (m02 + m20) * s, (m12 - m21) * s)
        } else if m11 >= m22 {
            let root = (1.0 + m11 - m00 - m22).sqrt();
            let s = 0.5 / root;
            Self::new((m01 + m10) * s, 0.5 * root, (m12 + m21) * s, (m20 - m02) * s)
        } else {
            let root = (1.0 + m22 - m00 - m11).sqrt();
            let s = 0.5 / root;
            Self::new((m02 + m20) * s, (m12 + m21) * s, 0.5 * root, (m01 - m10) * s)
        };
        q.normalize()
    }
}

impl From<[f64; 4]> for Quat {
    fn from(value: [f64; 4]) -> Self {
        Self { data: value }
    }
}

impl core::ops::Mul for Quat {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self::Output {
        self.multiply(&rhs)
    }
}
