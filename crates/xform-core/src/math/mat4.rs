// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use crate::math::{Quat, Vec3};

/// Row-major 4×4 affine matrix using the row-vector convention.
///
/// - Rows 0..2 hold the transformed X, Y and Z axes, row 3 holds the
///   translation; the homogeneous last column is `[0, 0, 0, 1]` for affine
///   frames.
/// - Points transform as `p' = p * M`, so in `a * b` the matrix `a` is the
///   more local transform and `b` is its parent.
///
/// # Examples
/// ```
/// use xform_core::math::{Mat4, Vec3};
/// let t = Mat4::translation(5.0, -3.0, 2.0);
/// let p = Vec3::new(2.0, 4.0, -1.0);
/// assert_eq!(t.transform_point(&p).to_array(), [7.0, 1.0, 1.0]);
/// ```
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Mat4 {
    data: [f64; 16],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mat4 {
    /// Returns the identity matrix.
    pub const fn identity() -> Self {
        Self {
            data: [
                1.0, 0.0, 0.0, 0.0, // x axis
                0.0, 1.0, 0.0, 0.0, // y axis
                0.0, 0.0, 1.0, 0.0, // z axis
                0.0, 0.0, 0.0, 1.0, // translation
            ],
        }
    }

    /// Creates a matrix from row-major array data.
    pub const fn new(data: [f64; 16]) -> Self {
        Self { data }
    }

    /// Builds an affine matrix from three axis rows and a translation row.
    pub fn from_rows(x: Vec3, y: Vec3, z: Vec3, t: Vec3) -> Self {
        Self::new([
            x.x(), x.y(), x.z(), 0.0,
            y.x(), y.y(), y.z(), 0.0,
            z.x(), z.y(), z.z(), 0.0,
            t.x(), t.y(), t.z(), 1.0,
        ])
    }

    /// Builds a translation matrix.
    pub const fn translation(tx: f64, ty: f64, tz: f64) -> Self {
        Self {
            data: [
                1.0, 0.0, 0.0, 0.0,
                0.0, 1.0, 0.0, 0.0,
                0.0, 0.0, 1.0, 0.0,
                tx, ty, tz, 1.0,
            ],
        }
    }

    /// Builds a non-uniform scale matrix.
    pub const fn scale(sx: f64, sy: f64, sz: f64) -> Self {
        Self {
            data: [
                sx, 0.0, 0.0, 0.0,
                0.0, sy, 0.0, 0.0,
                0.0, 0.0, sz, 0.0,
                0.0, 0.0, 0.0, 1.0,
            ],
        }
    }

    /// Builds a rotation matrix around the X axis by `angle` radians.
    pub fn rotation_x(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new([
            1.0, 0.0, 0.0, 0.0,
            0.0, c,   s,   0.0,
            0.0, -s,  c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// Builds a rotation matrix around the Y axis by `angle` radians.
    pub fn rotation_y(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new([
            c,   0.0, -s,  0.0,
            0.0, 1.0, 0.0, 0.0,
            s,   0.0, c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// Builds a rotation matrix around the Z axis by `angle` radians.
    pub fn rotation_z(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new([
            c,   s,   0.0, 0.0,
            -s,  c,   0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// Constructs a matrix from a quaternion.
    ///
    /// This simply forwards to [`Quat::to_mat4`].
    pub fn from_quat(q: &Quat) -> Self {
        q.to_mat4()
    }

    /// Returns the matrix as a row-major array.
    pub fn to_array(self) -> [f64; 16] {
        self.data
    }

    /// Element at `row`, `col`.
    pub fn at(&self, row: usize, col: usize) -> f64 {
        self.data[row * 4 + col]
    }

    /// Returns the xyz part of row `idx`.
    pub fn row(&self, idx: usize) -> Vec3 {
        Vec3::new(self.at(idx, 0), self.at(idx, 1), self.at(idx, 2))
    }

    /// Returns a copy with the xyz part of row `idx` replaced.
    pub fn with_row(&self, idx: usize, v: Vec3) -> Self {
        let mut out = *self;
        out.data[idx * 4] = v.x();
        out.data[idx * 4 + 1] = v.y();
        out.data[idx * 4 + 2] = v.z();
        out
    }

    /// The translation row.
    pub fn translation_row(&self) -> Vec3 {
        self.row(3)
    }

    /// Returns a copy with the translation row replaced.
    pub fn with_translation(&self, t: Vec3) -> Self {
        self.with_row(3, t)
    }

    /// Returns a copy with a zero translation row.
    pub fn without_translation(&self) -> Self {
        self.with_row(3, Vec3::ZERO)
    }

    /// Multiplies the matrix with another matrix (`self * rhs`).
    ///
    /// With row vectors `self` is applied first: `(a * b)` maps a point
    /// through `a` and then through `b`.
    ///
    /// # Examples
    /// ```
    /// use xform_core::math::Mat4;
    /// let a = Mat4::identity();
    /// let b = Mat4::scale(2.0, 3.0, 4.0);
    /// assert_eq!(a.multiply(&b).to_array(), b.to_array());
    /// ```
    pub fn multiply(&self, rhs: &Self) -> Self {
        let mut out = [0.0; 16];
        for row in 0..4 {
            for col in 0..4 {
                let mut sum = 0.0;
                for k in 0..4 {
                    sum += self.at(row, k) * rhs.at(k, col);
                }
                out[row * 4 + col] = sum;
            }
        }
        Self::new(out)
    }

    /// Transforms a point (`w = 1`, no perspective divide).
    pub fn transform_point(&self, p: &Vec3) -> Vec3 {
        self.transform_direction(p).add(&self.translation_row())
    }

    /// Transforms a direction (`w = 0`, translation ignored).
    pub fn transform_direction(&self, d: &Vec3) -> Vec3 {
        self.row(0)
            .scale(d.x())
            .add(&self.row(1).scale(d.y()))
            .add(&self.row(2).scale(d.z()))
    }

    /// Multiplies each axis row by the matching component of `s`.
    pub fn scale_rows(&self, s: &Vec3) -> Self {
        self.with_row(0, self.row(0).scale(s.x()))
            .with_row(1, self.row(1).scale(s.y()))
            .with_row(2, self.row(2).scale(s.z()))
    }

    /// Divides each axis row by its own length, leaving the translation row
    /// untouched. Zero-length rows stay zero.
    pub fn orthonormalized(&self) -> Self {
        self.with_row(0, self.row(0).normalize())
            .with_row(1, self.row(1).normalize())
            .with_row(2, self.row(2).normalize())
    }

    /// Transposes the upper 3×3, keeping the translation row.
    pub fn transpose3(&self) -> Self {
        let mut out = *self;
        for row in 0..3 {
            for col in 0..3 {
                out.data[row * 4 + col] = self.at(col, row);
            }
        }
        out
    }

    /// Determinant of the upper 3×3.
    pub fn determinant3(&self) -> f64 {
        self.row(0).cross(&self.row(1)).dot(&self.row(2))
    }

    /// True when the axis rows form a left-handed (mirrored) basis.
    pub fn is_left_handed(&self) -> bool {
        self.determinant3() < 0.0
    }

    /// Negates the Z axis row when the basis is left-handed.
    pub fn right_handed(&self) -> Self {
        if self.is_left_handed() {
            self.with_row(2, self.row(2).negate())
        } else {
            *self
        }
    }

    /// Signed per-axis scale: the axis row lengths, with Z negated for a
    /// left-handed basis so mirrored frames report a negative scale.
    pub fn effective_scale(&self) -> Vec3 {
        let sz = self.row(2).length();
        Vec3::new(
            self.row(0).length(),
            self.row(1).length(),
            if self.is_left_handed() { -sz } else { sz },
        )
    }

    /// General 4×4 inverse, `None` when the matrix is singular.
    pub fn inverse(&self) -> Option<Self> {
        let m = &self.data;
        let mut inv = [0.0; 16];

        inv[0] = m[5] * m[10] * m[15] - m[5] * m[11] * m[14] - m[9] * m[6] * m[15]
            + m[9] * m[7] * m[14] + m[13] * m[6] * m[11] - m[13] * m[7] * m[10];
        inv[4] = -m[4] * m[10] * m[15] + m[4] * m[11] * m[14] + m[8] * m[6] * m[15]
            - m[8] * m[7] * m[14] - m[12] * m[6] * m[11] + m[12] * m[7] * m[10];
        inv[8] = m[4] * m[9] * m[15] - m[4] * m[11] * m[13] - m[8] * m[5] * m[15]
            + m[8] * m[7] * m[13] + m[12] * m[5] * m[11] - m[12] * m[7] * m[9];
        inv[12] = -m[4] * m[9] * m[14] + m[4] * m[10] * m[13] + m[8] * m[5] * m[14]
            - m[8] * m[6] * m[13] - m[12] * m[5] * m[10] + m[12] * m[6] * m[9];
        inv[1] = -m[1] * m[10] * m[15] + m[1] * m[11] * m[14] + m[9] * m[2] * m[15]
            - m[9] * m[3] * m[14] - m[13] * m[2] * m[11] + m[13] * m[3] * m[10];
        inv[5] = m[0] * m[10] * m[15] - m[0] * m[11] * m[14] - m[8] * m[2] * m[15]
            + m[8] * m[3] * m[14] + m[12] * m[2] * m[11] - m[12] * m[3] * m[10];
        inv[9] = -m[0] * m[9] * m[15] + m[0] * m[11] * m[13] + m[8] * m[1] * m[15]
            - m[8] * m[3] * m[13] - m[12] * m[1] * m[11] + m[12] * m[3] * m[9];
        inv[13] = m[0] * m[9] * m[14] - m[0] * m[10] * m[13] - m[8] * m[1] * m[14]
            + m[8] * m[2] * m[13] + m[12] * m[1] * m[10] - m[12] * m[2] * m[9];
        inv[2] = m[1] * m[6] * m[15] - m[1] * m[7] * m[14] - m[5] * m[2] * m[15]
            + m[5] * m[3] * m[14] + m[13] * m[2] * m[7] - m[13] * m[3] * m[6];
        inv[6] = -m[0] * m[6] * m[15] + m[0] * m[7] * m[14] + m[4] * m[2] * m[15]
            - m[4] * m[3] * m[14] - m[12] * m[2] * m[7] + m[12] * m[3] * m[6];
        inv[10] = m[0] * m[5] * m[15] - m[0] * m[7] * m[13] - m[4] * m[1] * m[15]
            + m[4] * m[3] * m[13] + m[12] * m[1] * m[7] - m[12] * m[3] * m[5];
        inv[14] = -m[0] * m[5] * m[14] + m[0] * m[6] * m[13] + m[4] * m[1] * m[14]
            - m[4] * m[2] * m[13] - m[12] * m[1] * m[6] + m[12] * m[2] * m[5];
        inv[3] = -m[1] * m[6] * m[11] + m[1] * m[7] * m[10] + m[5] * m[2] * m[11]
            - m[5] * m[3] * m[10] - m[9] * m[2] * m[7] + m[9] * m[3] * m[6];
        inv[7] = m[0] * m[6] * m[11] - m[0] * m[7] * m[10] - m[4] * m[2] * m[11]
            + m[4] * m[3] * m[10] + m[8] * m[2] * m[7] - m[8] * m[3] * m[6];
        inv[11] = -m[0] * m[5] * m[11] + m[0] * m[7] * m[9] + m[4] * m[1] * m[11]
            - m[4] * m[3] * m[9] - m[8] * m[1] * m[7] + m[8] * m[3] * m[5];
        inv[15] = m[0] * m[5] * m[10] - m[0] * m[6] * m[9] - m[4] * m[1] * m[10]
            + m[4] * m[2] * m[9] + m[8] * m[1] * m[6] - m[8] * m[2] * m[5];

        let det = m[0] * inv[0] + m[1] * inv[4] + m[2] * inv[8] + m[3] * inv[12];
        if det.abs() <= f64::EPSILON * f64::EPSILON || !det.is_finite() {
            return None;
        }
        let inv_det = 1.0 / det;
        for v in &mut inv {
            *v *= inv_det;
        }
        Some(Self::new(inv))
    }

    /// True when every element lies within `eps` of `other`.
    pub fn abs_diff_le(&self, other: &Self, eps: f64) -> bool {
        self.data
            .iter()
            .zip(other.data.iter())
            .all(|(a, b)| (a - b).abs() <= eps)
    }
}

impl From<[f64; 16]> for Mat4 {
    fn from(value: [f64; 16]) -> Self {
        Self { data: value }
    }
}

impl core::ops::Mul for Mat4 {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self::Output {
        self.multiply(&rhs)
    }
}

impl core::ops::MulAssign for Mat4 {
    fn mul_assign(&mut self, rhs: Self) {
        *self = self.multiply(&rhs);
    }
}

impl core::ops::MulAssign<&Mat4> for Mat4 {
    fn mul_assign(&mut self, rhs: &Mat4) {
        *self = self.multiply(rhs);
    }
}
