// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Transform ops and ordered op stacks.
//!
//! A [`TransformOp`] stores its value (and optional time samples) at the
//! declared [`Precision`]. All reads decode to `f64` and all writes round to
//! the declared width in one place, so the math never sees narrow floats.

use half::f16;

use crate::error::{Result, XformError};
use crate::math::{Axis, Mat4, Quat, RotationOrder, Vec3};

/// Storage width of an op's components.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Precision {
    /// 16-bit IEEE half float.
    Half,
    /// 32-bit float.
    Float,
    /// 64-bit float.
    #[default]
    Double,
}

impl Precision {
    /// Rounds `value` to what this precision can store.
    ///
    /// ```
    /// use xform_core::op::Precision;
    /// assert_eq!(Precision::Double.round(0.1), 0.1);
    /// assert!((Precision::Half.round(0.1) - 0.1).abs() < 1e-4);
    /// ```
    #[allow(clippy::cast_possible_truncation)]
    pub fn round(self, value: f64) -> f64 {
        match self {
            Self::Half => f16::from_f64(value).to_f64(),
            Self::Float => f64::from(value as f32),
            Self::Double => value,
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn encode(self, values: &[f64]) -> Components {
        match self {
            Self::Half => Components::Half(values.iter().map(|v| f16::from_f64(*v)).collect()),
            Self::Float => Components::Float(values.iter().map(|v| *v as f32).collect()),
            Self::Double => Components::Double(values.to_vec()),
        }
    }
}

/// Raw components at their declared width.
#[derive(Debug, Clone, PartialEq)]
enum Components {
    Half(Vec<f16>),
    Float(Vec<f32>),
    Double(Vec<f64>),
}

impl Components {
    /// Decodes into a zero-padded `f64` buffer.
    fn decode(&self) -> [f64; 16] {
        let mut out = [0.0; 16];
        match self {
            Self::Half(v) => out.iter_mut().zip(v).for_each(|(o, c)| *o = c.to_f64()),
            Self::Float(v) => out.iter_mut().zip(v).for_each(|(o, c)| *o = f64::from(*c)),
            Self::Double(v) => out.iter_mut().zip(v).for_each(|(o, c)| *o = *c),
        }
        out
    }
}

/// Shape of the value an op kind carries.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PayloadShape {
    /// No value (invalid ops).
    Empty,
    /// A single angle in degrees.
    Scalar,
    /// Three components (translation, scale, Euler degrees).
    Vec3,
    /// Quaternion `(x, y, z, w)`.
    Quat,
    /// Row-major 4×4 matrix.
    Matrix,
}

impl PayloadShape {
    /// Number of stored components.
    pub const fn len(self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Scalar => 1,
            Self::Vec3 => 3,
            Self::Quat => 4,
            Self::Matrix => 16,
        }
    }

    /// True for [`PayloadShape::Empty`].
    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Kind of a transform op.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OpKind {
    /// Translation vector.
    Translate,
    /// Per-axis scale.
    Scale,
    /// Shear stored as a 4×4 matrix (see [`crate::shear`]).
    Shear,
    /// Rotation about X in degrees.
    RotateX,
    /// Rotation about Y in degrees.
    RotateY,
    /// Rotation about Z in degrees.
    RotateZ,
    /// Euler rotation, X then Y then Z.
    RotateXyz,
    /// Euler rotation, X then Z then Y.
    RotateXzy,
    /// Euler rotation, Y then X then Z.
    RotateYxz,
    /// Euler rotation, Y then Z then X.
    RotateYzx,
    /// Euler rotation, Z then X then Y.
    RotateZxy,
    /// Euler rotation, Z then Y then X.
    RotateZyx,
    /// Quaternion orientation.
    Orient,
    /// Generic 4×4 matrix.
    Transform,
    /// Placeholder that contributes nothing.
    Invalid,
}

impl OpKind {
    /// Token used in op names (`xformOp:<token>`).
    pub const fn token(self) -> &'static str {
        match self {
            Self::Translate => "translate",
            Self::Scale => "scale",
            Self::Shear => "shear",
            Self::RotateX => "rotateX",
            Self::RotateY => "rotateY",
            Self::RotateZ => "rotateZ",
            Self::RotateXyz => "rotateXYZ",
            Self::RotateXzy => "rotateXZY",
            Self::RotateYxz => "rotateYXZ",
            Self::RotateYzx => "rotateYZX",
            Self::RotateZxy => "rotateZXY",
            Self::RotateZyx => "rotateZYX",
            Self::Orient => "orient",
            Self::Transform => "transform",
            Self::Invalid => "invalid",
        }
    }

    /// Value shape carried by ops of this kind.
    pub const fn payload_shape(self) -> PayloadShape {
        match self {
            Self::RotateX | Self::RotateY | Self::RotateZ => PayloadShape::Scalar,
            Self::Translate
            | Self::Scale
            | Self::RotateXyz
            | Self::RotateXzy
            | Self::RotateYxz
            | Self::RotateYzx
            | Self::RotateZxy
            | Self::RotateZyx => PayloadShape::Vec3,
            Self::Orient => PayloadShape::Quat,
            Self::Transform | Self::Shear => PayloadShape::Matrix,
            Self::Invalid => PayloadShape::Empty,
        }
    }

    /// True for kinds accumulated as quaternions by the evaluator.
    pub const fn is_rotation(self) -> bool {
        !matches!(
            self,
            Self::Translate | Self::Scale | Self::Shear | Self::Transform | Self::Invalid
        )
    }

    /// True for kinds composed as full matrices.
    pub const fn is_matrix(self) -> bool {
        matches!(self, Self::Transform | Self::Shear)
    }

    /// Euler order of a three-axis rotation kind.
    pub const fn rotation_order(self) -> Option<RotationOrder> {
        match self {
            Self::RotateXyz => Some(RotationOrder::Xyz),
            Self::RotateXzy => Some(RotationOrder::Xzy),
            Self::RotateYxz => Some(RotationOrder::Yxz),
            Self::RotateYzx => Some(RotationOrder::Yzx),
            Self::RotateZxy => Some(RotationOrder::Zxy),
            Self::RotateZyx => Some(RotationOrder::Zyx),
            _ => None,
        }
    }

    /// Axis of a single-axis rotation kind.
    pub const fn single_axis(self) -> Option<Axis> {
        match self {
            Self::RotateX => Some(Axis::X),
            Self::RotateY => Some(Axis::Y),
            Self::RotateZ => Some(Axis::Z),
            _ => None,
        }
    }

    fn default_components(self) -> Vec<f64> {
        match self {
            Self::Scale => vec![1.0, 1.0, 1.0],
            Self::Orient => vec![0.0, 0.0, 0.0, 1.0],
            Self::Transform | Self::Shear => Mat4::identity().to_array().to_vec(),
            other => vec![0.0; other.payload_shape().len()],
        }
    }
}

/// Time at which op values are sampled.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimeCode {
    /// The unanimated default value.
    #[default]
    Default,
    /// A specific time.
    At(f64),
}

const INVERT_PREFIX: &str = "!invert!";
const NAME_PREFIX: &str = "xformOp:";

/// One transform op: kind, storage precision, inverse flag and values.
///
/// Time samples use held interpolation: the value at `t` is the last
/// sample at or before `t` (or the first sample when `t` precedes them).
#[derive(Debug, Clone, PartialEq)]
pub struct TransformOp {
    kind: OpKind,
    precision: Precision,
    suffix: String,
    inverse: bool,
    default: Components,
    samples: Vec<(f64, Components)>,
}

impl TransformOp {
    /// Creates an op holding the neutral value for its kind.
    pub fn new(kind: OpKind, precision: Precision, suffix: impl Into<String>) -> Self {
        Self {
            kind,
            precision,
            suffix: suffix.into(),
            inverse: false,
            default: precision.encode(&kind.default_components()),
            samples: Vec::new(),
        }
    }

    /// Marks the op as contributing the inverse of its stored value.
    pub fn inverted(mut self) -> Self {
        self.inverse = true;
        self
    }

    /// Op kind.
    pub fn kind(&self) -> OpKind {
        self.kind
    }

    /// Declared storage precision.
    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// True when the op contributes the inverse of its stored value.
    pub fn is_inverse(&self) -> bool {
        self.inverse
    }

    /// Name suffix (may be empty).
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// True when the op carries `suffix`.
    pub fn has_suffix(&self, suffix: &str) -> bool {
        !suffix.is_empty() && self.suffix == suffix
    }

    /// Attribute name, e.g. `xformOp:translate:pivot`.
    pub fn name(&self) -> String {
        if self.suffix.is_empty() {
            format!("{NAME_PREFIX}{}", self.kind.token())
        } else {
            format!("{NAME_PREFIX}{}:{}", self.kind.token(), self.suffix)
        }
    }

    /// Name as it appears in the op order, with `!invert!` for inverse ops.
    pub fn op_name(&self) -> String {
        if self.inverse {
            format!("{INVERT_PREFIX}{}", self.name())
        } else {
            self.name()
        }
    }

    /// Number of authored time samples.
    pub fn num_time_samples(&self) -> usize {
        self.samples.len()
    }

    fn components_at(&self, time: TimeCode) -> &Components {
        match time {
            TimeCode::Default => &self.default,
            TimeCode::At(t) => {
                let held = self.samples.iter().rev().find(|(st, _)| *st <= t);
                match (held, self.samples.first()) {
                    (Some((_, c)), _) | (None, Some((_, c))) => c,
                    (None, None) => &self.default,
                }
            }
        }
    }

    fn decode(&self, time: TimeCode) -> [f64; 16] {
        self.components_at(time).decode()
    }

    fn write(&mut self, shape: PayloadShape, values: &[f64], time: TimeCode) -> Result<()> {
        let expected = self.kind.payload_shape();
        if expected != shape {
            return Err(XformError::PayloadMismatch {
                op: self.name(),
                expected,
                actual: shape,
            });
        }
        let encoded = self.precision.encode(values);
        match time {
            TimeCode::Default => self.default = encoded,
            TimeCode::At(t) => {
                match self.samples.iter().position(|(st, _)| *st >= t) {
                    Some(i) if self.samples[i].0.total_cmp(&t).is_eq() => {
                        self.samples[i].1 = encoded;
                    }
                    Some(i) => self.samples.insert(i, (t, encoded)),
                    None => self.samples.push((t, encoded)),
                }
            }
        }
        Ok(())
    }

    /// Stored vector (translate, scale or Euler degrees).
    pub fn vec3(&self, time: TimeCode) -> Vec3 {
        let c = self.decode(time);
        Vec3::new(c[0], c[1], c[2])
    }

    /// Stored single-axis angle in degrees.
    pub fn angle(&self, time: TimeCode) -> f64 {
        self.decode(time)[0]
    }

    /// Stored quaternion.
    pub fn quat(&self, time: TimeCode) -> Quat {
        let c = self.decode(time);
        Quat::new(c[0], c[1], c[2], c[3])
    }

    /// Stored matrix.
    pub fn matrix(&self, time: TimeCode) -> Mat4 {
        Mat4::new(self.decode(time))
    }

    /// Writes a vector value, rounding to the declared precision.
    pub fn set_vec3(&mut self, value: Vec3, time: TimeCode) -> Result<()> {
        self.write(PayloadShape::Vec3, &value.to_array(), time)
    }

    /// Writes a single-axis angle in degrees.
    pub fn set_angle(&mut self, degrees: f64, time: TimeCode) -> Result<()> {
        self.write(PayloadShape::Scalar, &[degrees], time)
    }

    /// Writes a quaternion.
    pub fn set_quat(&mut self, value: Quat, time: TimeCode) -> Result<()> {
        self.write(PayloadShape::Quat, &value.to_array(), time)
    }

    /// Writes a matrix.
    pub fn set_matrix(&mut self, value: Mat4, time: TimeCode) -> Result<()> {
        self.write(PayloadShape::Matrix, &value.to_array(), time)
    }
}

/// Ordered op stack of one node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OpStack {
    ops: Vec<TransformOp>,
    resets_xform_stack: bool,
}

impl OpStack {
    /// Creates an empty stack that composes with its parent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a stack from ops in evaluation order.
    pub fn from_ops(ops: Vec<TransformOp>) -> Self {
        Self {
            ops,
            resets_xform_stack: false,
        }
    }

    /// True when the node ignores its parent's world transform.
    pub fn resets_xform_stack(&self) -> bool {
        self.resets_xform_stack
    }

    /// Sets the reset flag.
    pub fn set_resets_xform_stack(&mut self, reset: bool) {
        self.resets_xform_stack = reset;
    }

    /// Ops in evaluation order.
    pub fn ops(&self) -> &[TransformOp] {
        &self.ops
    }

    pub(crate) fn ops_mut(&mut self) -> &mut [TransformOp] {
        &mut self.ops
    }

    /// Number of ops.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// True when the stack has no ops.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Op at `index`.
    pub fn op(&self, index: usize) -> Option<&TransformOp> {
        self.ops.get(index)
    }

    /// Mutable op at `index`.
    pub fn op_mut(&mut self, index: usize) -> Option<&mut TransformOp> {
        self.ops.get_mut(index)
    }

    /// Index of the op whose op-order name (including `!invert!`) is `op_name`.
    pub fn find(&self, op_name: &str) -> Option<usize> {
        self.ops.iter().position(|op| op.op_name() == op_name)
    }

    /// Inserts `op` at `index`, rejecting a duplicate op-order name.
    pub fn insert(&mut self, index: usize, op: TransformOp) -> Result<&mut TransformOp> {
        let op_name = op.op_name();
        if self.find(&op_name).is_some() {
            return Err(XformError::DuplicateOp(op_name));
        }
        let index = index.min(self.ops.len());
        self.ops.insert(index, op);
        Ok(&mut self.ops[index])
    }

    /// Appends `op`, rejecting a duplicate op-order name.
    pub fn push(&mut self, op: TransformOp) -> Result<&mut TransformOp> {
        self.insert(self.ops.len(), op)
    }

    /// Appends a new op of `kind` holding its neutral value.
    pub fn add_op(
        &mut self,
        kind: OpKind,
        precision: Precision,
        suffix: &str,
    ) -> Result<&mut TransformOp> {
        self.push(TransformOp::new(kind, precision, suffix))
    }

    /// Removes and returns the op at `index`.
    pub fn remove(&mut self, index: usize) -> Option<TransformOp> {
        (index < self.ops.len()).then(|| self.ops.remove(index))
    }

    /// Rewrites the op order. `order` lists op-order names; every current op
    /// must appear exactly once.
    pub fn set_op_order(&mut self, order: &[&str]) -> Result<()> {
        if order.len() != self.ops.len() {
            return Err(XformError::OpNotFound(format!(
                "op order of {} entries for a stack of {}",
                order.len(),
                self.ops.len()
            )));
        }
        let mut remaining = self.ops.clone();
        let mut reordered = Vec::with_capacity(order.len());
        for name in order {
            let pos = remaining
                .iter()
                .position(|op| op.op_name() == *name)
                .ok_or_else(|| XformError::OpNotFound((*name).to_owned()))?;
            reordered.push(remaining.swap_remove(pos));
        }
        self.ops = reordered;
        Ok(())
    }

    /// Op-order names in evaluation order.
    pub fn op_order(&self) -> Vec<String> {
        self.ops.iter().map(TransformOp::op_name).collect()
    }
}
