// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Reduces a range of transform ops to a single coordinate frame.
//!
//! Ops are composed left to right with later ops more local, so the frame
//! of `[a, b]` is `b * a` under the row-vector convention. Consecutive
//! translations are summed before being merged, consecutive scales are
//! multiplied, and consecutive rotations are accumulated as one quaternion.
//! Matrix ops (`Transform`, `Shear`) are multiplied in directly.

use tracing::{trace, warn};

use crate::math::{deg_to_rad, deg_to_rad3, Mat4, Quat, Vec3};
use crate::op::{OpKind, OpStack, TimeCode, TransformOp};

/// Evaluates `ops[start..end]` at `time`.
///
/// An empty range yields the identity.
///
/// # Panics
/// Panics when `start > end` or `end > ops.len()`; indices are always
/// derived from the stack being evaluated, so a bad range is a caller bug.
pub fn evaluate_range(ops: &[TransformOp], start: usize, end: usize, time: TimeCode) -> Mat4 {
    assert!(
        start <= end && end <= ops.len(),
        "op range {start}..{end} out of bounds for a stack of {}",
        ops.len()
    );

    let mut frame = Mat4::identity();
    let mut last: Option<OpKind> = None;
    let mut i = start;
    while i < end {
        let kind = ops[i].kind();
        match kind {
            OpKind::Translate => {
                let mut offset = Vec3::ZERO;
                while i < end && ops[i].kind() == OpKind::Translate {
                    offset = offset.add(&op_translation(&ops[i], time));
                    i += 1;
                }
                // The first contribution is assigned, not rotated, so a
                // leading pivot chain carries no rounding from an identity frame.
                let translation = match last {
                    None => offset,
                    Some(_) => frame
                        .translation_row()
                        .add(&frame.transform_direction(&offset)),
                };
                frame = frame.with_translation(translation);
                last = Some(OpKind::Translate);
            }
            OpKind::Scale => {
                let mut scaling = Vec3::ONE;
                while i < end && ops[i].kind() == OpKind::Scale {
                    scaling = scaling.mul(&op_scale(&ops[i], time));
                    i += 1;
                }
                frame = frame.scale_rows(&scaling);
                last = Some(OpKind::Scale);
            }
            OpKind::Transform | OpKind::Shear => {
                frame = op_matrix(&ops[i], time).multiply(&frame);
                i += 1;
                last = Some(kind);
            }
            OpKind::Invalid => i += 1,
            _ => {
                let mut rotation = op_rotation(&ops[i], time);
                i += 1;
                while i < end && ops[i].kind().is_rotation() {
                    rotation = rotation.multiply(&op_rotation(&ops[i], time));
                    i += 1;
                }
                // Rotates the axis rows; the translation row is untouched.
                frame = rotation.to_mat4().multiply(&frame);
                last = Some(OpKind::Orient);
            }
        }
    }
    trace!(start, end, "evaluated op range");
    frame
}

/// Evaluates every op of `ops` at `time`.
pub fn evaluate(ops: &[TransformOp], time: TimeCode) -> Mat4 {
    evaluate_range(ops, 0, ops.len(), time)
}

impl OpStack {
    /// Local transform of the whole stack at `time`.
    pub fn local_transform(&self, time: TimeCode) -> Mat4 {
        evaluate(self.ops(), time)
    }
}

/// Effective translation contributed by `op` (negated for inverse ops).
///
/// Matrix ops report their translation row; other kinds report zero.
pub fn op_translation(op: &TransformOp, time: TimeCode) -> Vec3 {
    match op.kind() {
        OpKind::Translate => {
            let t = op.vec3(time);
            if op.is_inverse() {
                t.negate()
            } else {
                t
            }
        }
        OpKind::Transform | OpKind::Shear => op_matrix(op, time).translation_row(),
        _ => Vec3::ZERO,
    }
}

/// Effective scale contributed by `op` (reciprocal for inverse ops).
///
/// Matrix ops report their signed effective scale; other kinds report one.
pub fn op_scale(op: &TransformOp, time: TimeCode) -> Vec3 {
    match op.kind() {
        OpKind::Scale => {
            let s = op.vec3(time);
            if op.is_inverse() {
                s.recip()
            } else {
                s
            }
        }
        OpKind::Transform | OpKind::Shear => op_matrix(op, time).effective_scale(),
        _ => Vec3::ONE,
    }
}

/// Effective rotation contributed by `op` (conjugated for inverse ops).
///
/// Matrix ops report the rotation of their row-normalised basis; translate,
/// scale and invalid ops report the identity.
pub fn op_rotation(op: &TransformOp, time: TimeCode) -> Quat {
    let stored = match op.kind() {
        OpKind::Translate | OpKind::Scale | OpKind::Invalid => return Quat::identity(),
        OpKind::Transform | OpKind::Shear => {
            return Quat::from_mat4(&op_matrix(op, time).right_handed());
        }
        OpKind::Orient => op.quat(time).normalize(),
        kind => {
            if let Some(axis) = kind.single_axis() {
                Quat::about_axis(axis, deg_to_rad(op.angle(time)))
            } else if let Some(order) = kind.rotation_order() {
                order.to_quat(&deg_to_rad3(&op.vec3(time)))
            } else {
                Quat::identity()
            }
        }
    };
    if op.is_inverse() {
        stored.conjugate()
    } else {
        stored
    }
}

/// Effective local matrix of a single op.
///
/// An inverse matrix op whose stored matrix is singular contributes the
/// identity.
pub fn op_matrix(op: &TransformOp, time: TimeCode) -> Mat4 {
    match op.kind() {
        OpKind::Transform | OpKind::Shear => {
            let m = op.matrix(time);
            if !op.is_inverse() {
                return m;
            }
            m.inverse().unwrap_or_else(|| {
                warn!(op = %op.op_name(), "singular matrix on inverse op, using identity");
                Mat4::identity()
            })
        }
        OpKind::Translate => {
            let t = op_translation(op, time);
            Mat4::translation(t.x(), t.y(), t.z())
        }
        OpKind::Scale => {
            let s = op_scale(op, time);
            Mat4::scale(s.x(), s.y(), s.z())
        }
        OpKind::Invalid => Mat4::identity(),
        _ => op_rotation(op, time).to_mat4(),
    }
}
