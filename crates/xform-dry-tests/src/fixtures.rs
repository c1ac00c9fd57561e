// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Canonical stages and op stacks used across the xform test suites.

use xform_core::{
    Mat4, NodePath, OpKind, OpStack, Precision, Result, Stage, TimeCode, TransformCache,
    TransformOp, Vec3,
};

/// Path of the parent node in the two-level fixtures.
pub const PARENT: &str = "/parent";
/// Path of the child node in the two-level fixtures.
pub const CHILD: &str = "/parent/child";

/// Op of `kind` at double precision holding `value` (vector payloads).
pub fn vec_op(kind: OpKind, suffix: &str, value: [f64; 3]) -> TransformOp {
    let mut op = TransformOp::new(kind, Precision::Double, suffix);
    op.set_vec3(Vec3::from(value), TimeCode::Default)
        .unwrap_or_else(|err| unreachable!("{kind:?} takes a vector: {err}"));
    op
}

/// `translate, rotateXYZ, scale` stack at double precision.
pub fn trs_stack(t: [f64; 3], r: [f64; 3], s: [f64; 3]) -> OpStack {
    OpStack::from_ops(vec![
        vec_op(OpKind::Translate, "", t),
        vec_op(OpKind::RotateXyz, "", r),
        vec_op(OpKind::Scale, "", s),
    ])
}

/// Single `transform` op holding `m`.
pub fn matrix_stack(m: Mat4, suffix: &str) -> OpStack {
    let mut op = TransformOp::new(OpKind::Transform, Precision::Double, suffix);
    op.set_matrix(m, TimeCode::Default)
        .unwrap_or_else(|err| unreachable!("transform takes a matrix: {err}"));
    OpStack::from_ops(vec![op])
}

/// Parent `translate (-2,3,1), rotateXYZ (-11,-21,22)`; child
/// `translate (2,1,2), rotateXYZ (0,0,0)`.
pub fn rotated_parent_stage() -> Stage {
    let mut stage = Stage::new();
    *stage.define_xform(PARENT) = OpStack::from_ops(vec![
        vec_op(OpKind::Translate, "", [-2.0, 3.0, 1.0]),
        vec_op(OpKind::RotateXyz, "", [-11.0, -21.0, 22.0]),
    ]);
    *stage.define_xform(CHILD) = OpStack::from_ops(vec![
        vec_op(OpKind::Translate, "", [2.0, 1.0, 2.0]),
        vec_op(OpKind::RotateXyz, "", [0.0, 0.0, 0.0]),
    ]);
    stage
}

/// Parent `translate (-3,-2,-1), rotateXYZ (10,15,20), scale (1.1,1.2,1.3)`;
/// child `translate (3,4,5), rotateXYZ (0,0,0)`.
pub fn scaled_parent_stage() -> Stage {
    let mut stage = Stage::new();
    *stage.define_xform(PARENT) = trs_stack([-3.0, -2.0, -1.0], [10.0, 15.0, 20.0], [1.1, 1.2, 1.3]);
    *stage.define_xform(CHILD) = OpStack::from_ops(vec![
        vec_op(OpKind::Translate, "", [3.0, 4.0, 5.0]),
        vec_op(OpKind::RotateXyz, "", [0.0, 0.0, 0.0]),
    ]);
    stage
}

/// Parent `translate (1,2,3), rotateXYZ (15,30,45)`; child holds a single
/// `transform:child_transform` op with `m`.
pub fn matrix_child_stage(m: Mat4) -> Stage {
    let mut stage = Stage::new();
    *stage.define_xform(PARENT) = OpStack::from_ops(vec![
        vec_op(OpKind::Translate, "", [1.0, 2.0, 3.0]),
        vec_op(OpKind::RotateXyz, "", [15.0, 30.0, 45.0]),
    ]);
    *stage.define_xform(CHILD) = matrix_stack(m, "child_transform");
    stage
}

/// Parent-to-world frame of `path`, read through a fresh cache.
pub fn parent_frame(stage: &Stage, path: &str, time: TimeCode) -> Result<Mat4> {
    TransformCache::new().parent_world(stage, &NodePath::new(path), time)
}

/// The rows-with-translation matrix used by the matrix-op scenarios:
/// X scaled by 4, Y and Z rotated 45° about X and scaled by 5 and 6,
/// translated by `(1,2,3)`.
pub fn sample_matrix() -> Mat4 {
    Mat4::new([
        4.0, 0.0, 0.0, 0.0,
        0.0, 3.535534, 3.535534, 0.0,
        0.0, -4.242641, 4.242641, 0.0,
        1.0, 2.0, 3.0, 1.0,
    ])
}
