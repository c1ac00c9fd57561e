// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
use proptest::prelude::*;
use xform_core::math::deg_to_rad3;
use xform_core::shear::shear_matrix;
use xform_core::{
    evaluate, evaluate_range, op_matrix, op_rotation, op_scale, op_translation, Mat4, OpKind,
    OpStack, Precision, Quat, RotationOrder, TimeCode, TransformOp, Vec3, XformError,
};
use xform_dry_tests::{assert_mat4_near, assert_quat_near, assert_vec3_near, init_tracing, trs_stack, vec_op};

const EPS: f64 = 1e-5;

fn op_with(kind: OpKind, precision: Precision, suffix: &str, value: [f64; 3]) -> TransformOp {
    let mut op = TransformOp::new(kind, precision, suffix);
    op.set_vec3(Vec3::from(value), TimeCode::Default).unwrap();
    op
}

fn matrix_op(kind: OpKind, m: Mat4) -> TransformOp {
    let mut op = TransformOp::new(kind, Precision::Double, "");
    op.set_matrix(m, TimeCode::Default).unwrap();
    op
}

/// Reference composition: one op at a time, later ops more local.
fn compose_each(ops: &[TransformOp]) -> Mat4 {
    ops.iter()
        .fold(Mat4::identity(), |frame, op| op_matrix(op, TimeCode::Default) * frame)
}

#[test]
fn mixed_precision_translations_collapse() {
    let ops = vec![
        op_with(OpKind::Translate, Precision::Double, "first", [1.0, 2.0, 3.0]),
        op_with(OpKind::Translate, Precision::Float, "second", [0.1, 0.2, 0.3]),
        op_with(OpKind::Translate, Precision::Half, "third", [0.01, 0.02, 0.03]),
    ];
    assert_mat4_near(&evaluate_range(&ops, 0, 0, TimeCode::Default), &Mat4::identity(), EPS);
    assert_vec3_near(
        evaluate_range(&ops, 0, 1, TimeCode::Default).translation_row(),
        [1.0, 2.0, 3.0],
        EPS,
    );
    assert_vec3_near(
        evaluate_range(&ops, 0, 2, TimeCode::Default).translation_row(),
        [1.1, 2.2, 3.3],
        EPS,
    );
    let all = evaluate(&ops, TimeCode::Default);
    assert_vec3_near(all.translation_row(), [1.11, 2.22, 3.33], 1e-4);
    assert_mat4_near(&all.without_translation(), &Mat4::identity(), 0.0);
}

#[test]
fn translation_after_scale_is_scaled() {
    let ops = vec![
        op_with(OpKind::Scale, Precision::Double, "scale", [1.0, 10.0, 100.0]),
        op_with(OpKind::Translate, Precision::Double, "first", [1.0, 2.0, 3.0]),
        op_with(OpKind::Translate, Precision::Double, "second", [0.1, 0.2, 0.3]),
    ];
    let frame = evaluate_range(&ops, 0, 2, TimeCode::Default);
    assert_mat4_near(&frame, &Mat4::from_rows(Vec3::UNIT_X, Vec3::new(0.0, 10.0, 0.0), Vec3::new(0.0, 0.0, 100.0), Vec3::new(1.0, 20.0, 300.0)), EPS);
    let frame = evaluate(&ops, TimeCode::Default);
    assert_vec3_near(frame.translation_row(), [1.1, 22.0, 330.0], EPS);
}

#[test]
fn consecutive_scales_multiply() {
    let ops = vec![
        op_with(OpKind::Scale, Precision::Double, "a", [2.0, 3.0, 4.0]),
        op_with(OpKind::Scale, Precision::Float, "b", [0.5, 2.0, -1.0]),
    ];
    assert_mat4_near(&evaluate(&ops, TimeCode::Default), &Mat4::scale(1.0, 6.0, -4.0), EPS);
}

#[test]
fn trs_stack_matches_matrix_product() {
    let stack = trs_stack([1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]);
    let r = RotationOrder::Xyz.to_mat4(&deg_to_rad3(&Vec3::new(4.0, 5.0, 6.0)));
    let expected = Mat4::scale(7.0, 8.0, 9.0) * r * Mat4::translation(1.0, 2.0, 3.0);
    assert_mat4_near(&stack.local_transform(TimeCode::Default), &expected, 1e-12);
    assert_mat4_near(&compose_each(stack.ops()), &expected, 1e-12);
}

#[test]
fn single_axis_rotations_match_matrix_builders() {
    let cases = [
        (OpKind::RotateX, Mat4::rotation_x(0.5)),
        (OpKind::RotateY, Mat4::rotation_y(0.5)),
        (OpKind::RotateZ, Mat4::rotation_z(0.5)),
    ];
    for (kind, expected) in cases {
        let mut op = TransformOp::new(kind, Precision::Double, "");
        op.set_angle(0.5f64.to_degrees(), TimeCode::Default).unwrap();
        assert_mat4_near(&evaluate(&[op], TimeCode::Default), &expected, 1e-12);
    }
}

const PRECISIONS: [Precision; 3] = [Precision::Half, Precision::Float, Precision::Double];

const EULER_KINDS: [OpKind; 6] = [
    OpKind::RotateXyz,
    OpKind::RotateXzy,
    OpKind::RotateYxz,
    OpKind::RotateYzx,
    OpKind::RotateZxy,
    OpKind::RotateZyx,
];

fn cancels(op: TransformOp) {
    let kind = op.kind();
    let ops = [op.clone(), op.inverted()];
    assert_mat4_near(&evaluate(&ops, TimeCode::Default), &Mat4::identity(), 1e-9);
    assert!(ops[1].op_name().starts_with("!invert!xformOp:"), "{kind:?}");
}

#[test]
fn inverse_ops_cancel_their_forward_twins() {
    init_tracing();
    for precision in PRECISIONS {
        cancels(op_with(OpKind::Translate, precision, "pivot", [1.0, -2.0, 3.0]));
        cancels(op_with(OpKind::Scale, precision, "", [2.0, 4.0, 0.5]));
        for kind in [OpKind::RotateX, OpKind::RotateY, OpKind::RotateZ] {
            let mut op = TransformOp::new(kind, precision, "");
            op.set_angle(33.0, TimeCode::Default).unwrap();
            cancels(op);
        }
        for kind in EULER_KINDS {
            cancels(op_with(kind, precision, "", [10.0, 20.0, 30.0]));
        }
        let mut orient = TransformOp::new(OpKind::Orient, precision, "");
        orient
            .set_quat(Quat::from_axis_angle(Vec3::new(1.0, 1.0, 0.0), 0.8), TimeCode::Default)
            .unwrap();
        cancels(orient);
    }
    cancels(matrix_op(OpKind::Transform, Mat4::rotation_x(0.3) * Mat4::translation(1.0, 2.0, 3.0)));
    cancels(matrix_op(OpKind::Shear, shear_matrix(0.5, -0.25, 1.5)));
}

#[test]
fn inverse_helpers_report_effective_values() {
    let t = op_with(OpKind::Translate, Precision::Double, "", [1.0, 2.0, 3.0]).inverted();
    assert_vec3_near(op_translation(&t, TimeCode::Default), [-1.0, -2.0, -3.0], 0.0);
    let s = op_with(OpKind::Scale, Precision::Double, "", [2.0, 4.0, 0.5]).inverted();
    assert_vec3_near(op_scale(&s, TimeCode::Default), [0.5, 0.25, 2.0], 0.0);
    let mut r = TransformOp::new(OpKind::RotateX, Precision::Double, "");
    r.set_angle(90.0, TimeCode::Default).unwrap();
    let expected = op_rotation(&r, TimeCode::Default).conjugate();
    assert_quat_near(op_rotation(&r.inverted(), TimeCode::Default), expected, 1e-12);
}

#[test]
fn singular_inverse_matrix_contributes_identity() {
    init_tracing();
    let ops = [
        op_with(OpKind::Translate, Precision::Double, "", [1.0, 2.0, 3.0]),
        matrix_op(OpKind::Transform, Mat4::scale(1.0, 0.0, 1.0)).inverted(),
    ];
    assert_mat4_near(&evaluate(&ops, TimeCode::Default), &Mat4::translation(1.0, 2.0, 3.0), 0.0);
}

#[test]
fn shear_composes_as_a_matrix() {
    let ops = [
        op_with(OpKind::Translate, Precision::Double, "", [1.0, 2.0, 3.0]),
        matrix_op(OpKind::Shear, shear_matrix(0.5, 0.0, 0.0)),
    ];
    let frame = evaluate(&ops, TimeCode::Default);
    assert_vec3_near(frame.row(1), [0.5, 1.0, 0.0], 0.0);
    assert_vec3_near(frame.translation_row(), [1.0, 2.0, 3.0], 0.0);
    assert_vec3_near(op_scale(&ops[1], TimeCode::Default), [1.0, 1.118033988749895, 1.0], 1e-12);
}

#[test]
fn invalid_ops_contribute_nothing() {
    let ops = [
        op_with(OpKind::Translate, Precision::Double, "", [1.0, 0.0, 0.0]),
        TransformOp::new(OpKind::Invalid, Precision::Double, ""),
        op_with(OpKind::Translate, Precision::Double, "b", [0.0, 1.0, 0.0]),
    ];
    assert_mat4_near(&evaluate(&ops, TimeCode::Default), &Mat4::translation(1.0, 1.0, 0.0), 0.0);
}

#[test]
fn held_time_samples() {
    let mut op = TransformOp::new(OpKind::Translate, Precision::Double, "");
    op.set_vec3(Vec3::new(9.0, 9.0, 9.0), TimeCode::Default).unwrap();
    op.set_vec3(Vec3::new(5.0, 0.0, 0.0), TimeCode::At(5.0)).unwrap();
    op.set_vec3(Vec3::new(1.0, 0.0, 0.0), TimeCode::At(1.0)).unwrap();
    op.set_vec3(Vec3::new(2.0, 0.0, 0.0), TimeCode::At(1.0)).unwrap();
    assert_eq!(op.num_time_samples(), 2);

    let ops = [op];
    let x_at = |t| evaluate(&ops, t).translation_row().x();
    assert_eq!(x_at(TimeCode::Default), 9.0);
    assert_eq!(x_at(TimeCode::At(0.0)), 2.0);
    assert_eq!(x_at(TimeCode::At(1.0)), 2.0);
    assert_eq!(x_at(TimeCode::At(4.9)), 2.0);
    assert_eq!(x_at(TimeCode::At(5.0)), 5.0);
    assert_eq!(x_at(TimeCode::At(100.0)), 5.0);
}

#[test]
fn writes_round_to_declared_precision() {
    let op = op_with(OpKind::Translate, Precision::Half, "", [0.1, 1000.2, -2.0]);
    let stored = op.vec3(TimeCode::Default);
    assert_eq!(stored.x(), Precision::Half.round(0.1));
    assert_eq!(stored.y(), 1000.0);
    assert_eq!(stored.z(), -2.0);
}

#[test]
#[should_panic(expected = "out of bounds")]
fn reversed_range_fails_fast() {
    let stack = trs_stack([1.0, 2.0, 3.0], [0.0; 3], [1.0; 3]);
    let _ = evaluate_range(stack.ops(), 2, 1, TimeCode::Default);
}

#[test]
#[should_panic(expected = "out of bounds")]
fn range_past_the_end_fails_fast() {
    let stack = trs_stack([1.0, 2.0, 3.0], [0.0; 3], [1.0; 3]);
    let _ = evaluate_range(stack.ops(), 0, 4, TimeCode::Default);
}

#[test]
fn payload_shape_is_checked() {
    let mut op = TransformOp::new(OpKind::Translate, Precision::Double, "");
    let err = op.set_angle(10.0, TimeCode::Default).unwrap_err();
    assert!(matches!(err, XformError::PayloadMismatch { .. }), "{err}");
    let mut shear = TransformOp::new(OpKind::Shear, Precision::Double, "");
    assert!(shear.set_vec3(Vec3::ONE, TimeCode::Default).is_err());
}

#[test]
fn stack_names_and_order() {
    let mut stack = OpStack::new();
    stack.add_op(OpKind::Translate, Precision::Double, "").unwrap();
    stack.add_op(OpKind::Translate, Precision::Double, "pivot").unwrap();
    stack.push(vec_op(OpKind::Translate, "pivot", [1.0, 0.0, 0.0]).inverted()).unwrap();
    assert!(matches!(
        stack.add_op(OpKind::Translate, Precision::Float, "pivot"),
        Err(XformError::DuplicateOp(_))
    ));
    assert_eq!(
        stack.op_order(),
        ["xformOp:translate", "xformOp:translate:pivot", "!invert!xformOp:translate:pivot"]
    );
    stack
        .set_op_order(&["!invert!xformOp:translate:pivot", "xformOp:translate", "xformOp:translate:pivot"])
        .unwrap();
    assert_eq!(stack.find("xformOp:translate:pivot"), Some(2));
    assert!(stack.set_op_order(&["xformOp:translate"]).is_err());
}

fn euler_op(kind: OpKind) -> impl Strategy<Value = TransformOp> {
    (-180.0f64..180.0, -180.0f64..180.0, -180.0f64..180.0)
        .prop_map(move |(a, b, c)| vec_op(kind, "", [a, b, c]))
}

fn trs_at(precision: Precision, t: [f64; 3], r: [f64; 3], s: [f64; 3]) -> Vec<TransformOp> {
    vec![
        op_with(OpKind::Translate, precision, "", t),
        op_with(OpKind::RotateXyz, precision, "", r),
        op_with(OpKind::Scale, precision, "", s),
    ]
}

fn small3(lo: f64, hi: f64) -> impl Strategy<Value = [f64; 3]> {
    [lo..hi, lo..hi, lo..hi]
}

proptest! {
    #[test]
    fn narrow_precisions_track_double(
        t in small3(-4.0, 4.0),
        r in small3(-90.0, 90.0),
        s in small3(0.5, 2.0),
    ) {
        let reference = evaluate(&trs_at(Precision::Double, t, r, s), TimeCode::Default);
        let float = evaluate(&trs_at(Precision::Float, t, r, s), TimeCode::Default);
        let half = evaluate(&trs_at(Precision::Half, t, r, s), TimeCode::Default);
        prop_assert!(float.abs_diff_le(&reference, 1e-5));
        prop_assert!(half.abs_diff_le(&reference, 5e-3));
    }

    #[test]
    fn empty_range_is_identity(start in 0usize..4) {
        let stack = trs_stack([1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]);
        let start = start.min(stack.len());
        prop_assert_eq!(evaluate_range(stack.ops(), start, start, TimeCode::Default), Mat4::identity());
    }

    #[test]
    fn accumulated_rotations_match_per_op_product(
        zyx in euler_op(OpKind::RotateZyx),
        xyz in euler_op(OpKind::RotateXyz),
        yzx in euler_op(OpKind::RotateYzx),
        x in -180.0f64..180.0,
    ) {
        let mut single = TransformOp::new(OpKind::RotateX, Precision::Double, "");
        single.set_angle(x, TimeCode::Default).unwrap();
        let ops = [zyx, xyz, yzx, single];
        for end in 1..=ops.len() {
            let got = evaluate_range(&ops, 0, end, TimeCode::Default);
            prop_assert!(got.abs_diff_le(&compose_each(&ops[..end]), 1e-9));
        }
    }

    #[test]
    fn orient_matches_its_quaternion(x in -1.0f64..1.0, y in -1.0f64..1.0, z in -1.0f64..1.0, w in -1.0f64..1.0) {
        let q = Quat::new(x, y, z, w);
        prop_assume!(q.dot(&q) > 1e-3);
        let mut op = TransformOp::new(OpKind::Orient, Precision::Double, "");
        op.set_quat(q, TimeCode::Default).unwrap();
        prop_assert!(evaluate(&[op], TimeCode::Default).abs_diff_le(&q.to_mat4(), 1e-9));
    }
}
