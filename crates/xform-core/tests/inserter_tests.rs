// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
use xform_core::{
    DefaultOpInserter, InsertRecord, OpInserter, OpKind, OpStack, Precision, Result, TimeCode,
    TransformOp, XformError,
};
use xform_dry_tests::{assert_vec3_near, init_tracing, vec_op};

fn pivot_stack() -> OpStack {
    OpStack::from_ops(vec![
        vec_op(OpKind::Translate, "", [1.0, 2.0, 3.0]),
        vec_op(OpKind::Translate, "pivot", [0.5, 0.0, 0.0]),
        vec_op(OpKind::Translate, "pivot", [0.5, 0.0, 0.0]).inverted(),
    ])
}

#[test]
fn translate_goes_first() {
    init_tracing();
    let mut stack = OpStack::from_ops(vec![vec_op(OpKind::Scale, "", [2.0, 2.0, 2.0])]);
    let record = DefaultOpInserter.do_insert_translate(&mut stack).unwrap();
    assert_eq!(
        record,
        InsertRecord {
            op_name: "xformOp:translate".to_owned(),
            index: 0,
        }
    );
    assert_eq!(stack.op_order(), ["xformOp:translate", "xformOp:scale"]);
    assert_eq!(stack.ops()[0].precision(), Precision::Double);
}

#[test]
fn rotate_lands_after_leading_translates() {
    let mut stack = pivot_stack();
    let record = DefaultOpInserter.do_insert_rotate(&mut stack).unwrap();
    assert_eq!(record.index, 2);
    assert_eq!(
        stack.op_order(),
        [
            "xformOp:translate",
            "xformOp:translate:pivot",
            "xformOp:rotateXYZ",
            "!invert!xformOp:translate:pivot",
        ]
    );
    assert_eq!(stack.ops()[2].precision(), Precision::Float);
}

#[test]
fn rotate_on_empty_stack_is_the_only_op() {
    let mut stack = OpStack::new();
    assert_eq!(DefaultOpInserter.insert_rotate(&mut stack).unwrap(), 0);
    assert_eq!(stack.op_order(), ["xformOp:rotateXYZ"]);
}

#[test]
fn scale_goes_before_a_trailing_inverse_pivot() {
    let mut stack = pivot_stack();
    let record = DefaultOpInserter.do_insert_scale(&mut stack).unwrap();
    assert_eq!(record.index, 2);
    assert_eq!(stack.op_order()[3], "!invert!xformOp:translate:pivot");
    assert_vec3_near(stack.ops()[2].vec3(TimeCode::Default), [1.0, 1.0, 1.0], 0.0);
}

#[test]
fn scale_is_appended_otherwise() {
    let mut stack = OpStack::from_ops(vec![vec_op(OpKind::Translate, "", [1.0, 2.0, 3.0])]);
    assert_eq!(DefaultOpInserter.insert_scale(&mut stack).unwrap(), 1);
    assert_eq!(stack.op_order(), ["xformOp:translate", "xformOp:scale"]);
}

#[test]
fn existing_op_is_a_duplicate() {
    let mut stack = pivot_stack();
    assert_eq!(
        DefaultOpInserter.do_insert_translate(&mut stack),
        Err(XformError::DuplicateOp("xformOp:translate".to_owned()))
    );
    assert_eq!(stack.len(), 3);
}

#[test]
fn remove_inserted_undoes_once() {
    let mut stack = pivot_stack();
    let record = DefaultOpInserter.do_insert_scale(&mut stack).unwrap();
    assert!(DefaultOpInserter.remove_inserted(&mut stack, &record));
    assert_eq!(stack.len(), 3);
    assert!(!DefaultOpInserter.remove_inserted(&mut stack, &record));
    assert_eq!(stack.op_order(), pivot_stack().op_order());
}

/// Places new translates last and keeps the default rotate and scale.
struct AppendTranslate;

impl OpInserter for AppendTranslate {
    fn insert_translate(&self, stack: &mut OpStack) -> Result<usize> {
        let index = stack.len();
        stack.push(TransformOp::new(OpKind::Translate, Precision::Float, "moved"))?;
        Ok(index)
    }
}

#[test]
fn overridden_placement_flows_into_the_record() {
    let mut stack = pivot_stack();
    let record = AppendTranslate.do_insert_translate(&mut stack).unwrap();
    assert_eq!(record.op_name, "xformOp:translate:moved");
    assert_eq!(record.index, 3);
    assert!(AppendTranslate.remove_inserted(&mut stack, &record));
    assert_eq!(stack.len(), 3);
}
