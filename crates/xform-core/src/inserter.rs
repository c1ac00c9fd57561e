// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Creates a translate, rotate or scale op when a tool finds nothing to edit.
//!
//! The default placement assumes the common pivot layout
//! `translate, pivots..., rotateXYZ, !invert!pivot, ..., scale, !invert!scalePivot`.

use tracing::info;

use crate::error::Result;
use crate::math::Vec3;
use crate::op::{OpKind, OpStack, Precision, TimeCode, TransformOp};

/// What an insertion did, kept so it can be undone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertRecord {
    /// Op name of the inserted op.
    pub op_name: String,
    /// Index the op landed at.
    pub index: usize,
}

/// Host customisation point for op insertion.
///
/// Override `insert_*` to change placement; `do_insert_*` wrap them into an
/// undoable [`InsertRecord`].
pub trait OpInserter {
    /// Adds a double-precision translate as the first op.
    ///
    /// # Errors
    /// [`crate::XformError::DuplicateOp`] when `xformOp:translate` exists.
    fn insert_translate(&self, stack: &mut OpStack) -> Result<usize> {
        stack.insert(0, TransformOp::new(OpKind::Translate, Precision::Double, ""))?;
        Ok(0)
    }

    /// Adds a float `rotateXYZ` after the leading non-inverse translates.
    ///
    /// # Errors
    /// [`crate::XformError::DuplicateOp`] when `xformOp:rotateXYZ` exists.
    fn insert_rotate(&self, stack: &mut OpStack) -> Result<usize> {
        let index = stack
            .ops()
            .iter()
            .position(|op| op.kind() != OpKind::Translate || op.is_inverse())
            .unwrap_or(stack.len());
        stack.insert(index, TransformOp::new(OpKind::RotateXyz, Precision::Float, ""))?;
        Ok(index)
    }

    /// Adds a float scale of one, before a trailing inverse scale pivot when
    /// there is one, else at the end.
    ///
    /// # Errors
    /// [`crate::XformError::DuplicateOp`] when `xformOp:scale` exists.
    fn insert_scale(&self, stack: &mut OpStack) -> Result<usize> {
        let before_pivot = stack.ops().last().is_some_and(|op| {
            op.kind() == OpKind::Translate
                && op.is_inverse()
                && (op.has_suffix("scalePivot") || op.has_suffix("pivot"))
        });
        let index = if before_pivot {
            stack.len() - 1
        } else {
            stack.len()
        };
        let mut op = TransformOp::new(OpKind::Scale, Precision::Float, "");
        op.set_vec3(Vec3::ONE, TimeCode::Default)?;
        stack.insert(index, op)?;
        Ok(index)
    }

    /// Undoable [`OpInserter::insert_translate`].
    ///
    /// # Errors
    /// As [`OpInserter::insert_translate`].
    fn do_insert_translate(&self, stack: &mut OpStack) -> Result<InsertRecord> {
        let index = self.insert_translate(stack)?;
        Ok(record(stack, index))
    }

    /// Undoable [`OpInserter::insert_rotate`].
    ///
    /// # Errors
    /// As [`OpInserter::insert_rotate`].
    fn do_insert_rotate(&self, stack: &mut OpStack) -> Result<InsertRecord> {
        let index = self.insert_rotate(stack)?;
        Ok(record(stack, index))
    }

    /// Undoable [`OpInserter::insert_scale`].
    ///
    /// # Errors
    /// As [`OpInserter::insert_scale`].
    fn do_insert_scale(&self, stack: &mut OpStack) -> Result<InsertRecord> {
        let index = self.insert_scale(stack)?;
        Ok(record(stack, index))
    }

    /// Removes an op created by a `do_insert_*` call. Returns false when the
    /// op is already gone.
    fn remove_inserted(&self, stack: &mut OpStack, record: &InsertRecord) -> bool {
        let Some(index) = stack.find(&record.op_name) else {
            return false;
        };
        stack.remove(index).is_some()
    }
}

fn record(stack: &OpStack, index: usize) -> InsertRecord {
    let op_name = stack
        .op(index)
        .map(TransformOp::op_name)
        .unwrap_or_default();
    info!(op = %op_name, index, "inserted transform op");
    InsertRecord { op_name, index }
}

/// The stock placement policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultOpInserter;

impl OpInserter for DefaultOpInserter {}
