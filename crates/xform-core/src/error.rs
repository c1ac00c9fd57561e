// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Error type shared by the op, manipulator and cache layers.

use thiserror::Error;

use crate::manipulator::{EditFamily, ManipulatorMode, Space};
use crate::op::{OpKind, PayloadShape};
use crate::stage::NodePath;

/// Errors surfaced by the evaluator, manipulator, cache and inserter.
///
/// Every variant is deterministic for the same inputs; none is worth
/// retrying.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum XformError {
    /// No op in the stack matches the requested name or guess policy.
    #[error("no transform op found for {0}")]
    OpNotFound(String),
    /// The manipulator mode cannot apply to the resolved op kind.
    #[error("op kind {kind:?} cannot be manipulated in {mode:?} mode")]
    IncompatibleOpKind {
        /// Kind of the resolved op.
        kind: OpKind,
        /// Requested manipulator mode.
        mode: ManipulatorMode,
    },
    /// An edit family does not match the manipulator mode and the op is not a
    /// generic matrix that could be reinterpreted.
    #[error("{requested:?} edit requested while manipulating in {mode:?} mode")]
    WrongManipulatorMode {
        /// Current manipulator mode.
        mode: ManipulatorMode,
        /// Edit family that was requested.
        requested: EditFamily,
    },
    /// A non-uniform scale would introduce shear in the requested space.
    #[error("non-uniform scale is not supported in {0:?} space")]
    UnsupportedNonUniformScaleSpace(Space),
    /// A node (or one of its ancestors) has no transformable op stack.
    #[error("node {0} is not transformable")]
    NodeNotTransformable(NodePath),
    /// A coordinate frame needed for the edit cannot be inverted.
    #[error("coordinate frame is singular")]
    SingularFrame,
    /// A value of the wrong shape was written to an op.
    #[error("op {op} expects a {expected:?} payload, got {actual:?}")]
    PayloadMismatch {
        /// Op name.
        op: String,
        /// Shape dictated by the op kind.
        expected: PayloadShape,
        /// Shape that was supplied.
        actual: PayloadShape,
    },
    /// An op with the same name already exists in the stack.
    #[error("op {0} already exists in the stack")]
    DuplicateOp(String),
}

/// Convenience alias used across the crate.
pub type Result<T> = core::result::Result<T, XformError>;
