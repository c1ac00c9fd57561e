// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! xform-core: transform-op stacks, their evaluation and their manipulation.
//!
//! A node's local transform is an ordered stack of [`TransformOp`]s
//! (translate, nine rotate variants, scale, shear, generic matrix) stored at
//! half, float or double precision and sampled at a [`TimeCode`]. The crate
//! provides:
//!
//! - [`evaluate_range`]: reduce any contiguous range of a stack to one
//!   row-vector affine [`Mat4`];
//! - [`OpManipulator`] / [`AbsoluteManipulator`]: map a relative or absolute
//!   edit expressed in Transform, PreTransform, World or PostTransform space
//!   onto the one op being edited;
//! - [`TransformCache`]: memoised local/world matrices over a [`Hierarchy`]
//!   for a single time sample;
//! - [`OpInserter`]: default placement of new translate/rotate/scale ops.
#![forbid(unsafe_code)]

pub mod absolute;
pub mod cache;
pub mod error;
pub mod evaluator;
pub mod inserter;
pub mod manipulator;
pub mod math;
pub mod oneshot;
pub mod op;
pub mod shear;
pub mod stage;

pub use absolute::AbsoluteManipulator;
pub use cache::{CachedFrames, TransformCache};
pub use error::{Result, XformError};
pub use evaluator::{evaluate, evaluate_range, op_matrix, op_rotation, op_scale, op_translation};
pub use inserter::{DefaultOpInserter, InsertRecord, OpInserter};
pub use manipulator::{
    EditFamily, EditOutcome, ManipulatorFrames, ManipulatorMode, ManipulatorSettings,
    OpManipulator, OpTarget, ParentFrameSource, Space,
};
pub use math::{Axis, Mat4, Quat, RotationOrder, Vec3, EPSILON};
pub use oneshot::OneShot;
pub use op::{OpKind, OpStack, PayloadShape, Precision, TimeCode, TransformOp};
pub use stage::{Hierarchy, NodePath, Stage};
