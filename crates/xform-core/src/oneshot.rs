// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Single-edit helpers: open a session on a named op, apply one edit, drop
//! the session.
//!
//! An empty `op_name` guesses the op for the edit family, using the primary
//! suffixes of [`OneShot::settings`].

use crate::absolute::AbsoluteManipulator;
use crate::error::Result;
use crate::manipulator::{
    EditOutcome, ManipulatorMode, ManipulatorSettings, OpTarget, ParentFrameSource, Space,
};
use crate::math::{Quat, Vec3};
use crate::op::{OpStack, TimeCode};

/// Where a one-shot edit lands: a stack, the op name and the time.
#[derive(Debug)]
pub struct OneShot<'s, 'n> {
    /// Stack holding the op.
    pub stack: &'s mut OpStack,
    /// Op name (`xformOp:...`); empty to guess.
    pub op_name: &'n str,
    /// Time the edit is written at.
    pub time: TimeCode,
    /// Guess suffixes and near-identity threshold for the session.
    pub settings: ManipulatorSettings,
}

impl<'s, 'n> OneShot<'s, 'n> {
    /// Targets `op_name` of `stack` at `time` with default settings.
    pub fn new(stack: &'s mut OpStack, op_name: &'n str, time: TimeCode) -> Self {
        Self {
            stack,
            op_name,
            time,
            settings: ManipulatorSettings::default(),
        }
    }

    /// Replaces the session settings.
    #[must_use]
    pub fn with_settings(mut self, settings: ManipulatorSettings) -> Self {
        self.settings = settings;
        self
    }

    fn open(
        self,
        mode: ManipulatorMode,
        parent: &mut dyn ParentFrameSource,
    ) -> Result<AbsoluteManipulator<'s>> {
        AbsoluteManipulator::new(
            self.stack,
            OpTarget::Name(self.op_name),
            mode,
            self.time,
            parent,
            self.settings,
        )
    }

    /// Relative translate.
    ///
    /// # Errors
    /// Construction or edit failure of the underlying manipulator.
    pub fn translate(
        self,
        parent: &mut dyn ParentFrameSource,
        delta: Vec3,
        space: Space,
    ) -> Result<EditOutcome> {
        self.open(ManipulatorMode::Translate, parent)?.translate(delta, space)
    }

    /// Relative scale.
    ///
    /// # Errors
    /// Construction or edit failure of the underlying manipulator.
    pub fn scale(
        self,
        parent: &mut dyn ParentFrameSource,
        factor: Vec3,
        space: Space,
    ) -> Result<EditOutcome> {
        self.open(ManipulatorMode::Scale, parent)?.scale(factor, space)
    }

    /// Relative quaternion rotation.
    ///
    /// # Errors
    /// Construction or edit failure of the underlying manipulator.
    pub fn rotate(
        self,
        parent: &mut dyn ParentFrameSource,
        delta: Quat,
        space: Space,
    ) -> Result<EditOutcome> {
        self.open(ManipulatorMode::Rotate, parent)?.rotate(delta, space)
    }

    /// Relative rotation about X, in radians.
    ///
    /// # Errors
    /// Construction or edit failure of the underlying manipulator.
    pub fn rotate_x(
        self,
        parent: &mut dyn ParentFrameSource,
        angle: f64,
        space: Space,
    ) -> Result<EditOutcome> {
        self.open(ManipulatorMode::Rotate, parent)?.rotate_x(angle, space)
    }

    /// Relative rotation about Y, in radians.
    ///
    /// # Errors
    /// Construction or edit failure of the underlying manipulator.
    pub fn rotate_y(
        self,
        parent: &mut dyn ParentFrameSource,
        angle: f64,
        space: Space,
    ) -> Result<EditOutcome> {
        self.open(ManipulatorMode::Rotate, parent)?.rotate_y(angle, space)
    }

    /// Relative rotation about Z, in radians.
    ///
    /// # Errors
    /// Construction or edit failure of the underlying manipulator.
    pub fn rotate_z(
        self,
        parent: &mut dyn ParentFrameSource,
        angle: f64,
        space: Space,
    ) -> Result<EditOutcome> {
        self.open(ManipulatorMode::Rotate, parent)?.rotate_z(angle, space)
    }

    /// Absolute translate.
    ///
    /// # Errors
    /// Construction or edit failure of the underlying manipulator.
    pub fn set_translate(
        self,
        parent: &mut dyn ParentFrameSource,
        target: Vec3,
        space: Space,
    ) -> Result<EditOutcome> {
        self.open(ManipulatorMode::Translate, parent)?
            .set_translate(target, space)
    }

    /// Absolute scale.
    ///
    /// # Errors
    /// Construction or edit failure of the underlying manipulator.
    pub fn set_scale(
        self,
        parent: &mut dyn ParentFrameSource,
        target: Vec3,
        space: Space,
    ) -> Result<EditOutcome> {
        self.open(ManipulatorMode::Scale, parent)?.set_scale(target, space)
    }

    /// Absolute rotation.
    ///
    /// # Errors
    /// Construction or edit failure of the underlying manipulator.
    pub fn set_rotate(
        self,
        parent: &mut dyn ParentFrameSource,
        target: Quat,
        space: Space,
    ) -> Result<EditOutcome> {
        self.open(ManipulatorMode::Rotate, parent)?.set_rotate(target, space)
    }
}
