// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Absolute edits: turn a target value into the relative delta that reaches
//! it, then delegate to [`OpManipulator`].

use core::ops::{Deref, DerefMut};

use tracing::instrument;

use crate::error::Result;
use crate::manipulator::{
    EditFamily, EditOutcome, ManipulatorMode, ManipulatorSettings, OpManipulator, OpTarget,
    ParentFrameSource, Space,
};
use crate::math::{deg_to_rad3, Quat, RotationOrder, Vec3};
use crate::op::{OpStack, TimeCode};

/// [`OpManipulator`] with `set_*` edits.
///
/// Every relative edit and query stays reachable through `Deref`.
#[derive(Debug)]
pub struct AbsoluteManipulator<'s> {
    inner: OpManipulator<'s>,
}

impl<'s> AbsoluteManipulator<'s> {
    /// Opens an edit session; see [`OpManipulator::new`].
    ///
    /// # Errors
    /// Every error of [`OpManipulator::new`].
    pub fn new(
        stack: &'s mut OpStack,
        target: OpTarget<'_>,
        mode: ManipulatorMode,
        time: TimeCode,
        parent: &mut dyn ParentFrameSource,
        settings: ManipulatorSettings,
    ) -> Result<Self> {
        OpManipulator::new(stack, target, mode, time, parent, settings).map(Self::from)
    }

    /// Unwraps the relative manipulator.
    pub fn into_inner(self) -> OpManipulator<'s> {
        self.inner
    }

    /// Moves the op so its translation equals `target` in `space`.
    ///
    /// In World and PreTransform space `target` is a position in that frame;
    /// in PostTransform space it is brought into op-local units through the
    /// suffix frame first.
    ///
    /// # Errors
    /// As [`OpManipulator::translate`].
    #[instrument(level = "debug", skip(self))]
    pub fn set_translate(&mut self, target: Vec3, space: Space) -> Result<EditOutcome> {
        self.inner.ensure_mode(EditFamily::Translate)?;
        let current = self.inner.translation();
        let frames = *self.inner.frames();
        match space {
            Space::Transform => self.inner.translate(target.sub(&current), space),
            Space::World => {
                let at = frames.world.transform_point(&current);
                self.inner.translate(target.sub(&at), space)
            }
            Space::PreTransform => {
                let at = frames.coord.transform_point(&current);
                self.inner.translate(target.sub(&at), space)
            }
            Space::PostTransform => {
                let local = frames.post.transform_point(&target);
                self.inner.translate(local.sub(&current), Space::Transform)
            }
        }
    }

    /// Scales the op so its scale equals `target`.
    ///
    /// Zero components of the current scale are treated as one.
    ///
    /// # Errors
    /// As [`OpManipulator::scale`].
    #[instrument(level = "debug", skip(self))]
    pub fn set_scale(&mut self, target: Vec3, space: Space) -> Result<EditOutcome> {
        self.inner.ensure_mode(EditFamily::Scale)?;
        let eps = self.inner.settings().epsilon;
        let current = self.inner.scaling().to_array().map(|c| if c.abs() <= eps { 1.0 } else { c });
        self.inner.scale(target.mul(&Vec3::from(current).recip()), space)
    }

    /// Rotates the op so its orientation seen from `space` equals `target`.
    ///
    /// The orientation seen from World space is the op rotation followed by
    /// the world frame; from PreTransform space, followed by the prefix frame;
    /// from PostTransform space, preceded by the suffix frame.
    ///
    /// # Errors
    /// As [`OpManipulator::rotate`].
    #[instrument(level = "debug", skip(self))]
    pub fn set_rotate(&mut self, target: Quat, space: Space) -> Result<EditOutcome> {
        self.inner.ensure_mode(EditFamily::Rotate)?;
        let inv_current = self.inner.rotation().conjugate();
        let target = target.normalize();
        let frames = *self.inner.frames();
        let delta = match space {
            Space::Transform => inv_current.multiply(&target),
            Space::World => target
                .multiply(&inv_current)
                .multiply(&frames.q_world.conjugate()),
            Space::PreTransform => target
                .multiply(&inv_current)
                .multiply(&frames.q_coord.conjugate()),
            Space::PostTransform => frames
                .q_post
                .conjugate()
                .multiply(&inv_current)
                .multiply(&target),
        };
        self.inner.rotate(delta, space)
    }

    /// [`AbsoluteManipulator::set_rotate`] with Euler angles in degrees.
    ///
    /// # Errors
    /// As [`OpManipulator::rotate`].
    pub fn set_rotate_euler(
        &mut self,
        degrees: Vec3,
        order: RotationOrder,
        space: Space,
    ) -> Result<EditOutcome> {
        self.set_rotate(order.to_quat(&deg_to_rad3(&degrees)), space)
    }
}

impl<'s> From<OpManipulator<'s>> for AbsoluteManipulator<'s> {
    fn from(inner: OpManipulator<'s>) -> Self {
        Self { inner }
    }
}

impl<'s> Deref for AbsoluteManipulator<'s> {
    type Target = OpManipulator<'s>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for AbsoluteManipulator<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}
