// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Relative edits of a single op expressed in one of four coordinate spaces.
//!
//! An [`OpManipulator`] borrows one node's [`OpStack`], resolves the op to
//! edit, and caches the frames around it (the prefix frame `coord`, the suffix
//! frame `post`, and `world = coord * parent`). Edits map the caller's delta
//! from the requested [`Space`] into op-local units and write the result back
//! at the op's declared precision.
//!
//! Frames are refreshed by [`OpManipulator::update_to_time`]; edits to the
//! manipulated op itself never invalidate them.

use tracing::{debug, instrument, warn};

use crate::error::{Result, XformError};
use crate::evaluator::{evaluate_range, op_matrix, op_rotation, op_scale, op_translation};
use crate::math::{rad_to_deg, rad_to_deg3, Axis, Mat4, Quat, Vec3, EPSILON};
use crate::op::{OpKind, OpStack, TimeCode, TransformOp};
use crate::shear::{read_shear, shear_matrix};

/// Coordinate space a delta is expressed in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Space {
    /// The op's own local space.
    #[default]
    Transform,
    /// The frame of every op before the target (parent space).
    PreTransform,
    /// World space.
    World,
    /// The frame of every op after the target (object space).
    PostTransform,
}

impl Space {
    /// Alias of [`Space::PreTransform`].
    pub const PARENT: Self = Self::PreTransform;
    /// Alias of [`Space::PostTransform`].
    pub const OBJECT: Self = Self::PostTransform;
}

/// How the manipulated op is interpreted.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ManipulatorMode {
    /// Translation edits.
    Translate,
    /// Rotation edits.
    Rotate,
    /// Scale edits.
    Scale,
    /// Derive the mode from the op kind.
    Guess,
}

impl ManipulatorMode {
    /// Mode a `Guess` resolves to for an op of `kind`.
    pub const fn guess_for(kind: OpKind) -> Self {
        match kind {
            OpKind::Transform | OpKind::Translate => Self::Translate,
            OpKind::Scale => Self::Scale,
            _ => Self::Rotate,
        }
    }

    /// True when an op of `kind` can be edited in this mode.
    pub const fn accepts(self, kind: OpKind) -> bool {
        match self {
            Self::Translate => matches!(kind, OpKind::Translate | OpKind::Transform),
            Self::Rotate => !matches!(kind, OpKind::Translate | OpKind::Scale | OpKind::Invalid),
            Self::Scale => matches!(kind, OpKind::Scale | OpKind::Transform),
            Self::Guess => false,
        }
    }
}

/// Family of a relative or absolute edit call.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EditFamily {
    /// `translate` / `set_translate`.
    Translate,
    /// `rotate*` / `set_rotate`.
    Rotate,
    /// `scale` / `set_scale`.
    Scale,
}

impl EditFamily {
    /// Mode the family requires.
    pub const fn mode(self) -> ManipulatorMode {
        match self {
            Self::Translate => ManipulatorMode::Translate,
            Self::Rotate => ManipulatorMode::Rotate,
            Self::Scale => ManipulatorMode::Scale,
        }
    }
}

/// Successful result of an edit.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum EditOutcome {
    /// Storage was written.
    Applied,
    /// The delta was below the near-identity threshold; storage is untouched.
    NoOp,
}

/// Which op a manipulator edits.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OpTarget<'a> {
    /// Op at this stack index.
    Index(usize),
    /// Op with this op name (`xformOp:...`, `!invert!` included). An empty
    /// name behaves like [`OpTarget::Guess`].
    Name(&'a str),
    /// Best-fit op for the requested mode.
    Guess,
}

/// Host-tunable knobs of the op search and near-identity suppression.
#[derive(Debug, Clone, PartialEq)]
pub struct ManipulatorSettings {
    /// Suffix of the preferred rotate op; empty disables the suffix tier.
    pub rotate_suffix: String,
    /// Suffix of the preferred translate op.
    pub translate_suffix: String,
    /// Suffix of the preferred scale op.
    pub scale_suffix: String,
    /// Deltas within this distance of the identity are ignored.
    pub epsilon: f64,
}

impl Default for ManipulatorSettings {
    fn default() -> Self {
        Self {
            rotate_suffix: String::new(),
            translate_suffix: String::new(),
            scale_suffix: String::new(),
            epsilon: EPSILON,
        }
    }
}

/// Supplies the parent-to-world frame of the node being manipulated.
pub trait ParentFrameSource {
    /// Parent-to-world transform at `time`.
    fn parent_to_world(&mut self, time: TimeCode) -> Result<Mat4>;
}

impl ParentFrameSource for Mat4 {
    fn parent_to_world(&mut self, _time: TimeCode) -> Result<Mat4> {
        Ok(*self)
    }
}

impl<F> ParentFrameSource for F
where
    F: FnMut(TimeCode) -> Result<Mat4>,
{
    fn parent_to_world(&mut self, time: TimeCode) -> Result<Mat4> {
        self(time)
    }
}

/// Frames surrounding the manipulated op.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ManipulatorFrames {
    /// Every op before the target, biased for matrix ops.
    pub coord: Mat4,
    /// Inverse of `coord`.
    pub inv_coord: Mat4,
    /// Every op after the target.
    pub post: Mat4,
    /// Inverse of `post`, identity when `post` is singular (a zero scale
    /// later in the stack).
    pub inv_post: Mat4,
    /// `coord * parent`, identity when the stack resets.
    pub world: Mat4,
    /// Inverse of `world`.
    pub inv_world: Mat4,
    /// Parent-to-world frame used to build `world`.
    pub parent: Mat4,
    /// Rotation of `coord`.
    pub q_coord: Quat,
    /// Rotation of `world`.
    pub q_world: Quat,
    /// Rotation of `post`.
    pub q_post: Quat,
}

impl Default for ManipulatorFrames {
    fn default() -> Self {
        Self {
            coord: Mat4::identity(),
            inv_coord: Mat4::identity(),
            post: Mat4::identity(),
            inv_post: Mat4::identity(),
            world: Mat4::identity(),
            inv_world: Mat4::identity(),
            parent: Mat4::identity(),
            q_coord: Quat::identity(),
            q_world: Quat::identity(),
            q_post: Quat::identity(),
        }
    }
}

/// Edit session on one op of a stack.
#[derive(Debug)]
pub struct OpManipulator<'s> {
    stack: &'s mut OpStack,
    index: usize,
    mode: ManipulatorMode,
    time: TimeCode,
    frames: ManipulatorFrames,
    settings: ManipulatorSettings,
}

const CANONICAL_ROTATE: [&str; 16] = [
    "xformOp:orient",
    "xformOp:rotateX",
    "xformOp:rotateY",
    "xformOp:rotateZ",
    "xformOp:rotateXYZ",
    "xformOp:rotateXZY",
    "xformOp:rotateYXZ",
    "xformOp:rotateYZX",
    "xformOp:rotateZXY",
    "xformOp:rotateZYX",
    "xformOp:rotateXYZ:rotate",
    "xformOp:rotateXZY:rotate",
    "xformOp:rotateYXZ:rotate",
    "xformOp:rotateYZX:rotate",
    "xformOp:rotateZXY:rotate",
    "xformOp:rotateZYX:rotate",
];
const CANONICAL_SCALE: [&str; 2] = ["xformOp:scale", "xformOp:scale:scale"];
const CANONICAL_TRANSLATE: [&str; 2] = ["xformOp:translate", "xformOp:translate:translate"];

/// Resolves `target` and `mode` against `stack`.
///
/// # Panics
/// Panics when an [`OpTarget::Index`] is out of range.
pub fn resolve_target(
    stack: &OpStack,
    target: OpTarget<'_>,
    mode: ManipulatorMode,
    settings: &ManipulatorSettings,
) -> Result<(usize, ManipulatorMode)> {
    let index = match target {
        OpTarget::Index(index) => {
            assert!(
                index < stack.len(),
                "op index {index} out of range for a stack of {}",
                stack.len()
            );
            index
        }
        OpTarget::Name(name) if !name.is_empty() => stack
            .find(name)
            .ok_or_else(|| XformError::OpNotFound(name.to_owned()))?,
        OpTarget::Name(_) | OpTarget::Guess => return guess_op(stack, mode, settings),
    };
    let mode = match mode {
        ManipulatorMode::Guess => ManipulatorMode::guess_for(stack.ops()[index].kind()),
        explicit => explicit,
    };
    Ok((index, mode))
}

fn guess_op(
    stack: &OpStack,
    mode: ManipulatorMode,
    settings: &ManipulatorSettings,
) -> Result<(usize, ManipulatorMode)> {
    let (suffix, canonical, compatible): (&str, &[&str], fn(OpKind) -> bool) = match mode {
        ManipulatorMode::Rotate => (settings.rotate_suffix.as_str(), &CANONICAL_ROTATE[..], OpKind::is_rotation),
        ManipulatorMode::Scale => (settings.scale_suffix.as_str(), &CANONICAL_SCALE[..], |k| {
            k == OpKind::Scale
        }),
        ManipulatorMode::Translate => (settings.translate_suffix.as_str(), &CANONICAL_TRANSLATE[..], |k| {
            k == OpKind::Translate
        }),
        ManipulatorMode::Guess => {
            return Err(XformError::OpNotFound(
                "an op guessed without a manipulator mode".to_owned(),
            ))
        }
    };
    let ops = stack.ops();
    ops.iter()
        .position(|op| op.has_suffix(suffix) && compatible(op.kind()))
        .or_else(|| {
            ops.iter()
                .position(|op| canonical.contains(&op.op_name().as_str()))
        })
        .or_else(|| ops.iter().position(|op| op.kind() == OpKind::Transform))
        .map(|index| (index, mode))
        .ok_or_else(|| XformError::OpNotFound(format!("a {mode:?} op")))
}

fn invert(m: &Mat4) -> Result<Mat4> {
    m.inverse().ok_or(XformError::SingularFrame)
}

/// Builds every frame around `ops[index]` for `mode` without touching any
/// manipulator state.
fn compute_frames(
    stack: &OpStack,
    index: usize,
    mode: ManipulatorMode,
    time: TimeCode,
    parent: Mat4,
) -> Result<ManipulatorFrames> {
    let ops = stack.ops();
    let op = &ops[index];
    if !mode.accepts(op.kind()) {
        return Err(XformError::IncompatibleOpKind {
            kind: op.kind(),
            mode,
        });
    }

    let mut coord = evaluate_range(ops, 0, index, time);
    let post = evaluate_range(ops, index + 1, ops.len(), time);
    if op.kind() == OpKind::Transform {
        let m = op_matrix(op, time);
        match mode {
            ManipulatorMode::Rotate => {
                let pivot = coord
                    .translation_row()
                    .add(&coord.transform_direction(&m.translation_row()));
                coord = coord.with_translation(pivot);
            }
            ManipulatorMode::Scale => coord = m.orthonormalized().multiply(&coord),
            ManipulatorMode::Translate | ManipulatorMode::Guess => {}
        }
    }

    let (world, inv_world, parent) = if stack.resets_xform_stack() {
        (Mat4::identity(), Mat4::identity(), Mat4::identity())
    } else {
        let world = coord.multiply(&parent);
        (world, invert(&world)?, parent)
    };

    Ok(ManipulatorFrames {
        coord,
        inv_coord: invert(&coord)?,
        post,
        inv_post: post.inverse().unwrap_or_else(|| {
            warn!(index, "singular post frame, using identity inverse");
            Mat4::identity()
        }),
        world,
        inv_world,
        parent,
        q_coord: Quat::from_mat4(&coord.right_handed()),
        q_world: Quat::from_mat4(&world.right_handed()),
        q_post: Quat::from_mat4(&post.right_handed()),
    })
}

impl<'s> OpManipulator<'s> {
    /// Opens an edit session on the op of `stack` selected by `target`.
    ///
    /// # Errors
    /// [`XformError::OpNotFound`] when no op matches, plus every error of
    /// [`OpManipulator::update_to_time`].
    ///
    /// # Panics
    /// Panics when an [`OpTarget::Index`] is out of range.
    #[instrument(level = "debug", skip(stack, parent, settings))]
    pub fn new(
        stack: &'s mut OpStack,
        target: OpTarget<'_>,
        mode: ManipulatorMode,
        time: TimeCode,
        parent: &mut dyn ParentFrameSource,
        settings: ManipulatorSettings,
    ) -> Result<Self> {
        let (index, mode) = resolve_target(stack, target, mode, &settings)?;
        let parent = parent.parent_to_world(time)?;
        let frames = compute_frames(stack, index, mode, time, parent)?;
        debug!(index, ?mode, op = %stack.ops()[index].op_name(), "manipulator ready");
        Ok(Self {
            stack,
            index,
            mode,
            time,
            frames,
            settings,
        })
    }

    /// Recomputes every frame for `time` and `mode`.
    ///
    /// Nothing is committed unless every frame could be built.
    ///
    /// # Errors
    /// [`XformError::IncompatibleOpKind`] when the op cannot be edited in
    /// `mode`; [`XformError::SingularFrame`] when a frame cannot be inverted;
    /// any error raised by `parent`.
    #[instrument(level = "debug", skip(self, parent), fields(index = self.index))]
    pub fn update_to_time(
        &mut self,
        time: TimeCode,
        mode: ManipulatorMode,
        parent: &mut dyn ParentFrameSource,
    ) -> Result<()> {
        let mode = match mode {
            ManipulatorMode::Guess => ManipulatorMode::guess_for(self.op().kind()),
            explicit => explicit,
        };
        let parent = parent.parent_to_world(time)?;
        let frames = compute_frames(self.stack, self.index, mode, time, parent)?;
        self.frames = frames;
        self.mode = mode;
        self.time = time;
        Ok(())
    }

    fn rebuild(&mut self, mode: ManipulatorMode) -> Result<()> {
        let frames = compute_frames(self.stack, self.index, mode, self.time, self.frames.parent)?;
        debug!(from = ?self.mode, to = ?mode, "rebuilt frames for matrix op");
        self.frames = frames;
        self.mode = mode;
        Ok(())
    }

    /// Makes sure the session can perform a `family` edit, reinterpreting a
    /// `Transform` op when the mode differs.
    pub(crate) fn ensure_mode(&mut self, family: EditFamily) -> Result<()> {
        let wanted = family.mode();
        if self.mode == wanted {
            return Ok(());
        }
        if self.op().kind() == OpKind::Transform {
            self.rebuild(wanted)
        } else {
            Err(XformError::WrongManipulatorMode {
                mode: self.mode,
                requested: family,
            })
        }
    }

    /// Index of the manipulated op.
    pub fn op_index(&self) -> usize {
        self.index
    }

    /// The manipulated op.
    pub fn op(&self) -> &TransformOp {
        &self.stack.ops()[self.index]
    }

    fn op_mut(&mut self) -> &mut TransformOp {
        let index = self.index;
        &mut self.stack.ops_mut()[index]
    }

    /// Current (resolved) mode.
    pub fn mode(&self) -> ManipulatorMode {
        self.mode
    }

    /// Time the frames were built for.
    pub fn time(&self) -> TimeCode {
        self.time
    }

    /// Search and threshold settings.
    pub fn settings(&self) -> &ManipulatorSettings {
        &self.settings
    }

    /// Every cached frame.
    pub fn frames(&self) -> &ManipulatorFrames {
        &self.frames
    }

    /// Frame the manipulator gizmo sits in (the biased prefix frame).
    pub fn manipulator_frame(&self) -> Mat4 {
        self.frames.coord
    }

    /// World frame of the manipulator gizmo.
    pub fn world_frame(&self) -> Mat4 {
        self.frames.world
    }

    /// The borrowed stack.
    pub fn stack(&self) -> &OpStack {
        self.stack
    }

    /// True when the op accepts translation edits.
    pub fn can_translate(&self) -> bool {
        matches!(self.op().kind(), OpKind::Translate | OpKind::Transform)
    }

    /// True when the op accepts rotation edits.
    pub fn can_rotate(&self) -> bool {
        let kind = self.op().kind();
        kind.is_rotation() || kind == OpKind::Transform
    }

    /// True when the op accepts scale edits.
    pub fn can_scale(&self) -> bool {
        matches!(self.op().kind(), OpKind::Scale | OpKind::Transform)
    }

    /// True when the op stores a shear.
    pub fn can_shear(&self) -> bool {
        self.op().kind() == OpKind::Shear
    }

    /// Effective translation of the op, zero when it cannot translate.
    pub fn translation(&self) -> Vec3 {
        if self.can_translate() {
            op_translation(self.op(), self.time)
        } else {
            Vec3::ZERO
        }
    }

    /// Effective rotation of the op, identity when it cannot rotate.
    pub fn rotation(&self) -> Quat {
        if self.can_rotate() {
            op_rotation(self.op(), self.time)
        } else {
            Quat::identity()
        }
    }

    /// Effective scale of the op, one when it cannot scale.
    pub fn scaling(&self) -> Vec3 {
        if self.can_scale() {
            op_scale(self.op(), self.time)
        } else {
            Vec3::ONE
        }
    }

    /// Shear `(xy, xz, yz)` of a shear op, zero otherwise.
    pub fn shear(&self) -> Vec3 {
        if self.can_shear() {
            read_shear(&op_matrix(self.op(), self.time))
        } else {
            Vec3::ZERO
        }
    }

    fn effective_matrix(&self) -> Mat4 {
        op_matrix(self.op(), self.time)
    }

    fn write_effective_matrix(&mut self, m: Mat4) -> Result<()> {
        let stored = if self.op().is_inverse() {
            invert(&m)?
        } else {
            m
        };
        let time = self.time;
        self.op_mut().set_matrix(stored, time)
    }

    /// Offsets the op by `delta` expressed in `space`.
    ///
    /// # Errors
    /// [`XformError::WrongManipulatorMode`] outside Translate mode (unless
    /// the op is a `Transform`), or a storage error.
    #[instrument(level = "debug", skip(self), fields(index = self.index))]
    pub fn translate(&mut self, delta: Vec3, space: Space) -> Result<EditOutcome> {
        self.ensure_mode(EditFamily::Translate)?;
        let local = match space {
            Space::Transform => delta,
            Space::World => self.frames.inv_world.transform_direction(&delta),
            Space::PreTransform => self.frames.inv_coord.transform_direction(&delta),
            Space::PostTransform => self.frames.post.transform_direction(&delta),
        };
        if local.max_abs() <= self.settings.epsilon {
            debug!(?delta, "translation below threshold, skipped");
            return Ok(EditOutcome::NoOp);
        }

        let time = self.time;
        match self.op().kind() {
            OpKind::Translate => {
                let op = self.op_mut();
                let step = if op.is_inverse() { local.negate() } else { local };
                let value = op.vec3(time).add(&step);
                op.set_vec3(value, time)?;
            }
            OpKind::Transform => {
                let m = self.effective_matrix();
                let moved = m.with_translation(m.translation_row().add(&local));
                self.write_effective_matrix(moved)?;
            }
            kind => {
                return Err(XformError::IncompatibleOpKind {
                    kind,
                    mode: self.mode,
                })
            }
        }
        Ok(EditOutcome::Applied)
    }

    fn trailing_rotation(&self) -> bool {
        self.stack.ops()[self.index + 1..]
            .iter()
            .any(|op| !matches!(op.kind(), OpKind::Invalid | OpKind::Translate | OpKind::Scale))
    }

    /// Multiplies the op's scale by `factor` expressed in `space`.
    ///
    /// # Errors
    /// [`XformError::UnsupportedNonUniformScaleSpace`] when a non-uniform
    /// factor would shear; [`XformError::WrongManipulatorMode`] outside Scale
    /// mode (unless the op is a `Transform`); or a storage error.
    #[instrument(level = "debug", skip(self), fields(index = self.index))]
    pub fn scale(&mut self, factor: Vec3, space: Space) -> Result<EditOutcome> {
        let eps = self.settings.epsilon;
        let non_uniform = (factor.x() - factor.y()).abs() > eps
            || (factor.x() - factor.z()).abs() > eps
            || (factor.y() - factor.z()).abs() > eps;
        if non_uniform {
            let shears = match space {
                Space::Transform => false,
                Space::World | Space::PreTransform => true,
                Space::PostTransform => self.trailing_rotation(),
            };
            if shears {
                return Err(XformError::UnsupportedNonUniformScaleSpace(space));
            }
        }
        self.ensure_mode(EditFamily::Scale)?;
        if factor.sub(&Vec3::ONE).max_abs() <= eps {
            debug!(?factor, "scale below threshold, skipped");
            return Ok(EditOutcome::NoOp);
        }

        let time = self.time;
        match self.op().kind() {
            OpKind::Scale => {
                let op = self.op_mut();
                let current = op.vec3(time);
                let value = if op.is_inverse() {
                    current.mul(&factor.recip())
                } else {
                    current.mul(&factor)
                };
                op.set_vec3(value, time)?;
            }
            OpKind::Transform => {
                let scaled = self.effective_matrix().scale_rows(&factor);
                self.write_effective_matrix(scaled)?;
            }
            kind => {
                return Err(XformError::IncompatibleOpKind {
                    kind,
                    mode: self.mode,
                })
            }
        }
        Ok(EditOutcome::Applied)
    }

    /// Composes the quaternion `original` with `delta` in `space`.
    fn compose_rotation(&self, original: &Quat, delta: &Quat, space: Space) -> Quat {
        let f = &self.frames;
        match space {
            Space::Transform => original.multiply(delta),
            Space::World => f
                .q_world
                .conjugate()
                .multiply(delta)
                .multiply(&f.q_world)
                .multiply(original),
            Space::PreTransform => f
                .q_coord
                .conjugate()
                .multiply(delta)
                .multiply(&f.q_coord)
                .multiply(original),
            Space::PostTransform => original
                .multiply(&f.q_post)
                .multiply(delta)
                .multiply(&f.q_post.conjugate()),
        }
    }

    /// Applies `delta` to the 3x3 `original` in `space` (row-vector order).
    fn compose_basis(&self, original: &Mat4, delta: &Mat4, space: Space) -> Mat4 {
        let f = &self.frames;
        match space {
            Space::Transform => delta.multiply(original),
            Space::World => original
                .multiply(&f.world.without_translation())
                .multiply(delta)
                .multiply(&f.inv_world.without_translation()),
            Space::PreTransform => original
                .multiply(&f.coord.without_translation())
                .multiply(delta)
                .multiply(&f.inv_coord.without_translation()),
            Space::PostTransform => f
                .inv_post
                .without_translation()
                .multiply(delta)
                .multiply(&f.post.without_translation())
                .multiply(original),
        }
    }

    /// Rotates the op by the quaternion `delta` expressed in `space`.
    ///
    /// # Errors
    /// [`XformError::WrongManipulatorMode`] outside Rotate mode (unless the
    /// op is a `Transform`), [`XformError::IncompatibleOpKind`] for ops that
    /// store no rotation, or a storage error.
    #[instrument(level = "debug", skip(self), fields(index = self.index))]
    pub fn rotate(&mut self, delta: Quat, space: Space) -> Result<EditOutcome> {
        let eps = self.settings.epsilon;
        let delta = delta.normalize();
        if delta.is_near_identity(eps) || delta.negate().is_near_identity(eps) {
            debug!(?delta, "rotation below threshold, skipped");
            return Ok(EditOutcome::NoOp);
        }
        self.ensure_mode(EditFamily::Rotate)?;

        let time = self.time;
        let kind = self.op().kind();
        let inverse = self.op().is_inverse();
        let original = op_rotation(self.op(), time);

        if let Some(axis) = kind.single_axis() {
            let rotated = self.compose_rotation(&original, &delta, space);
            let stored = if inverse { rotated.conjugate() } else { rotated };
            let angle = 2.0 * stored.component(axis.index()).atan2(stored.w());
            self.op_mut().set_angle(rad_to_deg(angle), time)?;
        } else if let Some(order) = kind.rotation_order() {
            let basis = self.compose_basis(&original.to_mat4(), &delta.to_mat4(), space);
            let basis = if space == Space::Transform {
                basis
            } else {
                basis.right_handed().orthonormalized()
            };
            let stored = if inverse { basis.transpose3() } else { basis };
            let angles = order.extract(&stored);
            self.op_mut().set_vec3(rad_to_deg3(&angles), time)?;
        } else if kind == OpKind::Orient {
            let rotated = self.compose_rotation(&original, &delta, space).normalize();
            let stored = if inverse { rotated.conjugate() } else { rotated };
            self.op_mut().set_quat(stored, time)?;
        } else if kind == OpKind::Transform {
            let m = self.effective_matrix();
            let d = delta.to_mat4();
            let basis = match space {
                Space::Transform => m.without_translation().multiply(&d),
                _ => self.compose_basis(&m.without_translation(), &d, space),
            };
            self.write_effective_matrix(basis.with_translation(m.translation_row()))?;
        } else {
            return Err(XformError::IncompatibleOpKind {
                kind,
                mode: self.mode,
            });
        }
        Ok(EditOutcome::Applied)
    }

    fn rotate_axis(&mut self, axis: Axis, angle: f64, space: Space) -> Result<EditOutcome> {
        let delta = Quat::about_axis(axis, angle);
        if space != Space::Transform {
            return self.rotate(delta, space);
        }
        if delta.is_near_identity(self.settings.epsilon) {
            debug!(?axis, angle, "rotation below threshold, skipped");
            return Ok(EditOutcome::NoOp);
        }
        self.ensure_mode(EditFamily::Rotate)?;

        let time = self.time;
        let kind = self.op().kind();
        let degrees = rad_to_deg(angle);
        if let Some(op_axis) = kind.single_axis() {
            if op_axis != axis {
                return Err(XformError::IncompatibleOpKind {
                    kind,
                    mode: self.mode,
                });
            }
            let op = self.op_mut();
            let step = if op.is_inverse() { -degrees } else { degrees };
            let value = op.angle(time) + step;
            op.set_angle(value, time)?;
            return Ok(EditOutcome::Applied);
        }
        match kind.rotation_order() {
            Some(order) if order.leading_axis() == axis && !self.op().is_inverse() => {
                let op = self.op_mut();
                let mut angles = op.vec3(time).to_array();
                angles[axis.index()] += degrees;
                op.set_vec3(Vec3::from(angles), time)?;
                Ok(EditOutcome::Applied)
            }
            _ => self.rotate(delta, space),
        }
    }

    /// Rotates about X by `angle` radians in `space`.
    ///
    /// In Transform space an op whose most local axis is X takes the angle
    /// directly, leaving its other components untouched.
    ///
    /// # Errors
    /// As [`OpManipulator::rotate`]; [`XformError::IncompatibleOpKind`] for a
    /// single-axis op about another axis in Transform space.
    pub fn rotate_x(&mut self, angle: f64, space: Space) -> Result<EditOutcome> {
        self.rotate_axis(Axis::X, angle, space)
    }

    /// Rotates about Y by `angle` radians in `space`.
    ///
    /// # Errors
    /// See [`OpManipulator::rotate_x`].
    pub fn rotate_y(&mut self, angle: f64, space: Space) -> Result<EditOutcome> {
        self.rotate_axis(Axis::Y, angle, space)
    }

    /// Rotates about Z by `angle` radians in `space`.
    ///
    /// # Errors
    /// See [`OpManipulator::rotate_x`].
    pub fn rotate_z(&mut self, angle: f64, space: Space) -> Result<EditOutcome> {
        self.rotate_axis(Axis::Z, angle, space)
    }

    /// Replaces the shear of a `Shear` op with `(xy, xz, yz)`.
    ///
    /// # Errors
    /// [`XformError::IncompatibleOpKind`] when the op is not a shear, or a
    /// storage error.
    pub fn set_shear(&mut self, shear: Vec3) -> Result<EditOutcome> {
        if !self.can_shear() {
            return Err(XformError::IncompatibleOpKind {
                kind: self.op().kind(),
                mode: self.mode,
            });
        }
        if shear.sub(&self.shear()).max_abs() <= self.settings.epsilon {
            return Ok(EditOutcome::NoOp);
        }
        self.write_effective_matrix(shear_matrix(shear.x(), shear.y(), shear.z()))?;
        Ok(EditOutcome::Applied)
    }
}
