// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Per-node local/world matrix cache for a single time sample.

use std::collections::HashMap;

use tracing::{debug, instrument, warn};

use crate::error::{Result, XformError};
use crate::math::Mat4;
use crate::op::TimeCode;
use crate::stage::{Hierarchy, NodePath};

/// Matrices cached for one node.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CachedFrames {
    /// Local transform (all ops of the node).
    pub local: Mat4,
    /// Local-to-world transform.
    pub world: Mat4,
    /// Inverse of `local`.
    pub inverse_local: Mat4,
    /// Inverse of `world`.
    pub inverse_world: Mat4,
}

/// Memoises node transforms for one time sample.
///
/// Querying a different time clears every entry first, so an entry is never
/// served for a time other than [`TransformCache::current_time`]. Not
/// synchronised; one traversal owns one cache.
#[derive(Debug, Clone, Default)]
pub struct TransformCache {
    time: TimeCode,
    entries: HashMap<NodePath, CachedFrames>,
}

impl TransformCache {
    /// Creates an empty cache at [`TimeCode::Default`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Local transform of `path`.
    pub fn local<H: Hierarchy + ?Sized>(
        &mut self,
        hierarchy: &H,
        path: &NodePath,
        time: TimeCode,
    ) -> Result<Mat4> {
        Ok(self.frames(hierarchy, path, time)?.local)
    }

    /// Local-to-world transform of `path`.
    pub fn world<H: Hierarchy + ?Sized>(
        &mut self,
        hierarchy: &H,
        path: &NodePath,
        time: TimeCode,
    ) -> Result<Mat4> {
        Ok(self.frames(hierarchy, path, time)?.world)
    }

    /// Inverse local transform of `path`.
    pub fn inverse_local<H: Hierarchy + ?Sized>(
        &mut self,
        hierarchy: &H,
        path: &NodePath,
        time: TimeCode,
    ) -> Result<Mat4> {
        Ok(self.frames(hierarchy, path, time)?.inverse_local)
    }

    /// Inverse world transform of `path`.
    pub fn inverse_world<H: Hierarchy + ?Sized>(
        &mut self,
        hierarchy: &H,
        path: &NodePath,
        time: TimeCode,
    ) -> Result<Mat4> {
        Ok(self.frames(hierarchy, path, time)?.inverse_world)
    }

    /// World transform of the parent of `path` (identity for top-level
    /// nodes), as needed by a manipulator editing `path`.
    pub fn parent_world<H: Hierarchy + ?Sized>(
        &mut self,
        hierarchy: &H,
        path: &NodePath,
        time: TimeCode,
    ) -> Result<Mat4> {
        match path.parent() {
            Some(parent) => self.world(hierarchy, &parent, time),
            None => Ok(Mat4::identity()),
        }
    }

    /// Every cached matrix of `path`, computing missing ancestors first.
    #[instrument(level = "debug", skip(self, hierarchy), fields(path = %path))]
    pub fn frames<H: Hierarchy + ?Sized>(
        &mut self,
        hierarchy: &H,
        path: &NodePath,
        time: TimeCode,
    ) -> Result<CachedFrames> {
        if time != self.time {
            debug!(dropped = self.entries.len(), "time changed, clearing cache");
            self.entries.clear();
            self.time = time;
        }

        let mut pending = Vec::new();
        let mut ancestor_world = Mat4::identity();
        let mut cursor = Some(path.clone());
        while let Some(node) = cursor {
            if let Some(cached) = self.entries.get(&node) {
                ancestor_world = cached.world;
                break;
            }
            cursor = node.parent();
            pending.push(node);
        }

        for node in pending.into_iter().rev() {
            let stack = hierarchy
                .op_stack(&node)
                .ok_or_else(|| XformError::NodeNotTransformable(node.clone()))?;
            let local = stack.local_transform(time);
            let world = if stack.resets_xform_stack() {
                local
            } else {
                local.multiply(&ancestor_world)
            };
            let frames = CachedFrames {
                local,
                world,
                inverse_local: invert_or_identity(&local, &node),
                inverse_world: invert_or_identity(&world, &node),
            };
            self.entries.insert(node, frames);
            ancestor_world = world;
        }

        self.entries
            .get(path)
            .copied()
            .ok_or_else(|| XformError::NodeNotTransformable(path.clone()))
    }

    /// Time sample the entries belong to.
    pub fn current_time(&self) -> TimeCode {
        self.time
    }

    /// Number of cached nodes.
    pub fn num_entries(&self) -> usize {
        self.entries.len()
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

fn invert_or_identity(m: &Mat4, node: &NodePath) -> Mat4 {
    m.inverse().unwrap_or_else(|| {
        warn!(node = %node, "singular node transform, caching identity inverse");
        Mat4::identity()
    })
}
