// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Node paths, the hierarchy port and an in-memory stage.

use std::collections::BTreeMap;
use std::fmt;

use crate::op::OpStack;

/// Absolute, `/`-separated path of a scene node (e.g. `/parent/child`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodePath(String);

impl NodePath {
    /// Wraps a path string. A missing leading `/` is added.
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        if path.starts_with('/') {
            Self(path)
        } else {
            Self(format!("/{path}"))
        }
    }

    /// Path string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last path element.
    pub fn name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or_default()
    }

    /// Parent node, `None` for top-level nodes (whose parent is the root).
    pub fn parent(&self) -> Option<Self> {
        match self.0.rfind('/') {
            Some(0) | None => None,
            Some(idx) => Some(Self(self.0[..idx].to_owned())),
        }
    }

    /// Child path `self/name`.
    pub fn child(&self, name: &str) -> Self {
        Self(format!("{}/{name}", self.0))
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodePath {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Read access to the node hierarchy and each node's op stack.
///
/// Parents are derived from [`NodePath::parent`]; the root itself carries no
/// transform.
pub trait Hierarchy {
    /// Op stack of `path`, `None` when the node is missing or not
    /// transformable.
    fn op_stack(&self, path: &NodePath) -> Option<&OpStack>;
}

/// In-memory node store.
#[derive(Debug, Clone, Default)]
pub struct Stage {
    nodes: BTreeMap<NodePath, Option<OpStack>>,
}

impl Stage {
    /// Creates an empty stage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines (or fetches) a transformable node and returns its op stack.
    pub fn define_xform(&mut self, path: impl Into<NodePath>) -> &mut OpStack {
        self.nodes
            .entry(path.into())
            .or_default()
            .get_or_insert_with(OpStack::new)
    }

    /// Defines a node without an op stack (not transformable).
    pub fn define_scope(&mut self, path: impl Into<NodePath>) {
        self.nodes.insert(path.into(), None);
    }

    /// Op stack of `path`.
    pub fn stack(&self, path: &NodePath) -> Option<&OpStack> {
        self.nodes.get(path).and_then(Option::as_ref)
    }

    /// Mutable op stack of `path`.
    pub fn stack_mut(&mut self, path: &NodePath) -> Option<&mut OpStack> {
        self.nodes.get_mut(path).and_then(Option::as_mut)
    }

    /// Number of defined nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when no node is defined.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Hierarchy for Stage {
    fn op_stack(&self, path: &NodePath) -> Option<&OpStack> {
        self.stack(path)
    }
}
