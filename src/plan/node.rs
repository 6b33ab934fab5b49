// src/plan/node.rs

use std::fmt;

use serde::Serialize;

use crate::errors::{PlanError, Result};
use crate::types::{ExecMode, NodeKind};

/// Stable reference to a node inside its owning [`PlanTree`].
///
/// This is the arena index; it never changes once the node is created and
/// nodes are never removed.
///
/// [`PlanTree`]: crate::plan::PlanTree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeHandle(pub(crate) usize);

impl NodeHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Box of a node on the layout grid, in grid units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Geometry {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl Geometry {
    pub fn new(left: u32, top: u32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// A 1x1 box at the origin; position is filled in later.
    pub fn unit() -> Self {
        Self::new(0, 0, 1, 1)
    }

    pub fn right(&self) -> u32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.top + self.height
    }

    /// Whether `other` lies entirely inside `self` (edges may touch).
    pub fn contains(&self, other: &Geometry) -> bool {
        other.left >= self.left
            && other.top >= self.top
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Whether the two boxes share any area.
    pub fn overlaps(&self, other: &Geometry) -> bool {
        self.left < other.right()
            && other.left < self.right()
            && self.top < other.bottom()
            && other.top < self.bottom()
    }
}

/// What the construction interface needs to create a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeSpec {
    pub kind: NodeKind,
    pub exec_mode: Option<ExecMode>,
}

impl NodeSpec {
    pub fn leaf() -> Self {
        Self {
            kind: NodeKind::Leaf,
            exec_mode: None,
        }
    }

    pub fn composite(mode: ExecMode) -> Self {
        Self {
            kind: NodeKind::Composite,
            exec_mode: Some(mode),
        }
    }

    pub fn sequential() -> Self {
        Self::composite(ExecMode::Sequential)
    }

    pub fn parallel() -> Self {
        Self::composite(ExecMode::Parallel)
    }
}

/// A single element of the plan tree.
///
/// `parent` is a back-reference only; ownership flows exclusively through
/// `children` (both are handles into the owning tree's arena).
#[derive(Debug, Clone)]
pub struct Node {
    pub handle: NodeHandle,
    /// Display id; `None` for barriers.
    pub id: Option<u32>,
    pub kind: NodeKind,
    /// Only meaningful for composites.
    pub exec_mode: Option<ExecMode>,
    pub parent: Option<NodeHandle>,
    pub children: Vec<NodeHandle>,
    /// Depth from the root (root = 0).
    pub level: usize,
    /// `None` until the layout passes have run.
    pub geometry: Option<Geometry>,
}

impl Node {
    pub(crate) fn new(
        handle: NodeHandle,
        id: Option<u32>,
        spec: NodeSpec,
        parent: Option<NodeHandle>,
        level: usize,
    ) -> Self {
        Self {
            handle,
            id,
            kind: spec.kind,
            exec_mode: spec.exec_mode,
            parent,
            children: Vec::new(),
            level,
            geometry: None,
        }
    }

    /// Leaves and barriers (anything without children) are link endpoints.
    pub fn is_atomic(&self) -> bool {
        self.children.is_empty()
    }

    pub fn is_parallel_composite(&self) -> bool {
        self.kind == NodeKind::Composite && self.exec_mode == Some(ExecMode::Parallel)
    }

    pub fn is_sequential_composite(&self) -> bool {
        self.kind == NodeKind::Composite && self.exec_mode == Some(ExecMode::Sequential)
    }

    /// Execution mode of a composite.
    pub fn mode(&self) -> Result<ExecMode> {
        self.exec_mode.ok_or_else(|| {
            PlanError::InvalidMode(format!("composite node {} has no exec_mode", self.label()))
        })
    }

    /// First child in stored order (the entry point of a sequential composite).
    pub fn first_child(&self) -> Result<NodeHandle> {
        self.children
            .first()
            .copied()
            .ok_or_else(|| self.empty_composite_error())
    }

    /// Last child in stored order (the exit point of a sequential composite).
    pub fn last_child(&self) -> Result<NodeHandle> {
        self.children
            .last()
            .copied()
            .ok_or_else(|| self.empty_composite_error())
    }

    /// Human-readable label: the display id, or `barrier#<handle>`.
    pub fn label(&self) -> String {
        match self.id {
            Some(id) => id.to_string(),
            None => format!("{}{}", self.kind, self.handle),
        }
    }

    pub(crate) fn empty_composite_error(&self) -> PlanError {
        PlanError::InvalidTree(format!(
            "{} node {} has no children",
            self.exec_mode
                .map(|m| m.to_string())
                .unwrap_or_else(|| self.kind.to_string()),
            self.label()
        ))
    }
}
