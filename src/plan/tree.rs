// src/plan/tree.rs

use std::ops::Index;

use tracing::debug;

use crate::errors::{PlanError, Result};
use crate::plan::link::Link;
use crate::plan::node::{Node, NodeHandle, NodeSpec};
use crate::types::NodeKind;

/// Default value of the display-id counter for a fresh tree.
pub const DEFAULT_FIRST_ID: u32 = 1;

/// Arena that owns every node of a plan.
///
/// Nodes are stored in creation order and addressed by [`NodeHandle`].
/// Besides the nodes the tree keeps:
/// - `flattened`: a pre-order traversal snapshot, rebuilt by [`flatten`]
///   whenever the shape changes;
/// - `links`: the resolved leaf-to-leaf ordering edges.
///
/// [`flatten`]: PlanTree::flatten
#[derive(Debug, Clone)]
pub struct PlanTree {
    nodes: Vec<Node>,
    root: Option<NodeHandle>,
    flattened: Vec<NodeHandle>,
    links: Vec<Link>,
    first_id: u32,
    /// `None` once the counter has handed out `u32::MAX`.
    next_id: Option<u32>,
}

impl PlanTree {
    pub fn new() -> Self {
        Self::with_first_id(DEFAULT_FIRST_ID)
    }

    /// Create an empty tree whose first display id will be `first_id`.
    pub fn with_first_id(first_id: u32) -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
            flattened: Vec::new(),
            links: Vec::new(),
            first_id,
            next_id: Some(first_id),
        }
    }

    /// Drop every node and link and reset the id counter.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.flattened.clear();
        self.links.clear();
        self.next_id = Some(self.first_id);
    }

    /// Hand out the next display id.
    pub fn assign_id(&mut self) -> Result<u32> {
        let id = self.next_id.ok_or_else(|| {
            PlanError::InvalidTree(format!(
                "display ids exhausted (counter started at {})",
                self.first_id
            ))
        })?;
        self.next_id = id.checked_add(1);
        Ok(id)
    }

    /// Create the root node. A tree has exactly one root.
    pub fn create_root(&mut self, spec: NodeSpec) -> Result<NodeHandle> {
        if let Some(existing) = self.root {
            return Err(PlanError::InvalidTree(format!(
                "tree already has a root ({})",
                self[existing].label()
            )));
        }
        ensure_constructible(spec)?;

        let handle = self.push_node(spec, None, 0)?;
        self.root = Some(handle);
        Ok(handle)
    }

    /// Create a node and append it as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeHandle, spec: NodeSpec) -> Result<NodeHandle> {
        ensure_constructible(spec)?;
        let level = self.parent_level(parent)?;

        let handle = self.push_node(spec, Some(parent), level + 1)?;
        self.nodes[parent.0].children.push(handle);
        Ok(handle)
    }

    /// Insert a barrier into `parent`'s children at `position`.
    ///
    /// Barriers bypass [`append_child`](Self::append_child): they take no
    /// display id and are placed positionally between existing children.
    pub(crate) fn insert_barrier(&mut self, parent: NodeHandle, position: usize) -> Result<NodeHandle> {
        let level = self.parent_level(parent)?;
        if position > self.nodes[parent.0].children.len() {
            return Err(PlanError::InvalidTree(format!(
                "barrier position {position} is out of range for node {}",
                self[parent].label()
            )));
        }

        let handle = NodeHandle(self.nodes.len());
        let spec = NodeSpec {
            kind: NodeKind::Barrier,
            exec_mode: None,
        };
        self.nodes
            .push(Node::new(handle, None, spec, Some(parent), level + 1));
        self.nodes[parent.0].children.insert(position, handle);
        Ok(handle)
    }

    /// Pre-order walk calling `visit(node, index_within_siblings)`.
    pub fn scan_tree<F>(&self, mut visit: F) -> Result<()>
    where
        F: FnMut(&Node, usize),
    {
        let root = self.require_root()?;

        // Explicit stack so deep plans cannot overflow the call stack.
        let mut stack = vec![(root, 0usize)];
        while let Some((handle, idx)) = stack.pop() {
            let node = &self.nodes[handle.0];
            visit(node, idx);
            for (child_idx, child) in node.children.iter().enumerate().rev() {
                stack.push((*child, child_idx));
            }
        }
        Ok(())
    }

    /// Rebuild the pre-order snapshot.
    pub fn flatten(&mut self) -> Result<()> {
        let mut order = Vec::with_capacity(self.nodes.len());
        self.scan_tree(|node, _| order.push(node.handle))?;
        debug!(nodes = order.len(), "flattened plan tree");
        self.flattened = order;
        Ok(())
    }

    pub fn root(&self) -> Option<NodeHandle> {
        self.root
    }

    pub fn require_root(&self) -> Result<NodeHandle> {
        self.root
            .ok_or_else(|| PlanError::InvalidTree("tree has no root".to_string()))
    }

    pub fn get(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle.0)
    }

    pub(crate) fn node_mut(&mut self, handle: NodeHandle) -> &mut Node {
        &mut self.nodes[handle.0]
    }

    /// Pre-order snapshot from the last [`flatten`](Self::flatten).
    pub fn flattened(&self) -> &[NodeHandle] {
        &self.flattened
    }

    /// Nodes in flattened (pre-order) order.
    pub fn flattened_nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.flattened.iter().map(move |h| &self.nodes[h.0])
    }

    /// All nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.iter()
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub(crate) fn set_links(&mut self, links: Vec<Link>) {
        self.links = links;
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Maximum level of any node (0 for a lone root, 0 for an empty tree).
    pub fn depth(&self) -> usize {
        self.nodes.iter().map(|n| n.level).max().unwrap_or(0)
    }

    pub fn barrier_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| n.kind == NodeKind::Barrier)
            .count()
    }

    /// Look up a node by display id.
    pub fn find_by_id(&self, id: u32) -> Option<NodeHandle> {
        self.nodes
            .iter()
            .find(|n| n.id == Some(id))
            .map(|n| n.handle)
    }

    fn push_node(
        &mut self,
        spec: NodeSpec,
        parent: Option<NodeHandle>,
        level: usize,
    ) -> Result<NodeHandle> {
        let handle = NodeHandle(self.nodes.len());
        let id = self.assign_id()?;
        self.nodes
            .push(Node::new(handle, Some(id), spec, parent, level));
        Ok(handle)
    }

    fn parent_level(&self, parent: NodeHandle) -> Result<usize> {
        let node = self.get(parent).ok_or_else(|| {
            PlanError::InvalidTree(format!("unknown parent handle {parent}"))
        })?;
        if !node.kind.can_have_children() {
            return Err(PlanError::InvalidTree(format!(
                "{} node {} cannot own children",
                node.kind,
                node.label()
            )));
        }
        Ok(node.level)
    }
}

impl Default for PlanTree {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<NodeHandle> for PlanTree {
    type Output = Node;

    fn index(&self, handle: NodeHandle) -> &Node {
        &self.nodes[handle.0]
    }
}

fn ensure_constructible(spec: NodeSpec) -> Result<()> {
    if spec.kind == NodeKind::Barrier {
        return Err(PlanError::InvalidTree(
            "barrier nodes are created by the analysis pipeline only".to_string(),
        ));
    }
    Ok(())
}
