// src/analyze/layout.rs

//! Grid layout: a bottom-up size pass followed by a top-down position pass.
//!
//! Sequential composites place children side by side along the width axis,
//! parallel composites stack them along the height axis.

use tracing::debug;

use crate::errors::{PlanError, Result};
use crate::plan::{Geometry, NodeHandle, PlanTree};
use crate::types::{ExecMode, NodeKind};

/// Size pass. Walks the flattened list in reverse pre-order so every child
/// is sized before its parent. Positions are reset to the origin.
pub fn compute_sizes(tree: &mut PlanTree) -> Result<()> {
    let order: Vec<NodeHandle> = tree.flattened().iter().rev().copied().collect();
    if order.is_empty() {
        return Err(PlanError::InvalidTree(
            "layout requested before the tree was flattened".to_string(),
        ));
    }

    for handle in order {
        let geometry = size_of(tree, handle)?;
        tree.node_mut(handle).geometry = Some(geometry);
    }

    if let Some(root) = tree.root() {
        if let Some(g) = tree[root].geometry {
            debug!(width = g.width, height = g.height, "computed plan size");
        }
    }
    Ok(())
}

fn size_of(tree: &PlanTree, handle: NodeHandle) -> Result<Geometry> {
    let node = &tree[handle];
    if node.children.is_empty() {
        return match node.kind {
            NodeKind::Composite => Err(node.empty_composite_error()),
            NodeKind::Leaf | NodeKind::Barrier => Ok(Geometry::unit()),
        };
    }

    let mode = node.mode()?;
    let (mut width, mut height) = (0, 0);
    for child in &node.children {
        let child_geom = tree[*child].geometry.ok_or_else(|| {
            PlanError::InvalidTree(format!(
                "child {} of node {} was not sized; flatten the tree before layout",
                tree[*child].label(),
                node.label()
            ))
        })?;
        match mode {
            ExecMode::Sequential => {
                width += child_geom.width;
                height = height.max(child_geom.height);
            }
            ExecMode::Parallel => {
                width = width.max(child_geom.width);
                height += child_geom.height;
            }
        }
    }

    Ok(Geometry::new(0, 0, width, height))
}

/// Position pass. Walks the flattened list in pre-order, so a parent is
/// placed before its children; the root sits at the origin.
pub fn compute_positions(tree: &mut PlanTree) -> Result<()> {
    let root = tree.require_root()?;
    let order: Vec<NodeHandle> = tree.flattened().to_vec();

    let root_geom = geometry_of(tree, root)?;
    tree.node_mut(root).geometry = Some(Geometry {
        left: 0,
        top: 0,
        ..root_geom
    });

    for handle in order {
        if tree[handle].children.is_empty() {
            continue;
        }

        let mode = tree[handle].mode()?;
        let origin = geometry_of(tree, handle)?;
        let children = tree[handle].children.clone();

        let (mut left, mut top) = (origin.left, origin.top);
        for child in children {
            let mut child_geom = geometry_of(tree, child)?;
            child_geom.left = left;
            child_geom.top = top;
            tree.node_mut(child).geometry = Some(child_geom);

            match mode {
                ExecMode::Sequential => left += child_geom.width,
                ExecMode::Parallel => top += child_geom.height,
            }
        }
    }

    Ok(())
}

fn geometry_of(tree: &PlanTree, handle: NodeHandle) -> Result<Geometry> {
    tree[handle].geometry.ok_or_else(|| {
        PlanError::InvalidTree(format!(
            "node {} has no size; run the size pass first",
            tree[handle].label()
        ))
    })
}
