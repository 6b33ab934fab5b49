// src/analyze/barrier.rs

//! Barrier insertion pre-pass.
//!
//! Inside a sequential composite, two adjacent parallel composites that both
//! have more than one child would otherwise be joined by the cartesian
//! product of their exit and entry points. A barrier between them turns that
//! into one fan-in and one fan-out.

use tracing::debug;

use crate::errors::Result;
use crate::plan::{Node, NodeHandle, PlanTree};

/// Insert barriers into every sequential composite of the flattened snapshot.
///
/// Expects a fresh [`PlanTree::flatten`]; the snapshot is stale afterwards
/// whenever the returned count is non-zero.
pub fn insert_barriers(tree: &mut PlanTree) -> Result<usize> {
    let snapshot: Vec<NodeHandle> = tree.flattened().to_vec();
    let mut inserted = 0;

    for handle in snapshot {
        if !tree[handle].is_sequential_composite() {
            continue;
        }

        let positions = barrier_positions(tree, handle);
        // Right to left, so earlier positions stay valid.
        for position in positions.into_iter().rev() {
            let barrier = tree.insert_barrier(handle, position)?;
            debug!(
                parent = %tree[handle].label(),
                position,
                barrier = %barrier,
                "inserted barrier"
            );
            inserted += 1;
        }
    }

    Ok(inserted)
}

/// Child positions (in the current child order) at which a barrier goes.
fn barrier_positions(tree: &PlanTree, parent: NodeHandle) -> Vec<usize> {
    tree[parent]
        .children
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| needs_barrier(&tree[pair[0]], &tree[pair[1]]))
        .map(|(i, _)| i + 1)
        .collect()
}

fn needs_barrier(before: &Node, after: &Node) -> bool {
    is_fan(before) && is_fan(after)
}

fn is_fan(node: &Node) -> bool {
    node.is_parallel_composite() && node.children.len() > 1
}
