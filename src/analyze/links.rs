// src/analyze/links.rs

//! Link resolution.
//!
//! Seeding creates one link per adjacent child pair of every sequential
//! composite. Expansion then rewrites every endpoint that still has
//! children into that composite's entry points (destination side) or exit
//! points (source side), until a full pass changes nothing:
//!
//! | endpoint side | sequential composite | parallel composite |
//! |---------------|----------------------|--------------------|
//! | destination   | first child          | every child        |
//! | source        | last child           | every child        |
//!
//! Each pass builds a fresh link list from the previous one. Surviving
//! links keep their order and replacements are appended after them.

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;
use tracing::debug;

use crate::errors::{PlanError, Result};
use crate::plan::{Link, Node, NodeHandle, PlanTree};
use crate::types::{ExecMode, NodeKind};

/// Result of running expansion to a fixed point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    pub links: Vec<Link>,
    /// Outer passes executed, including the final one that changed nothing.
    pub passes: usize,
    /// Total number of links replaced across all passes.
    pub rewrites: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    Source,
    Destination,
}

/// Seed, expand and store the links of `tree`.
///
/// Any previously stored link set is discarded.
pub fn resolve_links(tree: &mut PlanTree) -> Result<Expansion> {
    let seeds = seed_links(tree)?;
    debug!(seeds = seeds.len(), "seeded links from sequential composites");

    let expansion = expand_links(tree, seeds)?;
    ensure_acyclic(&expansion.links)?;

    tree.set_links(expansion.links.clone());
    Ok(expansion)
}

/// One link per adjacent child pair of each sequential composite, in
/// flattened order. Parallel composites contribute nothing.
pub fn seed_links(tree: &PlanTree) -> Result<Vec<Link>> {
    tree.require_root()?;

    let mut links = Vec::new();
    for node in tree.flattened_nodes() {
        if node.kind != NodeKind::Composite || node.children.len() < 2 {
            continue;
        }
        if node.mode()? == ExecMode::Sequential {
            links.extend(node.children.windows(2).map(|pair| Link::new(pair[0], pair[1])));
        }
    }
    Ok(links)
}

/// Expand `links` until no endpoint has children.
///
/// Running this on an already resolved set returns it unchanged after a
/// single pass.
pub fn expand_links(tree: &PlanTree, links: Vec<Link>) -> Result<Expansion> {
    let mut current = links;
    let mut passes = 0;
    let mut rewrites = 0;

    loop {
        passes += 1;
        let (after_dst, dst_rewrites) = rewrite_endpoints(tree, &current, Endpoint::Destination)?;
        let (after_src, src_rewrites) = rewrite_endpoints(tree, &after_dst, Endpoint::Source)?;
        current = after_src;

        debug!(
            pass = passes,
            dst_rewrites,
            src_rewrites,
            links = current.len(),
            "link expansion pass"
        );

        rewrites += dst_rewrites + src_rewrites;
        if dst_rewrites + src_rewrites == 0 {
            break;
        }
    }

    Ok(Expansion {
        links: current,
        passes,
        rewrites,
    })
}

/// One sub-pass over a snapshot: returns the replacement set and how many
/// links were rewritten.
fn rewrite_endpoints(tree: &PlanTree, links: &[Link], side: Endpoint) -> Result<(Vec<Link>, usize)> {
    let mut kept = Vec::with_capacity(links.len());
    let mut added = Vec::new();
    let mut rewritten = 0;

    for link in links {
        let handle = match side {
            Endpoint::Source => link.src,
            Endpoint::Destination => link.dst,
        };
        let endpoint = tree.get(handle).ok_or_else(|| {
            PlanError::InvalidTree(format!("unknown node handle {handle}"))
        })?;

        match endpoint.kind {
            NodeKind::Leaf | NodeKind::Barrier => kept.push(*link),
            NodeKind::Composite => {
                rewritten += 1;
                for replacement in replacement_endpoints(endpoint, side)? {
                    added.push(match side {
                        Endpoint::Source => Link::new(replacement, link.dst),
                        Endpoint::Destination => Link::new(link.src, replacement),
                    });
                }
            }
        }
    }

    kept.extend(added);
    Ok((kept, rewritten))
}

fn replacement_endpoints(composite: &Node, side: Endpoint) -> Result<Vec<NodeHandle>> {
    if composite.children.is_empty() {
        return Err(composite.empty_composite_error());
    }

    let handles = match (composite.mode()?, side) {
        (ExecMode::Sequential, Endpoint::Destination) => vec![composite.first_child()?],
        (ExecMode::Sequential, Endpoint::Source) => vec![composite.last_child()?],
        (ExecMode::Parallel, _) => composite.children.clone(),
    };
    Ok(handles)
}

/// Load links into a directed graph keyed by node handle.
pub fn dependency_graph(links: &[Link]) -> DiGraphMap<NodeHandle, ()> {
    let mut graph = DiGraphMap::new();
    for link in links {
        graph.add_edge(link.src, link.dst, ());
    }
    graph
}

/// Nodes that appear in the link set but have no incoming link, sorted by
/// handle.
pub fn entry_nodes(links: &[Link]) -> Vec<NodeHandle> {
    let graph = dependency_graph(links);
    let mut entries: Vec<NodeHandle> = graph
        .nodes()
        .filter(|n| {
            graph
                .neighbors_directed(*n, Direction::Incoming)
                .next()
                .is_none()
        })
        .collect();
    entries.sort();
    entries
}

fn ensure_acyclic(links: &[Link]) -> Result<()> {
    let graph = dependency_graph(links);
    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => Err(PlanError::InvalidTree(format!(
            "resolved links contain a cycle through node {}",
            cycle.node_id()
        ))),
    }
}
