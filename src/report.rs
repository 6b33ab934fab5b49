// src/report.rs

//! Read-only snapshot of an analysed tree for rendering collaborators.
//!
//! Nodes are listed in flattened (pre-order) order with their geometry;
//! links reference nodes by handle since barriers have no display id.

use std::fmt::Write as _;

use serde::Serialize;

use crate::analyze::entry_nodes;
use crate::errors::{PlanError, Result};
use crate::plan::{NodeHandle, PlanTree};
use crate::types::{ExecMode, NodeKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeReport {
    pub handle: NodeHandle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exec_mode: Option<ExecMode>,
    pub level: usize,
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkReport {
    pub src: NodeHandle,
    pub dst: NodeHandle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dst_id: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanReport {
    pub width: u32,
    pub height: u32,
    /// Link endpoints nothing else waits on first.
    pub entry_nodes: Vec<NodeHandle>,
    pub nodes: Vec<NodeReport>,
    pub links: Vec<LinkReport>,
}

impl PlanReport {
    /// Snapshot an analysed tree. Fails if any node lacks geometry.
    pub fn from_tree(tree: &PlanTree) -> Result<Self> {
        let root = tree.require_root()?;
        if tree.flattened().is_empty() {
            return Err(PlanError::InvalidTree(
                "tree was never flattened; analyze it first".to_string(),
            ));
        }

        let mut nodes = Vec::with_capacity(tree.flattened().len());
        for node in tree.flattened_nodes() {
            let g = node.geometry.ok_or_else(|| {
                PlanError::InvalidTree(format!(
                    "node {} has no geometry; analyze the tree first",
                    node.label()
                ))
            })?;
            nodes.push(NodeReport {
                handle: node.handle,
                id: node.id,
                kind: node.kind,
                exec_mode: match node.kind {
                    NodeKind::Composite => node.exec_mode,
                    NodeKind::Leaf | NodeKind::Barrier => None,
                },
                level: node.level,
                left: g.left,
                top: g.top,
                width: g.width,
                height: g.height,
            });
        }

        let links = tree
            .links()
            .iter()
            .map(|link| LinkReport {
                src: link.src,
                dst: link.dst,
                src_id: tree[link.src].id,
                dst_id: tree[link.dst].id,
            })
            .collect();

        let root_geom = tree[root].geometry.unwrap_or_default();
        Ok(Self {
            width: root_geom.width,
            height: root_geom.height,
            entry_nodes: entry_nodes(tree.links()),
            nodes,
            links,
        })
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Plain-text rendering: a header, one line per node, one per link.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "plan {}x{}", self.width, self.height);
        let _ = writeln!(out);
        let _ = writeln!(out, "nodes ({}):", self.nodes.len());
        for n in &self.nodes {
            let _ = writeln!(
                out,
                "  {indent}{label} {kind}{icon} @ ({left},{top}) {width}x{height}",
                indent = "  ".repeat(n.level),
                label = node_label(n.handle, n.id),
                kind = n.kind,
                icon = n.exec_mode.map(|m| format!(" {}", m.icon())).unwrap_or_default(),
                left = n.left,
                top = n.top,
                width = n.width,
                height = n.height,
            );
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "links ({}):", self.links.len());
        for l in &self.links {
            let _ = writeln!(
                out,
                "  {} -> {}",
                node_label(l.src, l.src_id),
                node_label(l.dst, l.dst_id)
            );
        }
        out
    }
}

fn node_label(handle: NodeHandle, id: Option<u32>) -> String {
    match id {
        Some(id) => id.to_string(),
        None => format!("barrier{handle}"),
    }
}

/// Indented `id: kind icon` outline of a (possibly unanalysed) tree.
pub fn render_outline(tree: &PlanTree) -> Result<String> {
    let mut out = String::new();
    tree.scan_tree(|node, _| {
        let icon = match node.kind {
            NodeKind::Composite => node.exec_mode.map(|m| format!(" {}", m.icon())).unwrap_or_default(),
            NodeKind::Leaf | NodeKind::Barrier => String::new(),
        };
        let _ = writeln!(
            out,
            "{}{}: {}{}",
            "  ".repeat(node.level),
            node.label(),
            node.kind,
            icon
        );
    })?;
    Ok(out)
}
