// src/config/model.rs

use serde::Deserialize;
use tracing::debug;

use crate::analyze::AnalyzeOptions;
use crate::errors::Result;
use crate::plan::{NodeHandle, NodeSpec, PlanTree};

/// Top-level plan file as read from TOML, before validation.
///
/// ```toml
/// [config]
/// insert_barriers = true
///
/// [root]
/// kind = "task"
/// exec_mode = "sequential"
///
/// [[root.children]]
/// kind = "task"
/// exec_mode = "parallel"
///
/// [[root.children.children]]
/// kind = "job"
/// ```
///
/// Every section is optional at this level; [`PlanFile::try_from`] decides
/// what is actually required.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPlanFile {
    /// Pipeline behaviour from `[config]`.
    #[serde(default)]
    pub config: ConfigSection,

    /// The tree, from `[root]` and its nested `children` tables.
    #[serde(default)]
    pub root: Option<RawNodeSpec>,
}

/// `[config]` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ConfigSection {
    /// Whether to interpose barriers between adjacent multi-child parallel
    /// tasks of a sequential task. Defaults to `true`.
    #[serde(default = "default_insert_barriers")]
    pub insert_barriers: bool,

    /// First display id handed out when building the tree. Must be >= 1.
    #[serde(default = "default_first_id")]
    pub first_id: u32,
}

fn default_insert_barriers() -> bool {
    true
}

fn default_first_id() -> u32 {
    crate::plan::tree::DEFAULT_FIRST_ID
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            insert_barriers: default_insert_barriers(),
            first_id: default_first_id(),
        }
    }
}

/// One node as written in the file.
#[derive(Debug, Clone, Deserialize)]
pub struct RawNodeSpec {
    /// `"task"` (composite) or `"job"` (leaf).
    pub kind: String,

    /// `"sequential"` / `"parallel"` (or `seq`/`par`, `C`/`P`).
    ///
    /// Required on tasks, ignored on jobs.
    #[serde(default)]
    pub exec_mode: Option<String>,

    #[serde(default)]
    pub children: Vec<RawNodeSpec>,
}

/// Validated node description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanNode {
    pub spec: NodeSpec,
    pub children: Vec<PlanNode>,
}

/// Validated plan file.
#[derive(Debug, Clone)]
pub struct PlanFile {
    pub config: ConfigSection,
    pub root: PlanNode,
}

impl PlanFile {
    pub(crate) fn new_unchecked(config: ConfigSection, root: PlanNode) -> Self {
        Self { config, root }
    }

    /// Pipeline options derived from `[config]`.
    pub fn analyze_options(&self) -> AnalyzeOptions {
        AnalyzeOptions {
            insert_barriers: self.config.insert_barriers,
        }
    }

    /// Build a fresh tree through the construction interface.
    ///
    /// Nodes are created in document order, so display ids follow pre-order.
    pub fn build_tree(&self) -> Result<PlanTree> {
        let mut tree = PlanTree::with_first_id(self.config.first_id);
        let root = tree.create_root(self.root.spec)?;

        let mut stack: Vec<(NodeHandle, &PlanNode)> = self
            .root
            .children
            .iter()
            .rev()
            .map(|child| (root, child))
            .collect();

        while let Some((parent, node)) = stack.pop() {
            let handle = tree.append_child(parent, node.spec)?;
            stack.extend(node.children.iter().rev().map(|child| (handle, child)));
        }

        debug!(nodes = tree.len(), "built plan tree from file");
        Ok(tree)
    }
}
