// src/analyze/mod.rs

//! The analysis pipeline.
//!
//! `analyze` runs, in order:
//! 1. flatten the tree (pre-order snapshot)
//! 2. insert barriers between adjacent multi-child parallel composites of
//!    sequential composites ([`barrier`])
//! 3. flatten again, so barriers are part of the snapshot
//! 4. size pass, then position pass ([`layout`])
//! 5. link seeding and fixed-point expansion ([`links`])
//!
//! Every step validates its own preconditions and fails on the first
//! structural problem; a failed run leaves no output worth reading.

pub mod barrier;
pub mod layout;
pub mod links;

use tracing::info;

use crate::errors::Result;
use crate::plan::PlanTree;

pub use barrier::insert_barriers;
pub use layout::{compute_positions, compute_sizes};
pub use links::{dependency_graph, entry_nodes, expand_links, resolve_links, seed_links, Expansion};

/// Knobs for a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyzeOptions {
    /// Run the barrier-insertion pre-pass.
    pub insert_barriers: bool,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            insert_barriers: true,
        }
    }
}

/// Counters describing one pipeline run, mostly for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisSummary {
    pub nodes: usize,
    pub barriers_inserted: usize,
    pub links: usize,
    pub expansion_passes: usize,
}

/// Run the full pipeline with default options.
pub fn analyze(tree: &mut PlanTree) -> Result<AnalysisSummary> {
    analyze_with(tree, AnalyzeOptions::default())
}

/// Run the full pipeline.
pub fn analyze_with(tree: &mut PlanTree, options: AnalyzeOptions) -> Result<AnalysisSummary> {
    tree.flatten()?;

    let barriers_inserted = if options.insert_barriers {
        insert_barriers(tree)?
    } else {
        0
    };
    tree.flatten()?;

    compute_sizes(tree)?;
    compute_positions(tree)?;

    let expansion = resolve_links(tree)?;

    let summary = AnalysisSummary {
        nodes: tree.flattened().len(),
        barriers_inserted,
        links: expansion.links.len(),
        expansion_passes: expansion.passes,
    };
    info!(
        nodes = summary.nodes,
        barriers = summary.barriers_inserted,
        links = summary.links,
        passes = summary.expansion_passes,
        "plan analysed"
    );
    Ok(summary)
}
