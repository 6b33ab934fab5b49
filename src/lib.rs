// src/lib.rs

pub mod analyze;
pub mod cli;
pub mod config;
pub mod errors;
pub mod logging;
pub mod plan;
pub mod report;
pub mod types;

use anyhow::Result;
use tracing::debug;

use crate::analyze::analyze_with;
use crate::cli::{CliArgs, OutputFormat};
use crate::config::loader::{default_plan_path, load_and_validate};
use crate::report::{render_outline, PlanReport};

pub use crate::analyze::{analyze, AnalysisSummary, AnalyzeOptions};
pub use crate::plan::{Link, Node, NodeHandle, NodeSpec, PlanTree};
pub use crate::types::{ExecMode, NodeKind};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - plan file loading + validation
/// - tree construction
/// - the analysis pipeline
/// - report rendering to stdout
pub fn run(args: CliArgs) -> Result<()> {
    let plan_path = args.plan.clone().unwrap_or_else(default_plan_path);
    let plan = load_and_validate(&plan_path)?;
    let mut tree = plan.build_tree()?;

    if args.dry_run {
        println!("plangrid dry-run");
        println!("  config.insert_barriers = {}", plan.config.insert_barriers);
        println!("  config.first_id = {}", plan.config.first_id);
        println!();
        print!("{}", render_outline(&tree)?);
        debug!("dry-run complete (no analysis)");
        return Ok(());
    }

    let mut options = plan.analyze_options();
    if args.no_barriers {
        options.insert_barriers = false;
    }

    analyze_with(&mut tree, options)?;

    let report = PlanReport::from_tree(&tree)?;
    match args.format {
        OutputFormat::Text => print!("{}", report.render_text()),
        OutputFormat::Toml => print!("{}", report.to_toml()?),
    }
    Ok(())
}
