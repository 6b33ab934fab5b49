// src/config/validate.rs

use std::str::FromStr;

use crate::config::model::{ConfigSection, PlanFile, PlanNode, RawNodeSpec, RawPlanFile};
use crate::errors::{PlanError, Result};
use crate::plan::NodeSpec;
use crate::types::ExecMode;

impl TryFrom<RawPlanFile> for PlanFile {
    type Error = PlanError;

    fn try_from(raw: RawPlanFile) -> std::result::Result<Self, Self::Error> {
        validate_global_config(&raw.config)?;
        let root = raw
            .root
            .as_ref()
            .ok_or_else(|| PlanError::InvalidTree("plan must contain a [root] node".to_string()))?;
        let root = convert_node(root, "root")?;
        Ok(PlanFile::new_unchecked(raw.config, root))
    }
}

fn validate_global_config(cfg: &ConfigSection) -> Result<()> {
    if cfg.first_id == 0 {
        return Err(PlanError::ConfigError(
            "[config].first_id must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn convert_node(raw: &RawNodeSpec, path: &str) -> Result<PlanNode> {
    let spec = match raw.kind.trim().to_lowercase().as_str() {
        "task" | "composite" => NodeSpec::composite(parse_mode(raw, path)?),
        "job" | "leaf" => {
            if !raw.children.is_empty() {
                return Err(PlanError::ConfigError(format!(
                    "{path}: a job cannot have children (found {})",
                    raw.children.len()
                )));
            }
            NodeSpec::leaf()
        }
        other => {
            return Err(PlanError::ConfigError(format!(
                "{path}: unknown node kind {other:?} (expected \"task\" or \"job\")"
            )));
        }
    };

    let children = raw
        .children
        .iter()
        .enumerate()
        .map(|(i, child)| convert_node(child, &format!("{path}.children[{i}]")))
        .collect::<Result<Vec<_>>>()?;

    Ok(PlanNode { spec, children })
}

fn parse_mode(raw: &RawNodeSpec, path: &str) -> Result<ExecMode> {
    let mode = raw
        .exec_mode
        .as_deref()
        .ok_or_else(|| PlanError::InvalidMode(format!("{path}: task has no exec_mode")))?;
    ExecMode::from_str(mode).map_err(|e| PlanError::InvalidMode(format!("{path}: {e}")))
}
