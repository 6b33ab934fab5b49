// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{PlanFile, RawPlanFile};
use crate::errors::Result;

/// Load a plan file from a given path and return the raw [`RawPlanFile`].
///
/// This only performs TOML deserialization; it does **not** check node kinds
/// or modes. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawPlanFile> {
    let contents = fs::read_to_string(path.as_ref())?;
    let raw: RawPlanFile = toml::from_str(&contents)?;
    Ok(raw)
}

/// Load a plan file from path and validate it.
///
/// This is the recommended entry point for the rest of the application:
///
/// - Reads TOML.
/// - Applies `[config]` defaults.
/// - Checks for:
///   - a missing `[root]`,
///   - unknown `kind` values and jobs with children,
///   - tasks with a missing or unrecognised `exec_mode`.
///
/// Empty tasks are accepted here and rejected by the analysis pipeline.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<PlanFile> {
    let raw = load_from_path(path)?;
    PlanFile::try_from(raw)
}

/// Same as [`load_and_validate`] for an in-memory TOML document.
pub fn parse_and_validate(contents: &str) -> Result<PlanFile> {
    let raw: RawPlanFile = toml::from_str(contents)?;
    PlanFile::try_from(raw)
}

/// Plan file used when `--plan` is not given.
pub fn default_plan_path() -> PathBuf {
    PathBuf::from("Plan.toml")
}
