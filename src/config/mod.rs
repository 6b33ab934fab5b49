// src/config/mod.rs

//! Plan files: the declarative way to build a [`PlanTree`].
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a plan file from disk (`loader.rs`).
//! - Validate node kinds and modes and convert into a [`PlanFile`]
//!   (`validate.rs`).
//!
//! [`PlanTree`]: crate::plan::PlanTree

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_plan_path, load_and_validate, load_from_path, parse_and_validate};
pub use model::{ConfigSection, PlanFile, PlanNode, RawNodeSpec, RawPlanFile};
