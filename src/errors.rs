// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlanError {
    /// Structural problem with the plan tree (missing root, empty composite,
    /// children on a leaf, unknown handle, ...).
    #[error("Invalid tree: {0}")]
    InvalidTree(String),

    /// A composite without an execution mode, or an unrecognised mode.
    #[error("Invalid execution mode: {0}")]
    InvalidMode(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerError(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, PlanError>;
