use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// How a composite orders its children.
///
/// - `Sequential`: children run in child order, each after the previous one;
///   laid out side by side along the width axis.
/// - `Parallel`: children run concurrently; stacked along the height axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecMode {
    Sequential,
    Parallel,
}

impl ExecMode {
    /// Glyph used in outlines (`→` sequential, `∥` parallel).
    pub fn icon(self) -> &'static str {
        match self {
            ExecMode::Sequential => "→",
            ExecMode::Parallel => "∥",
        }
    }
}

impl fmt::Display for ExecMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecMode::Sequential => f.write_str("sequential"),
            ExecMode::Parallel => f.write_str("parallel"),
        }
    }
}

impl FromStr for ExecMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        // The single-letter forms are case sensitive: "C" (chain) and "P".
        match trimmed {
            "C" => return Ok(ExecMode::Sequential),
            "P" => return Ok(ExecMode::Parallel),
            _ => {}
        }
        match trimmed.to_lowercase().as_str() {
            "sequential" | "seq" => Ok(ExecMode::Sequential),
            "parallel" | "par" => Ok(ExecMode::Parallel),
            other => Err(format!(
                "unrecognised exec_mode: {other:?} (expected \"sequential\" or \"parallel\")"
            )),
        }
    }
}

/// Closed set of node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Terminal unit of work (a "job").
    Leaf,
    /// Sub-plan owning children (a "task").
    Composite,
    /// Synthetic join/fork point inserted between two parallel composites.
    Barrier,
}

impl NodeKind {
    /// Whether nodes of this kind may own children.
    pub fn can_have_children(self) -> bool {
        matches!(self, NodeKind::Composite)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Leaf => f.write_str("job"),
            NodeKind::Composite => f.write_str("task"),
            NodeKind::Barrier => f.write_str("barrier"),
        }
    }
}
