// src/plan/link.rs

use std::fmt;

use serde::Serialize;

use crate::plan::node::NodeHandle;

/// Directed ordering edge: `src` must complete before `dst` may start.
///
/// Endpoints are handles rather than display ids because barriers carry no
/// id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Link {
    pub src: NodeHandle,
    pub dst: NodeHandle,
}

impl Link {
    pub fn new(src: NodeHandle, dst: NodeHandle) -> Self {
        Self { src, dst }
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.src, self.dst)
    }
}
