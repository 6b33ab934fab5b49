// src/plan/mod.rs

//! Plan tree representation.
//!
//! - [`node`] defines a single node (job, task or synthetic barrier) and its
//!   grid geometry.
//! - [`tree`] is the arena that owns every node, the pre-order traversal
//!   snapshot and the resolved link set.
//! - [`link`] is a directed ordering edge between two nodes.

pub mod link;
pub mod node;
pub mod tree;

pub use link::Link;
pub use node::{Geometry, Node, NodeHandle, NodeSpec};
pub use tree::PlanTree;
