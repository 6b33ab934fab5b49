#![allow(dead_code)]

use plangrid::plan::{NodeHandle, NodeSpec, PlanTree};
use plangrid::types::ExecMode;

/// Declarative tree shape for test setup.
///
/// ```ignore
/// let tree = PlanBuilder::new().build(&seq(vec![par(vec![job(), job()]), job()]));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    Job,
    Task(ExecMode, Vec<Shape>),
}

pub fn job() -> Shape {
    Shape::Job
}

pub fn seq(children: Vec<Shape>) -> Shape {
    Shape::Task(ExecMode::Sequential, children)
}

pub fn par(children: Vec<Shape>) -> Shape {
    Shape::Task(ExecMode::Parallel, children)
}

impl Shape {
    fn spec(&self) -> NodeSpec {
        match self {
            Shape::Job => NodeSpec::leaf(),
            Shape::Task(mode, _) => NodeSpec::composite(*mode),
        }
    }

    fn children(&self) -> &[Shape] {
        match self {
            Shape::Job => &[],
            Shape::Task(_, children) => children,
        }
    }

    pub fn depth(&self) -> usize {
        self.children()
            .iter()
            .map(|c| c.depth() + 1)
            .max()
            .unwrap_or(0)
    }
}

/// Builder for `PlanTree` to simplify test setup.
pub struct PlanBuilder {
    first_id: u32,
}

impl PlanBuilder {
    pub fn new() -> Self {
        Self { first_id: 1 }
    }

    pub fn first_id(mut self, id: u32) -> Self {
        self.first_id = id;
        self
    }

    /// Build a tree with nodes created in pre-order, so ids follow pre-order.
    pub fn build(self, shape: &Shape) -> PlanTree {
        let mut tree = PlanTree::with_first_id(self.first_id);
        let root = tree
            .create_root(shape.spec())
            .expect("Failed to create root from builder");
        append_all(&mut tree, root, shape.children());
        tree
    }
}

impl Default for PlanBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn append_all(tree: &mut PlanTree, parent: NodeHandle, children: &[Shape]) {
    for child in children {
        let handle = tree
            .append_child(parent, child.spec())
            .expect("Failed to append child from builder");
        append_all(tree, handle, child.children());
    }
}

/// Handle of the node with display id `id`; panics if there is none.
pub fn by_id(tree: &PlanTree, id: u32) -> NodeHandle {
    tree.find_by_id(id)
        .unwrap_or_else(|| panic!("no node with id {id}"))
}
