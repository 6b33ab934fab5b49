#![allow(dead_code)]

pub use plangrid_test_utils::init_tracing;

use plangrid::plan::PlanTree;

/// Links rendered with node labels (`barrier#7` for barriers), sorted, so
/// assertions do not depend on expansion order.
pub fn labelled_links(tree: &PlanTree) -> Vec<(String, String)> {
    let mut links: Vec<(String, String)> = tree
        .links()
        .iter()
        .map(|l| (tree[l.src].label(), tree[l.dst].label()))
        .collect();
    links.sort();
    links
}

pub fn pair(src: &str, dst: &str) -> (String, String) {
    (src.to_string(), dst.to_string())
}
