mod common;
use crate::common::init_tracing;

use plangrid::analyze::analyze;
use plangrid::errors::PlanError;
use plangrid::report::{render_outline, PlanReport};
use plangrid::types::NodeKind;
use plangrid_test_utils::builders::{job, par, seq, PlanBuilder};

#[test]
fn report_lists_nodes_in_pre_order_with_geometry() {
    init_tracing();

    let mut tree = PlanBuilder::new().build(&seq(vec![
        par(vec![job(), job()]),
        par(vec![job(), job()]),
    ]));
    analyze(&mut tree).unwrap();

    let report = PlanReport::from_tree(&tree).unwrap();
    assert_eq!((report.width, report.height), (3, 2));
    assert_eq!(report.nodes.len(), 8);
    assert_eq!(report.links.len(), 4);

    let barrier = &report.nodes[4];
    assert_eq!(barrier.kind, NodeKind::Barrier);
    assert_eq!(barrier.id, None);
    assert_eq!((barrier.left, barrier.top), (1, 0));

    // Only leaves feeding the barrier start the plan.
    let entry_ids: Vec<Option<u32>> = report.entry_nodes.iter().map(|h| tree[*h].id).collect();
    assert_eq!(entry_ids, vec![Some(3), Some(4)]);

    // Barrier links carry a handle but no id.
    assert!(report
        .links
        .iter()
        .any(|l| l.src == barrier.handle && l.src_id.is_none() && l.dst_id == Some(6)));
}

#[test]
fn text_rendering_shows_nodes_and_links() {
    init_tracing();

    let mut tree = PlanBuilder::new().build(&seq(vec![job(), job()]));
    analyze(&mut tree).unwrap();

    let text = PlanReport::from_tree(&tree).unwrap().render_text();
    assert!(text.starts_with("plan 2x1\n"));
    assert!(text.contains("1 task → @ (0,0) 2x1"), "{text}");
    assert!(text.contains("  3 job @ (1,0) 1x1"), "{text}");
    assert!(text.contains("links (1):\n  2 -> 3\n"), "{text}");
}

#[test]
fn toml_rendering_round_trips_through_the_parser() {
    init_tracing();

    let mut tree = PlanBuilder::new().build(&par(vec![job(), seq(vec![job(), job()])]));
    analyze(&mut tree).unwrap();

    let rendered = PlanReport::from_tree(&tree).unwrap().to_toml().unwrap();
    let value: toml::Table = toml::from_str(&rendered).unwrap();

    assert_eq!(value["width"].as_integer(), Some(2));
    assert_eq!(value["height"].as_integer(), Some(2));
    let nodes = value["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 5);
    assert_eq!(nodes[0]["exec_mode"].as_str(), Some("parallel"));
    assert!(nodes[1].get("exec_mode").is_none());
    assert_eq!(value["links"].as_array().unwrap().len(), 1);
}

#[test]
fn report_requires_an_analysed_tree() {
    let tree = PlanBuilder::new().build(&seq(vec![job()]));
    assert!(matches!(
        PlanReport::from_tree(&tree),
        Err(PlanError::InvalidTree(_))
    ));

    let mut tree = PlanBuilder::new().build(&seq(vec![job()]));
    tree.flatten().unwrap();
    assert!(matches!(
        PlanReport::from_tree(&tree),
        Err(PlanError::InvalidTree(_))
    ));
}

#[test]
fn outline_indents_by_level() {
    let tree = PlanBuilder::new().build(&seq(vec![par(vec![job()]), job()]));
    let outline = render_outline(&tree).unwrap();
    assert_eq!(outline, "1: task →\n  2: task ∥\n    3: job\n  4: job\n");
}
