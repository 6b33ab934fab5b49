mod common;
use crate::common::init_tracing;

use plangrid::analyze::{analyze, compute_positions, compute_sizes};
use plangrid::errors::PlanError;
use plangrid::plan::{Geometry, NodeSpec, PlanTree};
use plangrid::types::NodeKind;
use plangrid_test_utils::builders::{by_id, job, par, seq, PlanBuilder};

#[test]
fn nested_plan_sizes_and_positions() {
    init_tracing();

    // 1: seq [
    //   2: job,
    //   3: par [ 4: job, 5: seq [6: job, 7: job] ],
    //   8: job,
    // ]
    let mut tree = PlanBuilder::new().build(&seq(vec![
        job(),
        par(vec![job(), seq(vec![job(), job()])]),
        job(),
    ]));
    analyze(&mut tree).unwrap();

    let g = |id| tree[by_id(&tree, id)].geometry.unwrap();
    assert_eq!(g(1), Geometry::new(0, 0, 4, 2));
    assert_eq!(g(2), Geometry::new(0, 0, 1, 1));
    assert_eq!(g(3), Geometry::new(1, 0, 2, 2));
    assert_eq!(g(4), Geometry::new(1, 0, 1, 1));
    assert_eq!(g(5), Geometry::new(1, 1, 2, 1));
    assert_eq!(g(6), Geometry::new(1, 1, 1, 1));
    assert_eq!(g(7), Geometry::new(2, 1, 1, 1));
    assert_eq!(g(8), Geometry::new(3, 0, 1, 1));
}

#[test]
fn children_stay_inside_their_parent() {
    init_tracing();

    let mut tree = PlanBuilder::new().build(&par(vec![
        seq(vec![job(), par(vec![job(), job(), job()])]),
        seq(vec![par(vec![job(), job()]), par(vec![job(), job()]), job()]),
    ]));
    analyze(&mut tree).unwrap();

    for node in tree.flattened_nodes() {
        let outer = node.geometry.unwrap();
        assert!(outer.width >= 1 && outer.height >= 1);
        for (i, a) in node.children.iter().enumerate() {
            let inner = tree[*a].geometry.unwrap();
            assert!(outer.contains(&inner), "{} escapes {}", tree[*a].label(), node.label());
            for b in &node.children[i + 1..] {
                assert!(!inner.overlaps(&tree[*b].geometry.unwrap()));
            }
        }
    }
}

#[test]
fn barrier_is_a_unit_box() {
    init_tracing();

    let mut tree = PlanBuilder::new().build(&seq(vec![
        par(vec![job(), job(), job()]),
        par(vec![job(), job()]),
    ]));
    analyze(&mut tree).unwrap();

    let barrier = tree
        .flattened_nodes()
        .find(|n| n.kind == NodeKind::Barrier)
        .expect("barrier inserted");
    assert_eq!(barrier.geometry, Some(Geometry::new(1, 0, 1, 1)));
    assert_eq!(tree[by_id(&tree, 1)].geometry, Some(Geometry::new(0, 0, 3, 3)));
}

#[test]
fn composite_without_mode_is_rejected_by_sizing() {
    init_tracing();

    let mut tree = PlanTree::new();
    let root = tree
        .create_root(NodeSpec {
            kind: NodeKind::Composite,
            exec_mode: None,
        })
        .unwrap();
    tree.append_child(root, NodeSpec::leaf()).unwrap();
    tree.append_child(root, NodeSpec::leaf()).unwrap();

    match analyze(&mut tree) {
        Err(PlanError::InvalidMode(msg)) => assert!(msg.contains("no exec_mode"), "{msg}"),
        other => panic!("expected InvalidMode, got {other:?}"),
    }
}

#[test]
fn nested_empty_task_fails_sizing() {
    init_tracing();

    let mut tree = PlanTree::new();
    let root = tree.create_root(NodeSpec::parallel()).unwrap();
    tree.append_child(root, NodeSpec::leaf()).unwrap();
    tree.append_child(root, NodeSpec::sequential()).unwrap();

    tree.flatten().unwrap();
    assert!(matches!(compute_sizes(&mut tree), Err(PlanError::InvalidTree(_))));
}

#[test]
fn layout_requires_a_flattened_tree() {
    init_tracing();

    let mut tree = PlanBuilder::new().build(&seq(vec![job(), job()]));
    assert!(matches!(compute_sizes(&mut tree), Err(PlanError::InvalidTree(_))));

    tree.flatten().unwrap();
    assert!(matches!(compute_positions(&mut tree), Err(PlanError::InvalidTree(_))));

    compute_sizes(&mut tree).unwrap();
    compute_positions(&mut tree).unwrap();
    assert_eq!(tree[by_id(&tree, 3)].geometry, Some(Geometry::new(1, 0, 1, 1)));
}

#[test]
fn geometry_helpers() {
    let outer = Geometry::new(0, 0, 3, 2);
    let inner = Geometry::new(1, 1, 2, 1);
    assert_eq!(inner.right(), 3);
    assert_eq!(inner.bottom(), 2);
    assert!(outer.contains(&inner));
    assert!(!inner.contains(&outer));

    // Touching edges do not overlap.
    assert!(!Geometry::new(0, 0, 1, 1).overlaps(&Geometry::new(1, 0, 1, 1)));
    assert!(outer.overlaps(&inner));
}
