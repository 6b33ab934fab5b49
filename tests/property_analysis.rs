use proptest::prelude::*;
use plangrid::analyze::{analyze, expand_links};
use plangrid::plan::{NodeHandle, PlanTree};
use plangrid::types::{ExecMode, NodeKind};
use plangrid_test_utils::builders::{job, par, seq, PlanBuilder, Shape};

// Random well-formed plans: every task has 1..=4 children, depth <= 4.
fn shape_strategy() -> impl Strategy<Value = Shape> {
    Just(job()).prop_recursive(4, 64, 4, |inner| {
        (any::<bool>(), proptest::collection::vec(inner, 1..=4)).prop_map(
            |(sequential, children)| {
                if sequential {
                    seq(children)
                } else {
                    par(children)
                }
            },
        )
    })
}

fn child_lists(tree: &PlanTree) -> Vec<(NodeHandle, Vec<NodeHandle>)> {
    tree.nodes()
        .map(|n| (n.handle, n.children.clone()))
        .collect()
}

proptest! {
    #[test]
    fn sizes_follow_the_layout_axis(shape in shape_strategy()) {
        let mut tree = PlanBuilder::new().build(&shape);
        analyze(&mut tree).unwrap();

        for node in tree.flattened_nodes() {
            let g = node.geometry.unwrap();
            prop_assert!(g.width >= 1 && g.height >= 1);
            if node.children.is_empty() {
                prop_assert_eq!((g.width, g.height), (1, 1));
                continue;
            }
            let sizes: Vec<(u32, u32)> = node
                .children
                .iter()
                .map(|c| {
                    let cg = tree[*c].geometry.unwrap();
                    (cg.width, cg.height)
                })
                .collect();
            let sum_w: u32 = sizes.iter().map(|s| s.0).sum();
            let sum_h: u32 = sizes.iter().map(|s| s.1).sum();
            let max_w = sizes.iter().map(|s| s.0).max().unwrap();
            let max_h = sizes.iter().map(|s| s.1).max().unwrap();
            match node.exec_mode.unwrap() {
                ExecMode::Sequential => prop_assert_eq!((g.width, g.height), (sum_w, max_h)),
                ExecMode::Parallel => prop_assert_eq!((g.width, g.height), (max_w, sum_h)),
            }
        }
    }

    #[test]
    fn children_tile_their_parent_along_its_axis(shape in shape_strategy()) {
        let mut tree = PlanBuilder::new().build(&shape);
        analyze(&mut tree).unwrap();

        let root = tree.root().unwrap();
        let rg = tree[root].geometry.unwrap();
        prop_assert_eq!((rg.left, rg.top), (0, 0));

        for node in tree.flattened_nodes() {
            let outer = node.geometry.unwrap();
            let mut cursor = (outer.left, outer.top);
            for child in &node.children {
                let inner = tree[*child].geometry.unwrap();
                prop_assert!(outer.contains(&inner));
                prop_assert_eq!((inner.left, inner.top), cursor);
                match node.exec_mode.unwrap() {
                    ExecMode::Sequential => cursor.0 = inner.right(),
                    ExecMode::Parallel => cursor.1 = inner.bottom(),
                }
            }
        }
    }

    #[test]
    fn resolved_links_are_atomic_and_stable(shape in shape_strategy()) {
        let mut tree = PlanBuilder::new().build(&shape);
        let summary = analyze(&mut tree).unwrap();

        for link in tree.links() {
            prop_assert!(tree[link.src].is_atomic());
            prop_assert!(tree[link.dst].is_atomic());
            prop_assert_ne!(link.src, link.dst);
        }
        prop_assert!(summary.expansion_passes <= tree.depth() + 1);

        let again = expand_links(&tree, tree.links().to_vec()).unwrap();
        prop_assert_eq!(again.links.as_slice(), tree.links());
        prop_assert_eq!(again.passes, 1);
    }

    #[test]
    fn barriers_only_add_children(shape in shape_strategy()) {
        let mut tree = PlanBuilder::new().build(&shape);
        let before = child_lists(&tree);
        analyze(&mut tree).unwrap();

        for (handle, original) in before {
            let kept: Vec<NodeHandle> = tree[handle]
                .children
                .iter()
                .copied()
                .filter(|c| tree[*c].kind != NodeKind::Barrier)
                .collect();
            prop_assert_eq!(kept, original);
        }
        for node in tree.nodes().filter(|n| n.kind == NodeKind::Barrier) {
            let parent = &tree[node.parent.unwrap()];
            prop_assert_eq!(parent.exec_mode, Some(ExecMode::Sequential));
            prop_assert_eq!(node.level, parent.level + 1);
            prop_assert!(node.id.is_none());
        }
    }
}
