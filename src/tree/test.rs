use std::collections::{HashMap, HashSet};

use proptest::prelude::*;

use super::*;

#[derive(Debug, Clone, PartialEq)]
struct Item {
    id: u32,
    parent: Option<u32>,
    label: String,
}

fn item(id: u32, parent: Option<u32>) -> Item {
    Item {
        id,
        parent,
        label: format!("item {id}"),
    }
}

fn build(items: Vec<Item>) -> Forest<u32, Item> {
    Forest::build(items, |i| i.id, |i| i.parent).unwrap()
}

fn ids<'a>(nodes: impl Iterator<Item = TreeNode<'a, u32, Item>>) -> Vec<u32> {
    nodes.map(|n| n.model().id).collect()
}

#[test]
fn roots_orphans_and_count() {
    let forest = build(vec![
        item(1, None),
        item(2, None),
        item(3, Some(1)),
        item(4, Some(5)),
    ]);

    assert_eq!(ids(forest.iter()), [1, 2]);
    assert_eq!(forest.orphans().map(|i| i.id).collect::<Vec<_>>(), [4]);
    assert_eq!(forest.orphan_keys().copied().collect::<Vec<_>>(), [4]);
    assert_eq!(forest.len(), 3);
    assert_eq!(forest.n_nodes(), 4);

    let one = forest.get(&1).unwrap();
    assert_eq!(ids(one.children()), [3]);
    assert!(forest.get(&2).unwrap().is_leaf());
}

#[test]
fn roots_keep_first_seen_order() {
    let forest = build(vec![
        item(9, None),
        item(5, Some(9)),
        item(3, None),
        item(7, None),
    ]);
    assert_eq!(ids(forest.iter()), [9, 3, 7]);
    assert_eq!(forest.root(1).unwrap().model().id, 3);
}

#[test]
fn partial_multi_parent_resolution_is_not_an_orphan() {
    let forest = build(vec![item(1, None), item(2, Some(1)), item(2, Some(99))]);

    let two = forest.get(&2).unwrap();
    assert_eq!(two.kind(), NodeKind::Attached);
    assert_eq!(two.declared_parents(), [1, 99]);
    assert_eq!(ids(two.parents()), [1]);
    assert_eq!(forest.orphans().count(), 0);
    assert_eq!(forest.len(), 2);
}

#[test]
fn same_key_under_two_parents_shares_one_model() {
    let forest = build(vec![
        item(1, None),
        item(2, None),
        item(3, Some(1)),
        item(3, Some(2)),
    ]);

    let under_one = forest.get(&1).unwrap().child(0).unwrap();
    let under_two = forest.get(&2).unwrap().child(0).unwrap();
    assert_eq!(under_one.model().id, 3);
    assert!(std::ptr::eq(under_one.model(), under_two.model()));
    assert_eq!(ids(under_one.parents()), [1, 2]);
    assert_eq!(under_one.parent().unwrap().model().id, 1);
    assert_eq!(forest.len(), 3);
}

#[test]
fn orphan_is_not_reachable() {
    let forest = build(vec![item(1, None), item(2, Some(42))]);

    assert!(forest.try_get(&2).is_none());
    assert_eq!(forest.get(&2), Err(ForestError::KeyNotFound("2".into())));
    assert!(forest.iter_preorder().all(|n| n.model().id != 2));
    assert!(forest.iter_nodes().all(|n| n.model().id != 2));
}

#[test]
fn unknown_key_error_names_the_key() {
    let forest = Forest::build(
        vec![("alpha", None::<&str>)],
        |i| i.0,
        |i| i.1,
    )
    .unwrap();

    let err = forest.get(&"omega").unwrap_err();
    assert_eq!(err.to_string(), "Key not found in forest: omega");
}

#[test]
fn lookup_matches_iteration() {
    let forest = build(vec![
        item(1, None),
        item(2, Some(1)),
        item(3, Some(2)),
        item(4, Some(1)),
    ]);

    for node in forest.iter_preorder() {
        let found = forest.try_get(&node.model().id).unwrap();
        assert_eq!(found, node);
        assert!(std::ptr::eq(found.model(), node.model()));
    }
}

#[test]
fn breadcrumb_of_chain() {
    let forest = build(vec![
        item(1, None),
        item(2, Some(1)),
        item(3, Some(2)),
        item(4, Some(3)),
    ]);

    let leaf = forest.get(&4).unwrap();
    let labels: Vec<&str> = leaf.breadcrumb().iter().map(|i| i.label.as_str()).collect();
    insta::assert_debug_snapshot!(labels, @r#"
    [
        "item 1",
        "item 2",
        "item 3",
        "item 4",
    ]
    "#);
    assert_eq!(leaf.depth(), 3);
    assert_eq!(ids(leaf.ancestors()), [4, 3, 2, 1]);
}

#[test]
fn indexers_are_bounds_checked() {
    let forest = build(vec![item(1, None), item(2, Some(1))]);

    assert!(forest.root(0).is_ok());
    assert_eq!(
        forest.root(1).unwrap_err(),
        ForestError::IndexOutOfRange { index: 1, len: 1 }
    );

    let root = forest.root(0).unwrap();
    assert!(root.child(0).is_ok());
    assert_eq!(
        root.child(1).unwrap_err(),
        ForestError::IndexOutOfRange { index: 1, len: 1 }
    );
    assert!(forest.get(&2).unwrap().child(0).is_err());
}

#[test]
fn comparer_changes_structure() {
    let rows = || {
        vec![
            ("Y", None),
            ("y", None),
            ("a", Some("Y")),
            ("b", Some("y")),
        ]
    };

    let ordinal = Forest::build(rows(), |r| r.0, |r| r.1).unwrap();
    assert_eq!(ordinal.len(), 4);
    assert_eq!(ordinal.n_roots(), 2);
    assert_eq!(ordinal.get(&"Y").unwrap().n_children(), 1);

    let folded = ForestBuilder::new(|r: &(&'static str, Option<&'static str>)| r.0, |r| r.1)
        .comparer(CaseInsensitive)
        .build(rows())
        .unwrap();
    assert_eq!(folded.len(), 3);
    assert_eq!(folded.n_roots(), 1);
    let y = folded.get(&"y").unwrap();
    assert_eq!(y.key(), &"Y");
    let children: Vec<_> = y.children().map(|c| *c.key()).collect();
    assert_eq!(children, ["a", "b"]);
}

#[test]
fn projection_changes_model_type() {
    let forest = ForestBuilder::new(|i: &Item| i.id, |i| i.parent)
        .model(|i| i.label)
        .build(vec![item(1, None), item(2, Some(1)), item(3, Some(7))])
        .unwrap();

    assert_eq!(forest.get(&2).unwrap().model(), "item 2");
    assert_eq!(forest.orphans().collect::<Vec<_>>(), ["item 3"]);
}

#[test]
fn map_models_keeps_structure() {
    let forest = build(vec![item(1, None), item(2, Some(1)), item(3, Some(8))]);
    let lengths = forest.map_models(|i| i.label.len());

    assert_eq!(lengths.len(), 2);
    assert_eq!(*lengths.get(&2).unwrap().model(), 6);
    assert_eq!(lengths.get(&1).unwrap().n_children(), 1);
    assert_eq!(lengths.orphans().copied().collect::<Vec<_>>(), [6]);
}

#[test]
fn enumeration_is_restartable() {
    let forest = build(vec![item(1, None), item(2, None), item(3, Some(2))]);
    let once: Vec<_> = (&forest).into_iter().map(|n| n.id()).collect();
    let twice: Vec<_> = forest.iter().map(|n| n.id()).collect();
    assert_eq!(once, twice);
    assert_eq!(ids(forest.iter_bfs()), [1, 2, 3]);
}

#[test]
fn child_attached_under_orphan_does_not_expose_it() {
    let forest = build(vec![item(1, Some(0)), item(2, Some(1)), item(3, Some(2))]);

    assert_eq!(forest.len(), 2);
    assert_eq!(forest.n_roots(), 0);
    assert!(forest.node(TreeNodeId(0)).is_none());

    let two = forest.get(&2).unwrap();
    assert_eq!(two.kind(), NodeKind::Attached);
    assert_eq!(two.parents().count(), 0);
    assert!(two.parent().is_none());
    assert_eq!(ids(two.ancestors()), [2]);
    assert_eq!(two.depth(), 0);

    let three = forest.get(&3).unwrap();
    assert_eq!(ids(three.parents()), [2]);
    let crumbs: Vec<u32> = three.breadcrumb().iter().map(|i| i.id).collect();
    assert_eq!(crumbs, [2, 3]);
}

#[test]
fn forest_is_shareable_across_threads() {
    fn assert_sync<T: Send + Sync>(_: &T) {}
    let forest = build(vec![item(1, None), item(2, Some(1))]);
    assert_sync(&forest);

    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| assert_eq!(forest.get(&2).unwrap().breadcrumb().len(), 2));
        }
    });
}

// --- Properties ---

/// Items whose parent key is always larger than their own key, so no cycle can form.
/// Parents that were never generated as keys make orphans.
fn acyclic_items() -> impl Strategy<Value = Vec<Item>> {
    prop::collection::vec(
        (0u32..40, prop::option::weighted(0.7, 1u32..8)),
        0..60,
    )
    .prop_map(|raw| {
        raw.into_iter()
            .map(|(id, up)| item(id, up.map(|d| id + d)))
            .collect()
    })
}

proptest! {
    #[test]
    fn count_is_distinct_keys_minus_orphans(items in acyclic_items()) {
        let distinct: HashSet<u32> = items.iter().map(|i| i.id).collect();
        let forest = build(items);
        prop_assert_eq!(forest.n_nodes(), distinct.len());
        prop_assert_eq!(forest.len(), distinct.len() - forest.orphans().count());
    }

    #[test]
    fn roots_and_orphans_are_classified(items in acyclic_items()) {
        let mut first_seen = vec![];
        let mut declared: HashMap<u32, Vec<u32>> = HashMap::new();
        for i in &items {
            let parents = declared.entry(i.id).or_insert_with(|| {
                first_seen.push(i.id);
                vec![]
            });
            parents.extend(i.parent);
        }
        let expected_roots: Vec<u32> = first_seen
            .iter()
            .copied()
            .filter(|id| declared[id].is_empty())
            .collect();
        let expected_orphans: Vec<u32> = first_seen
            .iter()
            .copied()
            .filter(|id| {
                let parents = &declared[id];
                !parents.is_empty() && parents.iter().all(|p| !declared.contains_key(p))
            })
            .collect();

        let forest = build(items);
        prop_assert_eq!(ids(forest.iter()), expected_roots);
        prop_assert_eq!(forest.orphan_keys().copied().collect::<Vec<_>>(), expected_orphans);
    }

    #[test]
    fn lookup_is_symmetric(items in acyclic_items()) {
        let forest = build(items);
        for node in forest.iter_preorder() {
            let found = forest.try_get(node.key());
            prop_assert!(found.is_some());
            prop_assert!(std::ptr::eq(found.unwrap().model(), node.model()));
        }
        for key in forest.orphan_keys() {
            prop_assert!(forest.try_get(key).is_none());
            prop_assert!(matches!(forest.get(key), Err(ForestError::KeyNotFound(_))));
        }
        prop_assert!(forest.try_get(&1000).is_none());
    }

    #[test]
    fn links_are_mutual(items in acyclic_items()) {
        let forest = build(items);
        for node in forest.iter_nodes() {
            for child in node.children() {
                prop_assert!(child.parents().any(|p| p == node));
            }
            for parent in node.parents() {
                prop_assert!(parent.children().any(|c| c == node));
                prop_assert_eq!(forest.try_get(parent.key()), Some(parent));
            }
            for ancestor in node.ancestors() {
                prop_assert!(forest.try_get(ancestor.key()).is_some());
            }
            let crumbs = node.breadcrumb();
            prop_assert!(std::ptr::eq(*crumbs.last().unwrap(), node.model()));
        }
    }
}
