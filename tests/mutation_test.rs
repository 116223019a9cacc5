//! Structural mutation: add, remove, replace and delete.

mod common;

use common::{assert_consistent, deep, shallow, Kind, Sample};
use rstest::rstest;
use simpletree::{Selector, TreeError};

// ============================================================
// add_child / remove
// ============================================================

#[rstest]
fn given_new_node_when_adding_then_appends_and_links_parent(mut shallow: Sample) {
    let child1 = shallow.id("child1");
    let extra = shallow.insert("extra", Kind::Branch);
    assert!(shallow.tree.node(child1).unwrap().is_leaf());

    let returned = shallow.tree.add_child(child1, extra).unwrap();

    assert_eq!(returned, extra);
    let node = shallow.tree.node(child1).unwrap();
    assert!(!node.is_leaf());
    assert_eq!(node.children_ids(), &[extra]);
    assert_eq!(shallow.tree.node(extra).unwrap().parent(), Some(node));
    assert_consistent(&shallow.tree);
}

#[rstest]
fn given_added_child_when_removing_then_restores_previous_state(mut shallow: Sample) {
    let root = shallow.id("root");
    let before = shallow.tree.node(root).unwrap().children_ids().to_vec();
    let extra = shallow.insert("extra", Kind::Branch);

    shallow.tree.add_child(root, extra).unwrap();
    shallow.tree.remove(root, extra).unwrap();

    assert_eq!(shallow.tree.node(root).unwrap().children_ids(), before.as_slice());
    assert!(shallow.tree.node(extra).unwrap().parent().is_none());
    assert_consistent(&shallow.tree);
}

#[rstest]
fn given_middle_child_when_removing_then_keeps_sibling_order(mut shallow: Sample) {
    let root = shallow.id("root");
    shallow.tree.remove(root, shallow.id("child2")).unwrap();
    let names = shallow.names(shallow.tree.node(root).unwrap().children_ids().to_vec());
    assert_eq!(names, vec!["child1", "child3", "child4"]);
}

#[rstest]
fn given_removed_subtree_when_traversing_then_it_is_an_independent_root(mut deep: Sample) {
    let child2 = deep.id("child2");
    deep.tree.remove(deep.id("root"), child2).unwrap();

    let node = deep.tree.node(child2).unwrap();
    assert!(node.is_root());
    assert_eq!(node.level(), 0);
    assert_eq!(node.position_in_tree(), "0");
    assert_eq!(node.traverse().len(), 5);
    let ggc = deep.tree.node(deep.id("greatgrandchild1")).unwrap();
    assert_eq!(ggc.position_in_tree(), "1.1");
    assert_eq!(ggc.root(), node);
    assert_eq!(deep.tree.roots().count(), 2);
    assert_consistent(&deep.tree);
}

#[rstest]
fn given_non_child_when_removing_then_fails_with_child_not_found(mut shallow: Sample) {
    let err = shallow
        .tree
        .remove(shallow.id("child1"), shallow.id("grandchild1"))
        .unwrap_err();
    assert!(matches!(err, TreeError::ChildNotFound { .. }));
    assert_consistent(&shallow.tree);
}

#[rstest]
fn given_parent_when_removing_children_then_all_become_roots(mut shallow: Sample) {
    let root = shallow.id("root");
    shallow.tree.remove_children(root).unwrap();

    let node = shallow.tree.node(root).unwrap();
    assert!(node.is_leaf());
    assert_eq!(node.traverse().len(), 1);
    for name in ["child1", "child2", "child3", "child4"] {
        assert!(shallow.tree.node(shallow.id(name)).unwrap().is_root());
    }
    assert_eq!(shallow.tree.roots().count(), 5);
    assert_consistent(&shallow.tree);
}

// ============================================================
// Validation before mutation
// ============================================================

#[rstest]
fn given_sealed_parent_when_adding_then_fails_without_mutation(mut shallow: Sample) {
    let sealed = shallow.insert("sealed", Kind::Sealed);
    let orphan = shallow.insert("orphan", Kind::Branch);

    let err = shallow.tree.add_child(sealed, orphan).unwrap_err();

    assert!(matches!(err, TreeError::InvalidChild { parent, child } if parent == sealed && child == orphan));
    assert!(shallow.tree.node(sealed).unwrap().is_leaf());
    assert!(shallow.tree.node(orphan).unwrap().is_root());
}

#[rstest]
fn given_attached_node_when_adding_elsewhere_then_fails_with_already_attached(mut shallow: Sample) {
    let grandchild1 = shallow.id("grandchild1");
    let err = shallow
        .tree
        .add_child(shallow.id("child1"), grandchild1)
        .unwrap_err();
    assert!(matches!(err, TreeError::AlreadyAttached { parent, .. } if parent == shallow.id("child2")));
    assert!(shallow.tree.node(shallow.id("child1")).unwrap().is_leaf());
    assert_consistent(&shallow.tree);
}

#[rstest]
fn given_root_when_adding_below_own_descendant_then_fails_with_cycle(mut deep: Sample) {
    let root = deep.id("root");
    let err = deep
        .tree
        .add_child(deep.id("greatgrandchild2"), root)
        .unwrap_err();
    assert!(matches!(err, TreeError::CycleDetected(id) if id == root));
    assert!(deep.tree.node(root).unwrap().is_root());
    assert_consistent(&deep.tree);
}

#[rstest]
fn given_deleted_node_when_adding_then_fails_with_unknown_node(mut shallow: Sample) {
    let gone = shallow.insert("gone", Kind::Branch);
    shallow.tree.delete(gone).unwrap();
    let err = shallow.tree.add_child(shallow.id("child1"), gone).unwrap_err();
    assert!(matches!(err, TreeError::UnknownNode(id) if id == gone));
}

// ============================================================
// replace_child
// ============================================================

#[rstest]
fn given_child_id_when_replacing_then_new_takes_its_position(mut shallow: Sample) {
    let root = shallow.id("root");
    let child2 = shallow.id("child2");
    let fresh = shallow.insert("fresh", Kind::Branch);

    let replaced = shallow.tree.replace_child(root, child2, fresh, 0).unwrap();

    assert_eq!(replaced, child2);
    let names = shallow.names(shallow.tree.node(root).unwrap().children_ids().to_vec());
    assert_eq!(names, vec!["child1", "fresh", "child3", "child4"]);
    assert!(shallow.tree.node(child2).unwrap().is_root());
    assert_eq!(
        shallow.tree.node(fresh).unwrap().parent().map(|p| p.id()),
        Some(root)
    );
    assert_eq!(shallow.tree.node(fresh).unwrap().position_in_tree(), "2");
    assert_consistent(&shallow.tree);
}

#[rstest]
#[case(0, "child2")]
#[case(1, "child4")]
fn given_predicate_when_replacing_then_picks_requested_occurrence(
    mut shallow: Sample,
    #[case] occurrence: usize,
    #[case] expected: &str,
) {
    let root = shallow.id("root");
    let fresh = shallow.insert("fresh", Kind::Branch);

    let has_children = Selector::matching(|n| !n.is_leaf());
    let replaced = shallow
        .tree
        .replace_child(root, has_children, fresh, occurrence)
        .unwrap();

    assert_eq!(replaced, shallow.id(expected));
    assert_consistent(&shallow.tree);
}

#[rstest]
fn given_no_match_when_replacing_then_fails_with_not_found(mut shallow: Sample) {
    let root = shallow.id("root");
    let fresh = shallow.insert("fresh", Kind::Branch);
    let err = shallow
        .tree
        .replace_child(root, shallow.id("grandchild1"), fresh, 0)
        .unwrap_err();
    assert!(matches!(err, TreeError::NotFound { parent } if parent == root));
    assert!(shallow.tree.node(fresh).unwrap().is_root());
}

#[rstest]
fn given_occurrence_beyond_matches_when_replacing_then_fails_with_index_out_of_range(
    mut shallow: Sample,
) {
    let root = shallow.id("root");
    let fresh = shallow.insert("fresh", Kind::Branch);
    let err = shallow
        .tree
        .replace_child(root, Selector::matching(|n| n.is_leaf()), fresh, 2)
        .unwrap_err();
    assert!(matches!(err, TreeError::IndexOutOfRange { index: 2, matches: 2 }));
    assert_consistent(&shallow.tree);
}

#[rstest]
fn given_failed_replacement_when_checking_tree_then_it_is_unchanged(mut shallow: Sample) {
    let root = shallow.id("root");
    let child1 = shallow.id("child1");
    let sealed = shallow.insert("sealed", Kind::Sealed);
    let fresh = shallow.insert("fresh", Kind::Branch);
    shallow.tree.add_child(child1, sealed).unwrap();

    let err = shallow
        .tree
        .replace_child(sealed, Selector::matching(|_| true), fresh, 0)
        .unwrap_err();
    assert!(matches!(err, TreeError::NotFound { .. }));

    let attached = shallow.id("grandchild3");
    let err = shallow
        .tree
        .replace_child(root, child1, attached, 0)
        .unwrap_err();
    assert!(matches!(err, TreeError::AlreadyAttached { .. }));
    assert_eq!(
        shallow.tree.node(child1).unwrap().parent().map(|p| p.id()),
        Some(root)
    );
    assert_consistent(&shallow.tree);
}

#[rstest]
fn given_sealed_parent_when_replacing_then_fails_with_invalid_child(shallow: Sample) {
    let mut sample = shallow;
    let holder = sample.insert("holder", Kind::Branch);
    let inner = sample.insert("inner", Kind::Branch);
    sample.tree.add_child(holder, inner).unwrap();
    // seal the holder after it got its child
    sample.tree.data_mut(holder).unwrap().kind = Kind::Sealed;
    let fresh = sample.insert("fresh", Kind::Branch);

    let err = sample
        .tree
        .replace_child(holder, inner, fresh, 0)
        .unwrap_err();

    assert!(matches!(err, TreeError::InvalidChild { .. }));
    assert_eq!(sample.tree.node(holder).unwrap().children_ids(), &[inner]);
}

#[rstest]
fn given_ancestor_as_replacement_when_replacing_then_fails_with_cycle(mut shallow: Sample) {
    let root = shallow.id("root");
    let err = shallow
        .tree
        .replace_child(shallow.id("child4"), shallow.id("grandchild3"), root, 0)
        .unwrap_err();
    assert!(matches!(err, TreeError::CycleDetected(id) if id == root));
    assert_consistent(&shallow.tree);
}

// ============================================================
// delete
// ============================================================

#[rstest]
fn given_branch_when_deleting_then_subtree_is_dropped(mut deep: Sample) {
    let before = deep.tree.len();
    let data = deep.tree.delete(deep.id("child2")).unwrap();

    assert_eq!(data.name, "child2");
    assert_eq!(deep.tree.len(), before - 5);
    assert!(!deep.tree.contains(deep.id("greatgrandchild1")));
    let root = deep.tree.node(deep.id("root")).unwrap();
    assert_eq!(root.children().len(), 3);
    assert_eq!(root.number_of_layers(), 2);
    assert_consistent(&deep.tree);
}
