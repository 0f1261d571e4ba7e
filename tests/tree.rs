//! Tests for the block forest and its pure mutators.
use kumiki::block::IdAllocator;
use kumiki::prelude::*;

fn block(ids: &mut IdAllocator, kind: BlockKind) -> LogicBlock {
    LogicBlock::new(ids.next_id(), kind)
}

/// `SET a`, `FOR o { SET b, SET c }`, `TRIGGER`.
fn sample_forest(ids: &mut IdAllocator) -> (Forest, Vec<BlockId>) {
    let set_a = block(ids, BlockKind::set("a.x", "1"));
    let each = block(ids, BlockKind::for_each("o", "Order", None));
    let set_b = block(ids, BlockKind::set("o.b", "2"));
    let set_c = block(ids, BlockKind::set("o.c", "3"));
    let trigger = block(ids, BlockKind::trigger("Invoice", "recalculate", "this"));
    let ids_out = vec![set_a.id, each.id, set_b.id, set_c.id, trigger.id];

    let forest = Forest::statements()
        .add(ParentRef::Root, set_a)
        .add(ParentRef::Root, each)
        .add(ParentRef::Block(ids_out[1]), set_b)
        .add(ParentRef::Block(ids_out[1]), set_c)
        .add(ParentRef::Root, trigger);
    (forest, ids_out)
}

#[test]
fn test_add_appends_at_root_and_under_for() {
    let mut ids = IdAllocator::new();
    let (forest, id) = sample_forest(&mut ids);

    assert_eq!(forest.len(), 5);
    assert_eq!(forest.roots(), &[id[0], id[1], id[4]]);
    assert_eq!(forest.children(id[1]), &[id[2], id[3]]);
    assert_eq!(forest.parent(id[2]), Some(ParentRef::Block(id[1])));
    assert_eq!(forest.parent(id[0]), Some(ParentRef::Root));
}

#[test]
fn test_add_to_missing_or_leaf_parent_is_noop() {
    let mut ids = IdAllocator::new();
    let (forest, id) = sample_forest(&mut ids);

    let under_leaf = forest.add(ParentRef::Block(id[0]), block(&mut ids, BlockKind::set("x", "y")));
    assert!(Forest::ptr_eq(&under_leaf, &forest));

    let missing = forest.add(
        ParentRef::Block(ids.next_id()),
        block(&mut ids, BlockKind::set("x", "y")),
    );
    assert!(Forest::ptr_eq(&missing, &forest));
}

#[test]
fn test_add_duplicate_id_is_noop() {
    let mut ids = IdAllocator::new();
    let (forest, id) = sample_forest(&mut ids);
    let clash = LogicBlock::new(id[2], BlockKind::set("dup", "1"));

    let next = forest.add(ParentRef::Root, clash);
    assert!(Forest::ptr_eq(&next, &forest));
    assert_eq!(next.len(), 5);
}

#[test]
fn test_forest_roles_keep_preconditions_apart() {
    let mut ids = IdAllocator::new();
    let check = block(&mut ids, BlockKind::precondition("ok", "true", None));
    let set = block(&mut ids, BlockKind::set("a", "b"));

    let statements = Forest::statements().add(ParentRef::Root, check.clone());
    assert!(statements.is_empty());

    let preconditions = Forest::preconditions()
        .add(ParentRef::Root, check.clone())
        .add(ParentRef::Root, set);
    assert_eq!(preconditions.len(), 1);
    assert_eq!(preconditions.role(), ForestRole::Preconditions);

    let nested = Forest::preconditions().add(
        ParentRef::Block(check.id),
        block(&mut ids, BlockKind::precondition("inner", "true", None)),
    );
    assert!(nested.is_empty());
}

#[test]
fn test_update_field_finds_nested_block_and_shares_the_rest() {
    let mut ids = IdAllocator::new();
    let (forest, id) = sample_forest(&mut ids);

    let next = forest.update_field(id[3], BlockField::Value, "42");
    assert!(!Forest::ptr_eq(&next, &forest));
    match &next.get(id[3]).map(|b| &b.kind) {
        Some(BlockKind::Set(set)) => assert_eq!(set.value, "42"),
        other => panic!("expected SET, got {:?}", other),
    }

    // Input forest is unchanged.
    match &forest.get(id[3]).map(|b| &b.kind) {
        Some(BlockKind::Set(set)) => assert_eq!(set.value, "3"),
        other => panic!("expected SET, got {:?}", other),
    }

    assert!(!next.shares_node(&forest, id[3]));
    for other in [id[0], id[1], id[2], id[4]] {
        assert!(next.shares_node(&forest, other), "{} was copied", other);
    }
}

#[test]
fn test_update_field_rejects_unknown_fields_and_same_values() {
    let mut ids = IdAllocator::new();
    let (forest, id) = sample_forest(&mut ids);

    let wrong_field = forest.update_field(id[0], BlockField::Method, "x");
    assert!(Forest::ptr_eq(&wrong_field, &forest));

    let same_value = forest.update_field(id[0], BlockField::Value, "1");
    assert!(Forest::ptr_eq(&same_value, &forest));

    let missing = forest.update_field(ids.next_id(), BlockField::Value, "1");
    assert!(Forest::ptr_eq(&missing, &forest));
}

#[test]
fn test_empty_text_clears_optional_fields() {
    let mut ids = IdAllocator::new();
    let each = block(&mut ids, BlockKind::for_each("o", "Order", Some("o.ok".into())));
    let id = each.id;
    let forest = Forest::statements().add(ParentRef::Root, each);

    let cleared = forest.update_field(id, BlockField::Conditions, "  ");
    match &cleared.get(id).map(|b| &b.kind) {
        Some(BlockKind::For(f)) => assert_eq!(f.conditions, None),
        other => panic!("expected FOR, got {:?}", other),
    }
}

#[test]
fn test_remove_for_drops_whole_subtree() {
    let mut ids = IdAllocator::new();
    let (forest, id) = sample_forest(&mut ids);

    let next = forest.remove(id[1]);
    assert_eq!(next.len(), 2);
    assert_eq!(next.roots(), &[id[0], id[4]]);
    assert!(!next.contains(id[2]));
    assert!(!next.contains(id[3]));
    assert_eq!(forest.len(), 5);
}

#[test]
fn test_remove_nested_leaf() {
    let mut ids = IdAllocator::new();
    let (forest, id) = sample_forest(&mut ids);

    let next = forest.remove(id[2]);
    assert_eq!(next.children(id[1]), &[id[3]]);
    assert_eq!(next.len(), 4);

    let missing = forest.remove(ids.next_id());
    assert!(Forest::ptr_eq(&missing, &forest));
}

#[test]
fn test_reorder_moves_to_index_of_over() {
    let mut ids = IdAllocator::new();
    let (forest, id) = sample_forest(&mut ids);

    let forward = forest.reorder(id[0], id[4]);
    assert_eq!(forward.roots(), &[id[1], id[4], id[0]]);

    let backward = forest.reorder(id[4], id[0]);
    assert_eq!(backward.roots(), &[id[4], id[0], id[1]]);

    let nested = forest.reorder(id[3], id[2]);
    assert_eq!(nested.children(id[1]), &[id[3], id[2]]);
    assert_eq!(nested.roots(), forest.roots());
}

#[test]
fn test_reorder_across_levels_is_noop() {
    let mut ids = IdAllocator::new();
    let (forest, id) = sample_forest(&mut ids);

    assert!(Forest::ptr_eq(&forest.reorder(id[0], id[2]), &forest));
    assert!(Forest::ptr_eq(&forest.reorder(id[2], id[2]), &forest));
    assert!(Forest::ptr_eq(&forest.reorder(id[2], ids.next_id()), &forest));
}

#[test]
fn test_reorder_leaves_other_subtrees_untouched() {
    let mut ids = IdAllocator::new();
    let (forest, id) = sample_forest(&mut ids);

    let next = forest.reorder(id[0], id[4]);
    for each in &id {
        assert!(next.shares_node(&forest, *each));
    }
    assert_eq!(next.to_views()[0], forest.to_views()[1]);

    let nested = forest.reorder(id[2], id[3]);
    for untouched in [id[0], id[2], id[3], id[4]] {
        assert!(nested.shares_node(&forest, untouched));
    }
}

#[test]
fn test_walk_is_preorder_with_depth() {
    let mut ids = IdAllocator::new();
    let (forest, id) = sample_forest(&mut ids);

    let walked: Vec<(usize, BlockId)> = forest.walk().into_iter().map(|(d, b)| (d, b.id)).collect();
    assert_eq!(
        walked,
        vec![(0, id[0]), (0, id[1]), (1, id[2]), (1, id[3]), (0, id[4])]
    );
}

#[test]
fn test_views_round_trip_keeps_ids() {
    let mut ids = IdAllocator::new();
    let (forest, id) = sample_forest(&mut ids);

    let views = forest.to_views();
    assert_eq!(views.len(), 3);
    assert_eq!(views[1].children.len(), 2);
    assert_eq!(views.iter().map(BlockView::count).sum::<usize>(), 5);

    let json = serde_json::to_string(&views).expect("views serialize");
    let decoded: Vec<BlockView> = serde_json::from_str(&json).expect("views deserialize");
    let rebuilt = Forest::from_views(ForestRole::Statements, &decoded);

    assert_eq!(rebuilt.roots(), forest.roots());
    assert_eq!(rebuilt.children(id[1]), forest.children(id[1]));
    assert!(rebuilt.same_structure(&forest));
}

#[test]
fn test_same_structure_ignores_ids() {
    let mut first = IdAllocator::new();
    let mut second = IdAllocator::new();
    second.next_id();
    second.next_id();

    let (a, _) = sample_forest(&mut first);
    let (b, ids_b) = sample_forest(&mut second);
    assert!(a.same_structure(&b));

    let changed = b.update_field(ids_b[4], BlockField::Target, "that");
    assert!(!a.same_structure(&changed));
}
