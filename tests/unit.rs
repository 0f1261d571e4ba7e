//! Unit tests for block values, ids and argument lists.
use kumiki::block::{IdAllocator, apply_field};
use kumiki::dsl::args::{format_arg_list, parse_arg_list};
use kumiki::prelude::*;

#[test]
fn test_block_id_display_and_allocation() {
    let mut ids = IdAllocator::new();
    let first = ids.next_id();
    let second = ids.next_id();
    assert_ne!(first, second);
    assert_eq!(format!("{}", first), "blk-0");

    ids.reserve_past(second);
    assert_eq!(ids.next_id().raw(), 2);
    ids.reserve_past(ids.clone().next_id());
    assert_eq!(ids.next_id().raw(), 4);
}

#[test]
fn test_reserve_past_never_moves_backwards() {
    let mut ids = IdAllocator::new();
    let early = ids.next_id();
    for _ in 0..5 {
        ids.next_id();
    }
    ids.reserve_past(early);
    assert_eq!(ids.next_id().raw(), 6);
}

#[test]
fn test_block_tags_and_containers() {
    let mut ids = IdAllocator::new();
    let each = LogicBlock::new(ids.next_id(), BlockKind::for_each("o", "Order", None));
    let call = LogicBlock::new(ids.next_id(), BlockKind::call("p", "m", vec![]));

    assert_eq!(each.tag(), BlockTag::For);
    assert!(each.is_container());
    assert_eq!(call.tag().to_string(), "CALL");
    assert!(!call.is_container());
}

#[test]
fn test_apply_field_shapes() {
    let mut kind = BlockKind::call("billing", "charge", vec![]);
    assert!(apply_field(
        &mut kind,
        BlockField::Args,
        vec![CallArg::new("amount", "1")].into()
    ));
    assert!(!apply_field(&mut kind, BlockField::Args, "amount: 1".into()));
    assert!(!apply_field(&mut kind, BlockField::Target, "x".into()));

    if let BlockKind::Call(call) = &kind {
        assert_eq!(call.arg("amount"), Some("1"));
        assert_eq!(call.arg("currency"), None);
    } else {
        panic!("kind changed");
    }

    let mut check = BlockKind::precondition("ok", "true", Some("No".into()));
    assert!(apply_field(&mut check, BlockField::OnFailure, "".into()));
    assert_eq!(check, BlockKind::precondition("ok", "true", None));
}

#[test]
fn test_parse_arg_list_folds_unnamed_segments() {
    assert_eq!(
        parse_arg_list("a: \"x, y\", b: [1, 2], c: f(1, 2)"),
        vec![
            CallArg::new("a", "\"x, y\""),
            CallArg::new("b", "[1, 2]"),
            CallArg::new("c", "f(1, 2)"),
        ]
    );
    assert_eq!(
        parse_arg_list("a: 1, 2, b:3"),
        vec![CallArg::new("a", "1, 2"), CallArg::new("b", "3")]
    );
    assert_eq!(
        parse_arg_list("{ to: user }"),
        vec![CallArg::new("to", "user")]
    );
}

#[test]
fn test_parse_arg_list_edge_cases() {
    assert!(parse_arg_list("").is_empty());
    assert!(parse_arg_list("{}").is_empty());
    assert!(parse_arg_list("  { }  ").is_empty());
    assert!(parse_arg_list("just text").is_empty());
    assert_eq!(
        parse_arg_list("stray, a: 1"),
        vec![CallArg::new("a", "1")]
    );
    assert_eq!(
        parse_arg_list("s: \"say \\\"hi, there\\\"\""),
        vec![CallArg::new("s", "\"say \\\"hi, there\\\"\"")]
    );
}

#[test]
fn test_format_arg_list() {
    assert_eq!(format_arg_list(&[]), "");
    assert_eq!(
        format_arg_list(&[CallArg::new("a", "1"), CallArg::new("b", "\"x\"")]),
        "a: 1, b: \"x\""
    );
}

#[test]
fn test_block_json_shape() {
    let block = LogicBlock::new(
        IdAllocator::new().next_id(),
        BlockKind::precondition("ok", "true", None),
    );
    let json = serde_json::to_value(&block).expect("serializes");
    assert_eq!(json["kind"]["PRECONDITION"]["label"], "ok");

    let decoded: LogicBlock = serde_json::from_str(
        r#"{ "id": 7, "kind": { "PRECONDITION": { "label": "x", "conditions": "y", "onFailure": "z" } } }"#,
    )
    .expect("deserializes");
    assert_eq!(
        decoded.kind,
        BlockKind::precondition("x", "y", Some("z".into()))
    );
}
