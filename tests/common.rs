//! Common test utilities: metadata fixtures, sample documents and a random edit driver.
use kumiki::block::IdAllocator;
use kumiki::prelude::*;
use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use std::collections::HashSet;

/// `RULE Demo PRIORITY 100` triggered by `UPDATE(Order.status)`.
#[allow(dead_code)]
pub fn demo_rule_meta() -> EditorMeta {
    EditorMeta::rule(
        "Demo",
        100,
        TriggerSpec::new("UPDATE", "Order").on_property("status"),
    )
}

/// `ACTION Order.submit` without parameters.
#[allow(dead_code)]
pub fn submit_action_meta() -> EditorMeta {
    EditorMeta::action("submit", "Order")
}

#[allow(dead_code)]
pub const SAMPLE_RULE: &str = r#"RULE Demo PRIORITY 100 {
    ON UPDATE(Order.status)

    SET order.status = "Shipped";
    FOR (o: Order WHERE o.total > 100) {

        SET o.flag = true;
        TRIGGER Invoice.recalculate ON o;
    }
    CALL billing.charge(amount: o.total, currency: "EUR");
}"#;

#[allow(dead_code)]
pub const SAMPLE_ACTION: &str = r#"ACTION Order.submit(reason: String, urgent: Boolean?) {
    DESCRIPTION: "Submits a \"draft\" order"
    PRECONDITION statusCheck: this.status == "Draft"
        ON_FAILURE: "Only draft items can be submitted"
    PRECONDITION hasLines: this.lines.length > 0

    EFFECT {
        SET this.status = "Submitted";
        CALL "audit log".record(event: "submit");
    }
}"#;

/// Parses with a throwaway allocator.
#[allow(dead_code)]
pub fn reparse(text: &str, mode: DslMode) -> ParsedProgram {
    let mut ids = IdAllocator::new();
    parse(text, mode, &mut ids)
}

/// Generates, re-parses and generates again.
#[allow(dead_code)]
pub fn regenerate(text: &str, mode: DslMode, meta: &EditorMeta) -> String {
    let parsed = reparse(text, mode);
    generate(mode, meta, &parsed.statements, &parsed.preconditions)
}

/// Every id in both forests, in document order.
#[allow(dead_code)]
pub fn all_ids(session: &EditorSession) -> Vec<BlockId> {
    session
        .statements()
        .walk()
        .into_iter()
        .chain(session.preconditions().walk())
        .map(|(_, b)| b.id)
        .collect()
}

#[allow(dead_code)]
pub fn ids_are_unique(session: &EditorSession) -> bool {
    let ids = all_ids(session);
    let distinct: HashSet<BlockId> = ids.iter().copied().collect();
    distinct.len() == ids.len()
}

const NAMES: &[&str] = &["order", "o", "Invoice", "line_item", "", "x y", "ünï"];
const TEXTS: &[&str] = &[
    "true",
    "\"Shipped\"",
    "a, b",
    "max(x, y)",
    "",
    "  padded  ",
    "two\nlines",
    "semi;",
    "quote \" inside",
    "{}",
    "back\\slash",
];
const FIELDS: &[BlockField] = &[
    BlockField::Target,
    BlockField::Value,
    BlockField::Entity,
    BlockField::Action,
    BlockField::Variable,
    BlockField::Conditions,
    BlockField::Label,
    BlockField::OnFailure,
    BlockField::Product,
    BlockField::Method,
];

fn pick<'a>(rng: &mut StdRng, items: &[&'a str]) -> &'a str {
    items.choose(rng).copied().unwrap_or_default()
}

/// A block of any kind with deliberately awkward field contents.
#[allow(dead_code)]
pub fn random_kind(rng: &mut StdRng) -> BlockKind {
    match rng.random_range(0..5) {
        0 => BlockKind::set(pick(rng, NAMES), pick(rng, TEXTS)),
        1 => BlockKind::trigger(pick(rng, NAMES), pick(rng, NAMES), pick(rng, TEXTS)),
        2 => BlockKind::for_each(
            pick(rng, NAMES),
            pick(rng, NAMES),
            rng.random_bool(0.5).then(|| pick(rng, TEXTS).to_string()),
        ),
        3 => {
            let args = (0..rng.random_range(0..4))
                .map(|_| CallArg::new(pick(rng, NAMES), pick(rng, TEXTS)))
                .collect();
            BlockKind::call(pick(rng, TEXTS), pick(rng, NAMES), args)
        }
        _ => BlockKind::precondition(
            pick(rng, NAMES),
            pick(rng, TEXTS),
            rng.random_bool(0.5).then(|| pick(rng, TEXTS).to_string()),
        ),
    }
}

/// Applies one random add/update/remove/reorder to `session`.
#[allow(dead_code)]
pub fn random_edit(rng: &mut StdRng, session: &mut EditorSession) {
    let ids = all_ids(session);
    match rng.random_range(0..10) {
        0..=3 => {
            let containers: Vec<BlockId> = session
                .statements()
                .walk()
                .into_iter()
                .filter(|(_, b)| b.is_container())
                .map(|(_, b)| b.id)
                .collect();
            let parent = match (containers.choose(rng), rng.random_bool(0.6)) {
                (Some(id), true) => ParentRef::Block(*id),
                _ => ParentRef::Root,
            };
            let kind = random_kind(rng);
            session.add(parent, kind);
        }
        4..=6 => {
            if let (Some(id), Some(field)) = (ids.choose(rng), FIELDS.choose(rng)) {
                let value = pick(rng, TEXTS);
                session.update_field(*id, *field, value);
            }
        }
        7 => {
            if let Some(id) = ids.choose(rng) {
                let args = (0..rng.random_range(0..3))
                    .map(|_| CallArg::new(pick(rng, NAMES), pick(rng, TEXTS)))
                    .collect::<Vec<_>>();
                session.update_field(*id, BlockField::Args, args);
            }
        }
        8 => {
            if let Some(id) = ids.choose(rng) {
                session.remove(*id);
            }
        }
        _ => {
            if let (Some(a), Some(b)) = (ids.choose(rng), ids.choose(rng)) {
                session.reorder(*a, *b);
            }
        }
    }
}
