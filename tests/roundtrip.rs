//! Property tests over random edit sequences: round-trip closure, id uniqueness,
//! nesting containment, reorder locality and resync idempotence.
mod common;
use common::*;
use kumiki::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;

const SEEDS: u64 = 64;
const STEPS: usize = 60;

fn action_meta() -> EditorMeta {
    submit_action_meta()
        .with_description("Submits an order")
        .with_parameter(ActionParameter::optional("reason", "String"))
}

fn assert_containment(session: &EditorSession) {
    let statements = session.statements();
    for (_, block) in statements.walk() {
        assert_ne!(block.tag(), BlockTag::Precondition, "precondition in statement tree");
        if !block.is_container() {
            assert!(statements.children(block.id).is_empty(), "{} has children", block.id);
        }
    }
    for (depth, block) in session.preconditions().walk() {
        assert_eq!(depth, 0);
        assert_eq!(block.tag(), BlockTag::Precondition);
    }
}

fn assert_closure(session: &EditorSession, context: &str) {
    let first = session.generated_text();
    let second = regenerate(first, session.mode(), session.meta());
    assert_eq!(second, first, "not a fixed point after {}", context);
}

fn run_sequence(mode: DslMode, meta: EditorMeta, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut session = EditorSession::new(mode, meta);

    for step in 0..STEPS {
        random_edit(&mut rng, &mut session);
        assert!(ids_are_unique(&session), "duplicate ids at seed {} step {}", seed, step);
        assert_containment(&session);
        assert_closure(&session, &format!("seed {} step {}", seed, step));
    }
}

#[test]
fn test_rule_edit_sequences() {
    for seed in 0..SEEDS {
        run_sequence(DslMode::Rule, demo_rule_meta(), seed);
    }
}

#[test]
fn test_action_edit_sequences() {
    for seed in 0..SEEDS {
        run_sequence(DslMode::Action, action_meta(), 1_000 + seed);
    }
}

#[test]
fn test_resync_is_idempotent() {
    for seed in 0..16 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut editor = EditorSession::new(DslMode::Action, action_meta());
        for _ in 0..STEPS {
            random_edit(&mut rng, &mut editor);
        }

        let mut session = EditorSession::builder(DslMode::Action, action_meta())
            .with_source(editor.generated_text())
            .build();
        let first = session.statements().clone();
        let first_pre = session.preconditions().clone();
        let first_text = session.generated_text().to_string();

        session.resync();
        assert!(session.statements().same_structure(&first));
        assert!(session.preconditions().same_structure(&first_pre));
        assert_eq!(session.generated_text(), first_text);
        assert_eq!(session.generated_text(), editor.generated_text());
        assert!(ids_are_unique(&session));
    }
}

#[test]
fn test_reorder_locality() {
    for seed in 0..32 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut session = EditorSession::new(DslMode::Rule, demo_rule_meta());
        for _ in 0..STEPS {
            random_edit(&mut rng, &mut session);
        }

        let forest = session.statements().clone();
        let lists: Vec<(Option<BlockId>, Vec<BlockId>)> = std::iter::once((None, forest.roots().to_vec()))
            .chain(
                forest
                    .walk()
                    .into_iter()
                    .filter(|(_, b)| b.is_container())
                    .map(|(_, b)| (Some(b.id), forest.children(b.id).to_vec())),
            )
            .filter(|(_, siblings)| siblings.len() >= 2)
            .collect();
        let Some((parent, siblings)) = lists.choose(&mut rng) else {
            continue;
        };
        let (Some(active), Some(over)) = (siblings.choose(&mut rng), siblings.choose(&mut rng))
        else {
            continue;
        };

        let next = forest.reorder(*active, *over);
        for (_, block) in forest.walk() {
            if Some(block.id) != *parent {
                assert!(next.shares_node(&forest, block.id), "{} touched", block.id);
            }
        }

        let before = match parent {
            Some(id) => forest.children(*id).to_vec(),
            None => forest.roots().to_vec(),
        };
        let mut after = match parent {
            Some(id) => next.children(*id).to_vec(),
            None => next.roots().to_vec(),
        };
        let over_index = before.iter().position(|id| id == over);
        assert_eq!(after.iter().position(|id| id == active), over_index);
        after.sort();
        let mut sorted_before = before.clone();
        sorted_before.sort();
        assert_eq!(after, sorted_before);
    }
}
