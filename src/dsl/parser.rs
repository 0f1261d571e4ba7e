//! Line-oriented, stack-based parser from DSL text to block forests.
//!
//! The parser recognises a fixed set of surface forms and silently drops everything
//! else, so text that was hand-edited outside the visual editor (or uses syntax this
//! crate does not know yet) can always be opened. It never fails: the worst case is an
//! empty forest.

use super::DslMode;
use super::args::parse_arg_list;
use super::header::is_header_line;
use super::patterns::{Line, classify};
use crate::block::{BlockField, BlockId, BlockKind, IdAllocator, LogicBlock};
use crate::tree::{Forest, ParentRef};
use serde::Serialize;

/// Result of parsing one document.
#[derive(Debug, Clone)]
pub struct ParsedProgram {
    pub statements: Forest,
    pub preconditions: Forest,
    /// Lines dropped by the lossy parse, for diagnostics only.
    pub skipped: Vec<SkippedLine>,
}

/// A non-empty, non-comment line that produced no block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedLine {
    /// 1-based line number in the original text.
    pub line: usize,
    pub text: String,
}

struct ParseState<'a> {
    mode: DslMode,
    ids: &'a mut IdAllocator,
    statements: Forest,
    preconditions: Forest,
    /// Open `FOR` scopes; empty means top level.
    scopes: Vec<BlockId>,
    in_effect: bool,
    /// Precondition that may still receive an `ON_FAILURE` line.
    open_precondition: Option<BlockId>,
    skipped: Vec<SkippedLine>,
}

/// Parses `text` in `mode`, drawing fresh ids from `ids`.
pub fn parse(text: &str, mode: DslMode, ids: &mut IdAllocator) -> ParsedProgram {
    let mut state = ParseState {
        mode,
        ids,
        statements: Forest::statements(),
        preconditions: Forest::preconditions(),
        scopes: Vec::new(),
        in_effect: false,
        open_precondition: None,
        skipped: Vec::new(),
    };

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with("//") {
            continue;
        }
        if !state.consume(line) {
            state.skipped.push(SkippedLine {
                line: index + 1,
                text: line.to_string(),
            });
        }
    }

    if !state.skipped.is_empty() {
        log::debug!(
            "parse ({}): {} line(s) not recognised and dropped",
            mode,
            state.skipped.len()
        );
    }

    ParsedProgram {
        statements: state.statements,
        preconditions: state.preconditions,
        skipped: state.skipped,
    }
}

impl ParseState<'_> {
    /// Applies one line. Returns `false` when the line was dropped.
    fn consume(&mut self, line: &str) -> bool {
        let classified = classify(line);
        let follows_precondition = self.open_precondition.take();

        match classified {
            Line::Precondition { label, conditions } if self.mode == DslMode::Action => {
                let id = self.ids.next_id();
                let block = LogicBlock::new(id, BlockKind::precondition(label, conditions, None));
                self.preconditions.push(ParentRef::Root, block);
                self.open_precondition = Some(id);
                true
            }
            Line::OnFailure { message } if self.mode == DslMode::Action => {
                let Some(id) = follows_precondition else {
                    return false;
                };
                self.preconditions
                    .set_field(id, BlockField::OnFailure, message.into());
                true
            }
            Line::Effect if self.mode == DslMode::Action => {
                self.in_effect = true;
                true
            }
            Line::Close => {
                // Also closes the EFFECT/RULE/ACTION wrappers; popping an empty stack is fine.
                self.scopes.pop();
                true
            }
            _ if is_header_line(line, self.mode) => true,
            _ if !self.accepts_statements() => false,
            Line::Set { target, value } => {
                self.push(BlockKind::set(target, value));
                true
            }
            Line::Trigger {
                entity,
                action,
                target,
            } => {
                self.push(BlockKind::trigger(entity, action, target));
                true
            }
            Line::ForOpen {
                variable,
                entity,
                conditions,
            } => {
                let kind = BlockKind::for_each(variable, entity, conditions.map(str::to_string));
                let id = self.push(kind);
                self.scopes.push(id);
                true
            }
            Line::Call {
                product,
                method,
                args,
            } => {
                self.push(BlockKind::call(product, method, parse_arg_list(args)));
                true
            }
            _ => false,
        }
    }

    /// ACTION bodies only start after the `EFFECT` marker.
    fn accepts_statements(&self) -> bool {
        self.mode == DslMode::Rule || self.in_effect
    }

    fn current_parent(&self) -> ParentRef {
        self.scopes
            .last()
            .map_or(ParentRef::Root, |id| ParentRef::Block(*id))
    }

    fn push(&mut self, kind: BlockKind) -> BlockId {
        let id = self.ids.next_id();
        let parent = self.current_parent();
        self.statements.push(parent, LogicBlock::new(id, kind));
        id
    }
}
