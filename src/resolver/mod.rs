//! Call-argument resolution for `CALL` blocks.
//!
//! Selecting a product and method issues a [`FetchTicket`] for the method's input
//! schema. While the fetch is in flight the user may pick something else; every
//! selection gets a fresh [`SelectionKey`], and an outcome whose key is no longer the
//! active one is discarded. A successful fetch switches the block to a schema-driven
//! form; a failed fetch, or manual mode, edits the arguments as one line of free text.
//! Either way the block keeps the same canonical `(name, value)` list.

use crate::block::{BlockId, CallArg};
use crate::dsl::args::{format_arg_list, parse_arg_list};
use crate::error::SchemaError;
use ahash::AHashMap;
use serde::Serialize;

mod schema;

pub use schema::{InputField, MethodSchemaSource, StaticSchemaSource};

/// Identifies one product/method selection of one block.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SelectionKey {
    pub block: BlockId,
    pub product: String,
    pub method: String,
    generation: u64,
}

/// How a block's argument list is edited right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ArgumentEditor {
    /// One input per declared field, bound by name.
    Structured { fields: Vec<InputField> },
    /// The whole list as `name: value, name: value`, re-parsed on every edit.
    FreeText { raw: String },
}

/// Progress of the schema lookup for a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SchemaStatus {
    Idle,
    Loading,
    Ready,
    Failed { message: String },
}

/// Per-block editing state.
#[derive(Debug, Clone, Serialize)]
pub struct CallEditorState {
    pub key: Option<SelectionKey>,
    pub editor: ArgumentEditor,
    pub status: SchemaStatus,
    pub manual: bool,
    /// Last schema received for the active key, kept to leave manual mode.
    pub schema: Option<Vec<InputField>>,
}

impl CallEditorState {
    fn free_text(args: &[CallArg]) -> Self {
        Self {
            key: None,
            editor: ArgumentEditor::FreeText {
                raw: format_arg_list(args),
            },
            status: SchemaStatus::Idle,
            manual: false,
            schema: None,
        }
    }
}

/// A rendered form input: one per declared field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormInput {
    pub name: String,
    pub field_type: String,
    pub value: String,
}

/// A pending schema request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub key: SelectionKey,
}

impl FetchTicket {
    pub fn block(&self) -> BlockId {
        self.key.block
    }

    /// Runs the request against `source`. The outcome still has to be applied.
    pub async fn fetch<S: MethodSchemaSource>(self, source: &S) -> FetchOutcome {
        let result = source
            .get_method_input_fields(&self.key.product, &self.key.method)
            .await;
        FetchOutcome { ticket: self, result }
    }
}

/// A finished (or failed) schema request.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub ticket: FetchTicket,
    pub result: Result<Vec<InputField>, SchemaError>,
}

/// Whether an outcome was used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyResult {
    Applied,
    Stale,
}

/// Editing state of every `CALL` block in a session.
#[derive(Debug, Default)]
pub struct ArgumentResolver {
    states: AHashMap<BlockId, CallEditorState>,
    next_generation: u64,
}

impl ArgumentResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, block: BlockId) -> Option<&CallEditorState> {
        self.states.get(&block)
    }

    /// Starts a new selection for `block`, superseding any request still in flight.
    /// Until the new outcome is applied the block edits its arguments as free text.
    pub fn select(
        &mut self,
        block: BlockId,
        product: &str,
        method: &str,
        args: &[CallArg],
    ) -> FetchTicket {
        let key = SelectionKey {
            block,
            product: product.to_string(),
            method: method.to_string(),
            generation: self.bump(),
        };
        let state = self
            .states
            .entry(block)
            .or_insert_with(|| CallEditorState::free_text(args));
        state.key = Some(key.clone());
        state.status = SchemaStatus::Loading;
        state.schema = None;
        // The previous form belongs to the superseded method.
        state.editor = ArgumentEditor::FreeText {
            raw: format_arg_list(args),
        };
        FetchTicket { key }
    }

    /// Drops the active selection of `block` so in-flight responses become stale.
    /// The block falls back to free-text editing until a new selection is made.
    pub fn invalidate(&mut self, block: BlockId, args: &[CallArg]) {
        let manual = self.states.get(&block).is_some_and(|s| s.manual);
        let mut state = CallEditorState::free_text(args);
        state.manual = manual;
        self.states.insert(block, state);
    }

    /// Applies a fetch result if it still belongs to the active selection.
    pub fn apply(&mut self, outcome: FetchOutcome, args: &[CallArg]) -> ApplyResult {
        let block = outcome.ticket.block();
        let Some(state) = self.states.get_mut(&block) else {
            log::debug!("schema response for removed block {} discarded", block);
            return ApplyResult::Stale;
        };
        if state.key.as_ref() != Some(&outcome.ticket.key) {
            log::debug!(
                "stale schema response for {}.{} on block {} discarded",
                outcome.ticket.key.product,
                outcome.ticket.key.method,
                block
            );
            return ApplyResult::Stale;
        }

        match outcome.result {
            Ok(fields) => {
                state.status = SchemaStatus::Ready;
                state.schema = Some(fields.clone());
                if !state.manual {
                    state.editor = ArgumentEditor::Structured { fields };
                }
            }
            Err(e) => {
                log::warn!("schema lookup failed for block {}: {}", block, e);
                state.status = SchemaStatus::Failed {
                    message: e.to_string(),
                };
                state.schema = None;
                state.editor = ArgumentEditor::FreeText {
                    raw: format_arg_list(args),
                };
            }
        }
        ApplyResult::Applied
    }

    /// Switches `block` between the form and free text. Leaving manual mode only
    /// returns to the form when a schema is available.
    pub fn set_manual(&mut self, block: BlockId, manual: bool, args: &[CallArg]) {
        let state = self
            .states
            .entry(block)
            .or_insert_with(|| CallEditorState::free_text(args));
        state.manual = manual;
        state.editor = match (&state.schema, manual) {
            (Some(fields), false) => ArgumentEditor::Structured {
                fields: fields.clone(),
            },
            _ => ArgumentEditor::FreeText {
                raw: format_arg_list(args),
            },
        };
    }

    /// One input per declared field, pre-filled from `args` by name.
    /// Empty unless the block is in structured mode.
    pub fn form_inputs(&self, block: BlockId, args: &[CallArg]) -> Vec<FormInput> {
        let Some(ArgumentEditor::Structured { fields }) = self.states.get(&block).map(|s| &s.editor)
        else {
            return Vec::new();
        };
        fields
            .iter()
            .map(|f| FormInput {
                name: f.name.clone(),
                field_type: f.field_type.clone(),
                value: args
                    .iter()
                    .find(|a| a.name == f.name)
                    .map(|a| a.value.clone())
                    .unwrap_or_default(),
            })
            .collect()
    }

    /// Binds a form edit into the argument list: updates the argument in place, or
    /// appends it on first edit. `None` if the block has no form or no such field.
    pub fn edit_field(
        &self,
        block: BlockId,
        name: &str,
        value: &str,
        args: &[CallArg],
    ) -> Option<Vec<CallArg>> {
        let ArgumentEditor::Structured { fields } = &self.states.get(&block)?.editor else {
            return None;
        };
        if !fields.iter().any(|f| f.name == name) {
            return None;
        }

        let mut next = args.to_vec();
        match next.iter_mut().find(|a| a.name == name) {
            Some(arg) => arg.value = value.to_string(),
            None => next.push(CallArg::new(name, value)),
        }
        Some(next)
    }

    /// Stores the raw free text and returns the list it parses into.
    /// No schema validation happens on this path.
    pub fn edit_free_text(&mut self, block: BlockId, raw: &str) -> Vec<CallArg> {
        let args = parse_arg_list(raw);
        let state = self
            .states
            .entry(block)
            .or_insert_with(|| CallEditorState::free_text(&args));
        state.editor = ArgumentEditor::FreeText {
            raw: raw.to_string(),
        };
        args
    }

    /// Re-renders the free-text line after the arguments changed elsewhere.
    pub fn refresh_free_text(&mut self, block: BlockId, args: &[CallArg]) {
        if let Some(state) = self.states.get_mut(&block) {
            if let ArgumentEditor::FreeText { raw } = &mut state.editor {
                *raw = format_arg_list(args);
            }
        }
    }

    /// Forgets blocks for which `keep` returns false.
    pub fn retain(&mut self, mut keep: impl FnMut(BlockId) -> bool) {
        self.states.retain(|id, _| keep(*id));
    }

    pub fn clear(&mut self) {
        self.states.clear();
    }

    fn bump(&mut self) -> u64 {
        self.next_generation += 1;
        self.next_generation
    }
}
