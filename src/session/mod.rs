//! The editor session: owns the current block forests and keeps the generated DSL in
//! step with them.
//!
//! Text flows into the tree at exactly one point, [`EditorSession::resync`] (which
//! [`EditorSession::open`] runs once). Every tree mutation regenerates the text and pushes
//! it to the registered `on_dsl_change` listeners; text the host edits on its own is only
//! remembered via [`EditorSession::set_external_source`] until the next resync.

use crate::block::{
    BlockField, BlockId, BlockKind, BlockTag, CallArg, CallBlock, FieldValue, IdAllocator,
    LogicBlock,
};
use crate::dsl::{self, DslMode, EditorMeta, SkippedLine};
use crate::resolver::{
    ApplyResult, ArgumentResolver, CallEditorState, FetchOutcome, FetchTicket, FormInput,
};
use crate::store::StoredDefinition;
use crate::tree::{BlockView, Forest, ParentRef};
use serde::{Deserialize, Serialize};
use std::fmt;

mod builder;
mod snapshot;

pub use builder::SessionBuilder;
pub use snapshot::SessionSnapshot;

/// Host hook receiving the regenerated text after every mutation.
pub type DslListener = Box<dyn FnMut(&str)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Created, no source parsed yet.
    Uninitialized,
    /// The tree is a fresh parse of the last external source.
    Synced,
    /// The tree was edited; the generated text is derived from it.
    Dirty,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Uninitialized => f.write_str("uninitialized"),
            SessionState::Synced => f.write_str("synced"),
            SessionState::Dirty => f.write_str("dirty"),
        }
    }
}

pub struct EditorSession {
    mode: DslMode,
    meta: EditorMeta,
    state: SessionState,
    statements: Forest,
    preconditions: Forest,
    /// Last text supplied by the host; the input of the next resync.
    source: Option<String>,
    generated: String,
    skipped: Vec<SkippedLine>,
    ids: IdAllocator,
    resolver: ArgumentResolver,
    listeners: Vec<DslListener>,
}

impl EditorSession {
    pub fn new(mode: DslMode, meta: EditorMeta) -> Self {
        let statements = Forest::statements();
        let preconditions = Forest::preconditions();
        let generated = dsl::generate(mode, &meta, &statements, &preconditions);
        Self {
            mode,
            meta,
            state: SessionState::Uninitialized,
            statements,
            preconditions,
            source: None,
            generated,
            skipped: Vec::new(),
            ids: IdAllocator::new(),
            resolver: ArgumentResolver::new(),
            listeners: Vec::new(),
        }
    }

    pub fn builder(mode: DslMode, meta: EditorMeta) -> SessionBuilder {
        SessionBuilder::new(mode, meta)
    }

    /// Opens a session on a stored rule or action.
    pub fn from_definition(definition: &StoredDefinition) -> Self {
        Self::builder(definition.mode(), definition.meta())
            .with_source(definition.dsl_text())
            .build()
    }

    pub fn mode(&self) -> DslMode {
        self.mode
    }

    pub fn meta(&self) -> &EditorMeta {
        &self.meta
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn statements(&self) -> &Forest {
        &self.statements
    }

    pub fn preconditions(&self) -> &Forest {
        &self.preconditions
    }

    /// The DSL text derived from the current tree.
    pub fn generated_text(&self) -> &str {
        &self.generated
    }

    pub fn external_source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Lines the last resync could not place in the tree.
    pub fn skipped_lines(&self) -> &[SkippedLine] {
        &self.skipped
    }

    pub fn statement_views(&self) -> Vec<BlockView> {
        self.statements.to_views()
    }

    pub fn precondition_views(&self) -> Vec<BlockView> {
        self.preconditions.to_views()
    }

    pub fn get(&self, id: BlockId) -> Option<&LogicBlock> {
        self.statements
            .get(id)
            .or_else(|| self.preconditions.get(id))
    }

    pub fn on_dsl_change(&mut self, listener: impl FnMut(&str) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Replaces the header data. The text is regenerated and pushed; the tree is untouched.
    pub fn set_meta(&mut self, meta: EditorMeta) {
        if meta == self.meta {
            return;
        }
        self.meta = meta;
        self.regenerate();
        self.notify();
    }

    /// Remembers `text` and rebuilds the tree from it.
    pub fn open(&mut self, text: impl Into<String>) {
        self.source = Some(text.into());
        self.resync();
    }

    /// Records text the host changed on its own. The tree is left alone until [`resync`].
    ///
    /// [`resync`]: EditorSession::resync
    pub fn set_external_source(&mut self, text: impl Into<String>) {
        self.source = Some(text.into());
    }

    /// Discards the visual tree and rebuilds it from the last external source.
    pub fn resync(&mut self) {
        let text = self.source.as_deref().unwrap_or_default();
        let parsed = dsl::parse(text, self.mode, &mut self.ids);

        self.statements = parsed.statements;
        self.preconditions = parsed.preconditions;
        self.skipped = parsed.skipped;
        self.resolver.clear();
        self.regenerate();

        log::info!(
            "session {} -> synced ({} statement(s), {} precondition(s))",
            self.state,
            self.statements.len(),
            self.preconditions.len()
        );
        self.state = SessionState::Synced;
    }

    /// Adds a new block and returns its id, or `None` when the forest rejected it.
    ///
    /// `PRECONDITION` blocks go to the precondition list (action documents only),
    /// everything else to the statement tree.
    pub fn add(&mut self, parent: ParentRef, kind: BlockKind) -> Option<BlockId> {
        let id = self.ids.next_id();
        let block = LogicBlock::new(id, kind);

        if block.tag() == BlockTag::Precondition {
            if self.mode != DslMode::Action {
                log::debug!("add: preconditions only exist in action documents");
                return None;
            }
            if !self.preconditions.push(parent, block) {
                return None;
            }
        } else if !self.statements.push(parent, block) {
            return None;
        }
        self.commit();
        Some(id)
    }

    /// Replaces one field of block `id`. Returns whether anything changed.
    ///
    /// Changing a `CALL` block's product or method drops its pending schema request.
    pub fn update_field(
        &mut self,
        id: BlockId,
        field: BlockField,
        value: impl Into<FieldValue>,
    ) -> bool {
        if !self.set_field(id, field, value.into()) {
            return false;
        }
        if let Some(call) = self.call_block(id) {
            let args = call.args.clone();
            match field {
                BlockField::Product | BlockField::Method => self.resolver.invalidate(id, &args),
                BlockField::Args => self.resolver.refresh_free_text(id, &args),
                _ => {}
            }
        }
        self.commit();
        true
    }

    /// Removes block `id` (with its subtree). Returns whether it existed.
    pub fn remove(&mut self, id: BlockId) -> bool {
        if self.statements.detach(id) {
            let statements = &self.statements;
            self.resolver.retain(|b| statements.contains(b));
        } else if !self.preconditions.detach(id) {
            log::debug!("remove: id {} not in session", id);
            return false;
        }
        self.commit();
        true
    }

    /// Moves `active` to the position of its sibling `over`. Returns whether the order changed.
    pub fn reorder(&mut self, active: BlockId, over: BlockId) -> bool {
        if !self.statements.move_to(active, over) && !self.preconditions.move_to(active, over) {
            return false;
        }
        self.commit();
        true
    }

    /// Points `CALL` block `id` at `product.method` and starts a schema request for it.
    ///
    /// `None` if `id` is not a `CALL` block. Any request issued earlier for the block
    /// becomes stale.
    pub fn select_call_target(
        &mut self,
        id: BlockId,
        product: &str,
        method: &str,
    ) -> Option<FetchTicket> {
        self.call_block(id)?;
        let product_changed = self.set_field(id, BlockField::Product, product.into());
        let method_changed = self.set_field(id, BlockField::Method, method.into());
        if product_changed || method_changed {
            self.commit();
        }

        let call = self.call_block(id)?;
        let args = call.args.clone();
        Some(self.resolver.select(id, product, method, &args))
    }

    /// Applies a finished schema request, unless a newer selection superseded it.
    pub fn apply_schema(&mut self, outcome: FetchOutcome) -> ApplyResult {
        let args = self
            .call_block(outcome.ticket.block())
            .map(|c| c.args.clone())
            .unwrap_or_default();
        self.resolver.apply(outcome, &args)
    }

    pub fn call_editor(&self, id: BlockId) -> Option<&CallEditorState> {
        self.resolver.state(id)
    }

    /// Form inputs for a `CALL` block in structured mode, pre-filled from its arguments.
    pub fn form_inputs(&self, id: BlockId) -> Vec<FormInput> {
        match self.call_block(id) {
            Some(call) => self.resolver.form_inputs(id, &call.args),
            None => Vec::new(),
        }
    }

    /// Sets one declared argument from the form. Returns whether the arguments changed.
    pub fn edit_call_argument(&mut self, id: BlockId, name: &str, value: &str) -> bool {
        let Some(call) = self.call_block(id) else {
            return false;
        };
        let Some(args) = self.resolver.edit_field(id, name, value, &call.args) else {
            return false;
        };
        self.commit_args(id, args)
    }

    /// Re-parses the free-text argument line into the block's arguments.
    pub fn edit_call_free_text(&mut self, id: BlockId, raw: &str) -> bool {
        if self.call_block(id).is_none() {
            return false;
        }
        let args = self.resolver.edit_free_text(id, raw);
        self.commit_args(id, args)
    }

    /// Switches a `CALL` block between form and free-text editing.
    pub fn set_call_manual(&mut self, id: BlockId, manual: bool) {
        if let Some(call) = self.call_block(id) {
            let args = call.args.clone();
            self.resolver.set_manual(id, manual, &args);
        }
    }

    fn call_block(&self, id: BlockId) -> Option<&CallBlock> {
        match &self.statements.get(id)?.kind {
            BlockKind::Call(call) => Some(call),
            _ => None,
        }
    }

    fn commit_args(&mut self, id: BlockId, args: Vec<CallArg>) -> bool {
        if !self.set_field(id, BlockField::Args, args.into()) {
            return false;
        }
        self.commit();
        true
    }

    /// Updates whichever forest holds `id`, without committing.
    fn set_field(&mut self, id: BlockId, field: BlockField, value: FieldValue) -> bool {
        let forest = if self.statements.contains(id) {
            &mut self.statements
        } else if self.preconditions.contains(id) {
            &mut self.preconditions
        } else {
            log::debug!("update_field: id {} not in session", id);
            return false;
        };
        forest.set_field(id, field, value)
    }

    fn commit(&mut self) {
        if self.state != SessionState::Dirty {
            log::info!("session {} -> dirty", self.state);
            self.state = SessionState::Dirty;
        }
        self.regenerate();
        self.notify();
    }

    fn regenerate(&mut self) {
        self.generated = dsl::generate(self.mode, &self.meta, &self.statements, &self.preconditions);
    }

    fn notify(&mut self) {
        for listener in self.listeners.iter_mut() {
            listener(&self.generated);
        }
    }
}
