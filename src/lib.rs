//! # Kumiki - Bidirectional Rule DSL and Block Tree Editor Core
//!
//! **Kumiki** keeps two representations of one program in step: the textual rule/action
//! DSL that gets stored and hand-edited, and the block tree a no-code editor shows. It
//! parses text into blocks, generates text back from blocks, and provides the editing
//! operations (add, update, remove, reorder, nest) that keep the tree well formed.
//!
//! ## Core Workflow
//!
//! 1.  **Open**: Create an [`EditorSession`](session::EditorSession) with `EditorSession::builder`,
//!     passing the document mode, the host's [`EditorMeta`](dsl::EditorMeta) and the stored text.
//! 2.  **Edit**: Apply block operations. After each one the session regenerates the DSL and
//!     pushes it to every `on_dsl_change` listener.
//! 3.  **Resync**: When the text was changed outside the editor, hand it over with
//!     `set_external_source` and call `resync` to rebuild the tree from it.
//!
//! Parsing is lossy: lines the parser does not recognise are dropped, never
//! reported as errors, so any text can be opened.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kumiki::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let meta = EditorMeta::rule(
//!         "Demo",
//!         100,
//!         TriggerSpec::new("UPDATE", "Order").on_property("status"),
//!     );
//!
//!     // 1. Open a session on existing text.
//!     let mut session = EditorSession::builder(DslMode::Rule, meta)
//!         .with_source("RULE Demo PRIORITY 100 {\n    ON UPDATE(Order.status)\n\n}")
//!         .on_dsl_change(|text| println!("--- regenerated ---\n{}", text))
//!         .build();
//!
//!     // 2. Edit the tree.
//!     let each = session
//!         .add(ParentRef::Root, BlockKind::for_each("o", "Order", Some("o.total > 100".into())))
//!         .ok_or("FOR block rejected")?;
//!     session.add(ParentRef::Block(each), BlockKind::set("o.flag", "true"));
//!
//!     // 3. Read the projection for rendering.
//!     println!("{}", serde_json::to_string_pretty(&session.statement_views())?);
//!     Ok(())
//! }
//! ```

pub mod block;
pub mod dsl;
pub mod error;
pub mod prelude;
pub mod resolver;
pub mod session;
pub mod store;
pub mod tree;
