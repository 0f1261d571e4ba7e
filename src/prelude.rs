//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the kumiki crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use kumiki::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let text = std::fs::read_to_string("path/to/rule.dsl")?;
//! let meta = parse_meta(&text, DslMode::Rule).unwrap_or_default();
//!
//! let session = EditorSession::builder(DslMode::Rule, meta)
//!     .with_source(text)
//!     .build();
//! println!("{}", session.generated_text());
//! # Ok(())
//! # }
//! ```

// Blocks and trees
pub use crate::block::{BlockField, BlockId, BlockKind, BlockTag, CallArg, FieldValue, LogicBlock};
pub use crate::tree::{BlockView, Forest, ForestRole, ParentRef};

// DSL
pub use crate::dsl::{
    ActionParameter, DslMode, EditorMeta, ParsedProgram, TriggerSpec, generate, parse, parse_meta,
};

// Sessions and call arguments
pub use crate::resolver::{
    ApplyResult, ArgumentEditor, FetchOutcome, FetchTicket, InputField, MethodSchemaSource,
    StaticSchemaSource,
};
pub use crate::session::{EditorSession, SessionSnapshot, SessionState};
pub use crate::store::{DefinitionStore, MemoryStore, StoredDefinition};

// Error types
pub use crate::error::{SchemaError, SnapshotError, StoreError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
