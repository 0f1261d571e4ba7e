//! The textual rule/action language: parsing into blocks and generating text back.

pub mod args;
pub mod generator;
pub mod header;
pub mod meta;
pub mod parser;
mod patterns;

pub use generator::generate;
pub use header::parse_meta;
pub use meta::*;
pub use parser::{ParsedProgram, SkippedLine, parse};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Spaces per nesting level in generated text.
pub const INDENT: &str = "    ";

/// Which DSL variant a document is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DslMode {
    /// Trigger header plus a statement body, no preconditions.
    Rule,
    /// Optional preconditions plus an `EFFECT`-wrapped statement body.
    Action,
}

impl fmt::Display for DslMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DslMode::Rule => f.write_str("RULE"),
            DslMode::Action => f.write_str("ACTION"),
        }
    }
}
