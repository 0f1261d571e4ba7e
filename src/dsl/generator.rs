//! Deterministic rendering of block forests into DSL text.
//!
//! Output is a pure function of its inputs. Every field goes through a normaliser so the
//! text is always well formed and re-parses into blocks that render identically.

use super::args::{format_arg_list, is_name_char, parse_arg_list};
use super::patterns::escape;
use super::{DslMode, EditorMeta, INDENT};
use crate::block::{BlockId, BlockKind, CallArg, CallBlock};
use crate::tree::Forest;
use itertools::Itertools;

pub const DEFAULT_PRIORITY: i64 = 100;
const UNTITLED: &str = "Untitled";
const DEFAULT_TRIGGER: &str = "UPDATE";
const DEFAULT_ENTITY: &str = "Entity";

/// Renders a complete document.
///
/// `preconditions` are only rendered in [`DslMode::Action`].
pub fn generate(
    mode: DslMode,
    meta: &EditorMeta,
    statements: &Forest,
    preconditions: &Forest,
) -> String {
    let mut out = Renderer::default();
    match mode {
        DslMode::Rule => out.rule(meta, statements),
        DslMode::Action => out.action(meta, statements, preconditions),
    }
    out.lines.join("\n")
}

#[derive(Default)]
struct Renderer {
    lines: Vec<String>,
}

impl Renderer {
    fn line(&mut self, depth: usize, text: impl AsRef<str>) {
        self.lines
            .push(format!("{}{}", INDENT.repeat(depth), text.as_ref()));
    }

    fn blank(&mut self) {
        self.lines.push(String::new());
    }

    fn rule(&mut self, meta: &EditorMeta, statements: &Forest) {
        let name = text_or(&meta.name, UNTITLED);
        let priority = meta.priority.unwrap_or(DEFAULT_PRIORITY);
        self.line(0, format!("RULE {} PRIORITY {} {{", name, priority));

        let (kind, entity, property) = match &meta.trigger {
            Some(t) => (
                ident(&t.kind, DEFAULT_TRIGGER),
                ident(&t.entity, DEFAULT_ENTITY),
                t.property.as_deref().map(|p| ident(p, "")),
            ),
            None => (DEFAULT_TRIGGER.to_string(), DEFAULT_ENTITY.to_string(), None),
        };
        let suffix = match property {
            Some(p) if kind == "UPDATE" && !p.is_empty() => format!(".{}", p),
            _ => String::new(),
        };
        self.line(1, format!("ON {}({}{})", kind, entity, suffix));
        self.blank();

        self.statements(statements, 1);
        self.line(0, "}");
    }

    fn action(&mut self, meta: &EditorMeta, statements: &Forest, preconditions: &Forest) {
        let entity_type = ident(meta.entity_type.as_deref().unwrap_or(""), DEFAULT_ENTITY);
        // Parentheses would open the parameter list.
        let name = text_or(&meta.name.replace(['(', ')'], ""), UNTITLED);
        let params = if meta.parameters.is_empty() {
            String::new()
        } else {
            let list = meta
                .parameters
                .iter()
                .map(|p| {
                    format!(
                        "{}: {}{}",
                        ident(&p.name, "param"),
                        text_or(&p.param_type, "Any"),
                        if p.optional { "?" } else { "" }
                    )
                })
                .join(", ");
            format!("({})", list)
        };
        self.line(0, format!("ACTION {}.{}{} {{", entity_type, name, params));

        if let Some(description) = meta.description.as_deref().map(inline) {
            if !description.is_empty() {
                self.line(1, format!("DESCRIPTION: \"{}\"", escape(&description)));
            }
        }

        for (_, block) in preconditions.walk() {
            if let BlockKind::Precondition(p) = &block.kind {
                self.line(
                    1,
                    format!(
                        "PRECONDITION {}: {}",
                        ident(&p.label, "check"),
                        text_or(&p.conditions, "true")
                    ),
                );
                let message = p.on_failure.as_deref().map(inline).unwrap_or_default();
                if !message.is_empty() {
                    self.line(2, format!("ON_FAILURE: \"{}\"", escape(&message)));
                }
            }
        }

        self.blank();
        self.line(1, "EFFECT {");
        self.statements(statements, 2);
        self.line(1, "}");
        self.line(0, "}");
    }

    fn statements(&mut self, forest: &Forest, depth: usize) {
        for id in forest.roots() {
            self.block(forest, *id, depth);
        }
    }

    fn block(&mut self, forest: &Forest, id: BlockId, depth: usize) {
        let Some(block) = forest.get(id) else {
            return;
        };
        match &block.kind {
            BlockKind::Set(b) => self.line(
                depth,
                format!(
                    "SET {} = {};",
                    path(&b.target, "entity.prop"),
                    text_or(&b.value, "\"\"")
                ),
            ),
            BlockKind::Trigger(b) => self.line(
                depth,
                format!(
                    "TRIGGER {}.{} ON {};",
                    ident(&b.entity, DEFAULT_ENTITY),
                    ident(&b.action, "action"),
                    text_or(&b.target, "this")
                ),
            ),
            BlockKind::For(b) => {
                let filter = b
                    .conditions
                    .as_deref()
                    .map(inline)
                    .filter(|c| !c.is_empty())
                    .map(|c| format!(" WHERE {}", c))
                    .unwrap_or_default();
                self.line(
                    depth,
                    format!(
                        "FOR ({}: {}{}) {{",
                        ident(&b.variable, "item"),
                        ident(&b.entity, DEFAULT_ENTITY),
                        filter
                    ),
                );
                self.blank();
                for child in forest.children(id) {
                    self.block(forest, *child, depth + 1);
                }
                self.line(depth, "}");
            }
            BlockKind::Call(b) => self.line(depth, render_call(b)),
            // Never present in a statement forest.
            BlockKind::Precondition(_) => {}
        }
    }
}

fn render_call(call: &CallBlock) -> String {
    let args = canonical_args(&call.args);
    let args = if args.is_empty() {
        "{}".to_string()
    } else {
        format_arg_list(&args)
    };
    format!(
        "CALL {}.{}({});",
        render_product(&call.product),
        ident(&call.method, "method"),
        args
    )
}

/// Normalises each argument, then lets the list parser settle how the joined text
/// splits, so the rendered list is exactly what a re-parse will produce.
fn canonical_args(args: &[CallArg]) -> Vec<CallArg> {
    let normalised: Vec<CallArg> = args
        .iter()
        .map(|a| CallArg::new(ident(&a.name, "arg"), text_or(&a.value, "\"\"")))
        .collect();
    parse_arg_list(&format_arg_list(&normalised))
}

/// Dotted identifiers render bare, everything else as a quoted literal.
fn render_product(product: &str) -> String {
    let cleaned = inline(&product.replace('"', ""));
    if cleaned.is_empty() {
        return "product".to_string();
    }
    let bare = cleaned.split('.').all(|segment| {
        segment.chars().next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && segment.chars().all(is_name_char)
    });
    if bare {
        cleaned
    } else {
        format!("\"{}\"", cleaned)
    }
}

/// Collapses line breaks and trims, keeping the text on a single line.
fn inline(text: &str) -> String {
    text.replace(['\r', '\n'], " ").trim().to_string()
}

fn text_or(text: &str, placeholder: &str) -> String {
    let text = inline(text);
    if text.is_empty() {
        placeholder.to_string()
    } else {
        text
    }
}

fn ident(text: &str, placeholder: &str) -> String {
    let cleaned: String = text.chars().filter(|c| is_name_char(*c)).collect();
    if cleaned.is_empty() {
        placeholder.to_string()
    } else {
        cleaned
    }
}

fn path(text: &str, placeholder: &str) -> String {
    let cleaned: String = text
        .chars()
        .filter(|c| is_name_char(*c) || matches!(c, '.' | '$' | '[' | ']'))
        .collect();
    if cleaned.is_empty() {
        placeholder.to_string()
    } else {
        cleaned
    }
}
