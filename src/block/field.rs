use super::kind::{BlockKind, CallArg};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Addressable fields of a block, as edited from the visual editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockField {
    Target,
    Value,
    Entity,
    Action,
    Variable,
    Conditions,
    Label,
    OnFailure,
    Product,
    Method,
    Args,
}

impl fmt::Display for BlockField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BlockField::Target => "target",
            BlockField::Value => "value",
            BlockField::Entity => "entity",
            BlockField::Action => "action",
            BlockField::Variable => "variable",
            BlockField::Conditions => "conditions",
            BlockField::Label => "label",
            BlockField::OnFailure => "onFailure",
            BlockField::Product => "product",
            BlockField::Method => "method",
            BlockField::Args => "args",
        };
        f.write_str(name)
    }
}

/// New content for a [`BlockField`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldValue {
    Text(String),
    Args(Vec<CallArg>),
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<Vec<CallArg>> for FieldValue {
    fn from(args: Vec<CallArg>) -> Self {
        FieldValue::Args(args)
    }
}

/// Empty text clears an optional field.
fn optional(text: String) -> Option<String> {
    if text.trim().is_empty() { None } else { Some(text) }
}

/// Replaces one field in place.
///
/// Returns `false` when the field does not exist on this kind, the value has the wrong
/// shape, or the content is already identical. The kind is left untouched in that case.
pub fn apply_field(kind: &mut BlockKind, field: BlockField, value: FieldValue) -> bool {
    use BlockField as F;

    match (kind, field, value) {
        (BlockKind::Call(call), F::Args, FieldValue::Args(args)) => replace(&mut call.args, args),
        (BlockKind::For(b), F::Conditions, FieldValue::Text(text)) => {
            replace(&mut b.conditions, optional(text))
        }
        (BlockKind::Precondition(b), F::OnFailure, FieldValue::Text(text)) => {
            replace(&mut b.on_failure, optional(text))
        }
        (kind, field, FieldValue::Text(text)) => {
            let slot = match (kind, field) {
                (BlockKind::Set(b), F::Target) => &mut b.target,
                (BlockKind::Set(b), F::Value) => &mut b.value,
                (BlockKind::Trigger(b), F::Entity) => &mut b.entity,
                (BlockKind::Trigger(b), F::Action) => &mut b.action,
                (BlockKind::Trigger(b), F::Target) => &mut b.target,
                (BlockKind::For(b), F::Variable) => &mut b.variable,
                (BlockKind::For(b), F::Entity) => &mut b.entity,
                (BlockKind::Precondition(b), F::Label) => &mut b.label,
                (BlockKind::Precondition(b), F::Conditions) => &mut b.conditions,
                (BlockKind::Call(b), F::Product) => &mut b.product,
                (BlockKind::Call(b), F::Method) => &mut b.method,
                _ => return false,
            };
            replace(slot, text)
        }
        _ => false,
    }
}

fn replace<T: PartialEq>(slot: &mut T, next: T) -> bool {
    if *slot == next {
        return false;
    }
    *slot = next;
    true
}
