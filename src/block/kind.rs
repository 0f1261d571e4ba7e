use super::id::BlockId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One node of the visual statement tree.
///
/// Children of a `FOR` block are not stored here: the owning [`Forest`](crate::tree::Forest)
/// keeps them as id lists, so a block value never aliases another block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicBlock {
    pub id: BlockId,
    pub kind: BlockKind,
}

impl LogicBlock {
    pub fn new(id: BlockId, kind: BlockKind) -> Self {
        Self { id, kind }
    }

    pub fn tag(&self) -> BlockTag {
        self.kind.tag()
    }

    /// Only `FOR` blocks may own children.
    pub fn is_container(&self) -> bool {
        matches!(self.kind, BlockKind::For(_))
    }
}

/// The payload of a block, one variant per statement shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockKind {
    Set(SetBlock),
    Trigger(TriggerBlock),
    For(ForBlock),
    Precondition(PreconditionBlock),
    Call(CallBlock),
}

impl BlockKind {
    pub fn tag(&self) -> BlockTag {
        match self {
            BlockKind::Set(_) => BlockTag::Set,
            BlockKind::Trigger(_) => BlockTag::Trigger,
            BlockKind::For(_) => BlockTag::For,
            BlockKind::Precondition(_) => BlockTag::Precondition,
            BlockKind::Call(_) => BlockTag::Call,
        }
    }

    pub fn set(target: impl Into<String>, value: impl Into<String>) -> Self {
        BlockKind::Set(SetBlock {
            target: target.into(),
            value: value.into(),
        })
    }

    pub fn trigger(
        entity: impl Into<String>,
        action: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        BlockKind::Trigger(TriggerBlock {
            entity: entity.into(),
            action: action.into(),
            target: target.into(),
        })
    }

    pub fn for_each(
        variable: impl Into<String>,
        entity: impl Into<String>,
        conditions: Option<String>,
    ) -> Self {
        BlockKind::For(ForBlock {
            variable: variable.into(),
            entity: entity.into(),
            conditions,
        })
    }

    pub fn precondition(
        label: impl Into<String>,
        conditions: impl Into<String>,
        on_failure: Option<String>,
    ) -> Self {
        BlockKind::Precondition(PreconditionBlock {
            label: label.into(),
            conditions: conditions.into(),
            on_failure,
        })
    }

    pub fn call(product: impl Into<String>, method: impl Into<String>, args: Vec<CallArg>) -> Self {
        BlockKind::Call(CallBlock {
            product: product.into(),
            method: method.into(),
            args,
        })
    }
}

/// `SET target = value;`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetBlock {
    /// An `entity.property` path.
    pub target: String,
    /// Unparsed value expression.
    pub value: String,
}

/// `TRIGGER entity.action ON target;`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerBlock {
    pub entity: String,
    pub action: String,
    pub target: String,
}

/// `FOR (variable: Entity WHERE conditions) { ... }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForBlock {
    pub variable: String,
    pub entity: String,
    #[serde(default)]
    pub conditions: Option<String>,
}

/// `PRECONDITION label: conditions` with an optional `ON_FAILURE` message.
/// Lives only at the top level of a precondition list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreconditionBlock {
    pub label: String,
    pub conditions: String,
    #[serde(default, alias = "onFailure")]
    pub on_failure: Option<String>,
}

/// `CALL product.method(name: value, ...);`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallBlock {
    pub product: String,
    pub method: String,
    #[serde(default)]
    pub args: Vec<CallArg>,
}

impl CallBlock {
    pub fn arg(&self, name: &str) -> Option<&str> {
        self.args
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }
}

/// A single `name: value` pair of a `CALL` argument list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallArg {
    pub name: String,
    pub value: String,
}

impl CallArg {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Fieldless discriminant of [`BlockKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockTag {
    Set,
    Trigger,
    For,
    Precondition,
    Call,
}

impl fmt::Display for BlockTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BlockTag::Set => "SET",
            BlockTag::Trigger => "TRIGGER",
            BlockTag::For => "FOR",
            BlockTag::Precondition => "PRECONDITION",
            BlockTag::Call => "CALL",
        };
        f.write_str(name)
    }
}
