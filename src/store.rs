//! Rule and action definition records as kept by the host's store.
//!
//! Persistence itself belongs to the host; this module only fixes the record shape and
//! the read/write contract the editor relies on.

use crate::dsl::{DslMode, EditorMeta, TriggerSpec};
use crate::error::StoreError;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// A stored rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDefinition {
    pub name: String,
    #[serde(alias = "dslText")]
    pub dsl_text: String,
    pub priority: i64,
    #[serde(default)]
    pub trigger: Option<TriggerSpec>,
    #[serde(default = "default_active")]
    pub active: bool,
}

/// A stored action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDefinition {
    pub name: String,
    #[serde(alias = "dslText")]
    pub dsl_text: String,
    #[serde(alias = "entityType")]
    pub entity_type: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Either kind of stored definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StoredDefinition {
    Rule(RuleDefinition),
    Action(ActionDefinition),
}

impl StoredDefinition {
    /// Parses a single definition from JSON.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        serde_json::from_str(json).map_err(|e| StoreError::JsonParseError(e.to_string()))
    }

    pub fn name(&self) -> &str {
        match self {
            StoredDefinition::Rule(r) => &r.name,
            StoredDefinition::Action(a) => &a.name,
        }
    }

    pub fn dsl_text(&self) -> &str {
        match self {
            StoredDefinition::Rule(r) => &r.dsl_text,
            StoredDefinition::Action(a) => &a.dsl_text,
        }
    }

    pub fn is_active(&self) -> bool {
        match self {
            StoredDefinition::Rule(r) => r.active,
            StoredDefinition::Action(a) => a.active,
        }
    }

    pub fn mode(&self) -> DslMode {
        match self {
            StoredDefinition::Rule(_) => DslMode::Rule,
            StoredDefinition::Action(_) => DslMode::Action,
        }
    }

    /// The header data the editor echoes into generated text.
    pub fn meta(&self) -> EditorMeta {
        match self {
            StoredDefinition::Rule(r) => EditorMeta {
                name: r.name.clone(),
                priority: Some(r.priority),
                trigger: r.trigger.clone(),
                ..EditorMeta::default()
            },
            StoredDefinition::Action(a) => EditorMeta {
                name: a.name.clone(),
                entity_type: Some(a.entity_type.clone()),
                description: a.description.clone(),
                ..EditorMeta::default()
            },
        }
    }

    fn set_dsl_text(&mut self, text: String) {
        match self {
            StoredDefinition::Rule(r) => r.dsl_text = text,
            StoredDefinition::Action(a) => a.dsl_text = text,
        }
    }
}

/// Read/write contract of a definition store. Generated text is written verbatim.
pub trait DefinitionStore {
    fn load(&self, name: &str) -> Result<StoredDefinition, StoreError>;
    fn save_text(&mut self, name: &str, dsl_text: &str) -> Result<(), StoreError>;
}

/// A store backed by a hash map, for tests and tools.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    definitions: AHashMap<String, StoredDefinition>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, definition: StoredDefinition) {
        self.definitions
            .insert(definition.name().to_string(), definition);
    }

    /// Loads a JSON array of definitions.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let definitions: Vec<StoredDefinition> =
            serde_json::from_str(json).map_err(|e| StoreError::JsonParseError(e.to_string()))?;
        let mut store = Self::new();
        for definition in definitions {
            store.insert(definition);
        }
        Ok(store)
    }
}

impl DefinitionStore for MemoryStore {
    fn load(&self, name: &str) -> Result<StoredDefinition, StoreError> {
        self.definitions
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    fn save_text(&mut self, name: &str, dsl_text: &str) -> Result<(), StoreError> {
        let definition = self
            .definitions
            .get_mut(name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
        definition.set_dsl_text(dsl_text.to_string());
        Ok(())
    }
}
