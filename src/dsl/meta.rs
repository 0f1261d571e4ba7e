use serde::{Deserialize, Serialize};

/// Host-supplied descriptive data, echoed verbatim into the generated header.
///
/// Rule documents read `name`, `priority` and `trigger`; action documents read
/// `name`, `entity_type`, `description` and `parameters`. Fields the current mode does
/// not use are ignored by the generator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub priority: Option<i64>,
    #[serde(default)]
    pub trigger: Option<TriggerSpec>,
    #[serde(default, alias = "entityType")]
    pub entity_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parameters: Vec<ActionParameter>,
}

impl EditorMeta {
    pub fn rule(name: impl Into<String>, priority: i64, trigger: TriggerSpec) -> Self {
        Self {
            name: name.into(),
            priority: Some(priority),
            trigger: Some(trigger),
            ..Self::default()
        }
    }

    pub fn action(name: impl Into<String>, entity_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entity_type: Some(entity_type.into()),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_parameter(mut self, parameter: ActionParameter) -> Self {
        self.parameters.push(parameter);
        self
    }
}

/// The `ON <type>(<entity>[.<property>])` line of a rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerSpec {
    #[serde(rename = "type")]
    pub kind: String,
    pub entity: String,
    #[serde(default)]
    pub property: Option<String>,
}

impl TriggerSpec {
    pub fn new(kind: impl Into<String>, entity: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            entity: entity.into(),
            property: None,
        }
    }

    pub fn on_property(mut self, property: impl Into<String>) -> Self {
        self.property = Some(property.into());
        self
    }
}

/// A typed action parameter, rendered as `name: type` or `name: type?`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: String,
    #[serde(default)]
    pub optional: bool,
}

impl ActionParameter {
    pub fn required(name: impl Into<String>, param_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param_type: param_type.into(),
            optional: false,
        }
    }

    pub fn optional(name: impl Into<String>, param_type: impl Into<String>) -> Self {
        Self {
            optional: true,
            ..Self::required(name, param_type)
        }
    }
}
