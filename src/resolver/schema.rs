use crate::error::SchemaError;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::future::Future;

/// One declared input of an external method.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
}

impl InputField {
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
        }
    }
}

/// The external capability that describes a product method's inputs.
///
/// Implementations may perform I/O; the editor never blocks on the returned future.
pub trait MethodSchemaSource {
    fn get_method_input_fields(
        &self,
        product: &str,
        method: &str,
    ) -> impl Future<Output = Result<Vec<InputField>, SchemaError>>;
}

/// A fixed catalogue of method signatures, e.g. loaded from a JSON file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaticSchemaSource {
    products: AHashMap<String, AHashMap<String, Vec<InputField>>>,
}

impl StaticSchemaSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_method(
        mut self,
        product: impl Into<String>,
        method: impl Into<String>,
        fields: Vec<InputField>,
    ) -> Self {
        self.products
            .entry(product.into())
            .or_default()
            .insert(method.into(), fields);
        self
    }

    /// Parses `{ "product": { "method": [ { "name": ..., "type": ... } ] } }`.
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        serde_json::from_str(json).map_err(|e| SchemaError::Unavailable(e.to_string()))
    }

    fn lookup(&self, product: &str, method: &str) -> Result<Vec<InputField>, SchemaError> {
        self.products
            .get(product)
            .and_then(|methods| methods.get(method))
            .cloned()
            .ok_or_else(|| SchemaError::UnknownMethod {
                product: product.to_string(),
                method: method.to_string(),
            })
    }
}

impl MethodSchemaSource for StaticSchemaSource {
    async fn get_method_input_fields(
        &self,
        product: &str,
        method: &str,
    ) -> Result<Vec<InputField>, SchemaError> {
        self.lookup(product, method)
    }
}
