use thiserror::Error;

/// Failures of the external method-schema lookup used by `CALL` blocks.
///
/// These only ever affect the block that asked; the rest of the tree is untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Method schema service unavailable: {0}")]
    Unavailable(String),

    #[error("Product '{product}' has no method '{method}'")]
    UnknownMethod { product: String, method: String },
}

/// Errors that can occur while saving or restoring a session snapshot.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Snapshot serialization failed: {0}")]
    Encode(String),

    #[error("Snapshot deserialization failed: {0}")]
    Decode(String),

    #[error("Snapshot file '{path}' could not be accessed: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by a rule/action definition store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("No definition named '{0}'")]
    NotFound(String),

    #[error("Failed to parse definition JSON: {0}")]
    JsonParseError(String),
}
