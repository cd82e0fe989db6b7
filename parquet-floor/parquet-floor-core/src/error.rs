//! Error types for the marshalling layer.

/// Error returned when a source value cannot be marshalled against a schema.
///
/// Every variant aborts the record being marshalled; partial writes already
/// made into the sink are left for the caller to discard.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarshalError {
    /// The root source value is not a struct (or is a nil pointer to one).
    #[error("top-level value must be a struct, got {kind}")]
    TopLevelType { kind: String },

    /// The source and the schema disagree on the shape of a field.
    #[error("schema mismatch for field '{field}': {detail}")]
    SchemaMismatch { field: String, detail: String },

    /// A schema node was resolved but carries no schema element.
    #[error("no schema element present on the schema node for field '{field}'")]
    MissingSchemaElement { field: String },

    /// A source value has a kind with no Parquet representation.
    #[error("unsupported kind {kind} for field '{field}'")]
    UnsupportedKind { field: String, kind: String },

    /// A value violates the logical type annotated on its schema node.
    #[error("logical type violation for field '{field}': {detail}")]
    LogicalTypeViolation { field: String, detail: String },
}

impl MarshalError {
    pub fn schema_mismatch(field: &str, detail: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            field: field.to_string(),
            detail: detail.into(),
        }
    }

    pub fn logical_type_violation(field: &str, detail: impl Into<String>) -> Self {
        Self::LogicalTypeViolation {
            field: field.to_string(),
            detail: detail.into(),
        }
    }
}

/// A schema tree is structurally invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// A node annotated as LIST does not follow the `list` / `element` layout.
    #[error("node '{node}' is annotated as LIST but {detail}")]
    InvalidList { node: String, detail: String },

    /// A group node (no physical type) has no children.
    #[error("group node '{node}' has no children")]
    EmptyGroup { node: String },

    /// A primitive node (with a physical type) has children.
    #[error("primitive node '{node}' has children")]
    PrimitiveWithChildren { node: String },
}

/// A [`Value`](crate::Value) did not have the variant a consumer expected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected {expected}, got {actual}")]
pub struct ValueTypeError {
    pub expected: String,
    pub actual: String,
}

impl ValueTypeError {
    pub fn new(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}
