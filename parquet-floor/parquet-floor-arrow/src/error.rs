use arrow::error::ArrowError;
use parquet_floor_core::ValueTypeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArrowConvertError {
    #[error("schema node '{node}' has no Arrow representation: {detail}")]
    UnsupportedSchema { node: String, detail: String },
    #[error("required field '{field}' has no value")]
    MissingRequired { field: String },
    #[error("value type mismatch: {0}")]
    ValueType(#[from] ValueTypeError),
    #[error(transparent)]
    Arrow(#[from] ArrowError),
}

impl ArrowConvertError {
    pub(crate) fn unsupported(node: &str, detail: impl Into<String>) -> Self {
        Self::UnsupportedSchema {
            node: node.to_string(),
            detail: detail.into(),
        }
    }
}
