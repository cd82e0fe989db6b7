//! Error types for the Parquet writer and reader.

use arrow::error::ArrowError;
use parquet::errors::ParquetError;
use parquet_floor_arrow::ArrowConvertError;
use parquet_floor_core::{MarshalError, SchemaError};

/// Errors produced by [`FloorWriter`](crate::FloorWriter),
/// [`FloorReader`](crate::FloorReader) and the schema adapter.
#[derive(Debug, thiserror::Error)]
pub enum FloorError {
    /// A record could not be marshalled against the schema.
    #[error(transparent)]
    Marshal(#[from] MarshalError),

    /// The schema tree is structurally invalid.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Records could not be converted to or from an Arrow `RecordBatch`.
    #[error(transparent)]
    Convert(#[from] ArrowConvertError),

    /// Error from the underlying `parquet` crate (schema text, encoding, footer, ...).
    #[error(transparent)]
    Parquet(#[from] ParquetError),

    /// Error from `arrow` while decoding a record batch.
    #[error(transparent)]
    Arrow(#[from] ArrowError),
}
