//! Conversion from record trees ([`Group`]) to an Arrow `RecordBatch`.
//!
//! The batch schema is [`schema_to_arrow`](crate::schema_to_arrow) of the
//! record schema, so every top-level child of the schema root becomes one
//! column.

mod append;
mod builder;
mod scalar;

use std::sync::Arc;

use arrow::array::ArrayRef;
use arrow::datatypes::DataType;
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use parquet_floor_core::{Group, SchemaNode};

use crate::ArrowConvertError;

/// Convert records to a `RecordBatch` shaped by `schema`.
///
/// Entries of a record that the schema does not name are ignored. An empty
/// `records` slice produces an empty batch.
///
/// # Errors
/// - [`ArrowConvertError::UnsupportedSchema`] if the schema has no Arrow form.
/// - [`ArrowConvertError::MissingRequired`] if a required field is absent.
/// - [`ArrowConvertError::ValueType`] if a value does not match its node.
pub fn records_to_record_batch(
    schema: &SchemaNode,
    records: &[Group],
) -> Result<RecordBatch, ArrowConvertError> {
    let arrow_schema = Arc::new(crate::schema_to_arrow(schema)?);
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(arrow_schema.fields().len());

    for (node, field) in schema.children().iter().zip(arrow_schema.fields().iter()) {
        let capacity = match field.data_type() {
            DataType::List(_) => records.len().saturating_mul(4),
            _ => records.len(),
        };
        let mut builder = builder::make_builder(field.name(), field.data_type(), capacity)?;
        for record in records {
            append::append_field(&mut builder, node, field, record.get(node.name()), false)?;
        }
        arrays.push(builder.finish());
    }

    let options = RecordBatchOptions::new().with_row_count(Some(records.len()));
    Ok(RecordBatch::try_new_with_options(
        arrow_schema,
        arrays,
        &options,
    )?)
}
