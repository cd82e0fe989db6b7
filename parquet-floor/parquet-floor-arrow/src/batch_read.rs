//! Conversion from an Arrow `RecordBatch` back to record trees.

use arrow::{
    array::{Array, AsArray, GenericListArray},
    datatypes::{
        DataType, Date32Type, Float32Type, Float64Type, Int32Type, Int64Type, TimeUnit,
        TimestampMicrosecondType, TimestampMillisecondType, TimestampNanosecondType,
    },
    record_batch::RecordBatch,
};
use parquet_floor_core::{Group, SchemaNode, Value};

use crate::ArrowConvertError;

/// Convert every row of `batch` into a record shaped by `schema`.
///
/// Columns are looked up by the names of the schema root's children; columns
/// the schema does not name are ignored. Null values are omitted from the
/// record, LIST columns become `{"list": [{"element": v}, ...]}` and bare
/// `repeated` columns become a plain [`Value::List`], empty when the column
/// holds an empty list.
pub fn record_batch_to_records(
    schema: &SchemaNode,
    batch: &RecordBatch,
) -> Result<Vec<Group>, ArrowConvertError> {
    let mut records = vec![Group::new(); batch.num_rows()];
    for node in schema.children() {
        let column = batch.column_by_name(node.name()).ok_or_else(|| {
            ArrowConvertError::unsupported(node.name(), "column is missing from the batch")
        })?;
        for (row, record) in records.iter_mut().enumerate() {
            if let Some(value) = read_field(node, column.as_ref(), row)? {
                record.insert(node.name(), value);
            }
        }
    }
    Ok(records)
}

fn read_field(
    node: &SchemaNode,
    array: &dyn Array,
    row: usize,
) -> Result<Option<Value>, ArrowConvertError> {
    if !node.is_repeated() {
        return read_occurrence(node, array, row);
    }

    let list = as_list(node, array)?;
    if list.is_null(row) {
        return Ok(None);
    }
    let items = list.value(row);
    let values = (0..items.len())
        .map(|i| {
            read_occurrence(node, items.as_ref(), i)?.ok_or_else(|| {
                ArrowConvertError::MissingRequired {
                    field: node.name().to_string(),
                }
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Some(Value::List(values)))
}

fn read_occurrence(
    node: &SchemaNode,
    array: &dyn Array,
    row: usize,
) -> Result<Option<Value>, ArrowConvertError> {
    if array.is_null(row) {
        return Ok(None);
    }

    if node.is_list() {
        let element = node
            .list_element()
            .map_err(|e| ArrowConvertError::unsupported(node.name(), e.to_string()))?;
        let items = as_list(node, array)?.value(row);
        let values = (0..items.len())
            .map(|i| read_field(element, items.as_ref(), i))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(Some(Value::list_of(values)));
    }

    let value = match array.data_type() {
        DataType::Boolean => Value::Bool(array.as_boolean().value(row)),
        DataType::Int32 => Value::Int32(array.as_primitive::<Int32Type>().value(row)),
        DataType::Date32 => Value::Int32(array.as_primitive::<Date32Type>().value(row)),
        DataType::Int64 => Value::Int64(array.as_primitive::<Int64Type>().value(row)),
        DataType::Timestamp(TimeUnit::Millisecond, _) => {
            Value::Int64(array.as_primitive::<TimestampMillisecondType>().value(row))
        }
        DataType::Timestamp(TimeUnit::Microsecond, _) => {
            Value::Int64(array.as_primitive::<TimestampMicrosecondType>().value(row))
        }
        DataType::Timestamp(TimeUnit::Nanosecond, _) => {
            Value::Int64(array.as_primitive::<TimestampNanosecondType>().value(row))
        }
        DataType::Float32 => Value::Float32(array.as_primitive::<Float32Type>().value(row)),
        DataType::Float64 => Value::Float64(array.as_primitive::<Float64Type>().value(row)),
        DataType::Utf8 => Value::byte_array(array.as_string::<i32>().value(row)),
        DataType::LargeUtf8 => Value::byte_array(array.as_string::<i64>().value(row)),
        DataType::Utf8View => Value::byte_array(array.as_string_view().value(row)),
        DataType::Binary => Value::byte_array(array.as_binary::<i32>().value(row)),
        DataType::LargeBinary => Value::byte_array(array.as_binary::<i64>().value(row)),
        DataType::BinaryView => Value::byte_array(array.as_binary_view().value(row)),
        DataType::FixedSizeBinary(_) => {
            Value::byte_array(array.as_fixed_size_binary().value(row))
        }
        DataType::Struct(_) => {
            let columns = array.as_struct();
            let mut group = Group::new();
            for child in node.children() {
                let column = columns.column_by_name(child.name()).ok_or_else(|| {
                    ArrowConvertError::unsupported(child.name(), "struct field is missing")
                })?;
                if let Some(value) = read_field(child, column.as_ref(), row)? {
                    group.insert(child.name(), value);
                }
            }
            Value::Group(group)
        }
        other => {
            return Err(ArrowConvertError::unsupported(
                node.name(),
                format!("no conversion from data type {other}"),
            ));
        }
    };
    Ok(Some(value))
}

fn as_list<'a>(
    node: &SchemaNode,
    array: &'a dyn Array,
) -> Result<&'a GenericListArray<i32>, ArrowConvertError> {
    array.as_list_opt::<i32>().ok_or_else(|| {
        ArrowConvertError::unsupported(
            node.name(),
            format!("expected a List column, found {}", array.data_type()),
        )
    })
}
