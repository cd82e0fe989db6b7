use std::sync::Arc;

use arrow::datatypes::{DataType, Field, Schema, TimeUnit as ArrowTimeUnit};
use parquet_floor_core::{
    LIST_ELEMENT_NAME, LogicalType, PhysicalType, Repetition, SchemaNode, TimeUnit,
};

use crate::ArrowConvertError;

/// Converts a schema tree into an Arrow `Schema`, one top-level field per
/// child of `root`.
///
/// LIST-annotated groups and bare `repeated` nodes become `List` fields whose
/// item is named `element`; other groups become `Struct` fields.
pub fn schema_to_arrow(root: &SchemaNode) -> Result<Schema, ArrowConvertError> {
    let fields = root
        .children()
        .iter()
        .map(node_to_field)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Schema::new(fields))
}

pub(crate) fn node_to_field(node: &SchemaNode) -> Result<Field, ArrowConvertError> {
    let repetition = node
        .repetition()
        .ok_or_else(|| ArrowConvertError::unsupported(node.name(), "schema element is missing"))?;

    if repetition == Repetition::Repeated {
        let item = Field::new(LIST_ELEMENT_NAME, node_datatype(node)?, false);
        return Ok(Field::new(
            node.name(),
            DataType::List(Arc::new(item)),
            false,
        ));
    }
    Ok(Field::new(
        node.name(),
        node_datatype(node)?,
        repetition == Repetition::Optional,
    ))
}

/// Data type of a single (non-repeated) occurrence of `node`.
fn node_datatype(node: &SchemaNode) -> Result<DataType, ArrowConvertError> {
    if node.is_list() {
        let element = node
            .list_element()
            .map_err(|e| ArrowConvertError::unsupported(node.name(), e.to_string()))?;
        let item = node_to_field(element)?;
        return Ok(DataType::List(Arc::new(item)));
    }
    if node.logical_type() == Some(LogicalType::Map) {
        return Err(ArrowConvertError::unsupported(
            node.name(),
            "MAP is not supported",
        ));
    }

    let Some(physical) = node.physical_type() else {
        let fields = node
            .children()
            .iter()
            .map(node_to_field)
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(DataType::Struct(fields.into()));
    };

    let logical = node.logical_type();
    let dt = match physical {
        PhysicalType::Boolean => DataType::Boolean,
        PhysicalType::Int32 if logical == Some(LogicalType::Date) => DataType::Date32,
        PhysicalType::Int32 => DataType::Int32,
        PhysicalType::Int64 => match logical {
            Some(LogicalType::Timestamp(unit)) => DataType::Timestamp(
                arrow_time_unit(unit),
                Some(Arc::from(crate::TIMESTAMP_TZ)),
            ),
            _ => DataType::Int64,
        },
        PhysicalType::Float => DataType::Float32,
        PhysicalType::Double => DataType::Float64,
        PhysicalType::ByteArray => match logical {
            Some(LogicalType::String | LogicalType::Enum | LogicalType::Json) => DataType::Utf8,
            _ => DataType::Binary,
        },
        PhysicalType::FixedLenByteArray(len) => {
            let len = i32::try_from(len).map_err(|_| {
                ArrowConvertError::unsupported(node.name(), format!("byte width {len} too large"))
            })?;
            DataType::FixedSizeBinary(len)
        }
        PhysicalType::Int96 => {
            return Err(ArrowConvertError::unsupported(
                node.name(),
                "INT96 is not supported",
            ));
        }
    };
    Ok(dt)
}

fn arrow_time_unit(unit: TimeUnit) -> ArrowTimeUnit {
    match unit {
        TimeUnit::Millis => ArrowTimeUnit::Millisecond,
        TimeUnit::Micros => ArrowTimeUnit::Microsecond,
        TimeUnit::Nanos => ArrowTimeUnit::Nanosecond,
    }
}
