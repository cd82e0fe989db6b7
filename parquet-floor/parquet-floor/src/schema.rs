//! Schema adapter over `parquet`'s message-type parser.

use parquet::{
    basic::{
        ConvertedType, LogicalType as ParquetLogicalType, Repetition as ParquetRepetition,
        TimeUnit as ParquetTimeUnit, Type as ParquetPhysicalType,
    },
    schema::{parser::parse_message_type, types::Type},
};
use parquet_floor_core::{LogicalType, PhysicalType, Repetition, SchemaNode, TimeUnit};

use crate::FloorError;

/// Parse Parquet message-type text into a validated schema tree.
///
/// ```rust
/// let schema = parquet_floor::parse_schema(
///     "message m { required int64 foo; optional binary bar (STRING); repeated int32 baz; }",
/// )
/// .unwrap();
/// assert_eq!(schema.children().len(), 3);
/// ```
pub fn parse_schema(text: &str) -> Result<SchemaNode, FloorError> {
    let message = parse_message_type(text)?;
    schema_from_parquet(&message)
}

/// Convert a `parquet` message type into a validated schema tree.
///
/// Annotations without a counterpart in [`LogicalType`] (`DECIMAL`,
/// `INTEGER`, `TIME`, ...) are dropped.
pub fn schema_from_parquet(message: &Type) -> Result<SchemaNode, FloorError> {
    let children = message
        .get_fields()
        .iter()
        .map(|field| convert_node(field))
        .collect::<Result<Vec<_>, _>>()?;
    let root = SchemaNode::message(message.name(), children);
    root.validate()?;
    Ok(root)
}

fn convert_node(ty: &Type) -> Result<SchemaNode, FloorError> {
    let info = ty.get_basic_info();
    let repetition = if info.has_repetition() {
        match info.repetition() {
            ParquetRepetition::REQUIRED => Repetition::Required,
            ParquetRepetition::OPTIONAL => Repetition::Optional,
            ParquetRepetition::REPEATED => Repetition::Repeated,
        }
    } else {
        Repetition::Required
    };

    let node = match ty {
        Type::PrimitiveType {
            physical_type,
            type_length,
            ..
        } => {
            let physical = match physical_type {
                ParquetPhysicalType::BOOLEAN => PhysicalType::Boolean,
                ParquetPhysicalType::INT32 => PhysicalType::Int32,
                ParquetPhysicalType::INT64 => PhysicalType::Int64,
                ParquetPhysicalType::INT96 => PhysicalType::Int96,
                ParquetPhysicalType::FLOAT => PhysicalType::Float,
                ParquetPhysicalType::DOUBLE => PhysicalType::Double,
                ParquetPhysicalType::BYTE_ARRAY => PhysicalType::ByteArray,
                ParquetPhysicalType::FIXED_LEN_BYTE_ARRAY => {
                    PhysicalType::FixedLenByteArray(usize::try_from(*type_length).unwrap_or(0))
                }
            };
            SchemaNode::primitive(info.name(), repetition, physical)
        }
        Type::GroupType { fields, .. } => {
            let children = fields
                .iter()
                .map(|field| convert_node(field))
                .collect::<Result<Vec<_>, _>>()?;
            SchemaNode::group(info.name(), repetition, children)
        }
    };

    Ok(match annotation(ty) {
        Some(logical_type) => node.with_logical_type(logical_type),
        None => node,
    })
}

fn annotation(ty: &Type) -> Option<LogicalType> {
    let info = ty.get_basic_info();
    let from_logical = match info.logical_type_ref() {
        Some(ParquetLogicalType::List) => Some(LogicalType::List),
        Some(ParquetLogicalType::Map) => Some(LogicalType::Map),
        Some(ParquetLogicalType::String) => Some(LogicalType::String),
        Some(ParquetLogicalType::Enum) => Some(LogicalType::Enum),
        Some(ParquetLogicalType::Uuid) => Some(LogicalType::Uuid),
        Some(ParquetLogicalType::Json) => Some(LogicalType::Json),
        Some(ParquetLogicalType::Date) => Some(LogicalType::Date),
        Some(ParquetLogicalType::Timestamp { unit, .. }) => Some(LogicalType::Timestamp(match unit {
            ParquetTimeUnit::MILLIS { .. } => TimeUnit::Millis,
            ParquetTimeUnit::MICROS { .. } => TimeUnit::Micros,
            ParquetTimeUnit::NANOS { .. } => TimeUnit::Nanos,
        })),
        Some(other) => {
            tracing::debug!(field = info.name(), annotation = ?other, "dropping unsupported annotation");
            None
        }
        None => None,
    };
    if from_logical.is_some() {
        return from_logical;
    }

    match info.converted_type() {
        ConvertedType::LIST => Some(LogicalType::List),
        ConvertedType::MAP | ConvertedType::MAP_KEY_VALUE => Some(LogicalType::Map),
        ConvertedType::UTF8 => Some(LogicalType::String),
        ConvertedType::ENUM => Some(LogicalType::Enum),
        ConvertedType::JSON => Some(LogicalType::Json),
        ConvertedType::DATE => Some(LogicalType::Date),
        ConvertedType::TIMESTAMP_MILLIS => Some(LogicalType::Timestamp(TimeUnit::Millis)),
        ConvertedType::TIMESTAMP_MICROS => Some(LogicalType::Timestamp(TimeUnit::Micros)),
        _ => None,
    }
}
