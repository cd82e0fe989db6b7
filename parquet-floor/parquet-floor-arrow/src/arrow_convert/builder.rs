use arrow::array::{
    ArrayBuilder, BinaryBuilder, BooleanBuilder, Date32Builder, FixedSizeBinaryBuilder,
    Float32Builder, Float64Builder, Int32Builder, Int64Builder, ListBuilder, StringBuilder,
    StructBuilder, TimestampMicrosecondBuilder, TimestampMillisecondBuilder,
    TimestampNanosecondBuilder,
};
use arrow::datatypes::{DataType, Field, TimeUnit};

use crate::ArrowConvertError;

pub(super) fn make_builder(
    name: &str,
    dt: &DataType,
    capacity: usize,
) -> Result<Box<dyn ArrayBuilder>, ArrowConvertError> {
    Ok(match dt {
        DataType::Boolean => Box::new(BooleanBuilder::with_capacity(capacity)),
        DataType::Int32 => Box::new(Int32Builder::with_capacity(capacity)),
        DataType::Date32 => Box::new(Date32Builder::with_capacity(capacity)),
        DataType::Int64 => Box::new(Int64Builder::with_capacity(capacity)),
        DataType::Float32 => Box::new(Float32Builder::with_capacity(capacity)),
        DataType::Float64 => Box::new(Float64Builder::with_capacity(capacity)),
        DataType::Utf8 => Box::new(StringBuilder::with_capacity(capacity, 64)),
        DataType::Binary => Box::new(BinaryBuilder::with_capacity(capacity, 64)),
        DataType::FixedSizeBinary(width) => {
            Box::new(FixedSizeBinaryBuilder::with_capacity(capacity, *width))
        }
        DataType::Timestamp(TimeUnit::Millisecond, _) => Box::new(
            TimestampMillisecondBuilder::with_capacity(capacity).with_data_type(dt.clone()),
        ),
        DataType::Timestamp(TimeUnit::Microsecond, _) => Box::new(
            TimestampMicrosecondBuilder::with_capacity(capacity).with_data_type(dt.clone()),
        ),
        DataType::Timestamp(TimeUnit::Nanosecond, _) => Box::new(
            TimestampNanosecondBuilder::with_capacity(capacity).with_data_type(dt.clone()),
        ),
        DataType::List(field) => {
            let child = make_builder(field.name(), field.data_type(), capacity)?;
            Box::new(ListBuilder::new(child).with_field(field.clone()))
        }
        DataType::Struct(fields) => {
            let child_builders = fields
                .iter()
                .map(|f| make_builder(f.name(), f.data_type(), capacity))
                .collect::<Result<Vec<_>, _>>()?;
            let fields_vec: Vec<Field> = fields.iter().map(|f| f.as_ref().clone()).collect();
            Box::new(StructBuilder::new(fields_vec, child_builders))
        }
        other => {
            return Err(ArrowConvertError::unsupported(
                name,
                format!("no builder for data type {other}"),
            ));
        }
    })
}
