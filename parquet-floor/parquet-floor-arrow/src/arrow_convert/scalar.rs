use arrow::datatypes::{DataType, TimeUnit};
use parquet_floor_core::{Value, ValueTypeError};

pub(super) enum ScalarValue<'a> {
    Boolean(Option<bool>),
    Int32(Option<i32>),
    Date32(Option<i32>),
    Int64(Option<i64>),
    Float32(Option<f32>),
    Float64(Option<f64>),
    Utf8(Option<&'a str>),
    Binary(Option<&'a [u8]>),
    FixedSizeBinary(Option<&'a [u8]>),
    TimestampMillisecond(Option<i64>),
    TimestampMicrosecond(Option<i64>),
    TimestampNanosecond(Option<i64>),
}

/// Scalar to append for `value` under `dt`, or `None` when `dt` is nested.
pub(super) fn scalar_value_for_datatype<'a>(
    dt: &DataType,
    value: &'a Value,
) -> Result<Option<ScalarValue<'a>>, ValueTypeError> {
    Ok(Some(match dt {
        DataType::Boolean => ScalarValue::Boolean(value.try_bool()?),
        DataType::Int32 => ScalarValue::Int32(value.try_i32()?),
        DataType::Date32 => ScalarValue::Date32(value.try_i32()?),
        DataType::Int64 => ScalarValue::Int64(value.try_i64()?),
        DataType::Float32 => ScalarValue::Float32(value.try_f32()?),
        DataType::Float64 => ScalarValue::Float64(value.try_f64()?),
        DataType::Utf8 => ScalarValue::Utf8(value.try_str()?),
        DataType::Binary => ScalarValue::Binary(value.try_bytes()?),
        DataType::FixedSizeBinary(_) => ScalarValue::FixedSizeBinary(value.try_bytes()?),
        DataType::Timestamp(TimeUnit::Millisecond, _) => {
            ScalarValue::TimestampMillisecond(value.try_i64()?)
        }
        DataType::Timestamp(TimeUnit::Microsecond, _) => {
            ScalarValue::TimestampMicrosecond(value.try_i64()?)
        }
        DataType::Timestamp(TimeUnit::Nanosecond, _) => {
            ScalarValue::TimestampNanosecond(value.try_i64()?)
        }
        _ => return Ok(None),
    }))
}
