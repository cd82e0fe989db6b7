use arrow::{
    array::{
        ArrayBuilder, BinaryBuilder, BooleanBuilder, Date32Builder, FixedSizeBinaryBuilder,
        Float32Builder, Float64Builder, Int32Builder, Int64Builder, ListBuilder, StringBuilder,
        StructBuilder, TimestampMicrosecondBuilder, TimestampMillisecondBuilder,
        TimestampNanosecondBuilder,
    },
    datatypes::{DataType, Field},
};
use parquet_floor_core::{LIST_ELEMENT_NAME, LIST_GROUP_NAME, Repetition, SchemaNode, Value};

use super::scalar::{ScalarValue, scalar_value_for_datatype};
use crate::ArrowConvertError;

macro_rules! cast_builder {
    ($b:expr, $node:expr, $T:ty) => {
        $b.as_any_mut().downcast_mut::<$T>().ok_or_else(|| {
            ArrowConvertError::unsupported(
                $node.name(),
                concat!("expected builder type: ", stringify!($T)),
            )
        })?
    };
}

fn append_scalar_dyn(
    builder: &mut Box<dyn ArrayBuilder>,
    node: &SchemaNode,
    scalar: &ScalarValue<'_>,
) -> Result<(), ArrowConvertError> {
    match scalar {
        ScalarValue::Boolean(v) => cast_builder!(builder, node, BooleanBuilder).append_option(*v),
        ScalarValue::Int32(v) => cast_builder!(builder, node, Int32Builder).append_option(*v),
        ScalarValue::Date32(v) => cast_builder!(builder, node, Date32Builder).append_option(*v),
        ScalarValue::Int64(v) => cast_builder!(builder, node, Int64Builder).append_option(*v),
        ScalarValue::Float32(v) => cast_builder!(builder, node, Float32Builder).append_option(*v),
        ScalarValue::Float64(v) => cast_builder!(builder, node, Float64Builder).append_option(*v),
        ScalarValue::Utf8(v) => cast_builder!(builder, node, StringBuilder).append_option(*v),
        ScalarValue::Binary(v) => cast_builder!(builder, node, BinaryBuilder).append_option(*v),
        ScalarValue::FixedSizeBinary(v) => {
            let b = cast_builder!(builder, node, FixedSizeBinaryBuilder);
            match v {
                Some(bytes) => b.append_value(bytes)?,
                None => b.append_null(),
            }
        }
        ScalarValue::TimestampMillisecond(v) => {
            cast_builder!(builder, node, TimestampMillisecondBuilder).append_option(*v)
        }
        ScalarValue::TimestampMicrosecond(v) => {
            cast_builder!(builder, node, TimestampMicrosecondBuilder).append_option(*v)
        }
        ScalarValue::TimestampNanosecond(v) => {
            cast_builder!(builder, node, TimestampNanosecondBuilder).append_option(*v)
        }
    }
    Ok(())
}

/// Append the value of the field described by `node` to `builder`.
///
/// `value` is the entry found in the parent group, if any. `masked` is set
/// below a null struct, where a missing required value is not an error.
pub(super) fn append_field(
    builder: &mut Box<dyn ArrayBuilder>,
    node: &SchemaNode,
    field: &Field,
    value: Option<&Value>,
    masked: bool,
) -> Result<(), ArrowConvertError> {
    let value = value.filter(|v| !v.is_null());
    let repetition = node
        .repetition()
        .ok_or_else(|| ArrowConvertError::unsupported(node.name(), "schema element is missing"))?;

    match repetition {
        Repetition::Repeated => {
            let DataType::List(item) = field.data_type() else {
                return Err(ArrowConvertError::unsupported(
                    node.name(),
                    "repeated node requires a List field",
                ));
            };
            let b = cast_builder!(builder, node, ListBuilder<Box<dyn ArrayBuilder>>);
            // Absent repeated data is an empty list.
            let items = value.map(Value::try_list).transpose()?.flatten();
            for entry in items.unwrap_or_default() {
                if entry.is_null() {
                    return Err(ArrowConvertError::MissingRequired {
                        field: node.name().to_string(),
                    });
                }
                append_occurrence(b.values(), node, item.data_type(), Some(entry), false)?;
            }
            b.append(true);
            Ok(())
        }
        Repetition::Required if value.is_none() && !masked => {
            Err(ArrowConvertError::MissingRequired {
                field: node.name().to_string(),
            })
        }
        _ => append_occurrence(builder, node, field.data_type(), value, masked),
    }
}

/// Append one occurrence of `node`, or a null when `value` is `None`.
fn append_occurrence(
    builder: &mut Box<dyn ArrayBuilder>,
    node: &SchemaNode,
    dt: &DataType,
    value: Option<&Value>,
    masked: bool,
) -> Result<(), ArrowConvertError> {
    if node.is_list() {
        return append_list(builder, node, dt, value);
    }

    if let Some(scalar) = scalar_value_for_datatype(dt, value.unwrap_or(&Value::Null))? {
        return append_scalar_dyn(builder, node, &scalar);
    }

    let DataType::Struct(fields) = dt else {
        return Err(ArrowConvertError::unsupported(
            node.name(),
            format!("no conversion for data type {dt}"),
        ));
    };
    let b = cast_builder!(builder, node, StructBuilder);
    let group = value.map(Value::try_group).transpose()?.flatten();
    for (i, (child, child_field)) in node.children().iter().zip(fields.iter()).enumerate() {
        let child_value = group.and_then(|g| g.get(child.name()));
        append_field(
            &mut b.field_builders_mut()[i],
            child,
            child_field,
            child_value,
            masked || group.is_none(),
        )?;
    }
    b.append(group.is_some());
    Ok(())
}

/// Append a LIST-annotated group: `{"list": [{"element": v}, ...]}` becomes
/// one Arrow list entry.
fn append_list(
    builder: &mut Box<dyn ArrayBuilder>,
    node: &SchemaNode,
    dt: &DataType,
    value: Option<&Value>,
) -> Result<(), ArrowConvertError> {
    let DataType::List(item) = dt else {
        return Err(ArrowConvertError::unsupported(
            node.name(),
            "LIST node requires a List field",
        ));
    };
    let element = node
        .list_element()
        .map_err(|e| ArrowConvertError::unsupported(node.name(), e.to_string()))?;
    let b = cast_builder!(builder, node, ListBuilder<Box<dyn ArrayBuilder>>);

    let Some(value) = value else {
        b.append(false);
        return Ok(());
    };
    let outer = value
        .try_group()?
        .ok_or_else(|| value.type_mismatch("Group"))?;
    let wrappers: &[Value] = match outer.get(LIST_GROUP_NAME) {
        Some(list) => list.try_list()?.unwrap_or_default(),
        None => &[],
    };
    for wrapper in wrappers {
        let element_value = wrapper
            .try_group()?
            .and_then(|g| g.get(LIST_ELEMENT_NAME));
        append_field(b.values(), element, item, element_value, false)?;
    }
    b.append(true);
    Ok(())
}
