//! Depth-first walk of a [`Reflect`] value against a schema tree.

use parquet_floor_core::{FieldSink, MarshalError, MarshalRecord, RecordSink, SchemaNode, coerce};

use crate::reflect::{Reflect, Reflected, StructField};

/// Marshal `value` into `sink`, using `schema` as the record's root node.
///
/// The value must be a struct, or a non-nil `Option` holding one.
pub fn marshal<T>(
    value: &T,
    schema: &SchemaNode,
    sink: &mut dyn RecordSink,
) -> Result<(), MarshalError>
where
    T: Reflect + ?Sized,
{
    let fields = match value.reflect() {
        Reflected::Struct(fields) => fields,
        Reflected::Pointer(Some(inner)) => match inner.reflect() {
            Reflected::Struct(fields) => fields,
            other => return Err(top_level_error(&other)),
        },
        other => return Err(top_level_error(&other)),
    };
    for field in &fields {
        check_kinds(field.name, field.value)?;
    }
    write_struct(fields, schema, sink)
}

/// Reject channels and functions anywhere below `value`, before any schema
/// node is consulted.
fn check_kinds(name: &str, value: &dyn Reflect) -> Result<(), MarshalError> {
    match deref(value.reflect()) {
        Some(Reflected::Unsupported(kind)) => Err(unsupported(name, kind)),
        Some(Reflected::Struct(fields)) => fields
            .iter()
            .try_for_each(|field| check_kinds(field.name, field.value)),
        Some(Reflected::Sequence(items)) => {
            items.into_iter().try_for_each(|item| check_kinds(name, item))
        }
        _ => Ok(()),
    }
}

/// [`MarshalRecord`] adapter over a borrowed native value.
pub struct NativeRecord<'a, T: ?Sized>(pub &'a T);

impl<T: Reflect + ?Sized> MarshalRecord for NativeRecord<'_, T> {
    fn marshal_record(
        &self,
        schema: &SchemaNode,
        sink: &mut dyn RecordSink,
    ) -> Result<(), MarshalError> {
        marshal(self.0, schema, sink)
    }
}

fn top_level_error(reflected: &Reflected<'_>) -> MarshalError {
    MarshalError::TopLevelType {
        kind: reflected.kind_name().to_string(),
    }
}

fn write_struct(
    fields: Vec<StructField<'_>>,
    node: &SchemaNode,
    sink: &mut dyn RecordSink,
) -> Result<(), MarshalError> {
    for field in fields {
        write_field(field, node, sink)?;
    }
    Ok(())
}

fn write_field(
    field: StructField<'_>,
    parent: &SchemaNode,
    sink: &mut dyn RecordSink,
) -> Result<(), MarshalError> {
    let Some(reflected) = deref(field.value.reflect()) else {
        tracing::trace!(field = field.name, "skipping nil field");
        return Ok(());
    };
    let node = coerce::child_node(parent, field.name)?;
    write_value(sink.add_field(field.name), node, reflected)
}

/// Follow pointers down to a concrete value; `None` if any of them is nil.
fn deref(mut reflected: Reflected<'_>) -> Option<Reflected<'_>> {
    loop {
        match reflected {
            Reflected::Pointer(None) => return None,
            Reflected::Pointer(Some(inner)) => reflected = inner.reflect(),
            other => return Some(other),
        }
    }
}

fn write_value(
    field: &mut dyn FieldSink,
    node: &SchemaNode,
    reflected: Reflected<'_>,
) -> Result<(), MarshalError> {
    match reflected {
        Reflected::Scalar(scalar) => coerce::write_scalar(field, node, scalar),
        Reflected::Timestamp { seconds, nanos } => {
            let unit = coerce::timestamp_unit(node)?;
            coerce::write_timestamp(field, seconds, nanos, unit);
            Ok(())
        }
        Reflected::Struct(fields) => {
            coerce::require_group(node)?;
            write_struct(fields, node, field.group())
        }
        Reflected::Sequence(items) => write_sequence(field, node, items),
        Reflected::Unsupported(kind) => Err(unsupported(node.name(), kind)),
        Reflected::Pointer(inner) => match inner.and_then(|p| deref(p.reflect())) {
            Some(reflected) => write_value(field, node, reflected),
            None => Ok(()),
        },
    }
}

fn write_sequence(
    field: &mut dyn FieldSink,
    node: &SchemaNode,
    items: Vec<&dyn Reflect>,
) -> Result<(), MarshalError> {
    if node.is_list() {
        return coerce::write_list(field, node, items, |wrapper, element, item| {
            match deref(item.reflect()) {
                Some(reflected) => {
                    write_value(wrapper.add_field(element.name()), element, reflected)
                }
                None => Ok(()),
            }
        });
    }

    coerce::write_repeated(field, node, items, |slot, item| {
        match deref(item.reflect()) {
            Some(Reflected::Sequence(_)) => Err(MarshalError::schema_mismatch(
                node.name(),
                "nested sequence below a repeated node without LIST annotation",
            )),
            Some(reflected) => write_value(slot, node, reflected),
            None => Err(MarshalError::schema_mismatch(
                node.name(),
                "nil element in a repeated node without LIST annotation",
            )),
        }
    })
}

fn unsupported(field: &str, kind: &str) -> MarshalError {
    MarshalError::UnsupportedKind {
        field: field.to_string(),
        kind: kind.to_string(),
    }
}
