//! Value coercion rules shared by every marshaller.
//!
//! Each function maps one source value plus the schema node it is written
//! against into sink writes. Nothing here depends on where the value came
//! from, so the native and protobuf walkers behave identically on the same
//! schema.

use crate::{
    config::MarshalConfig,
    error::MarshalError,
    schema::{LIST_GROUP_NAME, LogicalType, SchemaElement, SchemaNode, TimeUnit},
    sink::{FieldSink, RecordSink},
};

pub const NANOS_PER_SECOND: i64 = 1_000_000_000;
pub const UUID_LENGTH: usize = 16;

/// Closed set of scalar source values.
///
/// Integers keep their source signedness; width collapsing happens in
/// [`write_scalar`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar<'a> {
    Bool(bool),
    Int32(i32),
    Int64(i64),
    Uint32(u32),
    Uint64(u64),
    Float32(f32),
    Float64(f64),
    String(&'a str),
    Bytes(&'a [u8]),
}

impl Scalar<'_> {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Scalar::Bool(_) => "bool",
            Scalar::Int32(_) => "int32",
            Scalar::Int64(_) => "int64",
            Scalar::Uint32(_) => "uint32",
            Scalar::Uint64(_) => "uint64",
            Scalar::Float32(_) => "float32",
            Scalar::Float64(_) => "float64",
            Scalar::String(_) => "string",
            Scalar::Bytes(_) => "bytes",
        }
    }
}

/// Look up the schema node for a field of `parent` and make sure it carries
/// a schema element.
pub fn child_node<'s>(parent: &'s SchemaNode, name: &str) -> Result<&'s SchemaNode, MarshalError> {
    let node = parent.child(name).ok_or_else(|| {
        MarshalError::schema_mismatch(
            name,
            format!("no schema node below '{}'", parent.name()),
        )
    })?;
    node.require_element()?;
    Ok(node)
}

/// Write a scalar, collapsing integer widths.
///
/// Unsigned values are reinterpreted as signed of the same width, so values
/// above the signed range wrap.
pub fn write_scalar(
    field: &mut dyn FieldSink,
    node: &SchemaNode,
    scalar: Scalar<'_>,
) -> Result<(), MarshalError> {
    match scalar {
        Scalar::Bool(v) => field.set_bool(v),
        Scalar::Int32(v) => field.set_int32(v),
        Scalar::Uint32(v) => field.set_int32(v as i32),
        Scalar::Int64(v) => field.set_int64(v),
        Scalar::Uint64(v) => field.set_int64(v as i64),
        Scalar::Float32(v) => field.set_float32(v),
        Scalar::Float64(v) => field.set_float64(v),
        Scalar::String(v) => field.set_byte_array(v.as_bytes()),
        Scalar::Bytes(v) => {
            check_uuid(node, v)?;
            field.set_byte_array(v);
        }
    }
    Ok(())
}

/// Bytes written under a UUID-annotated node must be exactly 16 long.
pub fn check_uuid(node: &SchemaNode, bytes: &[u8]) -> Result<(), MarshalError> {
    if node.logical_type() == Some(LogicalType::Uuid) && bytes.len() != UUID_LENGTH {
        return Err(MarshalError::logical_type_violation(
            node.name(),
            format!("field is annotated as UUID but length is {}", bytes.len()),
        ));
    }
    Ok(())
}

/// Resolve an enum number to the name written into the record.
///
/// `name_of` looks up declared value names. Unknown numbers are rendered as
/// `<prefix><number>` when a prefix is configured, otherwise as the name of
/// value 0 (or the bare number if 0 is not declared either).
pub fn resolve_enum(
    number: i32,
    name_of: impl Fn(i32) -> Option<String>,
    config: &MarshalConfig,
) -> String {
    if let Some(name) = name_of(number) {
        return name;
    }
    if !config.unknown_enum_prefix.is_empty() {
        return format!("{}{number}", config.unknown_enum_prefix);
    }
    name_of(0).unwrap_or_else(|| number.to_string())
}

pub fn write_enum(
    field: &mut dyn FieldSink,
    number: i32,
    name_of: impl Fn(i32) -> Option<String>,
    config: &MarshalConfig,
) {
    field.set_byte_array(resolve_enum(number, name_of, config).as_bytes());
}

/// Scale a `seconds` + `nanos` instant to `unit`.
///
/// Uses integer arithmetic on the nanosecond instant; division truncates
/// toward zero.
pub fn timestamp_value(seconds: i64, nanos: i64, unit: TimeUnit) -> i64 {
    seconds
        .wrapping_mul(NANOS_PER_SECOND)
        .wrapping_add(nanos)
        / unit.divisor()
}

/// Unit annotated on a timestamp node; unannotated nodes use nanoseconds.
pub fn timestamp_unit(node: &SchemaNode) -> Result<TimeUnit, MarshalError> {
    match node.logical_type() {
        None => Ok(TimeUnit::Nanos),
        Some(LogicalType::Timestamp(unit)) => Ok(unit),
        Some(other) => Err(MarshalError::logical_type_violation(
            node.name(),
            format!("unknown timestamp type: {other}"),
        )),
    }
}

/// Parse a `TIMESTAMP_*` annotation name carried outside the schema.
pub fn timestamp_unit_from_annotation(field: &str, name: &str) -> Result<TimeUnit, MarshalError> {
    TimeUnit::from_annotation(name).ok_or_else(|| {
        MarshalError::logical_type_violation(field, format!("unknown timestamp type: {name}"))
    })
}

pub fn write_timestamp(field: &mut dyn FieldSink, seconds: i64, nanos: i64, unit: TimeUnit) {
    field.set_int64(timestamp_value(seconds, nanos, unit));
}

/// Write `items` as a LIST: `{"list": [{"element": ...}, ...]}`.
///
/// `node` must be LIST-annotated. `write_element` receives the wrapper group
/// of each item and the `element` schema node; it decides whether `element`
/// is written at all.
pub fn write_list<T, F>(
    field: &mut dyn FieldSink,
    node: &SchemaNode,
    items: impl IntoIterator<Item = T>,
    mut write_element: F,
) -> Result<(), MarshalError>
where
    F: FnMut(&mut dyn RecordSink, &SchemaNode, T) -> Result<(), MarshalError>,
{
    let element = node.list_element()?;
    element.require_element()?;
    let list = field.group().add_field(LIST_GROUP_NAME).list();
    for item in items {
        write_element(list.add().group(), element, item)?;
    }
    Ok(())
}

/// Write `items` as a plain list under an un-annotated `repeated` node.
pub fn write_repeated<T, F>(
    field: &mut dyn FieldSink,
    node: &SchemaNode,
    items: impl IntoIterator<Item = T>,
    mut write_item: F,
) -> Result<(), MarshalError>
where
    F: FnMut(&mut dyn FieldSink, T) -> Result<(), MarshalError>,
{
    if !node.is_repeated() {
        return Err(MarshalError::schema_mismatch(
            node.name(),
            "sequence requires a LIST-annotated or repeated schema node",
        ));
    }
    let list = field.list();
    for item in items {
        write_item(list.add(), item)?;
    }
    Ok(())
}

/// Element of a node that must describe a group.
pub fn require_group(node: &SchemaNode) -> Result<&SchemaElement, MarshalError> {
    let element = node.require_element()?;
    if let Some(physical) = element.physical_type {
        return Err(MarshalError::schema_mismatch(
            node.name(),
            format!("expected a group schema node, found primitive {physical}"),
        ));
    }
    Ok(element)
}
