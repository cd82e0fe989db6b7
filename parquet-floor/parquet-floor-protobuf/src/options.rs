//! Field options understood by the marshaller.

use parquet_floor_core::{MarshalError, TimeUnit, coerce};
use prost_reflect::{FieldDescriptor, Kind, ReflectMessage};

/// Full name of the `google.protobuf.FieldOptions` extension carrying
/// per-field Parquet options.
pub const FIELD_OPTIONS_EXTENSION: &str = "parquet_options.field_opts";

/// Field of the extension message naming the timestamp unit.
const TIMESTAMP_TYPE_FIELD: &str = "timestamp_type";

/// Full name of the well-known timestamp message.
pub const TIMESTAMP_MESSAGE: &str = "google.protobuf.Timestamp";

/// Timestamp unit requested through the field-option extension.
///
/// `None` when the extension is not registered in the field's pool or not set
/// on the field.
pub(crate) fn timestamp_option(fd: &FieldDescriptor) -> Result<Option<TimeUnit>, MarshalError> {
    let Some(extension) = fd.parent_pool().get_extension_by_name(FIELD_OPTIONS_EXTENSION) else {
        return Ok(None);
    };
    let options = fd.options();
    if !options.has_extension(&extension) {
        return Ok(None);
    }
    let value = options.get_extension(&extension);
    let Some(field_opts) = value.as_message() else {
        return Ok(None);
    };
    let Some(type_field) = field_opts.descriptor().get_field_by_name(TIMESTAMP_TYPE_FIELD) else {
        return Ok(None);
    };
    let Some(number) = field_opts.get_field(&type_field).as_enum_number() else {
        return Ok(None);
    };

    let name = match type_field.kind() {
        Kind::Enum(enum_desc) => enum_desc
            .get_value(number)
            .map(|v| v.name().to_string())
            .unwrap_or_else(|| number.to_string()),
        _ => number.to_string(),
    };
    coerce::timestamp_unit_from_annotation(fd.name(), &name).map(Some)
}

pub(crate) fn is_timestamp(fd: &FieldDescriptor) -> bool {
    matches!(fd.kind(), Kind::Message(desc) if desc.full_name() == TIMESTAMP_MESSAGE)
}
