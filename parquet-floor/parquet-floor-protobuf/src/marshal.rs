//! Walk a protobuf [`DynamicMessage`] against a schema tree.

use parquet_floor_core::{
    FieldPolicy, FieldSink, MarshalConfig, MarshalError, MarshalRecord, RecordSink, SchemaNode,
    coerce::{self, Scalar},
};
use prost_reflect::{DynamicMessage, FieldDescriptor, Kind, ReflectMessage, Value as ProtoValue};

use crate::options::{TIMESTAMP_MESSAGE, timestamp_option};

/// Marshaller for protobuf messages.
///
/// Holds only the immutable [`MarshalConfig`]; one instance can be shared
/// across threads and reused for any number of messages.
#[derive(Debug, Clone, Default)]
pub struct ProtoMarshaller {
    config: MarshalConfig,
}

impl ProtoMarshaller {
    pub fn new(config: MarshalConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MarshalConfig {
        &self.config
    }

    /// Write the fields of `message` into `sink`, using `schema` as the
    /// message's node. Stops at the first error.
    pub fn marshal(
        &self,
        message: &DynamicMessage,
        schema: &SchemaNode,
        sink: &mut dyn RecordSink,
    ) -> Result<(), MarshalError> {
        self.write_message(message, schema, sink)
    }

    /// Bind `message` to this marshaller as a [`MarshalRecord`].
    pub fn record<'a>(&'a self, message: &'a DynamicMessage) -> ProtoRecord<'a> {
        ProtoRecord {
            marshaller: self,
            message,
        }
    }

    fn visits(&self, message: &DynamicMessage, fd: &FieldDescriptor) -> bool {
        if message.has_field(fd) {
            return true;
        }
        match self.config.field_policy {
            FieldPolicy::PopulatedOnly => false,
            // Unset sub-messages and maps stay absent; repeated fields still
            // get an empty list.
            FieldPolicy::EmitDefaults => fd.is_list() || !matches!(fd.kind(), Kind::Message(_)),
        }
    }

    fn write_message(
        &self,
        message: &DynamicMessage,
        node: &SchemaNode,
        sink: &mut dyn RecordSink,
    ) -> Result<(), MarshalError> {
        for fd in message.descriptor().fields() {
            if !self.visits(message, &fd) {
                tracing::trace!(field = fd.name(), "skipping unpopulated field");
                continue;
            }
            if fd.is_map() {
                return Err(MarshalError::UnsupportedKind {
                    field: fd.name().to_string(),
                    kind: "map".to_string(),
                });
            }
            let child = coerce::child_node(node, fd.name())?;
            let value = message.get_field(&fd);
            self.write_field(sink.add_field(fd.name()), child, &fd, &value)?;
        }
        Ok(())
    }

    fn write_field(
        &self,
        field: &mut dyn FieldSink,
        node: &SchemaNode,
        fd: &FieldDescriptor,
        value: &ProtoValue,
    ) -> Result<(), MarshalError> {
        match value {
            ProtoValue::List(items) => {
                coerce::write_list(field, node, items, |wrapper, element, item| {
                    self.write_single(wrapper.add_field(element.name()), element, fd, item)
                })
            }
            other => self.write_single(field, node, fd, other),
        }
    }

    fn write_single(
        &self,
        field: &mut dyn FieldSink,
        node: &SchemaNode,
        fd: &FieldDescriptor,
        value: &ProtoValue,
    ) -> Result<(), MarshalError> {
        let scalar = match value {
            ProtoValue::Bool(v) => Scalar::Bool(*v),
            ProtoValue::I32(v) => Scalar::Int32(*v),
            ProtoValue::I64(v) => Scalar::Int64(*v),
            ProtoValue::U32(v) => Scalar::Uint32(*v),
            ProtoValue::U64(v) => Scalar::Uint64(*v),
            ProtoValue::F32(v) => Scalar::Float32(*v),
            ProtoValue::F64(v) => Scalar::Float64(*v),
            ProtoValue::String(v) => Scalar::String(v),
            ProtoValue::Bytes(v) => Scalar::Bytes(v),
            ProtoValue::EnumNumber(number) => {
                let Kind::Enum(enum_desc) = fd.kind() else {
                    return Err(kind_mismatch(fd, "enum"));
                };
                coerce::write_enum(
                    field,
                    *number,
                    |n| enum_desc.get_value(n).map(|v| v.name().to_string()),
                    &self.config,
                );
                return Ok(());
            }
            ProtoValue::Message(message) => {
                if message.descriptor().full_name() == TIMESTAMP_MESSAGE {
                    return self.write_timestamp(field, node, fd, message);
                }
                coerce::require_group(node)?;
                return self.write_message(message, node, field.group());
            }
            ProtoValue::List(_) => return Err(kind_mismatch(fd, "nested list")),
            ProtoValue::Map(_) => {
                return Err(MarshalError::UnsupportedKind {
                    field: fd.name().to_string(),
                    kind: "map".to_string(),
                });
            }
        };
        coerce::write_scalar(field, node, scalar)
    }

    /// `google.protobuf.Timestamp` is written as a single INT64.
    fn write_timestamp(
        &self,
        field: &mut dyn FieldSink,
        node: &SchemaNode,
        fd: &FieldDescriptor,
        message: &DynamicMessage,
    ) -> Result<(), MarshalError> {
        let seconds = message
            .get_field_by_name("seconds")
            .and_then(|v| v.as_i64())
            .unwrap_or_default();
        let nanos = message
            .get_field_by_name("nanos")
            .and_then(|v| v.as_i32())
            .unwrap_or_default();

        let unit = match timestamp_option(fd)? {
            Some(unit) => unit,
            None => coerce::timestamp_unit(node)?,
        };
        coerce::write_timestamp(field, seconds, i64::from(nanos), unit);
        Ok(())
    }
}

fn kind_mismatch(fd: &FieldDescriptor, found: &str) -> MarshalError {
    MarshalError::SchemaMismatch {
        field: fd.name().to_string(),
        detail: format!("found {found} value for field of kind {:?}", fd.kind()),
    }
}

/// A message bound to a [`ProtoMarshaller`].
pub struct ProtoRecord<'a> {
    marshaller: &'a ProtoMarshaller,
    message: &'a DynamicMessage,
}

impl MarshalRecord for ProtoRecord<'_> {
    fn marshal_record(
        &self,
        schema: &SchemaNode,
        sink: &mut dyn RecordSink,
    ) -> Result<(), MarshalError> {
        self.marshaller.marshal(self.message, schema, sink)
    }
}
