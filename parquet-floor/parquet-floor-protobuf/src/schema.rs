//! Descriptor loading and derivation of the Parquet schema a message
//! marshals into.

use parquet_floor_core::{
    LogicalType, MarshalError, PhysicalType, Repetition, SchemaNode, TimeUnit,
};
use prost_reflect::{DescriptorPool, DynamicMessage, FieldDescriptor, Kind, MessageDescriptor};
use prost_types::FileDescriptorSet;

use crate::{
    ProtobufError,
    options::{is_timestamp, timestamp_option},
};

/// Parse a serialized `google.protobuf.FileDescriptorSet`.
pub fn descriptor_pool_from_bytes(bytes: &[u8]) -> Result<DescriptorPool, ProtobufError> {
    DescriptorPool::decode(bytes).map_err(|e| ProtobufError::DescriptorParse {
        source: Box::new(e),
    })
}

/// Build a pool from an already decoded `FileDescriptorSet`.
pub fn descriptor_pool_from_set(set: FileDescriptorSet) -> Result<DescriptorPool, ProtobufError> {
    DescriptorPool::from_file_descriptor_set(set).map_err(|e| ProtobufError::DescriptorParse {
        source: Box::new(e),
    })
}

/// Look up a message by its fully-qualified name.
pub fn message_descriptor(
    pool: &DescriptorPool,
    message_name: &str,
) -> Result<MessageDescriptor, ProtobufError> {
    pool.get_message_by_name(message_name)
        .ok_or_else(|| ProtobufError::MessageNotFound {
            message_name: message_name.to_string(),
        })
}

/// Decode wire-format bytes into a [`DynamicMessage`].
pub fn decode_message(
    desc: &MessageDescriptor,
    bytes: &[u8],
) -> Result<DynamicMessage, ProtobufError> {
    DynamicMessage::decode(desc.clone(), bytes).map_err(|e| ProtobufError::MessageDecode {
        message_name: desc.full_name().to_string(),
        source: Box::new(e),
    })
}

/// Derive the schema a message of type `desc` is marshalled against.
///
/// Scalars and sub-messages are optional, repeated fields become optional
/// LIST groups with required elements, enums and strings are annotated byte
/// arrays and `google.protobuf.Timestamp` is an INT64 timestamp.
pub fn protobuf_descriptor_to_schema(desc: &MessageDescriptor) -> Result<SchemaNode, ProtobufError> {
    let mut stack = vec![desc.full_name().to_string()];
    let children = message_fields(desc, &mut stack)?;
    tracing::debug!(message = desc.full_name(), fields = children.len(), "derived schema");
    Ok(SchemaNode::message(desc.name(), children))
}

fn message_fields(
    desc: &MessageDescriptor,
    stack: &mut Vec<String>,
) -> Result<Vec<SchemaNode>, ProtobufError> {
    desc.fields()
        .map(|fd| field_node(&fd, stack))
        .collect()
}

fn field_node(fd: &FieldDescriptor, stack: &mut Vec<String>) -> Result<SchemaNode, ProtobufError> {
    if fd.is_map() {
        return Err(MarshalError::UnsupportedKind {
            field: fd.name().to_string(),
            kind: "map".to_string(),
        }
        .into());
    }
    if fd.is_list() {
        let element = value_node(fd, Repetition::Required, stack)?;
        return Ok(SchemaNode::list(fd.name(), Repetition::Optional, element));
    }
    value_node(fd, Repetition::Optional, stack)
}

fn value_node(
    fd: &FieldDescriptor,
    repetition: Repetition,
    stack: &mut Vec<String>,
) -> Result<SchemaNode, ProtobufError> {
    let name = fd.name();
    let primitive = |physical| SchemaNode::primitive(name, repetition, physical);

    let node = match fd.kind() {
        Kind::Double => primitive(PhysicalType::Double),
        Kind::Float => primitive(PhysicalType::Float),
        Kind::Int32 | Kind::Sint32 | Kind::Sfixed32 | Kind::Uint32 | Kind::Fixed32 => {
            primitive(PhysicalType::Int32)
        }
        Kind::Int64 | Kind::Sint64 | Kind::Sfixed64 | Kind::Uint64 | Kind::Fixed64 => {
            primitive(PhysicalType::Int64)
        }
        Kind::Bool => primitive(PhysicalType::Boolean),
        Kind::String => primitive(PhysicalType::ByteArray).with_logical_type(LogicalType::String),
        Kind::Bytes => primitive(PhysicalType::ByteArray),
        Kind::Enum(_) => primitive(PhysicalType::ByteArray).with_logical_type(LogicalType::Enum),
        Kind::Message(_) if is_timestamp(fd) => {
            let unit = timestamp_option(fd)?.unwrap_or(TimeUnit::Nanos);
            primitive(PhysicalType::Int64).with_logical_type(LogicalType::Timestamp(unit))
        }
        Kind::Message(msg_desc) => {
            let full_name = msg_desc.full_name().to_string();
            if stack.contains(&full_name) {
                return Err(ProtobufError::RecursiveMessage {
                    message_name: full_name,
                });
            }
            stack.push(full_name);
            let children = message_fields(&msg_desc, stack)?;
            stack.pop();
            SchemaNode::group(name, repetition, children)
        }
    };
    Ok(node)
}
