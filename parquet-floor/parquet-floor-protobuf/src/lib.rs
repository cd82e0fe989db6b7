//! Protobuf message marshaller for the parquet-floor pipeline.
//!
//! [`ProtoMarshaller`] walks a [`prost_reflect::DynamicMessage`] against a
//! [`SchemaNode`](parquet_floor_core::SchemaNode) and writes it into a
//! [`RecordSink`](parquet_floor_core::RecordSink). The schema for a message
//! type can be derived with [`protobuf_descriptor_to_schema`].
//!
//! `google.protobuf.Timestamp` fields are written as one INT64. The unit comes
//! from the `parquet_options.field_opts` field-option extension when it is
//! present in the descriptor pool, then from the schema node's timestamp
//! annotation, and defaults to nanoseconds.

mod error;
mod marshal;
mod options;
mod schema;

pub use error::ProtobufError;
pub use marshal::{ProtoMarshaller, ProtoRecord};
pub use options::{FIELD_OPTIONS_EXTENSION, TIMESTAMP_MESSAGE};
pub use schema::{
    decode_message, descriptor_pool_from_bytes, descriptor_pool_from_set, message_descriptor,
    protobuf_descriptor_to_schema,
};
