//! Error types for descriptor loading and schema derivation.

use parquet_floor_core::MarshalError;

#[derive(Debug, thiserror::Error)]
pub enum ProtobufError {
    /// Descriptor bytes (a serialized `FileDescriptorSet`) could not be parsed.
    #[error("failed to parse descriptor set: {source}")]
    DescriptorParse {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The requested message is not part of the descriptor pool.
    #[error("message descriptor not found: '{message_name}'")]
    MessageNotFound { message_name: String },

    /// Message payload bytes could not be decoded.
    #[error("failed to decode message '{message_name}': {source}")]
    MessageDecode {
        message_name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A message type contains itself and has no finite Parquet schema.
    #[error("message '{message_name}' is recursive")]
    RecursiveMessage { message_name: String },

    #[error(transparent)]
    Marshal(#[from] MarshalError),
}
