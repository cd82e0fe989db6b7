//! Entry-point trait implemented by every marshallable source.

use crate::{error::MarshalError, schema::SchemaNode, sink::RecordSink, value::Group};

/// A source record that can write itself into a [`RecordSink`] following a
/// schema rooted at the record.
///
/// Implementations must not retain state between calls: each call gets its
/// own sink.
pub trait MarshalRecord {
    fn marshal_record(
        &self,
        schema: &SchemaNode,
        sink: &mut dyn RecordSink,
    ) -> Result<(), MarshalError>;
}

/// Marshal `record` into a fresh [`Group`].
pub fn marshal_to_group<R>(record: &R, schema: &SchemaNode) -> Result<Group, MarshalError>
where
    R: MarshalRecord + ?Sized,
{
    let mut group = Group::new();
    record.marshal_record(schema, &mut group)?;
    Ok(group)
}
