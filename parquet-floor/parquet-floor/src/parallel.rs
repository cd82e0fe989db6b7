use parquet_floor_core::{Group, MarshalError, SchemaNode, marshal_to_group};
use parquet_floor_native::{NativeRecord, Reflect};
use rayon::prelude::*;

/// Marshal every value into its own [`Group`] on the rayon thread pool.
///
/// Results are returned in input order; a failing value does not affect the
/// others.
pub fn marshal_par<T>(values: &[T], schema: &SchemaNode) -> Vec<Result<Group, MarshalError>>
where
    T: Reflect + Sync,
{
    values
        .par_iter()
        .map(|value| marshal_to_group(&NativeRecord(value), schema))
        .collect()
}
