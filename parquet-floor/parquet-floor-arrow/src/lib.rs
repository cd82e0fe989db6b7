//! Arrow integration layer for `parquet-floor`.
//!
//! This crate bridges the schema tree and record trees of
//! `parquet-floor-core` to Arrow:
//! 1. [`schema_to_arrow`] converts a [`SchemaNode`](parquet_floor_core::SchemaNode)
//!    to an Arrow `Schema`.
//! 2. [`records_to_record_batch`] converts marshalled records into a
//!    `RecordBatch`.
//! 3. [`record_batch_to_records`] converts a `RecordBatch` back into records.
//!
//! Conventions:
//! - LIST-annotated groups and bare `repeated` nodes are Arrow `List`s whose
//!   item field is named `element`.
//! - Timestamp columns carry the `+00:00` time zone.
//!
//! # Typical Flow
//! ```rust
//! use parquet_floor_arrow::{record_batch_to_records, records_to_record_batch};
//! use parquet_floor_core::{Group, PhysicalType, Repetition, SchemaNode, Value};
//!
//! let schema = SchemaNode::message(
//!     "m",
//!     vec![SchemaNode::primitive("id", Repetition::Required, PhysicalType::Int64)],
//! );
//! let records = vec![Group::from([("id", Value::Int64(7))])];
//!
//! let batch = records_to_record_batch(&schema, &records).unwrap();
//! assert_eq!(record_batch_to_records(&schema, &batch).unwrap(), records);
//! ```
pub mod arrow_convert;
pub mod batch_read;
pub mod error;
pub mod schema_convert;

/// Re-export of [`arrow_convert::records_to_record_batch`].
pub use arrow_convert::records_to_record_batch;
/// Re-export of [`batch_read::record_batch_to_records`].
pub use batch_read::record_batch_to_records;
/// Re-export of [`error::ArrowConvertError`].
pub use error::ArrowConvertError;
/// Re-export of [`schema_convert::schema_to_arrow`].
pub use schema_convert::schema_to_arrow;

pub(crate) const TIMESTAMP_TZ: &str = "+00:00";
