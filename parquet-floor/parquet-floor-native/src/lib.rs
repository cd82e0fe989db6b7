//! Native struct marshaller for the parquet-floor pipeline.
//!
//! Types opt in by implementing [`Reflect`], usually through
//! `#[derive(Reflect)]`. The walker in [`marshal`] then writes the value into
//! a [`RecordSink`](parquet_floor_core::RecordSink) following a
//! [`SchemaNode`](parquet_floor_core::SchemaNode) tree.
//!
//! ```rust
//! use parquet_floor_core::{Group, PhysicalType, Repetition, SchemaNode, Value};
//! use parquet_floor_native::{Reflect, marshal};
//!
//! #[derive(Reflect)]
//! struct Reading {
//!     sensor: String,
//!     level: Option<u16>,
//! }
//!
//! let schema = SchemaNode::message(
//!     "reading",
//!     vec![
//!         SchemaNode::primitive("sensor", Repetition::Required, PhysicalType::ByteArray),
//!         SchemaNode::primitive("level", Repetition::Optional, PhysicalType::Int32),
//!     ],
//! );
//! let mut record = Group::new();
//! marshal(&Reading { sensor: "a1".into(), level: None }, &schema, &mut record).unwrap();
//! assert_eq!(record, Group::from([("sensor", Value::byte_array("a1"))]));
//! ```

mod reflect;
mod walker;

#[cfg(feature = "derive")]
pub use parquet_floor_derive::Reflect;
pub use reflect::{Reflect, Reflected, StructField, kind};
pub use walker::{NativeRecord, marshal};
