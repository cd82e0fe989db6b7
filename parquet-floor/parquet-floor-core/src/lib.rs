//! Source-agnostic core types and contracts for `parquet-floor`.
//!
//! This crate provides the Parquet-shaped schema tree ([`SchemaNode`]), the
//! generic record tree ([`Value`] / [`Group`]), the [`RecordSink`] builder
//! contract that marshallers write into, and the value coercion rules in
//! [`coerce`] shared by every marshaller.

mod config;
mod error;
mod marshal;
mod schema;
mod sink;
mod value;

pub mod coerce;

pub use config::{FieldPolicy, MarshalConfig};
pub use error::{MarshalError, SchemaError, ValueTypeError};
pub use marshal::{MarshalRecord, marshal_to_group};
pub use schema::{
    LIST_ELEMENT_NAME, LIST_GROUP_NAME, LogicalType, PhysicalType, Repetition, SchemaElement,
    SchemaNode, TimeUnit, format_schema,
};
pub use sink::{FieldSink, ListSink, RecordSink};
pub use value::{Group, Value};
