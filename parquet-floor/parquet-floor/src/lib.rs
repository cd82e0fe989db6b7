//! Write Rust structs and protobuf messages to Parquet.
//!
//! A record is marshalled against a [`SchemaNode`] into a [`Group`] record
//! tree, buffered, converted to an Arrow `RecordBatch` and written with
//! `parquet`'s `ArrowWriter`. [`FloorReader`] turns a file back into
//! [`Group`]s.
//!
//! ```rust
//! use parquet_floor::{FloorReader, FloorWriter, Reflect, parse_schema};
//!
//! #[derive(Reflect)]
//! struct Legacy {
//!     foo: i64,
//!     bar: Option<String>,
//!     baz: Vec<i32>,
//! }
//!
//! let schema = parse_schema(
//!     "message test { required int64 foo; optional binary bar (STRING); repeated int32 baz; }",
//! )
//! .unwrap();
//!
//! let mut writer = FloorWriter::builder(schema.clone()).build(Vec::new()).unwrap();
//! writer
//!     .write(&Legacy { foo: 1, bar: None, baz: vec![2, 3] })
//!     .unwrap();
//! let bytes = writer.into_inner().unwrap();
//!
//! let reader = FloorReader::try_new(bytes::Bytes::from(bytes), schema).unwrap();
//! assert_eq!(reader.num_records(), 1);
//! ```

mod error;
mod parallel;
mod reader;
mod schema;
mod writer;

pub use error::FloorError;
pub use parallel::marshal_par;
pub use parquet_floor_arrow as arrow;
pub use parquet_floor_core as core;
pub use parquet_floor_core::{
    FieldPolicy, Group, MarshalConfig, MarshalError, MarshalRecord, SchemaNode, Value,
    format_schema,
};
pub use parquet_floor_native as native;
pub use parquet_floor_native::Reflect;
#[cfg(feature = "protobuf")]
pub use parquet_floor_protobuf as protobuf;
pub use reader::FloorReader;
pub use schema::{parse_schema, schema_from_parquet};
pub use writer::{FloorWriter, FloorWriterBuilder};
