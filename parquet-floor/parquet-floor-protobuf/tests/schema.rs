
use parquet_floor_core::{MarshalError, format_schema};
use parquet_floor_protobuf::{
    ProtobufError, descriptor_pool_from_bytes, message_descriptor, protobuf_descriptor_to_schema,
};
use prost_types::{
    DescriptorProto, FileDescriptorSet,
    field_descriptor_proto::{Label, Type},
};
use test_helpers::*;

#[test]
fn person_schema_uses_list_wrappers_and_annotations() {
    let pool = descriptor_pool_from_bytes(&person_fds()).unwrap();
    let desc = message_descriptor(&pool, "Person").unwrap();
    let schema = protobuf_descriptor_to_schema(&desc).unwrap();

    let expected = "\
message Person {
  optional binary name (STRING);
  optional int32 age;
  optional int64 entry_timestamp;
  optional group addresses (LIST) {
    repeated group list {
      required binary element (STRING);
    }
  }
  optional group phones (LIST) {
    repeated group list {
      required group element {
        optional int32 number;
        optional group carriers (LIST) {
          repeated group list {
            required binary element (STRING);
          }
        }
        optional binary type (ENUM);
      }
    }
  }
  optional group home {
    optional binary street (STRING);
  }
}
";
    assert_eq!(format_schema(&schema).unwrap(), expected);
    assert!(schema.validate().is_ok());
}

#[test]
fn scalar_kinds_map_to_physical_types() {
    let msg = DescriptorProto {
        name: Some("Scalars".to_string()),
        field: vec![
            scalar_field("f_double", 1, Type::Double),
            scalar_field("f_float", 2, Type::Float),
            scalar_field("f_sint32", 3, Type::Sint32),
            scalar_field("f_fixed64", 4, Type::Fixed64),
            scalar_field("f_uint32", 5, Type::Uint32),
            scalar_field("f_bool", 6, Type::Bool),
            scalar_field("f_bytes", 7, Type::Bytes),
        ],
        ..Default::default()
    };
    let (_pool, desc) = pool_and_desc(&build_fds("scalars.proto", vec![msg]), "Scalars");
    let schema = protobuf_descriptor_to_schema(&desc).unwrap();

    let expected = "\
message Scalars {
  optional double f_double;
  optional float f_float;
  optional int32 f_sint32;
  optional int64 f_fixed64;
  optional int32 f_uint32;
  optional boolean f_bool;
  optional binary f_bytes;
}
";
    assert_eq!(schema.to_string(), expected);
}

#[test]
fn timestamp_message_becomes_int64_timestamp() {
    let event = DescriptorProto {
        name: Some("Event".to_string()),
        field: vec![message_field(
            "at",
            1,
            ".google.protobuf.Timestamp",
            Label::Optional,
        )],
        ..Default::default()
    };
    let fds = FileDescriptorSet {
        file: vec![
            timestamp_file(),
            proto3_file("event.proto", vec![event], vec![], vec![TIMESTAMP_FILE]),
        ],
    };
    let pool = parquet_floor_protobuf::descriptor_pool_from_set(fds).unwrap();
    let desc = message_descriptor(&pool, "Event").unwrap();

    let schema = protobuf_descriptor_to_schema(&desc).unwrap();
    assert_eq!(
        schema.to_string(),
        "message Event {\n  optional int64 at (TIMESTAMP(NANOS,true));\n}\n"
    );
}

#[test]
fn map_fields_are_rejected() {
    let entry = map_entry_message("LabelsEntry", Type::String, Type::Int32);
    let msg = DescriptorProto {
        name: Some("Tagged".to_string()),
        field: vec![message_field(
            "labels",
            1,
            ".Tagged.LabelsEntry",
            Label::Repeated,
        )],
        nested_type: vec![entry],
        ..Default::default()
    };
    let (_pool, desc) = pool_and_desc(&build_fds("tagged.proto", vec![msg]), "Tagged");

    let err = protobuf_descriptor_to_schema(&desc).unwrap_err();
    assert!(matches!(
        err,
        ProtobufError::Marshal(MarshalError::UnsupportedKind { field, kind })
            if field == "labels" && kind == "map"
    ));
}

#[test]
fn recursive_messages_are_rejected() {
    let msg = DescriptorProto {
        name: Some("Node".to_string()),
        field: vec![
            scalar_field("value", 1, Type::Int32),
            message_field("next", 2, ".Node", Label::Optional),
        ],
        ..Default::default()
    };
    let (_pool, desc) = pool_and_desc(&build_fds("node.proto", vec![msg]), "Node");

    let err = protobuf_descriptor_to_schema(&desc).unwrap_err();
    assert!(matches!(
        err,
        ProtobufError::RecursiveMessage { message_name } if message_name == "Node"
    ));
}

#[test]
fn descriptor_errors_are_reported() {
    assert!(matches!(
        descriptor_pool_from_bytes(b"not a descriptor set"),
        Err(ProtobufError::DescriptorParse { .. })
    ));

    let pool = descriptor_pool_from_bytes(&person_fds()).unwrap();
    assert!(matches!(
        message_descriptor(&pool, "Missing"),
        Err(ProtobufError::MessageNotFound { message_name }) if message_name == "Missing"
    ));
}
