use parquet_floor_core::{
    Group, LogicalType, MarshalConfig, MarshalError, PhysicalType, RecordSink, Repetition,
    SchemaNode, TimeUnit, Value,
    coerce::{
        Scalar, check_uuid, resolve_enum, timestamp_unit, timestamp_value, write_list,
        write_repeated, write_scalar,
    },
};

fn names(n: i32) -> Option<String> {
    match n {
        0 => Some("MOBILE".to_string()),
        1 => Some("HOME".to_string()),
        2 => Some("WORK".to_string()),
        _ => None,
    }
}

fn int_node(name: &str) -> SchemaNode {
    SchemaNode::primitive(name, Repetition::Required, PhysicalType::Int32)
}

fn uuid_node() -> SchemaNode {
    SchemaNode::primitive(
        "id",
        Repetition::Required,
        PhysicalType::FixedLenByteArray(16),
    )
    .with_logical_type(LogicalType::Uuid)
}

#[test]
fn scalar_widths_collapse_to_parquet_integers() {
    let node = int_node("n");
    let mut record = Group::new();

    write_scalar(record.add_field("a"), &node, Scalar::Int32(44)).unwrap();
    write_scalar(record.add_field("b"), &node, Scalar::Uint32(200_000)).unwrap();
    write_scalar(
        record.add_field("c"),
        &node,
        Scalar::Uint64(1_125_899_906_842_624),
    )
    .unwrap();
    write_scalar(record.add_field("d"), &node, Scalar::Uint64(u64::MAX)).unwrap();
    write_scalar(record.add_field("e"), &node, Scalar::String("bar")).unwrap();

    assert_eq!(record.get("a"), Some(&Value::Int32(44)));
    assert_eq!(record.get("b"), Some(&Value::Int32(200_000)));
    assert_eq!(record.get("c"), Some(&Value::Int64(1_125_899_906_842_624)));
    assert_eq!(record.get("d"), Some(&Value::Int64(-1)));
    assert_eq!(record.get("e"), Some(&Value::byte_array("bar")));
}

#[test]
fn uuid_length_is_enforced() {
    let node = uuid_node();
    assert!(check_uuid(&node, &[0u8; 16]).is_ok());

    let err = check_uuid(&node, &[0u8; 15]).unwrap_err();
    assert!(matches!(err, MarshalError::LogicalTypeViolation { .. }));

    let mut record = Group::new();
    let err = write_scalar(record.add_field("id"), &node, Scalar::Bytes(&[1u8; 17])).unwrap_err();
    assert!(matches!(err, MarshalError::LogicalTypeViolation { .. }));

    // Without the annotation any length passes through.
    let plain = SchemaNode::primitive("raw", Repetition::Required, PhysicalType::ByteArray);
    assert!(check_uuid(&plain, &[1, 2, 3]).is_ok());
}

#[test]
fn enum_resolution_follows_unknown_policy() {
    let config = MarshalConfig::new();
    assert_eq!(resolve_enum(2, names, &config), "WORK");
    assert_eq!(resolve_enum(4, names, &config), "MOBILE");

    let prefixed = MarshalConfig::new().with_unknown_enum_prefix("_UNKNOWN_ENUM_ID_");
    assert_eq!(resolve_enum(1, names, &prefixed), "HOME");
    assert_eq!(resolve_enum(4, names, &prefixed), "_UNKNOWN_ENUM_ID_4");

    assert_eq!(resolve_enum(7, |_| None, &config), "7");
}

#[test]
fn timestamp_scaling_by_unit() {
    let (secs, nanos) = (1_587_479_323, 999_999_999);
    assert_eq!(
        timestamp_value(secs, nanos, TimeUnit::Nanos),
        1_587_479_323_999_999_999
    );
    assert_eq!(
        timestamp_value(secs, nanos, TimeUnit::Micros),
        1_587_479_323_999_999
    );
    assert_eq!(
        timestamp_value(secs, nanos, TimeUnit::Millis),
        1_587_479_323_999
    );
}

#[test]
fn timestamp_unit_comes_from_annotation() {
    let plain = SchemaNode::primitive("ts", Repetition::Optional, PhysicalType::Int64);
    assert_eq!(timestamp_unit(&plain).unwrap(), TimeUnit::Nanos);

    let millis = plain
        .clone()
        .with_logical_type(LogicalType::Timestamp(TimeUnit::Millis));
    assert_eq!(timestamp_unit(&millis).unwrap(), TimeUnit::Millis);

    let wrong = plain.with_logical_type(LogicalType::Json);
    assert!(matches!(
        timestamp_unit(&wrong),
        Err(MarshalError::LogicalTypeViolation { .. })
    ));
}

#[test]
fn write_list_builds_wrapper_shape() {
    let node = SchemaNode::list(
        "carriers",
        Repetition::Optional,
        SchemaNode::primitive("item", Repetition::Required, PhysicalType::ByteArray),
    );
    let mut record = Group::new();
    write_list(
        record.add_field("carriers"),
        &node,
        ["carrier1", "carrier2"],
        |wrapper, element, item| {
            write_scalar(
                wrapper.add_field(element.name()),
                element,
                Scalar::String(item),
            )
        },
    )
    .unwrap();

    let expected = Value::list_of([
        Some(Value::byte_array("carrier1")),
        Some(Value::byte_array("carrier2")),
    ]);
    assert_eq!(record.get("carriers"), Some(&expected));
}

#[test]
fn write_list_with_no_items_keeps_empty_wrapper() {
    let node = SchemaNode::list("addresses", Repetition::Optional, int_node("x"));
    let mut record = Group::new();
    write_list(
        record.add_field("addresses"),
        &node,
        std::iter::empty::<i32>(),
        |_, _, _| Ok(()),
    )
    .unwrap();

    assert_eq!(record.get("addresses"), Some(&Value::list_of([])));
}

#[test]
fn write_list_rejects_unannotated_node() {
    let node = SchemaNode::primitive("tags", Repetition::Repeated, PhysicalType::ByteArray);
    let mut record = Group::new();
    let err = write_list(record.add_field("tags"), &node, [1], |_, _, _| Ok(())).unwrap_err();
    assert!(matches!(err, MarshalError::SchemaMismatch { .. }));
}

#[test]
fn write_repeated_requires_repeated_node() {
    let repeated = SchemaNode::primitive("baz", Repetition::Repeated, PhysicalType::Int32);
    let mut record = Group::new();
    write_repeated(record.add_field("baz"), &repeated, [1, 1, 2], |f, v| {
        write_scalar(f, &repeated, Scalar::Int32(v))
    })
    .unwrap();
    assert_eq!(
        record.get("baz"),
        Some(&Value::List(vec![
            Value::Int32(1),
            Value::Int32(1),
            Value::Int32(2)
        ]))
    );

    let required = int_node("baz");
    let err = write_repeated(record.add_field("baz"), &required, [1], |_, _| Ok(())).unwrap_err();
    assert!(matches!(err, MarshalError::SchemaMismatch { .. }));
}
