use parquet_floor_core::{Group, RecordSink, Value};

#[test]
fn group_sink_builds_nested_tree() {
    let mut record = Group::new();
    record.add_field("name").set_byte_array(b"name");
    record.add_field("age").set_int32(18);
    {
        let nested = record.add_field("address").group();
        nested.add_field("zip").set_int64(12345);
        nested.add_field("ratio").set_float32(0.5);
    }
    {
        let list = record.add_field("scores").list();
        list.add().set_float64(1.5);
        list.add().set_float64(2.5);
    }

    let expected = Group::from([
        ("name", Value::byte_array("name")),
        ("age", Value::Int32(18)),
        (
            "address",
            Value::Group(Group::from([
                ("zip", Value::Int64(12345)),
                ("ratio", Value::Float32(0.5)),
            ])),
        ),
        (
            "scores",
            Value::List(vec![Value::Float64(1.5), Value::Float64(2.5)]),
        ),
    ]);
    assert_eq!(record, expected);
}

#[test]
fn adding_the_same_field_twice_overwrites() {
    let mut record = Group::new();
    record.add_field("foo").set_int32(1);
    record.add_field("foo").set_bool(true);

    assert_eq!(record.len(), 1);
    assert_eq!(record.get("foo"), Some(&Value::Bool(true)));
}

#[test]
fn re_adding_a_group_field_starts_empty() {
    let mut record = Group::new();
    record.add_field("g").group().add_field("a").set_int32(1);
    record.add_field("g").group().add_field("b").set_int32(2);

    let expected = Group::from([("b", Value::Int32(2))]);
    assert_eq!(record.get("g"), Some(&Value::Group(expected)));
}

#[test]
fn added_but_unwritten_field_is_null() {
    let mut record = Group::new();
    record.add_field("pending");
    assert!(record.get("pending").is_some_and(Value::is_null));
}

#[test]
fn value_accessors_report_type_mismatch() {
    let value = Value::Int64(3);
    assert_eq!(value.try_i64().unwrap(), Some(3));
    assert_eq!(Value::Null.try_i64().unwrap(), None);

    let err = value.try_bool().unwrap_err();
    assert_eq!(err.expected, "Bool");
    assert_eq!(err.actual, "Int64");

    assert_eq!(Value::byte_array("hi").try_str().unwrap(), Some("hi"));
}
