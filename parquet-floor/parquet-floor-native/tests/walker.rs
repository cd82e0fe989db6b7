use std::{
    sync::mpsc,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use bytes::Bytes;
use parquet_floor_core::{
    Group, LogicalType, MarshalError, PhysicalType, Repetition, SchemaNode, TimeUnit, Value,
    marshal_to_group,
};
use parquet_floor_native::{NativeRecord, Reflect, marshal};

fn required(name: &str, physical: PhysicalType) -> SchemaNode {
    SchemaNode::primitive(name, Repetition::Required, physical)
}

fn optional(name: &str, physical: PhysicalType) -> SchemaNode {
    SchemaNode::primitive(name, Repetition::Optional, physical)
}

fn single(node: SchemaNode) -> SchemaNode {
    SchemaNode::message("test_msg", vec![node])
}

fn decode<T: Reflect + ?Sized>(value: &T, schema: &SchemaNode) -> Result<Group, MarshalError> {
    let mut record = Group::new();
    marshal(value, schema, &mut record)?;
    Ok(record)
}

#[derive(Reflect)]
struct Int16 {
    foo: i16,
}

#[derive(Reflect)]
struct Isize {
    foo: isize,
}

#[derive(Reflect)]
struct Int8 {
    foo: i8,
}

#[derive(Reflect)]
struct Uint64 {
    foo: u64,
}

#[derive(Reflect)]
struct Usize {
    foo: usize,
}

#[derive(Reflect)]
struct Byte {
    foo: u8,
}

#[test]
fn integer_widths_collapse() {
    let int32 = single(required("foo", PhysicalType::Int32));
    let int64 = single(required("foo", PhysicalType::Int64));

    let cases = [
        (decode(&Int16 { foo: 42 }, &int32), Value::Int32(42)),
        (decode(&Isize { foo: 43 }, &int32), Value::Int32(43)),
        (decode(&Int8 { foo: 44 }, &int32), Value::Int32(44)),
        (decode(&Usize { foo: 200000 }, &int32), Value::Int32(200000)),
        (decode(&Byte { foo: 1 }, &int32), Value::Int32(1)),
        (
            decode(&Uint64 { foo: 1125899906842624 }, &int64),
            Value::Int64(1125899906842624),
        ),
    ];
    for (idx, (output, expected)) in cases.into_iter().enumerate() {
        assert_eq!(
            output.unwrap(),
            Group::from([("foo", expected)]),
            "{idx}. output mismatch"
        );
    }
}

#[test]
fn unsigned_values_wrap() {
    let schema = single(required("foo", PhysicalType::Int64));
    let output = decode(&Uint64 { foo: u64::MAX }, &schema).unwrap();
    assert_eq!(output, Group::from([("foo", Value::Int64(-1))]));
}

#[derive(Reflect)]
struct Floats {
    foo: f32,
    bar: f64,
}

#[test]
fn floats_keep_their_width() {
    let schema = SchemaNode::message(
        "test_msg",
        vec![
            required("foo", PhysicalType::Float),
            required("bar", PhysicalType::Double),
        ],
    );
    let output = decode(&Floats { foo: 42.5, bar: 23.5 }, &schema).unwrap();
    assert_eq!(
        output,
        Group::from([("foo", Value::Float32(42.5)), ("bar", Value::Float64(23.5))])
    );
}

#[derive(Reflect)]
struct Text {
    foo: String,
}

#[derive(Reflect)]
struct OptionalText {
    foo: Option<String>,
}

#[test]
fn strings_and_nil_pointers() {
    let schema = single(
        optional("foo", PhysicalType::ByteArray).with_logical_type(LogicalType::String),
    );

    let output = decode(&Text { foo: "bar".into() }, &schema).unwrap();
    assert_eq!(output, Group::from([("foo", Value::byte_array("bar"))]));

    let output = decode(&OptionalText { foo: Some(String::new()) }, &schema).unwrap();
    assert_eq!(output, Group::from([("foo", Value::byte_array(""))]));

    let output = decode(&OptionalText { foo: None }, &schema).unwrap();
    assert!(output.is_empty());
}

#[test]
fn top_level_must_be_a_struct() {
    let schema = single(required("foo", PhysicalType::Int32));

    assert!(matches!(
        decode(&23_i32, &schema),
        Err(MarshalError::TopLevelType { kind }) if kind == "int32"
    ));

    let absent: Option<Int16> = None;
    assert!(matches!(
        decode(&absent, &schema),
        Err(MarshalError::TopLevelType { .. })
    ));
}

#[derive(Reflect)]
struct Bla {
    bla: isize,
}

#[test]
fn top_level_pointer_to_struct_is_accepted() {
    let schema = single(required("bla", PhysicalType::Int32));
    let expected = Group::from([("bla", Value::Int32(616))]);

    assert_eq!(decode(&Some(Bla { bla: 616 }), &schema).unwrap(), expected);
    assert_eq!(decode(&Box::new(Bla { bla: 616 }), &schema).unwrap(), expected);
}

#[derive(Reflect)]
struct Inner {
    bar: i64,
}

#[derive(Reflect)]
struct Outer {
    foo: Inner,
    baz: u32,
    quux: Option<bool>,
    blub: bool,
}

#[test]
fn nested_struct_becomes_group() {
    let schema = SchemaNode::message(
        "test_msg",
        vec![
            SchemaNode::group(
                "foo",
                Repetition::Required,
                vec![required("bar", PhysicalType::Int64)],
            ),
            required("baz", PhysicalType::Int32),
            optional("quux", PhysicalType::Boolean),
            required("blub", PhysicalType::Boolean),
        ],
    );
    let value = Outer {
        foo: Inner { bar: 0 },
        baz: 0,
        quux: None,
        blub: false,
    };

    let expected = Group::from([
        ("foo", Value::Group(Group::from([("bar", Value::Int64(0))]))),
        ("baz", Value::Int32(0)),
        ("blub", Value::Bool(false)),
    ]);
    assert_eq!(decode(&value, &schema).unwrap(), expected);
}

#[derive(Reflect)]
struct Bools {
    foo: Vec<bool>,
}

#[derive(Reflect)]
struct Fib {
    foo: [u16; 5],
}

#[test]
fn sequences_use_the_list_wrapper() {
    let schema = single(SchemaNode::list(
        "foo",
        Repetition::Optional,
        required("element", PhysicalType::Boolean),
    ));
    let output = decode(
        &Bools {
            foo: vec![false, true, false],
        },
        &schema,
    )
    .unwrap();
    let expected = Value::list_of([false, true, false].map(|b| Some(Value::Bool(b))));
    assert_eq!(output, Group::from([("foo", expected)]));

    let schema = single(SchemaNode::list(
        "foo",
        Repetition::Optional,
        required("element", PhysicalType::Int32),
    ));
    let output = decode(&Fib { foo: [1, 1, 2, 3, 5] }, &schema).unwrap();
    let expected = Value::list_of([1, 1, 2, 3, 5].map(|v| Some(Value::Int32(v))));
    assert_eq!(output, Group::from([("foo", expected)]));
}

#[derive(Reflect)]
struct MaybeList {
    foo: Option<Vec<i32>>,
}

#[derive(Reflect)]
struct Holes {
    foo: Vec<Option<i32>>,
}

#[test]
fn absent_empty_and_nil_element_sequences() {
    let schema = single(SchemaNode::list(
        "foo",
        Repetition::Optional,
        optional("element", PhysicalType::Int32),
    ));

    let output = decode(&MaybeList { foo: None }, &schema).unwrap();
    assert!(output.is_empty());

    let output = decode(&MaybeList { foo: Some(vec![]) }, &schema).unwrap();
    assert_eq!(output, Group::from([("foo", Value::list_of([]))]));

    let output = decode(
        &Holes {
            foo: vec![Some(1), None],
        },
        &schema,
    )
    .unwrap();
    let expected = Value::list_of([Some(Value::Int32(1)), None]);
    assert_eq!(output, Group::from([("foo", expected)]));
}

#[test]
fn sequence_against_plain_node_is_a_mismatch() {
    let schema = single(optional("foo", PhysicalType::Boolean));
    let err = decode(&Bools { foo: vec![true] }, &schema).unwrap_err();
    assert!(matches!(err, MarshalError::SchemaMismatch { field, .. } if field == "foo"));
}

#[derive(Reflect)]
struct Legacy {
    foo: i64,
    bar: Option<String>,
    baz: Vec<i32>,
}

#[test]
fn bare_repeated_node_gets_a_plain_list() {
    let schema = SchemaNode::message(
        "test_msg",
        vec![
            required("foo", PhysicalType::Int64),
            optional("bar", PhysicalType::ByteArray).with_logical_type(LogicalType::String),
            SchemaNode::primitive("baz", Repetition::Repeated, PhysicalType::Int32),
        ],
    );
    let value = Legacy {
        foo: 42,
        bar: Some("world!".into()),
        baz: vec![1, 1, 2],
    };

    let expected = Group::from([
        ("foo", Value::Int64(42)),
        ("bar", Value::byte_array("world!")),
        (
            "baz",
            Value::List(vec![Value::Int32(1), Value::Int32(1), Value::Int32(2)]),
        ),
    ]);
    assert_eq!(decode(&value, &schema).unwrap(), expected);

    let err = decode(
        &Holes {
            foo: vec![Some(1), None],
        },
        &single(SchemaNode::primitive("foo", Repetition::Repeated, PhysicalType::Int32)),
    )
    .unwrap_err();
    assert!(matches!(err, MarshalError::SchemaMismatch { .. }));
}

#[derive(Reflect)]
struct FooType {
    bla: u64,
    bar: Option<String>,
}

#[derive(Reflect)]
struct RepeatedGroup {
    foo: Vec<FooType>,
}

#[test]
fn bare_repeated_group_holds_struct_items() {
    let schema = single(SchemaNode::group(
        "foo",
        Repetition::Repeated,
        vec![
            required("bla", PhysicalType::Int64),
            optional("bar", PhysicalType::ByteArray).with_logical_type(LogicalType::String),
        ],
    ));
    let value = RepeatedGroup {
        foo: vec![
            FooType { bla: 25, bar: None },
            FooType {
                bla: 26,
                bar: Some("bye!".into()),
            },
        ],
    };

    let expected = Value::List(vec![
        Value::Group(Group::from([("bla", Value::Int64(25))])),
        Value::Group(Group::from([
            ("bla", Value::Int64(26)),
            ("bar", Value::byte_array("bye!")),
        ])),
    ]);
    assert_eq!(
        decode(&value, &schema).unwrap(),
        Group::from([("foo", expected)])
    );
}

#[derive(Reflect)]
struct Channel {
    c: mpsc::Sender<i32>,
}

#[derive(Reflect)]
struct NestedChannel {
    foo: Channel,
}

#[derive(Reflect)]
struct Channels {
    foo: Vec<mpsc::Receiver<i32>>,
}

#[derive(Reflect)]
struct Callback {
    f: fn(i32) -> i32,
}

fn double(v: i32) -> i32 {
    v * 2
}

#[test]
fn channels_and_functions_are_unsupported_at_any_depth() {
    let schema = SchemaNode::message(
        "test_msg",
        vec![SchemaNode::group(
            "foo",
            Repetition::Required,
            vec![required("c", PhysicalType::Int32)],
        )],
    );
    let (tx, rx) = mpsc::channel::<i32>();

    let err = decode(&Channel { c: tx.clone() }, &schema).unwrap_err();
    assert!(matches!(err, MarshalError::UnsupportedKind { field, kind } if field == "c" && kind == "chan"));

    let err = decode(&NestedChannel { foo: Channel { c: tx } }, &schema).unwrap_err();
    assert!(matches!(err, MarshalError::UnsupportedKind { kind, .. } if kind == "chan"));

    let list_schema = single(SchemaNode::list(
        "foo",
        Repetition::Optional,
        required("element", PhysicalType::Int32),
    ));
    let err = decode(&Channels { foo: vec![rx] }, &list_schema).unwrap_err();
    assert!(matches!(err, MarshalError::UnsupportedKind { kind, .. } if kind == "chan"));

    let err = decode(&Callback { f: double }, &schema).unwrap_err();
    assert!(matches!(err, MarshalError::UnsupportedKind { kind, .. } if kind == "func"));
}

#[test]
fn unsupported_kind_wins_over_missing_schema_node() {
    let schema = single(required("other", PhysicalType::Int32));
    let (tx, rx) = mpsc::channel::<i32>();

    let err = decode(&NestedChannel { foo: Channel { c: tx } }, &schema).unwrap_err();
    assert!(matches!(err, MarshalError::UnsupportedKind { field, kind } if field == "c" && kind == "chan"));

    let err = decode(&Channels { foo: vec![rx] }, &schema).unwrap_err();
    assert!(matches!(err, MarshalError::UnsupportedKind { field, kind } if field == "foo" && kind == "chan"));
}

#[test]
fn missing_schema_child_is_a_mismatch() {
    let schema = single(required("other", PhysicalType::Int32));
    let err = decode(&Int16 { foo: 1 }, &schema).unwrap_err();
    assert!(matches!(err, MarshalError::SchemaMismatch { field, .. } if field == "foo"));
}

#[test]
fn unresolved_schema_node_is_reported() {
    let schema = single(SchemaNode::unresolved("foo", vec![]));
    let err = decode(&Int16 { foo: 1 }, &schema).unwrap_err();
    assert!(matches!(err, MarshalError::MissingSchemaElement { field } if field == "foo"));
}

#[derive(Reflect)]
struct Attributed {
    #[floor(rename = "Display_Name")]
    name: String,
    #[floor(skip)]
    #[allow(dead_code)]
    cache: Vec<u8>,
    r#type: i32,
}

#[test]
fn field_attributes_control_names() {
    let schema = SchemaNode::message(
        "test_msg",
        vec![
            required("Display_Name", PhysicalType::ByteArray),
            required("type", PhysicalType::Int32),
        ],
    );
    let value = Attributed {
        name: "n".into(),
        cache: vec![1, 2],
        r#type: 7,
    };
    let expected = Group::from([
        ("Display_Name", Value::byte_array("n")),
        ("type", Value::Int32(7)),
    ]);
    assert_eq!(decode(&value, &schema).unwrap(), expected);
}

#[derive(Reflect)]
struct Wrapper<T> {
    value: T,
}

#[derive(Reflect)]
#[allow(non_snake_case)]
struct CamelCase {
    userId: Bytes,
}

#[test]
fn generic_structs_and_uuid_check() {
    let schema = single(
        required("value", PhysicalType::FixedLenByteArray(16))
            .with_logical_type(LogicalType::Uuid),
    );

    let ok = Wrapper {
        value: Bytes::from_static(&[7; 16]),
    };
    assert_eq!(
        decode(&ok, &schema).unwrap(),
        Group::from([("value", Value::byte_array([7; 16]))])
    );

    let short = Wrapper {
        value: Bytes::from_static(b"short"),
    };
    assert!(matches!(
        decode(&short, &schema),
        Err(MarshalError::LogicalTypeViolation { field, .. }) if field == "value"
    ));

    let schema = single(required("userid", PhysicalType::ByteArray));
    let value = CamelCase {
        userId: Bytes::from_static(b"abc"),
    };
    assert_eq!(
        decode(&value, &schema).unwrap(),
        Group::from([("userid", Value::byte_array("abc"))])
    );
}

#[derive(Reflect)]
struct Event {
    at: SystemTime,
}

#[test]
fn system_time_follows_the_timestamp_rule() {
    let at = UNIX_EPOCH + Duration::new(1587479323, 999999999);

    let schema = single(
        required("at", PhysicalType::Int64)
            .with_logical_type(LogicalType::Timestamp(TimeUnit::Millis)),
    );
    assert_eq!(
        decode(&Event { at }, &schema).unwrap(),
        Group::from([("at", Value::Int64(1587479323999))])
    );

    let schema = single(required("at", PhysicalType::Int64));
    assert_eq!(
        decode(&Event { at }, &schema).unwrap(),
        Group::from([("at", Value::Int64(1587479323999999999))])
    );

    let before = UNIX_EPOCH - Duration::from_millis(1500);
    let schema = single(
        required("at", PhysicalType::Int64)
            .with_logical_type(LogicalType::Timestamp(TimeUnit::Millis)),
    );
    assert_eq!(
        decode(&Event { at: before }, &schema).unwrap(),
        Group::from([("at", Value::Int64(-1500))])
    );
}

#[test]
fn native_record_runs_through_marshal_to_group() {
    let schema = single(required("bla", PhysicalType::Int32));
    let value = Bla { bla: 3 };
    let record = marshal_to_group(&NativeRecord(&value), &schema).unwrap();
    assert_eq!(record, Group::from([("bla", Value::Int32(3))]));
}
