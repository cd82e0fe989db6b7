//! Record sink contract written by marshallers, and its in-memory
//! implementation on [`Group`] / [`Value`].

use crate::value::{Group, Value};

/// Builder for one record (or one nested group of a record).
pub trait RecordSink {
    /// Add a field and return a handle to write its value.
    ///
    /// Adding a name that is already present resets that field: the second
    /// write wins.
    fn add_field(&mut self, name: &str) -> &mut dyn FieldSink;
}

/// Write handle for a single field or list element.
///
/// `set_*` calls are terminal writes; [`group`](FieldSink::group) and
/// [`list`](FieldSink::list) turn the slot into a nested builder.
pub trait FieldSink {
    fn set_bool(&mut self, value: bool);
    fn set_int32(&mut self, value: i32);
    fn set_int64(&mut self, value: i64);
    fn set_float32(&mut self, value: f32);
    fn set_float64(&mut self, value: f64);
    fn set_byte_array(&mut self, value: &[u8]);

    /// Turn the slot into a nested group.
    fn group(&mut self) -> &mut dyn RecordSink;

    /// Turn the slot into a plain ordered list.
    fn list(&mut self) -> &mut dyn ListSink;
}

/// Builder for an ordered list.
pub trait ListSink {
    /// Append an element and return a handle to write it.
    fn add(&mut self) -> &mut dyn FieldSink;
}

impl RecordSink for Group {
    fn add_field(&mut self, name: &str) -> &mut dyn FieldSink {
        self.slot(name)
    }
}

impl FieldSink for Value {
    fn set_bool(&mut self, value: bool) {
        *self = Value::Bool(value);
    }

    fn set_int32(&mut self, value: i32) {
        *self = Value::Int32(value);
    }

    fn set_int64(&mut self, value: i64) {
        *self = Value::Int64(value);
    }

    fn set_float32(&mut self, value: f32) {
        *self = Value::Float32(value);
    }

    fn set_float64(&mut self, value: f64) {
        *self = Value::Float64(value);
    }

    fn set_byte_array(&mut self, value: &[u8]) {
        *self = Value::byte_array(value);
    }

    fn group(&mut self) -> &mut dyn RecordSink {
        if !matches!(self, Value::Group(_)) {
            *self = Value::Group(Group::new());
        }
        let Value::Group(group) = self else {
            unreachable!("slot was just turned into a group")
        };
        group
    }

    fn list(&mut self) -> &mut dyn ListSink {
        if !matches!(self, Value::List(_)) {
            *self = Value::List(Vec::new());
        }
        let Value::List(items) = self else {
            unreachable!("slot was just turned into a list")
        };
        items
    }
}

impl ListSink for Vec<Value> {
    fn add(&mut self) -> &mut dyn FieldSink {
        self.push(Value::Null);
        let last = self.len() - 1;
        &mut self[last]
    }
}
