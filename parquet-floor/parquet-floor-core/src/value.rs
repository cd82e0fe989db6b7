//! Generic record tree produced by marshallers and consumed by writers.

use std::{
    collections::{BTreeMap, btree_map},
    sync::Arc,
};

use crate::error::ValueTypeError;

/// Value stored in a record tree.
///
/// Integers are already collapsed to the two Parquet widths; strings and
/// enum names travel as raw bytes.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Slot that was added to a group but never written.
    Null,
    Bool(bool),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    ByteArray(Arc<[u8]>),
    List(Vec<Value>),
    Group(Group),
}

impl Value {
    pub fn byte_array(bytes: impl AsRef<[u8]>) -> Self {
        Self::ByteArray(Arc::from(bytes.as_ref()))
    }

    /// Build the LIST wrapper value `{"list": [{"element": v}, ...]}`.
    ///
    /// `None` items produce an element group without `element`.
    pub fn list_of(items: impl IntoIterator<Item = Option<Value>>) -> Self {
        let elements = items
            .into_iter()
            .map(|item| {
                let mut wrapper = Group::new();
                if let Some(item) = item {
                    wrapper.insert(crate::LIST_ELEMENT_NAME, item);
                }
                Value::Group(wrapper)
            })
            .collect();
        let mut outer = Group::new();
        outer.insert(crate::LIST_GROUP_NAME, Value::List(elements));
        Value::Group(outer)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn try_bool(&self) -> Result<Option<bool>, ValueTypeError> {
        match self {
            Value::Bool(v) => Ok(Some(*v)),
            Value::Null => Ok(None),
            _ => Err(self.type_mismatch("Bool")),
        }
    }

    pub fn try_i32(&self) -> Result<Option<i32>, ValueTypeError> {
        match self {
            Value::Int32(v) => Ok(Some(*v)),
            Value::Null => Ok(None),
            _ => Err(self.type_mismatch("Int32")),
        }
    }

    pub fn try_i64(&self) -> Result<Option<i64>, ValueTypeError> {
        match self {
            Value::Int64(v) => Ok(Some(*v)),
            Value::Null => Ok(None),
            _ => Err(self.type_mismatch("Int64")),
        }
    }

    pub fn try_f32(&self) -> Result<Option<f32>, ValueTypeError> {
        match self {
            Value::Float32(v) => Ok(Some(*v)),
            Value::Null => Ok(None),
            _ => Err(self.type_mismatch("Float32")),
        }
    }

    pub fn try_f64(&self) -> Result<Option<f64>, ValueTypeError> {
        match self {
            Value::Float64(v) => Ok(Some(*v)),
            Value::Null => Ok(None),
            _ => Err(self.type_mismatch("Float64")),
        }
    }

    pub fn try_bytes(&self) -> Result<Option<&[u8]>, ValueTypeError> {
        match self {
            Value::ByteArray(v) => Ok(Some(v.as_ref())),
            Value::Null => Ok(None),
            _ => Err(self.type_mismatch("ByteArray")),
        }
    }

    pub fn try_str(&self) -> Result<Option<&str>, ValueTypeError> {
        match self.try_bytes()? {
            Some(bytes) => std::str::from_utf8(bytes)
                .map(Some)
                .map_err(|_| ValueTypeError::new("UTF-8 ByteArray", "non-UTF-8 ByteArray")),
            None => Ok(None),
        }
    }

    pub fn try_list(&self) -> Result<Option<&[Value]>, ValueTypeError> {
        match self {
            Value::List(v) => Ok(Some(v.as_slice())),
            Value::Null => Ok(None),
            _ => Err(self.type_mismatch("List")),
        }
    }

    pub fn try_group(&self) -> Result<Option<&Group>, ValueTypeError> {
        match self {
            Value::Group(v) => Ok(Some(v)),
            Value::Null => Ok(None),
            _ => Err(self.type_mismatch("Group")),
        }
    }

    pub fn type_mismatch(&self, expected: impl Into<String>) -> ValueTypeError {
        ValueTypeError::new(expected, self.variant_name())
    }

    fn variant_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::Int32(_) => "Int32",
            Value::Int64(_) => "Int64",
            Value::Float32(_) => "Float32",
            Value::Float64(_) => "Float64",
            Value::ByteArray(_) => "ByteArray",
            Value::List(_) => "List",
            Value::Group(_) => "Group",
        }
    }
}

impl From<Group> for Value {
    fn from(value: Group) -> Self {
        Value::Group(value)
    }
}

/// Named collection of field values. A record is a root `Group`.
///
/// Entries are keyed by field name, so insertion order never affects
/// equality.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Group(BTreeMap<String, Value>);

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.0.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Insert a field, replacing any previous value under the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(name.into(), value)
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.0.remove(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn slot(&mut self, name: &str) -> &mut Value {
        match self.0.entry(name.to_string()) {
            btree_map::Entry::Occupied(entry) => {
                let slot = entry.into_mut();
                *slot = Value::Null;
                slot
            }
            btree_map::Entry::Vacant(entry) => entry.insert(Value::Null),
        }
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Group {
    fn from_iter<T: IntoIterator<Item = (K, Value)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl<K: Into<String>, const N: usize> From<[(K, Value); N]> for Group {
    fn from(value: [(K, Value); N]) -> Self {
        value.into_iter().collect()
    }
}

impl IntoIterator for Group {
    type Item = (String, Value);
    type IntoIter = btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
