//! The portable in-memory format.
//!
//! Saving produces a [`Value`] tree and loading walks one. Unsigned
//! integers and timestamps keep their native representation, which makes
//! the format handy for tests and for moving objects between archives
//! without going through text.

use crate::{Error, Format, Node, Object, Scalar, SerializationOptions, Value, ValueKind};

/// Marker for the portable in-memory format
#[derive(Debug, Clone, Copy, Default)]
pub struct Portable;

impl Format for Portable {
    type Node = Value;
    type Output = Value;

    fn finalize(document: Value, _options: &SerializationOptions) -> Result<Value, Error> {
        Ok(document)
    }
}

impl Node for Value {
    fn kind(&self) -> ValueKind {
        Value::kind(self)
    }

    fn scalar(&self) -> Option<Scalar<'_>> {
        match self {
            Value::Null => Some(Scalar::Null),
            Value::Bool(x) => Some(Scalar::Bool(*x)),
            Value::Int(x) => Some(Scalar::Int(*x)),
            Value::UInt(x) => Some(Scalar::UInt(*x)),
            Value::Float(x) => Some(Scalar::Float(*x)),
            Value::String(x) => Some(Scalar::Str(x.as_str())),
            Value::Timestamp(x) => Some(Scalar::Timestamp(*x)),
            Value::Object(_) | Value::Array(_) => None,
        }
    }

    fn set_scalar(&mut self, value: Scalar<'_>) {
        *self = Value::from(value);
    }

    fn member(&self, key: &str) -> Option<&Self> {
        self.get(key)
    }

    fn member_keys(&self) -> Vec<&str> {
        match self {
            Value::Object(obj) => obj.keys().collect(),
            _ => Vec::new(),
        }
    }

    fn element(&self, index: usize) -> Option<&Self> {
        self.as_array().and_then(|x| x.get(index))
    }

    fn len(&self) -> usize {
        match self {
            Value::Object(obj) => obj.len(),
            Value::Array(arr) => arr.len(),
            _ => 0,
        }
    }

    fn make_object(&mut self, capacity: usize) {
        *self = Value::Object(Object::with_capacity(capacity));
    }

    fn insert_member(&mut self, key: &str) -> &mut Self {
        if !matches!(self, Value::Object(_)) {
            self.make_object(0);
        }

        match self {
            Value::Object(obj) => obj.entry(key),
            _ => unreachable!("value was just made an object"),
        }
    }

    fn make_array(&mut self, capacity: usize) {
        *self = Value::Array(Vec::with_capacity(capacity));
    }

    fn push_element(&mut self) -> &mut Self {
        if !matches!(self, Value::Array(_)) {
            self.make_array(0);
        }

        match self {
            Value::Array(arr) => {
                arr.push(Value::Null);
                let last = arr.len() - 1;
                &mut arr[last]
            }
            _ => unreachable!("value was just made an array"),
        }
    }
}
