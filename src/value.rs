use crate::Timestamp;
use std::fmt;

/// The shape of a stored value
///
/// Every backend reduces its native representation to one of these kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Boolean,
    Integer,
    Float,
    String,
    Object,
    Array,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::Boolean => "boolean",
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::String => "string",
            ValueKind::Object => "object",
            ValueKind::Array => "array",
        };
        f.write_str(name)
    }
}

/// A borrowed view of a non-container value as a backend stores it
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar<'a> {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(&'a str),

    /// Backends without a native timestamp store this as ISO 8601 text
    Timestamp(Timestamp),
}

impl<'a> Scalar<'a> {
    pub fn kind(&self) -> ValueKind {
        match self {
            Scalar::Null => ValueKind::Null,
            Scalar::Bool(_) => ValueKind::Boolean,
            Scalar::Int(_) | Scalar::UInt(_) => ValueKind::Integer,
            Scalar::Float(_) => ValueKind::Float,
            Scalar::Str(_) | Scalar::Timestamp(_) => ValueKind::String,
        }
    }
}

impl<'a> fmt::Display for Scalar<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => f.write_str("null"),
            Scalar::Bool(x) => fmt::Display::fmt(x, f),
            Scalar::Int(x) => fmt::Display::fmt(x, f),
            Scalar::UInt(x) => fmt::Display::fmt(x, f),
            Scalar::Float(x) => fmt::Display::fmt(x, f),
            Scalar::Str(x) => write!(f, "\"{}\"", x),
            Scalar::Timestamp(x) => fmt::Display::fmt(x, f),
        }
    }
}

/// An owned document of the portable in-memory format
///
/// Integers keep their signedness and timestamps are stored natively, so a
/// save and load through this format never goes through text.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    Timestamp(Timestamp),
    Object(Object),
    Array(Vec<Value>),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Boolean,
            Value::Int(_) | Value::UInt(_) => ValueKind::Integer,
            Value::Float(_) => ValueKind::Float,
            Value::String(_) | Value::Timestamp(_) => ValueKind::String,
            Value::Object(_) => ValueKind::Object,
            Value::Array(_) => ValueKind::Array,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(x) => Some(x),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(x) => Some(x.as_slice()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(x) => Some(x.as_str()),
            _ => None,
        }
    }

    /// Look up a member of an object value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|x| x.get(key))
    }
}

impl<'a> From<Scalar<'a>> for Value {
    fn from(scalar: Scalar<'a>) -> Self {
        match scalar {
            Scalar::Null => Value::Null,
            Scalar::Bool(x) => Value::Bool(x),
            Scalar::Int(x) => Value::Int(x),
            Scalar::UInt(x) => Value::UInt(x),
            Scalar::Float(x) => Value::Float(x),
            Scalar::Str(x) => Value::String(String::from(x)),
            Scalar::Timestamp(x) => Value::Timestamp(x),
        }
    }
}

/// Members of an object in insertion order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Object {
    entries: Vec<(String, Value)>,
}

impl Object {
    pub fn new() -> Self {
        Object::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Object {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Return the member for `key`, appending a null member when absent
    pub fn entry(&mut self, key: &str) -> &mut Value {
        let idx = match self.entries.iter().position(|(k, _)| k == key) {
            Some(idx) => idx,
            None => {
                self.entries.push((String::from(key), Value::Null));
                self.entries.len() - 1
            }
        };

        &mut self.entries[idx].1
    }

    /// Set a member, returning the value it replaced
    pub fn insert(&mut self, key: &str, value: Value) -> Option<Value> {
        match self.get_mut(key) {
            Some(existing) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((String::from(key), value));
                None
            }
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}
