//! JSON format backed by `serde_json`.
//!
//! Objects and arrays map onto `serde_json::Value`. Timestamps are written
//! as ISO 8601 strings and non-finite floats as `null`.
//!
//! ```
//! use archivist::{save_object_with_options, FormatOptions, Json, SerializationOptions};
//!
//! # fn main() -> Result<(), archivist::Error> {
//! let mut values = vec![1, 2];
//! let options = SerializationOptions::new()
//!     .with_format(FormatOptions::new().with_pretty(true).with_indent_width(2));
//! let actual = save_object_with_options::<Json, _>(&mut values, options)?;
//! assert_eq!(actual, "[\n  1,\n  2\n]");
//! # Ok(())
//! # }
//! ```

use crate::{Error, ErrorKind, Format, Node, Scalar, SerializationOptions, TextFormat, ValueKind};
use serde::Serialize;
use serde_json::{Map, Number, Value};

/// Marker for the JSON format
#[derive(Debug, Clone, Copy, Default)]
pub struct Json;

impl Format for Json {
    type Node = Value;
    type Output = String;

    fn finalize(document: Value, options: &SerializationOptions) -> Result<String, Error> {
        let format = options.format();
        if !format.pretty() {
            return serde_json::to_string(&document).map_err(json_error);
        }

        let indent = format.indent();
        let mut out = Vec::with_capacity(128);
        let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
        let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
        document.serialize(&mut ser).map_err(json_error)?;
        String::from_utf8(out).map_err(|e| Error::new(ErrorKind::Message(e.to_string())))
    }
}

impl TextFormat for Json {
    fn parse(input: &str) -> Result<Value, Error> {
        serde_json::from_str(input).map_err(|e| {
            Error::new(ErrorKind::Parsing {
                message: e.to_string(),
                line: e.line(),
                column: e.column(),
            })
        })
    }
}

fn json_error(e: serde_json::Error) -> Error {
    Error::new(ErrorKind::Message(e.to_string()))
}

impl Node for Value {
    fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Boolean,
            Value::Number(n) if n.is_f64() => ValueKind::Float,
            Value::Number(_) => ValueKind::Integer,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }

    fn scalar(&self) -> Option<Scalar<'_>> {
        match self {
            Value::Null => Some(Scalar::Null),
            Value::Bool(x) => Some(Scalar::Bool(*x)),
            Value::Number(n) => n
                .as_i64()
                .map(Scalar::Int)
                .or_else(|| n.as_u64().map(Scalar::UInt))
                .or_else(|| n.as_f64().map(Scalar::Float)),
            Value::String(x) => Some(Scalar::Str(x.as_str())),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    fn set_scalar(&mut self, value: Scalar<'_>) {
        *self = match value {
            Scalar::Null => Value::Null,
            Scalar::Bool(x) => Value::Bool(x),
            Scalar::Int(x) => Value::from(x),
            Scalar::UInt(x) => Value::from(x),
            Scalar::Float(x) => Number::from_f64(x).map_or(Value::Null, Value::Number),
            Scalar::Str(x) => Value::String(String::from(x)),
            Scalar::Timestamp(x) => Value::String(x.to_string()),
        };
    }

    fn member(&self, key: &str) -> Option<&Self> {
        self.as_object().and_then(|x| x.get(key))
    }

    fn member_keys(&self) -> Vec<&str> {
        match self {
            Value::Object(map) => map.keys().map(|x| x.as_str()).collect(),
            _ => Vec::new(),
        }
    }

    fn element(&self, index: usize) -> Option<&Self> {
        self.as_array().and_then(|x| x.get(index))
    }

    fn len(&self) -> usize {
        match self {
            Value::Object(map) => map.len(),
            Value::Array(arr) => arr.len(),
            _ => 0,
        }
    }

    fn make_object(&mut self, capacity: usize) {
        *self = Value::Object(Map::with_capacity(capacity));
    }

    fn insert_member(&mut self, key: &str) -> &mut Self {
        if !self.is_object() {
            self.make_object(0);
        }

        match self {
            Value::Object(map) => map.entry(key).or_insert(Value::Null),
            _ => unreachable!("value was just made an object"),
        }
    }

    fn make_array(&mut self, capacity: usize) {
        *self = Value::Array(Vec::with_capacity(capacity));
    }

    fn push_element(&mut self) -> &mut Self {
        if !self.is_array() {
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
