/*!

Format agnostic object serialization through symmetric save and load scopes.

An object describes its shape once, by implementing (or deriving)
[`Serialize`]. The same method saves the object into a document and loads it
back: the archive decides the direction, and the object only names its
members.

## Features

- ✔ Symmetric: one serialize method handles both directions
- ✔ Pluggable formats: JSON via `serde_json` and a portable in-memory format
- ✔ Forgiving: policies to skip overflowing numbers and mismatched types
- ✔ Validated: per-field validators with errors collected by path
- ✔ Unicode aware: UTF-8/16/32 transcoding with byte order mark detection
- ✔ Time aware: ISO 8601 text for timestamps with millisecond precision

## Quick Start

```rust
# #[cfg(all(feature = "derive", feature = "json"))] {
use archivist::{load_object, save_object, Json, Serialize};

#[derive(Serialize, Debug, Default, PartialEq)]
struct Model {
    human: bool,
    #[archive(rename = "nick")]
    nickname: Option<String>,
    #[archive(required, range(0, 150))]
    age: u8,
    scores: Vec<f64>,
}

let mut model = Model {
    human: true,
    nickname: None,
    age: 30,
    scores: vec![0.5, 1.5],
};

let json = save_object::<Json, _>(&mut model).unwrap();
assert_eq!(json, r#"{"age":30,"human":true,"nick":null,"scores":[0.5,1.5]}"#);

let mut loaded = Model::default();
load_object::<Json, _>(&mut loaded, &json).unwrap();
assert_eq!(loaded, model);
# }
```

## Validation

Validators run while loading. Their messages, together with messages from
skip policies, are collected by path. A load that recorded any message fails
with [`ErrorKind::FailedValidation`] once the whole document has been
visited, so every problem is reported in one go.

```rust
# #[cfg(all(feature = "derive", feature = "json"))] {
use archivist::{load_object, ErrorKind, Json, Serialize};

#[derive(Serialize, Default)]
struct Settings {
    #[archive(required, range(1, 65536))]
    port: u32,
    #[archive(required, min_size = 1)]
    host: String,
}

let mut settings = Settings::default();
let err = load_object::<Json, _>(&mut settings, r#"{"port": 0}"#).unwrap_err();
match err.kind() {
    ErrorKind::FailedValidation(errors) => {
        assert_eq!(errors.get("/port").unwrap(), ["Value must be between 1 and 65536"]);
        assert_eq!(errors.get("/host").unwrap().len(), 2);
    }
    _ => panic!("expected validation errors"),
}
# }
```

## One Level Lower

Objects that need more control can drive the scopes directly through a
[`RootScope`].

```rust
use archivist::{Portable, RootScope, SerializationOptions, Value};

let mut root = RootScope::<Portable>::save(SerializationOptions::default());
let mut numbers = [3u8, 1, 2];
root.value()
    .array(numbers.len(), |array| {
        for n in numbers.iter_mut() {
            array.element(n)?;
        }
        Ok(())
    })
    .unwrap();

let document = root.finalize().unwrap();
assert_eq!(document.as_array().map(|x| x.len()), Some(3));
```

*/

pub mod convert;
mod context;
mod errors;
mod format;
#[cfg(feature = "json")]
mod json;
mod options;
mod portable;
mod scope;
mod ser;
pub mod validators;
mod value;

pub use self::context::{SerializationContext, ValidationErrors};
pub use self::convert::{
    cast_number, decode_bytes, decode_utf16, decode_utf32, decode_utf8, encode_bytes,
    encode_utf16, encode_utf32, transcode, CastError, DateTime, EnumTable, Number,
    RegisteredEnum, TextConvert, Timestamp, UnixTime, Utf16Decoder, Utf32Decoder, Utf8Decoder,
    UtfType, DEFAULT_ERROR_SYMBOL,
};
pub use self::errors::*;
pub use self::format::*;
#[cfg(feature = "json")]
pub use self::json::Json;
pub use self::options::*;
pub use self::portable::Portable;
pub use self::scope::*;
pub use self::ser::{Serialize, Text};
pub use self::validators::{HasSize, MaxSize, MinSize, Range, Required, Validator};
pub use self::value::{Object, Scalar, Value, ValueKind};

#[cfg(feature = "derive")]
pub use archivist_derive::*;
