//! Conversion of values to and from their text representation.
//!
//! The conversion for a type is picked statically through the
//! [`TextConvert`] trait. Numbers, booleans, strings, paths, enums with a
//! registered name table, wide strings and the time types are covered.
//!
//! ```
//! use archivist::{convert, Timestamp};
//! assert_eq!(convert::to_string(&-12i8).unwrap(), "-12");
//! assert_eq!(convert::from_str::<u16>("65535").unwrap(), u16::MAX);
//! assert!(convert::from_str::<u16>("65536").is_err());
//!
//! let ts: Timestamp = convert::from_str("2023-07-14T22:44:51.925Z").unwrap();
//! assert_eq!(ts.millis(), 925);
//! ```

mod datetime;
mod enums;
mod number;
mod utf;

pub use self::datetime::{civil_from_days, days_from_civil, DateTime, Timestamp, UnixTime};
pub use self::enums::{EnumTable, RegisteredEnum};
pub use self::number::{cast_number, CastError, Number};
pub(crate) use self::utf::{decode_stream, encode_stream};
pub use self::utf::{
    decode_bytes, decode_utf16, decode_utf32, decode_utf8, encode_bytes, encode_utf16,
    encode_utf32, transcode, Utf16Decoder, Utf32Decoder, Utf8Decoder, UtfType,
    DEFAULT_ERROR_SYMBOL,
};

use crate::ConvertError;
use std::num::IntErrorKind;
use std::path::PathBuf;
use std::time::SystemTime;

/// A type with a text representation that converts both ways
pub trait TextConvert: Sized {
    fn to_text(&self) -> Result<String, ConvertError>;

    fn from_text(text: &str) -> Result<Self, ConvertError>;
}

/// Convert a value into its text representation
pub fn to_string<T: TextConvert>(value: &T) -> Result<String, ConvertError> {
    value.to_text()
}

/// Parse a value from its text representation
pub fn from_str<T: TextConvert>(text: &str) -> Result<T, ConvertError> {
    T::from_text(text)
}

#[doc(hidden)]
pub fn enum_to_text<T: RegisteredEnum>(value: T) -> Result<String, ConvertError> {
    let table = T::table();
    table
        .name_of(value)
        .map(String::from)
        .ok_or_else(|| ConvertError::UnknownEnumValue {
            type_name: table.type_name(),
            value: format!("{:?}", value),
        })
}

#[doc(hidden)]
pub fn enum_from_text<T: RegisteredEnum>(text: &str) -> Result<T, ConvertError> {
    let table = T::table();
    table
        .value_of(text)
        .ok_or_else(|| ConvertError::UnknownEnumValue {
            type_name: table.type_name(),
            value: String::from(text),
        })
}

impl TextConvert for bool {
    fn to_text(&self) -> Result<String, ConvertError> {
        Ok(String::from(if *self { "true" } else { "false" }))
    }

    fn from_text(text: &str) -> Result<Self, ConvertError> {
        if text.eq_ignore_ascii_case("true") || text == "1" {
            Ok(true)
        } else if text.eq_ignore_ascii_case("false") || text == "0" {
            Ok(false)
        } else {
            Err(ConvertError::InvalidBool(String::from(text)))
        }
    }
}

#[cfg(feature = "faster_writer")]
#[inline]
fn integer_text<T: itoa::Integer>(value: T) -> String {
    String::from(itoa::Buffer::new().format(value))
}

#[cfg(not(feature = "faster_writer"))]
#[inline]
fn integer_text<T: ToString>(value: T) -> String {
    value.to_string()
}

macro_rules! integer_text_convert {
    ($($ty:ty),*) => {$(
        impl TextConvert for $ty {
            fn to_text(&self) -> Result<String, ConvertError> {
                Ok(integer_text(*self))
            }

            fn from_text(text: &str) -> Result<Self, ConvertError> {
                text.parse::<$ty>().map_err(|e| match e.kind() {
                    IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => ConvertError::Overflow(
                        format!("'{}' does not fit in {}", text, stringify!($ty)),
                    ),
                    _ => ConvertError::InvalidNumber(String::from(text)),
                })
            }
        }
    )*};
}

integer_text_convert!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl TextConvert for f64 {
    fn to_text(&self) -> Result<String, ConvertError> {
        Ok(self.to_string())
    }

    fn from_text(text: &str) -> Result<Self, ConvertError> {
        text.parse::<f64>()
            .map_err(|_| ConvertError::InvalidNumber(String::from(text)))
    }
}

impl TextConvert for f32 {
    fn to_text(&self) -> Result<String, ConvertError> {
        Ok(self.to_string())
    }

    fn from_text(text: &str) -> Result<Self, ConvertError> {
        let wide = f64::from_text(text)?;
        <f32 as Number>::cast_f64(wide)
            .ok_or_else(|| ConvertError::Overflow(format!("'{}' does not fit in f32", text)))
    }
}

impl TextConvert for String {
    fn to_text(&self) -> Result<String, ConvertError> {
        Ok(self.clone())
    }

    fn from_text(text: &str) -> Result<Self, ConvertError> {
        Ok(String::from(text))
    }
}

impl TextConvert for PathBuf {
    fn to_text(&self) -> Result<String, ConvertError> {
        Ok(self.to_string_lossy().into_owned())
    }

    fn from_text(text: &str) -> Result<Self, ConvertError> {
        Ok(PathBuf::from(text))
    }
}

impl TextConvert for Timestamp {
    fn to_text(&self) -> Result<String, ConvertError> {
        Ok(self.to_string())
    }

    fn from_text(text: &str) -> Result<Self, ConvertError> {
        text.parse()
    }
}

impl TextConvert for DateTime {
    fn to_text(&self) -> Result<String, ConvertError> {
        Ok(self.to_string())
    }

    fn from_text(text: &str) -> Result<Self, ConvertError> {
        DateTime::parse(text)
    }
}

impl TextConvert for UnixTime {
    fn to_text(&self) -> Result<String, ConvertError> {
        Ok(Timestamp::from_seconds(self.0).to_string())
    }

    fn from_text(text: &str) -> Result<Self, ConvertError> {
        Timestamp::from_text(text).map(|x| UnixTime(x.seconds()))
    }
}

impl TextConvert for SystemTime {
    fn to_text(&self) -> Result<String, ConvertError> {
        Timestamp::from_system_time(*self).map(|x| x.to_string())
    }

    fn from_text(text: &str) -> Result<Self, ConvertError> {
        Timestamp::from_text(text)?.to_system_time()
    }
}

/// A string of UTF-16 code units, which may hold unpaired surrogates
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct U16String(pub Vec<u16>);

impl U16String {
    /// Encode a string as UTF-16
    ///
    /// ```
    /// use archivist::convert::U16String;
    /// assert_eq!(U16String::from_str("\u{1F600}").0, vec![0xD83D, 0xDE00]);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(text: &str) -> Self {
        U16String(text.encode_utf16().collect())
    }

    /// Decode into a string, substituting malformed units
    pub fn to_string_lossy(&self, error_symbol: char) -> String {
        decode_utf16(&self.0, error_symbol)
    }
}

impl TextConvert for U16String {
    fn to_text(&self) -> Result<String, ConvertError> {
        Ok(self.to_string_lossy(DEFAULT_ERROR_SYMBOL))
    }

    fn from_text(text: &str) -> Result<Self, ConvertError> {
        Ok(U16String::from_str(text))
    }
}

/// A string of UTF-32 code units
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct U32String(pub Vec<u32>);

impl U32String {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(text: &str) -> Self {
        U32String(text.chars().map(u32::from).collect())
    }

    pub fn to_string_lossy(&self, error_symbol: char) -> String {
        decode_utf32(&self.0, error_symbol)
    }
}

impl TextConvert for U32String {
    fn to_text(&self) -> Result<String, ConvertError> {
        Ok(self.to_string_lossy(DEFAULT_ERROR_SYMBOL))
    }

    fn from_text(text: &str) -> Result<Self, ConvertError> {
        Ok(U32String::from_str(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;
    use rstest::*;

    #[rstest]
    #[case("true", Ok(true))]
    #[case("False", Ok(false))]
    #[case("1", Ok(true))]
    #[case("yes", Err(ConvertError::InvalidBool(String::from("yes"))))]
    fn bool_text(#[case] input: &str, #[case] expected: Result<bool, ConvertError>) {
        assert_eq!(from_str::<bool>(input), expected);
    }

    #[test]
    fn integer_overflow_versus_garbage() {
        assert!(matches!(from_str::<u8>("256"), Err(ConvertError::Overflow(_))));
        assert!(matches!(from_str::<i8>("-129"), Err(ConvertError::Overflow(_))));
        assert!(matches!(
            from_str::<i32>("12a"),
            Err(ConvertError::InvalidNumber(_))
        ));
        assert_eq!(from_str::<i64>(&to_string(&i64::MIN).unwrap()), Ok(i64::MIN));
    }

    #[test]
    fn float_text() {
        assert_eq!(to_string(&0.5f64).unwrap(), "0.5");
        assert_eq!(from_str::<f32>("3.25"), Ok(3.25));
        assert!(matches!(from_str::<f32>("1e39"), Err(ConvertError::Overflow(_))));
        assert!(matches!(
            from_str::<f64>("abc"),
            Err(ConvertError::InvalidNumber(_))
        ));
    }

    #[test]
    fn unix_time_text() {
        let time = UnixTime(1_689_374_691);
        assert_eq!(to_string(&time).unwrap(), "2023-07-14T22:44:51Z");
        assert_eq!(from_str::<UnixTime>("2023-07-14T22:44:51Z"), Ok(time));
    }

    #[test]
    fn system_time_text() {
        let text = "1999-12-31T23:59:59.500Z";
        let time: SystemTime = from_str(text).unwrap();
        assert_eq!(to_string(&time).unwrap(), text);
    }

    #[test]
    fn wide_string_text() {
        let wide = U16String(vec![0xDFFF, 0x61]);
        assert_eq!(to_string(&wide).unwrap(), "?a");
        let wide32: U32String = from_str("héllo").unwrap();
        assert_eq!(wide32.0.len(), 5);
    }

    #[quickcheck]
    fn float_text_roundtrip(value: f64) -> bool {
        let parsed: f64 = from_str(&to_string(&value).unwrap()).unwrap();
        parsed == value || (parsed.is_nan() && value.is_nan())
    }

    #[quickcheck]
    fn integer_text_roundtrip(value: i64) -> bool {
        from_str::<i64>(&to_string(&value).unwrap()) == Ok(value)
    }
}
