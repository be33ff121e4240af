use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::OnceLock;

/// A bidirectional table between enum values and their text names
///
/// Tables are declared as statics by [`register_enum!`](crate::register_enum)
/// and the name index is built on first lookup.
pub struct EnumTable<T: 'static> {
    type_name: &'static str,
    entries: &'static [(T, &'static str)],
    by_name: OnceLock<HashMap<&'static str, usize>>,
}

impl<T: Copy + PartialEq + 'static> EnumTable<T> {
    pub const fn new(type_name: &'static str, entries: &'static [(T, &'static str)]) -> Self {
        EnumTable {
            type_name,
            entries,
            by_name: OnceLock::new(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn entries(&self) -> &'static [(T, &'static str)] {
        self.entries
    }

    /// The registered name of a value
    pub fn name_of(&self, value: T) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(v, _)| *v == value)
            .map(|(_, name)| *name)
    }

    /// The value registered under a name, falling back to an ascii case
    /// insensitive match
    pub fn value_of(&self, name: &str) -> Option<T> {
        let index = self.by_name.get_or_init(|| {
            self.entries
                .iter()
                .enumerate()
                .map(|(i, (_, name))| (*name, i))
                .collect()
        });

        index
            .get(name)
            .map(|&i| self.entries[i].0)
            .or_else(|| {
                self.entries
                    .iter()
                    .find(|(_, x)| x.eq_ignore_ascii_case(name))
                    .map(|(v, _)| *v)
            })
    }
}

/// An enum with a registered name table
pub trait RegisteredEnum: Copy + PartialEq + Debug + 'static {
    fn table() -> &'static EnumTable<Self>;
}

/// Register the text names of an enum
///
/// Registration implements text conversion and serialization for the enum.
/// Values left out of the table fail to convert with
/// [`ConvertError::UnknownEnumValue`](crate::ConvertError::UnknownEnumValue).
///
/// ```
/// use archivist::{convert, register_enum};
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// enum Color { Red, Green, Blue }
///
/// register_enum!(Color {
///     Color::Red => "red",
///     Color::Green => "green",
/// });
///
/// assert_eq!(convert::to_string(&Color::Green).unwrap(), "green");
/// assert_eq!(convert::from_str::<Color>("red").unwrap(), Color::Red);
/// assert!(convert::to_string(&Color::Blue).is_err());
/// assert!(convert::from_str::<Color>("purple").is_err());
/// ```
#[macro_export]
macro_rules! register_enum {
    ($ty:ident { $($value:expr => $name:expr),+ $(,)? }) => {
        impl $crate::RegisteredEnum for $ty {
            fn table() -> &'static $crate::EnumTable<Self> {
                static TABLE: $crate::EnumTable<$ty> =
                    $crate::EnumTable::new(stringify!($ty), &[$(($value, $name)),+]);
                &TABLE
            }
        }

        impl $crate::TextConvert for $ty {
            fn to_text(&self) -> ::std::result::Result<String, $crate::ConvertError> {
                $crate::convert::enum_to_text(*self)
            }

            fn from_text(text: &str) -> ::std::result::Result<Self, $crate::ConvertError> {
                $crate::convert::enum_from_text(text)
            }
        }

        impl $crate::Serialize for $ty {
            fn serialize<N: $crate::Node>(
                &mut self,
                value: $crate::ValueScope<'_, N>,
            ) -> ::std::result::Result<bool, $crate::Error> {
                value.serialize_text(self)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::convert::{from_str, to_string};
    use crate::ConvertError;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Level {
        Low,
        High,
        Unlisted,
    }

    crate::register_enum!(Level {
        Level::Low => "low",
        Level::High => "High",
    });

    #[test]
    fn enum_names_roundtrip() {
        assert_eq!(to_string(&Level::Low).unwrap(), "low");
        assert_eq!(from_str::<Level>("High").unwrap(), Level::High);
        assert_eq!(from_str::<Level>("high").unwrap(), Level::High);
    }

    #[test]
    fn unregistered_values_fail() {
        assert_eq!(
            to_string(&Level::Unlisted),
            Err(ConvertError::UnknownEnumValue {
                type_name: "Level",
                value: String::from("Unlisted"),
            })
        );

        assert!(matches!(
            from_str::<Level>("medium"),
            Err(ConvertError::UnknownEnumValue { .. })
        ));
    }
}
