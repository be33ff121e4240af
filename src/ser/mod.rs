//! The [`Serialize`] trait and its implementations for standard types.

mod containers;
mod primitives;

use crate::{Error, Node, TextConvert, ValueScope};

/// A type that can be saved into and loaded from a value scope
///
/// One method covers both directions: the scope's mode decides whether the
/// value is read or written. Implementations return `Ok(true)` when the
/// value was saved or loaded and `Ok(false)` when a load left it untouched.
///
/// ```
/// use archivist::{load_object, save_object, Json, Node, Serialize, ValueScope};
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// impl Serialize for Point {
///     fn serialize<N: Node>(&mut self, value: ValueScope<'_, N>) -> Result<bool, archivist::Error> {
///         value.object(|object| {
///             object.field("x", &mut self.x)?;
///             object.field("y", &mut self.y)?;
///             Ok(())
///         })
///     }
/// }
///
/// # fn main() -> Result<(), archivist::Error> {
/// let mut point = Point { x: 1, y: -2 };
/// let json = save_object::<Json, _>(&mut point)?;
/// assert_eq!(json, r#"{"x":1,"y":-2}"#);
///
/// let mut loaded = Point::default();
/// load_object::<Json, _>(&mut loaded, &json)?;
/// assert_eq!(loaded, point);
/// # Ok(())
/// # }
/// ```
pub trait Serialize {
    fn serialize<N: Node>(&mut self, value: ValueScope<'_, N>) -> Result<bool, Error>;
}

impl<T: Serialize + ?Sized> Serialize for &mut T {
    fn serialize<N: Node>(&mut self, value: ValueScope<'_, N>) -> Result<bool, Error> {
        (**self).serialize(value)
    }
}

impl<T: Serialize + ?Sized> Serialize for Box<T> {
    fn serialize<N: Node>(&mut self, value: ValueScope<'_, N>) -> Result<bool, Error> {
        (**self).serialize(value)
    }
}

/// Serialize a value through its text form
///
/// The derive macro wraps fields marked `#[archive(text)]` in this adapter.
///
/// ```
/// use archivist::{save_object, Json, Text};
/// use std::path::PathBuf;
///
/// let mut path = PathBuf::from("/tmp/out");
/// let json = save_object::<Json, _>(&mut Text(&mut path)).unwrap();
/// assert_eq!(json, "\"/tmp/out\"");
/// ```
pub struct Text<'t, T: TextConvert>(pub &'t mut T);

impl<T: TextConvert> Serialize for Text<'_, T> {
    fn serialize<N: Node>(&mut self, value: ValueScope<'_, N>) -> Result<bool, Error> {
        value.serialize_text(self.0)
    }
}
