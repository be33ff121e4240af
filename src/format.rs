//! Format backends and the top level entry points to save and load objects.

use crate::{Error, Node, RootScope, SerializationOptions, Serialize};
use std::io::{Read, Write};

/// A format backend
///
/// A format supplies the document model that scopes walk and turns a
/// finished document into its output.
pub trait Format {
    type Node: Node;

    /// What a finished save produces
    type Output;

    fn finalize(document: Self::Node, options: &SerializationOptions) -> Result<Self::Output, Error>;
}

/// A format whose documents are exchanged as text
pub trait TextFormat: Format<Output = String> {
    fn parse(input: &str) -> Result<Self::Node, Error>;
}

/// Load an object from text with default options
///
/// ```
/// # #[cfg(feature = "json")] {
/// use archivist::{load_object, Json};
///
/// let mut values: Vec<u16> = Vec::new();
/// load_object::<Json, _>(&mut values, "[1, 2, 3]").unwrap();
/// assert_eq!(values, vec![1, 2, 3]);
/// # }
/// ```
pub fn load_object<F, T>(value: &mut T, input: &str) -> Result<(), Error>
where
    F: TextFormat,
    T: Serialize + ?Sized,
{
    load_object_with_options::<F, T>(value, input, SerializationOptions::default())
}

pub fn load_object_with_options<F, T>(
    value: &mut T,
    input: &str,
    options: SerializationOptions,
) -> Result<(), Error>
where
    F: TextFormat,
    T: Serialize + ?Sized,
{
    let mut root = RootScope::<F>::load_str(input, options)?;
    value.serialize(root.value())?;
    root.finish()
}

/// Load an object from bytes, detecting the encoding from a byte order mark
pub fn load_object_from_slice<F, T>(
    value: &mut T,
    input: &[u8],
    options: SerializationOptions,
) -> Result<(), Error>
where
    F: TextFormat,
    T: Serialize + ?Sized,
{
    let mut root = RootScope::<F>::load_slice(input, options)?;
    value.serialize(root.value())?;
    root.finish()
}

/// Load an object from a reader, detecting the encoding from a byte order mark
pub fn load_object_from_reader<F, T, R>(
    value: &mut T,
    reader: R,
    options: SerializationOptions,
) -> Result<(), Error>
where
    F: TextFormat,
    T: Serialize + ?Sized,
    R: Read,
{
    let mut root = RootScope::<F>::load_reader(reader, options)?;
    value.serialize(root.value())?;
    root.finish()
}

/// Load an object from a document already in the format's native model
pub fn load_object_from_node<F, T>(
    value: &mut T,
    document: &F::Node,
    options: SerializationOptions,
) -> Result<(), Error>
where
    F: Format,
    T: Serialize + ?Sized,
{
    let mut root = RootScope::<F>::load_borrowed(document, options);
    value.serialize(root.value())?;
    root.finish()
}

/// Save an object with default options
///
/// ```
/// # #[cfg(feature = "json")] {
/// use archivist::{save_object, Json};
///
/// let mut values = vec![Some(1.5), None];
/// assert_eq!(save_object::<Json, _>(&mut values).unwrap(), "[1.5,null]");
/// # }
/// ```
pub fn save_object<F, T>(value: &mut T) -> Result<F::Output, Error>
where
    F: Format,
    T: Serialize + ?Sized,
{
    save_object_with_options::<F, T>(value, SerializationOptions::default())
}

pub fn save_object_with_options<F, T>(
    value: &mut T,
    options: SerializationOptions,
) -> Result<F::Output, Error>
where
    F: Format,
    T: Serialize + ?Sized,
{
    let mut root = RootScope::<F>::save(options);
    value.serialize(root.value())?;
    root.finalize()
}

/// Save an object into a writer using the stream options' encoding
pub fn save_object_to_writer<F, T, W>(
    value: &mut T,
    writer: W,
    options: SerializationOptions,
) -> Result<(), Error>
where
    F: TextFormat,
    T: Serialize + ?Sized,
    W: Write,
{
    let mut root = RootScope::<F>::save(options);
    value.serialize(root.value())?;
    root.finalize_to_writer(writer)
}
