use super::node::{Node, PathLink};
use super::{ArrayScope, Mode, NodeRef, ObjectScope};
use crate::{
    cast_number, CastError, ConvertError, Error, ErrorKind, MismatchedTypesPolicy, Number,
    OverflowNumberPolicy, Scalar, SerializationContext, SerializationOptions, TextConvert,
    Timestamp, ValueKind,
};

/// A scope over exactly one value
///
/// Every serialize method consumes the scope, so a value is written or read
/// at most once. Methods return `Ok(true)` when the value was saved or
/// loaded, and `Ok(false)` when a load left the target untouched (the
/// stored value was null or a skip policy applied).
pub struct ValueScope<'a, N: Node> {
    node: NodeRef<'a, N>,
    link: PathLink<'a>,
    options: &'a SerializationOptions,
    context: &'a mut SerializationContext,
}

impl<'a, N: Node> ValueScope<'a, N> {
    pub(crate) fn new(
        node: NodeRef<'a, N>,
        link: PathLink<'a>,
        options: &'a SerializationOptions,
        context: &'a mut SerializationContext,
    ) -> Self {
        ValueScope {
            node,
            link,
            options,
            context,
        }
    }

    pub fn mode(&self) -> Mode {
        self.node.mode()
    }

    /// The path of this value from the document root, like `/a/0/b`
    pub fn path(&self) -> String {
        self.link.render(N::PATH_SEPARATOR)
    }

    /// The shape of the stored value
    pub fn kind(&self) -> ValueKind {
        self.node.get().kind()
    }

    /// Whether this is a load of a null value
    pub fn is_null(&self) -> bool {
        self.mode() == Mode::Load && self.kind() == ValueKind::Null
    }

    /// The underlying backend node
    pub fn node(&self) -> &N {
        self.node.get()
    }

    pub fn options(&self) -> &SerializationOptions {
        self.options
    }

    /// The archive's context, for recording custom validation messages
    pub fn context(&mut self) -> &mut SerializationContext {
        self.context
    }

    pub fn serialize_bool(mut self, value: &mut bool) -> Result<bool, Error> {
        let node = match &mut self.node {
            NodeRef::Save(node) => {
                node.set_scalar(Scalar::Bool(*value));
                return Ok(true);
            }
            NodeRef::Load(node) => *node,
        };

        match node.scalar() {
            Some(Scalar::Null) => Ok(false),
            Some(Scalar::Bool(x)) => {
                *value = x;
                Ok(true)
            }
            _ => self.mismatch("boolean", node.kind()),
        }
    }

    /// Save or load a number, applying the overflow policy when the stored
    /// number does not fit
    pub fn serialize_number<T: Number>(mut self, value: &mut T) -> Result<bool, Error> {
        let node = match &mut self.node {
            NodeRef::Save(node) => {
                node.set_scalar((*value).to_scalar());
                return Ok(true);
            }
            NodeRef::Load(node) => *node,
        };

        let scalar = match node.scalar() {
            Some(Scalar::Null) => return Ok(false),
            Some(scalar) => scalar,
            None => return self.mismatch("number", node.kind()),
        };

        match cast_number::<T>(&scalar) {
            Ok(x) => {
                *value = x;
                Ok(true)
            }
            Err(CastError::Overflow) => self.overflow(format!(
                "{} does not fit in {}",
                scalar,
                std::any::type_name::<T>()
            )),
            Err(CastError::Mismatch) => self.mismatch("number", scalar.kind()),
        }
    }

    pub fn serialize_string(mut self, value: &mut String) -> Result<bool, Error> {
        let node = match &mut self.node {
            NodeRef::Save(node) => {
                node.set_scalar(Scalar::Str(value.as_str()));
                return Ok(true);
            }
            NodeRef::Load(node) => *node,
        };

        match node.scalar() {
            Some(Scalar::Null) => Ok(false),
            Some(Scalar::Str(x)) => {
                value.clear();
                value.push_str(x);
                Ok(true)
            }
            Some(Scalar::Timestamp(x)) => {
                *value = x.to_string();
                Ok(true)
            }
            _ => self.mismatch("string", node.kind()),
        }
    }

    /// Save or load a timestamp, stored natively when the backend supports
    /// it and as ISO 8601 text otherwise
    pub fn serialize_timestamp(mut self, value: &mut Timestamp) -> Result<bool, Error> {
        let node = match &mut self.node {
            NodeRef::Save(node) => {
                node.set_scalar(Scalar::Timestamp(*value));
                return Ok(true);
            }
            NodeRef::Load(node) => *node,
        };

        match node.scalar() {
            Some(Scalar::Null) => Ok(false),
            Some(Scalar::Timestamp(x)) => {
                *value = x;
                Ok(true)
            }
            Some(Scalar::Str(x)) => match Timestamp::from_text(x) {
                Ok(x) => {
                    *value = x;
                    Ok(true)
                }
                Err(e) => self.convert_failure(e),
            },
            _ => self.mismatch("timestamp", node.kind()),
        }
    }

    /// Save or load a value through its text representation
    pub fn serialize_text<T: TextConvert>(mut self, value: &mut T) -> Result<bool, Error> {
        let node = match &mut self.node {
            NodeRef::Save(node) => {
                let text = value.to_text().map_err(|error| {
                    Error::new(ErrorKind::Convert {
                        path: self.link.render(N::PATH_SEPARATOR),
                        error,
                    })
                })?;
                node.set_scalar(Scalar::Str(&text));
                return Ok(true);
            }
            NodeRef::Load(node) => *node,
        };

        let parsed = match node.scalar() {
            Some(Scalar::Null) => return Ok(false),
            Some(Scalar::Str(x)) => T::from_text(x),
            Some(Scalar::Timestamp(x)) => T::from_text(&x.to_string()),
            _ => return self.mismatch("string", node.kind()),
        };

        match parsed {
            Ok(x) => {
                *value = x;
                Ok(true)
            }
            Err(e) => self.convert_failure(e),
        }
    }

    /// Save a null, or on load report if the stored value is null
    pub fn serialize_null(mut self) -> Result<bool, Error> {
        let node = match &mut self.node {
            NodeRef::Save(node) => {
                node.set_scalar(Scalar::Null);
                return Ok(true);
            }
            NodeRef::Load(node) => *node,
        };

        match node.kind() {
            ValueKind::Null => Ok(true),
            kind => self.mismatch("null", kind),
        }
    }

    /// Open the value as an object
    ///
    /// On load `None` is returned when the stored value is not an object.
    pub fn open_object(self, size_hint: usize) -> Option<ObjectScope<'a, N>> {
        let node = match self.node {
            NodeRef::Save(node) => {
                node.make_object(size_hint);
                NodeRef::Save(node)
            }
            NodeRef::Load(node) if node.kind() == ValueKind::Object => NodeRef::Load(node),
            NodeRef::Load(_) => return None,
        };

        Some(ObjectScope::new(node, self.link, self.options, self.context))
    }

    /// Open the value as an array of `size_hint` elements
    ///
    /// On save the hint is the exact number of elements that will be
    /// written. On load `None` is returned when the stored value is not an
    /// array.
    pub fn open_array(self, size_hint: usize) -> Option<ArrayScope<'a, N>> {
        let node = match self.node {
            NodeRef::Save(node) => {
                node.make_array(size_hint);
                NodeRef::Save(node)
            }
            NodeRef::Load(node) if node.kind() == ValueKind::Array => NodeRef::Load(node),
            NodeRef::Load(_) => return None,
        };

        Some(ArrayScope::new(
            node,
            self.link,
            self.options,
            self.context,
            size_hint,
        ))
    }

    /// Serialize the value as an object, applying the mismatched types
    /// policy when the stored value is not an object
    pub fn object<F>(self, f: F) -> Result<bool, Error>
    where
        F: FnOnce(&mut ObjectScope<'a, N>) -> Result<(), Error>,
    {
        self.object_with_capacity(0, f)
    }

    pub fn object_with_capacity<F>(mut self, capacity: usize, f: F) -> Result<bool, Error>
    where
        F: FnOnce(&mut ObjectScope<'a, N>) -> Result<(), Error>,
    {
        if let Some(result) = self.reject_shape(ValueKind::Object) {
            return result;
        }

        match self.open_object(capacity) {
            Some(mut scope) => f(&mut scope).map(|_| true),
            None => Ok(false),
        }
    }

    /// Serialize the value as an array of `len` elements, applying the
    /// mismatched types policy when the stored value is not an array
    pub fn array<F>(mut self, len: usize, f: F) -> Result<bool, Error>
    where
        F: FnOnce(&mut ArrayScope<'a, N>) -> Result<(), Error>,
    {
        if let Some(result) = self.reject_shape(ValueKind::Array) {
            return result;
        }

        match self.open_array(len) {
            Some(mut scope) => f(&mut scope).map(|_| true),
            None => Ok(false),
        }
    }

    fn reject_shape(&mut self, expected: ValueKind) -> Option<Result<bool, Error>> {
        let kind = match self.node {
            NodeRef::Load(node) => node.kind(),
            NodeRef::Save(_) => return None,
        };

        if kind == expected {
            None
        } else if kind == ValueKind::Null {
            Some(Ok(false))
        } else {
            let message = format!("expected {} but found {}", expected, kind);
            Some(reject(
                self.link.render(N::PATH_SEPARATOR),
                message,
                self.options.mismatched_types_policy() == MismatchedTypesPolicy::Skip,
                self.context,
                |path, message| ErrorKind::MismatchedTypes { path, message },
            ))
        }
    }

    fn mismatch(self, expected: &str, found: ValueKind) -> Result<bool, Error> {
        let message = format!("expected {} but found {}", expected, found);
        reject(
            self.link.render(N::PATH_SEPARATOR),
            message,
            self.options.mismatched_types_policy() == MismatchedTypesPolicy::Skip,
            self.context,
            |path, message| ErrorKind::MismatchedTypes { path, message },
        )
    }

    fn overflow(self, message: String) -> Result<bool, Error> {
        reject(
            self.link.render(N::PATH_SEPARATOR),
            message,
            self.options.overflow_number_policy() == OverflowNumberPolicy::Skip,
            self.context,
            |path, message| ErrorKind::Overflow { path, message },
        )
    }

    /// Text that does not convert is a mismatch, unless the failure is a
    /// numeric or range overflow
    fn convert_failure(self, error: ConvertError) -> Result<bool, Error> {
        match error {
            ConvertError::Overflow(_) | ConvertError::Range(_) => self.overflow(error.to_string()),
            _ => {
                let message = error.to_string();
                reject(
                    self.link.render(N::PATH_SEPARATOR),
                    message,
                    self.options.mismatched_types_policy() == MismatchedTypesPolicy::Skip,
                    self.context,
                    |path, message| ErrorKind::MismatchedTypes { path, message },
                )
            }
        }
    }
}

fn reject<F>(
    path: String,
    message: String,
    skip: bool,
    context: &mut SerializationContext,
    kind: F,
) -> Result<bool, Error>
where
    F: FnOnce(String, String) -> ErrorKind,
{
    if skip {
        context.report_skip(path, message);
        Ok(false)
    } else {
        Err(Error::new(kind(path, message)))
    }
}
