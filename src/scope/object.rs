use super::node::{Node, PathLink, PathSegment};
use super::{ArrayScope, Mode, NodeRef, ValueScope};
use crate::{Error, SerializationContext, SerializationOptions, Serialize, Validator};

/// A scope over the members of an object
///
/// ```
/// use archivist::{Portable, RootScope, SerializationOptions, Value};
///
/// # fn main() -> Result<(), archivist::Error> {
/// let mut root = RootScope::<Portable>::save(SerializationOptions::default());
/// let mut name = String::from("Ada");
/// let mut age = 36u8;
/// root.value().object(|object| {
///     object.field("name", &mut name)?;
///     object.field("age", &mut age)?;
///     Ok(())
/// })?;
///
/// let document: Value = root.finalize()?;
/// assert_eq!(document.get("age"), Some(&Value::UInt(36)));
/// # Ok(())
/// # }
/// ```
pub struct ObjectScope<'a, N: Node> {
    node: NodeRef<'a, N>,
    link: PathLink<'a>,
    options: &'a SerializationOptions,
    context: &'a mut SerializationContext,
}

impl<'a, N: Node> ObjectScope<'a, N> {
    pub(crate) fn new(
        node: NodeRef<'a, N>,
        link: PathLink<'a>,
        options: &'a SerializationOptions,
        context: &'a mut SerializationContext,
    ) -> Self {
        ObjectScope {
            node,
            link,
            options,
            context,
        }
    }

    pub fn mode(&self) -> Mode {
        self.node.mode()
    }

    pub fn path(&self) -> String {
        self.link.render(N::PATH_SEPARATOR)
    }

    /// Number of members stored (load) or written so far (save)
    pub fn len(&self) -> usize {
        self.node.get().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The raw backend node of a member
    pub fn get(&self, key: &str) -> Option<&N> {
        self.node.get().member(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Call `f` with every member key in the backend's key order
    pub fn visit_keys<F: FnMut(&str)>(&self, mut f: F) {
        for key in self.node.get().member_keys() {
            f(key);
        }
    }

    /// Member keys in the backend's key order
    pub fn keys(&self) -> Vec<String> {
        let mut keys = Vec::with_capacity(self.len());
        self.visit_keys(|key| keys.push(String::from(key)));
        keys
    }

    pub fn options(&self) -> &SerializationOptions {
        self.options
    }

    pub fn context(&mut self) -> &mut SerializationContext {
        self.context
    }

    /// A scope over the member `key`
    ///
    /// On load `None` is returned when the member is absent. On save the
    /// member is created, and saving the same key twice is a contract
    /// violation.
    pub fn value<'c>(&'c mut self, key: &'c str) -> Option<ValueScope<'c, N>> {
        let node = match &mut self.node {
            NodeRef::Load(node) => {
                let node: &'a N = *node;
                NodeRef::Load(node.member(key)?)
            }
            NodeRef::Save(node) => {
                debug_assert!(
                    node.member(key).is_none(),
                    "contract violation: key '{}' saved twice in object at '{}'",
                    key,
                    self.link.render(N::PATH_SEPARATOR)
                );
                NodeRef::Save(node.insert_member(key))
            }
        };

        Some(ValueScope::new(
            node,
            self.link.child(PathSegment::Key(key)),
            self.options,
            &mut *self.context,
        ))
    }

    /// Save or load a member
    ///
    /// Returns whether the member was loaded. An absent member on load is
    /// not an error.
    pub fn field<T: Serialize + ?Sized>(&mut self, key: &str, value: &mut T) -> Result<bool, Error> {
        match self.value(key) {
            Some(scope) => value.serialize(scope),
            None => Ok(false),
        }
    }

    /// Save or load a member and run validators on the loaded result
    ///
    /// Validators only run on load, once per call, with the loaded flag of
    /// the member. Every failing validator records its message under the
    /// member's path. If any validator fails, a message from a skip policy
    /// for the same member is dropped so each failure is reported once.
    pub fn field_with<T: Serialize + ?Sized>(
        &mut self,
        key: &str,
        value: &mut T,
        validators: &[&dyn Validator<T>],
    ) -> Result<bool, Error> {
        if self.mode() == Mode::Save || validators.is_empty() {
            return self.field(key, value);
        }

        let path = self
            .link
            .render_with(N::PATH_SEPARATOR, PathSegment::Key(key));
        self.context.defer(path.clone());
        let loaded = match self.field(key, value) {
            Ok(loaded) => loaded,
            Err(e) => {
                self.context.resolve(false);
                return Err(e);
            }
        };

        let mut failed = false;
        for validator in validators {
            if let Some(message) = validator.validate(value, loaded) {
                self.context.add_error(path.clone(), message);
                failed = true;
            }
        }

        self.context.resolve(!failed);
        Ok(loaded)
    }

    /// Open the member `key` as a nested object
    pub fn open_object<'c>(&'c mut self, key: &'c str, size_hint: usize) -> Option<ObjectScope<'c, N>> {
        self.value(key)?.open_object(size_hint)
    }

    /// Open the member `key` as a nested array
    pub fn open_array<'c>(&'c mut self, key: &'c str, size_hint: usize) -> Option<ArrayScope<'c, N>> {
        self.value(key)?.open_array(size_hint)
    }
}
