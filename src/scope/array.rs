use super::node::{Node, PathLink, PathSegment};
use super::{Mode, NodeRef, ObjectScope, ValueScope};
use crate::{Error, ErrorKind, SerializationContext, SerializationOptions, Serialize};

/// A scope over the elements of an array, visited front to back
///
/// On save the array holds exactly the number of elements declared when it
/// was opened, and writing past that capacity is a contract violation. On
/// load reading past the last element fails with an out of range error.
pub struct ArrayScope<'a, N: Node> {
    node: NodeRef<'a, N>,
    link: PathLink<'a>,
    options: &'a SerializationOptions,
    context: &'a mut SerializationContext,
    index: usize,
    capacity: usize,
}

impl<'a, N: Node> ArrayScope<'a, N> {
    pub(crate) fn new(
        node: NodeRef<'a, N>,
        link: PathLink<'a>,
        options: &'a SerializationOptions,
        context: &'a mut SerializationContext,
        capacity: usize,
    ) -> Self {
        ArrayScope {
            node,
            link,
            options,
            context,
            index: 0,
            capacity,
        }
    }

    pub fn mode(&self) -> Mode {
        self.node.mode()
    }

    /// The path of the current element
    ///
    /// While loading this is the last consumed element (or the first if none
    /// has been consumed). While saving it is the element about to be written.
    pub fn path(&self) -> String {
        let index = match self.node {
            NodeRef::Load(_) => self.index.saturating_sub(1),
            NodeRef::Save(_) => self.index,
        };

        self.link
            .render_with(N::PATH_SEPARATOR, PathSegment::Index(index))
    }

    /// Number of stored elements (load) or elements written so far (save)
    pub fn len(&self) -> usize {
        self.node.get().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Elements left to visit
    pub fn estimated_remaining_size(&self) -> usize {
        match self.node {
            NodeRef::Load(node) => node.len().saturating_sub(self.index),
            NodeRef::Save(_) => self.capacity.saturating_sub(self.index),
        }
    }

    /// Whether every element has been visited
    pub fn is_end(&self) -> bool {
        self.estimated_remaining_size() == 0
    }

    pub fn options(&self) -> &SerializationOptions {
        self.options
    }

    pub fn context(&mut self) -> &mut SerializationContext {
        self.context
    }

    /// A scope over the next element
    pub fn next_value(&mut self) -> Result<ValueScope<'_, N>, Error> {
        let index = self.index;
        let node = match &mut self.node {
            NodeRef::Load(node) => {
                let node: &'a N = *node;
                match node.element(index) {
                    Some(element) => NodeRef::Load(element),
                    None => {
                        let last = PathSegment::Index(index.saturating_sub(1));
                        return Err(Error::new(ErrorKind::OutOfRange {
                            path: self.link.render_with(N::PATH_SEPARATOR, last),
                            message: String::from("No more items to load"),
                        }))
                    }
                }
            }
            NodeRef::Save(node) => {
                assert!(
                    index < self.capacity,
                    "contract violation: array at '{}' declared {} elements but more were saved",
                    self.link.render(N::PATH_SEPARATOR),
                    self.capacity
                );
                NodeRef::Save(node.push_element())
            }
        };

        self.index += 1;
        Ok(ValueScope::new(
            node,
            self.link.child(PathSegment::Index(index)),
            self.options,
            &mut *self.context,
        ))
    }

    /// Save or load the next element
    pub fn element<T: Serialize + ?Sized>(&mut self, value: &mut T) -> Result<bool, Error> {
        let scope = self.next_value()?;
        value.serialize(scope)
    }

    /// Open the next element as an object
    pub fn open_object(&mut self, size_hint: usize) -> Result<Option<ObjectScope<'_, N>>, Error> {
        self.next_value().map(|x| x.open_object(size_hint))
    }

    /// Open the next element as an array
    pub fn open_array(&mut self, size_hint: usize) -> Result<Option<ArrayScope<'_, N>>, Error> {
        self.next_value().map(|x| x.open_array(size_hint))
    }
}
