use crate::{Scalar, ValueKind};

/// The document model a format backend exposes to scopes
///
/// A node is one value in a backend's document tree. Scopes only ever
/// read nodes while loading and only ever grow them while saving, so the
/// contract is a small set of accessors and builders.
pub trait Node: Default {
    /// Separator between segments of a value path
    const PATH_SEPARATOR: char = '/';

    fn kind(&self) -> ValueKind;

    /// The scalar held by this node, `None` for objects and arrays
    fn scalar(&self) -> Option<Scalar<'_>>;

    /// Replace this node with a scalar
    fn set_scalar(&mut self, value: Scalar<'_>);

    /// A member of an object node
    fn member(&self, key: &str) -> Option<&Self>;

    /// Keys of an object node in the backend's key order
    fn member_keys(&self) -> Vec<&str>;

    /// An element of an array node
    fn element(&self, index: usize) -> Option<&Self>;

    /// Number of members or elements, zero for scalars
    fn len(&self) -> usize;

    /// Replace this node with an empty object
    fn make_object(&mut self, capacity: usize);

    /// Add a null member to an object node and return it
    fn insert_member(&mut self, key: &str) -> &mut Self;

    /// Replace this node with an empty array
    fn make_array(&mut self, capacity: usize);

    /// Append a null element to an array node and return it
    fn push_element(&mut self) -> &mut Self;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One step of a value path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSegment<'a> {
    Key(&'a str),
    Index(usize),
}

/// A scope's position in the document, linked to its parent's position
///
/// Paths are rendered on demand by walking the links up to the root.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PathLink<'a> {
    parent: Option<&'a PathLink<'a>>,
    segment: Option<PathSegment<'a>>,
}

impl<'a> PathLink<'a> {
    pub(crate) fn root() -> Self {
        PathLink {
            parent: None,
            segment: None,
        }
    }

    pub(crate) fn child<'b>(&'b self, segment: PathSegment<'b>) -> PathLink<'b> {
        PathLink {
            parent: Some(self),
            segment: Some(segment),
        }
    }

    pub(crate) fn render(&self, separator: char) -> String {
        let mut out = String::new();
        self.write(separator, &mut out);
        if out.is_empty() {
            out.push(separator);
        }
        out
    }

    /// Render the path followed by one more segment
    pub(crate) fn render_with(&self, separator: char, segment: PathSegment) -> String {
        let mut out = String::new();
        self.write(separator, &mut out);
        push_segment(separator, segment, &mut out);
        out
    }

    fn write(&self, separator: char, out: &mut String) {
        if let Some(parent) = self.parent {
            parent.write(separator, out);
        }

        if let Some(segment) = self.segment {
            push_segment(separator, segment, out);
        }
    }
}

fn push_segment(separator: char, segment: PathSegment, out: &mut String) {
    out.push(separator);
    match segment {
        PathSegment::Key(key) => out.push_str(key),
        PathSegment::Index(index) => out.push_str(&index.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_render_from_root() {
        let root = PathLink::root();
        assert_eq!(root.render('/'), "/");
        let a = root.child(PathSegment::Key("a"));
        let zero = a.child(PathSegment::Index(0));
        let b = zero.child(PathSegment::Key("b"));
        assert_eq!(b.render('/'), "/a/0/b");
        assert_eq!(zero.render_with('/', PathSegment::Key("c")), "/a/0/c");
        assert_eq!(root.render_with('/', PathSegment::Index(3)), "/3");
    }
}
