//! Scopes are the cursors through which a value is saved into or loaded from
//! a format's document.
//!
//! An archive hands out a [`RootScope`]. From it a [`ValueScope`] covers a
//! single value, which can be opened as an [`ObjectScope`] of keyed members
//! or an [`ArrayScope`] of ordered elements. The same code path drives both
//! directions: the [`Mode`] of an archive is fixed when it is created and is
//! inherited by every scope it opens.

mod array;
mod node;
mod object;
mod root;
mod value;

pub use self::array::ArrayScope;
pub use self::node::{Node, PathSegment};
pub use self::object::ObjectScope;
pub use self::root::RootScope;
pub use self::value::ValueScope;

/// The direction of an archive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Values flow from objects into the document
    Save,

    /// Values flow from the document into objects
    Load,
}

/// A scope's node: read only while loading, growable while saving
pub(crate) enum NodeRef<'a, N> {
    Load(&'a N),
    Save(&'a mut N),
}

impl<'a, N> NodeRef<'a, N> {
    pub(crate) fn mode(&self) -> Mode {
        match self {
            NodeRef::Load(_) => Mode::Load,
            NodeRef::Save(_) => Mode::Save,
        }
    }

    pub(crate) fn get(&self) -> &N {
        match self {
            NodeRef::Load(node) => node,
            NodeRef::Save(node) => node,
        }
    }
}
