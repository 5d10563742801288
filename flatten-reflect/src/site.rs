use core::fmt;

use flatten_core::Shape;

/// Identifies a position within its parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldId {
    /// The value handed to the operation. It has no parent.
    Root,
    /// A struct field, or a tuple field (`"0"`, `"1"`, …).
    Name(&'static str),
    /// A sequence element.
    Index(usize),
}

impl FieldId {
    /// The field name, if this is a struct or tuple field.
    pub fn name(&self) -> Option<&'static str> {
        match *self {
            FieldId::Name(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldId::Root => f.write_str("<root>"),
            FieldId::Name(name) => f.write_str(name),
            FieldId::Index(index) => write!(f, "{index}"),
        }
    }
}

/// A position in the object graph, as seen by metadata functions and leaf
/// sources.
///
/// Sites only depend on the shape of the graph and the query, never on the
/// values stored in it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Site {
    /// The owning struct or sequence. `None` at the root.
    pub parent: Option<&'static Shape>,
    /// Which field or element of the parent this is.
    pub field: FieldId,
    /// The declared shape of the position.
    pub shape: &'static Shape,
    /// Nesting depth; the root is at depth 0.
    pub depth: usize,
}

impl Site {
    /// The site of a root value.
    pub fn root(shape: &'static Shape) -> Self {
        Self {
            parent: None,
            field: FieldId::Root,
            shape,
            depth: 0,
        }
    }

    /// The site of a child of `parent`, which sits at `self`.
    pub(crate) fn child(
        &self,
        parent: &'static Shape,
        field: FieldId,
        shape: &'static Shape,
    ) -> Self {
        Self {
            parent: Some(parent),
            field,
            shape,
            depth: self.depth + 1,
        }
    }
}
