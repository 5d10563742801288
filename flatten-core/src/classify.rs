use crate::{Shape, TypeSet};

/// What the engine does with a node of a given type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Classification {
    /// Capture the node as a leaf; never descend into it.
    Leaf,
    /// Descend into the node's fields or elements.
    Recurse,
    /// Contribute nothing; do not descend.
    Skip,
}

/// Classify a type against the `use` and `ignore` sets.
///
/// Precedence, first match wins:
///
/// 1. in `ignore` → [`Classification::Skip`], with its whole subtree
/// 2. in `uses` → [`Classification::Leaf`], even if decomposable
/// 3. decomposable → [`Classification::Recurse`]
/// 4. otherwise → [`Classification::Skip`]
///
/// Depends on nothing but the shape and the two sets.
pub fn classify(shape: &Shape, uses: &TypeSet, ignore: &TypeSet) -> Classification {
    if ignore.contains(shape) {
        Classification::Skip
    } else if uses.contains(shape) {
        Classification::Leaf
    } else if shape.is_decomposable() {
        Classification::Recurse
    } else {
        Classification::Skip
    }
}
