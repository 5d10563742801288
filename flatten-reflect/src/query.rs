use core::fmt;

use flatten_core::{AllFields, ConstructorRegistry, FieldSelector, FlattenError, TypeSet};

/// Configuration of one flatten, reconstruct, update or modify call.
///
/// Producers and consumers given the same query and the same object shape
/// visit the same positions in the same order, so the output of
/// [`flatten`](Query::flatten) lines up with the input of
/// [`reconstruct`](Query::reconstruct).
///
/// ```
/// use flatten_core::TypeSet;
/// use flatten_reflect::Query;
///
/// let query = Query::new()
///     .uses(TypeSet::of::<i64>().with::<f32>())
///     .max_depth(32);
/// assert!(query.validate().is_ok());
/// ```
#[derive(Clone)]
pub struct Query<'a> {
    pub(crate) uses: TypeSet,
    pub(crate) ignore: TypeSet,
    pub(crate) selector: &'a dyn FieldSelector,
    pub(crate) registry: &'a ConstructorRegistry,
    pub(crate) max_depth: Option<usize>,
}

impl Default for Query<'_> {
    fn default() -> Self {
        Self {
            uses: TypeSet::numbers(),
            ignore: TypeSet::empty(),
            selector: &AllFields,
            registry: ConstructorRegistry::global(),
            max_depth: None,
        }
    }
}

impl<'a> Query<'a> {
    /// Every number, nothing ignored, every field selected, the process-wide
    /// constructor registry and no depth limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Types captured as leaves.
    pub fn uses(mut self, uses: TypeSet) -> Self {
        self.uses = uses;
        self
    }

    /// Types excluded together with their whole subtree.
    pub fn ignore(mut self, ignore: TypeSet) -> Self {
        self.ignore = ignore;
        self
    }

    /// The per-field inclusion predicate.
    pub fn selector(mut self, selector: &'a dyn FieldSelector) -> Self {
        self.selector = selector;
        self
    }

    /// The registry consulted when structs are rebuilt.
    pub fn registry(mut self, registry: &'a ConstructorRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Fail with [`FlattenError::DepthExceeded`] instead of visiting
    /// positions nested deeper than `limit`. The root is at depth 0.
    pub fn max_depth(mut self, limit: usize) -> Self {
        self.max_depth = Some(limit);
        self
    }

    /// The `use` set.
    pub fn use_set(&self) -> &TypeSet {
        &self.uses
    }

    /// The `ignore` set.
    pub fn ignore_set(&self) -> &TypeSet {
        &self.ignore
    }

    /// Reject contradictory configuration. Every operation calls this first.
    pub fn validate(&self) -> Result<(), FlattenError> {
        if self.max_depth == Some(0) {
            return Err(FlattenError::configuration("max_depth must be at least 1"));
        }
        if self.uses.is_universal() && self.ignore.is_universal() {
            return Err(FlattenError::configuration(
                "every type is both used and ignored",
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for Query<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("uses", &self.uses)
            .field("ignore", &self.ignore)
            .field("registry", &self.registry)
            .field("max_depth", &self.max_depth)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let query = Query::new();
        assert_eq!(query.use_set(), &TypeSet::numbers());
        assert!(query.ignore_set().is_empty());
        assert!(query.validate().is_ok());
    }

    #[test]
    fn zero_depth_is_rejected() {
        let err = Query::new().max_depth(0).validate().unwrap_err();
        assert!(matches!(err, FlattenError::Configuration { .. }));
    }

    #[test]
    fn universal_use_and_ignore_contradict() {
        let err = Query::new()
            .uses(TypeSet::any())
            .ignore(TypeSet::any())
            .validate()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid configuration: every type is both used and ignored"
        );
    }
}
