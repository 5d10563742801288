#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

pub use flatten_core::*;
pub use flatten_reflect::*;

/// Matched leaf values of `obj`, in traversal order. See [`Query::flatten`].
pub fn flatten(obj: &dyn Reflect) -> Result<Vec<Box<dyn Reflect>>, FlattenError> {
    Query::new().flatten(obj)
}

/// `meta` applied at every position [`flatten`] captures. See
/// [`Query::metaflatten`].
pub fn metaflatten<M>(
    obj: &dyn Reflect,
    meta: impl FnMut(&Site) -> M,
) -> Result<Vec<M>, FlattenError> {
    Query::new().metaflatten(obj, meta)
}

/// Field identifiers of the positions [`flatten`] captures.
pub fn fieldnameflatten(obj: &dyn Reflect) -> Result<Vec<FieldId>, FlattenError> {
    Query::new().fieldnameflatten(obj)
}

/// Bare names of the types owning the positions [`flatten`] captures.
pub fn parentnameflatten(obj: &dyn Reflect) -> Result<Vec<Option<&'static str>>, FlattenError> {
    Query::new().parentnameflatten(obj)
}

/// Declared types of the positions [`flatten`] captures.
pub fn fieldtypeflatten(obj: &dyn Reflect) -> Result<Vec<&'static Shape>, FlattenError> {
    Query::new().fieldtypeflatten(obj)
}

/// Types owning the positions [`flatten`] captures.
pub fn parenttypeflatten(obj: &dyn Reflect) -> Result<Vec<Option<&'static Shape>>, FlattenError> {
    Query::new().parenttypeflatten(obj)
}

/// A copy of `obj` with its matched leaves replaced by `data`. See
/// [`Query::reconstruct`].
pub fn reconstruct<T, L>(obj: &T, data: impl IntoIterator<Item = L>) -> Result<T, FlattenError>
where
    T: Shaped,
    L: IntoLeaf,
{
    Query::new().reconstruct(obj, data)
}

/// Write `data` over the matched leaves of `obj`. See [`Query::update`].
pub fn update<T, L>(obj: &mut T, data: impl IntoIterator<Item = L>) -> Result<(), FlattenError>
where
    T: Shaped,
    L: IntoLeaf,
{
    Query::new().update(obj, data)
}

/// A copy of `obj` with each matched leaf replaced by `f(leaf)`. See
/// [`Query::modify`].
pub fn modify<T, F>(f: F, obj: &T) -> Result<T, FlattenError>
where
    T: Shaped,
    F: FnMut(&dyn Reflect) -> Box<dyn Reflect>,
{
    Query::new().modify(f, obj)
}

/// Replace each matched leaf of `obj` with `f(leaf)`, in place. See
/// [`Query::modify_in_place`].
pub fn modify_in_place<T, F>(f: F, obj: &mut T) -> Result<(), FlattenError>
where
    T: Shaped,
    F: FnMut(&dyn Reflect) -> Box<dyn Reflect>,
{
    Query::new().modify_in_place(f, obj)
}

/// Register `build` as the process-wide constructor of `T`, taking `arity`
/// field values. See [`ConstructorRegistry::register`].
pub fn register_constructor<T, F>(arity: usize, build: F) -> Result<(), FlattenError>
where
    T: Shaped,
    F: Fn(FieldValues) -> Result<T, FlattenError> + Send + Sync + 'static,
{
    ConstructorRegistry::global().register::<T, F>(arity, build)
}
