//! Metadata functions: values computed per matched position from its
//! [`Site`] alone.

use std::collections::HashMap;

use flatten_core::{DeclId, FlattenError, Reflect, Shape, Shaped};

use crate::{FieldId, Query, Site};

/// The identifier of the position within its parent.
pub fn field_name(site: &Site) -> FieldId {
    site.field
}

/// The bare name of the owning type, e.g. `Foo` for every field of any
/// `Foo<_, _>`. `None` at the root.
pub fn parent_name(site: &Site) -> Option<&'static str> {
    site.parent.map(|parent| parent.type_identifier)
}

/// The declared type of the position.
pub fn field_type(site: &Site) -> &'static Shape {
    site.shape
}

/// The owning type, generic arguments included. `None` at the root.
pub fn parent_type(site: &Site) -> Option<&'static Shape> {
    site.parent
}

/// Metadata attached to struct fields, looked up per position.
///
/// Entries are keyed by declaration and field name, so an entry for
/// `Bar<f64>`'s `x` applies to every `Bar<_>`. Positions without an entry,
/// including sequence elements and the root, get the fallback.
///
/// ```
/// use flatten_reflect::{MetaTable, Query};
/// # flatten_core::reflect! {
/// #     #[derive(Clone, Debug)]
/// #     struct Bar<X, Y> { x: X, y: Y }
/// # }
///
/// let units = MetaTable::new("")
///     .with::<Bar<f64, f64>>("x", "m")?
///     .with::<Bar<f64, f64>>("y", "s")?;
/// let meta = Query::new().metaflatten(&Bar { x: 1.0, y: 2 }, |site| units.get(site))?;
/// assert_eq!(meta, ["m", "s"]);
/// # Ok::<(), flatten_core::FlattenError>(())
/// ```
#[derive(Clone, Debug)]
pub struct MetaTable<M> {
    entries: HashMap<(DeclId, &'static str), M>,
    fallback: M,
}

impl<M: Clone> MetaTable<M> {
    /// An empty table answering `fallback` everywhere.
    pub fn new(fallback: M) -> Self {
        Self {
            entries: HashMap::new(),
            fallback,
        }
    }

    /// Attach `value` to `field` of `T`.
    ///
    /// Fails with [`FlattenError::Configuration`] if `T` has no such field.
    pub fn with<T: Shaped>(mut self, field: &str, value: M) -> Result<Self, FlattenError> {
        let shape = T::SHAPE;
        let Some(field) = shape.field(field) else {
            return Err(FlattenError::configuration(format!(
                "{shape} has no field named `{field}`"
            )));
        };
        self.entries.insert((shape.decl_id, field.name), value);
        Ok(self)
    }

    /// The metadata of `field` in `parent`.
    pub fn lookup(&self, parent: &Shape, field: FieldId) -> M {
        field
            .name()
            .and_then(|name| self.entries.get(&(parent.decl_id, name)))
            .unwrap_or(&self.fallback)
            .clone()
    }

    /// The metadata of the position at `site`.
    pub fn get(&self, site: &Site) -> M {
        match site.parent {
            Some(parent) => self.lookup(parent, site.field),
            None => self.fallback.clone(),
        }
    }
}

impl Query<'_> {
    /// Field identifiers of the matched positions.
    pub fn fieldnameflatten(&self, obj: &dyn Reflect) -> Result<Vec<FieldId>, FlattenError> {
        self.metaflatten(obj, field_name)
    }

    /// Bare names of the types owning the matched positions.
    pub fn parentnameflatten(
        &self,
        obj: &dyn Reflect,
    ) -> Result<Vec<Option<&'static str>>, FlattenError> {
        self.metaflatten(obj, parent_name)
    }

    /// Declared types of the matched positions.
    pub fn fieldtypeflatten(&self, obj: &dyn Reflect) -> Result<Vec<&'static Shape>, FlattenError> {
        self.metaflatten(obj, field_type)
    }

    /// Types owning the matched positions.
    pub fn parenttypeflatten(
        &self,
        obj: &dyn Reflect,
    ) -> Result<Vec<Option<&'static Shape>>, FlattenError> {
        self.metaflatten(obj, parent_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_has_no_parent() {
        let site = Site::root(f64::SHAPE);
        assert_eq!(field_name(&site), FieldId::Root);
        assert_eq!(parent_name(&site), None);
        assert_eq!(parent_type(&site), None);
        assert_eq!(field_type(&site), f64::SHAPE);
    }

    #[test]
    fn table_falls_back_for_sequence_elements() {
        let table = MetaTable::new(0u8);
        let list = <Vec<f64>>::SHAPE;
        let site = Site::root(list).child(list, FieldId::Index(0), f64::SHAPE);
        assert_eq!(table.get(&site), 0);
    }

    #[test]
    fn table_rejects_unknown_fields() {
        let err = MetaTable::new(0u8).with::<(f64, f64)>("2", 1).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid configuration: tuple2 has no field named `2`"
        );
    }
}
