use std::collections::HashMap;

use crate::{DeclId, Field, FlattenError, Shape, Shaped};

/// Per-field inclusion predicate.
///
/// Only consulted for fields of composites that are already being recursed
/// into. Sequence elements are never gated. An unselected field is neither
/// captured nor descended into, and consumers carry its value forward
/// unchanged without advancing their data source.
pub trait FieldSelector {
    /// Returns true if `field` of `parent` takes part in traversal.
    fn selectable(&self, parent: &'static Shape, field: &Field) -> bool;
}

/// Selects every field. The default.
#[derive(Clone, Copy, Debug, Default)]
pub struct AllFields;

impl FieldSelector for AllFields {
    #[inline]
    fn selectable(&self, _parent: &'static Shape, _field: &Field) -> bool {
        true
    }
}

impl<F> FieldSelector for F
where
    F: Fn(&'static Shape, &Field) -> bool,
{
    fn selectable(&self, parent: &'static Shape, field: &Field) -> bool {
        self(parent, field)
    }
}

/// A precomputed `(declaration, field) -> bool` table, default `true`.
///
/// Entries are keyed by [`DeclId`], so excluding a field of `Partial<f64>`
/// excludes it for every `Partial<_>`.
#[derive(Clone, Debug, Default)]
pub struct SelectionTable {
    entries: HashMap<(DeclId, &'static str), bool>,
}

impl SelectionTable {
    /// An empty table: everything selectable.
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclude `field` of `T`.
    pub fn exclude<T: Shaped>(mut self, field: &str) -> Result<Self, FlattenError> {
        self.set::<T>(field, false)?;
        Ok(self)
    }

    /// Explicitly include `field` of `T`.
    pub fn include<T: Shaped>(mut self, field: &str) -> Result<Self, FlattenError> {
        self.set::<T>(field, true)?;
        Ok(self)
    }

    /// Record whether `field` of `T` is selectable.
    ///
    /// Fails with [`FlattenError::Configuration`] if `T` is not a struct or
    /// has no such field.
    pub fn set<T: Shaped>(&mut self, field: &str, selectable: bool) -> Result<(), FlattenError> {
        let shape = T::SHAPE;
        if shape.struct_def().is_none() {
            return Err(FlattenError::configuration(format!(
                "{shape} is not a struct, its fields cannot be selected"
            )));
        }
        let Some(field) = shape.field(field) else {
            return Err(FlattenError::configuration(format!(
                "{shape} has no field named `{field}`"
            )));
        };
        self.entries.insert((shape.decl_id, field.name), selectable);
        Ok(())
    }

    /// Number of recorded entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no entries are recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FieldSelector for SelectionTable {
    fn selectable(&self, parent: &'static Shape, field: &Field) -> bool {
        self.entries
            .get(&(parent.decl_id, field.name))
            .copied()
            .unwrap_or(true)
    }
}
