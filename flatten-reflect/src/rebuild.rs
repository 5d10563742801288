//! The consuming side: reconstruct, update and modify.
//!
//! All three replace matched leaves with values drawn from a [`LeafSource`]
//! and walk exactly the positions [`Query::flatten`] captures. They differ
//! in where the result goes:
//!
//! - `rebuild` writes into fresh values, leaving the input alone. Nothing is
//!   observable until the whole graph has been rebuilt.
//! - `update_node` writes through `&mut`. Plain-old-data nodes are
//!   changed field by field; anything else is rebuilt and assigned over the
//!   old value by its parent. A failure part way leaves the earlier leaves
//!   already written.

use flatten_core::{Classification, Def, FlattenError, IntoLeaf, Reflect, Shaped, take_value};

use crate::source::{LeafSource, SequenceSource, TransformSource, coerce};
use crate::walk::Slot;
use crate::{Query, Site};

/// Overwrite `slot` with `value`, which must already have the slot's type.
fn assign(slot: &mut dyn Reflect, value: Box<dyn Reflect>) -> Result<(), FlattenError> {
    let expected = slot.shape();
    slot.set(value).map_err(|rejected| FlattenError::WrongShape {
        expected,
        actual: rejected.shape(),
    })
}

impl Query<'_> {
    fn next_leaf(
        &self,
        current: &dyn Reflect,
        site: &Site,
        source: &mut dyn LeafSource,
    ) -> Result<Box<dyn Reflect>, FlattenError> {
        let replacement = coerce(source.next_leaf(current, site)?, site.shape)?;
        trace!(field = %site.field, old = ?current, new = ?replacement, "replaced leaf");
        Ok(replacement)
    }

    /// Build a new value from `value`, replacing every matched leaf.
    ///
    /// Skipped subtrees and unselected fields are cloned as they are. Children
    /// are rebuilt before their parent, which is then assembled through the
    /// constructor registry (structs) or its list definition (sequences).
    pub(crate) fn rebuild(
        &self,
        value: &dyn Reflect,
        site: &Site,
        source: &mut dyn LeafSource,
    ) -> Result<Box<dyn Reflect>, FlattenError> {
        match self.enter(value, site)? {
            Classification::Skip => Ok(value.clone_boxed()),
            Classification::Leaf => self.next_leaf(value, site, source),
            Classification::Recurse => {
                let children = value.children();
                let slots = self.plan(site, children.len())?;
                let mut parts = Vec::with_capacity(children.len());
                for (child, slot) in children.into_iter().zip(slots) {
                    parts.push(match slot {
                        Slot::Visit(child_site) => self.rebuild(child, &child_site, source)?,
                        Slot::Carry => child.clone_boxed(),
                    });
                }
                self.assemble(site, parts)
            }
        }
    }

    fn assemble(
        &self,
        site: &Site,
        parts: Vec<Box<dyn Reflect>>,
    ) -> Result<Box<dyn Reflect>, FlattenError> {
        match site.shape.def {
            Def::Struct(_) => self.registry.construct(site.shape, parts),
            Def::List(ld) => (ld.from_elements)(parts),
            Def::Scalar(_) => Err(FlattenError::InvariantViolation {
                reason: "scalars cannot be assembled from parts",
            }),
        }
    }

    /// Replace every matched leaf under `value` in place.
    ///
    /// `reassignable` tells whether the parent can overwrite `value` as a
    /// whole. It is false only at the root.
    pub(crate) fn update_node(
        &self,
        value: &mut dyn Reflect,
        site: &Site,
        reassignable: bool,
        source: &mut dyn LeafSource,
    ) -> Result<(), FlattenError> {
        match self.enter(&*value, site)? {
            Classification::Skip => Ok(()),
            Classification::Leaf => {
                if !reassignable {
                    return Err(FlattenError::NotMutable { shape: site.shape });
                }
                let replacement = self.next_leaf(&*value, site, source)?;
                assign(value, replacement)
            }
            Classification::Recurse if site.shape.is_pod() => {
                let children = value.children_mut();
                let slots = self.plan(site, children.len())?;
                for (child, slot) in children.into_iter().zip(slots) {
                    if let Slot::Visit(child_site) = slot {
                        self.update_node(child, &child_site, true, source)?;
                    }
                }
                Ok(())
            }
            Classification::Recurse if reassignable => {
                trace!(shape = %site.shape, "rebuilding immutable value");
                let rebuilt = self.rebuild(&*value, site, source)?;
                assign(value, rebuilt)
            }
            Classification::Recurse => {
                // nothing to write is not an error
                if self.count_under(&*value, site)? == 0 {
                    Ok(())
                } else {
                    Err(FlattenError::NotMutable { shape: site.shape })
                }
            }
        }
    }

    /// A copy of `obj` with every matched leaf replaced by the next value of
    /// `source`, coerced to the type of the slot it lands in (see
    /// [`coerce`](crate::coerce)).
    ///
    /// `obj` is never modified and no partial result escapes on failure.
    pub fn reconstruct_from<T: Shaped>(
        &self,
        obj: &T,
        source: &mut dyn LeafSource,
    ) -> Result<T, FlattenError> {
        self.validate()?;
        debug!(root = %T::SHAPE, "reconstruct");
        take_value(self.rebuild(obj, &Site::root(T::SHAPE), source)?)
    }

    /// Overwrite every matched leaf of `obj` with the next value of `source`.
    ///
    /// Plain-old-data structs, sequences and tuples are changed in place;
    /// other structs are rebuilt through their constructor and assigned
    /// over the old value. The root itself has no parent to reassign it, so
    /// a leaf root, or a root struct that is not plain old data but holds
    /// matched leaves, fails with [`FlattenError::NotMutable`].
    ///
    /// Not atomic: if `source` fails part way, the leaves before that point
    /// have already been written.
    pub fn update_from<T: Shaped>(
        &self,
        obj: &mut T,
        source: &mut dyn LeafSource,
    ) -> Result<(), FlattenError> {
        self.validate()?;
        debug!(root = %T::SHAPE, "update");
        self.update_node(obj, &Site::root(T::SHAPE), false, source)
    }

    /// A copy of `obj` with its matched leaves replaced, in traversal order,
    /// by the values of `data`.
    ///
    /// Fails with [`FlattenError::InsufficientData`] if `data` runs out;
    /// values beyond the number of matched leaves are ignored.
    ///
    /// ```
    /// use flatten_reflect::Query;
    ///
    /// let rebuilt = Query::new().reconstruct(&(1i64, 2.5f64), [7.0, 0.5])?;
    /// assert_eq!(rebuilt, (7, 0.5));
    /// # Ok::<(), flatten_core::FlattenError>(())
    /// ```
    pub fn reconstruct<T, L>(
        &self,
        obj: &T,
        data: impl IntoIterator<Item = L>,
    ) -> Result<T, FlattenError>
    where
        T: Shaped,
        L: IntoLeaf,
    {
        self.reconstruct_from(obj, &mut SequenceSource::new(data))
    }

    /// Overwrite the matched leaves of `obj`, in traversal order, with the
    /// values of `data`. See [`update_from`](Self::update_from) for which
    /// values can be written.
    ///
    /// Unlike [`reconstruct`](Self::reconstruct) this is not atomic: if
    /// `data` runs out part way, the leaves before that point have already
    /// been written.
    pub fn update<T, L>(
        &self,
        obj: &mut T,
        data: impl IntoIterator<Item = L>,
    ) -> Result<(), FlattenError>
    where
        T: Shaped,
        L: IntoLeaf,
    {
        self.update_from(obj, &mut SequenceSource::new(data))
    }

    /// A copy of `obj` with each matched leaf replaced by `f(current leaf)`.
    pub fn modify<T, F>(&self, f: F, obj: &T) -> Result<T, FlattenError>
    where
        T: Shaped,
        F: FnMut(&dyn Reflect) -> Box<dyn Reflect>,
    {
        self.reconstruct_from(obj, &mut TransformSource::new(f))
    }

    /// Replace each matched leaf of `obj` with `f(current leaf)`, in place,
    /// with the same rules as [`update`](Self::update).
    pub fn modify_in_place<T, F>(&self, f: F, obj: &mut T) -> Result<(), FlattenError>
    where
        T: Shaped,
        F: FnMut(&dyn Reflect) -> Box<dyn Reflect>,
    {
        self.update_from(obj, &mut TransformSource::new(f))
    }
}
