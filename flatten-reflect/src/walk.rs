//! Depth-first, declaration-order traversal shared by every operation.
//!
//! Producers ([`flatten`](Query::flatten) and friends) and consumers
//! ([`reconstruct`](Query::reconstruct) and friends) all go through
//! [`Query::enter`] and [`Query::plan`], which is what keeps the positions
//! they visit identical.

use flatten_core::{Classification, Def, FlattenError, Reflect, Shaped, classify, take_value};

use crate::source::coerce;
use crate::{FieldId, Query, Site};

/// What happens to one child of a recursed node.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Slot {
    /// Visit the child at this site.
    Visit(Site),
    /// Unselected field: carried forward untouched.
    Carry,
}

/// Receives matched leaves during a read-only walk.
pub(crate) trait LeafVisitor {
    fn leaf(&mut self, value: &dyn Reflect, site: &Site) -> Result<(), FlattenError>;
}

impl<F> LeafVisitor for F
where
    F: FnMut(&dyn Reflect, &Site) -> Result<(), FlattenError>,
{
    fn leaf(&mut self, value: &dyn Reflect, site: &Site) -> Result<(), FlattenError> {
        self(value, site)
    }
}

impl Query<'_> {
    /// Check the depth guard and the shape of `value`, then classify it.
    pub(crate) fn enter(
        &self,
        value: &dyn Reflect,
        site: &Site,
    ) -> Result<Classification, FlattenError> {
        if let Some(limit) = self.max_depth
            && site.depth > limit
        {
            return Err(FlattenError::DepthExceeded { limit });
        }
        if value.shape() != site.shape {
            return Err(FlattenError::InvariantViolation {
                reason: "value does not have the shape declared for its position",
            });
        }
        Ok(classify(site.shape, &self.uses, &self.ignore))
    }

    /// Decide, per child of a recursed node at `site`, whether it is visited.
    ///
    /// Struct fields go through the selector; sequence elements are always
    /// visited.
    pub(crate) fn plan(&self, site: &Site, children: usize) -> Result<Vec<Slot>, FlattenError> {
        let shape = site.shape;
        match shape.def {
            Def::Struct(sd) => {
                if sd.fields.len() != children {
                    return Err(FlattenError::InvariantViolation {
                        reason: "children disagree with the declared fields",
                    });
                }
                Ok(sd
                    .fields
                    .iter()
                    .map(|field| {
                        if self.selector.selectable(shape, field) {
                            Slot::Visit(site.child(shape, FieldId::Name(field.name), field.shape()))
                        } else {
                            Slot::Carry
                        }
                    })
                    .collect())
            }
            Def::List(ld) => Ok((0..children)
                .map(|index| {
                    let field = FieldId::Index(index);
                    Slot::Visit(site.child(shape, field, ld.t()))
                })
                .collect()),
            Def::Scalar(_) => Err(FlattenError::InvariantViolation {
                reason: "scalars have no children to recurse into",
            }),
        }
    }

    /// Visit every matched leaf under `value`, in traversal order.
    pub(crate) fn walk(
        &self,
        value: &dyn Reflect,
        site: &Site,
        visitor: &mut dyn LeafVisitor,
    ) -> Result<(), FlattenError> {
        match self.enter(value, site)? {
            Classification::Skip => Ok(()),
            Classification::Leaf => {
                trace!(field = %site.field, shape = %site.shape, "matched leaf");
                visitor.leaf(value, site)
            }
            Classification::Recurse => {
                let children = value.children();
                let slots = self.plan(site, children.len())?;
                for (child, slot) in children.into_iter().zip(slots) {
                    if let Slot::Visit(child_site) = slot {
                        self.walk(child, &child_site, visitor)?;
                    }
                }
                Ok(())
            }
        }
    }

    /// Matched leaf values of `obj`, in traversal order.
    ///
    /// Leaves are cloned out of the graph; the graph itself is not touched.
    pub fn flatten(&self, obj: &dyn Reflect) -> Result<Vec<Box<dyn Reflect>>, FlattenError> {
        self.validate()?;
        debug!(root = %obj.shape(), "flatten");
        let mut leaves = Vec::new();
        let mut capture = |value: &dyn Reflect, _: &Site| -> Result<(), FlattenError> {
            leaves.push(value.clone_boxed());
            Ok(())
        };
        self.walk(obj, &Site::root(obj.shape()), &mut capture)?;
        Ok(leaves)
    }

    /// Like [`flatten`](Self::flatten), coercing every leaf to `T` the way
    /// [`reconstruct`](Self::reconstruct) coerces replacements, e.g. to get
    /// a `Vec<f64>` out of a graph holding mixed numeric types.
    pub fn flatten_as<T: Shaped>(&self, obj: &dyn Reflect) -> Result<Vec<T>, FlattenError> {
        self.flatten(obj)?
            .into_iter()
            .map(|leaf| take_value::<T>(coerce(leaf, T::SHAPE)?))
            .collect()
    }

    /// Apply `meta` at every position [`flatten`](Self::flatten) would
    /// capture, without looking at the leaf values.
    pub fn metaflatten<M>(
        &self,
        obj: &dyn Reflect,
        mut meta: impl FnMut(&Site) -> M,
    ) -> Result<Vec<M>, FlattenError> {
        self.validate()?;
        debug!(root = %obj.shape(), "metaflatten");
        let mut out = Vec::new();
        let mut capture = |_: &dyn Reflect, site: &Site| -> Result<(), FlattenError> {
            out.push(meta(site));
            Ok(())
        };
        self.walk(obj, &Site::root(obj.shape()), &mut capture)?;
        Ok(out)
    }

    /// Number of positions [`flatten`](Self::flatten) would capture.
    pub fn count(&self, obj: &dyn Reflect) -> Result<usize, FlattenError> {
        self.validate()?;
        self.count_under(obj, &Site::root(obj.shape()))
    }

    pub(crate) fn count_under(
        &self,
        value: &dyn Reflect,
        site: &Site,
    ) -> Result<usize, FlattenError> {
        let mut count = 0;
        let mut tally = |_: &dyn Reflect, _: &Site| -> Result<(), FlattenError> {
            count += 1;
            Ok(())
        };
        self.walk(value, site, &mut tally)?;
        Ok(count)
    }
}

