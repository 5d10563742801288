//! Where replacement leaf values come from, and how they are fitted into the
//! slot they replace.

use flatten_core::{Def, FlattenError, IntoLeaf, Reflect, ScalarKind, Shape};

use crate::Site;

/// Supplies one replacement value per matched leaf position, in traversal
/// order.
pub trait LeafSource {
    /// The replacement for the leaf at `site`, whose current value is
    /// `current`. The engine coerces the result to the slot's type.
    fn next_leaf(
        &mut self,
        current: &dyn Reflect,
        site: &Site,
    ) -> Result<Box<dyn Reflect>, FlattenError>;
}

/// Pops values off a flat sequence.
///
/// Fails with [`FlattenError::InsufficientData`] once the sequence runs out.
/// Values left over at the end are never read.
#[derive(Debug)]
pub struct SequenceSource<I> {
    values: I,
    position: usize,
}

impl<I> SequenceSource<I>
where
    I: Iterator,
    I::Item: IntoLeaf,
{
    /// Read leaves from `values`.
    pub fn new(values: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            values: values.into_iter(),
            position: 0,
        }
    }

    /// Number of values consumed so far.
    pub fn consumed(&self) -> usize {
        self.position
    }
}

impl<I> LeafSource for SequenceSource<I>
where
    I: Iterator,
    I::Item: IntoLeaf,
{
    fn next_leaf(
        &mut self,
        _current: &dyn Reflect,
        _site: &Site,
    ) -> Result<Box<dyn Reflect>, FlattenError> {
        let value = self
            .values
            .next()
            .ok_or(FlattenError::InsufficientData {
                position: self.position,
            })?;
        self.position += 1;
        Ok(value.into_leaf())
    }
}

/// Derives each replacement from the current leaf value. Never runs dry.
pub struct TransformSource<F> {
    transform: F,
}

impl<F> TransformSource<F>
where
    F: FnMut(&dyn Reflect) -> Box<dyn Reflect>,
{
    /// Replace every leaf with `transform(current)`.
    pub fn new(transform: F) -> Self {
        Self { transform }
    }
}

impl<F> LeafSource for TransformSource<F>
where
    F: FnMut(&dyn Reflect) -> Box<dyn Reflect>,
{
    fn next_leaf(
        &mut self,
        current: &dyn Reflect,
        _site: &Site,
    ) -> Result<Box<dyn Reflect>, FlattenError> {
        Ok((self.transform)(current))
    }
}

fn is_integer(shape: &Shape) -> bool {
    matches!(
        shape.def,
        Def::Scalar(sd) if matches!(sd.kind, ScalarKind::Integer { .. })
    )
}

/// Fit `value` into a slot of shape `target`.
///
/// Values of the slot's own type pass through. Between numeric scalars,
/// integer to integer goes through a range-checked `i128`, everything else
/// through `f64`; an integer slot only takes an integral, in-range value.
/// Any other combination is [`FlattenError::WrongShape`].
pub fn coerce(
    value: Box<dyn Reflect>,
    target: &'static Shape,
) -> Result<Box<dyn Reflect>, FlattenError> {
    let actual = value.shape();
    if actual == target {
        return Ok(value);
    }
    let mismatch = FlattenError::WrongShape {
        expected: target,
        actual,
    };
    let (Some(from), Some(to)) = (actual.numeric(), target.numeric()) else {
        return Err(mismatch);
    };
    let converted = if is_integer(actual) && is_integer(target) {
        (from.to_i128)(value.as_any()).and_then(to.from_i128)
    } else {
        (from.to_f64)(value.as_any()).and_then(to.from_f64)
    };
    converted.ok_or(mismatch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flatten_core::Shaped;

    fn coerce_to<T: Shaped>(value: impl IntoLeaf) -> Result<Box<dyn Reflect>, FlattenError> {
        coerce(value.into_leaf(), T::SHAPE)
    }

    #[test]
    fn same_type_passes_through() {
        let value = coerce_to::<String>("x".to_string()).unwrap();
        assert_eq!(
            value.downcast_ref::<String>().map(String::as_str),
            Some("x")
        );
    }

    #[test]
    fn integers_convert_with_range_checks() {
        let value = coerce_to::<u8>(200i64).unwrap();
        assert_eq!(value.downcast_ref::<u8>(), Some(&200));
        assert!(coerce_to::<u8>(300i64).is_err());
        assert!(coerce_to::<u32>(-1i32).is_err());
        let big = coerce_to::<i128>(u64::MAX).unwrap();
        assert_eq!(big.downcast_ref::<i128>(), Some(&(u64::MAX as i128)));
    }

    #[test]
    fn floats_and_integers_meet_through_f64() {
        let value = coerce_to::<f32>(3i64).unwrap();
        assert_eq!(value.downcast_ref::<f32>(), Some(&3.0));
        let value = coerce_to::<i64>(9.0f64).unwrap();
        assert_eq!(value.downcast_ref::<i64>(), Some(&9));
        let err = coerce_to::<i64>(9.5f64).unwrap_err();
        assert_eq!(err.to_string(), "Wrong shape: expected i64, but got f64");
    }

    #[test]
    fn non_numeric_mismatch_is_rejected() {
        let err = coerce_to::<f64>(true).unwrap_err();
        assert!(matches!(err, FlattenError::WrongShape { .. }));
        assert!(coerce_to::<String>(1u8).is_err());
    }

    #[test]
    fn sequence_source_reports_the_missing_position() {
        let mut source = SequenceSource::new(vec![1.0f64]);
        let site = Site::root(f64::SHAPE);
        let current = 0.0f64;
        assert!(source.next_leaf(&current, &site).is_ok());
        let err = source.next_leaf(&current, &site).unwrap_err();
        assert!(matches!(
            err,
            FlattenError::InsufficientData { position: 1 }
        ));
        assert_eq!(source.consumed(), 1);
    }
}
