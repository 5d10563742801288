use core::any::Any;
use core::fmt;
use std::collections::VecDeque;

use crate::{FlattenError, Shape};

/// Static side of reflection: a type that knows its [`Shape`] and exposes
/// its children.
///
/// Implemented for std scalars, sequences and tuples by this crate, and for
/// user structs by the [`reflect!`](crate::reflect) macro.
pub trait Shaped: Clone + fmt::Debug + Send + Sync + 'static {
    /// The shape of this type.
    const SHAPE: &'static Shape;

    /// Struct fields or sequence elements, in traversal order.
    ///
    /// Scalars have none.
    fn children(&self) -> Vec<&dyn Reflect> {
        Vec::new()
    }

    /// Mutable struct fields or sequence elements, in traversal order.
    fn children_mut(&mut self) -> Vec<&mut dyn Reflect> {
        Vec::new()
    }

    /// Structural default constructor: build a value from its ordered field
    /// values.
    fn construct(_values: FieldValues) -> Result<Self, FlattenError> {
        Err(FlattenError::MissingConstructor { shape: Self::SHAPE })
    }
}

/// Object-safe side of reflection.
///
/// Blanket-implemented for every [`Shaped`] type; the engine works on
/// `&dyn Reflect`, `&mut dyn Reflect` and `Box<dyn Reflect>`.
pub trait Reflect: Any + Send + Sync {
    /// The shape of the concrete type.
    fn shape(&self) -> &'static Shape;

    /// See [`Shaped::children`].
    fn children(&self) -> Vec<&dyn Reflect>;

    /// See [`Shaped::children_mut`].
    fn children_mut(&mut self) -> Vec<&mut dyn Reflect>;

    /// Clone into a fresh box.
    fn clone_boxed(&self) -> Box<dyn Reflect>;

    /// Overwrite this value with `value`. Hands `value` back if its type
    /// differs.
    fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>>;

    /// Upcast for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Upcast for downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Upcast for downcasting.
    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    /// Debug-format the concrete value.
    fn fmt_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl<T: Shaped> Reflect for T {
    #[inline]
    fn shape(&self) -> &'static Shape {
        T::SHAPE
    }

    fn children(&self) -> Vec<&dyn Reflect> {
        Shaped::children(self)
    }

    fn children_mut(&mut self) -> Vec<&mut dyn Reflect> {
        Shaped::children_mut(self)
    }

    fn clone_boxed(&self) -> Box<dyn Reflect> {
        Box::new(self.clone())
    }

    fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
        *self = *value.downcast::<T>()?;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn fmt_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl dyn Reflect {
    /// Returns true if the concrete type is `T`.
    #[inline]
    pub fn is<T: Shaped>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// Borrow as `T` if the concrete type is `T`.
    #[inline]
    pub fn downcast_ref<T: Shaped>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Mutably borrow as `T` if the concrete type is `T`.
    #[inline]
    pub fn downcast_mut<T: Shaped>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    /// Unbox as `T`, or hand the box back unchanged.
    pub fn downcast<T: Shaped>(self: Box<Self>) -> Result<Box<T>, Box<dyn Reflect>> {
        if !self.is::<T>() {
            return Err(self);
        }
        match self.into_any().downcast::<T>() {
            Ok(value) => Ok(value),
            Err(_) => unreachable!("type checked before unboxing"),
        }
    }

    /// Read a numeric scalar as `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        self.shape()
            .numeric()
            .and_then(|ops| (ops.to_f64)(self.as_any()))
    }
}

impl fmt::Debug for dyn Reflect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_debug(f)
    }
}

impl Clone for Box<dyn Reflect> {
    fn clone(&self) -> Self {
        (**self).clone_boxed()
    }
}

/// Unbox a reflected value as `T`, reporting a shape mismatch as an error.
pub fn take_value<T: Shaped>(value: Box<dyn Reflect>) -> Result<T, FlattenError> {
    value
        .downcast::<T>()
        .map(|value| *value)
        .map_err(|other| FlattenError::WrongShape {
            expected: T::SHAPE,
            actual: other.shape(),
        })
}

/// Anything a data source can hand out as a leaf value: a concrete
/// [`Shaped`] value, or an already boxed one such as the output of a flatten.
pub trait IntoLeaf {
    /// Box the value.
    fn into_leaf(self) -> Box<dyn Reflect>;
}

impl<T: Shaped> IntoLeaf for T {
    #[inline]
    fn into_leaf(self) -> Box<dyn Reflect> {
        Box::new(self)
    }
}

impl IntoLeaf for Box<dyn Reflect> {
    #[inline]
    fn into_leaf(self) -> Box<dyn Reflect> {
        self
    }
}

/// Erases [`Shaped::construct`] into a [`ConstructFn`](crate::ConstructFn).
pub fn construct_erased<T: Shaped>(values: FieldValues) -> Result<Box<dyn Reflect>, FlattenError> {
    T::construct(values).map(|value| Box::new(value) as Box<dyn Reflect>)
}

/// The ordered field values handed to a constructor.
///
/// Values are consumed front to back, in field declaration order.
pub struct FieldValues {
    shape: &'static Shape,
    values: VecDeque<Box<dyn Reflect>>,
    total: usize,
}

impl FieldValues {
    /// Wrap the field values of a `shape` instance.
    pub fn new(shape: &'static Shape, values: Vec<Box<dyn Reflect>>) -> Self {
        let total = values.len();
        Self {
            shape,
            values: values.into(),
            total,
        }
    }

    /// The shape being constructed.
    pub fn shape(&self) -> &'static Shape {
        self.shape
    }

    /// Number of values not yet taken.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true once every value has been taken.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Fail unless exactly `expected` values were supplied.
    pub fn expect_arity(&self, expected: usize) -> Result<(), FlattenError> {
        if self.total == expected {
            Ok(())
        } else {
            Err(FlattenError::ConstructorMismatch {
                shape: self.shape,
                expected,
                actual: self.total,
            })
        }
    }

    /// Take the next value as `T`.
    pub fn take<T: Shaped>(&mut self) -> Result<T, FlattenError> {
        take_value(self.take_boxed()?)
    }

    /// Take the next value without unboxing it.
    pub fn take_boxed(&mut self) -> Result<Box<dyn Reflect>, FlattenError> {
        let taken = self.total - self.values.len();
        self.values
            .pop_front()
            .ok_or(FlattenError::ConstructorMismatch {
                shape: self.shape,
                expected: taken + 1,
                actual: self.total,
            })
    }
}

impl fmt::Debug for FieldValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldValues")
            .field("shape", &self.shape.type_identifier)
            .field("values", &self.values)
            .finish()
    }
}
