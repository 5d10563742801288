//! Scalar type implementations: bool, char, strings, unit, integers, floats

use core::any::Any;

use crate::{Def, NumericOps, Reflect, ScalarDef, ScalarKind, Shape, Shaped};

/// Conversions every numeric primitive supports.
trait Numeric: Shaped + Copy {
    fn to_f64(self) -> f64;
    fn from_f64(value: f64) -> Option<Self>;
    fn to_i128(self) -> Option<i128>;
    fn from_i128(value: i128) -> Option<Self>;
}

fn erased_to_f64<T: Numeric>(value: &dyn Any) -> Option<f64> {
    value.downcast_ref::<T>().map(|v| v.to_f64())
}

fn erased_from_f64<T: Numeric>(value: f64) -> Option<Box<dyn Reflect>> {
    T::from_f64(value).map(|v| Box::new(v) as Box<dyn Reflect>)
}

fn erased_to_i128<T: Numeric>(value: &dyn Any) -> Option<i128> {
    value.downcast_ref::<T>().and_then(|v| v.to_i128())
}

fn erased_from_i128<T: Numeric>(value: i128) -> Option<Box<dyn Reflect>> {
    T::from_i128(value).map(|v| Box::new(v) as Box<dyn Reflect>)
}

const fn numeric_ops<T: Numeric>() -> NumericOps {
    NumericOps {
        to_f64: erased_to_f64::<T>,
        from_f64: erased_from_f64::<T>,
        to_i128: erased_to_i128::<T>,
        from_i128: erased_from_i128::<T>,
    }
}

macro_rules! impl_shaped_for_integer {
    ($type:ty, $signed:expr) => {
        impl Numeric for $type {
            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }

            fn from_f64(value: f64) -> Option<Self> {
                // `MAX as f64` rounds up to a power of two for the wide types
                let above_max = <$type>::MAX as f64 + 1.0;
                // NaN and infinities have a NaN fraction
                if value.fract() != 0.0 || value < <$type>::MIN as f64 || value >= above_max {
                    return None;
                }
                Some(value as $type)
            }

            #[inline]
            fn to_i128(self) -> Option<i128> {
                i128::try_from(self).ok()
            }

            #[inline]
            fn from_i128(value: i128) -> Option<Self> {
                <$type>::try_from(value).ok()
            }
        }

        impl Shaped for $type {
            const SHAPE: &'static Shape = &const {
                Shape::builder::<$type>(stringify!($type))
                    .module_path("core")
                    .def(Def::Scalar(ScalarDef {
                        kind: ScalarKind::Integer {
                            signed: $signed,
                            bits: <$type>::BITS,
                        },
                        numeric: Some(numeric_ops::<$type>()),
                    }))
                    .build()
            };
        }
    };
}

impl_shaped_for_integer!(u8, false);
impl_shaped_for_integer!(i8, true);
impl_shaped_for_integer!(u16, false);
impl_shaped_for_integer!(i16, true);
impl_shaped_for_integer!(u32, false);
impl_shaped_for_integer!(i32, true);
impl_shaped_for_integer!(u64, false);
impl_shaped_for_integer!(i64, true);
impl_shaped_for_integer!(u128, false);
impl_shaped_for_integer!(i128, true);
impl_shaped_for_integer!(usize, false);
impl_shaped_for_integer!(isize, true);

macro_rules! impl_shaped_for_float {
    ($type:ty, $bits:expr) => {
        impl Numeric for $type {
            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }

            #[inline]
            fn from_f64(value: f64) -> Option<Self> {
                let narrowed = value as $type;
                // a finite value must not overflow to infinity
                (narrowed.is_finite() || !value.is_finite()).then_some(narrowed)
            }

            #[inline]
            fn to_i128(self) -> Option<i128> {
                None
            }

            #[inline]
            fn from_i128(value: i128) -> Option<Self> {
                Some(value as $type)
            }
        }

        impl Shaped for $type {
            const SHAPE: &'static Shape = &const {
                Shape::builder::<$type>(stringify!($type))
                    .module_path("core")
                    .def(Def::Scalar(ScalarDef {
                        kind: ScalarKind::Float { bits: $bits },
                        numeric: Some(numeric_ops::<$type>()),
                    }))
                    .build()
            };
        }
    };
}

impl_shaped_for_float!(f32, 32);
impl_shaped_for_float!(f64, 64);

macro_rules! impl_shaped_for_scalar {
    ($type:ty, $name:expr, $module:expr, $kind:expr) => {
        impl Shaped for $type {
            const SHAPE: &'static Shape = &const {
                Shape::builder::<$type>($name)
                    .module_path($module)
                    .def(Def::Scalar(ScalarDef {
                        kind: $kind,
                        numeric: None,
                    }))
                    .build()
            };
        }
    };
}

impl_shaped_for_scalar!(bool, "bool", "core", ScalarKind::Boolean);
impl_shaped_for_scalar!(char, "char", "core", ScalarKind::Char);
impl_shaped_for_scalar!(String, "String", "alloc::string", ScalarKind::Str);
impl_shaped_for_scalar!(&'static str, "&str", "core", ScalarKind::Str);
impl_shaped_for_scalar!((), "()", "core", ScalarKind::Unit);
