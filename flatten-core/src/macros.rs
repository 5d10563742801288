/// Declare a struct and implement [`Shaped`](crate::Shaped) for it.
///
/// The struct must derive (or implement) `Clone` and `Debug`. Plain type
/// parameters are supported; each gets a `Shaped` bound on the generated
/// impl.
///
/// An optional leading `#[reflect(...)]` attribute controls the generated
/// shape:
///
/// - `pod`: fields may be overwritten in place by `update`. Without it the
///   struct is only ever replaced as a whole, through its constructor.
/// - `no_constructor`: no structural default constructor is generated;
///   rebuilding the struct requires an override registered in a
///   [`ConstructorRegistry`](crate::ConstructorRegistry).
///
/// ```
/// use flatten_core::{Shaped, reflect};
///
/// reflect! {
///     #[reflect(pod)]
///     #[derive(Clone, Debug, PartialEq)]
///     pub struct Point<T> {
///         pub x: T,
///         pub y: T,
///     }
/// }
///
/// let shape = <Point<f64> as Shaped>::SHAPE;
/// assert!(shape.is_pod());
/// assert_eq!(shape.field("y").map(|f| f.shape()), Some(f64::SHAPE));
/// ```
#[macro_export]
macro_rules! reflect {
    (#[reflect(pod, no_constructor)] $($rest:tt)*) => {
        $crate::__reflect_struct! { @config [Pod] [none] $($rest)* }
    };
    (#[reflect(no_constructor, pod)] $($rest:tt)*) => {
        $crate::__reflect_struct! { @config [Pod] [none] $($rest)* }
    };
    (#[reflect(pod)] $($rest:tt)*) => {
        $crate::__reflect_struct! { @config [Pod] [structural] $($rest)* }
    };
    (#[reflect(no_constructor)] $($rest:tt)*) => {
        $crate::__reflect_struct! { @config [Immutable] [none] $($rest)* }
    };
    ($($rest:tt)*) => {
        $crate::__reflect_struct! { @config [Immutable] [structural] $($rest)* }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __reflect_struct {
    (
        @config [$mutability:ident] [$ctor:ident]
        $(#[$meta:meta])*
        $vis:vis struct $name:ident $(< $($param:ident),+ $(,)? >)? {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name $(< $($param),+ >)? {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $(< $($param: $crate::Shaped),+ >)? $crate::Shaped for $name $(< $($param),+ >)? {
            const SHAPE: &'static $crate::Shape = &const {
                $crate::Shape::builder::<Self>(stringify!($name))
                    .module_path(module_path!())
                    .def($crate::Def::Struct($crate::StructDef {
                        kind: $crate::StructKind::Struct,
                        fields: &const {
                            [$($crate::Field::new(stringify!($field), $crate::shape_of::<$ty>)),*]
                        },
                        construct: $crate::__reflect_struct!(@construct_fn $ctor),
                    }))
                    .mutability($crate::Mutability::$mutability)
                    .build()
            };

            fn children(&self) -> ::std::vec::Vec<&dyn $crate::Reflect> {
                ::std::vec![$(&self.$field as &dyn $crate::Reflect),*]
            }

            fn children_mut(&mut self) -> ::std::vec::Vec<&mut dyn $crate::Reflect> {
                ::std::vec![$(&mut self.$field as &mut dyn $crate::Reflect),*]
            }

            $crate::__reflect_struct! {
                @construct $ctor { $($field : $ty),* }
            }
        }
    };

    (@construct_fn structural) => {
        ::core::option::Option::Some($crate::construct_erased::<Self>)
    };
    (@construct_fn none) => {
        ::core::option::Option::None
    };

    (@construct structural { $($field:ident : $ty:ty),* }) => {
        fn construct(
            mut values: $crate::FieldValues,
        ) -> ::core::result::Result<Self, $crate::FlattenError> {
            values.expect_arity(<[&str]>::len(&[$(stringify!($field)),*]))?;
            ::core::result::Result::Ok(Self {
                $($field: values.take::<$ty>()?,)*
            })
        }
    };
    (@construct none { $($field:ident : $ty:ty),* }) => {};
}
