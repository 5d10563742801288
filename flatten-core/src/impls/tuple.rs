//! Tuples of arity 1 through 6, reflected as composites with positional fields

use crate::{
    Def, Field, FieldValues, FlattenError, Reflect, Shape, Shaped, StructDef, StructKind,
    construct_erased, shape_of,
};

macro_rules! impl_shaped_for_tuple {
    ($arity:literal; $($T:ident $idx:tt),+) => {
        impl<$($T: Shaped),+> Shaped for ($($T,)+) {
            const SHAPE: &'static Shape = &const {
                // one declaration per arity
                Shape::builder::<Self>(concat!("tuple", $arity))
                    .module_path("core")
                    .def(Def::Struct(StructDef {
                        kind: StructKind::Tuple,
                        fields: &const { [$(Field::new(stringify!($idx), shape_of::<$T>)),+] },
                        construct: Some(construct_erased::<Self>),
                    }))
                    .pod()
                    .build()
            };

            fn children(&self) -> Vec<&dyn Reflect> {
                vec![$(&self.$idx as &dyn Reflect),+]
            }

            fn children_mut(&mut self) -> Vec<&mut dyn Reflect> {
                vec![$(&mut self.$idx as &mut dyn Reflect),+]
            }

            fn construct(mut values: FieldValues) -> Result<Self, FlattenError> {
                values.expect_arity($arity)?;
                Ok(($(values.take::<$T>()?,)+))
            }
        }
    };
}

impl_shaped_for_tuple!(1; A 0);
impl_shaped_for_tuple!(2; A 0, B 1);
impl_shaped_for_tuple!(3; A 0, B 1, C 2);
impl_shaped_for_tuple!(4; A 0, B 1, C 2, D 3);
impl_shaped_for_tuple!(5; A 0, B 1, C 2, D 3, E 4);
impl_shaped_for_tuple!(6; A 0, B 1, C 2, D 3, E 4, F 5);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConstructorRegistry;

    #[test]
    fn tuple_fields_are_positional() {
        let sd = <(f64, String, u8)>::SHAPE.struct_def().unwrap();
        let names: Vec<_> = sd.fields.iter().map(|f| f.name).collect();
        assert_eq!(names, ["0", "1", "2"]);
        assert_eq!(sd.fields[1].shape(), String::SHAPE);
    }

    #[test]
    fn tuple_construct_takes_values_in_order() {
        let registry = ConstructorRegistry::new();
        let built = registry
            .construct(
                <(u8, f32)>::SHAPE,
                vec![Box::new(7u8) as Box<dyn Reflect>, Box::new(0.5f32)],
            )
            .unwrap();
        assert_eq!(built.downcast_ref::<(u8, f32)>(), Some(&(7, 0.5)));
    }

    #[test]
    fn tuple_children_follow_field_order() {
        let value = (1u8, 2u16);
        let children = Reflect::children(&value);
        assert_eq!(children.len(), 2);
        assert!(children[0].is::<u8>());
        assert!(children[1].is::<u16>());
    }

    #[test]
    fn each_arity_is_its_own_declaration() {
        let pair = <(f64, f64)>::SHAPE;
        let triple = <(f64, f64, f64)>::SHAPE;
        assert_eq!(pair.type_identifier, "tuple2");
        assert_ne!(pair.decl_id, triple.decl_id);
        assert_eq!(pair.decl_id, <(u8, String)>::SHAPE.decl_id);
    }
}
