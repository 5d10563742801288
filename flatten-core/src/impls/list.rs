//! Sequences: `Vec<T>`, `[T; N]` and `Option<T>`

use crate::{Def, FlattenError, ListDef, Reflect, Shape, Shaped, shape_of, take_value};

fn vec_from_elements<T: Shaped>(
    elements: Vec<Box<dyn Reflect>>,
) -> Result<Box<dyn Reflect>, FlattenError> {
    let items = elements
        .into_iter()
        .map(take_value::<T>)
        .collect::<Result<Vec<T>, _>>()?;
    Ok(Box::new(items))
}

impl<T: Shaped> Shaped for Vec<T> {
    const SHAPE: &'static Shape = &const {
        Shape::builder::<Self>("Vec")
            .module_path("alloc::vec")
            .def(Def::List(ListDef {
                t: shape_of::<T>,
                from_elements: vec_from_elements::<T>,
            }))
            .pod()
            .build()
    };

    fn children(&self) -> Vec<&dyn Reflect> {
        self.iter().map(|item| item as &dyn Reflect).collect()
    }

    fn children_mut(&mut self) -> Vec<&mut dyn Reflect> {
        self.iter_mut()
            .map(|item| item as &mut dyn Reflect)
            .collect()
    }
}

fn array_from_elements<T: Shaped, const N: usize>(
    elements: Vec<Box<dyn Reflect>>,
) -> Result<Box<dyn Reflect>, FlattenError> {
    let items = elements
        .into_iter()
        .map(take_value::<T>)
        .collect::<Result<Vec<T>, _>>()?;
    let array = <[T; N]>::try_from(items).map_err(|items| FlattenError::ConstructorMismatch {
        shape: <[T; N]>::SHAPE,
        expected: N,
        actual: items.len(),
    })?;
    Ok(Box::new(array))
}

impl<T: Shaped, const N: usize> Shaped for [T; N] {
    const SHAPE: &'static Shape = &const {
        Shape::builder::<Self>("array")
            .module_path("core")
            .def(Def::List(ListDef {
                t: shape_of::<T>,
                from_elements: array_from_elements::<T, N>,
            }))
            .pod()
            .build()
    };

    fn children(&self) -> Vec<&dyn Reflect> {
        self.iter().map(|item| item as &dyn Reflect).collect()
    }

    fn children_mut(&mut self) -> Vec<&mut dyn Reflect> {
        self.iter_mut()
            .map(|item| item as &mut dyn Reflect)
            .collect()
    }
}

fn option_from_elements<T: Shaped>(
    elements: Vec<Box<dyn Reflect>>,
) -> Result<Box<dyn Reflect>, FlattenError> {
    let len = elements.len();
    let mut elements = elements.into_iter();
    let value = match (elements.next(), len) {
        (None, _) => None,
        (Some(element), 1) => Some(take_value::<T>(element)?),
        (Some(_), _) => {
            return Err(FlattenError::ConstructorMismatch {
                shape: <Option<T>>::SHAPE,
                expected: 1,
                actual: len,
            });
        }
    };
    Ok(Box::new(value))
}

/// `Option<T>` is a sequence of zero or one element.
impl<T: Shaped> Shaped for Option<T> {
    const SHAPE: &'static Shape = &const {
        Shape::builder::<Self>("Option")
            .module_path("core::option")
            .def(Def::List(ListDef {
                t: shape_of::<T>,
                from_elements: option_from_elements::<T>,
            }))
            .pod()
            .build()
    };

    fn children(&self) -> Vec<&dyn Reflect> {
        self.iter().map(|item| item as &dyn Reflect).collect()
    }

    fn children_mut(&mut self) -> Vec<&mut dyn Reflect> {
        self.iter_mut()
            .map(|item| item as &mut dyn Reflect)
            .collect()
    }
}
