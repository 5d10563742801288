//! Constructor resolution: how a composite is rebuilt from its ordered field
//! values.
//!
//! The default is the structural constructor generated by
//! [`reflect!`](crate::reflect), which takes every field in declaration
//! order. Types whose field layout is not a valid constructor argument list
//! register an override in a [`ConstructorRegistry`].

use core::any::TypeId;
use core::fmt;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use crate::{Def, FieldValues, FlattenError, Reflect, Shape, Shaped};

type BuildFn = dyn Fn(FieldValues) -> Result<Box<dyn Reflect>, FlattenError> + Send + Sync;

/// A registered constructor override.
#[derive(Clone)]
pub struct Constructor {
    arity: usize,
    build: Arc<BuildFn>,
}

impl Constructor {
    /// Number of field values this constructor takes.
    pub fn arity(&self) -> usize {
        self.arity
    }

    fn call(
        &self,
        shape: &'static Shape,
        values: Vec<Box<dyn Reflect>>,
    ) -> Result<Box<dyn Reflect>, FlattenError> {
        if values.len() != self.arity {
            return Err(FlattenError::ConstructorMismatch {
                shape,
                expected: self.arity,
                actual: values.len(),
            });
        }
        (self.build)(FieldValues::new(shape, values))
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

static GLOBAL: LazyLock<ConstructorRegistry> = LazyLock::new(ConstructorRegistry::new);

/// Per-type constructor overrides.
///
/// Starts empty. Entries are only added by [`register`](Self::register) and
/// only removed by [`unregister`](Self::unregister). The process-wide
/// instance is [`ConstructorRegistry::global`]; tests create their own with
/// [`ConstructorRegistry::new`] and hand it to the call that needs it.
#[derive(Default)]
pub struct ConstructorRegistry {
    overrides: RwLock<HashMap<TypeId, Constructor>>,
}

impl ConstructorRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry.
    pub fn global() -> &'static ConstructorRegistry {
        &GLOBAL
    }

    /// Register `build` as the constructor of `T`, replacing any previous
    /// override. `arity` is the number of field values `build` consumes.
    ///
    /// Fails with [`FlattenError::Configuration`] if `T` is not a struct.
    pub fn register<T, F>(&self, arity: usize, build: F) -> Result<(), FlattenError>
    where
        T: Shaped,
        F: Fn(FieldValues) -> Result<T, FlattenError> + Send + Sync + 'static,
    {
        let shape = T::SHAPE;
        if shape.struct_def().is_none() {
            return Err(FlattenError::configuration(format!(
                "{shape} is not a struct, constructors can only be registered for structs"
            )));
        }
        let constructor = Constructor {
            arity,
            build: Arc::new(move |values| {
                build(values).map(|value| Box::new(value) as Box<dyn Reflect>)
            }),
        };
        self.overrides
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(shape.id.get(), constructor);
        Ok(())
    }

    /// Remove the override for `T`. Returns true if there was one.
    pub fn unregister<T: Shaped>(&self) -> bool {
        self.overrides
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&T::SHAPE.id.get())
            .is_some()
    }

    /// Returns true if an override is registered for `T`.
    pub fn contains<T: Shaped>(&self) -> bool {
        self.lookup(T::SHAPE).is_some()
    }

    /// The override registered for `shape`, if any.
    pub fn lookup(&self, shape: &Shape) -> Option<Constructor> {
        self.overrides
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&shape.id.get())
            .cloned()
    }

    /// Build a `shape` instance from its ordered field values: the
    /// registered override if there is one, the structural default
    /// otherwise.
    pub fn construct(
        &self,
        shape: &'static Shape,
        values: Vec<Box<dyn Reflect>>,
    ) -> Result<Box<dyn Reflect>, FlattenError> {
        // the lock is released before calling into user code
        if let Some(constructor) = self.lookup(shape) {
            return constructor.call(shape, values);
        }
        match shape.def {
            Def::Struct(sd) => match sd.construct {
                Some(construct) => construct(FieldValues::new(shape, values)),
                None => Err(FlattenError::MissingConstructor { shape }),
            },
            _ => Err(FlattenError::InvariantViolation {
                reason: "only structs are built through constructors",
            }),
        }
    }
}

impl fmt::Debug for ConstructorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let overrides = self
            .overrides
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("ConstructorRegistry")
            .field("overrides", &overrides.len())
            .finish()
    }
}
