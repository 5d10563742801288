use core::any::{Any, TypeId};
use core::fmt;
use core::hash::{Hash, Hasher};

use crate::{FieldValues, FlattenError, Reflect, Shaped};

/// TypeId equivalent usable in const contexts.
#[derive(Copy, Clone)]
pub struct ConstTypeId {
    type_id_fn: fn() -> TypeId,
}

impl ConstTypeId {
    /// Create a [`ConstTypeId`] for a type.
    #[must_use]
    pub const fn of<T: ?Sized + 'static>() -> Self {
        ConstTypeId {
            type_id_fn: TypeId::of::<T>,
        }
    }

    /// Get the underlying [`TypeId`].
    #[inline]
    pub fn get(self) -> TypeId {
        (self.type_id_fn)()
    }
}

impl fmt::Debug for ConstTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.get(), f)
    }
}

impl PartialEq for ConstTypeId {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.get() == other.get()
    }
}

impl Eq for ConstTypeId {}

impl Hash for ConstTypeId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // function pointers are not unique per type across codegen units
        self.get().hash(state);
    }
}

/// Identifies a type declaration independent of its type parameters.
///
/// `Bar<i64>` and `Bar<f32>` have different [`ConstTypeId`]s but the same
/// `DeclId`, which is what lets a [`TypeSet`](crate::TypeSet) or a
/// [`SelectionTable`](crate::SelectionTable) talk about "every `Bar`".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DeclId {
    /// Module the type is declared in (`module_path!()`).
    pub module_path: &'static str,
    /// Bare type name, without generic parameters.
    pub name: &'static str,
}

impl DeclId {
    /// Create a declaration identifier.
    pub const fn new(module_path: &'static str, name: &'static str) -> Self {
        Self { module_path, name }
    }
}

/// Whether values of a shape can be changed in place through reflection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mutability {
    /// Plain old data: any combination of valid field values is a valid
    /// instance, so fields may be overwritten directly.
    Pod,
    /// The type may hold invariants between its fields. It is only ever
    /// replaced as a whole, through its constructor.
    Immutable,
}

/// Schema for reflection of a type.
///
/// Every [`Shaped`] type owns exactly one `Shape`, reachable as
/// `T::SHAPE`. Shapes are compared by [`ConstTypeId`].
#[derive(Clone, Copy)]
pub struct Shape {
    /// Unique type identifier.
    pub id: ConstTypeId,

    /// Declaration identifier, shared by all instantiations of a generic type.
    pub decl_id: DeclId,

    /// Bare name of the type, e.g. `Vec` or `Foo`.
    pub type_identifier: &'static str,

    /// Full type name including generic arguments.
    pub type_name: fn() -> &'static str,

    /// What the type is made of.
    pub def: Def,

    /// Whether the type may be mutated field by field.
    pub mutability: Mutability,
}

impl Shape {
    /// Start building the shape of `T`.
    pub const fn builder<T: ?Sized + 'static>(type_identifier: &'static str) -> ShapeBuilder {
        ShapeBuilder {
            id: ConstTypeId::of::<T>(),
            decl_id: DeclId::new("", type_identifier),
            type_identifier,
            type_name: core::any::type_name::<T>,
            def: Def::Scalar(ScalarDef::OPAQUE),
            mutability: Mutability::Immutable,
        }
    }

    /// Returns true if this shape describes `T`.
    #[inline]
    pub fn is_type<T: Shaped>(&self) -> bool {
        self.id == T::SHAPE.id
    }

    /// Full type name, generic arguments included.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        (self.type_name)()
    }

    /// Returns true if values of this shape have children the engine can
    /// descend into: a struct with at least one field, or any sequence.
    pub fn is_decomposable(&self) -> bool {
        match self.def {
            Def::Struct(sd) => !sd.fields.is_empty(),
            Def::List(_) => true,
            Def::Scalar(_) => false,
        }
    }

    /// Returns true if fields or elements may be overwritten in place.
    #[inline]
    pub fn is_pod(&self) -> bool {
        self.mutability == Mutability::Pod
    }

    /// The struct definition, if this is a composite.
    pub fn struct_def(&self) -> Option<StructDef> {
        match self.def {
            Def::Struct(sd) => Some(sd),
            _ => None,
        }
    }

    /// Numeric conversion hooks, if this is a numeric scalar.
    pub fn numeric(&self) -> Option<NumericOps> {
        match self.def {
            Def::Scalar(sd) => sd.numeric,
            _ => None,
        }
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&'static Field> {
        match self.def {
            Def::Struct(sd) => sd.fields.iter().find(|f| f.name == name),
            _ => None,
        }
    }
}

impl PartialEq for Shape {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Shape {}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_identifier)
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shape")
            .field("type_name", &self.type_name())
            .field("def", &self.def)
            .field("mutability", &self.mutability)
            .finish_non_exhaustive()
    }
}

/// Const builder for [`Shape`].
#[derive(Clone, Copy)]
pub struct ShapeBuilder {
    id: ConstTypeId,
    decl_id: DeclId,
    type_identifier: &'static str,
    type_name: fn() -> &'static str,
    def: Def,
    mutability: Mutability,
}

impl ShapeBuilder {
    /// Module the type is declared in.
    pub const fn module_path(mut self, module_path: &'static str) -> Self {
        self.decl_id = DeclId::new(module_path, self.type_identifier);
        self
    }

    /// Set the definition.
    pub const fn def(mut self, def: Def) -> Self {
        self.def = def;
        self
    }

    /// Set the mutability.
    pub const fn mutability(mut self, mutability: Mutability) -> Self {
        self.mutability = mutability;
        self
    }

    /// Mark the type as plain old data.
    pub const fn pod(self) -> Self {
        self.mutability(Mutability::Pod)
    }

    /// Finish the shape.
    pub const fn build(self) -> Shape {
        Shape {
            id: self.id,
            decl_id: self.decl_id,
            type_identifier: self.type_identifier,
            type_name: self.type_name,
            def: self.def,
            mutability: self.mutability,
        }
    }
}

/// The semantic definition of a shape: a scalar, a composite or a sequence.
#[derive(Clone, Copy, Debug)]
pub enum Def {
    /// Not composed of other reflected values.
    ///
    /// e.g. `u32`, `String`, `bool`
    Scalar(ScalarDef),

    /// Ordered list of named (or positional) fields.
    ///
    /// e.g. user structs, tuples
    Struct(StructDef),

    /// Ordered, indexable sequence of homogeneous elements.
    ///
    /// e.g. `Vec<T>`, `[T; N]`, `Option<T>`
    List(ListDef),
}

/// Definition of a scalar.
#[derive(Clone, Copy, Debug)]
pub struct ScalarDef {
    /// What kind of scalar this is.
    pub kind: ScalarKind,
    /// Conversion hooks, present for integers and floats.
    pub numeric: Option<NumericOps>,
}

impl ScalarDef {
    /// A scalar the engine knows nothing about.
    pub const OPAQUE: Self = Self {
        kind: ScalarKind::Opaque,
        numeric: None,
    };
}

/// Describes built-in scalar kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScalarKind {
    /// Integer (`u16`, `i8`, `usize`, etc.)
    Integer {
        /// whether the integer is signed
        signed: bool,
        /// width in bits
        bits: u32,
    },
    /// Floating-point (`f32`, `f64`)
    Float {
        /// width in bits
        bits: u32,
    },
    /// `bool`
    Boolean,
    /// `char`
    Char,
    /// `String` and `&'static str`
    Str,
    /// `()`
    Unit,
    /// Anything else
    Opaque,
}

impl ScalarKind {
    /// Returns true for integers and floats.
    pub const fn is_numeric(self) -> bool {
        matches!(self, ScalarKind::Integer { .. } | ScalarKind::Float { .. })
    }
}

/// Type-erased conversions for numeric scalars.
///
/// Used to coerce a replacement leaf into the type of the slot it lands in.
#[derive(Clone, Copy)]
pub struct NumericOps {
    /// Read the value as an `f64`.
    pub to_f64: fn(&dyn Any) -> Option<f64>,
    /// Build a value from an `f64`. Integers reject non-integral or
    /// out-of-range input.
    pub from_f64: fn(f64) -> Option<Box<dyn Reflect>>,
    /// Read the value as an `i128`. `None` for floats.
    pub to_i128: fn(&dyn Any) -> Option<i128>,
    /// Build a value from an `i128`, range-checked for integers.
    pub from_i128: fn(i128) -> Option<Box<dyn Reflect>>,
}

impl fmt::Debug for NumericOps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NumericOps").finish_non_exhaustive()
    }
}

/// Describes the kind of struct.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StructKind {
    /// struct S { foo: T0, bar: T1 }
    Struct,
    /// (T0, T1)
    Tuple,
}

/// Builds a composite from its ordered field values.
pub type ConstructFn = fn(FieldValues) -> Result<Box<dyn Reflect>, FlattenError>;

/// Common fields for struct-like types
#[derive(Clone, Copy)]
pub struct StructDef {
    /// the kind of struct
    pub kind: StructKind,

    /// all fields, in declaration order
    pub fields: &'static [Field],

    /// Structural default constructor. `None` when the field layout is not a
    /// valid constructor argument list; an override must then be registered.
    pub construct: Option<ConstructFn>,
}

impl fmt::Debug for StructDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructDef")
            .field("kind", &self.kind)
            .field("fields", &self.fields)
            .field("construct", &self.construct.is_some())
            .finish()
    }
}

/// Describes a field in a struct or tuple
#[derive(Clone, Copy)]
pub struct Field {
    /// key for the struct field (for tuples, the 0-based index)
    pub name: &'static str,

    /// shape of the declared field type
    ///
    /// the layer of indirection allows for recursive type definitions
    pub shape: fn() -> &'static Shape,
}

impl Field {
    /// Describe a field.
    pub const fn new(name: &'static str, shape: fn() -> &'static Shape) -> Self {
        Self { name, shape }
    }

    /// Returns the shape of the declared field type
    #[inline]
    pub fn shape(&self) -> &'static Shape {
        (self.shape)()
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.shape().type_identifier)
    }
}

/// Rebuilds a sequence from its ordered elements.
pub type FromElementsFn = fn(Vec<Box<dyn Reflect>>) -> Result<Box<dyn Reflect>, FlattenError>;

/// Fields for list types
#[derive(Clone, Copy)]
pub struct ListDef {
    /// shape of the items in the list
    pub t: fn() -> &'static Shape,

    /// builds a new list from its elements, in order
    pub from_elements: FromElementsFn,
}

impl ListDef {
    /// Returns the shape of the items in the list
    #[inline]
    pub fn t(&self) -> &'static Shape {
        (self.t)()
    }
}

impl fmt::Debug for ListDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListDef")
            .field("t", &self.t().type_identifier)
            .finish_non_exhaustive()
    }
}

/// Returns the shape of `T`; usable as a `fn() -> &'static Shape` pointer.
pub const fn shape_of<T: Shaped>() -> &'static Shape {
    T::SHAPE
}
