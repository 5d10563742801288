use crate::{ConstTypeId, DeclId, Def, ScalarKind, Shape, Shaped};

/// Scalar categories a [`TypeSet`] can match as a whole.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    /// Every integer and float.
    Number,
    /// Every integer.
    Integer,
    /// Every float.
    Float,
    /// `bool`.
    Boolean,
    /// `char`, `String` and `&'static str`.
    Textual,
}

impl Category {
    fn matches(self, kind: ScalarKind) -> bool {
        match self {
            Category::Number => kind.is_numeric(),
            Category::Integer => matches!(kind, ScalarKind::Integer { .. }),
            Category::Float => matches!(kind, ScalarKind::Float { .. }),
            Category::Boolean => kind == ScalarKind::Boolean,
            Category::Textual => matches!(kind, ScalarKind::Char | ScalarKind::Str),
        }
    }
}

/// One member of a [`TypeSet`] union.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeMatcher {
    /// Matches every type.
    Any,
    /// Matches exactly one type.
    Exact(ConstTypeId),
    /// Matches every instantiation of one type declaration.
    Decl(DeclId),
    /// Matches scalars of a category.
    Category(Category),
}

impl TypeMatcher {
    fn matches(&self, shape: &Shape) -> bool {
        match self {
            TypeMatcher::Any => true,
            TypeMatcher::Exact(id) => shape.id == *id,
            TypeMatcher::Decl(decl_id) => shape.decl_id == *decl_id,
            TypeMatcher::Category(category) => match shape.def {
                Def::Scalar(sd) => category.matches(sd.kind),
                _ => false,
            },
        }
    }
}

/// A set of types, expressed as a union of matchers.
///
/// Used for both the `use` set (types captured as leaves) and the `ignore`
/// set (types excluded with their whole subtree).
///
/// ```
/// use flatten_core::{Category, TypeSet};
///
/// let set = TypeSet::of::<i64>().with::<f32>();
/// assert!(set.contains(<i64 as flatten_core::Shaped>::SHAPE));
/// assert!(!set.contains(<f64 as flatten_core::Shaped>::SHAPE));
///
/// let numbers = TypeSet::category(Category::Number);
/// assert!(numbers.contains(<f64 as flatten_core::Shaped>::SHAPE));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeSet {
    matchers: Vec<TypeMatcher>,
}

impl TypeSet {
    /// The empty set. Default for `ignore`.
    pub const fn empty() -> Self {
        Self {
            matchers: Vec::new(),
        }
    }

    /// The set of every type.
    pub fn any() -> Self {
        Self::empty().with_matcher(TypeMatcher::Any)
    }

    /// Every integer and float. Default for `use`.
    pub fn numbers() -> Self {
        Self::category(Category::Number)
    }

    /// Every scalar of `category`.
    pub fn category(category: Category) -> Self {
        Self::empty().with_category(category)
    }

    /// Exactly `T`.
    pub fn of<T: Shaped>() -> Self {
        Self::empty().with::<T>()
    }

    /// Every instantiation of `T`'s declaration.
    pub fn decl<T: Shaped>() -> Self {
        Self::empty().with_decl::<T>()
    }

    /// Add exactly `T`.
    pub fn with<T: Shaped>(self) -> Self {
        self.with_matcher(TypeMatcher::Exact(T::SHAPE.id))
    }

    /// Add every instantiation of `T`'s declaration: `with_decl::<Bar<()>>()`
    /// also matches `Bar<i64>`.
    pub fn with_decl<T: Shaped>(self) -> Self {
        self.with_matcher(TypeMatcher::Decl(T::SHAPE.decl_id))
    }

    /// Add every scalar of `category`.
    pub fn with_category(self, category: Category) -> Self {
        self.with_matcher(TypeMatcher::Category(category))
    }

    /// Add a raw matcher.
    pub fn with_matcher(mut self, matcher: TypeMatcher) -> Self {
        if !self.matchers.contains(&matcher) {
            self.matchers.push(matcher);
        }
        self
    }

    /// Union with another set.
    pub fn union(self, other: TypeSet) -> Self {
        other
            .matchers
            .into_iter()
            .fold(self, |set, matcher| set.with_matcher(matcher))
    }

    /// Returns true if `shape` is a member.
    pub fn contains(&self, shape: &Shape) -> bool {
        self.matchers.iter().any(|m| m.matches(shape))
    }

    /// Returns true if nothing is a member.
    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    /// Returns true if everything is a member.
    pub fn is_universal(&self) -> bool {
        self.matchers.contains(&TypeMatcher::Any)
    }

    /// The matchers making up this set.
    pub fn matchers(&self) -> &[TypeMatcher] {
        &self.matchers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_cover_every_width() {
        let set = TypeSet::numbers();
        assert!(set.contains(u8::SHAPE));
        assert!(set.contains(i128::SHAPE));
        assert!(set.contains(f32::SHAPE));
        assert!(!set.contains(bool::SHAPE));
        assert!(!set.contains(String::SHAPE));
        assert!(!set.contains(<Vec<f64>>::SHAPE));
    }

    #[test]
    fn exact_membership_distinguishes_widths() {
        let set = TypeSet::of::<f32>();
        assert!(set.contains(f32::SHAPE));
        assert!(!set.contains(f64::SHAPE));
    }

    #[test]
    fn decl_membership_spans_instantiations() {
        let set = TypeSet::decl::<Vec<()>>();
        assert!(set.contains(<Vec<f64>>::SHAPE));
        assert!(set.contains(<Vec<String>>::SHAPE));
        assert!(!set.contains(<Option<f64>>::SHAPE));
    }

    #[test]
    fn union_deduplicates() {
        let set = TypeSet::of::<i64>().union(TypeSet::of::<i64>().with::<f32>());
        assert_eq!(set.matchers().len(), 2);
    }

    #[test]
    fn universal_and_empty() {
        assert!(TypeSet::empty().is_empty());
        assert!(!TypeSet::empty().contains(u8::SHAPE));
        assert!(TypeSet::any().is_universal());
        assert!(TypeSet::any().contains(<Vec<Option<char>>>::SHAPE));
    }

    #[test]
    fn textual_category() {
        let set = TypeSet::category(Category::Textual);
        assert!(set.contains(char::SHAPE));
        assert!(set.contains(String::SHAPE));
        assert!(set.contains(<&'static str>::SHAPE));
        assert!(!set.contains(u32::SHAPE));
    }
}
