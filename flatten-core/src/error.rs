use crate::Shape;

/// Errors raised by flattening, reconstruction and constructor resolution.
///
/// These are contract violations by the caller. None of them is transient,
/// and nothing is retried internally.
#[derive(Debug)]
pub enum FlattenError {
    /// Contradictory or malformed `use`/`ignore`/selector configuration.
    Configuration {
        /// What is wrong with the configuration.
        reason: String,
    },

    /// The data source ran out before every matched leaf position was filled.
    InsufficientData {
        /// Index of the first leaf position that could not be filled.
        position: usize,
    },

    /// A leaf position was reached inside a value that can neither be
    /// mutated in place nor reassigned by its parent.
    NotMutable {
        /// The value that could not be changed.
        shape: &'static Shape,
    },

    /// A constructor was handed a different number of field values than it
    /// expects.
    ConstructorMismatch {
        /// The type being constructed.
        shape: &'static Shape,
        /// Number of values the constructor takes.
        expected: usize,
        /// Number of values supplied by the traversal.
        actual: usize,
    },

    /// The type has no structural default constructor and no override was
    /// registered for it.
    MissingConstructor {
        /// The type being constructed.
        shape: &'static Shape,
    },

    /// The object graph is nested deeper than the configured limit.
    DepthExceeded {
        /// The configured `max_depth`.
        limit: usize,
    },

    /// A value of one type was supplied where another was required, and no
    /// numeric coercion applies.
    WrongShape {
        /// The shape of the slot.
        expected: &'static Shape,
        /// The shape of the supplied value.
        actual: &'static Shape,
    },

    /// An invariant of the reflection system was violated, e.g. a hand-written
    /// [`Shaped`](crate::Shaped) impl whose children disagree with its shape.
    InvariantViolation {
        /// Which invariant.
        reason: &'static str,
    },
}

impl FlattenError {
    /// Shorthand for [`FlattenError::Configuration`].
    pub fn configuration(reason: impl Into<String>) -> Self {
        FlattenError::Configuration {
            reason: reason.into(),
        }
    }
}

impl core::fmt::Display for FlattenError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FlattenError::Configuration { reason } => {
                write!(f, "Invalid configuration: {reason}")
            }
            FlattenError::InsufficientData { position } => {
                write!(
                    f,
                    "Data source exhausted: no value for leaf position {position}"
                )
            }
            FlattenError::NotMutable { shape } => {
                write!(
                    f,
                    "{shape} can neither be mutated in place nor reassigned by a parent"
                )
            }
            FlattenError::ConstructorMismatch {
                shape,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Constructor for {shape} takes {expected} field values, but got {actual}"
                )
            }
            FlattenError::MissingConstructor { shape } => {
                write!(
                    f,
                    "{shape} has no default constructor; register an override for it"
                )
            }
            FlattenError::DepthExceeded { limit } => {
                write!(f, "Object graph nested deeper than max_depth {limit}")
            }
            FlattenError::WrongShape { expected, actual } => {
                write!(f, "Wrong shape: expected {expected}, but got {actual}")
            }
            FlattenError::InvariantViolation { reason } => {
                write!(f, "Invariant violation: {reason}")
            }
        }
    }
}

impl core::error::Error for FlattenError {}
