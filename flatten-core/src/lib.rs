#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

mod macros;

mod shape;
pub use shape::*;

mod reflect;
pub use reflect::*;

mod error;
pub use error::*;

mod typeset;
pub use typeset::*;

mod classify;
pub use classify::*;

mod select;
pub use select::*;

mod constructor;
pub use constructor::*;

// Shapes for std types
mod impls;
