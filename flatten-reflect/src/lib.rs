#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

#[macro_use]
mod tracing_macros;

mod site;
pub use site::*;

mod query;
pub use query::*;

mod source;
pub use source::*;

mod meta;
pub use meta::*;

mod walk;

mod rebuild;
