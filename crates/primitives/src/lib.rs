//! Dynamic value primitives shared by composed member signatures.

mod value;

pub use value::{Value, ValueTypeError};
