//! Layered override composition for runtime-extensible base types.
//!
//! Independently authored extension bundles ([`Layer`]s) non-destructively
//! add or replace behavior on a shared [`BaseType`]: methods, accessors, and
//! type-level (static) members. Layers stack without coordinating with each
//! other, can be removed from any position in the stack, and every override
//! can invoke the implementation it shadowed. Once every layer touching a
//! member is gone, the base type behaves exactly as if it had never been
//! extended, and its identity is never replaced along the way.
//!
//! # Example
//!
//! ```
//! use strata_composition::{BaseType, Layer, Value, register_extension};
//!
//! let counter = BaseType::builder("Counter")
//! 	.field("count", 0i64)
//! 	.method("report", |cx| cx.field("count"))
//! 	.build();
//!
//! let doubled = Layer::builder("Doubled")
//! 	.base(&counter)
//! 	.method("report", |cx| {
//! 		let inherited = cx.call_super(&[])?.expect_int()?;
//! 		Ok(Value::Int(inherited * 2))
//! 	})
//! 	.build()?;
//!
//! let c = counter.instantiate([("count", Value::Int(21))]);
//! assert_eq!(c.call("report", &[])?, Value::Int(21));
//!
//! let handle = register_extension(&doubled);
//! assert_eq!(c.call("report", &[])?, Value::Int(42));
//!
//! handle.remove();
//! assert_eq!(c.call("report", &[])?, Value::Int(21));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod base;
mod chain;
mod error;
mod invoke;
mod layer;
mod manager;
mod registry;

// Dev-dependencies are exercised by the integration tests.
#[cfg(test)]
use pretty_assertions as _;
#[cfg(test)]
use proptest as _;

pub use base::{
	AccessorDef, BaseType, BaseTypeBuilder, BaseTypeId, GetterFn, Instance, MemberDef, MethodFn,
	SetterFn, TableKind,
};
pub use error::{CallError, CallResult, ConfigurationError};
pub use invoke::CallCx;
pub use layer::{Layer, LayerBuilder};
pub use manager::CompositionManager;
pub use registry::{CompositionRegistry, ExtensionHandle, register_extension};
pub use strata_primitives::{Value, ValueTypeError};
