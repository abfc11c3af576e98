//! Errors for layer registration and member invocation.

use strata_primitives::ValueTypeError;

/// A layer was declared without a base type to extend.
///
/// Fatal at [`Layer::build`](crate::LayerBuilder::build) time; an extension
/// must explicitly name what it extends.
#[derive(Debug, Clone, thiserror::Error)]
#[error("layer `{layer}` must declare the base type it extends")]
pub struct ConfigurationError {
	/// Diagnostic name of the offending layer.
	pub layer: Box<str>,
}

/// Errors surfaced while invoking a composed member.
///
/// The composition mechanism itself never fails mid-dispatch: resolution
/// always terminates with a defined fallback. These errors describe bad
/// invocations (unknown names, missing accessor halves, bad arguments) or
/// are produced by a member body and propagate as that body's own failure.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CallError {
	/// No definition of the member exists anywhere in the dispatch order.
	#[error("no member `{name}` on `{base}`")]
	UnknownMember { base: Box<str>, name: Box<str> },

	/// Super resolution found no inherited implementation of the member.
	#[error("no inherited implementation of `{name}` below `{base}`")]
	NoInherited { base: Box<str>, name: Box<str> },

	/// The member resolved to an accessor, not a callable method.
	#[error("member `{name}` on `{base}` is not callable")]
	NotCallable { base: Box<str>, name: Box<str> },

	/// The member resolved to a definition without a getter.
	#[error("member `{name}` on `{base}` is not readable")]
	NotReadable { base: Box<str>, name: Box<str> },

	/// The member resolved to a definition without a setter.
	#[error("member `{name}` on `{base}` is not writable")]
	NotWritable { base: Box<str>, name: Box<str> },

	/// The receiver instance has no such field.
	#[error("unknown field `{field}` on instance of `{base}`")]
	UnknownField { base: Box<str>, field: Box<str> },

	/// A static invocation asked for a receiver instance.
	#[error("no receiver instance in static invocation of `{name}`")]
	NoInstance { name: Box<str> },

	/// A member body expected an argument that was not supplied.
	#[error("missing argument {index} of `{name}`")]
	MissingArg { name: Box<str>, index: usize },

	/// A member body received a value of the wrong type.
	#[error(transparent)]
	Value(#[from] ValueTypeError),
}

/// Result of invoking a composed member.
pub type CallResult = Result<strata_primitives::Value, CallError>;
