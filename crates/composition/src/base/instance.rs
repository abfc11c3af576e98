//! Instances: receivers for composed instance members.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use strata_primitives::Value;

use super::BaseType;
use crate::error::{CallError, CallResult};
use crate::invoke;

struct InstanceInner {
	class: BaseType,
	fields: Mutex<FxHashMap<Box<str>, Value>>,
}

/// An object of some [`BaseType`]: a field map plus the class handle.
///
/// Cheap to clone; clones share the same fields. Member dispatch starts at
/// the instance's class and walks layers and parent types from there, so an
/// instance of a subtype picks up composition on any ancestor transparently.
#[derive(Clone)]
pub struct Instance {
	inner: Arc<InstanceInner>,
}

impl Instance {
	pub(crate) fn new(class: BaseType, fields: FxHashMap<Box<str>, Value>) -> Self {
		Instance {
			inner: Arc::new(InstanceInner {
				class,
				fields: Mutex::new(fields),
			}),
		}
	}

	pub fn class(&self) -> &BaseType {
		&self.inner.class
	}

	/// Reads a plain data field. Fields are not composed; layers override
	/// behavior (methods and accessors), never stored state.
	pub fn field(&self, name: &str) -> Result<Value, CallError> {
		self.inner.fields.lock().get(name).cloned().ok_or_else(|| CallError::UnknownField {
			base: Box::from(self.inner.class.name()),
			field: Box::from(name),
		})
	}

	/// Writes a plain data field, creating it if absent.
	pub fn set_field(&self, name: &str, value: impl Into<Value>) {
		self.inner.fields.lock().insert(Box::from(name), value.into());
	}

	/// Invokes a method on this instance, dispatching through any layers
	/// attached to its class or the class's ancestors.
	pub fn call(&self, name: &str, args: &[Value]) -> CallResult {
		invoke::call_instance(self, name, args)
	}

	/// Reads an accessor on this instance through the same dispatch.
	pub fn get(&self, name: &str) -> CallResult {
		invoke::get_instance(self, name)
	}

	/// Writes an accessor on this instance through the same dispatch.
	pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<(), CallError> {
		invoke::set_instance(self, name, value.into())
	}
}

impl fmt::Debug for Instance {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Instance")
			.field("class", &self.inner.class.name())
			.field("fields", &*self.inner.fields.lock())
			.finish()
	}
}
