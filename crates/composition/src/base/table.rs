//! Member tables: named slots on a base type, including the permanent
//! redirecting entries the engine installs over them.

use std::collections::hash_map::Entry;
use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use strata_primitives::Value;

use crate::error::{CallError, CallResult};
use crate::invoke::CallCx;

/// Which member table of a base type an operation applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
	/// Methods and accessors invoked with an instance receiver.
	Instance,
	/// Members bound to the base type itself.
	Static,
}

/// A plain method body.
pub type MethodFn = Arc<dyn Fn(&CallCx<'_>) -> CallResult + Send + Sync>;
/// An accessor getter body.
pub type GetterFn = Arc<dyn Fn(&CallCx<'_>) -> CallResult + Send + Sync>;
/// An accessor setter body; receives the value being assigned.
pub type SetterFn = Arc<dyn Fn(&CallCx<'_>, Value) -> Result<(), CallError> + Send + Sync>;

/// Paired accessor definition; either half may be absent.
#[derive(Clone, Default)]
pub struct AccessorDef {
	pub get: Option<GetterFn>,
	pub set: Option<SetterFn>,
}

/// One named member definition.
#[derive(Clone)]
pub enum MemberDef {
	Method(MethodFn),
	Accessor(AccessorDef),
}

/// The capability a lookup asks of a member definition.
///
/// Accessor halves resolve independently; a definition that carries only a
/// getter is invisible to setter resolution and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Half {
	Method,
	Get,
	Set,
}

impl MemberDef {
	pub(crate) fn method(&self) -> Option<&MethodFn> {
		match self {
			MemberDef::Method(f) => Some(f),
			MemberDef::Accessor(_) => None,
		}
	}

	pub(crate) fn getter(&self) -> Option<&GetterFn> {
		match self {
			MemberDef::Accessor(a) => a.get.as_ref(),
			MemberDef::Method(_) => None,
		}
	}

	pub(crate) fn setter(&self) -> Option<&SetterFn> {
		match self {
			MemberDef::Accessor(a) => a.set.as_ref(),
			MemberDef::Method(_) => None,
		}
	}

	pub(crate) fn provides(&self, half: Half) -> bool {
		match half {
			Half::Method => self.method().is_some(),
			Half::Get => self.getter().is_some(),
			Half::Set => self.setter().is_some(),
		}
	}
}

impl fmt::Debug for MemberDef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			MemberDef::Method(_) => f.write_str("Method"),
			MemberDef::Accessor(a) => f
				.debug_struct("Accessor")
				.field("get", &a.get.is_some())
				.field("set", &a.set.is_some())
				.finish(),
		}
	}
}

/// A named slot in a base type's member table.
#[derive(Debug, Clone)]
pub(crate) enum Slot {
	/// A pre-engine definition the engine has never touched.
	Plain(MemberDef),
	/// A permanent forwarding entry. Resolution goes through the current
	/// delegation chain; the pre-engine definition, if any, is kept here as
	/// the chain's terminator.
	Redirected { original: Option<MemberDef> },
}

/// One member table of a base type.
#[derive(Debug, Default)]
pub(crate) struct MemberTable {
	slots: FxHashMap<Box<str>, Slot>,
}

impl MemberTable {
	pub(crate) fn insert_plain(&mut self, name: Box<str>, def: MemberDef) {
		self.slots.insert(name, Slot::Plain(def));
	}

	pub(crate) fn slot(&self, name: &str) -> Option<&Slot> {
		self.slots.get(name)
	}

	/// Turns the slot for `name` into a redirecting entry, preserving any
	/// pre-engine definition. Idempotent; returns true when newly installed.
	pub(crate) fn install_redirect(&mut self, name: &str) -> bool {
		match self.slots.entry(Box::from(name)) {
			Entry::Vacant(v) => {
				v.insert(Slot::Redirected { original: None });
				true
			}
			Entry::Occupied(mut o) => {
				if let Slot::Plain(def) = o.get() {
					let original = Some(def.clone());
					o.insert(Slot::Redirected { original });
					true
				} else {
					false
				}
			}
		}
	}
}
