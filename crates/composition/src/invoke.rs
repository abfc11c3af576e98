//! Call-time resolution.
//!
//! The original member tables never change after a redirecting entry is
//! installed, so every invocation re-resolves against the current state:
//! the receiver's own slot, then the base type's delegation chain, then the
//! preserved original definition, then the parent type, recursively. Locks
//! are held only while resolving, never while a member body runs, so bodies
//! are free to re-enter `add`, `remove`, and dispatch.

use strata_primitives::Value;

use crate::base::{BaseType, Half, Instance, MemberDef, MethodFn, SetterFn, Slot, TableKind};
use crate::chain::ChainHit;
use crate::error::{CallError, CallResult};
use crate::layer::LayerId;
use crate::registry::CompositionRegistry;

/// The object a member was invoked on.
#[derive(Clone, Copy)]
pub(crate) enum Receiver<'a> {
	Instance(&'a Instance),
	Type(&'a BaseType),
}

/// Where a member's `super` resolves from. Captured when the member is
/// resolved; re-read against live state when the member actually uses it.
#[derive(Clone)]
pub(crate) enum Scope {
	/// The member came from a layer: super starts one link below it in the
	/// base type's chain.
	Chain {
		base: BaseType,
		kind: TableKind,
		layer: LayerId,
	},
	/// The member is a base type's own definition: super starts at the
	/// defining type's parent.
	Class { class: BaseType, kind: TableKind },
}

impl Scope {
	fn base_name(&self) -> &str {
		match self {
			Scope::Chain { base, .. } => base.name(),
			Scope::Class { class, .. } => class.name(),
		}
	}
}

type Picked<F> = Option<(F, Scope)>;

fn pick_method(def: &MemberDef) -> Option<MethodFn> {
	def.method().cloned()
}

fn pick_getter(def: &MemberDef) -> Option<MethodFn> {
	def.getter().cloned()
}

fn pick_setter(def: &MemberDef) -> Option<SetterFn> {
	def.setter().cloned()
}

fn half_error(ty: &BaseType, name: &str, half: Half) -> CallError {
	let base = Box::from(ty.name());
	let name = Box::from(name);
	match half {
		Half::Method => CallError::NotCallable { base, name },
		Half::Get => CallError::NotReadable { base, name },
		Half::Set => CallError::NotWritable { base, name },
	}
}

/// A definition was found in a table slot: either it provides the requested
/// capability, or it shadows the name and resolution stops with an error.
fn pick_or_shadow<F>(
	ty: &BaseType,
	kind: TableKind,
	name: &str,
	half: Half,
	pick: fn(&MemberDef) -> Option<F>,
	def: &MemberDef,
) -> Result<Picked<F>, CallError> {
	match pick(def) {
		Some(f) => Ok(Some((
			f,
			Scope::Class {
				class: ty.clone(),
				kind,
			},
		))),
		None => Err(half_error(ty, name, half)),
	}
}

/// Full dispatch for one member half, starting at `ty` and walking chains,
/// preserved originals, and parent types until a definition answers.
fn dispatch<F>(
	ty: &BaseType,
	kind: TableKind,
	name: &str,
	half: Half,
	pick: fn(&MemberDef) -> Option<F>,
) -> Result<Picked<F>, CallError> {
	let mut cur = Some(ty.clone());
	while let Some(t) = cur {
		match t.slot(kind, name) {
			Some(Slot::Plain(def)) => return pick_or_shadow(&t, kind, name, half, pick, &def),
			Some(Slot::Redirected { original }) => {
				if let Some(mgr) = CompositionRegistry::global().get(&t) {
					if let ChainHit::Found { def, layer } = mgr.probe(kind, name, half) {
						if let Some(f) = pick(&def) {
							return Ok(Some((
								f,
								Scope::Chain {
									base: t.clone(),
									kind,
									layer,
								},
							)));
						}
					}
				}
				if let Some(def) = original {
					return pick_or_shadow(&t, kind, name, half, pick, &def);
				}
				// Redirecting entry with no original: a layer once added this
				// name outright. With no active layer defining it, lookup
				// continues up the parent types.
			}
			None => {}
		}
		cur = t.parent().cloned();
	}
	Ok(None)
}

/// Resolution below a base type's chain: the preserved original definition,
/// then the parent types.
fn below_chain<F>(
	base: &BaseType,
	kind: TableKind,
	name: &str,
	half: Half,
	pick: fn(&MemberDef) -> Option<F>,
) -> Result<Picked<F>, CallError> {
	match base.slot(kind, name) {
		Some(Slot::Plain(def)) | Some(Slot::Redirected { original: Some(def) }) => {
			pick_or_shadow(base, kind, name, half, pick, &def)
		}
		_ => match base.parent() {
			Some(p) => dispatch(p, kind, name, half, pick),
			None => Ok(None),
		},
	}
}

/// Resolves the inherited implementation of `name` from a member's scope.
fn resolve_super<F>(
	scope: &Scope,
	name: &str,
	half: Half,
	pick: fn(&MemberDef) -> Option<F>,
) -> Result<Picked<F>, CallError> {
	match scope {
		Scope::Chain { base, kind, layer } => {
			if let Some(mgr) = CompositionRegistry::global().get(base) {
				if let ChainHit::Found { def, layer: below } = mgr.probe_below(*kind, *layer, name, half) {
					if let Some(f) = pick(&def) {
						return Ok(Some((
							f,
							Scope::Chain {
								base: base.clone(),
								kind: *kind,
								layer: below,
							},
						)));
					}
				}
			}
			below_chain(base, *kind, name, half, pick)
		}
		Scope::Class { class, kind } => match class.parent() {
			Some(p) => dispatch(p, *kind, name, half, pick),
			None => Ok(None),
		},
	}
}

fn unknown_member(ty: &BaseType, name: &str) -> CallError {
	CallError::UnknownMember {
		base: Box::from(ty.name()),
		name: Box::from(name),
	}
}

pub(crate) fn call_instance(recv: &Instance, name: &str, args: &[Value]) -> CallResult {
	let (f, scope) = dispatch(recv.class(), TableKind::Instance, name, Half::Method, pick_method)?
		.ok_or_else(|| unknown_member(recv.class(), name))?;
	f(&CallCx {
		recv: Receiver::Instance(recv),
		args,
		name,
		half: Half::Method,
		scope,
	})
}

pub(crate) fn get_instance(recv: &Instance, name: &str) -> CallResult {
	let (f, scope) = dispatch(recv.class(), TableKind::Instance, name, Half::Get, pick_getter)?
		.ok_or_else(|| unknown_member(recv.class(), name))?;
	f(&CallCx {
		recv: Receiver::Instance(recv),
		args: &[],
		name,
		half: Half::Get,
		scope,
	})
}

pub(crate) fn set_instance(recv: &Instance, name: &str, value: Value) -> Result<(), CallError> {
	let (f, scope) = dispatch(recv.class(), TableKind::Instance, name, Half::Set, pick_setter)?
		.ok_or_else(|| unknown_member(recv.class(), name))?;
	f(
		&CallCx {
			recv: Receiver::Instance(recv),
			args: &[],
			name,
			half: Half::Set,
			scope,
		},
		value,
	)
}

pub(crate) fn call_type(ty: &BaseType, name: &str, args: &[Value]) -> CallResult {
	let (f, scope) = dispatch(ty, TableKind::Static, name, Half::Method, pick_method)?
		.ok_or_else(|| unknown_member(ty, name))?;
	f(&CallCx {
		recv: Receiver::Type(ty),
		args,
		name,
		half: Half::Method,
		scope,
	})
}

pub(crate) fn get_type(ty: &BaseType, name: &str) -> CallResult {
	let (f, scope) = dispatch(ty, TableKind::Static, name, Half::Get, pick_getter)?
		.ok_or_else(|| unknown_member(ty, name))?;
	f(&CallCx {
		recv: Receiver::Type(ty),
		args: &[],
		name,
		half: Half::Get,
		scope,
	})
}

pub(crate) fn set_type(ty: &BaseType, name: &str, value: Value) -> Result<(), CallError> {
	let (f, scope) = dispatch(ty, TableKind::Static, name, Half::Set, pick_setter)?
		.ok_or_else(|| unknown_member(ty, name))?;
	f(
		&CallCx {
			recv: Receiver::Type(ty),
			args: &[],
			name,
			half: Half::Set,
			scope,
		},
		value,
	)
}

/// Invocation context passed to every member body: the receiver, the
/// arguments, and the member's place in the dispatch order.
///
/// `call`, `get`, and `set` dispatch dynamically on the receiver (the
/// `this.member(...)` of the member's author), so they see layers added
/// after the member was defined. The `super` family resolves from one step
/// below the member's own definition and is how an override invokes what it
/// overrode, whether that is another layer or the untouched original.
pub struct CallCx<'a> {
	recv: Receiver<'a>,
	args: &'a [Value],
	name: &'a str,
	half: Half,
	scope: Scope,
}

impl CallCx<'_> {
	/// Arguments of this invocation.
	pub fn args(&self) -> &[Value] {
		self.args
	}

	/// The argument at `index`, or `MissingArg`.
	pub fn arg(&self, index: usize) -> Result<&Value, CallError> {
		self.args.get(index).ok_or_else(|| CallError::MissingArg {
			name: Box::from(self.name),
			index,
		})
	}

	/// Name of the member being invoked.
	pub fn name(&self) -> &str {
		self.name
	}

	/// The receiver's class: the instance's base type, or for static members
	/// the type the invocation started on.
	pub fn class(&self) -> &BaseType {
		match self.recv {
			Receiver::Instance(i) => i.class(),
			Receiver::Type(t) => t,
		}
	}

	/// The receiver instance; fails inside static invocations.
	pub fn instance(&self) -> Result<&Instance, CallError> {
		match self.recv {
			Receiver::Instance(i) => Ok(i),
			Receiver::Type(_) => Err(CallError::NoInstance {
				name: Box::from(self.name),
			}),
		}
	}

	/// Reads a data field of the receiver instance.
	pub fn field(&self, name: &str) -> Result<Value, CallError> {
		self.instance()?.field(name)
	}

	/// Writes a data field of the receiver instance.
	pub fn set_field(&self, name: &str, value: impl Into<Value>) -> Result<(), CallError> {
		self.instance()?.set_field(name, value);
		Ok(())
	}

	/// Invokes a member on the receiver with full dynamic dispatch.
	pub fn call(&self, name: &str, args: &[Value]) -> CallResult {
		match self.recv {
			Receiver::Instance(i) => call_instance(i, name, args),
			Receiver::Type(t) => call_type(t, name, args),
		}
	}

	/// Reads an accessor on the receiver with full dynamic dispatch.
	pub fn get(&self, name: &str) -> CallResult {
		match self.recv {
			Receiver::Instance(i) => get_instance(i, name),
			Receiver::Type(t) => get_type(t, name),
		}
	}

	/// Writes an accessor on the receiver with full dynamic dispatch.
	pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<(), CallError> {
		match self.recv {
			Receiver::Instance(i) => set_instance(i, name, value.into()),
			Receiver::Type(t) => set_type(t, name, value.into()),
		}
	}

	/// Invokes the inherited implementation of this member. In a method this
	/// calls the overridden method; in an accessor body it reads the
	/// inherited getter.
	pub fn call_super(&self, args: &[Value]) -> CallResult {
		let half = match self.half {
			Half::Method => Half::Method,
			Half::Get | Half::Set => Half::Get,
		};
		self.super_invoke(self.name, half, args)
	}

	/// Writes through the inherited setter of this member.
	pub fn set_super(&self, value: impl Into<Value>) -> Result<(), CallError> {
		self.super_assign(self.name, value.into())
	}

	/// Invokes an arbitrary member of the inherited surface, like the
	/// original's `super.other()`.
	pub fn super_call(&self, name: &str, args: &[Value]) -> CallResult {
		self.super_invoke(name, Half::Method, args)
	}

	/// Reads an arbitrary accessor of the inherited surface.
	pub fn super_get(&self, name: &str) -> CallResult {
		self.super_invoke(name, Half::Get, &[])
	}

	/// Writes an arbitrary accessor of the inherited surface.
	pub fn super_set(&self, name: &str, value: impl Into<Value>) -> Result<(), CallError> {
		self.super_assign(name, value.into())
	}

	fn super_invoke(&self, name: &str, half: Half, args: &[Value]) -> CallResult {
		let pick = match half {
			Half::Method => pick_method,
			_ => pick_getter,
		};
		let (f, scope) = resolve_super(&self.scope, name, half, pick)?.ok_or_else(|| CallError::NoInherited {
			base: Box::from(self.scope.base_name()),
			name: Box::from(name),
		})?;
		f(&CallCx {
			recv: self.recv,
			args,
			name,
			half,
			scope,
		})
	}

	fn super_assign(&self, name: &str, value: Value) -> Result<(), CallError> {
		let (f, scope) = resolve_super(&self.scope, name, Half::Set, pick_setter)?.ok_or_else(|| {
			CallError::NoInherited {
				base: Box::from(self.scope.base_name()),
				name: Box::from(name),
			}
		})?;
		f(
			&CallCx {
				recv: self.recv,
				args: &[],
				name,
				half: Half::Set,
				scope,
			},
			value,
		)
	}
}
