//! Base-type descriptors: the extensible units layers attach to.
//!
//! A [`BaseType`] is an explicit runtime descriptor rather than a language
//! type: a named pair of member tables (instance and static), an optional
//! parent for subtyping, and default instance fields. The engine never
//! replaces a base type; layers attach beside it and the only mutation its
//! tables ever see is the one-time installation of redirecting entries.

mod instance;
mod table;

pub use instance::Instance;
pub use table::{AccessorDef, GetterFn, MemberDef, MethodFn, SetterFn, TableKind};

pub(crate) use table::{Half, MemberTable, Slot};

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use strata_primitives::Value;

use crate::error::{CallError, CallResult};
use crate::invoke::{self, CallCx};

static NEXT_BASE_ID: AtomicU64 = AtomicU64::new(0);

/// Process-unique base-type identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BaseTypeId(u64);

impl BaseTypeId {
	fn next() -> Self {
		BaseTypeId(NEXT_BASE_ID.fetch_add(1, Ordering::Relaxed))
	}
}

pub(crate) struct BaseTypeInner {
	id: BaseTypeId,
	name: Box<str>,
	parent: Option<BaseType>,
	instance_table: RwLock<MemberTable>,
	static_table: RwLock<MemberTable>,
	default_fields: FxHashMap<Box<str>, Value>,
}

/// Handle to an extensible base type. Cheap to clone; compared by identity.
#[derive(Clone)]
pub struct BaseType {
	inner: Arc<BaseTypeInner>,
}

impl BaseType {
	/// Starts a new base type with the given diagnostic name.
	pub fn builder(name: &str) -> BaseTypeBuilder {
		BaseTypeBuilder {
			name: Box::from(name),
			parent: None,
			instance: FxHashMap::default(),
			statics: FxHashMap::default(),
			fields: FxHashMap::default(),
		}
	}

	pub fn id(&self) -> BaseTypeId {
		self.inner.id
	}

	pub fn name(&self) -> &str {
		&self.inner.name
	}

	/// The parent base type, if this is a subtype.
	pub fn parent(&self) -> Option<&BaseType> {
		self.inner.parent.as_ref()
	}

	/// Creates an instance, seeded from the default fields of this type and
	/// its ancestors (subtype defaults win), then the given overrides.
	pub fn instantiate<K, I>(&self, fields: I) -> Instance
	where
		K: Into<Box<str>>,
		I: IntoIterator<Item = (K, Value)>,
	{
		let mut seeded = FxHashMap::default();
		let mut lineage = Vec::new();
		let mut cur = Some(self);
		while let Some(t) = cur {
			lineage.push(t);
			cur = t.parent();
		}
		for t in lineage.into_iter().rev() {
			for (k, v) in &t.inner.default_fields {
				seeded.insert(k.clone(), v.clone());
			}
		}
		for (k, v) in fields {
			seeded.insert(k.into(), v);
		}
		Instance::new(self.clone(), seeded)
	}

	/// Creates an instance carrying only the default fields.
	pub fn instantiate_default(&self) -> Instance {
		self.instantiate::<&str, [(&str, Value); 0]>([])
	}

	/// Invokes a static method, dispatching through any attached layers.
	pub fn call_static(&self, name: &str, args: &[Value]) -> CallResult {
		invoke::call_type(self, name, args)
	}

	/// Reads a static accessor, dispatching through any attached layers.
	pub fn get_static(&self, name: &str) -> CallResult {
		invoke::get_type(self, name)
	}

	/// Writes a static accessor, dispatching through any attached layers.
	pub fn set_static(&self, name: &str, value: Value) -> Result<(), CallError> {
		invoke::set_type(self, name, value)
	}

	pub(crate) fn slot(&self, kind: TableKind, name: &str) -> Option<Slot> {
		self.table(kind).read().slot(name).cloned()
	}

	/// Installs the permanent redirecting entry for `name`, once.
	pub(crate) fn install_redirect(&self, kind: TableKind, name: &str) {
		if self.table(kind).write().install_redirect(name) {
			tracing::trace!(base = %self.name(), ?kind, name, "installed redirecting entry");
		}
	}

	fn table(&self, kind: TableKind) -> &RwLock<MemberTable> {
		match kind {
			TableKind::Instance => &self.inner.instance_table,
			TableKind::Static => &self.inner.static_table,
		}
	}
}

impl PartialEq for BaseType {
	fn eq(&self, other: &Self) -> bool {
		self.inner.id == other.inner.id
	}
}

impl Eq for BaseType {}

impl std::hash::Hash for BaseType {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		self.inner.id.hash(state);
	}
}

impl fmt::Debug for BaseType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("BaseType")
			.field("id", &self.inner.id)
			.field("name", &self.inner.name)
			.finish()
	}
}

impl fmt::Display for BaseType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.inner.name)
	}
}

/// Builder for [`BaseType`].
///
/// Later definitions of the same member name replace earlier ones; `getter`
/// and `setter` for the same name merge into one accessor.
pub struct BaseTypeBuilder {
	name: Box<str>,
	parent: Option<BaseType>,
	instance: FxHashMap<Box<str>, MemberDef>,
	statics: FxHashMap<Box<str>, MemberDef>,
	fields: FxHashMap<Box<str>, Value>,
}

impl BaseTypeBuilder {
	/// Declares the parent base type; member lookup falls through to it.
	pub fn parent(mut self, parent: &BaseType) -> Self {
		self.parent = Some(parent.clone());
		self
	}

	/// Declares a default instance field.
	pub fn field(mut self, name: &str, value: impl Into<Value>) -> Self {
		self.fields.insert(Box::from(name), value.into());
		self
	}

	/// Defines an instance method.
	pub fn method<F>(mut self, name: &str, body: F) -> Self
	where
		F: Fn(&CallCx<'_>) -> CallResult + Send + Sync + 'static,
	{
		self.instance.insert(Box::from(name), MemberDef::Method(Arc::new(body)));
		self
	}

	/// Defines (or completes) an instance accessor getter.
	pub fn getter<F>(mut self, name: &str, body: F) -> Self
	where
		F: Fn(&CallCx<'_>) -> CallResult + Send + Sync + 'static,
	{
		set_half(&mut self.instance, name, |a| a.get = Some(Arc::new(body)));
		self
	}

	/// Defines (or completes) an instance accessor setter.
	pub fn setter<F>(mut self, name: &str, body: F) -> Self
	where
		F: Fn(&CallCx<'_>, Value) -> Result<(), CallError> + Send + Sync + 'static,
	{
		set_half(&mut self.instance, name, |a| a.set = Some(Arc::new(body)));
		self
	}

	/// Defines a static method.
	pub fn static_method<F>(mut self, name: &str, body: F) -> Self
	where
		F: Fn(&CallCx<'_>) -> CallResult + Send + Sync + 'static,
	{
		self.statics.insert(Box::from(name), MemberDef::Method(Arc::new(body)));
		self
	}

	/// Defines (or completes) a static accessor getter.
	pub fn static_getter<F>(mut self, name: &str, body: F) -> Self
	where
		F: Fn(&CallCx<'_>) -> CallResult + Send + Sync + 'static,
	{
		set_half(&mut self.statics, name, |a| a.get = Some(Arc::new(body)));
		self
	}

	/// Defines (or completes) a static accessor setter.
	pub fn static_setter<F>(mut self, name: &str, body: F) -> Self
	where
		F: Fn(&CallCx<'_>, Value) -> Result<(), CallError> + Send + Sync + 'static,
	{
		set_half(&mut self.statics, name, |a| a.set = Some(Arc::new(body)));
		self
	}

	pub fn build(self) -> BaseType {
		let mut instance_table = MemberTable::default();
		for (name, def) in self.instance {
			instance_table.insert_plain(name, def);
		}
		let mut static_table = MemberTable::default();
		for (name, def) in self.statics {
			static_table.insert_plain(name, def);
		}
		BaseType {
			inner: Arc::new(BaseTypeInner {
				id: BaseTypeId::next(),
				name: self.name,
				parent: self.parent,
				instance_table: RwLock::new(instance_table),
				static_table: RwLock::new(static_table),
				default_fields: self.fields,
			}),
		}
	}
}

/// Upgrades the named member to an accessor and sets one half of it. A plain
/// method previously defined under the same name is discarded.
pub(crate) fn set_half(
	members: &mut FxHashMap<Box<str>, MemberDef>,
	name: &str,
	apply: impl FnOnce(&mut AccessorDef),
) {
	let def = members
		.entry(Box::from(name))
		.or_insert_with(|| MemberDef::Accessor(AccessorDef::default()));
	if !matches!(def, MemberDef::Accessor(_)) {
		*def = MemberDef::Accessor(AccessorDef::default());
	}
	if let MemberDef::Accessor(a) = def {
		apply(a);
	}
}
