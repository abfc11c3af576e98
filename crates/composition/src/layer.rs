//! Layers: independently authored bundles of member overrides targeting one
//! base type.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use rustc_hash::FxHashMap;
use strata_primitives::Value;

use crate::base::{self, BaseType, MemberDef, TableKind};
use crate::error::{CallError, CallResult, ConfigurationError};
use crate::invoke::CallCx;

static NEXT_LAYER_ID: AtomicU64 = AtomicU64::new(0);

/// Process-unique layer identity, used by delegation chains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct LayerId(u64);

impl LayerId {
	fn next() -> Self {
		LayerId(NEXT_LAYER_ID.fetch_add(1, Ordering::Relaxed))
	}
}

struct LayerInner {
	id: LayerId,
	name: Box<str>,
	base: BaseType,
	instance_members: FxHashMap<Box<str>, MemberDef>,
	static_members: FxHashMap<Box<str>, MemberDef>,
}

/// An extension bundle: member definitions plus the one base type it extends,
/// fixed at build time.
///
/// Cheap to clone; the handle itself serves as the removal token, and the
/// same handle may be added, removed, and re-added any number of times.
#[derive(Clone)]
pub struct Layer {
	inner: Arc<LayerInner>,
}

impl Layer {
	/// Starts a new layer with the given diagnostic name.
	pub fn builder(name: &str) -> LayerBuilder {
		LayerBuilder {
			name: Box::from(name),
			base: None,
			instance: FxHashMap::default(),
			statics: FxHashMap::default(),
		}
	}

	pub fn name(&self) -> &str {
		&self.inner.name
	}

	/// The base type this layer extends.
	pub fn base(&self) -> &BaseType {
		&self.inner.base
	}

	pub(crate) fn id(&self) -> LayerId {
		self.inner.id
	}

	pub(crate) fn member(&self, kind: TableKind, name: &str) -> Option<&MemberDef> {
		self.members(kind).get(name)
	}

	pub(crate) fn member_names(&self, kind: TableKind) -> impl Iterator<Item = &str> {
		self.members(kind).keys().map(|k| &**k)
	}

	fn members(&self, kind: TableKind) -> &FxHashMap<Box<str>, MemberDef> {
		match kind {
			TableKind::Instance => &self.inner.instance_members,
			TableKind::Static => &self.inner.static_members,
		}
	}
}

impl PartialEq for Layer {
	fn eq(&self, other: &Self) -> bool {
		self.inner.id == other.inner.id
	}
}

impl Eq for Layer {}

impl fmt::Debug for Layer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Layer")
			.field("id", &self.inner.id)
			.field("name", &self.inner.name)
			.field("base", &self.inner.base.name())
			.finish()
	}
}

/// Builder for [`Layer`]. Member definitions mirror
/// [`BaseTypeBuilder`](crate::BaseTypeBuilder); the base type is mandatory.
pub struct LayerBuilder {
	name: Box<str>,
	base: Option<BaseType>,
	instance: FxHashMap<Box<str>, MemberDef>,
	statics: FxHashMap<Box<str>, MemberDef>,
}

impl LayerBuilder {
	/// Declares the base type this layer extends.
	pub fn base(mut self, base: &BaseType) -> Self {
		self.base = Some(base.clone());
		self
	}

	/// Overrides (or adds) an instance method.
	pub fn method<F>(mut self, name: &str, body: F) -> Self
	where
		F: Fn(&CallCx<'_>) -> CallResult + Send + Sync + 'static,
	{
		self.instance.insert(Box::from(name), MemberDef::Method(Arc::new(body)));
		self
	}

	/// Overrides (or adds) an instance accessor getter.
	pub fn getter<F>(mut self, name: &str, body: F) -> Self
	where
		F: Fn(&CallCx<'_>) -> CallResult + Send + Sync + 'static,
	{
		base::set_half(&mut self.instance, name, |a| a.get = Some(Arc::new(body)));
		self
	}

	/// Overrides (or adds) an instance accessor setter.
	pub fn setter<F>(mut self, name: &str, body: F) -> Self
	where
		F: Fn(&CallCx<'_>, Value) -> Result<(), CallError> + Send + Sync + 'static,
	{
		base::set_half(&mut self.instance, name, |a| a.set = Some(Arc::new(body)));
		self
	}

	/// Overrides (or adds) a static method.
	pub fn static_method<F>(mut self, name: &str, body: F) -> Self
	where
		F: Fn(&CallCx<'_>) -> CallResult + Send + Sync + 'static,
	{
		self.statics.insert(Box::from(name), MemberDef::Method(Arc::new(body)));
		self
	}

	/// Overrides (or adds) a static accessor getter.
	pub fn static_getter<F>(mut self, name: &str, body: F) -> Self
	where
		F: Fn(&CallCx<'_>) -> CallResult + Send + Sync + 'static,
	{
		base::set_half(&mut self.statics, name, |a| a.get = Some(Arc::new(body)));
		self
	}

	/// Overrides (or adds) a static accessor setter.
	pub fn static_setter<F>(mut self, name: &str, body: F) -> Self
	where
		F: Fn(&CallCx<'_>, Value) -> Result<(), CallError> + Send + Sync + 'static,
	{
		base::set_half(&mut self.statics, name, |a| a.set = Some(Arc::new(body)));
		self
	}

	/// Finalizes the layer. Fails if no base type was declared; an extension
	/// must name what it extends.
	pub fn build(self) -> Result<Layer, ConfigurationError> {
		let Some(base) = self.base else {
			return Err(ConfigurationError { layer: self.name });
		};
		Ok(Layer {
			inner: Arc::new(LayerInner {
				id: LayerId::next(),
				name: self.name,
				base,
				instance_members: self.instance,
				static_members: self.statics,
			}),
		})
	}
}
