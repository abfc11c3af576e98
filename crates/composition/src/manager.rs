//! Per-base-type composition state: one instance chain and one static chain.

use parking_lot::Mutex;

use crate::base::{BaseType, Half, TableKind};
use crate::chain::{ChainHit, DelegationChain};
use crate::layer::{Layer, LayerId};

/// Owns the two delegation chains of one base type.
///
/// A base type has at most one manager for the process lifetime. Managers are
/// created by [`CompositionRegistry::get_or_create`](crate::CompositionRegistry::get_or_create)
/// on first use and never destroyed, even once empty.
pub struct CompositionManager {
	base: BaseType,
	instance_chain: Mutex<DelegationChain>,
	static_chain: Mutex<DelegationChain>,
}

impl CompositionManager {
	pub(crate) fn new(base: &BaseType) -> Self {
		CompositionManager {
			base: base.clone(),
			instance_chain: Mutex::new(DelegationChain::new(TableKind::Instance)),
			static_chain: Mutex::new(DelegationChain::new(TableKind::Static)),
		}
	}

	pub fn base(&self) -> &BaseType {
		&self.base
	}

	/// Attaches `layer` as the newest override on both chains and installs
	/// redirecting entries for every member name it defines.
	///
	/// The layer handle itself is the removal token. Panics if the layer
	/// declares a different base type; going through
	/// [`register_extension`](crate::register_extension) cannot trigger that.
	pub fn add(&self, layer: &Layer) {
		assert!(
			layer.base() == &self.base,
			"layer `{}` extends `{}`, not `{}`",
			layer.name(),
			layer.base().name(),
			self.base.name(),
		);
		for kind in [TableKind::Instance, TableKind::Static] {
			self.chain(kind).lock().add(layer);
			// Install after linking; resolution is dynamic, so an entry
			// installed by an earlier layer picks this one up as-is.
			for name in layer.member_names(kind) {
				self.base.install_redirect(kind, name);
			}
		}
		tracing::debug!(layer = %layer.name(), base = %self.base, "attached layer");
	}

	/// Detaches `layer` from whichever chains contain it. Silent no-op when
	/// the layer is not attached or targets a different base type.
	pub fn remove(&self, layer: &Layer) {
		let spliced = self.instance_chain.lock().remove(layer) | self.static_chain.lock().remove(layer);
		if spliced {
			tracing::debug!(layer = %layer.name(), base = %self.base, "detached layer");
		}
	}

	/// Resolves a member half from the newest active layer.
	pub(crate) fn probe(&self, kind: TableKind, name: &str, half: Half) -> ChainHit {
		self.chain(kind).lock().resolve(name, half)
	}

	/// Resolves a member half starting one link below `layer`.
	pub(crate) fn probe_below(&self, kind: TableKind, layer: LayerId, name: &str, half: Half) -> ChainHit {
		self.chain(kind).lock().resolve_below(layer, name, half)
	}

	fn chain(&self, kind: TableKind) -> &Mutex<DelegationChain> {
		match kind {
			TableKind::Instance => &self.instance_chain,
			TableKind::Static => &self.static_chain,
		}
	}
}
