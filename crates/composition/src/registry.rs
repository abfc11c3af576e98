//! Process-wide lookup from base-type identity to composition manager, and
//! the external registration surface.

use std::sync::{Arc, LazyLock};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::base::{BaseType, BaseTypeId};
use crate::layer::Layer;
use crate::manager::CompositionManager;

static REGISTRY: LazyLock<CompositionRegistry> = LazyLock::new(CompositionRegistry::new);

/// Process-wide map of composition managers, keyed by base-type identity.
///
/// Created empty, grows monotonically, and is never torn down; dropping a
/// manager is never required for correctness. [`CompositionRegistry::reset`]
/// exists solely so test runs can isolate themselves from each other.
pub struct CompositionRegistry {
	managers: Mutex<FxHashMap<BaseTypeId, Arc<CompositionManager>>>,
}

impl CompositionRegistry {
	fn new() -> Self {
		CompositionRegistry {
			managers: Mutex::new(FxHashMap::default()),
		}
	}

	/// The process-wide registry.
	pub fn global() -> &'static CompositionRegistry {
		&REGISTRY
	}

	/// Returns the manager for `base`, creating it on first use.
	pub fn get_or_create(&self, base: &BaseType) -> Arc<CompositionManager> {
		self.managers
			.lock()
			.entry(base.id())
			.or_insert_with(|| Arc::new(CompositionManager::new(base)))
			.clone()
	}

	/// Returns the manager for `base` if one was ever created.
	pub fn get(&self, base: &BaseType) -> Option<Arc<CompositionManager>> {
		self.managers.lock().get(&base.id()).cloned()
	}

	/// Drops the managers for the given base types.
	///
	/// Test isolation only. Redirecting entries installed on the base types
	/// stay; with their chains gone they resolve straight to the original
	/// definitions, so behavior reverts to the unpatched base.
	pub fn reset(&self, bases: &[&BaseType]) {
		let mut managers = self.managers.lock();
		for base in bases {
			if managers.remove(&base.id()).is_some() {
				tracing::debug!(base = %base, "reset composition state");
			}
		}
	}
}

/// Attaches `layer` to the base type it declares. The single external entry
/// point for consumers.
///
/// The returned handle detaches the layer; calling [`ExtensionHandle::remove`]
/// repeatedly, or after the layer was detached some other way, is a no-op.
/// Registering the same layer again while it is still attached moves it ahead
/// of every other layer, as a fresh add would.
pub fn register_extension(layer: &Layer) -> ExtensionHandle {
	let manager = CompositionRegistry::global().get_or_create(layer.base());
	manager.add(layer);
	ExtensionHandle {
		layer: layer.clone(),
		manager,
	}
}

/// Removal token returned by [`register_extension`].
///
/// Dropping the handle does not detach the layer; removal is always an
/// explicit call, at a point of the consumer's choosing.
#[must_use = "dropping the handle does not detach the layer; call remove()"]
pub struct ExtensionHandle {
	layer: Layer,
	manager: Arc<CompositionManager>,
}

impl ExtensionHandle {
	/// Detaches the layer. Safe to call any number of times.
	pub fn remove(&self) {
		self.manager.remove(&self.layer);
	}

	pub fn layer(&self) -> &Layer {
		&self.layer
	}
}
