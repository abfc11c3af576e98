//! Delegation chains: the ordered stack of active layers for one member
//! table of one base type.
//!
//! A chain is a backward-linked list. `head` is the newest active layer;
//! each active layer carries one link to whatever it was stacked on at the
//! moment of its addition, terminating in [`Link::Origin`], the base type's
//! own table. Removal splices a layer out of the middle without disturbing
//! the relative order of anything else, which is what distinguishes this
//! from a plain stack.

#[cfg(test)]
mod tests;

use rustc_hash::FxHashMap;

use crate::base::{Half, MemberDef, TableKind};
use crate::layer::{Layer, LayerId};

/// One backward link in a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Link {
	/// The next-older active layer.
	Layer(LayerId),
	/// The original, unpatched member table.
	Origin,
}

/// Chain record for a layer. `next` keeps its last value after the layer is
/// spliced out: an in-flight super call of a removed layer still resolves
/// from where the layer used to sit, and a later re-add overwrites the link.
struct Node {
	layer: Layer,
	next: Link,
	linked: bool,
}

/// Outcome of a resolution walk.
pub(crate) enum ChainHit {
	/// A layer defines the requested member half. `layer` is the defining
	/// layer, the anchor for that definition's own super resolution.
	Found { def: MemberDef, layer: LayerId },
	/// No active layer defines it; fall back to the original table.
	Origin,
}

pub(crate) struct DelegationChain {
	kind: TableKind,
	head: Link,
	nodes: FxHashMap<LayerId, Node>,
}

impl DelegationChain {
	pub(crate) fn new(kind: TableKind) -> Self {
		DelegationChain {
			kind,
			head: Link::Origin,
			nodes: FxHashMap::default(),
		}
	}

	/// Links `layer` in as the new head. A layer is linked at most once: if
	/// it is already active it is spliced out first, so a re-add moves it
	/// ahead of everything else.
	pub(crate) fn add(&mut self, layer: &Layer) {
		let id = layer.id();
		if self.is_linked(id) {
			self.unlink(id);
		}
		self.nodes.insert(
			id,
			Node {
				layer: layer.clone(),
				next: self.head,
				linked: true,
			},
		);
		self.head = Link::Layer(id);
	}

	/// Splices `layer` out. Silent no-op when the layer is not active.
	/// Returns true when something was actually removed.
	pub(crate) fn remove(&mut self, layer: &Layer) -> bool {
		let id = layer.id();
		if !self.is_linked(id) {
			return false;
		}
		self.unlink(id);
		tracing::trace!(layer = %layer.name(), kind = ?self.kind, "spliced layer out of chain");
		true
	}

	/// Resolves `name` (the given half of it) from the newest active layer.
	pub(crate) fn resolve(&self, name: &str, half: Half) -> ChainHit {
		self.walk(self.head, name, half)
	}

	/// Resolves `name` starting one link below `layer`: the inherited
	/// implementation from that layer's point of view. The link is read at
	/// call time, so the walk always sees the current chain.
	pub(crate) fn resolve_below(&self, layer: LayerId, name: &str, half: Half) -> ChainHit {
		match self.nodes.get(&layer) {
			Some(node) => self.walk(node.next, name, half),
			None => ChainHit::Origin,
		}
	}

	fn walk(&self, start: Link, name: &str, half: Half) -> ChainHit {
		let mut cur = start;
		while let Link::Layer(id) = cur {
			let Some(node) = self.nodes.get(&id) else {
				break;
			};
			if let Some(def) = node.layer.member(self.kind, name) {
				// A definition lacking the requested half (a getter-only
				// accessor seen by setter resolution) never blocks the walk.
				if def.provides(half) {
					return ChainHit::Found {
						def: def.clone(),
						layer: id,
					};
				}
			}
			cur = node.next;
		}
		ChainHit::Origin
	}

	fn is_linked(&self, id: LayerId) -> bool {
		self.nodes.get(&id).is_some_and(|n| n.linked)
	}

	/// The splice: walk from the head until `id`, then rebind the next-newer
	/// link (or the head) past it. The spliced node keeps its own link.
	fn unlink(&mut self, id: LayerId) {
		let mut prev = None;
		let mut cur = self.head;
		while let Link::Layer(cid) = cur {
			if cid == id {
				break;
			}
			prev = Some(cid);
			cur = match self.nodes.get(&cid) {
				Some(node) => node.next,
				None => return,
			};
		}
		if cur == Link::Origin {
			return;
		}
		let Some(next) = self.nodes.get(&id).map(|n| n.next) else {
			return;
		};
		match prev {
			Some(pid) => {
				if let Some(p) = self.nodes.get_mut(&pid) {
					p.next = next;
				}
			}
			None => self.head = next,
		}
		if let Some(node) = self.nodes.get_mut(&id) {
			node.linked = false;
		}
	}
}
