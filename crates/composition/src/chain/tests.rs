use super::*;

use strata_primitives::Value;

use crate::base::BaseType;

fn chain() -> DelegationChain {
	DelegationChain::new(TableKind::Instance)
}

fn base() -> BaseType {
	BaseType::builder("Widget").method("m", |_| Ok(Value::Int(0))).build()
}

fn layer(base: &BaseType, name: &str) -> Layer {
	Layer::builder(name)
		.base(base)
		.method("m", |_| Ok(Value::Unit))
		.build()
		.unwrap()
}

fn found(hit: ChainHit) -> Option<LayerId> {
	match hit {
		ChainHit::Found { layer, .. } => Some(layer),
		ChainHit::Origin => None,
	}
}

#[test]
fn test_empty_chain_resolves_origin() {
	let c = chain();
	assert_eq!(found(c.resolve("m", Half::Method)), None);
}

#[test]
fn test_newest_layer_wins() {
	let b = base();
	let (l1, l2) = (layer(&b, "L1"), layer(&b, "L2"));
	let mut c = chain();
	c.add(&l1);
	c.add(&l2);
	assert_eq!(found(c.resolve("m", Half::Method)), Some(l2.id()));
}

#[test]
fn test_remove_head_exposes_next() {
	let b = base();
	let (l1, l2) = (layer(&b, "L1"), layer(&b, "L2"));
	let mut c = chain();
	c.add(&l1);
	c.add(&l2);
	assert!(c.remove(&l2));
	assert_eq!(found(c.resolve("m", Half::Method)), Some(l1.id()));
	assert!(c.remove(&l1));
	assert_eq!(found(c.resolve("m", Half::Method)), None);
}

#[test]
fn test_mid_chain_splice_preserves_order() {
	let b = base();
	let (l1, l2, l3) = (layer(&b, "L1"), layer(&b, "L2"), layer(&b, "L3"));
	let mut c = chain();
	c.add(&l1);
	c.add(&l2);
	c.add(&l3);
	// Remove the middle layer; the newest stays newest and its inherited
	// implementation becomes the oldest layer.
	assert!(c.remove(&l2));
	assert_eq!(found(c.resolve("m", Half::Method)), Some(l3.id()));
	assert_eq!(found(c.resolve_below(l3.id(), "m", Half::Method)), Some(l1.id()));
}

#[test]
fn test_remove_absent_is_noop() {
	let b = base();
	let (l1, l2) = (layer(&b, "L1"), layer(&b, "L2"));
	let mut c = chain();
	assert!(!c.remove(&l1));
	c.add(&l1);
	assert!(!c.remove(&l2));
	assert!(c.remove(&l1));
	assert!(!c.remove(&l1));
}

#[test]
fn test_readd_moves_layer_to_head() {
	let b = base();
	let (l1, l2) = (layer(&b, "L1"), layer(&b, "L2"));
	let mut c = chain();
	c.add(&l1);
	c.add(&l2);
	c.add(&l1);
	assert_eq!(found(c.resolve("m", Half::Method)), Some(l1.id()));
	assert_eq!(found(c.resolve_below(l1.id(), "m", Half::Method)), Some(l2.id()));
	// Still linked at most once: one removal empties it from the chain.
	assert!(c.remove(&l1));
	assert_eq!(found(c.resolve("m", Half::Method)), Some(l2.id()));
	assert!(!c.remove(&l1));
}

#[test]
fn test_walk_skips_layers_without_the_requested_half() {
	let b = base();
	let getter_only = Layer::builder("GetterOnly")
		.base(&b)
		.getter("m", |_| Ok(Value::Int(1)))
		.build()
		.unwrap();
	let full = Layer::builder("Full")
		.base(&b)
		.setter("m", |_, _| Ok(()))
		.build()
		.unwrap();
	let mut c = chain();
	c.add(&full);
	c.add(&getter_only);
	assert_eq!(found(c.resolve("m", Half::Get)), Some(getter_only.id()));
	assert_eq!(found(c.resolve("m", Half::Set)), Some(full.id()));
	assert_eq!(found(c.resolve("m", Half::Method)), None);
}

#[test]
fn test_spliced_layer_keeps_its_link_for_inflight_resolution() {
	let b = base();
	let (l1, l2, l3) = (layer(&b, "L1"), layer(&b, "L2"), layer(&b, "L3"));
	let mut c = chain();
	c.add(&l1);
	c.add(&l2);
	c.add(&l3);
	// A call already running inside l2 resolves its super from where l2
	// used to sit, even after l2 is spliced out.
	assert!(c.remove(&l2));
	assert_eq!(found(c.resolve_below(l2.id(), "m", Half::Method)), Some(l1.id()));
}
