//! The splice-based delegation chains must be behaviorally indistinguishable
//! from a naive reference model that keeps an explicit ordered list of active
//! layers in most-recent-add order and resolves top-down.

use pretty_assertions as _;
use proptest::prelude::*;
use strata_composition::{BaseType, CompositionRegistry, Layer, Value, register_extension};

/// Arithmetic the fixed layer set applies to the inherited score, oldest
/// active layer first. Deliberately non-commutative.
const TRANSFORMS: [fn(i64) -> i64; 4] = [
	|v| v + 1,
	|v| v * 2,
	|v| v - 3,
	|v| 10 - v,
];

const BASE_SCORE: i64 = 5;

fn build_base() -> BaseType {
	BaseType::builder("Scored")
		.field("score", BASE_SCORE)
		.method("score", |cx| cx.field("score"))
		.build()
}

fn build_layers(base: &BaseType) -> Vec<Layer> {
	TRANSFORMS
		.iter()
		.enumerate()
		.map(|(i, transform)| {
			let transform = *transform;
			Layer::builder(&format!("T{i}"))
				.base(base)
				.method("score", move |cx| {
					Ok(Value::Int(transform(cx.call_super(&[])?.expect_int()?)))
				})
				.build()
				.unwrap()
		})
		.collect()
}

/// Reference model: active layer indices, newest first.
#[derive(Default)]
struct OrderedModel {
	active: Vec<usize>,
}

impl OrderedModel {
	fn add(&mut self, idx: usize) {
		self.active.retain(|&i| i != idx);
		self.active.insert(0, idx);
	}

	fn remove(&mut self, idx: usize) {
		self.active.retain(|&i| i != idx);
	}

	/// Resolves top-down, which folds the transforms bottom-up: the oldest
	/// active layer sees the base score first.
	fn score(&self) -> i64 {
		self.active
			.iter()
			.rev()
			.fold(BASE_SCORE, |v, &i| TRANSFORMS[i](v))
	}
}

/// Sequences of (add, layer index) / (remove, layer index) operations.
fn arb_ops() -> impl Strategy<Value = Vec<(bool, usize)>> {
	proptest::collection::vec((any::<bool>(), 0..TRANSFORMS.len()), 1..60)
}

proptest! {
	/// After every operation of any add/remove sequence, the engine and the
	/// ordered-list model observe the same score; once everything is
	/// removed, the base behaves as if never extended.
	#[test]
	fn prop_chain_matches_ordered_list_model(ops in arb_ops()) {
		let base = build_base();
		let layers = build_layers(&base);
		let inst = base.instantiate_default();
		let manager = CompositionRegistry::global().get_or_create(&base);
		let mut model = OrderedModel::default();

		for (add, idx) in ops {
			if add {
				manager.add(&layers[idx]);
				model.add(idx);
			} else {
				manager.remove(&layers[idx]);
				model.remove(idx);
			}
			let got = inst.call("score", &[]).unwrap().expect_int().unwrap();
			prop_assert_eq!(got, model.score());
		}

		for layer in &layers {
			manager.remove(layer);
		}
		let restored = inst.call("score", &[]).unwrap().expect_int().unwrap();
		prop_assert_eq!(restored, BASE_SCORE);

		CompositionRegistry::global().reset(&[&base]);
	}

	/// Registration through the public handle surface agrees with direct
	/// manager operations for the same sequence.
	#[test]
	fn prop_handles_agree_with_manager_surface(ops in arb_ops()) {
		let base = build_base();
		let layers = build_layers(&base);
		let inst = base.instantiate_default();
		let mut model = OrderedModel::default();
		let mut handles: Vec<Option<strata_composition::ExtensionHandle>> =
			layers.iter().map(|_| None).collect();

		for (add, idx) in ops {
			if add {
				handles[idx] = Some(register_extension(&layers[idx]));
				model.add(idx);
			} else {
				if let Some(handle) = &handles[idx] {
					handle.remove();
				}
				model.remove(idx);
			}
			let got = inst.call("score", &[]).unwrap().expect_int().unwrap();
			prop_assert_eq!(got, model.score());
		}

		CompositionRegistry::global().reset(&[&base]);
	}
}
