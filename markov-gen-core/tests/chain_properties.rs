//! Property-based tests for chain construction and generation.

use std::collections::HashMap;

use markov_gen_core::model::symbol_index::next_capacity;
use markov_gen_core::{ChainBuilder, ChainWalker, FrequencyTable, MarkovError, SymbolIndex};
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn arb_corpus() -> impl Strategy<Value = String> {
	// A small alphabet keeps keys repeating, so tables accumulate counts.
	proptest::collection::vec(prop_oneof![Just('a'), Just('b'), Just('c'), Just(' ')], 0..300)
		.prop_map(|chars| chars.into_iter().collect())
}

proptest! {
	#[test]
	fn total_equals_number_of_occurrences(first in any::<char>(), rest in proptest::collection::vec(any::<char>(), 0..200)) {
		let mut table = FrequencyTable::new("key", first);
		for c in &rest {
			table.increment(*c);
		}
		prop_assert_eq!(table.total(), rest.len() + 1);
		prop_assert_eq!(table.iter().map(|(_, n)| n).sum::<usize>(), table.total());
	}

	#[test]
	fn sampling_only_returns_observed_characters(chars in proptest::collection::vec(any::<char>(), 1..50), seed in any::<u64>()) {
		let mut table = FrequencyTable::new("key", chars[0]);
		for c in &chars[1..] {
			table.increment(*c);
		}
		let mut rng = StdRng::seed_from_u64(seed);
		for _ in 0..20 {
			let c = table.sample_weighted(&mut rng).unwrap();
			prop_assert!(table.frequency(c).unwrap_or(0) >= 1);
		}
	}

	#[test]
	fn keys_survive_resizes(keys in proptest::collection::vec("[a-z]{1,6}", 0..400), load_factor in 0.1f32..=1.0) {
		let mut index = SymbolIndex::new(11, load_factor).unwrap();
		let mut expected = HashMap::new();
		for (n, key) in keys.iter().enumerate() {
			index.put(key.clone(), n).unwrap();
			expected.insert(key.clone(), n);
			prop_assert!((index.len() as f32 / index.capacity() as f32) < index.load_factor());
		}
		prop_assert_eq!(index.len(), expected.len());
		for (key, value) in &expected {
			prop_assert_eq!(index.get(key.as_str()), Some(value));
		}
	}

	#[test]
	fn output_is_bounded_and_starts_with_a_key(corpus in arb_corpus(), k in 1usize..5, length in 0usize..200, seed in any::<u64>()) {
		let index = ChainBuilder::new(k).unwrap().build_str(&corpus).unwrap();
		let mut rng = StdRng::seed_from_u64(seed);

		match ChainWalker::generate(&index, k, length, &mut rng) {
			Ok(generation) => {
				let chars: Vec<char> = generation.text.chars().collect();
				prop_assert!(chars.len() <= length);
				if length >= k {
					let start: String = chars[..k].iter().collect();
					prop_assert!(index.contains_key(start.as_str()));
					// Every window used for a lookup was a key.
					for end in k..chars.len() {
						let window: String = chars[end - k..end].iter().collect();
						let table = index.get(window.as_str());
						prop_assert!(table.is_some());
						prop_assert!(table.unwrap().frequency(chars[end]).is_some());
					}
				}
			}
			Err(err) => {
				prop_assert_eq!(err, MarkovError::EmptyIndex);
				prop_assert!(corpus.chars().count() <= k);
			}
		}
	}
}

#[test]
fn resize_always_lands_on_next_listed_prime() {
	let mut index: SymbolIndex<u32, u32> = SymbolIndex::new(11, 0.75).unwrap();
	let mut previous = index.capacity();
	for n in 0..10_000 {
		index.put(n, n).unwrap();
		if index.capacity() != previous {
			assert_eq!(Some(index.capacity()), next_capacity(previous));
			previous = index.capacity();
		}
	}
	assert_eq!(index.capacity(), 25717);
}
