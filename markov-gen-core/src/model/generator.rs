use log::info;
use rand::Rng;
use serde::Serialize;

use super::chain_builder::{ChainBuilder, ChainIndex};
use super::chain_walker::{ChainWalker, Generation};
use super::generation_input::GenerationInput;
use crate::error::{MarkovError, Result};

/// Summary of a built index.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct IndexStats {
	/// Order of the chain.
	pub k: usize,
	/// Number of distinct keys.
	pub keys: usize,
	/// Number of buckets.
	pub capacity: usize,
	/// Current load factor threshold.
	pub load_factor: f32,
	/// Keys followed by more than one distinct character.
	pub bifurcations: usize,
	/// Length of the longest bucket chain.
	pub longest_chain: usize,
}

/// High-level generator: a chain built once from a corpus, walked on demand.
///
/// # Responsibilities
/// - Reject corpora too short to produce any key
/// - Build the chain index with the configured order and sizing
/// - Generate text from it with an injected or configured randomness source
#[derive(Debug)]
pub struct Generator {
	k: usize,
	index: ChainIndex,
}

impl Generator {
	/// Builds a generator from a corpus.
	///
	/// The corpus is used as given; newline normalization is up to the caller.
	///
	/// # Errors
	/// - Any parameter error of `input`
	/// - `CorpusTooShort` if the corpus has `k` characters or fewer
	/// - `CapacityExhausted` if the index cannot grow enough
	pub fn from_corpus(corpus: &str, input: &GenerationInput) -> Result<Self> {
		input.validate()?;

		let chars: Vec<char> = corpus.chars().collect();
		if chars.len() <= input.k() {
			return Err(MarkovError::CorpusTooShort { corpus_len: chars.len(), k: input.k() });
		}

		let builder = ChainBuilder::with_index_params(input.k(), input.initial_capacity(), input.load_factor())?;
		let index = builder.build(&chars)?;
		Ok(Self { k: input.k(), index })
	}

	pub fn k(&self) -> usize {
		self.k
	}

	/// Read-only access to the built index.
	pub fn index(&self) -> &ChainIndex {
		&self.index
	}

	/// Generates up to `target_length` characters using `rng`.
	pub fn generate<R: Rng + ?Sized>(&self, target_length: usize, rng: &mut R) -> Result<Generation> {
		ChainWalker::generate(&self.index, self.k, target_length, rng)
	}

	/// Generates `input.length` characters with the randomness source of `input`.
	///
	/// # Notes
	/// Only `length` and `seed` are read from `input`; the chain itself is
	/// the one built at construction.
	pub fn predict(&self, input: &GenerationInput) -> Result<Generation> {
		let mut rng = input.rng();
		let generation = self.generate(input.length, &mut rng)?;
		info!("Generation seeded with {:?}", input.seed);
		Ok(generation)
	}

	/// Computes a summary of the index.
	pub fn stats(&self) -> IndexStats {
		IndexStats {
			k: self.k,
			keys: self.index.len(),
			capacity: self.index.capacity(),
			load_factor: self.index.load_factor(),
			bifurcations: self.index.iter().filter(|(_, table)| table.is_bifurcation()).count(),
			longest_chain: self.index.bucket_lengths().into_iter().max().unwrap_or(0),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn short_corpus_is_reported() {
		let input = GenerationInput::new(5, 100).unwrap();
		let err = Generator::from_corpus("abcde", &input).unwrap_err();
		assert_eq!(err, MarkovError::CorpusTooShort { corpus_len: 5, k: 5 });
	}

	#[test]
	fn predict_honors_length_and_seed() {
		let mut input = GenerationInput::new(2, 40).unwrap();
		input.seed = Some(99);
		let corpus = "she sells sea shells by the sea shore and the shells she sells are sea shells";
		let generator = Generator::from_corpus(corpus, &input).unwrap();

		let a = generator.predict(&input).unwrap();
		let b = generator.predict(&input).unwrap();
		assert_eq!(a.text, b.text);
		assert!(a.text.chars().count() <= 40);
		assert!(generator.index().contains_key(&a.text.chars().take(2).collect::<String>()));
	}

	#[test]
	fn stats_describe_the_index() {
		let input = GenerationInput::new(3, 10).unwrap();
		let generator = Generator::from_corpus("abcabcabcabc", &input).unwrap();
		let stats = generator.stats();
		assert_eq!(stats.k, 3);
		assert_eq!(stats.keys, 3);
		assert_eq!(stats.capacity, 11);
		assert_eq!(stats.bifurcations, 0);
		assert!(stats.longest_chain >= 1);
	}
}
