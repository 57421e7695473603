use log::{info, warn};

use super::frequency_table::FrequencyTable;
use super::symbol_index::{DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR, SymbolIndex};
use crate::error::{MarkovError, Result};

/// Index produced by a build: `k`-character keys to their frequency tables.
pub type ChainIndex = SymbolIndex<String, FrequencyTable>;

/// Builds a k-order character chain from a corpus.
///
/// # Responsibilities
/// - Slide a window of width `k` over the corpus
/// - Record, for each window, the character that immediately follows it
///
/// # Invariants
/// - `k` is always >= 1
/// - Every key of the produced index is exactly `k` characters long
#[derive(Clone, Debug)]
pub struct ChainBuilder {
	/// Order of the chain (number of characters in a key)
	k: usize,
	initial_capacity: usize,
	load_factor: f32,
}

impl ChainBuilder {
	/// Creates a builder of order `k` using the default index parameters.
	///
	/// # Errors
	/// Returns `InvalidOrder` if `k == 0`.
	pub fn new(k: usize) -> Result<Self> {
		Self::with_index_params(k, DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR)
	}

	/// Creates a builder of order `k` whose index starts at `initial_capacity`
	/// buckets and grows at `load_factor`.
	///
	/// # Errors
	/// - `InvalidOrder` if `k == 0`
	/// - `InvalidCapacity` / `InvalidLoadFactor` for invalid index parameters
	pub fn with_index_params(k: usize, initial_capacity: usize, load_factor: f32) -> Result<Self> {
		if k == 0 {
			return Err(MarkovError::InvalidOrder);
		}
		// Validate early rather than on first build.
		SymbolIndex::<String, FrequencyTable>::new(initial_capacity, load_factor)?;
		Ok(Self { k, initial_capacity, load_factor })
	}

	pub fn k(&self) -> usize {
		self.k
	}

	/// Builds the index for `corpus`.
	///
	/// For every offset `n` in `0..len - k`, the key `corpus[n..n + k]` gets
	/// one occurrence of `corpus[n + k]`.
	///
	/// # Notes
	/// - Characters are taken as-is: no case folding, no normalization.
	/// - A corpus of `k` characters or fewer yields an empty index.
	///
	/// # Errors
	/// Returns `CapacityExhausted` if the corpus holds more distinct keys than
	/// the largest listed capacity can accommodate.
	pub fn build(&self, corpus: &[char]) -> Result<ChainIndex> {
		let mut index = SymbolIndex::new(self.initial_capacity, self.load_factor)?;

		if corpus.len() <= self.k {
			warn!(
				"Corpus of {} characters is too short for order {}, index is empty",
				corpus.len(),
				self.k
			);
			return Ok(index);
		}

		for window in corpus.windows(self.k + 1) {
			let key: String = window[..self.k].iter().collect();
			let next_char = window[self.k];

			if let Some(table) = index.get_mut(key.as_str()) {
				table.increment(next_char);
			} else {
				let table = FrequencyTable::new(&key, next_char);
				index.put(key, table)?;
			}
		}

		info!(
			"Built order-{} chain: {} keys in {} buckets",
			self.k,
			index.len(),
			index.capacity()
		);
		Ok(index)
	}

	/// Convenience wrapper over `build` for string input.
	pub fn build_str(&self, corpus: &str) -> Result<ChainIndex> {
		let chars: Vec<char> = corpus.chars().collect();
		self.build(&chars)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn rejects_order_zero() {
		assert_eq!(ChainBuilder::new(0).unwrap_err(), MarkovError::InvalidOrder);
	}

	#[test]
	fn rejects_invalid_index_params() {
		assert_eq!(
			ChainBuilder::with_index_params(3, 0, 0.75).unwrap_err(),
			MarkovError::InvalidCapacity
		);
		assert_eq!(
			ChainBuilder::with_index_params(3, 11, 2.0).unwrap_err(),
			MarkovError::InvalidLoadFactor(2.0)
		);
	}

	#[test]
	fn repeating_corpus_counts_every_window() {
		let index = ChainBuilder::new(3).unwrap().build_str("abcabcabcabc").unwrap();
		assert_eq!(index.len(), 3);

		let abc = index.get("abc").unwrap();
		assert_eq!(abc.frequency('a'), Some(3));
		assert_eq!(abc.total(), 3);

		let bca = index.get("bca").unwrap();
		assert_eq!(bca.frequency('b'), Some(3));

		let cab = index.get("cab").unwrap();
		assert_eq!(cab.frequency('c'), Some(3));
		assert!(index.iter().all(|(_, table)| !table.is_bifurcation()));
	}

	#[test]
	fn corpus_of_length_k_yields_empty_index() {
		let index = ChainBuilder::new(5).unwrap().build_str("abcde").unwrap();
		assert!(index.is_empty());

		let index = ChainBuilder::new(5).unwrap().build_str("").unwrap();
		assert!(index.is_empty());
	}

	#[test]
	fn corpus_of_length_k_plus_one_yields_one_key() {
		let index = ChainBuilder::new(5).unwrap().build_str("abcdef").unwrap();
		assert_eq!(index.len(), 1);
		assert_eq!(index.get("abcde").unwrap().frequency('f'), Some(1));
	}

	#[test]
	fn records_bifurcations() {
		let index = ChainBuilder::new(2).unwrap().build_str("the then them").unwrap();
		let he = index.get("he").unwrap();
		assert_eq!(he.frequency(' '), Some(1));
		assert_eq!(he.frequency('n'), Some(1));
		assert_eq!(he.frequency('m'), Some(1));
		assert_eq!(he.total(), 3);
		assert!(he.is_bifurcation());
	}

	#[test]
	fn keys_are_multibyte_safe() {
		let index = ChainBuilder::new(2).unwrap().build_str("éàéàé").unwrap();
		assert_eq!(index.get("éà").unwrap().frequency('é'), Some(2));
		assert_eq!(index.get("àé").unwrap().frequency('à'), Some(1));
	}

	#[test]
	fn large_corpus_grows_the_index() {
		let corpus: String = (0..2_000u32).map(|n| char::from(b'a' + (n * 7 % 26) as u8)).collect();
		let index = ChainBuilder::with_index_params(4, 11, 0.75).unwrap().build_str(&corpus).unwrap();
		let total: usize = index.iter().map(|(_, table)| table.total()).sum();
		assert_eq!(total, 2_000 - 4);
		assert!(index.capacity() >= 11);
		assert!(index.iter().all(|(key, _)| key.chars().count() == 4));
	}
}
