use std::collections::BTreeMap;
use std::fmt;

use rand::Rng;

/// Next-character frequencies observed after a single key.
///
/// A `FrequencyTable` corresponds to a fixed `k`-character key and stores
/// every character observed right after that key in the corpus, along with
/// how many times it was observed.
///
/// Conceptually, this is a node in a Markov chain where outgoing edges
/// are weighted by their number of observations.
///
/// ## Responsibilities:
/// - Accumulate next-character occurrences during the build phase
/// - Draw the next character using frequency-proportional sampling
///
/// ## Invariants
/// - The table is never empty: it is created with one occurrence
/// - Each stored count is strictly positive
/// - `total` equals the sum of all counts, i.e. the number of recorded occurrences
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrequencyTable {
	/// The key this table belongs to.
	key: String,
	/// Occurrences indexed by the next character, ordered by character code.
	/// Example: { 'a' => 3, 'e' => 42 }
	counts: BTreeMap<char, usize>,
	/// Sum of all values in `counts`.
	total: usize,
}

impl FrequencyTable {
	/// Creates a table for `key` holding one occurrence of `first_char`.
	pub fn new(key: &str, first_char: char) -> Self {
		let mut counts = BTreeMap::new();
		counts.insert(first_char, 1);
		Self {
			key: key.to_owned(),
			counts,
			total: 1,
		}
	}

	/// Records one more occurrence of `next_char`.
	///
	/// - If the character was already observed, its count is increased.
	/// - Otherwise, it is inserted with a count of 1.
	pub fn increment(&mut self, next_char: char) {
		*self.counts.entry(next_char).or_insert(0) += 1;
		self.total += 1;
	}

	/// Returns how many times `next_char` followed the key, or `None`
	/// if it was never observed.
	pub fn frequency(&self, next_char: char) -> Option<usize> {
		self.counts.get(&next_char).copied()
	}

	/// Returns the key this table belongs to.
	pub fn key(&self) -> &str {
		&self.key
	}

	/// Total number of recorded occurrences.
	pub fn total(&self) -> usize {
		self.total
	}

	/// Number of distinct next characters.
	pub fn distinct(&self) -> usize {
		self.counts.len()
	}

	/// True when more than one distinct next character was observed,
	/// making this key a branch point of the chain.
	pub fn is_bifurcation(&self) -> bool {
		self.counts.len() > 1
	}

	/// Iterates over `(char, count)` pairs in ascending character order.
	pub fn iter(&self) -> impl Iterator<Item = (char, usize)> + '_ {
		self.counts.iter().map(|(c, n)| (*c, *n))
	}

	/// Draws the next character with probability `count / total`.
	///
	/// The table is treated as a weighted multiset laid out in ascending
	/// character order. A single uniform index in `[0, total)` is drawn from
	/// `rng` and the character covering that position is returned, without
	/// materializing the multiset.
	///
	/// Returns `None` only for an empty table, which construction rules out.
	pub fn sample_weighted<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<char> {
		if self.total == 0 {
			return None;
		}

		let mut r = rng.random_range(0..self.total);
		for (next_char, occurrence) in &self.counts {
			if r < *occurrence {
				return Some(*next_char);
			}
			r -= occurrence;
		}

		// Unreachable while `total` matches the counts.
		self.counts.keys().next_back().copied()
	}
}

impl fmt::Display for FrequencyTable {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:", self.key)?;
		for (next_char, occurrence) in &self.counts {
			write!(f, "\n  {} ({})", next_char, occurrence)?;
		}
		Ok(())
	}
}
