use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};

use log::debug;
use rand::Rng;
use rustc_hash::FxHasher;

use crate::error::{MarkovError, Result};

/// Capacities the index grows through, in order.
///
/// Each step roughly doubles the previous one.
pub const PRIME_CAPACITIES: [usize; 28] = [
	11, 23, 47, 97, 197, 397, 797, 1597, 3203, 6421, 12853, 25717, 51437, 102877, 205759, 411527,
	823117, 1646237, 3292489, 6584983, 13169977, 26339969, 52679969, 105359939, 210719881,
	421439783, 842879579, 1685759167,
];

/// Capacity used by `SymbolIndex::default`.
pub const DEFAULT_CAPACITY: usize = 11;

/// Load factor used by `SymbolIndex::default`, and adopted by every
/// table rebuilt through `resize`.
pub const DEFAULT_LOAD_FACTOR: f32 = 0.75;

/// Returns the smallest listed prime strictly greater than `capacity`.
pub fn next_capacity(capacity: usize) -> Option<usize> {
	PRIME_CAPACITIES.iter().copied().find(|&prime| prime > capacity)
}

/// A key and its value, stored in a bucket chain.
#[derive(Clone, Debug)]
struct Entry<K, V> {
	key: K,
	value: V,
}

/// Chained hash table with a fixed prime growth sequence.
///
/// The `SymbolIndex` maps keys to values through an array of buckets,
/// each bucket being a chain of entries in insertion order. The bucket of
/// a key is its (unsigned) `FxHasher` hash modulo the capacity, so the
/// layout is fully deterministic for a given insertion history.
///
/// # Responsibilities
/// - Upsert and look up entries
/// - Grow through `PRIME_CAPACITIES` when the load factor is reached
/// - Draw a random key (bucket first, then entry within the bucket)
///
/// # Invariants
/// - `size` is the number of distinct keys stored
/// - `size / capacity < load_factor` after every completed `put`
/// - Capacity never shrinks
#[derive(Clone, Debug)]
pub struct SymbolIndex<K, V> {
	buckets: Vec<Vec<Entry<K, V>>>,
	size: usize,
	load_factor: f32,
}

impl<K, V> SymbolIndex<K, V>
where
	K: Hash + Eq,
{
	/// Creates an empty index with `capacity` empty buckets.
	///
	/// # Errors
	/// - `InvalidCapacity` if `capacity == 0`
	/// - `InvalidLoadFactor` if `load_factor` is not in `(0.0, 1.0]`
	pub fn new(capacity: usize, load_factor: f32) -> Result<Self> {
		if capacity == 0 {
			return Err(MarkovError::InvalidCapacity);
		}
		if !(load_factor > 0.0 && load_factor <= 1.0) {
			return Err(MarkovError::InvalidLoadFactor(load_factor));
		}
		Ok(Self::with_buckets(capacity, load_factor))
	}

	fn with_buckets(capacity: usize, load_factor: f32) -> Self {
		let mut buckets = Vec::with_capacity(capacity);
		buckets.resize_with(capacity, Vec::new);
		Self { buckets, size: 0, load_factor }
	}

	/// Number of distinct keys stored.
	pub fn len(&self) -> usize {
		self.size
	}

	pub fn is_empty(&self) -> bool {
		self.size == 0
	}

	/// Number of buckets.
	pub fn capacity(&self) -> usize {
		self.buckets.len()
	}

	pub fn load_factor(&self) -> f32 {
		self.load_factor
	}

	fn bucket_of<Q>(&self, key: &Q) -> usize
	where
		Q: Hash + ?Sized,
	{
		let mut hasher = FxHasher::default();
		key.hash(&mut hasher);
		(hasher.finish() % self.buckets.len() as u64) as usize
	}

	/// True if an entry with an equal key exists.
	pub fn contains_key<Q>(&self, key: &Q) -> bool
	where
		K: Borrow<Q>,
		Q: Hash + Eq + ?Sized,
	{
		self.get(key).is_some()
	}

	/// Returns the value stored for `key`, if any.
	pub fn get<Q>(&self, key: &Q) -> Option<&V>
	where
		K: Borrow<Q>,
		Q: Hash + Eq + ?Sized,
	{
		self.buckets[self.bucket_of(key)]
			.iter()
			.find(|entry| entry.key.borrow() == key)
			.map(|entry| &entry.value)
	}

	/// Returns a mutable reference to the value stored for `key`, if any.
	pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
	where
		K: Borrow<Q>,
		Q: Hash + Eq + ?Sized,
	{
		let bucket = self.bucket_of(key);
		self.buckets[bucket]
			.iter_mut()
			.find(|entry| entry.key.borrow() == key)
			.map(|entry| &mut entry.value)
	}

	/// Inserts or replaces the value for `key`.
	///
	/// - If `key` exists, its value is replaced and returned; `len` is unchanged.
	/// - Otherwise a new entry is appended to the key's bucket, `len` grows by
	///   one, and the index resizes once `len / capacity >= load_factor`.
	///
	/// # Errors
	/// Returns `CapacityExhausted` if growth is required past the last listed prime.
	/// The entry is stored even in that case.
	pub fn put(&mut self, key: K, value: V) -> Result<Option<V>> {
		let bucket = self.bucket_of(&key);
		let chain = &mut self.buckets[bucket];

		if let Some(entry) = chain.iter_mut().find(|entry| entry.key == key) {
			return Ok(Some(std::mem::replace(&mut entry.value, value)));
		}

		chain.push(Entry { key, value });
		self.size += 1;

		while self.ratio() >= self.load_factor {
			self.resize()?;
		}
		Ok(None)
	}

	fn ratio(&self) -> f32 {
		self.size as f32 / self.buckets.len() as f32
	}

	/// Grows the index to the next listed prime and rehashes every entry.
	///
	/// Values are moved, not rebuilt, so their contents are preserved.
	/// The rebuilt table adopts `DEFAULT_LOAD_FACTOR`.
	///
	/// # Errors
	/// Returns `CapacityExhausted` if the capacity already is, or exceeds,
	/// the last listed prime. The index is left untouched.
	pub fn resize(&mut self) -> Result<()> {
		let capacity = self.capacity();
		let new_capacity = next_capacity(capacity).ok_or(MarkovError::CapacityExhausted { capacity })?;

		let mut rebuilt = Self::with_buckets(new_capacity, DEFAULT_LOAD_FACTOR);
		for entry in std::mem::take(&mut self.buckets).into_iter().flatten() {
			let bucket = rebuilt.bucket_of(&entry.key);
			rebuilt.buckets[bucket].push(entry);
		}
		rebuilt.size = self.size;

		debug!(
			"Resized symbol index from {} to {} buckets ({} keys)",
			capacity, new_capacity, rebuilt.size
		);
		*self = rebuilt;
		Ok(())
	}

	/// Returns a random key.
	///
	/// A bucket index is drawn uniformly, redrawing until a non-empty bucket
	/// is hit; an entry is then drawn uniformly within that bucket. Keys in
	/// sparsely populated buckets are therefore favored over keys sharing a
	/// bucket with others.
	///
	/// # Errors
	/// Returns `EmptyIndex` if the index holds no entry.
	pub fn get_random_key<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<&K> {
		if self.is_empty() {
			return Err(MarkovError::EmptyIndex);
		}

		loop {
			let chain = &self.buckets[rng.random_range(0..self.buckets.len())];
			if !chain.is_empty() {
				return Ok(&chain[rng.random_range(0..chain.len())].key);
			}
		}
	}

	/// Iterates over all entries, bucket by bucket.
	pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
		self.buckets.iter().flatten().map(|entry| (&entry.key, &entry.value))
	}

	/// Returns the chain length of every bucket.
	pub fn bucket_lengths(&self) -> Vec<usize> {
		self.buckets.iter().map(Vec::len).collect()
	}
}

impl<K, V> Default for SymbolIndex<K, V>
where
	K: Hash + Eq,
{
	fn default() -> Self {
		Self::with_buckets(DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR)
	}
}

impl<K, V> fmt::Display for SymbolIndex<K, V>
where
	K: fmt::Display,
	V: fmt::Display,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "SymbolIndex ({} keys, {} buckets)", self.size, self.buckets.len())?;
		for (n, chain) in self.buckets.iter().enumerate() {
			write!(f, "\n bin_{}", n)?;
			for entry in chain {
				write!(f, "\n  {} {}", entry.key, entry.value)?;
			}
		}
		Ok(())
	}
}
