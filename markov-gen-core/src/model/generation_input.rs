use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use super::symbol_index::{DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR};
use crate::error::{MarkovError, Result};

/// Parameters of a build and walk.
///
/// `GenerationInput` holds both the **chain parameters** (order `k`, index
/// sizing) and the **walk parameters** (target length, seed).
///
/// # Responsibilities
/// - Track the order `k`, the requested length and the index parameters
/// - Validate every value on assignment
/// - Provide the randomness source used for generation
///
/// # Invariants
/// - `k >= 1`
/// - `initial_capacity >= 1`
/// - `load_factor` is in `(0.0, 1.0]`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct GenerationInput {
	/// Number of characters in a key (usually 5 to 8).
	k: usize,

	/// Requested number of characters to generate.
	pub length: usize,

	/// Number of buckets the index starts with.
	initial_capacity: usize,

	/// Load factor at which the index grows.
	load_factor: f32,

	/// Seed for reproducible output; entropy is used when absent.
	pub seed: Option<u64>,
}

impl Default for GenerationInput {
	fn default() -> Self {
		Self {
			k: 6,
			length: 500,
			initial_capacity: DEFAULT_CAPACITY,
			load_factor: DEFAULT_LOAD_FACTOR,
			seed: None,
		}
	}
}

impl GenerationInput {
	/// Creates an input of order `k` for `length` characters, with default
	/// index parameters and no seed.
	///
	/// # Errors
	/// Returns `InvalidOrder` if `k == 0`.
	pub fn new(k: usize, length: usize) -> Result<Self> {
		let mut input = Self { length, ..Self::default() };
		input.set_k(k)?;
		Ok(input)
	}

	pub fn k(&self) -> usize {
		self.k
	}

	pub fn initial_capacity(&self) -> usize {
		self.initial_capacity
	}

	pub fn load_factor(&self) -> f32 {
		self.load_factor
	}

	/// Sets the order `k`.
	///
	/// # Errors
	/// Returns `InvalidOrder` if `k == 0`.
	pub fn set_k(&mut self, k: usize) -> Result<()> {
		if k == 0 {
			return Err(MarkovError::InvalidOrder);
		}
		self.k = k;
		Ok(())
	}

	/// Sets the initial number of buckets.
	///
	/// # Errors
	/// Returns `InvalidCapacity` if `capacity == 0`.
	pub fn set_initial_capacity(&mut self, capacity: usize) -> Result<()> {
		if capacity == 0 {
			return Err(MarkovError::InvalidCapacity);
		}
		self.initial_capacity = capacity;
		Ok(())
	}

	/// Sets the load factor (0.0, 1.0].
	///
	/// # Errors
	/// Returns `InvalidLoadFactor` if the value is outside the valid range.
	pub fn set_load_factor(&mut self, load_factor: f32) -> Result<()> {
		if !(load_factor > 0.0 && load_factor <= 1.0) {
			return Err(MarkovError::InvalidLoadFactor(load_factor));
		}
		self.load_factor = load_factor;
		Ok(())
	}

	/// Checks the invariants, for values that bypassed the setters
	/// (e.g. deserialized ones).
	pub fn validate(&self) -> Result<()> {
		if self.k == 0 {
			return Err(MarkovError::InvalidOrder);
		}
		if self.initial_capacity == 0 {
			return Err(MarkovError::InvalidCapacity);
		}
		if !(self.load_factor > 0.0 && self.load_factor <= 1.0) {
			return Err(MarkovError::InvalidLoadFactor(self.load_factor));
		}
		Ok(())
	}

	/// Returns the randomness source for a walk.
	///
	/// Seeded from `seed` when set, from the operating system otherwise.
	pub fn rng(&self) -> StdRng {
		match self.seed {
			Some(seed) => StdRng::seed_from_u64(seed),
			None => StdRng::from_os_rng(),
		}
	}
}
