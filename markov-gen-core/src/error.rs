//! Error types for the Markov text generator.
//!
//! Only structural failures are errors. A lookup that finds no entry is
//! a normal outcome (`Option::None`) and ends a chain walk early.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarkovError {
	/// The index would have to grow past the largest capacity of the
	/// prime growth sequence.
	#[error("capacity exhausted: no listed prime is larger than {capacity}")]
	CapacityExhausted { capacity: usize },

	/// A random key was requested from an index without entries.
	#[error("the symbol index is empty")]
	EmptyIndex,

	/// The corpus has no character following a full `k`-length window.
	#[error("corpus of {corpus_len} characters is too short for order {k}")]
	CorpusTooShort { corpus_len: usize, k: usize },

	#[error("initial capacity must be a positive integer")]
	InvalidCapacity,

	#[error("load factor must be in (0.0, 1.0], got {0}")]
	InvalidLoadFactor(f32),

	#[error("order k must be >= 1")]
	InvalidOrder,
}

pub type Result<T> = std::result::Result<T, MarkovError>;
