//! Top-level module for the Markov chain text generator.
//!
//! This module provides a character-level k-order Markov chain, including:
//! - Per-key next-character frequencies (`FrequencyTable`)
//! - A chained hash table with prime-sized growth (`SymbolIndex`)
//! - Chain construction from a corpus (`ChainBuilder`)
//! - Weighted random walks over the chain (`ChainWalker`)
//! - Generation parameters (`GenerationInput`)
//! - A high-level build-then-walk interface (`Generator`)

/// Next-character occurrence counts for a single key.
///
/// Supports frequency-proportional sampling of the next character.
pub mod frequency_table;

/// Chained hash table mapping keys to values.
///
/// Grows through a fixed sequence of primes and supports random key draws.
pub mod symbol_index;

/// Sliding-window construction of the chain index from a corpus.
pub mod chain_builder;

/// Text generation by walking the chain index.
pub mod chain_walker;

/// Generation parameters: order, length, index sizing and seed.
pub mod generation_input;

/// High-level interface combining chain construction and generation.
pub mod generator;
