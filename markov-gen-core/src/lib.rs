//! Character-level Markov chain text generation library.
//!
//! This crate provides:
//! - A k-order character chain built from a sample text
//! - A custom chained hash table with inspectable, prime-sized growth
//! - Frequency-proportional generation with an injected randomness source
//!
//! The crate never reads files nor prints: the caller supplies the corpus
//! (with newlines already normalized) and receives the generated text.
//! Diagnostics go through the `log` facade.

/// Chain structures, construction and generation.
pub mod model;

/// Error type shared by every fallible operation.
pub mod error;

pub use error::{MarkovError, Result};
pub use model::chain_builder::{ChainBuilder, ChainIndex};
pub use model::chain_walker::{Bifurcation, ChainWalker, Generation, StopReason};
pub use model::frequency_table::FrequencyTable;
pub use model::generation_input::GenerationInput;
pub use model::generator::{Generator, IndexStats};
pub use model::symbol_index::SymbolIndex;
