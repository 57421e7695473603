use log::{debug, info};
use rand::Rng;
use serde::Serialize;

use super::chain_builder::ChainIndex;
use crate::error::{MarkovError, Result};

/// Why a walk stopped.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
	/// The output reached the requested length.
	TargetReached,
	/// The trailing window of the output has no entry in the index.
	ChainBroken,
}

/// A branch point met during a walk: a key with several possible
/// next characters.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Bifurcation {
	/// Key that was looked up.
	pub key: String,
	/// Candidate characters and their counts, in ascending character order.
	pub choices: Vec<(char, usize)>,
	/// Character actually drawn.
	pub chosen: char,
}

/// Result of a walk.
#[derive(Serialize, Clone, Debug)]
pub struct Generation {
	pub text: String,
	pub bifurcations: Vec<Bifurcation>,
	pub stop_reason: StopReason,
}

/// Walks a chain index to produce text.
///
/// # Behavior
/// - Starts from a key of the index and appends it to the output
/// - Repeatedly looks up the trailing `k` characters and samples the next one
/// - Stops when the output reaches the requested length or the lookup misses
pub struct ChainWalker;

impl ChainWalker {
	/// Generates up to `target_length` characters, starting from a random key.
	///
	/// The start key is drawn with `SymbolIndex::get_random_key`.
	///
	/// # Errors
	/// - `InvalidOrder` if `k == 0`
	/// - `EmptyIndex` if the index holds no key
	pub fn generate<R: Rng + ?Sized>(
		index: &ChainIndex,
		k: usize,
		target_length: usize,
		rng: &mut R,
	) -> Result<Generation> {
		if k == 0 {
			return Err(MarkovError::InvalidOrder);
		}
		let start = index.get_random_key(rng)?;
		Self::walk_from(index, k, start, target_length, rng)
	}

	/// Generates up to `target_length` characters starting with `start`.
	///
	/// # Notes
	/// - The output always begins with `start`, cut to `target_length`
	///   characters when the target is shorter than the key.
	/// - A miss on the trailing window is the natural end of the text, not
	///   an error; the output may then be shorter than requested.
	/// - Lengths are counted in characters, not bytes.
	///
	/// # Errors
	/// Returns `InvalidOrder` if `k == 0`.
	pub fn walk_from<R: Rng + ?Sized>(
		index: &ChainIndex,
		k: usize,
		start: &str,
		target_length: usize,
		rng: &mut R,
	) -> Result<Generation> {
		if k == 0 {
			return Err(MarkovError::InvalidOrder);
		}

		let mut output: Vec<char> = start.chars().take(target_length).collect();
		let mut bifurcations = Vec::new();
		let mut stop_reason = StopReason::TargetReached;

		while output.len() < target_length {
			let window = if output.len() >= k { &output[output.len() - k..] } else { &output[..] };
			let key: String = window.iter().collect();

			let next_char = match index.get(key.as_str()) {
				Some(table) => match table.sample_weighted(rng) {
					Some(c) => {
						if table.is_bifurcation() {
							let choices: Vec<(char, usize)> = table.iter().collect();
							debug!("Bifurcation: '{}'; {:?} -> '{}'", key, choices, c);
							bifurcations.push(Bifurcation { key, choices, chosen: c });
						}
						c
					}
					None => {
						stop_reason = StopReason::ChainBroken;
						break;
					}
				},
				None => {
					stop_reason = StopReason::ChainBroken;
					break;
				}
			};
			output.push(next_char);
		}

		info!(
			"Generated {} of {} requested characters ({:?}, {} bifurcations)",
			output.len(),
			target_length,
			stop_reason,
			bifurcations.len()
		);

		Ok(Generation {
			text: output.into_iter().collect(),
			bifurcations,
			stop_reason,
		})
	}
}
