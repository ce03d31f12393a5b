use log::warn;

use crate::alphabet::index_of_chars;
use crate::error::{LangIdError, LangIdResult};
use super::ngram_model::{NGramModel, ALPHA};
use super::order::Order;

/// Raw observation counts for one model order, before smoothing.
///
/// This is the mutable side of model construction: words are fed in,
/// partial tables built on different threads can be merged, and
/// [`NGramCounts::finish`] turns the result into an immutable
/// [`NGramModel`].
///
/// # Invariants
/// - `counts.len()` is always `26^order`
/// - `observed` is the sum of `counts`
#[derive(Clone, Debug)]
pub struct NGramCounts {
	order: Order,
	/// Observations per key, indexed by the key's base-26 index.
	counts: Vec<u64>,
	/// Number of windows counted.
	observed: u64,
	/// Number of windows dropped because they held a symbol outside the alphabet.
	skipped: u64,
}

impl NGramCounts {
	/// Creates an empty table covering every key of `order`.
	pub fn new(order: Order) -> Self {
		Self {
			order,
			counts: vec![0; order.key_space()],
			observed: 0,
			skipped: 0,
		}
	}

	pub fn order(&self) -> Order {
		self.order
	}

	pub fn observed(&self) -> u64 {
		self.observed
	}

	pub fn skipped(&self) -> u64 {
		self.skipped
	}

	/// Counts every window of the model width inside a single word.
	///
	/// Windows never cross word boundaries, and a word shorter than the
	/// order contributes nothing. Windows holding a symbol outside `a..=z`
	/// are skipped.
	pub fn add_word(&mut self, word: &str) {
		let width = self.order.width();
		let chars: Vec<char> = word.chars().collect();
		if chars.len() < width {
			return;
		}

		for window in chars.windows(width) {
			match index_of_chars(window) {
				Some(index) => {
					self.counts[index] += 1;
					self.observed += 1;
				}
				None => self.skipped += 1,
			}
		}
	}

	/// Merges another count table of the same order into this one.
	///
	/// # Errors
	/// Returns [`LangIdError::OrderMismatch`] if the orders differ.
	pub fn merge(&mut self, other: &Self) -> LangIdResult<()> {
		if self.order != other.order {
			return Err(LangIdError::OrderMismatch { expected: self.order, actual: other.order });
		}

		for (count, extra) in self.counts.iter_mut().zip(&other.counts) {
			*count += extra;
		}
		self.observed += other.observed;
		self.skipped += other.skipped;

		Ok(())
	}

	/// Applies additive smoothing and normalizes into a probability table.
	///
	/// Every key receives `ALPHA` before its observations, so the total mass
	/// is `26^order * ALPHA + observed`.
	pub fn finish(self) -> NGramModel {
		if self.skipped > 0 {
			warn!(
				"order {} model: skipped {} training window(s) holding symbols outside a-z",
				self.order, self.skipped
			);
		}

		let total = self.counts.len() as f64 * ALPHA + self.observed as f64;
		let probabilities = self
			.counts
			.iter()
			.map(|&count| (count as f64 + ALPHA) / total)
			.collect();

		NGramModel::from_probabilities(self.order, probabilities)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn counts_windows_inside_words_only() {
		let mut counts = NGramCounts::new(Order::Bigram);
		counts.add_word("abc");
		counts.add_word("d");
		counts.add_word("ef");
		// ab, bc, ef; "cd" / "de" never formed across words
		assert_eq!(counts.observed(), 3);
	}

	#[test]
	fn short_words_are_ignored() {
		let mut counts = NGramCounts::new(Order::Trigram);
		counts.add_word("ab");
		counts.add_word("");
		assert_eq!(counts.observed(), 0);
	}

	#[test]
	fn foreign_symbols_skip_their_windows() {
		let mut counts = NGramCounts::new(Order::Bigram);
		counts.add_word("aXb");
		assert_eq!(counts.observed(), 0);
		assert_eq!(counts.skipped(), 2);

		let mut counts = NGramCounts::new(Order::Unigram);
		counts.add_word("héllo");
		assert_eq!(counts.observed(), 4);
		assert_eq!(counts.skipped(), 1);
	}

	#[test]
	fn merge_sums_observations() {
		let mut left = NGramCounts::new(Order::Unigram);
		left.add_word("aa");
		let mut right = NGramCounts::new(Order::Unigram);
		right.add_word("ab");

		left.merge(&right).unwrap();
		assert_eq!(left.observed(), 4);

		let model = left.finish();
		let total = 26.0 * ALPHA + 4.0;
		assert_eq!(model.probability("a"), Some(3.5 / total));
		assert_eq!(model.probability("b"), Some(1.5 / total));
	}

	#[test]
	fn merge_rejects_other_order() {
		let mut unigram = NGramCounts::new(Order::Unigram);
		let bigram = NGramCounts::new(Order::Bigram);
		assert!(matches!(
			unigram.merge(&bigram),
			Err(LangIdError::OrderMismatch { expected: Order::Unigram, actual: Order::Bigram })
		));
	}
}
