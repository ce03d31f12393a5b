use serde::{Deserialize, Serialize};

use crate::alphabet::{index_of, key_at};
use crate::error::{LangIdError, LangIdResult};
use super::counts::NGramCounts;
use super::order::Order;

/// Additive smoothing mass given to every key before counting.
pub const ALPHA: f64 = 0.5;

/// Smoothed character n-gram probability table of a single language.
///
/// The table is exhaustive: it holds one probability for every string of
/// `order` letters over `a..=z`, stored densely at the key's base-26 index.
/// There is no "unseen n-gram" at query time as long as the query stays in
/// the alphabet.
///
/// # Invariants
/// - `probabilities.len() == 26^order`
/// - every probability is strictly positive
/// - probabilities sum to 1 (within floating-point tolerance)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NGramModel {
	order: Order,
	probabilities: Vec<f64>,
}

impl NGramModel {
	/// Builds a model of `order` from a list of training words.
	///
	/// Words are expected to be lowercase letters only; see
	/// [`NGramCounts::add_word`] for what happens otherwise.
	/// An empty word list yields the uniform distribution.
	pub fn build<I, S>(order: Order, words: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut counts = NGramCounts::new(order);
		for word in words {
			counts.add_word(word.as_ref());
		}
		counts.finish()
	}

	pub(crate) fn from_probabilities(order: Order, probabilities: Vec<f64>) -> Self {
		Self { order, probabilities }
	}

	pub fn order(&self) -> Order {
		self.order
	}

	/// Number of keys in the table (`26^order`).
	pub fn key_count(&self) -> usize {
		self.probabilities.len()
	}

	/// Probability of `key`, or `None` if `key` is not `order` letters of `a..=z`.
	pub fn probability(&self, key: &str) -> Option<f64> {
		let index = index_of(key, self.order.width())?;
		self.probabilities.get(index).copied()
	}

	/// Iterates `(key, probability)` pairs in base-26 key order.
	pub fn iter(&self) -> impl Iterator<Item = (String, f64)> + '_ {
		let width = self.order.width();
		self.probabilities
			.iter()
			.enumerate()
			.map(move |(index, &p)| (key_at(index, width), p))
	}

	/// Sum of all probabilities. Should be 1.0.
	pub fn total_probability(&self) -> f64 {
		self.probabilities.iter().sum()
	}

	/// Checks the table shape after it was read back from an untrusted source.
	///
	/// # Errors
	/// Returns [`LangIdError::InvalidModel`] if the table does not cover the key
	/// space or holds a non-positive probability.
	pub fn validate(&self) -> LangIdResult<()> {
		if self.probabilities.len() != self.order.key_space() {
			return Err(LangIdError::InvalidModel(format!(
				"order {} table has {} keys, expected {}",
				self.order,
				self.probabilities.len(),
				self.order.key_space()
			)));
		}
		if let Some(p) = self.probabilities.iter().find(|&&p| p.is_nan() || p <= 0.0) {
			return Err(LangIdError::InvalidModel(format!(
				"order {} table holds a non-positive probability {}",
				self.order, p
			)));
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn unigram_from_repeated_word() {
		let model = NGramModel::build(Order::Unigram, ["aa", "aa", "aa"]);
		assert_eq!(model.key_count(), 26);
		assert_eq!(model.probability("a"), Some(6.5 / 19.0));
		for (key, p) in model.iter().skip(1) {
			assert_eq!(p, 0.5 / 19.0, "key {key}");
		}
	}

	#[test]
	fn empty_corpus_is_uniform() {
		for order in Order::ALL {
			let model = NGramModel::build(order, Vec::<String>::new());
			let uniform = 1.0 / order.key_space() as f64;
			assert!(model.iter().all(|(_, p)| (p - uniform).abs() < 1e-15));
		}
	}

	#[test]
	fn lookup_rejects_keys_outside_table() {
		let model = NGramModel::build(Order::Bigram, ["hello"]);
		assert!(model.probability("he").is_some());
		assert_eq!(model.probability("He"), None);
		assert_eq!(model.probability("h"), None);
		assert_eq!(model.probability("h "), None);
	}

	#[test]
	fn trigram_counts_stay_within_words() {
		let model = NGramModel::build(Order::Trigram, ["abc", "def"]);
		let total = 17_576.0 * ALPHA + 2.0;
		assert_eq!(model.probability("abc"), Some(1.5 / total));
		assert_eq!(model.probability("bcd"), Some(0.5 / total));
	}

	#[test]
	fn validate_detects_truncated_table() {
		let model = NGramModel::from_probabilities(Order::Unigram, vec![0.5, 0.5]);
		assert!(matches!(model.validate(), Err(LangIdError::InvalidModel(_))));
		assert!(NGramModel::build(Order::Unigram, ["abc"]).validate().is_ok());
	}
}
