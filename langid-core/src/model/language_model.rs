use std::path::Path;
use std::sync::mpsc;
use std::thread;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{LangIdError, LangIdResult};
use crate::io::{build_output_path, get_filename, read_words};
use super::counts::NGramCounts;
use super::ngram_model::NGramModel;
use super::order::Order;

/// The three n-gram models (orders 1, 2 and 3) of one language.
///
/// A `LanguageModel` is built once from a training corpus and is immutable
/// afterwards. It can be cached on disk in a compact binary form
/// (`postcard`), next to the corpus file it was built from.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LanguageModel {
	name: String,
	unigram: NGramModel,
	bigram: NGramModel,
	trigram: NGramModel,
}

impl LanguageModel {
	/// Loads a language from a corpus file.
	///
	/// - The language name is the file name without extension.
	/// - With `use_cache`, a `<stem>.bin` file next to the corpus is loaded
	///   when it exists, and written after building when it does not.
	/// - Otherwise the corpus is read with [`read_words`] and all three
	///   orders are built in parallel.
	pub fn new<P: AsRef<Path>>(filepath: P, use_cache: bool) -> LangIdResult<Self> {
		let name = get_filename(&filepath)?;
		let binary_data_path = build_output_path(&filepath, "bin")?;

		if use_cache && binary_data_path.exists() {
			let mut model = Self::load(&binary_data_path)?;
			info!("loaded '{}' from cache {}", name, binary_data_path.display());
			model.name = name;
			return Ok(model);
		}

		let words = read_words(&filepath)?;
		info!("building '{}' from {} training words", name, words.len());
		let model = Self::from_words(&name, &words)?;

		if use_cache {
			model.save(&binary_data_path)?;
			debug!("cached '{}' to {}", name, binary_data_path.display());
		}

		Ok(model)
	}

	/// Builds all three orders from an in-memory word list.
	///
	/// # Behavior
	/// - Splits the words into chunks (based on CPU cores * factor).
	/// - Spawns one thread per chunk to count every order.
	/// - Merges the partial counts and normalizes them.
	///
	/// The result is identical to building each order sequentially with
	/// [`NGramModel::build`].
	pub fn from_words<S>(name: &str, words: &[S]) -> LangIdResult<Self>
	where
		S: AsRef<str> + Sync,
	{
		let cpus = num_cpus::get();
		let factor = 8;
		let chunks = cpus * factor;
		let chunk_size = words.len().div_ceil(chunks).max(1);

		let mut totals = Order::ALL.map(NGramCounts::new);

		thread::scope(|scope| -> LangIdResult<()> {
			let (tx, rx) = mpsc::channel();
			for chunk in words.chunks(chunk_size) {
				let tx = tx.clone();
				scope.spawn(move || {
					let mut partial = Order::ALL.map(NGramCounts::new);
					for word in chunk {
						for counts in partial.iter_mut() {
							counts.add_word(word.as_ref());
						}
					}
					// The receiver outlives every worker
					let _ = tx.send(partial);
				});
			}
			drop(tx);

			for partial in rx.iter() {
				for (total, counts) in totals.iter_mut().zip(&partial) {
					total.merge(counts)?;
				}
			}
			Ok(())
		})?;

		let [unigram, bigram, trigram] = totals.map(NGramCounts::finish);
		Ok(Self { name: name.to_owned(), unigram, bigram, trigram })
	}

	/// Assembles a language from already built models.
	///
	/// # Errors
	/// Returns [`LangIdError::OrderMismatch`] if a model is not of the order
	/// its position expects.
	pub fn from_models(
		name: &str,
		unigram: NGramModel,
		bigram: NGramModel,
		trigram: NGramModel,
	) -> LangIdResult<Self> {
		for (expected, model) in Order::ALL.into_iter().zip([&unigram, &bigram, &trigram]) {
			if model.order() != expected {
				return Err(LangIdError::OrderMismatch { expected, actual: model.order() });
			}
		}
		Ok(Self { name: name.to_owned(), unigram, bigram, trigram })
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// Returns the model of the requested order.
	pub fn model(&self, order: Order) -> &NGramModel {
		match order {
			Order::Unigram => &self.unigram,
			Order::Bigram => &self.bigram,
			Order::Trigram => &self.trigram,
		}
	}

	/// Serializes the language to `path` with `postcard`.
	pub fn save<P: AsRef<Path>>(&self, path: P) -> LangIdResult<()> {
		let bytes = postcard::to_stdvec(self)?;
		std::fs::write(path, bytes)?;
		Ok(())
	}

	/// Reads a language previously written by [`LanguageModel::save`].
	///
	/// # Errors
	/// Fails on IO or decoding errors, and with [`LangIdError::InvalidModel`]
	/// if a decoded table does not have the expected shape.
	pub fn load<P: AsRef<Path>>(path: P) -> LangIdResult<Self> {
		let bytes = std::fs::read(path)?;
		let model: Self = postcard::from_bytes(&bytes)?;
		for order in Order::ALL {
			let table = model.model(order);
			if table.order() != order {
				return Err(LangIdError::OrderMismatch { expected: order, actual: table.order() });
			}
			table.validate()?;
		}
		Ok(model)
	}
}
