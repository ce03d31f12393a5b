use std::path::Path;

use log::{debug, info, trace};
use serde::Serialize;

use crate::config::LangIdConfig;
use crate::error::{LangIdError, LangIdResult};
use crate::io;
use crate::query::{normalize_query, CasePolicy};
use crate::trace::{QueryTrace, TraceSink, WriteMode};
use super::language_model::LanguageModel;
use super::ngram_model::NGramModel;
use super::order::Order;

/// Accumulated log10 probability of one language for a query.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct LanguageScore {
	pub language: String,
	pub log_probability: f64,
}

/// Outcome of one classification pass.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Classification {
	order: Order,
	ranking: Vec<LanguageScore>,
	scored: usize,
	#[serde(skip)]
	trace: QueryTrace,
}

impl Classification {
	pub fn order(&self) -> Order {
		self.order
	}

	/// Best scoring language. Ties go to the language loaded first.
	pub fn winner(&self) -> &LanguageScore {
		&self.ranking[0]
	}

	/// Every language, best first.
	pub fn ranking(&self) -> &[LanguageScore] {
		&self.ranking
	}

	/// Number of n-grams that contributed to the scores.
	pub fn scored(&self) -> usize {
		self.scored
	}

	/// True when nothing in the query could be scored at this order.
	///
	/// All totals are then 0 and the winner is only the tie-break; callers
	/// wanting a "cannot classify" outcome must check this.
	pub fn is_degenerate(&self) -> bool {
		self.scored == 0
	}

	pub fn trace(&self) -> &QueryTrace {
		&self.trace
	}
}

/// Ranks candidate languages for a query.
///
/// # Responsibilities
/// - Hold an ordered set of named languages (insertion order is the
///   tie-break order)
/// - Normalize queries and accumulate log10 probabilities per language
/// - Hand every pass's report to a [`TraceSink`]
#[derive(Debug, Default)]
pub struct Classifier {
	languages: Vec<LanguageModel>,
	case_policy: CasePolicy,
}

impl Classifier {
	/// Creates a classifier over already built languages.
	///
	/// # Errors
	/// Returns [`LangIdError::DuplicateLanguage`] if two languages share a name.
	pub fn new(languages: Vec<LanguageModel>) -> LangIdResult<Self> {
		let mut classifier = Self::default();
		for language in languages {
			classifier.add_language(language)?;
		}
		Ok(classifier)
	}

	/// Creates a classifier by loading every corpus file of a directory.
	///
	/// # Behavior
	/// - Lists the files with `extension` in the given directory, sorted by name.
	/// - Loads each one as a language named after its file stem.
	///
	/// # Errors
	/// - Returns an error if the path does not exist or is not a directory.
	/// - Returns an error if a corpus or cache fails to load.
	pub fn from_folder<P: AsRef<Path>>(folder: P, extension: &str, use_cache: bool) -> LangIdResult<Self> {
		let string_path = folder
			.as_ref()
			.to_str()
			.ok_or_else(|| LangIdError::InvalidPath(folder.as_ref().display().to_string()))?;
		// Normalize "folder" / "folder/"
		let folder = io::normalize_folder(string_path);

		if !folder.is_dir() {
			return Err(LangIdError::InvalidPath(format!("expected a directory, got: {}", folder.display())));
		}

		let mut classifier = Self::default();
		for file in io::list_files(&folder, extension)? {
			classifier.add_language(LanguageModel::new(folder.join(&file), use_cache)?)?;
		}
		info!("loaded {} language(s) from {}", classifier.languages.len(), folder.display());

		Ok(classifier)
	}

	/// Creates a classifier from the data folder and case policy of `config`.
	pub fn from_config(config: &LangIdConfig) -> LangIdResult<Self> {
		let mut classifier = Self::from_folder(&config.data_dir, &config.corpus_extension, config.use_cache)?;
		classifier.set_case_policy(config.case_policy);
		Ok(classifier)
	}

	/// Appends a language at the end of the enumeration order.
	///
	/// # Errors
	/// Returns [`LangIdError::DuplicateLanguage`] if the name is already loaded.
	pub fn add_language(&mut self, language: LanguageModel) -> LangIdResult<()> {
		if self.language(language.name()).is_some() {
			return Err(LangIdError::DuplicateLanguage(language.name().to_owned()));
		}
		debug!("adding language '{}'", language.name());
		self.languages.push(language);
		Ok(())
	}

	/// Removes a language and returns it.
	///
	/// # Errors
	/// Returns [`LangIdError::UnknownLanguage`] if the name is not loaded.
	pub fn remove_language(&mut self, name: &str) -> LangIdResult<LanguageModel> {
		let position = self
			.languages
			.iter()
			.position(|language| language.name() == name)
			.ok_or_else(|| LangIdError::UnknownLanguage(name.to_owned()))?;
		Ok(self.languages.remove(position))
	}

	pub fn language(&self, name: &str) -> Option<&LanguageModel> {
		self.languages.iter().find(|language| language.name() == name)
	}

	/// Returns the loaded language names in enumeration order.
	pub fn language_names(&self) -> Vec<String> {
		self.languages.iter().map(|language| language.name().to_owned()).collect()
	}

	pub fn case_policy(&self) -> CasePolicy {
		self.case_policy
	}

	pub fn set_case_policy(&mut self, case_policy: CasePolicy) {
		self.case_policy = case_policy;
	}

	/// Scores `query` at `order` without writing any report.
	///
	/// # Behavior
	/// - Normalizes the query (letter runs joined by single spaces).
	/// - Slides a window of the order's width over the whole normalized
	///   string; a window holding a space is discarded, it never joins
	///   letters of two words.
	/// - Adds `log10(P(window))` to every language and records the totals.
	/// - Sorts languages by total, best first; ties keep enumeration order.
	///
	/// # Errors
	/// - [`LangIdError::NoLanguages`] if nothing is loaded.
	/// - [`LangIdError::ModelKeyMissing`] if a window holds a symbol outside
	///   `a..=z` (an uppercase letter under [`CasePolicy::Strict`]).
	pub fn score(&self, order: Order, query: &str) -> LangIdResult<Classification> {
		if self.languages.is_empty() {
			return Err(LangIdError::NoLanguages);
		}

		let normalized = normalize_query(query, self.case_policy);
		let models: Vec<&NGramModel> = self.languages.iter().map(|language| language.model(order)).collect();
		let mut totals = vec![0.0f64; models.len()];
		let mut query_trace = QueryTrace::new(order, &normalized, self.language_names());
		let mut scored = 0;

		let chars: Vec<char> = normalized.chars().collect();
		for window in chars.windows(order.width()) {
			if window.contains(&' ') {
				continue;
			}

			let ngram: String = window.iter().collect();
			for ((total, model), language) in totals.iter_mut().zip(&models).zip(&self.languages) {
				let probability = model.probability(&ngram).ok_or_else(|| LangIdError::ModelKeyMissing {
					language: language.name().to_owned(),
					key: ngram.clone(),
				})?;
				*total += probability.log10();
			}

			trace!("order {} '{}': {:?}", order, ngram, totals);
			query_trace.record(&ngram, &totals);
			scored += 1;
		}

		let mut ranking: Vec<LanguageScore> = self
			.languages
			.iter()
			.zip(totals)
			.map(|(language, log_probability)| LanguageScore {
				language: language.name().to_owned(),
				log_probability,
			})
			.collect();
		// Stable: equal totals keep enumeration order
		ranking.sort_by(|a, b| b.log_probability.total_cmp(&a.log_probability));

		debug!(
			"order {} winner '{}' ({}) over {} n-gram(s)",
			order, ranking[0].language, ranking[0].log_probability, scored
		);

		Ok(Classification { order, ranking, scored, trace: query_trace })
	}

	/// Scores `query` at `order` and writes the report to `sink`.
	///
	/// The unigram report overwrites the sink; bigram and trigram reports are
	/// appended to it. On error nothing is written.
	pub fn classify<S: TraceSink + ?Sized>(
		&self,
		order: Order,
		query: &str,
		sink: &mut S,
	) -> LangIdResult<Classification> {
		let classification = self.score(order, query)?;
		let mode = match order {
			Order::Unigram => WriteMode::Overwrite,
			Order::Bigram | Order::Trigram => WriteMode::Append,
		};
		sink.write_report(mode, &classification.trace.render())?;
		Ok(classification)
	}

	/// Classifies `query` at orders 1, 2 and 3, in that order, against one sink.
	///
	/// The sink ends up holding the full report of this query only.
	pub fn classify_all<S: TraceSink + ?Sized>(
		&self,
		query: &str,
		sink: &mut S,
	) -> LangIdResult<Vec<Classification>> {
		Order::ALL
			.into_iter()
			.map(|order| self.classify(order, query, &mut *sink))
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::trace::MemorySink;

	fn language(name: &str, words: &[&str]) -> LanguageModel {
		LanguageModel::from_words(name, words).unwrap()
	}

	fn classifier() -> Classifier {
		Classifier::new(vec![language("first", &["aa", "aa", "aa"]), language("second", &["zz", "zz", "zz"])])
			.unwrap()
	}

	#[test]
	fn unigram_scores_every_letter() {
		let result = classifier().score(Order::Unigram, "aa aa").unwrap();
		assert_eq!(result.scored(), 4);
		assert_eq!(result.winner().language, "first");
		let expected = 4.0 * (6.5f64 / 19.0).log10();
		assert!((result.winner().log_probability - expected).abs() < 1e-12);
		assert!(result.ranking()[1].log_probability < result.winner().log_probability);
	}

	#[test]
	fn windows_holding_a_space_are_discarded() {
		let classifier = classifier();
		// "ab cd " -> ab, cd ("b " / " c" / "d " dropped)
		let bigram = classifier.score(Order::Bigram, "ab cd").unwrap();
		let grams: Vec<&str> = bigram.trace().steps().iter().map(|s| s.ngram.as_str()).collect();
		assert_eq!(grams, vec!["ab", "cd"]);

		// "abc de " -> abc only
		let trigram = classifier.score(Order::Trigram, "abc de").unwrap();
		assert_eq!(trigram.scored(), 1);
		assert_eq!(trigram.trace().steps()[0].ngram, "abc");
	}

	#[test]
	fn degenerate_query_ties_in_enumeration_order() {
		let classifier = classifier();
		let result = classifier.score(Order::Trigram, "a bb, 42").unwrap();
		assert!(result.is_degenerate());
		assert_eq!(result.winner().language, "first");
		assert!(result.ranking().iter().all(|score| score.log_probability == 0.0));
	}

	#[test]
	fn uppercase_fails_under_strict_policy() {
		let mut classifier = classifier();
		match classifier.score(Order::Unigram, "Aa") {
			Err(LangIdError::ModelKeyMissing { language, key }) => {
				assert_eq!(language, "first");
				assert_eq!(key, "A");
			}
			other => panic!("expected a missing key, got {other:?}"),
		}

		classifier.set_case_policy(CasePolicy::Lowercase);
		assert_eq!(classifier.score(Order::Unigram, "Aa").unwrap().winner().language, "first");
	}

	#[test]
	fn empty_classifier_is_an_error() {
		assert!(matches!(Classifier::default().score(Order::Unigram, "abc"), Err(LangIdError::NoLanguages)));
	}

	#[test]
	fn duplicate_and_unknown_languages() {
		let mut classifier = classifier();
		assert!(matches!(
			classifier.add_language(language("first", &["x"])),
			Err(LangIdError::DuplicateLanguage(name)) if name == "first"
		));
		assert!(matches!(classifier.remove_language("klingon"), Err(LangIdError::UnknownLanguage(_))));
		classifier.remove_language("first").unwrap();
		assert_eq!(classifier.language_names(), vec!["second"]);
	}

	#[test]
	fn unigram_overwrites_and_other_orders_append() {
		let classifier = classifier();
		let mut sink = MemorySink::new();
		sink.write_report(WriteMode::Append, "previous query\n").unwrap();

		let results = classifier.classify_all("aa", &mut sink).unwrap();
		assert_eq!(results.len(), 3);

		let report = sink.contents();
		assert!(report.starts_with("aa \n\nUNIGRAM MODEL:\n\n"));
		assert!(!report.contains("previous query"));
		let unigram = report.find("UNIGRAM MODEL:").unwrap();
		let bigram = report.find("BIGRAM MODEL:").unwrap();
		let trigram = report.find("TRIGRAM MODEL:").unwrap();
		assert!(unigram < bigram && bigram < trigram);
		assert!(report.contains("BIGRAM: aa\nFIRST: P(aa) = "));
	}

	#[test]
	fn failed_pass_writes_nothing() {
		let classifier = classifier();
		let mut sink = MemorySink::new();
		sink.write_report(WriteMode::Overwrite, "kept").unwrap();
		assert!(classifier.classify(Order::Unigram, "ABC", &mut sink).is_err());
		assert_eq!(sink.contents(), "kept");
	}
}
