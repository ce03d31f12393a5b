//! Query normalization ahead of scoring.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static LETTER_RUN: LazyLock<Regex> =
	LazyLock::new(|| Regex::new("[a-zA-Z]+").expect("letter-run pattern is valid"));

/// What happens to uppercase letters found in a query.
///
/// Models only hold lowercase keys.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CasePolicy {
	/// Letters are kept as typed; an uppercase letter fails the lookup
	/// with `ModelKeyMissing`.
	#[default]
	Strict,
	/// Letters are ASCII-lowercased before scoring.
	Lowercase,
}

/// Extracts every maximal run of ASCII letters and joins the runs with a
/// single space, keeping a trailing space after the last run.
///
/// `"Hello, world!"` becomes `"Hello world "` (or `"hello world "` under
/// [`CasePolicy::Lowercase`]). A query without letters becomes `""`.
pub fn normalize_query(raw: &str, policy: CasePolicy) -> String {
	let mut normalized = String::with_capacity(raw.len() + 1);
	for run in LETTER_RUN.find_iter(raw) {
		match policy {
			CasePolicy::Strict => normalized.push_str(run.as_str()),
			CasePolicy::Lowercase => normalized.push_str(&run.as_str().to_ascii_lowercase()),
		}
		normalized.push(' ');
	}
	normalized
}
