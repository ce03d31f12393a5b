use thiserror::Error;

use crate::model::order::Order;

/// Every failure the language identifier can report.
#[derive(Error, Debug)]
pub enum LangIdError {
	/// A query symbol reached the scorer without a matching key in a model.
	/// Only happens when the query holds a character outside `a..=z`.
	#[error("n-gram '{key}' is missing from the '{language}' model")]
	ModelKeyMissing { language: String, key: String },

	#[error("unsupported model order {0}, expected 1, 2 or 3")]
	InvalidOrder(usize),

	#[error("model order mismatch: expected {expected}, got {actual}")]
	OrderMismatch { expected: Order, actual: Order },

	#[error("invalid model: {0}")]
	InvalidModel(String),

	#[error("language '{0}' is already loaded")]
	DuplicateLanguage(String),

	#[error("language '{0}' is not loaded")]
	UnknownLanguage(String),

	#[error("no language models loaded")]
	NoLanguages,

	#[error("invalid path: {0}")]
	InvalidPath(String),

	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("model cache error: {0}")]
	Cache(#[from] postcard::Error),

	#[error("configuration error: {0}")]
	Config(#[from] serde_json::Error),
}

pub type LangIdResult<T> = Result<T, LangIdError>;
