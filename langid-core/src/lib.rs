//! Character n-gram language identification library.
//!
//! This crate provides:
//! - Additive-smoothed unigram, bigram and trigram models over `a..=z`
//! - Parallel model construction from word lists, with a binary cache
//! - Log-probability classification of queries against any number of
//!   languages
//! - Step-by-step query reports written to pluggable sinks

/// Symbol set and base-26 key arithmetic.
pub mod alphabet;

/// Runtime settings (JSON).
pub mod config;

/// Error type shared by the whole crate.
pub mod error;

/// I/O utilities (corpus loading, path helpers).
pub mod io;

/// Core n-gram models and classification logic.
pub mod model;

/// Query normalization and case handling.
pub mod query;

/// Query traces, their report format and sinks.
pub mod trace;

pub use config::LangIdConfig;
pub use error::{LangIdError, LangIdResult};
pub use model::classifier::{Classification, Classifier, LanguageScore};
pub use model::language_model::LanguageModel;
pub use model::ngram_model::{NGramModel, ALPHA};
pub use model::order::Order;
pub use query::CasePolicy;
pub use trace::{FileSink, MemorySink, NullSink, QueryTrace, TraceSink, WriteMode};
