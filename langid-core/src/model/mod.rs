//! Top-level module for the language identification models.
//!
//! This module provides:
//! - Model orders (`Order`)
//! - Training counts with parallel merging (`NGramCounts`)
//! - Smoothed, exhaustive probability tables (`NGramModel`)
//! - Per-language bundles of the three orders (`LanguageModel`)
//! - The ranking interface (`Classifier`)

/// Ranks candidate languages for a query and reports every scoring step.
pub mod classifier;

/// Mutable observation counts used while building a model.
///
/// Supports merging partial counts built on different threads.
pub mod counts;

/// The three models of one language, with on-disk caching.
pub mod language_model;

/// Fixed-order probability table over every key of the alphabet.
pub mod ngram_model;

/// Model order (1, 2 or 3).
pub mod order;
