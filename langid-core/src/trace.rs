//! Query traces and the sinks that receive their human-readable report.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::LangIdResult;
use crate::model::order::Order;

/// How a report is written to its sink.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteMode {
	/// Replace whatever the sink held (starts a fresh report).
	Overwrite,
	/// Add after the current content.
	Append,
}

/// Destination of query reports.
///
/// One query produces three reports (unigram, bigram, trigram); the first
/// one is written with [`WriteMode::Overwrite`] and the other two with
/// [`WriteMode::Append`], so a sink ends up holding the whole query.
pub trait TraceSink {
	fn write_report(&mut self, mode: WriteMode, report: &str) -> LangIdResult<()>;
}

impl<T: TraceSink + ?Sized> TraceSink for &mut T {
	fn write_report(&mut self, mode: WriteMode, report: &str) -> LangIdResult<()> {
		(**self).write_report(mode, report)
	}
}

/// Writes reports to a file, creating parent directories as needed.
#[derive(Clone, Debug)]
pub struct FileSink {
	path: PathBuf,
}

impl FileSink {
	pub fn new<P: AsRef<Path>>(path: P) -> Self {
		Self { path: path.as_ref().to_path_buf() }
	}

	pub fn path(&self) -> &Path {
		&self.path
	}
}

impl TraceSink for FileSink {
	fn write_report(&mut self, mode: WriteMode, report: &str) -> LangIdResult<()> {
		if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent)?;
		}

		let mut options = OpenOptions::new();
		options.create(true);
		match mode {
			WriteMode::Overwrite => options.write(true).truncate(true),
			WriteMode::Append => options.append(true),
		};

		let mut file = options.open(&self.path)?;
		file.write_all(report.as_bytes())?;
		Ok(())
	}
}

/// Keeps reports in memory.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
	contents: String,
}

impl MemorySink {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn contents(&self) -> &str {
		&self.contents
	}

	pub fn into_contents(self) -> String {
		self.contents
	}
}

impl TraceSink for MemorySink {
	fn write_report(&mut self, mode: WriteMode, report: &str) -> LangIdResult<()> {
		if mode == WriteMode::Overwrite {
			self.contents.clear();
		}
		self.contents.push_str(report);
		Ok(())
	}
}

/// Discards every report.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl TraceSink for NullSink {
	fn write_report(&mut self, _mode: WriteMode, _report: &str) -> LangIdResult<()> {
		Ok(())
	}
}

/// One scored n-gram and every language's running total right after it.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct TraceStep {
	pub ngram: String,
	/// Cumulative log10 probabilities, in language enumeration order.
	pub totals: Vec<f64>,
}

/// Append-only record of a classification pass.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct QueryTrace {
	order: Order,
	query: String,
	languages: Vec<String>,
	steps: Vec<TraceStep>,
}

impl QueryTrace {
	pub(crate) fn new(order: Order, query: &str, languages: Vec<String>) -> Self {
		Self { order, query: query.to_owned(), languages, steps: Vec::new() }
	}

	pub(crate) fn record(&mut self, ngram: &str, totals: &[f64]) {
		self.steps.push(TraceStep { ngram: ngram.to_owned(), totals: totals.to_vec() });
	}

	pub fn order(&self) -> Order {
		self.order
	}

	/// The normalized query the pass was run on.
	pub fn query(&self) -> &str {
		&self.query
	}

	pub fn languages(&self) -> &[String] {
		&self.languages
	}

	pub fn steps(&self) -> &[TraceStep] {
		&self.steps
	}

	/// Renders the human-readable report.
	///
	/// ```text
	/// <query>
	///
	/// BIGRAM MODEL:
	///
	/// BIGRAM: th
	/// ENGLISH: P(th) = -1.52
	/// FRENCH: P(th) = -2.61
	///
	/// ```
	pub fn render(&self) -> String {
		let label = self.order.label();
		let mut report = format!("{}\n\n{} MODEL:\n\n", self.query, label);

		for step in &self.steps {
			report.push_str(&format!("{}: {}\n", label, step.ngram));
			// One line per language, in enumeration order. `f64` Display never
			// switches to exponent notation: -4.3e-5 prints as -0.000043.
			for (language, total) in self.languages.iter().zip(&step.totals) {
				report.push_str(&format!(
					"{}: P({}) = {}\n",
					language.to_uppercase(),
					step.ngram,
					total
				));
			}
			report.push('\n');
		}

		report
	}
}
