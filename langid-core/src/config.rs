use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::LangIdResult;
use crate::query::CasePolicy;

/// Runtime settings of the language identifier.
///
/// Every field has a default, so a JSON file only needs the keys it
/// overrides:
///
/// ```json
/// { "data_dir": "corpora", "case_policy": "lowercase" }
/// ```
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct LangIdConfig {
	/// Folder holding one corpus file per language.
	pub data_dir: PathBuf,

	/// Extension of corpus files inside `data_dir`.
	pub corpus_extension: String,

	/// Folder receiving query reports.
	pub output_dir: PathBuf,

	pub case_policy: CasePolicy,

	/// Load and write `<language>.bin` model caches next to the corpora.
	pub use_cache: bool,
}

impl Default for LangIdConfig {
	fn default() -> Self {
		Self {
			data_dir: PathBuf::from("./data"),
			corpus_extension: "dat".to_owned(),
			output_dir: PathBuf::from("./query_output"),
			case_policy: CasePolicy::Strict,
			use_cache: true,
		}
	}
}

impl LangIdConfig {
	/// Reads a JSON configuration file.
	pub fn load<P: AsRef<Path>>(path: P) -> LangIdResult<Self> {
		let content = fs::read_to_string(path)?;
		Ok(serde_json::from_str(&content)?)
	}

	/// Report file of the `index`-th query (1-based): `<output_dir>/out<index>.txt`.
	pub fn report_path(&self, index: usize) -> PathBuf {
		self.output_dir.join(format!("out{index}.txt"))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn partial_file_keeps_defaults() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("langid.json");
		fs::write(&path, r#"{ "data_dir": "corpora", "case_policy": "lowercase" }"#).unwrap();

		let config = LangIdConfig::load(&path).unwrap();
		assert_eq!(config.data_dir, PathBuf::from("corpora"));
		assert_eq!(config.case_policy, CasePolicy::Lowercase);
		assert_eq!(config.corpus_extension, "dat");
		assert!(config.use_cache);
	}

	#[test]
	fn malformed_file_is_a_config_error() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("langid.json");
		fs::write(&path, "{ data_dir: ").unwrap();
		assert!(matches!(LangIdConfig::load(&path), Err(crate::error::LangIdError::Config(_))));
	}

	#[test]
	fn report_paths_are_numbered() {
		let config = LangIdConfig::default();
		assert_eq!(config.report_path(3), PathBuf::from("./query_output/out3.txt"));
	}
}
