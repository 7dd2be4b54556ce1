//! Engine configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::addon::Addon;
use crate::error::{EngineError, Result};

/// Settings for building an [`crate::Engine`].
///
/// ```toml
/// core_addon = "Core"
/// data_file_directory = "plugins/quill"
/// language_file_directory = "lang"
/// collect_submitted_addons = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
	/// Name the engine registers itself under.
	pub core_addon: String,
	/// Data directory hint for the engine's own addon.
	pub data_file_directory: Option<PathBuf>,
	/// Language directory hint for the engine's own addon.
	pub language_file_directory: Option<PathBuf>,
	/// Also load addons submitted through `inventory`.
	pub collect_submitted_addons: bool,
}

impl Default for EngineConfig {
	fn default() -> Self {
		Self {
			core_addon: "Core".to_string(),
			data_file_directory: None,
			language_file_directory: Some(PathBuf::from("lang")),
			collect_submitted_addons: true,
		}
	}
}

impl EngineConfig {
	pub fn from_toml_str(input: &str) -> Result<Self> {
		Ok(toml::from_str(input)?)
	}

	/// Load configuration from a file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|error| EngineError::ConfigIo {
			path: path.to_path_buf(),
			error,
		})?;
		Self::from_toml_str(&content)
	}

	/// The engine's own addon as described by this configuration.
	pub fn core_addon(&self) -> Addon {
		let mut addon = Addon::new(self.core_addon.as_str());
		if let Some(dir) = &self.data_file_directory {
			addon = addon.with_data_file_directory(dir);
		}
		if let Some(dir) = &self.language_file_directory {
			addon = addon.with_language_file_directory(dir);
		}
		addon
	}
}

#[cfg(test)]
mod tests {
	use std::io::Write;

	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn empty_input_yields_defaults() {
		assert_eq!(EngineConfig::from_toml_str("").unwrap(), EngineConfig::default());
	}

	#[test]
	fn fields_override_defaults() {
		let config = EngineConfig::from_toml_str(
			r#"
core_addon = "Quill"
data_file_directory = "data"
collect_submitted_addons = false
"#,
		)
		.unwrap();
		assert_eq!(config.core_addon, "Quill");
		assert_eq!(config.data_file_directory, Some(PathBuf::from("data")));
		assert_eq!(config.language_file_directory, Some(PathBuf::from("lang")));
		assert!(!config.collect_submitted_addons);

		let addon = config.core_addon();
		assert_eq!(addon.name(), "Quill");
		assert_eq!(addon.data_file_directory(), Some(Path::new("data")));
	}

	#[test]
	fn unknown_fields_are_rejected() {
		let err = EngineConfig::from_toml_str("core = 1").unwrap_err();
		assert!(matches!(err, EngineError::Config(_)));
	}

	#[test]
	fn load_reads_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "core_addon = \"FromFile\"").unwrap();
		let config = EngineConfig::load(file.path()).unwrap();
		assert_eq!(config.core_addon, "FromFile");
	}

	#[test]
	fn load_reports_missing_file() {
		let dir = tempfile::tempdir().unwrap();
		let missing = dir.path().join("absent.toml");
		let err = EngineConfig::load(&missing).unwrap_err();
		assert!(matches!(err, EngineError::ConfigIo { path, .. } if path == missing));
	}
}
