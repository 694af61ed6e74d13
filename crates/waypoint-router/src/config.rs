//! Router configuration.
//!
//! Loaded from TOML; every field has a default, so an empty document yields
//! hash history with an empty base and the default redirect limit.
//!
//! ```toml
//! [history]
//! mode = "hash"
//! base = ""
//!
//! [navigation]
//! max_redirects = 8
//! ```

use crate::core::DEFAULT_MAX_REDIRECTS;
use crate::history::HistoryMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main router configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
	/// History strategy configuration
	pub history: HistoryConfig,

	/// Navigation behaviour
	pub navigation: NavigationConfig,
}

/// History strategy configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
	/// Which history strategy to use
	pub mode: HistoryMode,

	/// Prefix of every generated URL
	pub base: String,
}

/// Navigation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
	/// Maximum number of chained redirects followed by one navigation
	pub max_redirects: usize,
}

impl Default for NavigationConfig {
	fn default() -> Self {
		Self {
			max_redirects: DEFAULT_MAX_REDIRECTS,
		}
	}
}

impl RouterConfig {
	/// Sets the history mode.
	pub fn with_mode(mut self, mode: HistoryMode) -> Self {
		self.history.mode = mode;
		self
	}

	/// Sets the URL base.
	pub fn with_base(mut self, base: impl Into<String>) -> Self {
		self.history.base = base.into();
		self
	}

	/// Load configuration from a TOML file.
	///
	/// # Errors
	///
	/// Returns [`ConfigError::IoError`] if the file cannot be read and
	/// [`ConfigError::ParseError`] if it is not a valid configuration.
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::IoError {
			path: path.as_ref().to_path_buf(),
			source: e,
		})?;

		Self::from_toml(&content)
	}

	/// Parse configuration from a TOML string.
	pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
		toml::from_str(content).map_err(|e| ConfigError::ParseError {
			message: e.to_string(),
		})
	}
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("IO error reading {path}: {source}")]
	IoError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse configuration: {message}")]
	ParseError { message: String },
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::io::Write;

	#[rstest]
	fn test_default_config() {
		let config = RouterConfig::default();
		assert_eq!(config.history.mode, HistoryMode::Hash);
		assert_eq!(config.history.base, "");
		assert_eq!(config.navigation.max_redirects, 8);
	}

	#[rstest]
	fn test_empty_toml_is_default() {
		assert_eq!(RouterConfig::from_toml("").unwrap(), RouterConfig::default());
	}

	#[rstest]
	fn test_parse_toml_config() {
		let config = RouterConfig::from_toml(
			r#"
[history]
mode = "web"
base = "/app"

[navigation]
max_redirects = 3
"#,
		)
		.unwrap();

		assert_eq!(config.history.mode, HistoryMode::Web);
		assert_eq!(config.history.base, "/app");
		assert_eq!(config.navigation.max_redirects, 3);
	}

	#[rstest]
	#[case("[history]\nmode = \"hashbang\"")]
	#[case("[navigation]\nmax_redirects = -1")]
	#[case("history = 3")]
	fn test_invalid_toml(#[case] content: &str) {
		let err = RouterConfig::from_toml(content).unwrap_err();
		assert!(matches!(err, ConfigError::ParseError { .. }));
	}

	#[rstest]
	fn test_from_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "[history]\nmode = \"memory\"").unwrap();

		let config = RouterConfig::from_file(file.path()).unwrap();

		assert_eq!(config.history.mode, HistoryMode::Memory);
		assert_eq!(config.navigation.max_redirects, 8);
	}

	#[rstest]
	fn test_missing_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("router.toml");
		let err = RouterConfig::from_file(&path).unwrap_err();
		assert!(matches!(err, ConfigError::IoError { path: p, .. } if p == path));
	}

	#[rstest]
	fn test_builder() {
		let config = RouterConfig::default()
			.with_mode(HistoryMode::Web)
			.with_base("/app");
		assert_eq!(config.history.mode, HistoryMode::Web);
		assert_eq!(config.history.base, "/app");
	}
}
