//! Library search configuration.

use std::path::PathBuf;

use serde::Deserialize;

/// Controls which library candidates a direct load tries.
///
/// Candidates are tried in this order: [`library_path`](Self::library_path),
/// the library's environment override (when enabled and set), then the
/// versioned and unversioned platform names (when standard search is enabled).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoaderConfig {
	/// Explicit library path tried before anything else.
	pub library_path: Option<PathBuf>,
	/// Honor the library's environment override variable.
	pub use_env_override: bool,
	/// Try the platform's standard library names.
	pub search_standard_paths: bool,
}

impl Default for LoaderConfig {
	fn default() -> Self {
		Self {
			library_path: None,
			use_env_override: true,
			search_standard_paths: true,
		}
	}
}

impl LoaderConfig {
	/// Sets the explicit library path.
	pub fn with_library_path(mut self, path: impl Into<PathBuf>) -> Self {
		self.library_path = Some(path.into());
		self
	}

	/// Enables or disables the environment override.
	pub fn with_env_override(mut self, enabled: bool) -> Self {
		self.use_env_override = enabled;
		self
	}

	/// Enables or disables the platform's standard names.
	pub fn with_standard_paths(mut self, enabled: bool) -> Self {
		self.search_standard_paths = enabled;
		self
	}
}
