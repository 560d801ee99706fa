//! Error types for library acquisition and entry point resolution.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::loader::DeviceId;
use crate::registry::Tier;

/// Errors returned by [`Loader`](crate::Loader) operations.
#[derive(Debug, Error)]
pub enum LoadError {
	/// A load was requested while a library is already loaded.
	#[error("graphics library is already loaded")]
	AlreadyLoaded,

	/// Instance entry points were requested before the module tier loaded.
	#[error("graphics library is not loaded")]
	NotLoaded,

	/// Device entry points were requested before the instance tier resolved.
	#[error("instance functions have not been loaded")]
	InstanceNotResolved,

	/// No library candidate could be opened.
	#[error(transparent)]
	Library(#[from] LibraryError),

	/// The host-bundled loader failed.
	#[error("{step} failed: {message}")]
	HostBundle {
		/// Host operation that failed.
		step: &'static str,
		/// Error text reported by the host.
		message: String,
	},

	/// The resolver needed for a tier is not declared or did not resolve.
	#[error("{tier} resolver {name} is unavailable")]
	MissingResolver {
		/// Tier the resolver was needed for.
		tier: Tier,
		/// Resolver entry point name, or `<undeclared>`.
		name: &'static str,
	},

	/// One or more required entry points are missing. Each one was logged.
	#[error("One or more required {tier} functions are missing ({count}). The log contains more information.")]
	MissingRequired {
		/// Tier that failed to resolve.
		tier: Tier,
		/// Number of missing required entry points.
		count: usize,
	},

	/// The device id does not refer to a resolved device.
	#[error("unknown device {0}")]
	UnknownDevice(DeviceId),

	/// The process-wide loader is borrowed elsewhere.
	#[error("loader is in use by another caller")]
	Busy,
}

/// Result type for loader operations.
pub type Result<T> = std::result::Result<T, LoadError>;

/// Every library candidate failed to open.
#[derive(Debug, Error)]
pub struct LibraryError {
	/// Each attempted candidate with the reason it failed.
	pub attempts: Vec<(PathBuf, String)>,
}

impl fmt::Display for LibraryError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.attempts.is_empty() {
			return f.write_str("failed to open library: no candidates to try");
		}
		f.write_str("failed to open library, tried ")?;
		for (i, (path, reason)) in self.attempts.iter().enumerate() {
			if i > 0 {
				f.write_str("; ")?;
			}
			write!(f, "{} ({reason})", path.display())?;
		}
		Ok(())
	}
}
