//! Dynamic library handle and candidate naming.
//!
//! [`LibraryBackend`] is the contract the module loader needs from an OS
//! library handle: open one of several candidate names, look up symbols,
//! close. [`NativeLibrary`] implements it on top of `libloading`.

use std::ffi::{CStr, OsString};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::LoaderConfig;
use crate::error::LibraryError;
use crate::resolver::VoidFunction;

/// Owner of at most one open dynamic library.
pub trait LibraryBackend: Send + Sync {
	/// Opens one library path, replacing any library already open.
	fn open_path(&mut self, path: &Path) -> Result<(), String>;

	/// Looks up an exported symbol. Returns `None` when absent or null.
	fn symbol(&self, name: &CStr) -> Option<VoidFunction>;

	/// Closes the library. No-op when nothing is open.
	fn close(&mut self);

	/// Returns true while a library is open.
	fn is_open(&self) -> bool;

	/// Tries each candidate in order and stops at the first that opens.
	///
	/// Returns the candidate that opened, or every attempt with its failure
	/// reason.
	fn open<'a>(&mut self, candidates: &'a [PathBuf]) -> Result<&'a Path, LibraryError> {
		let mut attempts = Vec::with_capacity(candidates.len());
		for candidate in candidates {
			match self.open_path(candidate) {
				Ok(()) => {
					debug!(library = %candidate.display(), "opened library");
					return Ok(candidate);
				}
				Err(reason) => {
					debug!(library = %candidate.display(), %reason, "library candidate failed");
					attempts.push((candidate.clone(), reason));
				}
			}
		}
		Err(LibraryError { attempts })
	}
}

/// Library handle backed by the OS dynamic linker.
#[derive(Debug, Default)]
pub struct NativeLibrary {
	library: Option<libloading::Library>,
	path: Option<PathBuf>,
}

impl NativeLibrary {
	/// Creates a closed handle.
	pub fn new() -> Self {
		Self::default()
	}

	/// Path of the open library.
	pub fn path(&self) -> Option<&Path> {
		self.path.as_deref()
	}
}

impl LibraryBackend for NativeLibrary {
	fn open_path(&mut self, path: &Path) -> Result<(), String> {
		self.close();
		// SAFETY: Loading a driver library runs its initializers; driver
		// libraries are trusted the same way the system linker trusts them.
		let library = unsafe { libloading::Library::new(path) }.map_err(|e| e.to_string())?;
		self.library = Some(library);
		self.path = Some(path.to_path_buf());
		Ok(())
	}

	fn symbol(&self, name: &CStr) -> Option<VoidFunction> {
		let library = self.library.as_ref()?;
		// SAFETY: entry points are only stored type-erased; callers reinterpret
		// them with the signature declared by the API.
		let symbol = unsafe { library.get::<Option<VoidFunction>>(name.to_bytes_with_nul()) }.ok()?;
		*symbol
	}

	fn close(&mut self) {
		let Some(library) = self.library.take() else {
			return;
		};
		let path = self.path.take();
		if let Err(e) = library.close() {
			warn!(library = ?path, error = %e, "failed to close library");
		}
	}

	fn is_open(&self) -> bool {
		self.library.is_some()
	}
}

/// Naming rules for one driver library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LibrarySpec {
	/// Base name without platform prefix or suffix (`vulkan`).
	pub stem: &'static str,
	/// ABI version appended to the versioned candidate.
	pub version: Option<u32>,
	/// Environment variable naming an explicit library path.
	pub override_env: Option<&'static str>,
}

impl LibrarySpec {
	/// Describes an unversioned library without an environment override.
	pub const fn new(stem: &'static str) -> Self {
		Self {
			stem,
			version: None,
			override_env: None,
		}
	}

	/// Adds an ABI version, tried before the unversioned name.
	pub const fn with_version(mut self, version: u32) -> Self {
		self.version = Some(version);
		self
	}

	/// Adds an environment variable tried before the standard names.
	pub const fn with_override_env(mut self, var: &'static str) -> Self {
		self.override_env = Some(var);
		self
	}

	/// Builds the ordered candidate list for a direct load.
	pub fn candidates(&self, config: &LoaderConfig) -> Vec<PathBuf> {
		let mut candidates = Vec::new();

		if let Some(path) = &config.library_path {
			candidates.push(path.clone());
		}

		if config.use_env_override
			&& let Some(var) = self.override_env
			&& let Some(path) = std::env::var_os(var).filter(|value| !value.is_empty())
		{
			candidates.push(PathBuf::from(path));
		}

		if config.search_standard_paths {
			if let Some(version) = self.version {
				candidates.push(versioned_filename(self.stem, Some(version)).into());
			}
			candidates.push(versioned_filename(self.stem, None).into());
		}

		candidates
	}
}

/// Returns the platform file name of a library, optionally ABI-versioned.
pub fn versioned_filename(stem: &str, version: Option<u32>) -> OsString {
	let Some(version) = version else {
		return libloading::library_filename(stem);
	};
	if cfg!(target_os = "windows") {
		format!("{stem}-{version}.dll").into()
	} else if cfg!(target_vendor = "apple") {
		format!("lib{stem}.{version}.dylib").into()
	} else {
		format!("lib{stem}.so.{version}").into()
	}
}
