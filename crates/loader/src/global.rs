//! Process-wide loaders.
//!
//! Initialization happens on one thread before any other thread dispatches
//! through the tables. Writers never wait: [`GlobalLoader::write`] fails with
//! [`LoadError::Busy`] when any other guard is alive, which turns a violated
//! initialization order into an error instead of a stall. Readers share the
//! tables freely once loading finished.

use std::sync::LazyLock;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::error;

use crate::error::{LoadError, Result};
use crate::loader::Loader;
use crate::registries::{shaderc, vulkan};

/// Lazily created, lock-protected [`Loader`].
pub struct GlobalLoader {
	cell: LazyLock<RwLock<Loader>>,
}

impl GlobalLoader {
	const fn new(init: fn() -> RwLock<Loader>) -> Self {
		Self { cell: LazyLock::new(init) }
	}

	/// Shared access for dispatch.
	pub fn read(&self) -> RwLockReadGuard<'_, Loader> {
		self.cell.read()
	}

	/// Exclusive access for loading and unloading.
	pub fn write(&self) -> Result<RwLockWriteGuard<'_, Loader>> {
		self.cell.try_write().ok_or_else(|| {
			error!("global loader is borrowed while being initialized or torn down");
			LoadError::Busy
		})
	}

	/// Returns true once the module tier is loaded.
	///
	/// Never waits: while a writer holds the loader this reports false.
	pub fn is_loaded(&self) -> bool {
		self.cell.try_read().is_some_and(|loader| loader.is_loaded())
	}
}

/// Process-wide Vulkan loader.
pub static VULKAN: GlobalLoader = GlobalLoader::new(|| RwLock::new(Loader::new(&vulkan::REGISTRY, vulkan::LIBRARY)));

/// Process-wide shaderc loader.
pub static SHADERC: GlobalLoader = GlobalLoader::new(|| RwLock::new(Loader::new(&shaderc::REGISTRY, shaderc::LIBRARY)));
