//! Host-bundled loading.
//!
//! Windowing libraries such as SDL can load the graphics driver themselves and
//! hand out its root resolver (`SDL_Vulkan_LoadLibrary` and
//! `SDL_Vulkan_GetVkGetInstanceProcAddr`). The host keeps ownership of the
//! library it opened; the loader only borrows the resolver.

use crate::resolver::RootResolverFn;

/// A host library that loads its own copy of the driver.
pub trait HostBundle: Send + Sync {
	/// Loads the driver library. The error carries the host's message.
	fn load_library(&mut self) -> Result<(), String>;

	/// Returns the module-level root resolver of the loaded library.
	fn root_resolver(&self) -> Result<RootResolverFn, String>;

	/// Releases the library loaded by [`load_library`](Self::load_library).
	fn unload_library(&mut self);
}
