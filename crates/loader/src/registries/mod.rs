//! Built-in registries.
//!
//! * [`vulkan`]: Vulkan 1.x with the surface, swapchain and debug utility
//!   extensions the renderer uses
//! * [`shaderc`]: the shaderc shader compiler, loaded on demand

pub mod shaderc;
pub mod vulkan;
