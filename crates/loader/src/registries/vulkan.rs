//! Vulkan entry points.
//!
//! Module-tier functions are exported by the loader library, instance-tier
//! functions come from `vkGetInstanceProcAddr` and device-tier functions from
//! `vkGetDeviceProcAddr`, which skips the loader's dispatch trampoline.

use crate::entry_points;
use crate::library::LibrarySpec;
use crate::registry::Registry;

/// Root resolver entry point.
pub const GET_INSTANCE_PROC_ADDR: &str = "vkGetInstanceProcAddr";

/// Device resolver entry point.
pub const GET_DEVICE_PROC_ADDR: &str = "vkGetDeviceProcAddr";

/// Environment variable naming an explicit MoltenVK/Vulkan library.
#[cfg(target_vendor = "apple")]
pub const LIBRARY_PATH_ENV: &str = "LIBVULKAN_PATH";

/// Vulkan library naming: MoltenVK, overridable through `LIBVULKAN_PATH`.
#[cfg(target_vendor = "apple")]
pub const LIBRARY: LibrarySpec = LibrarySpec::new("MoltenVK").with_override_env(LIBRARY_PATH_ENV);

/// Vulkan library naming: `libvulkan.so.1` / `vulkan-1.dll`, then unversioned.
#[cfg(not(target_vendor = "apple"))]
pub const LIBRARY: LibrarySpec = LibrarySpec::new("vulkan").with_version(1);

/// Vulkan entry points.
pub static REGISTRY: Registry = Registry::new(
	"vulkan",
	entry_points! {
		Module::vkCreateInstance => required,
		Module::vkGetInstanceProcAddr => required,
		Module::vkEnumerateInstanceExtensionProperties => required,
		Module::vkEnumerateInstanceLayerProperties => required,
		Module::vkEnumerateInstanceVersion => optional,

		Instance::vkGetDeviceProcAddr => required,
		Instance::vkDestroyInstance => required,
		Instance::vkEnumeratePhysicalDevices => required,
		Instance::vkGetPhysicalDeviceFeatures => required,
		Instance::vkGetPhysicalDeviceFormatProperties => required,
		Instance::vkGetPhysicalDeviceImageFormatProperties => required,
		Instance::vkGetPhysicalDeviceProperties => required,
		Instance::vkGetPhysicalDeviceQueueFamilyProperties => required,
		Instance::vkGetPhysicalDeviceMemoryProperties => required,
		Instance::vkCreateDevice => required,
		Instance::vkEnumerateDeviceExtensionProperties => required,
		Instance::vkEnumerateDeviceLayerProperties => required,
		Instance::vkGetPhysicalDeviceSparseImageFormatProperties => required,
		Instance::vkGetPhysicalDeviceFeatures2 => optional,
		Instance::vkGetPhysicalDeviceProperties2 => optional,
		Instance::vkGetPhysicalDeviceMemoryProperties2 => optional,
		Instance::vkDestroySurfaceKHR => optional,
		Instance::vkGetPhysicalDeviceSurfaceSupportKHR => optional,
		Instance::vkGetPhysicalDeviceSurfaceCapabilitiesKHR => optional,
		Instance::vkGetPhysicalDeviceSurfaceFormatsKHR => optional,
		Instance::vkGetPhysicalDeviceSurfacePresentModesKHR => optional,
		Instance::vkCreateWin32SurfaceKHR => optional,
		Instance::vkCreateXlibSurfaceKHR => optional,
		Instance::vkCreateWaylandSurfaceKHR => optional,
		Instance::vkCreateMetalSurfaceEXT => optional,
		Instance::vkCreateAndroidSurfaceKHR => optional,
		Instance::vkCreateHeadlessSurfaceEXT => optional,
		Instance::vkCreateDebugUtilsMessengerEXT => optional,
		Instance::vkDestroyDebugUtilsMessengerEXT => optional,
		Instance::vkSubmitDebugUtilsMessageEXT => optional,

		Device::vkDestroyDevice => required,
		Device::vkGetDeviceQueue => required,
		Device::vkQueueSubmit => required,
		Device::vkQueueWaitIdle => required,
		Device::vkDeviceWaitIdle => required,
		Device::vkAllocateMemory => required,
		Device::vkFreeMemory => required,
		Device::vkMapMemory => required,
		Device::vkUnmapMemory => required,
		Device::vkFlushMappedMemoryRanges => required,
		Device::vkInvalidateMappedMemoryRanges => required,
		Device::vkBindBufferMemory => required,
		Device::vkBindImageMemory => required,
		Device::vkGetBufferMemoryRequirements => required,
		Device::vkGetImageMemoryRequirements => required,
		Device::vkCreateFence => required,
		Device::vkDestroyFence => required,
		Device::vkResetFences => required,
		Device::vkGetFenceStatus => required,
		Device::vkWaitForFences => required,
		Device::vkCreateSemaphore => required,
		Device::vkDestroySemaphore => required,
		Device::vkCreateQueryPool => required,
		Device::vkDestroyQueryPool => required,
		Device::vkGetQueryPoolResults => required,
		Device::vkCreateBuffer => required,
		Device::vkDestroyBuffer => required,
		Device::vkCreateBufferView => required,
		Device::vkDestroyBufferView => required,
		Device::vkCreateImage => required,
		Device::vkDestroyImage => required,
		Device::vkGetImageSubresourceLayout => required,
		Device::vkCreateImageView => required,
		Device::vkDestroyImageView => required,
		Device::vkCreateShaderModule => required,
		Device::vkDestroyShaderModule => required,
		Device::vkCreatePipelineCache => required,
		Device::vkDestroyPipelineCache => required,
		Device::vkGetPipelineCacheData => required,
		Device::vkCreateGraphicsPipelines => required,
		Device::vkCreateComputePipelines => required,
		Device::vkDestroyPipeline => required,
		Device::vkCreatePipelineLayout => required,
		Device::vkDestroyPipelineLayout => required,
		Device::vkCreateSampler => required,
		Device::vkDestroySampler => required,
		Device::vkCreateDescriptorSetLayout => required,
		Device::vkDestroyDescriptorSetLayout => required,
		Device::vkCreateDescriptorPool => required,
		Device::vkDestroyDescriptorPool => required,
		Device::vkResetDescriptorPool => required,
		Device::vkAllocateDescriptorSets => required,
		Device::vkFreeDescriptorSets => required,
		Device::vkUpdateDescriptorSets => required,
		Device::vkCreateFramebuffer => required,
		Device::vkDestroyFramebuffer => required,
		Device::vkCreateRenderPass => required,
		Device::vkDestroyRenderPass => required,
		Device::vkCreateCommandPool => required,
		Device::vkDestroyCommandPool => required,
		Device::vkResetCommandPool => required,
		Device::vkAllocateCommandBuffers => required,
		Device::vkFreeCommandBuffers => required,
		Device::vkBeginCommandBuffer => required,
		Device::vkEndCommandBuffer => required,
		Device::vkResetCommandBuffer => required,
		Device::vkCmdBindPipeline => required,
		Device::vkCmdSetViewport => required,
		Device::vkCmdSetScissor => required,
		Device::vkCmdPushConstants => required,
		Device::vkCmdBindDescriptorSets => required,
		Device::vkCmdBindIndexBuffer => required,
		Device::vkCmdBindVertexBuffers => required,
		Device::vkCmdDraw => required,
		Device::vkCmdDrawIndexed => required,
		Device::vkCmdDispatch => required,
		Device::vkCmdCopyBuffer => required,
		Device::vkCmdCopyImage => required,
		Device::vkCmdBlitImage => required,
		Device::vkCmdCopyBufferToImage => required,
		Device::vkCmdCopyImageToBuffer => required,
		Device::vkCmdUpdateBuffer => required,
		Device::vkCmdFillBuffer => required,
		Device::vkCmdClearColorImage => required,
		Device::vkCmdClearDepthStencilImage => required,
		Device::vkCmdClearAttachments => required,
		Device::vkCmdPipelineBarrier => required,
		Device::vkCmdBeginQuery => required,
		Device::vkCmdEndQuery => required,
		Device::vkCmdResetQueryPool => required,
		Device::vkCmdWriteTimestamp => required,
		Device::vkCmdBeginRenderPass => required,
		Device::vkCmdNextSubpass => required,
		Device::vkCmdEndRenderPass => required,
		Device::vkCmdExecuteCommands => required,
		Device::vkCreateSwapchainKHR => optional,
		Device::vkDestroySwapchainKHR => optional,
		Device::vkGetSwapchainImagesKHR => optional,
		Device::vkAcquireNextImageKHR => optional,
		Device::vkQueuePresentKHR => optional,
		Device::vkCmdBeginRenderingKHR => optional,
		Device::vkCmdEndRenderingKHR => optional,
		Device::vkCmdPushDescriptorSetKHR => optional,
		Device::vkGetMemoryHostPointerPropertiesEXT => optional,
		Device::vkSetDebugUtilsObjectNameEXT => optional,
		Device::vkCmdBeginDebugUtilsLabelEXT => optional,
		Device::vkCmdEndDebugUtilsLabelEXT => optional,
		Device::vkCmdInsertDebugUtilsLabelEXT => optional,
	},
)
.with_root_resolver(GET_INSTANCE_PROC_ADDR)
.with_device_resolver(GET_DEVICE_PROC_ADDR);
