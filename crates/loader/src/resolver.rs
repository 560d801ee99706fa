//! Raw function pointer types, dispatchable handles and resolver functions.
//!
//! Every entry point is stored type-erased as [`VoidFunction`]. Resolver entry
//! points are reinterpreted as [`RootResolverFn`] or [`DeviceResolverFn`]
//! before being called.

use std::ffi::{CStr, c_char, c_void};

/// Type-erased entry point, equivalent to `PFN_vkVoidFunction`.
pub type VoidFunction = unsafe extern "system" fn();

/// Module-level resolver, equivalent to `PFN_vkGetInstanceProcAddr`.
///
/// Called with a null instance for module-tier names and with a live
/// instance for instance-tier names.
pub type RootResolverFn = unsafe extern "system" fn(InstanceHandle, *const c_char) -> Option<VoidFunction>;

/// Device-level resolver, equivalent to `PFN_vkGetDeviceProcAddr`.
pub type DeviceResolverFn = unsafe extern "system" fn(DeviceHandle, *const c_char) -> Option<VoidFunction>;

macro_rules! dispatchable_handle {
	($(#[$meta:meta])* $name:ident) => {
		$(#[$meta])*
		#[repr(transparent)]
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
		pub struct $name(*mut c_void);

		// SAFETY: dispatchable handles are opaque tokens owned by the driver; the
		// loader only passes them back to the driver and never dereferences them.
		unsafe impl Send for $name {}
		// SAFETY: see above.
		unsafe impl Sync for $name {}

		impl $name {
			/// The null handle.
			pub const fn null() -> Self {
				Self(std::ptr::null_mut())
			}

			/// Wraps a raw handle obtained from the driver.
			pub const fn from_raw(raw: *mut c_void) -> Self {
				Self(raw)
			}

			/// Returns the raw handle.
			pub const fn as_raw(self) -> *mut c_void {
				self.0
			}

			/// Returns true for the null handle.
			pub fn is_null(self) -> bool {
				self.0.is_null()
			}
		}

		impl Default for $name {
			fn default() -> Self {
				Self::null()
			}
		}
	};
}

dispatchable_handle!(
	/// Opaque instance handle (`VkInstance`).
	InstanceHandle
);

dispatchable_handle!(
	/// Opaque logical device handle (`VkDevice`).
	DeviceHandle
);

/// Erases a root resolver so it can be stored in a function table slot.
pub fn erase_root(resolver: RootResolverFn) -> VoidFunction {
	// SAFETY: function pointers share one representation; the slot is only
	// called after being reinterpreted back through `root_from_slot`.
	unsafe { std::mem::transmute::<RootResolverFn, VoidFunction>(resolver) }
}

/// Erases a device resolver so it can be stored in a function table slot.
pub fn erase_device(resolver: DeviceResolverFn) -> VoidFunction {
	// SAFETY: see `erase_root`.
	unsafe { std::mem::transmute::<DeviceResolverFn, VoidFunction>(resolver) }
}

/// Reinterprets a resolved slot as a root resolver.
///
/// # Safety
///
/// `function` must have been resolved under a name whose ABI is
/// [`RootResolverFn`].
pub unsafe fn root_from_slot(function: VoidFunction) -> RootResolverFn {
	// SAFETY: guaranteed by the caller.
	unsafe { std::mem::transmute::<VoidFunction, RootResolverFn>(function) }
}

/// Reinterprets a resolved slot as a device resolver.
///
/// # Safety
///
/// `function` must have been resolved under a name whose ABI is
/// [`DeviceResolverFn`].
pub unsafe fn device_from_slot(function: VoidFunction) -> DeviceResolverFn {
	// SAFETY: guaranteed by the caller.
	unsafe { std::mem::transmute::<VoidFunction, DeviceResolverFn>(function) }
}

/// Calls a root resolver for one name.
///
/// # Safety
///
/// `resolver` must be a live resolver from a loaded library and `instance`
/// must be null or a live instance created through that library.
pub(crate) unsafe fn call_root(resolver: RootResolverFn, instance: InstanceHandle, name: &CStr) -> Option<VoidFunction> {
	// SAFETY: guaranteed by the caller; `name` is NUL-terminated.
	unsafe { resolver(instance, name.as_ptr()) }
}

/// Calls a device resolver for one name.
///
/// # Safety
///
/// `resolver` must be a live resolver and `device` a live device created
/// through the same instance.
pub(crate) unsafe fn call_device(resolver: DeviceResolverFn, device: DeviceHandle, name: &CStr) -> Option<VoidFunction> {
	// SAFETY: guaranteed by the caller; `name` is NUL-terminated.
	unsafe { resolver(device, name.as_ptr()) }
}
