//! Fake libraries, hosts and resolvers shared by the loader integration tests.

#![allow(dead_code)]

use std::ffi::{CStr, c_char};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use gfxload_loader::resolver::{erase_device, erase_root};
use gfxload_loader::{DeviceHandle, HostBundle, InstanceHandle, LibraryBackend, LibrarySpec, Registry, RootResolverFn, VoidFunction, entry_points};

/// Installs a test-friendly tracing subscriber once per test binary.
pub fn init_tracing() {
	let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Log output written by [`capture_logs`].
#[derive(Debug, Clone, Default)]
pub struct CapturedLogs(Arc<parking_lot::Mutex<Vec<u8>>>);

impl CapturedLogs {
	pub fn lines(&self) -> Vec<String> {
		String::from_utf8_lossy(&self.0.lock()).lines().map(str::to_owned).collect()
	}
}

impl std::io::Write for CapturedLogs {
	fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
		self.0.lock().extend_from_slice(buf);
		Ok(buf.len())
	}

	fn flush(&mut self) -> std::io::Result<()> {
		Ok(())
	}
}

/// Runs `f` with a subscriber that records every event on this thread.
pub fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, CapturedLogs) {
	let logs = CapturedLogs::default();
	let writer = logs.clone();
	let subscriber = tracing_subscriber::fmt()
		.with_ansi(false)
		.with_max_level(tracing::Level::TRACE)
		.with_writer(move || writer.clone())
		.finish();
	let result = tracing::subscriber::with_default(subscriber, f);
	(result, logs)
}

/// Library naming for fakes; the fake backend ignores candidate names.
pub const FAKE_LIBRARY: LibrarySpec = LibrarySpec::new("gfxload-fake").with_version(1);

/// Instance handle the fake root resolver refuses to serve.
pub const BAD_INSTANCE: InstanceHandle = InstanceHandle::from_raw(0xBAD as *mut _);

/// Device handle the fake device resolver refuses to serve.
pub const BAD_DEVICE: DeviceHandle = DeviceHandle::from_raw(0xBAD as *mut _);

/// Device whose resolver answers only while [`FLAKY_DEVICE_ANSWERS`] is set.
pub const FLAKY_DEVICE: DeviceHandle = DeviceHandle::from_raw(0xF1A as *mut _);

/// Toggles the device resolver's answers for [`FLAKY_DEVICE`].
pub static FLAKY_DEVICE_ANSWERS: AtomicBool = AtomicBool::new(true);

/// Two module entries, one instance entry, `A` doubles as the root resolver.
pub static SCENARIO: Registry = Registry::new(
	"scenario",
	entry_points! {
		Module::A => required,
		Module::B => optional,
		Instance::C => required,
	},
)
.with_root_resolver("A");

/// A registry exercising all three tiers.
pub static LAYERED: Registry = Registry::new(
	"layered",
	entry_points! {
		Module::fakeGetInstanceProcAddr => required,
		Module::fakeCreateInstance => required,
		Module::fakeEnumerateVersion => optional,
		Instance::fakeDestroyInstance => required,
		Instance::fakeGetDeviceProcAddr => required,
		Instance::fakeSurfaceExtension => optional,
		Device::fakeQueueSubmit => required,
		Device::fakeSwapchainExtension => optional,
	},
)
.with_root_resolver("fakeGetInstanceProcAddr")
.with_device_resolver("fakeGetDeviceProcAddr");

pub unsafe extern "system" fn marker_a() {
	std::hint::black_box(0xA_u32);
}

pub unsafe extern "system" fn marker_c() {
	std::hint::black_box(0xC_u32);
}

pub unsafe extern "system" fn create_instance() {
	std::hint::black_box(1_u32);
}

pub unsafe extern "system" fn destroy_instance() {
	std::hint::black_box(2_u32);
}

/// What the root resolver answers for a device name.
pub unsafe extern "system" fn queue_submit_trampoline() {
	std::hint::black_box(3_u32);
}

/// What the device resolver answers for a device name.
pub unsafe extern "system" fn queue_submit_direct() {
	std::hint::black_box(4_u32);
}

/// Reads a resolver's name argument.
///
/// # Safety
///
/// `name` must point to a NUL-terminated string that outlives `'a`.
unsafe fn symbol<'a>(name: *const c_char) -> &'a [u8] {
	// SAFETY: guaranteed by the caller; the loader passes static names.
	unsafe { CStr::from_ptr(name) }.to_bytes()
}

/// Root resolver for [`SCENARIO`]; only knows `C`.
pub unsafe extern "system" fn scenario_root(_instance: InstanceHandle, name: *const c_char) -> Option<VoidFunction> {
	match unsafe { symbol(name) } {
		b"C" => Some(marker_c as VoidFunction),
		_ => None,
	}
}

/// Root resolver for [`LAYERED`].
///
/// Like `vkGetInstanceProcAddr` before Vulkan 1.2 it cannot resolve itself.
/// It refuses instance names for [`BAD_INSTANCE`] and answers device names
/// with a trampoline.
pub unsafe extern "system" fn layered_root(instance: InstanceHandle, name: *const c_char) -> Option<VoidFunction> {
	match unsafe { symbol(name) } {
		b"fakeCreateInstance" => Some(create_instance as VoidFunction),
		b"fakeDestroyInstance" if instance != BAD_INSTANCE => Some(destroy_instance as VoidFunction),
		b"fakeGetDeviceProcAddr" if instance != BAD_INSTANCE => Some(erase_device(layered_device)),
		b"fakeQueueSubmit" => Some(queue_submit_trampoline as VoidFunction),
		_ => None,
	}
}

/// Root resolver for [`LAYERED`] that lacks the required `fakeCreateInstance`.
pub unsafe extern "system" fn incomplete_root(_instance: InstanceHandle, name: *const c_char) -> Option<VoidFunction> {
	match unsafe { symbol(name) } {
		b"fakeGetInstanceProcAddr" => Some(erase_root(incomplete_root)),
		_ => None,
	}
}

/// Device resolver for [`LAYERED`]; refuses [`BAD_DEVICE`] and, when toggled
/// off, [`FLAKY_DEVICE`].
pub unsafe extern "system" fn layered_device(device: DeviceHandle, name: *const c_char) -> Option<VoidFunction> {
	let refused = device == BAD_DEVICE || (device == FLAKY_DEVICE && !FLAKY_DEVICE_ANSWERS.load(Ordering::SeqCst));
	match unsafe { symbol(name) } {
		b"fakeQueueSubmit" if !refused => Some(queue_submit_direct as VoidFunction),
		_ => None,
	}
}

/// In-memory library backend.
#[derive(Debug, Default)]
pub struct FakeLibrary {
	symbols: Vec<(&'static str, VoidFunction)>,
	openable: bool,
	open: bool,
	pub opens: usize,
	pub closes: usize,
}

impl FakeLibrary {
	/// A library that opens and exports `symbols`.
	pub fn with_symbols(symbols: &[(&'static str, VoidFunction)]) -> Self {
		Self {
			symbols: symbols.to_vec(),
			openable: true,
			..Default::default()
		}
	}

	/// A library that no candidate can open.
	pub fn unopenable() -> Self {
		Self::default()
	}

	/// Exports for [`SCENARIO`]: `A` (the root resolver), no `B`.
	pub fn scenario() -> Self {
		Self::with_symbols(&[("A", erase_root(scenario_root))])
	}

	/// Exports for [`LAYERED`]'s module tier.
	pub fn layered() -> Self {
		Self::with_symbols(&[
			("fakeGetInstanceProcAddr", erase_root(layered_root)),
			("fakeCreateInstance", create_instance as VoidFunction),
		])
	}
}

impl LibraryBackend for FakeLibrary {
	fn open_path(&mut self, path: &Path) -> Result<(), String> {
		if !self.openable {
			return Err(format!("{}: cannot open shared object file", path.display()));
		}
		self.open = true;
		self.opens += 1;
		Ok(())
	}

	fn symbol(&self, name: &CStr) -> Option<VoidFunction> {
		if !self.open {
			return None;
		}
		let name = name.to_str().ok()?;
		self.symbols.iter().find(|(symbol, _)| *symbol == name).map(|(_, function)| *function)
	}

	fn close(&mut self) {
		if self.open {
			self.open = false;
			self.closes += 1;
		}
	}

	fn is_open(&self) -> bool {
		self.open
	}
}

/// Call counters of a [`FakeHost`], shared with the test after the loader
/// takes ownership of the host.
#[derive(Debug, Default)]
pub struct HostCalls {
	pub loads: AtomicUsize,
	pub unloads: AtomicUsize,
}

impl HostCalls {
	pub fn loads(&self) -> usize {
		self.loads.load(Ordering::SeqCst)
	}

	pub fn unloads(&self) -> usize {
		self.unloads.load(Ordering::SeqCst)
	}
}

/// Host-bundled loader double.
pub struct FakeHost {
	pub load_ok: bool,
	pub resolver: Option<RootResolverFn>,
	pub calls: Arc<HostCalls>,
}

impl FakeHost {
	/// A host whose load succeeds and hands out `resolver`.
	pub fn with_resolver(resolver: RootResolverFn) -> (Self, Arc<HostCalls>) {
		let calls = Arc::new(HostCalls::default());
		let host = Self {
			load_ok: true,
			resolver: Some(resolver),
			calls: Arc::clone(&calls),
		};
		(host, calls)
	}
}

impl HostBundle for FakeHost {
	fn load_library(&mut self) -> Result<(), String> {
		self.calls.loads.fetch_add(1, Ordering::SeqCst);
		if self.load_ok { Ok(()) } else { Err("no Vulkan driver found".into()) }
	}

	fn root_resolver(&self) -> Result<RootResolverFn, String> {
		self.resolver.ok_or_else(|| "root resolver unavailable".to_string())
	}

	fn unload_library(&mut self) {
		self.calls.unloads.fetch_add(1, Ordering::SeqCst);
	}
}
