//! Loader state and the module, instance and device loaders.
//!
//! Lifecycle:
//!
//! ```text
//! Unloaded --load_direct / load_from_host_bundle--> loaded (module tier)
//!          --resolve_instance_tier--> instance tier
//!          --resolve_device_tier (per device)--> device tables
//!          --unload--> Unloaded
//! ```
//!
//! Every tier is validated as a whole. When a required entry point is
//! missing the tier and everything downstream of it are reset before the error
//! is returned, and the missing names are logged one by one.

use std::fmt;

use slab::Slab;
use tracing::{error, info, warn};

use crate::config::LoaderConfig;
use crate::error::{LoadError, Result};
use crate::host::HostBundle;
use crate::library::{LibraryBackend, LibrarySpec, NativeLibrary};
use crate::registry::{EntryPointDescriptor, Registry, Tier};
use crate::resolver::{self, DeviceHandle, DeviceResolverFn, InstanceHandle, RootResolverFn, VoidFunction};
use crate::table::{FunctionTable, TierSummary};

/// Where the module tier came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadSource {
	/// Nothing is loaded.
	#[default]
	Unloaded,
	/// Opened through the loader's own library handle.
	DirectLibrary,
	/// Provided by a host library's bundled loader.
	HostBundled,
}

/// Index of a resolved device table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeviceId(usize);

impl fmt::Display for DeviceId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

struct DeviceEntry {
	handle: DeviceHandle,
	table: FunctionTable,
}

/// Owner of one registry's resolved entry points.
///
/// The module and instance tiers live in one [`FunctionTable`]. Each logical
/// device gets its own device-tier table, so devices never share or overwrite
/// each other's slots.
pub struct Loader<L: LibraryBackend = NativeLibrary> {
	registry: &'static Registry,
	library_spec: LibrarySpec,
	config: LoaderConfig,
	library: L,
	bundle: Option<Box<dyn HostBundle>>,
	source: LoadSource,
	table: FunctionTable,
	instance: Option<InstanceHandle>,
	devices: Slab<DeviceEntry>,
}

impl<L: LibraryBackend> fmt::Debug for Loader<L> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Loader")
			.field("registry", &self.registry.name())
			.field("source", &self.source)
			.field("instance", &self.instance)
			.field("devices", &self.devices.len())
			.finish_non_exhaustive()
	}
}

impl Loader<NativeLibrary> {
	/// Creates an unloaded loader that opens libraries through the OS linker.
	pub fn new(registry: &'static Registry, library_spec: LibrarySpec) -> Self {
		Self::with_library(registry, library_spec, NativeLibrary::new())
	}
}

impl<L: LibraryBackend> Loader<L> {
	/// Creates an unloaded loader with a custom library backend.
	pub fn with_library(registry: &'static Registry, library_spec: LibrarySpec, library: L) -> Self {
		Self {
			registry,
			library_spec,
			config: LoaderConfig::default(),
			library,
			bundle: None,
			source: LoadSource::Unloaded,
			table: FunctionTable::new(registry),
			instance: None,
			devices: Slab::new(),
		}
	}

	/// Replaces the configuration of an unloaded loader.
	pub fn with_config(mut self, config: LoaderConfig) -> Self {
		self.config = config;
		self
	}

	/// Replaces the configuration. Rejected while loaded.
	pub fn set_config(&mut self, config: LoaderConfig) -> Result<()> {
		self.ensure_unloaded()?;
		self.config = config;
		Ok(())
	}

	/// Current configuration.
	pub fn config(&self) -> &LoaderConfig {
		&self.config
	}

	/// Registry this loader resolves.
	pub fn registry(&self) -> &'static Registry {
		self.registry
	}

	/// Active acquisition source.
	pub fn source(&self) -> LoadSource {
		self.source
	}

	/// Returns true once the module tier is loaded.
	pub fn is_loaded(&self) -> bool {
		self.source != LoadSource::Unloaded
	}

	/// Library handle used for direct loads.
	pub fn library(&self) -> &L {
		&self.library
	}

	/// Module and instance tier entry points.
	pub fn table(&self) -> &FunctionTable {
		&self.table
	}

	/// Instance the instance tier was resolved for.
	pub fn instance(&self) -> Option<InstanceHandle> {
		self.instance
	}

	/// Summarizes the module or instance tier.
	pub fn summary(&self, tier: Tier) -> TierSummary {
		self.table.summary(tier)
	}

	/// Opens the driver library and resolves the module tier from its exports.
	pub fn load_direct(&mut self) -> Result<()> {
		self.ensure_unloaded()?;

		let candidates = self.library_spec.candidates(&self.config);
		let path = match self.library.open(&candidates) {
			Ok(path) => path.to_path_buf(),
			Err(e) => {
				error!(registry = self.registry.name(), error = %e, "failed to open library");
				return Err(e.into());
			}
		};

		let library = &self.library;
		let missing = self.table.resolve_tier(Tier::Module, |entry| library.symbol(entry.c_name()));
		if missing > 0 {
			self.reset_from(Tier::Module);
			self.library.close();
			self.source = LoadSource::Unloaded;
			warn!(registry = self.registry.name(), library = %path.display(), missing, "required module functions missing, library closed");
			return Err(LoadError::MissingRequired { tier: Tier::Module, count: missing });
		}

		self.source = LoadSource::DirectLibrary;
		info!(
			registry = self.registry.name(),
			library = %path.display(),
			resolved = self.table.summary(Tier::Module).resolved,
			"loaded library"
		);
		Ok(())
	}

	/// Lets a host library load the driver and resolves the module tier
	/// through the root resolver it hands back.
	///
	/// A host whose `load_library` fails is not asked to unload. A host that
	/// loaded but cannot produce a resolver, or whose resolver lacks required
	/// entry points, is unloaded again before returning.
	pub fn load_from_host_bundle(&mut self, bundle: impl HostBundle + 'static) -> Result<()> {
		self.ensure_unloaded()?;
		let mut bundle: Box<dyn HostBundle> = Box::new(bundle);

		if let Err(message) = bundle.load_library() {
			error!(registry = self.registry.name(), %message, "host failed to load library");
			return Err(LoadError::HostBundle { step: "load_library", message });
		}

		let root = match bundle.root_resolver() {
			Ok(root) => root,
			Err(message) => {
				error!(registry = self.registry.name(), %message, "host did not provide a root resolver");
				bundle.unload_library();
				return Err(LoadError::HostBundle { step: "root_resolver", message });
			}
		};

		let registry = self.registry;
		let missing = self.table.resolve_tier(Tier::Module, |entry| resolve_via_host_root(registry, root, entry));
		if missing > 0 {
			self.reset_from(Tier::Module);
			bundle.unload_library();
			self.source = LoadSource::Unloaded;
			warn!(registry = registry.name(), missing, "required module functions missing, host library unloaded");
			return Err(LoadError::MissingRequired { tier: Tier::Module, count: missing });
		}

		self.bundle = Some(bundle);
		self.source = LoadSource::HostBundled;
		info!(
			registry = registry.name(),
			resolved = self.table.summary(Tier::Module).resolved,
			"loaded library from host"
		);
		Ok(())
	}

	/// Resets every tier and releases the library or host bundle.
	///
	/// Safe to call when nothing is loaded.
	pub fn unload(&mut self) {
		self.reset_from(Tier::Module);
		self.library.close();
		if let Some(mut bundle) = self.bundle.take() {
			bundle.unload_library();
		}
		if self.source != LoadSource::Unloaded {
			info!(registry = self.registry.name(), source = ?self.source, "unloaded library");
		}
		self.source = LoadSource::Unloaded;
	}

	/// Resolves the instance tier for `instance` through the root resolver.
	///
	/// Device tables from an earlier instance are dropped first. On failure
	/// only the instance tier is reset; the module tier stays loaded so the
	/// caller can retry with another instance.
	pub fn resolve_instance_tier(&mut self, instance: InstanceHandle) -> Result<()> {
		if !self.is_loaded() {
			error!(registry = self.registry.name(), "instance functions requested before the library was loaded");
			return Err(LoadError::NotLoaded);
		}
		let root = self.root_resolver()?;

		self.reset_from(Tier::Instance);
		// SAFETY: `root` came from the loaded library and `instance` is the
		// caller's live instance.
		let missing = self
			.table
			.resolve_tier(Tier::Instance, |entry| unsafe { resolver::call_root(root, instance, entry.c_name()) });
		if missing > 0 {
			self.reset_from(Tier::Instance);
			warn!(registry = self.registry.name(), missing, "required instance functions missing");
			return Err(LoadError::MissingRequired { tier: Tier::Instance, count: missing });
		}

		self.instance = Some(instance);
		info!(
			registry = self.registry.name(),
			resolved = self.table.summary(Tier::Instance).resolved,
			"loaded instance functions"
		);
		Ok(())
	}

	/// Resets the instance tier and every device table, keeping the module tier.
	pub fn release_instance_tier(&mut self) {
		self.reset_from(Tier::Instance);
	}

	/// Resolves the device tier for `device` through the device resolver.
	///
	/// The table is stored only if every required entry resolved; a failed
	/// device leaves other devices untouched. Resolving an already registered
	/// device replaces its table and keeps its id, and a failed re-resolve
	/// drops the device's previous table.
	pub fn resolve_device_tier(&mut self, device: DeviceHandle) -> Result<DeviceId> {
		let Some(instance) = self.instance else {
			error!(registry = self.registry.name(), "device functions requested before instance functions");
			return Err(LoadError::InstanceNotResolved);
		};
		let device_resolver = self.device_resolver()?;

		let mut table = FunctionTable::new(self.registry);
		// SAFETY: `device_resolver` came from the live instance tier and
		// `device` is the caller's live device.
		let missing = table.resolve_tier(Tier::Device, |entry| unsafe {
			resolver::call_device(device_resolver, device, entry.c_name())
		});
		if missing > 0 {
			if let Some(id) = self.device_id(device) {
				self.devices.remove(id.0);
			}
			warn!(registry = self.registry.name(), ?device, missing, "required device functions missing");
			return Err(LoadError::MissingRequired { tier: Tier::Device, count: missing });
		}

		let resolved = table.summary(Tier::Device).resolved;
		let id = match self.device_id(device) {
			Some(id) => {
				self.devices[id.0].table = table;
				id
			}
			None => DeviceId(self.devices.insert(DeviceEntry { handle: device, table })),
		};
		info!(registry = self.registry.name(), ?instance, ?device, %id, resolved, "loaded device functions");
		Ok(id)
	}

	/// Device-tier entry points of one device.
	pub fn device_table(&self, id: DeviceId) -> Option<&FunctionTable> {
		self.devices.get(id.0).map(|entry| &entry.table)
	}

	/// Returns the id of a resolved device.
	pub fn device_id(&self, device: DeviceHandle) -> Option<DeviceId> {
		self.devices.iter().find(|(_, entry)| entry.handle == device).map(|(index, _)| DeviceId(index))
	}

	/// Drops the table of one device.
	pub fn release_device(&mut self, id: DeviceId) -> Result<()> {
		self.devices.try_remove(id.0).map(|_| ()).ok_or(LoadError::UnknownDevice(id))
	}

	/// Number of devices with resolved tables.
	pub fn device_count(&self) -> usize {
		self.devices.len()
	}

	fn ensure_unloaded(&self) -> Result<()> {
		if self.is_loaded() {
			error!(registry = self.registry.name(), source = ?self.source, "library is already loaded");
			return Err(LoadError::AlreadyLoaded);
		}
		Ok(())
	}

	/// Resets `tier` and every tier downstream of it.
	fn reset_from(&mut self, tier: Tier) {
		for tier in tier.with_dependents() {
			match tier {
				Tier::Module | Tier::Instance => self.table.reset_tier(tier),
				Tier::Device => self.devices.clear(),
			}
		}
		if tier <= Tier::Instance {
			self.instance = None;
		}
	}

	fn root_resolver(&self) -> Result<RootResolverFn> {
		let function = self.resolver_slot(Tier::Instance, self.registry.root_resolver(), self.registry.root_resolver_index())?;
		// SAFETY: the registry names this slot as the root resolver.
		Ok(unsafe { resolver::root_from_slot(function) })
	}

	fn device_resolver(&self) -> Result<DeviceResolverFn> {
		let function = self.resolver_slot(Tier::Device, self.registry.device_resolver(), self.registry.device_resolver_index())?;
		// SAFETY: the registry names this slot as the device resolver.
		Ok(unsafe { resolver::device_from_slot(function) })
	}

	fn resolver_slot(&self, tier: Tier, name: Option<&'static str>, index: Option<usize>) -> Result<VoidFunction> {
		let missing = || {
			let name = name.unwrap_or("<undeclared>");
			error!(registry = self.registry.name(), %tier, resolver = name, "resolver unavailable");
			LoadError::MissingResolver { tier, name }
		};
		index.and_then(|index| self.table.slot(index)).ok_or_else(missing)
	}
}

impl<L: LibraryBackend> Drop for Loader<L> {
	fn drop(&mut self) {
		self.unload();
	}
}

/// Resolves one module-tier entry through a host-provided root resolver.
///
/// The root resolver's own entry is assigned from the host instead of being
/// looked up: before Vulkan 1.2, `vkGetInstanceProcAddr(NULL,
/// "vkGetInstanceProcAddr")` is not required to return anything.
fn resolve_via_host_root(registry: &Registry, root: RootResolverFn, entry: &EntryPointDescriptor) -> Option<VoidFunction> {
	if registry.root_resolver() == Some(entry.name()) {
		return Some(resolver::erase_root(root));
	}
	// SAFETY: the host just loaded the library `root` belongs to; module-tier
	// names are resolved with a null instance.
	unsafe { resolver::call_root(root, InstanceHandle::null(), entry.c_name()) }
}
