//! Entry point registries.
//!
//! A [`Registry`] is an immutable, statically declared list of entry points
//! partitioned into tiers. Registries are written with [`entry_points!`]:
//!
//! ```
//! use gfxload_loader::{Registry, entry_points};
//!
//! static REGISTRY: Registry = Registry::new(
//! 	"example",
//! 	entry_points! {
//! 		Module::exampleGetProcAddr => required,
//! 		Module::exampleQueryVersion => optional,
//! 		Instance::exampleCreateThing => required,
//! 	},
//! )
//! .with_root_resolver("exampleGetProcAddr");
//!
//! assert_eq!(REGISTRY.len(), 3);
//! ```

use std::ffi::CStr;
use std::fmt;

/// Resolution scope of an entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
	/// Library-global symbols.
	Module,
	/// Symbols valid for one instance.
	Instance,
	/// Symbols valid for one logical device.
	Device,
}

impl Tier {
	/// All tiers in dependency order.
	pub const ALL: [Tier; 3] = [Tier::Module, Tier::Instance, Tier::Device];

	/// Returns this tier followed by every tier that depends on it.
	pub fn with_dependents(self) -> impl Iterator<Item = Tier> {
		Self::ALL.into_iter().filter(move |tier| *tier >= self)
	}

	/// Lowercase name used in logs and errors.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Module => "module",
			Self::Instance => "instance",
			Self::Device => "device",
		}
	}
}

impl fmt::Display for Tier {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// One declared entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryPointDescriptor {
	/// Symbol name including the trailing NUL.
	symbol: &'static str,
	tier: Tier,
	required: bool,
}

impl EntryPointDescriptor {
	/// Declares an entry point. `symbol` must end in exactly one NUL byte.
	///
	/// Prefer [`entry_points!`], which appends the NUL itself.
	pub const fn new(symbol: &'static str, tier: Tier, required: bool) -> Self {
		let bytes = symbol.as_bytes();
		assert!(bytes.len() > 1, "entry point name must not be empty");
		assert!(bytes[bytes.len() - 1] == 0, "entry point name must be NUL-terminated");
		let mut i = 0;
		while i < bytes.len() - 1 {
			assert!(bytes[i] != 0, "entry point name contains an interior NUL");
			i += 1;
		}
		Self { symbol, tier, required }
	}

	/// Symbol name.
	pub fn name(&self) -> &'static str {
		&self.symbol[..self.symbol.len() - 1]
	}

	/// Symbol name for FFI lookups.
	pub fn c_name(&self) -> &'static CStr {
		// SAFETY: `new` checked for exactly one trailing NUL.
		unsafe { CStr::from_bytes_with_nul_unchecked(self.symbol.as_bytes()) }
	}

	/// Tier this entry point resolves in.
	pub const fn tier(&self) -> Tier {
		self.tier
	}

	/// Whether the tier fails to load without this entry point.
	pub const fn is_required(&self) -> bool {
		self.required
	}
}

/// Declares a static slice of [`EntryPointDescriptor`]s.
///
/// Each line is `Tier::symbolName => required` or `=> optional`.
#[macro_export]
macro_rules! entry_points {
	(@required required) => { true };
	(@required optional) => { false };
	($($tier:ident :: $name:ident => $req:ident),* $(,)?) => {
		{
			const ENTRIES: &[$crate::registry::EntryPointDescriptor] = &[$(
				$crate::registry::EntryPointDescriptor::new(
					concat!(stringify!($name), "\0"),
					$crate::registry::Tier::$tier,
					$crate::entry_points!(@required $req),
				)
			),*];
			ENTRIES
		}
	};
}

/// Immutable set of entry points for one API.
#[derive(Debug)]
pub struct Registry {
	name: &'static str,
	entries: &'static [EntryPointDescriptor],
	root_resolver: Option<&'static str>,
	device_resolver: Option<&'static str>,
}

impl Registry {
	/// Creates a registry without resolver entries. Such a registry can only
	/// load its module tier.
	pub const fn new(name: &'static str, entries: &'static [EntryPointDescriptor]) -> Self {
		Self {
			name,
			entries,
			root_resolver: None,
			device_resolver: None,
		}
	}

	/// Names the module-tier entry point that resolves module and instance
	/// names (`vkGetInstanceProcAddr`).
	pub const fn with_root_resolver(mut self, name: &'static str) -> Self {
		self.root_resolver = Some(name);
		self
	}

	/// Names the instance-tier entry point that resolves device names
	/// (`vkGetDeviceProcAddr`).
	pub const fn with_device_resolver(mut self, name: &'static str) -> Self {
		self.device_resolver = Some(name);
		self
	}

	/// Registry name used in logs.
	pub const fn name(&self) -> &'static str {
		self.name
	}

	/// All entries in declaration order.
	pub const fn entries(&self) -> &'static [EntryPointDescriptor] {
		self.entries
	}

	/// Number of entries across all tiers.
	pub const fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns true if the registry declares no entries.
	pub const fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Root resolver entry name, if any.
	pub const fn root_resolver(&self) -> Option<&'static str> {
		self.root_resolver
	}

	/// Device resolver entry name, if any.
	pub const fn device_resolver(&self) -> Option<&'static str> {
		self.device_resolver
	}

	/// Returns the slot index of `name`.
	pub fn index_of(&self, name: &str) -> Option<usize> {
		self.entries.iter().position(|entry| entry.name() == name)
	}

	/// Returns the descriptor for `name`.
	pub fn get(&self, name: &str) -> Option<&'static EntryPointDescriptor> {
		self.entries.iter().find(|entry| entry.name() == name)
	}

	/// Iterates `(slot index, descriptor)` pairs of one tier.
	pub fn tier(&self, tier: Tier) -> impl Iterator<Item = (usize, &'static EntryPointDescriptor)> {
		self.entries.iter().enumerate().filter(move |(_, entry)| entry.tier == tier)
	}

	/// Returns the root resolver's slot index, if it is declared in the module tier.
	pub(crate) fn root_resolver_index(&self) -> Option<usize> {
		self.resolver_index(self.root_resolver?, Tier::Module)
	}

	/// Returns the device resolver's slot index, if it is declared in the instance tier.
	pub(crate) fn device_resolver_index(&self) -> Option<usize> {
		self.resolver_index(self.device_resolver?, Tier::Instance)
	}

	fn resolver_index(&self, name: &str, tier: Tier) -> Option<usize> {
		self.index_of(name).filter(|&index| self.entries[index].tier == tier)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	static SAMPLE: Registry = Registry::new(
		"sample",
		entry_points! {
			Module::A => required,
			Module::B => optional,
			Instance::C => required,
			Device::D => optional,
		},
	)
	.with_root_resolver("A")
	.with_device_resolver("C");

	#[test]
	fn descriptor_names() {
		let entry = SAMPLE.get("B").unwrap();
		assert_eq!(entry.name(), "B");
		assert_eq!(entry.c_name(), c"B");
		assert_eq!(entry.tier(), Tier::Module);
		assert!(!entry.is_required());
	}

	#[test]
	fn tier_iteration_keeps_slot_indices() {
		let module: Vec<_> = SAMPLE.tier(Tier::Module).map(|(i, e)| (i, e.name())).collect();
		assert_eq!(module, vec![(0, "A"), (1, "B")]);
		let device: Vec<_> = SAMPLE.tier(Tier::Device).map(|(i, _)| i).collect();
		assert_eq!(device, vec![3]);
	}

	#[test]
	fn resolver_indices_respect_tiers() {
		assert_eq!(SAMPLE.root_resolver_index(), Some(0));
		assert_eq!(SAMPLE.device_resolver_index(), Some(2));

		let misplaced = Registry::new("misplaced", SAMPLE.entries()).with_root_resolver("C");
		assert_eq!(misplaced.root_resolver_index(), None);
		assert_eq!(misplaced.device_resolver_index(), None);
	}

	#[test]
	fn dependents_follow_tier_order() {
		let tiers: Vec<_> = Tier::Instance.with_dependents().collect();
		assert_eq!(tiers, vec![Tier::Instance, Tier::Device]);
		assert_eq!(Tier::Module.with_dependents().count(), 3);
		assert_eq!(Tier::Device.to_string(), "device");
	}

	#[test]
	#[should_panic(expected = "NUL-terminated")]
	fn rejects_unterminated_names() {
		let _ = EntryPointDescriptor::new("vkCreateInstance", Tier::Module, true);
	}
}
