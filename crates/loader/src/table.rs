//! Resolved function pointer storage.

use tracing::{debug, error, trace};

use crate::registry::{EntryPointDescriptor, Registry, Tier};
use crate::resolver::VoidFunction;

/// One slot per registry entry, `None` while unresolved.
#[derive(Clone)]
pub struct FunctionTable {
	registry: &'static Registry,
	slots: Box<[Option<VoidFunction>]>,
}

impl std::fmt::Debug for FunctionTable {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FunctionTable")
			.field("registry", &self.registry.name())
			.field("resolved", &self.slots.iter().filter(|slot| slot.is_some()).count())
			.field("slots", &self.slots.len())
			.finish()
	}
}

impl FunctionTable {
	/// Creates a table with every slot unresolved.
	pub fn new(registry: &'static Registry) -> Self {
		Self {
			registry,
			slots: vec![None; registry.len()].into_boxed_slice(),
		}
	}

	/// Registry this table was created for.
	pub fn registry(&self) -> &'static Registry {
		self.registry
	}

	/// Returns the resolved address of `name`.
	pub fn get(&self, name: &str) -> Option<VoidFunction> {
		self.slots[self.registry.index_of(name)?]
	}

	/// Returns the resolved address of `name` reinterpreted as `F`.
	///
	/// # Safety
	///
	/// `F` must be the function pointer type matching the entry point's real
	/// signature.
	pub unsafe fn get_as<F: Copy>(&self, name: &str) -> Option<F> {
		const {
			assert!(size_of::<F>() == size_of::<VoidFunction>());
		}
		let function = self.get(name)?;
		// SAFETY: sizes match and the caller vouches for the signature.
		Some(unsafe { std::mem::transmute_copy::<VoidFunction, F>(&function) })
	}

	/// Returns true when `name` resolved.
	pub fn is_resolved(&self, name: &str) -> bool {
		self.get(name).is_some()
	}

	/// Returns true when no slot of `tier` holds an address.
	pub fn is_tier_unresolved(&self, tier: Tier) -> bool {
		self.registry.tier(tier).all(|(index, _)| self.slots[index].is_none())
	}

	/// Iterates every entry with its current value.
	pub fn iter(&self) -> impl Iterator<Item = (&'static EntryPointDescriptor, Option<VoidFunction>)> + '_ {
		self.registry.entries().iter().zip(self.slots.iter().copied())
	}

	/// Summarizes resolution of one tier.
	pub fn summary(&self, tier: Tier) -> TierSummary {
		let mut summary = TierSummary {
			tier,
			resolved: 0,
			missing_required: Vec::new(),
			missing_optional: Vec::new(),
		};
		for (index, entry) in self.registry.tier(tier) {
			match (self.slots[index], entry.is_required()) {
				(Some(_), _) => summary.resolved += 1,
				(None, true) => summary.missing_required.push(entry.name()),
				(None, false) => summary.missing_optional.push(entry.name()),
			}
		}
		summary
	}

	pub(crate) fn slot(&self, index: usize) -> Option<VoidFunction> {
		self.slots[index]
	}

	/// Clears every slot of `tier`.
	pub(crate) fn reset_tier(&mut self, tier: Tier) {
		for (index, _) in self.registry.tier(tier) {
			self.slots[index] = None;
		}
	}

	/// Resolves every entry of `tier` through `lookup`.
	///
	/// The whole tier is always walked so each missing required entry point is
	/// logged. Returns the number of missing required entries; the caller is
	/// responsible for rolling the tier back when it is non-zero.
	pub(crate) fn resolve_tier(&mut self, tier: Tier, mut lookup: impl FnMut(&'static EntryPointDescriptor) -> Option<VoidFunction>) -> usize {
		let registry = self.registry.name();
		let mut missing_required = 0;

		for (index, entry) in self.registry.tier(tier) {
			let function = lookup(entry);
			self.slots[index] = function;

			match function {
				Some(_) => trace!(registry, %tier, symbol = entry.name(), "resolved entry point"),
				None if entry.is_required() => {
					error!(registry, %tier, symbol = entry.name(), "failed to load required {tier} function");
					missing_required += 1;
				}
				None => debug!(registry, %tier, symbol = entry.name(), "optional entry point unavailable"),
			}
		}

		missing_required
	}
}

/// Resolution report for one tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierSummary {
	/// Summarized tier.
	pub tier: Tier,
	/// Number of resolved entries.
	pub resolved: usize,
	/// Unresolved required entries.
	pub missing_required: Vec<&'static str>,
	/// Unresolved optional entries.
	pub missing_optional: Vec<&'static str>,
}

impl TierSummary {
	/// Returns true when every required entry resolved.
	pub fn is_complete(&self) -> bool {
		self.missing_required.is_empty()
	}
}
