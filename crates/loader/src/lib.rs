//! Layered dynamic loader for graphics API entry points.
//!
//! The loader locates a native driver library at runtime, resolves a declared
//! table of entry points from it and validates that every required entry point
//! was found. Entry points are resolved in three tiers:
//!
//! * module: library-global symbols, looked up directly in the shared library
//!   or through a host-provided root resolver
//! * instance: resolved through the root resolver with an instance handle
//! * device: resolved through the device resolver with a device handle, one
//!   table per logical device
//!
//! A tier is either fully resolved (every required entry present) or fully
//! reset. Partially populated tables are never observable.
//!
//! # Architecture
//!
//! * [`registry`]: Declarative entry point registries ([`entry_points!`])
//! * [`registries`]: Built-in registries (Vulkan, shaderc)
//! * [`library`]: Dynamic library handle and candidate naming
//! * [`resolver`]: Raw function pointer and dispatchable handle types
//! * [`table`]: Resolved function pointer storage
//! * [`host`]: Host-bundled loader collaborator
//! * [`loader`]: Loader state and the module/instance/device loaders
//! * [`global`]: Process-wide Vulkan loader
//! * [`config`]: Library search configuration

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod global;
pub mod host;
pub mod library;
pub mod loader;
pub mod registries;
pub mod registry;
pub mod resolver;
pub mod table;

pub use config::LoaderConfig;
pub use error::{LibraryError, LoadError, Result};
pub use host::HostBundle;
pub use library::{LibraryBackend, LibrarySpec, NativeLibrary, versioned_filename};
pub use loader::{DeviceId, LoadSource, Loader};
pub use registry::{EntryPointDescriptor, Registry, Tier};
pub use resolver::{DeviceHandle, DeviceResolverFn, InstanceHandle, RootResolverFn, VoidFunction};
pub use table::{FunctionTable, TierSummary};
