#![allow(unused_crate_dependencies)]

//! Process-wide loaders.

mod common;

use common::init_tracing;
use gfxload_loader::global::{SHADERC, VULKAN};
use gfxload_loader::{LoadError, LoadSource, LoaderConfig, Tier};

fn unreachable_config() -> LoaderConfig {
	LoaderConfig::default()
		.with_library_path("/nonexistent/gfxload/libvulkan.so")
		.with_env_override(false)
		.with_standard_paths(false)
}

#[test]
#[serial_test::serial]
fn failed_global_load_leaves_loader_unloaded() {
	init_tracing();
	{
		let mut loader = VULKAN.write().unwrap();
		loader.set_config(unreachable_config()).unwrap();

		let err = loader.load_direct().unwrap_err();
		let LoadError::Library(err) = err else {
			panic!("expected an acquisition failure, got {err:?}");
		};
		assert_eq!(err.attempts.len(), 1);
		assert_eq!(loader.source(), LoadSource::Unloaded);
		assert!(loader.table().is_tier_unresolved(Tier::Module));

		loader.unload();
		loader.unload();
		loader.set_config(LoaderConfig::default()).unwrap();
	}
	assert!(!VULKAN.is_loaded());
}

#[test]
#[serial_test::serial]
fn writer_does_not_wait_for_readers() {
	init_tracing();
	let reader = VULKAN.read();
	assert!(matches!(VULKAN.write(), Err(LoadError::Busy)));
	drop(reader);

	assert!(VULKAN.write().is_ok());
}

#[test]
#[serial_test::serial]
fn load_state_query_does_not_wait_for_the_writer() {
	init_tracing();
	let writer = VULKAN.write().unwrap();

	assert!(!VULKAN.is_loaded());
	drop(writer);
	assert!(!VULKAN.is_loaded());
}

#[test]
#[serial_test::serial]
fn global_loaders_are_independent() {
	init_tracing();
	let vulkan = VULKAN.write().unwrap();
	let mut shaderc = SHADERC.write().unwrap();

	assert_eq!(vulkan.registry().name(), "vulkan");
	assert_eq!(shaderc.registry().name(), "shaderc");

	shaderc.set_config(unreachable_config()).unwrap();
	assert!(shaderc.load_direct().is_err());
	assert!(!vulkan.is_loaded());
	shaderc.set_config(LoaderConfig::default()).unwrap();
}
