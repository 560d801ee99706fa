//! shaderc compiler entry points.
//!
//! shaderc has no resolver function, so only the module tier applies and every
//! function is looked up directly in the shared library.

use crate::entry_points;
use crate::library::LibrarySpec;
use crate::registry::Registry;

/// `shaderc_shared` library naming.
pub const LIBRARY: LibrarySpec = LibrarySpec::new("shaderc_shared");

/// shaderc entry points.
pub static REGISTRY: Registry = Registry::new(
	"shaderc",
	entry_points! {
		Module::shaderc_compiler_initialize => required,
		Module::shaderc_compiler_release => required,
		Module::shaderc_compile_options_initialize => required,
		Module::shaderc_compile_options_release => required,
		Module::shaderc_compile_options_set_source_language => required,
		Module::shaderc_compile_options_set_generate_debug_info => required,
		Module::shaderc_compile_options_set_optimization_level => required,
		Module::shaderc_compile_options_set_target_env => required,
		Module::shaderc_compilation_status_to_string => required,
		Module::shaderc_compile_into_spv => required,
		Module::shaderc_result_release => required,
		Module::shaderc_result_get_length => required,
		Module::shaderc_result_get_num_warnings => required,
		Module::shaderc_result_get_bytes => required,
		Module::shaderc_result_get_compilation_status => required,
		Module::shaderc_result_get_error_message => required,
		Module::shaderc_optimize_spv => optional,
	},
);
