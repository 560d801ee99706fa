//! Driver probe.
//!
//! Loads one registry's module tier and reports which entry points the driver
//! library exports. Useful for diagnosing a machine where the renderer fails
//! to start before any window exists.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use gfxload_loader::global::{self, GlobalLoader};
use gfxload_loader::{LoaderConfig, Tier, TierSummary};
use tracing::info;

/// Probe command line arguments.
#[derive(Parser, Debug)]
#[command(name = "gfxload-probe")]
#[command(about = "Report which graphics API entry points a driver library exports")]
struct Args {
	/// Registry to load
	#[arg(short, long, value_enum, default_value_t = Target::Vulkan)]
	registry: Target,

	/// Library to try before the platform's standard names
	#[arg(short, long, value_name = "PATH")]
	library: Option<PathBuf>,

	/// Ignore the library override environment variable
	#[arg(long)]
	no_env: bool,

	/// List every missing optional entry point
	#[arg(long)]
	show_missing: bool,

	/// Verbose logging
	#[arg(short, long)]
	verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Target {
	Vulkan,
	Shaderc,
}

impl Target {
	fn loader(self) -> &'static GlobalLoader {
		match self {
			Self::Vulkan => &global::VULKAN,
			Self::Shaderc => &global::SHADERC,
		}
	}
}

fn main() -> ExitCode {
	let args = Args::parse();

	setup_tracing(args.verbose);

	match run(&args) {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			eprintln!("error: {e:#}");
			ExitCode::FAILURE
		}
	}
}

fn run(args: &Args) -> Result<()> {
	let mut config = LoaderConfig::default().with_env_override(!args.no_env);
	if let Some(path) = &args.library {
		config = config.with_library_path(path);
	}

	let mut loader = args.registry.loader().write()?;
	loader.set_config(config)?;

	info!(registry = loader.registry().name(), "probing library");
	let loaded = loader.load_direct();
	let summary = loader.summary(Tier::Module);
	loader.unload();

	loaded.with_context(|| format!("failed to load the {} module tier", loader.registry().name()))?;
	print_summary(loader.registry().name(), &summary, args.show_missing);
	Ok(())
}

fn print_summary(registry: &str, summary: &TierSummary, show_missing: bool) {
	println!(
		"{registry}: {} {} entry points resolved, {} optional missing",
		summary.resolved,
		summary.tier,
		summary.missing_optional.len()
	);
	if show_missing {
		for name in &summary.missing_optional {
			println!("  missing {name}");
		}
	}
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("gfxload_loader=trace,info")
		} else {
			EnvFilter::new("gfxload_loader=warn")
		}
	});

	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}
