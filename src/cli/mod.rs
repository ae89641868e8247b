//! cli
//!
//! Command-line interface layer for selma.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Install logging and the process-wide metadata provider
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. It builds the [`Context`] once, installs the
//! metadata provider described by the configuration, and dispatches to
//! [`commands`]. Metadata is read through [`crate::core::metadata`] like any
//! other consumer.

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use anyhow::{Context as _, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::core::config::Config;
use crate::core::metadata::{self, BuildMetadataProvider, Diagnostics};
use crate::ui::output::Verbosity;

/// Environment variable overriding the log filter.
pub const LOG_ENV: &str = "SELMA_LOG";

/// Shared state for command handlers.
#[derive(Debug, Clone, Copy)]
pub struct Context {
    pub verbosity: Verbosity,
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    let ctx = Context {
        verbosity: Verbosity::from_flags(cli.quiet, cli.debug),
    };

    init_tracing(ctx.verbosity);

    let mut config = Config::load().context("Failed to load config")?;
    for dir in &cli.resource_dir {
        config = config.with_resource_dir(dir);
    }
    install_provider(&config, ctx.verbosity);

    commands::dispatch(cli.command, &ctx)
}

/// Install a stderr `tracing` subscriber.
///
/// `$SELMA_LOG` overrides the filter derived from the verbosity flags.
fn init_tracing(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(verbosity.log_filter()));

    // Already installed when embedded in a host that set up its own subscriber.
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .try_init();
}

/// Install the process-wide metadata provider.
///
/// The build dump goes to stderr so that stdout stays machine-readable.
fn install_provider(config: &Config, verbosity: Verbosity) {
    let provider = BuildMetadataProvider::from_config(config);
    let provider = if config.build_banner() && verbosity != Verbosity::Quiet {
        provider.with_diagnostics(Diagnostics::Writer(Box::new(std::io::stderr())))
    } else {
        provider.with_diagnostics(Diagnostics::Silent)
    };

    if metadata::install(provider).is_err() {
        tracing::debug!("metadata provider already installed");
    }
}
