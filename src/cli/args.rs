//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output
//! - `--resource-dir <DIR>`: Extra resource root, searched first

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Selma - build metadata and shared constants for the Selma mapper generator
#[derive(Parser, Debug)]
#[command(name = "selma")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output; suppresses the build dump
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Directory searched for resources before the bundled ones (repeatable)
    #[arg(long, global = true, value_name = "DIR")]
    pub resource_dir: Vec<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the build version, git hash and git description
    #[command(
        name = "version",
        after_help = "\
EXAMPLES:
    # Human-readable
    selma version

    # For scripts
    selma version --json"
    )]
    Version {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List every property read from the build properties resource
    Properties {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the naming tokens and primitive defaults used by generated code
    Constants {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        after_help = "\
INSTALLATION:
    # Bash
    selma completion bash > ~/.local/share/bash-completion/completions/selma

    # Zsh
    selma completion zsh > ~/.zfunc/_selma

    # Fish
    selma completion fish > ~/.config/fish/completions/selma.fish"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completion generation.
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
