//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Reads what it needs from [`crate::core`]
//! 2. Formats and displays output through [`crate::ui::output`]
//!
//! Handlers never build their own metadata provider; they use the
//! process-wide one installed by [`crate::cli::run`].

mod completion;
mod constants;
mod properties;
mod version;

// Re-export command functions for testing and direct invocation
pub use completion::completion;
pub use constants::constants;
pub use properties::properties;
pub use version::version;

use super::args::Command;
use super::Context;
use anyhow::Result;

/// Dispatch a parsed command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Version { json } => version(ctx, json),
        Command::Properties { json } => properties(ctx, json),
        Command::Constants { json } => constants(ctx, json),
        Command::Completion { shell } => completion(shell),
    }
}
