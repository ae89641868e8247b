//! constants command - List naming tokens and primitive defaults

use crate::cli::Context;
use crate::core::constants;
use crate::ui::output::{self, Verbosity};
use anyhow::Result;

/// List every constant. Never touches the build metadata.
pub fn constants(ctx: &Context, json: bool) -> Result<()> {
    let table = constants::table();

    if json {
        output::value(serde_json::to_string_pretty(&table)?);
        return Ok(());
    }

    for entry in &table {
        if ctx.verbosity == Verbosity::Quiet {
            output::value(format!("{}={}", entry.name, entry.value));
        } else {
            output::value(format!("{:<20} {:<8} {}", entry.name, entry.kind, entry.value));
        }
    }
    Ok(())
}
