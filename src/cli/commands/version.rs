//! version command - Show build version and git information

use crate::cli::Context;
use crate::core::metadata;
use crate::ui::output::{self, Verbosity};
use anyhow::{Context as _, Result};

/// Show the resolved build metadata.
///
/// In quiet mode only the version is printed.
pub fn version(ctx: &Context, json: bool) -> Result<()> {
    let meta = metadata::build_metadata().context("Failed to load build metadata")?;

    if json {
        let value = serde_json::json!({
            "version": meta.version(),
            "git_hash": meta.git_hash(),
            "git_description": meta.git_description(),
        });
        output::value(serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    if ctx.verbosity == Verbosity::Quiet {
        output::value(meta.version());
        return Ok(());
    }

    output::value(output::format_rows(&[
        ("version", meta.version()),
        ("git hash", meta.git_hash()),
        ("git description", meta.git_description()),
    ]));
    Ok(())
}
