//! properties command - List the raw build properties

use crate::cli::Context;
use crate::core::metadata;
use crate::ui::output;
use anyhow::{Context as _, Result};

/// List every loaded property, sorted by key.
pub fn properties(ctx: &Context, json: bool) -> Result<()> {
    let meta = metadata::build_metadata().context("Failed to load build metadata")?;
    let props = meta.properties();

    if json {
        output::value(serde_json::to_string_pretty(props)?);
        return Ok(());
    }

    if props.is_empty() {
        output::warn("build properties resource is empty", ctx.verbosity);
        return Ok(());
    }

    for (key, value) in props.sorted() {
        output::value(format!("{}={}", key, value));
    }
    Ok(())
}
