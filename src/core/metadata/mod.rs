//! core::metadata
//!
//! Build metadata (version, git revision, git description) for selma.
//!
//! # Modules
//!
//! - [`resource`] - Packaged-resource lookup
//! - [`provider`] - Once-only loading and derived values
//!
//! # Architecture
//!
//! The build script writes a `selma.properties` resource that is compiled
//! into the binary. At runtime the resource is located by name, parsed on
//! first access, and frozen for the rest of the process. Missing keys fall
//! back to fixed literals; a missing or unreadable resource is an error that
//! reaches the caller.
//!
//! # Example
//!
//! ```no_run
//! let version = selma::core::metadata::version()?;
//! let hash = selma::core::metadata::git_hash()?;
//! println!("selma {} ({})", version, hash);
//! # Ok::<(), selma::core::metadata::MetadataError>(())
//! ```

pub mod provider;
pub mod resource;

use std::sync::OnceLock;

use thiserror::Error;

use crate::core::config::Config;

pub use provider::{BuildMetadata, BuildMetadataProvider, Diagnostics};
pub use resource::{DirectoryResources, EmbeddedResources, ResourceChain, ResourceLocator};

/// Logical name of the build properties resource.
pub const RESOURCE_NAME: &str = "selma.properties";

pub const VERSION_KEY: &str = "selma.version";
pub const GIT_HASH_KEY: &str = "selma.git.commit-full";
pub const GIT_DESC_KEY: &str = "selma.git.desc";

pub const VERSION_FALLBACK: &str = "V??.??";
pub const GIT_HASH_FALLBACK: &str = "UNKOWN GIT HASH";
// Shares the hash fallback text.
pub const GIT_DESC_FALLBACK: &str = "UNKOWN GIT HASH";

/// First line of the post-load diagnostic dump.
pub const BANNER: &str = "-- Running Selma with build --";

/// Errors from loading build metadata.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// The build properties resource could not be located.
    #[error("Selma build property file '{resource}' not found")]
    ResourceMissing {
        /// Logical resource name
        resource: String,
    },

    /// The resource exists but could not be read or parsed.
    #[error("IO error occurred while parsing Selma build property file '{resource}': {source}")]
    Parse {
        /// Logical resource name
        resource: String,
        source: std::io::Error,
    },
}

static PROVIDER: OnceLock<BuildMetadataProvider> = OnceLock::new();

/// Install the process-wide provider.
///
/// Must happen before the first metadata access. Returns the provider back
/// if one is already installed.
pub fn install(provider: BuildMetadataProvider) -> Result<(), BuildMetadataProvider> {
    PROVIDER.set(provider)
}

/// The process-wide provider.
///
/// Built from [`Config::load`] on first use unless [`install`] ran earlier.
/// An unreadable config file is logged and the defaults are used.
pub fn global() -> &'static BuildMetadataProvider {
    PROVIDER.get_or_init(|| {
        let config = Config::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "ignoring selma config");
            Config::default()
        });
        BuildMetadataProvider::from_config(&config)
    })
}

/// Process-wide semantic version.
pub fn version() -> Result<&'static str, MetadataError> {
    global().version()
}

/// Process-wide full git commit hash.
pub fn git_hash() -> Result<&'static str, MetadataError> {
    global().git_hash()
}

/// Process-wide `git describe` output.
pub fn git_description() -> Result<&'static str, MetadataError> {
    global().git_description()
}

/// Process-wide resolved metadata.
pub fn build_metadata() -> Result<&'static BuildMetadata, MetadataError> {
    global().metadata()
}
