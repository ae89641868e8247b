//! core::metadata::provider
//!
//! Lazy, once-only loading of the build properties resource.
//!
//! # Load Procedure
//!
//! On first access the provider:
//! 1. Opens [`RESOURCE_NAME`] through its [`ResourceLocator`]
//! 2. Fails with [`MetadataError::ResourceMissing`] if it does not exist
//! 3. Parses it as properties text ([`MetadataError::Parse`] on I/O errors)
//! 4. Writes the `-- Running Selma with build --` dump to the diagnostic sink
//! 5. Derives version, git hash and git description, falling back to fixed
//!    literals for absent keys
//!
//! The result is frozen in a [`OnceLock`]. Later calls never touch the
//! resource again.
//!
//! # Concurrency
//!
//! The check-then-load sequence runs under a mutex and re-checks the cell
//! once the lock is held, so concurrent first callers cause a single read
//! and all observe the same values. A failed load leaves the cell empty, so
//! a later call tries again.

use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, OnceLock, PoisonError};

use serde::Serialize;

use super::resource::{ResourceChain, ResourceLocator};
use super::{
    MetadataError, BANNER, GIT_DESC_FALLBACK, GIT_DESC_KEY, GIT_HASH_FALLBACK, GIT_HASH_KEY,
    RESOURCE_NAME, VERSION_FALLBACK, VERSION_KEY,
};
use crate::core::config::Config;
use crate::core::properties::Properties;

/// Build metadata resolved from the properties resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildMetadata {
    version: String,
    git_hash: String,
    git_description: String,
    properties: Properties,
}

impl BuildMetadata {
    /// Derive the metadata values from a loaded store.
    ///
    /// Absent keys are replaced by their fallback literals.
    pub fn resolve(properties: Properties) -> Self {
        Self {
            version: properties.get_or(VERSION_KEY, VERSION_FALLBACK).to_string(),
            git_hash: properties.get_or(GIT_HASH_KEY, GIT_HASH_FALLBACK).to_string(),
            git_description: properties.get_or(GIT_DESC_KEY, GIT_DESC_FALLBACK).to_string(),
            properties,
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn git_hash(&self) -> &str {
        &self.git_hash
    }

    pub fn git_description(&self) -> &str {
        &self.git_description
    }

    /// Every pair read from the resource.
    pub fn properties(&self) -> &Properties {
        &self.properties
    }
}

/// Where the post-load dump goes.
pub enum Diagnostics {
    /// Process standard output.
    Stdout,
    /// Any writer, e.g. a log file or an in-memory buffer.
    Writer(Box<dyn Write + Send>),
    /// No dump.
    Silent,
}

impl Diagnostics {
    /// Write the banner and the loaded pairs.
    ///
    /// Write failures are logged and otherwise ignored.
    fn dump(&mut self, properties: &Properties) {
        let result = match self {
            Diagnostics::Silent => return,
            Diagnostics::Stdout => write_dump(io::stdout().lock(), properties),
            Diagnostics::Writer(writer) => write_dump(writer, properties),
        };
        if let Err(e) = result {
            tracing::warn!(error = %e, "failed to write build metadata dump");
        }
    }
}

impl std::fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostics::Stdout => f.write_str("Stdout"),
            Diagnostics::Writer(_) => f.write_str("Writer(..)"),
            Diagnostics::Silent => f.write_str("Silent"),
        }
    }
}

fn write_dump<W: Write>(mut writer: W, properties: &Properties) -> io::Result<()> {
    writeln!(writer, "{}", BANNER)?;
    properties.store(&mut writer, Some("Selma build properties"))
}

/// Loads build metadata at most once and serves it afterwards.
///
/// # Example
///
/// ```
/// use selma::core::metadata::provider::{BuildMetadataProvider, Diagnostics};
/// use selma::core::metadata::resource::EmbeddedResources;
///
/// let resources = EmbeddedResources::new()
///     .with("selma.properties", b"selma.version=1.2.3\nselma.git.commit-full=abc123\n");
/// let provider = BuildMetadataProvider::new(resources).with_diagnostics(Diagnostics::Silent);
///
/// assert_eq!(provider.version().unwrap(), "1.2.3");
/// assert_eq!(provider.git_hash().unwrap(), "abc123");
/// assert_eq!(provider.git_description().unwrap(), "UNKOWN GIT HASH");
/// assert_eq!(provider.load_count(), 1);
/// ```
#[derive(Debug)]
pub struct BuildMetadataProvider<L = ResourceChain> {
    locator: L,
    metadata: OnceLock<BuildMetadata>,
    load_lock: Mutex<Diagnostics>,
    loads: AtomicUsize,
}

impl BuildMetadataProvider<ResourceChain> {
    /// Provider over the configured resource directories and the bundled
    /// resources.
    pub fn from_config(config: &Config) -> Self {
        let diagnostics = if config.build_banner() {
            Diagnostics::Stdout
        } else {
            Diagnostics::Silent
        };
        Self::new(ResourceChain::with_dirs(config.resource_dirs())).with_diagnostics(diagnostics)
    }
}

impl<L: ResourceLocator> BuildMetadataProvider<L> {
    /// Create a provider. Nothing is read until the first accessor call.
    pub fn new(locator: L) -> Self {
        Self {
            locator,
            metadata: OnceLock::new(),
            load_lock: Mutex::new(Diagnostics::Stdout),
            loads: AtomicUsize::new(0),
        }
    }

    /// Redirect (or silence) the post-load dump.
    pub fn with_diagnostics(self, diagnostics: Diagnostics) -> Self {
        Self {
            load_lock: Mutex::new(diagnostics),
            ..self
        }
    }

    /// Semantic version, or `V??.??`.
    pub fn version(&self) -> Result<&str, MetadataError> {
        Ok(self.metadata()?.version())
    }

    /// Full commit hash, or `UNKOWN GIT HASH`.
    pub fn git_hash(&self) -> Result<&str, MetadataError> {
        Ok(self.metadata()?.git_hash())
    }

    /// `git describe` output, or `UNKOWN GIT HASH`.
    pub fn git_description(&self) -> Result<&str, MetadataError> {
        Ok(self.metadata()?.git_description())
    }

    /// The resolved metadata, loading it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::ResourceMissing`] if the resource cannot be
    /// located, or [`MetadataError::Parse`] if it cannot be read.
    pub fn metadata(&self) -> Result<&BuildMetadata, MetadataError> {
        if let Some(metadata) = self.metadata.get() {
            return Ok(metadata);
        }

        let mut diagnostics = self
            .load_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        // Another caller may have finished the load while we waited.
        if let Some(metadata) = self.metadata.get() {
            return Ok(metadata);
        }

        let loaded = self.load(&mut diagnostics)?;
        Ok(self.metadata.get_or_init(|| loaded))
    }

    /// Whether metadata has been loaded successfully.
    pub fn is_loaded(&self) -> bool {
        self.metadata.get().is_some()
    }

    /// Number of times the load procedure has run (successful or not).
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    fn load(&self, diagnostics: &mut Diagnostics) -> Result<BuildMetadata, MetadataError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        let parse_error = |source: io::Error| MetadataError::Parse {
            resource: RESOURCE_NAME.to_string(),
            source,
        };

        let stream = self
            .locator
            .open(RESOURCE_NAME)
            .map_err(parse_error)?
            .ok_or_else(|| MetadataError::ResourceMissing {
                resource: RESOURCE_NAME.to_string(),
            })?;
        tracing::debug!(resource = RESOURCE_NAME, "reading build metadata");

        let properties = Properties::parse(stream).map_err(parse_error)?;
        diagnostics.dump(&properties);

        let metadata = BuildMetadata::resolve(properties);
        tracing::info!(
            version = metadata.version(),
            git_hash = metadata.git_hash(),
            git_description = metadata.git_description(),
            "build metadata resolved"
        );
        Ok(metadata)
    }
}
