//! core::metadata::resource
//!
//! Packaged-resource lookup.
//!
//! # Design
//!
//! Resources are addressed by a logical name (e.g. `selma.properties`), never
//! by an arbitrary filesystem path. A [`ResourceLocator`] maps a name to a
//! readable stream, or reports that no such resource exists.
//!
//! - [`EmbeddedResources`] - a static name-to-bytes table compiled into the binary
//! - [`DirectoryResources`] - a directory acting as a resource root
//! - [`ResourceChain`] - an ordered list of locators; the first hit wins
//!
//! A chain is a lookup order. It never merges the contents of two
//! resources with the same name.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Component, Path, PathBuf};

/// Properties resource generated by `build.rs` at compile time.
const BUILD_PROPERTIES: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/selma.properties"));

/// A readable resource stream.
pub type ResourceStream = Box<dyn Read + Send>;

/// Resolves logical resource names to streams.
///
/// Implementations must be thread-safe (Send + Sync).
pub trait ResourceLocator: Send + Sync {
    /// Open the named resource.
    ///
    /// Returns `Ok(None)` if the resource does not exist, and `Err` if it
    /// exists but could not be opened.
    fn open(&self, name: &str) -> io::Result<Option<ResourceStream>>;

    /// Short human-readable description used in diagnostics.
    fn describe(&self) -> String;
}

/// Resources compiled into the binary.
#[derive(Debug, Clone, Default)]
pub struct EmbeddedResources {
    entries: Vec<(&'static str, &'static [u8])>,
}

impl EmbeddedResources {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The resources bundled with this build of selma.
    pub fn bundled() -> Self {
        Self::new().with(super::RESOURCE_NAME, BUILD_PROPERTIES)
    }

    /// Add (or replace) a resource.
    pub fn with(mut self, name: &'static str, bytes: &'static [u8]) -> Self {
        self.entries.retain(|(n, _)| *n != name);
        self.entries.push((name, bytes));
        self
    }
}

impl ResourceLocator for EmbeddedResources {
    fn open(&self, name: &str) -> io::Result<Option<ResourceStream>> {
        Ok(self
            .entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, bytes)| Box::new(*bytes) as ResourceStream))
    }

    fn describe(&self) -> String {
        "embedded".to_string()
    }
}

/// A directory whose files are resources, named by their relative path.
#[derive(Debug, Clone)]
pub struct DirectoryResources {
    root: PathBuf,
}

impl DirectoryResources {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a logical name under the root.
    ///
    /// Names that would escape the root (absolute paths, `..`) resolve to
    /// nothing.
    fn resolve(&self, name: &str) -> Option<PathBuf> {
        let relative = Path::new(name);
        let contained = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        contained.then(|| self.root.join(relative))
    }
}

impl ResourceLocator for DirectoryResources {
    fn open(&self, name: &str) -> io::Result<Option<ResourceStream>> {
        let Some(path) = self.resolve(name) else {
            return Ok(None);
        };
        if !path.is_file() {
            return Ok(None);
        }
        let file = File::open(&path)?;
        Ok(Some(Box::new(BufReader::new(file))))
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// Ordered resource lookup; the first locator that has the resource wins.
#[derive(Default)]
pub struct ResourceChain {
    locators: Vec<Box<dyn ResourceLocator>>,
}

impl ResourceChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a locator at the lowest precedence.
    pub fn push(mut self, locator: impl ResourceLocator + 'static) -> Self {
        self.locators.push(Box::new(locator));
        self
    }

    /// Directories (in order) followed by the bundled resources.
    pub fn with_dirs<I, P>(dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        dirs.into_iter()
            .fold(Self::new(), |chain, dir| {
                chain.push(DirectoryResources::new(dir))
            })
            .push(EmbeddedResources::bundled())
    }

    pub fn len(&self) -> usize {
        self.locators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locators.is_empty()
    }
}

impl std::fmt::Debug for ResourceChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.locators.iter().map(|l| l.describe()))
            .finish()
    }
}

impl ResourceLocator for ResourceChain {
    fn open(&self, name: &str) -> io::Result<Option<ResourceStream>> {
        for locator in &self.locators {
            if let Some(stream) = locator.open(name)? {
                tracing::debug!(resource = name, from = %locator.describe(), "resource located");
                return Ok(Some(stream));
            }
        }
        Ok(None)
    }

    fn describe(&self) -> String {
        self.locators
            .iter()
            .map(|l| l.describe())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
