//! Integration tests for build metadata loading.
//!
//! These tests exercise the BuildMetadataProvider against resource
//! directories created with tempfile and against the resources bundled at
//! build time.

use std::io::{self, Read};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use tempfile::TempDir;

use selma::core::constants;
use selma::core::metadata::resource::ResourceStream;
use selma::core::metadata::{
    BuildMetadataProvider, Diagnostics, DirectoryResources, EmbeddedResources, MetadataError,
    ResourceChain, ResourceLocator, RESOURCE_NAME,
};

// =============================================================================
// Test Helpers
// =============================================================================

/// Locator that counts every `open` and is slow to answer.
struct CountingLocator<L> {
    inner: L,
    opens: Arc<AtomicUsize>,
}

impl<L: ResourceLocator> ResourceLocator for CountingLocator<L> {
    fn open(&self, name: &str) -> io::Result<Option<ResourceStream>> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(20));
        self.inner.open(name)
    }

    fn describe(&self) -> String {
        format!("counting({})", self.inner.describe())
    }
}

/// Locator whose resource exists but fails partway through reading.
struct BrokenReadLocator;

impl ResourceLocator for BrokenReadLocator {
    fn open(&self, _: &str) -> io::Result<Option<ResourceStream>> {
        let partial = io::Cursor::new(b"selma.version=1.".to_vec());
        Ok(Some(Box::new(partial.chain(BrokenRead))))
    }

    fn describe(&self) -> String {
        "broken".to_string()
    }
}

struct BrokenRead;

impl Read for BrokenRead {
    fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::UnexpectedEof, "truncated resource"))
    }
}

fn write_properties(dir: &Path, text: &str) {
    std::fs::write(dir.join(RESOURCE_NAME), text).expect("write properties");
}

fn silent<L: ResourceLocator>(locator: L) -> BuildMetadataProvider<L> {
    BuildMetadataProvider::new(locator).with_diagnostics(Diagnostics::Silent)
}

// =============================================================================
// Loading
// =============================================================================

#[test]
fn happy_path_from_directory() {
    let dir = TempDir::new().unwrap();
    write_properties(
        dir.path(),
        "#Selma build properties\n\
         selma.version=1.2.3\n\
         selma.git.commit-full=abc123\n\
         selma.git.desc=v1.2.3-rc1\n",
    );

    let provider = silent(DirectoryResources::new(dir.path()));
    assert_eq!(provider.version().unwrap(), "1.2.3");
    assert_eq!(provider.git_hash().unwrap(), "abc123");
    assert_eq!(provider.git_description().unwrap(), "v1.2.3-rc1");
}

#[test]
fn each_missing_key_falls_back_independently() {
    let dir = TempDir::new().unwrap();
    write_properties(dir.path(), "selma.git.commit-full=abc123\n");

    let provider = silent(DirectoryResources::new(dir.path()));
    assert_eq!(provider.version().unwrap(), "V??.??");
    assert_eq!(provider.git_hash().unwrap(), "abc123");
    assert_eq!(provider.git_description().unwrap(), "UNKOWN GIT HASH");
}

#[test]
fn repeated_access_reads_once() {
    let dir = TempDir::new().unwrap();
    write_properties(dir.path(), "selma.version=1.0.0\n");

    let opens = Arc::new(AtomicUsize::new(0));
    let provider = silent(CountingLocator {
        inner: DirectoryResources::new(dir.path()),
        opens: Arc::clone(&opens),
    });

    for _ in 0..25 {
        assert_eq!(provider.version().unwrap(), "1.0.0");
        provider.git_hash().unwrap();
        provider.git_description().unwrap();
    }
    assert_eq!(opens.load(Ordering::SeqCst), 1);
    assert_eq!(provider.load_count(), 1);
}

#[test]
fn values_are_frozen_after_load() {
    let dir = TempDir::new().unwrap();
    write_properties(dir.path(), "selma.version=1.0.0\n");

    let provider = silent(DirectoryResources::new(dir.path()));
    assert_eq!(provider.version().unwrap(), "1.0.0");

    write_properties(dir.path(), "selma.version=2.0.0\n");
    assert_eq!(provider.version().unwrap(), "1.0.0");
}

#[test]
fn missing_resource_is_an_error() {
    let dir = TempDir::new().unwrap();
    let provider = silent(DirectoryResources::new(dir.path()));

    for result in [
        provider.version(),
        provider.git_hash(),
        provider.git_description(),
    ] {
        match result {
            Err(MetadataError::ResourceMissing { resource }) => {
                assert_eq!(resource, "selma.properties")
            }
            other => panic!("expected ResourceMissing, got {other:?}"),
        }
    }
}

#[test]
fn load_succeeds_once_resource_appears() {
    let dir = TempDir::new().unwrap();
    let provider = silent(DirectoryResources::new(dir.path()));

    assert!(provider.version().is_err());
    assert!(!provider.is_loaded());

    write_properties(dir.path(), "selma.version=4.5.6\n");
    assert_eq!(provider.version().unwrap(), "4.5.6");
    assert_eq!(provider.load_count(), 2);

    provider.version().unwrap();
    assert_eq!(provider.load_count(), 2);
}

#[test]
fn latin1_resource_loads() {
    let provider = silent(
        EmbeddedResources::new().with(RESOURCE_NAME, b"selma.version=1.0\nselma.git.desc=caf\xe9\n"),
    );
    assert_eq!(provider.version().unwrap(), "1.0");
    assert_eq!(provider.git_description().unwrap(), "café");
}

#[test]
fn unreadable_resource_is_a_parse_error() {
    let provider = silent(BrokenReadLocator);
    match provider.version() {
        Err(MetadataError::Parse { resource, source }) => {
            assert_eq!(resource, "selma.properties");
            assert_eq!(source.kind(), io::ErrorKind::UnexpectedEof);
        }
        other => panic!("expected Parse, got {other:?}"),
    }
    assert!(!provider.is_loaded());
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn concurrent_first_access_reads_once() {
    const THREADS: usize = 16;

    let opens = Arc::new(AtomicUsize::new(0));
    let provider = silent(CountingLocator {
        inner: EmbeddedResources::new().with(
            RESOURCE_NAME,
            b"selma.version=7.0.0\nselma.git.commit-full=deadbeef\nselma.git.desc=v7\n",
        ),
        opens: Arc::clone(&opens),
    });
    let barrier = Barrier::new(THREADS);

    let results: Vec<(String, String, String)> = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|i| {
                let provider = &provider;
                let barrier = &barrier;
                s.spawn(move || {
                    barrier.wait();
                    // Start from different accessors.
                    let first = match i % 3 {
                        0 => provider.version(),
                        1 => provider.git_hash(),
                        _ => provider.git_description(),
                    };
                    first.unwrap();
                    (
                        provider.version().unwrap().to_string(),
                        provider.git_hash().unwrap().to_string(),
                        provider.git_description().unwrap().to_string(),
                    )
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(opens.load(Ordering::SeqCst), 1);
    assert_eq!(provider.load_count(), 1);
    for result in results {
        assert_eq!(
            result,
            ("7.0.0".to_string(), "deadbeef".to_string(), "v7".to_string())
        );
    }
}

#[test]
fn concurrent_failures_do_not_load_partially() {
    const THREADS: usize = 8;

    let dir = TempDir::new().unwrap();
    let provider = silent(DirectoryResources::new(dir.path()));
    let barrier = Barrier::new(THREADS);

    thread::scope(|s| {
        for _ in 0..THREADS {
            s.spawn(|| {
                barrier.wait();
                assert!(provider.version().is_err());
            });
        }
    });

    assert!(!provider.is_loaded());
    assert_eq!(provider.load_count(), THREADS);
}

// =============================================================================
// Resource lookup order and bundled resources
// =============================================================================

#[test]
fn directory_overrides_bundled_resource() {
    let dir = TempDir::new().unwrap();
    write_properties(dir.path(), "selma.version=0.0.1-local\n");

    let provider = silent(ResourceChain::with_dirs([dir.path()]));
    assert_eq!(provider.version().unwrap(), "0.0.1-local");
    // No merging with the bundled resource.
    assert_eq!(provider.git_hash().unwrap(), "UNKOWN GIT HASH");
}

#[test]
fn bundled_resource_carries_package_version() {
    let provider = silent(EmbeddedResources::bundled());
    assert_eq!(provider.version().unwrap(), env!("CARGO_PKG_VERSION"));

    let props = provider.metadata().unwrap().properties();
    assert!(props.get("selma.build.timestamp").is_some());
}

#[test]
fn constants_need_no_load() {
    let provider = silent(DirectoryResources::new("/nonexistent/selma"));

    assert_eq!(constants::MAPPER_CLASS_SUFFIX, "SelmaGeneratedClass");
    assert_eq!(constants::IN_VAR, "in");
    assert_eq!(constants::OUT_VAR, "out");
    assert_eq!(constants::INSTANCE_CACHE, "instanceCache");
    assert_eq!(constants::DEFAULT_INT, 0);
    assert_eq!(constants::DEFAULT_CHAR, '\0');
    assert_eq!(provider.load_count(), 0);
}
