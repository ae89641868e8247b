//! core::config
//!
//! Configuration schema and loading.
//!
//! # Config Locations
//!
//! Searched in order, first match wins:
//! 1. `$SELMA_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/selma/config.toml`
//! 3. `~/.selma/config.toml`
//!
//! A missing file is not an error; defaults are used.
//!
//! # Resource Directories
//!
//! Resource roots are searched in this order, before the resources bundled
//! into the binary:
//! 1. Directories added with [`Config::with_resource_dir`] (CLI `--resource-dir`)
//! 2. `$SELMA_RESOURCE_PATH` (platform path-list syntax)
//! 3. `resource_dirs` from the config file
//!
//! Configuration is read once, when the metadata provider is built.
//!
//! # Example
//!
//! ```no_run
//! use selma::core::config::Config;
//!
//! let config = Config::load().unwrap();
//! for dir in config.resource_dirs() {
//!     println!("resource root: {}", dir.display());
//! }
//! println!("Banner: {}", config.build_banner());
//! ```

pub mod schema;

pub use schema::FileConfig;

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "SELMA_CONFIG";

/// Environment variable holding extra resource directories.
pub const RESOURCE_PATH_ENV: &str = "SELMA_RESOURCE_PATH";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Effective configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed config file (defaults if none was found)
    pub file: FileConfig,
    /// Directories from the command line
    cli_dirs: Vec<PathBuf>,
    /// Directories from `$SELMA_RESOURCE_PATH`
    env_dirs: Vec<PathBuf>,
    /// Path of the loaded config file
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the process environment and default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read, parsed,
    /// or validated.
    pub fn load() -> Result<Config, ConfigError> {
        Self::load_with(|name| std::env::var_os(name), dirs::home_dir())
    }

    /// Load configuration using the given environment lookup and home directory.
    fn load_with<F>(env: F, home: Option<PathBuf>) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let path = Self::locate(&env, home);
        let file = match &path {
            Some(path) => Self::read_file(path)?,
            None => FileConfig::default(),
        };

        let env_dirs = env(RESOURCE_PATH_ENV)
            .map(|paths| {
                std::env::split_paths(&paths)
                    .filter(|p| !p.as_os_str().is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Config {
            file,
            cli_dirs: Vec::new(),
            env_dirs,
            path,
        })
    }

    /// Find the config file to use, if any.
    fn locate<F>(env: &F, home: Option<PathBuf>) -> Option<PathBuf>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        // 1. Check $SELMA_CONFIG
        if let Some(path) = env(CONFIG_ENV).map(PathBuf::from) {
            if path.exists() {
                return Some(path);
            }
            tracing::warn!(path = %path.display(), "{} points to a missing file", CONFIG_ENV);
        }

        // 2. Check $XDG_CONFIG_HOME/selma/config.toml
        if let Some(xdg_home) = env("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("selma/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        // 3. Check ~/.selma/config.toml
        home.map(|h| h.join(".selma/config.toml"))
            .filter(|path| path.exists())
    }

    /// Read, parse and validate a config file.
    pub fn read_file(path: &Path) -> Result<FileConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: FileConfig = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate()?;

        tracing::debug!(path = %path.display(), "loaded selma config");
        Ok(config)
    }

    /// Add a resource directory with the highest precedence so far.
    pub fn with_resource_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cli_dirs.push(dir.into());
        self
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    /// Resource directories in lookup order.
    pub fn resource_dirs(&self) -> Vec<PathBuf> {
        self.cli_dirs
            .iter()
            .chain(&self.env_dirs)
            .chain(self.file.resource_dirs.iter().flatten())
            .cloned()
            .collect()
    }

    /// Whether to print the build dump on first load.
    ///
    /// Defaults to `true` if not configured.
    pub fn build_banner(&self) -> bool {
        self.file.build_banner.unwrap_or(true)
    }

    /// Path of the loaded config file.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
