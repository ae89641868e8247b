//! core::config::schema
//!
//! Configuration file schema.
//!
//! # Validation
//!
//! Values are validated after parsing: resource directories must be
//! non-empty paths.

use serde::Deserialize;
use std::path::PathBuf;

use super::ConfigError;

/// Contents of a selma config file.
///
/// # Example
///
/// ```toml
/// resource_dirs = ["/opt/selma/resources"]
/// build_banner = false
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Resource roots searched before the bundled resources
    pub resource_dirs: Option<Vec<PathBuf>>,

    /// Print the build dump on first metadata load
    pub build_banner: Option<bool>,
}

impl FileConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(dirs) = &self.resource_dirs {
            if dirs.iter().any(|d| d.as_os_str().is_empty()) {
                return Err(ConfigError::InvalidValue(
                    "resource_dirs entries cannot be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}
