//! core
//!
//! Build metadata, shared constants, and the formats they are stored in.
//!
//! # Modules
//!
//! - [`constants`] - Naming tokens and primitive defaults for generated code
//! - [`properties`] - `key=value` properties text
//! - [`metadata`] - Once-only loading of build metadata
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Constants never depend on the metadata resource
//! - Metadata is read at most once and is immutable afterwards
//! - Load failures are typed errors returned to the caller

pub mod config;
pub mod constants;
pub mod metadata;
pub mod properties;
