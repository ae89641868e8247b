//! Selma - build metadata and shared constants for the Selma mapper generator
//!
//! The mapper generator and the code it emits share a handful of naming
//! tokens and primitive default values, and stamp generated sources with the
//! version and git revision of the generator that produced them. This crate
//! provides both.
//!
//! # Architecture
//!
//! - [`core`] - Constants, properties format, metadata loading, configuration
//! - [`cli`] - The `selma` command-line interface
//! - [`ui`] - Console output helpers
//!
//! # Guarantees
//!
//! 1. The build properties resource is read at most once per process
//! 2. Resolved metadata never changes after it is loaded
//! 3. A missing or unreadable resource is reported, never silently defaulted
//! 4. Constants are available without loading anything

pub mod cli;
pub mod core;
pub mod ui;
