//! # docver-tool
//!
//! Command-line companion to [`docver`] for multi-version documentation
//! sites.
//!
//! ## Features
//!
//! - **Manifest generation**: scan a directory of versioned builds and write
//!   `versions.json`, optionally re-pointing `stable` at the newest release
//! - **Preview**: render the version picker and banner for any version
//! - **Check**: fetch a published manifest and report problems
//!
//! ## Modules
//!
//! - [`config`] - Site configuration file
//! - [`ctx`] - Application context and state management
//! - [`preview`] - Rendering previews and manifest checks
//! - [`scan`] - Manifest generation
//! - [`utils`] - Common utilities and helper functions

/// Site configuration file (`.docver.toml`).
pub mod config;

/// Application context and state management.
pub mod ctx;

/// Rendering previews and published manifest checks.
pub mod preview;

/// Manifest generation from a directory of versioned builds.
pub mod scan;

/// Common utilities and helper functions.
pub mod utils;

#[macro_use]
extern crate log;
