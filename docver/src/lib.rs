//! # docver
//!
//! Version picker and "you are not viewing the stable docs" banner for
//! documentation sites that publish one tree per version.
//!
//! ## Features
//!
//! - `versions.json` manifest model with the published wire format
//! - Manifest retrieval over HTTP(S) or from the local filesystem
//! - Rendering of the version list and the dev/outdated banner into a
//!   document, deferred until the document has finished loading
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docver::{Config, Document, HttpSource, Page, load};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::new("0.2.3", "https://docs.example.org");
//! let page = Page::loaded(Document::rtd_skeleton());
//!
//! let outcome = load(&config, &HttpSource::new()?, &page).await?;
//! if outcome.is_rendered() {
//!     println!("{}", page.html());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`model`] - Configuration, manifest and version types
//! - [`dom`] - Element tree the UI is rendered into
//! - [`page`] - Document loading state
//! - [`render`] - Version list and banner rendering
//! - [`loader`] - Manifest sources and the load sequence
//! - [`error`] - Error types

#[macro_use]
extern crate log;

pub mod dom;
pub mod error;
pub mod loader;
pub mod model;
pub mod page;
pub mod render;

pub use dom::{Document, Element, Node};
pub use error::{ManifestError, RenderError};
pub use loader::{FileSource, HttpSource, LoadOutcome, ManifestSource, Source, load};
pub use model::{Config, ReleaseVersion, VersionManifest, ViewKind, version_from_ref};
pub use page::{Page, ReadyState};
pub use render::{RenderReport, build_version_entry, render};
