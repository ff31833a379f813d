//! Error types for manifest retrieval and rendering.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias for manifest retrieval.
pub type Result<T, E = ManifestError> = std::result::Result<T, E>;

/// Failure to obtain a usable `versions.json` manifest.
///
/// Every variant is handled the same way by [`crate::loader::load`]: it is
/// logged once and the version UI is left out of the page.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The HTTP client could not be set up.
    #[error("failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The server answered, but not with a success status.
    #[error("Failed to fetch versions.json manifest")]
    Fetch {
        /// HTTP status code of the response.
        status: u16,
    },

    /// The request could not be completed at all.
    #[error("failed to request {url}: {source}")]
    Transport {
        /// Requested manifest URL.
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The body was not a valid manifest document.
    #[error("malformed versions.json manifest: {0}")]
    Parse(#[from] serde_json::Error),

    /// A local manifest file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ManifestError {
    /// Returns `true` when the document was retrieved but could not be decoded.
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_))
    }
}

/// Host page integration defects detected while rendering.
///
/// These are not recovered from: they mean the page template does not
/// provide the elements the version UI is inserted into.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    /// No element in the document matches the required selector.
    #[error("required element `{selector}` not found in document")]
    MissingElement { selector: String },
}
