//! Manifest retrieval and the load-then-render sequence.
//!
//! Loading is best effort: a manifest that cannot be fetched or decoded is
//! logged and the page simply goes without version UI. There is no retry.

use std::{future::Future, path::PathBuf, time::Duration};

use crate::{
    error::{ManifestError, RenderError, Result},
    model::{Config, VersionManifest},
    page::Page,
    render::{RenderReport, render},
};

const USER_AGENT: &str = concat!("docver/", env!("CARGO_PKG_VERSION"));

/// Something that can produce the manifest published at a URL.
pub trait ManifestSource {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<VersionManifest>> + Send;
}

/// Fetches manifests over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
}

impl HttpSource {
    /// Client without a request timeout; a hung request never completes.
    pub fn new() -> Result<Self> {
        Self::build(None)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        Self::build(Some(timeout))
    }

    fn build(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ManifestError::Client)?;
        Ok(Self { client })
    }
}

impl ManifestSource for HttpSource {
    async fn fetch(&self, url: &str) -> Result<VersionManifest> {
        debug!("fetching version manifest from {url}");
        let transport = |source| ManifestError::Transport {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ManifestError::Fetch {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(transport)?;
        Ok(VersionManifest::from_slice(&body)?)
    }
}

/// Reads manifests from the local filesystem.
///
/// Accepts `file://` URLs and plain paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSource;

impl FileSource {
    pub fn resolve(url: &str) -> PathBuf {
        PathBuf::from(url.strip_prefix("file://").unwrap_or(url))
    }
}

impl ManifestSource for FileSource {
    async fn fetch(&self, url: &str) -> Result<VersionManifest> {
        let path = Self::resolve(url);
        debug!("reading version manifest from {}", path.display());
        let body = tokio::fs::read(&path)
            .await
            .map_err(|source| ManifestError::Io { path, source })?;
        Ok(VersionManifest::from_slice(&body)?)
    }
}

/// Picks the source matching the scheme of a base URL.
#[derive(Debug, Clone)]
pub enum Source {
    Http(HttpSource),
    File(FileSource),
}

impl Source {
    pub fn for_base_url(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        if base_url.starts_with("http://") || base_url.starts_with("https://") {
            let http = match timeout {
                Some(timeout) => HttpSource::with_timeout(timeout)?,
                None => HttpSource::new()?,
            };
            Ok(Source::Http(http))
        } else {
            Ok(Source::File(FileSource))
        }
    }
}

impl ManifestSource for Source {
    async fn fetch(&self, url: &str) -> Result<VersionManifest> {
        match self {
            Source::Http(http) => http.fetch(url).await,
            Source::File(file) => file.fetch(url).await,
        }
    }
}

/// Result of a [`load`] call.
#[derive(Debug)]
pub enum LoadOutcome {
    /// The version UI was written into the page.
    Rendered(RenderReport),
    /// The manifest was unavailable; the page was not modified.
    Skipped(ManifestError),
}

impl LoadOutcome {
    pub fn is_rendered(&self) -> bool {
        matches!(self, LoadOutcome::Rendered(_))
    }
}

/// Fetches `{base_url}/versions.json` once and renders it into `page`.
///
/// Fetch and decode failures are logged and reported as
/// [`LoadOutcome::Skipped`]. Rendering waits until the page has finished
/// loading if it is still being parsed. A page lacking the target elements
/// is an integration error and is returned as `Err`.
pub async fn load<S: ManifestSource>(
    config: &Config,
    source: &S,
    page: &Page,
) -> std::result::Result<LoadOutcome, RenderError> {
    let url = config.manifest_url();
    let manifest = match source.fetch(&url).await {
        Ok(manifest) => manifest,
        Err(e) => {
            error!("{url}: {e}");
            return Ok(LoadOutcome::Skipped(e));
        }
    };

    page.when_document_ready().await;
    let report = page.with_document(|doc| render(config, &manifest, doc))?;
    Ok(LoadOutcome::Rendered(report))
}
