//! Rendering previews and manifest checks.
//!
//! `render` writes the version picker and banner into the read-the-docs
//! theme fragment and returns the HTML, which is handy for checking what a
//! given build will show without opening a browser.

use std::{collections::HashSet, path::PathBuf};

use anyhow::{Context, bail};
use colored::Colorize;
use docver::{
    Config, Document, LoadOutcome, ManifestSource, Page, Source, VersionManifest, ViewKind, load,
    model::same_tag,
};

use crate::ctx::AppContext;

/// Options for [`AppContext::render_preview`].
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Base URL of the published documentation.
    pub base_url: Option<String>,
    /// Version to render the banner for.
    pub current: Option<String>,
    /// Local manifest to use instead of `{base_url}/versions.json`.
    pub manifest: Option<PathBuf>,
}

/// Problems in a manifest that the renderer tolerates but readers would notice.
pub fn lint_manifest(manifest: &VersionManifest) -> Vec<String> {
    let mut warnings = Vec::new();

    if let Some(stable) = manifest.stable.as_deref()
        && !manifest.is_released(stable)
    {
        warnings.push(format!("stable version `{stable}` is not listed as released"));
    }
    if manifest.stable.is_none() && !manifest.released.is_empty() {
        warnings.push("releases are listed but no stable version is set".to_string());
    }

    let mut seen = HashSet::new();
    for tag in manifest.dev.iter().chain(&manifest.released) {
        if !seen.insert(tag.as_str()) {
            warnings.push(format!("`{tag}` is listed more than once"));
        }
    }
    for tag in &manifest.dev {
        if manifest.released.iter().any(|r| r != tag && same_tag(r, tag)) {
            warnings.push(format!("dev build `{tag}` shadows a release"));
        }
    }
    warnings
}

fn describe(view: ViewKind) -> colored::ColoredString {
    match view {
        ViewKind::Development => "development".yellow(),
        ViewKind::Outdated => "outdated".red(),
        ViewKind::Stable => "stable".green(),
    }
}

impl AppContext {
    /// Renders the version UI into the theme fragment and returns its HTML.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be loaded.
    pub async fn render_preview(&self, options: &RenderOptions) -> anyhow::Result<String> {
        let base_url = self.base_url(options.base_url.as_deref())?;
        let config = Config::new(self.current_version(options.current.as_deref()), base_url);
        let page = Page::loaded(Document::rtd_skeleton());

        if let Some(path) = &options.manifest {
            let path = self.resolve(path);
            let body = tokio::fs::read(&path)
                .await
                .with_context(|| format!("can not read {}", path.display()))?;
            let manifest = VersionManifest::from_slice(&body)
                .with_context(|| format!("invalid manifest {}", path.display()))?;
            page.with_document(|doc| docver::render(&config, &manifest, doc))?;
            return Ok(page.html());
        }

        let source = Source::for_base_url(&config.base_url, self.timeout())?;
        match load(&config, &source, &page).await? {
            LoadOutcome::Rendered(report) => {
                debug!(
                    "{} entries, {} viewed as {:?}",
                    report.entries, config.current_version, report.view
                );
                Ok(page.html())
            }
            LoadOutcome::Skipped(e) => {
                Err(e).with_context(|| format!("no manifest at {}", config.manifest_url()))
            }
        }
    }

    /// Fetches the published manifest and prints a summary.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be fetched, or if `strict` is
    /// set and the manifest has warnings.
    pub async fn check(
        &self,
        base_url: Option<&str>,
        current: Option<&str>,
        strict: bool,
    ) -> anyhow::Result<VersionManifest> {
        let config = Config::new(self.current_version(current), self.base_url(base_url)?);
        let url = config.manifest_url();
        let source = Source::for_base_url(&config.base_url, self.timeout())?;
        let manifest = source
            .fetch(&url)
            .await
            .with_context(|| format!("checking {url}"))?;

        println!("{}", url.bold());
        println!(
            "  stable:   {}",
            manifest.stable.as_deref().unwrap_or("(none)").green()
        );
        println!("  dev:      {}", manifest.dev.join(", "));
        println!("  released: {}", manifest.released.join(", "));
        println!(
            "  {} is viewed as {}",
            config.current_version.cyan(),
            describe(manifest.classify(&config.current_version))
        );

        let warnings = lint_manifest(&manifest);
        for w in &warnings {
            println!("  {} {w}", "warning:".yellow().bold());
        }
        if strict && !warnings.is_empty() {
            bail!("{} problem(s) found in {url}", warnings.len());
        }
        Ok(manifest)
    }
}
