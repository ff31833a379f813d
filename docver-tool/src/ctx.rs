//! Application context and state management.
//!
//! This module provides the [`AppContext`] type which holds the working
//! directory, the loaded site configuration and the path it came from.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::anyhow;

use crate::{
    config::{DEFAULT_CONFIG_FILE, SiteConfig, read_config},
    utils::expand_placeholders,
};

/// Version used when nothing else names the build.
pub const FALLBACK_VERSION: &str = "dev";

/// Environment variable CI exports with the ref being built.
pub const GIT_REF_ENV: &str = "GITHUB_REF";

/// The main application context holding all state.
#[derive(Default, Debug, Clone)]
pub struct AppContext {
    /// Directory relative paths are resolved against.
    pub workspace: PathBuf,
    /// Loaded site configuration, with placeholders expanded.
    pub config: SiteConfig,
    /// Path of the configuration file, once loaded.
    pub config_path: Option<PathBuf>,
}

impl AppContext {
    pub fn new(workspace: impl Into<PathBuf>) -> Self {
        Self {
            workspace: workspace.into(),
            ..Default::default()
        }
    }

    /// Loads the site configuration.
    ///
    /// # Arguments
    ///
    /// * `config_path` - Optional path to the configuration file. Defaults to
    ///   `.docver.toml` in the workspace. A missing file yields the default
    ///   configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn prepare_config(&mut self, config_path: Option<PathBuf>) -> anyhow::Result<()> {
        let config_path = match config_path {
            Some(path) => self.resolve(path),
            None => self.workspace.join(DEFAULT_CONFIG_FILE),
        };

        match read_config::<SiteConfig>(&config_path).await? {
            Some(config) => {
                debug!("Loaded configuration from {}", config_path.display());
                self.config = config.map_strings(|s| self.value_replace_with_var(s));
            }
            None => {
                debug!(
                    "No configuration at {}, using defaults",
                    config_path.display()
                );
                self.config = SiteConfig::default();
            }
        }
        self.config_path = Some(config_path);
        Ok(())
    }

    /// Replaces `${workspaceFolder}` and `${env:VAR}` placeholders.
    pub fn value_replace_with_var(&self, value: &str) -> String {
        expand_placeholders(value, &self.workspace)
    }

    /// Resolves a path against the workspace.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_relative() {
            self.workspace.join(path)
        } else {
            path.to_path_buf()
        }
    }

    /// Version of the documentation being viewed or built.
    ///
    /// Precedence: explicit value, configuration, `GITHUB_REF`, `dev`.
    pub fn current_version(&self, explicit: Option<&str>) -> String {
        if let Some(v) = explicit.or(self.config.current_version.as_deref()) {
            return v.to_string();
        }
        std::env::var(GIT_REF_ENV)
            .ok()
            .and_then(|r| docver::version_from_ref(&r))
            .unwrap_or_else(|| FALLBACK_VERSION.to_string())
    }

    /// Base URL of the published documentation.
    ///
    /// # Errors
    ///
    /// Returns an error if neither `explicit` nor the configuration provide one.
    pub fn base_url(&self, explicit: Option<&str>) -> anyhow::Result<String> {
        explicit
            .or(self.config.base_url.as_deref())
            .map(str::to_string)
            .ok_or(anyhow!(
                "no base URL given, pass --base-url or set `base_url` in {DEFAULT_CONFIG_FILE}"
            ))
    }

    /// Directory holding the versioned documentation trees.
    ///
    /// # Errors
    ///
    /// Returns an error if neither `explicit` nor the configuration provide one.
    pub fn docs_dir(&self, explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
        let dir = match explicit {
            Some(dir) => dir.to_path_buf(),
            None => self
                .config
                .docs_dir
                .as_ref()
                .map(PathBuf::from)
                .ok_or(anyhow!(
                    "no documentation directory given, pass DIR or set `docs_dir` in {DEFAULT_CONFIG_FILE}"
                ))?,
        };
        Ok(self.resolve(dir))
    }

    /// Request timeout for remote manifests.
    pub fn timeout(&self) -> Option<Duration> {
        self.config.timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_prepare_config_expands_placeholders() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(DEFAULT_CONFIG_FILE),
            "docs_dir = \"${workspaceFolder}/html\"\nbase_url = \"https://x.io\"\n",
        )
        .unwrap();

        let mut ctx = AppContext::new(dir.path());
        ctx.prepare_config(None).await.unwrap();
        assert_eq!(
            ctx.docs_dir(None).unwrap(),
            PathBuf::from(format!("{}/html", dir.path().display()))
        );
        assert_eq!(ctx.base_url(None).unwrap(), "https://x.io");
        assert_eq!(ctx.base_url(Some("https://y.io")).unwrap(), "https://y.io");
    }

    #[tokio::test]
    async fn test_prepare_config_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = AppContext::new(dir.path());
        ctx.prepare_config(None).await.unwrap();
        assert_eq!(ctx.config, SiteConfig::default());
        assert!(ctx.base_url(None).is_err());
        assert!(ctx.docs_dir(None).is_err());
    }

    #[test]
    fn test_current_version_precedence() {
        let mut ctx = AppContext::new("/ws");
        ctx.config.current_version = Some("from-config".into());
        assert_eq!(ctx.current_version(Some("cli")), "cli");
        assert_eq!(ctx.current_version(None), "from-config");
    }

    #[test]
    fn test_resolve() {
        let ctx = AppContext::new("/ws");
        assert_eq!(ctx.resolve("html"), PathBuf::from("/ws/html"));
        assert_eq!(ctx.resolve("/abs"), PathBuf::from("/abs"));
    }
}
