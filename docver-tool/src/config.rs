//! Site configuration file.
//!
//! Settings are read from `.docver.toml` (or a `.json` file passed with
//! `--config`) in the working directory. Every field is optional and
//! command-line flags take precedence.
//!
//! # Configuration File Format
//!
//! ```toml
//! base_url = "https://bite-parser.readthedocs.io"
//! docs_dir = "${workspaceFolder}/build/html"
//! output = "${workspaceFolder}/build/html/versions.json"
//! link_stable = true
//! ```

use std::path::Path;

use anyhow::{Context, bail};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// Default configuration file name, looked up in the workspace.
pub const DEFAULT_CONFIG_FILE: &str = ".docver.toml";

/// Root configuration structure.
#[derive(Default, Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct SiteConfig {
    /// Root URL under which the versioned documentation is published.
    pub base_url: Option<String>,
    /// Version of the documentation being built.
    ///
    /// Falls back to the version derived from `GITHUB_REF`, then `dev`.
    pub current_version: Option<String>,
    /// Directory holding one subdirectory per documentation version.
    pub docs_dir: Option<String>,
    /// Where `scan` writes the manifest. Defaults to `versions.json`.
    pub output: Option<String>,
    /// Point `<docs_dir>/stable` at the newest release after scanning.
    pub link_stable: bool,
    /// Request timeout for remote manifests, in seconds. No timeout if unset.
    pub timeout_secs: Option<u64>,
}

impl SiteConfig {
    /// Applies `f` to every string setting.
    pub fn map_strings(mut self, f: impl Fn(&str) -> String) -> Self {
        for value in [
            &mut self.base_url,
            &mut self.current_version,
            &mut self.docs_dir,
            &mut self.output,
        ]
        .into_iter()
        .flatten()
        {
            *value = f(value.as_str());
        }
        self
    }
}

/// JSON Schema of [`SiteConfig`], pretty printed.
pub fn schema_json() -> anyhow::Result<String> {
    let schema = schemars::schema_for!(SiteConfig);
    Ok(serde_json::to_string_pretty(&schema)?)
}

/// Parses `content` according to the file extension `ext`.
pub fn to_typed<C: DeserializeOwned>(content: &str, ext: &str) -> anyhow::Result<C> {
    let c = match ext {
        "json" => serde_json::from_str::<C>(content)?,
        "toml" => toml::from_str::<C>(content)?,
        _ => {
            bail!("unsupported config file extension: {ext}");
        }
    };
    Ok(c)
}

/// Reads a configuration file, returning `None` if it does not exist.
pub async fn read_config<C: DeserializeOwned>(path: &Path) -> anyhow::Result<Option<C>> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e).with_context(|| format!("can not open config file: {}", path.display()));
        }
    };

    let ext = path
        .extension()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let c = to_typed(&content, &ext)
        .with_context(|| format!("invalid config file: {}", path.display()))?;
    Ok(Some(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_toml() {
        let c: SiteConfig = to_typed(
            r#"
            base_url = "https://x.io"
            link_stable = true
            "#,
            "toml",
        )
        .unwrap();
        assert_eq!(c.base_url.as_deref(), Some("https://x.io"));
        assert!(c.link_stable);
        assert_eq!(c.docs_dir, None);
    }

    #[test]
    fn test_parse_json() {
        let c: SiteConfig = to_typed(r#"{"current_version": "latest"}"#, "json").unwrap();
        assert_eq!(c.current_version.as_deref(), Some("latest"));
    }

    #[test]
    fn test_unsupported_extension() {
        assert!(to_typed::<SiteConfig>("", "yaml").is_err());
    }

    #[test]
    fn test_map_strings() {
        let c = SiteConfig {
            base_url: Some("a".into()),
            output: Some("b".into()),
            ..Default::default()
        }
        .map_strings(|s| s.to_uppercase());
        assert_eq!(c.base_url.as_deref(), Some("A"));
        assert_eq!(c.output.as_deref(), Some("B"));
        assert_eq!(c.docs_dir, None);
    }

    #[test]
    fn test_schema_lists_fields() {
        let schema = schema_json().unwrap();
        assert!(schema.contains("base_url"));
        assert!(schema.contains("link_stable"));
    }

    #[tokio::test]
    async fn test_read_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        let c: Option<SiteConfig> = read_config(&dir.path().join(DEFAULT_CONFIG_FILE))
            .await
            .unwrap();
        assert!(c.is_none());
    }
}
