//! Version manifest and page configuration types.
//!
//! The manifest is the `versions.json` document published next to the
//! versioned documentation trees:
//!
//! ```json
//! {"stable": "0.3.0", "dev": ["latest"], "released": ["0.3.0", "0.2.3"]}
//! ```
//!
//! Released tags are stored bare; their documentation lives under a
//! `v`-prefixed directory (`/en/v0.3.0`).

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Path segment under which every documentation tree is published.
pub const LANGUAGE_SEGMENT: &str = "en";

/// Path segment that always points at the stable release.
pub const STABLE_SEGMENT: &str = "stable";

/// File name of the manifest, relative to the base URL.
pub const MANIFEST_FILE: &str = "versions.json";

/// Prefix of released versions in their URL path segment.
pub const RELEASE_PREFIX: &str = "v";

/// Identifies the documentation build being viewed.
///
/// Built once per page from values provided by the host page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Tag of the documentation being viewed, e.g. `"0.2.3"` or `"latest"`.
    pub current_version: String,
    /// Root URL under which the versioned documentation is published.
    pub base_url: String,
}

impl Config {
    pub fn new(current_version: impl Into<String>, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            current_version: current_version.into(),
            base_url,
        }
    }

    /// `{base_url}/versions.json`
    pub fn manifest_url(&self) -> String {
        format!("{}/{MANIFEST_FILE}", self.base_url)
    }

    /// `{base_url}/en/{segment}`
    pub fn version_url(&self, segment: &str) -> String {
        format!("{}/{LANGUAGE_SEGMENT}/{segment}", self.base_url)
    }

    /// `{base_url}/en/stable`
    pub fn stable_url(&self) -> String {
        self.version_url(STABLE_SEGMENT)
    }
}

/// All known documentation versions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionManifest {
    /// Recommended release, absent until something has been released.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub stable: Option<String>,
    /// Development builds in display order.
    pub dev: Vec<String>,
    /// Released versions (bare tags) in display order.
    pub released: Vec<String>,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

/// Relationship between the viewed version and the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    /// The viewed version is not a release.
    Development,
    /// The viewed version is a release other than the stable one.
    Outdated,
    /// The viewed version is the stable release.
    Stable,
}

impl ViewKind {
    /// Class marker added to the banner element, if any.
    pub fn marker(self) -> Option<&'static str> {
        match self {
            ViewKind::Development => Some("dev"),
            ViewKind::Outdated => Some("outdated"),
            ViewKind::Stable => None,
        }
    }
}

/// Compares two tags, ignoring a release prefix (`v0.3.0` == `0.3.0`).
pub fn same_tag(a: &str, b: &str) -> bool {
    bare_tag(a) == bare_tag(b)
}

/// Drops a leading release prefix when it is followed by a digit.
pub fn bare_tag(tag: &str) -> &str {
    match tag.strip_prefix(RELEASE_PREFIX) {
        Some(rest) if rest.starts_with(|c: char| c.is_ascii_digit()) => rest,
        _ => tag,
    }
}

impl VersionManifest {
    pub fn from_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }

    pub fn is_stable(&self, tag: &str) -> bool {
        self.stable.as_deref().is_some_and(|s| same_tag(s, tag))
    }

    pub fn is_released(&self, tag: &str) -> bool {
        self.released.iter().any(|r| same_tag(r, tag))
    }

    /// Classifies the viewed version. Anything not released counts as a
    /// development build, whether or not it is listed in `dev`.
    pub fn classify(&self, current: &str) -> ViewKind {
        if !self.is_released(current) {
            ViewKind::Development
        } else if !self.is_stable(current) {
            ViewKind::Outdated
        } else {
            ViewKind::Stable
        }
    }

    /// Number of entries the version picker will show.
    pub fn len(&self) -> usize {
        self.dev.len() + self.released.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A released version number as used in documentation directory names.
///
/// A fourth component is kept when present and sorts after the same
/// three-part version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReleaseVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub build: Option<u64>,
}

impl ReleaseVersion {
    /// Parses `v<major>[.<minor>[.<patch>[.<build>]]]`, padding missing
    /// parts up to the patch number with 0.
    ///
    /// Returns `None` for anything else, which marks the directory as a
    /// development build.
    pub fn from_dir_name(name: &str) -> Option<Self> {
        let rest = name.strip_prefix(RELEASE_PREFIX)?;
        let mut parts = Vec::with_capacity(4);
        for part in rest.split('.') {
            if parts.len() == 4 || part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            parts.push(part.parse().ok()?);
        }
        let build = parts.get(3).copied();
        parts.resize(3, 0);
        Some(Self {
            major: parts[0],
            minor: parts[1],
            patch: parts[2],
            build,
        })
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(build) = self.build {
            write!(f, ".{build}")?;
        }
        Ok(())
    }
}

/// Derives the documentation version from a git ref as exported by CI
/// (`GITHUB_REF`).
///
/// Branch builds are named after the branch; tags `v<a>.<b>.<c>` produce the
/// bare release `<a>.<b>.<c>`. Other refs yield `None`.
pub fn version_from_ref(git_ref: &str) -> Option<String> {
    if let Some(branch) = git_ref.strip_prefix("refs/heads/") {
        return Some(branch.to_string());
    }
    let tag = git_ref.strip_prefix("refs/tags/v")?;
    let parts: Vec<&str> = tag.split('.').collect();
    let well_formed = parts.len() == 3
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()));
    well_formed.then(|| tag.to_string())
}
