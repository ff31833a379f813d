//! Manifest generation from a directory of versioned documentation.
//!
//! The directory is expected to hold one subdirectory per build:
//!
//! ```text
//! html/
//! ├── latest/      development build
//! ├── v0.2.3/      release 0.2.3
//! ├── v0.3.0/      release 0.3.0
//! └── stable -> v0.3.0
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use colored::Colorize;
use docver::{ReleaseVersion, VersionManifest, model::STABLE_SEGMENT};

use crate::ctx::AppContext;

/// Default manifest file name.
pub const DEFAULT_OUTPUT: &str = docver::model::MANIFEST_FILE;

/// Options for [`AppContext::scan`].
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Directory to scan. Falls back to `docs_dir` from the configuration.
    pub dir: Option<PathBuf>,
    /// Manifest output path. Falls back to `output`, then `versions.json`.
    pub output: Option<PathBuf>,
    /// Re-point `stable` at the newest release.
    pub link_stable: bool,
}

/// Builds a manifest from the subdirectories of `path`.
///
/// Directories named `v<major>[.<minor>[.<patch>[.<build>]]]` are releases, sorted
/// newest first; the newest one is the stable release. Every other
/// directory except `stable` is a development build, listed by name.
pub fn scan_versions(path: &Path) -> anyhow::Result<VersionManifest> {
    let mut dev = Vec::new();
    let mut released = Vec::new();

    let entries =
        fs::read_dir(path).with_context(|| format!("can not read {}", path.display()))?;
    for entry in entries {
        let entry = entry?;
        if !entry.path().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name == STABLE_SEGMENT {
            continue;
        }
        match ReleaseVersion::from_dir_name(&name) {
            Some(version) => released.push(version),
            None => dev.push(name),
        }
    }

    // `v0.3` and `v0.3.0` are separate trees and both stay listed.
    released.sort_by(|a, b| b.cmp(a));
    dev.sort();

    Ok(VersionManifest {
        stable: released.first().map(ReleaseVersion::to_string),
        dev,
        released: released.iter().map(ReleaseVersion::to_string).collect(),
    })
}

/// Writes `manifest` as JSON followed by a newline.
pub fn write_manifest(manifest: &VersionManifest, output: &Path) -> anyhow::Result<()> {
    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let mut content = serde_json::to_string(manifest)?;
    content.push('\n');
    fs::write(output, content).with_context(|| format!("Failed to write {}", output.display()))
}

/// Replaces `<path>/stable` with a relative symlink to the stable release.
///
/// Returns the link path, or `None` when nothing has been released.
pub fn link_stable(path: &Path, manifest: &VersionManifest) -> anyhow::Result<Option<PathBuf>> {
    let Some(stable) = manifest.stable.as_deref() else {
        return Ok(None);
    };
    let target = format!("{}{stable}", docver::model::RELEASE_PREFIX);
    let link = path.join(STABLE_SEGMENT);

    if let Ok(meta) = fs::symlink_metadata(&link) {
        if meta.is_dir() {
            fs::remove_dir_all(&link)?;
        } else {
            fs::remove_file(&link)?;
        }
    }

    #[cfg(unix)]
    std::os::unix::fs::symlink(&target, &link)
        .with_context(|| format!("can not link {} -> {target}", link.display()))?;
    #[cfg(windows)]
    std::os::windows::fs::symlink_dir(&target, &link)
        .with_context(|| format!("can not link {} -> {target}", link.display()))?;

    Ok(Some(link))
}

impl AppContext {
    /// Scans the documentation directory and writes the manifest.
    ///
    /// # Errors
    ///
    /// Returns an error if no directory is configured, it cannot be read, or
    /// the manifest or link cannot be written.
    pub fn scan(&self, options: &ScanOptions) -> anyhow::Result<VersionManifest> {
        let dir = self.docs_dir(options.dir.as_deref())?;
        let output = match (&options.output, &self.config.output) {
            (Some(out), _) => self.resolve(out),
            (None, Some(out)) => self.resolve(out),
            (None, None) => self.resolve(DEFAULT_OUTPUT),
        };

        info!("Scanning {}", dir.display());
        let manifest = scan_versions(&dir)?;
        write_manifest(&manifest, &output)?;
        println!(
            "{}",
            format!(
                "Wrote {} ({} released, {} dev)",
                output.display(),
                manifest.released.len(),
                manifest.dev.len()
            )
            .green()
        );

        if options.link_stable || self.config.link_stable {
            match link_stable(&dir, &manifest)? {
                Some(link) => {
                    let target = fs::read_link(&link)?;
                    println!(
                        "{}",
                        format!("Linked {} -> {}", link.display(), target.display()).green()
                    );
                }
                None => warn!("No release found, not linking {STABLE_SEGMENT}"),
            }
        }

        Ok(manifest)
    }
}
