//! Version picker and banner rendering.
//!
//! The picker gets one `<dd><a href=..>tag</a></dd>` entry per known
//! version: development builds first, then releases, each in manifest order.
//! The banner is decorated only when the viewed version is not the stable
//! release.

use crate::{
    dom::{Document, Element},
    error::RenderError,
    model::{Config, RELEASE_PREFIX, VersionManifest, ViewKind},
};

/// Selector of the version picker list.
pub const VERSION_LIST_SELECTOR: &str = ".rst-other-versions dl";

/// Selector of the banner element.
pub const VERSION_BANNER_SELECTOR: &str = ".version-banner";

const STABLE_SUFFIX: &str = " (stable)";
const DEV_NOTICE: &str = "You are viewing the documentation for the development version. ";
const OUTDATED_NOTICE: &str = "You are viewing the documentation for an old version. ";

/// What a render pass did to the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderReport {
    /// Number of entries appended to the version picker.
    pub entries: usize,
    /// How the viewed version was classified.
    pub view: ViewKind,
}

/// Builds a single version picker entry.
pub fn build_version_entry(tag: &str, url: &str, is_stable: bool) -> Element {
    let mut label = tag.to_string();
    if is_stable {
        label.push_str(STABLE_SUFFIX);
    }
    let link = Element::new("a").with_attribute("href", url).with_text(label);
    Element::new("dd").with_child(link)
}

/// Link to the stable documentation, labelled with the stable tag.
pub fn build_stable_link(config: &Config, stable: &str) -> Element {
    Element::new("a")
        .with_attribute("href", config.stable_url())
        .with_text(format!("Go to the latest stable version ({stable})."))
}

/// Picker entries in display order: dev builds, then releases.
///
/// Dev tags match `stable` only when spelled identically; release tags also
/// match with the `v` prefix dropped.
pub fn version_entries(config: &Config, manifest: &VersionManifest) -> Vec<Element> {
    let dev = manifest.dev.iter().map(|tag| {
        let is_stable = manifest.stable.as_deref() == Some(tag.as_str());
        build_version_entry(tag, &config.version_url(tag), is_stable)
    });
    let released = manifest.released.iter().map(|tag| {
        let url = config.version_url(&format!("{RELEASE_PREFIX}{tag}"));
        build_version_entry(tag, &url, manifest.is_stable(tag))
    });
    dev.chain(released).collect()
}

/// Writes the version picker and banner into `document`.
///
/// Both target elements are looked up before anything is modified, so a
/// missing element leaves the document untouched.
pub fn render(
    config: &Config,
    manifest: &VersionManifest,
    document: &mut Document,
) -> Result<RenderReport, RenderError> {
    for selector in [VERSION_LIST_SELECTOR, VERSION_BANNER_SELECTOR] {
        if document.query_selector(selector).is_none() {
            return Err(RenderError::MissingElement {
                selector: selector.to_string(),
            });
        }
    }

    let entries = version_entries(config, manifest);
    let count = entries.len();
    let list = document
        .query_selector_mut(VERSION_LIST_SELECTOR)
        .ok_or_else(|| missing(VERSION_LIST_SELECTOR))?;
    for entry in entries {
        list.append_child(entry);
    }

    let view = manifest.classify(&config.current_version);
    let banner = document
        .query_selector_mut(VERSION_BANNER_SELECTOR)
        .ok_or_else(|| missing(VERSION_BANNER_SELECTOR))?;
    decorate_banner(banner, config, manifest, view);

    debug!(
        "rendered {count} versions, viewing {} as {view:?}",
        config.current_version
    );
    Ok(RenderReport {
        entries: count,
        view,
    })
}

fn missing(selector: &str) -> RenderError {
    RenderError::MissingElement {
        selector: selector.to_string(),
    }
}

fn decorate_banner(
    banner: &mut Element,
    config: &Config,
    manifest: &VersionManifest,
    view: ViewKind,
) {
    let Some(marker) = view.marker() else {
        return;
    };
    banner.add_class(marker);
    let stable = manifest.stable.as_deref();
    match view {
        ViewKind::Development => {
            banner.append_child(DEV_NOTICE);
            if let Some(stable) = stable {
                banner.append_child(build_stable_link(config, stable));
            }
        }
        // An outdated page always points at `stable`, even if the manifest
        // forgot to name it.
        _ => {
            banner.append_child(OUTDATED_NOTICE);
            banner.append_child(build_stable_link(config, stable.unwrap_or_default()));
        }
    }
}
