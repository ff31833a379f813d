use docver::{Config, Document, Element, RenderError, VersionManifest, ViewKind, render};

const BASE: &str = "https://x.io";

fn manifest(stable: Option<&str>) -> VersionManifest {
    VersionManifest {
        stable: stable.map(str::to_string),
        dev: vec!["latest".into()],
        released: vec!["0.2.3".into(), "0.3.0".into()],
    }
}

fn render_for(current: &str, manifest: &VersionManifest) -> Document {
    let mut doc = Document::rtd_skeleton();
    render(&Config::new(current, BASE), manifest, &mut doc).unwrap();
    doc
}

fn banner(doc: &Document) -> &Element {
    doc.query_selector(".version-banner").unwrap()
}

fn entries(doc: &Document) -> Vec<(String, String)> {
    doc.query_selector(".rst-other-versions dl").unwrap().links()
}

#[test]
fn outdated_release_links_to_stable() {
    let doc = render_for("v0.2.3", &manifest(Some("v0.3.0")));

    let banner = banner(&doc);
    assert_eq!(banner.classes, ["version-banner", "outdated"]);
    assert_eq!(
        banner.text_content(),
        "You are viewing the documentation for an old version. \
         Go to the latest stable version (v0.3.0)."
    );
    assert_eq!(
        banner.links(),
        [(
            "https://x.io/en/stable".to_string(),
            "Go to the latest stable version (v0.3.0).".to_string()
        )]
    );

    assert_eq!(
        entries(&doc),
        [
            ("https://x.io/en/latest".to_string(), "latest".to_string()),
            ("https://x.io/en/v0.2.3".to_string(), "0.2.3".to_string()),
            (
                "https://x.io/en/v0.3.0".to_string(),
                "0.3.0 (stable)".to_string()
            ),
        ]
    );
}

#[test]
fn development_build_links_to_stable() {
    let doc = render_for("latest", &manifest(Some("v0.3.0")));

    let banner = banner(&doc);
    assert!(banner.has_class("dev"));
    assert!(!banner.has_class("outdated"));
    assert!(
        banner
            .text_content()
            .starts_with("You are viewing the documentation for the development version. ")
    );
    assert_eq!(banner.links().len(), 1);
    assert_eq!(banner.links()[0].0, "https://x.io/en/stable");
}

#[test]
fn stable_version_leaves_banner_empty() {
    let doc = render_for("0.3.0", &manifest(Some("v0.3.0")));

    let banner = banner(&doc);
    assert_eq!(banner.classes, ["version-banner"]);
    assert!(banner.children.is_empty());
    assert_eq!(entries(&doc).len(), 3);
}

#[test]
fn development_build_without_stable_release() {
    let manifest = VersionManifest {
        stable: None,
        dev: vec!["main".into()],
        released: vec![],
    };
    let doc = render_for("main", &manifest);

    let banner = banner(&doc);
    assert!(banner.has_class("dev"));
    assert_eq!(
        banner.text_content(),
        "You are viewing the documentation for the development version. "
    );
    assert!(banner.links().is_empty());
    assert!(entries(&doc).iter().all(|(_, label)| !label.ends_with(" (stable)")));
}

#[test]
fn unknown_version_counts_as_development() {
    let doc = render_for("feature-x", &manifest(Some("0.3.0")));
    assert!(banner(&doc).has_class("dev"));
}

#[test]
fn entries_follow_manifest_order() {
    let manifest = VersionManifest {
        stable: Some("1.0.0".into()),
        dev: vec!["next".into(), "latest".into()],
        released: vec!["0.9.0".into(), "1.0.0".into(), "0.1.0".into()],
    };
    let doc = render_for("1.0.0", &manifest);

    let entries = entries(&doc);
    assert_eq!(entries.len(), manifest.dev.len() + manifest.released.len());
    let hrefs: Vec<_> = entries.iter().map(|(href, _)| href.as_str()).collect();
    assert_eq!(
        hrefs,
        [
            "https://x.io/en/next",
            "https://x.io/en/latest",
            "https://x.io/en/v0.9.0",
            "https://x.io/en/v1.0.0",
            "https://x.io/en/v0.1.0",
        ]
    );
    let stable: Vec<_> = entries
        .iter()
        .filter(|(_, label)| label.ends_with(" (stable)"))
        .collect();
    assert_eq!(stable.len(), 1);
    assert_eq!(stable[0].1, "1.0.0 (stable)");
}

#[test]
fn entries_are_appended_after_existing_children() {
    let doc = render_for("latest", &manifest(None));
    let dl = doc.query_selector(".rst-other-versions dl").unwrap();
    let tags: Vec<_> = dl.child_elements().map(|e| e.tag.as_str()).collect();
    assert_eq!(tags, ["dt", "dd", "dd", "dd"]);
}

#[test]
fn missing_banner_is_an_error() {
    let mut doc = Document::new(
        Element::new("body").with_child(
            Element::new("div")
                .with_class("rst-other-versions")
                .with_child(Element::new("dl")),
        ),
    );
    let err = render(&Config::new("latest", BASE), &manifest(None), &mut doc).unwrap_err();
    assert_eq!(
        err,
        RenderError::MissingElement {
            selector: ".version-banner".to_string()
        }
    );
}

#[test]
fn classification_matches_banner() {
    let m = manifest(Some("0.3.0"));
    assert_eq!(m.classify("0.3.0"), ViewKind::Stable);
    assert_eq!(m.classify("0.2.3"), ViewKind::Outdated);
    assert_eq!(m.classify("latest"), ViewKind::Development);
}

#[test]
fn outdated_release_without_stable_still_links() {
    let manifest = VersionManifest {
        stable: None,
        dev: vec![],
        released: vec!["1.0.0".into(), "0.9.0".into()],
    };
    let doc = render_for("0.9.0", &manifest);

    let banner = banner(&doc);
    assert_eq!(banner.classes, ["version-banner", "outdated"]);
    let links = banner.links();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].0, "https://x.io/en/stable");
}

#[test]
fn dev_build_named_like_stable_release_is_not_marked() {
    let manifest = VersionManifest {
        stable: Some("1.0".into()),
        dev: vec!["v1.0".into()],
        released: vec!["1.0".into()],
    };
    let doc = render_for("v1.0", &manifest);

    let stable: Vec<_> = entries(&doc)
        .into_iter()
        .filter(|(_, label)| label.ends_with(" (stable)"))
        .collect();
    assert_eq!(
        stable,
        [(
            "https://x.io/en/v1.0".to_string(),
            "1.0 (stable)".to_string()
        )]
    );
}
