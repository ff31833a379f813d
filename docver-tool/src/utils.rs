//! Common utilities and helper functions.

use std::{path::Path, sync::LazyLock};

use regex::{Captures, Regex};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{(env:[^{}]*|workspaceFolder)\}").unwrap());

/// Replaces `${env:VAR}` and `${workspaceFolder}` placeholders.
///
/// Unset environment variables expand to an empty string. Anything else that
/// looks like a placeholder is left as is.
///
/// # Example
///
/// ```rust
/// use std::path::Path;
/// use docver_tool::utils::expand_placeholders;
///
/// let out = expand_placeholders("${workspaceFolder}/build/html", Path::new("/src/docs"));
/// assert_eq!(out, "/src/docs/build/html");
/// ```
pub fn expand_placeholders(input: &str, workspace: &Path) -> String {
    PLACEHOLDER
        .replace_all(input, |caps: &Captures| match caps[1].strip_prefix("env:") {
            Some(name) => {
                let value = std::env::var(name).unwrap_or_default();
                debug!("Using {name}={value}");
                value
            }
            None => workspace.display().to_string(),
        })
        .into_owned()
}
