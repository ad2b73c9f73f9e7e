//! Name derivation shared by every stage.
//!
//! Small functions deciding how a pattern is named on screen and on disk:
//!
//! - [`slugify`]: the file-safe identifier used for page names and thumbnails.
//!   `Factory Pattern` → `factory-pattern`.
//! - [`folder_display_title`]: the fallback title when a pattern folder has
//!   no document. `chain_of-responsibility` → `chain of responsibility`.
//! - [`strip_reference_suffix`]: removes the `— Interview Reference` tail
//!   that the reference documents carry in their headings.
//! - [`href_for`]: forward-slash links relative to the output root.

use regex::Regex;
use std::path::{Component, Path};
use std::sync::LazyLock;

static REFERENCE_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*[—-]\s*Interview Reference\b").expect("valid regex")
});

/// Turn a title into a slug.
///
/// - ASCII letters and digits are kept and lower-cased
/// - Every run of other characters becomes a single dash
/// - Leading and trailing dashes are stripped
///
/// Slugifying a slug returns it unchanged.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Display title for a folder name: `-` and `_` become spaces.
pub fn folder_display_title(name: &str) -> String {
    name.replace(['-', '_'], " ").trim().to_string()
}

/// Remove the `— Interview Reference` / `- Interview Reference` suffix.
pub fn strip_reference_suffix(text: &str) -> String {
    REFERENCE_SUFFIX_RE.replace_all(text, "").trim().to_string()
}

/// Forward-slash href of `path` relative to `root`.
///
/// Paths outside `root` are returned as given, so a relative source tree
/// next to the output root (`LLD/DesignPattern/...` under `.`) keeps its
/// relative form.
pub fn href_for(path: &Path, root: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
