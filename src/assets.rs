//! Thumbnail resolution.
//!
//! Every pattern card needs an image. In order of preference:
//!
//! 1. An image in the pattern folder with a canonical name
//!    (`cover`, `thumbnail`, `thumb`, `diagram`, `image`).
//! 2. Any other image directly in the folder.
//! 3. A synthesized SVG: a small decorative motif chosen from the title.
//!
//! Found images are copied into the thumbnail directory as `<slug>.<ext>`;
//! synthesized ones are written there as `<slug>.svg`.
//!
//! ## Motif selection
//!
//! [`MOTIF_RULES`] is an ordered list of keyword predicates. The title is
//! lower-cased and checked against each rule in turn; the first match picks
//! the motif. Order matters: `Factory Adapter` is a factory.
//! Titles matching no rule get their category's generic motif, and entries
//! without a category get the neutral one.

use crate::config::ImagesConfig;
use crate::naming::href_for;
use crate::types::{Category, Thumbnail};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Canonical thumbnail names, in preference order.
const PREFERRED_NAMES: &[&str] = &["cover", "thumbnail", "thumb", "diagram", "image"];
/// Recognized image extensions, in preference order.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "svg", "gif"];

const SVG_WIDTH: u32 = 400;
const SVG_HEIGHT: u32 = 240;

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Decorative motif drawn inside a synthesized thumbnail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motif {
    Factory,
    Adapter,
    Bridge,
    Flyweight,
    Decorator,
    Composite,
    Proxy,
    Observer,
    /// Strategy, State and Template Method share one motif.
    Behavioral,
    Chain,
    Memento,
    ObjectPool,
    Prototype,
    Builder,
    Singleton,
    /// Fallback for a known category.
    Generic(Category),
    /// Fallback when the category is unknown.
    Neutral,
}

impl Motif {
    /// SVG group for the motif, drawn in a 400×240 canvas.
    pub fn fragment(self) -> &'static str {
        match self {
            Motif::Factory => {
                r##"<g><rect x="40" y="40" width="120" height="80" rx="8" fill="#fff" stroke="#1f2937" stroke-width="3"/><rect x="180" y="56" width="120" height="48" rx="8" fill="#fff" stroke="#f97316" stroke-width="3"/></g>"##
            }
            Motif::Adapter => {
                r##"<g><rect x="40" y="56" width="80" height="56" rx="8" fill="#fff" stroke="#1f2937" stroke-width="3"/><rect x="140" y="56" width="120" height="56" rx="8" fill="#fff" stroke="#7c3aed" stroke-width="3"/></g>"##
            }
            Motif::Bridge => {
                r##"<g><rect x="40" y="56" width="120" height="56" rx="8" fill="#fff" stroke="#1f2937" stroke-width="3"/><line x1="160" y1="84" x2="240" y2="84" stroke="#1f2937" stroke-width="6" stroke-linecap="round"/></g>"##
            }
            Motif::Flyweight => {
                r##"<g><circle cx="100" cy="84" r="28" fill="#fff" stroke="#1f2937" stroke-width="3"/><circle cx="160" cy="84" r="16" fill="#fff" stroke="#1f2937" stroke-width="2"/></g>"##
            }
            Motif::Decorator => {
                r##"<g><rect x="36" y="48" width="220" height="88" rx="8" fill="#fff" stroke="#1f2937" stroke-width="2.5"/><rect x="56" y="64" width="40" height="56" rx="6" fill="#fff" stroke="#1f2937" stroke-width="1.8"/></g>"##
            }
            Motif::Composite => {
                r##"<g><rect x="60" y="60" width="60" height="40" rx="6" fill="#fff" stroke="#1f2937" stroke-width="2.5"/><rect x="140" y="60" width="90" height="40" rx="6" fill="#fff" stroke="#1f2937" stroke-width="2.5"/></g>"##
            }
            Motif::Proxy => {
                r##"<g><rect x="60" y="60" width="120" height="60" rx="8" fill="#fff" stroke="#1f2937" stroke-width="2.5"/><rect x="200" y="60" width="60" height="60" rx="8" fill="#fff" stroke="#1f2937" stroke-width="1.8" opacity="0.9"/></g>"##
            }
            Motif::Observer => {
                r##"<g><ellipse cx="110" cy="88" rx="44" ry="28" fill="#fff" stroke="#1f2937" stroke-width="2.5"/><circle cx="230" cy="88" r="8" fill="#fff" stroke="#1f2937" stroke-width="2"/></g>"##
            }
            Motif::Behavioral => {
                r##"<g><rect x="48" y="60" width="48" height="56" rx="6" fill="#fff" stroke="#dbeafe"/><rect x="112" y="60" width="48" height="56" rx="6" fill="#fff" stroke="#e6eefc"/></g>"##
            }
            Motif::Chain => {
                r##"<g><rect x="40" y="76" width="48" height="28" rx="6" fill="#fff" stroke="#93c5fd"/><rect x="96" y="76" width="48" height="28" rx="6" fill="#fff" stroke="#a78bfa"/></g>"##
            }
            Motif::Memento => {
                r##"<g><rect x="56" y="56" width="80" height="64" rx="6" fill="#fff6f8" stroke="#fb7185" stroke-width="2"/><rect x="156" y="76" width="36" height="28" rx="6" fill="#fff" stroke="#e11d48" stroke-width="1.5"/></g>"##
            }
            Motif::ObjectPool => {
                r##"<g><rect x="40" y="64" width="48" height="44" rx="6" fill="#fff" stroke="#dbeafe"/><rect x="100" y="64" width="48" height="44" rx="6" fill="#fff" stroke="#e6eefc"/></g>"##
            }
            Motif::Prototype => {
                r##"<g><rect x="60" y="64" width="60" height="48" rx="6" fill="#fff" stroke="#1e40af" stroke-width="2"/><rect x="136" y="64" width="36" height="36" rx="6" fill="#fff" stroke="#2563eb" stroke-width="1.5" opacity="0.95"/></g>"##
            }
            Motif::Builder => {
                r##"<g><rect x="48" y="56" width="40" height="56" rx="6" fill="#fff" stroke="#c7d2fe"/><rect x="104" y="56" width="40" height="56" rx="6" fill="#fff" stroke="#e6eefc"/></g>"##
            }
            Motif::Singleton => {
                r##"<g><circle cx="180" cy="88" r="40" fill="#fff" stroke="#7c3aed" stroke-width="2"/><circle cx="180" cy="88" r="12" fill="#eef2ff" stroke="#7c3aed" stroke-width="1"/></g>"##
            }
            Motif::Generic(Category::Creational) => {
                r##"<g><rect x="40" y="60" width="120" height="80" rx="8" fill="#fff6f7" stroke="#fb923c" stroke-width="2"/></g>"##
            }
            Motif::Generic(Category::Structural) => {
                r##"<g><rect x="40" y="60" width="120" height="80" rx="8" fill="#f8fbff" stroke="#2563eb" stroke-width="2"/></g>"##
            }
            Motif::Generic(Category::Behavioral) => {
                r##"<g><rect x="40" y="60" width="120" height="80" rx="8" fill="#f5fdfb" stroke="#0d9488" stroke-width="2"/></g>"##
            }
            Motif::Neutral => {
                r##"<g><rect x="40" y="60" width="80" height="50" rx="8" fill="#fff" stroke="#1e293b" stroke-width="1.5"/></g>"##
            }
        }
    }
}

/// Keyword predicate over a lower-cased title.
#[derive(Debug, Clone, Copy)]
pub enum Keywords {
    /// Matches when the title contains any of the keywords.
    Any(&'static [&'static str]),
    /// Matches when the title contains all of the keywords.
    All(&'static [&'static str]),
}

impl Keywords {
    pub fn matches(self, lower_title: &str) -> bool {
        match self {
            Keywords::Any(words) => words.iter().any(|w| lower_title.contains(w)),
            Keywords::All(words) => words.iter().all(|w| lower_title.contains(w)),
        }
    }
}

/// Ordered motif rules. First match wins.
pub const MOTIF_RULES: &[(Keywords, Motif)] = &[
    (Keywords::Any(&["factory"]), Motif::Factory),
    (Keywords::Any(&["adapter"]), Motif::Adapter),
    (Keywords::Any(&["bridge"]), Motif::Bridge),
    (Keywords::Any(&["flyweight"]), Motif::Flyweight),
    (Keywords::Any(&["decorator"]), Motif::Decorator),
    (Keywords::Any(&["composite"]), Motif::Composite),
    (Keywords::Any(&["proxy"]), Motif::Proxy),
    (Keywords::Any(&["observer"]), Motif::Observer),
    (
        Keywords::Any(&["strategy", "state", "template"]),
        Motif::Behavioral,
    ),
    (Keywords::Any(&["chain", "responsibil"]), Motif::Chain),
    (Keywords::Any(&["memento"]), Motif::Memento),
    (Keywords::All(&["object", "pool"]), Motif::ObjectPool),
    (Keywords::Any(&["prototype"]), Motif::Prototype),
    (Keywords::Any(&["builder"]), Motif::Builder),
    (Keywords::Any(&["singleton"]), Motif::Singleton),
];

/// Pick the motif for a title. Exactly one motif per title.
pub fn select_motif(title: &str, category: Option<Category>) -> Motif {
    let lower = title.to_lowercase();
    MOTIF_RULES
        .iter()
        .find(|(keywords, _)| keywords.matches(&lower))
        .map(|&(_, motif)| motif)
        .unwrap_or(match category {
            Some(c) => Motif::Generic(c),
            None => Motif::Neutral,
        })
}

/// Full SVG document for a synthesized thumbnail.
pub fn render_svg(title: &str, motif: Motif) -> String {
    let text = html_escape::encode_text(title);
    format!(
        r##"<?xml version="1.0" encoding="utf-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">
  <rect width="100%" height="100%" fill="#f8fafc" rx="12"/>
  <g transform="translate(0,12)">{motif}</g>
  <text x="24" y="{text_y}" font-family="Merriweather, Georgia, serif" font-size="16" fill="#0f172a">{text}</text>
</svg>
"##,
        w = SVG_WIDTH,
        h = SVG_HEIGHT,
        text_y = SVG_HEIGHT - 28,
        motif = motif.fragment(),
    )
}

/// Result of writing a synthesized thumbnail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotifWrite {
    Written,
    /// An SVG already existed and regeneration is disabled.
    Kept,
}

/// Write a motif SVG to `dest`, honoring `regenerate`.
pub fn write_motif_svg(
    dest: &Path,
    title: &str,
    category: Option<Category>,
    regenerate: bool,
) -> Result<MotifWrite, AssetError> {
    if !regenerate && dest.exists() {
        return Ok(MotifWrite::Kept);
    }
    let svg = render_svg(title, select_motif(title, category));
    let write = || -> io::Result<()> {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(dest, svg)
    };
    write().map_err(|source| AssetError::Write {
        path: dest.to_path_buf(),
        source,
    })?;
    Ok(MotifWrite::Written)
}

/// Locate an existing image in a pattern folder.
///
/// Canonical names first (name order, then extension order), then any image
/// file in sorted order, trying extensions in preference order.
pub fn find_existing_image(folder: &Path) -> Option<PathBuf> {
    for name in PREFERRED_NAMES {
        for ext in IMAGE_EXTENSIONS {
            let candidate = folder.join(format!("{name}.{ext}"));
            if candidate.is_file() {
                return Some(candidate);
            }
        }
    }

    let mut files: Vec<PathBuf> = fs::read_dir(folder)
        .ok()?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .collect();
    files.sort();

    IMAGE_EXTENSIONS.iter().find_map(|ext| {
        files
            .iter()
            .find(|p| {
                p.extension()
                    .map(|e| e.to_string_lossy().eq_ignore_ascii_case(ext))
                    .unwrap_or(false)
            })
            .cloned()
    })
}

/// Resolves thumbnails into the configured image directory.
#[derive(Debug, Clone, Copy)]
pub struct AssetResolver<'a> {
    config: &'a ImagesConfig,
    output_root: &'a Path,
}

impl<'a> AssetResolver<'a> {
    pub fn new(config: &'a ImagesConfig, output_root: &'a Path) -> Self {
        Self {
            config,
            output_root,
        }
    }

    /// Thumbnail directory on disk.
    pub fn image_dir(&self) -> PathBuf {
        self.output_root.join(&self.config.dir)
    }

    fn href(&self, file_name: &str) -> String {
        format!("{}/{}", self.config.dir.trim_end_matches('/'), file_name)
    }

    /// Resolve the thumbnail for one pattern. Never fails: every failure
    /// degrades to the next option and is logged.
    pub fn resolve(
        &self,
        folder: &Path,
        title: &str,
        slug: &str,
        category: Option<Category>,
    ) -> Thumbnail {
        let src = match find_existing_image(folder) {
            Some(found) => self.copy_existing(&found, slug),
            None => self.synthesize(title, slug, category),
        };
        self.with_variants(src, slug)
    }

    fn copy_existing(&self, found: &Path, slug: &str) -> String {
        let ext = found
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        let file_name = format!("{slug}.{ext}");
        let dest = self.image_dir().join(&file_name);
        let copy = || -> io::Result<()> {
            fs::create_dir_all(self.image_dir())?;
            fs::copy(found, &dest).map(|_| ())
        };
        match copy() {
            Ok(()) => {
                debug!(from = %found.display(), to = %dest.display(), "copied thumbnail");
                self.href(&file_name)
            }
            Err(source) => {
                let err = AssetError::Copy {
                    from: found.to_path_buf(),
                    to: dest,
                    source,
                };
                warn!(error = %err, "linking the original image instead");
                href_for(found, self.output_root)
            }
        }
    }

    fn synthesize(&self, title: &str, slug: &str, category: Option<Category>) -> String {
        let file_name = format!("{slug}.svg");
        let dest = self.image_dir().join(&file_name);
        match write_motif_svg(&dest, title, category, self.config.regenerate_motifs) {
            Ok(outcome) => {
                debug!(path = %dest.display(), ?outcome, "motif thumbnail");
                self.href(&file_name)
            }
            Err(err) => {
                warn!(error = %err, "using placeholder thumbnail");
                self.config.placeholder.clone()
            }
        }
    }

    /// Attach a pre-rendered PNG pair (and the SVG beside it) when present.
    fn with_variants(&self, src: String, slug: &str) -> Thumbnail {
        let dir = self.image_dir();
        let small = format!("png/{slug}.png");
        let large = format!("png/{slug}@2x.png");
        if !(dir.join(&small).is_file() && dir.join(&large).is_file()) {
            return Thumbnail::plain(src);
        }
        let svg_name = format!("{slug}.svg");
        let svg = dir
            .join(&svg_name)
            .is_file()
            .then(|| self.href(&svg_name));
        Thumbnail {
            src: self.href(&small),
            png_pair: Some((self.href(&small), self.href(&large))),
            svg,
        }
    }
}
