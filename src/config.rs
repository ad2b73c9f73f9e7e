//! Generator configuration module.
//!
//! Handles loading, validating, and merging the `pattern-book.toml` file.
//! Stock defaults are the base layer; a user config file overrides only the
//! keys it names.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [scan]
//! unclassified = "warn"     # or "silent": what to do with unknown category folders
//!
//! [images]
//! dir = "tools/pattern_images"
//! regenerate_motifs = true  # overwrite synthesized SVGs on every run
//! placeholder = "tools/pattern_placeholder.svg"
//!
//! [pages]
//! prefix = "All_Design_Patterns_"
//! stylesheets = ["tools/index_style.css", "tools/patterns_responsive.css"]
//! scripts = ["tools/patterns_animations.js"]
//! detail_stylesheets = ["tools/pattern_page.css", "tools/pattern_layout.css"]
//! renderer_script = "tools/pattern_renderer.js"
//!
//! [aggregate]
//! file = "All_Design_Patterns.md"
//! diagrams_dir = "build/diagrams"
//!
//! [pdf]
//! enabled = false
//! converter = "pandoc"
//! output = "All_Design_Patterns.pdf"
//! timeout_secs = 60
//! ```
//!
//! Unknown keys are rejected to catch typos early. Nothing is read from the
//! environment.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Generator configuration loaded from `pattern-book.toml`.
///
/// All fields have defaults matching the layout the generator has always
/// produced. User config files need only specify the values they override.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Pattern directory scanning behavior.
    pub scan: ScanConfig,
    /// Thumbnail location and motif regeneration.
    pub images: ImagesConfig,
    /// HTML page naming and linked assets.
    pub pages: PagesConfig,
    /// Aggregate Markdown handbook.
    pub aggregate: AggregateConfig,
    /// External PDF conversion.
    pub pdf: PdfConfig,
}

impl SiteConfig {
    /// Validate config values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pages.prefix.trim().is_empty() {
            return Err(ConfigError::Validation(
                "pages.prefix must not be empty".into(),
            ));
        }
        if self.images.dir.trim().is_empty() {
            return Err(ConfigError::Validation("images.dir must not be empty".into()));
        }
        if self.aggregate.file.trim().is_empty() {
            return Err(ConfigError::Validation(
                "aggregate.file must not be empty".into(),
            ));
        }
        if self.pdf.output.trim().is_empty() {
            return Err(ConfigError::Validation("pdf.output must not be empty".into()));
        }
        if self.pdf.converter.trim().is_empty() {
            return Err(ConfigError::Validation(
                "pdf.converter must not be empty".into(),
            ));
        }
        if self.pdf.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "pdf.timeout_secs must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// What to do with a category folder whose name matches no known category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnclassifiedPolicy {
    /// Skip the folder and log a warning naming it.
    #[default]
    Warn,
    /// Skip the folder without any diagnostic.
    Silent,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    pub unclassified: UnclassifiedPolicy,
}

/// Thumbnail settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    /// Directory (relative to the output root) receiving copied and
    /// synthesized thumbnails.
    pub dir: String,
    /// Overwrite synthesized SVGs that already exist for a slug.
    pub regenerate_motifs: bool,
    /// Image used when a thumbnail can be neither copied nor synthesized.
    pub placeholder: String,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            dir: "tools/pattern_images".to_string(),
            regenerate_motifs: true,
            placeholder: "tools/pattern_placeholder.svg".to_string(),
        }
    }
}

/// Page naming and the assets every page links to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PagesConfig {
    /// File name prefix shared by every generated page.
    pub prefix: String,
    /// Stylesheets linked from every page.
    pub stylesheets: Vec<String>,
    /// Deferred scripts linked from listing pages.
    pub scripts: Vec<String>,
    /// Extra stylesheets linked from detail pages only.
    pub detail_stylesheets: Vec<String>,
    /// Client-side script that renders the embedded Markdown payload.
    pub renderer_script: String,
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            prefix: "All_Design_Patterns_".to_string(),
            stylesheets: vec![
                "tools/index_style.css".to_string(),
                "tools/patterns_responsive.css".to_string(),
            ],
            scripts: vec!["tools/patterns_animations.js".to_string()],
            detail_stylesheets: vec![
                "tools/pattern_page.css".to_string(),
                "tools/pattern_layout.css".to_string(),
            ],
            renderer_script: "tools/pattern_renderer.js".to_string(),
        }
    }
}

impl PagesConfig {
    /// File name of a page: `<prefix><stem>.html`.
    pub fn page_name(&self, stem: &str) -> String {
        format!("{}{}.html", self.prefix, stem)
    }
}

/// Aggregate handbook settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AggregateConfig {
    /// Output file, relative to the output root.
    pub file: String,
    /// Directory holding pre-rendered diagram images (`.svg` / `.png`).
    pub diagrams_dir: String,
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self {
            file: "All_Design_Patterns.md".to_string(),
            diagrams_dir: "build/diagrams".to_string(),
        }
    }
}

/// External document converter settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PdfConfig {
    /// Run the converter as the last step of `build`.
    pub enabled: bool,
    /// Converter executable, invoked as `<converter> <input> -o <output>`.
    pub converter: String,
    /// PDF file name, relative to the output root.
    pub output: String,
    /// Wall-clock ceiling for the converter process.
    pub timeout_secs: u64,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            converter: "pandoc".to_string(),
            output: "All_Design_Patterns.pdf".to_string(),
            timeout_secs: 60,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from the given file.
///
/// A missing file yields the stock defaults.
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `pattern-book.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Pattern Book Configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Scanning
# ---------------------------------------------------------------------------
[scan]
# Category folders are recognized by name (behavioral, creational,
# structural). Anything else is skipped:
#   "warn"   - skip and log a warning naming the folder
#   "silent" - skip without a diagnostic
unclassified = "warn"

# ---------------------------------------------------------------------------
# Thumbnails
# ---------------------------------------------------------------------------
[images]
# Where copied and synthesized thumbnails go (relative to the output root).
dir = "tools/pattern_images"

# Rewrite synthesized SVG thumbnails on every run. When false, an SVG that
# already exists for a pattern is left untouched.
regenerate_motifs = true

# Fallback image when a thumbnail can be neither copied nor synthesized.
placeholder = "tools/pattern_placeholder.svg"

# ---------------------------------------------------------------------------
# HTML pages
# ---------------------------------------------------------------------------
[pages]
# Every generated page is named <prefix><name>.html.
prefix = "All_Design_Patterns_"

# Stylesheets linked from every page.
stylesheets = ["tools/index_style.css", "tools/patterns_responsive.css"]

# Deferred scripts linked from the category listing pages.
scripts = ["tools/patterns_animations.js"]

# Extra stylesheets for the pattern detail pages.
detail_stylesheets = ["tools/pattern_page.css", "tools/pattern_layout.css"]

# Script that renders the embedded Markdown in the browser.
renderer_script = "tools/pattern_renderer.js"

# ---------------------------------------------------------------------------
# Aggregate handbook
# ---------------------------------------------------------------------------
[aggregate]
file = "All_Design_Patterns.md"

# Pre-rendered class diagrams (<name>.svg or <name>.png) are referenced
# instead of inlining the Mermaid source when present.
diagrams_dir = "build/diagrams"

# ---------------------------------------------------------------------------
# PDF conversion
# ---------------------------------------------------------------------------
[pdf]
# Run the converter at the end of `build`.
enabled = false

# Invoked as: <converter> <aggregate.file> -o <output>
converter = "pandoc"
output = "All_Design_Patterns.pdf"

# The converter is killed after this many seconds.
timeout_secs = 60
"##
}
