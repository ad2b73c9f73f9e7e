//! Pattern metadata extraction.
//!
//! Each pattern folder may carry two documents:
//!
//! - `PatternReference.md`: the curated interview reference. Preferred.
//! - `README.md`: the free-form notes next to the code.
//!
//! ## Resolution
//!
//! - **Title**: first non-empty line of the reference, else of the README,
//!   with any leading `#` marks removed; else the folder name with `-` and
//!   `_` turned into spaces.
//! - **Summary**: first paragraph after the title line in the same
//!   document. Headings separate paragraphs and never form one. Empty when
//!   the folder has no document.
//! - Both have the `— Interview Reference` suffix removed.
//!
//! A missing document is the common case, not an error: [`read_optional`]
//! maps `NotFound` to `Ok(None)`. Any other read failure comes back as a
//! [`MetadataError`], which [`extract`] logs before treating the document as
//! absent.

use crate::naming::{folder_display_title, strip_reference_suffix};
use regex::Regex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;
use tracing::warn;

pub const REFERENCE_FILE: &str = "PatternReference.md";
pub const README_FILE: &str = "README.md";
/// Class diagram document, relative to the pattern folder.
pub const CLASS_DIAGRAM_FILE: &str = "UML/ClassDiagram.md";

static MERMAID_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```mermaid\r?\n([\s\S]*?)```").expect("valid regex"));

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A document found in a pattern folder.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceDocument {
    pub path: PathBuf,
    pub text: String,
}

/// Title, summary and raw document for one pattern folder.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternMetadata {
    pub title: String,
    pub summary: String,
    /// The document the title and summary came from.
    pub source: Option<SourceDocument>,
}

/// Read a file that may legitimately be absent.
pub fn read_optional(path: &Path) -> Result<Option<String>, MetadataError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(MetadataError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Like [`read_optional`], but logs read failures and returns `None`.
pub fn read_or_log(path: &Path) -> Option<String> {
    read_optional(path).unwrap_or_else(|err| {
        warn!(error = %err, "treating document as absent");
        None
    })
}

/// First document that exists among `PatternReference.md` and `README.md`.
pub fn find_source_document(folder: &Path) -> Option<SourceDocument> {
    [REFERENCE_FILE, README_FILE].iter().find_map(|name| {
        let path = folder.join(name);
        read_or_log(&path).map(|text| SourceDocument { path, text })
    })
}

/// Extract title and summary for a pattern folder. Never fails.
pub fn extract(folder: &Path) -> PatternMetadata {
    let source = find_source_document(folder);

    let (title, summary) = match &source {
        Some(doc) => {
            let (title, rest) = split_title(&doc.text);
            let title = title.unwrap_or_else(|| folder_name_title(folder));
            (title, first_paragraph(rest))
        }
        None => (folder_name_title(folder), String::new()),
    };

    PatternMetadata {
        title: strip_reference_suffix(&title),
        summary: strip_reference_suffix(&summary),
        source,
    }
}

fn folder_name_title(folder: &Path) -> String {
    folder
        .file_name()
        .map(|n| folder_display_title(&n.to_string_lossy()))
        .unwrap_or_default()
}

/// Split off the first non-empty line as the title.
///
/// Returns the title (heading marks and reference suffix removed) and the
/// text after that line. A title line with nothing left after stripping
/// gives no title.
fn split_title(text: &str) -> (Option<String>, &str) {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        offset += line.len();
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let title = strip_reference_suffix(strip_heading_marks(trimmed));
        return (Some(title).filter(|t| !t.is_empty()), &text[offset..]);
    }
    (None, "")
}

fn strip_heading_marks(line: &str) -> &str {
    line.trim_start_matches('#').trim()
}

fn is_heading(line: &str) -> bool {
    line.starts_with('#')
}

/// First run of non-blank, non-heading lines, joined by single spaces.
fn first_paragraph(text: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || is_heading(trimmed) {
            if !lines.is_empty() {
                break;
            }
            continue;
        }
        lines.push(trimmed);
    }
    lines.join(" ")
}

/// Mermaid body of the first ```` ```mermaid ```` block in `text`.
pub fn extract_mermaid(text: &str) -> Option<String> {
    MERMAID_BLOCK_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Class diagram payload from `UML/ClassDiagram.md`, if any.
pub fn class_diagram(folder: &Path) -> Option<String> {
    read_or_log(&folder.join(CLASS_DIAGRAM_FILE)).and_then(|text| extract_mermaid(&text))
}
