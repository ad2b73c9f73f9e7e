//! Reference document scaffolding.
//!
//! Creates a templated `PatternReference.md` for every classified pattern
//! folder that lacks one. The template has a fixed set of section headings;
//! the problem statement and the code example are lifted from the folder's
//! README when it has them.
//!
//! Existing reference documents are never touched: files are opened with
//! `create_new`, so a document that appears between the check and the write
//! is skipped too.

use crate::config::UnclassifiedPolicy;
use crate::metadata::{self, README_FILE, REFERENCE_FILE};
use crate::scan::Scanner;
use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag, TagEnd};
use regex::Regex;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;
use tracing::{debug, info, warn};

static PARAGRAPH_BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("valid regex"));

pub const NO_OVERVIEW: &str = "No overview available.";
const NO_README_CODE: &str = "```java\n// Example not available.\n```";
const NO_EXAMPLE_CODE: &str = "```java\n// Example not provided in README.\n```";
const MIN_OVERVIEW_CHARS: usize = 20;

#[derive(Error, Debug)]
pub enum ScaffoldError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// A reference document that could not be written.
#[derive(Debug)]
pub struct ScaffoldFailure {
    pub path: PathBuf,
    pub error: ScaffoldError,
}

#[derive(Debug, Default)]
pub struct ScaffoldReport {
    pub created: Vec<PathBuf>,
    /// Folders that already had a reference document.
    pub existing: Vec<PathBuf>,
    pub failures: Vec<ScaffoldFailure>,
}

/// First paragraph longer than 20 characters, on one line.
///
/// Heading-only paragraphs are skipped.
pub fn extract_overview(text: &str) -> String {
    PARAGRAPH_BREAK_RE
        .split(text.trim())
        .map(str::trim)
        .filter(|p| !p.starts_with('#'))
        .find(|p| p.chars().count() > MIN_OVERVIEW_CHARS)
        .map(|p| p.replace("\r\n", " ").replace('\n', " "))
        .unwrap_or_else(|| NO_OVERVIEW.to_string())
}

/// First fenced code block in `text`, re-fenced with its info string.
pub fn extract_code_block(text: &str) -> Option<String> {
    let mut lang: Option<String> = None;
    let mut body = String::new();

    for event in Parser::new(text) {
        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) if lang.is_none() => {
                lang = Some(info.to_string());
            }
            Event::Text(t) if lang.is_some() => body.push_str(&t),
            Event::End(TagEnd::CodeBlock) if lang.is_some() => break,
            _ => {}
        }
    }

    lang.map(|lang| format!("```{lang}\n{}\n```", body.trim_end()))
}

/// Reference document text for a pattern folder named `name`.
pub fn render_reference(name: &str, overview: &str, code: &str) -> String {
    format!(
        "# {name} — Interview Reference

## Intent
Provide a concise intent for the {name} pattern.

## Problem Statement
{overview}

## Why Simple Code Fails
Often ad-hoc solutions (if/else, scattered constructors, tight coupling) make code hard to extend and test.

## Solution Overview
Describe how the {name} pattern solves the problem by providing structure and separation of concerns.

## Minimal Java Example
{code}

## Advantages
- Describe key advantages (decoupling, extensibility, reuse).

## Disadvantages
- Describe trade-offs (complexity, indirection, overuse).

## When NOT to Use
- Situations where the pattern is unnecessary.

## Common Mistakes
- Frequent anti-patterns or pitfalls.

## Framework / Library Usage
- Notes on common frameworks or language features.

## System Design Use Cases
- Real-world systems where this pattern helps.

## Interview One-Liner
One-line summary of the pattern.

"
    )
}

/// Reference document for one folder, from its README if any.
pub fn reference_for_folder(folder: &Path, name: &str) -> String {
    let (overview, code) = match metadata::read_or_log(&folder.join(README_FILE)) {
        Some(readme) => (
            extract_overview(&readme),
            extract_code_block(&readme).unwrap_or_else(|| NO_EXAMPLE_CODE.to_string()),
        ),
        None => (NO_OVERVIEW.to_string(), NO_README_CODE.to_string()),
    };
    render_reference(name, &overview, &code)
}

/// Write `contents` to `path` unless the file already exists.
///
/// Returns `Ok(false)` when the file was already there.
fn write_new(path: &Path, contents: &str) -> Result<bool, ScaffoldError> {
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(mut file) => {
            file.write_all(contents.as_bytes())?;
            Ok(true)
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Scaffold reference documents under `source`.
pub fn scaffold(source: &Path, policy: UnclassifiedPolicy) -> ScaffoldReport {
    let mut report = ScaffoldReport::default();

    for folder in Scanner::new(policy).scan(source) {
        let path = folder.path.join(REFERENCE_FILE);
        let contents = reference_for_folder(&folder.path, &folder.name());
        match write_new(&path, &contents) {
            Ok(true) => {
                debug!(path = %path.display(), "reference created");
                report.created.push(path);
            }
            Ok(false) => report.existing.push(path),
            Err(error) => {
                warn!(path = %path.display(), error = %error, "reference not written");
                report.failures.push(ScaffoldFailure { path, error });
            }
        }
    }

    info!(
        created = report.created.len(),
        existing = report.existing.len(),
        "reference scaffolding done"
    );
    report
}
