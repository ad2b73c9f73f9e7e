//! HTML page generation.
//!
//! Takes a built [`Catalog`] and writes the static pages into the output
//! root.
//!
//! ## Generated Pages
//!
//! - **Index page** (`<prefix>index.html`): the three categories with counts
//! - **Category pages** (`<prefix><Category>.html`): a card per pattern with
//!   thumbnail, title and summary, plus category navigation and search
//! - **Detail pages** (`<prefix><slug>.html`): one per pattern. A slug that
//!   names a listing page (`index`, `creational`, ...) gets a `-pattern`
//!   suffix so the listing page is never overwritten.
//!
//! ## Client-side rendering
//!
//! Detail pages do not contain rendered Markdown. The raw source document is
//! embedded as a JSON string in `<script id="md-data" type="application/json">`
//! and the linked renderer script turns it into HTML in the browser, with
//! sanitization and highlighting done there. The class diagram, when present,
//! is embedded separately in a `div.mermaid` block.
//!
//! ## Failure handling
//!
//! A page that cannot be written is recorded in [`GenerateReport::failures`]
//! and logged; the remaining pages are still written. Two patterns with the
//! same slug write to the same detail page: the later one in catalog order
//! wins, and the collision is logged and reported.
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.

use crate::config::{PagesConfig, SiteConfig};
use crate::types::{Catalog, Category, CategoryBucket, PatternEntry, Thumbnail};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A page that could not be produced.
#[derive(Debug)]
pub struct PageFailure {
    pub path: PathBuf,
    pub error: GenerateError,
}

/// Patterns whose titles slugify to the same detail page.
#[derive(Debug, Clone, PartialEq)]
pub struct SlugCollision {
    pub slug: String,
    /// Pattern folders in write order; the last one's page survives.
    pub folders: Vec<PathBuf>,
}

impl SlugCollision {
    pub fn survivor(&self) -> Option<&PathBuf> {
        self.folders.last()
    }
}

/// What a generation run produced.
#[derive(Debug, Default)]
pub struct GenerateReport {
    pub written: Vec<PathBuf>,
    pub failures: Vec<PageFailure>,
    pub collisions: Vec<SlugCollision>,
}

impl GenerateReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

const CDN_SCRIPTS: &[&str] = &[
    "https://cdn.jsdelivr.net/npm/marked/marked.min.js",
    "https://cdnjs.cloudflare.com/ajax/libs/dompurify/2.4.0/purify.min.js",
    "https://cdnjs.cloudflare.com/ajax/libs/highlight.js/11.8.0/highlight.min.js",
    "https://cdn.jsdelivr.net/npm/mermaid/dist/mermaid.min.js",
];
const HIGHLIGHT_CSS: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/highlight.js/11.8.0/styles/github-dark.min.css";

/// Filters the cards by title as the user types.
const SEARCH_SCRIPT: &str = "(e=>{const q=e.value.toLowerCase();document.querySelectorAll('.card').forEach(c=>{const t=(c.getAttribute('data-title')||'').toLowerCase();c.style.display=t.includes(q)?'block':'none'})})(this)";

const NO_SUMMARY: &str = "No summary available.";
const THUMB_SIZES: &str = "(max-width: 600px) 320px, 800px";

/// File name of a category's listing page.
pub fn category_page_name(pages: &PagesConfig, category: Category) -> String {
    pages.page_name(category.name())
}

/// File name of the index page.
pub fn index_page_name(pages: &PagesConfig) -> String {
    pages.page_name("index")
}

/// Suffix for detail pages whose slug would reuse a listing page's name.
const RESERVED_SLUG_SUFFIX: &str = "-pattern";

/// Whether `stem` names the index or a category page, ignoring case.
fn is_listing_stem(stem: &str) -> bool {
    stem.eq_ignore_ascii_case("index")
        || Category::ALL
            .iter()
            .any(|c| stem.eq_ignore_ascii_case(c.name()))
}

/// File name of a pattern's detail page.
pub fn detail_page_name(pages: &PagesConfig, slug: &str) -> String {
    if is_listing_stem(slug) {
        pages.page_name(&format!("{slug}{RESERVED_SLUG_SUFFIX}"))
    } else {
        pages.page_name(slug)
    }
}

/// Write every page for `catalog` into `output_dir`.
///
/// Only failing to create `output_dir` itself is an error; individual page
/// failures are collected in the report.
pub fn generate(
    catalog: &Catalog,
    output_dir: &Path,
    config: &SiteConfig,
) -> Result<GenerateReport, GenerateError> {
    fs::create_dir_all(output_dir)?;
    let pages = &config.pages;
    let mut report = GenerateReport {
        collisions: find_collisions(catalog),
        ..GenerateReport::default()
    };

    for collision in &report.collisions {
        warn!(
            slug = %collision.slug,
            folders = ?collision.folders,
            survivor = ?collision.survivor(),
            "patterns share a detail page, the last one written wins"
        );
    }

    let index_path = output_dir.join(index_page_name(pages));
    record(&mut report, index_path, Ok(render_index_page(catalog, pages)));

    for bucket in &catalog.buckets {
        let path = output_dir.join(category_page_name(pages, bucket.category));
        record(&mut report, path, Ok(render_category_page(bucket, pages)));
    }

    for entry in catalog.entries() {
        let path = output_dir.join(&entry.detail_url);
        record(&mut report, path, render_detail_page(entry, pages));
    }

    info!(
        written = report.written.len(),
        failed = report.failures.len(),
        "pages generated"
    );
    Ok(report)
}

/// Write one rendered page, recording success or failure.
fn record(report: &mut GenerateReport, path: PathBuf, page: Result<Markup, GenerateError>) {
    let result = page.and_then(|markup| write_page(&path, markup));
    match result {
        Ok(()) => report.written.push(path),
        Err(error) => {
            warn!(path = %path.display(), error = %error, "page not written");
            report.failures.push(PageFailure { path, error });
        }
    }
}

fn write_page(path: &Path, markup: Markup) -> Result<(), GenerateError> {
    fs::write(path, markup.into_string()).map_err(|source| GenerateError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Group entries by detail URL; any URL with more than one entry collides.
pub fn find_collisions(catalog: &Catalog) -> Vec<SlugCollision> {
    let mut by_url: BTreeMap<&str, (&str, Vec<PathBuf>)> = BTreeMap::new();
    for entry in catalog.entries() {
        by_url
            .entry(entry.detail_url.as_str())
            .or_insert_with(|| (entry.slug.as_str(), Vec::new()))
            .1
            .push(entry.folder.clone());
    }
    by_url
        .into_values()
        .filter(|(_, folders)| folders.len() > 1)
        .map(|(slug, folders)| SlugCollision {
            slug: slug.to_string(),
            folders,
        })
        .collect()
}

/// JSON string literal safe to place inside a `<script>` element.
pub fn script_json(text: &str) -> Result<String, serde_json::Error> {
    Ok(serde_json::to_string(text)?.replace("</", "<\\/"))
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(title: &str, head: Markup, body_class: Option<&str>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width,initial-scale=1";
                title { (title) }
                (head)
            }
            body class=[body_class] {
                (content)
            }
        }
    }
}

fn stylesheets(hrefs: &[String]) -> Markup {
    html! {
        @for href in hrefs {
            link rel="stylesheet" href=(href);
        }
    }
}

/// Category navigation, marking `current` active.
pub fn render_category_nav(pages: &PagesConfig, current: Option<Category>) -> Markup {
    html! {
        ul.cat-list {
            @for category in Category::ALL {
                li {
                    a.cat-btn.active[current == Some(category)]
                        href=(category_page_name(pages, category))
                        data-cat=(category.name()) {
                        (category.name())
                    }
                }
            }
        }
    }
}

fn render_thumbnail(title: &str, thumb: &Thumbnail) -> Markup {
    let alt = format!("{title} image");
    html! {
        div.thumb-wrap {
            @match (&thumb.svg, thumb.srcset()) {
                (Some(svg), Some(srcset)) => {
                    picture {
                        source srcset=(svg) type="image/svg+xml";
                        img.thumb src=(thumb.src) srcset=(srcset) sizes=(THUMB_SIZES) alt=(alt);
                    }
                }
                (None, Some(srcset)) => {
                    img.thumb src=(thumb.src) srcset=(srcset) sizes=(THUMB_SIZES) alt=(alt);
                }
                _ => {
                    img.thumb src=(thumb.src) alt=(alt);
                }
            }
        }
    }
}

/// Renders one pattern card
fn render_card(entry: &PatternEntry, category: Category) -> Markup {
    html! {
        article.card data-cat=(category.name()) data-title=(entry.title) tabindex="0" data-href=(entry.detail_url) {
            a.card-link href=(entry.detail_url) {
                (render_thumbnail(&entry.title, &entry.image))
                h3 { (entry.title) }
            }
            div.intent {
                @if entry.summary.is_empty() {
                    (NO_SUMMARY)
                } @else {
                    (entry.summary)
                }
            }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders a category listing page
pub fn render_category_page(bucket: &CategoryBucket, pages: &PagesConfig) -> Markup {
    let title = format!("{} Patterns", bucket.category);
    let head = html! {
        (stylesheets(&pages.stylesheets))
        @for src in &pages.scripts {
            script defer src=(src) {}
        }
    };

    let content = html! {
        div.container {
            aside.sidebar {
                div.brand { "Design Patterns" }
                div.search {
                    input oninput=(SEARCH_SCRIPT) placeholder="Search patterns...";
                }
                nav {
                    (render_category_nav(pages, Some(bucket.category)))
                }
            }
            main.main {
                div.header { h1 { (title) } }
                article {
                    section.panel {
                        div.pattern-list-grid {
                            @for entry in &bucket.entries {
                                (render_card(entry, bucket.category))
                            }
                        }
                    }
                }
            }
        }
    };

    base_document(&title, head, None, content)
}

/// Renders a pattern detail page
pub fn render_detail_page(entry: &PatternEntry, pages: &PagesConfig) -> Result<Markup, GenerateError> {
    let payload = script_json(&entry.source_document)?;
    let page_title = format!("{} - Design Patterns", entry.title);
    let head = html! {
        (stylesheets(&pages.stylesheets))
        (stylesheets(&pages.detail_stylesheets))
        link rel="stylesheet" href=(HIGHLIGHT_CSS);
    };

    let content = html! {
        div.page {
            a.back-button href=(index_page_name(pages)) { "← Back to Patterns" }
            div.pattern-header {
                div.breadcrumb { "Design Patterns" }
                h1 { (entry.title) }
            }
            div.pattern-container {
                aside.pattern-toc {
                    h4 { "Contents" }
                    ul id="toc-list" {}
                }
                div.pattern-main {
                    @if let Some(diagram) = &entry.class_diagram {
                        div.uml-section {
                            h2 { "Class Diagram" }
                            div.mermaid { (diagram) }
                            div.uml-caption { "UML Class Diagram for " (entry.title) }
                        }
                    }
                    article.markdown-body id="content" {}
                }
            }
        }
        @for src in CDN_SCRIPTS {
            script src=(src) {}
        }
        script id="md-data" type="application/json" { (PreEscaped(payload)) }
        script src=(pages.renderer_script) {}
    };

    Ok(base_document(&page_title, head, Some("pattern-page"), content))
}

/// Renders the index page linking each category
pub fn render_index_page(catalog: &Catalog, pages: &PagesConfig) -> Markup {
    let head = stylesheets(&pages.stylesheets);
    let content = html! {
        div.container {
            main.main {
                div.header { h1 { "Design Patterns" } }
                ul.category-index {
                    @for bucket in &catalog.buckets {
                        li {
                            a href=(category_page_name(pages, bucket.category)) {
                                (bucket.category.name())
                            }
                            " "
                            span.count { "(" (bucket.entries.len()) ")" }
                        }
                    }
                }
            }
        }
    };
    base_document("Design Patterns", head, None, content)
}

// ============================================================================
// Tests
// ============================================================================
