//! CLI output formatting for all pipeline stages.
//!
//! # Information-First Display
//!
//! Every pattern is shown by its positional index and title, with the
//! folder or file it came from as an indented context line. The output reads
//! as a content inventory while still letting users trace each entry back to
//! the source tree.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Creational (3 patterns)
//! 001 Builder
//!     Source: creationalDesign/builderPattern/PatternReference.md
//!     Separate the construction of a complex object from its...
//! 002 Factory Pattern
//!     Source: creationalDesign/factoryPattern/README.md
//!
//! Unclassified
//!     SolidPrincipal/
//! ```
//!
//! ## Pages
//!
//! ```text
//! Index → All_Design_Patterns_index.html
//! Creational → All_Design_Patterns_Creational.html
//!     001 Builder → All_Design_Patterns_builder.html
//!
//! Generated 3 category pages, 7 detail pages
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::aggregate::HandbookReport;
use crate::catalog::Inventory;
use crate::config::PagesConfig;
use crate::convert::ConversionOutcome;
use crate::generate::{GenerateReport, category_page_name, index_page_name};
use crate::naming::href_for;
use crate::scaffold::ScaffoldReport;
use crate::types::{Catalog, Category};
use std::collections::BTreeSet;
use std::path::Path;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Category header with pattern count.
///
/// ```text
/// Creational (3 patterns)
/// Structural (1 pattern)
/// ```
fn category_header(category: Category, count: usize) -> String {
    let noun = if count == 1 { "pattern" } else { "patterns" };
    format!("{} ({} {})", category, count, noun)
}

/// Truncate to `max` characters, appending `...` when cut.
fn truncate_desc(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

// ============================================================================
// Scan / check
// ============================================================================

/// Format the scan inventory, grouped by category in display order.
pub fn format_scan_output(inventory: &Inventory, source_root: &Path) -> Vec<String> {
    let mut lines = Vec::new();

    for (n, category) in Category::ALL.into_iter().enumerate() {
        if n > 0 {
            lines.push(String::new());
        }
        let items: Vec<_> = inventory.in_category(category).collect();
        lines.push(category_header(category, items.len()));

        for (i, item) in items.iter().enumerate() {
            lines.push(format!("{} {}", format_index(i + 1), item.title));
            let source = item.document.as_deref().unwrap_or(&item.folder);
            lines.push(format!("{}Source: {}", indent(1), href_for(source, source_root)));
            let summary = truncate_desc(item.summary.trim(), 60);
            if !summary.is_empty() {
                lines.push(format!("{}{}", indent(1), summary));
            }
            if item.has_class_diagram {
                lines.push(format!("{}Class diagram", indent(1)));
            }
        }
    }

    if !inventory.unclassified.is_empty() {
        lines.push(String::new());
        lines.push("Unclassified".to_string());
        for dir in &inventory.unclassified {
            lines.push(format!("{}{}/", indent(1), href_for(dir, source_root)));
        }
    }

    lines
}

/// Print scan output to stdout.
pub fn print_scan_output(inventory: &Inventory, source_root: &Path) {
    print_lines(&format_scan_output(inventory, source_root));
}

/// Format the consistency check. Returns the lines and whether it passed.
pub fn format_check_output(inventory: &Inventory, source_root: &Path) -> (Vec<String>, bool) {
    let mut lines = Vec::new();
    let duplicates = inventory.duplicate_slugs();

    if !inventory.unclassified.is_empty() {
        lines.push("Unclassified folders (no category keyword)".to_string());
        for dir in &inventory.unclassified {
            lines.push(format!("{}{}/", indent(1), href_for(dir, source_root)));
        }
    }

    if !duplicates.is_empty() {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push("Colliding slugs".to_string());
        for (slug, folders) in &duplicates {
            lines.push(format!("{}{}", indent(1), slug));
            for folder in folders {
                lines.push(format!("{}{}", indent(2), href_for(folder, source_root)));
            }
        }
    }

    let ok = inventory.unclassified.is_empty() && duplicates.is_empty();
    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "Checked {} patterns: {}",
        inventory.items.len(),
        if ok { "ok" } else { "problems found" }
    ));
    (lines, ok)
}

/// Print check output to stdout. Returns whether the check passed.
pub fn print_check_output(inventory: &Inventory, source_root: &Path) -> bool {
    let (lines, ok) = format_check_output(inventory, source_root);
    print_lines(&lines);
    ok
}

// ============================================================================
// Pages
// ============================================================================

/// Format page generation output: each page with the file it was written to.
pub fn format_generate_output(
    catalog: &Catalog,
    report: &GenerateReport,
    pages: &PagesConfig,
    output_root: &Path,
) -> Vec<String> {
    let mut lines = Vec::new();
    let page_status = |name: String| {
        if report.written.contains(&output_root.join(&name)) {
            name
        } else {
            format!("{} (not written)", name)
        }
    };

    lines.push(format!("Index → {}", page_status(index_page_name(pages))));

    for bucket in &catalog.buckets {
        let page = page_status(category_page_name(pages, bucket.category));
        lines.push(format!("{} → {}", bucket.category, page));
        for (i, entry) in bucket.entries.iter().enumerate() {
            lines.push(format!(
                "{}{} {} → {}",
                indent(1),
                format_index(i + 1),
                entry.title,
                entry.detail_url
            ));
        }
    }

    if !report.collisions.is_empty() {
        lines.push(String::new());
        lines.push("Slug collisions (last one wins)".to_string());
        for collision in &report.collisions {
            let kept = collision
                .survivor()
                .map(|p| href_for(p, output_root))
                .unwrap_or_default();
            lines.push(format!("{}{} → kept {}", indent(1), collision.slug, kept));
        }
    }

    if !report.failures.is_empty() {
        lines.push(String::new());
        lines.push("Failed".to_string());
        for failure in &report.failures {
            lines.push(format!(
                "{}{}: {}",
                indent(1),
                href_for(&failure.path, output_root),
                failure.error
            ));
        }
    }

    // Colliding entries share one page
    let detail_pages: BTreeSet<&str> = catalog
        .entries()
        .map(|e| e.detail_url.as_str())
        .filter(|url| report.written.contains(&output_root.join(url)))
        .collect();

    lines.push(String::new());
    lines.push(format!(
        "Generated {} category pages, {} detail pages",
        catalog.buckets.len(),
        detail_pages.len()
    ));
    lines
}

/// Print generate output to stdout.
pub fn print_generate_output(
    catalog: &Catalog,
    report: &GenerateReport,
    pages: &PagesConfig,
    output_root: &Path,
) {
    print_lines(&format_generate_output(catalog, report, pages, output_root));
}

// ============================================================================
// Handbook / conversion / scaffold
// ============================================================================

pub fn format_handbook_output(report: &HandbookReport, output_root: &Path) -> Vec<String> {
    vec![
        format!("Handbook → {}", href_for(&report.path, output_root)),
        format!(
            "{}{} patterns, {} diagrams linked, {} inlined",
            indent(1),
            report.patterns,
            report.linked_diagrams,
            report.inlined_diagrams
        ),
    ]
}

pub fn print_handbook_output(report: &HandbookReport, output_root: &Path) {
    print_lines(&format_handbook_output(report, output_root));
}

/// Pass/fail summary of a conversion.
pub fn format_conversion_outcome(outcome: &ConversionOutcome) -> Vec<String> {
    match outcome {
        ConversionOutcome::Succeeded { output, size_bytes } => vec![
            format!("PDF created: {}", output.display()),
            format!(
                "{}Size: {:.2} MB",
                indent(1),
                *size_bytes as f64 / (1024.0 * 1024.0)
            ),
        ],
        ConversionOutcome::Failed { status, stderr } => {
            let code = status
                .map(|c| c.to_string())
                .unwrap_or_else(|| "signal".to_string());
            let mut lines = vec![format!("PDF conversion failed (exit {})", code)];
            lines.extend(stderr.lines().map(|l| format!("{}{}", indent(1), l)));
            lines
        }
        ConversionOutcome::TimedOut { after } => {
            vec![format!("PDF conversion timed out after {}s", after.as_secs_f64())]
        }
        ConversionOutcome::LaunchFailed { reason } => {
            vec![format!("PDF converter could not be started: {}", reason)]
        }
    }
}

pub fn print_conversion_outcome(outcome: &ConversionOutcome) {
    print_lines(&format_conversion_outcome(outcome));
}

pub fn format_scaffold_output(report: &ScaffoldReport, source_root: &Path) -> Vec<String> {
    let mut lines = Vec::new();
    for path in &report.created {
        lines.push(format!("Created {}", href_for(path, source_root)));
    }
    for failure in &report.failures {
        lines.push(format!(
            "Failed {}: {}",
            href_for(&failure.path, source_root),
            failure.error
        ));
    }
    lines.push(format!(
        "PatternReference created for {} patterns ({} already present)",
        report.created.len(),
        report.existing.len()
    ));
    lines
}

pub fn print_scaffold_output(report: &ScaffoldReport, source_root: &Path) {
    print_lines(&format_scaffold_output(report, source_root));
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InventoryItem;
    use crate::generate::{PageFailure, SlugCollision};
    use crate::types::{PatternEntry, Thumbnail};
    use std::path::PathBuf;
    use std::time::Duration;

    fn item(category: Category, title: &str, slug: &str) -> InventoryItem {
        InventoryItem {
            category,
            folder: PathBuf::from(format!("/src/{slug}")),
            title: title.to_string(),
            summary: String::new(),
            slug: slug.to_string(),
            document: None,
            has_class_diagram: false,
        }
    }

    fn entry(title: &str, slug: &str) -> PatternEntry {
        PatternEntry {
            title: title.to_string(),
            summary: String::new(),
            slug: slug.to_string(),
            folder_path: slug.to_string(),
            detail_url: format!("All_Design_Patterns_{slug}.html"),
            source_href: String::new(),
            image: Thumbnail::plain("x.svg"),
            source_document: String::new(),
            class_diagram: None,
            folder: PathBuf::from(format!("/src/{slug}")),
        }
    }

    // =========================================================================
    // Helper tests
    // =========================================================================

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(100), "100");
    }

    #[test]
    fn truncate_desc_short() {
        assert_eq!(truncate_desc("Short text", 40), "Short text");
    }

    #[test]
    fn truncate_desc_long() {
        let text = "a".repeat(50);
        assert_eq!(truncate_desc(&text, 40), format!("{}...", "a".repeat(40)));
    }

    #[test]
    fn truncate_desc_counts_chars_not_bytes() {
        assert_eq!(truncate_desc("ééé", 3), "ééé");
    }

    #[test]
    fn category_header_pluralizes() {
        assert_eq!(category_header(Category::Structural, 1), "Structural (1 pattern)");
        assert_eq!(category_header(Category::Creational, 0), "Creational (0 patterns)");
    }

    // =========================================================================
    // Scan / check
    // =========================================================================

    #[test]
    fn scan_output_groups_by_category() {
        let mut observer = item(Category::Behavioral, "Observer", "observer");
        observer.summary = "Notifies dependents.".to_string();
        observer.document = Some(PathBuf::from("/src/observer/README.md"));
        observer.has_class_diagram = true;
        let inventory = Inventory {
            items: vec![item(Category::Creational, "Builder", "builder"), observer],
            unclassified: vec![PathBuf::from("/src/SolidPrincipal")],
        };

        let lines = format_scan_output(&inventory, Path::new("/src"));
        assert_eq!(
            lines,
            vec![
                "Creational (1 pattern)",
                "001 Builder",
                "    Source: builder",
                "",
                "Structural (0 patterns)",
                "",
                "Behavioral (1 pattern)",
                "001 Observer",
                "    Source: observer/README.md",
                "    Notifies dependents.",
                "    Class diagram",
                "",
                "Unclassified",
                "    SolidPrincipal/",
            ]
        );
    }

    #[test]
    fn check_passes_on_clean_inventory() {
        let inventory = Inventory {
            items: vec![item(Category::Creational, "Builder", "builder")],
            unclassified: vec![],
        };
        let (lines, ok) = format_check_output(&inventory, Path::new("/src"));
        assert!(ok);
        assert_eq!(lines, vec!["Checked 1 patterns: ok"]);
    }

    #[test]
    fn check_reports_unclassified_and_collisions() {
        let inventory = Inventory {
            items: vec![
                item(Category::Creational, "Factory Pattern", "factory-pattern"),
                item(Category::Creational, "factory pattern", "factory-pattern"),
            ],
            unclassified: vec![PathBuf::from("/src/misc")],
        };
        let (lines, ok) = format_check_output(&inventory, Path::new("/src"));
        assert!(!ok);
        assert!(lines.contains(&"    misc/".to_string()));
        assert!(lines.contains(&"    factory-pattern".to_string()));
        assert_eq!(lines.last().unwrap(), "Checked 2 patterns: problems found");
    }

    // =========================================================================
    // Pages
    // =========================================================================

    #[test]
    fn generate_output_lists_pages() {
        let mut catalog = Catalog::default();
        catalog
            .bucket_mut(Category::Creational)
            .entries
            .push(entry("Builder", "builder"));
        let out = Path::new("/out");
        let report = GenerateReport {
            written: vec![
                out.join("All_Design_Patterns_index.html"),
                out.join("All_Design_Patterns_Creational.html"),
                out.join("All_Design_Patterns_Structural.html"),
                out.join("All_Design_Patterns_Behavioral.html"),
                out.join("All_Design_Patterns_builder.html"),
            ],
            ..GenerateReport::default()
        };

        let lines = format_generate_output(&catalog, &report, &PagesConfig::default(), out);
        assert_eq!(lines[0], "Index → All_Design_Patterns_index.html");
        assert_eq!(lines[1], "Creational → All_Design_Patterns_Creational.html");
        assert_eq!(lines[2], "    001 Builder → All_Design_Patterns_builder.html");
        assert_eq!(
            lines.last().unwrap(),
            "Generated 3 category pages, 1 detail pages"
        );
    }

    #[test]
    fn generate_output_counts_shared_detail_page_once() {
        let mut catalog = Catalog::default();
        let bucket = catalog.bucket_mut(Category::Creational);
        bucket.entries.push(entry("Factory Pattern", "factory-pattern"));
        bucket.entries.push(entry("factory pattern", "factory-pattern"));
        bucket.entries.push(entry("Builder", "builder"));
        let out = Path::new("/out");
        let page = out.join("All_Design_Patterns_factory-pattern.html");
        let report = GenerateReport {
            written: vec![
                page.clone(),
                page,
                out.join("All_Design_Patterns_builder.html"),
            ],
            ..GenerateReport::default()
        };

        let lines = format_generate_output(&catalog, &report, &PagesConfig::default(), out);
        assert_eq!(
            lines.last().unwrap(),
            "Generated 3 category pages, 2 detail pages"
        );
    }

    #[test]
    fn generate_output_shows_collisions_and_failures() {
        let catalog = Catalog::default();
        let out = Path::new("/out");
        let report = GenerateReport {
            written: vec![],
            failures: vec![PageFailure {
                path: out.join("All_Design_Patterns_x.html"),
                error: std::io::Error::other("disk full").into(),
            }],
            collisions: vec![SlugCollision {
                slug: "factory-pattern".to_string(),
                folders: vec![out.join("a"), out.join("b")],
            }],
        };

        let lines = format_generate_output(&catalog, &report, &PagesConfig::default(), out);
        assert!(lines.contains(&"    factory-pattern → kept b".to_string()));
        assert!(lines.contains(&"Failed".to_string()));
        assert!(lines.iter().any(|l| l.contains("All_Design_Patterns_x.html: IO error: disk full")));
        assert!(lines.contains(&"Creational → All_Design_Patterns_Creational.html (not written)".to_string()));
    }

    // =========================================================================
    // Conversion
    // =========================================================================

    #[test]
    fn conversion_success_shows_size() {
        let lines = format_conversion_outcome(&ConversionOutcome::Succeeded {
            output: PathBuf::from("All_Design_Patterns.pdf"),
            size_bytes: 1024 * 1024 * 3 / 2,
        });
        assert_eq!(
            lines,
            vec!["PDF created: All_Design_Patterns.pdf", "    Size: 1.50 MB"]
        );
    }

    #[test]
    fn conversion_failure_shows_stderr() {
        let lines = format_conversion_outcome(&ConversionOutcome::Failed {
            status: Some(43),
            stderr: "pdflatex not found".to_string(),
        });
        assert_eq!(
            lines,
            vec!["PDF conversion failed (exit 43)", "    pdflatex not found"]
        );
    }

    #[test]
    fn conversion_timeout_and_launch_failure() {
        assert_eq!(
            format_conversion_outcome(&ConversionOutcome::TimedOut {
                after: Duration::from_secs(60)
            }),
            vec!["PDF conversion timed out after 60s"]
        );
        assert_eq!(
            format_conversion_outcome(&ConversionOutcome::LaunchFailed {
                reason: "pandoc: not found".to_string()
            }),
            vec!["PDF converter could not be started: pandoc: not found"]
        );
    }

    #[test]
    fn scaffold_output_summary() {
        let report = ScaffoldReport {
            created: vec![PathBuf::from("/src/cat/a/PatternReference.md")],
            existing: vec![PathBuf::from("/src/cat/b/PatternReference.md")],
            failures: vec![],
        };
        let lines = format_scaffold_output(&report, Path::new("/src"));
        assert_eq!(
            lines,
            vec![
                "Created cat/a/PatternReference.md",
                "PatternReference created for 1 patterns (1 already present)",
            ]
        );
    }
}
