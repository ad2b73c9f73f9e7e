//! Shared types passed between the pipeline stages.
//!
//! A [`Catalog`] is built once per run by [`crate::catalog::build_catalog`]
//! and then only read: by the page assembler, the CLI output, and the tests.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// The fixed three-way classification of patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Category {
    Creational,
    Structural,
    Behavioral,
}

/// Folder-name keywords, checked in order against the lower-cased name.
const CATEGORY_KEYWORDS: &[(&str, Category)] = &[
    ("behavioral", Category::Behavioral),
    ("behavior", Category::Behavioral),
    ("creational", Category::Creational),
    ("creationaldesign", Category::Creational),
    ("structural", Category::Structural),
];

impl Category {
    /// Navigation order.
    pub const ALL: [Category; 3] = [
        Category::Creational,
        Category::Structural,
        Category::Behavioral,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::Creational => "Creational",
            Category::Structural => "Structural",
            Category::Behavioral => "Behavioral",
        }
    }

    /// Classify a category folder by keyword substring; first match wins.
    ///
    /// `behavioralDesign` → Behavioral, `StructuralDesign` → Structural,
    /// `misc` → None.
    pub fn from_folder_name(name: &str) -> Option<Category> {
        let lower = name.to_lowercase();
        CATEGORY_KEYWORDS
            .iter()
            .find(|(keyword, _)| lower.contains(keyword))
            .map(|&(_, category)| category)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Thumbnail reference for a pattern card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Thumbnail {
    /// Image URL relative to the output root.
    pub src: String,
    /// Pre-rendered `(small, large)` PNG pair, when both exist.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub png_pair: Option<(String, String)>,
    /// SVG rendition preferred over the PNG pair inside a `<picture>`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub svg: Option<String>,
}

impl Thumbnail {
    pub fn plain(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            png_pair: None,
            svg: None,
        }
    }

    /// `srcset` attribute for the PNG pair (`320w` / `800w`).
    pub fn srcset(&self) -> Option<String> {
        self.png_pair
            .as_ref()
            .map(|(small, large)| format!("{small} 320w, {large} 800w"))
    }
}

/// One discovered pattern folder, fully resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternEntry {
    pub title: String,
    /// First paragraph of the source document; empty when there is none.
    pub summary: String,
    pub slug: String,
    /// Pattern folder, relative to the output root when possible.
    pub folder_path: String,
    /// Detail page file name.
    pub detail_url: String,
    /// Source document href, or the detail URL when the folder has none.
    pub source_href: String,
    pub image: Thumbnail,
    /// Raw Markdown of the source document (empty when absent).
    #[serde(skip)]
    pub source_document: String,
    /// Mermaid class diagram from `UML/ClassDiagram.md`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_diagram: Option<String>,
    #[serde(skip)]
    pub folder: PathBuf,
}

/// Entries of one category, in sorted folder order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBucket {
    pub category: Category,
    pub entries: Vec<PatternEntry>,
}

/// Everything one generation run knows about the pattern tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Catalog {
    /// Always three buckets, in [`Category::ALL`] order.
    pub buckets: Vec<CategoryBucket>,
    /// Category folders that matched no category keyword.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unclassified: Vec<PathBuf>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            buckets: Category::ALL
                .iter()
                .map(|&category| CategoryBucket {
                    category,
                    entries: Vec::new(),
                })
                .collect(),
            unclassified: Vec::new(),
        }
    }
}

impl Catalog {
    pub fn bucket(&self, category: Category) -> &CategoryBucket {
        self.buckets
            .iter()
            .find(|b| b.category == category)
            .expect("catalog holds every category")
    }

    pub fn bucket_mut(&mut self, category: Category) -> &mut CategoryBucket {
        self.buckets
            .iter_mut()
            .find(|b| b.category == category)
            .expect("catalog holds every category")
    }

    /// All entries in page-writing order.
    pub fn entries(&self) -> impl Iterator<Item = &PatternEntry> {
        self.buckets.iter().flat_map(|b| b.entries.iter())
    }

    pub fn len(&self) -> usize {
        self.buckets.iter().map(|b| b.entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
