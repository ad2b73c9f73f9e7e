//! Catalog assembly: Scanner → Extractor → Resolver.
//!
//! Builds one [`PatternEntry`] per classified pattern folder and files it
//! into its category bucket. Strictly sequential; the only state is the
//! catalog being built.
//!
//! [`inventory`] runs the first two stages only, for commands that report
//! on the source tree without writing to the output root.

use crate::assets::AssetResolver;
use crate::config::{SiteConfig, UnclassifiedPolicy};
use crate::generate::detail_page_name;
use crate::metadata::{self, README_FILE, REFERENCE_FILE};
use crate::naming::{href_for, slugify};
use crate::scan::{PatternFolder, Scanner};
use crate::types::{Catalog, Category, PatternEntry};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

/// One pattern as seen by a read-only scan.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryItem {
    pub category: Category,
    pub folder: PathBuf,
    pub title: String,
    pub summary: String,
    pub slug: String,
    /// Path of the document the title came from.
    pub document: Option<PathBuf>,
    pub has_class_diagram: bool,
}

/// Everything under a source root, without writing anything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inventory {
    pub items: Vec<InventoryItem>,
    pub unclassified: Vec<PathBuf>,
}

impl Inventory {
    /// Items in one category, in scan order.
    pub fn in_category(&self, category: Category) -> impl Iterator<Item = &InventoryItem> {
        self.items.iter().filter(move |i| i.category == category)
    }

    /// Slugs claimed by more than one folder, with the folders in scan order.
    pub fn duplicate_slugs(&self) -> Vec<(String, Vec<PathBuf>)> {
        let mut by_slug: BTreeMap<&str, Vec<PathBuf>> = BTreeMap::new();
        for item in &self.items {
            by_slug.entry(&item.slug).or_default().push(item.folder.clone());
        }
        by_slug
            .into_iter()
            .filter(|(_, folders)| folders.len() > 1)
            .map(|(slug, folders)| (slug.to_string(), folders))
            .collect()
    }
}

/// Scan and extract metadata only. No thumbnails are resolved.
pub fn inventory(source: &Path, policy: UnclassifiedPolicy) -> Inventory {
    let scanner = Scanner::new(policy);
    let categories = scanner.category_dirs(source);

    let mut items: Vec<InventoryItem> = scanner
        .pattern_folders(&categories)
        .map(|folder| {
            let meta = metadata::extract(&folder.path);
            let slug = match slugify(&meta.title) {
                s if s.is_empty() => fallback_slug(&folder),
                s => s,
            };
            InventoryItem {
                category: folder.category,
                has_class_diagram: metadata::class_diagram(&folder.path).is_some(),
                document: meta.source.map(|doc| doc.path),
                title: meta.title,
                summary: meta.summary,
                slug,
                folder: folder.path,
            }
        })
        .collect();
    // Display order, keeping scan order within a category
    items.sort_by_key(|i| Category::ALL.iter().position(|c| *c == i.category));

    Inventory {
        items,
        unclassified: categories
            .into_iter()
            .filter(|d| d.category.is_none())
            .map(|d| d.path)
            .collect(),
    }
}

/// Scan `source`, extract metadata, resolve thumbnails into `output_root`.
pub fn build_catalog(source: &Path, output_root: &Path, config: &SiteConfig) -> Catalog {
    let scanner = Scanner::new(config.scan.unclassified);
    let resolver = AssetResolver::new(&config.images, output_root);

    let categories = scanner.category_dirs(source);
    let mut catalog = Catalog {
        unclassified: categories
            .iter()
            .filter(|d| d.category.is_none())
            .map(|d| d.path.clone())
            .collect(),
        ..Catalog::default()
    };

    for folder in scanner.pattern_folders(&categories) {
        let entry = build_entry(&folder, output_root, config, &resolver);
        catalog.bucket_mut(folder.category).entries.push(entry);
    }

    info!(
        patterns = catalog.len(),
        unclassified = catalog.unclassified.len(),
        "catalog built"
    );
    catalog
}

/// Build the entry for one pattern folder.
pub fn build_entry(
    folder: &PatternFolder,
    output_root: &Path,
    config: &SiteConfig,
    resolver: &AssetResolver<'_>,
) -> PatternEntry {
    let meta = metadata::extract(&folder.path);

    let slug = match slugify(&meta.title) {
        s if s.is_empty() => fallback_slug(folder),
        s => s,
    };
    let detail_url = detail_page_name(&config.pages, &slug);

    let source_href = [README_FILE, REFERENCE_FILE]
        .iter()
        .map(|name| folder.path.join(name))
        .find(|p| p.is_file())
        .map(|p| href_for(&p, output_root))
        .unwrap_or_else(|| detail_url.clone());

    let image = resolver.resolve(&folder.path, &meta.title, &slug, Some(folder.category));

    PatternEntry {
        title: meta.title,
        summary: meta.summary,
        slug,
        folder_path: href_for(&folder.path, output_root),
        detail_url,
        source_href,
        image,
        source_document: meta.source.map(|doc| doc.text).unwrap_or_default(),
        class_diagram: metadata::class_diagram(&folder.path),
        folder: folder.path.clone(),
    }
}

/// Slug for titles with no ASCII alphanumerics: the folder name, else
/// `pattern`.
fn fallback_slug(folder: &PatternFolder) -> String {
    match slugify(&folder.name()) {
        s if s.is_empty() => "pattern".to_string(),
        s => s,
    }
}
