//! Shared test utilities for the pattern-book test suite.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let catalog = build_catalog(tmp.path(), out.path(), &SiteConfig::default());
//!
//! let entry = find_entry(&catalog, "Strategy Pattern");
//! assert_eq!(
//!     bucket_titles(&catalog, Category::Behavioral),
//!     vec!["Observer Pattern", "Strategy Pattern"]
//! );
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::types::{Catalog, Category, PatternEntry};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/patterns/` to a temp directory and return it.
///
/// The copy is the pattern source root: category folders sit directly in it.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/patterns");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Lookup helpers
// =========================================================================

/// Find an entry by title anywhere in the catalog. Panics if missing.
pub fn find_entry<'a>(catalog: &'a Catalog, title: &str) -> &'a PatternEntry {
    catalog
        .entries()
        .find(|e| e.title == title)
        .unwrap_or_else(|| {
            let titles: Vec<_> = catalog.entries().map(|e| e.title.as_str()).collect();
            panic!("entry '{title}' not found. Available: {titles:?}")
        })
}

/// Titles in one category bucket, in catalog order.
pub fn bucket_titles(catalog: &Catalog, category: Category) -> Vec<&str> {
    catalog
        .bucket(category)
        .entries
        .iter()
        .map(|e| e.title.as_str())
        .collect()
}
