//! Filesystem scanning.
//!
//! Stage 1 of the pipeline. Walks the fixed two-level pattern tree and
//! yields one [`PatternFolder`] per pattern directory.
//!
//! ## Directory Structure
//!
//! ```text
//! LLD/DesignPattern/               # Pattern root
//! ├── creationalDesign/            # Category (recognized by keyword)
//! │   ├── factoryPattern/          # Pattern folder
//! │   │   ├── README.md
//! │   │   ├── PatternReference.md  # Preferred over README for the title
//! │   │   ├── cover.png            # Optional thumbnail
//! │   │   └── UML/
//! │   │       └── ClassDiagram.md  # Optional Mermaid class diagram
//! │   └── singletonDesignPattern/
//! ├── StructuralDesign/
//! ├── behavioralDesign/
//! └── notes/                       # Unclassified: skipped with a warning
//! ```
//!
//! ## Ordering
//!
//! Both levels are sorted by file name, so output is reproducible and the
//! "last write wins" rule for colliding slugs is deterministic.
//!
//! ## Missing root
//!
//! A missing root is logged and yields nothing. It is not an error.

use crate::config::UnclassifiedPolicy;
use crate::types::Category;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// A pattern directory and the category its parent was classified as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternFolder {
    pub category: Category,
    pub path: PathBuf,
}

impl PatternFolder {
    /// Folder name as written on disk.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// A category directory and the classification it received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDir {
    pub path: PathBuf,
    pub category: Option<Category>,
}

/// Walks a pattern root. Holds the policy for unclassified folders.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scanner {
    policy: UnclassifiedPolicy,
}

impl Scanner {
    pub fn new(policy: UnclassifiedPolicy) -> Self {
        Self { policy }
    }

    /// Every first-level directory under `root`, classified.
    ///
    /// Unclassified directories are included (with `category: None`) so the
    /// caller can report them; the policy only decides whether they are
    /// logged.
    pub fn category_dirs(&self, root: &Path) -> Vec<CategoryDir> {
        if !root.is_dir() {
            warn!(root = %root.display(), "pattern root not found, nothing to scan");
            return Vec::new();
        }
        child_dirs(root)
            .map(|path| {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let category = Category::from_folder_name(&name);
                match (category, self.policy) {
                    (Some(c), _) => debug!(folder = %name, category = %c, "classified"),
                    (None, UnclassifiedPolicy::Warn) => warn!(
                        folder = %path.display(),
                        "folder matches no category keyword, its patterns are skipped"
                    ),
                    (None, UnclassifiedPolicy::Silent) => {}
                }
                CategoryDir { path, category }
            })
            .collect()
    }

    /// Lazily yield every pattern folder under the classified categories.
    pub fn pattern_folders<'a>(
        &self,
        categories: &'a [CategoryDir],
    ) -> impl Iterator<Item = PatternFolder> + 'a {
        categories.iter().flat_map(|dir| {
            let category = dir.category;
            category
                .into_iter()
                .flat_map(move |category| {
                    child_dirs(&dir.path).map(move |path| PatternFolder { category, path })
                })
        })
    }

    /// Convenience: classify and collect all pattern folders under `root`.
    pub fn scan(&self, root: &Path) -> Vec<PatternFolder> {
        let categories = self.category_dirs(root);
        self.pattern_folders(&categories).collect()
    }
}

/// Sorted, non-hidden child directories of `path`.
fn child_dirs(path: &Path) -> impl Iterator<Item = PathBuf> {
    WalkDir::new(path)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(err) => {
                warn!(error = %err, "skipping unreadable entry");
                None
            }
        })
        .filter(|e| e.file_type().is_dir() && !is_hidden(e))
        .map(DirEntry::into_path)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::setup_fixtures;
    use std::fs;
    use tempfile::TempDir;

    fn names(folders: &[PatternFolder]) -> Vec<String> {
        folders.iter().map(PatternFolder::name).collect()
    }

    #[test]
    fn missing_root_yields_nothing() {
        let tmp = TempDir::new().unwrap();
        let folders = Scanner::default().scan(&tmp.path().join("does-not-exist"));
        assert!(folders.is_empty());
    }

    #[test]
    fn scan_finds_fixture_patterns() {
        let tmp = setup_fixtures();
        let folders = Scanner::default().scan(tmp.path());
        let names = names(&folders);
        assert!(names.contains(&"factoryPattern".to_string()));
        assert!(names.contains(&"strategy-pattern".to_string()));
        assert!(names.contains(&"AdapterDesignPattern".to_string()));
    }

    #[test]
    fn unclassified_category_is_dropped() {
        let tmp = setup_fixtures();
        let folders = Scanner::default().scan(tmp.path());
        assert!(
            folders
                .iter()
                .all(|f| !f.path.to_string_lossy().contains("SolidPrincipal"))
        );
    }

    #[test]
    fn unclassified_category_reported_in_category_dirs() {
        let tmp = setup_fixtures();
        for policy in [UnclassifiedPolicy::Warn, UnclassifiedPolicy::Silent] {
            let dirs = Scanner::new(policy).category_dirs(tmp.path());
            let unclassified: Vec<_> = dirs.iter().filter(|d| d.category.is_none()).collect();
            assert_eq!(unclassified.len(), 1);
            assert!(unclassified[0].path.ends_with("SolidPrincipal"));
        }
    }

    #[test]
    fn files_are_skipped_at_both_levels() {
        let tmp = TempDir::new().unwrap();
        let cat = tmp.path().join("creationalDesign");
        fs::create_dir_all(cat.join("builder")).unwrap();
        fs::write(tmp.path().join("notes.md"), "# stray").unwrap();
        fs::write(cat.join("README.md"), "# category readme").unwrap();

        let folders = Scanner::default().scan(tmp.path());
        assert_eq!(names(&folders), vec!["builder"]);
        assert_eq!(folders[0].category, Category::Creational);
    }

    #[test]
    fn hidden_directories_are_skipped() {
        let tmp = TempDir::new().unwrap();
        let cat = tmp.path().join("structuralDesign");
        fs::create_dir_all(cat.join(".git")).unwrap();
        fs::create_dir_all(cat.join("proxy")).unwrap();

        let folders = Scanner::default().scan(tmp.path());
        assert_eq!(names(&folders), vec!["proxy"]);
    }

    #[test]
    fn folders_sorted_within_category() {
        let tmp = TempDir::new().unwrap();
        let cat = tmp.path().join("behavioralDesign");
        for name in ["visitor", "Observer", "command", "Memento"] {
            fs::create_dir_all(cat.join(name)).unwrap();
        }

        let folders = Scanner::default().scan(tmp.path());
        assert_eq!(
            names(&folders),
            vec!["Memento", "Observer", "command", "visitor"]
        );
    }
}
