//! Handbook aggregation.
//!
//! Concatenates every classified pattern's README into one Markdown document
//! (`All_Design_Patterns.md` by default), grouped by category in display
//! order. Class diagrams are linked as pre-rendered images from
//! `diagrams_dir` when one exists for the pattern, otherwise the diagram
//! document is inlined in a `mermaid` fence.
//!
//! Pre-rendered diagram images are named after the diagram document's path
//! relative to the source root, see [`safe_name`].

use crate::config::{AggregateConfig, UnclassifiedPolicy};
use crate::metadata::{self, CLASS_DIAGRAM_FILE, README_FILE};
use crate::naming::href_for;
use crate::scan::{PatternFolder, Scanner};
use crate::types::Category;
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// How a pattern's class diagram ended up in the handbook.
#[derive(Debug, Clone, PartialEq)]
pub enum DiagramRef {
    /// Linked to a pre-rendered image.
    Image(String),
    /// Diagram document inlined in a mermaid fence.
    Inline,
}

/// Summary of a written handbook.
#[derive(Debug, Clone, PartialEq)]
pub struct HandbookReport {
    pub path: PathBuf,
    pub patterns: usize,
    pub linked_diagrams: usize,
    pub inlined_diagrams: usize,
}

const HANDBOOK_TITLE: &str = "# All Design Patterns";
const HANDBOOK_INTRO: &str = "Generated with rendered UML images where available.";
const IMAGE_EXTENSIONS: [&str; 2] = ["svg", "png"];

/// Image-safe name for a path under `root`.
///
/// Path separators become `_` and anything other than alphanumerics and
/// `._-` is dropped: `creationalDesign/builder/UML/ClassDiagram.md` →
/// `creationalDesign_builder_UML_ClassDiagram.md`.
pub fn safe_name(path: &Path, root: &Path) -> String {
    href_for(path, root)
        .replace('/', "_")
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect()
}

/// Pre-rendered diagram for `diagram_doc`, preferring SVG over PNG.
///
/// The returned href is relative to `output_root`.
pub fn find_rendered_diagram(
    diagram_doc: &Path,
    source: &Path,
    output_root: &Path,
    config: &AggregateConfig,
) -> Option<String> {
    let name = safe_name(diagram_doc, source);
    IMAGE_EXTENSIONS.iter().find_map(|ext| {
        let rel = format!("{}/{name}.{ext}", config.diagrams_dir.trim_end_matches('/'));
        output_root.join(&rel).is_file().then_some(rel)
    })
}

/// Handbook text for the given folders.
///
/// Folders are emitted grouped by category in display order, keeping the
/// given order within each category.
pub fn render_handbook(
    folders: &[PatternFolder],
    source: &Path,
    output_root: &Path,
    config: &AggregateConfig,
) -> (String, Vec<Option<DiagramRef>>) {
    let mut doc = format!("{HANDBOOK_TITLE}\n\n{HANDBOOK_INTRO}\n\n");
    let mut diagrams = Vec::new();

    for category in Category::ALL {
        for folder in folders.iter().filter(|f| f.category == category) {
            let name = folder.name();
            let _ = write!(doc, "\n---\n\n## {name}\n\n");

            if let Some(readme) = metadata::read_or_log(&folder.path.join(README_FILE)) {
                doc.push_str("### Overview (README.md)\n\n");
                doc.push_str(&readme);
                doc.push_str("\n\n");
            }

            let diagram_doc = folder.path.join(CLASS_DIAGRAM_FILE);
            let diagram = metadata::read_or_log(&diagram_doc).map(|text| {
                doc.push_str("### UML / Class Diagram\n\n");
                match find_rendered_diagram(&diagram_doc, source, output_root, config) {
                    Some(src) => {
                        let _ = write!(
                            doc,
                            "<div class=\"diagram\"><img src=\"{src}\" alt=\"{name} UML\"/></div>\n\n"
                        );
                        DiagramRef::Image(src)
                    }
                    None => {
                        let _ = write!(doc, "```mermaid\n{text}\n```\n\n");
                        DiagramRef::Inline
                    }
                }
            });
            debug!(pattern = %name, diagram = ?diagram, "handbook section");
            diagrams.push(diagram);
        }
    }

    (doc, diagrams)
}

/// Scan `source` and write the handbook to `output_root/<config.file>`.
pub fn write_handbook(
    source: &Path,
    output_root: &Path,
    config: &AggregateConfig,
    policy: UnclassifiedPolicy,
) -> Result<HandbookReport, AggregateError> {
    let folders = Scanner::new(policy).scan(source);
    let (doc, diagrams) = render_handbook(&folders, source, output_root, config);

    fs::create_dir_all(output_root)?;
    let path = output_root.join(&config.file);
    fs::write(&path, doc)?;

    let report = HandbookReport {
        path,
        patterns: folders.len(),
        linked_diagrams: diagrams
            .iter()
            .filter(|d| matches!(d, Some(DiagramRef::Image(_))))
            .count(),
        inlined_diagrams: diagrams
            .iter()
            .filter(|d| matches!(d, Some(DiagramRef::Inline)))
            .count(),
    };
    info!(
        path = %report.path.display(),
        patterns = report.patterns,
        "handbook written"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    fn write(path: &Path, text: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }

    #[test]
    fn safe_name_flattens_path() {
        let root = Path::new("/src/LLD/DesignPattern");
        assert_eq!(
            safe_name(
                &root.join("creationalDesign/builder/UML/ClassDiagram.md"),
                root
            ),
            "creationalDesign_builder_UML_ClassDiagram.md"
        );
    }

    #[test]
    fn safe_name_drops_unsafe_characters() {
        let root = Path::new("/src");
        assert_eq!(
            safe_name(&root.join("cat/my pattern (v2)/UML/ClassDiagram.md"), root),
            "cat_mypatternv2_UML_ClassDiagram.md"
        );
    }

    #[test]
    fn sections_follow_category_display_order() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        write(&src.join("behavioralDesign/observer/README.md"), "# Observer");
        write(&src.join("creationalDesign/builder/README.md"), "# Builder");
        write(&src.join("StructuralDesign/adapter/README.md"), "# Adapter");

        let folders = Scanner::default().scan(&src);
        let (doc, _) = render_handbook(&folders, &src, tmp.path(), &AggregateConfig::default());

        assert!(doc.starts_with("# All Design Patterns\n"));
        let b = doc.find("## builder").unwrap();
        let a = doc.find("## adapter").unwrap();
        let o = doc.find("## observer").unwrap();
        assert!(b < a && a < o);
        assert_eq!(doc.matches("\n---\n").count(), 3);
    }

    #[test]
    fn readme_included_under_overview() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        write(
            &src.join("creationalDesign/singleton/README.md"),
            "# Singleton\n\nOne instance.",
        );

        let folders = Scanner::default().scan(&src);
        let (doc, diagrams) =
            render_handbook(&folders, &src, tmp.path(), &AggregateConfig::default());
        assert!(doc.contains("### Overview (README.md)\n\n# Singleton\n\nOne instance.\n\n"));
        assert_eq!(diagrams, vec![None]);
    }

    #[test]
    fn folder_without_documents_still_gets_heading() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        fs::create_dir_all(src.join("StructuralDesign/bridge")).unwrap();

        let folders = Scanner::default().scan(&src);
        let (doc, _) = render_handbook(&folders, &src, tmp.path(), &AggregateConfig::default());
        assert!(doc.contains("## bridge\n\n"));
        assert!(!doc.contains("### Overview"));
    }

    #[test]
    fn diagram_inlined_without_rendered_image() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        write(
            &src.join("StructuralDesign/proxy/UML/ClassDiagram.md"),
            "classDiagram\n  Subject <|-- Proxy",
        );

        let folders = Scanner::default().scan(&src);
        let (doc, diagrams) =
            render_handbook(&folders, &src, tmp.path(), &AggregateConfig::default());
        assert!(doc.contains(
            "### UML / Class Diagram\n\n```mermaid\nclassDiagram\n  Subject <|-- Proxy\n```\n\n"
        ));
        assert_eq!(diagrams, vec![Some(DiagramRef::Inline)]);
    }

    #[test]
    fn rendered_svg_preferred_over_png() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        write(&src.join("StructuralDesign/proxy/UML/ClassDiagram.md"), "x");
        let diagrams_dir = tmp.path().join("build/diagrams");
        write(
            &diagrams_dir.join("StructuralDesign_proxy_UML_ClassDiagram.md.png"),
            "png",
        );
        write(
            &diagrams_dir.join("StructuralDesign_proxy_UML_ClassDiagram.md.svg"),
            "<svg/>",
        );

        let folders = Scanner::default().scan(&src);
        let (doc, diagrams) =
            render_handbook(&folders, &src, tmp.path(), &AggregateConfig::default());
        let src_attr = "build/diagrams/StructuralDesign_proxy_UML_ClassDiagram.md.svg";
        assert!(doc.contains(&format!(
            "<div class=\"diagram\"><img src=\"{src_attr}\" alt=\"proxy UML\"/></div>"
        )));
        assert!(!doc.contains("```mermaid"));
        assert_eq!(diagrams, vec![Some(DiagramRef::Image(src_attr.to_string()))]);
    }

    #[test]
    fn unclassified_folders_left_out() {
        let tmp = setup_fixtures();
        let out = TempDir::new().unwrap();
        let report = write_handbook(
            tmp.path(),
            out.path(),
            &AggregateConfig::default(),
            UnclassifiedPolicy::Silent,
        )
        .unwrap();

        assert_eq!(report.patterns, 7);
        let doc = fs::read_to_string(&report.path).unwrap();
        assert!(!doc.contains("SolidPrincipal"));
        assert!(!doc.contains("OpenClosedPrinciple"));
        assert!(doc.contains("## strategy-pattern"));
    }

    #[test]
    fn handbook_written_to_configured_file() {
        let tmp = setup_fixtures();
        let out = TempDir::new().unwrap();
        let config = AggregateConfig {
            file: "handbook.md".to_string(),
            ..AggregateConfig::default()
        };
        let report =
            write_handbook(tmp.path(), out.path(), &config, UnclassifiedPolicy::Silent).unwrap();

        assert_eq!(report.path, out.path().join("handbook.md"));
        assert!(report.path.is_file());
        assert!(report.inlined_diagrams >= 1);
        assert_eq!(report.linked_diagrams, 0);
    }
}
