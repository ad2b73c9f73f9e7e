use clap::{Parser, Subcommand};
use pattern_book::{aggregate, catalog, config, convert, generate, logging, output, scaffold};
use std::path::{Path, PathBuf};

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "pattern-book")]
#[command(about = "Static pages and a handbook from a tree of design-pattern notes")]
#[command(long_about = "\
Static pages and a handbook from a tree of design-pattern notes

The filesystem is the data source. Top-level folders are categories,
matched by keyword; their subfolders are patterns.

Source structure:

  LLD/DesignPattern/
  ├── creationalDesign/            # 'creational' → Creational
  │   └── builderPattern/
  │       ├── PatternReference.md  # Preferred document (title, summary, detail page)
  │       ├── README.md            # Fallback document, included in the handbook
  │       ├── cover.png            # Thumbnail (optional, otherwise synthesized)
  │       └── UML/ClassDiagram.md  # Mermaid class diagram (optional)
  ├── StructuralDesign/            # 'structural' → Structural
  ├── behavioralDesign/            # 'behavioral' → Behavioral
  └── SolidPrincipal/              # No keyword: reported and skipped

Outputs (relative to --output):
  All_Design_Patterns_index.html       Index of categories
  All_Design_Patterns_<Category>.html  One listing page per category
  All_Design_Patterns_<slug>.html      One detail page per pattern
  tools/pattern_images/                Thumbnails
  All_Design_Patterns.md               Handbook (aggregate)
  All_Design_Patterns.pdf              Handbook PDF (pdf, needs pandoc)

Run 'pattern-book gen-config' to generate a documented pattern-book.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Pattern source root
    #[arg(long, default_value = "LLD/DesignPattern", global = true)]
    source: PathBuf,

    /// Invocation root: pages, images and the handbook are written here
    #[arg(long, default_value = ".", global = true)]
    output: PathBuf,

    /// Configuration file (missing file means stock defaults)
    #[arg(long, default_value = "pattern-book.toml", global = true)]
    config: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List categories and patterns found under the source root
    Scan,
    /// Write thumbnails, index, category and detail pages
    Pages,
    /// Write the all-patterns Markdown handbook
    Aggregate,
    /// Convert the handbook to PDF with the configured converter
    Pdf,
    /// Run pages and aggregate, plus pdf when enabled in config
    Build,
    /// Report unclassified folders and colliding slugs
    Check,
    /// Write PatternReference.md for patterns that lack one
    Scaffold,
    /// Print a stock pattern-book.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let site_config = config::load_config(&cli.config)?;
    let policy = site_config.scan.unclassified;

    match cli.command {
        Command::Scan => {
            let inventory = catalog::inventory(&cli.source, policy);
            output::print_scan_output(&inventory, &cli.source);
        }
        Command::Pages => {
            run_pages(&cli.source, &cli.output, &site_config)?;
        }
        Command::Aggregate => {
            run_aggregate(&cli.source, &cli.output, &site_config)?;
        }
        Command::Pdf => {
            if !run_pdf(&cli.output, &site_config) {
                return Err("PDF conversion failed".into());
            }
        }
        Command::Build => {
            println!("==> Pages: {} → {}", cli.source.display(), cli.output.display());
            run_pages(&cli.source, &cli.output, &site_config)?;

            println!("==> Handbook");
            run_aggregate(&cli.source, &cli.output, &site_config)?;

            if site_config.pdf.enabled {
                println!("==> PDF");
                run_pdf(&cli.output, &site_config);
            }
            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let inventory = catalog::inventory(&cli.source, config::UnclassifiedPolicy::Silent);
            if !output::print_check_output(&inventory, &cli.source) {
                return Err("check found problems".into());
            }
        }
        Command::Scaffold => {
            let report = scaffold::scaffold(&cli.source, policy);
            output::print_scaffold_output(&report, &cli.source);
        }
        Command::GenConfig => unreachable!("handled before config loading"),
    }

    Ok(())
}

fn run_pages(
    source: &Path,
    output_root: &Path,
    site_config: &config::SiteConfig,
) -> Result<(), generate::GenerateError> {
    let catalog = catalog::build_catalog(source, output_root, site_config);
    let report = generate::generate(&catalog, output_root, site_config)?;
    output::print_generate_output(&catalog, &report, &site_config.pages, output_root);
    Ok(())
}

fn run_aggregate(
    source: &Path,
    output_root: &Path,
    site_config: &config::SiteConfig,
) -> Result<(), aggregate::AggregateError> {
    let report = aggregate::write_handbook(
        source,
        output_root,
        &site_config.aggregate,
        site_config.scan.unclassified,
    )?;
    output::print_handbook_output(&report, output_root);
    Ok(())
}

/// Returns whether the conversion succeeded.
fn run_pdf(output_root: &Path, site_config: &config::SiteConfig) -> bool {
    let outcome = convert::Converter::from_config(&site_config.pdf).convert(
        output_root,
        Path::new(&site_config.aggregate.file),
        Path::new(&site_config.pdf.output),
    );
    output::print_conversion_outcome(&outcome);
    outcome.is_success()
}
