//! # Pattern Book
//!
//! A static content generator for a tree of design-pattern notes. The
//! filesystem is the data source: top-level folders are categories, their
//! subfolders are patterns, and each pattern's Markdown documents provide its
//! title, summary and detail page.
//!
//! # Pipeline
//!
//! ```text
//! 1. Scan       LLD/DesignPattern/  →  classified pattern folders
//! 2. Extract    pattern folder      →  title, summary, raw document, class diagram
//! 3. Resolve    pattern folder      →  thumbnail (copied or synthesized SVG)
//! 4. Assemble   catalog             →  index, category and detail pages
//! ```
//!
//! Alongside the pages, the same scan feeds a single-document handbook
//! ([`aggregate`]), which can be handed to an external converter for PDF
//! output ([`convert`]), and a scaffolder that writes templated reference
//! documents for patterns lacking one ([`scaffold`]).
//!
//! Everything runs in one thread with whole-file writes. Missing inputs
//! degrade to defaults; a page that cannot be written is reported and the
//! run continues.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Walks the source root and classifies category folders by keyword |
//! | [`metadata`] | Title/summary extraction from `PatternReference.md` or `README.md`, class diagrams |
//! | [`assets`] | Thumbnail resolution: copy an existing image or synthesize a motif SVG |
//! | [`catalog`] | Runs scan → extract → resolve into a [`types::Catalog`] |
//! | [`generate`] | Renders index, category and detail pages with Maud |
//! | [`aggregate`] | Writes the all-patterns Markdown handbook |
//! | [`convert`] | Runs the external document converter with a timeout |
//! | [`scaffold`] | Writes templated `PatternReference.md` files |
//! | [`config`] | `pattern-book.toml` loading, merging with stock defaults, validation |
//! | [`types`] | Shared types: [`types::Category`], [`types::PatternEntry`], [`types::Catalog`] |
//! | [`naming`] | Slugs, display titles and output-relative hrefs |
//! | [`output`] | CLI output formatting for every command |
//! | [`logging`] | `tracing` subscriber setup |
//!
//! # Design Decisions
//!
//! ## Raw Markdown on Detail Pages
//!
//! Detail pages embed the source document verbatim as a JSON string and
//! leave rendering to the linked client-side renderer. Notes are rendered
//! the same way whether read on the site or on a code host, and the
//! generator never has to agree with a browser-side Markdown dialect.
//!
//! ## Keyword Classification
//!
//! Category folders are matched by case-insensitive keyword (`behavioral`,
//! `creational`, `structural`) rather than exact names, since the notes tree
//! mixes `behavioralDesign`, `StructuralDesign` and similar spellings.
//! Folders matching no keyword are reported and left out.
//!
//! ## Ordered Motif Rules
//!
//! Synthesized thumbnails pick their motif from an ordered list of
//! `(keywords, motif)` rules; the first rule whose keywords appear in the
//! lower-cased title wins. Adding a motif is adding a row.

pub mod aggregate;
pub mod assets;
pub mod catalog;
pub mod config;
pub mod convert;
pub mod generate;
pub mod logging;
pub mod metadata;
pub mod naming;
pub mod output;
pub mod scaffold;
pub mod scan;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
