//! # pdfrank
//!
//! Persona-driven section ranking for PDF collections.
//!
//! Given a folder of PDFs, a persona and a job to be done, pdfrank splits
//! each document into heading-delimited sections using font statistics,
//! scores every section against the query, removes near-duplicates, picks a
//! small set spread across documents, and writes `combined_output.json`.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfrank::PipelineConfig;
//!
//! fn main() -> pdfrank::Result<()> {
//!     let config = PipelineConfig::new()
//!         .with_input_dir("input")
//!         .with_output_dir("output");
//!
//!     let report = pdfrank::run("Travel Planner", "Plan a 4-day trip", config)?;
//!     println!("Selected {} sections", report.sections_selected);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Layout extraction**: text runs with font size, weight and position via `lopdf`
//! - **Font-aware segmentation**: headings detected against each document's body font
//! - **Hybrid scoring**: TF-IDF similarity, keyword overlap and structural bonuses
//! - **Semantic similarity** (`semantic` feature): local sentence embeddings with candle
//! - **Diversity**: per-document quotas so one file cannot dominate the result
//! - **Parallel segmentation**: documents are segmented with Rayon

pub mod config;
pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod render;
pub mod score;
pub mod segment;
pub mod select;
pub mod summarize;
pub mod text;

// Re-export commonly used types
pub use config::PipelineConfig;
pub use detect::{discover_pdfs, document_name, is_pdf_bytes};
pub use error::{Error, Result};
pub use model::{
    ExtractedSection, LayoutLine, OutputMetadata, PageLayout, Query, RankingOutput,
    ScoredSection, Section, SubsectionAnalysis, TextRun,
};
pub use parser::{ExtractOptions, LayoutExtractor, LopdfExtractor};
pub use pipeline::{run, DocumentStatus, Pipeline, RunReport};
pub use render::{JsonFormat, OutputAssembler};
pub use score::{Embedder, RelevanceScorer, ScoringWeights, SimilarityBackend, SimilarityMode};
pub use segment::{SectionAssembler, SectionValidator};
pub use select::{DiversitySelector, DuplicateFilter};
pub use summarize::Summarizer;

use std::path::Path;

/// Extract and segment a single PDF into validated sections.
///
/// # Example
///
/// ```no_run
/// let sections = pdfrank::sections_from_file("guide.pdf").unwrap();
/// for section in &sections {
///     println!("p.{} {}", section.page, section.heading);
/// }
/// ```
pub fn sections_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<Section>> {
    let path = path.as_ref();
    let pages = LopdfExtractor::new().extract(path)?;
    let sections = SectionAssembler::default().assemble(&document_name(path), &pages);
    Ok(SectionValidator::new().filter(sections))
}
