//! Run orchestration.
//!
//! Discovery, per-document segmentation, global scoring, duplicate removal,
//! diversity selection and output writing, in that order. Segmentation is
//! the only stage that runs per document; everything after it needs the
//! whole collection.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;

use crate::config::PipelineConfig;
use crate::detect::{discover_pdfs, document_name};
use crate::error::Result;
use crate::model::{Query, ScoredSection, Section};
use crate::parser::{LayoutExtractor, LopdfExtractor};
use crate::render::{write_output, OutputAssembler};
use crate::score::{RelevanceScorer, SimilarityBackend, SimilarityMode};
use crate::segment::{SectionAssembler, SectionValidator};
use crate::select::{DiversitySelector, DuplicateFilter};
use crate::summarize::Summarizer;

/// Number of top sections previewed in the log after deduplication.
const PREVIEW_COUNT: usize = 5;

/// Outcome of one document, reported to progress observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentStatus {
    /// Segmented with this many valid sections
    Processed { document: String, sections: usize },
    /// Skipped after an error
    Failed { document: String, reason: String },
}

impl DocumentStatus {
    /// File name of the document.
    pub fn document(&self) -> &str {
        match self {
            DocumentStatus::Processed { document, .. } | DocumentStatus::Failed { document, .. } => {
                document
            }
        }
    }
}

/// Counters describing a finished run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// PDF files found in the input directory
    pub documents_found: usize,
    /// Documents segmented successfully
    pub documents_processed: usize,
    /// Documents skipped after an error
    pub documents_failed: usize,
    /// Sections produced by segmentation
    pub sections_extracted: usize,
    /// Sections that passed validation
    pub sections_valid: usize,
    /// Sections left after duplicate removal
    pub sections_after_dedup: usize,
    /// Sections written to the output
    pub sections_selected: usize,
    /// Similarity signal used for scoring
    pub similarity_mode: SimilarityMode,
    /// Path of the written JSON file
    pub output_path: PathBuf,
}

/// Per-document result before aggregation.
struct Segmented {
    document: String,
    outcome: Result<(usize, Vec<Section>)>,
}

/// End-to-end ranking pipeline.
pub struct Pipeline {
    config: PipelineConfig,
    extractor: Arc<dyn LayoutExtractor>,
    backend: SimilarityBackend,
}

impl Pipeline {
    /// Create a pipeline reading PDFs with `lopdf`.
    ///
    /// The similarity backend is chosen here, once, from `config.model_dir`.
    pub fn new(config: PipelineConfig) -> Self {
        let backend = SimilarityBackend::detect(config.model_dir.as_deref());
        Self {
            config,
            extractor: Arc::new(LopdfExtractor::new()),
            backend,
        }
    }

    /// Replace the layout extractor.
    pub fn with_extractor(mut self, extractor: Arc<dyn LayoutExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Replace the similarity backend.
    pub fn with_backend(mut self, backend: SimilarityBackend) -> Self {
        self.backend = backend;
        self
    }

    /// The run configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Similarity mode the pipeline starts in.
    pub fn similarity_mode(&self) -> SimilarityMode {
        self.backend.mode()
    }

    /// PDF files the next run will read, in output order.
    ///
    /// A missing input directory yields no documents.
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        let dir = &self.config.input_dir;
        if !dir.is_dir() {
            log::warn!("Input directory {} does not exist", dir.display());
            return Ok(Vec::new());
        }
        discover_pdfs(dir)
    }

    /// Run without progress reporting.
    pub fn run(&self, query: &Query) -> Result<RunReport> {
        self.run_with_progress(query, |_| {})
    }

    /// Run, calling `progress` once per document as it finishes.
    ///
    /// Document failures are logged and skipped. Only configuration errors,
    /// unreadable input directories and output write failures end the run.
    pub fn run_with_progress<F>(&self, query: &Query, progress: F) -> Result<RunReport>
    where
        F: Fn(&DocumentStatus) + Sync,
    {
        self.config.validate()?;

        let paths = self.discover()?;
        log::info!("Found {} PDF document(s) in {}", paths.len(), self.config.input_dir.display());

        let segmented = self.segment_all(&paths, &progress);

        let mut documents = Vec::new();
        let mut all_sections = Vec::new();
        let mut sections_extracted = 0;
        let mut documents_failed = 0;

        for result in segmented {
            match result.outcome {
                Ok((extracted, sections)) => {
                    log::info!(
                        "{}: {} section(s) extracted, {} valid",
                        result.document,
                        extracted,
                        sections.len()
                    );
                    sections_extracted += extracted;
                    documents.push(result.document);
                    all_sections.extend(sections);
                }
                Err(e) => {
                    log::error!("Failed to process {}: {}", result.document, e);
                    documents_failed += 1;
                }
            }
        }

        let sections_valid = all_sections.len();
        log::info!(
            "Total: {} valid section(s) from {} document(s)",
            sections_valid,
            documents.len()
        );

        let scorer = RelevanceScorer::new(self.backend.clone())
            .with_weights(self.config.weights)
            .with_tfidf_options(self.config.tfidf.clone());
        let ranking = scorer.rank(query, all_sections);

        let deduped = DuplicateFilter::new(self.config.dedup_threshold).filter(ranking.sections);
        log_preview(&deduped);

        let selected = DiversitySelector::new(self.config.max_sections).select(&deduped, documents.len());

        let output = OutputAssembler::new(self.config.refined_max_words).assemble(
            &documents,
            query,
            &selected,
        );
        let output_path = write_output(&output, &self.config.output_dir)?;

        log::info!("Output written to {}", output_path.display());
        log::info!(
            "Included {} section(s) from {} document(s)",
            output.section_count(),
            output.document_count()
        );

        Ok(RunReport {
            documents_found: paths.len(),
            documents_processed: documents.len(),
            documents_failed,
            sections_extracted,
            sections_valid,
            sections_after_dedup: deduped.len(),
            sections_selected: selected.len(),
            similarity_mode: ranking.mode,
            output_path,
        })
    }

    /// Segment every document, keeping input order.
    fn segment_all<F>(&self, paths: &[PathBuf], progress: &F) -> Vec<Segmented>
    where
        F: Fn(&DocumentStatus) + Sync,
    {
        let assembler = SectionAssembler::new(
            Summarizer::new(self.config.summary_sentences),
            self.config.summary_min_words,
        );
        let validator = SectionValidator::new();

        let process = |path: &PathBuf| {
            let result = self.segment_document(path, &assembler, &validator);
            progress(&status_of(&result));
            result
        };

        if self.config.parallel {
            paths.par_iter().map(process).collect()
        } else {
            paths.iter().map(process).collect()
        }
    }

    fn segment_document(
        &self,
        path: &Path,
        assembler: &SectionAssembler,
        validator: &SectionValidator,
    ) -> Segmented {
        let document = document_name(path);
        log::debug!("Processing {}", path.display());

        let outcome = self.extractor.extract(path).map(|pages| {
            let sections = assembler.assemble(&document, &pages);
            let extracted = sections.len();
            (extracted, validator.filter(sections))
        });

        Segmented { document, outcome }
    }
}

fn status_of(result: &Segmented) -> DocumentStatus {
    match &result.outcome {
        Ok((_, sections)) => DocumentStatus::Processed {
            document: result.document.clone(),
            sections: sections.len(),
        },
        Err(e) => DocumentStatus::Failed {
            document: result.document.clone(),
            reason: e.to_string(),
        },
    }
}

fn log_preview(ranked: &[ScoredSection]) {
    if ranked.is_empty() {
        return;
    }
    log::info!("Top sections after duplicate removal:");
    for (i, scored) in ranked.iter().take(PREVIEW_COUNT).enumerate() {
        log::info!(
            "  {}. [{:.3}] {} ({}, page {})",
            i + 1,
            scored.score,
            scored.section.heading,
            scored.section.source_document,
            scored.section.page
        );
    }
}

/// Run the pipeline once with a fresh [`Pipeline`].
pub fn run(persona: &str, job: &str, config: PipelineConfig) -> Result<RunReport> {
    Pipeline::new(config).run(&Query::new(persona, job))
}
