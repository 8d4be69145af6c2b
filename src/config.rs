//! Pipeline configuration.

use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::render::DEFAULT_REFINED_MAX_WORDS;
use crate::score::ScoringWeights;
use crate::segment::DEFAULT_SUMMARY_MIN_WORDS;
use crate::select::DEFAULT_MAX_SECTIONS;
use crate::summarize::DEFAULT_MAX_SENTENCES;
use crate::text::TfidfOptions;

/// Default input directory.
pub const DEFAULT_INPUT_DIR: &str = "input";

/// Default output directory.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Duplicate threshold applied by the pipeline.
pub const PIPELINE_DUPLICATE_THRESHOLD: f64 = 0.7;

/// Options for one ranking run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory scanned for PDF files
    pub input_dir: PathBuf,

    /// Directory receiving `combined_output.json`
    pub output_dir: PathBuf,

    /// Local sentence-embedding model (None = lexical only)
    pub model_dir: Option<PathBuf>,

    /// Number of final sections
    pub max_sections: usize,

    /// Heading Jaccard similarity above which a section is a duplicate
    pub dedup_threshold: f64,

    /// Summary sentence budget
    pub summary_sentences: usize,

    /// Bodies longer than this many words are summarized
    pub summary_min_words: usize,

    /// Refined text cap in words
    pub refined_max_words: usize,

    /// Segment documents in parallel
    pub parallel: bool,

    /// Composite score weights
    pub weights: ScoringWeights,

    /// Relevance vectorizer options
    pub tfidf: TfidfOptions,
}

impl PipelineConfig {
    /// Create a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the input directory.
    pub fn with_input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.input_dir = dir.into();
        self
    }

    /// Set the output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set the embedding model directory.
    pub fn with_model_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.model_dir = Some(dir.into());
        self
    }

    /// Set the number of final sections.
    pub fn with_max_sections(mut self, max: usize) -> Self {
        self.max_sections = max;
        self
    }

    /// Set the duplicate threshold.
    pub fn with_dedup_threshold(mut self, threshold: f64) -> Self {
        self.dedup_threshold = threshold;
        self
    }

    /// Set the summary sentence budget.
    pub fn with_summary_sentences(mut self, sentences: usize) -> Self {
        self.summary_sentences = sentences;
        self
    }

    /// Enable or disable parallel segmentation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the score weights.
    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.max_sections == 0 {
            return Err(Error::Config("max_sections must be at least 1".to_string()));
        }
        if !(0.0..=1.0).contains(&self.dedup_threshold) {
            return Err(Error::Config(format!(
                "dedup_threshold must be within 0.0..=1.0, got {}",
                self.dedup_threshold
            )));
        }
        if self.summary_sentences == 0 {
            return Err(Error::Config("summary_sentences must be at least 1".to_string()));
        }
        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            model_dir: None,
            max_sections: DEFAULT_MAX_SECTIONS,
            dedup_threshold: PIPELINE_DUPLICATE_THRESHOLD,
            summary_sentences: DEFAULT_MAX_SENTENCES,
            summary_min_words: DEFAULT_SUMMARY_MIN_WORDS,
            refined_max_words: DEFAULT_REFINED_MAX_WORDS,
            parallel: true,
            weights: ScoringWeights::default(),
            tfidf: TfidfOptions::relevance(),
        }
    }
}
