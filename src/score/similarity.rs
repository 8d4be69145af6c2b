//! Similarity strategy selected once per run.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use super::embed::{dense_cosine, load_embedder, Embedder};
use crate::error::Result;

/// Which similarity signal fed the semantic weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimilarityMode {
    /// Embedding cosine similarity
    Semantic,
    /// Lexical similarity substituted for the semantic signal
    LexicalOnly,
}

impl fmt::Display for SimilarityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimilarityMode::Semantic => f.write_str("semantic + lexical"),
            SimilarityMode::LexicalOnly => f.write_str("lexical only"),
        }
    }
}

/// Source of the semantic similarity signal.
#[derive(Clone)]
pub enum SimilarityBackend {
    /// Sentence embeddings from a loaded model
    Semantic(Arc<dyn Embedder>),
    /// No embedder; lexical similarity stands in
    LexicalOnly,
}

impl SimilarityBackend {
    /// Backend without an embedder.
    pub fn lexical() -> Self {
        SimilarityBackend::LexicalOnly
    }

    /// Backend around an embedder.
    pub fn semantic(embedder: Arc<dyn Embedder>) -> Self {
        SimilarityBackend::Semantic(embedder)
    }

    /// Pick a backend by trying to load the model in `model_dir`.
    ///
    /// A missing directory or a load failure selects the lexical backend and
    /// logs a single warning.
    pub fn detect(model_dir: Option<&Path>) -> Self {
        let Some(dir) = model_dir else {
            log::info!("No model directory configured, using lexical similarity only");
            return Self::lexical();
        };
        match load_embedder(dir) {
            Ok(embedder) => {
                log::info!("Semantic similarity enabled ({})", embedder.name());
                Self::semantic(embedder)
            }
            Err(e) => {
                log::warn!("Semantic model unavailable ({}), falling back to lexical similarity", e);
                Self::lexical()
            }
        }
    }

    /// The mode this backend runs in when it does not fail.
    pub fn mode(&self) -> SimilarityMode {
        match self {
            SimilarityBackend::Semantic(_) => SimilarityMode::Semantic,
            SimilarityBackend::LexicalOnly => SimilarityMode::LexicalOnly,
        }
    }

    /// Semantic similarity of `query` against every text, or `None` when the
    /// lexical scores must stand in.
    pub fn similarities(&self, query: &str, texts: &[String]) -> Result<Option<Vec<f64>>> {
        let embedder = match self {
            SimilarityBackend::Semantic(embedder) => embedder,
            SimilarityBackend::LexicalOnly => return Ok(None),
        };
        let query_vec = embedder.embed(query)?;
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let vectors = embedder.embed_batch(&refs)?;
        Ok(Some(
            vectors.iter().map(|v| dense_cosine(&query_vec, v)).collect(),
        ))
    }
}

impl fmt::Debug for SimilarityBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimilarityBackend::Semantic(e) => f.debug_tuple("Semantic").field(&e.name()).finish(),
            SimilarityBackend::LexicalOnly => f.write_str("LexicalOnly"),
        }
    }
}

impl Default for SimilarityBackend {
    fn default() -> Self {
        Self::lexical()
    }
}
