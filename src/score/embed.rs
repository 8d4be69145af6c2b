//! Sentence-embedding backends.
//!
//! The scorer only sees the [`Embedder`] trait. A local BERT-family model is
//! available with the `semantic` cargo feature; without it
//! [`load_embedder`] always fails and scoring runs lexical-only.

use std::path::Path;
use std::sync::Arc;

use crate::error::{Error, Result};

/// Probe sentences for the model self-check.
pub const PROBE_SENTENCES: [&str; 2] = [
    "Planning a trip with a group of friends.",
    "Organizing travel for several college students.",
];

/// Trait for sentence-embedding backends.
pub trait Embedder: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &str;

    /// Embed a batch of texts; one vector per input, in input order.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    /// Embed a single text.
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[text])?
            .into_iter()
            .next()
            .ok_or_else(|| Error::Embedding("backend returned no vector".to_string()))
    }
}

/// Cosine similarity of two dense vectors (0.0 on length mismatch or zero norm).
pub fn dense_cosine(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let (mut dot, mut na, mut nb) = (0.0f64, 0.0f64, 0.0f64);
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    if na == 0.0 || nb == 0.0 {
        0.0
    } else {
        dot / (na.sqrt() * nb.sqrt())
    }
}

/// Embed the probe sentences and return their cosine similarity.
pub fn probe_similarity(embedder: &dyn Embedder) -> Result<f64> {
    let vectors = embedder.embed_batch(&PROBE_SENTENCES)?;
    match vectors.as_slice() {
        [a, b] => Ok(dense_cosine(a, b)),
        _ => Err(Error::Embedding(format!(
            "expected 2 probe vectors, got {}",
            vectors.len()
        ))),
    }
}

/// Load the embedding model stored in `model_dir`.
#[cfg(feature = "semantic")]
pub fn load_embedder(model_dir: &Path) -> Result<Arc<dyn Embedder>> {
    let embedder = super::minilm::MiniLmEmbedder::from_dir(model_dir)?;
    Ok(Arc::new(embedder))
}

/// Load the embedding model stored in `model_dir`.
#[cfg(not(feature = "semantic"))]
pub fn load_embedder(model_dir: &Path) -> Result<Arc<dyn Embedder>> {
    Err(Error::Embedding(format!(
        "cannot load {}: built without the `semantic` feature",
        model_dir.display()
    )))
}
