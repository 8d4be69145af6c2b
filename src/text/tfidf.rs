//! TF-IDF vectorization and cosine similarity.
//!
//! The vectorizer lower-cases, tokenizes on word boundaries, optionally drops
//! English stop words, builds word n-grams, prunes the vocabulary by document
//! frequency and caps it by corpus frequency. Weights are raw counts scaled by
//! a smoothed idf, and every row is L2-normalized.

use std::collections::{BTreeMap, HashMap};

use super::stopwords::is_stop_word;
use super::tokens::analyzer_tokens;
use crate::error::{Error, Result};

/// A sparse vector as sorted `(term index, weight)` pairs.
pub type SparseVector = Vec<(usize, f64)>;

/// Vectorizer configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct TfidfOptions {
    /// Inclusive n-gram range (min, max)
    pub ngram_range: (usize, usize),

    /// Minimum number of documents a term must appear in
    pub min_df: usize,

    /// Maximum share of documents a term may appear in (0.0..=1.0)
    pub max_df: f64,

    /// Keep only the most frequent terms (None = unlimited)
    pub max_features: Option<usize>,

    /// Drop English stop words before building n-grams
    pub stop_words: bool,
}

impl TfidfOptions {
    /// Create options with defaults (unigrams, no pruning, stop words removed).
    pub fn new() -> Self {
        Self::default()
    }

    /// Options used to compare the query with sections.
    pub fn relevance() -> Self {
        Self {
            ngram_range: (1, 2),
            min_df: 1,
            max_df: 0.95,
            max_features: Some(5000),
            stop_words: true,
        }
    }

    /// Set the n-gram range.
    pub fn with_ngram_range(mut self, min: usize, max: usize) -> Self {
        self.ngram_range = (min.max(1), max.max(min.max(1)));
        self
    }

    /// Set the maximum document-frequency share.
    pub fn with_max_df(mut self, max_df: f64) -> Self {
        self.max_df = max_df;
        self
    }

    /// Set the vocabulary cap.
    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = Some(max_features);
        self
    }
}

impl Default for TfidfOptions {
    fn default() -> Self {
        Self {
            ngram_range: (1, 1),
            min_df: 1,
            max_df: 1.0,
            max_features: None,
            stop_words: true,
        }
    }
}

/// Unfitted vectorizer.
#[derive(Debug, Clone, Default)]
pub struct TfidfVectorizer {
    options: TfidfOptions,
}

/// Vocabulary and idf weights learned from a corpus.
#[derive(Debug, Clone)]
pub struct FittedTfidf {
    options: TfidfOptions,
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Create a vectorizer.
    pub fn new(options: TfidfOptions) -> Self {
        Self { options }
    }

    /// Learn vocabulary and idf from `docs`, returning the fitted model and
    /// the document rows.
    pub fn fit_transform<S: AsRef<str>>(&self, docs: &[S]) -> Result<(FittedTfidf, Vec<SparseVector>)> {
        let fitted = self.fit(docs)?;
        let rows = docs.iter().map(|d| fitted.transform(d.as_ref())).collect();
        Ok((fitted, rows))
    }

    /// Learn vocabulary and idf from `docs`.
    pub fn fit<S: AsRef<str>>(&self, docs: &[S]) -> Result<FittedTfidf> {
        let opts = &self.options;
        let n_docs = docs.len();

        let mut doc_freq: BTreeMap<String, usize> = BTreeMap::new();
        let mut term_freq: HashMap<String, usize> = HashMap::new();
        for doc in docs {
            let counts = count_terms(doc.as_ref(), opts);
            for (term, count) in counts {
                *term_freq.entry(term.clone()).or_insert(0) += count;
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        if doc_freq.is_empty() {
            return Err(Error::EmptyVocabulary(
                "documents contain only stop words or no words at all".to_string(),
            ));
        }

        let max_doc_count = opts.max_df * n_docs as f64;
        if max_doc_count < opts.min_df as f64 {
            return Err(Error::EmptyVocabulary(format!(
                "max_df admits fewer documents ({:.2}) than min_df ({})",
                max_doc_count, opts.min_df
            )));
        }

        let mut kept: Vec<(String, usize)> = doc_freq
            .into_iter()
            .filter(|(_, df)| *df >= opts.min_df && (*df as f64) <= max_doc_count)
            .collect();

        if let Some(limit) = opts.max_features {
            if kept.len() > limit {
                // Highest corpus frequency first; BTreeMap order already
                // sorted the terms alphabetically for ties.
                kept.sort_by(|(a, _), (b, _)| term_freq[b].cmp(&term_freq[a]).then_with(|| a.cmp(b)));
                kept.truncate(limit);
                kept.sort_by(|(a, _), (b, _)| a.cmp(b));
            }
        }

        if kept.is_empty() {
            return Err(Error::EmptyVocabulary(
                "no terms remain after document-frequency pruning".to_string(),
            ));
        }

        let mut vocabulary = HashMap::with_capacity(kept.len());
        let mut idf = Vec::with_capacity(kept.len());
        for (index, (term, df)) in kept.into_iter().enumerate() {
            idf.push(((1.0 + n_docs as f64) / (1.0 + df as f64)).ln() + 1.0);
            vocabulary.insert(term, index);
        }

        Ok(FittedTfidf {
            options: opts.clone(),
            vocabulary,
            idf,
        })
    }
}

impl FittedTfidf {
    /// Number of terms in the vocabulary.
    pub fn vocabulary_len(&self) -> usize {
        self.idf.len()
    }

    /// Check whether a term survived pruning.
    pub fn contains(&self, term: &str) -> bool {
        self.vocabulary.contains_key(term)
    }

    /// Vectorize a text against the fitted vocabulary (L2-normalized).
    pub fn transform(&self, text: &str) -> SparseVector {
        let mut row: SparseVector = count_terms(text, &self.options)
            .into_iter()
            .filter_map(|(term, count)| {
                self.vocabulary
                    .get(&term)
                    .map(|&idx| (idx, count as f64 * self.idf[idx]))
            })
            .collect();
        row.sort_by_key(|(idx, _)| *idx);

        let norm = row.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in &mut row {
                *w /= norm;
            }
        }
        row
    }
}

/// Count the n-grams of one document.
fn count_terms(text: &str, opts: &TfidfOptions) -> HashMap<String, usize> {
    let tokens: Vec<String> = analyzer_tokens(text)
        .into_iter()
        .filter(|t| !(opts.stop_words && is_stop_word(t)))
        .collect();

    let mut counts = HashMap::new();
    let (min_n, max_n) = opts.ngram_range;
    for n in min_n..=max_n {
        if n == 0 || n > tokens.len() {
            continue;
        }
        for window in tokens.windows(n) {
            *counts.entry(window.join(" ")).or_insert(0) += 1;
        }
    }
    counts
}

/// Cosine similarity of two sparse vectors sorted by index.
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f64 {
    let mut dot = 0.0;
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                dot += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    let norm_a = a.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_transform_basic() {
        let docs = ["graph neural networks", "convolutional neural networks", "travel guide"];
        let (model, rows) = TfidfVectorizer::new(TfidfOptions::default())
            .fit_transform(&docs)
            .unwrap();
        assert_eq!(model.vocabulary_len(), 6);
        assert_eq!(rows.len(), 3);

        let norm: f64 = rows[0].iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-9);

        let q = model.transform("neural networks");
        assert!(cosine_similarity(&q, &rows[0]) > 0.0);
        assert_eq!(cosine_similarity(&q, &rows[2]), 0.0);
    }

    #[test]
    fn test_bigrams_and_stop_words() {
        let docs = ["the method of analysis", "a different approach entirely"];
        let model = TfidfVectorizer::new(TfidfOptions::relevance()).fit(&docs).unwrap();
        assert!(model.contains("method analysis"));
        assert!(model.contains("method"));
        assert!(!model.contains("the"));
        assert!(!model.contains("the method"));
    }

    #[test]
    fn test_max_df_prunes_common_terms() {
        let docs = ["shared alpha", "shared beta", "shared gamma"];
        let model = TfidfVectorizer::new(TfidfOptions::default().with_max_df(0.95))
            .fit(&docs)
            .unwrap();
        assert!(!model.contains("shared"));
        assert!(model.contains("alpha"));
    }

    #[test]
    fn test_single_document_relevance_is_empty() {
        let docs = ["only one section here"];
        let result = TfidfVectorizer::new(TfidfOptions::relevance()).fit(&docs);
        assert!(matches!(result, Err(Error::EmptyVocabulary(_))));
    }

    #[test]
    fn test_stop_words_only_is_empty() {
        let docs = ["the and of", "to be or not"];
        let result = TfidfVectorizer::new(TfidfOptions::default()).fit(&docs);
        assert!(matches!(result, Err(Error::EmptyVocabulary(_))));
    }

    #[test]
    fn test_max_features_keeps_most_frequent() {
        let docs = ["apple apple banana", "apple cherry", "banana date"];
        let model = TfidfVectorizer::new(TfidfOptions::default().with_max_features(2))
            .fit(&docs)
            .unwrap();
        assert_eq!(model.vocabulary_len(), 2);
        assert!(model.contains("apple"));
        assert!(model.contains("banana"));
    }

    #[test]
    fn test_smoothed_idf() {
        let docs = ["alpha beta", "alpha"];
        let (_, rows) = TfidfVectorizer::new(TfidfOptions::default())
            .fit_transform(&docs)
            .unwrap();
        // alpha: idf = ln(3/3) + 1 = 1; beta: idf = ln(3/2) + 1
        let beta_idf = (1.5f64).ln() + 1.0;
        let norm = (1.0 + beta_idf * beta_idf).sqrt();
        assert!((rows[0][0].1 - 1.0 / norm).abs() < 1e-9);
        assert!((rows[0][1].1 - beta_idf / norm).abs() < 1e-9);
        assert_eq!(rows[1], vec![(0, 1.0)]);
    }
}
