//! Near-duplicate removal by heading-token overlap.

use std::collections::HashSet;

use crate::model::ScoredSection;

/// Jaccard threshold used when none is given.
pub const DEFAULT_DUPLICATE_THRESHOLD: f64 = 0.8;

/// Jaccard similarity of the lower-cased whitespace tokens of two headings.
///
/// Returns 0.0 when either heading has no tokens.
pub fn heading_similarity(a: &str, b: &str) -> f64 {
    let a = tokens(a);
    let b = tokens(b);
    jaccard(&a, &b)
}

fn tokens(heading: &str) -> HashSet<String> {
    heading
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let shared = a.intersection(b).count() as f64;
    let union = a.union(b).count() as f64;
    shared / union
}

/// Greedy, order-preserving duplicate filter.
#[derive(Debug, Clone, Copy)]
pub struct DuplicateFilter {
    threshold: f64,
}

impl DuplicateFilter {
    /// Create a filter dropping sections whose similarity exceeds `threshold`.
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// The configured threshold.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Keep each section unless its heading is too similar to one already kept.
    ///
    /// The input must be score-descending so the best instance of a
    /// near-duplicate survives.
    pub fn filter(&self, ranked: Vec<ScoredSection>) -> Vec<ScoredSection> {
        let mut kept_tokens: Vec<HashSet<String>> = Vec::new();
        let mut kept = Vec::with_capacity(ranked.len());

        for candidate in ranked {
            let candidate_tokens = tokens(candidate.section.heading.trim());
            let duplicate_of = kept_tokens
                .iter()
                .position(|seen| jaccard(&candidate_tokens, seen) > self.threshold);

            match duplicate_of {
                Some(i) => log::debug!(
                    "Dropping '{}' as near-duplicate of '{}'",
                    candidate.section.heading,
                    kept.get(i)
                        .map(|s: &ScoredSection| s.section.heading.as_str())
                        .unwrap_or_default()
                ),
                None => {
                    kept_tokens.push(candidate_tokens);
                    kept.push(candidate);
                }
            }
        }
        kept
    }
}

impl Default for DuplicateFilter {
    fn default() -> Self {
        Self::new(DEFAULT_DUPLICATE_THRESHOLD)
    }
}
