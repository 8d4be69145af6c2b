//! Relevance scoring of sections against a persona/job query.
//!
//! The composite score fuses semantic and lexical similarity of the query
//! with each section's enhanced text, plus small structural bonuses for
//! keyword overlap, position, heading quality and length.

mod embed;
mod keywords;
#[cfg(feature = "semantic")]
mod minilm;
mod similarity;

pub use embed::{dense_cosine, load_embedder, probe_similarity, Embedder, PROBE_SENTENCES};
pub use keywords::{KeywordExtractor, MAX_KEYWORDS};
#[cfg(feature = "semantic")]
pub use minilm::MiniLmEmbedder;
pub use similarity::{SimilarityBackend, SimilarityMode};

use std::collections::HashMap;

use crate::model::{Query, ScoredSection, Section};
use crate::text::{cosine_similarity, word_count, word_set, TfidfOptions, TfidfVectorizer};

/// Heading terms that earn the descriptive-heading bonus.
const DESCRIPTIVE_HEADING_TERMS: &[&str] = &["method", "result", "analysis", "approach", "technique"];

/// Weights of the composite score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    /// Embedding similarity (or its lexical stand-in)
    pub semantic: f64,
    /// TF-IDF cosine similarity
    pub lexical: f64,
    /// Query/section word overlap
    pub keyword: f64,
    /// Page and order bonus
    pub position: f64,
    /// Heading quality bonus
    pub heading: f64,
    /// Content length bonus
    pub length: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            semantic: 0.40,
            lexical: 0.30,
            keyword: 0.10,
            position: 0.10,
            heading: 0.05,
            length: 0.05,
        }
    }
}

/// Sections ordered by descending score, with the similarity mode used.
#[derive(Debug, Clone)]
pub struct Ranking {
    /// Score-descending sections
    pub sections: Vec<ScoredSection>,
    /// Signal that actually fed the semantic weight
    pub mode: SimilarityMode,
}

/// Hybrid relevance scorer.
#[derive(Debug, Clone)]
pub struct RelevanceScorer {
    weights: ScoringWeights,
    tfidf: TfidfOptions,
    keywords: KeywordExtractor,
    backend: SimilarityBackend,
}

impl RelevanceScorer {
    /// Create a scorer with default weights around a similarity backend.
    pub fn new(backend: SimilarityBackend) -> Self {
        Self {
            weights: ScoringWeights::default(),
            tfidf: TfidfOptions::relevance(),
            keywords: KeywordExtractor::new(),
            backend,
        }
    }

    /// Set the score weights.
    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Set the vectorizer options.
    pub fn with_tfidf_options(mut self, options: TfidfOptions) -> Self {
        self.tfidf = options;
        self
    }

    /// The configured backend.
    pub fn backend(&self) -> &SimilarityBackend {
        &self.backend
    }

    /// Score sections, highest first.
    pub fn score(&self, query: &Query, sections: Vec<Section>) -> Vec<ScoredSection> {
        self.rank(query, sections).sections
    }

    /// Score sections and report which similarity mode was used.
    ///
    /// Sections are expected in document order; the position bonus depends
    /// on each section's index within its own document. Equal scores keep
    /// their input order.
    pub fn rank(&self, query: &Query, sections: Vec<Section>) -> Ranking {
        let mut mode = self.backend.mode();
        if sections.is_empty() {
            return Ranking {
                sections: Vec::new(),
                mode,
            };
        }

        let enhanced: Vec<String> = sections.iter().map(|s| self.enhanced_text(s)).collect();
        let lexical = self.lexical_scores(query.text(), &enhanced);

        let semantic = match self.backend.similarities(query.text(), &enhanced) {
            Ok(Some(scores)) => scores,
            Ok(None) => lexical.clone(),
            Err(e) => {
                log::warn!("Semantic scoring failed ({}), using lexical similarity for this run", e);
                mode = SimilarityMode::LexicalOnly;
                lexical.clone()
            }
        };

        let positions = position_bonuses(&sections);
        let query_words = word_set(query.text());
        let w = &self.weights;

        let mut scored: Vec<ScoredSection> = sections
            .into_iter()
            .enumerate()
            .map(|(i, section)| {
                let section_words = word_set(&enhanced[i]);
                let overlap = query_words.intersection(&section_words).count() as f64
                    / query_words.len().max(1) as f64;

                let score = w.semantic * semantic[i]
                    + w.lexical * lexical[i]
                    + w.keyword * overlap
                    + w.position * positions[i]
                    + w.heading * heading_bonus(&section.heading)
                    + w.length * length_bonus(section.summary_or_body());
                ScoredSection::new(section, score)
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Ranking {
            sections: scored,
            mode,
        }
    }

    /// Heading, summary and extracted keywords as one string.
    pub fn enhanced_text(&self, section: &Section) -> String {
        let heading = section.heading.trim();
        let content = section.summary_or_body().trim();
        let keywords = self.keywords.extract_joined(&format!("{} {}", heading, content));
        format!("{}. {} {}", heading, content, keywords)
            .trim()
            .to_string()
    }

    fn lexical_scores(&self, query: &str, texts: &[String]) -> Vec<f64> {
        match TfidfVectorizer::new(self.tfidf.clone()).fit_transform(texts) {
            Ok((model, rows)) => {
                let q = model.transform(query);
                rows.iter().map(|row| cosine_similarity(&q, row)).collect()
            }
            Err(e) => {
                log::warn!("Lexical scoring unavailable ({}), lexical scores set to zero", e);
                vec![0.0; texts.len()]
            }
        }
    }
}

impl Default for RelevanceScorer {
    fn default() -> Self {
        Self::new(SimilarityBackend::default())
    }
}

/// Page and in-document order bonus for every section.
fn position_bonuses(sections: &[Section]) -> Vec<f64> {
    let mut totals: HashMap<&str, usize> = HashMap::new();
    for s in sections {
        *totals.entry(s.source_document.as_str()).or_insert(0) += 1;
    }

    let mut seen: HashMap<&str, usize> = HashMap::new();
    sections
        .iter()
        .map(|s| {
            let doc = s.source_document.as_str();
            let index = seen.entry(doc).or_insert(0);
            let i = *index as f64;
            *index += 1;
            let n = totals[doc] as f64;

            let page_bonus = ((10.0 - s.page as f64) / 10.0 * 0.1).max(0.0);
            let order_bonus = ((n - i) / n * 0.05).max(0.0);
            page_bonus + order_bonus
        })
        .collect()
}

fn heading_bonus(heading: &str) -> f64 {
    let mut bonus = 0.0;
    if heading.split_whitespace().count() >= 2 {
        bonus += 0.05;
    }
    let lower = heading.to_lowercase();
    if DESCRIPTIVE_HEADING_TERMS.iter().any(|t| lower.contains(t)) {
        bonus += 0.10;
    }
    bonus
}

fn length_bonus(content: &str) -> f64 {
    (word_count(content) as f64 / 100.0).min(0.1)
}

#[cfg(test)]
mod tests {
    use super::embed::testing::{BrokenEmbedder, LetterEmbedder};
    use super::*;
    use std::sync::Arc;

    fn section(heading: &str, body: &str, page: u32, doc: &str) -> Section {
        Section::new(heading, body, page, doc)
    }

    #[test]
    fn test_heading_bonus() {
        assert_eq!(heading_bonus("Overview"), 0.0);
        assert!((heading_bonus("Travel Tips") - 0.05).abs() < 1e-12);
        assert!((heading_bonus("Results") - 0.10).abs() < 1e-12);
        assert!((heading_bonus("Analysis Approach") - 0.15).abs() < 1e-12);
    }

    #[test]
    fn test_length_bonus_capped() {
        assert!((length_bonus("one two three four five") - 0.05).abs() < 1e-12);
        assert_eq!(length_bonus(&"word ".repeat(500)), 0.1);
    }

    #[test]
    fn test_position_bonus_per_document() {
        let sections = vec![
            section("A One", "x", 1, "a.pdf"),
            section("B One", "x", 1, "b.pdf"),
            section("A Two", "x", 12, "a.pdf"),
        ];
        let bonuses = position_bonuses(&sections);
        // a.pdf first of two on page 1
        assert!((bonuses[0] - (0.09 + 0.05)).abs() < 1e-12);
        // b.pdf only section
        assert!((bonuses[1] - (0.09 + 0.05)).abs() < 1e-12);
        // a.pdf second of two, page past 10
        assert!((bonuses[2] - 0.025).abs() < 1e-12);
    }

    #[test]
    fn test_enhanced_text() {
        let scorer = RelevanceScorer::default();
        let s = section("Coastal Adventures", "Try kayaking near the harbour.", 1, "a.pdf");
        assert_eq!(
            scorer.enhanced_text(&s),
            "Coastal Adventures. Try kayaking near the harbour. coastal adventures try"
        );
    }

    #[test]
    fn test_rank_prefers_relevant_sections() {
        let sections = vec![
            section(
                "Nightlife Options",
                "Bars and clubs stay open late along the promenade every weekend.",
                1,
                "a.pdf",
            ),
            section(
                "Group Travel Planning",
                "Planning a trip for a group of college friends requires booking early.",
                1,
                "b.pdf",
            ),
            section(
                "Regional Wines",
                "Vineyards offer tastings of local red and rose wines in summer.",
                1,
                "c.pdf",
            ),
        ];
        let query = Query::new("Travel Planner", "Plan a trip for a group of college friends");
        let ranking = RelevanceScorer::default().rank(&query, sections);
        assert_eq!(ranking.mode, SimilarityMode::LexicalOnly);
        assert_eq!(ranking.sections.len(), 3);
        assert_eq!(ranking.sections[0].section.heading, "Group Travel Planning");
        assert!(ranking
            .sections
            .windows(2)
            .all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_single_section_scores_without_lexical() {
        let query = Query::new("Student", "Learn basics");
        let sections = vec![section("Basic Concepts", "Learn the basics of the field quickly.", 2, "a.pdf")];
        let ranking = RelevanceScorer::default().rank(&query, sections);
        assert_eq!(ranking.sections.len(), 1);
        assert!(ranking.sections[0].score > 0.0);
    }

    #[test]
    fn test_semantic_backend_used() {
        let scorer = RelevanceScorer::new(SimilarityBackend::semantic(Arc::new(LetterEmbedder)));
        let query = Query::new("Student", "Learn basics");
        let ranking = scorer.rank(
            &query,
            vec![
                section("Basic Concepts", "Learn the basics of the field.", 1, "a.pdf"),
                section("Zoo Keeping", "Quokka zebu yak.", 1, "b.pdf"),
            ],
        );
        assert_eq!(ranking.mode, SimilarityMode::Semantic);
    }

    #[test]
    fn test_embedder_failure_degrades_run() {
        let scorer = RelevanceScorer::new(SimilarityBackend::semantic(Arc::new(BrokenEmbedder)));
        let query = Query::new("Student", "Learn basics");
        let sections = vec![
            section("Basic Concepts", "Learn the basics of the field.", 1, "a.pdf"),
            section("Zoo Keeping", "Quokka zebu yak.", 1, "b.pdf"),
        ];
        let degraded = scorer.rank(&query, sections.clone());
        assert_eq!(degraded.mode, SimilarityMode::LexicalOnly);

        let lexical = RelevanceScorer::default().rank(&query, sections);
        let a: Vec<f64> = degraded.sections.iter().map(|s| s.score).collect();
        let b: Vec<f64> = lexical.sections.iter().map(|s| s.score).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_input() {
        let query = Query::new("Student", "Learn basics");
        assert!(RelevanceScorer::default().score(&query, Vec::new()).is_empty());
    }
}
