//! Extractive summarization of section bodies.
//!
//! Sentences are weighted with a TF-IDF model fit over the sentences of the
//! text being summarized, never over the document or the corpus. The best
//! sentences are emitted in their original order.

use crate::error::Error;
use crate::text::{normalize_whitespace, split_sentences, TfidfOptions, TfidfVectorizer};

/// Default sentence budget.
pub const DEFAULT_MAX_SENTENCES: usize = 3;

/// Section-scoped extractive summarizer.
#[derive(Debug, Clone)]
pub struct Summarizer {
    max_sentences: usize,
}

impl Summarizer {
    /// Create a summarizer with a sentence budget.
    pub fn new(max_sentences: usize) -> Self {
        Self {
            max_sentences: max_sentences.max(1),
        }
    }

    /// Sentence budget.
    pub fn max_sentences(&self) -> usize {
        self.max_sentences
    }

    /// Condense `text` to at most `max_sentences` sentences.
    pub fn summarize(&self, text: &str) -> String {
        let sentences = split_sentences(text);
        if sentences.len() <= self.max_sentences {
            return normalize_whitespace(text);
        }

        let importance = match sentence_importance(&sentences) {
            Ok(scores) => scores,
            Err(e) => {
                log::debug!("Summary weighting unavailable ({}), keeping leading sentences", e);
                vec![0.0; sentences.len()]
            }
        };

        let mut ranked: Vec<usize> = (0..sentences.len()).collect();
        ranked.sort_by(|&a, &b| {
            importance[b]
                .partial_cmp(&importance[a])
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.cmp(&b))
        });

        let mut chosen: Vec<usize> = ranked.into_iter().take(self.max_sentences).collect();
        chosen.sort_unstable();

        let joined = chosen
            .iter()
            .map(|&i| sentences[i].as_str())
            .collect::<Vec<_>>()
            .join(" ");
        normalize_whitespace(&joined)
    }
}

impl Default for Summarizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SENTENCES)
    }
}

/// Summarize with an explicit sentence budget.
pub fn summarize(text: &str, max_sentences: usize) -> String {
    Summarizer::new(max_sentences).summarize(text)
}

/// Sum of each sentence's normalized TF-IDF weights.
fn sentence_importance(sentences: &[String]) -> Result<Vec<f64>, Error> {
    let (_, rows) = TfidfVectorizer::new(TfidfOptions::default()).fit_transform(sentences)?;
    Ok(rows
        .iter()
        .map(|row| row.iter().map(|(_, w)| w).sum())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_returned_normalized() {
        let text = "First sentence here.   Second   one.\nThird.";
        assert_eq!(
            summarize(text, 3),
            "First sentence here. Second one. Third."
        );
    }

    #[test]
    fn test_keeps_original_order() {
        // 45 words over five sentences; the last sentence carries the most
        // distinct vocabulary, the second the least.
        let text = "Solar panels convert sunlight into electricity for homes today. \
                    Solar panels solar panels solar panels solar panels again. \
                    Batteries store surplus energy generated during bright sunny afternoons. \
                    Solar panels convert sunlight into power for homes. \
                    Inverters transform direct current into alternating current supplying household appliances.";
        assert_eq!(text.split_whitespace().count(), 45);

        let summary = summarize(text, 3);
        let sentences = split_sentences(&summary);
        assert_eq!(sentences.len(), 3);
        assert!(!summary.contains("again."));

        let positions: Vec<usize> = sentences
            .iter()
            .map(|s| text.find(s.as_str()).unwrap())
            .collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
        assert!(summary.ends_with("household appliances."));
    }

    #[test]
    fn test_equal_weights_keep_earlier_sentences() {
        // Every sentence has three distinct terms seen once, so all weigh the same.
        let text = "Red apples grow. Blue pears ripen. Green limes sour. Gold plums drop.";
        assert_eq!(summarize(text, 2), "Red apples grow. Blue pears ripen.");
        assert_eq!(summarize(text, 3), "Red apples grow. Blue pears ripen. Green limes sour.");
    }

    #[test]
    fn test_stop_word_sentences_fall_back_to_leading() {
        let text = "It is. So it was. And then. Or not. By then.";
        assert_eq!(summarize(text, 2), "It is. So it was.");
    }
}
