//! Domain keyword extraction for enhanced section text.

use regex::Regex;

use crate::text::normalize_whitespace;

/// Maximum number of keywords appended to a section.
pub const MAX_KEYWORDS: usize = 10;

/// Pulls title-case terms, academic-suffix words and technical stems out of
/// a text.
#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    connectors: Regex,
    patterns: Vec<Regex>,
    limit: usize,
}

impl KeywordExtractor {
    /// Create an extractor returning at most [`MAX_KEYWORDS`] terms.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the keyword limit.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Extract keywords in pattern order, lower-cased.
    ///
    /// Connector words are removed before matching, so a title-case run may
    /// span them.
    pub fn extract(&self, text: &str) -> Vec<String> {
        let stripped = self.connectors.replace_all(text, " ");
        let haystack: &str = &stripped;
        self.patterns
            .iter()
            .flat_map(|re| re.find_iter(haystack))
            .take(self.limit)
            .map(|m| normalize_whitespace(m.as_str()).to_lowercase())
            .collect()
    }

    /// Extracted keywords joined by single spaces.
    pub fn extract_joined(&self, text: &str) -> String {
        self.extract(text).join(" ")
    }
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        let compile = |p: &str| Regex::new(p).expect("valid keyword pattern");
        Self {
            connectors: compile(r"(?i)\b(?:the|and|or|but|in|on|at|to|for|of|with|by)\b"),
            patterns: vec![
                // Title-case terms
                compile(r"\b[A-Z][a-z]+(?:\s+[A-Z][a-z]+)*\b"),
                // Academic suffixes
                compile(r"(?i)\b\w+(?:ology|ics|ism|tion|sion|ment|ness|ity)\b"),
                // Technical stems
                compile(r"(?i)\b(?:method|approach|technique|algorithm|model|framework)\w*\b"),
            ],
            limit: MAX_KEYWORDS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_order() {
        let kw = KeywordExtractor::new().extract(
            "Graph Neural Networks use a message passing framework for classification.",
        );
        assert_eq!(
            kw,
            vec!["graph neural networks", "classification", "framework"]
        );
    }

    #[test]
    fn test_connectors_removed() {
        let kw = KeywordExtractor::new().extract("Museums of Nice");
        assert_eq!(kw, vec!["museums nice"]);
    }

    #[test]
    fn test_limit() {
        let text = "Alpha Beta. Gamma? Delta! Epsilon; Zeta, Eta: Theta. Iota - Kappa + Lambda / Mu";
        let kw = KeywordExtractor::new().extract(text);
        assert_eq!(kw.len(), MAX_KEYWORDS);
        assert_eq!(kw[0], "alpha beta");

        let kw = KeywordExtractor::new().with_limit(2).extract(text);
        assert_eq!(kw, vec!["alpha beta", "gamma"]);
    }

    #[test]
    fn test_no_keywords() {
        assert!(KeywordExtractor::new().extract("just plain words").is_empty());
        assert_eq!(KeywordExtractor::new().extract_joined(""), "");
    }
}
