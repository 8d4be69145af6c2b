//! Section-level types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A heading plus the body text that follows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Heading line text
    pub heading: String,

    /// Whitespace-normalized body text
    pub body: String,

    /// Extractive summary, or the body itself when it is short
    pub summary: String,

    /// Page of the heading line (1-indexed)
    pub page: u32,

    /// Originating file name
    pub source_document: String,
}

impl Section {
    /// Create a section whose summary equals its body.
    pub fn new(
        heading: impl Into<String>,
        body: impl Into<String>,
        page: u32,
        source_document: impl Into<String>,
    ) -> Self {
        let body = body.into();
        Self {
            heading: heading.into(),
            summary: body.clone(),
            body,
            page,
            source_document: source_document.into(),
        }
    }

    /// Replace the summary.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Summary when present, otherwise the body.
    pub fn summary_or_body(&self) -> &str {
        if self.summary.trim().is_empty() {
            &self.body
        } else {
            &self.summary
        }
    }

    /// Number of words in the heading.
    pub fn heading_word_count(&self) -> usize {
        self.heading.split_whitespace().count()
    }

    /// Number of words in the body.
    pub fn body_word_count(&self) -> usize {
        self.body.split_whitespace().count()
    }
}

/// A section with its relevance score.
///
/// Only the relative order of scores within one run is meaningful.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredSection {
    /// Composite relevance score
    pub score: f64,

    /// The scored section
    pub section: Section,
}

impl ScoredSection {
    /// Pair a section with a score.
    pub fn new(section: Section, score: f64) -> Self {
        Self { score, section }
    }
}

/// The ranking query built from persona and job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    persona: String,
    job: String,
    text: String,
}

impl Query {
    /// Build the query text for a persona and a job.
    pub fn new(persona: impl Into<String>, job: impl Into<String>) -> Self {
        let persona = persona.into();
        let job = job.into();
        let text = format!("Persona: {}. Task: {}", persona, job);
        Self { persona, job, text }
    }

    /// The persona as given.
    pub fn persona(&self) -> &str {
        &self.persona
    }

    /// The job as given.
    pub fn job(&self) -> &str {
        &self.job
    }

    /// The text that is vectorized and embedded.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_text() {
        let q = Query::new("Student", "Learn basics");
        assert_eq!(q.text(), "Persona: Student. Task: Learn basics");
        assert_eq!(q.persona(), "Student");
        assert_eq!(q.job(), "Learn basics");
        assert_eq!(q.to_string(), q.text());
    }

    #[test]
    fn test_summary_or_body() {
        let s = Section::new("Data Sources", "Body words here", 3, "a.pdf");
        assert_eq!(s.summary_or_body(), "Body words here");

        let s = s.with_summary("  ");
        assert_eq!(s.summary_or_body(), "Body words here");

        let s = s.with_summary("Short summary");
        assert_eq!(s.summary_or_body(), "Short summary");
        assert_eq!(s.heading_word_count(), 2);
        assert_eq!(s.body_word_count(), 3);
    }
}
