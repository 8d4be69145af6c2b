//! Minimum-content checks applied to assembled sections.

use crate::model::Section;

/// Headings that mark boilerplate sections (compared lower-cased and trimmed).
pub const DEFAULT_SKIP_HEADINGS: &[&str] = &[
    "acknowledgment",
    "acknowledgments",
    "references",
    "bibliography",
    "table of contents",
    "index",
    "appendix",
    "glossary",
    "about the author",
    "about this book",
    "copyright",
    "introduction",
    "preface",
    "foreword",
];

const MIN_HEADING_WORDS: usize = 2;
const MIN_BODY_WORDS: usize = 10;

/// Why a section was discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationFailure {
    EmptyHeading,
    EmptyBody,
    HeadingTooShort,
    BodyTooShort,
    SkipListed,
}

type Check = fn(&SectionValidator, &Section) -> bool;

const CHECKS: &[(ValidationFailure, Check)] = &[
    (ValidationFailure::EmptyHeading, SectionValidator::heading_empty),
    (ValidationFailure::EmptyBody, SectionValidator::body_empty),
    (ValidationFailure::HeadingTooShort, SectionValidator::heading_short),
    (ValidationFailure::BodyTooShort, SectionValidator::body_short),
    (ValidationFailure::SkipListed, SectionValidator::is_skip_listed),
];

/// Filters degenerate sections.
#[derive(Debug, Clone)]
pub struct SectionValidator {
    skip_headings: Vec<String>,
}

impl SectionValidator {
    /// Create a validator with the default skip-list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the skip-list.
    pub fn with_skip_headings<I, S>(mut self, headings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.skip_headings = headings
            .into_iter()
            .map(|h| h.as_ref().trim().to_lowercase())
            .collect();
        self
    }

    /// Check one section, reporting the first failed check.
    pub fn validate(&self, section: &Section) -> Result<(), ValidationFailure> {
        match CHECKS.iter().find(|(_, check)| check(self, section)) {
            Some((failure, _)) => Err(*failure),
            None => Ok(()),
        }
    }

    /// Check if a section passes every check.
    pub fn is_valid(&self, section: &Section) -> bool {
        self.validate(section).is_ok()
    }

    /// Keep only valid sections, preserving order.
    pub fn filter(&self, sections: Vec<Section>) -> Vec<Section> {
        sections
            .into_iter()
            .filter(|s| match self.validate(s) {
                Ok(()) => true,
                Err(reason) => {
                    log::debug!(
                        "{} p{}: dropped '{}' ({:?})",
                        s.source_document,
                        s.page,
                        s.heading,
                        reason
                    );
                    false
                }
            })
            .collect()
    }

    fn heading_empty(&self, section: &Section) -> bool {
        section.heading.trim().is_empty()
    }

    fn body_empty(&self, section: &Section) -> bool {
        section.body.trim().is_empty()
    }

    fn heading_short(&self, section: &Section) -> bool {
        section.heading_word_count() < MIN_HEADING_WORDS
    }

    fn body_short(&self, section: &Section) -> bool {
        section.body_word_count() < MIN_BODY_WORDS
    }

    fn is_skip_listed(&self, section: &Section) -> bool {
        let heading = section.heading.trim().to_lowercase();
        self.skip_headings.iter().any(|h| *h == heading)
    }
}

impl Default for SectionValidator {
    fn default() -> Self {
        Self {
            skip_headings: DEFAULT_SKIP_HEADINGS.iter().map(|h| h.to_string()).collect(),
        }
    }
}
