//! Grouping of classified lines into sections.

use super::font_profile::FontProfile;
use super::heading::HeadingClassifier;
use crate::model::{PageLayout, Section};
use crate::summarize::Summarizer;
use crate::text::{normalize_whitespace, word_count};

/// Bodies longer than this many words are summarized.
pub const DEFAULT_SUMMARY_MIN_WORDS: usize = 40;

/// Streams a document's lines and emits (heading, body) sections.
#[derive(Debug, Clone)]
pub struct SectionAssembler {
    summarizer: Summarizer,
    summary_min_words: usize,
}

/// The section currently being filled.
struct OpenSection {
    heading: String,
    page: u32,
    body: Vec<String>,
}

impl SectionAssembler {
    /// Create an assembler.
    pub fn new(summarizer: Summarizer, summary_min_words: usize) -> Self {
        Self {
            summarizer,
            summary_min_words,
        }
    }

    /// Segment one document.
    ///
    /// The font profile is computed over the whole document before any line
    /// is classified. Lines before the first heading are discarded, and a
    /// heading followed directly by another heading yields no section.
    pub fn assemble(&self, document: &str, pages: &[PageLayout]) -> Vec<Section> {
        let profile = FontProfile::from_pages(pages);
        let Some(body_font) = profile.body_font() else {
            log::debug!("{}: no text runs, nothing to segment", document);
            return Vec::new();
        };
        log::debug!(
            "{}: body font {:.1}pt{}",
            document,
            body_font.size,
            if body_font.is_bold { " bold" } else { "" }
        );

        let classifier = HeadingClassifier::new(body_font);
        self.assemble_with(&classifier, document, pages)
    }

    /// Segment one document with an existing classifier.
    pub fn assemble_with(
        &self,
        classifier: &HeadingClassifier,
        document: &str,
        pages: &[PageLayout],
    ) -> Vec<Section> {
        let mut sections = Vec::new();
        let mut current: Option<OpenSection> = None;

        for line in pages.iter().flat_map(|p| p.lines.iter()) {
            let text = line.text();
            if text.is_empty() {
                continue;
            }

            let decision = classifier.classify_line(line);
            log::trace!("{} p{} {:?}: {}", document, line.page, decision, text);

            if decision.is_heading() {
                if let Some(open) = current.take() {
                    self.finalize(open, document, &mut sections);
                }
                current = Some(OpenSection {
                    heading: text,
                    page: line.page,
                    body: Vec::new(),
                });
            } else if let Some(open) = current.as_mut() {
                open.body.push(text);
            }
        }

        if let Some(open) = current {
            self.finalize(open, document, &mut sections);
        }

        sections
    }

    fn finalize(&self, open: OpenSection, document: &str, sections: &mut Vec<Section>) {
        let body = normalize_whitespace(&open.body.join(" "));
        if body.is_empty() {
            return;
        }
        let summary = if word_count(&body) > self.summary_min_words {
            self.summarizer.summarize(&body)
        } else {
            body.clone()
        };
        sections.push(Section::new(open.heading, body, open.page, document).with_summary(summary));
    }
}

impl Default for SectionAssembler {
    fn default() -> Self {
        Self::new(Summarizer::default(), DEFAULT_SUMMARY_MIN_WORDS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LayoutLine, TextRun};

    fn heading(text: &str, page: u32) -> LayoutLine {
        LayoutLine::from_run(TextRun::bold(text, 16.0, page))
    }

    fn body(text: &str, page: u32) -> LayoutLine {
        LayoutLine::from_run(TextRun::new(text, 10.0, page))
    }

    fn page(number: u32, lines: Vec<LayoutLine>) -> PageLayout {
        let mut p = PageLayout::new(number);
        lines.into_iter().for_each(|l| p.push_line(l));
        p
    }

    #[test]
    fn test_basic_sections() {
        let pages = vec![
            page(
                1,
                vec![
                    body("preamble text that has no heading yet", 1),
                    heading("Getting Started", 1),
                    body("install the tool and run it", 1),
                    body("then read the output carefully", 1),
                ],
            ),
            page(
                2,
                vec![
                    heading("Advanced Usage", 2),
                    body("configure thresholds for your corpus", 2),
                ],
            ),
        ];

        let sections = SectionAssembler::default().assemble("guide.pdf", &pages);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].heading, "Getting Started");
        assert_eq!(
            sections[0].body,
            "install the tool and run it then read the output carefully"
        );
        assert_eq!(sections[0].summary, sections[0].body);
        assert_eq!(sections[0].page, 1);
        assert_eq!(sections[0].source_document, "guide.pdf");
        assert_eq!(sections[1].heading, "Advanced Usage");
        assert_eq!(sections[1].page, 2);
    }

    #[test]
    fn test_consecutive_headings_dropped() {
        let pages = vec![page(
            1,
            vec![
                heading("Empty Heading", 1),
                heading("Real Heading", 1),
                body("some body words for the real heading", 1),
                heading("Trailing Heading", 1),
            ],
        )];
        let sections = SectionAssembler::default().assemble("a.pdf", &pages);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].heading, "Real Heading");
    }

    #[test]
    fn test_long_body_is_summarized() {
        let sentence = "Travellers enjoy quiet beaches near the old harbour town.";
        let other = [
            "Local markets sell fresh seafood every single morning.",
            "Museums display ancient pottery from regional excavations.",
            "Evening concerts fill the central square with music.",
            "Cyclists follow coastal paths between neighbouring villages.",
            "Small cafes serve strong coffee beside the marina.",
        ];
        let mut lines = vec![heading("Coastal Highlights", 1)];
        lines.push(body(sentence, 1));
        for s in other {
            lines.push(body(s, 1));
        }
        let pages = vec![page(1, lines)];

        let sections = SectionAssembler::default().assemble("a.pdf", &pages);
        assert_eq!(sections.len(), 1);
        assert!(word_count(&sections[0].body) > DEFAULT_SUMMARY_MIN_WORDS);
        assert_ne!(sections[0].summary, sections[0].body);
        assert_eq!(crate::text::split_sentences(&sections[0].summary).len(), 3);
    }

    #[test]
    fn test_empty_document() {
        assert!(SectionAssembler::default().assemble("a.pdf", &[]).is_empty());
    }
}
