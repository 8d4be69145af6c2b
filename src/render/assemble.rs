//! Output assembly from the selected sections.

use chrono::{DateTime, Utc};

use crate::model::{
    ExtractedSection, OutputMetadata, Query, RankingOutput, ScoredSection, Section,
    SubsectionAnalysis,
};
use crate::text::{truncate_words, word_count};

/// Default refined-text cap in words.
pub const DEFAULT_REFINED_MAX_WORDS: usize = 100;

/// Refined texts shorter than this are replaced by a heading phrase.
const MIN_REFINED_WORDS: usize = 5;

const UNKNOWN_SECTION: &str = "Unknown Section";
const UNKNOWN_TOPIC: &str = "Unknown topic";

/// Format of `processing_timestamp`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// Builds the persisted output record set.
#[derive(Debug, Clone, Copy)]
pub struct OutputAssembler {
    refined_max_words: usize,
}

impl OutputAssembler {
    /// Create an assembler with a refined-text word cap.
    pub fn new(refined_max_words: usize) -> Self {
        Self { refined_max_words }
    }

    /// Assemble the output stamped with the current UTC time.
    pub fn assemble(
        &self,
        documents: &[String],
        query: &Query,
        selected: &[ScoredSection],
    ) -> RankingOutput {
        self.assemble_at(documents, query, selected, Utc::now())
    }

    /// Assemble the output with an explicit timestamp.
    pub fn assemble_at(
        &self,
        documents: &[String],
        query: &Query,
        selected: &[ScoredSection],
        timestamp: DateTime<Utc>,
    ) -> RankingOutput {
        let metadata = OutputMetadata {
            input_documents: documents.to_vec(),
            persona: query.persona().to_string(),
            job_to_be_done: query.job().to_string(),
            processing_timestamp: timestamp.format(TIMESTAMP_FORMAT).to_string(),
        };
        let mut output = RankingOutput::empty(metadata);

        for (i, scored) in selected.iter().enumerate() {
            let section = &scored.section;
            let page = if section.page == 0 { 1 } else { section.page };
            let title = section.heading.trim();

            output.extracted_sections.push(ExtractedSection {
                document: section.source_document.clone(),
                section_title: if title.is_empty() {
                    UNKNOWN_SECTION.to_string()
                } else {
                    section.heading.clone()
                },
                importance_rank: i + 1,
                page_number: page,
            });
            output.subsection_analysis.push(SubsectionAnalysis {
                document: section.source_document.clone(),
                refined_text: self.refined_text(section),
                page_number: page,
            });
        }

        output
    }

    /// Summary, else body, else heading; short results become
    /// `Section covering: <heading>`; long ones are capped.
    pub fn refined_text(&self, section: &Section) -> String {
        let text = [&section.summary, &section.body, &section.heading]
            .into_iter()
            .map(|t| t.trim())
            .find(|t| !t.is_empty())
            .unwrap_or_default();

        if word_count(text) < MIN_REFINED_WORDS {
            let heading = section.heading.trim();
            let topic = if heading.is_empty() { UNKNOWN_TOPIC } else { heading };
            return format!("Section covering: {}", topic);
        }
        truncate_words(text, self.refined_max_words)
    }
}

impl Default for OutputAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_REFINED_MAX_WORDS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn scored(heading: &str, body: &str, page: u32, doc: &str) -> ScoredSection {
        ScoredSection::new(Section::new(heading, body, page, doc), 0.5)
    }

    #[test]
    fn test_ranks_are_dense() {
        let selected = vec![
            scored("Beach Days", "Spend the morning at the quiet northern beaches.", 3, "a.pdf"),
            scored("Old Town", "Walk the narrow lanes of the historic old town.", 0, "b.pdf"),
        ];
        let docs = vec!["a.pdf".to_string(), "b.pdf".to_string()];
        let query = Query::new("Travel Planner", "Plan a trip");
        let ts = Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap();
        let out = OutputAssembler::default().assemble_at(&docs, &query, &selected, ts);

        assert_eq!(out.metadata.processing_timestamp, "2024-03-05T14:07:09.000000Z");
        assert_eq!(out.metadata.persona, "Travel Planner");
        assert_eq!(out.metadata.job_to_be_done, "Plan a trip");
        assert_eq!(out.extracted_sections[0].importance_rank, 1);
        assert_eq!(out.extracted_sections[1].importance_rank, 2);
        assert_eq!(out.extracted_sections[1].page_number, 1);
        assert_eq!(out.subsection_analysis[1].page_number, 1);
        assert_eq!(out.document_count(), 2);
    }

    #[test]
    fn test_refined_text_fallbacks() {
        let a = OutputAssembler::default();

        let s = Section::new("Packing Tips", "Bring light layers and sturdy shoes.", 1, "a.pdf");
        assert_eq!(a.refined_text(&s), "Bring light layers and sturdy shoes.");

        let s = Section::new("Packing Tips", "Bring layers.", 1, "a.pdf");
        assert_eq!(a.refined_text(&s), "Section covering: Packing Tips");

        let s = Section::new("Packing Tips", "", 1, "a.pdf").with_summary("");
        assert_eq!(a.refined_text(&s), "Section covering: Packing Tips");

        let s = Section::new("", "", 1, "a.pdf");
        assert_eq!(a.refined_text(&s), "Section covering: Unknown topic");
    }

    #[test]
    fn test_refined_text_prefers_summary_and_caps() {
        let body = "word ".repeat(150);
        let s = Section::new("Long Section", body.clone(), 1, "a.pdf");
        let refined = OutputAssembler::default().refined_text(&s);
        assert_eq!(word_count(&refined), 100);
        assert!(refined.ends_with("word..."));

        let s = Section::new("Long Section", body, 1, "a.pdf")
            .with_summary("A short summary of the long section.");
        assert_eq!(
            OutputAssembler::default().refined_text(&s),
            "A short summary of the long section."
        );
    }

    #[test]
    fn test_empty_selection() {
        let query = Query::new("Student", "Learn basics");
        let out = OutputAssembler::default().assemble(&["a.pdf".to_string()], &query, &[]);
        assert!(out.extracted_sections.is_empty());
        assert!(out.subsection_analysis.is_empty());
        assert_eq!(out.metadata.input_documents, vec!["a.pdf"]);
        assert!(out.metadata.processing_timestamp.ends_with('Z'));
    }

    #[test]
    fn test_unknown_section_title() {
        let query = Query::new("Student", "Learn basics");
        let selected = vec![scored("  ", "Some body text that is long enough.", 2, "a.pdf")];
        let out = OutputAssembler::default().assemble(&[], &query, &selected);
        assert_eq!(out.extracted_sections[0].section_title, "Unknown Section");
    }
}
