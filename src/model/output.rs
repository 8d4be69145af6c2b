//! Output record types written to `combined_output.json`.

use serde::{Deserialize, Serialize};

/// The persisted result of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingOutput {
    /// Run inputs and timestamp
    pub metadata: OutputMetadata,

    /// Ranked section titles
    pub extracted_sections: Vec<ExtractedSection>,

    /// Refined text for the same sections, in the same order
    pub subsection_analysis: Vec<SubsectionAnalysis>,
}

impl RankingOutput {
    /// Output with metadata and no sections.
    pub fn empty(metadata: OutputMetadata) -> Self {
        Self {
            metadata,
            extracted_sections: Vec::new(),
            subsection_analysis: Vec::new(),
        }
    }

    /// Number of ranked sections.
    pub fn section_count(&self) -> usize {
        self.extracted_sections.len()
    }

    /// Number of distinct documents among the ranked sections.
    pub fn document_count(&self) -> usize {
        let mut docs: Vec<&str> = self
            .extracted_sections
            .iter()
            .map(|s| s.document.as_str())
            .collect();
        docs.sort_unstable();
        docs.dedup();
        docs.len()
    }
}

/// Run metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputMetadata {
    /// Processed document file names
    pub input_documents: Vec<String>,
    pub persona: String,
    pub job_to_be_done: String,
    /// UTC time, `YYYY-MM-DDTHH:MM:SS.ffffffZ`
    pub processing_timestamp: String,
}

/// One ranked section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedSection {
    pub document: String,
    pub section_title: String,
    /// 1-based rank
    pub importance_rank: usize,
    pub page_number: u32,
}

/// Refined text of one ranked section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubsectionAnalysis {
    pub document: String,
    pub refined_text: String,
    pub page_number: u32,
}
