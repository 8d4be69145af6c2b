//! Top-k selection with a per-document quota.

use std::collections::{HashMap, HashSet};

use crate::model::ScoredSection;

/// Default number of final sections.
pub const DEFAULT_MAX_SECTIONS: usize = 5;

/// Shortest acceptable heading, in characters after trimming.
pub const MIN_HEADING_CHARS: usize = 3;

/// (document, lower-cased heading, page)
type SectionKey = (String, String, u32);

/// Picks the final sections, spreading seats across documents.
///
/// Pass 1 takes sections in score order while each document stays within
/// `ceil(max_sections / document_count)`. If that leaves seats empty, pass 2
/// rescans the whole list without the quota.
#[derive(Debug, Clone, Copy)]
pub struct DiversitySelector {
    max_sections: usize,
}

impl DiversitySelector {
    /// Create a selector returning at most `max_sections` sections.
    pub fn new(max_sections: usize) -> Self {
        Self { max_sections }
    }

    /// The seat count.
    pub fn max_sections(&self) -> usize {
        self.max_sections
    }

    /// Seats each document may take in pass 1.
    pub fn quota(&self, document_count: usize) -> usize {
        self.max_sections.div_ceil(document_count.max(1))
    }

    /// Select from a deduplicated, score-descending list.
    pub fn select(&self, ranked: &[ScoredSection], document_count: usize) -> Vec<ScoredSection> {
        if self.max_sections == 0 {
            return Vec::new();
        }
        let quota = self.quota(document_count);
        let mut seen: HashSet<SectionKey> = HashSet::new();
        let mut per_doc: HashMap<&str, usize> = HashMap::new();
        let mut picked: Vec<ScoredSection> = Vec::new();

        for candidate in ranked {
            let section = &candidate.section;
            let doc = section.source_document.as_str();
            let key = section_key(candidate);
            if seen.contains(&key) {
                continue;
            }
            if per_doc.get(doc).copied().unwrap_or(0) >= quota {
                continue;
            }
            if !has_usable_heading(candidate) {
                continue;
            }

            seen.insert(key);
            *per_doc.entry(doc).or_insert(0) += 1;
            picked.push(candidate.clone());
            if picked.len() >= self.max_sections {
                break;
            }
        }

        if picked.len() < self.max_sections && ranked.len() > picked.len() {
            log::debug!(
                "Quota of {} per document filled {} of {} seats, relaxing",
                quota,
                picked.len(),
                self.max_sections
            );
            let mut remaining = self.max_sections - picked.len();
            for candidate in ranked {
                if remaining == 0 {
                    break;
                }
                let key = section_key(candidate);
                if seen.contains(&key) {
                    continue;
                }
                if has_usable_heading(candidate) {
                    seen.insert(key);
                    picked.push(candidate.clone());
                    remaining -= 1;
                }
            }
        }

        picked
    }
}

impl Default for DiversitySelector {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SECTIONS)
    }
}

fn section_key(candidate: &ScoredSection) -> SectionKey {
    let section = &candidate.section;
    (
        section.source_document.clone(),
        section.heading.trim().to_lowercase(),
        section.page,
    )
}

fn has_usable_heading(candidate: &ScoredSection) -> bool {
    candidate.section.heading.trim().chars().count() >= MIN_HEADING_CHARS
}
