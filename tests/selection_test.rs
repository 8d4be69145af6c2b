//! Integration tests for ranking, duplicate removal and diversity selection.

use pdfrank::select::heading_similarity;
use pdfrank::text::split_sentences;
use pdfrank::{
    DiversitySelector, DuplicateFilter, Query, RelevanceScorer, ScoredSection, Section,
    SimilarityBackend, Summarizer,
};

fn scored(heading: &str, document: &str, page: u32, score: f64) -> ScoredSection {
    let body = format!("{} body text with enough words to stand on its own.", heading);
    ScoredSection::new(Section::new(heading, body, page, document), score)
}

fn headings(sections: &[ScoredSection]) -> Vec<&str> {
    sections.iter().map(|s| s.section.heading.as_str()).collect()
}

#[test]
fn test_near_duplicate_heading_dropped_before_selection() {
    let ranked = vec![
        scored("Results Overview", "report.pdf", 2, 0.9),
        scored("Results overview", "report.pdf", 5, 0.85),
        scored("Methods Used", "report.pdf", 3, 0.3),
    ];
    assert!(heading_similarity("Results Overview", "Results overview") > 0.7);

    let deduped = DuplicateFilter::new(0.7).filter(ranked);
    assert_eq!(headings(&deduped), vec!["Results Overview", "Methods Used"]);
    assert_eq!(deduped[0].score, 0.9);

    let selected = DiversitySelector::new(5).select(&deduped, 1);
    assert_eq!(selected.len(), 2);
}

#[test]
fn test_duplicate_filter_is_idempotent() {
    let ranked = vec![
        scored("Beach Activities", "a.pdf", 1, 0.8),
        scored("Beach Activities Guide", "b.pdf", 1, 0.7),
        scored("Nightlife Tips", "a.pdf", 2, 0.6),
        scored("Local Nightlife Tips", "c.pdf", 4, 0.5),
    ];
    let filter = DuplicateFilter::new(0.6);
    let once = filter.filter(ranked);
    let twice = filter.filter(once.clone());
    assert_eq!(once, twice);
}

#[test]
fn test_five_documents_fill_five_seats_without_relaxation() {
    let ranked: Vec<ScoredSection> = (0..5)
        .map(|i| scored(&format!("Topic Number {}", i), &format!("doc{}.pdf", i), 1, 0.9 - i as f64 * 0.1))
        .collect();

    let selector = DiversitySelector::new(5);
    assert_eq!(selector.quota(5), 1);

    let selected = selector.select(&ranked, 5);
    assert_eq!(selected.len(), 5);
    let mut documents: Vec<&str> = selected
        .iter()
        .map(|s| s.section.source_document.as_str())
        .collect();
    documents.sort_unstable();
    documents.dedup();
    assert_eq!(documents.len(), 5);
}

#[test]
fn test_relaxation_fills_seats_beyond_quota() {
    // Quota is ceil(5 / 2) = 3; the second document only has one section.
    let ranked = vec![
        scored("Alpha One", "a.pdf", 1, 0.95),
        scored("Alpha Two", "a.pdf", 2, 0.9),
        scored("Alpha Three", "a.pdf", 3, 0.85),
        scored("Alpha Four", "a.pdf", 4, 0.8),
        scored("Beta One", "b.pdf", 1, 0.5),
        scored("Alpha Five", "a.pdf", 5, 0.4),
    ];

    let selected = DiversitySelector::new(5).select(&ranked, 2);
    assert_eq!(
        headings(&selected),
        vec!["Alpha One", "Alpha Two", "Alpha Three", "Beta One", "Alpha Four"]
    );
    let from_a = selected
        .iter()
        .filter(|s| s.section.source_document == "a.pdf")
        .count();
    assert_eq!(from_a, 4);
}

#[test]
fn test_selection_never_exceeds_max_sections() {
    let ranked: Vec<ScoredSection> = (0..20)
        .map(|i| scored(&format!("Heading {}", i), "only.pdf", i as u32 + 1, 1.0 / (i as f64 + 1.0)))
        .collect();
    for max in 1..=7 {
        assert!(DiversitySelector::new(max).select(&ranked, 1).len() <= max);
    }
}

#[test]
fn test_rank_then_select_prefers_matching_sections() {
    let sections = vec![
        Section::new(
            "Hotel Booking Tips",
            "Compare hotel prices early and book rooms near the station for the trip.",
            1,
            "travel.pdf",
        ),
        Section::new(
            "Regional Cuisine",
            "Local dishes feature olive oil, fresh fish and herbs from the hills.",
            2,
            "travel.pdf",
        ),
        Section::new(
            "Packing Lists",
            "Bring light clothing, a hat and comfortable shoes for walking tours.",
            1,
            "packing.pdf",
        ),
    ];
    let query = Query::new("Travel Planner", "Book hotel rooms for the trip");

    let ranking = RelevanceScorer::new(SimilarityBackend::lexical()).rank(&query, sections);
    assert_eq!(ranking.sections.len(), 3);
    assert_eq!(ranking.sections[0].section.heading, "Hotel Booking Tips");
    for pair in ranking.sections.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }

    let deduped = DuplicateFilter::new(0.7).filter(ranking.sections);
    let selected = DiversitySelector::new(2).select(&deduped, 2);
    assert_eq!(selected.len(), 2);
    assert_eq!(selected[0].section.heading, "Hotel Booking Tips");
}

#[test]
fn test_summary_keeps_three_sentences_in_document_order() {
    let sentences = [
        "The museum opens early every day during the summer.",
        "Tickets can be bought online or at the gate.",
        "Guided tours explain the history of the old harbour.",
        "Children enjoy the interactive rooms on the second floor.",
        "A small cafe serves lunch near the main entrance.",
    ];
    let body = sentences.join(" ");
    assert_eq!(body.split_whitespace().count(), 45);

    let summary = Summarizer::new(3).summarize(&body);
    let picked = split_sentences(&summary);
    assert_eq!(picked.len(), 3);

    let positions: Vec<usize> = picked
        .iter()
        .map(|p| sentences.iter().position(|s| s == p).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}
