//! Document-wide font statistics.

use std::collections::BTreeMap;

use crate::model::{PageLayout, TextRun};

/// The (size, weight) pair used as the heading-detection baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyFont {
    /// Font size in points
    pub size: f32,
    /// Whether body text is bold
    pub is_bold: bool,
}

/// Cumulative word counts per (font size, bold) pair.
///
/// Sizes are bucketed to 0.1pt so that sizes differing only by float noise
/// share a bucket. Each bucket also keeps the word-weighted sum of the exact
/// sizes it received.
#[derive(Debug, Clone, Default)]
pub struct FontProfile {
    histogram: BTreeMap<(i32, bool), Bucket>,
}

#[derive(Debug, Clone, Copy, Default)]
struct Bucket {
    words: usize,
    size_sum: f64,
}

impl Bucket {
    /// Word-weighted mean of the exact sizes.
    fn mean_size(&self) -> f32 {
        (self.size_sum / self.words.max(1) as f64) as f32
    }
}

impl FontProfile {
    /// Create an empty profile.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the profile of a whole document.
    pub fn from_pages(pages: &[PageLayout]) -> Self {
        let mut profile = Self::new();
        for run in pages.iter().flat_map(|p| p.runs()) {
            profile.add_run(run);
        }
        profile
    }

    /// Count the words of one run.
    pub fn add_run(&mut self, run: &TextRun) {
        let words = run.word_count();
        if words == 0 {
            return;
        }
        let key = (size_key(run.font_size), run.is_bold);
        let bucket = self.histogram.entry(key).or_default();
        bucket.words += words;
        bucket.size_sum += run.font_size as f64 * words as f64;
    }

    /// Check if no words were observed.
    pub fn is_empty(&self) -> bool {
        self.histogram.is_empty()
    }

    /// Words observed for a (size, bold) pair.
    pub fn words_for(&self, size: f32, is_bold: bool) -> usize {
        self.histogram
            .get(&(size_key(size), is_bold))
            .map_or(0, |b| b.words)
    }

    /// The pair with the highest word count.
    ///
    /// Ties resolve to the smaller size, then to regular weight, so the
    /// result does not depend on the order runs were added. The returned
    /// size is the bucket's mean exact size, not the rounded bucket key.
    pub fn body_font(&self) -> Option<BodyFont> {
        self.histogram
            .iter()
            .max_by(|((size_a, bold_a), a), ((size_b, bold_b), b)| {
                a.words
                    .cmp(&b.words)
                    .then_with(|| size_b.cmp(size_a))
                    .then_with(|| bold_b.cmp(bold_a))
            })
            .map(|((_, is_bold), bucket)| BodyFont {
                size: bucket.mean_size(),
                is_bold: *is_bold,
            })
    }
}

fn size_key(size: f32) -> i32 {
    (size * 10.0).round() as i32
}
