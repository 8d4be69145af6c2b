//! Positioned text types.

use serde::{Deserialize, Serialize};

/// Axis-aligned box in PDF user space (points, origin bottom-left).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge
    pub x0: f32,
    /// Bottom edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Top edge
    pub y1: f32,
}

impl BoundingBox {
    /// Create a new bounding box.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Box width.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Box height.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }
}

/// A run of text with consistent styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    /// The text content
    pub content: String,

    /// Font size in points
    pub font_size: f32,

    /// Whether the font appears to be bold
    pub is_bold: bool,

    /// Page number (1-indexed)
    pub page: u32,

    /// Position on the page
    pub bounding_box: BoundingBox,
}

impl TextRun {
    /// Create a regular-weight run with an empty bounding box.
    pub fn new(content: impl Into<String>, font_size: f32, page: u32) -> Self {
        Self {
            content: content.into(),
            font_size,
            is_bold: false,
            page,
            bounding_box: BoundingBox::default(),
        }
    }

    /// Create a bold run with an empty bounding box.
    pub fn bold(content: impl Into<String>, font_size: f32, page: u32) -> Self {
        Self {
            is_bold: true,
            ..Self::new(content, font_size, page)
        }
    }

    /// Attach a bounding box.
    pub fn with_bbox(mut self, bounding_box: BoundingBox) -> Self {
        self.bounding_box = bounding_box;
        self
    }

    /// Number of whitespace-separated words.
    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }

    /// Check if this run carries no visible text.
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// A visual line: one or more runs sharing a baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutLine {
    /// Runs in left-to-right order
    pub runs: Vec<TextRun>,

    /// Page number (1-indexed)
    pub page: u32,
}

impl LayoutLine {
    /// Create a line from runs. Blank runs are dropped.
    pub fn new(page: u32, runs: Vec<TextRun>) -> Self {
        Self {
            runs: runs.into_iter().filter(|r| !r.is_blank()).collect(),
            page,
        }
    }

    /// Create a line holding a single run.
    pub fn from_run(run: TextRun) -> Self {
        let page = run.page;
        Self::new(page, vec![run])
    }

    /// Line text: trimmed runs joined by single spaces.
    pub fn text(&self) -> String {
        self.runs
            .iter()
            .map(|r| r.content.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The run whose style represents the line.
    pub fn primary_run(&self) -> Option<&TextRun> {
        self.runs.first()
    }

    /// Union of the run boxes.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let mut iter = self.runs.iter().map(|r| r.bounding_box);
        let first = iter.next()?;
        Some(iter.fold(first, |acc, b| acc.union(&b)))
    }

    /// Check if the line is empty.
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

/// Lines of one page in reading order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    /// Page number (1-indexed)
    pub number: u32,

    /// Lines in reading order
    pub lines: Vec<LayoutLine>,
}

impl PageLayout {
    /// Create an empty page.
    pub fn new(number: u32) -> Self {
        Self {
            number,
            lines: Vec::new(),
        }
    }

    /// Append a line. Empty lines are ignored.
    pub fn push_line(&mut self, line: LayoutLine) {
        if !line.is_empty() {
            self.lines.push(line);
        }
    }

    /// Iterate over every run on the page.
    pub fn runs(&self) -> impl Iterator<Item = &TextRun> {
        self.lines.iter().flat_map(|l| l.runs.iter())
    }
}
