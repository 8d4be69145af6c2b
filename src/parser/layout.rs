//! Positioned text extraction from content streams.
//!
//! Text-showing operators are replayed against a simplified text matrix to
//! produce spans with position, size and weight. Spans are then grouped into
//! lines by baseline and ordered top-to-bottom, left-to-right.

use std::collections::HashMap;

use super::backend::{ContentOp, FontStyle, PageId, PdfBackend, PdfValue};
use crate::error::Result;
use crate::model::{BoundingBox, LayoutLine, TextRun};
use crate::text::normalize_run_text;

/// Font size assumed before the first `Tf`.
const DEFAULT_FONT_SIZE: f32 = 12.0;

/// Default leading for `T*`, `'` and `"` when `TL` was never set.
const DEFAULT_LEADING: f32 = 12.0;

/// TJ adjustments (thousandths of text space) that count as a word gap.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Rough average glyph width as a share of the font size.
const GLYPH_WIDTH_RATIO: f32 = 0.5;

/// A decoded piece of text at a position.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    pub text: String,
    /// Left edge
    pub x: f32,
    /// Baseline
    pub y: f32,
    /// Estimated advance
    pub width: f32,
    /// Effective size in points
    pub font_size: f32,
    pub is_bold: bool,
}

impl TextSpan {
    /// Create a span, estimating its width from the glyph count.
    pub fn new(text: impl Into<String>, x: f32, y: f32, font_size: f32, is_bold: bool) -> Self {
        let text = text.into();
        let width = text.chars().count() as f32 * font_size * GLYPH_WIDTH_RATIO;
        Self {
            text,
            x,
            y,
            width,
            font_size,
            is_bold,
        }
    }

    /// Approximate box: descender at 20% and ascender at 80% of the size.
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::new(
            self.x,
            self.y - self.font_size * 0.2,
            self.x + self.width,
            self.y + self.font_size * 0.8,
        )
    }

    fn into_run(self, page: u32) -> TextRun {
        TextRun {
            content: normalize_run_text(&self.text),
            font_size: self.font_size,
            is_bold: self.is_bold,
            page,
            bounding_box: self.bounding_box(),
        }
    }
}

/// Text matrix state. Skew is ignored when positioning spans.
#[derive(Debug, Clone, Copy)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
    /// Start of the current line
    line_e: f32,
    line_f: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
            line_e: 0.0,
            line_f: 0.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, op: &ContentOp) {
        self.a = op.number(0, 1.0);
        self.b = op.number(1, 0.0);
        self.c = op.number(2, 0.0);
        self.d = op.number(3, 1.0);
        self.e = op.number(4, 0.0);
        self.f = op.number(5, 0.0);
        self.line_e = self.e;
        self.line_f = self.f;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.line_e += tx * self.a + ty * self.c;
        self.line_f += tx * self.b + ty * self.d;
        self.e = self.line_e;
        self.f = self.line_f;
    }

    fn advance(&mut self, width: f32) {
        self.e += width * self.a;
    }

    /// Horizontal scale, for advancing along the baseline.
    fn scale(&self) -> f32 {
        (self.a * self.a + self.c * self.c).sqrt()
    }

    /// Vertical scale, for the effective font size.
    fn size_scale(&self) -> f32 {
        (self.b * self.b + self.d * self.d).sqrt()
    }
}

/// Extraction state while replaying one page.
struct SpanCollector<'a, B: PdfBackend + ?Sized> {
    backend: &'a B,
    page: PageId,
    fonts: &'a HashMap<Vec<u8>, FontStyle>,
    font: Vec<u8>,
    font_size: f32,
    leading: f32,
    matrix: TextMatrix,
    in_text: bool,
    spans: Vec<TextSpan>,
}

impl<'a, B: PdfBackend + ?Sized> SpanCollector<'a, B> {
    fn apply(&mut self, op: &ContentOp) {
        match op.operator.as_str() {
            "BT" => {
                self.in_text = true;
                self.matrix = TextMatrix::default();
            }
            "ET" => self.in_text = false,
            "Tf" => {
                if let Some(PdfValue::Name(name)) = op.operands.first() {
                    self.font = name.clone();
                }
                self.font_size = op.number(1, DEFAULT_FONT_SIZE);
            }
            "TL" => self.leading = op.number(0, DEFAULT_LEADING),
            "Td" => self.matrix.translate(op.number(0, 0.0), op.number(1, 0.0)),
            "TD" => {
                let ty = op.number(1, 0.0);
                self.leading = -ty;
                self.matrix.translate(op.number(0, 0.0), ty);
            }
            "Tm" => self.matrix.set(op),
            "T*" => self.next_line(),
            "Tj" => {
                if let Some(PdfValue::Str(bytes)) = op.operands.first() {
                    let text = self.decode(bytes);
                    self.show(text);
                }
            }
            "TJ" => {
                if let Some(PdfValue::Array(items)) = op.operands.first() {
                    let text = self.decode_array(items);
                    self.show(text);
                }
            }
            "'" => {
                self.next_line();
                if let Some(PdfValue::Str(bytes)) = op.operands.first() {
                    let text = self.decode(bytes);
                    self.show(text);
                }
            }
            "\"" => {
                self.next_line();
                if let Some(PdfValue::Str(bytes)) = op.operands.get(2) {
                    let text = self.decode(bytes);
                    self.show(text);
                }
            }
            _ => {}
        }
    }

    fn next_line(&mut self) {
        self.matrix.translate(0.0, -self.leading);
    }

    fn decode(&self, bytes: &[u8]) -> String {
        self.backend.decode_text(self.page, &self.font, bytes)
    }

    /// Concatenate a TJ array, turning large negative kerning into spaces.
    fn decode_array(&self, items: &[PdfValue]) -> String {
        let mut combined = String::new();
        for item in items {
            match item {
                PdfValue::Str(bytes) => combined.push_str(&self.decode(bytes)),
                other => {
                    let Some(adjust) = other.as_f32() else { continue };
                    if -adjust > TJ_SPACE_THRESHOLD
                        && !combined.is_empty()
                        && !combined.ends_with(char::is_whitespace)
                        && !combined.chars().last().is_some_and(is_spaceless_script_char)
                    {
                        combined.push(' ');
                    }
                }
            }
        }
        combined
    }

    fn show(&mut self, text: String) {
        if !self.in_text || text.trim().is_empty() {
            return;
        }
        let size = self.font_size * self.matrix.size_scale();
        let is_bold = self.fonts.get(&self.font).is_some_and(|f| f.is_bold);
        let span = TextSpan::new(text, self.matrix.e, self.matrix.f, size, is_bold);
        self.matrix.advance(span.width / self.matrix.scale().max(f32::EPSILON));
        self.spans.push(span);
    }
}

/// Replay a page's content stream and collect its text spans.
pub fn extract_page_spans<B: PdfBackend + ?Sized>(backend: &B, page: PageId) -> Result<Vec<TextSpan>> {
    let fonts = backend.page_fonts(page)?;
    let operations = backend.page_operations(page)?;
    Ok(spans_from_operations(backend, page, &fonts, &operations))
}

/// Collect spans from already-decoded operations.
pub fn spans_from_operations<B: PdfBackend + ?Sized>(
    backend: &B,
    page: PageId,
    fonts: &HashMap<Vec<u8>, FontStyle>,
    operations: &[ContentOp],
) -> Vec<TextSpan> {
    let mut collector = SpanCollector {
        backend,
        page,
        fonts,
        font: Vec::new(),
        font_size: DEFAULT_FONT_SIZE,
        leading: DEFAULT_LEADING,
        matrix: TextMatrix::default(),
        in_text: false,
        spans: Vec::new(),
    };
    for op in operations {
        collector.apply(op);
    }
    collector.spans
}

/// Group spans into lines: same baseline within 30% of the font size,
/// top-to-bottom, then left-to-right.
///
/// Every span stays its own run. Span widths are estimates, so touching
/// cannot be told apart from a word gap; [`LayoutLine::text`] joins runs
/// with single spaces.
pub fn group_spans_into_lines(mut spans: Vec<TextSpan>, page: u32) -> Vec<LayoutLine> {
    spans.sort_by(|a, b| {
        b.y.partial_cmp(&a.y)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut groups: Vec<Vec<TextSpan>> = Vec::new();
    let mut current_y: Option<f32> = None;
    for span in spans {
        let tolerance = span.font_size * 0.3;
        let same_line = current_y.is_some_and(|y| (span.y - y).abs() <= tolerance);
        match groups.last_mut() {
            Some(group) if same_line => group.push(span),
            _ => {
                current_y = Some(span.y);
                groups.push(vec![span]);
            }
        }
    }

    groups
        .into_iter()
        .map(|mut group| {
            group.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
            LayoutLine::new(page, group.into_iter().map(|s| s.into_run(page)).collect())
        })
        .filter(|line| !line.is_empty())
        .collect()
}

/// Scripts written without spaces between words (Chinese, Japanese).
fn is_spaceless_script_char(c: char) -> bool {
    matches!(c as u32,
        0x4E00..=0x9FFF
        | 0x3400..=0x4DBF
        | 0x20000..=0x2EBEF
        | 0x3040..=0x309F
        | 0x30A0..=0x30FF
        | 0x3000..=0x303F)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    /// Backend that decodes bytes as UTF-8 and has a single bold font `F2`.
    struct Utf8Backend;

    impl PdfBackend for Utf8Backend {
        fn pages(&self) -> BTreeMap<u32, PageId> {
            BTreeMap::from([(1, (1, 0))])
        }

        fn page_fonts(&self, _page: PageId) -> Result<HashMap<Vec<u8>, FontStyle>> {
            Ok(HashMap::from([
                (b"F1".to_vec(), FontStyle::from_base_font("Helvetica")),
                (b"F2".to_vec(), FontStyle::from_base_font("Helvetica-Bold")),
            ]))
        }

        fn page_operations(&self, _page: PageId) -> Result<Vec<ContentOp>> {
            Ok(Vec::new())
        }

        fn decode_text(&self, _page: PageId, _font: &[u8], bytes: &[u8]) -> String {
            String::from_utf8_lossy(bytes).into_owned()
        }
    }

    fn op(operator: &str, operands: Vec<PdfValue>) -> ContentOp {
        ContentOp {
            operator: operator.to_string(),
            operands,
        }
    }

    fn name(n: &str) -> PdfValue {
        PdfValue::Name(n.as_bytes().to_vec())
    }

    fn string(s: &str) -> PdfValue {
        PdfValue::Str(s.as_bytes().to_vec())
    }

    #[test]
    fn test_spans_from_operations() {
        let ops = vec![
            op("BT", vec![]),
            op("Tf", vec![name("F2"), PdfValue::Integer(18)]),
            op("Td", vec![PdfValue::Integer(72), PdfValue::Integer(700)]),
            op("Tj", vec![string("Getting Started")]),
            op("Tf", vec![name("F1"), PdfValue::Integer(11)]),
            op("Td", vec![PdfValue::Integer(0), PdfValue::Integer(-30)]),
            op(
                "TJ",
                vec![PdfValue::Array(vec![
                    string("Pack"),
                    PdfValue::Integer(-300),
                    string("light"),
                ])],
            ),
            op("ET", vec![]),
            // Outside a text object nothing is shown
            op("Tj", vec![string("ignored")]),
        ];
        let backend = Utf8Backend;
        let fonts = backend.page_fonts((1, 0)).unwrap();
        let spans = spans_from_operations(&backend, (1, 0), &fonts, &ops);

        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].text, "Getting Started");
        assert!(spans[0].is_bold);
        assert_eq!(spans[0].font_size, 18.0);
        assert_eq!((spans[0].x, spans[0].y), (72.0, 700.0));
        assert_eq!(spans[1].text, "Pack light");
        assert!(!spans[1].is_bold);
        assert_eq!((spans[1].x, spans[1].y), (72.0, 670.0));
    }

    #[test]
    fn test_text_matrix_scales_font() {
        let ops = vec![
            op("BT", vec![]),
            op("Tf", vec![name("F1"), PdfValue::Integer(1)]),
            op(
                "Tm",
                vec![
                    PdfValue::Integer(14),
                    PdfValue::Integer(0),
                    PdfValue::Integer(0),
                    PdfValue::Integer(14),
                    PdfValue::Integer(50),
                    PdfValue::Integer(600),
                ],
            ),
            op("Tj", vec![string("Scaled")]),
            op("T*", vec![]),
            op("'", vec![string("Next")]),
            op("ET", vec![]),
        ];
        let backend = Utf8Backend;
        let fonts = backend.page_fonts((1, 0)).unwrap();
        let spans = spans_from_operations(&backend, (1, 0), &fonts, &ops);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].font_size, 14.0);
        assert_eq!(spans[0].y, 600.0);
        // Two line advances of the default leading, scaled by the matrix
        assert_eq!(spans[1].y, 600.0 - 2.0 * 12.0 * 14.0);
    }

    #[test]
    fn test_group_into_lines() {
        let spans = vec![
            TextSpan::new("body text", 72.0, 650.0, 11.0, false),
            TextSpan::new("Heading", 72.0, 700.0, 16.0, true),
            TextSpan::new("right", 300.0, 651.0, 11.0, false),
        ];
        let lines = group_spans_into_lines(spans, 3);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text(), "Heading");
        assert_eq!(lines[0].page, 3);
        assert!(lines[0].primary_run().unwrap().is_bold);
        assert_eq!(lines[1].text(), "body text right");
        assert_eq!(lines[1].runs.len(), 2);
    }

    #[test]
    fn test_word_per_span_keeps_spaces() {
        // Helvetica advances at 12pt plus a 3.3pt word space; narrower than
        // the width estimate, so each span starts inside the previous guess.
        let words = [("Tips", 22.67), ("for", 14.0), ("little", 21.34), ("trips", 23.34)];
        let mut x = 72.0;
        let mut spans = Vec::new();
        for (word, advance) in words {
            spans.push(TextSpan::new(word, x, 500.0, 12.0, false));
            x += advance + 3.3;
        }

        let lines = group_spans_into_lines(spans, 1);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].runs.len(), 4);
        assert_eq!(lines[0].text(), "Tips for little trips");
    }

    #[test]
    fn test_size_follows_vertical_scale() {
        // Horizontally condensed text keeps its vertical size
        let ops = vec![
            op("BT", vec![]),
            op("Tf", vec![name("F1"), PdfValue::Integer(1)]),
            op(
                "Tm",
                vec![
                    PdfValue::Integer(8),
                    PdfValue::Integer(0),
                    PdfValue::Integer(0),
                    PdfValue::Integer(12),
                    PdfValue::Integer(50),
                    PdfValue::Integer(600),
                ],
            ),
            op("Tj", vec![string("Condensed")]),
            op("ET", vec![]),
        ];
        let backend = Utf8Backend;
        let fonts = backend.page_fonts((1, 0)).unwrap();
        let spans = spans_from_operations(&backend, (1, 0), &fonts, &ops);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].font_size, 12.0);
    }

    #[test]
    fn test_runs_are_normalized() {
        let spans = vec![TextSpan::new("\u{FB01}nal o\u{FB00}er", 72.0, 500.0, 10.0, false)];
        let lines = group_spans_into_lines(spans, 1);
        assert_eq!(lines[0].text(), "final offer");
    }
}
