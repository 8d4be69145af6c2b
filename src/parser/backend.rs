//! PDF access behind a small trait.
//!
//! Span extraction only needs pages, font names, decoded content operations
//! and text decoding. Keeping those behind [`PdfBackend`] keeps `lopdf` types
//! out of the layout code.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use lopdf::{Document as LopdfDocument, Object};

use crate::error::{Error, Result};

/// Page identifier: (object number, generation number).
pub type PageId = (u32, u16);

/// Style facts about one font resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontStyle {
    /// Base font name (e.g. "Helvetica-Bold")
    pub base_font: String,
    /// Weight inferred from the name
    pub is_bold: bool,
}

impl FontStyle {
    /// Infer style from a base font name.
    ///
    /// Subset prefixes such as `ABCDEF+` do not affect detection.
    pub fn from_base_font(base_font: impl Into<String>) -> Self {
        let base_font = base_font.into();
        let lower = base_font.to_lowercase();
        let is_bold = ["bold", "black", "heavy", "semibold", "demi"]
            .iter()
            .any(|w| lower.contains(w));
        Self { base_font, is_bold }
    }
}

/// An operand from a content stream.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfValue {
    Integer(i64),
    Real(f32),
    Name(Vec<u8>),
    Str(Vec<u8>),
    Array(Vec<PdfValue>),
    Other,
}

impl PdfValue {
    /// Numeric value, if any.
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            PdfValue::Integer(i) => Some(*i as f32),
            PdfValue::Real(r) => Some(*r),
            _ => None,
        }
    }
}

/// One content stream operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentOp {
    pub operator: String,
    pub operands: Vec<PdfValue>,
}

impl ContentOp {
    /// Numeric operand at `index`, or `default`.
    pub fn number(&self, index: usize, default: f32) -> f32 {
        self.operands
            .get(index)
            .and_then(PdfValue::as_f32)
            .unwrap_or(default)
    }
}

/// Read access to a PDF document.
pub trait PdfBackend {
    /// All pages keyed by 1-based page number.
    fn pages(&self) -> BTreeMap<u32, PageId>;

    /// Font resources of a page, keyed by resource name.
    fn page_fonts(&self, page: PageId) -> Result<HashMap<Vec<u8>, FontStyle>>;

    /// Decoded content operations of a page.
    fn page_operations(&self, page: PageId) -> Result<Vec<ContentOp>>;

    /// Decode string bytes shown with the font `font` on `page`.
    ///
    /// Falls back to [`decode_text_simple`] when the font has no usable
    /// encoding.
    fn decode_text(&self, page: PageId, font: &[u8], bytes: &[u8]) -> String;
}

/// Decode bytes without font information: UTF-16BE with BOM, then UTF-8,
/// then Latin-1.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = rest
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// [`PdfBackend`] over a `lopdf::Document`.
pub struct LopdfBackend {
    doc: LopdfDocument,
}

impl LopdfBackend {
    /// Load from a file path.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let doc = LopdfDocument::load(path)?;
        Self::from_document(doc)
    }

    /// Load from an in-memory byte slice.
    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        let doc = LopdfDocument::load_mem(data)?;
        Self::from_document(doc)
    }

    fn from_document(doc: LopdfDocument) -> Result<Self> {
        if doc.is_encrypted() {
            return Err(Error::Encrypted);
        }
        Ok(Self { doc })
    }

    /// Number of pages.
    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    fn stream_bytes(&self, object: &Object) -> Result<Vec<u8>> {
        match object {
            Object::Reference(id) => {
                let target = self.doc.get_object(*id)?;
                self.stream_bytes(target)
            }
            Object::Stream(stream) => stream
                .decompressed_content()
                .or_else(|_| Ok(stream.content.clone())),
            Object::Array(parts) => {
                let mut content = Vec::new();
                for part in parts {
                    match self.stream_bytes(part) {
                        Ok(data) => {
                            content.extend_from_slice(&data);
                            content.push(b'\n');
                        }
                        Err(e) => log::debug!("Skipping unreadable content part: {}", e),
                    }
                }
                Ok(content)
            }
            _ => Err(Error::PdfParse("invalid page content object".to_string())),
        }
    }
}

impl PdfBackend for LopdfBackend {
    fn pages(&self) -> BTreeMap<u32, PageId> {
        self.doc.get_pages()
    }

    fn page_fonts(&self, page: PageId) -> Result<HashMap<Vec<u8>, FontStyle>> {
        let fonts = self.doc.get_page_fonts(page)?;
        Ok(fonts
            .into_iter()
            .map(|(name, dict)| {
                let base_font = dict
                    .get(b"BaseFont")
                    .ok()
                    .and_then(|o| o.as_name().ok())
                    .map(|n| String::from_utf8_lossy(n).into_owned())
                    .unwrap_or_default();
                (name, FontStyle::from_base_font(base_font))
            })
            .collect())
    }

    fn page_operations(&self, page: PageId) -> Result<Vec<ContentOp>> {
        let page_dict = self.doc.get_dictionary(page)?;
        let contents = match page_dict.get(b"Contents") {
            Ok(contents) => contents,
            // A page without content has no operations
            Err(_) => return Ok(Vec::new()),
        };
        let data = self.stream_bytes(contents)?;
        let content = lopdf::content::Content::decode(&data)
            .map_err(|e| Error::TextExtract(format!("content stream: {}", e)))?;

        Ok(content
            .operations
            .into_iter()
            .map(|op| ContentOp {
                operands: op.operands.iter().map(convert_object).collect(),
                operator: op.operator,
            })
            .collect())
    }

    fn decode_text(&self, page: PageId, font: &[u8], bytes: &[u8]) -> String {
        let decoded = self.doc.get_page_fonts(page).ok().and_then(|fonts| {
            let dict = fonts.get(font)?;
            let encoding = dict.get_font_encoding(&self.doc).ok()?;
            LopdfDocument::decode_text(&encoding, bytes).ok()
        });
        decoded.unwrap_or_else(|| decode_text_simple(bytes))
    }
}

fn convert_object(obj: &Object) -> PdfValue {
    match obj {
        Object::Integer(i) => PdfValue::Integer(*i),
        Object::Real(r) => PdfValue::Real(*r),
        Object::Name(n) => PdfValue::Name(n.clone()),
        Object::String(b, _) => PdfValue::Str(b.clone()),
        Object::Array(items) => PdfValue::Array(items.iter().map(convert_object).collect()),
        _ => PdfValue::Other,
    }
}
