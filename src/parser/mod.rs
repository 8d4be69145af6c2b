//! Layout extraction: PDF files to pages of styled, positioned lines.

mod backend;
mod layout;
mod options;

pub use backend::{decode_text_simple, ContentOp, FontStyle, LopdfBackend, PageId, PdfBackend, PdfValue};
pub use layout::{extract_page_spans, group_spans_into_lines, spans_from_operations, TextSpan};
pub use options::{ErrorMode, ExtractOptions};

use std::path::Path;

use crate::detect::check_pdf_header;
use crate::error::Result;
use crate::model::PageLayout;

/// Source of page layouts for a document.
///
/// The pipeline only depends on this trait, so tests and other front ends can
/// supply layouts without a PDF.
pub trait LayoutExtractor: Send + Sync {
    /// Extract the pages of the document at `path` in reading order.
    fn extract(&self, path: &Path) -> Result<Vec<PageLayout>>;
}

/// [`LayoutExtractor`] reading PDF files with `lopdf`.
#[derive(Debug, Clone, Default)]
pub struct LopdfExtractor {
    options: ExtractOptions,
}

impl LopdfExtractor {
    /// Create an extractor with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an extractor with custom options.
    pub fn with_options(options: ExtractOptions) -> Self {
        Self { options }
    }

    /// Extract layouts from an already-loaded backend.
    pub fn extract_backend<B: PdfBackend + ?Sized>(&self, backend: &B) -> Result<Vec<PageLayout>> {
        let limit = self.options.max_pages.unwrap_or(u32::MAX);
        let mut pages = Vec::new();

        for (number, id) in backend.pages().into_iter().take_while(|(n, _)| *n <= limit) {
            let spans = match extract_page_spans(backend, id) {
                Ok(spans) => spans,
                Err(e) if self.options.error_mode == ErrorMode::Lenient => {
                    log::warn!("Skipping page {}: {}", number, e);
                    continue;
                }
                Err(e) => return Err(e),
            };

            let mut page = PageLayout::new(number);
            for line in group_spans_into_lines(spans, number) {
                page.push_line(line);
            }
            pages.push(page);
        }

        Ok(pages)
    }
}

impl LayoutExtractor for LopdfExtractor {
    fn extract(&self, path: &Path) -> Result<Vec<PageLayout>> {
        check_pdf_header(path)?;
        let backend = LopdfBackend::load_file(path)?;
        self.extract_backend(&backend)
    }
}
