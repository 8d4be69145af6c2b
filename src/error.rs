//! Error types for pdfrank library.

use std::io;
use thiserror::Error;

/// Result type alias for pdfrank operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while ranking documents.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF document is encrypted and cannot be read.
    #[error("Document is encrypted")]
    Encrypted,

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// Error extracting positioned text.
    #[error("Text extraction error: {0}")]
    TextExtract(String),

    /// Vectorizer produced no terms (everything was a stop word or pruned).
    #[error("Empty vocabulary: {0}")]
    EmptyVocabulary(String),

    /// The embedding backend failed or is unavailable.
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Error while rendering or writing the output document.
    #[error("Rendering error: {0}")]
    Render(String),

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

#[cfg(feature = "semantic")]
impl From<candle_core::Error> for Error {
    fn from(err: candle_core::Error) -> Self {
        Error::Embedding(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Encrypted;
        assert_eq!(err.to_string(), "Document is encrypted");

        let err = Error::Config("dedup threshold must be within 0..=1".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: dedup threshold must be within 0..=1"
        );

        let err = Error::EmptyVocabulary("all terms pruned".to_string());
        assert_eq!(err.to_string(), "Empty vocabulary: all terms pruned");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
