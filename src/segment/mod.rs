//! Layout-driven section segmentation.
//!
//! Heading detection has no metadata to rely on, so the classifier infers a
//! visual grammar from each document's own font statistics: the body font is
//! the (size, weight) pair carrying the most words, and headings are lines
//! that stand out from it.

mod assembler;
mod font_profile;
mod heading;
mod validator;

pub use assembler::{SectionAssembler, DEFAULT_SUMMARY_MIN_WORDS};
pub use font_profile::{BodyFont, FontProfile};
pub use heading::{HeadingClassifier, HeadingDecision, HeadingRejection};
pub use validator::{SectionValidator, ValidationFailure, DEFAULT_SKIP_HEADINGS};
