//! Duplicate removal and diversity-constrained top-k selection.
//!
//! Both passes are greedy over the score-ordered list and must run after all
//! documents have been scored.

mod dedup;
mod diversity;

pub use dedup::{heading_similarity, DuplicateFilter, DEFAULT_DUPLICATE_THRESHOLD};
pub use diversity::{DiversitySelector, DEFAULT_MAX_SECTIONS, MIN_HEADING_CHARS};
