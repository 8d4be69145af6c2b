//! Data model shared by the ranking pipeline.
//!
//! Layout types describe what the extraction layer hands over (positioned,
//! styled text runs grouped into lines and pages). Section types describe the
//! units that are segmented, scored and selected. Output types are the
//! persisted shape of a run.

mod layout;
mod output;
mod section;

pub use layout::{BoundingBox, LayoutLine, PageLayout, TextRun};
pub use output::{ExtractedSection, OutputMetadata, RankingOutput, SubsectionAnalysis};
pub use section::{Query, ScoredSection, Section};
