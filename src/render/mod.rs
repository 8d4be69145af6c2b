//! Output assembly and JSON rendering.

mod assemble;
mod json;

pub use assemble::{OutputAssembler, DEFAULT_REFINED_MAX_WORDS, TIMESTAMP_FORMAT};
pub use json::{to_json, write_output, JsonFormat, OUTPUT_FILE_NAME};
