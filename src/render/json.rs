//! JSON rendering and persistence of the ranking output.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::model::RankingOutput;

/// File name written into the output directory.
pub const OUTPUT_FILE_NAME: &str = "combined_output.json";

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert an output record set to JSON.
pub fn to_json(output: &RankingOutput, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(output),
        JsonFormat::Compact => serde_json::to_string(output),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Write `combined_output.json` into `dir`, creating the directory if needed.
pub fn write_output(output: &RankingOutput, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(OUTPUT_FILE_NAME);
    let json = to_json(output, JsonFormat::Pretty)?;
    fs::write(&path, json)?;
    Ok(path)
}
