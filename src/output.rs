//! Output formatting for dumps.
//!
//! The text format is the one downstream tools read: an optional tree header
//! followed by marker-framed file blocks. JSON carries the whole [`Dump`],
//! skipped files included.

use crate::{Dump, DumpError, OutputBlock};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Heading written above the tree block.
pub const TREE_HEADING: &str = "File Tree Structure:";

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

pub fn start_marker(path: &str) -> String {
    format!("--- Start of {path} ---")
}

pub fn end_marker(path: &str) -> String {
    format!("--- End of {path} ---")
}

/// Formats the dump into a string.
pub fn format_dump(dump: &Dump, format: OutputFormat) -> Result<String, DumpError> {
    match format {
        OutputFormat::Text => Ok(format_text(dump)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(dump)?),
    }
}

/// Writes the formatted dump to `path`, replacing any existing file.
///
/// Formatting happens before the file is touched, so a failure leaves no
/// partial output behind.
pub fn write_dump(
    dump: &Dump,
    format: OutputFormat,
    path: impl AsRef<Path>,
) -> Result<(), DumpError> {
    let content = format_dump(dump, format)?;
    fs::write(&path, content).map_err(|e| DumpError::output(path.as_ref(), e))?;
    #[cfg(feature = "logging")]
    tracing::debug!("Wrote {}", path.as_ref().display());
    Ok(())
}

fn format_text(dump: &Dump) -> String {
    let mut out = String::with_capacity(1024);
    for block in &dump.blocks {
        match block {
            OutputBlock::Tree { text } => {
                out.push_str(TREE_HEADING);
                out.push('\n');
                out.push_str(text);
                out.push_str("\n\n");
            }
            OutputBlock::File { path, content } => {
                out.push_str(&start_marker(path));
                out.push('\n');
                out.push_str(content);
                out.push('\n');
                out.push_str(&end_marker(path));
                out.push_str("\n\n");
            }
        }
    }
    out
}
