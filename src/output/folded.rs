//! Collapsed-stack output writer.
//!
//! One line per stack, outermost frame first, frames joined by `;`, then
//! a space and the sample count: `main;run;poll 12`. This is the input
//! format of flamegraph.pl, inferno and speedscope.

use super::prepare_output_path;
use crate::aggregator::CountEntry;
use crate::utils::config::FOLDED_FRAME_SEPARATOR;
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Render exact counts as collapsed-stack lines
///
/// Samples with no frames have nothing to draw and are left out.
pub fn to_folded(entries: &[CountEntry]) -> String {
    let mut out = String::new();
    let mut skipped = 0u64;

    for entry in entries {
        if entry.stack.is_empty() {
            skipped += entry.count;
            continue;
        }

        let frames: Vec<&str> = entry
            .stack
            .frames()
            .iter()
            .rev()
            .map(String::as_str)
            .collect();
        out.push_str(&frames.join(FOLDED_FRAME_SEPARATOR));
        out.push(' ');
        out.push_str(&entry.count.to_string());
        out.push('\n');
    }

    if skipped > 0 {
        debug!("Left {} frameless samples out of folded output", skipped);
    }

    out
}

/// Write exact counts to a collapsed-stack file
///
/// **Public** - main entry point for flamegraph export
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::InvalidPath` - Path is invalid
pub fn write_folded(entries: &[CountEntry], output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing collapsed stacks to: {}", output_path.display());

    prepare_output_path(output_path)?;

    let content = to_folded(entries);

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let mut writer = BufWriter::new(file);

    writer
        .write_all(content.as_bytes())
        .map_err(OutputError::WriteFailed)?;
    writer.flush().map_err(OutputError::WriteFailed)?;

    info!("Collapsed stacks written ({} lines)", content.lines().count());

    Ok(())
}
