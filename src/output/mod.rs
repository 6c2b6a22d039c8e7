//! Report building and output writers.
//!
//! This module handles:
//! - Building the report model and rendering it as text
//! - JSON reports
//! - Collapsed stacks for flamegraph tools

pub mod folded;
pub mod json;
pub mod report;

// Re-export main functions
pub use folded::{to_folded, write_folded};
pub use json::{read_report, write_report};
pub use report::{build_report, render_text, Report, ReportEntry, ReportOptions};

use crate::utils::error::OutputError;
use log::debug;
use std::path::Path;

/// Common path validation for output files
pub fn validate_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

/// Validate `path` and create its parent directories
pub(crate) fn prepare_output_path(path: &Path) -> Result<(), OutputError> {
    validate_path(path)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    Ok(())
}
