//! JSON report output writer.
//!
//! Writes Report structs to JSON files with proper formatting.

use super::{prepare_output_path, report::Report};
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write a report to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Arguments
/// * `report` - Report data to write
/// * `output_path` - Path to output JSON file
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
///
/// # Example
/// ```ignore
/// let report = build_report(&parsed.profile, ReportOptions::default())?;
/// write_report(&report, "report.json")?;
/// ```
pub fn write_report(report: &Report, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing report to: {}", output_path.display());

    prepare_output_path(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let mut writer = BufWriter::new(file);

    // Serialize to JSON with pretty printing
    serde_json::to_writer_pretty(&mut writer, report)
        .map_err(OutputError::SerializationFailed)?;
    writer.flush().map_err(OutputError::WriteFailed)?;

    info!(
        "Report written successfully ({} bytes)",
        calculate_file_size(output_path)
    );

    Ok(())
}

/// Calculate file size in bytes
///
/// **Private** - internal utility
fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

/// Read a report from a JSON file
///
/// **Public** - useful for validation and testing
///
/// # Errors
/// * `OutputError::WriteFailed` - File read error (reusing WriteFailed for I/O)
/// * `OutputError::SerializationFailed` - JSON parse error
pub fn read_report(input_path: impl AsRef<Path>) -> Result<Report, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading report from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;

    let report: Report =
        serde_json::from_reader(file).map_err(OutputError::SerializationFailed)?;

    debug!(
        "Report loaded: version {}, {} entries",
        report.version,
        report.entries.len()
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::ProfileSummary;
    use crate::output::report::{CountMode, ReportEntry};
    use tempfile::NamedTempFile;

    fn create_test_report() -> Report {
        Report {
            version: "1.0.0".to_string(),
            mode: CountMode::Exact,
            context: None,
            summary: ProfileSummary {
                trace_count: 1,
                sample_count: 1,
                distinct_stacks: 1,
                distinct_threads: 1,
            },
            entries: vec![ReportEntry {
                count: 1,
                identity: Some(0),
                threads: vec![],
                frames: vec!["foo".to_string(), "main".to_string()],
            }],
            generated_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_write_and_read_report() {
        let report = create_test_report();
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path();

        write_report(&report, path).unwrap();
        let loaded = read_report(path).unwrap();

        assert_eq!(loaded, report);
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested_path = temp_dir.path().join("nested/dirs/report.json");

        write_report(&create_test_report(), &nested_path).unwrap();

        assert!(nested_path.exists());
    }

    #[test]
    fn test_read_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(read_report(temp_dir.path().join("missing.json")).is_err());
    }
}
