//! Analyze command implementation.
//!
//! The analyze command:
//! 1. Reads and parses the capture log
//! 2. Resolves the drill-down context, if any
//! 3. Aggregates exact or cumulative counts
//! 4. Prints the text report
//! 5. Writes optional JSON and collapsed-stack exports

use super::models::AnalyzeArgs;
use crate::aggregator::{summarize, CountEntry};
use crate::output::report::describe_stack;
use crate::output::{build_report, render_text, write_folded, write_report, Report, ReportOptions};
use crate::parser::{read_capture_log, CallStack};
use anyhow::{Context, Result};
use log::{debug, info};
use std::time::Instant;

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// # Returns
/// The report that was printed
///
/// # Errors
/// * Capture log cannot be read
/// * Context identity does not exist in the log
/// * Output files cannot be written
pub fn execute_analyze(args: &AnalyzeArgs) -> Result<Report> {
    let start_time = Instant::now();

    info!("Step 1/4: Parsing capture log...");
    let parsed = read_capture_log(&args.capture_log).with_context(|| {
        format!(
            "Failed to read capture log {}",
            args.capture_log.display()
        )
    })?;
    let profile = parsed.profile;

    info!("Profile: {}", summarize(&profile).summary());

    info!(
        "Step 2/4: Aggregating {} counts...",
        if args.cumulative { "cumulative" } else { "exact" }
    );
    let options = ReportOptions {
        cumulative: args.cumulative,
        context: args.context,
    };
    let report = build_report(&profile, options).context("Failed to aggregate profile")?;

    if let Some(context) = &report.context {
        let stack = CallStack::new(context.frames.clone());
        info!(
            "Context: stack #{} {}",
            context.identity,
            describe_stack(&stack)
        );
    }

    debug!("Report has {} entries", report.entries.len());

    info!("Step 3/4: Rendering report...");
    if args.print_report {
        print!("{}", render_text(&report));
    }

    info!("Step 4/4: Writing exports...");
    if let Some(path) = &args.output_json {
        write_report(&report, path).context("Failed to write JSON report")?;
        info!("✓ Report written to: {}", path.display());
    }

    if let Some(path) = &args.output_folded {
        let exact = if args.cumulative {
            let exact_options = ReportOptions {
                cumulative: false,
                ..options
            };
            build_report(&profile, exact_options).context("Failed to aggregate profile")?
        } else {
            report.clone()
        };
        write_folded(&report_counts(&exact), path)
            .context("Failed to write collapsed stacks")?;
        info!("✓ Collapsed stacks written to: {}", path.display());
    }

    info!(
        "Analysis completed in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );

    Ok(report)
}

/// Report entries back as count entries
fn report_counts(report: &Report) -> Vec<CountEntry> {
    report
        .entries
        .iter()
        .map(|e| CountEntry::new(e.count, CallStack::new(e.frames.clone())))
        .collect()
}

/// Validate analyze arguments
///
/// **Public** - can be called before execute_analyze for early validation
pub fn validate_analyze_args(args: &AnalyzeArgs) -> Result<()> {
    if args.capture_log.as_os_str().is_empty() {
        anyhow::bail!("Capture log path cannot be empty");
    }

    if args.capture_log.is_dir() {
        anyhow::bail!(
            "Capture log path is a directory: {}",
            args.capture_log.display()
        );
    }

    for path in [&args.output_json, &args.output_folded].into_iter().flatten() {
        if path == &args.capture_log {
            anyhow::bail!(
                "Output {} would overwrite the capture log",
                path.display()
            );
        }
    }

    Ok(())
}
