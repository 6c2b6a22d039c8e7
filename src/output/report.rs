//! Report model and plain-text rendering.
//!
//! A `Report` is everything the analyze command prints: one entry per
//! distinct stack (or stack suffix in cumulative mode) with its count,
//! drill-down identity, per-thread breakdown and frames.

use crate::aggregator::{
    cumulative_counts, exact_counts, filter_by_identity, summarize, thread_breakdowns,
    ProfileSummary, StackIdentity, StackRegistry, ThreadCount,
};
use crate::parser::{CallStack, Frame, Profile};
use crate::utils::config::REPORT_SCHEMA_VERSION;
use crate::utils::error::AnalysisError;
use chrono::Utc;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// What to aggregate and how
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportOptions {
    /// Inclusive counts over stack suffixes instead of exact counts
    pub cumulative: bool,

    /// Only analyze rounds where this stack was live on some thread
    pub context: Option<StackIdentity>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountMode {
    Exact,
    Cumulative,
}

/// Drill-down target of a context-restricted report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextInfo {
    pub identity: StackIdentity,
    pub frames: Vec<Frame>,
}

/// One line item of the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    /// Exact or inclusive sample count, depending on `Report::mode`
    pub count: u64,

    /// Identity of this stack, if it was ever observed whole
    ///
    /// Suffixes produced by the cumulative rollup that never appeared as a
    /// complete stack have none.
    pub identity: Option<StackIdentity>,

    /// Samples per thread id, sorted by thread id
    pub threads: Vec<ThreadCount>,

    /// Frames, innermost first
    pub frames: Vec<Frame>,
}

/// Full analysis output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Schema version for compatibility checking
    pub version: String,

    pub mode: CountMode,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<ContextInfo>,

    /// Numbers for the analyzed (possibly context-filtered) profile
    pub summary: ProfileSummary,

    /// Ascending by `(count, frames)`: the hottest stack comes last
    pub entries: Vec<ReportEntry>,

    /// Timestamp when the report was generated
    pub generated_at: String,
}

/// Aggregate `profile` into a report
///
/// **Public** - main entry point for analysis
///
/// Identities are assigned over the whole profile before any context
/// filtering, so a stack keeps its number when drilling down.
///
/// # Errors
/// * `AnalysisError::UnknownStackIdentity` - `options.context` names no stack
/// * `AnalysisError::Aggregate` - internal rollup consistency check failed
pub fn build_report(profile: &Profile, options: ReportOptions) -> Result<Report, AnalysisError> {
    let registry = StackRegistry::from_profile(profile);

    let (analyzed, context) = match options.context {
        Some(identity) => {
            let filtered = filter_by_identity(profile, &registry, identity)?;
            let frames = registry
                .stack_for(identity)
                .map(|s| s.frames().to_vec())
                .unwrap_or_default();
            (filtered, Some(ContextInfo { identity, frames }))
        }
        None => (profile.clone(), None),
    };

    let exact = exact_counts(&analyzed.traces);
    let (mode, counts) = if options.cumulative {
        (CountMode::Cumulative, cumulative_counts(&exact)?)
    } else {
        (CountMode::Exact, exact)
    };

    let mut breakdowns = thread_breakdowns(&analyzed.traces, options.cumulative);

    let entries: Vec<ReportEntry> = counts
        .into_iter()
        .map(|entry| ReportEntry {
            count: entry.count,
            identity: registry.identity_of(&entry.stack),
            threads: breakdowns.remove(&entry.stack).unwrap_or_default(),
            frames: entry.stack.frames().to_vec(),
        })
        .collect();

    debug!("Report has {} entries ({:?} mode)", entries.len(), mode);

    Ok(Report {
        version: REPORT_SCHEMA_VERSION.to_string(),
        mode,
        context,
        summary: summarize(&analyzed),
        entries,
        generated_at: Utc::now().to_rfc3339(),
    })
}

/// Render report entries as text
///
/// **Public** - what the analyze command prints
///
/// A report with no entries renders to an empty string.
pub fn render_text(report: &Report) -> String {
    let mut out = String::new();

    for entry in &report.entries {
        render_entry(&mut out, entry);
    }

    out
}

fn render_entry(out: &mut String, entry: &ReportEntry) {
    let identity = entry
        .identity
        .map(|id| format!("#{id}"))
        .unwrap_or_else(|| "-".to_string());

    let threads = entry
        .threads
        .iter()
        .map(|t| format!("{}:{}", t.thread_id, t.count))
        .collect::<Vec<_>>()
        .join(" ");

    let noun = if entry.count == 1 { "sample" } else { "samples" };

    // Writing into a String cannot fail
    let _ = writeln!(out, "{} {}, stack {}", entry.count, noun, identity);
    let _ = writeln!(out, "  threads: {}", threads);
    if entry.frames.is_empty() {
        let _ = writeln!(out, "  (no frames)");
    }
    for (index, frame) in entry.frames.iter().enumerate() {
        let _ = writeln!(out, "  {:>3}  {}", index, frame);
    }
    out.push('\n');
}

/// Short one-line description of a stack for log messages
pub fn describe_stack(stack: &CallStack) -> String {
    match stack.frames().first() {
        Some(innermost) => format!("{} ({} frames)", innermost, stack.len()),
        None => "<empty stack>".to_string(),
    }
}
