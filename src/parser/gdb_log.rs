//! Capture log parser.
//!
//! Walks gdb output top to bottom and rebuilds the `Profile` it describes.
//! Malformed or unexpected lines never abort parsing: they are logged,
//! collected as `Anomaly` records and otherwise skipped, so a drifting gdb
//! output format costs frames rather than the whole analysis.

use super::classify::{classify_line, LineKind};
use super::schema::{CallStack, Frame, Profile, Sample, Trace};
use crate::utils::error::ParseError;
use log::{debug, info, warn};
use std::path::Path;

/// A line the grammar could not place
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anomaly {
    /// 1-based line number in the capture log
    pub line_number: usize,
    pub text: String,
    pub reason: AnomalyReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnomalyReason {
    /// Matched no rule
    Unrecognized,
    /// A frame line with no thread header before it in the round
    OrphanFrame,
}

/// Result of parsing a capture log
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedLog {
    pub profile: Profile,
    pub anomalies: Vec<Anomaly>,
}

/// Incremental state while reading a log
#[derive(Default)]
struct ProfileBuilder {
    traces: Vec<Trace>,
    current_trace: Vec<Sample>,
    current_sample: Option<(String, Vec<Frame>)>,
    anomalies: Vec<Anomaly>,
}

impl ProfileBuilder {
    fn close_sample(&mut self) {
        if let Some((thread_id, frames)) = self.current_sample.take() {
            self.current_trace
                .push(Sample::new(thread_id, CallStack::new(frames)));
        }
    }

    fn close_trace(&mut self) {
        self.close_sample();
        if !self.current_trace.is_empty() {
            let samples = std::mem::take(&mut self.current_trace);
            self.traces.push(Trace::new(samples));
        }
    }

    fn report(&mut self, line_number: usize, line: &str, reason: AnomalyReason) {
        warn!(
            "Skipping line {} ({:?}): {}",
            line_number,
            reason,
            line.trim_end()
        );
        self.anomalies.push(Anomaly {
            line_number,
            text: line.to_string(),
            reason,
        });
    }

    fn feed(&mut self, line_number: usize, line: &str) {
        match classify_line(line) {
            LineKind::Separator => self.close_trace(),
            LineKind::ThreadHeader { thread_id } => {
                self.close_sample();
                self.current_sample = Some((thread_id.to_string(), Vec::new()));
            }
            LineKind::Frame { name } => match self.current_sample.as_mut() {
                Some((_, frames)) => frames.push(name.to_string()),
                None => self.report(line_number, line, AnomalyReason::OrphanFrame),
            },
            LineKind::Noise => {}
            LineKind::Unrecognized => self.report(line_number, line, AnomalyReason::Unrecognized),
        }
    }

    fn finish(mut self) -> ParsedLog {
        self.close_trace();
        ParsedLog {
            profile: Profile::new(self.traces),
            anomalies: self.anomalies,
        }
    }
}

/// Parse captured gdb output, one item per line
///
/// **Public** - main entry point for parsing
///
/// Lines are classified by `classify_line`. Thread headers open a sample,
/// frames extend it, separators close the current round. Whatever is still
/// open at the end of input is closed as if a separator followed.
pub fn parse_lines<I, S>(lines: I) -> ParsedLog
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut builder = ProfileBuilder::default();

    for (index, line) in lines.into_iter().enumerate() {
        builder.feed(index + 1, line.as_ref());
    }

    let parsed = builder.finish();
    debug!(
        "Parsed {} traces with {} anomalies",
        parsed.profile.traces.len(),
        parsed.anomalies.len()
    );
    parsed
}

/// Parse a whole capture log held in memory
pub fn parse_log(text: &str) -> ParsedLog {
    parse_lines(text.lines())
}

/// Read and parse a capture log file
///
/// **Public** - used by the analyze command
///
/// Bytes that are not valid UTF-8 (gdb echoes whatever the target's
/// symbols contain) are replaced rather than rejected.
///
/// # Errors
/// * `ParseError::ReadFailed` - the file cannot be read
pub fn read_capture_log(path: impl AsRef<Path>) -> Result<ParsedLog, ParseError> {
    let path = path.as_ref();
    info!("Reading capture log: {}", path.display());

    let bytes = std::fs::read(path)?;
    let text = String::from_utf8_lossy(&bytes);

    let parsed = parse_log(&text);
    if !parsed.anomalies.is_empty() {
        warn!(
            "{} line(s) in {} were not understood and were skipped",
            parsed.anomalies.len(),
            path.display()
        );
    }

    Ok(parsed)
}
