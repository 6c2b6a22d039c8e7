//! Capture log parsing and the call-stack data model.
//!
//! This module handles:
//! - Classifying raw gdb output lines
//! - Rebuilding traces, samples and call stacks from a capture log
//! - Reporting lines that could not be understood

pub mod classify;
pub mod gdb_log;
pub mod schema;

// Re-export main types
pub use classify::{classify_line, LineKind};
pub use gdb_log::{parse_lines, parse_log, read_capture_log, Anomaly, AnomalyReason, ParsedLog};
pub use schema::{CallStack, Frame, Profile, Sample, Trace};
