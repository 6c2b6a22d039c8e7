use crate::aggregator::StackIdentity;
use crate::utils::config::{
    DEFAULT_ATTACH_INTERVAL, DEFAULT_CAPTURE_LOG, DEFAULT_GDB, DEFAULT_RUN_INTERVAL,
};
use std::path::PathBuf;
use std::time::Duration;

/// Which process to sample
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordTarget {
    /// Launch this command (program, then arguments)
    Run(Vec<String>),
    /// Attach to a running process
    Attach(u32),
}

impl RecordTarget {
    /// Interval used when none is given
    pub fn default_interval(&self) -> Duration {
        match self {
            Self::Run(_) => DEFAULT_RUN_INTERVAL,
            Self::Attach(_) => DEFAULT_ATTACH_INTERVAL,
        }
    }
}

/// Arguments for the run and attach commands
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct RecordArgs {
    pub target: RecordTarget,

    /// Where raw gdb output is written
    pub capture_log: PathBuf,

    /// Pause between rounds (None = per-target default)
    pub interval: Option<Duration>,

    /// Stop after this many rounds
    pub max_rounds: Option<usize>,

    /// gdb program to invoke
    pub gdb: String,

    /// Analyze the capture log once sampling ends
    pub analyze: Option<AnalyzeArgs>,
}

impl RecordArgs {
    pub fn effective_interval(&self) -> Duration {
        self.interval
            .unwrap_or_else(|| self.target.default_interval())
    }
}

impl Default for RecordArgs {
    fn default() -> Self {
        Self {
            target: RecordTarget::Run(Vec::new()),
            capture_log: PathBuf::from(DEFAULT_CAPTURE_LOG),
            interval: None,
            max_rounds: None,
            gdb: DEFAULT_GDB.to_string(),
            analyze: None,
        }
    }
}

/// Arguments for the analyze command
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// Capture log to read
    pub capture_log: PathBuf,

    /// Inclusive counts over stack suffixes
    pub cumulative: bool,

    /// Restrict to rounds where this stack was live
    pub context: Option<StackIdentity>,

    /// Output path for JSON report (optional)
    pub output_json: Option<PathBuf>,

    /// Output path for collapsed stacks (optional)
    pub output_folded: Option<PathBuf>,

    /// Print the text report to stdout
    pub print_report: bool,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            capture_log: PathBuf::from(DEFAULT_CAPTURE_LOG),
            cumulative: false,
            context: None,
            output_json: None,
            output_folded: None,
            print_report: true,
        }
    }
}
