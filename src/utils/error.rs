//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that can occur while invoking gdb against the target
#[derive(Error, Debug)]
pub enum SamplerError {
    #[error("Failed to launch {program}: {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with status {status}")]
    NonZeroExit { program: String, status: String },

    #[error("Failed to write capture log: {0}")]
    LogWriteFailed(#[from] std::io::Error),

    #[error("Invalid target: {0}")]
    InvalidTarget(String),
}

/// Errors that can occur while reading a capture log
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Failed to read capture log: {0}")]
    ReadFailed(#[from] std::io::Error),
}

/// Internal consistency violations in aggregation
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AggregateError {
    #[error("Rollup visited a stack of length {current} after one of length {previous}")]
    RollupOrderViolation { previous: usize, current: usize },
}

/// Errors in resolving analysis options against a profile
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("No call stack with identity {identity} (profile has {known} distinct stacks)")]
    UnknownStackIdentity { identity: usize, known: usize },

    #[error(transparent)]
    Aggregate(#[from] AggregateError),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
