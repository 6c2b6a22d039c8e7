//! pmprof
//!
//! A poor man's sampling profiler. It periodically asks gdb for a
//! backtrace of every thread of a running process, writes the raw output
//! to a capture log, and reduces that log into a report of the call
//! stacks seen most often.
//!
//! ## Getting Started
//!
//! ```bash
//! pmprof run -- ./my-server --port 8080
//! pmprof analyze --file pmprof.log --cumulative
//! ```
//!
//! The library exposes each stage separately:
//! - [`parser`] - capture log to `Profile`
//! - [`aggregator`] - identities, context filtering, exact and cumulative counts
//! - [`output`] - report model, text rendering, JSON and collapsed-stack exports
//! - [`sampler`] - gdb invocation and the sampling loop

pub mod aggregator;
pub mod commands;
pub mod output;
pub mod parser;
pub mod sampler;
pub mod utils;
