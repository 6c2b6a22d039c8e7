//! Capturing backtraces from a live process.
//!
//! This module handles:
//! - Launching or attaching to the target process
//! - Running gdb in batch mode once per round
//! - Appending raw output to the capture log

pub mod gdb;
pub mod session;
pub mod target;

// Re-export main types
pub use gdb::{GdbCapture, GdbInvoker};
pub use session::{run_session, SamplingOutcome, SessionConfig};
pub use target::Target;
