//! Non-interactive gdb invocation.
//!
//! Each capture attaches gdb in batch mode, echoes the round separator,
//! dumps every thread's backtrace and detaches.

use crate::utils::config::{DEFAULT_GDB, TRACE_SEPARATOR};
use crate::utils::error::SamplerError;
use log::debug;
use std::process::{Command, ExitStatus, Stdio};

/// Runs gdb against a process
#[derive(Debug, Clone)]
pub struct GdbInvoker {
    program: String,
}

impl Default for GdbInvoker {
    fn default() -> Self {
        Self::new(DEFAULT_GDB)
    }
}

/// Output of one gdb run
#[derive(Debug)]
pub struct GdbCapture {
    /// stdout followed by stderr
    pub output: Vec<u8>,
    pub status: ExitStatus,
    program: String,
}

impl GdbCapture {
    /// Fail if gdb reported an error through its exit status
    pub fn check(&self) -> Result<(), SamplerError> {
        if self.status.success() {
            Ok(())
        } else {
            Err(SamplerError::NonZeroExit {
                program: self.program.clone(),
                status: self.status.to_string(),
            })
        }
    }
}

impl GdbInvoker {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments for one batch-mode backtrace of `pid`
    pub fn batch_args(pid: u32) -> Vec<String> {
        vec![
            "-batch".to_string(),
            "-nx".to_string(),
            "-ex".to_string(),
            // gdb's echo expands the escaped newline itself
            format!("echo {}\\n", TRACE_SEPARATOR),
            "-ex".to_string(),
            "thread apply all bt".to_string(),
            "-p".to_string(),
            pid.to_string(),
        ]
    }

    /// Capture all thread backtraces of `pid`
    ///
    /// # Errors
    /// * `SamplerError::SpawnFailed` - gdb could not be started
    ///
    /// A non-zero exit is not an error here: the output is still worth
    /// logging. Call `GdbCapture::check` to find out.
    pub fn capture(&self, pid: u32) -> Result<GdbCapture, SamplerError> {
        debug!("Running {} against pid {}", self.program, pid);

        let output = Command::new(&self.program)
            .args(Self::batch_args(pid))
            .stdin(Stdio::null())
            .output()
            .map_err(|source| SamplerError::SpawnFailed {
                program: self.program.clone(),
                source,
            })?;

        let mut combined = output.stdout;
        combined.extend_from_slice(&output.stderr);

        debug!(
            "{} exited with {} ({} bytes of output)",
            self.program,
            output.status,
            combined.len()
        );

        Ok(GdbCapture {
            output: combined,
            status: output.status,
            program: self.program.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_args() {
        let args = GdbInvoker::batch_args(4242);

        assert_eq!(args[0], "-batch");
        assert_eq!(args[3], format!("echo {}\\n", TRACE_SEPARATOR));
        assert_eq!(args[5], "thread apply all bt");
        assert_eq!(&args[6..], ["-p", "4242"]);
    }

    #[test]
    fn test_missing_program() {
        let invoker = GdbInvoker::new("/nonexistent/pmprof-gdb");
        let err = invoker.capture(1).unwrap_err();
        assert!(matches!(err, SamplerError::SpawnFailed { .. }));
    }
}
