//! Record command implementation (run and attach).
//!
//! The record command:
//! 1. Launches the target or attaches to it
//! 2. Samples it with gdb until it exits
//! 3. Optionally analyzes the capture log

use super::analyze::execute_analyze;
use super::models::{RecordArgs, RecordTarget};
use crate::output::validate_path;
use crate::sampler::{run_session, GdbInvoker, SamplingOutcome, SessionConfig, Target};
use anyhow::{Context, Result};
use log::info;
use std::time::Instant;

/// Execute the run or attach command
///
/// **Public** - main entry point called from main.rs
///
/// # Returns
/// The sampling outcome. A degraded outcome is not an error here; the
/// caller decides how to report it.
///
/// # Errors
/// * Target cannot be launched or does not exist
/// * Capture log cannot be written
/// * Post-recording analysis fails
pub fn execute_record(args: &RecordArgs) -> Result<SamplingOutcome> {
    let start_time = Instant::now();

    let mut target = match &args.target {
        RecordTarget::Run(command) => {
            info!("Launching: {}", command.join(" "));
            Target::spawn(command).context("Failed to launch command")?
        }
        RecordTarget::Attach(pid) => {
            info!("Attaching to pid {}", pid);
            Target::attach(*pid).with_context(|| format!("Failed to attach to pid {}", pid))?
        }
    };

    let config = SessionConfig {
        interval: args.effective_interval(),
        max_rounds: args.max_rounds,
        gdb: GdbInvoker::new(args.gdb.clone()),
    };

    let session = run_session(&mut target, &args.capture_log, &config);

    // Release the target even when the session failed
    if let Some(status) = target.finish() {
        info!("Target exited: {}", status);
    }

    let outcome = session.with_context(|| {
        format!(
            "Failed to record into {}",
            args.capture_log.display()
        )
    })?;

    info!(
        "Recording completed in {:.2}s ({} rounds)",
        start_time.elapsed().as_secs_f64(),
        outcome.rounds
    );

    if let Some(analyze) = &args.analyze {
        execute_analyze(analyze)?;
    }

    Ok(outcome)
}

/// Validate record arguments
///
/// **Public** - can be called before execute_record for early validation
pub fn validate_record_args(args: &RecordArgs) -> Result<()> {
    match &args.target {
        RecordTarget::Run(command) if command.is_empty() => {
            anyhow::bail!("No command given to run");
        }
        RecordTarget::Attach(0) => {
            anyhow::bail!("Pid must be greater than 0");
        }
        _ => {}
    }

    if args.gdb.is_empty() {
        anyhow::bail!("gdb program cannot be empty");
    }

    if args.effective_interval().is_zero() {
        anyhow::bail!("Interval must be greater than 0");
    }

    validate_path(&args.capture_log).context("Invalid capture log path")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn run_args() -> RecordArgs {
        RecordArgs {
            target: RecordTarget::Run(vec!["sleep".to_string(), "1".to_string()]),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_record_args_valid() {
        assert!(validate_record_args(&run_args()).is_ok());
    }

    #[test]
    fn test_validate_record_args_empty_command() {
        assert!(validate_record_args(&RecordArgs::default()).is_err());
    }

    #[test]
    fn test_validate_record_args_zero_pid() {
        let args = RecordArgs {
            target: RecordTarget::Attach(0),
            ..Default::default()
        };
        assert!(validate_record_args(&args).is_err());
    }

    #[test]
    fn test_validate_record_args_zero_interval() {
        let args = RecordArgs {
            interval: Some(Duration::ZERO),
            ..run_args()
        };
        assert!(validate_record_args(&args).is_err());
    }

    #[test]
    fn test_validate_record_args_log_is_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let args = RecordArgs {
            capture_log: temp_dir.path().to_path_buf(),
            ..run_args()
        };
        assert!(validate_record_args(&args).is_err());
    }

    #[test]
    fn test_default_intervals() {
        assert_eq!(run_args().effective_interval(), Duration::from_secs(3));
        let attach = RecordArgs {
            target: RecordTarget::Attach(1),
            ..Default::default()
        };
        assert_eq!(attach.effective_interval(), Duration::from_secs(1));
    }
}
