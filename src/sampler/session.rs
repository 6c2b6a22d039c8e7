//! The sampling loop.
//!
//! Repeatedly runs gdb against the target and appends its output to the
//! capture log until the target goes away (or a round limit is hit). A
//! failed round does not end the session: the profile is marked degraded
//! and sampling carries on while the target lives.

use super::gdb::GdbInvoker;
use super::target::Target;
use crate::utils::error::SamplerError;
use log::{debug, info, warn};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

/// Granularity of liveness checks while waiting between rounds
const POLL_STEP: Duration = Duration::from_millis(100);

/// Sampling parameters
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Pause between rounds
    pub interval: Duration,

    /// Stop after this many rounds even if the target is still alive
    pub max_rounds: Option<usize>,

    pub gdb: GdbInvoker,
}

/// What happened during a session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SamplingOutcome {
    /// gdb invocations attempted
    pub rounds: usize,

    /// Invocations that failed to start or exited with an error
    pub failed_rounds: usize,
}

impl SamplingOutcome {
    /// Whether some rounds are missing from the capture log
    pub fn is_degraded(&self) -> bool {
        self.failed_rounds > 0
    }
}

/// Sample `target` into a fresh capture log at `log_path`
///
/// **Public** - main entry point for recording
///
/// The log is created (truncated) once and held for the whole session;
/// it is flushed after every round and closed on every exit path.
///
/// # Errors
/// * `SamplerError::LogWriteFailed` - the capture log cannot be written
///
/// gdb failures are not errors: they are counted in the outcome.
pub fn run_session(
    target: &mut Target,
    log_path: &Path,
    config: &SessionConfig,
) -> Result<SamplingOutcome, SamplerError> {
    let pid = target.pid();
    info!(
        "Sampling pid {} every {:.1}s into {}",
        pid,
        config.interval.as_secs_f64(),
        log_path.display()
    );

    let mut writer = BufWriter::new(File::create(log_path)?);
    let mut outcome = SamplingOutcome::default();

    loop {
        if config.max_rounds.is_some_and(|max| outcome.rounds >= max) {
            info!("Reached {} rounds, stopping", outcome.rounds);
            break;
        }
        if !target.is_alive() {
            info!("Target pid {} is gone, stopping", pid);
            break;
        }

        outcome.rounds += 1;
        let round_ok = match config.gdb.capture(pid) {
            Ok(capture) => {
                writer.write_all(&capture.output)?;
                capture.check()
            }
            Err(e) => Err(e),
        };
        writer.flush()?;

        if let Err(e) = round_ok {
            if target.is_alive() {
                warn!("Round {} failed: {}", outcome.rounds, e);
                outcome.failed_rounds += 1;
            } else {
                // The target exited while gdb was attaching
                debug!("Round {} raced target exit: {}", outcome.rounds, e);
                break;
            }
        }

        wait_interval(target, config.interval);
    }

    writer.flush()?;

    if outcome.is_degraded() {
        warn!(
            "{} of {} rounds failed; the profile is incomplete",
            outcome.failed_rounds, outcome.rounds
        );
    } else {
        info!("Captured {} rounds", outcome.rounds);
    }

    Ok(outcome)
}

/// Sleep for `interval`, returning early if the target exits
fn wait_interval(target: &mut Target, interval: Duration) {
    let deadline = Instant::now() + interval;

    while target.is_alive() {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        thread::sleep(POLL_STEP.min(deadline - now));
    }
}
