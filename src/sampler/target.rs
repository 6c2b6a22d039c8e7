//! The process being profiled.

use crate::utils::error::SamplerError;
use log::{debug, info, warn};
use std::fs;
use std::process::{Child, Command, ExitStatus};

/// A process we sample: launched by us or attached to by pid
#[derive(Debug)]
pub enum Target {
    Spawned(Child),
    Attached(u32),
}

impl Target {
    /// Launch `command` (program followed by its arguments)
    pub fn spawn(command: &[String]) -> Result<Self, SamplerError> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| SamplerError::InvalidTarget("empty command".to_string()))?;

        let child = Command::new(program)
            .args(args)
            .spawn()
            .map_err(|source| SamplerError::SpawnFailed {
                program: program.clone(),
                source,
            })?;

        info!("Launched {} as pid {}", program, child.id());
        Ok(Self::Spawned(child))
    }

    /// Attach to an already running process
    pub fn attach(pid: u32) -> Result<Self, SamplerError> {
        if !pid_is_running(pid) {
            return Err(SamplerError::InvalidTarget(format!(
                "no running process with pid {pid}"
            )));
        }
        Ok(Self::Attached(pid))
    }

    pub fn pid(&self) -> u32 {
        match self {
            Self::Spawned(child) => child.id(),
            Self::Attached(pid) => *pid,
        }
    }

    pub fn is_alive(&mut self) -> bool {
        match self {
            Self::Spawned(child) => match child.try_wait() {
                Ok(None) => true,
                Ok(Some(status)) => {
                    debug!("Target exited: {}", status);
                    false
                }
                Err(e) => {
                    warn!("Cannot query target status: {}", e);
                    false
                }
            },
            Self::Attached(pid) => pid_is_running(*pid),
        }
    }

    /// Release the target once sampling is over
    ///
    /// A command we launched is reaped, and killed first if it is still
    /// running (sampling stopped early). Attached processes are left alone.
    pub fn finish(self) -> Option<ExitStatus> {
        match self {
            Self::Spawned(mut child) => {
                if let Ok(None) = child.try_wait() {
                    info!("Stopping pid {}", child.id());
                    if let Err(e) = child.kill() {
                        warn!("Failed to stop pid {}: {}", child.id(), e);
                    }
                }
                child.wait().ok()
            }
            Self::Attached(_) => None,
        }
    }
}

/// Whether `pid` exists and has not exited
///
/// An exited process keeps its `/proc` entry until its parent reaps it,
/// so the state field of `stat` is checked as well.
fn pid_is_running(pid: u32) -> bool {
    match fs::read_to_string(format!("/proc/{pid}/stat")) {
        Ok(stat) => !matches!(process_state(&stat), Some('Z' | 'X') | None),
        Err(_) => false,
    }
}

/// State letter from a `/proc/<pid>/stat` line
///
/// The command name sits in parentheses and may itself contain spaces or
/// parentheses, so the state is read after the last `)`.
fn process_state(stat: &str) -> Option<char> {
    let (_, rest) = stat.rsplit_once(')')?;
    rest.trim_start().chars().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_empty_command() {
        let err = Target::spawn(&[]).unwrap_err();
        assert!(matches!(err, SamplerError::InvalidTarget(_)));
    }

    #[test]
    fn test_attach_missing_pid() {
        assert!(Target::attach(u32::MAX).is_err());
    }

    #[test]
    fn test_process_state() {
        assert_eq!(process_state("4242 (worker) S 1 4242 4242 0 -1"), Some('S'));
        assert_eq!(process_state("4242 (a) (b)) Z 1 4242"), Some('Z'));
        assert_eq!(process_state("4242 (worker)"), None);
        assert_eq!(process_state(""), None);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_unreaped_child_is_not_alive() {
        let mut child = Command::new("true").spawn().unwrap();
        let pid = child.id();
        let stat_path = format!("/proc/{pid}/stat");

        // Wait for the exit without reaping, leaving a zombie behind
        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(10);
        while fs::read_to_string(&stat_path)
            .ok()
            .and_then(|stat| process_state(&stat))
            != Some('Z')
        {
            assert!(std::time::Instant::now() < deadline, "child never exited");
            std::thread::sleep(std::time::Duration::from_millis(10));
        }

        let mut target = Target::Attached(pid);
        assert!(!target.is_alive());
        assert!(Target::attach(pid).is_err());

        child.wait().unwrap();
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_attach_self() {
        let mut target = Target::attach(std::process::id()).unwrap();
        assert!(target.is_alive());
        assert_eq!(target.pid(), std::process::id());
        assert!(target.finish().is_none());
    }
}
