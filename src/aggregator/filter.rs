//! Context filtering: keep only the rounds where a given stack was live.

use super::identity::{StackIdentity, StackRegistry};
use crate::parser::{CallStack, Profile};
use crate::utils::error::AnalysisError;
use log::debug;

/// Traces containing at least one sample whose stack is exactly `target`
///
/// Capture order is preserved and each trace appears at most once, however
/// many of its threads matched.
pub fn filter_by_stack(profile: &Profile, target: &CallStack) -> Profile {
    let traces: Vec<_> = profile
        .traces
        .iter()
        .filter(|trace| trace.contains_stack(target))
        .cloned()
        .collect();

    debug!(
        "Context filter kept {} of {} traces",
        traces.len(),
        profile.traces.len()
    );

    Profile::new(traces)
}

/// Like `filter_by_stack`, naming the target by its identity
///
/// # Errors
/// * `AnalysisError::UnknownStackIdentity` - `registry` has no such identity
pub fn filter_by_identity(
    profile: &Profile,
    registry: &StackRegistry,
    identity: StackIdentity,
) -> Result<Profile, AnalysisError> {
    let target = registry
        .stack_for(identity)
        .ok_or(AnalysisError::UnknownStackIdentity {
            identity,
            known: registry.len(),
        })?;

    Ok(filter_by_stack(profile, target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{Sample, Trace};

    fn stack(frames: &[&str]) -> CallStack {
        frames.iter().copied().collect()
    }

    fn profile() -> Profile {
        Profile::new(vec![
            Trace::new(vec![
                Sample::new("1", stack(&["lock", "main"])),
                Sample::new("2", stack(&["lock", "main"])),
            ]),
            Trace::new(vec![Sample::new("1", stack(&["read", "main"]))]),
            Trace::new(vec![
                Sample::new("1", stack(&["read", "main"])),
                Sample::new("2", stack(&["lock", "main"])),
            ]),
        ])
    }

    #[test]
    fn test_filter_keeps_matching_traces_once() {
        let profile = profile();
        let filtered = filter_by_stack(&profile, &stack(&["lock", "main"]));

        assert_eq!(filtered.traces.len(), 2);
        assert_eq!(filtered.traces[0], profile.traces[0]);
        assert_eq!(filtered.traces[1], profile.traces[2]);
    }

    #[test]
    fn test_filter_requires_exact_match() {
        let filtered = filter_by_stack(&profile(), &stack(&["main"]));
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_filter_by_identity() {
        let profile = profile();
        let registry = StackRegistry::from_profile(&profile);

        let filtered = filter_by_identity(&profile, &registry, 1).unwrap();
        assert_eq!(filtered.traces.len(), 2);

        let err = filter_by_identity(&profile, &registry, 9).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::UnknownStackIdentity {
                identity: 9,
                known: 2
            }
        );
    }
}
