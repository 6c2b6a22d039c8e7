//! Summary statistics over a parsed profile.

use crate::parser::Profile;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Headline numbers of one profile
///
/// **Public** - logged after parsing and embedded in reports
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSummary {
    /// Sampling rounds
    pub trace_count: usize,

    /// Thread snapshots across all rounds
    pub sample_count: usize,

    /// Distinct call stacks
    pub distinct_stacks: usize,

    /// Distinct thread ids seen in any round
    pub distinct_threads: usize,
}

impl ProfileSummary {
    /// Average threads captured per round
    pub fn mean_threads_per_trace(&self) -> f64 {
        if self.trace_count == 0 {
            0.0
        } else {
            self.sample_count as f64 / self.trace_count as f64
        }
    }

    /// Get human-readable summary
    ///
    /// **Public** - for logging and debugging
    pub fn summary(&self) -> String {
        format!(
            "Traces: {} | Samples: {} | Stacks: {} | Threads: {} | Mean threads/trace: {:.1}",
            self.trace_count,
            self.sample_count,
            self.distinct_stacks,
            self.distinct_threads,
            self.mean_threads_per_trace()
        )
    }
}

/// Compute headline numbers for `profile`
pub fn summarize(profile: &Profile) -> ProfileSummary {
    let mut stacks = HashSet::new();
    let mut threads = HashSet::new();

    for sample in profile.samples() {
        stacks.insert(&sample.stack);
        threads.insert(sample.thread_id.as_str());
    }

    ProfileSummary {
        trace_count: profile.traces.len(),
        sample_count: profile.sample_count(),
        distinct_stacks: stacks.len(),
        distinct_threads: threads.len(),
    }
}
