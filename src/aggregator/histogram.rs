//! Exact (self) sample counts per distinct call stack.
//!
//! Trace boundaries are ignored: every sample of every trace counts once
//! toward its own stack.

use crate::parser::{CallStack, Trace};
use log::debug;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// A call stack (or stack suffix) with its sample count
///
/// **Public** - produced by both exact and cumulative aggregation
///
/// Ordering is by count, then by the stack's frames lexicographically,
/// so sorting a set of entries with distinct stacks is total.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CountEntry {
    pub count: u64,
    pub stack: CallStack,
}

impl CountEntry {
    pub fn new(count: u64, stack: CallStack) -> Self {
        Self { count, stack }
    }
}

/// Samples of one thread attributed to one stack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadCount {
    pub thread_id: String,
    pub count: u64,
}

/// Count samples per distinct call stack
///
/// **Public** - main entry point for histogram building
///
/// # Returns
/// One entry per distinct stack, sorted ascending by `(count, stack)`.
/// Empty input gives an empty histogram.
pub fn exact_counts<'a>(traces: impl IntoIterator<Item = &'a Trace>) -> Vec<CountEntry> {
    let mut counts: HashMap<&CallStack, u64> = HashMap::new();

    for trace in traces {
        for sample in &trace.samples {
            *counts.entry(&sample.stack).or_insert(0) += 1;
        }
    }

    let entries = into_sorted_entries(counts.into_iter().map(|(s, c)| (s.clone(), c)));
    debug!("Built histogram of {} distinct stacks", entries.len());
    entries
}

/// Turn accumulated counts into entries in `(count, stack)` order
pub(crate) fn into_sorted_entries(
    counts: impl IntoIterator<Item = (CallStack, u64)>,
) -> Vec<CountEntry> {
    let mut entries: Vec<CountEntry> = counts
        .into_iter()
        .map(|(stack, count)| CountEntry::new(count, stack))
        .collect();
    entries.sort();
    entries
}

/// Per-thread sample counts for every stack
///
/// With `cumulative` set, a sample also counts toward every suffix of its
/// stack (its outer calling contexts, down to the empty stack), matching
/// the inclusive counts of `cumulative_counts`.
///
/// Each breakdown is sorted by thread id, numerically when the ids are
/// numbers (gdb reports LWP ids).
pub fn thread_breakdowns<'a>(
    traces: impl IntoIterator<Item = &'a Trace>,
    cumulative: bool,
) -> HashMap<CallStack, Vec<ThreadCount>> {
    let mut per_stack: HashMap<CallStack, HashMap<&str, u64>> = HashMap::new();

    for trace in traces {
        for sample in &trace.samples {
            let depths = if cumulative { sample.stack.len() } else { 0 };
            for depth in 0..=depths {
                *per_stack
                    .entry(sample.stack.strip_innermost(depth))
                    .or_default()
                    .entry(sample.thread_id.as_str())
                    .or_insert(0) += 1;
            }
        }
    }

    per_stack
        .into_iter()
        .map(|(stack, threads)| {
            let mut threads: Vec<ThreadCount> = threads
                .into_iter()
                .map(|(thread_id, count)| ThreadCount {
                    thread_id: thread_id.to_string(),
                    count,
                })
                .collect();
            threads.sort_by(|a, b| compare_thread_ids(&a.thread_id, &b.thread_id));
            (stack, threads)
        })
        .collect()
}

fn compare_thread_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Sample;

    fn stack(frames: &[&str]) -> CallStack {
        frames.iter().copied().collect()
    }

    #[test]
    fn test_exact_counts_sorted() {
        let traces = vec![
            Trace::new(vec![
                Sample::new("1", stack(&["b", "main"])),
                Sample::new("2", stack(&["a", "main"])),
            ]),
            Trace::new(vec![Sample::new("1", stack(&["b", "main"]))]),
        ];

        let counts = exact_counts(&traces);

        assert_eq!(
            counts,
            vec![
                CountEntry::new(1, stack(&["a", "main"])),
                CountEntry::new(2, stack(&["b", "main"])),
            ]
        );
    }

    #[test]
    fn test_ties_broken_by_frames() {
        let traces = vec![Trace::new(vec![
            Sample::new("1", stack(&["z"])),
            Sample::new("2", stack(&["a", "z"])),
            Sample::new("3", stack(&[])),
        ])];

        let counts = exact_counts(&traces);
        let stacks: Vec<_> = counts.iter().map(|e| e.stack.clone()).collect();

        assert_eq!(stacks, vec![stack(&[]), stack(&["a", "z"]), stack(&["z"])]);
    }

    #[test]
    fn test_exact_counts_empty() {
        let traces: Vec<Trace> = vec![];
        assert!(exact_counts(&traces).is_empty());
    }

    #[test]
    fn test_thread_breakdown_numeric_order() {
        let traces = vec![
            Trace::new(vec![
                Sample::new("100", stack(&["f"])),
                Sample::new("99", stack(&["f"])),
            ]),
            Trace::new(vec![Sample::new("100", stack(&["f"]))]),
        ];

        let breakdowns = thread_breakdowns(&traces, false);
        let threads = &breakdowns[&stack(&["f"])];

        assert_eq!(threads.len(), 2);
        assert_eq!(threads[0].thread_id, "99");
        assert_eq!(threads[0].count, 1);
        assert_eq!(threads[1].thread_id, "100");
        assert_eq!(threads[1].count, 2);
    }

    #[test]
    fn test_thread_breakdown_cumulative() {
        let traces = vec![Trace::new(vec![
            Sample::new("1", stack(&["a", "main"])),
            Sample::new("2", stack(&["b", "main"])),
        ])];

        let breakdowns = thread_breakdowns(&traces, true);

        assert_eq!(breakdowns[&stack(&["main"])].len(), 2);
        assert_eq!(breakdowns[&CallStack::default()].len(), 2);
        assert_eq!(breakdowns[&stack(&["a", "main"])].len(), 1);
    }
}
