//! Inclusive counts over call-stack suffixes.
//!
//! Stripping innermost frames from a stack walks outward through its
//! calling contexts. The inclusive count of a suffix is the sum of the
//! exact counts of every stack that ends in it: the time spent anywhere
//! under that calling context. This is the same collapse a flame graph
//! performs, read from the leaf end.

use super::histogram::{into_sorted_entries, CountEntry};
use crate::parser::CallStack;
use crate::utils::error::AggregateError;
use log::debug;
use std::collections::HashMap;

/// Roll exact counts up into inclusive counts for every stack suffix
///
/// **Public** - main entry point for cumulative mode
///
/// # Arguments
/// * `exact` - Output of `exact_counts`
///
/// # Returns
/// One entry per distinct suffix (including the empty stack whenever
/// `exact` is non-empty), sorted ascending by `(count, stack)`
///
/// # Errors
/// * `AggregateError::RollupOrderViolation` - internal ordering check failed
pub fn cumulative_counts(exact: &[CountEntry]) -> Result<Vec<CountEntry>, AggregateError> {
    let mut longest_first: Vec<&CountEntry> = exact.iter().collect();
    longest_first.sort_by(|a, b| b.stack.len().cmp(&a.stack.len()));

    rollup(longest_first)
}

/// Accumulate entries that arrive longest stack first
///
/// The sum does not depend on the order, but the caller promises
/// non-increasing lengths and a broken promise means aggregation is
/// wrong somewhere upstream, so it stops here.
fn rollup<'a>(
    entries: impl IntoIterator<Item = &'a CountEntry>,
) -> Result<Vec<CountEntry>, AggregateError> {
    let mut totals: HashMap<CallStack, u64> = HashMap::new();
    let mut previous: Option<usize> = None;

    for entry in entries {
        let current = entry.stack.len();
        if let Some(previous) = previous {
            if current > previous {
                return Err(AggregateError::RollupOrderViolation { previous, current });
            }
        }
        previous = Some(current);

        for depth in 0..=current {
            *totals
                .entry(entry.stack.strip_innermost(depth))
                .or_insert(0) += entry.count;
        }
    }

    let entries = into_sorted_entries(totals);
    debug!("Rolled up {} stack suffixes", entries.len());
    Ok(entries)
}
