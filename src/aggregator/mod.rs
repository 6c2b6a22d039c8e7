//! Aggregation of parsed traces into stack counts.
//!
//! This module turns a `Profile` into:
//! - Stable identities for distinct call stacks (drill-down labels)
//! - Context-filtered profiles
//! - Exact per-stack sample counts and per-thread breakdowns
//! - Inclusive counts rolled up over stack suffixes

pub mod cumulative;
pub mod filter;
pub mod histogram;
pub mod identity;
pub mod metrics;

// Re-export main types and functions
pub use cumulative::cumulative_counts;
pub use filter::{filter_by_identity, filter_by_stack};
pub use histogram::{exact_counts, thread_breakdowns, CountEntry, ThreadCount};
pub use identity::{StackIdentity, StackRegistry};
pub use metrics::{summarize, ProfileSummary};
