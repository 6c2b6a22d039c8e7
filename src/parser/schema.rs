//! Data model for captured backtraces.
//!
//! A `Profile` is a sequence of `Trace`s (one per sampling round), each
//! holding one `Sample` per thread. Call stacks are value types: they
//! compare, hash and order by their frames alone.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One stack frame, as emitted by gdb (usually a function name)
pub type Frame = String;

/// Ordered frames of one thread, innermost first
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallStack(Vec<Frame>);

impl CallStack {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self(frames)
    }

    /// Frames, innermost first
    pub fn frames(&self) -> &[Frame] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The stack with its `n` innermost frames removed
    pub fn strip_innermost(&self, n: usize) -> CallStack {
        CallStack(self.0.iter().skip(n).cloned().collect())
    }
}

impl<S: Into<Frame>> FromIterator<S> for CallStack {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for CallStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "<empty>");
        }
        write!(f, "{}", self.0.join(" <- "))
    }
}

/// One thread's call stack at one sampling instant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    /// LWP id as reported by gdb
    pub thread_id: String,

    pub stack: CallStack,
}

impl Sample {
    pub fn new(thread_id: impl Into<String>, stack: CallStack) -> Self {
        Self {
            thread_id: thread_id.into(),
            stack,
        }
    }
}

/// All samples captured by a single gdb invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trace {
    pub samples: Vec<Sample>,
}

impl Trace {
    pub fn new(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Whether any thread in this round had exactly `stack`
    pub fn contains_stack(&self, stack: &CallStack) -> bool {
        self.samples.iter().any(|s| &s.stack == stack)
    }
}

/// Every trace of one monitored run, in capture order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub traces: Vec<Trace>,
}

impl Profile {
    pub fn new(traces: Vec<Trace>) -> Self {
        Self { traces }
    }

    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }

    /// All samples, flattened across trace boundaries
    pub fn samples(&self) -> impl Iterator<Item = &Sample> {
        self.traces.iter().flat_map(|t| t.samples.iter())
    }

    pub fn sample_count(&self) -> usize {
        self.traces.iter().map(|t| t.samples.len()).sum()
    }
}
