//! Stable integer labels for distinct call stacks.
//!
//! Identities let a user point at "stack 7" from one report and drill into
//! it on the next run. They are assigned in order of first appearance,
//! walking traces in capture order and samples in gdb's order, so the same
//! capture log always produces the same numbering.

use crate::parser::{CallStack, Profile};
use log::debug;
use std::collections::HashMap;

/// Label of one distinct call stack within one analysis run
pub type StackIdentity = usize;

/// Bijection between distinct call stacks and their identities
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackRegistry {
    identities: HashMap<CallStack, StackIdentity>,
    /// Inverse mapping: `stacks[id]` is the stack labelled `id`
    stacks: Vec<CallStack>,
}

impl StackRegistry {
    /// Number every distinct call stack in `profile`, starting at 0
    pub fn from_profile(profile: &Profile) -> Self {
        let mut registry = Self::default();

        for sample in profile.samples() {
            if !registry.identities.contains_key(&sample.stack) {
                let id = registry.stacks.len();
                registry.identities.insert(sample.stack.clone(), id);
                registry.stacks.push(sample.stack.clone());
            }
        }

        debug!("Registered {} distinct call stacks", registry.stacks.len());
        registry
    }

    pub fn identity_of(&self, stack: &CallStack) -> Option<StackIdentity> {
        self.identities.get(stack).copied()
    }

    pub fn stack_for(&self, identity: StackIdentity) -> Option<&CallStack> {
        self.stacks.get(identity)
    }

    /// Stack → identity
    pub fn identities(&self) -> &HashMap<CallStack, StackIdentity> {
        &self.identities
    }

    /// Identity → stack, indexed by identity
    pub fn stacks(&self) -> &[CallStack] {
        &self.stacks
    }

    pub fn len(&self) -> usize {
        self.stacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }
}
