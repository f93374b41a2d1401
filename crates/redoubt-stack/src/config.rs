// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

/// Initial capacity used when none is given.
pub const DEFAULT_CAPACITY: usize = 64;

/// Capacity multiplier applied when the buffer is full.
pub const GROWTH_FACTOR: usize = 2;

/// Capacity a zero-capacity stack grows to.
pub const MIN_CAPACITY: usize = 1;

/// What the non-`try_` operations do once a violation has been reported.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ViolationAction {
    /// Panic with the list of active errors. Terminates the process under
    /// `panic = "abort"`, otherwise unwinds.
    #[default]
    Panic,
    /// Call `std::process::abort()`.
    Abort,
}

/// Construction parameters for [`GuardedStack`](crate::GuardedStack).
///
/// # Example
///
/// ```rust
/// use redoubt_stack::{StackConfig, ViolationAction};
///
/// let config = StackConfig::default()
///     .with_initial_capacity(8)
///     .with_violation_action(ViolationAction::Abort);
///
/// assert_eq!(config.initial_capacity(), 8);
/// assert_eq!(config.violation_action(), ViolationAction::Abort);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackConfig {
    initial_capacity: usize,
    on_violation: ViolationAction,
}

impl StackConfig {
    /// Sets the capacity allocated at construction.
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Sets the escalation used after a violation report.
    pub fn with_violation_action(mut self, action: ViolationAction) -> Self {
        self.on_violation = action;
        self
    }

    /// Capacity allocated at construction.
    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    /// Escalation used after a violation report.
    pub fn violation_action(&self) -> ViolationAction {
        self.on_violation
    }
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_CAPACITY,
            on_violation: ViolationAction::default(),
        }
    }
}
