// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use crate::config::{DEFAULT_CAPACITY, StackConfig, ViolationAction};

#[test]
fn test_default_config() {
    let config = StackConfig::default();

    assert_eq!(config.initial_capacity(), DEFAULT_CAPACITY);
    assert_eq!(config.initial_capacity(), 64);
    assert_eq!(config.violation_action(), ViolationAction::Panic);
}

#[test]
fn test_builder_overrides() {
    let config = StackConfig::default()
        .with_initial_capacity(3)
        .with_violation_action(ViolationAction::Abort);

    assert_eq!(config.initial_capacity(), 3);
    assert_eq!(config.violation_action(), ViolationAction::Abort);
}

#[test]
fn test_builder_last_write_wins() {
    let config = StackConfig::default()
        .with_initial_capacity(3)
        .with_initial_capacity(0);

    assert_eq!(config.initial_capacity(), 0);
}
