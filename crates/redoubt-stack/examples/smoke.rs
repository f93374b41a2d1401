// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use redoubt_stack::GuardedStack;

fn main() {
    let mut stack = GuardedStack::with_capacity(4);
    stack.push(String::from("kek"));
    stack.push(String::from("kek"));
}
