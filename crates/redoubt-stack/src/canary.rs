// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use core::fmt;

/// Value every intact canary holds.
pub const POISON: usize = 0xDEAD_BEEF;

/// Tripwire word placed at one end of the stack's control block.
///
/// A canary is a heuristic: it catches a stray write that lands on it, not
/// every write into the struct. In safe Rust such writes need `unsafe` code
/// elsewhere in the process.
#[derive(Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct Canary(usize);

impl Canary {
    pub(crate) const fn new() -> Self {
        Self(POISON)
    }

    /// Returns `true` while the canary still holds [`POISON`].
    #[inline(always)]
    pub fn is_intact(&self) -> bool {
        self.0 == POISON
    }

    /// Raw value currently stored.
    #[inline(always)]
    pub fn value(&self) -> usize {
        self.0
    }

    #[cfg(any(test, feature = "test-utils"))]
    pub(crate) fn overwrite(&mut self, value: usize) {
        self.0 = value;
    }
}

impl Default for Canary {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Canary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}
