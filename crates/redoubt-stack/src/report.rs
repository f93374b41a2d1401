// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Diagnostic report rendered when validation fails.

use core::fmt::{self, Debug, Display};

use crate::canary::Canary;
use crate::error::StackErrors;

/// Full internal state of a stack at the moment of a failed validation.
pub(crate) struct Dump<'a, T, C> {
    pub stack: *const (),
    pub canary_before: Canary,
    pub buffer: *const T,
    pub capacity: usize,
    pub live: &'a [T],
    pub checksum: C,
    pub computed: C,
    pub canary_after: Canary,
}

impl<T: Debug, C: Debug> Display for Dump<'_, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Dump:")?;
        writeln!(f, "stack = {:p}", self.stack)?;
        writeln!(f, "{{")?;
        writeln!(f, "\tcanary_before = {:?}", self.canary_before)?;
        writeln!(f, "\tbuffer[{}] = {:p}", self.capacity, self.buffer)?;
        writeln!(f, "\t{{")?;
        for (i, value) in self.live.iter().enumerate() {
            writeln!(f, "\t\t[{i}] = {value:?}")?;
        }
        match self.capacity.saturating_sub(self.live.len()) {
            0 => {}
            1 => writeln!(f, "\t\t[{}] = <unused>", self.live.len())?,
            _ => writeln!(
                f,
                "\t\t[{}..{}] = <unused>",
                self.live.len(),
                self.capacity
            )?,
        }
        writeln!(f, "\t}}")?;
        writeln!(f, "\tsize = {}", self.live.len())?;
        writeln!(
            f,
            "\tchecksum = {:?} (computed {:?})",
            self.checksum, self.computed
        )?;
        writeln!(f, "\tcanary_after = {:?}", self.canary_after)?;
        writeln!(f, "}}")
    }
}

/// "Errors found" block, optionally followed by a [`Dump`].
pub(crate) struct Report<'a, T, C> {
    pub errors: StackErrors,
    pub dump: Option<Dump<'a, T, C>>,
}

impl<T: Debug, C: Debug> Display for Report<'_, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Errors found:")?;
        for kind in self.errors.kinds() {
            writeln!(f, "\t{kind};")?;
        }

        if let Some(dump) = &self.dump {
            write!(f, "{dump}")?;
        }

        Ok(())
    }
}
