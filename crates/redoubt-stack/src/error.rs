// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Error types for redoubt-stack.

use core::fmt;

use bitflags::bitflags;
use thiserror::Error;

/// A single kind of corruption or misuse detected by [`GuardedStack`](crate::GuardedStack).
///
/// The discriminants are the bits used inside [`StackErrors`].
#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
#[repr(u8)]
pub enum StackError {
    /// `pop()` was called on an empty stack.
    #[error("Pop from empty stack was performed")]
    PopFromEmptyStack = 1 << 1,

    /// The allocation strategy failed to provide a buffer.
    #[error("Failed to allocate memory")]
    BadAlloc = 1 << 2,

    /// Recomputed checksum differs from the running one.
    #[error("Check of control sum failed")]
    WrongControlSum = 1 << 3,

    /// Leading canary no longer holds `POISON`.
    #[error("Canary before the stack is corrupted")]
    CanaryBeforeCorrupted = 1 << 4,

    /// Trailing canary no longer holds `POISON`.
    #[error("Canary after the stack is corrupted")]
    CanaryAfterCorrupted = 1 << 5,

    /// `top()` was called on an empty stack.
    #[error("Top from empty stack was performed")]
    TopFromEmptyStack = 1 << 6,
}

impl StackError {
    /// Every kind, in report order.
    pub const ALL: [StackError; 6] = [
        StackError::PopFromEmptyStack,
        StackError::BadAlloc,
        StackError::WrongControlSum,
        StackError::CanaryBeforeCorrupted,
        StackError::CanaryAfterCorrupted,
        StackError::TopFromEmptyStack,
    ];
}

bitflags! {
    /// Set of error kinds accumulated by a stack.
    ///
    /// Kinds are independent and may co-occur. A stack never removes a flag
    /// once it has been raised.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct StackErrors: u8 {
        /// See [`StackError::PopFromEmptyStack`].
        const POP_FROM_EMPTY_STACK    = StackError::PopFromEmptyStack as u8;
        /// See [`StackError::BadAlloc`].
        const BAD_ALLOC               = StackError::BadAlloc as u8;
        /// See [`StackError::WrongControlSum`].
        const WRONG_CONTROL_SUM       = StackError::WrongControlSum as u8;
        /// See [`StackError::CanaryBeforeCorrupted`].
        const CANARY_BEFORE_CORRUPTED = StackError::CanaryBeforeCorrupted as u8;
        /// See [`StackError::CanaryAfterCorrupted`].
        const CANARY_AFTER_CORRUPTED  = StackError::CanaryAfterCorrupted as u8;
        /// See [`StackError::TopFromEmptyStack`].
        const TOP_FROM_EMPTY_STACK    = StackError::TopFromEmptyStack as u8;
    }
}

impl From<StackError> for StackErrors {
    fn from(kind: StackError) -> Self {
        Self::from_bits_retain(kind as u8)
    }
}

impl StackErrors {
    /// Returns `true` if `kind` is part of the set.
    #[inline]
    pub fn has(&self, kind: StackError) -> bool {
        self.contains(Self::from(kind))
    }

    /// Iterates over the kinds in the set, in report order.
    pub fn kinds(&self) -> impl Iterator<Item = StackError> + '_ {
        StackError::ALL.into_iter().filter(move |kind| self.has(*kind))
    }
}

impl fmt::Display for StackErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, kind) in self.kinds().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{kind}")?;
        }
        Ok(())
    }
}

/// Validation failure: every error kind active at the time of the check,
/// plus the rendered diagnostic report.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("stack integrity violated: {errors}")]
pub struct IntegrityError {
    errors: StackErrors,
    report: String,
}

impl IntegrityError {
    pub(crate) fn new(errors: StackErrors, report: String) -> Self {
        Self { errors, report }
    }

    /// The error kinds that were active.
    pub fn errors(&self) -> StackErrors {
        self.errors
    }

    /// Multi-line human-readable report, including the state dump when the
    /// `dump` feature is enabled.
    pub fn report(&self) -> &str {
        &self.report
    }
}

/// Errors returned by a [`BufferAllocator`](crate::BufferAllocator).
#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
pub enum AllocError {
    /// The requested capacity does not fit in `usize` or exceeds `isize::MAX` bytes.
    #[error("requested capacity overflows")]
    CapacityOverflow,

    /// The allocator could not provide the requested capacity.
    #[error("failed to allocate a buffer of {capacity} elements")]
    Exhausted {
        /// Requested element count.
        capacity: usize,
    },

    /// The allocator returned a buffer that is non-empty or smaller than
    /// requested.
    #[error("allocator returned a buffer of len {len} and capacity {capacity}, expected an empty buffer of at least {requested}")]
    InvalidBuffer {
        /// Requested element count.
        requested: usize,
        /// Length of the returned buffer.
        len: usize,
        /// Capacity of the returned buffer.
        capacity: usize,
    },
}
