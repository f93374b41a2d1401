// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use core::cell::Cell;

use crate::error::AllocError;
use crate::system::SystemAllocator;
use crate::traits::BufferAllocator;

/// Configurable behavior for [`MockAllocator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockAllocatorBehaviour {
    /// Normal operation (delegates to [`SystemAllocator`]).
    None,
    /// Always fail allocate.
    FailAlways,
    /// Fail allocate on the Nth call (1-indexed: 1 = the allocation made at
    /// construction, 2 = the first growth, ...).
    FailAtNthAllocate(usize),
    /// Return `Vec::new()` instead of a buffer of the requested capacity on
    /// the Nth call (1-indexed). Only undersized for non-zero-sized `T`.
    UndersizedAtNthAllocate(usize),
}

/// Mock allocator for testing.
///
/// Wraps [`SystemAllocator`] but allows simulating failures via [`MockAllocatorBehaviour`].
#[derive(Debug)]
pub struct MockAllocator {
    inner: SystemAllocator,
    behaviour: MockAllocatorBehaviour,
    allocate_count: Cell<usize>,
}

impl MockAllocator {
    /// Creates a new mock allocator with the specified behavior.
    pub fn new(behaviour: MockAllocatorBehaviour) -> Self {
        Self {
            inner: SystemAllocator,
            behaviour,
            allocate_count: Cell::new(0),
        }
    }

    /// Returns the number of `allocate` calls so far.
    pub fn call_count(&self) -> usize {
        self.allocate_count.get()
    }
}

impl BufferAllocator for MockAllocator {
    fn allocate<T>(&self, capacity: usize) -> Result<Vec<T>, AllocError> {
        let current = self.allocate_count.get();
        self.allocate_count.set(current + 1);

        match self.behaviour {
            MockAllocatorBehaviour::None => self.inner.allocate(capacity),
            MockAllocatorBehaviour::FailAlways => Err(AllocError::Exhausted { capacity }),
            MockAllocatorBehaviour::FailAtNthAllocate(n) if current + 1 == n => {
                Err(AllocError::Exhausted { capacity })
            }
            MockAllocatorBehaviour::UndersizedAtNthAllocate(n) if current + 1 == n => Ok(Vec::new()),
            MockAllocatorBehaviour::FailAtNthAllocate(_)
            | MockAllocatorBehaviour::UndersizedAtNthAllocate(_) => self.inner.allocate(capacity),
        }
    }
}
