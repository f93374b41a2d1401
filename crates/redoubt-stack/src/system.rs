// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use std::hash::{DefaultHasher, Hash, Hasher};

use crate::error::AllocError;
use crate::traits::{BufferAllocator, ChecksumHasher};

/// Global-allocator backed strategy.
///
/// Uses `Vec::try_reserve_exact`, so an out-of-memory condition is reported
/// as [`AllocError`] instead of aborting the process.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SystemAllocator;

impl BufferAllocator for SystemAllocator {
    fn allocate<T>(&self, capacity: usize) -> Result<Vec<T>, AllocError> {
        let bytes = capacity
            .checked_mul(core::mem::size_of::<T>())
            .ok_or(AllocError::CapacityOverflow)?;

        if bytes > isize::MAX as usize {
            return Err(AllocError::CapacityOverflow);
        }

        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(capacity)
            .map_err(|_| AllocError::Exhausted { capacity })?;

        Ok(buffer)
    }
}

/// Default checksum hasher: the element's [`Hash`] impl fed into SipHash
/// with fixed keys.
///
/// `DefaultHasher::new()` is deterministic within a process, which is all
/// the running checksum needs.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StdChecksumHasher;

impl<T: Hash + ?Sized> ChecksumHasher<T> for StdChecksumHasher {
    type Output = u64;

    #[inline]
    fn checksum(&self, value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }
}
