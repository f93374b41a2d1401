// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use core::fmt::Debug;

use crate::error::AllocError;

/// Accumulator type for the running content checksum.
///
/// The checksum is a wrapping sum, so it does not depend on element order and
/// can be maintained incrementally: `combine` on push, `remove` on pop.
pub trait Checksum: Copy + Eq + Debug + Default {
    /// Adds a per-element contribution.
    fn combine(self, other: Self) -> Self;

    /// Removes a per-element contribution previously added with [`Checksum::combine`].
    fn remove(self, other: Self) -> Self;
}

macro_rules! impl_checksum {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Checksum for $ty {
                #[inline(always)]
                fn combine(self, other: Self) -> Self {
                    self.wrapping_add(other)
                }

                #[inline(always)]
                fn remove(self, other: Self) -> Self {
                    self.wrapping_sub(other)
                }
            }
        )*
    };
}

impl_checksum!(u8, u16, u32, u64, u128, usize);

/// Deterministic per-element hash feeding the checksum.
///
/// Must return the same value for the same element for as long as the
/// element lives in the stack, otherwise validation reports a checksum
/// mismatch.
///
/// Any `Fn(&T) -> O` with `O: Checksum` is a `ChecksumHasher<T>`.
pub trait ChecksumHasher<T: ?Sized> {
    /// Accumulator type, also the type of a single element's hash.
    type Output: Checksum;

    /// Hashes one element.
    fn checksum(&self, value: &T) -> Self::Output;
}

impl<T, O, F> ChecksumHasher<T> for F
where
    T: ?Sized,
    O: Checksum,
    F: Fn(&T) -> O,
{
    type Output = O;

    #[inline]
    fn checksum(&self, value: &T) -> O {
        self(value)
    }
}

/// Allocation strategy for the stack's element buffer.
///
/// Implementations must return an empty `Vec` whose capacity is at least
/// `capacity`, or an error. They must never abort the process on failure.
/// A buffer that breaks this contract is rejected by the stack and recorded
/// as a failed allocation.
pub trait BufferAllocator {
    /// Allocates an empty buffer able to hold `capacity` elements.
    ///
    /// # Errors
    ///
    /// Returns [`AllocError`] if the buffer cannot be provided.
    fn allocate<T>(&self, capacity: usize) -> Result<Vec<T>, AllocError>;
}
