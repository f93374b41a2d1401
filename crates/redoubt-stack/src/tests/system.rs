// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use crate::error::AllocError;
use crate::system::{StdChecksumHasher, SystemAllocator};
use crate::traits::{BufferAllocator, Checksum, ChecksumHasher};

// =============================================================================
// SystemAllocator
// =============================================================================

#[test]
fn test_allocate_returns_empty_buffer_with_capacity() {
    let buffer: Vec<u64> = SystemAllocator.allocate(16).expect("Failed to allocate(..)");

    assert!(buffer.is_empty());
    assert!(buffer.capacity() >= 16);
}

#[test]
fn test_allocate_zero() {
    let buffer: Vec<u64> = SystemAllocator.allocate(0).expect("Failed to allocate(..)");

    assert!(buffer.is_empty());
}

#[test]
fn test_allocate_overflowing_byte_count() {
    let result: Result<Vec<u64>, _> = SystemAllocator.allocate(usize::MAX);

    assert_eq!(result, Err(AllocError::CapacityOverflow));
}

#[test]
fn test_allocate_above_isize_max_bytes() {
    let result: Result<Vec<u8>, _> = SystemAllocator.allocate(isize::MAX as usize + 1);

    assert_eq!(result, Err(AllocError::CapacityOverflow));
}

// =============================================================================
// StdChecksumHasher
// =============================================================================

#[test]
fn test_std_hasher_is_deterministic() {
    let a = StdChecksumHasher.checksum("kek");
    let b = StdChecksumHasher.checksum("kek");

    assert_eq!(a, b);
}

#[test]
fn test_std_hasher_distinguishes_values() {
    assert_ne!(
        StdChecksumHasher.checksum(&1u32),
        StdChecksumHasher.checksum(&2u32)
    );
}

#[test]
fn test_std_hasher_matches_borrowed_forms() {
    let owned = String::from("abc");

    assert_eq!(
        StdChecksumHasher.checksum(&owned),
        StdChecksumHasher.checksum("abc")
    );
}

// =============================================================================
// Fn hashers
// =============================================================================

#[test]
fn test_closure_is_a_hasher() {
    let hasher = |v: &u16| u32::from(*v) * 2;

    assert_eq!(ChecksumHasher::<u16>::checksum(&hasher, &21), 42u32);
}

#[test]
fn test_fn_item_is_a_hasher() {
    fn len_hash(s: &String) -> usize {
        s.len()
    }

    assert_eq!(len_hash.checksum(&String::from("four")), 4);
}

// =============================================================================
// Checksum
// =============================================================================

#[test]
fn test_checksum_wraps() {
    assert_eq!(u8::MAX.combine(2), 1);
    assert_eq!(0u8.remove(1), u8::MAX);
}

#[test]
fn test_checksum_combine_then_remove_is_identity() {
    let sum = 0xFFFF_FFFF_FFFF_FFF0u64;

    assert_eq!(sum.combine(0x20).remove(0x20), sum);
}
