// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Self-verifying stack with boundary canaries and a running content checksum.
//!
//! [`GuardedStack<T>`] detects corruption and misuse at the point of access
//! instead of letting bad data propagate:
//!
//! - **Canaries**: two [`POISON`] words bracket the control block.
//! - **Checksum**: a wrapping sum of per-element hashes, maintained on every
//!   push and pop and recomputed on every validation.
//! - **Misuse flags**: popping or peeking an empty stack is recorded.
//!
//! Errors accumulate and are never cleared. Once any is detected, the next
//! validating call reports all of them at once and escalates.
//!
//! # Features
//!
//! - `safe` (default): validate on every public operation. Without it the
//!   stack runs raw: no validation, no detection. [`GuardedStack::verify`]
//!   still works on demand.
//! - `dump` (default): append a full state dump to every report.
//! - `test-utils`: expose [`test_utils::MockAllocator`] and the tampering
//!   hooks on [`GuardedStack`].
//!
//! # Example
//!
//! ```rust
//! use redoubt_stack::{GuardedStack, StackError};
//!
//! let mut stack = GuardedStack::with_capacity(4);
//! stack.push(String::from("kek"));
//! stack.push(String::from("kek"));
//! assert_eq!(stack.len(), 2);
//!
//! stack.pop();
//! stack.pop();
//!
//! # #[cfg(feature = "safe")]
//! # {
//! // Misuse is reported as an error value by the `try_` API.
//! let err = stack.try_pop().unwrap_err();
//! assert!(err.errors().has(StackError::PopFromEmptyStack));
//! assert!(err.report().contains("Pop from empty stack was performed"));
//! # }
//! ```
//!
//! # Custom checksum
//!
//! Any `Fn(&T) -> O` with an unsigned integer `O` can replace the default
//! hasher; `O` becomes the checksum type.
//!
//! ```rust
//! use redoubt_stack::{GuardedStack, StackConfig, SystemAllocator};
//!
//! let mut stack: GuardedStack<u32, _, _> = GuardedStack::with_parts(
//!     StackConfig::default(),
//!     |v: &u32| *v,
//!     SystemAllocator,
//! );
//! stack.push(40);
//! stack.push(2);
//!
//! assert_eq!(stack.checksum(), 42u32);
//! ```

#![warn(missing_docs)]

#[cfg(test)]
mod tests;

mod canary;
mod config;
mod error;
mod report;
mod stack;
mod support;
mod system;
mod traits;

pub use canary::{Canary, POISON};
pub use config::{DEFAULT_CAPACITY, GROWTH_FACTOR, MIN_CAPACITY, StackConfig, ViolationAction};
pub use error::{AllocError, IntegrityError, StackError, StackErrors};
pub use stack::{GuardedStack, TopGuard};
pub use system::{StdChecksumHasher, SystemAllocator};
pub use traits::{BufferAllocator, Checksum, ChecksumHasher};

#[cfg(any(test, feature = "test-utils"))]
pub use support::test_utils;
