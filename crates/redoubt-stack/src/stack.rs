// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use core::cell::Cell;
use core::fmt::{self, Debug};
use core::hash::Hash;
use core::ops::{Deref, DerefMut};
use std::io::Write;

use tracing::{error, trace, warn};

use crate::canary::Canary;
use crate::config::{GROWTH_FACTOR, MIN_CAPACITY, StackConfig, ViolationAction};
use crate::error::{AllocError, IntegrityError, StackError, StackErrors};
use crate::report::{Dump, Report};
use crate::system::{StdChecksumHasher, SystemAllocator};
use crate::traits::{BufferAllocator, Checksum, ChecksumHasher};

const SAFE_MODE: bool = cfg!(feature = "safe");

/// Stack that validates its own integrity on every operation.
///
/// Two independent signals are kept alongside the elements:
///
/// - **Canaries**: the first and last fields of the struct hold
///   [`POISON`](crate::POISON). Any other value means something overwrote the
///   control block.
/// - **Checksum**: a wrapping sum of `hasher(element)` over the live
///   elements, updated on push and pop and recomputed on validation.
///
/// With the `safe` feature (default) every public operation validates both
/// signals. Detected errors accumulate in a set that is never cleared. The
/// plain operations (`push`, `pop`, `top`, `empty`) write a report to stderr
/// and escalate per [`ViolationAction`]; the `try_` variants return the
/// [`IntegrityError`] instead.
///
/// Elements must implement [`Debug`] for every operation, not only when the
/// `dump` feature renders them: the dump is built on the same failure path
/// regardless of features.
///
/// ```compile_fail
/// use redoubt_stack::GuardedStack;
///
/// #[derive(Hash)]
/// struct Opaque(u8);
///
/// let mut stack = GuardedStack::new();
/// stack.push(Opaque(1));
/// ```
///
/// The stack is not `Clone`: the buffer always has exactly one owner.
///
/// ```compile_fail
/// use redoubt_stack::GuardedStack;
///
/// let stack: GuardedStack<u32> = GuardedStack::new();
/// let copy = stack.clone();
/// ```
///
/// # Example
///
/// ```rust
/// use redoubt_stack::GuardedStack;
///
/// let mut stack = GuardedStack::with_capacity(2);
/// stack.push("a");
/// stack.push("b");
/// stack.push("c");
///
/// assert_eq!(stack.capacity(), 4);
/// assert_eq!(*stack.top(), "c");
///
/// stack.pop();
/// assert_eq!(*stack.top(), "b");
/// assert!(!stack.empty());
/// ```
#[repr(C)]
pub struct GuardedStack<T, H = StdChecksumHasher, A = SystemAllocator>
where
    H: ChecksumHasher<T>,
{
    canary_before: Canary,
    hasher: H,
    checksum: H::Output,
    capacity: usize,
    buffer: Vec<T>,
    allocator: A,
    config: StackConfig,
    errors: Cell<StackErrors>,
    canary_after: Canary,
}

impl<T> GuardedStack<T>
where
    T: Hash + Debug,
{
    /// Creates a stack with [`DEFAULT_CAPACITY`](crate::DEFAULT_CAPACITY).
    pub fn new() -> Self {
        Self::with_config(StackConfig::default())
    }

    /// Creates a stack with the given initial capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_config(StackConfig::default().with_initial_capacity(capacity))
    }

    /// Creates a stack from `config` with the default hasher and allocator.
    pub fn with_config(config: StackConfig) -> Self {
        Self::with_parts(config, StdChecksumHasher, SystemAllocator)
    }

    /// Fallible [`GuardedStack::new`].
    ///
    /// # Errors
    ///
    /// Returns [`IntegrityError`] with [`StackError::BadAlloc`] if the
    /// initial buffer could not be allocated (safe builds only).
    pub fn try_new() -> Result<Self, IntegrityError> {
        Self::try_with_parts(StackConfig::default(), StdChecksumHasher, SystemAllocator)
    }
}

impl<T> Default for GuardedStack<T>
where
    T: Hash + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, H, A> GuardedStack<T, H, A>
where
    H: ChecksumHasher<T>,
{
    /// Number of live elements. Does not validate.
    #[inline]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns `true` if there are no live elements. Does not validate;
    /// see [`GuardedStack::empty`] for the validating form.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Number of elements the current buffer holds before growing.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Running checksum over the live elements.
    #[inline]
    pub fn checksum(&self) -> H::Output {
        self.checksum
    }

    /// Configuration the stack was built with.
    pub fn config(&self) -> &StackConfig {
        &self.config
    }

    /// Checksum hasher in use.
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Allocation strategy in use.
    pub fn allocator(&self) -> &A {
        &self.allocator
    }

    fn raise(&self, kind: StackError) {
        self.errors.set(self.errors.get() | StackErrors::from(kind));
    }

    fn recompute_checksum(&self) -> H::Output {
        self.buffer
            .iter()
            .fold(H::Output::default(), |sum, value| {
                sum.combine(self.hasher.checksum(value))
            })
    }
}

impl<T, H, A> GuardedStack<T, H, A>
where
    T: Debug,
    H: ChecksumHasher<T>,
    A: BufferAllocator,
{
    /// Creates a stack from explicit parts.
    ///
    /// Validates the fresh stack; a failed initial allocation is reported
    /// and escalated in safe builds.
    pub fn with_parts(config: StackConfig, hasher: H, allocator: A) -> Self {
        let stack = Self::assemble(config, hasher, allocator);
        stack.checkpoint();
        stack
    }

    /// Fallible [`GuardedStack::with_parts`].
    ///
    /// # Errors
    ///
    /// Returns [`IntegrityError`] with [`StackError::BadAlloc`] if the
    /// initial buffer could not be allocated (safe builds only).
    pub fn try_with_parts(config: StackConfig, hasher: H, allocator: A) -> Result<Self, IntegrityError> {
        let stack = Self::assemble(config, hasher, allocator);
        stack.validate()?;
        Ok(stack)
    }

    fn assemble(config: StackConfig, hasher: H, allocator: A) -> Self {
        let requested = config.initial_capacity();
        let errors = Cell::new(StackErrors::empty());

        let (buffer, capacity) = match Self::allocate_buffer(&allocator, requested) {
            Ok(buffer) => (buffer, requested),
            Err(e) => {
                warn!(capacity = requested, error = %e, "initial stack allocation failed");
                errors.set(StackErrors::BAD_ALLOC);
                (Vec::new(), 0)
            }
        };

        Self {
            canary_before: Canary::new(),
            hasher,
            checksum: H::Output::default(),
            capacity,
            buffer,
            allocator,
            config,
            errors,
            canary_after: Canary::new(),
        }
    }

    /// Pushes `value`, growing the buffer if it is full.
    ///
    /// If growth fails the value is dropped and [`StackError::BadAlloc`] is
    /// recorded. In safe builds the validation inside this call reports it;
    /// in raw builds the failure stays silent.
    pub fn push(&mut self, value: T) {
        if let Err(e) = self.try_push(value) {
            self.escalate(e);
        }
    }

    /// Pushes a clone of `value`.
    pub fn push_cloned(&mut self, value: &T)
    where
        T: Clone,
    {
        self.push(value.clone());
    }

    /// Removes the top element.
    ///
    /// Popping an empty stack records [`StackError::PopFromEmptyStack`].
    pub fn pop(&mut self) {
        if let Err(e) = self.try_pop() {
            self.escalate(e);
        }
    }

    /// Returns the top element.
    ///
    /// On an empty stack this records [`StackError::TopFromEmptyStack`] and
    /// never returns.
    pub fn top(&self) -> &T {
        match self.try_top() {
            Ok(top) => top,
            Err(e) => self.escalate(e),
        }
    }

    /// Returns write access to the top element.
    ///
    /// Runs the same checks as [`GuardedStack::top`]. The checksum follows
    /// whatever is written through the guard.
    pub fn top_mut(&mut self) -> TopGuard<'_, T, H, A> {
        self.top();
        TopGuard::new(self)
    }

    /// Validates, then returns `true` if the stack has no elements.
    ///
    /// Unlike [`GuardedStack::is_empty`], this escalates on a corrupted stack.
    pub fn empty(&self) -> bool {
        match self.try_empty() {
            Ok(empty) => empty,
            Err(e) => self.escalate(e),
        }
    }

    /// Fallible [`GuardedStack::push`].
    ///
    /// # Errors
    ///
    /// Returns [`IntegrityError`] if validation fails, including when growth
    /// failed. The value is dropped in that case.
    pub fn try_push(&mut self, value: T) -> Result<(), IntegrityError> {
        if self.buffer.len() == self.capacity {
            self.grow();
        }

        self.validate()?;

        // Growth failed in a raw build.
        if self.buffer.len() == self.capacity {
            return Ok(());
        }

        let hash = self.hasher.checksum(&value);
        self.buffer.push(value);
        self.checksum = self.checksum.combine(hash);

        Ok(())
    }

    /// Fallible [`GuardedStack::push_cloned`].
    ///
    /// # Errors
    ///
    /// See [`GuardedStack::try_push`].
    pub fn try_push_cloned(&mut self, value: &T) -> Result<(), IntegrityError>
    where
        T: Clone,
    {
        self.try_push(value.clone())
    }

    /// Fallible [`GuardedStack::pop`].
    ///
    /// # Errors
    ///
    /// Returns [`IntegrityError`] if validation after the pop fails, which
    /// always happens when popping an empty stack in safe builds.
    pub fn try_pop(&mut self) -> Result<(), IntegrityError> {
        match self.buffer.pop() {
            Some(value) => {
                let hash = self.hasher.checksum(&value);
                self.checksum = self.checksum.remove(hash);
            }
            None => self.raise(StackError::PopFromEmptyStack),
        }

        self.validate()
    }

    /// Fallible [`GuardedStack::top`].
    ///
    /// # Errors
    ///
    /// Returns [`IntegrityError`] if validation fails or the stack is empty.
    pub fn try_top(&self) -> Result<&T, IntegrityError> {
        if self.buffer.is_empty() {
            self.raise(StackError::TopFromEmptyStack);
        }

        self.validate()?;

        match self.buffer.last() {
            Some(top) => Ok(top),
            None => Err(self.integrity_error(self.errors.get(), self.recompute_checksum())),
        }
    }

    /// Fallible [`GuardedStack::top_mut`].
    ///
    /// # Errors
    ///
    /// See [`GuardedStack::try_top`].
    pub fn try_top_mut(&mut self) -> Result<TopGuard<'_, T, H, A>, IntegrityError> {
        self.try_top()?;
        Ok(TopGuard::new(self))
    }

    /// Fallible [`GuardedStack::empty`].
    ///
    /// # Errors
    ///
    /// Returns [`IntegrityError`] if validation fails.
    pub fn try_empty(&self) -> Result<bool, IntegrityError> {
        self.validate()?;
        Ok(self.buffer.is_empty())
    }

    /// Runs the full validation regardless of the `safe` feature.
    ///
    /// Recomputes the checksum, checks both canaries, and returns every error
    /// recorded so far. Mismatches found here are recorded too.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrityError`] if any error flag is set.
    pub fn verify(&self) -> Result<(), IntegrityError> {
        let computed = self.recompute_checksum();

        if computed != self.checksum {
            self.raise(StackError::WrongControlSum);
        }

        if !self.canary_before.is_intact() {
            self.raise(StackError::CanaryBeforeCorrupted);
        }

        if !self.canary_after.is_intact() {
            self.raise(StackError::CanaryAfterCorrupted);
        }

        let errors = self.errors.get();
        if errors.is_empty() {
            return Ok(());
        }

        Err(self.integrity_error(errors, computed))
    }

    #[inline(always)]
    fn validate(&self) -> Result<(), IntegrityError> {
        if SAFE_MODE { self.verify() } else { Ok(()) }
    }

    #[inline(always)]
    fn checkpoint(&self) {
        if let Err(e) = self.validate() {
            self.escalate(e);
        }
    }

    #[cold]
    #[inline(never)]
    fn grow(&mut self) {
        debug_assert_eq!(self.buffer.len(), self.capacity);

        let grown = self
            .capacity
            .checked_mul(GROWTH_FACTOR)
            .map(|capacity| capacity.max(MIN_CAPACITY))
            .ok_or(AllocError::CapacityOverflow)
            .and_then(|capacity| {
                Self::allocate_buffer(&self.allocator, capacity).map(|buffer| (buffer, capacity))
            });

        let (mut buffer, capacity) = match grown {
            Ok(grown) => grown,
            Err(e) => {
                warn!(capacity = self.capacity, error = %e, "stack growth failed");
                self.raise(StackError::BadAlloc);
                return;
            }
        };

        buffer.extend(self.buffer.drain(..));
        self.buffer = buffer;

        trace!(from = self.capacity, to = capacity, "stack buffer grown");
        self.capacity = capacity;
    }

    // Buffer must be empty with room for `capacity`; pushes never reallocate.
    fn allocate_buffer(allocator: &A, capacity: usize) -> Result<Vec<T>, AllocError> {
        let buffer = allocator.allocate::<T>(capacity)?;

        if !buffer.is_empty() || buffer.capacity() < capacity {
            return Err(AllocError::InvalidBuffer {
                requested: capacity,
                len: buffer.len(),
                capacity: buffer.capacity(),
            });
        }

        Ok(buffer)
    }

    #[cold]
    fn integrity_error(&self, errors: StackErrors, computed: H::Output) -> IntegrityError {
        let dump = if cfg!(feature = "dump") {
            Some(Dump {
                stack: (self as *const Self).cast::<()>(),
                canary_before: self.canary_before,
                buffer: self.buffer.as_ptr(),
                capacity: self.capacity,
                live: &self.buffer,
                checksum: self.checksum,
                computed,
                canary_after: self.canary_after,
            })
        } else {
            None
        };

        IntegrityError::new(errors, Report { errors, dump }.to_string())
    }

    #[cold]
    #[inline(never)]
    fn escalate(&self, err: IntegrityError) -> ! {
        error!(errors = %err.errors(), "stack integrity violated");

        // Best effort: escalation proceeds even if stderr is gone.
        let _ = std::io::stderr().lock().write_all(err.report().as_bytes());

        match self.config.violation_action() {
            ViolationAction::Panic => panic!("{err}"),
            ViolationAction::Abort => std::process::abort(),
        }
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl<T, H, A> GuardedStack<T, H, A>
where
    H: ChecksumHasher<T>,
{
    /// Error flags recorded so far, without validating.
    pub fn error_flags(&self) -> StackErrors {
        self.errors.get()
    }

    /// Overwrites the leading canary.
    pub fn corrupt_canary_before(&mut self, value: usize) {
        self.canary_before.overwrite(value);
    }

    /// Overwrites the trailing canary.
    pub fn corrupt_canary_after(&mut self, value: usize) {
        self.canary_after.overwrite(value);
    }

    /// Overwrites the running checksum.
    pub fn corrupt_checksum(&mut self, value: H::Output) {
        self.checksum = value;
    }

    /// Mutates a live element behind the checksum's back.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn tamper_with<F: FnOnce(&mut T)>(&mut self, index: usize, f: F) {
        f(&mut self.buffer[index]);
    }
}

impl<T, H, A> Debug for GuardedStack<T, H, A>
where
    H: ChecksumHasher<T>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuardedStack")
            .field("canary_before", &self.canary_before)
            .field("len", &self.buffer.len())
            .field("capacity", &self.capacity)
            .field("checksum", &self.checksum)
            .field("errors", &self.errors.get())
            .field("canary_after", &self.canary_after)
            .finish()
    }
}

/// Write access to the top element of a [`GuardedStack`].
///
/// The element's hash is captured when the guard is created. On drop the
/// captured hash is swapped for the hash of the (possibly modified) value, so
/// the running checksum is untouched until then and forgetting the guard
/// leaves a consistent stack as long as nothing was written.
pub struct TopGuard<'a, T, H, A>
where
    H: ChecksumHasher<T>,
{
    stack: &'a mut GuardedStack<T, H, A>,
    old_hash: H::Output,
}

impl<'a, T, H, A> TopGuard<'a, T, H, A>
where
    H: ChecksumHasher<T>,
{
    // Caller guarantees the stack is non-empty.
    fn new(stack: &'a mut GuardedStack<T, H, A>) -> Self {
        let index = stack.buffer.len() - 1;
        let old_hash = stack.hasher.checksum(&stack.buffer[index]);

        Self { stack, old_hash }
    }

    fn index(&self) -> usize {
        self.stack.buffer.len() - 1
    }
}

impl<T, H, A> Deref for TopGuard<'_, T, H, A>
where
    H: ChecksumHasher<T>,
{
    type Target = T;

    fn deref(&self) -> &T {
        &self.stack.buffer[self.index()]
    }
}

impl<T, H, A> DerefMut for TopGuard<'_, T, H, A>
where
    H: ChecksumHasher<T>,
{
    fn deref_mut(&mut self) -> &mut T {
        let index = self.index();
        &mut self.stack.buffer[index]
    }
}

impl<T, H, A> Drop for TopGuard<'_, T, H, A>
where
    H: ChecksumHasher<T>,
{
    fn drop(&mut self) {
        let index = self.index();
        let new_hash = self.stack.hasher.checksum(&self.stack.buffer[index]);
        self.stack.checksum = self.stack.checksum.remove(self.old_hash).combine(new_hash);
    }
}
