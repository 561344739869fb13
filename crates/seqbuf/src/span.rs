// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt::{self, Debug, Formatter};
use std::ops::{Deref, DerefMut, Index, IndexMut};
use std::slice;

/// A mutable view over contiguous memory.
///
/// The view is bounded by the memory it was created from: it can be narrowed but never
/// widened, and the borrow ensures it does not outlive that memory. A `Span` converts into a
/// [`ReadOnlySpan`] for free.
///
/// ```
/// use seqbuf::Span;
///
/// let mut storage = [0_u8; 8];
/// let mut span = Span::with_range(&mut storage, 2, 4);
/// span[0] = 42;
///
/// assert_eq!(span.len(), 4);
/// assert_eq!(storage[2], 42);
/// ```
pub struct Span<'a, T> {
    items: &'a mut [T],
}

/// A read-only view over contiguous memory.
///
/// This is the read-only counterpart of [`Span`]. It is `Copy` and can be created from a
/// slice, a `str` or a [`Span`].
pub struct ReadOnlySpan<'a, T> {
    items: &'a [T],
}

#[track_caller]
fn checked_range(len: usize, start: usize, count: usize) -> std::ops::Range<usize> {
    let end = start.checked_add(count).filter(|&end| end <= len);
    assert!(end.is_some(), "range of {count} items at {start} is outside of a span of length {len}");

    start..start + count
}

impl<'a, T> Span<'a, T> {
    /// Creates a span covering all of `items`.
    #[must_use]
    pub fn new(items: &'a mut [T]) -> Self {
        Self { items }
    }

    /// Creates a span covering `items[start..]`.
    ///
    /// # Panics
    ///
    /// Panics if `start` is greater than the length of `items`.
    #[must_use]
    #[track_caller]
    pub fn with_start(items: &'a mut [T], start: usize) -> Self {
        let count = items.len().saturating_sub(start);
        Self::with_range(items, start, count)
    }

    /// Creates a span covering `count` items of `items` starting at `start`.
    ///
    /// # Panics
    ///
    /// Panics if the range does not lie within `items`.
    #[must_use]
    #[track_caller]
    pub fn with_range(items: &'a mut [T], start: usize, count: usize) -> Self {
        let range = checked_range(items.len(), start, count);
        Self { items: &mut items[range] }
    }

    /// Creates a span from a raw pointer and a length.
    ///
    /// # Safety
    ///
    /// The caller must uphold all the requirements of [`slice::from_raw_parts_mut`] for the
    /// entire lifetime `'a`: `pointer` must be non-null, aligned and valid for reads and writes
    /// of `len` initialized items, and the memory must not be accessed through any other
    /// pointer while the span exists.
    #[must_use]
    pub unsafe fn from_raw_parts(pointer: *mut T, len: usize) -> Self {
        // SAFETY: Forwarding the guarantees of the caller.
        let items = unsafe { slice::from_raw_parts_mut(pointer, len) };
        Self { items }
    }

    /// Narrows the span to the items from `start` onwards.
    ///
    /// # Panics
    ///
    /// Panics if `start` is greater than the length of the span.
    #[must_use]
    #[track_caller]
    pub fn slice_from(self, start: usize) -> Self {
        Self::with_start(self.items, start)
    }

    /// Narrows the span to `count` items starting at `start`.
    ///
    /// # Panics
    ///
    /// Panics if the range does not lie within the span.
    #[must_use]
    #[track_caller]
    pub fn slice(self, start: usize, count: usize) -> Self {
        Self::with_range(self.items, start, count)
    }

    /// A read-only view of the same items.
    #[must_use]
    pub fn as_read_only(&self) -> ReadOnlySpan<'_, T> {
        ReadOnlySpan { items: self.items }
    }

    /// Whether both spans denote the same memory: the same start address and the same length.
    #[must_use]
    pub fn ptr_eq(&self, other: &ReadOnlySpan<'_, T>) -> bool {
        self.as_read_only().ptr_eq(other)
    }

    /// Copies all items into `destination` if it is large enough.
    ///
    /// Returns `false` and leaves `destination` untouched otherwise.
    pub fn try_copy_to(&self, destination: &mut [T]) -> bool
    where
        T: Copy,
    {
        self.as_read_only().try_copy_to(destination)
    }

    /// Consumes the span, returning the underlying slice.
    #[must_use]
    pub fn into_slice(self) -> &'a mut [T] {
        self.items
    }
}

impl<'a, T> ReadOnlySpan<'a, T> {
    /// Creates a span covering all of `items`.
    #[must_use]
    pub const fn new(items: &'a [T]) -> Self {
        Self { items }
    }

    /// Creates a span covering `items[start..]`.
    ///
    /// # Panics
    ///
    /// Panics if `start` is greater than the length of `items`.
    #[must_use]
    #[track_caller]
    pub fn with_start(items: &'a [T], start: usize) -> Self {
        Self::with_range(items, start, items.len().saturating_sub(start))
    }

    /// Creates a span covering `count` items of `items` starting at `start`.
    ///
    /// # Panics
    ///
    /// Panics if the range does not lie within `items`.
    #[must_use]
    #[track_caller]
    pub fn with_range(items: &'a [T], start: usize, count: usize) -> Self {
        Self {
            items: &items[checked_range(items.len(), start, count)],
        }
    }

    /// Creates a span from a raw pointer and a length.
    ///
    /// # Safety
    ///
    /// The caller must uphold all the requirements of [`slice::from_raw_parts`] for the entire
    /// lifetime `'a`: `pointer` must be non-null, aligned and valid for reads of `len`
    /// initialized items that are not mutated while the span exists.
    #[must_use]
    pub unsafe fn from_raw_parts(pointer: *const T, len: usize) -> Self {
        // SAFETY: Forwarding the guarantees of the caller.
        let items = unsafe { slice::from_raw_parts(pointer, len) };
        Self { items }
    }

    /// Narrows the span to the items from `start` onwards.
    ///
    /// # Panics
    ///
    /// Panics if `start` is greater than the length of the span.
    #[must_use]
    #[track_caller]
    pub fn slice_from(self, start: usize) -> Self {
        Self::with_start(self.items, start)
    }

    /// Narrows the span to `count` items starting at `start`.
    ///
    /// # Panics
    ///
    /// Panics if the range does not lie within the span.
    #[must_use]
    #[track_caller]
    pub fn slice(self, start: usize, count: usize) -> Self {
        Self::with_range(self.items, start, count)
    }

    /// Whether both spans denote the same memory: the same start address and the same length.
    #[must_use]
    pub fn ptr_eq(&self, other: &ReadOnlySpan<'_, T>) -> bool {
        std::ptr::eq(self.items.as_ptr(), other.items.as_ptr()) && self.items.len() == other.items.len()
    }

    /// Copies all items into `destination` if it is large enough.
    ///
    /// Returns `false` and leaves `destination` untouched otherwise.
    pub fn try_copy_to(&self, destination: &mut [T]) -> bool
    where
        T: Copy,
    {
        match destination.get_mut(..self.items.len()) {
            Some(target) => {
                target.copy_from_slice(self.items);
                true
            }
            None => false,
        }
    }

    /// The underlying slice.
    #[must_use]
    pub const fn as_slice(&self) -> &'a [T] {
        self.items
    }
}

impl<'a> ReadOnlySpan<'a, u8> {
    /// A span over the UTF-8 bytes of `text`.
    #[must_use]
    pub const fn from_text(text: &'a str) -> Self {
        Self::new(text.as_bytes())
    }
}

impl<T> Clone for ReadOnlySpan<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ReadOnlySpan<'_, T> {}

impl<T> Deref for Span<'_, T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        self.items
    }
}

impl<T> DerefMut for Span<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.items
    }
}

impl<T> Deref for ReadOnlySpan<'_, T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        self.items
    }
}

impl<T> Index<usize> for Span<'_, T> {
    type Output = T;

    #[track_caller]
    fn index(&self, index: usize) -> &Self::Output {
        &self.items[index]
    }
}

impl<T> IndexMut<usize> for Span<'_, T> {
    #[track_caller]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.items[index]
    }
}

impl<T> Index<usize> for ReadOnlySpan<'_, T> {
    type Output = T;

    #[track_caller]
    fn index(&self, index: usize) -> &Self::Output {
        &self.items[index]
    }
}

impl<'a, T> From<Span<'a, T>> for ReadOnlySpan<'a, T> {
    fn from(value: Span<'a, T>) -> Self {
        Self { items: value.items }
    }
}

impl<'a, T> From<&'a mut [T]> for Span<'a, T> {
    fn from(value: &'a mut [T]) -> Self {
        Self::new(value)
    }
}

impl<'a, T> From<&'a [T]> for ReadOnlySpan<'a, T> {
    fn from(value: &'a [T]) -> Self {
        Self::new(value)
    }
}

impl<'a> From<&'a str> for ReadOnlySpan<'a, u8> {
    fn from(value: &'a str) -> Self {
        Self::from_text(value)
    }
}

impl<T: PartialEq> PartialEq for ReadOnlySpan<'_, T> {
    /// Compares contents. Use [`ptr_eq`][ReadOnlySpan::ptr_eq] for identity.
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T: Eq> Eq for ReadOnlySpan<'_, T> {}

impl<T: PartialEq> PartialEq<[T]> for ReadOnlySpan<'_, T> {
    fn eq(&self, other: &[T]) -> bool {
        self.items == other
    }
}

impl<T: PartialEq> PartialEq<&[T]> for ReadOnlySpan<'_, T> {
    fn eq(&self, other: &&[T]) -> bool {
        self.items == *other
    }
}

impl<T: PartialEq, const LEN: usize> PartialEq<&[T; LEN]> for ReadOnlySpan<'_, T> {
    fn eq(&self, other: &&[T; LEN]) -> bool {
        self.items == other.as_slice()
    }
}

impl<T: PartialEq> PartialEq for Span<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        *self.items == *other.items
    }
}

impl<T: Debug> Debug for Span<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Span").field(&self.items).finish()
    }
}

impl<T: Debug> Debug for ReadOnlySpan<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ReadOnlySpan").field(&self.items).finish()
    }
}
