// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Sources of segmented bytes and helpers that operate on them.

use std::iter::FusedIterator;

use crate::{Position, PositionRange};

/// A logical sequence of bytes stored in zero or more segments of contiguous memory.
///
/// Segments are visited in order by repeatedly calling [`try_get`][Sequence::try_get],
/// starting from [`first`][Sequence::first]. Empty segments are allowed and do not mark the
/// end of the sequence; only [`Position::END`] does.
///
/// Implementations are provided for slices, arrays and vectors of anything that can be viewed
/// as a byte slice, for references to sequences and for [`SegmentChain`][crate::SegmentChain].
///
/// ```
/// use seqbuf::{Position, Sequence};
///
/// let segments: [&[u8]; 2] = [b"Hel", b"lo"];
///
/// let mut position = Sequence::first(&segments);
/// assert_eq!(segments.try_get(&mut position), Some(b"Hel".as_slice()));
/// assert_eq!(segments.try_get(&mut position), Some(b"lo".as_slice()));
/// assert_eq!(position, Position::END);
/// assert_eq!(segments.try_get(&mut position), None);
/// ```
pub trait Sequence {
    /// The position of the first byte of the sequence, or [`Position::END`] if the sequence
    /// has no segments.
    fn first(&self) -> Position;

    /// Returns the bytes of the segment at `position`, starting at the index it points to,
    /// and moves `position` to the start of the following segment (or [`Position::END`]).
    ///
    /// Returns `None` only when `position` is [`Position::END`] or does not name a segment of
    /// this sequence.
    ///
    /// # Panics
    ///
    /// Panics if the index of `position` lies beyond the end of its segment.
    fn try_get(&self, position: &mut Position) -> Option<&[u8]>;
}

impl<S: Sequence + ?Sized> Sequence for &S {
    fn first(&self) -> Position {
        (**self).first()
    }

    fn try_get(&self, position: &mut Position) -> Option<&[u8]> {
        (**self).try_get(position)
    }
}

impl<T: AsRef<[u8]>> Sequence for [T] {
    fn first(&self) -> Position {
        if self.is_empty() { Position::END } else { Position::new(0, 0) }
    }

    fn try_get(&self, position: &mut Position) -> Option<&[u8]> {
        let segment = self.get(position.segment())?.as_ref();

        let tail = segment
            .get(position.index()..)
            .expect("position index lies beyond the end of its segment");

        let next = position.segment() + 1;
        *position = if next < self.len() { Position::new(next, 0) } else { Position::END };

        Some(tail)
    }
}

impl<T: AsRef<[u8]>, const N: usize> Sequence for [T; N] {
    fn first(&self) -> Position {
        Sequence::first(self.as_slice())
    }

    fn try_get(&self, position: &mut Position) -> Option<&[u8]> {
        Sequence::try_get(self.as_slice(), position)
    }
}

impl<T: AsRef<[u8]>> Sequence for Vec<T> {
    fn first(&self) -> Position {
        Sequence::first(self.as_slice())
    }

    fn try_get(&self, position: &mut Position) -> Option<&[u8]> {
        Sequence::try_get(self.as_slice(), position)
    }
}

/// Iterates over the segments of a sequence, yielding the position of each segment together
/// with its bytes.
#[derive(Debug)]
pub struct Segments<'s, S: ?Sized> {
    sequence: &'s S,
    next: Position,
}

impl<'s, S: Sequence + ?Sized> Iterator for Segments<'s, S> {
    type Item = (Position, &'s [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        let at = self.next;
        let bytes = self.sequence.try_get(&mut self.next)?;
        Some((at, bytes))
    }
}

impl<S: Sequence + ?Sized> FusedIterator for Segments<'_, S> {}

/// Iterates over the segments of `sequence`, starting at `from`.
pub fn segments<S: Sequence + ?Sized>(sequence: &S, from: Position) -> Segments<'_, S> {
    Segments { sequence, next: from }
}

/// The total number of bytes in `sequence`.
#[must_use]
pub fn len<S: Sequence + ?Sized>(sequence: &S) -> usize {
    segments(sequence, sequence.first()).map(|(_, bytes)| bytes.len()).sum()
}

/// Copies bytes starting at `from` into `destination`, crossing segment boundaries as needed.
///
/// Returns the number of bytes copied, which is less than the length of `destination` only if
/// the sequence ends first.
pub fn copy_to<S: Sequence + ?Sized>(sequence: &S, from: Position, destination: &mut [u8]) -> usize {
    let mut copied = 0;

    for (_, bytes) in segments(sequence, from) {
        let remaining = &mut destination[copied..];
        let count = remaining.len().min(bytes.len());

        remaining[..count].copy_from_slice(&bytes[..count]);
        copied += count;

        if copied == destination.len() {
            break;
        }
    }

    copied
}

/// Collects the bytes in `range` into a vector.
///
/// An end of [`Position::END`] collects everything from the start of the range onwards.
#[must_use]
pub fn to_vec<S: Sequence + ?Sized>(sequence: &S, range: PositionRange) -> Vec<u8> {
    let mut result = Vec::new();

    for (at, bytes) in segments(sequence, range.start) {
        if !range.end.is_end() && at.segment() == range.end.segment() {
            let count = range.end.index().saturating_sub(at.index()).min(bytes.len());
            result.extend_from_slice(&bytes[..count]);
            break;
        }

        result.extend_from_slice(bytes);
    }

    result
}
