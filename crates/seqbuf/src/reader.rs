// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt::{self, Debug, Formatter};

use crate::{Position, ReadOnlySpan, Sequence};

/// Where a reader gets its bytes from.
pub(crate) enum Source<'a, S: ?Sized> {
    Contiguous(&'a [u8]),
    Segmented(&'a S),
}

impl<S: ?Sized> Clone for Source<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: ?Sized> Copy for Source<'_, S> {}

impl<'a, S: Sequence + ?Sized> Source<'a, S> {
    fn first(self) -> Position {
        match self {
            Self::Contiguous(_) => Position::new(0, 0),
            Self::Segmented(sequence) => sequence.first(),
        }
    }

    fn try_get(self, position: &mut Position) -> Option<&'a [u8]> {
        match self {
            Self::Contiguous(bytes) => {
                if position.is_end() || position.segment() != 0 {
                    return None;
                }

                let tail = bytes
                    .get(position.index()..)
                    .expect("position index lies beyond the end of its segment");

                *position = Position::END;
                Some(tail)
            }
            Self::Segmented(sequence) => sequence.try_get(position),
        }
    }
}

/// One segment as seen by a forward scan: the bytes from `start` onwards, the position of the
/// following segment and how many of the bytes have already been read.
#[derive(Clone, Copy)]
pub(crate) struct SegmentView<'a> {
    pub(crate) start: Position,
    pub(crate) bytes: &'a [u8],
    pub(crate) next: Position,
    pub(crate) offset: usize,
}

impl<'a> SegmentView<'a> {
    pub(crate) fn unread(&self) -> &'a [u8] {
        self.bytes.get(self.offset..).expect("offset never exceeds the segment length")
    }

    pub(crate) fn position_of(&self, offset: usize) -> Position {
        self.start + offset
    }
}

/// Walks the segments ahead of some point without touching the reader.
pub(crate) struct Ahead<'a, S: ?Sized> {
    source: Source<'a, S>,
    pending: Option<SegmentView<'a>>,
    next: Position,
}

impl<'a, S: Sequence + ?Sized> Ahead<'a, S> {
    pub(crate) fn from_view(source: Source<'a, S>, view: SegmentView<'a>) -> Self {
        Self {
            source,
            pending: Some(view),
            next: view.next,
        }
    }

    fn from_start(source: Source<'a, S>) -> Self {
        Self {
            source,
            pending: None,
            next: source.first(),
        }
    }
}

impl<'a, S: Sequence + ?Sized> Iterator for Ahead<'a, S> {
    type Item = SegmentView<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(view) = self.pending.take() {
            return Some(view);
        }

        let start = self.next;
        let bytes = self.source.try_get(&mut self.next)?;

        Some(SegmentView {
            start,
            bytes,
            next: self.next,
            offset: 0,
        })
    }
}

/// Copies the unread bytes of `views` into `destination` until either runs out.
pub(crate) fn copy_from<'a>(views: impl Iterator<Item = SegmentView<'a>>, destination: &mut [u8]) -> usize {
    let mut copied = 0;

    for view in views {
        if copied == destination.len() {
            break;
        }

        let unread = view.unread();
        let count = unread.len().min(destination.len() - copied);

        destination[copied..copied + count].copy_from_slice(&unread[..count]);
        copied += count;
    }

    copied
}

/// A forward-only cursor over a [`Sequence`] of byte segments.
///
/// The reader keeps the current segment cached and only asks the sequence for the next one
/// when it runs out of bytes, so most operations are plain slice accesses. Operations that need
/// data spanning more than one segment (delimiter searches, parses, binary reads) handle the
/// boundary transparently, copying into a small stack buffer where a contiguous view is needed.
///
/// Reading from a contiguous slice uses the same type via [`SliceReader`].
///
/// ```
/// use seqbuf::BytesReader;
///
/// let segments: [&[u8]; 2] = [b"Hel", b"lo World"];
/// let mut reader = BytesReader::new(&segments);
///
/// let hello = reader.read_range(b' ').expect("there is a space");
/// assert_eq!(seqbuf::sequence::to_vec(&segments, hello), b"Hello");
/// assert_eq!(reader.consumed(), 6);
/// assert_eq!(reader.unread_span(), b"World".as_slice());
/// ```
///
/// # Failure semantics
///
/// Searches, parses and binary reads that do not succeed return `None` and leave the cursor
/// where it was. Moving the cursor past the end of the data is a programming error and panics.
pub struct BytesReader<'a, S: ?Sized> {
    pub(crate) source: Source<'a, S>,

    // Start of the cached segment and the position of the segment after it.
    current_segment: Position,
    next_segment: Position,

    current: &'a [u8],
    pub(crate) index: usize,
    pub(crate) consumed: usize,
}

/// A [`BytesReader`] over a single contiguous slice of bytes.
pub type SliceReader<'a> = BytesReader<'a, [&'a [u8]]>;

impl<'a> SliceReader<'a> {
    /// Creates a reader over a contiguous slice of bytes.
    ///
    /// Positions reported by this reader all refer to segment 0.
    #[must_use]
    pub fn from_slice(bytes: &'a [u8]) -> Self {
        Self::with_source(Source::Contiguous(bytes))
    }
}

impl<'a, S: Sequence + ?Sized> BytesReader<'a, S> {
    /// Creates a reader positioned at the start of `sequence`.
    #[must_use]
    pub fn new(sequence: &'a S) -> Self {
        Self::with_source(Source::Segmented(sequence))
    }

    fn with_source(source: Source<'a, S>) -> Self {
        let first = source.first();
        let mut next = first;
        let current = source.try_get(&mut next).unwrap_or_default();

        Self {
            source,
            current_segment: first,
            next_segment: next,
            current,
            index: 0,
            consumed: 0,
        }
    }

    /// The position of the next unread byte.
    ///
    /// When the cursor sits at the end of a segment, this is the end of that segment rather
    /// than the start of the next one.
    #[must_use]
    pub fn position(&self) -> Position {
        if self.current_segment.is_end() {
            Position::END
        } else {
            self.current_segment + self.index
        }
    }

    /// The total number of bytes consumed since the start of the sequence.
    #[must_use]
    pub const fn consumed(&self) -> usize {
        self.consumed
    }

    /// The unread part of the current segment. Empty at a segment boundary.
    #[must_use]
    pub fn unread_span(&self) -> ReadOnlySpan<'a, u8> {
        ReadOnlySpan::new(self.unread())
    }

    /// Whether all bytes of the sequence have been read.
    ///
    /// This looks ahead past empty segments without moving the cursor.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ahead().all(|view| view.unread().is_empty())
    }

    /// The next unread byte of the current segment, without consuming it.
    ///
    /// Returns `None` at a segment boundary even if more segments follow; use
    /// [`peek`][Self::peek] to look across segments.
    #[must_use]
    pub fn try_peek(&self) -> Option<u8> {
        self.unread().first().copied()
    }

    /// Returns the next `copy_buffer.len()` bytes without consuming them, or all remaining
    /// bytes if there are fewer.
    ///
    /// If the bytes are contiguous in the current segment they are borrowed from it; otherwise
    /// they are copied into `copy_buffer`, which is then returned.
    #[must_use]
    pub fn peek<'b>(&self, copy_buffer: &'b mut [u8]) -> &'b [u8]
    where
        'a: 'b,
    {
        if let Some(bytes) = self.unread().get(..copy_buffer.len()) {
            return bytes;
        }

        let copied = self.copy_ahead(copy_buffer);
        &copy_buffer[..copied]
    }

    /// Consumes and returns the next byte, crossing into later segments as needed.
    ///
    /// Returns `None` at the end of the sequence.
    pub fn read_byte(&mut self) -> Option<u8> {
        loop {
            if let Some(&byte) = self.current.get(self.index) {
                self.index += 1;
                self.consumed += 1;
                return Some(byte);
            }

            if !self.fetch_next() {
                return None;
            }
        }
    }

    /// Consumes `count` bytes.
    ///
    /// # Panics
    ///
    /// Panics if fewer than `count` bytes remain.
    #[track_caller]
    #[cfg_attr(test, mutants::skip)] // Mutating this can cause infinite loops.
    pub fn advance(&mut self, count: usize) {
        let mut remaining = count;

        loop {
            let unread = self.current.len() - self.index;

            if remaining <= unread {
                self.index += remaining;
                break;
            }

            remaining -= unread;

            assert!(
                self.fetch_next(),
                "attempted to advance past the end of the sequence by {remaining} bytes"
            );
        }

        self.consumed += count;
    }

    /// Moves the cursor to `position`, which must have been obtained from this reader or its
    /// sequence.
    ///
    /// Seeking to [`Position::END`] moves the cursor past all data.
    ///
    /// # Panics
    ///
    /// Panics if `position` does not exist in the sequence.
    #[track_caller]
    pub fn seek(&mut self, position: Position) {
        let mut next = position;

        let current = if let Some(bytes) = self.source.try_get(&mut next) {
            bytes
        } else {
            assert!(position.is_end(), "position {position:?} does not exist in the sequence");
            &[]
        };

        self.consumed = self.distance_to(position);
        self.current_segment = position;
        self.next_segment = next;
        self.current = current;
        self.index = 0;
    }

    /// The unread part of the current segment.
    pub(crate) fn unread(&self) -> &'a [u8] {
        self.current.get(self.index..).expect("index never exceeds the segment length")
    }

    /// The segments ahead of the cursor, starting with the unread part of the current one.
    pub(crate) fn ahead(&self) -> Ahead<'a, S> {
        Ahead::from_view(self.source, self.current_view())
    }

    pub(crate) fn current_view(&self) -> SegmentView<'a> {
        SegmentView {
            start: self.current_segment,
            bytes: self.current,
            next: self.next_segment,
            offset: self.index,
        }
    }

    /// Copies bytes ahead of the cursor into `destination` without consuming them.
    pub(crate) fn copy_ahead(&self, destination: &mut [u8]) -> usize {
        copy_from(self.ahead(), destination)
    }

    /// Places the cursor at `offset` within `view`, counting `distance` more bytes as consumed.
    pub(crate) fn move_to(&mut self, view: SegmentView<'a>, offset: usize, distance: usize) {
        self.current_segment = view.start;
        self.current = view.bytes;
        self.next_segment = view.next;
        self.index = offset;
        self.consumed += distance;
    }

    /// Replaces the cached segment with the following one. Returns `false` at the end.
    fn fetch_next(&mut self) -> bool {
        let start = self.next_segment;

        match self.source.try_get(&mut self.next_segment) {
            Some(bytes) => {
                self.current_segment = start;
                self.current = bytes;
                self.index = 0;
                true
            }
            None => false,
        }
    }

    fn distance_to(&self, position: Position) -> usize {
        let mut distance = 0;

        for view in Ahead::from_start(self.source) {
            if !position.is_end() && view.start.segment() == position.segment() {
                return distance + position.index() - view.start.index();
            }

            distance += view.bytes.len();
        }

        distance
    }
}

impl<S: ?Sized> Clone for BytesReader<'_, S> {
    fn clone(&self) -> Self {
        Self {
            source: self.source,
            current_segment: self.current_segment,
            next_segment: self.next_segment,
            current: self.current,
            index: self.index,
            consumed: self.consumed,
        }
    }
}

impl<S: Sequence + ?Sized> Debug for BytesReader<'_, S> {
    #[cfg_attr(test, mutants::skip)] // We have no API contract here.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct(std::any::type_name::<Self>())
            .field("position", &self.position())
            .field("consumed", &self.consumed)
            .field("unread_in_segment", &self.unread().len())
            .finish()
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    #![allow(clippy::indexing_slicing, reason = "This is all fine in test code")]

    use testing_aids::assert_panic;

    use super::*;

    const SEGMENTS: [&[u8]; 4] = [b"ab", b"", b"cde", b"f"];

    static_assertions::assert_impl_all!(SliceReader<'static>: Send, Sync, Clone);

    #[test]
    fn read_bytes_one_at_a_time() {
        let mut reader = BytesReader::new(&SEGMENTS);
        let mut read = Vec::new();

        while let Some(byte) = reader.read_byte() {
            read.push(byte);
        }

        assert_eq!(read, b"abcdef");
        assert_eq!(reader.consumed(), 6);
        assert!(reader.is_empty());
        assert_eq!(reader.read_byte(), None);
    }

    #[test]
    fn try_peek_stops_at_boundary() {
        let mut reader = BytesReader::new(&SEGMENTS);

        assert_eq!(reader.try_peek(), Some(b'a'));
        reader.advance(2);
        assert_eq!(reader.try_peek(), None);
        assert!(!reader.is_empty());
        assert_eq!(reader.read_byte(), Some(b'c'));
    }

    #[test]
    fn peek_borrows_or_copies() {
        let mut reader = BytesReader::new(&SEGMENTS);
        reader.advance(2);

        let mut small = [0_u8; 2];
        assert_eq!(reader.peek(&mut small), b"cd");

        let mut large = [0_u8; 16];
        assert_eq!(reader.peek(&mut large), b"cdef");
        assert_eq!(reader.consumed(), 2);

        let segments: [&[u8]; 1] = [b"abc"];
        let contiguous = BytesReader::new(&segments);
        let mut within = [0_u8; 2];
        let peeked = contiguous.peek(&mut within);
        assert_eq!(peeked, b"ab");
        assert_eq!(peeked.as_ptr(), segments[0].as_ptr());
    }

    #[test]
    fn advance_crosses_segments() {
        let mut reader = BytesReader::new(&SEGMENTS);

        reader.advance(3);
        assert_eq!(reader.position(), Position::new(2, 1));
        assert_eq!(reader.unread_span(), b"de".as_slice());

        reader.advance(3);
        assert_eq!(reader.consumed(), 6);
        assert!(reader.is_empty());

        reader.advance(0);
        assert_panic!(reader.advance(1), "past the end of the sequence");
    }

    #[test]
    fn advance_stops_at_boundary() {
        let mut reader = BytesReader::new(&SEGMENTS);

        reader.advance(2);
        assert_eq!(reader.position(), Position::new(0, 2));
    }

    #[test]
    fn seek_back_and_forth() {
        let mut reader = BytesReader::new(&SEGMENTS);
        reader.advance(4);
        let saved = reader.position();
        assert_eq!(saved, Position::new(2, 2));

        reader.seek(Sequence::first(&SEGMENTS));
        assert_eq!(reader.consumed(), 0);
        assert_eq!(reader.read_byte(), Some(b'a'));

        reader.seek(saved);
        assert_eq!(reader.consumed(), 4);
        assert_eq!(reader.position(), saved);
        assert_eq!(reader.read_byte(), Some(b'e'));
        assert_eq!(reader.read_byte(), Some(b'f'));

        reader.seek(Position::END);
        assert!(reader.is_empty());
        assert_eq!(reader.consumed(), 6);

        assert_panic!(reader.seek(Position::new(7, 0)));
    }

    #[test]
    fn only_empty_segments() {
        let segments: [&[u8]; 3] = [b"", b"", b""];
        let mut reader = BytesReader::new(&segments);

        assert!(reader.is_empty());
        assert_eq!(reader.try_peek(), None);
        assert_eq!(reader.read_byte(), None);
        reader.advance(0);
    }

    #[test]
    fn no_segments() {
        let segments: [&[u8]; 0] = [];
        let reader = BytesReader::new(&segments);

        assert!(reader.is_empty());
        assert_eq!(reader.position(), Position::END);
    }

    #[test]
    fn slice_reader() {
        let mut reader = SliceReader::from_slice(b"xyz");

        reader.advance(1);
        assert_eq!(reader.position(), Position::new(0, 1));
        assert_eq!(reader.read_byte(), Some(b'y'));

        reader.seek(Position::new(0, 0));
        assert_eq!(reader.consumed(), 0);
        assert_eq!(reader.unread_span(), b"xyz".as_slice());
    }

    #[test]
    fn clone_is_independent() {
        let mut reader = BytesReader::new(&SEGMENTS);
        let snapshot = reader.clone();

        reader.advance(5);

        assert_eq!(snapshot.consumed(), 0);
        assert_eq!(snapshot.position(), Position::new(0, 0));
    }

    #[test]
    fn debug_shows_position() {
        let reader = BytesReader::new(&SEGMENTS);
        assert!(format!("{reader:?}").contains("consumed: 0"));
    }
}
