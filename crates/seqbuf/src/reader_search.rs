// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! We separate out the delimiter search methods for ease of maintenance.

use tracing::{Level, event};

use crate::reader::{Ahead, SegmentView, Source};
use crate::{BytesReader, Position, PositionRange, SegmentChain, Sequence};

/// Where a delimiter starts: a byte offset within the bytes of `view`, plus the number of
/// unread bytes between the cursor and that offset.
struct Found<'a> {
    view: SegmentView<'a>,
    offset: usize,
    distance: usize,
}

impl Found<'_> {
    fn position(&self) -> Position {
        self.view.position_of(self.offset)
    }
}

impl<'a, S: Sequence + ?Sized> BytesReader<'a, S> {
    /// Moves the cursor just past the next occurrence of `delimiter` and returns the position of
    /// the delimiter.
    ///
    /// If the delimiter does not occur in the rest of the sequence, returns `None` and leaves
    /// the cursor where it was.
    pub fn advance_to_delimiter(&mut self, delimiter: u8) -> Option<Position> {
        let found = self.find(&[delimiter])?;
        let position = found.position();

        self.move_past(&found, 1);
        Some(position)
    }

    /// Moves the cursor just past the next occurrence of `delimiter` and returns the range of
    /// bytes that preceded it, starting at the old cursor position.
    ///
    /// If the delimiter does not occur in the rest of the sequence, returns `None` and leaves
    /// the cursor where it was.
    pub fn read_range(&mut self, delimiter: u8) -> Option<PositionRange> {
        let start = self.position();
        let end = self.advance_to_delimiter(delimiter)?;

        Some(PositionRange::new(start, end))
    }

    /// Returns the position of the next occurrence of `delimiter`, which may span segments,
    /// without moving the cursor.
    ///
    /// # Panics
    ///
    /// Panics if `delimiter` is empty.
    #[must_use]
    #[track_caller]
    pub fn position_of(&self, delimiter: &[u8]) -> Option<Position> {
        assert!(!delimiter.is_empty(), "delimiter must not be empty");

        self.find(delimiter).map(|found| found.position())
    }

    /// Moves the cursor just past the next occurrence of `delimiter`, which may span segments,
    /// and returns the range of bytes that preceded it.
    ///
    /// If the delimiter does not occur in the rest of the sequence, returns `None` and leaves
    /// the cursor where it was.
    ///
    /// # Panics
    ///
    /// Panics if `delimiter` is empty.
    #[track_caller]
    pub fn read_range_span(&mut self, delimiter: &[u8]) -> Option<PositionRange> {
        assert!(!delimiter.is_empty(), "delimiter must not be empty");

        let start = self.position();
        let found = self.find(delimiter)?;
        let end = found.position();

        self.move_past(&found, delimiter.len());
        Some(PositionRange::new(start, end))
    }

    fn move_past(&mut self, found: &Found<'a>, delimiter_len: usize) {
        self.move_to(found.view, found.offset, found.distance);
        self.advance(delimiter_len);
    }

    /// Locates the first occurrence of a non-empty `delimiter` ahead of the cursor.
    ///
    /// Each occurrence of the first delimiter byte is a candidate. A candidate that fits in its
    /// segment is compared in place; one that runs off the end of its segment is compared piece
    /// by piece against the following segments. Once a candidate runs out of data, no later
    /// candidate can match either.
    fn find(&self, delimiter: &[u8]) -> Option<Found<'a>> {
        let (&first, _) = delimiter.split_first()?;
        let mut distance = 0;

        for view in self.ahead() {
            let unread = view.unread();
            let mut from = 0;

            while let Some(relative) = unread[from..].iter().position(|&byte| byte == first) {
                let candidate = from + relative;
                let offset = view.offset + candidate;

                let matched = match unread.get(candidate..candidate + delimiter.len()) {
                    Some(window) => window == delimiter,
                    None => straddles(self.source, SegmentView { offset, ..view }, delimiter)?,
                };

                if matched {
                    return Some(Found {
                        view,
                        offset,
                        distance: distance + candidate,
                    });
                }

                from = candidate + 1;
            }

            distance += unread.len();
        }

        None
    }
}

/// Whether the bytes starting at `view` begin with `delimiter`. `None` if the data ends before
/// enough bytes are available to decide.
#[cold] // Most delimiters do not straddle a segment boundary.
fn straddles<'a, S: Sequence + ?Sized>(source: Source<'a, S>, view: SegmentView<'a>, delimiter: &[u8]) -> Option<bool> {
    let mut expected = delimiter;
    let mut segments = 0_usize;

    for piece in Ahead::from_view(source, view) {
        let unread = piece.unread();
        let count = unread.len().min(expected.len());

        if unread[..count] != expected[..count] {
            return Some(false);
        }

        expected = &expected[count..];
        segments += 1;

        if expected.is_empty() {
            event!(
                Level::TRACE,
                message = "delimiter spans segments",
                delimiter_len = delimiter.len(),
                segments
            );

            return Some(true);
        }
    }

    None
}

impl<'a> BytesReader<'a, SegmentChain> {
    /// Moves the cursor just past the next occurrence of `delimiter` and returns the bytes that
    /// preceded it as a chain sharing memory with the source chain.
    ///
    /// If the delimiter does not occur in the rest of the chain, returns `None` and leaves the
    /// cursor where it was.
    pub fn try_read_bytes(&mut self, delimiter: u8) -> Option<SegmentChain> {
        let range = self.read_range(delimiter)?;
        Some(self.chain().slice(range))
    }

    /// Like [`try_read_bytes`][Self::try_read_bytes] but with a delimiter of any length.
    ///
    /// # Panics
    ///
    /// Panics if `delimiter` is empty.
    #[track_caller]
    pub fn try_read_bytes_span(&mut self, delimiter: &[u8]) -> Option<SegmentChain> {
        let range = self.read_range_span(delimiter)?;
        Some(self.chain().slice(range))
    }

    fn chain(&self) -> &'a SegmentChain {
        match self.source {
            Source::Segmented(chain) => chain,
            Source::Contiguous(_) => unreachable!("contiguous readers are always SliceReader"),
        }
    }
}
