// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::ops::Add;

/// A location within a [`Sequence`][crate::Sequence].
///
/// A position names a segment of the sequence and an index within that segment. Positions
/// are only meaningful for the sequence they were obtained from and only while that sequence
/// is unchanged; positions from different sequences cannot be compared.
///
/// Positions order by segment first and index second. The same byte can be addressed by
/// more than one position: the end of one segment and the start of the next denote the same
/// place in the logical byte stream but compare as different positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    segment: usize,
    index: usize,
}

impl Position {
    /// The position one past the last segment of any sequence.
    pub const END: Self = Self {
        segment: usize::MAX,
        index: 0,
    };

    /// Creates a position pointing at `index` within `segment`.
    #[must_use]
    pub const fn new(segment: usize, index: usize) -> Self {
        Self { segment, index }
    }

    /// The segment this position points into.
    #[must_use]
    pub const fn segment(self) -> usize {
        self.segment
    }

    /// The index within the segment.
    #[must_use]
    pub const fn index(self) -> usize {
        self.index
    }

    /// Whether this is [`Position::END`].
    #[must_use]
    pub const fn is_end(self) -> bool {
        self.segment == usize::MAX
    }

    /// The position `count` bytes further within the same segment.
    ///
    /// # Panics
    ///
    /// Panics if this is [`Position::END`] or if the index overflows.
    #[must_use]
    #[track_caller]
    pub const fn offset(self, count: usize) -> Self {
        assert!(!self.is_end(), "cannot offset the end position");

        let index = self.index.checked_add(count).expect("position index overflow");
        Self::new(self.segment, index)
    }
}

impl Add<usize> for Position {
    type Output = Self;

    #[track_caller]
    fn add(self, rhs: usize) -> Self::Output {
        self.offset(rhs)
    }
}

/// A pair of positions delimiting a range of bytes. The end is exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PositionRange {
    /// The first position in the range.
    pub start: Position,

    /// The position just past the range.
    pub end: Position,
}

impl PositionRange {
    /// Creates a range from `start` up to but not including `end`.
    #[must_use]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}
