// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use bytes::{Bytes, BytesMut};
use smallvec::SmallVec;

use crate::{Position, PositionRange, Sequence};

/// The number of segments a [`SegmentChain`] can hold without a separate heap allocation for
/// the segment table.
pub const MAX_INLINE_SEGMENTS: usize = 8;

/// An owned sequence of bytes made up of zero or more immutable segments.
///
/// Cloning, appending and slicing a chain never copies the bytes themselves; segments are
/// reference-counted [`Bytes`] shared between all the chains that refer to them.
///
/// A chain is a [`Sequence`], so it can be read via [`BytesReader`][crate::BytesReader]. The
/// positions such a reader returns can be used to [`slice`][SegmentChain::slice] the chain.
///
/// ```
/// use bytes::Bytes;
/// use seqbuf::{BytesReader, SegmentChain};
///
/// let chain = SegmentChain::from_segments([Bytes::from_static(b"GET /in"), Bytes::from_static(b"dex HTTP/1.1")]);
///
/// let mut reader = BytesReader::new(&chain);
/// let method = reader.try_read_bytes(b' ').expect("request has a method");
/// let path = reader.try_read_bytes(b' ').expect("request has a path");
///
/// assert_eq!(method, b"GET");
/// assert_eq!(path, b"/index");
/// assert_eq!(path.segment_count(), 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct SegmentChain {
    segments: SmallVec<[Bytes; MAX_INLINE_SEGMENTS]>,
    len: usize,
}

impl SegmentChain {
    /// Creates an empty chain.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            segments: SmallVec::new_const(),
            len: 0,
        }
    }

    /// Creates a chain from the given segments, in order. Empty segments are kept.
    #[must_use]
    pub fn from_segments<I>(segments: I) -> Self
    where
        I: IntoIterator<Item = Bytes>,
    {
        let mut chain = Self::new();
        chain.extend(segments);
        chain
    }

    /// Creates a single-segment chain holding a copy of `bytes`.
    #[must_use]
    pub fn copied_from_slice(bytes: &[u8]) -> Self {
        Self::from(Bytes::copy_from_slice(bytes))
    }

    /// The total number of bytes in the chain.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the chain contains no bytes. A chain of empty segments is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The number of segments in the chain, including empty ones.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// The segments of the chain, in order.
    #[must_use]
    pub fn segments(&self) -> &[Bytes] {
        &self.segments
    }

    /// Appends a segment to the end of the chain.
    pub fn push(&mut self, segment: Bytes) {
        self.len += segment.len();
        self.segments.push(segment);
    }

    /// Appends all segments of `other` to the end of the chain.
    pub fn append(&mut self, other: Self) {
        self.len += other.len;
        self.segments.extend(other.segments);
    }

    /// Returns a new chain covering the bytes in `range`, without copying them.
    ///
    /// Segments of the result that would be empty are omitted. A range that ends at
    /// [`Position::END`] extends to the end of the chain.
    ///
    /// # Panics
    ///
    /// Panics if a position in the range points beyond the end of its segment.
    #[must_use]
    pub fn slice(&self, range: PositionRange) -> Self {
        let mut result = Self::new();
        let first = range.start.segment();

        for (index, segment) in self.segments.iter().enumerate().skip(first) {
            let start = if index == first { range.start.index() } else { 0 };
            let last = !range.end.is_end() && index == range.end.segment();
            let end = if last { range.end.index() } else { segment.len() };

            if start < end {
                result.push(segment.slice(start..end));
            }

            if last {
                break;
            }
        }

        result
    }

    /// Returns the contents as a single contiguous [`Bytes`].
    ///
    /// This is free for chains of at most one non-empty segment and copies otherwise.
    #[must_use]
    pub fn to_bytes(&self) -> Bytes {
        let mut non_empty = self.segments.iter().filter(|segment| !segment.is_empty());

        match (non_empty.next(), non_empty.next()) {
            (None, _) => Bytes::new(),
            (Some(only), None) => only.clone(),
            _ => {
                let mut bytes = BytesMut::with_capacity(self.len);

                for segment in &self.segments {
                    bytes.extend_from_slice(segment);
                }

                bytes.freeze()
            }
        }
    }

    /// Copies the contents into a new vector.
    #[must_use]
    pub fn to_vec(&self) -> Vec<u8> {
        let mut result = Vec::with_capacity(self.len);

        for segment in &self.segments {
            result.extend_from_slice(segment);
        }

        result
    }

    fn bytes(&self) -> impl Iterator<Item = u8> + '_ {
        self.segments.iter().flat_map(|segment| segment.iter().copied())
    }
}

impl Sequence for SegmentChain {
    fn first(&self) -> Position {
        Sequence::first(self.segments.as_slice())
    }

    fn try_get(&self, position: &mut Position) -> Option<&[u8]> {
        Sequence::try_get(self.segments.as_slice(), position)
    }
}

impl Extend<Bytes> for SegmentChain {
    fn extend<I: IntoIterator<Item = Bytes>>(&mut self, iter: I) {
        for segment in iter {
            self.push(segment);
        }
    }
}

impl FromIterator<Bytes> for SegmentChain {
    fn from_iter<I: IntoIterator<Item = Bytes>>(iter: I) -> Self {
        Self::from_segments(iter)
    }
}

impl From<Bytes> for SegmentChain {
    fn from(value: Bytes) -> Self {
        let mut chain = Self::new();
        chain.push(value);
        chain
    }
}

impl From<Vec<u8>> for SegmentChain {
    fn from(value: Vec<u8>) -> Self {
        Self::from(Bytes::from(value))
    }
}

impl From<&'static [u8]> for SegmentChain {
    fn from(value: &'static [u8]) -> Self {
        Self::from(Bytes::from_static(value))
    }
}

impl PartialEq for SegmentChain {
    fn eq(&self, other: &Self) -> bool {
        // We do not care about the structure, only the contents.
        self.len == other.len && self.bytes().eq(other.bytes())
    }
}

impl Eq for SegmentChain {}

impl PartialEq<[u8]> for SegmentChain {
    fn eq(&self, other: &[u8]) -> bool {
        self.len == other.len() && self.bytes().eq(other.iter().copied())
    }
}

impl PartialEq<&[u8]> for SegmentChain {
    fn eq(&self, other: &&[u8]) -> bool {
        self == *other
    }
}

impl<const LEN: usize> PartialEq<&[u8; LEN]> for SegmentChain {
    fn eq(&self, other: &&[u8; LEN]) -> bool {
        self == other.as_slice()
    }
}

impl PartialEq<SegmentChain> for &[u8] {
    fn eq(&self, other: &SegmentChain) -> bool {
        other == *self
    }
}
