// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! We separate out the value consumption methods for ease of maintenance.

use num_traits::FromBytes;
use seqbuf_text::{StandardFormat, Utf8Parse};
use tracing::{Level, event};

use crate::{BytesReader, Sequence};

const MIN_PARSE_WINDOW: usize = 256;

const MAX_PARSE_WINDOW: usize = 512;

/// Parsed text must be shorter than this many bytes, however the bytes are segmented.
fn parse_window<T: Utf8Parse>(format: StandardFormat) -> usize {
    T::max_text_len(format)
        .saturating_add(1)
        .clamp(MIN_PARSE_WINDOW, MAX_PARSE_WINDOW)
}

impl<S: Sequence + ?Sized> BytesReader<'_, S> {
    /// Parses a `T` in its default format from the bytes ahead of the cursor.
    ///
    /// On success the cursor moves past the parsed text. On failure returns `None` and leaves
    /// the cursor where it was.
    ///
    /// ```
    /// use seqbuf::BytesReader;
    ///
    /// let segments: [&[u8]; 2] = [b"40", b"00;"];
    /// let mut reader = BytesReader::new(&segments);
    ///
    /// assert_eq!(reader.try_parse::<u32>(), Some(4000));
    /// assert_eq!(reader.consumed(), 4);
    /// ```
    pub fn try_parse<T: Utf8Parse>(&mut self) -> Option<T> {
        self.try_parse_with(StandardFormat::DEFAULT)
    }

    /// Parses a `T` in the given format from the bytes ahead of the cursor.
    ///
    /// The value is parsed directly from the current segment if its text ends before the end of
    /// the segment. Otherwise the bytes ahead are gathered from the following segments into a
    /// scratch buffer and parsed from there.
    ///
    /// Text is only accepted if it is shorter than the parse window: `T::max_text_len(format) + 1`
    /// bytes, but no fewer than 256 and no more than 512. Longer text, such as an integer with
    /// hundreds of leading zeros, is rejected regardless of where the segments are split.
    ///
    /// On success the cursor moves past the parsed text. On failure returns `None` and leaves
    /// the cursor where it was.
    ///
    /// # Panics
    ///
    /// Panics if `T` does not support the format symbol.
    pub fn try_parse_with<T: Utf8Parse>(&mut self, format: StandardFormat) -> Option<T> {
        let unread = self.unread();
        let window = parse_window::<T>(format);

        if let Some((value, consumed)) = T::try_parse(unread, format)
            && consumed < unread.len()
            && consumed < window
        {
            self.index += consumed;
            self.consumed += consumed;
            return Some(value);
        }

        self.try_parse_buffered(format, window)
    }

    #[cold] // Most values do not straddle a segment boundary.
    fn try_parse_buffered<T: Utf8Parse>(&mut self, format: StandardFormat, window: usize) -> Option<T> {
        // The window plus one byte of lookahead.
        let mut scratch = [0_u8; MAX_PARSE_WINDOW + 1];
        let scratch = &mut scratch[..=window];
        let copied = self.copy_ahead(scratch);

        event!(
            Level::TRACE,
            message = "parsing across segment boundary",
            window,
            copied
        );

        let (value, consumed) = T::try_parse(&scratch[..copied], format)?;

        if consumed >= window {
            return None;
        }

        self.advance(consumed);
        Some(value)
    }

    /// Reads a number of type `T` in little-endian representation.
    ///
    /// Returns `None` and leaves the cursor where it was if fewer than `size_of::<T>()` bytes
    /// remain.
    ///
    /// ```
    /// use seqbuf::BytesReader;
    ///
    /// let segments: [&[u8]; 2] = [&[0x01, 0x02], &[0x03, 0x04]];
    /// let mut reader = BytesReader::new(&segments);
    ///
    /// assert_eq!(reader.try_read_le::<u32>(), Some(0x0403_0201));
    /// assert_eq!(reader.try_read_le::<u8>(), None);
    /// ```
    pub fn try_read_le<T: FromBytes>(&mut self) -> Option<T>
    where
        T::Bytes: Sized + Default,
    {
        self.try_read_num_bytes::<T>().map(|bytes| T::from_le_bytes(&bytes))
    }

    /// Reads a number of type `T` in big-endian representation.
    ///
    /// Returns `None` and leaves the cursor where it was if fewer than `size_of::<T>()` bytes
    /// remain.
    pub fn try_read_be<T: FromBytes>(&mut self) -> Option<T>
    where
        T::Bytes: Sized + Default,
    {
        self.try_read_num_bytes::<T>().map(|bytes| T::from_be_bytes(&bytes))
    }

    /// Reads an `i32` in the given byte order.
    pub fn try_read_i32(&mut self, little_endian: bool) -> Option<i32> {
        if little_endian {
            self.try_read_le()
        } else {
            self.try_read_be()
        }
    }

    fn try_read_num_bytes<T: FromBytes>(&mut self) -> Option<T::Bytes>
    where
        T::Bytes: Sized + Default,
    {
        let mut bytes = T::Bytes::default();
        let size = bytes.as_mut().len();

        if let Some(source) = self.unread().get(..size) {
            bytes.as_mut().copy_from_slice(source);
        } else if !self.fill_buffered(bytes.as_mut()) {
            return None;
        }

        self.advance(size);
        Some(bytes)
    }

    #[cold] // Most reads do not straddle a segment boundary.
    fn fill_buffered(&self, destination: &mut [u8]) -> bool {
        let copied = self.copy_ahead(destination);

        event!(
            Level::TRACE,
            message = "reading across segment boundary",
            size = destination.len(),
            copied
        );

        copied == destination.len()
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    #![allow(clippy::indexing_slicing, reason = "This is all fine in test code")]

    use jiff::Timestamp;
    use rstest::rstest;
    use testing_aids::assert_panic;
    use uuid::Uuid;

    use super::*;
    use crate::{Position, SliceReader};

    #[test]
    fn parse_within_segment() {
        let mut reader = SliceReader::from_slice(b"123,456");

        assert_eq!(reader.try_parse::<u16>(), Some(123));
        assert_eq!(reader.consumed(), 3);
        assert_eq!(reader.read_byte(), Some(b','));
    }

    #[test]
    fn parse_at_end_of_data() {
        let mut reader = SliceReader::from_slice(b"-17");

        assert_eq!(reader.try_parse::<i8>(), Some(-17));
        assert!(reader.is_empty());
    }

    #[test]
    fn parse_straddling_segments() {
        let segments: [&[u8]; 2] = [b"40", b"00"];
        let mut reader = BytesReader::new(&segments);

        assert_eq!(reader.try_parse::<u64>(), Some(4000));
        assert_eq!(reader.consumed(), 4);
        assert_eq!(reader.position(), Position::new(1, 2));
    }

    #[test]
    fn failed_parse_leaves_cursor() {
        let segments: [&[u8]; 2] = [b"x", b"12"];
        let mut reader = BytesReader::new(&segments);

        assert_eq!(reader.try_parse::<u32>(), None);
        assert_eq!(reader.consumed(), 0);
        assert_eq!(reader.try_peek(), Some(b'x'));
    }

    #[test]
    fn overflowing_text_is_rejected() {
        let segments: [&[u8]; 2] = [b"2", b"56"];
        let mut reader = BytesReader::new(&segments);

        assert_eq!(reader.try_parse::<u8>(), None);
        assert_eq!(reader.consumed(), 0);
    }

    #[test]
    fn leading_zeros_straddling_segments() {
        let segments: [&[u8]; 2] = [b"00", b"00012;"];
        let mut reader = BytesReader::new(&segments);

        assert_eq!(reader.try_parse::<u8>(), Some(12));
        assert_eq!(reader.consumed(), 5);
    }

    #[rstest]
    #[case(255, Some(7))]
    #[case(256, None)]
    #[case(300, None)]
    fn text_must_be_shorter_than_window(#[case] len: usize, #[case] expected: Option<u8>) {
        let mut text = vec![b'0'; len - 1];
        text.extend_from_slice(b"7;");

        let mut reader = SliceReader::from_slice(&text);
        assert_eq!(reader.try_parse::<u8>(), expected);

        let segments: [&[u8]; 2] = [&text[..3], &text[3..]];
        let mut reader = BytesReader::new(&segments);
        assert_eq!(reader.try_parse::<u8>(), expected);

        if expected.is_none() {
            assert_eq!(reader.consumed(), 0);
        }
    }

    #[test]
    fn window_widens_for_long_formats() {
        assert_eq!(parse_window::<u8>(StandardFormat::DEFAULT), 256);
        assert_eq!(parse_window::<f64>(StandardFormat::with_precision('F', 99)), 411);

        let text = format!("{:.99};", f64::MAX);
        let segments: [&[u8]; 2] = [&text.as_bytes()[..100], &text.as_bytes()[100..]];
        let mut reader = BytesReader::new(&segments);

        assert_eq!(reader.try_parse_with::<f64>(StandardFormat::with_precision('F', 99)), Some(f64::MAX));
        assert_eq!(reader.read_byte(), Some(b';'));
    }

    #[test]
    fn parse_with_format() {
        let segments: [&[u8]; 3] = [b"ff", b"", b"EE|"];
        let mut reader = BytesReader::new(&segments);

        assert_eq!(reader.try_parse_with::<u32>(StandardFormat::new('X')), Some(0xffee));
        assert_eq!(reader.read_byte(), Some(b'|'));
    }

    #[test]
    fn parse_other_types() {
        let segments: [&[u8]; 3] = [b"tr", b"ue 67e55044-10b1-426f-9247-", b"bb680e5fe0c8 2024-08-06T21:30:05Z"];
        let mut reader = BytesReader::new(&segments);

        assert_eq!(reader.try_parse::<bool>(), Some(true));
        reader.advance(1);
        assert_eq!(
            reader.try_parse::<Uuid>(),
            Some(Uuid::from_u128(0x67e5_5044_10b1_426f_9247_bb68_0e5f_e0c8))
        );
        reader.advance(1);
        assert_eq!(
            reader.try_parse_with::<Timestamp>(StandardFormat::new('O')),
            Some(Timestamp::from_second(1_722_979_805).unwrap())
        );
        assert!(reader.is_empty());
    }

    #[test]
    fn unsupported_format_panics() {
        let mut reader = SliceReader::from_slice(b"true");
        assert_panic!(_ = reader.try_parse_with::<bool>(StandardFormat::new('Q')));
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(3)]
    #[case(4)]
    fn binary_reads_at_any_split(#[case] split: usize) {
        let data = [0x12, 0x34, 0x56, 0x78, 0xAA];
        let segments: [&[u8]; 2] = [&data[..split], &data[split..]];

        let mut reader = BytesReader::new(&segments);
        assert_eq!(reader.try_read_be::<u32>(), Some(0x1234_5678));
        assert_eq!(reader.try_read_le::<u8>(), Some(0xAA));
        assert_eq!(reader.try_read_le::<u8>(), None);

        let mut reader = BytesReader::new(&segments);
        assert_eq!(reader.try_read_le::<u16>(), Some(0x3412));
        assert_eq!(reader.try_read_i32(true), None);
        assert_eq!(reader.consumed(), 2);
        assert_eq!(reader.try_read_i32(false), None);
    }

    #[test]
    fn read_i32_both_orders() {
        let data = [0xFF, 0xFF, 0xFF, 0xFE, 0x01, 0x00, 0x00, 0x00];
        let mut reader = SliceReader::from_slice(&data);

        assert_eq!(reader.try_read_i32(false), Some(-2));
        assert_eq!(reader.try_read_i32(true), Some(1));
    }

    #[test]
    fn read_floats() {
        let bytes = 1.5_f64.to_le_bytes();
        let mut reader = SliceReader::from_slice(&bytes);
        assert_eq!(reader.try_read_le::<f64>(), Some(1.5));
    }
}
