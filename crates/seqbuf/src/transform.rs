// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! In-place transformations applied by [`BufferWriter::write_with`][crate::BufferWriter::write_with]
//! to freshly written data.

/// The outcome of a [`Transformation`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransformStatus {
    /// The data was transformed and now occupies this many bytes at the start of the buffer.
    Done(usize),

    /// The transformed data would not fit in the buffer.
    DestinationTooSmall,

    /// The data cannot be transformed.
    InvalidData,
}

/// Rewrites data in place.
///
/// The data occupies `buffer[..data_len]`; the rest of the buffer is free space the
/// transformation may expand into. A transformation that reports anything but
/// [`TransformStatus::Done`] may leave the buffer in any state.
pub trait Transformation {
    /// Transforms `buffer[..data_len]` and reports the new length.
    fn transform(&self, buffer: &mut [u8], data_len: usize) -> TransformStatus;
}

impl<T: Transformation + ?Sized> Transformation for &T {
    fn transform(&self, buffer: &mut [u8], data_len: usize) -> TransformStatus {
        (**self).transform(buffer, data_len)
    }
}

/// Changes the case of ASCII letters. Other bytes are left alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AsciiCase {
    /// `a-z` become `A-Z`.
    Upper,

    /// `A-Z` become `a-z`.
    Lower,
}

impl Transformation for AsciiCase {
    fn transform(&self, buffer: &mut [u8], data_len: usize) -> TransformStatus {
        let Some(data) = buffer.get_mut(..data_len) else {
            return TransformStatus::InvalidData;
        };

        match self {
            Self::Upper => data.make_ascii_uppercase(),
            Self::Lower => data.make_ascii_lowercase(),
        }

        TransformStatus::Done(data_len)
    }
}

const UPPER_DIGITS: &[u8; 16] = b"0123456789ABCDEF";
const LOWER_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Replaces every byte with its two hexadecimal digits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HexEncoding {
    upper_case: bool,
}

impl HexEncoding {
    /// Encodes with `0-9A-F`.
    #[must_use]
    pub const fn upper() -> Self {
        Self { upper_case: true }
    }

    /// Encodes with `0-9a-f`.
    #[must_use]
    pub const fn lower() -> Self {
        Self { upper_case: false }
    }
}

impl Transformation for HexEncoding {
    fn transform(&self, buffer: &mut [u8], data_len: usize) -> TransformStatus {
        let Some(encoded_len) = data_len.checked_mul(2) else {
            return TransformStatus::DestinationTooSmall;
        };

        if encoded_len > buffer.len() {
            return TransformStatus::DestinationTooSmall;
        }

        let digits = if self.upper_case { UPPER_DIGITS } else { LOWER_DIGITS };

        // Back to front, so no byte is overwritten before it has been encoded.
        for index in (0..data_len).rev() {
            let byte = buffer[index];
            buffer[index * 2] = digits[usize::from(byte >> 4)];
            buffer[index * 2 + 1] = digits[usize::from(byte & 0x0F)];
        }

        TransformStatus::Done(encoded_len)
    }
}

/// Escapes every byte outside the RFC 3986 unreserved set (`A-Z a-z 0-9 - . _ ~`) as `%XX`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PercentEncoding;

const fn is_unreserved(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~')
}

impl Transformation for PercentEncoding {
    fn transform(&self, buffer: &mut [u8], data_len: usize) -> TransformStatus {
        let Some(data) = buffer.get(..data_len) else {
            return TransformStatus::InvalidData;
        };

        let escaped = data.iter().filter(|&&byte| !is_unreserved(byte)).count();
        let encoded_len = data_len + escaped * 2;

        if encoded_len > buffer.len() {
            return TransformStatus::DestinationTooSmall;
        }

        let mut cursor = encoded_len;

        for index in (0..data_len).rev() {
            let byte = buffer[index];

            if is_unreserved(byte) {
                cursor -= 1;
                buffer[cursor] = byte;
            } else {
                cursor -= 3;
                buffer[cursor] = b'%';
                buffer[cursor + 1] = UPPER_DIGITS[usize::from(byte >> 4)];
                buffer[cursor + 2] = UPPER_DIGITS[usize::from(byte & 0x0F)];
            }
        }

        debug_assert_eq!(cursor, 0);

        TransformStatus::Done(encoded_len)
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    #![allow(clippy::indexing_slicing, reason = "This is all fine in test code")]

    use rstest::rstest;

    use super::*;

    fn run(transformation: &dyn Transformation, data: &[u8], capacity: usize) -> Result<Vec<u8>, TransformStatus> {
        let mut buffer = vec![0_u8; capacity];
        buffer[..data.len()].copy_from_slice(data);

        match transformation.transform(&mut buffer, data.len()) {
            TransformStatus::Done(len) => Ok(buffer[..len].to_vec()),
            other => Err(other),
        }
    }

    #[rstest]
    #[case(AsciiCase::Upper, b"Hello, w\xC3\xB6rld", b"HELLO, W\xC3\xB6RLD")]
    #[case(AsciiCase::Lower, b"MiXeD 123", b"mixed 123")]
    fn ascii_case(#[case] case: AsciiCase, #[case] input: &[u8], #[case] expected: &[u8]) {
        assert_eq!(run(&case, input, input.len()).unwrap(), expected);
    }

    #[test]
    fn hex_encoding_expands_in_place() {
        assert_eq!(run(&HexEncoding::upper(), b"\x01\xAB\xff", 6).unwrap(), b"01ABFF");
        assert_eq!(run(&HexEncoding::lower(), b"\x01\xAB\xff", 8).unwrap(), b"01abff");
        assert_eq!(run(&HexEncoding::lower(), b"", 0).unwrap(), b"");
        assert_eq!(
            run(&HexEncoding::upper(), b"abc", 5),
            Err(TransformStatus::DestinationTooSmall)
        );
    }

    #[test]
    fn percent_encoding() {
        assert_eq!(run(&PercentEncoding, b"a b/c~d", 16).unwrap(), b"a%20b%2Fc~d");
        assert_eq!(run(&PercentEncoding, b"\xE2\x82\xAC", 9).unwrap(), b"%E2%82%AC");
        assert_eq!(run(&PercentEncoding, b"safe-._~", 8).unwrap(), b"safe-._~");
        assert_eq!(run(&PercentEncoding, b"a b", 4), Err(TransformStatus::DestinationTooSmall));
    }

    #[test]
    fn data_longer_than_buffer_is_invalid() {
        let mut buffer = [0_u8; 2];

        assert_eq!(AsciiCase::Upper.transform(&mut buffer, 3), TransformStatus::InvalidData);
        assert_eq!(PercentEncoding.transform(&mut buffer, 3), TransformStatus::InvalidData);
    }
}
