// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Stack scratch space that codecs render ASCII text into before it is expanded to the
//! target encoding, plus the digit helpers shared by the codecs.

use std::fmt;

use crate::TextEncoding;

/// Fixed-capacity ASCII text.
///
/// Each codec sizes its scratch for the widest representation it can produce, so running
/// out of room is an internal error, not a data error.
pub(crate) struct AsciiBuf<const N: usize> {
    bytes: [u8; N],
    len: usize,
}

impl<const N: usize> AsciiBuf<N> {
    pub(crate) const fn new() -> Self {
        Self { bytes: [0; N], len: 0 }
    }

    pub(crate) fn push(&mut self, byte: u8) {
        let slot = self
            .bytes
            .get_mut(self.len)
            .expect("scratch is sized for the widest representation of the value");
        *slot = byte;
        self.len += 1;
    }

    pub(crate) fn extend(&mut self, bytes: &[u8]) {
        let end = self.len + bytes.len();
        self.bytes
            .get_mut(self.len..end)
            .expect("scratch is sized for the widest representation of the value")
            .copy_from_slice(bytes);
        self.len = end;
    }

    pub(crate) fn push_repeated(&mut self, byte: u8, count: usize) {
        for _ in 0..count {
            self.push(byte);
        }
    }

    /// Appends the decimal digits of `value`, zero-padded to at least `min_digits`.
    pub(crate) fn push_decimal(&mut self, value: u64, min_digits: usize) {
        let mut digits = [0_u8; MAX_DECIMAL_DIGITS];
        let digits = decimal_digits(value, &mut digits);

        self.push_repeated(b'0', min_digits.saturating_sub(digits.len()));
        self.extend(digits);
    }

    /// Appends the decimal digits of `value` with a `,` between every group of three.
    pub(crate) fn push_grouped(&mut self, value: u64) {
        let mut digits = [0_u8; MAX_DECIMAL_DIGITS];
        let digits = decimal_digits(value, &mut digits);

        for (index, &digit) in digits.iter().enumerate() {
            if index > 0 && (digits.len() - index) % 3 == 0 {
                self.push(b',');
            }

            self.push(digit);
        }
    }

    /// Appends the hexadecimal digits of `value`, zero-padded to at least `min_digits`.
    pub(crate) fn push_hex(&mut self, value: u64, min_digits: usize, uppercase: bool) {
        let alphabet = if uppercase { UPPER_HEX } else { LOWER_HEX };

        let significant = (u64::BITS - value.leading_zeros()).div_ceil(4).max(1) as usize;
        self.push_repeated(b'0', min_digits.saturating_sub(significant));

        for nibble in (0..significant).rev() {
            #[expect(clippy::cast_possible_truncation, reason = "a single nibble")]
            let digit = ((value >> (nibble * 4)) & 0xF) as usize;
            self.push(alphabet[digit]);
        }
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Copies the text to `destination` in the given encoding.
    pub(crate) fn encode(&self, destination: &mut [u8], encoding: TextEncoding) -> Option<usize> {
        encoding.encode_ascii(self.as_bytes(), destination)
    }
}

impl<const N: usize> fmt::Write for AsciiBuf<N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let end = self.len + s.len();
        let target = self.bytes.get_mut(self.len..end).ok_or(fmt::Error)?;
        target.copy_from_slice(s.as_bytes());
        self.len = end;
        Ok(())
    }
}

pub(crate) const MAX_DECIMAL_DIGITS: usize = 20;

const UPPER_HEX: &[u8; 16] = b"0123456789ABCDEF";
const LOWER_HEX: &[u8; 16] = b"0123456789abcdef";

/// Renders `value` into the tail of `buffer` and returns the digits.
#[cfg_attr(test, mutants::skip)] // Mutating the division can cause infinite loops.
fn decimal_digits(mut value: u64, buffer: &mut [u8; MAX_DECIMAL_DIGITS]) -> &[u8] {
    let mut start = MAX_DECIMAL_DIGITS;

    loop {
        start -= 1;
        #[expect(clippy::cast_possible_truncation, reason = "a single decimal digit")]
        let digit = (value % 10) as u8;
        buffer[start] = b'0' + digit;
        value /= 10;

        if value == 0 {
            return &buffer[start..];
        }
    }
}

/// Number of decimal digits needed to render `value`.
#[cfg_attr(test, mutants::skip)] // Mutating the division can cause infinite loops.
pub(crate) const fn decimal_len(value: u64) -> usize {
    let mut len = 1;
    let mut rest = value / 10;

    while rest > 0 {
        len += 1;
        rest /= 10;
    }

    len
}

/// Counts the ASCII digits at the start of `source`.
pub(crate) fn digit_run(source: &[u8]) -> usize {
    source.iter().take_while(|byte| byte.is_ascii_digit()).count()
}

/// Parses exactly `len` ASCII digits from the start of `source`.
pub(crate) fn fixed_digits(source: &[u8], len: usize) -> Option<u32> {
    let digits = source.get(..len)?;

    digits.iter().try_fold(0_u32, |acc, &byte| {
        byte.is_ascii_digit().then(|| acc * 10 + u32::from(byte - b'0'))
    })
}

/// Whether `source` starts with `expected` under ASCII case folding.
pub(crate) fn starts_with_ignore_case(source: &[u8], expected: &[u8]) -> bool {
    source
        .get(..expected.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(expected))
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use std::fmt::Write;

    use super::*;

    #[test]
    fn decimal_padding() {
        let mut text = AsciiBuf::<32>::new();
        text.push_decimal(42, 5);
        text.push(b' ');
        text.push_decimal(u64::MAX, 0);

        assert_eq!(text.as_bytes(), b"00042 18446744073709551615");
    }

    #[test]
    fn grouping() {
        for (value, expected) in [
            (0_u64, "0"),
            (999, "999"),
            (1000, "1,000"),
            (1_234_567, "1,234,567"),
            (u64::MAX, "18,446,744,073,709,551,615"),
        ] {
            let mut text = AsciiBuf::<32>::new();
            text.push_grouped(value);
            assert_eq!(text.as_bytes(), expected.as_bytes());
        }
    }

    #[test]
    fn hex() {
        let mut text = AsciiBuf::<64>::new();
        text.push_hex(0, 0, true);
        text.push(b' ');
        text.push_hex(0xBEEF, 8, true);
        text.push(b' ');
        text.push_hex(u64::MAX, 0, false);

        assert_eq!(text.as_bytes(), b"0 0000BEEF ffffffffffffffff");
    }

    #[test]
    fn fmt_write_overflow_is_an_error() {
        let mut text = AsciiBuf::<4>::new();
        write!(text, "1234").unwrap();
        write!(text, "5").unwrap_err();
        assert_eq!(text.as_bytes(), b"1234");
    }

    #[test]
    fn digit_helpers() {
        assert_eq!(decimal_len(0), 1);
        assert_eq!(decimal_len(9), 1);
        assert_eq!(decimal_len(10), 2);
        assert_eq!(decimal_len(u64::MAX), 20);

        assert_eq!(digit_run(b"123abc"), 3);
        assert_eq!(digit_run(b"abc"), 0);

        assert_eq!(fixed_digits(b"2024-", 4), Some(2024));
        assert_eq!(fixed_digits(b"20x4", 4), None);
        assert_eq!(fixed_digits(b"20", 4), None);

        assert!(starts_with_ignore_case(b"TrUe!", b"true"));
        assert!(!starts_with_ignore_case(b"tru", b"true"));
    }
}
