// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Integer codecs.
//!
//! * `G`, `g`, `D`, `d`: decimal. The precision is the minimum number of digits, padded with
//!   leading zeros.
//! * `N`, `n`: decimal with `,` group separators followed by a `.` and as many zeros as the
//!   precision (2 by default).
//! * `X`, `x`: upper/lower case hexadecimal. The precision is the minimum number of digits.
//!   Negative values are rendered in two's complement at the width of the type.

use crate::ascii::{AsciiBuf, decimal_len, digit_run};
use crate::format::unsupported;
use crate::{StandardFormat, TextEncoding, Utf8Format, Utf8Parse};

// Sign, 20 digits, 6 separators, the decimal point and up to 99 fractional zeros.
const SCRATCH_LEN: usize = 128;

const DEFAULT_GROUPED_PRECISION: u8 = 2;

fn render(negative: bool, magnitude: u64, bits: u64, format: StandardFormat, type_name: &str) -> AsciiBuf<SCRATCH_LEN> {
    let mut text = AsciiBuf::new();

    match format.symbol_or(b'G') {
        b'G' | b'g' | b'D' | b'd' => {
            if negative {
                text.push(b'-');
            }

            text.push_decimal(magnitude, usize::from(format.precision_or(0)));
        }
        b'N' | b'n' => {
            if negative {
                text.push(b'-');
            }

            text.push_grouped(magnitude);

            let precision = format.precision_or(DEFAULT_GROUPED_PRECISION);
            if precision > 0 {
                text.push(b'.');
                text.push_repeated(b'0', usize::from(precision));
            }
        }
        b'X' => text.push_hex(bits, usize::from(format.precision_or(0)), true),
        b'x' => text.push_hex(bits, usize::from(format.precision_or(0)), false),
        _ => unsupported(format, type_name),
    }

    text
}

/// The parsed form of an integer before it is narrowed to its target type.
enum Parsed {
    Decimal { negative: bool, magnitude: u64 },
    Bits(u64),
}

fn parse(source: &[u8], format: StandardFormat, type_name: &str) -> Option<(Parsed, usize)> {
    match format.symbol_or(b'G') {
        b'G' | b'g' | b'D' | b'd' => parse_decimal(source, false),
        b'N' | b'n' => parse_decimal(source, true),
        b'X' | b'x' => parse_hex(source),
        _ => unsupported(format, type_name),
    }
}

fn parse_decimal(source: &[u8], grouped: bool) -> Option<(Parsed, usize)> {
    let (negative, mut index) = match source.first() {
        Some(b'-') => (true, 1),
        Some(b'+') => (false, 1),
        _ => (false, 0),
    };

    let mut magnitude: u64 = 0;
    let mut digits = 0;

    while let Some(&byte) = source.get(index) {
        if byte.is_ascii_digit() {
            magnitude = magnitude.checked_mul(10)?.checked_add(u64::from(byte - b'0'))?;
            digits += 1;
        } else {
            // Separators are only accepted between digits.
            let separator = grouped && byte == b',' && digits > 0 && source.get(index + 1).is_some_and(u8::is_ascii_digit);

            if !separator {
                break;
            }
        }

        index += 1;
    }

    if digits == 0 {
        return None;
    }

    if grouped && source.get(index) == Some(&b'.') {
        let zeros = source.get(index + 1..).map_or(0, |rest| rest.iter().take_while(|&&byte| byte == b'0').count());

        if zeros > 0 {
            index += 1 + zeros;

            // A fraction that is not zero cannot be represented by an integer.
            if source.get(index).is_some_and(u8::is_ascii_digit) {
                return None;
            }
        }
    }

    Some((Parsed::Decimal { negative, magnitude }, index))
}

fn parse_hex(source: &[u8]) -> Option<(Parsed, usize)> {
    let mut bits: u64 = 0;
    let mut index = 0;

    while let Some(nibble) = source.get(index).and_then(|&byte| char::from(byte).to_digit(16)) {
        if bits >> 60 != 0 {
            return None;
        }

        bits = (bits << 4) | u64::from(nibble);
        index += 1;
    }

    (index > 0).then_some((Parsed::Bits(bits), index))
}

/// Widest text for an integer whose largest magnitude has `digits` decimal digits.
fn max_len(format: StandardFormat, digits: usize, bits: u32, type_name: &str) -> usize {
    let precision = usize::from(format.precision_or(0));

    match format.symbol_or(b'G') {
        b'G' | b'g' | b'D' | b'd' => 1 + digits.max(precision),
        b'N' | b'n' => {
            let fraction = match format.precision_or(DEFAULT_GROUPED_PRECISION) {
                0 => 0,
                precision => 1 + usize::from(precision),
            };

            1 + digits + (digits - 1) / 3 + fraction
        }
        b'X' | b'x' => (bits as usize / 4).max(precision),
        _ => unsupported(format, type_name),
    }
}

macro_rules! unsigned_codec {
    ($($t:ty),*) => {$(
        impl Utf8Format for $t {
            fn try_format(&self, destination: &mut [u8], format: StandardFormat, encoding: TextEncoding) -> Option<usize> {
                let magnitude = u64::try_from(*self).ok()?;
                render(false, magnitude, magnitude, format, stringify!($t)).encode(destination, encoding)
            }
        }

        impl Utf8Parse for $t {
            fn try_parse(source: &[u8], format: StandardFormat) -> Option<(Self, usize)> {
                let (parsed, consumed) = parse(source, format, stringify!($t))?;

                let value = match parsed {
                    Parsed::Decimal { negative: true, magnitude } => (magnitude == 0).then_some(0)?,
                    Parsed::Decimal { negative: false, magnitude } | Parsed::Bits(magnitude) => Self::try_from(magnitude).ok()?,
                };

                Some((value, consumed))
            }

            fn max_text_len(format: StandardFormat) -> usize {
                let max = u64::try_from(Self::MAX).unwrap_or(u64::MAX);
                max_len(format, decimal_len(max), Self::BITS, stringify!($t))
            }
        }
    )*};
}

macro_rules! signed_codec {
    ($($t:ty => $u:ty),*) => {$(
        impl Utf8Format for $t {
            fn try_format(&self, destination: &mut [u8], format: StandardFormat, encoding: TextEncoding) -> Option<usize> {
                let magnitude = u64::try_from(self.unsigned_abs()).ok()?;
                let bits = u64::try_from(self.cast_unsigned()).ok()?;
                render(self.is_negative(), magnitude, bits, format, stringify!($t)).encode(destination, encoding)
            }
        }

        impl Utf8Parse for $t {
            fn try_parse(source: &[u8], format: StandardFormat) -> Option<(Self, usize)> {
                let (parsed, consumed) = parse(source, format, stringify!($t))?;

                let value = match parsed {
                    Parsed::Decimal { negative: false, magnitude } => Self::try_from(magnitude).ok()?,
                    Parsed::Decimal { negative: true, magnitude } => {
                        let magnitude = <$u>::try_from(magnitude).ok()?;

                        if magnitude > Self::MIN.unsigned_abs() {
                            return None;
                        }

                        magnitude.cast_signed().wrapping_neg()
                    }
                    Parsed::Bits(bits) => <$u>::try_from(bits).ok()?.cast_signed(),
                };

                Some((value, consumed))
            }

            fn max_text_len(format: StandardFormat) -> usize {
                let max = u64::try_from(Self::MIN.unsigned_abs()).unwrap_or(u64::MAX);
                max_len(format, decimal_len(max), Self::BITS, stringify!($t))
            }
        }
    )*};
}

unsigned_codec!(u8, u16, u32, u64, usize);
signed_codec!(i8 => u8, i16 => u16, i32 => u32, i64 => u64, isize => usize);

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    #![allow(clippy::indexing_slicing, reason = "This is all fine in test code")]

    use rstest::rstest;
    use testing_aids::assert_panic;

    use super::*;

    fn format<T: Utf8Format>(value: T, format: &str) -> String {
        let mut buffer = [0_u8; 256];
        let written = value
            .try_format(&mut buffer, format.parse().unwrap(), TextEncoding::Utf8)
            .unwrap();
        String::from_utf8(buffer[..written].to_vec()).unwrap()
    }

    fn parse_with<T: Utf8Parse>(text: &str, format: &str) -> Option<(T, usize)> {
        T::try_parse(text.as_bytes(), format.parse().unwrap())
    }

    #[rstest]
    #[case(0_i64, "", "0")]
    #[case(-1_i64, "G", "-1")]
    #[case(42_i64, "D5", "00042")]
    #[case(-42_i64, "d4", "-0042")]
    #[case(i64::MIN, "D", "-9223372036854775808")]
    #[case(1_234_567_i64, "N", "1,234,567.00")]
    #[case(-1_234_i64, "N0", "-1,234")]
    #[case(999_i64, "n1", "999.0")]
    #[case(255_i64, "X", "FF")]
    #[case(255_i64, "x4", "00ff")]
    #[case(-1_i64, "X", "FFFFFFFFFFFFFFFF")]
    fn format_i64(#[case] value: i64, #[case] format_text: &str, #[case] expected: &str) {
        assert_eq!(format(value, format_text), expected);
    }

    #[test]
    fn format_narrow_types() {
        assert_eq!(format(u8::MAX, ""), "255");
        assert_eq!(format(-1_i8, "X"), "FF");
        assert_eq!(format(i16::MIN, "x"), "8000");
        assert_eq!(format(u32::MAX, "N0"), "4,294,967,295");
        assert_eq!(format(u64::MAX, "G"), "18446744073709551615");
        assert_eq!(format(usize::MAX, "X").len(), usize::BITS as usize / 4);
    }

    #[test]
    fn format_into_small_destination_fails() {
        let mut buffer = [0_u8; 4];
        assert_eq!(format_with_buffer(12345_u32, &mut buffer), None);
        assert_eq!(format_with_buffer(1234_u32, &mut buffer), Some(4));
    }

    fn format_with_buffer(value: u32, buffer: &mut [u8]) -> Option<usize> {
        value.try_format(buffer, StandardFormat::DEFAULT, TextEncoding::Utf8)
    }

    #[test]
    fn format_utf16() {
        let mut buffer = [0_u8; 8];
        let written = (-7_i32)
            .try_format(&mut buffer, StandardFormat::DEFAULT, TextEncoding::Utf16)
            .unwrap();
        assert_eq!(&buffer[..written], &[b'-', 0, b'7', 0]);
    }

    #[test]
    fn parse_decimal_forms() {
        assert_eq!(parse_with::<u32>("4000", ""), Some((4000, 4)));
        assert_eq!(parse_with::<u32>("+12x", ""), Some((12, 3)));
        assert_eq!(parse_with::<i32>("-2147483648", "D"), Some((i32::MIN, 11)));
        assert_eq!(parse_with::<i32>("0042", "D"), Some((42, 4)));
        assert_eq!(parse_with::<u64>("18446744073709551615", ""), Some((u64::MAX, 20)));
        assert_eq!(parse_with::<u8>("-0", ""), Some((0, 2)));
    }

    #[test]
    fn parse_decimal_rejects() {
        assert_eq!(parse_with::<u32>("", ""), None);
        assert_eq!(parse_with::<u32>("-", ""), None);
        assert_eq!(parse_with::<u32>("abc", ""), None);
        assert_eq!(parse_with::<u8>("256", ""), None);
        assert_eq!(parse_with::<u8>("-1", ""), None);
        assert_eq!(parse_with::<i8>("-129", ""), None);
        assert_eq!(parse_with::<i8>("128", ""), None);
        assert_eq!(parse_with::<u64>("18446744073709551616", ""), None);
    }

    #[test]
    fn parse_grouped() {
        assert_eq!(parse_with::<i32>("1,234,567.00", "N"), Some((1_234_567, 12)));
        assert_eq!(parse_with::<i32>("-1,234", "N"), Some((-1234, 6)));
        assert_eq!(parse_with::<u32>("12,", "N"), Some((12, 2)));
        assert_eq!(parse_with::<u32>("12.x", "N"), Some((12, 2)));
        assert_eq!(parse_with::<u32>(",12", "N"), None);
        assert_eq!(parse_with::<u32>("1.05", "N"), None);
    }

    #[test]
    fn parse_hex_forms() {
        assert_eq!(parse_with::<u32>("BEEF", "X"), Some((0xBEEF, 4)));
        assert_eq!(parse_with::<u32>("beefZ", "x"), Some((0xBEEF, 4)));
        assert_eq!(parse_with::<i8>("FF", "X"), Some((-1, 2)));
        assert_eq!(parse_with::<i16>("8000", "X"), Some((i16::MIN, 4)));
        assert_eq!(parse_with::<u8>("100", "X"), None);
        assert_eq!(parse_with::<u64>("0000FFFFFFFFFFFFFFFF", "X"), Some((u64::MAX, 20)));
        assert_eq!(parse_with::<u64>("1FFFFFFFFFFFFFFFF", "X"), None);
        assert_eq!(parse_with::<u32>("G", "X"), None);
    }

    #[test]
    fn round_trips_at_boundaries() {
        fn check<T>(values: &[T])
        where
            T: Utf8Format + Utf8Parse + Copy + PartialEq + std::fmt::Debug,
        {
            for format_text in ["G", "D", "N", "N0", "X", "x8"] {
                for &value in values {
                    let text = format(value, format_text);
                    let parsed = parse_with::<T>(&text, format_text).unwrap();
                    assert_eq!(parsed, (value, text.len()), "{format_text} {text}");
                }
            }
        }

        check(&[0_u8, 1, u8::MAX]);
        check(&[0_u16, 1, u16::MAX]);
        check(&[0_u32, 1, 60_000, u32::MAX]);
        check(&[0_u64, 1, 60_000_000_000_000_000, u64::MAX]);
        check(&[0_usize, usize::MAX]);
        check(&[0_i8, -1, i8::MIN, i8::MAX]);
        check(&[0_i16, -1, i16::MIN, i16::MAX]);
        check(&[0_i32, -1, i32::MIN, i32::MAX]);
        check(&[0_i64, -1, i64::MIN, i64::MAX]);
        check(&[0_isize, -1, isize::MIN, isize::MAX]);
    }

    #[test]
    fn max_text_len_covers_widest_values() {
        assert_eq!(u64::max_text_len(StandardFormat::DEFAULT), 21);
        assert_eq!(i64::max_text_len(StandardFormat::DEFAULT), 20);
        assert_eq!(u8::max_text_len(StandardFormat::new('X')), 2);
        assert_eq!(u8::max_text_len(StandardFormat::with_precision('X', 6)), 6);
        assert_eq!(u32::max_text_len(StandardFormat::with_precision('D', 30)), 31);

        assert!(format(i64::MIN, "N").len() <= i64::max_text_len(StandardFormat::new('N')));
        assert!(format(u64::MAX, "N5").len() <= u64::max_text_len(StandardFormat::with_precision('N', 5)));
    }

    #[test]
    fn unsupported_symbol_panics() {
        assert_panic!(_ = format(5_u32, "Q"));
        assert_panic!(_ = parse_with::<i32>("5", "E"));
        assert_panic!(_ = u16::max_text_len(StandardFormat::new('R')));
    }
}
