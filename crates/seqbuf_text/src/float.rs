// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Floating point codecs.
//!
//! * `G`, `g`, `R`, `r`: the shortest text that parses back to the same value. Magnitudes
//!   outside `[1e-5, 1e16)` use scientific notation.
//! * `F`, `f`: fixed point with `precision` fractional digits (2 by default).
//! * `E`, `e`: scientific notation with `precision` fractional digits (6 by default).
//!
//! Non-finite values render as `NaN`, `Infinity` and `-Infinity` regardless of the symbol.
//! Parsing accepts any of the above forms independent of the symbol used.

use std::fmt::{Display, LowerExp, UpperExp, Write};

use crate::ascii::{AsciiBuf, digit_run};
use crate::format::unsupported;
use crate::{StandardFormat, TextEncoding, Utf8Format, Utf8Parse};

// Sign, 309 integral digits of f64::MAX, the decimal point and up to 99 fractional digits.
const SCRATCH_LEN: usize = 512;

const DEFAULT_FIXED_PRECISION: u8 = 2;
const DEFAULT_EXPONENT_PRECISION: u8 = 6;

const NAN: &[u8] = b"NaN";
const INFINITY: &[u8] = b"Infinity";

fn render<T>(value: T, format: StandardFormat, type_name: &str) -> Option<AsciiBuf<SCRATCH_LEN>>
where
    T: Copy + Into<f64> + Display + UpperExp + LowerExp,
{
    let wide: f64 = value.into();
    let mut text = AsciiBuf::new();

    let symbol = format.symbol_or(b'G');
    if !matches!(symbol, b'G' | b'g' | b'R' | b'r' | b'F' | b'f' | b'E' | b'e') {
        unsupported(format, type_name);
    }

    if wide.is_nan() {
        text.extend(NAN);
        return Some(text);
    }

    if wide.is_infinite() {
        if wide.is_sign_negative() {
            text.push(b'-');
        }

        text.extend(INFINITY);
        return Some(text);
    }

    match symbol {
        b'F' | b'f' => {
            let precision = usize::from(format.precision_or(DEFAULT_FIXED_PRECISION));
            write!(text, "{value:.precision$}")
        }
        b'E' => {
            let precision = usize::from(format.precision_or(DEFAULT_EXPONENT_PRECISION));
            write!(text, "{value:.precision$E}")
        }
        b'e' => {
            let precision = usize::from(format.precision_or(DEFAULT_EXPONENT_PRECISION));
            write!(text, "{value:.precision$e}")
        }
        _ => {
            let magnitude = wide.abs();

            if magnitude == 0.0 || (1e-5..1e16).contains(&magnitude) {
                write!(text, "{value}")
            } else {
                write!(text, "{value:E}")
            }
        }
    }
    .ok()?;

    Some(text)
}

/// Length of the longest floating point token at the start of `source`, or `None` if there is none
/// or its exponent is cut off by the end of `source`.
fn scan(source: &[u8]) -> Option<usize> {
    if source.starts_with(NAN) {
        return Some(NAN.len());
    }

    let sign = usize::from(matches!(source.first(), Some(b'-' | b'+')));
    let unsigned = source.get(sign..)?;

    if unsigned.starts_with(INFINITY) {
        return Some(sign + INFINITY.len());
    }

    let integral = digit_run(unsigned);
    let mut len = integral;

    let mut fractional = 0;
    if unsigned.get(len) == Some(&b'.') {
        fractional = digit_run(unsigned.get(len + 1..)?);

        // A lone '.' after the digits is not part of the number.
        if integral > 0 || fractional > 0 {
            len += 1 + fractional;
        }
    }

    if integral == 0 && fractional == 0 {
        return None;
    }

    if matches!(unsigned.get(len), Some(b'e' | b'E')) {
        let exponent_sign = usize::from(matches!(unsigned.get(len + 1), Some(b'-' | b'+')));
        let exponent = unsigned.get(len + 1 + exponent_sign..).unwrap_or_default();

        // The exponent may continue past the end of the input.
        if exponent.is_empty() {
            return None;
        }

        let exponent_digits = digit_run(exponent);

        if exponent_digits > 0 {
            len += 1 + exponent_sign + exponent_digits;
        }
    }

    Some(sign + len)
}

fn parse<T: std::str::FromStr>(source: &[u8], format: StandardFormat, type_name: &str) -> Option<(T, usize)> {
    if !matches!(format.symbol_or(b'G'), b'G' | b'g' | b'R' | b'r' | b'F' | b'f' | b'E' | b'e') {
        unsupported(format, type_name);
    }

    let len = scan(source)?;
    let text = std::str::from_utf8(source.get(..len)?).ok()?;

    Some((text.parse().ok()?, len))
}

fn max_len(format: StandardFormat, round_trip_len: usize, max_integral_digits: usize, type_name: &str) -> usize {
    match format.symbol_or(b'G') {
        b'G' | b'g' | b'R' | b'r' => round_trip_len,
        b'F' | b'f' => 2 + max_integral_digits + usize::from(format.precision_or(DEFAULT_FIXED_PRECISION)),
        // Sign, leading digit, decimal point, exponent marker, exponent sign and three exponent digits.
        b'E' | b'e' => 8 + usize::from(format.precision_or(DEFAULT_EXPONENT_PRECISION)),
        _ => unsupported(format, type_name),
    }
}

macro_rules! float_codec {
    ($($t:ty => $round_trip_len:expr, $max_integral_digits:expr);*) => {$(
        impl Utf8Format for $t {
            fn try_format(&self, destination: &mut [u8], format: StandardFormat, encoding: TextEncoding) -> Option<usize> {
                render(*self, format, stringify!($t))?.encode(destination, encoding)
            }
        }

        impl Utf8Parse for $t {
            fn try_parse(source: &[u8], format: StandardFormat) -> Option<(Self, usize)> {
                parse(source, format, stringify!($t))
            }

            fn max_text_len(format: StandardFormat) -> usize {
                max_len(format, $round_trip_len, $max_integral_digits, stringify!($t))
            }
        }
    )*};
}

float_codec!(f32 => 16, 39; f64 => 26, 309);
