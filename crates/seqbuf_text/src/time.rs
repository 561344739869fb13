// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Timestamp codecs. Timestamps are always rendered in UTC.
//!
//! * `G`: `MM/dd/yyyy HH:mm:ss`
//! * `O`: ISO 8601 round-trip form `yyyy-MM-ddTHH:mm:ss[.fffffffff]Z`. The nine-digit fraction
//!   is only present when the timestamp has a sub-second part. Parsing also accepts one to nine
//!   fractional digits and a `+HH:MM`/`-HH:MM` offset, which is applied to produce UTC.
//! * `R`: RFC 1123 `ddd, dd MMM yyyy HH:mm:ss GMT`. This is 29 bytes for the years 0 through
//!   9999. Earlier years are written with a leading `-`, making the text 30 bytes long.

use jiff::Timestamp;
use jiff::civil::DateTime;
use jiff::tz::Offset;

use crate::ascii::{AsciiBuf, digit_run, fixed_digits};
use crate::format::unsupported;
use crate::{StandardFormat, TextEncoding, Utf8Format, Utf8Parse};

const SCRATCH_LEN: usize = 40;

const GENERAL_LEN: usize = 19;
const RFC1123_LEN: usize = 29;
const RFC1123_MAX_LEN: usize = RFC1123_LEN + 1;
// Year sign, date and time, nine fractional digits with their point and a numeric offset.
const ROUND_TRIP_MAX_LEN: usize = 1 + 19 + 10 + 6;

const DAY_NAMES: [&[u8; 3]; 7] = [b"Sun", b"Mon", b"Tue", b"Wed", b"Thu", b"Fri", b"Sat"];
const MONTH_NAMES: [&[u8; 3]; 12] = [
    b"Jan", b"Feb", b"Mar", b"Apr", b"May", b"Jun", b"Jul", b"Aug", b"Sep", b"Oct", b"Nov", b"Dec",
];

fn push_field(text: &mut AsciiBuf<SCRATCH_LEN>, value: impl Into<i64>, digits: usize) {
    text.push_decimal(value.into().unsigned_abs(), digits);
}

fn push_year(text: &mut AsciiBuf<SCRATCH_LEN>, year: i16) {
    if year < 0 {
        text.push(b'-');
    }

    push_field(text, year, 4);
}

fn push_time(text: &mut AsciiBuf<SCRATCH_LEN>, value: DateTime) {
    push_field(text, value.hour(), 2);
    text.push(b':');
    push_field(text, value.minute(), 2);
    text.push(b':');
    push_field(text, value.second(), 2);
}

fn render(timestamp: Timestamp, format: StandardFormat) -> AsciiBuf<SCRATCH_LEN> {
    let value = Offset::UTC.to_datetime(timestamp);
    let mut text = AsciiBuf::new();

    match format.symbol_or(b'G') {
        b'G' => {
            push_field(&mut text, value.month(), 2);
            text.push(b'/');
            push_field(&mut text, value.day(), 2);
            text.push(b'/');
            push_year(&mut text, value.year());
            text.push(b' ');
            push_time(&mut text, value);
        }
        b'O' | b'o' => {
            push_year(&mut text, value.year());
            text.push(b'-');
            push_field(&mut text, value.month(), 2);
            text.push(b'-');
            push_field(&mut text, value.day(), 2);
            text.push(b'T');
            push_time(&mut text, value);

            let nanos = value.subsec_nanosecond();
            if nanos != 0 {
                text.push(b'.');
                push_field(&mut text, nanos, 9);
            }

            text.push(b'Z');
        }
        b'R' | b'r' => {
            let weekday = usize::try_from(value.weekday().to_sunday_zero_offset()).unwrap_or_default();
            let month = usize::try_from(value.month() - 1).unwrap_or_default();

            text.extend(DAY_NAMES[weekday]);
            text.extend(b", ");
            push_field(&mut text, value.day(), 2);
            text.push(b' ');
            text.extend(MONTH_NAMES[month]);
            text.push(b' ');
            push_year(&mut text, value.year());
            text.push(b' ');
            push_time(&mut text, value);
            text.extend(b" GMT");
        }
        _ => unsupported(format, "Timestamp"),
    }

    text
}

/// Reads a fixed-width numeric field at `at` and narrows it to `T`.
fn field<T: TryFrom<u32>>(source: &[u8], at: usize, len: usize) -> Option<T> {
    T::try_from(fixed_digits(source.get(at..)?, len)?).ok()
}

fn literal(source: &[u8], at: usize, expected: &[u8]) -> Option<()> {
    (source.get(at..at + expected.len())? == expected).then_some(())
}

/// Parses `HH:mm:ss` at `at`.
fn time_fields(source: &[u8], at: usize) -> Option<(i8, i8, i8)> {
    let hour = field(source, at, 2)?;
    literal(source, at + 2, b":")?;
    let minute = field(source, at + 3, 2)?;
    literal(source, at + 5, b":")?;
    let second = field(source, at + 6, 2)?;

    Some((hour, minute, second))
}

fn parse_general(source: &[u8]) -> Option<(Timestamp, usize)> {
    let month = field(source, 0, 2)?;
    literal(source, 2, b"/")?;
    let day = field(source, 3, 2)?;
    literal(source, 5, b"/")?;
    let year = field(source, 6, 4)?;
    literal(source, 10, b" ")?;
    let (hour, minute, second) = time_fields(source, 11)?;

    let value = DateTime::new(year, month, day, hour, minute, second, 0).ok()?;
    Some((Offset::UTC.to_timestamp(value).ok()?, GENERAL_LEN))
}

fn parse_round_trip(source: &[u8]) -> Option<(Timestamp, usize)> {
    let negative = source.first() == Some(&b'-');
    let at = usize::from(negative);

    let year: i16 = field(source, at, 4)?;
    literal(source, at + 4, b"-")?;
    let month = field(source, at + 5, 2)?;
    literal(source, at + 7, b"-")?;
    let day = field(source, at + 8, 2)?;
    literal(source, at + 10, b"T")?;
    let (hour, minute, second) = time_fields(source, at + 11)?;

    let mut len = at + 19;
    let mut nanos = 0_i32;

    if source.get(len) == Some(&b'.') {
        let digits = digit_run(source.get(len + 1..)?);
        if digits == 0 || digits > 9 {
            return None;
        }

        let fraction: i32 = field(source, len + 1, digits)?;
        nanos = fraction * 10_i32.pow(u32::try_from(9 - digits).ok()?);
        len += 1 + digits;
    }

    let offset = match source.get(len)? {
        b'Z' => {
            len += 1;
            Offset::UTC
        }
        sign @ (b'+' | b'-') => {
            let hours: i32 = field(source, len + 1, 2)?;
            literal(source, len + 3, b":")?;
            let minutes: i32 = field(source, len + 4, 2)?;
            len += 6;

            let seconds = hours * 3600 + minutes * 60;
            Offset::from_seconds(if *sign == b'-' { -seconds } else { seconds }).ok()?
        }
        _ => return None,
    };

    let year = if negative { -year } else { year };
    let value = DateTime::new(year, month, day, hour, minute, second, nanos).ok()?;

    Some((offset.to_timestamp(value).ok()?, len))
}

fn parse_rfc1123(source: &[u8]) -> Option<(Timestamp, usize)> {
    let day_name = source.get(..3)?;
    let weekday = DAY_NAMES.iter().position(|name| name.as_slice() == day_name)?;
    literal(source, 3, b", ")?;
    let day = field(source, 5, 2)?;
    literal(source, 7, b" ")?;
    let month_name = source.get(8..11)?;
    let month = MONTH_NAMES.iter().position(|name| name.as_slice() == month_name)?;
    literal(source, 11, b" ")?;

    let negative = source.get(12) == Some(&b'-');
    let at = 12 + usize::from(negative);

    let year: i16 = field(source, at, 4)?;
    literal(source, at + 4, b" ")?;
    let (hour, minute, second) = time_fields(source, at + 5)?;
    literal(source, at + 13, b" GMT")?;

    let year = if negative { -year } else { year };
    let month = i8::try_from(month + 1).ok()?;
    let value = DateTime::new(year, month, day, hour, minute, second, 0).ok()?;

    if usize::try_from(value.weekday().to_sunday_zero_offset()).ok()? != weekday {
        return None;
    }

    Some((Offset::UTC.to_timestamp(value).ok()?, at + 17))
}

impl Utf8Format for Timestamp {
    fn try_format(&self, destination: &mut [u8], format: StandardFormat, encoding: TextEncoding) -> Option<usize> {
        render(*self, format).encode(destination, encoding)
    }
}

impl Utf8Parse for Timestamp {
    fn try_parse(source: &[u8], format: StandardFormat) -> Option<(Self, usize)> {
        match format.symbol_or(b'G') {
            b'G' => parse_general(source),
            b'O' | b'o' => parse_round_trip(source),
            b'R' | b'r' => parse_rfc1123(source),
            _ => unsupported(format, "Timestamp"),
        }
    }

    fn max_text_len(format: StandardFormat) -> usize {
        match format.symbol_or(b'G') {
            b'G' => GENERAL_LEN,
            b'O' | b'o' => ROUND_TRIP_MAX_LEN,
            b'R' | b'r' => RFC1123_MAX_LEN,
            _ => unsupported(format, "Timestamp"),
        }
    }
}
