// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![allow(missing_docs, reason = "test code")]

//! Reading must give the same answer wherever the segment boundaries fall.

use std::fmt::Debug;

use jiff::Timestamp;
use seqbuf::{BytesReader, Sequence, SliceReader, sequence};
use seqbuf_text::StandardFormat;
use testing_aids::{segmentations, split_points};
use uuid::Uuid;

/// What a reader observed, independent of how the input was segmented.
#[derive(Debug, PartialEq)]
struct Outcome<T> {
    value: Option<T>,
    consumed: usize,
    rest: Vec<u8>,
}

fn rest<S: Sequence + ?Sized>(reader: &BytesReader<'_, S>) -> Vec<u8> {
    let mut copy = reader.clone();
    let mut rest = Vec::new();

    while let Some(byte) = copy.read_byte() {
        rest.push(byte);
    }

    rest
}

fn observe<T, S: Sequence + ?Sized>(
    sequence: &S,
    read: impl Fn(&mut BytesReader<'_, S>) -> Option<T>,
) -> Outcome<T> {
    let mut reader = BytesReader::new(sequence);
    let value = read(&mut reader);

    Outcome {
        value,
        consumed: reader.consumed(),
        rest: rest(&reader),
    }
}

fn assert_invariant<T: PartialEq + Debug>(data: &[u8], read: impl Fn(&mut BytesReader<'_, Vec<&[u8]>>) -> Option<T>) {
    let whole = vec![data];
    let expected = observe(&whole, &read);

    for segments in segmentations(data) {
        let actual = observe(&segments, &read);
        assert_eq!(actual, expected, "segments: {segments:?}");
    }
}

#[test]
fn delimiter_search() {
    testing_aids::log_to_stdout();

    let data = b"GET /index.html HTTP/1.1\r\nHost: x\r\n";

    assert_invariant(data, |reader| reader.read_range(b' ').map(|_| ()));

    assert_invariant(data, |reader| {
        let start = reader.consumed();
        reader.read_range_span(b"\r\n")?;
        Some(reader.consumed() - start)
    });

    assert_invariant(data, |reader| {
        reader.read_range_span(b"\r\nHost")?;
        Some(())
    });
}

#[test]
fn failed_search_leaves_cursor_alone() {
    let data = b"abc\rdef\r";

    assert_invariant(data, |reader| {
        reader.advance(1);
        reader.read_range_span(b"\r\n").map(|_| ())
    });

    assert_invariant(data, |reader| reader.advance_to_delimiter(b'x').map(|_| ()));
}

#[test]
fn delimiter_range_content() {
    let data = b"key=value;other=thing;";

    for segments in segmentations(data) {
        let mut reader = BytesReader::new(&segments);
        let mut fields = Vec::new();

        while let Some(range) = reader.read_range_span(b";") {
            fields.push(sequence::to_vec(&segments, range));
        }

        assert_eq!(fields, [&b"key=value"[..], b"other=thing"], "segments: {segments:?}");
    }
}

#[test]
fn numeric_parse() {
    assert_invariant(b"4000,", |reader| reader.try_parse::<u32>());
    assert_invariant(b"-1234567890123", |reader| reader.try_parse::<i64>());
    assert_invariant(b"18446744073709551615 rest", |reader| reader.try_parse::<u64>());
    assert_invariant(b"3.25e2;", |reader| reader.try_parse::<f64>());
    assert_invariant(b"true!", |reader| reader.try_parse::<bool>());
    assert_invariant(b"x123", |reader| reader.try_parse::<u32>());
}

#[test]
fn hex_parse() {
    let hex = StandardFormat::new('X');

    assert_invariant(b"ffEE|", |reader| reader.try_parse_with::<u32>(hex));
    assert_invariant(b"FFFFFFFFFFFFFFFF;", |reader| reader.try_parse_with::<i64>(hex));
    assert_invariant(b"1FFFFFFFFFFFFFFFF;", |reader| reader.try_parse_with::<u64>(hex));
    assert_invariant(b"00000000000000000000000000000000000000ab,", |reader| reader.try_parse_with::<u8>(hex));
}

#[test]
fn grouped_parse() {
    let grouped = StandardFormat::new('N');

    assert_invariant(b"1,234,567.00;", |reader| reader.try_parse_with::<i32>(grouped));
    assert_invariant(b"-12,345,", |reader| reader.try_parse_with::<i64>(grouped));

    // Separators land at every offset around the end of the parse window.
    for leading in [b"0".as_slice(), b"00", b"000", b"0000"] {
        let mut long = leading.to_vec();
        long.extend(b",000".repeat(70));
        long.push(b';');
        assert_invariant(&long, |reader| reader.try_parse_with::<u64>(grouped));
    }
}

/// An integer of `len` bytes with leading zeros, followed by a delimiter.
fn zero_padded(len: usize) -> Vec<u8> {
    let mut text = vec![b'0'; len - 2];
    text.extend_from_slice(b"12;");
    text
}

#[test]
fn zero_padded_parse() {
    assert_invariant(b"0000012;", |reader| reader.try_parse::<u8>());
    assert_invariant(b"-000000000000000000000000000042 ", |reader| reader.try_parse::<i16>());

    for len in [21, 255, 256, 300] {
        let text = zero_padded(len);
        assert_invariant(&text, |reader| reader.try_parse::<u64>());
    }

    let text = zero_padded(255);
    let mut reader = SliceReader::from_slice(&text);
    assert_eq!(reader.try_parse::<u64>(), Some(12));

    let text = zero_padded(256);
    let mut reader = SliceReader::from_slice(&text);
    assert_eq!(reader.try_parse::<u64>(), None);
}

#[test]
fn long_float_parse() {
    let mut tiny = b"0.".to_vec();
    tiny.extend(vec![b'0'; 131]);
    tiny.extend_from_slice(b"1;");
    assert_invariant(&tiny, |reader| reader.try_parse::<f64>());

    let mut reader = SliceReader::from_slice(&tiny);
    assert_eq!(reader.try_parse::<f64>(), Some(1e-132));

    let fixed = StandardFormat::with_precision('F', 99);
    let widest = format!("{:.99} ", -f64::MAX);
    assert_invariant(widest.as_bytes(), |reader| reader.try_parse_with::<f64>(fixed));

    assert_invariant(b"-1.5E-07x", |reader| reader.try_parse_with::<f64>(StandardFormat::new('E')));
    assert_invariant(b"Infinity,NaN", |reader| reader.try_parse::<f32>());
}

#[test]
fn timestamp_parse() {
    let general = StandardFormat::new('G');
    let round_trip = StandardFormat::new('O');
    let rfc1123 = StandardFormat::new('R');

    assert_invariant(b"08/06/2024 21:30:05|", |reader| reader.try_parse_with::<Timestamp>(general));
    assert_invariant(b"2024-08-06T21:30:05Z|", |reader| reader.try_parse_with::<Timestamp>(round_trip));
    assert_invariant(b"2024-08-06T21:30:05.123456789Z|", |reader| {
        reader.try_parse_with::<Timestamp>(round_trip)
    });
    assert_invariant(b"-0001-08-06T21:30:05.12-07:30|", |reader| {
        reader.try_parse_with::<Timestamp>(round_trip)
    });
    assert_invariant(b"2024-08-06T21:30:05.|", |reader| reader.try_parse_with::<Timestamp>(round_trip));
    assert_invariant(b"Tue, 06 Aug 2024 21:30:05 GMT\r\n", |reader| {
        reader.try_parse_with::<Timestamp>(rfc1123)
    });
    assert_invariant(b"Mon, 06 Aug 2024 21:30:05 GMT\r\n", |reader| {
        reader.try_parse_with::<Timestamp>(rfc1123)
    });
    assert_invariant(b"Thu, 16 Feb -1199 14:13:20 GMT;", |reader| {
        reader.try_parse_with::<Timestamp>(rfc1123)
    });
}

#[test]
fn guid_parse() {
    let value = Uuid::from_u128(0x67e5_5044_10b1_426f_9247_bb68_0e5f_e0c8);

    for (symbol, text) in [
        ('D', "67e55044-10b1-426f-9247-bb680e5fe0c8;"),
        ('N', "67E5504410B1426F9247BB680E5FE0C8;"),
        ('B', "{67e55044-10b1-426f-9247-bb680e5fe0c8};"),
        ('P', "(67e55044-10b1-426f-9247-bb680e5fe0c8);"),
    ] {
        let format = StandardFormat::new(symbol);
        assert_invariant(text.as_bytes(), |reader| reader.try_parse_with::<Uuid>(format));

        let mut reader = SliceReader::from_slice(text.as_bytes());
        assert_eq!(reader.try_parse_with::<Uuid>(format), Some(value), "format {symbol}");
    }

    assert_invariant(b"{67e55044-10b1-426f-9247-bb680e5fe0c8)", |reader| {
        reader.try_parse_with::<Uuid>(StandardFormat::new('B'))
    });
}

#[test]
fn binary_read() {
    let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09];

    assert_invariant(&data, |reader| reader.try_read_le::<u32>());
    assert_invariant(&data, |reader| reader.try_read_be::<u64>());
    assert_invariant(&data, |reader| reader.try_read_i32(false));
    assert_invariant(&data[..3], |reader| reader.try_read_le::<u32>());
}

#[test]
fn two_byte_delimiter_straddles_every_boundary() {
    let data = b"header\r\nbody";

    for [head, tail] in split_points(data) {
        let segments = [head, tail];
        let mut reader = BytesReader::new(&segments);

        let range = reader.read_range_span(b"\r\n").expect("delimiter is present");

        assert_eq!(sequence::to_vec(&segments, range), b"header", "split at {}", head.len());
        assert_eq!(reader.consumed(), 8);
    }
}

#[test]
fn long_delimiter_straddles_at_every_offset() {
    let delimiter = b"--boundary--";
    let data = b"preamble--boundary--epilogue";
    let delimiter_start = 8;

    for offset in 1..delimiter.len() {
        let split = delimiter_start + offset;
        let segments: [&[u8]; 2] = [&data[..split], &data[split..]];
        let reader = BytesReader::new(&segments);

        let position = reader.position_of(delimiter).expect("delimiter is present");

        assert_eq!(position.segment(), 0, "split at offset {offset}");
        assert_eq!(position.index(), delimiter_start, "split at offset {offset}");
    }

    for size in 1..delimiter.len() {
        let segments = testing_aids::fixed_chunks(data, size);
        let mut reader = BytesReader::new(&segments);

        let range = reader.read_range_span(delimiter).expect("delimiter is present");

        assert_eq!(sequence::to_vec(&segments, range), b"preamble", "segment size {size}");
        assert_eq!(rest(&reader), b"epilogue", "segment size {size}");
    }
}

#[test]
fn single_segment_reader_matches() {
    let data = b"12|34|";
    let mut reader = SliceReader::from_slice(data);

    assert_eq!(reader.try_parse::<u8>(), Some(12));
    assert!(reader.advance_to_delimiter(b'|').is_some());
    assert_eq!(reader.try_parse::<u8>(), Some(34));
    assert_eq!(reader.consumed(), 5);
}
