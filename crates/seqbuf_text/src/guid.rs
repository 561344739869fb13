// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! GUID codecs, always lower case on output and case-insensitive on input.
//!
//! * `D`: `00000000-0000-0000-0000-000000000000` (default)
//! * `N`: `00000000000000000000000000000000`
//! * `B`: `{00000000-0000-0000-0000-000000000000}`
//! * `P`: `(00000000-0000-0000-0000-000000000000)`

use uuid::Uuid;
use uuid::fmt::{Hyphenated, Simple};

use crate::format::unsupported;
use crate::{StandardFormat, TextEncoding, Utf8Format, Utf8Parse};

/// Hyphenated text, optionally wrapped in the given delimiters, or bare digits.
enum Layout {
    Hyphenated(Option<(u8, u8)>),
    Digits,
}

fn layout(format: StandardFormat) -> Layout {
    match format.symbol_or(b'D').to_ascii_uppercase() {
        b'D' => Layout::Hyphenated(None),
        b'B' => Layout::Hyphenated(Some((b'{', b'}'))),
        b'P' => Layout::Hyphenated(Some((b'(', b')'))),
        b'N' => Layout::Digits,
        _ => unsupported(format, "Uuid"),
    }
}

impl Utf8Format for Uuid {
    fn try_format(&self, destination: &mut [u8], format: StandardFormat, encoding: TextEncoding) -> Option<usize> {
        let mut text = Uuid::encode_buffer();

        let len = match layout(format) {
            Layout::Hyphenated(delimiters) => {
                let offset = usize::from(delimiters.is_some());
                let digits = self
                    .hyphenated()
                    .encode_lower(&mut text[offset..offset + Hyphenated::LENGTH])
                    .len();

                if let Some((open, close)) = delimiters {
                    text[0] = open;
                    text[digits + 1] = close;
                    digits + 2
                } else {
                    digits
                }
            }
            Layout::Digits => self.simple().encode_lower(&mut text).len(),
        };

        encoding.encode_ascii(&text[..len], destination)
    }
}

impl Utf8Parse for Uuid {
    fn try_parse(source: &[u8], format: StandardFormat) -> Option<(Self, usize)> {
        match layout(format) {
            Layout::Hyphenated(None) => {
                let text = source.get(..Hyphenated::LENGTH)?;
                Some((Self::try_parse_ascii(text).ok()?, Hyphenated::LENGTH))
            }
            Layout::Hyphenated(Some((open, close))) => {
                let len = Hyphenated::LENGTH + 2;
                let (&first, rest) = source.get(..len)?.split_first()?;
                let (&last, inner) = rest.split_last()?;

                if first != open || last != close {
                    return None;
                }

                Some((Self::try_parse_ascii(inner).ok()?, len))
            }
            Layout::Digits => {
                let text = source.get(..Simple::LENGTH)?;
                Some((Self::try_parse_ascii(text).ok()?, Simple::LENGTH))
            }
        }
    }

    fn max_text_len(format: StandardFormat) -> usize {
        match layout(format) {
            Layout::Hyphenated(None) => Hyphenated::LENGTH,
            Layout::Hyphenated(Some(_)) => Hyphenated::LENGTH + 2,
            Layout::Digits => Simple::LENGTH,
        }
    }
}
