// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::ascii::starts_with_ignore_case;
use crate::format::unsupported;
use crate::{StandardFormat, TextEncoding, Utf8Format, Utf8Parse};

impl Utf8Format for bool {
    /// `G` renders `True`/`False`, `l` renders `true`/`false`.
    fn try_format(&self, destination: &mut [u8], format: StandardFormat, encoding: TextEncoding) -> Option<usize> {
        let text: &[u8] = match (format.symbol_or(b'G'), *self) {
            (b'G', true) => b"True",
            (b'G', false) => b"False",
            (b'l', true) => b"true",
            (b'l', false) => b"false",
            _ => unsupported(format, "bool"),
        };

        encoding.encode_ascii(text, destination)
    }
}

impl Utf8Parse for bool {
    /// Accepts `true` and `false` in any letter case, whatever the symbol.
    fn try_parse(source: &[u8], format: StandardFormat) -> Option<(Self, usize)> {
        if !matches!(format.symbol_or(b'G'), b'G' | b'l') {
            unsupported(format, "bool");
        }

        if starts_with_ignore_case(source, b"true") {
            Some((true, 4))
        } else if starts_with_ignore_case(source, b"false") {
            Some((false, 5))
        } else {
            None
        }
    }

    fn max_text_len(format: StandardFormat) -> usize {
        if !matches!(format.symbol_or(b'G'), b'G' | b'l') {
            unsupported(format, "bool");
        }

        5
    }
}
