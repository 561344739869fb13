// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

/// The text encoding that formatters produce.
///
/// Formatters always render ASCII symbols, which are then expanded to the target encoding.
/// Parsers only accept UTF-8.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[non_exhaustive]
pub enum TextEncoding {
    /// UTF-8, one byte per ASCII symbol.
    #[default]
    Utf8,

    /// Little-endian UTF-16, two bytes per ASCII symbol.
    Utf16,
}

/// The outcome of a transcoding or transformation step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationStatus {
    /// All input was processed.
    Done,

    /// The destination filled up before all input was processed.
    DestinationTooSmall,

    /// The input could not be processed.
    InvalidData,
}

/// How far a streaming [`TextEncoding::encode_str`] call got.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodeProgress {
    /// Whether the whole input was encoded.
    pub status: OperationStatus,

    /// Number of bytes of the source text that were encoded. Always on a `char` boundary.
    pub consumed: usize,

    /// Number of bytes written to the destination.
    pub written: usize,
}

impl TextEncoding {
    /// Number of bytes one ASCII symbol occupies in this encoding.
    #[must_use]
    pub const fn ascii_width(self) -> usize {
        match self {
            Self::Utf8 => 1,
            Self::Utf16 => 2,
        }
    }

    /// Writes ASCII bytes to `destination` in this encoding.
    ///
    /// Returns the number of bytes written, or `None` if `destination` is too small, in which
    /// case the contents of `destination` are unspecified.
    #[must_use]
    pub fn encode_ascii(self, ascii: &[u8], destination: &mut [u8]) -> Option<usize> {
        debug_assert!(ascii.is_ascii());

        match self {
            Self::Utf8 => {
                let target = destination.get_mut(..ascii.len())?;
                target.copy_from_slice(ascii);
                Some(ascii.len())
            }
            Self::Utf16 => {
                let len = ascii.len().checked_mul(2)?;
                let target = destination.get_mut(..len)?;

                for (unit, &symbol) in target.chunks_exact_mut(2).zip(ascii) {
                    unit.copy_from_slice(&u16::from(symbol).to_le_bytes());
                }

                Some(len)
            }
        }
    }

    /// Number of bytes `text` occupies in this encoding.
    #[must_use]
    pub fn encoded_len(self, text: &str) -> usize {
        match self {
            Self::Utf8 => text.len(),
            Self::Utf16 => text.encode_utf16().count() * 2,
        }
    }

    /// Encodes as much of `text` as fits into `destination`.
    ///
    /// Encoding stops at the last whole character that fits; a character is never split
    /// across calls. Callers that run out of space resume with `&text[progress.consumed..]`.
    #[must_use]
    pub fn encode_str(self, text: &str, destination: &mut [u8]) -> EncodeProgress {
        match self {
            Self::Utf8 => {
                let mut consumed = text.len().min(destination.len());

                while !text.is_char_boundary(consumed) {
                    consumed -= 1;
                }

                destination[..consumed].copy_from_slice(&text.as_bytes()[..consumed]);

                EncodeProgress {
                    status: if consumed == text.len() {
                        OperationStatus::Done
                    } else {
                        OperationStatus::DestinationTooSmall
                    },
                    consumed,
                    written: consumed,
                }
            }
            Self::Utf16 => {
                let mut consumed = 0;
                let mut written = 0;

                for ch in text.chars() {
                    let mut units = [0_u16; 2];
                    let units = ch.encode_utf16(&mut units);

                    let Some(target) = destination.get_mut(written..written + units.len() * 2) else {
                        return EncodeProgress {
                            status: OperationStatus::DestinationTooSmall,
                            consumed,
                            written,
                        };
                    };

                    for (pair, unit) in target.chunks_exact_mut(2).zip(units.iter()) {
                        pair.copy_from_slice(&unit.to_le_bytes());
                    }

                    written += units.len() * 2;
                    consumed += ch.len_utf8();
                }

                EncodeProgress {
                    status: OperationStatus::Done,
                    consumed,
                    written,
                }
            }
        }
    }
}
