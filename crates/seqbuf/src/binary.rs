// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use num_traits::ToBytes;
use seqbuf_text::StandardFormat;

/// A value with a fixed-width binary representation.
///
/// Implemented for all primitive numbers. The format symbol selects the byte order: `L`
/// (the default) for little-endian and `B` for big-endian, in either case.
pub trait BinaryWrite {
    /// Writes the value to the start of `destination`.
    ///
    /// Returns the number of bytes written, or `None` if `destination` is too small.
    ///
    /// # Panics
    ///
    /// Panics if the format symbol is neither `L` nor `B`.
    fn try_write(&self, destination: &mut [u8], format: StandardFormat) -> Option<usize>;
}

impl<T: ToBytes> BinaryWrite for T {
    fn try_write(&self, destination: &mut [u8], format: StandardFormat) -> Option<usize> {
        let bytes = if is_big_endian(format) {
            self.to_be_bytes()
        } else {
            self.to_le_bytes()
        };

        let bytes = bytes.as_ref();
        destination.get_mut(..bytes.len())?.copy_from_slice(bytes);

        Some(bytes.len())
    }
}

#[track_caller]
#[expect(clippy::panic, reason = "an unknown byte order is a programming error")]
fn is_big_endian(format: StandardFormat) -> bool {
    match format.symbol() {
        None | Some('L' | 'l') => false,
        Some('B' | 'b') => true,
        Some(symbol) => panic!("binary format '{symbol}' is not supported, expected 'L' or 'B'"),
    }
}
