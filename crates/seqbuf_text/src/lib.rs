// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Allocation-free formatting and parsing of primitive values as UTF-8 text.
//!
//! The codecs in this crate write straight into caller-provided byte slices and parse straight
//! out of them, reporting exactly how many bytes they produced or consumed. They never allocate
//! and never panic on bad data: a destination that is too small or input that is malformed
//! yields `None`.
//!
//! Formatting is implemented via [`Utf8Format`], parsing via [`Utf8Parse`]. Both are driven by a
//! [`StandardFormat`], a single-letter symbol with an optional precision:
//!
//! | Type | Symbols |
//! |---|---|
//! | integers | `G`/`D` decimal, `N` grouped decimal, `X`/`x` hexadecimal |
//! | `f32`, `f64` | `G`/`R` round-trip, `F` fixed point, `E`/`e` scientific |
//! | `bool` | `G` (`True`), `l` (`true`) |
//! | [`jiff::Timestamp`] | `G` general, `O` ISO 8601 round-trip, `R` RFC 1123 |
//! | [`uuid::Uuid`] | `D` hyphenated, `N` digits, `B` braces, `P` parentheses |
//!
//! Using a symbol that a type does not support is a programming error and panics.
//!
//! ```
//! use seqbuf_text::{StandardFormat, TextEncoding, Utf8Format, Utf8Parse};
//!
//! let mut buffer = [0_u8; 16];
//!
//! let written = 48879_u32
//!     .try_format(&mut buffer, StandardFormat::new('X'), TextEncoding::Utf8)
//!     .expect("buffer is large enough");
//! assert_eq!(&buffer[..written], b"BEEF");
//!
//! let (value, consumed) = u32::try_parse(b"1234;", StandardFormat::DEFAULT).expect("valid number");
//! assert_eq!(value, 1234);
//! assert_eq!(consumed, 4);
//! ```
//!
//! Formatters can emit UTF-16 as well as UTF-8 (see [`TextEncoding`]); parsers accept UTF-8 only.

mod ascii;
mod boolean;
mod encoding;
mod float;
mod format;
mod guid;
mod integer;
mod time;

pub use encoding::{EncodeProgress, OperationStatus, TextEncoding};
pub use format::{ParseFormatError, StandardFormat};

/// A value that can render itself as text into a byte slice.
pub trait Utf8Format {
    /// Formats the value into the start of `destination`.
    ///
    /// Returns the number of bytes written, or `None` if `destination` is too small. On `None`
    /// the contents of `destination` are unspecified.
    ///
    /// # Panics
    ///
    /// Panics if the format symbol is not supported by the type.
    fn try_format(&self, destination: &mut [u8], format: StandardFormat, encoding: TextEncoding) -> Option<usize>;
}

impl<T: Utf8Format + ?Sized> Utf8Format for &T {
    fn try_format(&self, destination: &mut [u8], format: StandardFormat, encoding: TextEncoding) -> Option<usize> {
        (**self).try_format(destination, format, encoding)
    }
}

/// A value that can be parsed from the start of a UTF-8 byte slice.
pub trait Utf8Parse: Sized {
    /// Parses a value from the start of `source`.
    ///
    /// Trailing bytes that are not part of the value are ignored. Returns the value and the
    /// number of bytes it occupied, or `None` if `source` does not start with a valid value.
    ///
    /// # Panics
    ///
    /// Panics if the format symbol is not supported by the type.
    fn try_parse(source: &[u8], format: StandardFormat) -> Option<(Self, usize)>;

    /// The length in bytes of the widest text of a value in the given format, not counting
    /// leading zeros.
    ///
    /// Readers that reassemble a value spread across several buffers use this to size how far
    /// ahead they look for long formats.
    ///
    /// # Panics
    ///
    /// Panics if the format symbol is not supported by the type.
    fn max_text_len(format: StandardFormat) -> usize;
}

/// Formats `value` as UTF-8 with its default format.
///
/// Shorthand for [`Utf8Format::try_format`] with [`StandardFormat::DEFAULT`] and
/// [`TextEncoding::Utf8`].
#[must_use]
pub fn format_to<T: Utf8Format + ?Sized>(value: &T, destination: &mut [u8]) -> Option<usize> {
    value.try_format(destination, StandardFormat::DEFAULT, TextEncoding::Utf8)
}

/// Parses a `T` with its default format from the start of `source`.
#[must_use]
pub fn parse<T: Utf8Parse>(source: &[u8]) -> Option<(T, usize)> {
    T::try_parse(source, StandardFormat::DEFAULT)
}
