// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Describes how a primitive value is rendered as text or parsed from text.
///
/// A format is a pair of a symbol (a single ASCII character such as `'G'`, `'D'` or `'X'`)
/// and an optional precision in the range `0..=99`. The meaning of both depends on the type
/// being formatted; see the individual codecs for details.
///
/// The default format has no symbol and no precision. Every type interprets the default
/// format as its own default symbol (`'G'` for numbers and booleans, `'D'` for GUIDs).
///
/// Formats can be written as text, which is how they are serialized:
///
/// ```
/// use seqbuf_text::StandardFormat;
///
/// let format: StandardFormat = "X8".parse()?;
/// assert_eq!(format.symbol(), Some('X'));
/// assert_eq!(format.precision(), Some(8));
/// assert_eq!(format.to_string(), "X8");
/// # Ok::<(), seqbuf_text::ParseFormatError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StandardFormat {
    symbol: u8,
    precision: u8,
}

impl StandardFormat {
    /// The largest precision a format may carry.
    pub const MAX_PRECISION: u8 = 99;

    const NO_SYMBOL: u8 = 0;
    const NO_PRECISION: u8 = u8::MAX;

    /// The default format: no symbol and no precision.
    pub const DEFAULT: Self = Self {
        symbol: Self::NO_SYMBOL,
        precision: Self::NO_PRECISION,
    };

    /// Creates a format with the given symbol and no precision.
    ///
    /// # Panics
    ///
    /// Panics if the symbol is not an ASCII alphabetic character.
    #[must_use]
    pub const fn new(symbol: char) -> Self {
        assert!(symbol.is_ascii_alphabetic(), "format symbol must be an ASCII letter");

        #[expect(clippy::cast_possible_truncation, reason = "ASCII checked above")]
        let symbol = symbol as u8;

        Self {
            symbol,
            precision: Self::NO_PRECISION,
        }
    }

    /// Creates a format with the given symbol and precision.
    ///
    /// # Panics
    ///
    /// Panics if the symbol is not an ASCII alphabetic character or if the precision is
    /// greater than [`MAX_PRECISION`][Self::MAX_PRECISION].
    #[must_use]
    pub const fn with_precision(symbol: char, precision: u8) -> Self {
        assert!(precision <= Self::MAX_PRECISION, "format precision must not exceed 99");

        let mut format = Self::new(symbol);
        format.precision = precision;
        format
    }

    /// The format symbol, or `None` for the default format.
    #[must_use]
    pub const fn symbol(&self) -> Option<char> {
        if self.symbol == Self::NO_SYMBOL {
            None
        } else {
            Some(self.symbol as char)
        }
    }

    /// The format precision, if one was specified.
    #[must_use]
    pub const fn precision(&self) -> Option<u8> {
        if self.precision == Self::NO_PRECISION {
            None
        } else {
            Some(self.precision)
        }
    }

    /// Whether this is the default format (no symbol, no precision).
    #[must_use]
    pub const fn is_default(&self) -> bool {
        self.symbol == Self::NO_SYMBOL && self.precision == Self::NO_PRECISION
    }

    /// The symbol as an ASCII byte, substituting `default` for the default format.
    pub(crate) const fn symbol_or(self, default: u8) -> u8 {
        if self.symbol == Self::NO_SYMBOL { default } else { self.symbol }
    }

    /// The precision, substituting `default` when none was specified.
    pub(crate) const fn precision_or(self, default: u8) -> u8 {
        if self.precision == Self::NO_PRECISION {
            default
        } else {
            self.precision
        }
    }
}

impl Default for StandardFormat {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<char> for StandardFormat {
    fn from(symbol: char) -> Self {
        Self::new(symbol)
    }
}

impl Display for StandardFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(symbol) = self.symbol() {
            write!(f, "{symbol}")?;
        }

        if let Some(precision) = self.precision() {
            write!(f, "{precision}")?;
        }

        Ok(())
    }
}

impl FromStr for StandardFormat {
    type Err = ParseFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();

        let Some((&symbol, digits)) = bytes.split_first() else {
            return Ok(Self::DEFAULT);
        };

        if !symbol.is_ascii_alphabetic() {
            return Err(ParseFormatError::InvalidSymbol(char::from(symbol)));
        }

        if digits.is_empty() {
            return Ok(Self::new(char::from(symbol)));
        }

        if digits.len() > 2 || !digits.iter().all(u8::is_ascii_digit) {
            return Err(ParseFormatError::InvalidPrecision(s.to_owned()));
        }

        let precision = digits
            .iter()
            .fold(0_u8, |acc, digit| acc * 10 + (digit - b'0'));

        Ok(Self::with_precision(char::from(symbol), precision))
    }
}

/// A textual format descriptor could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ParseFormatError {
    /// The first character of the descriptor is not an ASCII letter.
    #[error("format symbol '{0}' is not an ASCII letter")]
    InvalidSymbol(char),

    /// The characters following the symbol are not a precision between 0 and 99.
    #[error("format '{0}' does not have a precision between 0 and 99")]
    InvalidPrecision(String),
}

/// Panics with a message naming the unsupported format symbol.
///
/// Every codec rejects symbols it does not know this way; an unsupported symbol is a
/// programming error, not a data error.
#[cold]
#[track_caller]
#[expect(clippy::panic, reason = "unsupported format symbols are usage errors")]
pub(crate) fn unsupported(format: StandardFormat, type_name: &str) -> ! {
    panic!("format '{format}' is not supported for {type_name}")
}

#[cfg(feature = "serde")]
impl serde::Serialize for StandardFormat {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for StandardFormat {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer)?
            .parse::<Self>()
            .map_err(serde::de::Error::custom)
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use testing_aids::assert_panic;

    use super::*;

    static_assertions::assert_impl_all!(StandardFormat: Send, Sync, Copy);
    static_assertions::assert_impl_all!(ParseFormatError: Send, Sync, std::error::Error);

    #[test]
    fn default_has_nothing() {
        let format = StandardFormat::default();

        assert!(format.is_default());
        assert_eq!(format.symbol(), None);
        assert_eq!(format.precision(), None);
        assert_eq!(format.symbol_or(b'G'), b'G');
        assert_eq!(format.precision_or(2), 2);
        assert_eq!(format.to_string(), "");
    }

    #[test]
    fn symbol_and_precision() {
        let format = StandardFormat::with_precision('D', 0);

        assert!(!format.is_default());
        assert_eq!(format.symbol(), Some('D'));
        assert_eq!(format.precision(), Some(0));
        assert_eq!(format.precision_or(7), 0);
        assert_eq!(format.to_string(), "D0");
    }

    #[test]
    fn parse_forms() {
        assert_eq!("".parse::<StandardFormat>().unwrap(), StandardFormat::DEFAULT);
        assert_eq!("x".parse::<StandardFormat>().unwrap(), StandardFormat::new('x'));
        assert_eq!("N3".parse::<StandardFormat>().unwrap(), StandardFormat::with_precision('N', 3));
        assert_eq!("E99".parse::<StandardFormat>().unwrap(), StandardFormat::with_precision('E', 99));
    }

    #[test]
    fn parse_errors() {
        assert_eq!(
            "1".parse::<StandardFormat>().unwrap_err(),
            ParseFormatError::InvalidSymbol('1')
        );
        assert!(matches!(
            "X100".parse::<StandardFormat>().unwrap_err(),
            ParseFormatError::InvalidPrecision(_)
        ));
        assert!(matches!(
            "Xa".parse::<StandardFormat>().unwrap_err(),
            ParseFormatError::InvalidPrecision(_)
        ));
    }

    #[test]
    fn invalid_construction_panics() {
        assert_panic!(_ = StandardFormat::new('1'));
        assert_panic!(_ = StandardFormat::with_precision('G', 100));
    }

    #[test]
    fn unsupported_panics_with_symbol() {
        assert_panic!(unsupported(StandardFormat::new('Q'), "u32"));
    }

    #[test]
    #[cfg(feature = "serde")]
    fn serialize_deserialize() {
        let format = StandardFormat::with_precision('X', 8);
        let serialized = serde_json::to_string(&format).unwrap();
        assert_eq!(serialized, "\"X8\"");

        let deserialized: StandardFormat = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, format);
    }
}
