// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::borrow::Cow;

use seqbuf_text::TextEncoding;

const DEFAULT_MAX_ENLARGE_ATTEMPTS: usize = 8;

/// Settings that control how a [`BufferWriter`][crate::BufferWriter] renders text and grows
/// its output.
///
/// ```
/// use seqbuf::WriterConfig;
/// use seqbuf_text::TextEncoding;
///
/// let config = WriterConfig::default()
///     .with_newline("\r\n")
///     .with_encoding(TextEncoding::Utf16)
///     .with_max_enlarge_attempts(3);
///
/// assert_eq!(config.newline(), "\r\n");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WriterConfig {
    pub(crate) newline: Cow<'static, str>,
    encoding: TextEncoding,
    max_enlarge_attempts: usize,
}

impl WriterConfig {
    /// The text appended by the `write_line` family of methods. Defaults to `"\n"`.
    #[must_use]
    pub fn newline(&self) -> &str {
        &self.newline
    }

    /// The encoding that text is written in. Defaults to UTF-8.
    #[must_use]
    pub const fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// How many times in a row the writer asks its output for more space before giving up on
    /// a write. Defaults to 8.
    #[must_use]
    pub const fn max_enlarge_attempts(&self) -> usize {
        self.max_enlarge_attempts
    }

    /// Sets the text appended by the `write_line` family of methods.
    #[must_use]
    pub fn with_newline(mut self, newline: impl Into<Cow<'static, str>>) -> Self {
        self.newline = newline.into();
        self
    }

    /// Sets the encoding that text is written in.
    #[must_use]
    pub const fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Sets how many times in a row the writer asks its output for more space before giving up
    /// on a write.
    #[must_use]
    pub const fn with_max_enlarge_attempts(mut self, attempts: usize) -> Self {
        self.max_enlarge_attempts = attempts;
        self
    }
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            newline: Cow::Borrowed("\n"),
            encoding: TextEncoding::Utf8,
            max_enlarge_attempts: DEFAULT_MAX_ENLARGE_ATTEMPTS,
        }
    }
}
