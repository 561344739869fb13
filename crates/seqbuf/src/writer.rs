// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt::{self, Display, Formatter};
use std::{io, mem};

use seqbuf_text::{OperationStatus, StandardFormat, Utf8Format};
use tracing::{Level, event};

use crate::{BinaryWrite, Error, Output, Result, TransformStatus, Transformation, WriterConfig};

/// Writes bytes, text and formatted values into an [`Output`], asking it for more memory when
/// the current region fills up.
///
/// Bytes are written into the free part of the output's writable region and committed to the
/// output when the writer is [flushed][Self::flush], before the output is enlarged and when the
/// writer is [consumed][Self::into_inner].
///
/// Growth is bounded. If the output does not provide more room when asked, or keeps providing
/// too little for the configured number of attempts, the write fails with
/// [`Error::CapacityExhausted`] rather than looping or truncating.
///
/// ```
/// use seqbuf::{BufferWriter, SliceOutput};
/// use seqbuf_text::StandardFormat;
///
/// let mut memory = [0_u8; 32];
/// let mut writer = BufferWriter::new(SliceOutput::new(&mut memory));
///
/// writer.write_str("answer=")?;
/// writer.write(&42_u32, StandardFormat::DEFAULT)?;
/// writer.write_str(" hex=")?;
/// writer.write(&42_u32, "X4".parse()?)?;
///
/// assert_eq!(writer.to_string(), "answer=42 hex=002A");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct BufferWriter<O: Output> {
    output: O,
    written: usize,
    config: WriterConfig,
}

impl<O: Output> BufferWriter<O> {
    /// Creates a writer with the default configuration.
    #[must_use]
    pub fn new(output: O) -> Self {
        Self::with_config(output, WriterConfig::default())
    }

    /// Creates a writer with the given configuration.
    #[must_use]
    pub fn with_config(output: O, config: WriterConfig) -> Self {
        Self {
            output,
            written: 0,
            config,
        }
    }

    /// The configuration of the writer.
    #[must_use]
    pub const fn config(&self) -> &WriterConfig {
        &self.config
    }

    /// The bytes written since the last flush.
    #[must_use]
    pub fn written(&self) -> &[u8] {
        self.output
            .writable_ref()
            .get(..self.written)
            .expect("written never exceeds the writable region")
    }

    /// The number of bytes written since the last flush.
    #[must_use]
    pub const fn written_len(&self) -> usize {
        self.written
    }

    /// The part of the writable region not yet written to.
    pub fn free(&mut self) -> &mut [u8] {
        let written = self.written;

        self.output
            .writable()
            .get_mut(written..)
            .expect("written never exceeds the writable region")
    }

    /// The length of [`free`][Self::free].
    #[must_use]
    pub fn free_len(&self) -> usize {
        self.output.writable_ref().len() - self.written
    }

    /// Moves the write position to `written` bytes past the last flush, discarding or
    /// exposing bytes after it.
    ///
    /// # Panics
    ///
    /// Panics if `written` lies beyond the writable region.
    #[track_caller]
    pub fn set_written(&mut self, written: usize) {
        let writable = self.output.writable_ref().len();
        assert!(written <= writable, "cannot set written to {written} in a writable region of {writable} bytes");

        self.written = written;
    }

    /// Makes sure at least `count` bytes are free, enlarging the output if necessary, and
    /// returns the free region. Fill it and call [`advance`][Self::advance].
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExhausted`] if the output cannot provide `count` free bytes.
    pub fn reserve(&mut self, count: usize) -> Result<&mut [u8]> {
        let mut attempts = 0;

        while self.free_len() < count {
            self.enlarge(count, &mut attempts)?;
        }

        Ok(self.free())
    }

    /// Marks `count` bytes of the free region as written.
    ///
    /// # Panics
    ///
    /// Panics if `count` exceeds the free region.
    #[track_caller]
    pub fn advance(&mut self, count: usize) {
        let free = self.free_len();
        assert!(count <= free, "cannot advance {count} bytes with only {free} bytes free");

        self.written += count;
    }

    /// Writes raw bytes, spreading them over as many enlargements of the output as needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExhausted`] if the output runs out of room. The bytes written
    /// up to that point remain written.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let mut remaining = bytes;
        let mut attempts = 0;

        loop {
            let free = self.free();
            let count = free.len().min(remaining.len());

            free[..count].copy_from_slice(&remaining[..count]);
            self.written += count;
            remaining = &remaining[count..];

            if remaining.is_empty() {
                return Ok(());
            }

            if count > 0 {
                attempts = 0;
            }

            self.enlarge(remaining.len(), &mut attempts)?;
        }
    }

    /// Writes a single byte.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExhausted`] if the output runs out of room.
    pub fn write_byte(&mut self, byte: u8) -> Result<()> {
        self.write_bytes(&[byte])
    }

    /// Writes a character in the configured encoding.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExhausted`] if the output runs out of room.
    pub fn write_char(&mut self, ch: char) -> Result<()> {
        let mut utf8 = [0_u8; 4];
        self.write_str(ch.encode_utf8(&mut utf8))
    }

    /// Writes text in the configured encoding.
    ///
    /// The text is encoded straight into the free region. When that fills up, what was encoded
    /// so far is kept, the output is enlarged and encoding resumes with the next character.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExhausted`] if the output runs out of room. The text written
    /// up to that point remains written and always ends on a character boundary.
    pub fn write_str(&mut self, text: &str) -> Result<()> {
        let encoding = self.config.encoding();
        let mut remaining = text;
        let mut attempts = 0;

        loop {
            let progress = encoding.encode_str(remaining, self.free());
            self.written += progress.written;
            remaining = &remaining[progress.consumed..];

            if progress.status == OperationStatus::Done {
                return Ok(());
            }

            if progress.written > 0 {
                attempts = 0;
            }

            self.enlarge(encoding.encoded_len(remaining), &mut attempts)?;
        }
    }

    /// Writes text followed by the configured newline.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExhausted`] if the output runs out of room.
    pub fn write_line(&mut self, text: &str) -> Result<()> {
        self.write_str(text)?;
        self.write_newline()
    }

    /// Writes the configured newline.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExhausted`] if the output runs out of room.
    pub fn write_newline(&mut self) -> Result<()> {
        let newline = mem::take(&mut self.config.newline);
        let result = self.write_str(&newline);

        self.config.newline = newline;
        result
    }

    /// Writes a value as text in the given format and the configured encoding.
    ///
    /// The value is always written as a whole. If it does not fit, the output is enlarged and
    /// the value is formatted again from the start.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExhausted`] if the output runs out of room, in which case
    /// nothing of the value is written.
    ///
    /// # Panics
    ///
    /// Panics if the type does not support the format symbol.
    pub fn write<T: Utf8Format + ?Sized>(&mut self, value: &T, format: StandardFormat) -> Result<()> {
        self.write_with(value, format, &[])
    }

    /// Writes a value as text, followed by the configured newline.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExhausted`] if the output runs out of room.
    ///
    /// # Panics
    ///
    /// Panics if the type does not support the format symbol.
    pub fn write_line_value<T: Utf8Format + ?Sized>(&mut self, value: &T, format: StandardFormat) -> Result<()> {
        self.write(value, format)?;
        self.write_newline()
    }

    /// Writes the fixed-width binary representation of a value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExhausted`] if the output runs out of room.
    ///
    /// # Panics
    ///
    /// Panics if the format symbol is not a byte order.
    pub fn write_binary<T: BinaryWrite + ?Sized>(&mut self, value: &T, format: StandardFormat) -> Result<()> {
        self.write_whole(|free| value.try_write(free, format), &[])
    }

    /// Writes a value as text and then runs each transformation, in order, over the bytes just
    /// written.
    ///
    /// If any transformation runs out of room, the output is enlarged and the whole value is
    /// formatted and transformed again.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExhausted`] if the output runs out of room and
    /// [`Error::InvalidTransformation`] if a transformation rejects the data. Nothing of the
    /// value is written in either case.
    ///
    /// # Panics
    ///
    /// Panics if the type does not support the format symbol.
    pub fn write_with<T: Utf8Format + ?Sized>(
        &mut self,
        value: &T,
        format: StandardFormat,
        transformations: &[&dyn Transformation],
    ) -> Result<()> {
        let encoding = self.config.encoding();
        self.write_whole(|free| value.try_format(free, format, encoding), transformations)
    }

    /// Writes text and then runs each transformation, in order, over the bytes just written.
    ///
    /// Unlike [`write_str`][Self::write_str], the text is written as a whole: if it or its
    /// transformed form does not fit, the output is enlarged and everything starts over.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExhausted`] if the output runs out of room and
    /// [`Error::InvalidTransformation`] if a transformation rejects the data. Nothing of the
    /// text is written in either case.
    ///
    /// ```
    /// use seqbuf::{BufferWriter, GrowableOutput, PercentEncoding};
    ///
    /// let mut writer = BufferWriter::new(GrowableOutput::new(8));
    /// writer.write_str_with("a b&c", &[&PercentEncoding])?;
    ///
    /// assert_eq!(writer.into_inner().into_vec(), b"a%20b%26c");
    /// # Ok::<(), seqbuf::Error>(())
    /// ```
    pub fn write_str_with(&mut self, text: &str, transformations: &[&dyn Transformation]) -> Result<()> {
        let encoding = self.config.encoding();

        self.write_whole(
            |free| {
                let progress = encoding.encode_str(text, free);
                (progress.status == OperationStatus::Done).then_some(progress.written)
            },
            transformations,
        )
    }

    fn write_whole(
        &mut self,
        mut render: impl FnMut(&mut [u8]) -> Option<usize>,
        transformations: &[&dyn Transformation],
    ) -> Result<()> {
        let mut attempts = 0;

        loop {
            let free = self.free();

            if let Some(len) = render(free) {
                match transform(free, len, transformations) {
                    TransformStatus::Done(len) => {
                        debug_assert!(len <= free.len());
                        self.written += len;
                        return Ok(());
                    }
                    TransformStatus::InvalidData => return Err(Error::InvalidTransformation),
                    TransformStatus::DestinationTooSmall => {}
                }
            }

            let free = self.free_len();
            let requested = free.saturating_mul(2).max(free.saturating_add(1));
            self.enlarge(requested, &mut attempts)?;
        }
    }

    /// Commits the written bytes to the output.
    pub fn flush(&mut self) {
        self.output.advance(self.written);
        self.written = 0;
    }

    /// Flushes the writer and returns the output.
    #[must_use]
    pub fn into_inner(mut self) -> O {
        self.flush();
        self.output
    }

    /// Commits what was written and asks the output for a writable region of at least
    /// `requested` bytes.
    #[cold] // Most writes fit in the memory the output already has.
    fn enlarge(&mut self, requested: usize, attempts: &mut usize) -> Result<()> {
        self.flush();

        let available = self.output.writable_ref().len();

        *attempts += 1;
        if *attempts > self.config.max_enlarge_attempts() {
            return Err(exhausted(requested, available, *attempts));
        }

        self.output.enlarge(requested);
        let enlarged = self.output.writable_ref().len();

        event!(
            Level::DEBUG,
            message = "output enlarged",
            requested,
            available,
            enlarged,
            attempt = *attempts
        );

        if enlarged <= available {
            return Err(exhausted(requested, enlarged, *attempts));
        }

        Ok(())
    }
}

fn transform(buffer: &mut [u8], mut len: usize, transformations: &[&dyn Transformation]) -> TransformStatus {
    for transformation in transformations {
        match transformation.transform(buffer, len) {
            TransformStatus::Done(transformed) => len = transformed,
            other => return other,
        }
    }

    TransformStatus::Done(len)
}

fn exhausted(requested: usize, available: usize, attempts: usize) -> Error {
    event!(
        Level::WARN,
        message = "output capacity exhausted",
        requested,
        available,
        attempts
    );

    Error::CapacityExhausted { requested, available }
}

impl<O: Output> Display for BufferWriter<O> {
    /// Displays the bytes written since the last flush as UTF-8 text.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(self.written()))
    }
}

impl<O: Output> fmt::Write for BufferWriter<O> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        Self::write_str(self, s).or(Err(fmt::Error))
    }
}

impl<O: Output> io::Write for BufferWriter<O> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_bytes(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Self::flush(self);
        Ok(())
    }
}
