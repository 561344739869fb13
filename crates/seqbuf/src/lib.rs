// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Read and write byte sequences that are split across multiple segments of memory.
//!
//! Network and storage code rarely gets its data in one contiguous slice. Bytes arrive in
//! buffers of whatever size the transport chose and a message, a number or a delimiter can
//! start in one buffer and end in the next. This crate lets you consume such data as one
//! logical stream and produce output into memory that grows on demand, without first copying
//! everything into a single buffer.
//!
//! # Reading
//!
//! A [`Sequence`] is anything that exposes its bytes as an ordered list of segments. Slices,
//! arrays and vectors of byte slices are sequences, as is the owned, reference-counted
//! [`SegmentChain`].
//!
//! A [`BytesReader`] is a cursor over a sequence. It reads bytes, searches for delimiters,
//! parses text and reads fixed-width binary numbers, handling segment boundaries for you:
//!
//! ```
//! use seqbuf::BytesReader;
//!
//! // "Content-Length: 4000\r\n" as it might arrive from the network.
//! let segments: [&[u8]; 3] = [b"Content-Len", b"gth: 40", b"00\r\n"];
//! let mut reader = BytesReader::new(&segments);
//!
//! let name = reader.read_range_span(b": ").expect("header has a name");
//! assert_eq!(seqbuf::sequence::to_vec(&segments, name), b"Content-Length");
//!
//! assert_eq!(reader.try_parse::<u64>(), Some(4000));
//! assert!(reader.read_range_span(b"\r\n").is_some());
//! assert!(reader.is_empty());
//! ```
//!
//! Where a reader hands out locations, it does so as [`Position`] values. A position can be
//! stored and later passed to [`BytesReader::seek`] or used to [slice][SegmentChain::slice] a
//! chain.
//!
//! # Writing
//!
//! A [`BufferWriter`] writes bytes, text and formatted values into an [`Output`]. When the
//! output's memory fills up, the writer asks it for more. The crate provides three outputs:
//!
//! * [`SliceOutput`] writes into caller-provided memory and never grows.
//! * [`GrowableOutput`] writes into a vector that doubles when it needs to grow.
//! * [`ChainOutput`] produces a [`SegmentChain`], adding a segment every time it grows.
//!
//! ```
//! use seqbuf::{BufferWriter, GrowableOutput};
//! use seqbuf_text::StandardFormat;
//!
//! let mut writer = BufferWriter::new(GrowableOutput::new(4));
//!
//! writer.write(&60_000_000_000_000_000_u64, StandardFormat::DEFAULT)?;
//! writer.write_line(" bytes")?;
//!
//! assert_eq!(writer.into_inner().into_vec(), b"60000000000000000 bytes\n");
//! # Ok::<(), seqbuf::Error>(())
//! ```
//!
//! Values are written as a whole or not at all. Text written via
//! [`write_str`][BufferWriter::write_str] is streamed and may span several growths of the
//! output. [`Transformation`]s such as [`HexEncoding`] or [`PercentEncoding`] can rewrite a
//! value in place right after it has been written.
//!
//! Text formatting and parsing of primitive values is provided by the `seqbuf_text` crate.
//!
//! # Spans
//!
//! [`Span`] and [`ReadOnlySpan`] are bounded views over contiguous memory, used where an API
//! hands out a piece of a larger buffer.

mod binary;
mod chain;
mod config;
mod error;
mod output;
mod position;
mod reader;
mod reader_parse;
mod reader_search;
pub mod sequence;
mod span;
mod transform;
mod writer;

pub use binary::BinaryWrite;
pub use chain::{MAX_INLINE_SEGMENTS, SegmentChain};
pub use config::WriterConfig;
pub use error::{Error, Result};
pub use output::{ChainOutput, GrowableOutput, Output, SliceOutput};
pub use position::{Position, PositionRange};
pub use reader::{BytesReader, SliceReader};
pub use sequence::Sequence;
pub use span::{ReadOnlySpan, Span};
pub use transform::{AsciiCase, HexEncoding, PercentEncoding, TransformStatus, Transformation};
pub use writer::BufferWriter;
