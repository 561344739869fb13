// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::io;

/// The ways in which writing to a [`BufferWriter`][crate::BufferWriter] can fail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The output could not provide enough space for the data being written.
    #[error("the output cannot provide {requested} bytes of space, only {available} bytes are available")]
    CapacityExhausted {
        /// The number of bytes that was asked for.
        requested: usize,

        /// The number of bytes the output was able to provide.
        available: usize,
    },

    /// A transformation rejected the data it was asked to transform.
    #[error("a transformation rejected the data it was given")]
    InvalidTransformation,
}

/// A specialized [`Result`][std::result::Result] for writer operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<Error> for io::Error {
    fn from(value: Error) -> Self {
        let kind = match value {
            Error::CapacityExhausted { .. } => io::ErrorKind::WriteZero,
            Error::InvalidTransformation => io::ErrorKind::InvalidData,
        };

        Self::new(kind, value)
    }
}
