// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use bytes::BytesMut;

use crate::SegmentChain;

/// A sink that a [`BufferWriter`][crate::BufferWriter] writes into.
///
/// The sink exposes a region of writable memory. The writer fills it from the start and
/// periodically commits what it wrote via [`advance`][Output::advance], after which the
/// writable region starts just past the committed bytes. When the writer needs more room it
/// calls [`enlarge`][Output::enlarge]; a sink that cannot grow simply leaves the region as is.
pub trait Output {
    /// The memory the writer may fill.
    fn writable(&mut self) -> &mut [u8];

    /// Read-only access to the same memory as [`writable`][Output::writable].
    fn writable_ref(&self) -> &[u8];

    /// Commits the first `count` bytes of the writable region.
    ///
    /// # Panics
    ///
    /// Implementations panic if `count` exceeds the length of the writable region.
    fn advance(&mut self, count: usize);

    /// Asks for the writable region to be at least `desired_minimum_size` bytes.
    ///
    /// The sink may provide more, less or no additional space at all. The contents of the
    /// writable region are unspecified afterwards.
    fn enlarge(&mut self, desired_minimum_size: usize);
}

impl<O: Output + ?Sized> Output for &mut O {
    fn writable(&mut self) -> &mut [u8] {
        (**self).writable()
    }

    fn writable_ref(&self) -> &[u8] {
        (**self).writable_ref()
    }

    fn advance(&mut self, count: usize) {
        (**self).advance(count);
    }

    fn enlarge(&mut self, desired_minimum_size: usize) {
        (**self).enlarge(desired_minimum_size);
    }
}

#[track_caller]
fn commit(committed: &mut usize, count: usize, capacity: usize) {
    let target = committed.checked_add(count).filter(|&target| target <= capacity);
    assert!(target.is_some(), "cannot commit {count} bytes with only {} bytes writable", capacity - *committed);

    *committed += count;
}

/// A fixed-size sink over caller-provided memory. It never grows.
#[derive(Debug)]
pub struct SliceOutput<'a> {
    buffer: &'a mut [u8],
    committed: usize,
}

impl<'a> SliceOutput<'a> {
    /// Creates a sink that writes into `buffer`.
    #[must_use]
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self { buffer, committed: 0 }
    }

    /// The bytes committed so far.
    #[must_use]
    pub fn committed(&self) -> &[u8] {
        &self.buffer[..self.committed]
    }

    /// The number of bytes committed so far.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.committed
    }

    /// Whether nothing has been committed yet.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.committed == 0
    }
}

impl Output for SliceOutput<'_> {
    fn writable(&mut self) -> &mut [u8] {
        &mut self.buffer[self.committed..]
    }

    fn writable_ref(&self) -> &[u8] {
        &self.buffer[self.committed..]
    }

    #[track_caller]
    fn advance(&mut self, count: usize) {
        commit(&mut self.committed, count, self.buffer.len());
    }

    fn enlarge(&mut self, _desired_minimum_size: usize) {}
}

/// An owned sink backed by a vector that doubles in size whenever it needs to grow, up to an
/// optional maximum capacity.
///
/// ```
/// use seqbuf::{BufferWriter, GrowableOutput};
///
/// let mut writer = BufferWriter::new(GrowableOutput::new(4));
/// writer.write_str("more than four bytes").expect("output can grow");
///
/// assert_eq!(writer.into_inner().into_vec(), b"more than four bytes");
/// ```
#[derive(Debug, Clone, Default)]
pub struct GrowableOutput {
    buffer: Vec<u8>,
    committed: usize,
    max_capacity: Option<usize>,
}

impl GrowableOutput {
    /// Creates a sink with `initial_capacity` bytes of writable memory and no upper limit.
    #[must_use]
    pub fn new(initial_capacity: usize) -> Self {
        Self {
            buffer: vec![0; initial_capacity],
            committed: 0,
            max_capacity: None,
        }
    }

    /// Creates a sink that never grows beyond `max_capacity` bytes in total.
    #[must_use]
    pub fn with_max_capacity(initial_capacity: usize, max_capacity: usize) -> Self {
        Self {
            buffer: vec![0; initial_capacity.min(max_capacity)],
            committed: 0,
            max_capacity: Some(max_capacity),
        }
    }

    /// The bytes committed so far.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer[..self.committed]
    }

    /// The number of bytes committed so far.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.committed
    }

    /// Whether nothing has been committed yet.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.committed == 0
    }

    /// The total size of the backing memory, committed or not.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Returns the committed bytes.
    #[must_use]
    pub fn into_vec(mut self) -> Vec<u8> {
        self.buffer.truncate(self.committed);
        self.buffer
    }
}

impl Output for GrowableOutput {
    fn writable(&mut self) -> &mut [u8] {
        &mut self.buffer[self.committed..]
    }

    fn writable_ref(&self) -> &[u8] {
        &self.buffer[self.committed..]
    }

    #[track_caller]
    fn advance(&mut self, count: usize) {
        commit(&mut self.committed, count, self.buffer.len());
    }

    fn enlarge(&mut self, desired_minimum_size: usize) {
        let mut target = self
            .buffer
            .len()
            .saturating_mul(2)
            .max(self.committed.saturating_add(desired_minimum_size));

        if let Some(max_capacity) = self.max_capacity {
            target = target.min(max_capacity);
        }

        if target > self.buffer.len() {
            self.buffer.resize(target, 0);
        }
    }
}

/// An owned sink that produces a [`SegmentChain`], starting a new segment every time it is
/// enlarged.
///
/// Each segment is at least `chunk_size` bytes of memory, of which only the committed part
/// ends up in the chain.
#[derive(Debug)]
pub struct ChainOutput {
    chunk_size: usize,
    current: BytesMut,
    committed: usize,
    chain: SegmentChain,
}

impl ChainOutput {
    /// Creates a sink whose segments are at least `chunk_size` bytes.
    #[must_use]
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size,
            current: BytesMut::zeroed(chunk_size),
            committed: 0,
            chain: SegmentChain::new(),
        }
    }

    /// The number of bytes committed so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chain.len() + self.committed
    }

    /// Whether nothing has been committed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the committed bytes as a chain of segments.
    #[must_use]
    pub fn into_chain(mut self) -> SegmentChain {
        self.seal();
        self.chain
    }

    fn seal(&mut self) {
        if self.committed > 0 {
            let filled = self.current.split_to(self.committed).freeze();
            self.chain.push(filled);
            self.committed = 0;
        }
    }
}

impl Output for ChainOutput {
    fn writable(&mut self) -> &mut [u8] {
        &mut self.current[self.committed..]
    }

    fn writable_ref(&self) -> &[u8] {
        &self.current[self.committed..]
    }

    #[track_caller]
    fn advance(&mut self, count: usize) {
        commit(&mut self.committed, count, self.current.len());
    }

    fn enlarge(&mut self, desired_minimum_size: usize) {
        self.seal();
        self.current = BytesMut::zeroed(self.chunk_size.max(desired_minimum_size));
    }
}
