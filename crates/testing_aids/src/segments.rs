// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Ways of cutting test data into segments.
//!
//! Code that reads segmented data must give the same answer no matter where the segment
//! boundaries fall. These helpers produce the segmentations such tests iterate over.

/// Every way of cutting `data` into two segments, including the cuts that leave the first or
/// the last segment empty.
///
/// ```ignore
/// let splits: Vec<_> = split_points(b"ab").collect();
/// assert_eq!(splits, [[&b""[..], b"ab"], [b"a", b"b"], [b"ab", b""]]);
/// ```
pub fn split_points(data: &[u8]) -> impl Iterator<Item = [&[u8]; 2]> {
    (0..=data.len()).map(move |index| {
        let (head, tail) = data.split_at(index);
        [head, tail]
    })
}

/// Cuts `data` into segments of `size` bytes. The last segment may be shorter.
///
/// # Panics
///
/// Panics if `size` is zero.
#[must_use]
pub fn fixed_chunks(data: &[u8], size: usize) -> Vec<&[u8]> {
    assert!(size > 0, "segment size must be positive");

    data.chunks(size).collect()
}

/// Puts an empty segment before, between and after the given segments.
#[must_use]
pub fn interleave_empty<'a>(segments: &[&'a [u8]]) -> Vec<&'a [u8]> {
    let mut result = Vec::with_capacity(segments.len() * 2 + 1);
    result.push(&[][..]);

    for segment in segments {
        result.push(*segment);
        result.push(&[][..]);
    }

    result
}

/// A representative set of segmentations of `data`: every two-way split, every fixed segment
/// size up to the length of the data, and single-byte segments separated by empty ones.
#[must_use]
pub fn segmentations(data: &[u8]) -> Vec<Vec<&[u8]>> {
    let mut result: Vec<Vec<&[u8]>> = split_points(data).map(|split| split.to_vec()).collect();

    for size in 1..=data.len() {
        result.push(fixed_chunks(data, size));
    }

    result.push(interleave_empty(&fixed_chunks(data, 1)));
    result
}
