//! # Jampack local-prefix model
//!
//! A bijective transform that predicts each byte from a byte copied `dist`
//! bytes earlier — chosen per-context by a small adaptive table rather than
//! a general match search — and emits the XOR residual. Cheap to run and
//! effective on runs with short, locally repeating structure (padding,
//! fixed-stride records, aligned zero runs) that the heavier LZ77 and BWT
//! stages further down the pipeline are not specialized for.
//!
//! The block is split into [`SEGMENT_COUNT`] independent segments, each
//! with its own zeroed tables, so encode and decode both parallelize with
//! no cross-segment dependency.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

mod decoder;
mod encoder;
mod model;

pub use model::{MAX_RECORD_SIZE, MAX_THRESHOLD, MIN_THRESHOLD};

use rayon::prelude::*;

/// Number of independent segments a block is split into for parallel
/// encode/decode.
pub const SEGMENT_COUNT: usize = 4;

fn segment_bounds(len: usize) -> Vec<(usize, usize)> {
    if len == 0 {
        return Vec::new();
    }
    let base = len / SEGMENT_COUNT;
    let remainder = len % SEGMENT_COUNT;
    let mut bounds = Vec::with_capacity(SEGMENT_COUNT);
    let mut start = 0;
    for i in 0..SEGMENT_COUNT {
        let extra = usize::from(i < remainder);
        let end = start + base + extra;
        if end > start {
            bounds.push((start, end));
        }
        start = end;
    }
    bounds
}

/// Forward transform: splits `data` into [`SEGMENT_COUNT`] segments,
/// predicts each segment's bytes from its own adaptive tables, and
/// concatenates the residuals back in order.
pub fn forward(data: &[u8]) -> Vec<u8> {
    let bounds = segment_bounds(data.len());
    let segments: Vec<Vec<u8>> = bounds
        .par_iter()
        .map(|&(start, end)| encoder::forward_segment(&data[start..end]))
        .collect();
    segments.concat()
}

/// Invert [`forward`].
pub fn inverse(data: &[u8]) -> Vec<u8> {
    let bounds = segment_bounds(data.len());
    let segments: Vec<Vec<u8>> = bounds
        .par_iter()
        .map(|&(start, end)| decoder::inverse_segment(&data[start..end]))
        .collect();
    segments.concat()
}
