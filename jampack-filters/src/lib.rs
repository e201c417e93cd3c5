//! # Jampack structural filters
//!
//! Per-sub-block structural transforms (delta, LPC, inline-delta) that
//! expose the byte-level redundancy structured formats carry — interleaved
//! samples, fixed-width records — before the block reaches the BWT stage,
//! which is good at statistical but not positional redundancy.
//!
//! Each sub-block of up to [`MAX_SUBBLOCK_SIZE`] bytes gets its own 2-byte
//! `{type, width}` header (see [`FilterConfig::to_header`]) followed by the
//! transformed bytes, so a decoder never needs side information beyond the
//! stream itself.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

mod config;
mod decoder;
mod encoder;

pub use config::{FilterConfig, FilterType, SelectionPolicy, MAX_WIDTH, MIN_WIDTH};
pub use decoder::invert;
pub use encoder::{apply, select};

use jampack_core::error::{JampackError, Result};

/// Upper bound on a filtered sub-block's input size (spec: "≤ 64 KiB per
/// sub-block").
pub const MAX_SUBBLOCK_SIZE: usize = 64 * 1024;

/// Filter a whole block, splitting it into [`MAX_SUBBLOCK_SIZE`] chunks and
/// choosing (and recording) a configuration for each one under `policy`.
pub fn encode_block(data: &[u8], policy: SelectionPolicy) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() + data.len() / MAX_SUBBLOCK_SIZE * 2 + 2);
    let mut previous = None;
    for chunk in data.chunks(MAX_SUBBLOCK_SIZE) {
        let cfg = select(chunk, policy, previous);
        previous = Some(cfg);
        out.extend_from_slice(&cfg.to_header());
        out.extend(apply(chunk, cfg));
    }
    out
}

/// Invert [`encode_block`]. `chunk_lens` must list the original (pre-filter)
/// byte count of every sub-block, in order, since a filtered sub-block's
/// length on the wire equals its input length (no filter here changes
/// size) — callers that don't already track this can pass `None` once the
/// block is known to be a single sub-block shorter than
/// [`MAX_SUBBLOCK_SIZE`].
pub fn decode_block(data: &[u8], chunk_lens: &[usize]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(data.len());
    let mut cursor = 0usize;
    for &len in chunk_lens {
        let header: [u8; 2] = data
            .get(cursor..cursor + 2)
            .and_then(|s| s.try_into().ok())
            .ok_or_else(|| JampackError::buffer_underrun("filters", cursor + 2, data.len()))?;
        cursor += 2;
        let cfg = FilterConfig::from_header(header)
            .ok_or_else(|| JampackError::corrupt_header("invalid filter sub-block header"))?;
        let chunk = data
            .get(cursor..cursor + len)
            .ok_or_else(|| JampackError::buffer_underrun("filters", cursor + len, data.len()))?;
        cursor += len;
        out.extend(invert(chunk, cfg));
    }
    Ok(out)
}

/// Sub-block lengths [`decode_block`] needs, derived from the original
/// data's length the way [`encode_block`] chunked it.
pub fn chunk_lens_for(original_len: usize) -> Vec<usize> {
    if original_len == 0 {
        return Vec::new();
    }
    let mut lens = Vec::new();
    let mut remaining = original_len;
    while remaining > 0 {
        let take = remaining.min(MAX_SUBBLOCK_SIZE);
        lens.push(take);
        remaining -= take;
    }
    lens
}
