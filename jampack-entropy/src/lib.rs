//! # Jampack entropy stage
//!
//! Sorted-rank coding, RLE0 zero-run expansion, and a two-level structured
//! rANS entropy coder, composed into the sub-block framing that makes up a
//! block's payload.
//!
//! ## Pipeline
//!
//! Given a chunk of BWT output:
//! 1. [`rank`] rewrites each byte as its rank under an adaptively reordered
//!    permutation, seeded from the chunk's own byte histogram.
//! 2. [`rle0`] expands runs of rank zero into a compact bit alphabet.
//! 3. [`structured`] entropy-codes that alphabet with a two-level adaptive
//!    model over an rANS core ([`rans`]).
//!
//! [`subblock`] frames one chunk's output with the header a decoder needs
//! to rebuild every model; [`encode_payload`]/[`decode_payload`] chunk a
//! whole block's worth of data into a sequence of those framed sub-blocks.
//!
//! ## Example
//!
//! ```
//! use jampack_entropy::{encode_payload, decode_payload};
//!
//! let data = b"the quick brown fox jumps over the lazy dog".repeat(8);
//! let payload = encode_payload(&data, 1 << 16);
//! let recovered = decode_payload(&payload).unwrap();
//! assert_eq!(recovered, data);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod model;
pub mod rank;
pub mod rans;
pub mod rle0;
pub mod structured;
pub mod subblock;

use jampack_core::error::Result;

/// Encode `data` as a sequence of framed sub-blocks, each holding up to
/// `sub_block_size` bytes of input.
pub fn encode_payload(data: &[u8], sub_block_size: usize) -> Vec<u8> {
    assert!(sub_block_size > 0);
    let mut out = Vec::with_capacity(data.len());
    for chunk in data.chunks(sub_block_size) {
        out.extend(subblock::encode(chunk));
    }
    out
}

/// Decode a payload produced by [`encode_payload`] back into its original
/// bytes, walking sub-blocks until the buffer is consumed.
pub fn decode_payload(payload: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut cursor = 0usize;
    while cursor < payload.len() {
        let (chunk, consumed) = subblock::decode(&payload[cursor..])?;
        out.extend(chunk);
        cursor += consumed;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_single_subblock() {
        let data = b"mississippi mississippi mississippi".to_vec();
        let payload = encode_payload(&data, 1 << 20);
        assert_eq!(decode_payload(&payload).unwrap(), data);
    }

    #[test]
    fn test_roundtrip_multiple_subblocks() {
        let data: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
        let payload = encode_payload(&data, 777);
        assert_eq!(decode_payload(&payload).unwrap(), data);
    }

    #[test]
    fn test_roundtrip_empty_payload() {
        let data: Vec<u8> = Vec::new();
        let payload = encode_payload(&data, 1024);
        assert_eq!(decode_payload(&payload).unwrap(), data);
        assert!(payload.is_empty());
    }

    #[test]
    fn test_corrupt_payload_rejected() {
        let data = b"some reasonably long input to compress for this test".to_vec();
        let mut payload = encode_payload(&data, 1 << 20);
        payload.truncate(payload.len() - 1);
        assert!(decode_payload(&payload).is_err());
    }
}
