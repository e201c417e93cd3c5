//! Sequences one block through every pipeline stage, forward and inverse.
//!
//! `filters -> local-prefix -> lz77 -> bwt -> entropy`, each stage's output
//! feeding the next, matching the source's "two buffers swapped between
//! stages" idiom by threading an owned `Vec<u8>` through instead.

use jampack_core::error::{JampackError, Result};
use jampack_core::leb128;
use jampack_core::options::{BWT_UNITS, FilterMode, Options};
use jampack_filters::SelectionPolicy;

/// Sub-block size the entropy stage frames its rANS-coded chunks at.
const ENTROPY_SUBBLOCK_SIZE: usize = 1 << 16;

fn selection_policy(mode: FilterMode) -> SelectionPolicy {
    match mode {
        FilterMode::Off => SelectionPolicy::AlwaysRaw,
        FilterMode::Heuristic => SelectionPolicy::Heuristic,
        FilterMode::BruteForce => SelectionPolicy::BruteForce,
    }
}

/// Run one block through the full forward pipeline, producing the bytes
/// that go in the archive as this block's payload. An empty block always
/// maps to an empty payload, bypassing every stage — otherwise the BWT
/// strand-index trailer alone would make an empty block's payload larger
/// than the block itself.
pub fn encode_block(data: &[u8], options: &Options) -> Vec<u8> {
    if data.is_empty() {
        return Vec::new();
    }
    let filtered = jampack_filters::encode_block(data, selection_policy(options.filters));
    let predicted = jampack_localprefix::forward(&filtered);
    let matched = jampack_lz77::compress(&predicted, options.match_finder);
    let (bwt_bytes, indices) = jampack_bwt::forward(&matched);
    let framed = frame_bwt(&bwt_bytes, &indices);
    jampack_entropy::encode_payload(&framed, ENTROPY_SUBBLOCK_SIZE)
}

/// Invert [`encode_block`]. `original_len` is the block's pre-compression
/// length, recorded in the archive header, which the filter stage needs to
/// know how its sub-blocks were chunked.
pub fn decode_block(payload: &[u8], options: &Options, original_len: usize) -> Result<Vec<u8>> {
    if payload.is_empty() {
        return Ok(Vec::new());
    }
    let framed = jampack_entropy::decode_payload(payload)?;
    let (bwt_bytes, indices) = unframe_bwt(&framed)?;
    let matched = jampack_bwt::inverse(&bwt_bytes, &indices)?;
    let predicted = jampack_lz77::decompress(&matched)?;
    let filtered = jampack_localprefix::inverse(&predicted);
    let chunk_lens = jampack_filters::chunk_lens_for(original_len);
    jampack_filters::decode_block(&filtered, &chunk_lens)
}

/// Serialize a BWT forward result as `bwt_len | bwt_bytes | indices...`,
/// all but the raw bytes LEB128-encoded, so the framing carries its own
/// length rather than relying on a fixed trailer size derived from
/// `BWT_UNITS` alone.
fn frame_bwt(bwt_bytes: &[u8], indices: &[u32; BWT_UNITS]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bwt_bytes.len() + BWT_UNITS * 5 + 5);
    leb128::encode(bwt_bytes.len() as u64, &mut out);
    out.extend_from_slice(bwt_bytes);
    for &idx in indices {
        leb128::encode(u64::from(idx), &mut out);
    }
    out
}

fn unframe_bwt(data: &[u8]) -> Result<(Vec<u8>, [u32; BWT_UNITS])> {
    let (bwt_len, mut pos) = leb128::decode(data)?;
    let bwt_len = bwt_len as usize;
    let bwt_bytes = data
        .get(pos..pos + bwt_len)
        .ok_or_else(|| JampackError::buffer_underrun("bwt-frame", pos + bwt_len, data.len()))?
        .to_vec();
    pos += bwt_len;

    let mut indices = [0u32; BWT_UNITS];
    for idx in indices.iter_mut() {
        let (v, n) = leb128::decode(&data[pos..])?;
        *idx = u32::try_from(v).map_err(|_| JampackError::invariant("bwt-frame", "strand index overflowed u32"))?;
        pos += n;
    }

    Ok((bwt_bytes, indices))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jampack_core::options::MatchFinder;

    #[test]
    fn test_roundtrip_small_text_block() {
        let data = b"the quick brown fox jumps over the lazy dog".repeat(30);
        let options = Options::default().validate().unwrap();
        let payload = encode_block(&data, &options);
        let recovered = decode_block(&payload, &options, data.len()).unwrap();
        assert_eq!(recovered, data);
    }

    #[test]
    fn test_roundtrip_empty_block() {
        let options = Options::default().validate().unwrap();
        let payload = encode_block(&[], &options);
        let recovered = decode_block(&payload, &options, 0).unwrap();
        assert!(recovered.is_empty());
    }

    #[test]
    fn test_roundtrip_every_match_finder_mode() {
        let data: Vec<u8> = (0..200_000u32).map(|i| ((i * 7) % 251) as u8).collect();
        for mode in [MatchFinder::Dedupe, MatchFinder::HashChain, MatchFinder::SuffixArray] {
            let options = Options {
                match_finder: mode,
                ..Options::default()
            }
            .validate()
            .unwrap();
            let payload = encode_block(&data, &options);
            let recovered = decode_block(&payload, &options, data.len()).unwrap();
            assert_eq!(recovered, data, "match finder {mode:?} failed roundtrip");
        }
    }

    #[test]
    fn test_roundtrip_filters_off() {
        let data: Vec<u8> = (0..50_000u32).map(|i| (i % 255) as u8).collect();
        let options = Options {
            filters: FilterMode::Off,
            ..Options::default()
        }
        .validate()
        .unwrap();
        let payload = encode_block(&data, &options);
        let recovered = decode_block(&payload, &options, data.len()).unwrap();
        assert_eq!(recovered, data);
    }

    #[test]
    fn test_bwt_frame_roundtrip() {
        let bytes = b"hello bwt frame".to_vec();
        let mut indices = [0u32; BWT_UNITS];
        for (i, idx) in indices.iter_mut().enumerate() {
            *idx = i as u32 * 3;
        }
        let framed = frame_bwt(&bytes, &indices);
        let (recovered_bytes, recovered_indices) = unframe_bwt(&framed).unwrap();
        assert_eq!(recovered_bytes, bytes);
        assert_eq!(recovered_indices, indices);
    }

    #[test]
    fn test_truncated_frame_rejected() {
        let bytes = vec![1, 2, 3];
        let indices = [0u32; BWT_UNITS];
        let mut framed = frame_bwt(&bytes, &indices);
        framed.truncate(framed.len() - 1);
        assert!(unframe_bwt(&framed).is_err());
    }
}
