//! Sub-block framing: rank-code, RLE0, then structured rANS, with a header
//! that lets a decoder rebuild every model from scratch.
//!
//! ```text
//! rank_freqs[256 x LEB128] | olen[LEB128] | clen[LEB128] | rlen[LEB128] | rans_bytes[clen]
//! ```
//! `olen` is the sub-block's original byte count, `rlen` the symbol count
//! after RLE0 expansion, `clen` the length of the rANS payload that follows.

use crate::rank;
use crate::rle0;
use crate::structured::StructuredCoder;
use jampack_core::error::{JampackError, Result};
use jampack_core::leb128;

/// Encode one sub-block of BWT output into its framed, entropy-coded form.
pub fn encode(data: &[u8]) -> Vec<u8> {
    let mut histogram = [0u32; 256];
    for &b in data {
        histogram[b as usize] += 1;
    }
    let order = rank::order_from_histogram(&histogram);

    let ranks = rank::encode(data, &order);
    let rle_symbols = rle0::encode(&ranks);
    let rans_bytes = StructuredCoder::new().encode(&rle_symbols);

    let mut out = Vec::with_capacity(256 + 16 + rans_bytes.len());
    for &count in &histogram {
        leb128::encode(u64::from(count), &mut out);
    }
    leb128::encode(data.len() as u64, &mut out);
    leb128::encode(rans_bytes.len() as u64, &mut out);
    leb128::encode(rle_symbols.len() as u64, &mut out);
    out.extend_from_slice(&rans_bytes);
    out
}

/// The on-disk header fields of a sub-block, plus where its rANS payload
/// starts and ends within the framed buffer.
struct Header {
    order: [u8; 256],
    olen: usize,
    clen: usize,
    rlen: usize,
    payload_start: usize,
}

fn parse_header(buf: &[u8]) -> Result<Header> {
    let mut cursor = 0usize;
    let mut histogram = [0u32; 256];
    for count in histogram.iter_mut() {
        let (freq, used) = leb128::decode(&buf[cursor..])?;
        cursor += used;
        *count = freq as u32;
    }
    let order = rank::order_from_histogram(&histogram);

    let (olen, used) = leb128::decode(&buf[cursor..])?;
    cursor += used;
    let (clen, used) = leb128::decode(&buf[cursor..])?;
    cursor += used;
    let (rlen, used) = leb128::decode(&buf[cursor..])?;
    cursor += used;

    Ok(Header {
        order,
        olen: olen as usize,
        clen: clen as usize,
        rlen: rlen as usize,
        payload_start: cursor,
    })
}

/// Decode one framed sub-block, returning the recovered bytes and the
/// number of input bytes consumed.
pub fn decode(buf: &[u8]) -> Result<(Vec<u8>, usize)> {
    let header = parse_header(buf)?;
    let end = header
        .payload_start
        .checked_add(header.clen)
        .ok_or_else(|| JampackError::corrupt_header("sub-block clen overflowed buffer length"))?;
    let payload = buf
        .get(header.payload_start..end)
        .ok_or_else(|| JampackError::buffer_underrun("subblock", end, buf.len()))?;

    let rle_symbols = StructuredCoder::new().decode(payload, header.rlen)?;
    let ranks = rle0::decode(&rle_symbols, header.olen);
    if ranks.len() != header.olen {
        return Err(JampackError::invariant(
            "subblock",
            "RLE0 decode produced a different length than the recorded original length",
        ));
    }
    let data = rank::decode(&ranks, &header.order);
    Ok((data, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_text() {
        let data = b"the quick brown fox jumps over the lazy dog, again and again".repeat(4);
        let framed = encode(&data);
        let (decoded, consumed) = decode(&framed).unwrap();
        assert_eq!(decoded, data);
        assert_eq!(consumed, framed.len());
    }

    #[test]
    fn test_roundtrip_with_zero_runs() {
        let mut data = vec![0u8; 500];
        data.extend(b"hello");
        data.extend(vec![0u8; 200]);
        let framed = encode(&data);
        let (decoded, _) = decode(&framed).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn test_roundtrip_empty() {
        let data: Vec<u8> = Vec::new();
        let framed = encode(&data);
        let (decoded, consumed) = decode(&framed).unwrap();
        assert_eq!(decoded, data);
        assert_eq!(consumed, framed.len());
    }

    #[test]
    fn test_roundtrip_single_byte() {
        let data = vec![7u8];
        let framed = encode(&data);
        let (decoded, _) = decode(&framed).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn test_two_subblocks_concatenated() {
        let a = b"aaaaaaaaaaaaaaaaaaaa".to_vec();
        let b = b"bcbcbcbcbcbcbcbcbcbc".to_vec();
        let mut buf = encode(&a);
        buf.extend(encode(&b));

        let (decoded_a, consumed_a) = decode(&buf).unwrap();
        assert_eq!(decoded_a, a);
        let (decoded_b, consumed_b) = decode(&buf[consumed_a..]).unwrap();
        assert_eq!(decoded_b, b);
        assert_eq!(consumed_a + consumed_b, buf.len());
    }

    #[test]
    fn test_truncated_subblock_rejected() {
        let data = b"some data to compress and then truncate".to_vec();
        let framed = encode(&data);
        let truncated = &framed[..framed.len() - 2];
        assert!(decode(truncated).is_err());
    }
}
