//! Match-token wire format: a 1-byte header packing the common cases of
//! match length and literal run, with LEB128 extensions for either field
//! when it saturates, and a full LEB128 offset.

use jampack_core::error::{JampackError, Result};
use jampack_core::leb128;

/// Shortest match worth tokenizing.
pub const MIN_MATCH: usize = 4;
/// Match length at or above which a token is always emitted, bypassing the
/// anti-context peak filter.
pub const DUPE_MATCH: usize = 256;
/// Candidate tokens buffered before the cyclic-hash-history model is built
/// and the batch is filtered.
pub const TOKEN_BUFFER_SIZE: usize = 1 << 16;

/// Append a match/literal/offset token. `offset == 0` is the stream
/// terminator: the remaining input is a raw literal tail.
pub fn write_token(out: &mut Vec<u8>, match_len: usize, literal_len: usize, offset: usize) {
    let match_field = (match_len - MIN_MATCH).min(31);
    let literal_field = literal_len.min(7);
    let header = ((match_field as u8) << 3) | (literal_field as u8);
    out.push(header);
    leb128::encode(offset as u64, out);
    if match_field == 31 {
        leb128::encode((match_len - MIN_MATCH - 31) as u64, out);
    }
    if literal_field == 7 {
        leb128::encode((literal_len - 7) as u64, out);
    }
}

/// Parsed token plus the number of input bytes it consumed.
pub struct DecodedToken {
    /// Match length (0 only for the terminator, where it's meaningless).
    pub match_len: usize,
    /// Literal run length preceding the match.
    pub literal_len: usize,
    /// Back-reference distance; 0 marks the terminator.
    pub offset: usize,
    /// Bytes of `data` the token occupied.
    pub consumed: usize,
}

/// Parse one token from the front of `data`.
pub fn read_token(data: &[u8]) -> Result<DecodedToken> {
    let header = *data
        .first()
        .ok_or_else(|| JampackError::buffer_underrun("lz77", 1, data.len()))?;
    let mut pos = 1;

    let (offset, n) = leb128::decode(&data[pos..])?;
    pos += n;

    let mut match_len = (header >> 3) as usize;
    if match_len == 31 {
        let (ext, n) = leb128::decode(&data[pos..])?;
        pos += n;
        match_len += ext as usize;
    }
    match_len += MIN_MATCH;

    let mut literal_len = (header & 7) as usize;
    if literal_len == 7 {
        let (ext, n) = leb128::decode(&data[pos..])?;
        pos += n;
        literal_len += ext as usize;
    }

    Ok(DecodedToken {
        match_len,
        literal_len,
        offset: offset as usize,
        consumed: pos,
    })
}

/// Encoded size in bytes of a (match, literal, offset) token, used to score
/// whether a candidate match is worth spending a token on.
pub fn token_size(match_len: usize, literal_len: usize, offset: usize) -> usize {
    let mut size = 1;
    let mut scratch = Vec::new();
    leb128::encode(offset as u64, &mut scratch);
    size += scratch.len();

    if match_len >= MIN_MATCH + 31 {
        scratch.clear();
        leb128::encode((match_len - MIN_MATCH - 31) as u64, &mut scratch);
        size += scratch.len();
    }
    if literal_len >= 7 {
        scratch.clear();
        leb128::encode((literal_len - 7) as u64, &mut scratch);
        size += scratch.len();
    }
    size
}

/// Compression ratio a candidate token would achieve: `match / token_size`,
/// or 0 when the match is too short or not worth a token at all.
pub fn compressible(match_len: usize, literal_len: usize, offset: usize) -> f32 {
    if match_len < MIN_MATCH {
        return 0.0;
    }
    let cost = token_size(match_len, literal_len, offset);
    if cost == 0 || match_len <= cost {
        return 0.0;
    }
    match_len as f32 / cost as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_small_fields() {
        let mut buf = Vec::new();
        write_token(&mut buf, 10, 3, 100);
        let t = read_token(&buf).unwrap();
        assert_eq!(t.match_len, 10);
        assert_eq!(t.literal_len, 3);
        assert_eq!(t.offset, 100);
        assert_eq!(t.consumed, buf.len());
    }

    #[test]
    fn test_roundtrip_saturated_match_field() {
        let mut buf = Vec::new();
        write_token(&mut buf, MIN_MATCH + 500, 2, 5000);
        let t = read_token(&buf).unwrap();
        assert_eq!(t.match_len, MIN_MATCH + 500);
        assert_eq!(t.literal_len, 2);
        assert_eq!(t.offset, 5000);
    }

    #[test]
    fn test_roundtrip_saturated_literal_field() {
        let mut buf = Vec::new();
        write_token(&mut buf, 6, 900, 42);
        let t = read_token(&buf).unwrap();
        assert_eq!(t.match_len, 6);
        assert_eq!(t.literal_len, 900);
        assert_eq!(t.offset, 42);
    }

    #[test]
    fn test_roundtrip_both_saturated() {
        let mut buf = Vec::new();
        write_token(&mut buf, MIN_MATCH + 1000, 2000, 999_999);
        let t = read_token(&buf).unwrap();
        assert_eq!(t.match_len, MIN_MATCH + 1000);
        assert_eq!(t.literal_len, 2000);
        assert_eq!(t.offset, 999_999);
    }

    #[test]
    fn test_terminator_has_zero_offset() {
        let mut buf = Vec::new();
        write_token(&mut buf, MIN_MATCH, 37, 0);
        let t = read_token(&buf).unwrap();
        assert_eq!(t.offset, 0);
        assert_eq!(t.literal_len, 37);
    }

    #[test]
    fn test_compressible_rejects_short_match() {
        assert_eq!(compressible(1, 0, 10), 0.0);
    }

    #[test]
    fn test_compressible_rewards_long_cheap_match() {
        let score = compressible(1000, 0, 4);
        assert!(score > 1.0);
    }

    #[test]
    fn test_truncated_token_rejected() {
        assert!(read_token(&[]).is_err());
    }
}
