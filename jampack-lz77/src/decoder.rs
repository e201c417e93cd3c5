//! Decodes the token stream shared by all three match finders: a literal
//! run followed by a back-reference copy, repeated until a zero-offset
//! terminator token is hit, after which the rest of the input is a raw
//! literal tail.

use crate::token::read_token;
use jampack_core::error::{JampackError, Result};

/// Decompress a token stream produced by any of [`crate::dedupe`],
/// [`crate::hashchain`] or [`crate::suffixarray`].
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    if data.is_empty() {
        return Ok(Vec::new());
    }

    let mut output = Vec::new();
    let mut pos = 0usize;

    loop {
        let token = read_token(&data[pos..])?;
        pos += token.consumed;

        let lit_end = pos
            .checked_add(token.literal_len)
            .ok_or_else(|| JampackError::invariant("lz77", "literal run overflowed stream length"))?;
        let literal = data
            .get(pos..lit_end)
            .ok_or_else(|| JampackError::buffer_underrun("lz77", lit_end, data.len()))?;
        output.extend_from_slice(literal);
        pos = lit_end;

        if token.offset == 0 {
            output.extend_from_slice(&data[pos..]);
            return Ok(output);
        }

        if token.offset > output.len() {
            return Err(JampackError::invariant("lz77", "match offset exceeds decoded output"));
        }
        let start = output.len() - token.offset;
        overlap_copy(&mut output, start, token.match_len);
    }
}

/// A left-to-right copy that tolerates `length > offset`: bytes written
/// earlier in the copy become valid source bytes for later ones, which is
/// what makes a short back-reference able to produce a long run.
fn overlap_copy(output: &mut Vec<u8>, start: usize, length: usize) {
    output.reserve(length);
    for i in 0..length {
        let byte = output[start + i];
        output.push(byte);
    }
}
