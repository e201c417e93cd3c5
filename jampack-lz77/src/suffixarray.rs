//! Mode 2 match finder: a suffix array lets each position look at its
//! lexicographic neighbors directly instead of walking a hash chain, so the
//! search examines a fixed window around each position's rank rather than a
//! fixed number of hash collisions.

use crate::finder::{filter_and_emit, Candidate};
use crate::token::{write_token, MIN_MATCH, TOKEN_BUFFER_SIZE};

/// How many ranks on either side of a position's own rank are examined for
/// a usable backward match.
const NEIGHBOR_RADIUS: usize = 1 << 12;

/// Rank-doubling suffix array construction (`O(n log^2 n)`), the same
/// approach the block transform uses to order rotations, duplicated here
/// because this crate has no need to depend on that one just for this.
fn suffix_array(s: &[u8]) -> Vec<u32> {
    let n = s.len();
    let mut sa: Vec<u32> = (0..n as u32).collect();
    let mut rank: Vec<i64> = s.iter().map(|&b| b as i64).collect();
    let mut tmp = vec![0i64; n];

    let mut k = 1usize;
    while k < n {
        let key = |i: u32| -> (i64, i64) {
            let i = i as usize;
            let primary = rank[i];
            let secondary = if i + k < n { rank[i + k] } else { -1 };
            (primary, secondary)
        };
        sa.sort_unstable_by(|&a, &b| key(a).cmp(&key(b)));

        tmp[sa[0] as usize] = 0;
        for i in 1..n {
            let prev_key = key(sa[i - 1]);
            let cur_key = key(sa[i]);
            tmp[sa[i] as usize] = tmp[sa[i - 1] as usize] + i64::from(cur_key > prev_key);
        }
        rank.copy_from_slice(&tmp);

        if rank[sa[n - 1] as usize] as usize == n - 1 {
            break;
        }
        k *= 2;
    }

    sa
}

/// Compress `input` using the suffix-array finder.
pub fn compress(input: &[u8]) -> Vec<u8> {
    let len = input.len();
    if len == 0 {
        return Vec::new();
    }

    let sa = suffix_array(input);
    let mut isa = vec![0u32; len];
    for (rank, &position) in sa.iter().enumerate() {
        isa[position as usize] = rank as u32;
    }

    let mut output = Vec::new();
    let mut candidates: Vec<Candidate> = Vec::new();
    let mut emitted_end = 0usize;
    let mut pos = 0usize;

    while pos < len {
        let mut best_len = 0usize;
        let mut best_off = 0usize;

        if pos + MIN_MATCH <= len {
            let rank = isa[pos] as usize;
            let lo = rank.saturating_sub(NEIGHBOR_RADIUS);
            let hi = (rank + NEIGHBOR_RADIUS).min(sa.len() - 1);
            for neighbor_rank in lo..=hi {
                if neighbor_rank == rank {
                    continue;
                }
                let cpos = sa[neighbor_rank] as usize;
                if cpos >= pos {
                    continue;
                }
                let max_len = len - pos;
                let mut fwd = 0usize;
                while fwd < max_len && input[cpos + fwd] == input[pos + fwd] {
                    fwd += 1;
                }
                if fwd > best_len {
                    best_len = fwd;
                    best_off = pos - cpos;
                }
            }
        }

        if best_len >= MIN_MATCH {
            candidates.push(Candidate {
                position: pos,
                match_len: best_len,
                offset: best_off,
            });
            pos += best_len;
        } else {
            pos += 1;
        }

        if candidates.len() >= TOKEN_BUFFER_SIZE {
            filter_and_emit(input, &candidates, &mut output, &mut emitted_end);
            candidates.clear();
        }
    }

    if !candidates.is_empty() {
        filter_and_emit(input, &candidates, &mut output, &mut emitted_end);
    }

    let tail_len = len - emitted_end;
    write_token(&mut output, MIN_MATCH, tail_len, 0);
    output.extend_from_slice(&input[emitted_end..]);
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::decompress;

    #[test]
    fn test_empty_input() {
        assert!(compress(&[]).is_empty());
    }

    #[test]
    fn test_suffix_array_orders_rotations_lexicographically() {
        let sa = suffix_array(b"banana");
        let mut suffixes: Vec<&[u8]> = sa.iter().map(|&i| &b"banana"[i as usize..]).collect();
        let mut sorted = suffixes.clone();
        sorted.sort_unstable();
        assert_eq!(suffixes, sorted);
        suffixes.clear();
    }

    #[test]
    fn test_text_roundtrips() {
        let data = b"she sells seashells by the seashore, seashells she sells are surely seashells".to_vec();
        let packed = compress(&data);
        assert_eq!(decompress(&packed).unwrap(), data);
    }

    #[test]
    fn test_single_byte_input_roundtrips() {
        let data = b"a".to_vec();
        let packed = compress(&data);
        assert_eq!(decompress(&packed).unwrap(), data);
    }
}
