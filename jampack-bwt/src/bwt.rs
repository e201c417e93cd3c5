//! Burrows-Wheeler Transform with `BWT_UNITS`-way parallel inversion.
//!
//! The forward transform samples the suffix array at `BWT_UNITS` evenly
//! spaced ranks and records where each sampled rank landed in sorted order;
//! those recorded positions seed `BWT_UNITS` independent walks through the
//! LF-mapping on decode, which is what lets the inverse run as independent
//! strands instead of one long sequential chain.
//!
//! Trailing bytes that don't fill a whole `BWT_UNITS`-sized block pass
//! through unchanged, appended after the transformed prefix.

use jampack_core::error::{JampackError, Result};
use jampack_core::options::BWT_UNITS;
use rayon::prelude::*;

/// Forward BWT. Returns the transformed bytes (same length as `data`) and
/// the `BWT_UNITS` strand-seed indices to carry alongside it.
pub fn forward(data: &[u8]) -> (Vec<u8>, [u32; BWT_UNITS]) {
    let n = data.len();
    let mut indices = [0u32; BWT_UNITS];
    let mut bwt = vec![0u8; n];

    let remainder = n % BWT_UNITS;
    let new_len = n - remainder;
    bwt[new_len..].copy_from_slice(&data[new_len..]);

    if new_len == 0 {
        return (bwt, indices);
    }

    let sa = suffix_array(&data[..new_len]);
    let step = new_len / BWT_UNITS;

    for (i, &suffix) in sa.iter().enumerate() {
        if (suffix as usize) % step == 0 {
            indices[suffix as usize / step] = i as u32;
        }
    }

    let idx = indices[0] as usize;
    bwt[0] = data[new_len - 1];
    for (i, &suffix) in sa.iter().enumerate().take(idx) {
        bwt[i + 1] = data[(suffix as usize + new_len - 1) % new_len];
    }
    for (i, &suffix) in sa.iter().enumerate().skip(idx + 1) {
        bwt[i] = data[(suffix as usize + new_len - 1) % new_len];
    }

    for v in indices.iter_mut() {
        *v += 1;
    }

    (bwt, indices)
}

/// Inverse BWT. `bwt` and `indices` must be exactly what [`forward`]
/// produced for a block of the same length.
pub fn inverse(bwt: &[u8], indices: &[u32; BWT_UNITS]) -> Result<Vec<u8>> {
    let n = bwt.len();
    let remainder = n % BWT_UNITS;
    let new_len = n - remainder;

    let mut out = vec![0u8; n];
    out[new_len..].copy_from_slice(&bwt[new_len..]);

    if new_len == 0 {
        return Ok(out);
    }

    let idx = indices[0] as usize;
    if idx == 0 || idx > new_len {
        return Err(JampackError::invariant(
            "bwt",
            format!("original-row index {idx} out of range for block of length {new_len}"),
        ));
    }

    let mut freq = [0u32; 256];
    for &b in &bwt[..new_len] {
        freq[b as usize] += 1;
    }
    let mut count = [0u32; 256];
    for sym in 1..256 {
        count[sym] = count[sym - 1] + freq[sym - 1];
    }

    let mut map = vec![0u32; new_len];
    let mut cursor = count;
    for (i, &b) in bwt[..new_len].iter().enumerate() {
        let slot = &mut cursor[b as usize];
        map[*slot as usize] = i as u32 + u32::from(i >= idx);
        *slot += 1;
    }

    let step = new_len / BWT_UNITS;
    out[..new_len]
        .par_chunks_mut(step)
        .enumerate()
        .try_for_each(|(strand, chunk)| -> Result<()> {
            let mut p = indices[strand] as usize;
            for slot in chunk.iter_mut() {
                if p == 0 || p > new_len {
                    return Err(JampackError::invariant(
                        "bwt",
                        "LF-mapping walk left the block's valid row range",
                    ));
                }
                p = map[p - 1] as usize;
                let row = p - usize::from(p >= idx);
                *slot = *bwt.get(row).ok_or_else(|| {
                    JampackError::invariant("bwt", "LF-mapping produced an out-of-range row")
                })?;
            }
            Ok(())
        })?;

    Ok(out)
}

/// Rank-doubling suffix array construction, `O(n log^2 n)`. Jampack blocks
/// are sorted in full rather than streamed, so simplicity wins here over the
/// asymptotically faster SA-IS family.
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
