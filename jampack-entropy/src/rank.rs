//! Weighted-frequency-count sorted-rank coding.
//!
//! Rewrites each byte as its current rank in an adaptively-reordered
//! permutation of the 256-symbol alphabet, a bijective generalization of
//! move-to-front: the `WFC_UPDATE` most frequent recent symbols are kept
//! sorted by a decaying frequency estimate (ranks `0..WFC_UPDATE`), while
//! everything past that just shifts one slot toward the front in blocks of
//! four (`LB = idx >> 2`), same as plain MTF. Unlike MTF, the starting
//! permutation isn't required to be the identity — callers seed it with
//! whatever order a block's global byte histogram suggests, so the coder
//! starts close to ideal instead of re-learning it from scratch.

const WFC_UPDATE: usize = 8;
const FREQ_RANGE: i32 = 1 << 16;
const RATE: u32 = 3;

struct FreqTable {
    freq: [i32; WFC_UPDATE],
}

impl FreqTable {
    fn new() -> Self {
        Self {
            freq: [FREQ_RANGE / 256; WFC_UPDATE],
        }
    }

    fn bump(&mut self, idx: usize) {
        for (k, f) in self.freq.iter_mut().enumerate() {
            if k == idx {
                *f += (FREQ_RANGE - *f) >> RATE;
            } else {
                *f -= *f >> RATE;
            }
        }
    }
}

/// Bubble rank `idx` toward the front of the hot set so the table stays
/// sorted by descending frequency; returns the sequence of `(a, b)` rank
/// swaps applied, in order, so a caller can replay them on a parallel
/// array (`R2S`/`S2R` in the encoder, `R2S` alone in the decoder).
fn sorted_swaps(freq: &[i32; WFC_UPDATE], idx: usize) -> Vec<(usize, usize)> {
    let mut freq = *freq;
    let mut swaps = Vec::new();
    if idx == 0 {
        return swaps;
    }
    for i in 1..WFC_UPDATE {
        let mut j = i;
        while j > 0 && freq[j - 1] < freq[j] {
            freq.swap(j - 1, j);
            swaps.push((j - 1, j));
            j -= 1;
        }
    }
    swaps
}

/// Encode `input` into its sequence of ranks under `initial_order` (a
/// permutation of `0..=255` mapping rank to symbol).
pub fn encode(input: &[u8], initial_order: &[u8; 256]) -> Vec<u8> {
    let mut r2s = *initial_order;
    let mut s2r = [0u8; 256];
    for (rank, &sym) in r2s.iter().enumerate() {
        s2r[sym as usize] = rank as u8;
    }
    let mut freqs = FreqTable::new();
    let mut out = Vec::with_capacity(input.len());

    for &c in input {
        let idx = s2r[c as usize] as usize;
        out.push(idx as u8);

        if idx < WFC_UPDATE {
            let swaps = sorted_swaps(&freqs.freq, idx);
            freqs.bump(idx);
            for (a, b) in swaps {
                r2s.swap(a, b);
                s2r[r2s[a] as usize] = a as u8;
                s2r[r2s[b] as usize] = b as u8;
            }
        } else {
            let lb = idx >> 2;
            let mut idx_cpy = idx;
            loop {
                r2s[idx_cpy] = r2s[idx_cpy - 1];
                s2r[r2s[idx_cpy] as usize] = idx_cpy as u8;
                idx_cpy -= 1;
                if !(lb < idx_cpy) {
                    break;
                }
            }
            r2s[lb] = c;
            s2r[c as usize] = lb as u8;
        }
    }
    out
}

/// Invert [`encode`]: recover the original bytes from their ranks under the
/// same `initial_order` used to encode them.
pub fn decode(ranks: &[u8], initial_order: &[u8; 256]) -> Vec<u8> {
    let mut r2s = *initial_order;
    let mut freqs = FreqTable::new();
    let mut out = Vec::with_capacity(ranks.len());

    for &rank in ranks {
        let idx = rank as usize;
        let c = r2s[idx];
        out.push(c);

        if idx < WFC_UPDATE {
            let swaps = sorted_swaps(&freqs.freq, idx);
            freqs.bump(idx);
            for (a, b) in swaps {
                r2s.swap(a, b);
            }
        } else {
            let lb = idx >> 2;
            let mut idx_cpy = idx;
            loop {
                r2s[idx_cpy] = r2s[idx_cpy - 1];
                idx_cpy -= 1;
                if !(lb < idx_cpy) {
                    break;
                }
            }
            r2s[lb] = c;
        }
    }
    out
}

/// Build the rank-0 initial order from a 256-entry symbol histogram: most
/// frequent symbol first. Ties break by symbol value for determinism.
pub fn order_from_histogram(histogram: &[u32; 256]) -> [u8; 256] {
    let mut symbols: Vec<u8> = (0..=255u8).collect();
    symbols.sort_by(|&a, &b| {
        histogram[b as usize]
            .cmp(&histogram[a as usize])
            .then(a.cmp(&b))
    });
    let mut order = [0u8; 256];
    order.copy_from_slice(&symbols);
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity_order() -> [u8; 256] {
        let mut order = [0u8; 256];
        for (i, slot) in order.iter_mut().enumerate() {
            *slot = i as u8;
        }
        order
    }

    #[test]
    fn test_roundtrip_identity_order() {
        let input: Vec<u8> = (0..=255u8).chain(0..=255u8).collect();
        let order = identity_order();
        let ranks = encode(&input, &order);
        assert_eq!(decode(&ranks, &order), input);
    }

    #[test]
    fn test_roundtrip_repetitive() {
        let input = b"abababababababababab".to_vec();
        let order = identity_order();
        let ranks = encode(&input, &order);
        assert_eq!(decode(&ranks, &order), input);
    }

    #[test]
    fn test_roundtrip_histogram_seeded() {
        let input = b"the quick brown fox jumps over the lazy dog the the the".to_vec();
        let mut histogram = [0u32; 256];
        for &b in &input {
            histogram[b as usize] += 1;
        }
        let order = order_from_histogram(&histogram);
        let ranks = encode(&input, &order);
        assert_eq!(decode(&ranks, &order), input);
    }

    #[test]
    fn test_hot_symbol_gets_low_rank() {
        // A symbol repeated densely should quickly earn rank 0.
        let mut input = vec![b'z'; 4];
        input.extend(b"abcdefgh");
        input.extend(vec![b'z'; 4]);
        let order = identity_order();
        let ranks = encode(&input, &order);
        assert_eq!(ranks[0], b'z');
        assert!(ranks[ranks.len() - 1] < ranks[0]);
    }

    #[test]
    fn test_roundtrip_single_byte() {
        let order = identity_order();
        let ranks = encode(&[42], &order);
        assert_eq!(decode(&ranks, &order), vec![42]);
    }

    #[test]
    fn test_roundtrip_empty() {
        let order = identity_order();
        let ranks = encode(&[], &order);
        assert_eq!(decode(&ranks, &order), Vec::<u8>::new());
    }

    #[test]
    fn test_order_from_histogram_puts_max_first() {
        let mut histogram = [1u32; 256];
        histogram[200] = 1000;
        let order = order_from_histogram(&histogram);
        assert_eq!(order[0], 200);
    }
}
