//! Fast order-0 / order-1 entropy estimation, used by the filter and match
//! finder stages to score candidate configurations without actually
//! entropy-coding them.
//!
//! The estimator scales symbol probabilities onto a fixed-point table
//! (`SCALE = 2^16`) and looks up `-log2(p)` from a precomputed table rather
//! than calling `log2` per symbol, exactly the way the original profiler
//! traded table memory for speed.

/// Fixed-point probability scale used for the `-log2` lookup table.
pub const SCALE: usize = 1 << 16;

/// Lazily built `-log2(i / SCALE)` table, indexed by scaled probability.
fn log_table() -> &'static [f64; SCALE] {
    use std::sync::OnceLock;
    static TABLE: OnceLock<Box<[f64; SCALE]>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = Box::new([0.0f64; SCALE]);
        for (i, slot) in table.iter_mut().enumerate().skip(1) {
            let p = i as f64 / SCALE as f64;
            *slot = -p.log2();
        }
        table[0] = 0.0;
        table
    })
}

/// Order-0 (memoryless) entropy estimate, in bits per symbol.
pub fn order0(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let mut freqs = [0u64; 256];
    for &b in data {
        freqs[b as usize] += 1;
    }
    let log = log_table();
    let len = data.len() as f64;
    let mut bits = 0.0;
    for &f in &freqs {
        if f == 0 {
            continue;
        }
        let scaled = ((f as f64 / len) * SCALE as f64) as usize;
        let scaled = scaled.min(SCALE - 1);
        bits += log[scaled] * f as f64;
    }
    bits / len
}

/// Order-1 (previous-byte-conditioned) entropy estimate, in bits per symbol.
///
/// Builds a 256x256 context table, which is why this is only ever called on
/// the small sub-blocks the filter stage scores (`<= 64 KiB`), never on a
/// whole multi-megabyte block.
pub fn order1(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let mut freqs = vec![0u64; 256 * 256];
    let mut totals = [0u64; 256];
    let mut ctx: usize = 0;
    for &b in data {
        freqs[ctx * 256 + b as usize] += 1;
        totals[ctx] += 1;
        ctx = b as usize;
    }

    let log = log_table();
    let len = data.len() as f64;
    let mut bits = 0.0;
    for c in 0..256 {
        let total = totals[c];
        if total == 0 {
            continue;
        }
        for s in 0..256 {
            let f = freqs[c * 256 + s];
            if f == 0 {
                continue;
            }
            let scaled = ((f as f64 / total as f64) * SCALE as f64) as usize;
            let scaled = scaled.min(SCALE - 1);
            bits += log[scaled] * f as f64;
        }
    }
    bits / len
}

/// Mixed order-0/order-1 entropy, used as the default scoring function for
/// filter and dedupe-configuration selection: cheap enough to run per
/// candidate, discriminating enough to rank them.
pub fn mixed(data: &[u8]) -> f64 {
    (order0(data) + order1(data)) / 2.0
}

/// Entropy of the sorted-rank-transformed block: buckets bytes by value
/// (a cheap stand-in for a full BWT) and measures the order-1 entropy of the
/// result. Used by the filter heuristic to get a close guess at how well a
/// candidate configuration will compress once it reaches the real BWT/rANS
/// stages, without paying for a real suffix sort per candidate.
pub fn sorted_entropy(data: &[u8]) -> f64 {
    let n = data.len();
    if n == 0 {
        return 0.0;
    }
    let mut bucket = [0usize; 257];
    for &b in data {
        bucket[b as usize + 1] += 1;
    }
    for i in 1..256 {
        bucket[i] += bucket[i - 1];
    }
    let mut sorted = vec![0u8; n];
    let mut cursor = bucket;
    for i in 0..n {
        let prev = data[(i + n - 1) % n];
        let slot = &mut cursor[data[i] as usize];
        sorted[*slot] = prev;
        *slot += 1;
    }
    order1(&sorted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_block_has_zero_entropy() {
        let data = vec![0x42u8; 4096];
        assert!(order0(&data) < 1e-6);
        assert!(order1(&data) < 1e-6);
    }

    #[test]
    fn test_uniform_block_has_near_max_entropy() {
        let data: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        let bits = order0(&data);
        assert!(bits > 7.9 && bits <= 8.0, "bits = {bits}");
    }

    #[test]
    fn test_alternating_is_lower_order1_than_order0() {
        let data: Vec<u8> = (0..4096usize).map(|i| if i % 2 == 0 { 0 } else { 255 }).collect();
        assert!(order1(&data) < order0(&data));
    }

    #[test]
    fn test_empty_is_zero() {
        assert_eq!(order0(&[]), 0.0);
        assert_eq!(order1(&[]), 0.0);
        assert_eq!(mixed(&[]), 0.0);
        assert_eq!(sorted_entropy(&[]), 0.0);
    }
}
