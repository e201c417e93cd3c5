//! Cyclic hashed history model.
//!
//! Tracks the recent-frequency histogram of arbitrarily large integer values
//! (match offsets, match lengths) in bounded space: a circular buffer holds
//! the hashes of the last `capacity` values seen, and a histogram counts
//! each hash bucket's current occupancy, incrementing on insert and
//! decrementing when the buffer wraps over the value it's replacing. A
//! second histogram, keyed by the XOR of consecutive values, estimates the
//! file's underlying structure width so peak detection can scale its
//! threshold to it instead of using a fixed cutoff.

const HASH_BITS: u32 = 16;
const HASH_SIZE: usize = 1 << HASH_BITS;
const MOD_SIZE: usize = 1 << 16;

/// Per-value frequency tracker over a bounded recent window.
pub struct CyclicHashHistory {
    circular_buffer: Vec<u32>,
    capacity: usize,
    pos: usize,
    history: Vec<u32>,
    mod_density: Vec<u32>,
    previous_value: u32,
    average_density: u32,
    unique_densities: u32,
    structure_width: u32,
}

impl CyclicHashHistory {
    /// A fresh model tracking the last `capacity` updates.
    pub fn new(capacity: usize) -> Self {
        Self {
            circular_buffer: vec![0; capacity.max(1)],
            capacity: capacity.max(1),
            pos: 0,
            history: vec![0; HASH_SIZE],
            mod_density: vec![0; MOD_SIZE],
            previous_value: 0,
            average_density: 0,
            unique_densities: 0,
            structure_width: 1,
        }
    }

    fn hash(value: u32) -> usize {
        ((value.wrapping_mul(0x9E37_79B1)) >> (32 - HASH_BITS)) as usize
    }

    /// Record a new observation, evicting the oldest one once the buffer has
    /// wrapped.
    pub fn update(&mut self, value: u32) {
        let h = Self::hash(value);
        let slot = self.pos % self.capacity;
        let old_h = self.circular_buffer[slot] as usize;

        self.circular_buffer[slot] = h as u32;
        self.history[h] += 1;
        if self.pos >= self.capacity {
            self.history[old_h] -= 1;
        }

        let diff = self.previous_value ^ value;
        self.mod_density[diff as usize % MOD_SIZE] += 1;
        self.previous_value = value;

        self.pos += 1;
    }

    /// Recent occurrence count for `value`'s hash bucket.
    pub fn get_history(&self, value: u32) -> u32 {
        self.history[Self::hash(value)]
    }

    /// Recompute `average_density`/`unique_densities`/`structure_width` from
    /// the accumulated XOR-difference histogram.
    pub fn build_model(&mut self) {
        let mut total: u64 = 0;
        let mut zeros = 0usize;
        for &d in &self.mod_density {
            total += u64::from(d);
            if d == 0 {
                zeros += 1;
            }
        }
        let filled = MOD_SIZE - zeros;
        self.average_density = if filled > 0 {
            (total / filled as u64) as u32
        } else {
            0
        };
        self.unique_densities = filled as u32;

        let mut best_bin = 0usize;
        let mut best = self.mod_density[0];
        for (bin, &d) in self.mod_density.iter().enumerate().skip(1) {
            if d > best {
                best = d;
                best_bin = bin;
            }
        }
        self.structure_width = if best_bin == 0 { 1 } else { best_bin as u32 };
    }

    /// Reset the density model between batches, keeping the frequency
    /// history (circular buffer state carries across batches).
    pub fn clean_model(&mut self) {
        self.mod_density.fill(0);
        self.average_density = 0;
        self.structure_width = 1;
    }

    /// Decompose `value` by the learned structure width, checking at each
    /// step whether the remaining digit's density bucket stands out from
    /// the average — a cheap proxy for "this value recurs with a period the
    /// rest of the stream doesn't share," which is what anti-context
    /// parsing is trying to isolate.
    pub fn find_peaks(&self, value: u32) -> bool {
        let reduce = if self.structure_width <= 1 { 2 } else { self.structure_width };
        let div = if self.average_density == 0 { 1 } else { self.average_density };
        let threshold = self.unique_densities / (div * div);

        let mut k = value;
        loop {
            if self.mod_density[k as usize % MOD_SIZE] > threshold {
                return true;
            }
            if k == 0 {
                break;
            }
            k /= reduce;
        }
        false
    }
}
