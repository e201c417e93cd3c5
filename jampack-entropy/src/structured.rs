//! Two-level structured entropy model over the RLE0 alphabet.
//!
//! Every symbol `v` in `0..=256` is split into an exponent bucket `e` and an
//! in-bucket mantissa: `EXPONENT_TABLE[e] <= v < EXPONENT_TABLE[e + 1]`,
//! `mantissa = v - EXPONENT_TABLE[e]`. An [`AdaptiveModel`] over the 8
//! buckets codes `e`; a second, per-bucket model codes the mantissa. The
//! first two buckets (narrow, high-skew) get their own [`AdaptiveModel`],
//! the rest (wide, closer to uniform) get a cheaper [`QuasiStaticModel`].
//! Exponent and mantissa are coded as two separate rANS puts, interleaved
//! round-robin across the four lanes in [`crate::rans`] in the order they
//! were produced.

use crate::model::{AdaptiveModel, CdfModel, QuasiStaticModel};
use crate::rans::{Decoder, Encoder};
use jampack_core::error::Result;

/// Bucket boundaries; `EXPONENT_TABLE[e]..EXPONENT_TABLE[e + 1]` is bucket `e`.
pub const EXPONENT_TABLE: [u16; 9] = [0, 2, 4, 8, 16, 32, 64, 128, 257];
/// Number of exponent buckets.
pub const BUCKET_COUNT: usize = EXPONENT_TABLE.len() - 1;
/// Buckets below this index use an adaptive mantissa model; at or above it,
/// quasi-static.
const MODEL_SWITCH_THRESHOLD: usize = 2;

fn bucket_of(v: u16) -> usize {
    EXPONENT_TABLE
        .windows(2)
        .position(|w| v >= w[0] && v < w[1])
        .expect("symbol out of the RLE0 alphabet")
}

enum Level2Model {
    Adaptive(AdaptiveModel),
    Quasi(QuasiStaticModel),
}

impl CdfModel for Level2Model {
    fn alphabet_size(&self) -> usize {
        match self {
            Level2Model::Adaptive(m) => m.alphabet_size(),
            Level2Model::Quasi(m) => m.alphabet_size(),
        }
    }

    fn bounds(&self, sym: usize) -> (u32, u32) {
        match self {
            Level2Model::Adaptive(m) => m.bounds(sym),
            Level2Model::Quasi(m) => m.bounds(sym),
        }
    }

    fn symbol_at(&self, cum_freq: u32) -> usize {
        match self {
            Level2Model::Adaptive(m) => m.symbol_at(cum_freq),
            Level2Model::Quasi(m) => m.symbol_at(cum_freq),
        }
    }

    fn update(&mut self, sym: usize) {
        match self {
            Level2Model::Adaptive(m) => m.update(sym),
            Level2Model::Quasi(m) => m.update(sym),
        }
    }
}

/// Owns the level-1 exponent model and the eight level-2 mantissa models
/// for one entropy sub-block.
pub struct StructuredCoder {
    level1: AdaptiveModel,
    level2: Vec<Level2Model>,
}

impl StructuredCoder {
    /// A fresh set of models, ready to encode or decode one sub-block.
    pub fn new() -> Self {
        let level2 = (0..BUCKET_COUNT)
            .map(|e| {
                let width = (EXPONENT_TABLE[e + 1] - EXPONENT_TABLE[e]) as usize;
                if e < MODEL_SWITCH_THRESHOLD {
                    Level2Model::Adaptive(AdaptiveModel::new(width))
                } else {
                    Level2Model::Quasi(QuasiStaticModel::new(width))
                }
            })
            .collect();
        Self {
            level1: AdaptiveModel::new(BUCKET_COUNT),
            level2,
        }
    }

    /// Encode `symbols` (each in `0..=256`) into a four-lane rANS stream.
    pub fn encode(&mut self, symbols: &[u16]) -> Vec<u8> {
        let mut spans = Vec::with_capacity(symbols.len() * 2);
        for &v in symbols {
            let e = bucket_of(v);
            let mantissa = (v - EXPONENT_TABLE[e]) as usize;

            spans.push(self.level1.bounds(e));
            self.level1.update(e);

            spans.push(self.level2[e].bounds(mantissa));
            self.level2[e].update(mantissa);
        }

        let mut enc = Encoder::new();
        for (i, &(start, freq)) in spans.iter().enumerate().rev() {
            enc.put(i % 4, start, freq);
        }
        enc.finish()
    }

    /// Invert [`StructuredCoder::encode`], recovering exactly `count` symbols.
    pub fn decode(&mut self, bytes: &[u8], count: usize) -> Result<Vec<u16>> {
        let mut dec = Decoder::new(bytes)?;
        let mut out = Vec::with_capacity(count);

        for sym_idx in 0..count {
            let lane_e = (2 * sym_idx) % 4;
            let cf = dec.cum_freq(lane_e);
            let e = self.level1.symbol_at(cf);
            let (start, freq) = self.level1.bounds(e);
            dec.advance(lane_e, start, freq)?;
            self.level1.update(e);

            let lane_m = (2 * sym_idx + 1) % 4;
            let cf = dec.cum_freq(lane_m);
            let mantissa = self.level2[e].symbol_at(cf);
            let (start, freq) = self.level2[e].bounds(mantissa);
            dec.advance(lane_m, start, freq)?;
            self.level2[e].update(mantissa);

            out.push(EXPONENT_TABLE[e] + mantissa as u16);
        }
        Ok(out)
    }
}

impl Default for StructuredCoder {
    fn default() -> Self {
        Self::new()
    }
}
