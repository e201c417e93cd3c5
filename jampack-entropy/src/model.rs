//! Adaptive and quasi-static cumulative-frequency models.
//!
//! Both models keep a monotone `cum_freq` array of length `alphabet + 1`
//! with `cum_freq[0] = 0` and `cum_freq[alphabet] = PROB_SCALE`; `freq(s) =
//! cum_freq[s+1] - cum_freq[s]`. Encode and decode must call [`CdfModel::update`]
//! with the same symbol sequence in the same order for the models to stay
//! in lockstep.

use crate::rans::PROB_SCALE;

/// A model an entropy coder can consult for a symbol's `(start, freq)` span
/// and the symbol owning a given cumulative-frequency slot.
pub trait CdfModel {
    /// Number of symbols in this model's alphabet.
    fn alphabet_size(&self) -> usize;

    /// `(start, freq)` for `sym`.
    fn bounds(&self, sym: usize) -> (u32, u32);

    /// The symbol whose `[start, start+freq)` span contains `cum_freq`.
    fn symbol_at(&self, cum_freq: u32) -> usize;

    /// Adapt the model after `sym` has been coded.
    fn update(&mut self, sym: usize);
}

/// CDF-transformation adaptive model (spec-level `RATE = 5`): every update
/// nudges each interior breakpoint a `1/2^RATE` step toward the step
/// function that puts all mass on the observed symbol.
#[derive(Debug, Clone)]
pub struct AdaptiveModel {
    cum_freq: Vec<u32>,
    rate: u32,
}

const ADAPTIVE_RATE: u32 = 5;

impl AdaptiveModel {
    /// A fresh model over `alphabet` symbols, uniformly distributed.
    pub fn new(alphabet: usize) -> Self {
        assert!(alphabet > 0);
        let mut cum_freq = vec![0u32; alphabet + 1];
        for (i, slot) in cum_freq.iter_mut().enumerate() {
            *slot = ((i as u64 * PROB_SCALE as u64) / alphabet as u64) as u32;
        }
        *cum_freq.last_mut().unwrap() = PROB_SCALE;
        Self {
            cum_freq,
            rate: ADAPTIVE_RATE,
        }
    }
}

impl CdfModel for AdaptiveModel {
    fn alphabet_size(&self) -> usize {
        self.cum_freq.len() - 1
    }

    fn bounds(&self, sym: usize) -> (u32, u32) {
        (
            self.cum_freq[sym],
            self.cum_freq[sym + 1] - self.cum_freq[sym],
        )
    }

    fn symbol_at(&self, cum_freq: u32) -> usize {
        match self.cum_freq.binary_search(&cum_freq) {
            Ok(i) => {
                // Landed exactly on a breakpoint; the symbol starting there
                // owns it, unless it's a zero-width breakpoint repeat.
                let mut i = i;
                while i + 1 < self.cum_freq.len() && self.cum_freq[i] == self.cum_freq[i + 1] {
                    i += 1;
                }
                i.min(self.alphabet_size() - 1)
            }
            Err(i) => i - 1,
        }
    }

    fn update(&mut self, sym: usize) {
        let a = self.alphabet_size();
        for i in 1..a {
            let target = if i <= sym { 0 } else { PROB_SCALE };
            let cur = self.cum_freq[i];
            self.cum_freq[i] = (cur as i64 + ((target as i64 - cur as i64) >> self.rate)) as u32;
        }
        // Guarantee every symbol keeps at least one codepoint so it stays
        // decodable (avoids the zero-frequency trap after normalization),
        // leaving enough headroom below PROB_SCALE for every symbol after
        // it to also get its minimum share.
        for i in 0..a {
            if self.cum_freq[i + 1] <= self.cum_freq[i] {
                self.cum_freq[i + 1] = self.cum_freq[i] + 1;
            }
            let max_allowed = PROB_SCALE - (a - 1 - i) as u32;
            if self.cum_freq[i + 1] > max_allowed {
                self.cum_freq[i + 1] = max_allowed;
            }
        }
        *self.cum_freq.last_mut().unwrap() = PROB_SCALE;
    }
}

/// Quasi-static model: plain frequency counts accumulate until `seen`
/// exceeds `exp`, then the table is stretched-and-fit back to `PROB_SCALE`
/// and `exp` doubles (capped at `UPDATE_RATE`).
#[derive(Debug, Clone)]
pub struct QuasiStaticModel {
    freq: Vec<u32>,
    cum_freq: Vec<u32>,
    seen: u32,
    exp: u32,
}

const QUASI_INITIAL_EXP: u32 = 8;
const QUASI_UPDATE_RATE: u32 = 65_536;

impl QuasiStaticModel {
    /// A fresh model over `alphabet` symbols, uniformly distributed.
    pub fn new(alphabet: usize) -> Self {
        assert!(alphabet > 0);
        let base = PROB_SCALE / alphabet as u32;
        let mut freq = vec![base; alphabet];
        let remainder = PROB_SCALE - base * alphabet as u32;
        freq[alphabet - 1] += remainder;
        let cum_freq = cumulative(&freq);
        Self {
            freq,
            cum_freq,
            seen: 0,
            exp: QUASI_INITIAL_EXP,
        }
    }

    fn rescale(&mut self) {
        let mut sum: u64 = self.freq.iter().map(|&f| f as u64).sum();
        while sum > PROB_SCALE as u64 {
            sum = 0;
            for f in self.freq.iter_mut() {
                *f = (*f + 1) >> 1;
                sum += *f as u64;
            }
        }
        let mut total = 0u32;
        let mut max_sym = 0usize;
        let mut max_freq = 0u32;
        for (sym, f) in self.freq.iter_mut().enumerate() {
            let scaled = ((PROB_SCALE as u64 * *f as u64) / sum.max(1)) as u32;
            let scaled = scaled.max(1);
            *f = scaled;
            total += scaled;
            if scaled > max_freq {
                max_freq = scaled;
                max_sym = sym;
            }
        }
        if total < PROB_SCALE {
            self.freq[max_sym] += PROB_SCALE - total;
        } else if total > PROB_SCALE {
            let overflow = total - PROB_SCALE;
            self.freq[max_sym] = self.freq[max_sym].saturating_sub(overflow).max(1);
        }
        self.cum_freq = cumulative(&self.freq);
        self.seen = 0;
        self.exp = (self.exp * 2).min(QUASI_UPDATE_RATE);
    }
}

fn cumulative(freq: &[u32]) -> Vec<u32> {
    let mut cum = vec![0u32; freq.len() + 1];
    for (i, &f) in freq.iter().enumerate() {
        cum[i + 1] = cum[i] + f;
    }
    cum
}

impl CdfModel for QuasiStaticModel {
    fn alphabet_size(&self) -> usize {
        self.freq.len()
    }

    fn bounds(&self, sym: usize) -> (u32, u32) {
        (self.cum_freq[sym], self.freq[sym])
    }

    fn symbol_at(&self, cum_freq: u32) -> usize {
        match self.cum_freq.binary_search(&cum_freq) {
            Ok(i) => i.min(self.alphabet_size() - 1),
            Err(i) => i - 1,
        }
    }

    fn update(&mut self, sym: usize) {
        self.freq[sym] += 1;
        self.seen += 1;
        if self.seen > self.exp {
            self.rescale();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip_model<M: CdfModel>(mut enc_model: M, mut dec_model: M, symbols: &[usize]) {
        use crate::rans::{Decoder, Encoder};

        let mut enc = Encoder::new();

        // Bounds must come from the model's state at the time each symbol
        // was coded, so walk forward once to record them, then push to the
        // rANS stack in the required descending order.
        let mut spans = Vec::with_capacity(symbols.len());
        for &sym in symbols {
            spans.push(enc_model.bounds(sym));
            enc_model.update(sym);
        }

        for i in (0..symbols.len()).rev() {
            let (start, freq) = spans[i];
            enc.put(0, start, freq);
        }
        let bytes = enc.finish();

        let mut dec = Decoder::new(&bytes).unwrap();
        let mut out = Vec::with_capacity(symbols.len());
        for _ in 0..symbols.len() {
            let cf = dec.cum_freq(0);
            let sym = dec_model.symbol_at(cf);
            let (start, freq) = dec_model.bounds(sym);
            dec.advance(0, start, freq).unwrap();
            dec_model.update(sym);
            out.push(sym);
        }
        assert_eq!(out, symbols);
    }

    #[test]
    fn test_adaptive_model_roundtrip() {
        let symbols: Vec<usize> = (0..200).map(|i| (i * 3 + 1) % 8).collect();
        roundtrip_model(AdaptiveModel::new(8), AdaptiveModel::new(8), &symbols);
    }

    #[test]
    fn test_adaptive_model_skewed_roundtrip() {
        let mut symbols = vec![0usize; 150];
        symbols.extend((0..50).map(|i| 1 + i % 7));
        roundtrip_model(AdaptiveModel::new(8), AdaptiveModel::new(8), &symbols);
    }

    #[test]
    fn test_quasi_static_model_roundtrip() {
        let symbols: Vec<usize> = (0..500).map(|i| (i * 37) % 16).collect();
        roundtrip_model(
            QuasiStaticModel::new(16),
            QuasiStaticModel::new(16),
            &symbols,
        );
    }

    #[test]
    fn test_quasi_static_rescale_keeps_prob_scale() {
        let mut model = QuasiStaticModel::new(16);
        for i in 0..300 {
            model.update(i % 16);
        }
        let total: u32 = model.freq.iter().sum();
        assert_eq!(total, PROB_SCALE);
    }

    #[test]
    fn test_adaptive_cdf_sums_to_prob_scale() {
        let mut model = AdaptiveModel::new(8);
        for i in 0..100 {
            model.update(i % 8);
        }
        assert_eq!(*model.cum_freq.last().unwrap(), PROB_SCALE);
        assert_eq!(model.cum_freq[0], 0);
    }
}
