//! Forward structural transforms and sub-block filter selection.

use crate::config::{FilterConfig, FilterType, SelectionPolicy, MAX_WIDTH, MIN_WIDTH};
use jampack_core::entropy_estimate::mixed;

/// `out[pos++] = in[j]` walking `j = i, i + width, i + 2*width, ...` for each
/// `i` in `0..width`: groups samples by channel so same-channel bytes sit
/// next to each other for the per-channel predictors below.
pub fn reorder(data: &[u8], width: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    for i in 0..width {
        let mut j = i;
        while j < data.len() {
            out.push(data[j]);
            j += width;
        }
    }
    out
}

/// Invert [`reorder`].
pub fn unreorder(data: &[u8], width: usize) -> Vec<u8> {
    let mut out = vec![0u8; data.len()];
    let mut pos = 0;
    for i in 0..width {
        let mut j = i;
        while j < data.len() {
            out[j] = data[pos];
            pos += 1;
            j += width;
        }
    }
    out
}

/// First difference in place: `out[i] = in[i] - previous`.
pub fn delta_forward(data: &[u8]) -> Vec<u8> {
    let mut previous = 0u8;
    data.iter()
        .map(|&cur| {
            let out = cur.wrapping_sub(previous);
            previous = cur;
            out
        })
        .collect()
}

const LPC_RATE: u32 = 6;

fn update_weight(weight: &mut i32, err: u8) {
    *weight += (i32::from(err) - *weight) >> LPC_RATE;
}

/// Linear-predictor residual: predicts `p1 + (p1 - p2) + weight`, emits the
/// difference from the actual byte, then nudges `weight` toward the error.
pub fn lpc_forward(data: &[u8]) -> Vec<u8> {
    let mut weight: i32 = 0;
    let mut p1: i32 = 0;
    let mut p2: i32 = 0;
    let mut out = Vec::with_capacity(data.len());
    for &b in data {
        let cur = i32::from(b);
        let err = (weight + (p1 - p2) + p1 - cur) as u8;
        out.push(err);
        update_weight(&mut weight, err);
        p2 = p1;
        p1 = cur;
    }
    out
}

/// Per-lane first difference without reordering: `out[i] = in[i] - prev[lane]`
/// where `lane = i % width`.
pub fn inline_delta_forward(data: &[u8], width: usize) -> Vec<u8> {
    let mut prev = [0u8; MAX_WIDTH as usize];
    data.iter()
        .enumerate()
        .map(|(i, &b)| {
            let lane = i % width;
            let out = b.wrapping_sub(prev[lane]);
            prev[lane] = b;
            out
        })
        .collect()
}

/// Apply `config`'s transform to `data`, returning the transformed bytes
/// (reordered first, when the transform reorders).
pub fn apply(data: &[u8], config: FilterConfig) -> Vec<u8> {
    let width = config.width as usize;
    match config.filter_type {
        FilterType::Raw => data.to_vec(),
        FilterType::Delta => delta_forward(&reorder(data, width)),
        FilterType::Lpc => lpc_forward(&reorder(data, width)),
        FilterType::InlineDelta => inline_delta_forward(data, width),
    }
}

/// A distance histogram (position minus the last position the same byte was
/// seen at, binned mod `MAX_WIDTH + 1`) used to guess a channel stride
/// without trying every width.
fn detect_stride(data: &[u8]) -> usize {
    let bins = MAX_WIDTH as usize + 1;
    let mut last_pos = [None; 256];
    let mut hist = vec![0u32; bins];
    for (i, &b) in data.iter().enumerate() {
        if let Some(lp) = last_pos[b as usize] {
            hist[(i - lp) % bins] += 1;
        }
        last_pos[b as usize] = Some(i);
    }
    let mut best_bin = MIN_WIDTH as usize;
    let mut best_count = 0u32;
    for (bin, &count) in hist.iter().enumerate().skip(1) {
        if count > best_count {
            best_count = count;
            best_bin = bin;
        }
    }
    best_bin
}

/// Pick a filter configuration for `data` under `policy`, given the
/// previous sub-block's chosen configuration (for the heuristic's smoothing
/// term). Scores candidates with `mixed` order-0/order-1 entropy on the
/// transformed bytes.
pub fn select(data: &[u8], policy: SelectionPolicy, previous: Option<FilterConfig>) -> FilterConfig {
    if data.is_empty() || policy == SelectionPolicy::AlwaysRaw {
        return FilterConfig::RAW;
    }

    match policy {
        SelectionPolicy::AlwaysRaw => unreachable!(),
        SelectionPolicy::Heuristic => select_heuristic(data, previous),
        SelectionPolicy::BruteForce => select_brute_force(data),
    }
}

fn select_heuristic(data: &[u8], previous: Option<FilterConfig>) -> FilterConfig {
    let stride = detect_stride(data).clamp(MIN_WIDTH as usize, MAX_WIDTH as usize);
    let mut candidates = vec![
        FilterConfig::RAW,
        FilterConfig::new(FilterType::Delta, stride as u8),
        FilterConfig::new(FilterType::Lpc, stride as u8),
        FilterConfig::new(FilterType::InlineDelta, stride as u8),
    ];
    if let Some(prev) = previous {
        if !candidates.contains(&prev) {
            candidates.push(prev);
        }
    }

    // A small bonus for the previous sub-block's configuration smooths
    // decisions so filter choice doesn't chatter between near-tied options.
    const SMOOTHING_BONUS_BITS: f64 = 0.02;

    let mut best = candidates[0];
    let mut best_score = f64::INFINITY;
    for &cfg in &candidates {
        let transformed = apply(data, cfg);
        let mut score = mixed(&transformed);
        if Some(cfg) == previous {
            score -= SMOOTHING_BONUS_BITS;
        }
        if score < best_score {
            best_score = score;
            best = cfg;
        }
    }
    best
}

fn select_brute_force(data: &[u8]) -> FilterConfig {
    let mut best = FilterConfig::RAW;
    let mut best_score = mixed(data);
    for cfg in FilterConfig::all() {
        if cfg == FilterConfig::RAW {
            continue;
        }
        let transformed = apply(data, cfg);
        let score = mixed(&transformed);
        if score < best_score {
            best_score = score;
            best = cfg;
        }
    }
    best
}
