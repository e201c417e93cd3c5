//! Inverse structural transforms.

use crate::config::{FilterConfig, FilterType, MAX_WIDTH};
use crate::encoder::unreorder;

/// Invert [`crate::encoder::delta_forward`].
pub fn delta_inverse(data: &[u8]) -> Vec<u8> {
    let mut previous = 0u8;
    data.iter()
        .map(|&d| {
            let out = d.wrapping_add(previous);
            previous = out;
            out
        })
        .collect()
}

const LPC_RATE: u32 = 6;

fn update_weight(weight: &mut i32, err: u8) {
    *weight += (i32::from(err) - *weight) >> LPC_RATE;
}

/// Invert [`crate::encoder::lpc_forward`].
pub fn lpc_inverse(data: &[u8]) -> Vec<u8> {
    let mut weight: i32 = 0;
    let mut p1: i32 = 0;
    let mut p2: i32 = 0;
    let mut out = Vec::with_capacity(data.len());
    for &err in data {
        let cur = (weight + (p1 - p2) + p1 - i32::from(err)) as u8;
        out.push(cur);
        update_weight(&mut weight, err);
        p2 = p1;
        p1 = i32::from(cur);
    }
    out
}

/// Invert [`crate::encoder::inline_delta_forward`].
pub fn inline_delta_inverse(data: &[u8], width: usize) -> Vec<u8> {
    let mut prev = [0u8; MAX_WIDTH as usize];
    data.iter()
        .enumerate()
        .map(|(i, &d)| {
            let lane = i % width;
            let cur = d.wrapping_add(prev[lane]);
            prev[lane] = cur;
            cur
        })
        .collect()
}

/// Invert [`crate::encoder::apply`].
pub fn invert(data: &[u8], config: FilterConfig) -> Vec<u8> {
    let width = config.width as usize;
    match config.filter_type {
        FilterType::Raw => data.to_vec(),
        FilterType::Delta => unreorder(&delta_inverse(data), width),
        FilterType::Lpc => unreorder(&lpc_inverse(data), width),
        FilterType::InlineDelta => inline_delta_inverse(data, width),
    }
}
