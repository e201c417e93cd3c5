//! Forward/inverse throughput across a few representative data patterns.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use jampack_localprefix::{forward, inverse};
use std::hint::black_box;

mod test_data {
    pub fn repetitive(size: usize) -> Vec<u8> {
        let pattern = b"TOBEORNOTTOBEORTOBEORNOT";
        let mut data = Vec::with_capacity(size);
        while data.len() < size {
            let remaining = size - data.len();
            data.extend_from_slice(&pattern[..remaining.min(pattern.len())]);
        }
        data
    }

    pub fn fixed_stride_records(size: usize) -> Vec<u8> {
        let mut data = Vec::with_capacity(size);
        let mut i: u32 = 0;
        while data.len() < size {
            let bytes = i.to_le_bytes();
            let remaining = size - data.len();
            data.extend_from_slice(&bytes[..remaining.min(bytes.len())]);
            i = i.wrapping_add(1);
        }
        data
    }

    pub fn pseudo_random(size: usize) -> Vec<u8> {
        let mut data = Vec::with_capacity(size);
        let mut seed: u64 = 0x123456789ABCDEF0;
        for _ in 0..size {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
            data.push((seed >> 32) as u8);
        }
        data
    }
}

fn bench_forward(c: &mut Criterion) {
    let mut group = c.benchmark_group("forward");
    let sizes = [("256KB", 256 * 1024), ("1MB", 1024 * 1024)];
    let patterns: [(&str, fn(usize) -> Vec<u8>); 3] = [
        ("repetitive", test_data::repetitive),
        ("fixed_stride", test_data::fixed_stride_records),
        ("random", test_data::pseudo_random),
    ];

    for (size_name, size) in sizes {
        for (pattern_name, generator) in patterns {
            let data = generator(size);
            let id = format!("{size_name}/{pattern_name}");
            group.throughput(Throughput::Bytes(size as u64));
            group.bench_with_input(BenchmarkId::from_parameter(&id), &data, |b, data| {
                b.iter(|| black_box(forward(black_box(data))));
            });
        }
    }
    group.finish();
}

fn bench_roundtrip(c: &mut Criterion) {
    let mut group = c.benchmark_group("roundtrip");
    let sizes = [("256KB", 256 * 1024), ("1MB", 1024 * 1024)];

    for (size_name, size) in sizes {
        let data = test_data::fixed_stride_records(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size_name), &data, |b, data| {
            b.iter(|| {
                let transformed = forward(black_box(data));
                let recovered = inverse(&transformed);
                black_box(recovered);
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_forward, bench_roundtrip);
criterion_main!(benches);
