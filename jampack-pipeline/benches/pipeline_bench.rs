//! End-to-end archive compression throughput.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use jampack_core::options::Options;
use jampack_pipeline::{compress, decompress};
use std::hint::black_box;

fn text_like(size: usize) -> Vec<u8> {
    let pattern = b"the quick brown fox jumps over the lazy dog. ";
    let mut data = Vec::with_capacity(size);
    while data.len() < size {
        let remaining = size - data.len();
        data.extend_from_slice(&pattern[..remaining.min(pattern.len())]);
    }
    data
}

fn bench_compress(c: &mut Criterion) {
    let mut group = c.benchmark_group("archive_compress");
    let sizes = [("1MB", 1 << 20), ("4MB", 4 << 20)];
    let options = Options::default();

    for (name, size) in sizes {
        let data = text_like(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &data, |b, data| {
            b.iter(|| {
                let mut archive = Vec::new();
                compress(&mut &data[..], &mut archive, options).unwrap();
                black_box(archive);
            });
        });
    }
    group.finish();
}

fn bench_roundtrip(c: &mut Criterion) {
    let mut group = c.benchmark_group("archive_roundtrip");
    let options = Options::default();
    let data = text_like(1 << 20);
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_with_input(BenchmarkId::from_parameter("1MB"), &data, |b, data| {
        b.iter(|| {
            let mut archive = Vec::new();
            compress(&mut &data[..], &mut archive, options).unwrap();
            let mut recovered = Vec::new();
            decompress(&mut &archive[..], &mut recovered, options).unwrap();
            black_box(recovered);
        });
    });
    group.finish();
}

criterion_group!(benches, bench_compress, bench_roundtrip);
criterion_main!(benches);
