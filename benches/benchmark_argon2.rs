use memhard::derivation::{argon2id, Params, Version};
use memhard::hash::blake2b;

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

pub fn bench_argon2id(c: &mut Criterion) {
    let params = Params {
        mem_kib: 1024,
        time: 2,
        lanes: 1,
        threads: 1,
        tag_len: 32,
        version: Version::V0x13,
    };

    c.bench_function("argon2id 1 MiB, 2 passes", |b| {
        b.iter(|| argon2id(black_box(b"password"), black_box(b"somesalt"), &params))
    });
}

pub fn bench_blake2b(c: &mut Criterion) {
    c.bench_function("blake2b 64 bytes", |b| {
        b.iter(|| blake2b(64, black_box(&[0u8; 64])))
    });
}

criterion_group!(benches, bench_argon2id, bench_blake2b);
criterion_main!(benches);
