use assize_types::Seed;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn blake2b_256_bench(c: &mut Criterion) {
    let data = [0xABu8; 256];

    c.bench_function("blake2b_256_256B", |b| {
        b.iter(|| assize_crypto::blake2b_256(black_box(&data)))
    });
}

fn blake2b_256_1kb_bench(c: &mut Criterion) {
    let data = vec![0xCDu8; 1024];

    c.bench_function("blake2b_256_1KB", |b| {
        b.iter(|| assize_crypto::blake2b_256(black_box(&data)))
    });
}

fn derive_seed_bench(c: &mut Criterion) {
    let seed = Seed::new([9u8; 32]);
    let context = [1u8; 17];

    c.bench_function("derive_seed", |b| {
        b.iter(|| assize_crypto::derive_seed(black_box(&seed), black_box(&context)))
    });
}

criterion_group!(
    benches,
    blake2b_256_bench,
    blake2b_256_1kb_bench,
    derive_seed_bench
);
criterion_main!(benches);
