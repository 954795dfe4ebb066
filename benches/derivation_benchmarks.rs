//! Performance benchmarks for key derivation and serialization

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hdkey_rs::{Bip32, Network};

const SEED: [u8; 16] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15];

fn bench_master_generation(c: &mut Criterion) {
    let bip32: Bip32 = Bip32::default();
    c.bench_function("generate_master", |b| {
        b.iter(|| bip32.generate_master(black_box(&SEED), Network::Mainnet).unwrap())
    });
}

fn bench_child_derivation(c: &mut Criterion) {
    let mut group = c.benchmark_group("child_derivation");
    let bip32: Bip32 = Bip32::default();
    let master = bip32.generate_master(&SEED, Network::Mainnet).unwrap();
    let public = bip32.neuter(&master).unwrap();

    group.bench_function("private_normal", |b| {
        b.iter(|| bip32.engine().derive_child(&master, black_box(0)).unwrap())
    });
    group.bench_function("private_hardened", |b| {
        b.iter(|| bip32.engine().derive_child(&master, black_box(0x8000_0000)).unwrap())
    });
    group.bench_function("public_normal", |b| {
        b.iter(|| bip32.engine().derive_child(&public, black_box(0)).unwrap())
    });

    group.finish();
}

fn bench_path_derivation(c: &mut Criterion) {
    let mut group = c.benchmark_group("path_derivation");
    let bip32: Bip32 = Bip32::default();
    let master = bip32.generate_master(&SEED, Network::Mainnet).unwrap();

    for path in ["m/0'", "m/44'/0'/0'/0/0", "m/0'/1/2'/2/1000000000"] {
        group.bench_with_input(BenchmarkId::from_parameter(path), &path, |b, path| {
            b.iter(|| bip32.derive_path(&master, black_box(path)).unwrap())
        });
    }

    group.finish();
}

fn bench_serialization(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialization");
    let bip32: Bip32 = Bip32::default();
    let master = bip32.generate_master(&SEED, Network::Mainnet).unwrap();
    let encoded = bip32.encode_key(&master, Network::Mainnet);

    group.bench_function("encode_xprv", |b| {
        b.iter(|| bip32.encode_key(black_box(&master), Network::Mainnet))
    });
    group.bench_function("decode_xprv", |b| {
        b.iter(|| bip32.decode_key(black_box(&encoded)).unwrap())
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_master_generation,
    bench_child_derivation,
    bench_path_derivation,
    bench_serialization
);
criterion_main!(benches);
