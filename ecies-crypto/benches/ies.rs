//! ECIES benchmarks
//!
//! Covers shared secret derivation and encryption/decryption over a range of plaintext sizes
//! with the default configuration.

use std::{hint::black_box, time::Duration};

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use ecies_crypto::{EcKeyPair, derive_shared_secret, ies};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

const DATA_SIZES: &[usize] = &[0, 16, 100, 1024, 16 * 1024, 64 * 1024];
const MEASUREMENT_TIME: Duration = Duration::from_secs(5);

fn parties(rng: &mut ChaCha20Rng) -> (EcKeyPair, EcKeyPair) {
    (EcKeyPair::generate(rng), EcKeyPair::generate(rng))
}

fn random_bytes(rng: &mut ChaCha20Rng, size: usize) -> Vec<u8> {
    let mut data = vec![0u8; size];
    rng.fill_bytes(&mut data);
    data
}

// === Key Agreement ===

fn bench_derivation(c: &mut Criterion) {
    let mut rng = ChaCha20Rng::seed_from_u64(0);
    let (sender, recipient) = parties(&mut rng);
    let recipient_public = recipient.public_only();

    c.bench_function("ecdh_derive_shared_secret", |b| {
        b.iter(|| derive_shared_secret(black_box(&sender), black_box(&recipient_public)).unwrap())
    });

    c.bench_function("keypair_generate", |b| b.iter(|| EcKeyPair::generate(&mut rng)));
}

// === Encryption / Decryption ===

fn bench_encrypt(c: &mut Criterion) {
    let mut group = c.benchmark_group("ies_encrypt");
    group.measurement_time(MEASUREMENT_TIME);

    let mut rng = ChaCha20Rng::seed_from_u64(1);
    let (sender, recipient) = parties(&mut rng);
    let recipient_public = recipient.public_only();

    for &size in DATA_SIZES {
        let plaintext = random_bytes(&mut rng, size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &plaintext, |b, plaintext| {
            b.iter(|| {
                ies::encrypt_with_rng(&mut rng, &sender, &recipient_public, black_box(plaintext))
                    .unwrap()
            })
        });
    }

    group.finish();
}

fn bench_decrypt(c: &mut Criterion) {
    let mut group = c.benchmark_group("ies_decrypt");
    group.measurement_time(MEASUREMENT_TIME);

    let mut rng = ChaCha20Rng::seed_from_u64(2);
    let (sender, recipient) = parties(&mut rng);
    let sender_public = sender.public_only();

    for &size in DATA_SIZES {
        let plaintext = random_bytes(&mut rng, size);
        let ciphertext =
            ies::encrypt_with_rng(&mut rng, &sender, &recipient.public_only(), &plaintext)
                .unwrap();

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &ciphertext, |b, ciphertext| {
            b.iter(|| ies::decrypt(&recipient, &sender_public, black_box(ciphertext)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(ies_group, bench_derivation, bench_encrypt, bench_decrypt);
criterion_main!(ies_group);
