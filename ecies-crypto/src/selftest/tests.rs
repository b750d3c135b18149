use rand::{CryptoRng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

use super::*;
use crate::ies::{EciesConfig, KdfHash};

struct ZeroRng;

impl RngCore for ZeroRng {
    fn next_u32(&mut self) -> u32 {
        0
    }

    fn next_u64(&mut self) -> u64 {
        0
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        dst.fill(0);
    }
}

impl CryptoRng for ZeroRng {}

#[test]
fn test_short_run_passes() {
    let mut rng = ChaCha20Rng::seed_from_u64(0);
    assert!(RoundTripCheck::new(200, 70).run(&mut rng));
}

#[test]
fn test_zero_max_len_uses_empty_plaintexts() {
    let mut rng = ChaCha20Rng::seed_from_u64(1);
    assert!(RoundTripCheck::new(5, 0).run(&mut rng));
}

#[test]
fn test_custom_engine() {
    let ecies = Ecies::new(EciesConfig::default().with_kdf_hash(KdfHash::Keccak256)).unwrap();
    let check = RoundTripCheck::new(20, 50).with_engine(ecies);

    assert!(check.run(&mut ChaCha20Rng::seed_from_u64(2)));
}

#[test]
fn test_broken_rng_fails_the_check() {
    assert!(!RoundTripCheck::new(3, 10).run(&mut ZeroRng));
}

#[test]
fn test_defaults() {
    let check = RoundTripCheck::default();
    assert_eq!(check.iterations(), 30_000);
    assert_eq!(check.max_len(), 3_000);
}

#[cfg(feature = "std")]
#[test]
#[ignore = "runs the full 30000 iteration check"]
fn test_full_check() {
    assert!(check_ecies());
}
