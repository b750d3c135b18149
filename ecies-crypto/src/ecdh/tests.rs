use assert_matches::assert_matches;
use hex_literal::hex;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use rstest::rstest;

use super::*;
use crate::keys::EcKeyPair;

fn keypair_from_scalar(scalar: u8) -> EcKeyPair {
    let mut bytes = [0u8; 32];
    bytes[31] = scalar;
    EcKeyPair::from_secret_key(SecretKey::from_bytes(&bytes).unwrap())
}

#[test]
fn test_known_answer() {
    // 1 * 2G has the x-coordinate of 2G
    let one = keypair_from_scalar(1);
    let two = keypair_from_scalar(2);

    let secret = derive_shared_secret(&one, &two.public_only()).unwrap();
    assert_eq!(
        secret.as_bytes(),
        &hex!("0135da2f8acf7b9e3090939432e47684eb888ea38c2173054d4eedffdf152ca5")
    );

    let x = hex!("c6047f9441ed7d6d3045406e95c07cd85c778e4b8cef3ca7abac09b95c709ee5");
    let expected: [u8; KEY_SIZE] = Sha256::digest(x).into();
    assert_eq!(secret.as_bytes(), &expected);
}

#[test]
fn test_known_answer_larger_scalars() {
    // 3 * 5G == 5 * 3G == 15G
    let three = keypair_from_scalar(3);
    let five = keypair_from_scalar(5);

    let expected = hex!("dd6a73ed4a28f014e1d68cfe3e68fa2690de275bbb46fe365e4a62a6cb341d85");
    assert_eq!(derive_shared_secret(&three, &five.public_only()).unwrap().as_bytes(), &expected);
    assert_eq!(derive_shared_secret(&five, &three.public_only()).unwrap().as_bytes(), &expected);
}

#[rstest]
#[case::sender_view(true)]
#[case::recipient_view(false)]
fn test_symmetry(#[case] private_first: bool) {
    let mut rng = ChaCha20Rng::seed_from_u64(7);
    let a = EcKeyPair::generate(&mut rng);
    let b = EcKeyPair::generate(&mut rng);

    let ab = derive_shared_secret(&a, &b.public_only()).unwrap();
    let ba = if private_first {
        derive_shared_secret(&b, &a.public_only()).unwrap()
    } else {
        derive_shared_secret(&a.public_only(), &b).unwrap()
    };

    assert_eq!(ab, ba);
}

#[test]
fn test_first_private_component_is_preferred() {
    let mut rng = ChaCha20Rng::seed_from_u64(11);
    let a = EcKeyPair::generate(&mut rng);
    let b = EcKeyPair::generate(&mut rng);

    // both sides private: a's scalar is used with b's point, which still matches b's view
    let both_private = derive_shared_secret(&a, &b).unwrap();
    let a_private = derive_shared_secret(&a, &b.public_only()).unwrap();
    let b_private = derive_shared_secret(&b, &a.public_only()).unwrap();

    assert_eq!(both_private, a_private);
    assert_eq!(both_private, b_private);
}

#[test]
fn test_different_peers_yield_different_secrets() {
    let mut rng = ChaCha20Rng::seed_from_u64(13);
    let a = EcKeyPair::generate(&mut rng);
    let b = EcKeyPair::generate(&mut rng);
    let c = EcKeyPair::generate(&mut rng);

    assert_ne!(derive_shared_secret(&a, &b).unwrap(), derive_shared_secret(&a, &c).unwrap());
}

#[test]
fn test_missing_key() {
    let empty = EcKeyPair::default();
    let a = keypair_from_scalar(9);

    assert_matches!(derive_shared_secret(&a, &empty), Err(EciesError::MissingKey));
    assert_matches!(derive_shared_secret(&empty, &a), Err(EciesError::MissingKey));
    assert_matches!(derive_shared_secret(&empty, &empty), Err(EciesError::MissingKey));
}

#[test]
fn test_no_private_key() {
    let a = keypair_from_scalar(9).public_only();
    let b = keypair_from_scalar(10).public_only();

    assert_matches!(derive_shared_secret(&a, &b), Err(EciesError::NoPrivateKey));
}

#[test]
fn test_keccak_kdf() {
    let a = keypair_from_scalar(1);
    let b = keypair_from_scalar(2);

    let sha = derive_shared_secret_with(KdfHash::Sha256, &a, &b).unwrap();
    let keccak = derive_shared_secret_with(KdfHash::Keccak256, &a, &b).unwrap();
    assert_ne!(sha, keccak);

    let x = hex!("c6047f9441ed7d6d3045406e95c07cd85c778e4b8cef3ca7abac09b95c709ee5");
    let expected: [u8; KEY_SIZE] = Keccak256::digest(x).into();
    assert_eq!(keccak.as_bytes(), &expected);
}

#[test]
fn test_debug_hides_secret() {
    let secret = SharedSecret::from_bytes([0x5a; KEY_SIZE]);
    assert_eq!(format!("{secret:?}"), "SharedSecret(..)");
}
