use hex_literal::hex;
use proptest::prelude::*;

use super::*;

fn secret(byte: u8) -> SharedSecret {
    SharedSecret::from_bytes([byte; TAG_SIZE])
}

#[test]
fn test_rfc4231_case_1() {
    // HMAC zero-pads short keys to the block size, so the 20 byte RFC key padded to 32 bytes
    // produces the same tag
    let mut key = [0u8; 32];
    key[..20].copy_from_slice(&[0x0b; 20]);
    let secret = SharedSecret::from_bytes(key);

    let tag = compute_tag(&secret, b"Hi There");
    assert_eq!(
        tag.as_bytes(),
        &hex!("b0344c61d8db38535ca8afceaf0bf12b881dc200c9833da726e9376c2e32cff7")
    );
}

#[test]
fn test_empty_buffer() {
    let tag = compute_tag(&secret(0x2a), &[]);
    assert_eq!(
        tag.as_bytes(),
        &hex!("25e570b039a294705747f0783f32e9b538be395f8713fbcbf346844d84bc78ad")
    );
    assert!(verify_tag_with(MacAlgorithm::HmacSha256, &secret(0x2a), &[], tag.as_ref()));
}

#[test]
fn test_verify_rejects_wrong_key_and_length() {
    let tag = compute_tag(&secret(1), b"message");

    assert!(verify_tag_with(MacAlgorithm::HmacSha256, &secret(1), b"message", tag.as_ref()));
    assert!(!verify_tag_with(MacAlgorithm::HmacSha256, &secret(2), b"message", tag.as_ref()));
    assert!(!verify_tag_with(MacAlgorithm::HmacSha256, &secret(1), b"message", &tag.as_ref()[..16]));
    assert!(!verify_tag_with(MacAlgorithm::HmacKeccak256, &secret(1), b"message", tag.as_ref()));
}

#[test]
fn test_algorithms_differ() {
    let sha = compute_tag_with(MacAlgorithm::HmacSha256, &secret(3), b"data");
    let keccak = compute_tag_with(MacAlgorithm::HmacKeccak256, &secret(3), b"data");

    assert_ne!(sha, keccak);
}

#[test]
fn test_debug_hides_tag() {
    let tag = compute_tag(&secret(0x2a), &[]);
    let debug = format!("{tag:?}");

    assert_eq!(debug, "AuthenticationTag(..)");
    assert!(!debug.contains(&hex::encode(&tag.as_bytes()[..4])));
}

proptest! {
    #[test]
    fn prop_tag_is_deterministic(data in prop::collection::vec(any::<u8>(), 0..256), key in any::<u8>()) {
        prop_assert_eq!(compute_tag(&secret(key), &data), compute_tag(&secret(key), &data));
    }

    #[test]
    fn prop_modified_data_fails_verification(
        data in prop::collection::vec(any::<u8>(), 1..256),
        index in any::<prop::sample::Index>(),
    ) {
        let tag = compute_tag(&secret(9), &data);

        let mut modified = data.clone();
        modified[index.index(data.len())] ^= 0x80;

        prop_assert!(!verify_tag_with(MacAlgorithm::HmacSha256, &secret(9), &modified, tag.as_ref()));
    }
}
