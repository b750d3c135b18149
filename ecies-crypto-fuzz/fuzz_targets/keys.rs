#![no_main]

use ecies_crypto::{EcKeyPair, PublicKey, SecretKey, derive_shared_secret};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // arbitrary encodings must parse or be rejected, never panic
    let public_key = PublicKey::from_bytes(data);
    let secret_key = data
        .get(..32)
        .and_then(|bytes| <&[u8; 32]>::try_from(bytes).ok())
        .and_then(SecretKey::from_bytes);

    if let Some(public_key) = &public_key {
        assert_eq!(PublicKey::from_bytes(&public_key.to_bytes()).as_ref(), Some(public_key));
    }

    if let (Some(secret_key), Some(public_key)) = (secret_key, public_key) {
        let ours = EcKeyPair::from(secret_key);
        let theirs = EcKeyPair::from(public_key);
        let _ = derive_shared_secret(&ours, &theirs);
    }
});
