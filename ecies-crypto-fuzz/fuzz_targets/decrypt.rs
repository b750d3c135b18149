#![no_main]

use ecies_crypto::{EcKeyPair, Ecies, EciesConfig, SecretKey, ies};
use libfuzzer_sys::fuzz_target;
use rand_chacha::{ChaCha20Rng, rand_core::SeedableRng};

fn test_key(byte: u8) -> EcKeyPair {
    let mut bytes = [0u8; 32];
    bytes[31] = byte;
    SecretKey::from_bytes(&bytes).map(EcKeyPair::from).unwrap_or_default()
}

fuzz_target!(|data: &[u8]| {
    let sender = test_key(1);
    let recipient = test_key(2);
    let sender_public = sender.public_only();

    // malformed ciphertexts must be rejected with an error, never a panic
    let decrypted = ies::decrypt(&recipient, &sender_public, data);

    let distinct = Ecies::new(EciesConfig::default().with_uniform_decrypt_errors(false))
        .expect("default configuration is valid");
    let _ = distinct.decrypt(&recipient, &sender_public, data);

    // anything accepted must survive a fresh round trip
    if let Ok(plaintext) = decrypted {
        assert!(data.len() >= 64);

        let mut rng = ChaCha20Rng::seed_from_u64(data.len() as u64);
        let ciphertext =
            ies::encrypt_with_rng(&mut rng, &sender, &recipient.public_only(), &plaintext)
                .expect("encryption with valid keys succeeds");
        assert_eq!(ies::decrypt(&recipient, &sender_public, &ciphertext).ok(), Some(plaintext));
    }
});
