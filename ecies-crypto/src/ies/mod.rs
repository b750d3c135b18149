//! Elliptic Curve Integrated Encryption Scheme (ECIES).
//!
//! This module combines the ECDH shared secret of two secp256k1 keys with an HMAC-then-encrypt
//! construction over AES-256-CBC. Either party can encrypt for the other using its own private
//! key and the other party's public key; no ephemeral key travels with the message.
//!
//! A ciphertext is laid out as follows (sizes for the default [`EciesConfig`]):
//!
//! ```text
//! [ IV : 16 bytes, plain ] [ AES-256-CBC( HMAC(plaintext) : 32 bytes || plaintext || PKCS#7 ) ]
//! ```
//!
//! The tag is computed over the plaintext before encryption and is encrypted along with it, so a
//! ciphertext for an `L` byte plaintext is between `L + 49` and `L + 64` bytes long.
//!
//! # Examples
//!
//! ```
//! use ecies_crypto::{EcKeyPair, ies};
//!
//! let mut rng = rand::rng();
//! let alice = EcKeyPair::generate(&mut rng);
//! let bob = EcKeyPair::generate(&mut rng);
//!
//! let ciphertext =
//!     ies::encrypt_with_rng(&mut rng, &alice, &bob.public_only(), b"hello world").unwrap();
//! let plaintext = ies::decrypt(&bob, &alice.public_only(), &ciphertext).unwrap();
//!
//! assert_eq!(plaintext.as_slice(), b"hello world");
//! ```

use alloc::vec::Vec;

use rand::TryCryptoRng;
use tracing::{debug, trace};
use zeroize::Zeroizing;

use crate::{
    ecdh::{self, KeyPair, SharedSecret},
    mac,
};

mod cipher;
mod config;
mod error;


use cipher::{CipherError, DecryptionContext, EncryptionContext};
pub use config::{
    BLOCK_SIZE, CipherAlgorithm, EciesConfig, IV_SIZE, KEY_SIZE, KdfHash, MacAlgorithm, TAG_SIZE,
};
pub use error::EciesError;

// ECIES
// ================================================================================================

/// ECIES engine for a validated [`EciesConfig`].
///
/// The engine holds no per-message state: every call derives its own secret, IV and cipher
/// context, all of which are wiped before the call returns. A single engine can therefore be
/// shared freely between threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ecies {
    config: EciesConfig,
}

impl Ecies {
    /// Creates an engine for the provided configuration.
    ///
    /// # Errors
    /// Returns [`EciesError::InvalidConfig`] if the configuration is inconsistent.
    pub fn new(config: EciesConfig) -> Result<Self, EciesError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EciesConfig {
        &self.config
    }

    /// Derives the secret shared between `ours` and `theirs` with this engine's key derivation
    /// hash. See [`ecdh::derive_shared_secret`].
    pub fn derive_shared_secret<A, B>(&self, ours: &A, theirs: &B) -> Result<SharedSecret, EciesError>
    where
        A: KeyPair + ?Sized,
        B: KeyPair + ?Sized,
    {
        ecdh::derive_shared_secret_with(self.config.kdf_hash, ours, theirs)
    }

    /// Encrypts `plaintext` for the holder of the private key matching `theirs`.
    ///
    /// A fresh IV is drawn from `rng` for every call.
    ///
    /// # Errors
    /// - Any error of [`Ecies::derive_shared_secret`].
    /// - [`EciesError::EntropyFailure`] if `rng` fails to produce the IV.
    /// - [`EciesError::CipherInitFailed`] / [`EciesError::CipherUpdateFailed`] if the cipher
    ///   context rejects its key, IV or input.
    pub fn encrypt<R, A, B>(
        &self,
        rng: &mut R,
        ours: &A,
        theirs: &B,
        plaintext: &[u8],
    ) -> Result<Vec<u8>, EciesError>
    where
        R: TryCryptoRng + ?Sized,
        A: KeyPair + ?Sized,
        B: KeyPair + ?Sized,
    {
        let secret = self.derive_shared_secret(ours, theirs)?;
        let tag = mac::compute_tag_with(self.config.mac, &secret, plaintext);

        let mut iv = [0u8; IV_SIZE];
        rng.try_fill_bytes(&mut iv).map_err(|_| {
            debug!("random number generator failed to produce an iv");
            EciesError::EntropyFailure
        })?;

        let mut ctx =
            EncryptionContext::new(&secret, &iv).map_err(|_| EciesError::CipherInitFailed)?;

        let mut out = Vec::new();
        out.try_reserve_exact(self.config.ciphertext_len(plaintext.len()))
            .map_err(|_| EciesError::CipherUpdateFailed)?;
        out.extend_from_slice(&iv);

        ctx.update(tag.as_ref(), &mut out).map_err(|_| EciesError::CipherUpdateFailed)?;
        ctx.update(plaintext, &mut out).map_err(|_| EciesError::CipherUpdateFailed)?;
        ctx.finalize(&mut out).map_err(|_| EciesError::CipherUpdateFailed)?;

        debug_assert!(self.config.ciphertext_len_bounds(plaintext.len()).contains(&out.len()));
        trace!(plaintext_len = plaintext.len(), ciphertext_len = out.len(), "encrypted message");

        Ok(out)
    }

    /// Decrypts a ciphertext produced by the holder of the private key matching `theirs`.
    ///
    /// The length of the ciphertext is checked before any key material is touched. The tag is
    /// verified after the padding, so with `uniform_decrypt_errors` disabled the two failures
    /// can be told apart by the caller.
    ///
    /// # Errors
    /// - [`EciesError::CiphertextTooShort`] if the ciphertext cannot hold an IV, a tag and a
    ///   block of padding.
    /// - Any error of [`Ecies::derive_shared_secret`].
    /// - [`EciesError::CipherInitFailed`] if the cipher context rejects its key or IV.
    /// - [`EciesError::TagExtractionFailed`] / [`EciesError::PlaintextExtractionFailed`] if the
    ///   encrypted fields cannot be decrypted, e.g. because they are not block aligned.
    /// - [`EciesError::BadPadding`] / [`EciesError::BadHmac`] if the ciphertext was corrupted or
    ///   was not produced for this pair of keys.
    pub fn decrypt<A, B>(&self, ours: &A, theirs: &B, ciphertext: &[u8]) -> Result<Vec<u8>, EciesError>
    where
        A: KeyPair + ?Sized,
        B: KeyPair + ?Sized,
    {
        let min = self.config.min_ciphertext_len();
        if ciphertext.len() < min {
            debug!(len = ciphertext.len(), min, "ciphertext too short");
            return Err(EciesError::CiphertextTooShort { min, actual: ciphertext.len() });
        }

        let secret = self.derive_shared_secret(ours, theirs)?;

        let (iv, body) = ciphertext.split_at(self.config.iv_size);
        let (encrypted_tag, encrypted_plaintext) = body.split_at(self.config.mac_size);

        let mut ctx =
            DecryptionContext::new(&secret, iv).map_err(|_| EciesError::CipherInitFailed)?;

        let mut tag = Zeroizing::new(Vec::new());
        ctx.update_blocks(encrypted_tag, &mut tag).map_err(|err| {
            debug!(?err, "unable to extract hmac");
            EciesError::TagExtractionFailed
        })?;
        if tag.len() != self.config.mac_size {
            debug!(len = tag.len(), "extracted hmac has unexpected length");
            return Err(EciesError::TagExtractionFailed);
        }

        if encrypted_plaintext.len() % self.config.block_size != 0 {
            debug!(len = encrypted_plaintext.len(), "encrypted plaintext is not block aligned");
            return Err(EciesError::PlaintextExtractionFailed);
        }

        let mut plaintext = Zeroizing::new(Vec::new());
        ctx.update(encrypted_plaintext, &mut plaintext).map_err(|err| {
            debug!(?err, "unable to extract plaintext");
            EciesError::PlaintextExtractionFailed
        })?;

        match ctx.finalize(&mut plaintext) {
            Ok(()) => {},
            Err(CipherError::BadPadding) => {
                debug!("plaintext had bad padding");
                return Err(self.authentication_failure(EciesError::BadPadding));
            },
            Err(err) => {
                debug!(?err, "unable to finalize plaintext");
                return Err(EciesError::PlaintextExtractionFailed);
            },
        }

        if !mac::verify_tag_with(self.config.mac, &secret, &plaintext, &tag) {
            debug!("plaintext had bad hmac");
            return Err(self.authentication_failure(EciesError::BadHmac));
        }

        trace!(
            ciphertext_len = ciphertext.len(),
            plaintext_len = plaintext.len(),
            "decrypted message"
        );

        Ok(core::mem::take(&mut *plaintext))
    }

    /// Maps a padding or tag failure onto the error reported to the caller.
    fn authentication_failure(&self, err: EciesError) -> EciesError {
        if self.config.uniform_decrypt_errors { EciesError::BadHmac } else { err }
    }
}

impl Default for Ecies {
    fn default() -> Self {
        Self { config: EciesConfig::default() }
    }
}

// CONVENIENCE FUNCTIONS
// ================================================================================================

/// Encrypts `plaintext` for the holder of the private key matching `theirs`, drawing the IV from
/// the operating system's random number generator.
///
/// Uses the default configuration; see [`Ecies::encrypt`].
#[cfg(feature = "std")]
pub fn encrypt<A, B>(ours: &A, theirs: &B, plaintext: &[u8]) -> Result<Vec<u8>, EciesError>
where
    A: KeyPair + ?Sized,
    B: KeyPair + ?Sized,
{
    encrypt_with_rng(&mut rand::rngs::OsRng, ours, theirs, plaintext)
}

/// Encrypts `plaintext` for the holder of the private key matching `theirs` using the default
/// configuration; see [`Ecies::encrypt`].
pub fn encrypt_with_rng<R, A, B>(
    rng: &mut R,
    ours: &A,
    theirs: &B,
    plaintext: &[u8],
) -> Result<Vec<u8>, EciesError>
where
    R: TryCryptoRng + ?Sized,
    A: KeyPair + ?Sized,
    B: KeyPair + ?Sized,
{
    Ecies::default().encrypt(rng, ours, theirs, plaintext)
}

/// Decrypts a ciphertext using the default configuration; see [`Ecies::decrypt`].
pub fn decrypt<A, B>(ours: &A, theirs: &B, ciphertext: &[u8]) -> Result<Vec<u8>, EciesError>
where
    A: KeyPair + ?Sized,
    B: KeyPair + ?Sized,
{
    Ecies::default().decrypt(ours, theirs, ciphertext)
}
