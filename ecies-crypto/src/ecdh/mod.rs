//! ECDH (Elliptic Curve Diffie-Hellman) shared secret derivation over secp256k1.
//!
//! Unlike ephemeral-static ECIES variants, both parties here use long-lived keys: the sender
//! combines its private key with the recipient's public key, and the recipient does the converse.
//! Since `a * (b * G) == b * (a * G)` both sides arrive at the same point; the x-coordinate of
//! that point is hashed to obtain a 256-bit symmetric key.

use k256::elliptic_curve::subtle::ConstantTimeEq;
use sha2::{Digest, Sha256};
use sha3::Keccak256;
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{
    ies::{EciesError, KEY_SIZE, KdfHash},
    keys::{PublicKey, SecretKey},
};

#[cfg(test)]
mod tests;

// KEY PAIR CAPABILITY
// ================================================================================================

/// What a [`KeyPair`] can contribute to a key agreement.
#[derive(Debug, Clone, Copy)]
pub enum KeyCapability<'a> {
    /// The key holds a private scalar (and therefore also a public point).
    PrivateCapable(&'a SecretKey),
    /// Only the public point is known.
    PublicOnly(&'a PublicKey),
}

impl KeyCapability<'_> {
    /// Returns the public point behind this capability.
    pub fn public_key(&self) -> PublicKey {
        match self {
            KeyCapability::PrivateCapable(secret_key) => secret_key.public_key(),
            KeyCapability::PublicOnly(public_key) => (*public_key).clone(),
        }
    }
}

/// An elliptic curve key as seen by the key agreement.
///
/// Implementors are owned by the caller; nothing in this crate mutates or persists them.
pub trait KeyPair {
    /// Returns true if the private scalar is known.
    fn has_private_component(&self) -> bool;

    /// Returns the public point, or `None` if no key material is loaded.
    fn public_component(&self) -> Option<PublicKey>;

    /// Returns the private scalar.
    ///
    /// # Errors
    /// Returns [`EciesError::NoPrivateKey`] if only the public point is known.
    fn private_component(&self) -> Result<&SecretKey, EciesError>;

    /// Returns what this key can contribute to a key agreement, or `None` if no key material is
    /// loaded.
    fn capability(&self) -> Option<KeyCapability<'_>>;
}

impl<K: KeyPair + ?Sized> KeyPair for &K {
    fn has_private_component(&self) -> bool {
        (**self).has_private_component()
    }

    fn public_component(&self) -> Option<PublicKey> {
        (**self).public_component()
    }

    fn private_component(&self) -> Result<&SecretKey, EciesError> {
        (**self).private_component()
    }

    fn capability(&self) -> Option<KeyCapability<'_>> {
        (**self).capability()
    }
}

// SHARED SECRET
// ================================================================================================

/// A 256-bit symmetric key derived from an ECDH key agreement. Zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SharedSecret([u8; KEY_SIZE]);

impl SharedSecret {
    /// Wraps raw key bytes. Intended for tests and interoperability checks; normal callers obtain
    /// secrets from [`derive_shared_secret`].
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl AsRef<[u8]> for SharedSecret {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl PartialEq for SharedSecret {
    fn eq(&self, other: &Self) -> bool {
        self.0[..].ct_eq(&other.0[..]).into()
    }
}

impl Eq for SharedSecret {}

impl core::fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("SharedSecret(..)")
    }
}

// DERIVATION
// ================================================================================================

/// Derives the secret shared between two keys using SHA-256 as the key derivation hash.
///
/// At least one of the keys must hold its private component. If both do, the private component
/// of `ours` is used, so `derive_shared_secret(a, b) == derive_shared_secret(b, a)` whenever the
/// private key on one side matches the public key on the other.
///
/// # Errors
/// - [`EciesError::MissingKey`] if either key has no key material loaded.
/// - [`EciesError::NoPrivateKey`] if neither key holds a private component.
/// - [`EciesError::EcdhFailed`] if the key agreement did not yield a full-length shared value.
pub fn derive_shared_secret<A, B>(ours: &A, theirs: &B) -> Result<SharedSecret, EciesError>
where
    A: KeyPair + ?Sized,
    B: KeyPair + ?Sized,
{
    derive_shared_secret_with(KdfHash::Sha256, ours, theirs)
}

/// Same as [`derive_shared_secret`], with an explicit key derivation hash.
pub fn derive_shared_secret_with<A, B>(
    kdf: KdfHash,
    ours: &A,
    theirs: &B,
) -> Result<SharedSecret, EciesError>
where
    A: KeyPair + ?Sized,
    B: KeyPair + ?Sized,
{
    let (Some(ours), Some(theirs)) = (ours.capability(), theirs.capability()) else {
        debug!("key agreement attempted with a missing key");
        return Err(EciesError::MissingKey);
    };

    let (secret_key, public_key) = match (ours, theirs) {
        (KeyCapability::PrivateCapable(secret_key), other) => (secret_key, other.public_key()),
        (KeyCapability::PublicOnly(public_key), KeyCapability::PrivateCapable(secret_key)) => {
            (secret_key, public_key.clone())
        },
        (KeyCapability::PublicOnly(_), KeyCapability::PublicOnly(_)) => {
            debug!("key agreement attempted without a private key");
            return Err(EciesError::NoPrivateKey);
        },
    };

    let shared = k256::ecdh::diffie_hellman(
        secret_key.as_inner().to_nonzero_scalar(),
        public_key.as_inner().as_affine(),
    );
    let raw = shared.raw_secret_bytes();
    if raw.len() != KEY_SIZE {
        debug!(len = raw.len(), "ecdh produced a shared value of unexpected length");
        return Err(EciesError::EcdhFailed);
    }

    Ok(kdf_hash(kdf, raw.as_slice()))
}

/// Hashes the raw shared value into a key. The hash output must be at least [`KEY_SIZE`] bytes;
/// anything shorter is a programming error rather than a runtime condition.
fn kdf_hash(kdf: KdfHash, shared_value: &[u8]) -> SharedSecret {
    assert!(kdf.output_size() >= KEY_SIZE, "kdf output shorter than the key size");

    let mut digest = match kdf {
        KdfHash::Sha256 => Sha256::digest(shared_value),
        KdfHash::Keccak256 => Keccak256::digest(shared_value),
    };

    let mut key = [0u8; KEY_SIZE];
    key.copy_from_slice(&digest[..KEY_SIZE]);
    digest.as_mut_slice().zeroize();

    SharedSecret(key)
}
