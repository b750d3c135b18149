//! Key material over the secp256k1 curve.
//!
//! [`SecretKey`] and [`PublicKey`] are thin wrappers over their `k256` counterparts, and
//! [`EcKeyPair`] bundles them into the [`KeyPair`] capability consumed by the rest of the crate.
//! A keypair may hold both halves, only the public half, or nothing at all.

use alloc::vec::Vec;

use k256::elliptic_curve::sec1::ToEncodedPoint;
use rand::{CryptoRng, RngCore, TryCryptoRng};
use tracing::debug;
use zeroize::Zeroizing;

use crate::{
    ecdh::{self, KeyCapability, KeyPair, SharedSecret},
    ies::{self, EciesError},
};


// CONSTANTS
// ================================================================================================

/// Size of a serialized secret key.
pub const SECRET_KEY_BYTES: usize = 32;

/// Size of a serialized public key; the compressed SEC1 encoding is used.
pub const PUBLIC_KEY_BYTES: usize = 33;

/// Number of candidate scalars drawn before key generation gives up on the random number
/// generator.
const MAX_KEYGEN_ATTEMPTS: usize = 128;

// SECRET KEY
// ================================================================================================

/// Secret scalar over secp256k1.
#[derive(Clone)]
pub struct SecretKey {
    inner: k256::SecretKey,
}

impl SecretKey {
    /// Generates a new random secret key using the OS random number generator.
    #[cfg(feature = "std")]
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let mut rng = rand::rng();

        Self::with_rng(&mut rng)
    }

    /// Generates a new secret key using the provided random number generator.
    ///
    /// # Panics
    /// Panics if `rng` keeps producing invalid scalars; see [`SecretKey::try_with_rng`].
    pub fn with_rng<R: CryptoRng + RngCore + ?Sized>(rng: &mut R) -> Self {
        Self::try_with_rng(rng).expect("random number generator produced no valid scalar")
    }

    /// Generates a new secret key using the provided random number generator.
    ///
    /// Candidate scalars outside of `[1, n)` are rejected and redrawn; this happens with
    /// probability below 2^-127 per draw.
    ///
    /// # Errors
    /// Returns [`EciesError::EntropyFailure`] if none of the first `MAX_KEYGEN_ATTEMPTS`
    /// candidates is a valid scalar, which only a broken generator produces.
    pub fn try_with_rng<R: CryptoRng + RngCore + ?Sized>(rng: &mut R) -> Result<Self, EciesError> {
        let mut candidate = Zeroizing::new([0u8; SECRET_KEY_BYTES]);
        for _ in 0..MAX_KEYGEN_ATTEMPTS {
            rng.fill_bytes(candidate.as_mut());
            if let Ok(inner) = k256::SecretKey::from_slice(candidate.as_ref()) {
                return Ok(Self { inner });
            }
        }

        debug!(attempts = MAX_KEYGEN_ATTEMPTS, "no valid scalar drawn from the rng");
        Err(EciesError::EntropyFailure)
    }

    /// Parses a big-endian scalar. Returns `None` if the scalar is zero or not below the curve
    /// order.
    pub fn from_bytes(bytes: &[u8; SECRET_KEY_BYTES]) -> Option<Self> {
        k256::SecretKey::from_slice(bytes).ok().map(|inner| Self { inner })
    }

    /// Returns the big-endian encoding of this scalar.
    pub fn to_bytes(&self) -> Zeroizing<[u8; SECRET_KEY_BYTES]> {
        Zeroizing::new(self.inner.to_bytes().into())
    }

    /// Get the corresponding public key for this secret key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey { inner: self.inner.public_key() }
    }

    pub(crate) fn as_inner(&self) -> &k256::SecretKey {
        &self.inner
    }
}

impl core::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("SecretKey(..)")
    }
}

// PUBLIC KEY
// ================================================================================================

/// Public point over secp256k1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    inner: k256::PublicKey,
}

impl PublicKey {
    /// Parses a SEC1 encoded point; both compressed and uncompressed encodings are accepted.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        k256::PublicKey::from_sec1_bytes(bytes).ok().map(|inner| Self { inner })
    }

    /// Returns the compressed SEC1 encoding of this point.
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_BYTES] {
        let encoded = self.inner.to_encoded_point(true);
        let mut bytes = [0u8; PUBLIC_KEY_BYTES];
        bytes.copy_from_slice(encoded.as_bytes());
        bytes
    }

    pub(crate) fn as_inner(&self) -> &k256::PublicKey {
        &self.inner
    }
}

impl From<&SecretKey> for PublicKey {
    fn from(secret_key: &SecretKey) -> Self {
        secret_key.public_key()
    }
}

// KEY PAIR
// ================================================================================================

/// An elliptic curve key which may hold a private component, only a public component, or
/// nothing at all (the [`Default`] value).
#[derive(Debug, Clone, Default)]
pub struct EcKeyPair {
    public: Option<PublicKey>,
    secret: Option<SecretKey>,
}

impl EcKeyPair {
    /// Generates a new private-capable keypair using the provided random number generator.
    ///
    /// # Panics
    /// Panics under the same conditions as [`SecretKey::with_rng`].
    pub fn generate<R: CryptoRng + RngCore + ?Sized>(rng: &mut R) -> Self {
        Self::from_secret_key(SecretKey::with_rng(rng))
    }

    /// Fallible counterpart of [`EcKeyPair::generate`]; see [`SecretKey::try_with_rng`].
    pub fn try_generate<R: CryptoRng + RngCore + ?Sized>(rng: &mut R) -> Result<Self, EciesError> {
        SecretKey::try_with_rng(rng).map(Self::from_secret_key)
    }

    /// Builds a private-capable keypair from a secret key.
    pub fn from_secret_key(secret_key: SecretKey) -> Self {
        Self {
            public: Some(secret_key.public_key()),
            secret: Some(secret_key),
        }
    }

    /// Builds a public-only keypair.
    pub fn from_public_key(public_key: PublicKey) -> Self {
        Self { public: Some(public_key), secret: None }
    }

    /// Returns a copy of this keypair without its private component.
    pub fn public_only(&self) -> Self {
        Self { public: self.public.clone(), secret: None }
    }

    /// Returns true if no key material has been loaded.
    pub fn is_empty(&self) -> bool {
        self.public.is_none()
    }

    /// Derives the secret shared between this key and `other`. See
    /// [`derive_shared_secret`](crate::ecdh::derive_shared_secret).
    pub fn shared_secret<K: KeyPair + ?Sized>(
        &self,
        other: &K,
    ) -> Result<SharedSecret, EciesError> {
        ecdh::derive_shared_secret(self, other)
    }

    /// Encrypts `plaintext` so that the holder of `other`'s private key can read it, using the
    /// default configuration.
    pub fn encrypt_for<R, K>(
        &self,
        rng: &mut R,
        other: &K,
        plaintext: &[u8],
    ) -> Result<Vec<u8>, EciesError>
    where
        R: TryCryptoRng + ?Sized,
        K: KeyPair + ?Sized,
    {
        ies::encrypt_with_rng(rng, self, other, plaintext)
    }

    /// Decrypts a ciphertext produced by the holder of `other`'s private key, using the default
    /// configuration.
    pub fn decrypt_from<K: KeyPair + ?Sized>(
        &self,
        other: &K,
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, EciesError> {
        ies::decrypt(self, other, ciphertext)
    }
}

impl From<SecretKey> for EcKeyPair {
    fn from(secret_key: SecretKey) -> Self {
        Self::from_secret_key(secret_key)
    }
}

impl From<PublicKey> for EcKeyPair {
    fn from(public_key: PublicKey) -> Self {
        Self::from_public_key(public_key)
    }
}

impl KeyPair for EcKeyPair {
    fn has_private_component(&self) -> bool {
        self.secret.is_some()
    }

    fn public_component(&self) -> Option<PublicKey> {
        self.public.clone()
    }

    fn private_component(&self) -> Result<&SecretKey, EciesError> {
        self.secret.as_ref().ok_or(EciesError::NoPrivateKey)
    }

    fn capability(&self) -> Option<KeyCapability<'_>> {
        match (&self.secret, &self.public) {
            (Some(secret), _) => Some(KeyCapability::PrivateCapable(secret)),
            (None, Some(public)) => Some(KeyCapability::PublicOnly(public)),
            (None, None) => None,
        }
    }
}
