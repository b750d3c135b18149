//! Algorithm suite configuration for ECIES.
//!
//! The defaults match the wire format described in the crate documentation: SHA-256 key
//! derivation, AES-256-CBC with PKCS#7 padding and HMAC-SHA256 authentication tags. The record is
//! explicit so that alternative hash functions can be plugged in and so that tests can exercise
//! the size checks; all sizes are in bytes.

use core::ops::RangeInclusive;

use super::EciesError;

// CONSTANTS
// ================================================================================================

/// Size of the derived symmetric key.
pub const KEY_SIZE: usize = 32;

/// Size of an AES block.
pub const BLOCK_SIZE: usize = 16;

/// Size of the initialization vector prepended to each ciphertext.
pub const IV_SIZE: usize = BLOCK_SIZE;

/// Size of the authentication tag.
pub const TAG_SIZE: usize = 32;

// ALGORITHMS
// ================================================================================================

/// Hash function applied to the raw ECDH shared value to obtain the symmetric key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum KdfHash {
    Sha256,
    Keccak256,
}

impl KdfHash {
    /// Returns the number of bytes produced by this hash function.
    pub const fn output_size(self) -> usize {
        match self {
            KdfHash::Sha256 | KdfHash::Keccak256 => 32,
        }
    }
}

/// Block cipher (and mode) used to encrypt the tag and plaintext.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum CipherAlgorithm {
    Aes256Cbc,
}

impl CipherAlgorithm {
    pub const fn key_size(self) -> usize {
        match self {
            CipherAlgorithm::Aes256Cbc => 32,
        }
    }

    pub const fn block_size(self) -> usize {
        match self {
            CipherAlgorithm::Aes256Cbc => 16,
        }
    }
}

/// Keyed hash used to compute authentication tags over plaintexts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum MacAlgorithm {
    HmacSha256,
    HmacKeccak256,
}

impl MacAlgorithm {
    /// Returns the number of bytes in a tag produced by this MAC.
    pub const fn output_size(self) -> usize {
        match self {
            MacAlgorithm::HmacSha256 | MacAlgorithm::HmacKeccak256 => 32,
        }
    }
}

// CONFIG
// ================================================================================================

/// The algorithm suite and field sizes used by [`Ecies`](super::Ecies).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct EciesConfig {
    /// Hash applied to the ECDH shared value.
    pub kdf_hash: KdfHash,
    /// Block cipher and chaining mode.
    pub cipher: CipherAlgorithm,
    /// Size of the derived symmetric key; must match the cipher's key size.
    pub key_size: usize,
    /// Cipher block size.
    pub block_size: usize,
    /// Authentication tag algorithm.
    pub mac: MacAlgorithm,
    /// Size of the authentication tag; must match the MAC output size.
    pub mac_size: usize,
    /// Size of the unencrypted IV prefix; must match the block size.
    pub iv_size: usize,
    /// When set, padding failures during decryption are reported as [`EciesError::BadHmac`] so
    /// that the two failure modes cannot be told apart by a caller. The precise cause is still
    /// logged at `debug` level.
    ///
    /// Defaults to `true`.
    pub uniform_decrypt_errors: bool,
}

/// This block contains the derived sizes of the wire format.
impl EciesConfig {
    /// Returns the length of the shortest well-formed ciphertext: IV, tag and one block of
    /// padding.
    pub const fn min_ciphertext_len(&self) -> usize {
        2 * self.block_size + self.mac_size
    }

    /// Returns the range of ciphertext lengths that encrypting `plaintext_len` bytes can produce.
    ///
    /// Depending on how much padding is needed the ciphertext is between 1 and `block_size` bytes
    /// longer than the IV, the tag and the plaintext combined.
    pub fn ciphertext_len_bounds(&self, plaintext_len: usize) -> RangeInclusive<usize> {
        let unpadded = self.iv_size + self.mac_size + plaintext_len;
        (unpadded + 1)..=(unpadded + self.block_size)
    }

    /// Returns the exact length of the ciphertext produced for `plaintext_len` bytes.
    pub const fn ciphertext_len(&self, plaintext_len: usize) -> usize {
        let body = self.mac_size + plaintext_len;
        self.iv_size + (body / self.block_size + 1) * self.block_size
    }

    /// Checks that the sizes in this record agree with the selected algorithms.
    ///
    /// # Errors
    /// Returns [`EciesError::InvalidConfig`] naming the first inconsistent field.
    pub fn validate(&self) -> Result<(), EciesError> {
        if self.key_size != self.cipher.key_size() {
            return Err(EciesError::InvalidConfig("key size does not match the cipher"));
        }
        if self.kdf_hash.output_size() < self.key_size {
            return Err(EciesError::InvalidConfig("kdf hash output is shorter than the key"));
        }
        if self.block_size != self.cipher.block_size() {
            return Err(EciesError::InvalidConfig("block size does not match the cipher"));
        }
        if self.iv_size != self.block_size {
            return Err(EciesError::InvalidConfig("iv size must equal the block size"));
        }
        if self.mac_size != self.mac.output_size() {
            return Err(EciesError::InvalidConfig("mac size does not match the mac algorithm"));
        }
        if self.mac_size % self.block_size != 0 {
            return Err(EciesError::InvalidConfig("mac size must be a multiple of the block size"));
        }
        Ok(())
    }
}

// BUILDERS
// ================================================================================================

/// This impl block contains the builder functions for the configuration options.
impl EciesConfig {
    /// Sets the hash used for key derivation.
    pub fn with_kdf_hash(mut self, kdf_hash: KdfHash) -> Self {
        self.kdf_hash = kdf_hash;
        self
    }

    /// Sets the MAC algorithm, updating the tag size to match.
    pub fn with_mac(mut self, mac: MacAlgorithm) -> Self {
        self.mac = mac;
        self.mac_size = mac.output_size();
        self
    }

    /// Sets whether padding and tag failures are reported as the same error.
    pub fn with_uniform_decrypt_errors(mut self, uniform: bool) -> Self {
        self.uniform_decrypt_errors = uniform;
        self
    }
}

// TRAIT IMPLS
// ================================================================================================

impl Default for EciesConfig {
    fn default() -> Self {
        Self {
            kdf_hash: KdfHash::Sha256,
            cipher: CipherAlgorithm::Aes256Cbc,
            key_size: KEY_SIZE,
            block_size: BLOCK_SIZE,
            mac: MacAlgorithm::HmacSha256,
            mac_size: TAG_SIZE,
            iv_size: IV_SIZE,
            uniform_decrypt_errors: true,
        }
    }
}
