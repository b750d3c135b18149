//! Authentication tags over plaintexts.
//!
//! The tag is an HMAC keyed by the ECDH shared secret. The digest size equals the tag size, so
//! no truncation is involved.

use hmac::{Hmac, Mac, SimpleHmac, digest::KeyInit};
use k256::elliptic_curve::subtle::ConstantTimeEq;
use sha2::Sha256;
use sha3::Keccak256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{
    ecdh::SharedSecret,
    ies::{MacAlgorithm, TAG_SIZE},
};

#[cfg(test)]
mod tests;

// AUTHENTICATION TAG
// ================================================================================================

/// A 256-bit tag binding a plaintext to a shared secret.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct AuthenticationTag([u8; TAG_SIZE]);

impl AuthenticationTag {
    pub fn as_bytes(&self) -> &[u8; TAG_SIZE] {
        &self.0
    }
}

impl AsRef<[u8]> for AuthenticationTag {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl PartialEq for AuthenticationTag {
    fn eq(&self, other: &Self) -> bool {
        self.0[..].ct_eq(&other.0[..]).into()
    }
}

impl Eq for AuthenticationTag {}

impl core::fmt::Debug for AuthenticationTag {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("AuthenticationTag(..)")
    }
}

// TAG COMPUTATION
// ================================================================================================

/// Computes the HMAC-SHA256 tag of `data` keyed by `secret`.
///
/// The tag is defined for every input length, including the empty buffer.
pub fn compute_tag(secret: &SharedSecret, data: &[u8]) -> AuthenticationTag {
    compute_tag_with(MacAlgorithm::HmacSha256, secret, data)
}

/// Computes the tag of `data` keyed by `secret` using the specified MAC algorithm.
pub fn compute_tag_with(
    mac: MacAlgorithm,
    secret: &SharedSecret,
    data: &[u8],
) -> AuthenticationTag {
    match mac {
        MacAlgorithm::HmacSha256 => tag_with::<Hmac<Sha256>>(secret, data),
        MacAlgorithm::HmacKeccak256 => tag_with::<SimpleHmac<Keccak256>>(secret, data),
    }
}

/// Recomputes the tag of `data` and compares it against `expected` in constant time.
///
/// Returns true if the tags match.
pub fn verify_tag_with(
    mac: MacAlgorithm,
    secret: &SharedSecret,
    data: &[u8],
    expected: &[u8],
) -> bool {
    match mac {
        MacAlgorithm::HmacSha256 => verify_with::<Hmac<Sha256>>(secret, data, expected),
        MacAlgorithm::HmacKeccak256 => verify_with::<SimpleHmac<Keccak256>>(secret, data, expected),
    }
}

// HELPERS
// ================================================================================================

fn keyed<M: Mac + KeyInit>(secret: &SharedSecret, data: &[u8]) -> M {
    // HMAC accepts keys of any length, so this cannot fail
    let mut mac = <M as KeyInit>::new_from_slice(secret.as_ref())
        .expect("hmac should accept a key of any length");
    Mac::update(&mut mac, data);
    mac
}

fn tag_with<M: Mac + KeyInit>(secret: &SharedSecret, data: &[u8]) -> AuthenticationTag {
    let mut output = keyed::<M>(secret, data).finalize().into_bytes();
    debug_assert_eq!(output.len(), TAG_SIZE);

    let mut tag = [0u8; TAG_SIZE];
    tag.copy_from_slice(&output[..TAG_SIZE]);
    output.as_mut_slice().zeroize();

    AuthenticationTag(tag)
}

fn verify_with<M: Mac + KeyInit>(secret: &SharedSecret, data: &[u8], expected: &[u8]) -> bool {
    keyed::<M>(secret, data).verify_slice(expected).is_ok()
}
