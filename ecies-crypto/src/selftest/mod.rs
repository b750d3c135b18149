//! Round-trip self-test for the default ECIES configuration.
//!
//! The check plays both parties: a sender encrypts with its private key and the recipient's public
//! key, and the recipient decrypts with its private key and the sender's public key. Each side
//! only ever sees the other's public half.

use alloc::vec::Vec;

use rand::{CryptoRng, RngCore};
use tracing::{debug, trace};

use crate::{
    ies::{Ecies, EciesError},
    keys::EcKeyPair,
};

#[cfg(test)]
mod tests;

// CONSTANTS
// ================================================================================================

/// Number of messages encrypted by [`check_ecies`].
pub const DEFAULT_ITERATIONS: usize = 30_000;

/// Plaintext lengths cycle through `0..DEFAULT_MAX_LEN`.
pub const DEFAULT_MAX_LEN: usize = 3_000;

// ROUND TRIP CHECK
// ================================================================================================

/// A configurable round-trip check.
///
/// Iteration `i` encrypts a random plaintext of `i % max_len` bytes and expects the decryption to
/// return it unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundTripCheck {
    iterations: usize,
    max_len: usize,
    ecies: Ecies,
}

impl RoundTripCheck {
    pub fn new(iterations: usize, max_len: usize) -> Self {
        Self { iterations, max_len, ecies: Ecies::default() }
    }

    /// Runs the check against a different engine.
    pub fn with_engine(mut self, ecies: Ecies) -> Self {
        self.ecies = ecies;
        self
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Runs the check, drawing keys, IVs and plaintexts from `rng`.
    ///
    /// Returns true if every iteration round-tripped. The first failure stops the run and is
    /// logged at debug level.
    pub fn run<R: CryptoRng + RngCore + ?Sized>(&self, rng: &mut R) -> bool {
        let (sender, recipient) = match generate_parties(rng) {
            Ok(parties) => parties,
            Err(err) => {
                debug!(%err, "self-test key generation failed");
                return false;
            },
        };
        let sender_public = sender.public_only();
        let recipient_public = recipient.public_only();

        let mut plaintext = Vec::with_capacity(self.max_len);
        for i in 0..self.iterations {
            let len = i.checked_rem(self.max_len).unwrap_or(0);
            plaintext.resize(len, 0);
            rng.fill_bytes(&mut plaintext);

            let ciphertext =
                match self.ecies.encrypt(rng, &sender, &recipient_public, &plaintext) {
                    Ok(ciphertext) => ciphertext,
                    Err(err) => {
                        debug!(iteration = i, len, %err, "self-test encryption failed");
                        return false;
                    },
                };

            match self.ecies.decrypt(&recipient, &sender_public, &ciphertext) {
                Ok(decrypted) if decrypted == plaintext => {},
                Ok(_) => {
                    debug!(iteration = i, len, "self-test decryption returned a different plaintext");
                    return false;
                },
                Err(err) => {
                    debug!(iteration = i, len, %err, "self-test decryption failed");
                    return false;
                },
            }
        }

        trace!(iterations = self.iterations, "self-test passed");
        true
    }
}

impl Default for RoundTripCheck {
    fn default() -> Self {
        Self::new(DEFAULT_ITERATIONS, DEFAULT_MAX_LEN)
    }
}

fn generate_parties<R: CryptoRng + RngCore + ?Sized>(
    rng: &mut R,
) -> Result<(EcKeyPair, EcKeyPair), EciesError> {
    let sender = EcKeyPair::try_generate(rng)?;
    let recipient = EcKeyPair::try_generate(rng)?;
    Ok((sender, recipient))
}

/// Runs the default round-trip check with the thread-local random number generator.
#[cfg(feature = "std")]
pub fn check_ecies() -> bool {
    RoundTripCheck::default().run(&mut rand::rng())
}
