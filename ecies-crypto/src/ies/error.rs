use thiserror::Error;

/// Error type for the elliptic curve integrated encryption scheme (ECIES)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EciesError {
    #[error("missing key")]
    MissingKey,
    #[error("no private key")]
    NoPrivateKey,
    #[error("ecdh key agreement failed")]
    EcdhFailed,
    #[error("insufficient entropy")]
    EntropyFailure,
    #[error("unable to init cipher")]
    CipherInitFailed,
    #[error("cipher rejected input")]
    CipherUpdateFailed,
    #[error("ciphertext too short: expected at least {min} bytes, found {actual}")]
    CiphertextTooShort { min: usize, actual: usize },
    #[error("unable to extract hmac")]
    TagExtractionFailed,
    #[error("unable to extract plaintext")]
    PlaintextExtractionFailed,
    #[error("plaintext had bad padding")]
    BadPadding,
    #[error("plaintext had bad hmac")]
    BadHmac,
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

impl EciesError {
    /// Returns true if this error was produced while authenticating a ciphertext, i.e. the
    /// ciphertext is corrupted or was not produced for the given pair of keys.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, EciesError::BadPadding | EciesError::BadHmac)
    }
}
