#![no_std]

#[macro_use]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod ecdh;
pub mod ies;
pub mod keys;
pub mod mac;
pub mod selftest;

// RE-EXPORTS
// ================================================================================================

pub use ecdh::{KeyCapability, KeyPair, SharedSecret, derive_shared_secret};
pub use ies::{Ecies, EciesConfig, EciesError, decrypt, encrypt_with_rng};
#[cfg(feature = "std")]
pub use ies::encrypt;
pub use keys::{EcKeyPair, PublicKey, SecretKey};
pub use mac::AuthenticationTag;
