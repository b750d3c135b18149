//! Streaming AES-256-CBC contexts with PKCS#7 padding.
//!
//! The contexts accept input in arbitrary pieces and append their output to a caller supplied
//! buffer, which lets the orchestrator feed the tag and the plaintext as one logical stream
//! without first concatenating them. Key schedules and buffered bytes are wiped when a context is
//! dropped, on success and failure alike.

use alloc::vec::Vec;

use aes::Aes256;
use cbc::cipher::{
    Block, BlockDecryptMut, BlockEncryptMut, KeyIvInit,
    block_padding::{Padding, Pkcs7},
};
use zeroize::Zeroize;

use super::BLOCK_SIZE;
use crate::ecdh::SharedSecret;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;
type AesBlock = Block<Aes256>;

// ERRORS
// ================================================================================================

/// Failures reported by the cipher contexts; the orchestrator maps these onto
/// [`EciesError`](super::EciesError) according to the stage it is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum CipherError {
    /// The key or IV has the wrong length.
    InvalidKeyOrIv,
    /// The output buffer could not be grown.
    OutputAllocation,
    /// Block-aligned input was expected.
    Misaligned,
    /// The final block is missing or its padding is malformed.
    BadPadding,
}

// ENCRYPTION
// ================================================================================================

/// AES-256-CBC encryption context.
pub(super) struct EncryptionContext {
    cipher: Aes256CbcEnc,
    pending: AesBlock,
    pending_len: usize,
}

impl EncryptionContext {
    pub fn new(key: &SharedSecret, iv: &[u8]) -> Result<Self, CipherError> {
        let cipher = Aes256CbcEnc::new_from_slices(key.as_ref(), iv)
            .map_err(|_| CipherError::InvalidKeyOrIv)?;

        Ok(Self {
            cipher,
            pending: AesBlock::default(),
            pending_len: 0,
        })
    }

    /// Encrypts all complete blocks formed by the buffered bytes and `input`, appending the
    /// ciphertext to `out`. Trailing bytes are buffered until the next call.
    pub fn update(&mut self, mut input: &[u8], out: &mut Vec<u8>) -> Result<(), CipherError> {
        out.try_reserve(self.pending_len + input.len())
            .map_err(|_| CipherError::OutputAllocation)?;

        while !input.is_empty() {
            let take = (BLOCK_SIZE - self.pending_len).min(input.len());
            self.pending[self.pending_len..self.pending_len + take]
                .copy_from_slice(&input[..take]);
            self.pending_len += take;
            input = &input[take..];

            if self.pending_len == BLOCK_SIZE {
                self.cipher.encrypt_block_mut(&mut self.pending);
                out.extend_from_slice(&self.pending);
                self.pending_len = 0;
            }
        }

        Ok(())
    }

    /// Pads the buffered bytes to a full block (1 to `BLOCK_SIZE` bytes of padding) and appends
    /// the final encrypted block to `out`.
    pub fn finalize(mut self, out: &mut Vec<u8>) -> Result<(), CipherError> {
        out.try_reserve(BLOCK_SIZE).map_err(|_| CipherError::OutputAllocation)?;

        Pkcs7::pad(&mut self.pending, self.pending_len);
        self.cipher.encrypt_block_mut(&mut self.pending);
        out.extend_from_slice(&self.pending);
        self.pending_len = 0;

        Ok(())
    }
}

impl Drop for EncryptionContext {
    fn drop(&mut self) {
        self.pending.as_mut_slice().zeroize();
    }
}

// DECRYPTION
// ================================================================================================

/// AES-256-CBC decryption context.
///
/// [`update`](Self::update) always holds back the last complete block, since it may carry the
/// padding; [`finalize`](Self::finalize) decrypts it and strips the padding.
pub(super) struct DecryptionContext {
    cipher: Aes256CbcDec,
    pending: AesBlock,
    pending_len: usize,
}

impl DecryptionContext {
    pub fn new(key: &SharedSecret, iv: &[u8]) -> Result<Self, CipherError> {
        let cipher = Aes256CbcDec::new_from_slices(key.as_ref(), iv)
            .map_err(|_| CipherError::InvalidKeyOrIv)?;

        Ok(Self {
            cipher,
            pending: AesBlock::default(),
            pending_len: 0,
        })
    }

    /// Decrypts `input` block by block, appending exactly `input.len()` bytes to `out`.
    ///
    /// Used for data known not to be the final block of the stream, such as the tag at the start
    /// of a ciphertext. `input` must be block aligned and nothing may be buffered.
    pub fn update_blocks(&mut self, input: &[u8], out: &mut Vec<u8>) -> Result<(), CipherError> {
        if self.pending_len != 0 || input.len() % BLOCK_SIZE != 0 {
            return Err(CipherError::Misaligned);
        }
        out.try_reserve(input.len()).map_err(|_| CipherError::OutputAllocation)?;

        for chunk in input.chunks_exact(BLOCK_SIZE) {
            let mut block = AesBlock::clone_from_slice(chunk);
            self.cipher.decrypt_block_mut(&mut block);
            out.extend_from_slice(&block);
            block.as_mut_slice().zeroize();
        }

        Ok(())
    }

    /// Decrypts `input`, appending all but the last complete block of plaintext to `out`.
    pub fn update(&mut self, mut input: &[u8], out: &mut Vec<u8>) -> Result<(), CipherError> {
        out.try_reserve(self.pending_len + input.len())
            .map_err(|_| CipherError::OutputAllocation)?;

        while !input.is_empty() {
            // a full block followed by more input is not the final block
            if self.pending_len == BLOCK_SIZE {
                self.cipher.decrypt_block_mut(&mut self.pending);
                out.extend_from_slice(&self.pending);
                self.pending_len = 0;
            }

            let take = (BLOCK_SIZE - self.pending_len).min(input.len());
            self.pending[self.pending_len..self.pending_len + take]
                .copy_from_slice(&input[..take]);
            self.pending_len += take;
            input = &input[take..];
        }

        Ok(())
    }

    /// Decrypts the held-back final block, validates its padding and appends the unpadded bytes
    /// to `out`.
    pub fn finalize(mut self, out: &mut Vec<u8>) -> Result<(), CipherError> {
        if self.pending_len != BLOCK_SIZE {
            return Err(CipherError::BadPadding);
        }

        self.cipher.decrypt_block_mut(&mut self.pending);
        let unpadded = Pkcs7::unpad(&self.pending).map_err(|_| CipherError::BadPadding)?;

        out.try_reserve(unpadded.len()).map_err(|_| CipherError::OutputAllocation)?;
        out.extend_from_slice(unpadded);

        Ok(())
    }
}

impl Drop for DecryptionContext {
    fn drop(&mut self) {
        self.pending.as_mut_slice().zeroize();
    }
}
