//! Streaming AEAD state machine.
//!
//! One [`MessageState`] exists per (key, nonce) message. Construction runs
//! the rekeying protocol: keystream block 0 keys the one-time MAC, then the
//! cipher seeks past it so message data starts at block 1. Associated data
//! is absorbed first, zero-padded to a 16-byte boundary, then ciphertext,
//! padded the same way, then a footer of both byte counts. Encryption MACs
//! the ciphertext it produces; decryption MACs the ciphertext it consumes.
//! The MAC therefore never covers plaintext in either direction.
//!
//! [`EncryptStream`] and [`DecryptStream`] are the public incremental
//! interfaces. Finalization consumes them, so no data can be absorbed after
//! the tag is produced or checked. A `DecryptStream` buffers decrypted
//! bytes internally and releases them only after tag verification; a caller
//! cannot observe unverified plaintext.

use chacha20::cipher::{StreamCipher, StreamCipherSeek};
use std::mem;
use zeroize::Zeroizing;

use crate::aead::{MAX_MESSAGE_LEN, Tag};
use crate::constant_time;
use crate::error::AeadError;
use crate::mac::{self, OneTimeMac};

/// ChaCha20 keystream block size; block 0 keys the MAC, data starts at block 1.
const CIPHER_BLOCK_SIZE: usize = 64;

const PAD: [u8; mac::BLOCK_SIZE] = [0u8; mac::BLOCK_SIZE];

/// Zero bytes needed to extend `count` absorbed bytes to a block boundary.
fn pad_len(count: u64) -> usize {
    const BLOCK: u64 = mac::BLOCK_SIZE as u64;
    ((BLOCK - count % BLOCK) % BLOCK) as usize
}

enum Phase {
    Aad,
    Data,
}

/// Per-message construction state shared by every entry point.
pub(crate) struct MessageState<C> {
    cipher: C,
    mac: OneTimeMac,
    aad_len: u64,
    msg_len: u64,
    phase: Phase,
}

impl<C: StreamCipher + StreamCipherSeek> MessageState<C> {
    /// Run the rekeying protocol over a freshly keyed cipher.
    ///
    /// The first 32 bytes of keystream block 0 become the one-time MAC key;
    /// the rest of the block is discarded and never used for data.
    pub(crate) fn new(mut cipher: C) -> Self {
        let mut mac_key = Zeroizing::new([0u8; mac::KEY_SIZE]);
        cipher.apply_keystream(mac_key.as_mut_slice());
        let mac = OneTimeMac::new(&mac_key);
        cipher.seek(CIPHER_BLOCK_SIZE as u64);

        Self {
            cipher,
            mac,
            aad_len: 0,
            msg_len: 0,
            phase: Phase::Aad,
        }
    }

    /// Absorb associated data. Rejected once data processing has begun.
    pub(crate) fn update_aad(&mut self, aad: &[u8]) -> Result<(), AeadError> {
        if !matches!(self.phase, Phase::Aad) {
            return Err(AeadError::InvalidState);
        }
        self.aad_len = self
            .aad_len
            .checked_add(aad.len() as u64)
            .ok_or(AeadError::MessageTooLong)?;
        self.mac.update(aad);
        Ok(())
    }

    /// Close the AAD region, absorbing its zero padding exactly once.
    fn close_aad(&mut self) {
        if matches!(self.phase, Phase::Aad) {
            self.mac.update(&PAD[..pad_len(self.aad_len)]);
            self.phase = Phase::Data;
        }
    }

    /// Fail without touching state if `len` more bytes would exhaust the
    /// keystream counter.
    fn reserve(&self, len: usize) -> Result<(), AeadError> {
        match self.msg_len.checked_add(len as u64) {
            Some(total) if total <= MAX_MESSAGE_LEN => Ok(()),
            _ => Err(AeadError::MessageTooLong),
        }
    }

    /// Encrypt `plaintext` into `ciphertext`, then MAC the ciphertext.
    pub(crate) fn encrypt_b2b(
        &mut self,
        plaintext: &[u8],
        ciphertext: &mut [u8],
    ) -> Result<(), AeadError> {
        if ciphertext.len() != plaintext.len() {
            return Err(AeadError::LengthMismatch {
                expected: plaintext.len(),
                actual: ciphertext.len(),
            });
        }
        self.reserve(plaintext.len())?;
        self.close_aad();
        self.cipher
            .apply_keystream_b2b(plaintext, ciphertext)
            .map_err(|_| AeadError::MessageTooLong)?;
        self.mac.update(ciphertext);
        self.msg_len += plaintext.len() as u64;
        Ok(())
    }

    /// Encrypt `buffer` in place, then MAC it.
    pub(crate) fn encrypt_in_place(&mut self, buffer: &mut [u8]) -> Result<(), AeadError> {
        self.reserve(buffer.len())?;
        self.close_aad();
        self.cipher.apply_keystream(buffer);
        self.mac.update(buffer);
        self.msg_len += buffer.len() as u64;
        Ok(())
    }

    /// MAC `ciphertext` and append its decryption to `out`.
    pub(crate) fn decrypt_append(
        &mut self,
        ciphertext: &[u8],
        out: &mut Vec<u8>,
    ) -> Result<(), AeadError> {
        self.reserve(ciphertext.len())?;
        self.close_aad();
        self.mac.update(ciphertext);
        let start = out.len();
        out.extend_from_slice(ciphertext);
        self.cipher.apply_keystream(&mut out[start..]);
        self.msg_len += ciphertext.len() as u64;
        Ok(())
    }

    /// MAC `ciphertext` without decrypting it.
    ///
    /// Used by the verify-first one-shot path: the keystream stays parked
    /// at the start of the data region until the tag has been checked.
    pub(crate) fn absorb_ciphertext(&mut self, ciphertext: &[u8]) -> Result<(), AeadError> {
        self.reserve(ciphertext.len())?;
        self.close_aad();
        self.mac.update(ciphertext);
        self.msg_len += ciphertext.len() as u64;
        Ok(())
    }

    /// Absorb the final ciphertext padding and the length footer, then
    /// produce the tag and hand back the cipher.
    ///
    /// Footer layout: `aad_len` as LE u64, then `msg_len` as LE u64.
    pub(crate) fn finalize_tag(mut self) -> ([u8; mac::TAG_SIZE], C) {
        self.close_aad();
        self.mac.update(&PAD[..pad_len(self.msg_len)]);

        let mut footer = [0u8; mac::BLOCK_SIZE];
        footer[..8].copy_from_slice(&self.aad_len.to_le_bytes());
        footer[8..].copy_from_slice(&self.msg_len.to_le_bytes());
        self.mac.update(&footer);

        let Self { cipher, mac, .. } = self;
        (mac.finalize(), cipher)
    }

    /// Verify the expected tag in constant time; only on success is the
    /// cipher released for decryption.
    pub(crate) fn verify_into_cipher(self, expected: &[u8; mac::TAG_SIZE]) -> Result<C, AeadError> {
        let (computed, cipher) = self.finalize_tag();
        if constant_time::verify_16(&computed, expected) {
            Ok(cipher)
        } else {
            Err(AeadError::AuthenticationFailure)
        }
    }
}

/// Incremental authenticated encryption of one message.
///
/// Created by [`ChaCha20Poly1305::encrypt_stream`] or
/// [`XChaCha20Poly1305::encrypt_stream`]. Absorb associated data first,
/// then feed plaintext in chunks of any size; chunk boundaries do not
/// affect the output. Finalization consumes the stream.
///
/// [`ChaCha20Poly1305::encrypt_stream`]: crate::aead::ChaCha20Poly1305::encrypt_stream
/// [`XChaCha20Poly1305::encrypt_stream`]: crate::aead::XChaCha20Poly1305::encrypt_stream
pub struct EncryptStream<C> {
    state: MessageState<C>,
}

impl<C: StreamCipher + StreamCipherSeek> EncryptStream<C> {
    pub(crate) fn new(cipher: C) -> Self {
        Self {
            state: MessageState::new(cipher),
        }
    }

    /// Absorb associated data.
    ///
    /// Any number of calls, any chunking. Once plaintext has been fed
    /// (even a zero-length chunk), further calls return
    /// [`AeadError::InvalidState`].
    ///
    /// # Errors
    ///
    /// Returns `AeadError::InvalidState` after data processing has begun.
    pub fn update_aad(&mut self, aad: &[u8]) -> Result<(), AeadError> {
        self.state.update_aad(aad)
    }

    /// Encrypt a plaintext chunk into `ciphertext`.
    ///
    /// # Errors
    ///
    /// Returns `AeadError::LengthMismatch` if the buffers differ in length,
    /// or `AeadError::MessageTooLong` if the keystream would be exhausted.
    pub fn update(&mut self, plaintext: &[u8], ciphertext: &mut [u8]) -> Result<(), AeadError> {
        self.state.encrypt_b2b(plaintext, ciphertext)
    }

    /// Encrypt a chunk in place.
    ///
    /// # Errors
    ///
    /// Returns `AeadError::MessageTooLong` if the keystream would be
    /// exhausted.
    pub fn update_in_place(&mut self, buffer: &mut [u8]) -> Result<(), AeadError> {
        self.state.encrypt_in_place(buffer)
    }

    /// Produce the 16-byte tag, consuming the stream.
    #[must_use]
    pub fn finalize(self) -> Tag {
        let (tag, _cipher) = self.state.finalize_tag();
        Tag::from_bytes(tag)
    }

    /// Produce a truncated tag of `out.len()` bytes, consuming the stream.
    ///
    /// A truncated tag is the prefix of the full tag. Shorter tags weaken
    /// forgery resistance proportionally.
    ///
    /// # Errors
    ///
    /// Returns `AeadError::InvalidTagLength` unless `out.len()` is 1..=16.
    pub fn finalize_truncated(self, out: &mut [u8]) -> Result<(), AeadError> {
        let n = out.len();
        if n == 0 || n > mac::TAG_SIZE {
            return Err(AeadError::InvalidTagLength { actual: n });
        }
        let (tag, _cipher) = self.state.finalize_tag();
        out.copy_from_slice(&tag[..n]);
        Ok(())
    }
}

/// Incremental authenticated decryption of one message.
///
/// Created by [`ChaCha20Poly1305::decrypt_stream`] or
/// [`XChaCha20Poly1305::decrypt_stream`]. Decrypted bytes accumulate in an
/// internal zeroizing buffer and are released only by a successful
/// [`verify`](Self::verify); on failure or drop they are wiped. Unverified
/// plaintext is unobservable by construction.
///
/// [`ChaCha20Poly1305::decrypt_stream`]: crate::aead::ChaCha20Poly1305::decrypt_stream
/// [`XChaCha20Poly1305::decrypt_stream`]: crate::aead::XChaCha20Poly1305::decrypt_stream
pub struct DecryptStream<C> {
    state: MessageState<C>,
    plaintext: Zeroizing<Vec<u8>>,
}

impl<C: StreamCipher + StreamCipherSeek> DecryptStream<C> {
    pub(crate) fn new(cipher: C) -> Self {
        Self {
            state: MessageState::new(cipher),
            plaintext: Zeroizing::new(Vec::new()),
        }
    }

    /// Absorb associated data.
    ///
    /// # Errors
    ///
    /// Returns `AeadError::InvalidState` after ciphertext processing has
    /// begun.
    pub fn update_aad(&mut self, aad: &[u8]) -> Result<(), AeadError> {
        self.state.update_aad(aad)
    }

    /// Absorb and decrypt a ciphertext chunk into the internal buffer.
    ///
    /// # Errors
    ///
    /// Returns `AeadError::MessageTooLong` if the keystream would be
    /// exhausted.
    pub fn update(&mut self, ciphertext: &[u8]) -> Result<(), AeadError> {
        self.state.decrypt_append(ciphertext, &mut self.plaintext)
    }

    /// Check the tag in constant time and release the plaintext.
    ///
    /// # Errors
    ///
    /// Returns `AeadError::AuthenticationFailure` on mismatch; the buffered
    /// plaintext is zeroized and dropped.
    pub fn verify(self, tag: &Tag) -> Result<Vec<u8>, AeadError> {
        let Self {
            state,
            mut plaintext,
        } = self;
        let (computed, _cipher) = state.finalize_tag();
        if constant_time::verify_16(&computed, tag.as_bytes()) {
            Ok(mem::take(&mut *plaintext))
        } else {
            Err(AeadError::AuthenticationFailure)
        }
    }

    /// Check a truncated tag against the matching prefix of the computed
    /// tag and release the plaintext.
    ///
    /// # Errors
    ///
    /// Returns `AeadError::InvalidTagLength` unless `tag.len()` is 1..=16,
    /// or `AeadError::AuthenticationFailure` on mismatch.
    pub fn verify_truncated(self, tag: &[u8]) -> Result<Vec<u8>, AeadError> {
        if tag.is_empty() || tag.len() > mac::TAG_SIZE {
            return Err(AeadError::InvalidTagLength { actual: tag.len() });
        }
        let Self {
            state,
            mut plaintext,
        } = self;
        let (computed, _cipher) = state.finalize_tag();
        if constant_time::ct_eq(&computed[..tag.len()], tag) {
            Ok(mem::take(&mut *plaintext))
        } else {
            Err(AeadError::AuthenticationFailure)
        }
    }
}
