//! `ChaCha20-Poly1305` AEAD encryption.
//!
//! Authenticated encryption with associated data (AEAD) per RFC 8439,
//! assembled from the `chacha20` stream cipher and the `poly1305` one-time
//! MAC rather than consumed as a sealed primitive. Features include:
//! - 256-bit keys
//! - 96-bit nonces (`ChaCha20Poly1305`) or 192-bit extended nonces
//!   (`XChaCha20Poly1305`) for safe random generation
//! - 128-bit authentication tags, optionally truncated to 1..=16 bytes
//! - Associated data authentication
//! - One-shot, detached in-place, and streaming interfaces
//!
//! ## Security Properties
//!
//! - Confidentiality: `ChaCha20` keystream starting at block 1
//! - Integrity: Poly1305 under a per-nonce key from keystream block 0
//! - Decryption never exposes plaintext before tag verification
//! - Nonce uniqueness per key is the caller's responsibility; reuse is a
//!   silent security failure the construction cannot detect
//!
//! ## Usage
//!
//! ```ignore
//! use shroud_aead::aead::{AeadKey, ChaCha20Poly1305, Nonce};
//!
//! let cipher = ChaCha20Poly1305::new(AeadKey::generate(&mut OsRng));
//! let nonce = Nonce::generate(&mut OsRng);
//!
//! let sealed = cipher.encrypt(&nonce, b"secret", b"header")?;
//! let opened = cipher.decrypt(&nonce, &sealed, b"header")?;
//! ```

use chacha20::cipher::{KeyIvInit, StreamCipher, StreamCipherSeek};
use chacha20::{ChaCha20, XChaCha20};
use rand_core::{CryptoRng, RngCore};
use zeroize::ZeroizeOnDrop;

use crate::error::AeadError;
use crate::stream::{DecryptStream, EncryptStream, MessageState};

/// Authentication tag size (16 bytes / 128 bits).
pub const TAG_SIZE: usize = 16;

/// ChaCha20-Poly1305 nonce size (12 bytes / 96 bits).
pub const NONCE_SIZE: usize = 12;

/// XChaCha20-Poly1305 nonce size (24 bytes / 192 bits).
pub const XNONCE_SIZE: usize = 24;

/// AEAD key size (32 bytes / 256 bits).
pub const KEY_SIZE: usize = 32;

/// Maximum message bytes under one (key, nonce) pair.
///
/// The 32-bit block counter yields 2^32 keystream blocks of 64 bytes.
/// Block 0 keys the MAC, and `chacha20` never emits the final block (the
/// counter cannot advance past it), leaving 2^32 - 2 blocks for data.
/// Exceeding the limit is an error, never a counter wrap.
pub const MAX_MESSAGE_LEN: u64 = (u32::MAX as u64 - 1) * 64;

/// ChaCha20-Poly1305 nonce (12 bytes).
///
/// Must be unique per key. Counter-based schemes fit this size; for random
/// generation prefer [`XNonce`] and [`XChaCha20Poly1305`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Nonce([u8; NONCE_SIZE]);

impl Nonce {
    /// Create a nonce from raw bytes.
    #[must_use]
    pub fn from_bytes(bytes: [u8; NONCE_SIZE]) -> Self {
        Self(bytes)
    }

    /// Create a nonce from a slice.
    ///
    /// # Errors
    ///
    /// Returns `AeadError::InvalidNonceLength` if slice length is not 12 bytes.
    pub fn from_slice(slice: &[u8]) -> Result<Self, AeadError> {
        if slice.len() != NONCE_SIZE {
            return Err(AeadError::InvalidNonceLength {
                expected: NONCE_SIZE,
                actual: slice.len(),
            });
        }
        let mut bytes = [0u8; NONCE_SIZE];
        bytes.copy_from_slice(slice);
        Ok(Self(bytes))
    }

    /// Generate a random nonce.
    ///
    /// The 96-bit space makes random collisions plausible at scale; callers
    /// encrypting many messages under one key should use a counter here or
    /// switch to [`XNonce`].
    #[must_use]
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut bytes = [0u8; NONCE_SIZE];
        rng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Get raw bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; NONCE_SIZE] {
        &self.0
    }

    /// Get as a reference for chacha20.
    fn as_generic(&self) -> &chacha20::Nonce {
        chacha20::Nonce::from_slice(&self.0)
    }
}

/// XChaCha20-Poly1305 nonce (24 bytes).
///
/// The extended 192-bit nonce allows safe random nonce generation without
/// risk of collision (birthday bound is 2^96 messages).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct XNonce([u8; XNONCE_SIZE]);

impl XNonce {
    /// Create a nonce from raw bytes.
    #[must_use]
    pub fn from_bytes(bytes: [u8; XNONCE_SIZE]) -> Self {
        Self(bytes)
    }

    /// Create a nonce from a slice.
    ///
    /// # Errors
    ///
    /// Returns `AeadError::InvalidNonceLength` if slice length is not 24 bytes.
    pub fn from_slice(slice: &[u8]) -> Result<Self, AeadError> {
        if slice.len() != XNONCE_SIZE {
            return Err(AeadError::InvalidNonceLength {
                expected: XNONCE_SIZE,
                actual: slice.len(),
            });
        }
        let mut bytes = [0u8; XNONCE_SIZE];
        bytes.copy_from_slice(slice);
        Ok(Self(bytes))
    }

    /// Generate a random nonce.
    #[must_use]
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut bytes = [0u8; XNONCE_SIZE];
        rng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Get raw bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; XNONCE_SIZE] {
        &self.0
    }

    /// Get as a reference for chacha20.
    fn as_generic(&self) -> &chacha20::XNonce {
        chacha20::XNonce::from_slice(&self.0)
    }
}

/// Authentication tag (16 bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tag([u8; TAG_SIZE]);

impl Tag {
    /// Create a tag from raw bytes.
    #[must_use]
    pub fn from_bytes(bytes: [u8; TAG_SIZE]) -> Self {
        Self(bytes)
    }

    /// Create from slice.
    #[must_use]
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        if slice.len() != TAG_SIZE {
            return None;
        }
        let mut bytes = [0u8; TAG_SIZE];
        bytes.copy_from_slice(slice);
        Some(Self(bytes))
    }

    /// Get raw bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; TAG_SIZE] {
        &self.0
    }
}

/// AEAD encryption key (32 bytes).
///
/// Wraps the raw key material. Key is zeroized on drop and carries no
/// `Debug` impl.
#[derive(Clone, ZeroizeOnDrop)]
pub struct AeadKey([u8; KEY_SIZE]);

impl AeadKey {
    /// Create a key from raw bytes.
    #[must_use]
    pub fn new(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Create from slice.
    ///
    /// # Errors
    ///
    /// Returns `AeadError::InvalidKeyLength` if slice length is not 32 bytes.
    pub fn from_slice(slice: &[u8]) -> Result<Self, AeadError> {
        if slice.len() != KEY_SIZE {
            return Err(AeadError::InvalidKeyLength {
                expected: KEY_SIZE,
                actual: slice.len(),
            });
        }
        let mut bytes = [0u8; KEY_SIZE];
        bytes.copy_from_slice(slice);
        Ok(Self(bytes))
    }

    /// Generate a random key.
    #[must_use]
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut bytes = [0u8; KEY_SIZE];
        rng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Get raw key bytes.
    ///
    /// # Security
    ///
    /// Handle with extreme care - this exposes the raw key material.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

/// RFC 8439 ChaCha20-Poly1305 with a 96-bit nonce.
pub struct ChaCha20Poly1305 {
    key: AeadKey,
}

impl ChaCha20Poly1305 {
    /// Create a cipher owning the given key.
    #[must_use]
    pub fn new(key: AeadKey) -> Self {
        Self { key }
    }

    fn cipher(&self, nonce: &Nonce) -> ChaCha20 {
        ChaCha20::new((&self.key.0).into(), nonce.as_generic())
    }

    /// Encrypt plaintext with associated data.
    ///
    /// Returns ciphertext with appended authentication tag
    /// (`plaintext.len()` + 16 bytes).
    ///
    /// # Errors
    ///
    /// Returns `AeadError::MessageTooLong` if the plaintext exceeds
    /// [`MAX_MESSAGE_LEN`].
    pub fn encrypt(
        &self,
        nonce: &Nonce,
        plaintext: &[u8],
        aad: &[u8],
    ) -> Result<Vec<u8>, AeadError> {
        seal(self.cipher(nonce), plaintext, aad)
    }

    /// Decrypt ciphertext with associated data.
    ///
    /// Input must include the authentication tag at the end. The tag is
    /// verified over the ciphertext before any decryption happens.
    ///
    /// # Errors
    ///
    /// Returns `AeadError::AuthenticationFailure` if the input is shorter
    /// than a tag or the tag does not verify.
    pub fn decrypt(
        &self,
        nonce: &Nonce,
        ciphertext_and_tag: &[u8],
        aad: &[u8],
    ) -> Result<Vec<u8>, AeadError> {
        open(self.cipher(nonce), ciphertext_and_tag, aad)
    }

    /// Encrypt in-place, returning the authentication tag separately.
    ///
    /// # Errors
    ///
    /// Returns `AeadError::MessageTooLong` if the buffer exceeds
    /// [`MAX_MESSAGE_LEN`]; the buffer is untouched on error.
    pub fn encrypt_detached(
        &self,
        nonce: &Nonce,
        buffer: &mut [u8],
        aad: &[u8],
    ) -> Result<Tag, AeadError> {
        seal_detached(self.cipher(nonce), buffer, aad)
    }

    /// Verify the detached tag, then decrypt in-place.
    ///
    /// # Errors
    ///
    /// Returns `AeadError::AuthenticationFailure` on tag mismatch; the
    /// buffer still holds the ciphertext and no plaintext was produced.
    pub fn decrypt_detached(
        &self,
        nonce: &Nonce,
        buffer: &mut [u8],
        tag: &Tag,
        aad: &[u8],
    ) -> Result<(), AeadError> {
        open_detached(self.cipher(nonce), buffer, tag, aad)
    }

    /// Begin streaming encryption of one message.
    #[must_use]
    pub fn encrypt_stream(&self, nonce: &Nonce) -> EncryptStream<ChaCha20> {
        EncryptStream::new(self.cipher(nonce))
    }

    /// Begin streaming decryption of one message.
    #[must_use]
    pub fn decrypt_stream(&self, nonce: &Nonce) -> DecryptStream<ChaCha20> {
        DecryptStream::new(self.cipher(nonce))
    }
}

/// XChaCha20-Poly1305 with a 192-bit extended nonce.
///
/// Same construction as [`ChaCha20Poly1305`]; the `chacha20` crate derives
/// the per-message subkey from the first 16 nonce bytes via HChaCha20.
pub struct XChaCha20Poly1305 {
    key: AeadKey,
}

impl XChaCha20Poly1305 {
    /// Create a cipher owning the given key.
    #[must_use]
    pub fn new(key: AeadKey) -> Self {
        Self { key }
    }

    fn cipher(&self, nonce: &XNonce) -> XChaCha20 {
        XChaCha20::new((&self.key.0).into(), nonce.as_generic())
    }

    /// Encrypt plaintext with associated data.
    ///
    /// Returns ciphertext with appended authentication tag
    /// (`plaintext.len()` + 16 bytes).
    ///
    /// # Errors
    ///
    /// Returns `AeadError::MessageTooLong` if the plaintext exceeds
    /// [`MAX_MESSAGE_LEN`].
    pub fn encrypt(
        &self,
        nonce: &XNonce,
        plaintext: &[u8],
        aad: &[u8],
    ) -> Result<Vec<u8>, AeadError> {
        seal(self.cipher(nonce), plaintext, aad)
    }

    /// Decrypt ciphertext with associated data.
    ///
    /// Input must include the authentication tag at the end. The tag is
    /// verified over the ciphertext before any decryption happens.
    ///
    /// # Errors
    ///
    /// Returns `AeadError::AuthenticationFailure` if the input is shorter
    /// than a tag or the tag does not verify.
    pub fn decrypt(
        &self,
        nonce: &XNonce,
        ciphertext_and_tag: &[u8],
        aad: &[u8],
    ) -> Result<Vec<u8>, AeadError> {
        open(self.cipher(nonce), ciphertext_and_tag, aad)
    }

    /// Encrypt in-place, returning the authentication tag separately.
    ///
    /// # Errors
    ///
    /// Returns `AeadError::MessageTooLong` if the buffer exceeds
    /// [`MAX_MESSAGE_LEN`]; the buffer is untouched on error.
    pub fn encrypt_detached(
        &self,
        nonce: &XNonce,
        buffer: &mut [u8],
        aad: &[u8],
    ) -> Result<Tag, AeadError> {
        seal_detached(self.cipher(nonce), buffer, aad)
    }

    /// Verify the detached tag, then decrypt in-place.
    ///
    /// # Errors
    ///
    /// Returns `AeadError::AuthenticationFailure` on tag mismatch; the
    /// buffer still holds the ciphertext and no plaintext was produced.
    pub fn decrypt_detached(
        &self,
        nonce: &XNonce,
        buffer: &mut [u8],
        tag: &Tag,
        aad: &[u8],
    ) -> Result<(), AeadError> {
        open_detached(self.cipher(nonce), buffer, tag, aad)
    }

    /// Begin streaming encryption of one message.
    #[must_use]
    pub fn encrypt_stream(&self, nonce: &XNonce) -> EncryptStream<XChaCha20> {
        EncryptStream::new(self.cipher(nonce))
    }

    /// Begin streaming decryption of one message.
    #[must_use]
    pub fn decrypt_stream(&self, nonce: &XNonce) -> DecryptStream<XChaCha20> {
        DecryptStream::new(self.cipher(nonce))
    }
}

fn seal<C>(cipher: C, plaintext: &[u8], aad: &[u8]) -> Result<Vec<u8>, AeadError>
where
    C: StreamCipher + StreamCipherSeek,
{
    let mut state = MessageState::new(cipher);
    state.update_aad(aad)?;

    let mut out = Vec::with_capacity(plaintext.len() + TAG_SIZE);
    out.extend_from_slice(plaintext);
    state.encrypt_in_place(&mut out)?;

    let (tag, _cipher) = state.finalize_tag();
    out.extend_from_slice(&tag);
    Ok(out)
}

fn open<C>(cipher: C, ciphertext_and_tag: &[u8], aad: &[u8]) -> Result<Vec<u8>, AeadError>
where
    C: StreamCipher + StreamCipherSeek,
{
    if ciphertext_and_tag.len() < TAG_SIZE {
        return Err(AeadError::AuthenticationFailure);
    }
    let (ciphertext, tag) = ciphertext_and_tag.split_at(ciphertext_and_tag.len() - TAG_SIZE);
    let mut expected = [0u8; TAG_SIZE];
    expected.copy_from_slice(tag);

    let mut state = MessageState::new(cipher);
    state.update_aad(aad)?;
    state.absorb_ciphertext(ciphertext)?;
    let mut cipher = state.verify_into_cipher(&expected)?;

    let mut plaintext = ciphertext.to_vec();
    cipher.apply_keystream(&mut plaintext);
    Ok(plaintext)
}

fn seal_detached<C>(cipher: C, buffer: &mut [u8], aad: &[u8]) -> Result<Tag, AeadError>
where
    C: StreamCipher + StreamCipherSeek,
{
    let mut state = MessageState::new(cipher);
    state.update_aad(aad)?;
    state.encrypt_in_place(buffer)?;
    let (tag, _cipher) = state.finalize_tag();
    Ok(Tag::from_bytes(tag))
}

fn open_detached<C>(cipher: C, buffer: &mut [u8], tag: &Tag, aad: &[u8]) -> Result<(), AeadError>
where
    C: StreamCipher + StreamCipherSeek,
{
    let mut state = MessageState::new(cipher);
    state.update_aad(aad)?;
    state.absorb_ciphertext(buffer)?;
    let mut cipher = state.verify_into_cipher(tag.as_bytes())?;
    cipher.apply_keystream(buffer);
    Ok(())
}
