//! Incremental Poly1305 one-time MAC.
//!
//! The `poly1305` crate absorbs whole 16-byte blocks. [`OneTimeMac`] wraps
//! it with a partial-block buffer so callers can feed bytes in chunks of
//! any length, split at any boundary, and still produce the RFC 8439 tag.
//!
//! The key is single-use: one `OneTimeMac` per derived key, consumed by
//! [`finalize`](OneTimeMac::finalize).

use poly1305::Poly1305;
use poly1305::universal_hash::{KeyInit, UniversalHash};

/// Poly1305 key size (32 bytes / 256 bits).
pub const KEY_SIZE: usize = 32;

/// Poly1305 block size (16 bytes).
pub const BLOCK_SIZE: usize = 16;

/// Poly1305 tag size (16 bytes / 128 bits).
pub const TAG_SIZE: usize = 16;

/// Byte-stream adapter over the Poly1305 polynomial core.
pub struct OneTimeMac {
    poly: Poly1305,
    buffer: [u8; BLOCK_SIZE],
    buffered: usize,
}

impl OneTimeMac {
    /// Key the MAC with a fresh one-time key.
    #[must_use]
    pub fn new(key: &[u8; KEY_SIZE]) -> Self {
        Self {
            poly: Poly1305::new(poly1305::Key::from_slice(key)),
            buffer: [0u8; BLOCK_SIZE],
            buffered: 0,
        }
    }

    /// Absorb a chunk of the message.
    ///
    /// Chunk boundaries do not affect the tag.
    pub fn update(&mut self, mut data: &[u8]) {
        if self.buffered > 0 {
            let take = (BLOCK_SIZE - self.buffered).min(data.len());
            self.buffer[self.buffered..self.buffered + take].copy_from_slice(&data[..take]);
            self.buffered += take;
            data = &data[take..];

            if self.buffered < BLOCK_SIZE {
                return;
            }
            let block = poly1305::Block::from_slice(&self.buffer);
            self.poly.update(core::slice::from_ref(block));
            self.buffered = 0;
        }

        let mut chunks = data.chunks_exact(BLOCK_SIZE);
        for chunk in &mut chunks {
            let block = poly1305::Block::from_slice(chunk);
            self.poly.update(core::slice::from_ref(block));
        }

        let tail = chunks.remainder();
        if !tail.is_empty() {
            self.buffer[..tail.len()].copy_from_slice(tail);
            self.buffered = tail.len();
        }
    }

    /// Compute the 16-byte tag, consuming the MAC.
    ///
    /// Whole blocks carry the 2^128 marker bit; a buffered partial block
    /// is closed with the short-block rule (append 0x01, zero-fill).
    #[must_use]
    pub fn finalize(self) -> [u8; TAG_SIZE] {
        if self.buffered == 0 {
            self.poly.finalize().into()
        } else {
            self.poly
                .compute_unpadded(&self.buffer[..self.buffered])
                .into()
        }
    }
}
