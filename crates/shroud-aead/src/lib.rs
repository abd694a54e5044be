//! # shroud-aead
//!
//! ChaCha20-Poly1305 authenticated encryption, built from the stream cipher
//! and one-time MAC primitives instead of a sealed AEAD crate, so the
//! construction itself (MAC-key derivation, padding, length footer,
//! verify-before-release) stays visible and testable.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`aead`] | ChaCha20-Poly1305 and XChaCha20-Poly1305 ciphers, keys, nonces, tags |
//! | [`stream`] | Incremental encryption and verify-then-release decryption |
//! | [`mac`] | Poly1305 one-time authenticator with 16-byte block buffering |
//! | [`constant_time`] | Constant-time comparison helpers |
//! | [`error`] | Error types |
//!
//! ## Security Considerations
//!
//! - Nonces MUST be unique per key; reuse destroys confidentiality and
//!   authenticity. Use [`aead::XChaCha20Poly1305`] when nonces are random.
//! - Tag comparison is constant-time.
//! - Decryption APIs never hand out plaintext before the tag verifies.
//! - Key material is zeroized on drop.
//!
//! This crate has NOT been audited. Use at your own risk.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod aead;
pub mod constant_time;
pub mod error;
pub mod mac;
pub mod stream;

pub use error::AeadError;
