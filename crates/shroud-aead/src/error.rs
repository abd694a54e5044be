//! AEAD error types.

use thiserror::Error;

/// Errors raised by the AEAD construction
#[derive(Debug, Error)]
pub enum AeadError {
    /// Tag verification failed; the message must be discarded
    #[error("authentication failure")]
    AuthenticationFailure,

    /// Invalid key length
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },

    /// Invalid nonce length
    #[error("invalid nonce length: expected {expected}, got {actual}")]
    InvalidNonceLength {
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },

    /// Truncated tag length outside the allowed 1..=16 range
    #[error("invalid tag length: {actual}")]
    InvalidTagLength {
        /// Requested length
        actual: usize,
    },

    /// Associated data absorbed after message data processing began
    #[error("invalid state for operation")]
    InvalidState,

    /// Output buffer length does not match the input length
    #[error("output length mismatch: expected {expected}, got {actual}")]
    LengthMismatch {
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },

    /// Message would exhaust the keystream block counter
    #[error("message exceeds the per-nonce keystream limit")]
    MessageTooLong,
}
