//! Error taxonomy for envelope encoding and decoding.

use std::fmt;

use thiserror::Error;

use crate::cipher::{KEY_LEN, MIN_ENVELOPE_LEN};

/// Which direction of the codec rejected a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// [`crate::encode`] / [`crate::encode_with`].
    Encryption,
    /// [`crate::decode`].
    Decryption,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Encryption => f.write_str("Encryption"),
            Operation::Decryption => f.write_str("Decryption"),
        }
    }
}

/// Every way an encode or decode call can be rejected.
///
/// Decoding checks run in a fixed order and the first failure wins:
/// - [`EnvelopeError::KeyLength`]
/// - [`EnvelopeError::Encoding`]
/// - [`EnvelopeError::EnvelopeTooShort`]
/// - [`EnvelopeError::Authentication`] / [`EnvelopeError::Decryption`]
///
/// None of the variants carry key material or plaintext.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// The key is not exactly [`KEY_LEN`] bytes. Raised before any random
    /// bytes are drawn or any cipher is built.
    #[error("{operation} key must be {expected} bytes, got {actual}")]
    KeyLength {
        operation: Operation,
        expected: usize,
        actual: usize,
    },

    /// The token is not valid padded standard base64.
    #[error("invalid base64 input: {0}")]
    Encoding(#[from] base64::DecodeError),

    /// The decoded envelope cannot hold a nonce and a tag.
    #[error("encrypted data is too short to be valid: {actual} bytes, need at least {MIN_ENVELOPE_LEN}")]
    EnvelopeTooShort { actual: usize },

    /// Tag verification failed. Tampered data and a wrong key look the same.
    #[error("decryption failed: invalid authentication tag; data may be corrupted or key incorrect")]
    Authentication,

    /// Any other decrypt-side failure, including a plaintext that is not UTF-8.
    #[error("decryption failed: {0}")]
    Decryption(String),

    /// The primitive refused to encrypt (plaintext beyond the AES-GCM limit).
    #[error("encryption failed: {0}")]
    Encryption(String),
}

impl EnvelopeError {
    pub(crate) fn key_length(operation: Operation, actual: usize) -> Self {
        EnvelopeError::KeyLength {
            operation,
            expected: KEY_LEN,
            actual,
        }
    }

    /// Returns `true` for configuration errors (bad key), `false` for data errors.
    pub fn is_key_error(&self) -> bool {
        matches!(self, EnvelopeError::KeyLength { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_length_message_names_operation() {
        let e = EnvelopeError::key_length(Operation::Encryption, 16);
        assert_eq!(e.to_string(), "Encryption key must be 32 bytes, got 16");

        let e = EnvelopeError::key_length(Operation::Decryption, 48);
        assert_eq!(e.to_string(), "Decryption key must be 32 bytes, got 48");
    }

    #[test]
    fn authentication_message_does_not_blame_either_cause() {
        let msg = EnvelopeError::Authentication.to_string();
        assert!(msg.contains("corrupted or key incorrect"));
        assert!(msg.starts_with("decryption failed"));
    }

    #[test]
    fn only_key_length_is_a_key_error() {
        assert!(EnvelopeError::key_length(Operation::Decryption, 0).is_key_error());
        assert!(!EnvelopeError::Authentication.is_key_error());
        assert!(!EnvelopeError::EnvelopeTooShort { actual: 3 }.is_key_error());
        assert!(!EnvelopeError::Decryption("x".into()).is_key_error());
    }

    #[test]
    fn too_short_reports_minimum() {
        let e = EnvelopeError::EnvelopeTooShort { actual: 10 };
        assert!(e.to_string().contains("10 bytes"));
        assert!(e.to_string().contains("28"));
    }
}
