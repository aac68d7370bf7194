//! The wire layout behind every token.
//!
//! ```text
//! base64_standard_padded( nonce[12] || ciphertext[N] || tag[16] )
//! ```

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::cipher::{MIN_ENVELOPE_LEN, NONCE_LEN, TAG_LEN};
use crate::error::EnvelopeError;

/// A parsed envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Raw nonce bytes.
    pub nonce: [u8; NONCE_LEN],
    /// Raw ciphertext followed by the authentication tag.
    pub sealed: Vec<u8>,
}

impl Envelope {
    /// Concatenate `nonce || sealed`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(NONCE_LEN + self.sealed.len());
        out.extend_from_slice(&self.nonce);
        out.extend_from_slice(&self.sealed);
        out
    }

    /// Encode this envelope to its token form.
    pub fn to_token(&self) -> String {
        STANDARD.encode(self.to_bytes())
    }

    /// Split raw envelope bytes into nonce and sealed parts.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::EnvelopeTooShort`] below [`MIN_ENVELOPE_LEN`] bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EnvelopeError> {
        if bytes.len() < MIN_ENVELOPE_LEN {
            return Err(EnvelopeError::EnvelopeTooShort {
                actual: bytes.len(),
            });
        }
        let (nonce_bytes, sealed) = bytes.split_at(NONCE_LEN);
        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(nonce_bytes);
        Ok(Self {
            nonce,
            sealed: sealed.to_vec(),
        })
    }

    /// Parse a token back into an [`Envelope`].
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::Encoding`] if `token` is not padded standard
    /// base64, then [`EnvelopeError::EnvelopeTooShort`] if it decodes to
    /// fewer than [`MIN_ENVELOPE_LEN`] bytes.
    pub fn from_token(token: &str) -> Result<Self, EnvelopeError> {
        let bytes = STANDARD.decode(token)?;
        Self::from_bytes(&bytes)
    }

    /// Length of the ciphertext alone, which equals the plaintext length.
    ///
    /// A hand-built envelope whose `sealed` part is shorter than a tag reports
    /// zero; such an envelope never authenticates.
    pub fn ciphertext_len(&self) -> usize {
        self.sealed.len().saturating_sub(TAG_LEN)
    }
}
