//! String-in, token-out encoding and its inverse.

use tracing::debug;

use crate::cipher::{self, NONCE_LEN};
use crate::envelope::Envelope;
use crate::error::{EnvelopeError, Operation};
use crate::nonce::{NonceSource, OsNonceSource};

/// Encrypt `plaintext` under `key` into a base64 token.
///
/// A fresh nonce is drawn from the OS CSPRNG on every call, so encoding the
/// same input twice yields different tokens.
///
/// # Errors
///
/// Returns [`EnvelopeError::KeyLength`] if `key` is not 32 bytes.
pub fn encode(plaintext: &str, key: &[u8]) -> Result<String, EnvelopeError> {
    encode_with(plaintext, key, &OsNonceSource)
}

/// Like [`encode`], drawing the nonce from `nonces`.
///
/// The key is checked before `nonces` is consulted.
///
/// # Errors
///
/// Returns [`EnvelopeError::KeyLength`] if `key` is not 32 bytes, or
/// [`EnvelopeError::Encryption`] if the primitive refuses the plaintext.
pub fn encode_with(
    plaintext: &str,
    key: &[u8],
    nonces: &dyn NonceSource,
) -> Result<String, EnvelopeError> {
    cipher::check_key(key, Operation::Encryption)?;

    let mut nonce = [0u8; NONCE_LEN];
    nonces.fill_nonce(&mut nonce);

    let sealed = cipher::seal(key, &nonce, plaintext.as_bytes())?;
    let token = Envelope { nonce, sealed }.to_token();
    debug!(token_len = token.len(), "envelope encoded");
    Ok(token)
}

/// Verify and decrypt a token produced by [`encode`].
///
/// # Errors
///
/// Checks run in this order, first failure wins:
/// 1. [`EnvelopeError::KeyLength`]: `key` is not 32 bytes.
/// 2. [`EnvelopeError::Encoding`]: `token` is not valid base64.
/// 3. [`EnvelopeError::EnvelopeTooShort`]: fewer than 28 decoded bytes.
/// 4. [`EnvelopeError::Authentication`]: tag mismatch (tampering or wrong key).
/// 5. [`EnvelopeError::Decryption`]: the verified plaintext is not UTF-8.
pub fn decode(token: &str, key: &[u8]) -> Result<String, EnvelopeError> {
    cipher::check_key(key, Operation::Decryption)?;

    let envelope = Envelope::from_token(token).inspect_err(|e| {
        debug!(token_len = token.len(), error = %e, "envelope rejected before decryption");
    })?;

    let plaintext = cipher::open(key, &envelope.nonce, &envelope.sealed)?;
    String::from_utf8(plaintext).map_err(|e| EnvelopeError::Decryption(e.utf8_error().to_string()))
}
