//! AES-256-GCM sealing and opening of raw byte buffers.
//!
//! **Algorithm choice:** plain AES-256-GCM with a 96-bit random nonce and a
//! 128-bit tag, no associated data. That is the layout every other
//! implementation of the token format produces, so it must not be swapped for
//! a misuse-resistant variant without changing the wire format.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};

use crate::error::{EnvelopeError, Operation};

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Byte length of an AES-GCM nonce (12 bytes = 96 bits).
pub const NONCE_LEN: usize = 12;

/// Byte length of the GCM authentication tag (16 bytes = 128 bits).
pub const TAG_LEN: usize = 16;

/// Smallest structurally valid envelope: nonce plus tag, empty ciphertext.
pub const MIN_ENVELOPE_LEN: usize = NONCE_LEN + TAG_LEN;

/// Reject keys that are not exactly [`KEY_LEN`] bytes.
///
/// Shared by both directions so the check and its message shape are identical.
pub(crate) fn check_key(key: &[u8], operation: Operation) -> Result<(), EnvelopeError> {
    if key.len() != KEY_LEN {
        return Err(EnvelopeError::key_length(operation, key.len()));
    }
    Ok(())
}

/// Encrypt `plaintext`, returning `ciphertext || tag`.
pub(crate) fn seal(
    key: &[u8],
    nonce: &[u8; NONCE_LEN],
    plaintext: &[u8],
) -> Result<Vec<u8>, EnvelopeError> {
    let cipher = build_cipher(key, Operation::Encryption)?;
    cipher
        .encrypt(Nonce::from_slice(nonce), plaintext)
        .map_err(|e| EnvelopeError::Encryption(e.to_string()))
}

/// Verify and decrypt `ciphertext || tag`.
///
/// The primitive reports every verification failure as one opaque error,
/// which is surfaced as [`EnvelopeError::Authentication`].
pub(crate) fn open(
    key: &[u8],
    nonce: &[u8; NONCE_LEN],
    sealed: &[u8],
) -> Result<Vec<u8>, EnvelopeError> {
    let cipher = build_cipher(key, Operation::Decryption)?;
    cipher
        .decrypt(Nonce::from_slice(nonce), sealed)
        .map_err(|_| EnvelopeError::Authentication)
}

fn build_cipher(key: &[u8], operation: Operation) -> Result<Aes256Gcm, EnvelopeError> {
    check_key(key, operation)?;
    Aes256Gcm::new_from_slice(key).map_err(|e| match operation {
        Operation::Encryption => EnvelopeError::Encryption(e.to_string()),
        Operation::Decryption => EnvelopeError::Decryption(e.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: [u8; KEY_LEN] = [0x11; KEY_LEN];
    const NONCE: [u8; NONCE_LEN] = [0x22; NONCE_LEN];

    #[test]
    fn seal_open_round_trip() {
        let sealed = seal(&KEY, &NONCE, b"123-45-6789").unwrap();
        assert_eq!(sealed.len(), 11 + TAG_LEN);
        let opened = open(&KEY, &NONCE, &sealed).unwrap();
        assert_eq!(opened, b"123-45-6789");
    }

    #[test]
    fn tampered_tag_fails_auth() {
        let mut sealed = seal(&KEY, &NONCE, b"tamper me").unwrap();
        let last = sealed.len() - 1;
        sealed[last] ^= 0x01;
        assert!(matches!(
            open(&KEY, &NONCE, &sealed),
            Err(EnvelopeError::Authentication)
        ));
    }

    #[test]
    fn wrong_nonce_fails_auth() {
        let sealed = seal(&KEY, &NONCE, b"secret").unwrap();
        let other = [0x23; NONCE_LEN];
        assert!(matches!(
            open(&KEY, &other, &sealed),
            Err(EnvelopeError::Authentication)
        ));
    }

    #[test]
    fn invalid_key_length_rejected_per_direction() {
        let short = [0u8; 16];
        match seal(&short, &NONCE, b"x") {
            Err(EnvelopeError::KeyLength { operation, .. }) => {
                assert_eq!(operation, Operation::Encryption)
            }
            other => panic!("unexpected: {other:?}"),
        }
        match open(&short, &NONCE, &[0u8; TAG_LEN]) {
            Err(EnvelopeError::KeyLength { operation, .. }) => {
                assert_eq!(operation, Operation::Decryption)
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn min_envelope_is_nonce_plus_tag() {
        assert_eq!(MIN_ENVELOPE_LEN, 28);
    }
}
