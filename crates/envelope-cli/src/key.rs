//! [`KeyMaterial`]: caller-side ownership of the envelope key.

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;
use zeroize::Zeroizing;

/// Errors decoding key text.
#[derive(Debug, Error)]
pub enum KeyError {
    /// The text is not standard base64. The offending byte is not reported.
    #[error("key text is not standard base64")]
    NotBase64,
}

/// Raw key bytes, wiped from memory on drop.
///
/// The length is not checked here; the envelope codec rejects anything but
/// 32 bytes with its own error.
pub struct KeyMaterial(Zeroizing<Vec<u8>>);

impl KeyMaterial {
    /// Decode standard base64 key text. Surrounding whitespace is ignored.
    pub fn from_base64(text: &str) -> Result<Self, KeyError> {
        STANDARD
            .decode(text.trim())
            .map(|bytes| Self(Zeroizing::new(bytes)))
            .map_err(|_| KeyError::NotBase64)
    }

    /// Borrow the key bytes for a single codec call.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("KeyMaterial([REDACTED])")
    }
}
