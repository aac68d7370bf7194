//! Authenticated string envelopes.
//!
//! [`encode`] turns a UTF-8 string and a caller-owned 256-bit key into a single
//! text-safe token; [`decode`] reverses it and fails closed on tampering,
//! corruption or a key mismatch.
//!
//! # Token format
//!
//! ```text
//! base64_standard_padded( nonce[12] || ciphertext[N] || tag[16] )
//! ```
//!
//! AES-256-GCM, no associated data, ciphertext length equal to plaintext length.
//! The smallest valid envelope is 28 bytes.
//!
//! # Key handling
//!
//! The key is borrowed for the duration of a call and never copied out, logged
//! or retained. Zeroizing it afterwards is the caller's job.

pub mod cipher;
pub mod envelope;
pub mod error;
pub mod nonce;
mod token;

pub use cipher::{KEY_LEN, MIN_ENVELOPE_LEN, NONCE_LEN, TAG_LEN};
pub use envelope::Envelope;
pub use error::{EnvelopeError, Operation};
pub use nonce::{FixedNonce, NonceSource, OsNonceSource};
pub use token::{decode, encode, encode_with};
