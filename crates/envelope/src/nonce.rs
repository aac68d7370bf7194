//! Where encoder nonces come from.
//!
//! Production code uses [`OsNonceSource`]. Tests and known-answer vectors can
//! hand [`crate::encode_with`] a [`FixedNonce`] instead; the algorithm itself
//! never changes.

use aes_gcm::aead::{rand_core::RngCore, OsRng};

use crate::cipher::NONCE_LEN;

/// A provider of 96-bit nonces.
///
/// Implementations must never hand out the same nonce twice for the same key.
/// A failing random source is unrecoverable and is expected to panic.
/// Sources are shared across threads, so one `&dyn NonceSource` can serve
/// concurrent encoders.
#[cfg_attr(test, mockall::automock)]
pub trait NonceSource: Send + Sync {
    /// Overwrite `nonce` with a fresh value.
    fn fill_nonce(&self, nonce: &mut [u8; NONCE_LEN]);
}

/// Nonces drawn from the operating system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsNonceSource;

impl NonceSource for OsNonceSource {
    fn fill_nonce(&self, nonce: &mut [u8; NONCE_LEN]) {
        OsRng.fill_bytes(nonce);
    }
}

/// Always yields the same nonce.
///
/// Only for reproducible vectors. Encoding two messages under one key with a
/// `FixedNonce` breaks both confidentiality and authenticity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedNonce(pub [u8; NONCE_LEN]);

impl NonceSource for FixedNonce {
    fn fill_nonce(&self, nonce: &mut [u8; NONCE_LEN]) {
        *nonce = self.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn os_source_produces_distinct_nonces() {
        let mut a = [0u8; NONCE_LEN];
        let mut b = [0u8; NONCE_LEN];
        OsNonceSource.fill_nonce(&mut a);
        OsNonceSource.fill_nonce(&mut b);
        assert_ne!(a, b);
    }

    #[test]
    fn fixed_source_overwrites_buffer() {
        let mut n = [0xAAu8; NONCE_LEN];
        FixedNonce([7u8; NONCE_LEN]).fill_nonce(&mut n);
        assert_eq!(n, [7u8; NONCE_LEN]);
    }

    fn assert_send_sync<T: Send + Sync + ?Sized>() {}

    #[test]
    fn sources_are_thread_safe() {
        assert_send_sync::<dyn NonceSource>();
        assert_send_sync::<OsNonceSource>();
        assert_send_sync::<FixedNonce>();
        assert_send_sync::<MockNonceSource>();
    }

    #[test]
    fn shared_source_serves_concurrent_callers() {
        let source: &dyn NonceSource = &OsNonceSource;
        let nonces: Vec<[u8; NONCE_LEN]> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    s.spawn(move || {
                        let mut n = [0u8; NONCE_LEN];
                        source.fill_nonce(&mut n);
                        n
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        for (i, a) in nonces.iter().enumerate() {
            for b in &nonces[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
