//! File-backed key-value store.
//!
//! One JSON object per file, rewritten whole on every save. Loading never
//! fails the caller: a missing or corrupted file reads as an empty mapping.

pub mod store;

pub use store::{JsonFileStore, Mapping, StoreError};
