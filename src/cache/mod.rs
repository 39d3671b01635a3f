//! Memoization of analysis results keyed by input fingerprints.

pub mod fingerprint;
pub mod store;

pub use fingerprint::{Fingerprint, FingerprintBuilder};
pub use store::{CacheStats, ResultCache};
