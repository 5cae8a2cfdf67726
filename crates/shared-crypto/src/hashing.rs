//! # SHA-256 Hashing
//!
//! Relay digests. Every mining decision and every response signature is
//! made over a SHA-256 digest of canonical bytes.

use sha2::{Digest, Sha256};

/// SHA-256 hash output (256-bit).
pub type Hash = [u8; 32];

/// Hash data with SHA-256 (one-shot).
#[must_use]
pub fn sha256(data: &[u8]) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}
