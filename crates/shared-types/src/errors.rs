//! # Error Types
//!
//! Cross-subsystem error types. Subsystem-local errors live in their own
//! crates; only errors that cross a crate boundary belong here.

use thiserror::Error;

/// Canonical encoding/decoding failures.
///
/// Kept `Clone` so the error can travel through broadcast pipelines, which
/// fan a single value out to many observers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    /// Value could not be encoded into canonical bytes.
    #[error("encoding failed: {0}")]
    Encode(String),

    /// Canonical bytes could not be decoded.
    #[error("decoding failed: {0}")]
    Decode(String),

    /// Value exceeds the canonical size bound.
    #[error("value exceeds canonical size bound of {max} bytes")]
    OversizeValue {
        /// The bound that was exceeded.
        max: u64,
    },
}

/// Failures of the external query capability (application, account, and
/// supplier lookups).
///
/// The core never retries these; retry policy belongs to the caller that
/// owns the query transport.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    /// The requested record does not exist on chain.
    #[error("{kind} not found: {address}")]
    NotFound {
        /// Record kind ("application", "account", "supplier").
        kind: &'static str,
        /// The address that was looked up.
        address: String,
    },

    /// The query transport failed.
    #[error("query transport error: {0}")]
    Transport(String),
}
