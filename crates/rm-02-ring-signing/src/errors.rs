//! Ring signing error types.

use shared_crypto::CryptoError;
use shared_types::QueryError;
use thiserror::Error;

/// Errors from ring construction, caching, and signing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RingError {
    /// An application or account lookup failed. The cache entry, if any,
    /// is left intact.
    #[error("ring query failed: {0}")]
    Query(#[from] QueryError),

    /// A ring member's on-chain key is not secp256k1.
    #[error("account {address} has an unsupported key type for ring membership")]
    UnsupportedKeyType {
        /// The offending account address.
        address: String,
    },

    /// Curve-level failure: undecodable point, too-small ring, or a
    /// signing key outside the ring.
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// A relay response could not be signed: signable-bytes extraction or
    /// signing itself failed. Aborts that single relay's handling.
    #[error("invalid relay response: {0}")]
    InvalidRelayResponse(String),
}
