//! Crypto error types.

use thiserror::Error;

/// Cryptographic operation errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CryptoError {
    /// Public key bytes do not decode to a secp256k1 curve point.
    #[error("invalid public key: not a secp256k1 compressed point")]
    InvalidPublicKey,

    /// Private key bytes are not a valid secp256k1 scalar.
    #[error("invalid private key")]
    InvalidPrivateKey,

    /// Signature bytes are malformed.
    #[error("invalid signature format")]
    InvalidSignatureFormat,

    /// Signature did not verify against the message.
    #[error("signature verification failed")]
    SignatureVerificationFailed,

    /// A ring must contain at least two points.
    #[error("ring too small: {size} points, minimum is 2")]
    RingTooSmall {
        /// Number of points supplied.
        size: usize,
    },

    /// The signing key's public key is not a member of the ring.
    #[error("signing key is not a member of the ring")]
    SignerNotInRing,
}
