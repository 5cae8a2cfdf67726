//! # Shared Crypto - Relay Cryptography
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------------|-----------------|----------------------------------------|
//! | `hashing`    | SHA-256         | Relay digests                          |
//! | `difficulty` | leading zeros   | Mining difficulty predicate            |
//! | `signer`     | ECDSA secp256k1 | Relay response signing                 |
//! | `ring`       | SAG secp256k1   | Delegated signing on behalf of an app  |
//!
//! ## Security Properties
//!
//! - **ECDSA**: RFC 6979 deterministic nonces (no RNG dependency for signing)
//! - **SAG rings**: signer ambiguity over the whole ring; verification never
//!   reveals which member signed
//! - **SHA-256**: the digest every difficulty decision is made over

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod difficulty;
pub mod errors;
pub mod hashing;
pub mod ring;
pub mod signer;

// Re-exports
pub use difficulty::{difficulty_is_met, leading_zero_bits};
pub use errors::CryptoError;
pub use hashing::sha256;
pub use ring::{Ring, RingPoint, RingSignature, RingSigner};
pub use signer::{verify_signature, SimpleSigner, SigningKeypair};
