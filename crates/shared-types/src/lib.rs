//! # Shared Types Crate
//!
//! This crate contains the domain entities and cross-subsystem error types
//! for the RelayMesh node.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **Canonical Bytes**: Every type that is hashed or signed has exactly one
//!   serialized form, produced by [`codec::to_canonical_bytes`].
//! - **Bounded Encoding**: Canonical encoding enforces [`codec::MAX_RELAY_BYTES`];
//!   oversized relays fail to marshal instead of flowing downstream.

pub mod codec;
pub mod entities;
pub mod errors;

pub use codec::{to_canonical_bytes, MAX_RELAY_BYTES};
pub use entities::*;
pub use errors::{CodecError, QueryError};
