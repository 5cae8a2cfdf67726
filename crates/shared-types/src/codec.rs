//! # Canonical Encoding
//!
//! One serialized form per type: varint bincode with a hard size bound.
//! Digests and signatures are computed over these bytes, so the encoding
//! options here must never change silently.

use serde::Serialize;

pub use crate::errors::CodecError;

/// Hard upper bound on the canonical encoding of a relay.
///
/// Relays above this bound fail to marshal and are routed to the mining
/// pipeline's error stream instead of being hashed.
pub const MAX_RELAY_BYTES: u64 = 1024 * 1024;

/// Serialize a value into its canonical byte form.
///
/// # Errors
///
/// Returns [`CodecError::OversizeValue`] when the encoding would exceed
/// [`MAX_RELAY_BYTES`], [`CodecError::Encode`] on any other bincode failure.
pub fn to_canonical_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, CodecError> {
    use bincode::Options;

    let options = bincode::DefaultOptions::new().with_limit(MAX_RELAY_BYTES);

    let size = options
        .serialized_size(value)
        .map_err(|err| match *err {
            bincode::ErrorKind::SizeLimit => CodecError::OversizeValue {
                max: MAX_RELAY_BYTES,
            },
            other => CodecError::Encode(other.to_string()),
        })?;
    if size > MAX_RELAY_BYTES {
        return Err(CodecError::OversizeValue {
            max: MAX_RELAY_BYTES,
        });
    }

    options
        .serialize(value)
        .map_err(|err| CodecError::Encode(err.to_string()))
}
