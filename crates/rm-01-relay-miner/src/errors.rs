//! Mining pipeline error types.

use shared_types::CodecError;
use thiserror::Error;

/// Errors a relay can hit on its way through the mining pipeline.
///
/// `Clone` because errors travel through the broadcast error stream.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MiningError {
    /// The relay could not be serialized into canonical bytes.
    #[error("failed to marshal relay: {0}")]
    Marshal(#[from] CodecError),
}
