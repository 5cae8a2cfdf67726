//! Relay proxy error types.

use shared_types::QueryError;
use thiserror::Error;

/// Errors from relay server assembly and relay serving.
#[derive(Debug, Clone, Error)]
pub enum ProxyError {
    /// An advertised endpoint uses a transport the proxy cannot serve.
    /// Fatal at assembly time.
    #[error("unsupported RPC type advertised for service {service_id}: {rpc_type}")]
    UnsupportedRpcType {
        /// The advertised service.
        service_id: String,
        /// The offending transport type.
        rpc_type: String,
    },

    /// An advertised service has no configured backend or listener.
    #[error("no binding configured for advertised service {service_id}")]
    MissingBinding {
        /// The advertised service.
        service_id: String,
    },

    /// The supplier lookup failed.
    #[error("supplier query failed: {0}")]
    Query(#[from] QueryError),

    /// The relay request could not be decoded. Transport-level error;
    /// never reaches the mining pipeline.
    #[error("malformed relay request: {0}")]
    MalformedRequest(String),

    /// The proxied backend call failed.
    #[error("backend request failed: {0}")]
    Backend(String),

    /// The relay response could not be signed or serialized.
    #[error("invalid relay response: {0}")]
    InvalidRelayResponse(String),

    /// The server could not bind or serve its listener.
    #[error("relay server transport error: {0}")]
    Transport(String),
}
