//! JSON-RPC relay server.
//!
//! One server per advertised service endpoint: accepts relay requests over
//! HTTP, proxies the payload to the backend, signs the response, publishes
//! the completed relay for mining, and returns the signed response.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_observable::Publisher;
use shared_types::{Relay, RelayRequest, RelayResponse, ResponseMeta};

use crate::errors::ProxyError;
use crate::ports::outbound::{BackendForwarder, RelayResponseSigner};

/// A relay server for one advertised JSON-RPC service endpoint.
pub struct JsonRpcRelayServer {
    state: Arc<RelayServerState>,
    listen_addr: SocketAddr,
}

impl std::fmt::Debug for JsonRpcRelayServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonRpcRelayServer")
            .field("service_id", &self.state.service_id)
            .field("listen_addr", &self.listen_addr)
            .finish()
    }
}

/// Per-server state shared with the request handlers.
pub(crate) struct RelayServerState {
    service_id: String,
    backend: Arc<dyn BackendForwarder>,
    signer: Arc<dyn RelayResponseSigner>,
    served_relays: Publisher<Relay>,
}

impl JsonRpcRelayServer {
    pub fn new(
        service_id: String,
        listen_addr: SocketAddr,
        backend: Arc<dyn BackendForwarder>,
        signer: Arc<dyn RelayResponseSigner>,
        served_relays: Publisher<Relay>,
    ) -> Self {
        Self {
            state: Arc::new(RelayServerState {
                service_id,
                backend,
                signer,
                served_relays,
            }),
            listen_addr,
        }
    }

    /// The advertised service this server relays for.
    #[must_use]
    pub fn service_id(&self) -> &str {
        &self.state.service_id
    }

    /// The address the server binds.
    #[must_use]
    pub fn listen_addr(&self) -> SocketAddr {
        self.listen_addr
    }

    /// Bind the listener and serve until `ctx` is cancelled.
    pub async fn serve(self, ctx: CancellationToken) -> Result<(), ProxyError> {
        let router = Router::new()
            .route("/", post(handle_relay))
            .with_state(Arc::clone(&self.state));

        let listener = tokio::net::TcpListener::bind(self.listen_addr)
            .await
            .map_err(|err| ProxyError::Transport(err.to_string()))?;

        info!(
            service_id = %self.state.service_id,
            listen_addr = %self.listen_addr,
            "relay server listening"
        );

        axum::serve(listener, router)
            .with_graceful_shutdown(ctx.cancelled_owned())
            .await
            .map_err(|err| ProxyError::Transport(err.to_string()))
    }
}

async fn handle_relay(
    State(state): State<Arc<RelayServerState>>,
    body: Bytes,
) -> Response {
    match state.serve_relay(&body).await {
        Ok(response_bytes) => (StatusCode::OK, response_bytes).into_response(),
        Err(err @ ProxyError::MalformedRequest(_)) => {
            (StatusCode::BAD_REQUEST, err.to_string()).into_response()
        }
        Err(err) => (StatusCode::BAD_GATEWAY, err.to_string()).into_response(),
    }
}

impl RelayServerState {
    /// Serve one relay request: decode, proxy, sign, publish, respond.
    ///
    /// Malformed requests fail before the backend call and never touch the
    /// publish channel.
    pub(crate) async fn serve_relay(&self, body: &[u8]) -> Result<Vec<u8>, ProxyError> {
        let request: RelayRequest = serde_json::from_slice(body)
            .map_err(|err| ProxyError::MalformedRequest(err.to_string()))?;

        let correlation_id = Uuid::new_v4();
        debug!(
            %correlation_id,
            service_id = %self.service_id,
            application = %request.meta.session_header.application_address,
            "serving relay"
        );

        let backend_payload = self.backend.forward(&request.payload).await?;

        let mut response = RelayResponse {
            meta: ResponseMeta {
                session_header: request.meta.session_header.clone(),
                supplier_signature: None,
            },
            payload: backend_payload,
        };
        self.signer.sign_relay_response(&mut response)?;

        let relay = Relay {
            request,
            response: response.clone(),
        };
        // A closed pipeline means the node is shutting down; the client
        // still gets its signed response.
        if self.served_relays.publish(relay).await.is_err() {
            warn!(%correlation_id, "served-relay pipeline closed, relay not mined");
        }

        serde_json::to_vec(&response)
            .map_err(|err| ProxyError::InvalidRelayResponse(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use shared_crypto::{sha256, SimpleSigner, SigningKeypair};
    use shared_observable::channel;
    use shared_types::{RequestMeta, SessionHeader};

    /// Test stand-in for the ring signing subsystem.
    struct KeySigner(SimpleSigner);

    impl RelayResponseSigner for KeySigner {
        fn sign_relay_response(&self, response: &mut RelayResponse) -> Result<(), ProxyError> {
            let signable = response
                .signable_bytes()
                .map_err(|err| ProxyError::InvalidRelayResponse(err.to_string()))?;
            response.meta.supplier_signature = Some(self.0.sign(&sha256(&signable)));
            Ok(())
        }
    }

    struct EchoBackend;

    #[async_trait]
    impl BackendForwarder for EchoBackend {
        async fn forward(&self, payload: &[u8]) -> Result<Vec<u8>, ProxyError> {
            Ok(payload.to_vec())
        }
    }

    struct FailingBackend;

    #[async_trait]
    impl BackendForwarder for FailingBackend {
        async fn forward(&self, _payload: &[u8]) -> Result<Vec<u8>, ProxyError> {
            Err(ProxyError::Backend("connection refused".into()))
        }
    }

    fn state_with_backend(
        backend: Arc<dyn BackendForwarder>,
    ) -> (Arc<RelayServerState>, shared_observable::ChannelObservable<Relay>) {
        let (publisher, observable) = channel();
        let state = Arc::new(RelayServerState {
            service_id: "anvil".into(),
            backend,
            signer: Arc::new(KeySigner(SimpleSigner::new(SigningKeypair::generate()))),
            served_relays: publisher,
        });
        (state, observable)
    }

    fn request_body() -> Vec<u8> {
        let request = RelayRequest {
            meta: RequestMeta {
                session_header: SessionHeader {
                    application_address: "rm1app".into(),
                    service_id: "anvil".into(),
                    session_start_height: 1,
                },
                application_signature: None,
            },
            payload: br#"{"jsonrpc":"2.0","method":"eth_blockNumber","id":1}"#.to_vec(),
        };
        serde_json::to_vec(&request).unwrap()
    }

    #[tokio::test]
    async fn test_served_relay_is_signed_and_published() {
        let (state, observable) = state_with_backend(Arc::new(EchoBackend));
        let mut observer = observable.subscribe(CancellationToken::new());

        let response_bytes = state.serve_relay(&request_body()).await.unwrap();
        let response: RelayResponse = serde_json::from_slice(&response_bytes).unwrap();

        assert!(response.meta.supplier_signature.is_some());
        assert_eq!(
            response.payload,
            br#"{"jsonrpc":"2.0","method":"eth_blockNumber","id":1}"#.to_vec()
        );

        let served = observer.recv().await.expect("relay published");
        assert_eq!(served.response, response);
        assert_eq!(
            served.request.meta.session_header.application_address,
            "rm1app".into()
        );
    }

    #[tokio::test]
    async fn test_malformed_request_never_reaches_pipeline() {
        let (state, observable) = state_with_backend(Arc::new(EchoBackend));
        let mut observer = observable.subscribe(CancellationToken::new());

        let err = state.serve_relay(b"not json").await.unwrap_err();
        assert!(matches!(err, ProxyError::MalformedRequest(_)));

        drop(state); // drops the publisher, completing the stream
        assert_eq!(observer.recv().await, None);
    }

    #[tokio::test]
    async fn test_backend_failure_is_not_published() {
        let (state, observable) = state_with_backend(Arc::new(FailingBackend));
        let mut observer = observable.subscribe(CancellationToken::new());

        let err = state.serve_relay(&request_body()).await.unwrap_err();
        assert!(matches!(err, ProxyError::Backend(_)));

        drop(state);
        assert_eq!(observer.recv().await, None);
    }
}
