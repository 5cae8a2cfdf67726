//! Relay server assembly.
//!
//! Walks the supplier's on-chain service advertisement and builds one
//! relay server per advertised endpoint, wired to the response signer and
//! the served-relay publish channel.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;

use shared_observable::Publisher;
use shared_types::{AccountAddress, Relay, RpcType};

use crate::backend::HttpBackend;
use crate::errors::ProxyError;
use crate::json_rpc::JsonRpcRelayServer;
use crate::ports::outbound::{RelayResponseSigner, SupplierQuerier};

/// Local wiring for one advertised service: where to listen and which
/// backend to proxy to.
///
/// The on-chain endpoint URL advertises the service to the internet; it
/// never decides which local interface the server binds.
#[derive(Debug, Clone)]
pub struct ServiceBinding {
    /// Address the relay server listens on.
    pub listen_addr: SocketAddr,
    /// URL of the proxied backend service.
    pub backend_url: String,
}

/// Proxy assembly configuration: one binding per advertised service id.
#[derive(Debug, Clone, Default)]
pub struct ProxyConfig {
    /// Bindings keyed by service id.
    pub bindings: HashMap<String, ServiceBinding>,
}

/// Build the advertised relay servers from the supplier's on-chain record.
///
/// One server per (service, endpoint) pair. Every server shares the same
/// response signer and served-relay publish channel.
///
/// # Errors
///
/// - [`ProxyError::Query`] when the supplier lookup fails.
/// - [`ProxyError::UnsupportedRpcType`] for any endpoint that is not
///   JSON-RPC; assembly aborts rather than skipping the endpoint.
/// - [`ProxyError::MissingBinding`] when an advertised service has no
///   local binding configured.
pub async fn build_provided_services<Q: SupplierQuerier>(
    supplier_querier: &Q,
    supplier_address: &AccountAddress,
    config: &ProxyConfig,
    signer: Arc<dyn RelayResponseSigner>,
    served_relays: Publisher<Relay>,
) -> Result<Vec<JsonRpcRelayServer>, ProxyError> {
    let supplier = supplier_querier.supplier(supplier_address).await?;

    let mut servers = Vec::new();
    for service in &supplier.services {
        let binding = config.bindings.get(&service.service_id).ok_or_else(|| {
            ProxyError::MissingBinding {
                service_id: service.service_id.clone(),
            }
        })?;

        for endpoint in &service.endpoints {
            match endpoint.rpc_type {
                RpcType::JsonRpc => {
                    info!(
                        service_id = %service.service_id,
                        endpoint_url = %endpoint.url,
                        listen_addr = %binding.listen_addr,
                        "building relay server"
                    );
                    servers.push(JsonRpcRelayServer::new(
                        service.service_id.clone(),
                        binding.listen_addr,
                        Arc::new(HttpBackend::new(binding.backend_url.clone())),
                        Arc::clone(&signer),
                        served_relays.clone(),
                    ));
                }
                other => {
                    return Err(ProxyError::UnsupportedRpcType {
                        service_id: service.service_id.clone(),
                        rpc_type: format!("{other:?}"),
                    });
                }
            }
        }
    }

    Ok(servers)
}
