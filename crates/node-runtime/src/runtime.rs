//! Node assembly.
//!
//! Connects the pieces: relay servers publish served relays, the miner
//! filters them into mined relays, the block poller feeds block events,
//! and the claim-window scheduler decides when each mined session becomes
//! claimable. The ring cache is shared by every relay server for response
//! signing.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use rm_01_relay_miner::RelayMiner;
use rm_02_ring_signing::RingCacheService;
use rm_03_claim_windows::{earliest_claim_height, WindowParams};
use rm_04_relay_proxy::build_provided_services;
use shared_crypto::SigningKeypair;
use shared_observable::channel;
use shared_types::{BlockInfo, MinedRelay, Relay};

use crate::adapters::{BlockPoller, HttpQueryClient, ResponseSignerAdapter};
use crate::config::NodeConfig;

/// The assembled relay node.
pub struct RelayNode {
    config: NodeConfig,
}

impl RelayNode {
    #[must_use]
    pub fn new(config: NodeConfig) -> Self {
        Self { config }
    }

    /// Assemble every subsystem and run until `ctx` is cancelled.
    pub async fn run(self, ctx: CancellationToken) -> anyhow::Result<()> {
        let keypair = SigningKeypair::from_bytes(self.config.signing_key()?)
            .context("configured signing key is not a valid secp256k1 scalar")?;

        let query_client = Arc::new(HttpQueryClient::new(self.config.query_endpoint.clone()));
        let ring_signing = Arc::new(RingCacheService::new(
            Arc::clone(&query_client),
            Arc::clone(&query_client),
            keypair,
        ));

        // Served relays flow from every relay server into one pipeline.
        let (served_relays_tx, served_relays) = channel::<Relay>();
        let miner = RelayMiner::new();
        let mined_relays = miner.mined_relays(ctx.child_token(), &served_relays);

        // Block events feed the claim lifecycle.
        let (blocks_tx, blocks) = channel::<BlockInfo>();

        let mut tasks = JoinSet::new();

        // Mined-relay consumer: the session/claim manager attaches here.
        // Until it lands, account for mined relays in the log.
        {
            let mut observer = mined_relays.subscribe(ctx.child_token());
            tasks.spawn(async move {
                while let Some(MinedRelay { relay, hash, .. }) = observer.recv().await {
                    info!(
                        hash = %hex::encode(hash),
                        service_id = %relay.request.meta.session_header.service_id,
                        session_start_height =
                            relay.request.meta.session_header.session_start_height,
                        "relay mined"
                    );
                }
            });
        }

        // Block consumer: report when claims for sessions starting at each
        // observed block become submittable.
        {
            let params = WindowParams::default();
            let mut observer = blocks.subscribe(ctx.child_token());
            tasks.spawn(async move {
                while let Some(block) = observer.recv().await {
                    let claim_height = earliest_claim_height(&block, &params);
                    info!(
                        height = block.height,
                        hash = %block.hash_hex(),
                        claim_height,
                        "block observed"
                    );
                }
            });
        }

        // Block poller.
        let poller = BlockPoller::new(
            self.config.query_endpoint.clone(),
            Duration::from_millis(self.config.block_poll_interval_ms),
        );
        {
            let poller_ctx = ctx.child_token();
            tasks.spawn(async move {
                poller.run(poller_ctx, blocks_tx).await;
            });
        }

        // Relay servers, one per advertised service endpoint.
        let servers = build_provided_services(
            &*query_client,
            &self.config.supplier_address.as_str().into(),
            &self.config.proxy_config(),
            Arc::new(ResponseSignerAdapter::new(Arc::clone(&ring_signing))),
            served_relays_tx,
        )
        .await
        .context("failed to build advertised relay servers")?;

        if servers.is_empty() {
            info!("supplier advertises no services; serving nothing");
        }
        for server in servers {
            let server_ctx = ctx.child_token();
            let service_id = server.service_id().to_owned();
            tasks.spawn(async move {
                if let Err(err) = server.serve(server_ctx).await {
                    error!(%err, %service_id, "relay server exited");
                }
            });
        }

        info!("relay node running");
        ctx.cancelled().await;
        info!("shutting down");

        served_relays.close();
        blocks.close();
        while tasks.join_next().await.is_some() {}

        Ok(())
    }
}
