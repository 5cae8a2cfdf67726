//! Block stream adapter.
//!
//! Polls the chain endpoint for the latest block and publishes every new
//! height into a block-event observable. Downstream consumers (the claim
//! lifecycle, diagnostics) subscribe through the broadcast primitive.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use shared_observable::Publisher;
use shared_types::BlockInfo;

/// Latest-block response: the hash travels hex-encoded.
#[derive(Debug, Deserialize)]
struct LatestBlockDto {
    height: u64,
    hash_hex: String,
}

/// Polls `base_url` for new blocks and publishes them.
pub struct BlockPoller {
    client: Client,
    base_url: String,
    interval: Duration,
}

impl BlockPoller {
    /// A poller against `base_url`, polling every `interval`.
    #[must_use]
    pub fn new(base_url: String, interval: Duration) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
            interval,
        }
    }

    /// Run until cancelled, publishing each newly observed block exactly
    /// once, in height order.
    pub async fn run(self, ctx: CancellationToken, blocks: Publisher<BlockInfo>) {
        let mut last_height: Option<u64> = None;
        let mut ticker = tokio::time::interval(self.interval);

        loop {
            tokio::select! {
                biased;
                () = ctx.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let block = match self.fetch_latest().await {
                Ok(block) => block,
                Err(err) => {
                    warn!(%err, "latest block poll failed");
                    continue;
                }
            };

            if last_height.is_some_and(|h| block.height <= h) {
                continue;
            }
            last_height = Some(block.height);

            debug!(height = block.height, hash = %block.hash_hex(), "new block");
            if blocks.publish(block).await.is_err() {
                // Observable closed: the node is shutting down.
                break;
            }
        }
    }

    async fn fetch_latest(&self) -> Result<BlockInfo, String> {
        let url = format!("{}/v1/blocks/latest", self.base_url);
        let dto: LatestBlockDto = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| err.to_string())?
            .error_for_status()
            .map_err(|err| err.to_string())?
            .json()
            .await
            .map_err(|err| err.to_string())?;

        let hash_bytes = hex::decode(&dto.hash_hex).map_err(|err| err.to_string())?;
        let hash: [u8; 32] = hash_bytes
            .try_into()
            .map_err(|_| "block hash is not 32 bytes".to_owned())?;

        Ok(BlockInfo {
            height: dto.height,
            hash,
        })
    }
}
