//! RelayMesh node entry point.

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

use node_runtime::{NodeConfig, RelayNode};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "relaymesh.toml".to_owned());
    let config = NodeConfig::load(&config_path)
        .with_context(|| format!("failed to load config from {config_path}"))?;

    info!(%config_path, "starting relay node");

    let ctx = CancellationToken::new();
    let shutdown_ctx = ctx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received");
            shutdown_ctx.cancel();
        }
    });

    RelayNode::new(config).run(ctx).await
}
