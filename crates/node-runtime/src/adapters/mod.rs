//! Outbound-port adapters: the HTTP query client and the block poller.

pub mod block_poller;
pub mod query_client;
pub mod response_signer;

pub use block_poller::BlockPoller;
pub use query_client::HttpQueryClient;
pub use response_signer::ResponseSignerAdapter;
