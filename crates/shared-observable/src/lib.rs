//! # Shared Observable - Broadcast Primitive for Relay Pipelines
//!
//! A single-producer, multi-consumer fan-out channel with safe concurrent
//! subscribe/unsubscribe. Every data pipeline in the node (served relays,
//! mined relays, block events) flows through this primitive.
//!
//! ```text
//! ┌──────────┐ publish()  ┌──────────────┐ cap-1 buffer ┌────────────┐
//! │ Producer │ ─────────→ │  Observable  │ ───────────→ │ Observer A │
//! └──────────┘            │  (fan-out)   │ ───────────→ │ Observer B │
//!                         └──────────────┘              └────────────┘
//! ```
//!
//! ## Guarantees
//!
//! - Per-observer delivery order equals publish order; no cross-observer
//!   ordering is promised.
//! - A stalled observer delays fan-out but can never block its own or
//!   another observer's unsubscription.
//! - No value is ever delivered after an observer's context is cancelled
//!   or after it unsubscribes.
//!
//! The pipeline combinators ([`map`], [`successes`], [`errors`],
//! [`log_errors`]) compose observables into transformation chains without
//! blocking the upstream delivery path.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod combinators;
pub mod observable;
pub mod observer;
pub mod stage;

// Re-export main types
pub use combinators::{errors, log_errors, map, successes};
pub use observable::{channel, channel_with_capacity, ChannelObservable, Publisher, PublishError};
pub use observer::{ChannelObserver, ObserverStream};
pub use stage::StageOutput;

/// Delivery buffer capacity of a single observer.
///
/// One slot: an observer that stops draining stalls only itself while
/// keeping the fan-out loop's memory footprint fixed.
pub const DEFAULT_OBSERVER_CAPACITY: usize = 1;

/// Capacity of the publish queue between producers and the fan-out loop.
pub const PUBLISH_QUEUE_CAPACITY: usize = 64;
