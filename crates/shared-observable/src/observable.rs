//! # Observable
//!
//! The producer side of the broadcast primitive: a publish queue feeding a
//! fan-out loop that delivers to every registered observer.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::observer::ChannelObserver;
use crate::{DEFAULT_OBSERVER_CAPACITY, PUBLISH_QUEUE_CAPACITY};

/// One registered observer, as seen by the fan-out loop.
pub(crate) struct ObserverEntry<T> {
    /// Sending end of the observer's bounded delivery buffer.
    tx: mpsc::Sender<T>,
    /// The context the observer was subscribed under. Once cancelled, no
    /// further values are delivered (the registry entry stays until
    /// unsubscribe).
    ctx: CancellationToken,
}

/// Shared state between the observable handle, its observers, and the
/// fan-out loop.
pub(crate) struct Registry<T> {
    observers: RwLock<HashMap<u64, ObserverEntry<T>>>,
    next_id: AtomicU64,
    capacity: usize,
    /// Cancelled when the observable closes; aborts in-flight delivery waits.
    closed: CancellationToken,
    is_closed: AtomicBool,
}

impl<T> Registry<T> {
    pub(crate) fn remove(&self, id: u64) {
        self.observers.write().remove(&id);
    }

    /// Unsubscribe every observer. Idempotent.
    pub(crate) fn close(&self) {
        if self.is_closed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.closed.cancel();
        // Dropping the senders closes every observer's delivery buffer.
        self.observers.write().clear();
    }
}

/// Error returned when publishing to a closed observable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishError;

impl std::fmt::Display for PublishError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("observable closed")
    }
}

impl std::error::Error for PublishError {}

/// The producer handle. Clonable; the observable completes (all observers
/// see end-of-stream) once every publisher clone is dropped.
#[derive(Clone)]
pub struct Publisher<T> {
    queue: mpsc::Sender<T>,
}

impl<T> Publisher<T> {
    /// Queue a value for fan-out to all current observers.
    ///
    /// Waits only for room in the publish queue, never for any individual
    /// observer's buffer.
    ///
    /// # Errors
    ///
    /// [`PublishError`] if the observable has been closed.
    pub async fn publish(&self, value: T) -> Result<(), PublishError> {
        self.queue.send(value).await.map_err(|_| PublishError)
    }
}

/// The consumer-facing handle: subscribe observers, or close the whole
/// observable.
pub struct ChannelObservable<T> {
    registry: Arc<Registry<T>>,
}

impl<T> Clone for ChannelObservable<T> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<T: Clone + Send + 'static> ChannelObservable<T> {
    /// Register a new observer whose deliveries stop when `ctx` is
    /// cancelled. Returns immediately.
    ///
    /// Cancellation alone stops deliveries; dropping the observer (or
    /// calling [`ChannelObserver::unsubscribe`]) deregisters it.
    pub fn subscribe(&self, ctx: CancellationToken) -> ChannelObserver<T> {
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(self.registry.capacity);

        // A subscription races against close: if the registry is already
        // closed, the entry must not linger.
        {
            let mut observers = self.registry.observers.write();
            if !self.registry.is_closed.load(Ordering::SeqCst) {
                observers.insert(id, ObserverEntry { tx, ctx });
            }
        }

        trace!(observer_id = id, "observer subscribed");
        ChannelObserver::new(id, rx, Arc::downgrade(&self.registry))
    }

    /// Unsubscribe every observer and stop the fan-out loop. Idempotent.
    pub fn close(&self) {
        self.registry.close();
    }
}

/// Create an observable with the default per-observer buffer capacity.
///
/// Must be called within a tokio runtime: the fan-out loop is spawned as a
/// background task.
pub fn channel<T: Clone + Send + 'static>() -> (Publisher<T>, ChannelObservable<T>) {
    channel_with_capacity(DEFAULT_OBSERVER_CAPACITY)
}

/// Create an observable with an explicit per-observer buffer capacity.
pub fn channel_with_capacity<T: Clone + Send + 'static>(
    capacity: usize,
) -> (Publisher<T>, ChannelObservable<T>) {
    let registry = Arc::new(Registry {
        observers: RwLock::new(HashMap::new()),
        next_id: AtomicU64::new(0),
        capacity: capacity.max(1),
        closed: CancellationToken::new(),
        is_closed: AtomicBool::new(false),
    });

    let (queue_tx, queue_rx) = mpsc::channel(PUBLISH_QUEUE_CAPACITY);
    tokio::spawn(fan_out_loop(queue_rx, Arc::clone(&registry)));

    (
        Publisher { queue: queue_tx },
        ChannelObservable { registry },
    )
}

/// Drains the publish queue, delivering each value to every registered
/// observer in turn.
async fn fan_out_loop<T: Clone + Send + 'static>(
    mut queue: mpsc::Receiver<T>,
    registry: Arc<Registry<T>>,
) {
    loop {
        let value = tokio::select! {
            biased;
            () = registry.closed.cancelled() => break,
            value = queue.recv() => match value {
                Some(value) => value,
                // All publishers dropped: the stream is complete.
                None => break,
            },
        };

        // Snapshot under the read lock, then deliver without holding it, so
        // a full buffer never blocks subscribe/unsubscribe.
        let targets: Vec<(u64, mpsc::Sender<T>, CancellationToken)> = registry
            .observers
            .read()
            .iter()
            .map(|(id, entry)| (*id, entry.tx.clone(), entry.ctx.clone()))
            .collect();

        for (id, tx, ctx) in targets {
            deliver(&registry, id, &tx, &ctx, value.clone()).await;
        }
    }

    registry.close();
}

/// Deliver one value to one observer, racing the wait for buffer room
/// against cancellation of the observer's context and of the observable.
///
/// Closed buffers surface as a failed permit acquisition and deregister the
/// observer; a send can never land on a closed buffer.
async fn deliver<T>(
    registry: &Registry<T>,
    id: u64,
    tx: &mpsc::Sender<T>,
    ctx: &CancellationToken,
    value: T,
) {
    tokio::select! {
        biased;
        () = registry.closed.cancelled() => {}
        () = ctx.cancelled() => {
            trace!(observer_id = id, "delivery abandoned: observer context done");
        }
        permit = tx.reserve() => match permit {
            Ok(permit) => permit.send(value),
            Err(_) => {
                trace!(observer_id = id, "delivery buffer closed, deregistering");
                registry.remove(id);
            }
        },
    }
}
