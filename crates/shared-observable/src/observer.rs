//! # Observer
//!
//! One subscriber's delivery handle: a bounded buffer plus an idempotent
//! unsubscribe that deregisters it from the owning observable.

use std::pin::Pin;
use std::sync::Weak;
use std::task::{Context, Poll};

use tokio::sync::mpsc;
use tokio_stream::Stream;
use tracing::trace;

use crate::observable::Registry;

/// The receiving end of one subscription.
///
/// Values arrive in publish order. After [`unsubscribe`](Self::unsubscribe)
/// (or drop), the buffer accepts no further values; anything already
/// buffered can still be drained, then the stream ends.
pub struct ChannelObserver<T> {
    id: u64,
    rx: mpsc::Receiver<T>,
    registry: Weak<Registry<T>>,
    unsubscribed: bool,
}

impl<T> ChannelObserver<T> {
    pub(crate) fn new(id: u64, rx: mpsc::Receiver<T>, registry: Weak<Registry<T>>) -> Self {
        Self {
            id,
            rx,
            registry,
            unsubscribed: false,
        }
    }

    /// Receive the next value, or `None` once the observable closed or this
    /// observer unsubscribed and drained its buffer.
    pub async fn recv(&mut self) -> Option<T> {
        self.rx.recv().await
    }

    /// Receive without waiting. `Ok(None)` means no value is ready.
    pub fn try_recv(&mut self) -> Option<T> {
        self.rx.try_recv().ok()
    }

    /// Close the delivery buffer and deregister from the observable.
    ///
    /// Safe to call concurrently with an in-flight delivery (the delivery
    /// is abandoned, never faulted) and more than once (only the first call
    /// has effect).
    pub fn unsubscribe(&mut self) {
        if self.unsubscribed {
            return;
        }
        self.unsubscribed = true;

        self.rx.close();
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(self.id);
        }
        trace!(observer_id = self.id, "observer unsubscribed");
    }

    /// Adapt this observer into a [`Stream`].
    #[must_use]
    pub fn into_stream(self) -> ObserverStream<T> {
        ObserverStream { observer: self }
    }
}

impl<T> Drop for ChannelObserver<T> {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

/// A [`Stream`] wrapper over a [`ChannelObserver`], for use with stream
/// combinators.
pub struct ObserverStream<T> {
    observer: ChannelObserver<T>,
}

impl<T> Stream for ObserverStream<T> {
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().observer.rx.poll_recv(cx)
    }
}
