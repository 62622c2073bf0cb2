//! The inbound request port.
//!
//! The UI holds a [`RequestPort`] from start-up and may emit at any time. Nothing is
//! delivered until the bridge subscribes; emissions before that are dropped, not queued.

use crate::render::protocol::{RenderRequest, RequestId};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// What happened to an emitted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Handed to the subscriber under this id
    Accepted(RequestId),
    /// No subscriber yet (or it is gone); the request was discarded
    Dropped,
}

impl Delivery {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Delivery::Accepted(_))
    }
}

/// Cloneable emitter side of the render request channel.
#[derive(Clone, Default)]
pub struct RequestPort {
    inner: Arc<PortInner>,
}

#[derive(Default)]
struct PortInner {
    subscriber: Mutex<Option<UnboundedSender<RenderRequest>>>,
    next_request_id: AtomicU64,
}

impl RequestPort {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a render request for `text`.
    pub fn emit(&self, text: impl Into<Arc<str>>) -> Delivery {
        let subscriber = self.inner.subscriber.lock();
        let Some(tx) = subscriber.as_ref() else {
            return Delivery::Dropped;
        };

        let request_id = self.inner.next_request_id.fetch_add(1, Ordering::SeqCst) + 1;
        let request = RenderRequest {
            request_id,
            raw_text: text.into(),
        };
        match tx.send(request) {
            Ok(()) => Delivery::Accepted(request_id),
            Err(_) => Delivery::Dropped,
        }
    }

    /// Attach the single subscriber, replacing any previous one.
    ///
    /// Only requests emitted after this call reach the returned receiver.
    pub fn subscribe(&self) -> UnboundedReceiver<RenderRequest> {
        let (tx, rx) = mpsc::unbounded_channel();
        *self.inner.subscriber.lock() = Some(tx);
        rx
    }

    pub fn is_subscribed(&self) -> bool {
        self.inner
            .subscriber
            .lock()
            .as_ref()
            .is_some_and(|tx| !tx.is_closed())
    }
}
