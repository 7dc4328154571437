//! WebSocket fan-out broadcaster
//!
//! Maintains the live subscriber set and publishes enriched events to all
//! of them. Every subscriber owns a bounded queue; a subscriber whose queue
//! is full or closed is dropped from the live set so that publish latency
//! never depends on the slowest consumer.

use super::events::EnrichedEvent;
use crate::telemetry::{self, CounterMetric, GaugeMetric};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use uuid::Uuid;

/// Handle held by a subscriber session
///
/// Receives pre-serialized event payloads in publish order. When the
/// broadcaster drops the subscriber (queue overflow), `recv` returns `None`
/// and the session should close its connection.
pub struct Subscription {
    id: Uuid,
    rx: mpsc::Receiver<Arc<str>>,
}

impl Subscription {
    /// Subscriber identifier, used for unsubscribing
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Receive the next payload, or `None` once dropped/unsubscribed
    pub async fn recv(&mut self) -> Option<Arc<str>> {
        self.rx.recv().await
    }
}

/// Fan-out publisher over the live subscriber set
pub struct Broadcaster {
    subscribers: DashMap<Uuid, mpsc::Sender<Arc<str>>>,
    queue_capacity: usize,
}

impl Broadcaster {
    /// Create a broadcaster with the given per-subscriber queue capacity
    pub fn new(queue_capacity: usize) -> Self {
        Self {
            subscribers: DashMap::new(),
            queue_capacity,
        }
    }

    /// Register a new subscriber and return its handle
    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::channel(self.queue_capacity);
        let id = Uuid::new_v4();
        self.subscribers.insert(id, tx);

        telemetry::set_gauge(GaugeMetric::ActiveSubscribers, self.subscribers.len() as f64);
        tracing::info!(subscriber = %id, total = self.subscribers.len(), "Subscriber connected");

        Subscription { id, rx }
    }

    /// Remove a subscriber from the live set; safe to call twice
    pub fn unsubscribe(&self, id: Uuid) {
        if self.subscribers.remove(&id).is_some() {
            telemetry::set_gauge(GaugeMetric::ActiveSubscribers, self.subscribers.len() as f64);
            tracing::info!(subscriber = %id, total = self.subscribers.len(), "Subscriber disconnected");
        }
    }

    /// Number of live subscribers
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Publish an event to every live subscriber
    ///
    /// Serializes once, then enqueues without blocking. Subscribers whose
    /// queue is full (can't keep up) or closed (session gone) are removed;
    /// delivery to the others is unaffected. Returns the number of
    /// subscribers the event was delivered to.
    pub fn publish(&self, event: &EnrichedEvent) -> usize {
        let payload: Arc<str> = match serde_json::to_string(event) {
            Ok(json) => json.into(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize event");
                return 0;
            }
        };

        let mut delivered = 0;
        let mut dropped = Vec::new();

        for entry in self.subscribers.iter() {
            match entry.value().try_send(payload.clone()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    tracing::warn!(subscriber = %entry.key(), "Subscriber queue full, dropping");
                    dropped.push(*entry.key());
                }
                Err(TrySendError::Closed(_)) => {
                    dropped.push(*entry.key());
                }
            }
        }

        // Removal happens outside the iteration to keep dashmap shards free
        for id in dropped {
            self.unsubscribe(id);
            telemetry::increment(CounterMetric::SubscribersDropped);
        }

        delivered
    }
}
