//! In-process bus.

use super::{BusError, BusMessage, BusSink};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use tokio::sync::broadcast;
use tracing::debug;

const CHANNEL_CAPACITY: usize = 256;

/// A topic-keyed in-process bus.
///
/// Stands in for the broker in development and integration tests:
/// publishing fans each message out to the topic's current subscribers
/// and is a silent success when nobody subscribes (matching broker
/// semantics of producing to an unconsumed topic). Lagging subscribers
/// lose the oldest messages, which is within the at-least-once /
/// consumer-dedup contract.
#[derive(Debug, Default)]
pub struct LocalBus {
    topics: Mutex<HashMap<String, broadcast::Sender<BusMessage>>>,
}

impl LocalBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to a topic, creating it on first use.
    #[must_use]
    pub fn subscribe(&self, topic: &str) -> broadcast::Receiver<BusMessage> {
        self.sender(topic).subscribe()
    }

    fn sender(&self, topic: &str) -> broadcast::Sender<BusMessage> {
        self.topics
            .lock()
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .clone()
    }
}

#[async_trait]
impl BusSink for LocalBus {
    async fn publish(&self, topic: &str, batch: Vec<BusMessage>) -> Result<(), BusError> {
        let sender = self.sender(topic);
        let count = batch.len();
        for message in batch {
            // Err means no live subscriber; the publish still counts.
            let _ = sender.send(message);
        }
        debug!(topic, count, "published batch");
        Ok(())
    }
}
