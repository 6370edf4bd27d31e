//! Per-transaction message accumulation.

use super::{BusError, BusMessage, BusSink};
use std::collections::HashMap;
use std::future::Future;

/// Accumulates a transaction's outbound messages keyed by topic.
///
/// Single-threaded within one transaction. Nothing leaves the buffer
/// until [`flush`](Self::flush); a producer failure inside the
/// transaction simply drops the buffer, so partial side effects are
/// never published.
#[derive(Debug, Default)]
pub struct MessageBuffer {
    topics: HashMap<String, Vec<BusMessage>>,
}

impl MessageBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluates `producer` and appends its messages to `topic`.
    ///
    /// # Errors
    ///
    /// Propagates the producer's error, leaving the buffer unchanged
    /// for that topic; the caller is expected to abort the transaction.
    pub fn put<E>(
        &mut self,
        topic: &str,
        producer: impl FnOnce() -> Result<Vec<BusMessage>, E>,
    ) -> Result<(), E> {
        let messages = producer()?;
        self.topics
            .entry(topic.to_string())
            .or_default()
            .extend(messages);
        Ok(())
    }

    /// Number of buffered messages across all topics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.topics.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Hands each topic's batch to the sink. The first sink failure
    /// aborts the remaining topics and surfaces.
    pub async fn flush(self, sink: &dyn BusSink) -> Result<(), BusError> {
        for (topic, batch) in self.topics {
            sink.publish(&topic, batch).await?;
        }
        Ok(())
    }
}

/// Transaction wrapper: stage side effects into a fresh buffer, then
/// flush on success.
///
/// ```ignore
/// emit(sink.as_ref(), |mut buf| async move {
///     buf.put(topic, || Ok(vec![message]))?;
///     Ok(buf)
/// })
/// .await?;
/// ```
pub async fn emit<E, Fut>(
    sink: &dyn BusSink,
    stage: impl FnOnce(MessageBuffer) -> Fut,
) -> Result<(), E>
where
    Fut: Future<Output = Result<MessageBuffer, E>>,
    E: From<BusError>,
{
    let buffer = stage(MessageBuffer::new()).await?;
    buffer.flush(sink).await.map_err(E::from)
}
