//! Outbound message buffering and the bus seam.
//!
//! The broker client itself is an external collaborator; this module
//! owns everything up to its doorstep. A route transaction stages its
//! side effects into a [`MessageBuffer`] and flushes the whole buffer
//! through a [`BusSink`] at the end - either every message of the
//! transaction reaches the sink, or (on a failure before flush) none
//! does. Delivery is at-least-once; consumers downstream deduplicate.

mod buffer;
mod local;

pub use buffer::{emit, MessageBuffer};
pub use local::LocalBus;

use async_trait::async_trait;
use thiserror::Error;
use transit_types::ErrorCode;

/// One outbound bus message: a partition key plus a JSON payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusMessage {
    pub key: Vec<u8>,
    pub payload: serde_json::Value,
}

impl BusMessage {
    /// Serializes `value` as the payload.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::Encode`] if the value cannot be represented
    /// as JSON.
    pub fn json<T: serde::Serialize>(key: Vec<u8>, value: &T) -> Result<Self, BusError> {
        let payload =
            serde_json::to_value(value).map_err(|e| BusError::Encode(e.to_string()))?;
        Ok(Self { key, payload })
    }
}

/// Port the broker driver implements.
///
/// `publish` hands over one topic's batch; a returned error aborts the
/// rest of the flush and surfaces as a transaction failure.
#[async_trait]
pub trait BusSink: Send + Sync {
    async fn publish(&self, topic: &str, batch: Vec<BusMessage>) -> Result<(), BusError>;
}

/// Failure while encoding or publishing messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BusError {
    #[error("payload encoding failed: {0}")]
    Encode(String),

    #[error("publish to topic {topic} failed: {reason}")]
    Publish { topic: String, reason: String },
}

impl ErrorCode for BusError {
    fn code(&self) -> &'static str {
        match self {
            Self::Encode(_) => "BUS_ENCODE",
            Self::Publish { .. } => "BUS_PUBLISH",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, Self::Publish { .. })
    }
}
