//! Inbound event consumption.
//!
//! Two streams feed the service: channel lifecycle events (which keep
//! the channel registry current) and character status events (of which
//! only logouts are acted on). The broker client is external; it hands
//! envelopes over through the [`InboundSource`] port and this module
//! decodes and dispatches them. Handlers are idempotent, so redelivery
//! is harmless.

use crate::config::Topics;
use crate::orchestrator::Orchestrator;
use crate::registry::ChannelRegistry;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};
use transit_types::{ChannelId, CharacterId, ErrorCode, MapId, TenantId, WorldId};

pub const CHANNEL_STARTED: &str = "STARTED";
pub const CHANNEL_SHUTDOWN: &str = "SHUTDOWN";
pub const CHARACTER_LOGOUT: &str = "LOGOUT";

/// Channel lifecycle notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStatusEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub world_id: u16,
    pub channel_id: u8,
    #[serde(default)]
    pub ip_address: String,
    #[serde(default)]
    pub port: u16,
}

/// Character status notification; only `LOGOUT` is relevant here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterStatusEvent {
    pub world_id: u16,
    pub character_id: u32,
    #[serde(rename = "type")]
    pub kind: String,
    pub body: CharacterStatusBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterStatusBody {
    pub channel_id: u8,
    pub map_id: u32,
}

/// One inbound message, tenant-scoped by its transport headers.
#[derive(Debug, Clone)]
pub struct InboundEnvelope {
    pub tenant: TenantId,
    pub topic: String,
    pub payload: Vec<u8>,
}

/// Port the broker consumer implements. `None` means the stream ended.
#[async_trait]
pub trait InboundSource: Send {
    async fn next(&mut self) -> Option<InboundEnvelope>;
}

/// Channel-backed source for tests and in-process wiring.
pub struct LocalSource {
    rx: mpsc::Receiver<InboundEnvelope>,
}

/// Creates a paired feed/source; envelopes sent into the feed come out
/// of the source.
#[must_use]
pub fn local_source(capacity: usize) -> (mpsc::Sender<InboundEnvelope>, LocalSource) {
    let (tx, rx) = mpsc::channel(capacity);
    (tx, LocalSource { rx })
}

#[async_trait]
impl InboundSource for LocalSource {
    async fn next(&mut self) -> Option<InboundEnvelope> {
        self.rx.recv().await
    }
}

/// Decodes envelopes by topic and dispatches them.
pub struct ConsumerRouter {
    channels: Arc<ChannelRegistry>,
    orchestrator: Arc<Orchestrator>,
    topics: Topics,
}

impl ConsumerRouter {
    pub fn new(
        channels: Arc<ChannelRegistry>,
        orchestrator: Arc<Orchestrator>,
        topics: Topics,
    ) -> Self {
        Self {
            channels,
            orchestrator,
            topics,
        }
    }

    /// Routes one envelope. Unknown topics and undecodable payloads are
    /// logged and dropped; handler failures are logged - the bus
    /// redelivers and the handlers are idempotent.
    pub async fn dispatch(&self, envelope: InboundEnvelope) {
        if envelope.topic == self.topics.channel_status {
            match serde_json::from_slice::<ChannelStatusEvent>(&envelope.payload) {
                Ok(event) => self.on_channel_status(envelope.tenant, event),
                Err(e) => warn!(topic = %envelope.topic, error = %e, "undecodable event"),
            }
        } else if envelope.topic == self.topics.character_status {
            match serde_json::from_slice::<CharacterStatusEvent>(&envelope.payload) {
                Ok(event) => self.on_character_status(envelope.tenant, event).await,
                Err(e) => warn!(topic = %envelope.topic, error = %e, "undecodable event"),
            }
        } else {
            warn!(topic = %envelope.topic, "envelope for unhandled topic");
        }
    }

    fn on_channel_status(&self, tenant: TenantId, event: ChannelStatusEvent) {
        let world = WorldId(event.world_id);
        let channel = ChannelId(event.channel_id);
        match event.kind.as_str() {
            CHANNEL_STARTED => {
                debug!(tenant = %tenant, world = %world, channel = %channel, "registering channel");
                self.channels.register(tenant, world, channel);
            }
            CHANNEL_SHUTDOWN => {
                debug!(tenant = %tenant, world = %world, channel = %channel, "unregistering channel");
                self.channels.unregister(tenant, world, channel);
            }
            other => warn!(kind = other, "unhandled channel status"),
        }
    }

    async fn on_character_status(&self, tenant: TenantId, event: CharacterStatusEvent) {
        if event.kind != CHARACTER_LOGOUT {
            return;
        }
        let character = CharacterId(event.character_id);
        let map = MapId(event.body.map_id);
        debug!(tenant = %tenant, character = %character, map = %map, "character logged out");

        let result = self
            .orchestrator
            .correct_logout(
                tenant,
                WorldId(event.world_id),
                ChannelId(event.body.channel_id),
                map,
                character,
            )
            .await;
        if let Err(e) = result {
            warn!(
                tenant = %tenant,
                character = %character,
                code = e.code(),
                error = %e,
                "logout correction failed"
            );
        }
    }
}

/// Drains a source until it ends or shutdown is signalled.
pub async fn run_consumer(
    mut source: impl InboundSource,
    router: Arc<ConsumerRouter>,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            envelope = source.next() => {
                match envelope {
                    Some(envelope) => router.dispatch(envelope).await,
                    None => break,
                }
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }
    debug!("consumer loop stopped");
}
