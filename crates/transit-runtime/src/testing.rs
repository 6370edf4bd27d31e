//! In-memory fakes for the runtime's ports.
//!
//! Everything the orchestrator, loader and consumers reach through a
//! trait has a deterministic in-memory stand-in here, so integration
//! tests run without collaborators or a broker. The module ships in the
//! library (not behind `cfg(test)`) so downstream crates can reuse the
//! fakes in their own tests.

use crate::bus::{BusError, BusMessage, BusSink};
use crate::fetch::{
    CharacterLocator, FetchError, Portal, PortalCatalog, RouteSource, TenantDirectory,
    NO_TARGET_MAP,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use transit_core::{Route, SharedVessel};
use transit_types::{ChannelId, CharacterId, MapId, TenantId, WorldId};

/// A spawn-point portal with no target - a valid warp landing spot.
#[must_use]
pub fn spawn_point(id: u32) -> Portal {
    Portal {
        id,
        portal_type: 0,
        target_map: NO_TARGET_MAP,
    }
}

/// Tenant directory returning a fixed list.
#[derive(Debug, Clone, Default)]
pub struct FixedTenants(pub Vec<TenantId>);

#[async_trait]
impl TenantDirectory for FixedTenants {
    async fn tenants(&self) -> Result<Vec<TenantId>, FetchError> {
        Ok(self.0.clone())
    }
}

/// Route source serving static per-tenant configuration.
#[derive(Debug, Default)]
pub struct StaticRouteSource {
    configs: HashMap<TenantId, (Vec<Route>, Vec<SharedVessel>)>,
}

impl StaticRouteSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_tenant(
        mut self,
        tenant: TenantId,
        routes: Vec<Route>,
        vessels: Vec<SharedVessel>,
    ) -> Self {
        self.configs.insert(tenant, (routes, vessels));
        self
    }
}

#[async_trait]
impl RouteSource for StaticRouteSource {
    async fn routes_for(&self, tenant: TenantId) -> Result<Vec<Route>, FetchError> {
        self.configs
            .get(&tenant)
            .map(|(routes, _)| routes.clone())
            .ok_or(FetchError::Status(404))
    }

    async fn vessels_for(&self, tenant: TenantId) -> Result<Vec<SharedVessel>, FetchError> {
        self.configs
            .get(&tenant)
            .map(|(_, vessels)| vessels.clone())
            .ok_or(FetchError::Status(404))
    }
}

/// Character locator backed by an explicit occupancy table.
#[derive(Debug, Default)]
pub struct MapOccupancy {
    occupants: Mutex<HashMap<(WorldId, ChannelId, MapId), Vec<CharacterId>>>,
}

impl MapOccupancy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stands a character in a field.
    pub fn place(&self, world: WorldId, channel: ChannelId, map: MapId, character: CharacterId) {
        self.occupants
            .lock()
            .entry((world, channel, map))
            .or_default()
            .push(character);
    }

    /// Empties a field.
    pub fn clear(&self, world: WorldId, channel: ChannelId, map: MapId) {
        self.occupants.lock().remove(&(world, channel, map));
    }
}

#[async_trait]
impl CharacterLocator for MapOccupancy {
    async fn characters_in(
        &self,
        world: WorldId,
        channel: ChannelId,
        map: MapId,
    ) -> Result<Vec<CharacterId>, FetchError> {
        Ok(self
            .occupants
            .lock()
            .get(&(world, channel, map))
            .cloned()
            .unwrap_or_default())
    }
}

/// Portal catalog with a fixed layout per map. Maps without an entry
/// have no portals at all.
#[derive(Debug, Default)]
pub struct StaticPortals {
    layouts: HashMap<MapId, Vec<Portal>>,
}

impl StaticPortals {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_map(mut self, map: MapId, portals: Vec<Portal>) -> Self {
        self.layouts.insert(map, portals);
        self
    }

    /// Convenience: gives the map a single spawn point with `id` 0.
    #[must_use]
    pub fn with_spawn_point(self, map: MapId) -> Self {
        self.with_map(map, vec![spawn_point(0)])
    }
}

#[async_trait]
impl PortalCatalog for StaticPortals {
    async fn portals_in(&self, map: MapId) -> Result<Vec<Portal>, FetchError> {
        Ok(self.layouts.get(&map).cloned().unwrap_or_default())
    }
}

/// Sink that records every published batch.
#[derive(Debug, Default)]
pub struct RecordingSink {
    batches: Mutex<Vec<(String, Vec<BusMessage>)>>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `(topic, batch)` publish, in order.
    #[must_use]
    pub fn batches(&self) -> Vec<(String, Vec<BusMessage>)> {
        self.batches.lock().clone()
    }

    /// All messages published to a topic, flattened across batches.
    #[must_use]
    pub fn messages_for(&self, topic: &str) -> Vec<BusMessage> {
        self.batches
            .lock()
            .iter()
            .filter(|(t, _)| t == topic)
            .flat_map(|(_, batch)| batch.iter().cloned())
            .collect()
    }
}

#[async_trait]
impl BusSink for RecordingSink {
    async fn publish(&self, topic: &str, batch: Vec<BusMessage>) -> Result<(), BusError> {
        self.batches.lock().push((topic.to_string(), batch));
        Ok(())
    }
}

/// Sink that rejects every publish; for failure-path tests.
#[derive(Debug, Default)]
pub struct FailingSink;

#[async_trait]
impl BusSink for FailingSink {
    async fn publish(&self, topic: &str, _batch: Vec<BusMessage>) -> Result<(), BusError> {
        Err(BusError::Publish {
            topic: topic.to_string(),
            reason: "sink configured to fail".into(),
        })
    }
}
