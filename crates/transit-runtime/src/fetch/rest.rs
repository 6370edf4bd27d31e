//! REST implementations of the collaborator ports.
//!
//! One thin client per collaborator, sharing a `reqwest::Client`
//! configured with the per-call timeout from [`crate::ServiceConfig`].
//! Service roots come from the environment (`MAPS`, `DATA`, `TENANTS`)
//! and are expected to end with `/`.

use super::jsonapi::{decode_list, numeric_id};
use super::{
    CharacterLocator, FetchError, Portal, PortalCatalog, RouteSource, TenantDirectory,
};
use async_trait::async_trait;
use chrono::Duration;
use serde::Deserialize;
use tracing::warn;
use transit_core::{Route, RouteConfig, SharedVessel};
use transit_types::{ChannelId, CharacterId, MapId, RouteId, TenantId, VesselId, WorldId};
use uuid::Uuid;

async fn get_list<A: serde::de::DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
) -> Result<Vec<super::jsonapi::Resource<A>>, FetchError> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }
    let body = response.bytes().await?;
    decode_list(&body)
}

/// Map service client: who is standing in a map.
#[derive(Debug, Clone)]
pub struct RestCharacterLocator {
    client: reqwest::Client,
    root: String,
}

impl RestCharacterLocator {
    #[must_use]
    pub fn new(client: reqwest::Client, root: String) -> Self {
        Self { client, root }
    }
}

#[async_trait]
impl CharacterLocator for RestCharacterLocator {
    async fn characters_in(
        &self,
        world: WorldId,
        channel: ChannelId,
        map: MapId,
    ) -> Result<Vec<CharacterId>, FetchError> {
        let url = format!(
            "{}worlds/{}/channels/{}/maps/{}/characters/",
            self.root, world, channel, map
        );
        let resources = get_list::<serde_json::Value>(&self.client, &url).await?;
        resources
            .iter()
            .map(|r| numeric_id::<u32>(&r.id).map(CharacterId))
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct PortalAttributes {
    #[serde(rename = "type")]
    portal_type: u8,
    #[serde(rename = "targetMapId")]
    target_map_id: u32,
}

/// Game data service client: portal layout of maps.
#[derive(Debug, Clone)]
pub struct RestPortalCatalog {
    client: reqwest::Client,
    root: String,
}

impl RestPortalCatalog {
    #[must_use]
    pub fn new(client: reqwest::Client, root: String) -> Self {
        Self { client, root }
    }
}

#[async_trait]
impl PortalCatalog for RestPortalCatalog {
    async fn portals_in(&self, map: MapId) -> Result<Vec<Portal>, FetchError> {
        let url = format!("{}data/maps/{}/portals", self.root, map);
        let resources = get_list::<PortalAttributes>(&self.client, &url).await?;
        resources
            .into_iter()
            .map(|r| {
                let attributes = r.attributes.ok_or_else(|| {
                    FetchError::Decode(format!("portal {} has no attributes", r.id))
                })?;
                Ok(Portal {
                    id: numeric_id(&r.id)?,
                    portal_type: attributes.portal_type,
                    target_map: MapId(attributes.target_map_id),
                })
            })
            .collect()
    }
}

/// Tenant service client.
#[derive(Debug, Clone)]
pub struct RestTenantDirectory {
    client: reqwest::Client,
    root: String,
}

impl RestTenantDirectory {
    #[must_use]
    pub fn new(client: reqwest::Client, root: String) -> Self {
        Self { client, root }
    }
}

#[async_trait]
impl TenantDirectory for RestTenantDirectory {
    async fn tenants(&self) -> Result<Vec<TenantId>, FetchError> {
        let url = format!("{}tenants", self.root);
        let resources = get_list::<serde_json::Value>(&self.client, &url).await?;
        resources
            .iter()
            .map(|r| {
                Uuid::parse_str(&r.id)
                    .map(TenantId)
                    .map_err(|_| FetchError::Decode(format!("bad tenant id {:?}", r.id)))
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RouteAttributes {
    name: String,
    start_map_id: u32,
    staging_map_id: u32,
    en_route_map_ids: Vec<u32>,
    destination_map_id: u32,
    observation_map_id: u32,
    /// Minutes on the wire.
    boarding_window_duration: i64,
    pre_departure_duration: i64,
    travel_duration: i64,
    cycle_interval: i64,
}

#[derive(Debug, Deserialize)]
struct VesselAttributes {
    name: String,
    #[serde(rename = "routeAID")]
    route_a_id: Uuid,
    #[serde(rename = "routeBID")]
    route_b_id: Uuid,
    /// Seconds on the wire.
    #[serde(rename = "turnaroundDelay")]
    turnaround_delay: i64,
}

/// Configuration service client: route and vessel definitions.
#[derive(Debug, Clone)]
pub struct RestRouteSource {
    client: reqwest::Client,
    root: String,
}

impl RestRouteSource {
    #[must_use]
    pub fn new(client: reqwest::Client, root: String) -> Self {
        Self { client, root }
    }
}

#[async_trait]
impl RouteSource for RestRouteSource {
    async fn routes_for(&self, tenant: TenantId) -> Result<Vec<Route>, FetchError> {
        let url = format!(
            "{}tenants/{}/configurations/routes",
            self.root,
            tenant.uuid()
        );
        let resources = get_list::<RouteAttributes>(&self.client, &url).await?;

        let mut routes = Vec::with_capacity(resources.len());
        for resource in resources {
            let id = Uuid::parse_str(&resource.id)
                .map(RouteId)
                .map_err(|_| FetchError::Decode(format!("bad route id {:?}", resource.id)))?;
            let Some(a) = resource.attributes else {
                return Err(FetchError::Decode(format!("route {id} has no attributes")));
            };
            let config = RouteConfig {
                id,
                name: a.name,
                start_map: MapId(a.start_map_id),
                staging_map: MapId(a.staging_map_id),
                en_route_maps: a.en_route_map_ids.into_iter().map(MapId).collect(),
                destination_map: MapId(a.destination_map_id),
                observation_map: MapId(a.observation_map_id),
                boarding_window: Duration::minutes(a.boarding_window_duration),
                pre_departure: Duration::minutes(a.pre_departure_duration),
                travel: Duration::minutes(a.travel_duration),
                cycle_interval: Duration::minutes(a.cycle_interval),
            };
            match Route::new(config) {
                Ok(route) => routes.push(route),
                // A malformed definition drops only itself.
                Err(e) => warn!(route = %id, error = %e, "skipping invalid route definition"),
            }
        }
        Ok(routes)
    }

    async fn vessels_for(&self, tenant: TenantId) -> Result<Vec<SharedVessel>, FetchError> {
        let url = format!(
            "{}tenants/{}/configurations/vessels",
            self.root,
            tenant.uuid()
        );
        let resources = get_list::<VesselAttributes>(&self.client, &url).await?;

        let mut vessels = Vec::with_capacity(resources.len());
        for resource in resources {
            let id = Uuid::parse_str(&resource.id)
                .map(VesselId)
                .map_err(|_| FetchError::Decode(format!("bad vessel id {:?}", resource.id)))?;
            let Some(a) = resource.attributes else {
                return Err(FetchError::Decode(format!("vessel {id} has no attributes")));
            };
            match SharedVessel::new(
                id,
                a.name,
                RouteId(a.route_a_id),
                RouteId(a.route_b_id),
                Duration::seconds(a.turnaround_delay),
            ) {
                Ok(vessel) => vessels.push(vessel),
                Err(e) => warn!(vessel = %id, error = %e, "skipping invalid vessel definition"),
            }
        }
        Ok(vessels)
    }
}
