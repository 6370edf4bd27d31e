//! Route transactions and the tick driver.
//!
//! The orchestrator recomputes every route's phase once per second and
//! turns detected edges into side effects: character warps on the
//! command topic and status events on the transport topic. Each route
//! runs a strictly sequential transaction; routes of a tenant run in
//! parallel, tenants run independently.
//!
//! # Transaction shape
//!
//! ```text
//! evaluate(route, now) ──changed?──► replace(registry)     (no I/O yet)
//!                                        │
//!                                        ▼
//!                          stage side effects into buffer  (I/O: lookups)
//!                                        │
//!                                        ▼
//!                                 flush(bus sink)          (I/O: publish)
//! ```
//!
//! The phase replace commits before any collaborator I/O. A failure
//! while staging or flushing therefore loses that transition's side
//! effects instead of retrying them next tick - warps are best-effort
//! by design, and downstream consumers tolerate duplicates anyway.

mod driver;
mod error;

pub use driver::Driver;
pub use error::OrchestratorError;

use crate::bus::{self, BusSink, MessageBuffer};
use crate::config::Topics;
use crate::fetch::{spawn_candidates, CharacterLocator, Portal, PortalCatalog};
use crate::outbound;
use crate::registry::{ChannelRegistry, PlanRegistry, RouteRegistry};
use chrono::{DateTime, Utc};
use rand::Rng;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use transit_core::{phase, schedule, Route, RoutePhase};
use transit_types::{
    ChannelEndpoint, ChannelId, CharacterId, ErrorCode, MapId, TenantId, WorldId,
};

/// Per-tenant phase recomputation and side-effect emission.
pub struct Orchestrator {
    routes: Arc<RouteRegistry>,
    channels: Arc<ChannelRegistry>,
    plans: Arc<PlanRegistry>,
    locator: Arc<dyn CharacterLocator>,
    portals: Arc<dyn PortalCatalog>,
    sink: Arc<dyn BusSink>,
    topics: Topics,
}

impl Orchestrator {
    pub fn new(
        routes: Arc<RouteRegistry>,
        channels: Arc<ChannelRegistry>,
        plans: Arc<PlanRegistry>,
        locator: Arc<dyn CharacterLocator>,
        portals: Arc<dyn PortalCatalog>,
        sink: Arc<dyn BusSink>,
        topics: Topics,
    ) -> Self {
        Self {
            routes,
            channels,
            plans,
            locator,
            portals,
            sink,
            topics,
        }
    }

    /// Tenants the driver iterates each tick.
    #[must_use]
    pub fn tenants(&self) -> Vec<TenantId> {
        self.routes.tenants()
    }

    /// Runs one tick for a tenant: refresh the day plan if the date
    /// rolled over, then run every route's transaction in parallel.
    /// Failures are logged per route and never propagate.
    pub async fn process_tenant(self: &Arc<Self>, tenant: TenantId, now: DateTime<Utc>) {
        self.refresh_day(tenant, now);

        let mut transactions = JoinSet::new();
        for route in self.routes.list(tenant) {
            let this = Arc::clone(self);
            transactions.spawn(async move {
                let id = route.id();
                if let Err(e) = this.process_route(tenant, route, now).await {
                    warn!(
                        tenant = %tenant,
                        route = %id,
                        code = e.code(),
                        error = %e,
                        "route transaction failed"
                    );
                }
            });
        }
        while transactions.join_next().await.is_some() {}
    }

    /// One route transaction. The phase swap commits before any
    /// collaborator I/O; side effects flush atomically at the end.
    pub async fn process_route(
        &self,
        tenant: TenantId,
        route: Route,
        now: DateTime<Utc>,
    ) -> Result<(), OrchestratorError> {
        let (next_phase, changed) = phase::evaluate(&route, now);
        if !changed {
            return Ok(());
        }

        let route = route.with_phase(next_phase);
        self.routes.replace(tenant, route.clone());
        info!(tenant = %tenant, route = %route.id(), phase = %next_phase, "route phase changed");

        let endpoints = self.channels.snapshot(tenant);
        bus::emit(self.sink.as_ref(), |mut buffer| async move {
            self.stage_phase_effects(&mut buffer, &route, next_phase, &endpoints)
                .await?;
            Ok(buffer)
        })
        .await
    }

    async fn stage_phase_effects(
        &self,
        buffer: &mut MessageBuffer,
        route: &Route,
        next_phase: RoutePhase,
        endpoints: &[ChannelEndpoint],
    ) -> Result<(), OrchestratorError> {
        match next_phase {
            RoutePhase::AwaitingReturn => {
                // The vessel has arrived: unload riders from every
                // en-route map to the destination.
                let origins: Vec<(ChannelEndpoint, MapId)> = route
                    .en_route_maps()
                    .iter()
                    .flat_map(|&map| endpoints.iter().map(move |&ep| (ep, map)))
                    .collect();
                let warped = self
                    .stage_warps(buffer, route.destination_map(), &origins)
                    .await?;
                debug!(route = %route.id(), warped, "unloaded riders to destination");
            }
            RoutePhase::OpenEntry => {
                buffer.put(&self.topics.transport_status, || {
                    outbound::route_arrived(route.id(), route.observation_map())
                        .map(|m| vec![m])
                })?;
            }
            RoutePhase::LockedEntry => {
                debug!(route = %route.id(), "boarding closed");
            }
            RoutePhase::InTransit => {
                let origins: Vec<(ChannelEndpoint, MapId)> = endpoints
                    .iter()
                    .map(|&ep| (ep, route.staging_map()))
                    .collect();
                let warped = self
                    .stage_warps(buffer, route.en_route_maps()[0], &origins)
                    .await?;
                debug!(route = %route.id(), warped, "loaded boarders onto the vessel");
                buffer.put(&self.topics.transport_status, || {
                    outbound::route_departed(route.id(), route.observation_map())
                        .map(|m| vec![m])
                })?;
            }
            RoutePhase::OutOfService => {}
        }
        Ok(())
    }

    /// Looks up every character standing in the origin fields and
    /// stages one warp per character to a random spawn point of
    /// `destination`.
    async fn stage_warps(
        &self,
        buffer: &mut MessageBuffer,
        destination: MapId,
        origins: &[(ChannelEndpoint, MapId)],
    ) -> Result<usize, OrchestratorError> {
        let mut riders: Vec<(ChannelEndpoint, CharacterId)> = Vec::new();
        for &(endpoint, origin) in origins {
            let found = self
                .locator
                .characters_in(endpoint.world, endpoint.channel, origin)
                .await?;
            riders.extend(found.into_iter().map(|c| (endpoint, c)));
        }
        if riders.is_empty() {
            return Ok(0);
        }

        let candidates = self.spawn_candidates_in(destination).await?;
        for &(endpoint, character) in &riders {
            let portal = pick_random(&candidates);
            buffer.put(&self.topics.character_command, || {
                outbound::change_map(endpoint, character, destination, portal.id)
                    .map(|m| vec![m])
            })?;
        }
        Ok(riders.len())
    }

    async fn spawn_candidates_in(
        &self,
        destination: MapId,
    ) -> Result<Vec<Portal>, OrchestratorError> {
        let portals = self.portals.portals_in(destination).await?;
        let candidates = spawn_candidates(&portals);
        if candidates.is_empty() {
            return Err(OrchestratorError::NoSpawnPortal(destination));
        }
        Ok(candidates)
    }

    /// Logout correction: a character who logs out inside a transport
    /// (the staging map or any en-route map of some route) is warped
    /// back to that route's origin. At most one warp per logout; the
    /// first covering route wins.
    ///
    /// Returns whether a warp was emitted.
    pub async fn correct_logout(
        &self,
        tenant: TenantId,
        world: WorldId,
        channel: ChannelId,
        map: MapId,
        character: CharacterId,
    ) -> Result<bool, OrchestratorError> {
        let covering = self
            .routes
            .list(tenant)
            .into_iter()
            .find(|r| r.covers_transport_map(map));
        let Some(route) = covering else {
            return Ok(false);
        };

        let endpoint = ChannelEndpoint::new(world, channel);
        let destination = route.start_map();
        info!(
            tenant = %tenant,
            route = %route.id(),
            character = %character,
            "returning mid-transport logout to route origin"
        );

        bus::emit(self.sink.as_ref(), |mut buffer| async move {
            let candidates = self.spawn_candidates_in(destination).await?;
            let portal = pick_random(&candidates);
            buffer.put(&self.topics.character_command, || {
                outbound::change_map(endpoint, character, destination, portal.id)
                    .map(|m| vec![m])
            })?;
            Ok::<_, OrchestratorError>(buffer)
        })
        .await?;
        Ok(true)
    }

    /// Re-plans a tenant's schedules when `now` has crossed into a new
    /// UTC day since the last planning pass. Phases are preserved so
    /// edge detection does not re-fire.
    fn refresh_day(&self, tenant: TenantId, now: DateTime<Utc>) {
        let Some(plan) = self.plans.get(tenant) else {
            return;
        };
        let today = now.date_naive();
        if plan.day == today {
            return;
        }

        let routes = self.routes.list(tenant);
        let day_start = schedule::day_start_utc(now);
        let trips = schedule::plan_day(&routes, &plan.vessels, day_start);
        let rescheduled: Vec<Route> = routes
            .into_iter()
            .map(|r| {
                let own = schedule::schedule_for_route(r.id(), &trips);
                r.with_schedule(own)
            })
            .collect();
        let count = rescheduled.len();
        self.routes.install(tenant, rescheduled);
        self.plans.set_day(tenant, today);
        info!(tenant = %tenant, day = %today, routes = count, "re-planned schedules for new day");
    }
}

/// Uniform pick from a non-empty candidate list.
fn pick_random(candidates: &[Portal]) -> Portal {
    candidates[rand::thread_rng().gen_range(0..candidates.len())]
}
