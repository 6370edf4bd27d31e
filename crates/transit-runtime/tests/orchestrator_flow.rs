//! Orchestrator transaction behavior: emission edges, warp fan-out,
//! failure semantics and logout correction.

mod common;

use chrono::Duration;
use common::*;
use transit_core::RoutePhase;
use transit_runtime::testing::StaticPortals;
use transit_types::{ChannelId, CharacterId, WorldId};

#[tokio::test]
async fn entering_open_entry_emits_one_arrived_event() {
    let h = harness(StaticPortals::new());
    let tenant = transit_types::TenantId::new();

    let route = ferry();
    let id = route.id();
    let route = route
        .with_schedule(vec![trip_at(id, 0)])
        .with_phase(RoutePhase::AwaitingReturn);
    h.routes.install(tenant, vec![route.clone()]);

    // Two minutes in: boarding is open.
    let now = t0() + Duration::minutes(2);
    h.orchestrator
        .process_route(tenant, route, now)
        .await
        .unwrap();

    let events = payloads(&h.sink, TOPIC_STATUS);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["type"], "ARRIVED");
    assert_eq!(events[0]["routeId"], id.uuid().to_string());
    assert_eq!(events[0]["body"]["mapId"], OBSERVATION.0);
    assert!(payloads(&h.sink, TOPIC_WARPS).is_empty());

    // The registry committed the new phase.
    assert_eq!(
        h.routes.get(tenant, id).unwrap().phase(),
        RoutePhase::OpenEntry
    );
}

#[tokio::test]
async fn re_tick_without_time_change_emits_nothing() {
    let h = harness(StaticPortals::new());
    let tenant = transit_types::TenantId::new();

    let route = ferry();
    let id = route.id();
    h.routes.install(
        tenant,
        vec![route
            .with_schedule(vec![trip_at(id, 0)])
            .with_phase(RoutePhase::AwaitingReturn)],
    );

    let now = t0() + Duration::minutes(2);
    for _ in 0..3 {
        let current = h.routes.get(tenant, id).unwrap();
        h.orchestrator
            .process_route(tenant, current, now)
            .await
            .unwrap();
    }
    // Only the first tick saw a change.
    assert_eq!(payloads(&h.sink, TOPIC_STATUS).len(), 1);
}

#[tokio::test]
async fn entering_in_transit_warps_stagers_and_emits_departed() {
    let portals = StaticPortals::new().with_spawn_point(EN_ROUTE_A);
    let h = harness(portals);
    let tenant = transit_types::TenantId::new();

    h.channels.register(tenant, WorldId(0), ChannelId(1));
    h.channels.register(tenant, WorldId(0), ChannelId(2));
    h.occupancy
        .place(WorldId(0), ChannelId(1), STAGING, CharacterId(1001));
    h.occupancy
        .place(WorldId(0), ChannelId(1), STAGING, CharacterId(1002));
    h.occupancy
        .place(WorldId(0), ChannelId(2), STAGING, CharacterId(2001));

    let route = ferry();
    let id = route.id();
    let route = route
        .with_schedule(vec![trip_at(id, 0)])
        .with_phase(RoutePhase::LockedEntry);
    h.routes.install(tenant, vec![route.clone()]);

    // Ten minutes in: departed (departure +7m), not yet arrived (+17m).
    let now = t0() + Duration::minutes(10);
    h.orchestrator
        .process_route(tenant, route, now)
        .await
        .unwrap();

    let warps = payloads(&h.sink, TOPIC_WARPS);
    assert_eq!(warps.len(), 3);
    for warp in &warps {
        assert_eq!(warp["type"], "CHANGE_MAP");
        assert_eq!(warp["body"]["mapId"], EN_ROUTE_A.0);
        assert_eq!(warp["body"]["portalId"], 0);
    }
    let mut warped: Vec<u64> = warps
        .iter()
        .map(|w| w["characterId"].as_u64().unwrap())
        .collect();
    warped.sort_unstable();
    assert_eq!(warped, vec![1001, 1002, 2001]);

    let events = payloads(&h.sink, TOPIC_STATUS);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["type"], "DEPARTED");
    assert_eq!(events[0]["body"]["mapId"], OBSERVATION.0);
}

#[tokio::test]
async fn arrival_unloads_every_en_route_map_to_destination() {
    let portals = StaticPortals::new().with_spawn_point(DESTINATION);
    let h = harness(portals);
    let tenant = transit_types::TenantId::new();

    h.channels.register(tenant, WorldId(0), ChannelId(1));
    h.occupancy
        .place(WorldId(0), ChannelId(1), EN_ROUTE_A, CharacterId(1));
    h.occupancy
        .place(WorldId(0), ChannelId(1), EN_ROUTE_B, CharacterId(2));

    let route = ferry();
    let id = route.id();
    // Trip arrived at +17m; a later trip keeps the route in service so
    // the phase lands on AwaitingReturn.
    let route = route
        .with_schedule(vec![trip_at(id, 0), trip_at(id, 30)])
        .with_phase(RoutePhase::InTransit);
    h.routes.install(tenant, vec![route.clone()]);

    let now = t0() + Duration::minutes(20);
    h.orchestrator
        .process_route(tenant, route, now)
        .await
        .unwrap();

    let warps = payloads(&h.sink, TOPIC_WARPS);
    assert_eq!(warps.len(), 2, "riders of both en-route maps unload");
    for warp in &warps {
        assert_eq!(warp["body"]["mapId"], DESTINATION.0);
    }
    assert!(
        payloads(&h.sink, TOPIC_STATUS).is_empty(),
        "AwaitingReturn emits no status event"
    );
}

#[tokio::test]
async fn missing_spawn_portal_aborts_side_effects_but_commits_phase() {
    // No portals anywhere: the warp target has no valid landing spot.
    let h = harness(StaticPortals::new());
    let tenant = transit_types::TenantId::new();

    h.channels.register(tenant, WorldId(0), ChannelId(1));
    h.occupancy
        .place(WorldId(0), ChannelId(1), STAGING, CharacterId(7));

    let route = ferry();
    let id = route.id();
    let route = route
        .with_schedule(vec![trip_at(id, 0)])
        .with_phase(RoutePhase::LockedEntry);
    h.routes.install(tenant, vec![route.clone()]);

    let now = t0() + Duration::minutes(10);
    let err = h
        .orchestrator
        .process_route(tenant, route, now)
        .await
        .unwrap_err();
    assert_eq!(
        transit_types::ErrorCode::code(&err),
        "ORCH_NO_SPAWN_PORTAL"
    );

    // Phase committed before I/O; nothing was published.
    assert_eq!(
        h.routes.get(tenant, id).unwrap().phase(),
        RoutePhase::InTransit
    );
    assert!(h.sink.batches().is_empty());

    // The next tick does not retry the lost side effects.
    let current = h.routes.get(tenant, id).unwrap();
    h.orchestrator
        .process_route(tenant, current, now)
        .await
        .unwrap();
    assert!(h.sink.batches().is_empty());
}

#[tokio::test]
async fn logout_in_transport_map_warps_back_to_start() {
    let portals = StaticPortals::new().with_spawn_point(START);
    let h = harness(portals);
    let tenant = transit_types::TenantId::new();
    let route = ferry();
    h.routes.install(tenant, vec![route]);

    let warped = h
        .orchestrator
        .correct_logout(
            tenant,
            WorldId(0),
            ChannelId(1),
            EN_ROUTE_A,
            CharacterId(42),
        )
        .await
        .unwrap();
    assert!(warped);

    let warps = payloads(&h.sink, TOPIC_WARPS);
    assert_eq!(warps.len(), 1);
    assert_eq!(warps[0]["characterId"], 42);
    assert_eq!(warps[0]["body"]["mapId"], START.0);
    assert_eq!(warps[0]["body"]["channelId"], 1);
}

#[tokio::test]
async fn logout_in_staging_map_also_corrects() {
    let portals = StaticPortals::new().with_spawn_point(START);
    let h = harness(portals);
    let tenant = transit_types::TenantId::new();
    h.routes.install(tenant, vec![ferry()]);

    let warped = h
        .orchestrator
        .correct_logout(tenant, WorldId(0), ChannelId(1), STAGING, CharacterId(8))
        .await
        .unwrap();
    assert!(warped);
    assert_eq!(payloads(&h.sink, TOPIC_WARPS).len(), 1);
}

#[tokio::test]
async fn logout_in_unrelated_map_emits_nothing() {
    let portals = StaticPortals::new().with_spawn_point(START);
    let h = harness(portals);
    let tenant = transit_types::TenantId::new();
    h.routes.install(tenant, vec![ferry()]);

    let warped = h
        .orchestrator
        .correct_logout(
            tenant,
            WorldId(0),
            ChannelId(1),
            transit_types::MapId(999),
            CharacterId(8),
        )
        .await
        .unwrap();
    assert!(!warped);
    assert!(h.sink.batches().is_empty());
}

#[tokio::test]
async fn logout_correction_emits_at_most_one_warp() {
    // Two routes share the staging map; only the first covering route
    // acts.
    let portals = StaticPortals::new().with_spawn_point(START);
    let h = harness(portals);
    let tenant = transit_types::TenantId::new();
    h.routes.install(tenant, vec![ferry(), ferry()]);

    h.orchestrator
        .correct_logout(tenant, WorldId(0), ChannelId(1), STAGING, CharacterId(5))
        .await
        .unwrap();
    assert_eq!(payloads(&h.sink, TOPIC_WARPS).len(), 1);
}

#[tokio::test]
async fn out_of_service_and_locked_entry_have_no_side_effects() {
    let h = harness(StaticPortals::new());
    let tenant = transit_types::TenantId::new();

    let route = ferry();
    let id = route.id();
    // LockedEntry edge: between boarding close (+5m) and departure (+7m).
    let route = route
        .with_schedule(vec![trip_at(id, 0)])
        .with_phase(RoutePhase::OpenEntry);
    h.routes.install(tenant, vec![route.clone()]);
    h.orchestrator
        .process_route(tenant, route, t0() + Duration::minutes(6))
        .await
        .unwrap();
    assert!(h.sink.batches().is_empty());

    // OutOfService edge: past the only arrival.
    let current = h.routes.get(tenant, id).unwrap();
    h.orchestrator
        .process_route(tenant, current, t0() + Duration::hours(2))
        .await
        .unwrap();
    assert!(h.sink.batches().is_empty());
    assert_eq!(
        h.routes.get(tenant, id).unwrap().phase(),
        RoutePhase::OutOfService
    );
}
