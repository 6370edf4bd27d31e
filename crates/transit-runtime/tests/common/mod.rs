//! Shared harness for runtime integration tests.
#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::Arc;
use transit_core::{Route, RouteConfig, Trip};
use transit_runtime::bus::BusMessage;
use transit_runtime::testing::{MapOccupancy, RecordingSink, StaticPortals};
use transit_runtime::{ChannelRegistry, Orchestrator, PlanRegistry, RouteRegistry, Topics};
use transit_types::{MapId, RouteId, TripId};

pub const TOPIC_WARPS: &str = "cmd-character";
pub const TOPIC_STATUS: &str = "evt-transport-status";
pub const TOPIC_CHANNELS: &str = "evt-channel-status";
pub const TOPIC_CHARACTERS: &str = "evt-character-status";

pub fn topics() -> Topics {
    Topics {
        character_command: TOPIC_WARPS.into(),
        transport_status: TOPIC_STATUS.into(),
        channel_status: TOPIC_CHANNELS.into(),
        character_status: TOPIC_CHARACTERS.into(),
    }
}

pub struct Harness {
    pub routes: Arc<RouteRegistry>,
    pub channels: Arc<ChannelRegistry>,
    pub plans: Arc<PlanRegistry>,
    pub occupancy: Arc<MapOccupancy>,
    pub sink: Arc<RecordingSink>,
    pub orchestrator: Arc<Orchestrator>,
}

pub fn harness(portals: StaticPortals) -> Harness {
    let routes = Arc::new(RouteRegistry::new());
    let channels = Arc::new(ChannelRegistry::new());
    let plans = Arc::new(PlanRegistry::new());
    let occupancy = Arc::new(MapOccupancy::new());
    let sink = Arc::new(RecordingSink::new());
    let orchestrator = Arc::new(Orchestrator::new(
        Arc::clone(&routes),
        Arc::clone(&channels),
        Arc::clone(&plans),
        Arc::clone(&occupancy) as Arc<dyn transit_runtime::fetch::CharacterLocator>,
        Arc::new(portals),
        Arc::clone(&sink) as Arc<dyn transit_runtime::bus::BusSink>,
        topics(),
    ));
    Harness {
        routes,
        channels,
        plans,
        occupancy,
        sink,
        orchestrator,
    }
}

/// Canonical test maps.
pub const START: MapId = MapId(100);
pub const STAGING: MapId = MapId(101);
pub const EN_ROUTE_A: MapId = MapId(102);
pub const EN_ROUTE_B: MapId = MapId(103);
pub const DESTINATION: MapId = MapId(104);
pub const OBSERVATION: MapId = MapId(105);

pub fn ferry() -> Route {
    Route::new(RouteConfig {
        id: RouteId::new(),
        name: "Harness Ferry".into(),
        start_map: START,
        staging_map: STAGING,
        en_route_maps: vec![EN_ROUTE_A, EN_ROUTE_B],
        destination_map: DESTINATION,
        observation_map: OBSERVATION,
        boarding_window: Duration::minutes(5),
        pre_departure: Duration::minutes(2),
        travel: Duration::minutes(10),
        cycle_interval: Duration::minutes(30),
    })
    .unwrap()
}

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 1, 1, 12, 0, 0).unwrap()
}

/// A trip with the harness ferry's standard offsets: boarding opens at
/// `open_min`, closes +5m, departs +7m, arrives +17m.
pub fn trip_at(route: RouteId, open_min: i64) -> Trip {
    let open = t0() + Duration::minutes(open_min);
    Trip::new(
        TripId::new(format!("{route}_{open_min}")),
        route,
        open,
        open + Duration::minutes(5),
        open + Duration::minutes(7),
        open + Duration::minutes(17),
    )
}

/// Decoded payloads of every message on a topic.
pub fn payloads(sink: &RecordingSink, topic: &str) -> Vec<serde_json::Value> {
    sink.messages_for(topic)
        .into_iter()
        .map(|m: BusMessage| m.payload)
        .collect()
}
