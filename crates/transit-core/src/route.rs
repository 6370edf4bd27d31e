//! Route model.

use crate::{RoutePhase, Trip, ValidationError};
use chrono::Duration;
use transit_types::{MapId, RouteId};

/// Configuration for constructing a [`Route`].
///
/// This is the shape the configuration collaborator delivers; the
/// validating constructor is the only way to turn it into a `Route`.
#[derive(Debug, Clone)]
pub struct RouteConfig {
    pub id: RouteId,
    pub name: String,
    pub start_map: MapId,
    pub staging_map: MapId,
    pub en_route_maps: Vec<MapId>,
    pub destination_map: MapId,
    pub observation_map: MapId,
    pub boarding_window: Duration,
    pub pre_departure: Duration,
    pub travel: Duration,
    pub cycle_interval: Duration,
}

/// A directed periodic transport service between two maps.
///
/// Immutable configuration plus a mutable phase snapshot and the derived
/// day schedule. State changes go through value-copying helpers
/// ([`with_phase`](Self::with_phase), [`with_schedule`](Self::with_schedule));
/// the orchestrator swaps whole route values in its registry rather than
/// mutating in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    id: RouteId,
    name: String,
    start_map: MapId,
    staging_map: MapId,
    en_route_maps: Vec<MapId>,
    destination_map: MapId,
    observation_map: MapId,
    boarding_window: Duration,
    pre_departure: Duration,
    travel: Duration,
    cycle_interval: Duration,
    phase: RoutePhase,
    schedule: Vec<Trip>,
}

impl Route {
    /// Validates and constructs a route in its initial
    /// [`RoutePhase::OutOfService`] phase with an empty schedule.
    ///
    /// # Errors
    ///
    /// Rejects an empty `en_route_maps` list, negative durations, a
    /// non-positive cycle interval, and a cycle too short to contain
    /// `boarding_window + pre_departure + travel`.
    pub fn new(config: RouteConfig) -> Result<Self, ValidationError> {
        let RouteConfig {
            id,
            name,
            start_map,
            staging_map,
            en_route_maps,
            destination_map,
            observation_map,
            boarding_window,
            pre_departure,
            travel,
            cycle_interval,
        } = config;

        if en_route_maps.is_empty() {
            return Err(ValidationError::NoEnRouteMaps(id));
        }
        for (field, value) in [
            ("boarding_window", boarding_window),
            ("pre_departure", pre_departure),
            ("travel", travel),
        ] {
            if value < Duration::zero() {
                return Err(ValidationError::NegativeDuration { route: id, field });
            }
        }
        if cycle_interval <= Duration::zero() {
            return Err(ValidationError::NonPositiveCycle(id));
        }
        if boarding_window + pre_departure + travel > cycle_interval {
            return Err(ValidationError::CycleOverrun(id));
        }

        Ok(Self {
            id,
            name,
            start_map,
            staging_map,
            en_route_maps,
            destination_map,
            observation_map,
            boarding_window,
            pre_departure,
            travel,
            cycle_interval,
            phase: RoutePhase::OutOfService,
            schedule: Vec::new(),
        })
    }

    #[must_use]
    pub fn id(&self) -> RouteId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Origin map where boarders wait.
    #[must_use]
    pub fn start_map(&self) -> MapId {
        self.start_map
    }

    /// Pre-boarding map where players congregate.
    #[must_use]
    pub fn staging_map(&self) -> MapId {
        self.staging_map
    }

    /// Ordered transit maps; never empty. Characters load onto the first
    /// on departure and are unloaded from all of them on arrival.
    #[must_use]
    pub fn en_route_maps(&self) -> &[MapId] {
        &self.en_route_maps
    }

    #[must_use]
    pub fn destination_map(&self) -> MapId {
        self.destination_map
    }

    /// Map referenced only in outbound status events (in-world vantage
    /// point, never a warp target).
    #[must_use]
    pub fn observation_map(&self) -> MapId {
        self.observation_map
    }

    #[must_use]
    pub fn boarding_window(&self) -> Duration {
        self.boarding_window
    }

    #[must_use]
    pub fn pre_departure(&self) -> Duration {
        self.pre_departure
    }

    #[must_use]
    pub fn travel(&self) -> Duration {
        self.travel
    }

    #[must_use]
    pub fn cycle_interval(&self) -> Duration {
        self.cycle_interval
    }

    #[must_use]
    pub fn phase(&self) -> RoutePhase {
        self.phase
    }

    /// Today's trips, sorted by boarding-open time.
    #[must_use]
    pub fn schedule(&self) -> &[Trip] {
        &self.schedule
    }

    /// Returns a copy with the given phase recorded.
    #[must_use]
    pub fn with_phase(mut self, phase: RoutePhase) -> Self {
        self.phase = phase;
        self
    }

    /// Returns a copy with the given trips as its schedule, sorted by
    /// boarding-open time. The recorded phase is preserved.
    #[must_use]
    pub fn with_schedule(mut self, mut trips: Vec<Trip>) -> Self {
        trips.sort_by_key(|t| t.boarding_open);
        self.schedule = trips;
        self
    }

    /// Returns `true` if the map is one a character can be "inside the
    /// transport" on: the staging map or any en-route map. Used by the
    /// logout correction path.
    #[must_use]
    pub fn covers_transport_map(&self, map: MapId) -> bool {
        self.staging_map == map || self.en_route_maps.contains(&map)
    }
}
