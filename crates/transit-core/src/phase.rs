//! Phase derivation.
//!
//! A route's phase is a pure function of its schedule and the clock; the
//! route's recorded phase only feeds the `changed` edge flag. All
//! comparisons are strict, so a trip sitting exactly on `departure` is
//! not yet in transit and one exactly on `arrival` is no longer in
//! transit - boundary instants resolve on the following tick.

use crate::{Route, Trip};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use transit_types::RouteId;

/// Lifecycle phase of a route at an instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutePhase {
    /// No upcoming or running trip remains today.
    OutOfService,
    /// The vessel has not yet returned; boarding is not open.
    AwaitingReturn,
    /// Players can board.
    OpenEntry,
    /// Boarding is closed; the vessel is in its pre-departure window.
    LockedEntry,
    /// The vessel is under way; characters ride the en-route maps.
    InTransit,
}

impl std::fmt::Display for RoutePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::OutOfService => "out_of_service",
            Self::AwaitingReturn => "awaiting_return",
            Self::OpenEntry => "open_entry",
            Self::LockedEntry => "locked_entry",
            Self::InTransit => "in_transit",
        };
        f.write_str(s)
    }
}

/// Phase plus the timing hints the read API exposes alongside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhaseSnapshot {
    pub phase: RoutePhase,
    /// Departure of the trip the phase was derived from, if any.
    pub next_departure: Option<DateTime<Utc>>,
    /// Boarding-closed instant of that trip, if any.
    pub boarding_ends: Option<DateTime<Utc>>,
}

/// Trip classification relative to `now`.
struct Candidates<'a> {
    /// Most recently departed trip with `departure < now < arrival`.
    in_transit: Option<&'a Trip>,
    /// Soonest trip with `departure > now`.
    future: Option<&'a Trip>,
    /// Whether any trip has `arrival < now`.
    arrived: bool,
}

fn classify<'a>(route: RouteId, trips: &'a [Trip], now: DateTime<Utc>) -> Candidates<'a> {
    let mut c = Candidates {
        in_transit: None,
        future: None,
        arrived: false,
    };
    // Call sites may hand over merged schedules; ignore other routes.
    for trip in trips.iter().filter(|t| t.route_id == route) {
        if trip.departure < now && now < trip.arrival {
            if c.in_transit.is_none_or(|t| trip.departure > t.departure) {
                c.in_transit = Some(trip);
            }
        } else if trip.departure > now {
            if c.future.is_none_or(|t| trip.departure < t.departure) {
                c.future = Some(trip);
            }
        } else if trip.arrival < now {
            c.arrived = true;
        }
    }
    c
}

/// Derives the phase of `route` among `trips` at `now`.
///
/// The reference trip is the most recently departed in-transit trip if
/// one exists, otherwise the soonest future trip; with no reference trip
/// the route is out of service.
#[must_use]
pub fn phase_at(route: RouteId, trips: &[Trip], now: DateTime<Utc>) -> RoutePhase {
    let c = classify(route, trips, now);
    let has_future = c.future.is_some();
    let Some(next) = c.in_transit.or(c.future) else {
        return RoutePhase::OutOfService;
    };
    if now < next.boarding_open {
        RoutePhase::AwaitingReturn
    } else if now < next.boarding_closed {
        RoutePhase::OpenEntry
    } else if now < next.departure {
        RoutePhase::LockedEntry
    } else if now < next.arrival {
        RoutePhase::InTransit
    } else if has_future || c.arrived {
        RoutePhase::AwaitingReturn
    } else {
        RoutePhase::OutOfService
    }
}

/// Evaluates `route` at `now`, returning the derived phase and whether
/// it differs from the phase the route currently records.
#[must_use]
pub fn evaluate(route: &Route, now: DateTime<Utc>) -> (RoutePhase, bool) {
    let phase = phase_at(route.id(), route.schedule(), now);
    (phase, phase != route.phase())
}

/// Derives the phase together with the reference trip's timing hints.
#[must_use]
pub fn snapshot(route: &Route, now: DateTime<Utc>) -> PhaseSnapshot {
    let c = classify(route.id(), route.schedule(), now);
    let next = c.in_transit.or(c.future);
    PhaseSnapshot {
        phase: phase_at(route.id(), route.schedule(), now),
        next_departure: next.map(|t| t.departure),
        boarding_ends: next.map(|t| t.boarding_closed),
    }
}
