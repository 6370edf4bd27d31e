//! Trip-schedule planning.
//!
//! The planner is a pure function from route and vessel definitions to
//! the full list of trips for one UTC day. Routes bound to a shared
//! vessel are expanded exclusively through the vessel (their own cycle
//! interval is ignored) so a route is never scheduled twice.

use crate::{Route, SharedVessel, Trip};
use chrono::{DateTime, Duration, Timelike, Utc};
use transit_types::{RouteId, TripId};

/// Truncates an instant to the UTC midnight that starts its day.
#[must_use]
pub fn day_start_utc(now: DateTime<Utc>) -> DateTime<Utc> {
    now.with_hour(0)
        .and_then(|t| t.with_minute(0))
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .expect("midnight is always a representable instant")
}

/// Computes every trip of every route for the day beginning at
/// `day_start` (assumed to be a UTC midnight; `day_end = day_start + 24h`).
///
/// Only trips whose arrival falls strictly before `day_end` are emitted.
/// Vessel trips appear in generation order, alternating route A then
/// route B, so the first trip of a vessel is always route A's.
#[must_use]
pub fn plan_day(
    routes: &[Route],
    vessels: &[SharedVessel],
    day_start: DateTime<Utc>,
) -> Vec<Trip> {
    let day_end = day_start + Duration::hours(24);
    let mut trips = Vec::new();

    for route in routes {
        let shared = vessels.iter().any(|v| v.binds(route.id()));
        if !shared {
            expand_independent(route, day_start, day_end, &mut trips);
        }
    }
    for vessel in vessels {
        expand_vessel(vessel, routes, day_start, day_end, &mut trips);
    }

    trips
}

/// Filters a merged trip list down to one route, preserving order.
#[must_use]
pub fn schedule_for_route(route: RouteId, trips: &[Trip]) -> Vec<Trip> {
    trips
        .iter()
        .filter(|t| t.route_id == route)
        .cloned()
        .collect()
}

fn trip_times(
    route: &Route,
    boarding_open: DateTime<Utc>,
) -> (DateTime<Utc>, DateTime<Utc>, DateTime<Utc>) {
    let boarding_closed = boarding_open + route.boarding_window();
    let departure = boarding_closed + route.pre_departure();
    let arrival = departure + route.travel();
    (boarding_closed, departure, arrival)
}

fn make_trip(route: &Route, boarding_open: DateTime<Utc>) -> Trip {
    let (boarding_closed, departure, arrival) = trip_times(route, boarding_open);
    let id = TripId::new(format!(
        "{}_{}",
        route.id().uuid(),
        departure.format("%Y%m%dT%H%M%S")
    ));
    Trip::new(id, route.id(), boarding_open, boarding_closed, departure, arrival)
}

fn expand_independent(
    route: &Route,
    day_start: DateTime<Utc>,
    day_end: DateTime<Utc>,
    out: &mut Vec<Trip>,
) {
    let mut t = day_start;
    while t < day_end {
        let (_, _, arrival) = trip_times(route, t);
        if arrival < day_end {
            out.push(make_trip(route, t));
        }
        t += route.cycle_interval();
    }
}

fn expand_vessel(
    vessel: &SharedVessel,
    routes: &[Route],
    day_start: DateTime<Utc>,
    day_end: DateTime<Utc>,
    out: &mut Vec<Trip>,
) {
    let route_a = routes.iter().find(|r| r.id() == vessel.route_a);
    let route_b = routes.iter().find(|r| r.id() == vessel.route_b);
    let (Some(route_a), Some(route_b)) = (route_a, route_b) else {
        // A vessel naming an unknown route schedules nothing.
        return;
    };

    let mut t = day_start;
    let mut on_a = true;
    while t < day_end {
        let route = if on_a { route_a } else { route_b };
        let (_, _, arrival) = trip_times(route, t);
        if arrival >= day_end {
            break;
        }
        out.push(make_trip(route, t));

        let next = arrival + vessel.turnaround_delay;
        if next <= t {
            // Zero-length legs would never advance the clock.
            break;
        }
        t = next;
        on_a = !on_a;
    }
}
