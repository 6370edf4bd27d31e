//! Concrete scheduled trips.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use transit_types::{RouteId, TripId};

/// One concrete scheduled run of a route on a given day.
///
/// Invariant: `boarding_open <= boarding_closed <= departure <= arrival`.
/// The planner produces trips by adding non-negative durations in that
/// order, so the invariant holds by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    pub trip_id: TripId,
    pub route_id: RouteId,
    pub boarding_open: DateTime<Utc>,
    pub boarding_closed: DateTime<Utc>,
    pub departure: DateTime<Utc>,
    pub arrival: DateTime<Utc>,
}

impl Trip {
    #[must_use]
    pub fn new(
        trip_id: TripId,
        route_id: RouteId,
        boarding_open: DateTime<Utc>,
        boarding_closed: DateTime<Utc>,
        departure: DateTime<Utc>,
        arrival: DateTime<Utc>,
    ) -> Self {
        debug_assert!(boarding_open <= boarding_closed);
        debug_assert!(boarding_closed <= departure);
        debug_assert!(departure <= arrival);
        Self {
            trip_id,
            route_id,
            boarding_open,
            boarding_closed,
            departure,
            arrival,
        }
    }
}
