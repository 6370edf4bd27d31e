//! Shared vessel bindings.

use crate::ValidationError;
use chrono::Duration;
use transit_types::{RouteId, VesselId};

/// A pairing of two opposite routes onto one physical vehicle.
///
/// The vehicle alternates directions: it runs a trip of `route_a`, waits
/// `turnaround_delay` at the far side, runs a trip of `route_b`, and so
/// on. Routes named by any vessel are scheduled exclusively through the
/// vessel; their own cycle interval is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedVessel {
    pub id: VesselId,
    pub name: String,
    pub route_a: RouteId,
    pub route_b: RouteId,
    pub turnaround_delay: Duration,
}

impl SharedVessel {
    pub fn new(
        id: VesselId,
        name: impl Into<String>,
        route_a: RouteId,
        route_b: RouteId,
        turnaround_delay: Duration,
    ) -> Result<Self, ValidationError> {
        if turnaround_delay < Duration::zero() {
            return Err(ValidationError::NegativeTurnaround);
        }
        Ok(Self {
            id,
            name: name.into(),
            route_a,
            route_b,
            turnaround_delay,
        })
    }

    /// Returns `true` if this vessel names the given route on either side.
    #[must_use]
    pub fn binds(&self, route: RouteId) -> bool {
        self.route_a == route || self.route_b == route
    }
}
