//! Domain validation errors.

use thiserror::Error;
use transit_types::{ErrorCode, RouteId};

/// Rejection of a malformed route or vessel definition.
///
/// Validation failures affect only the definition that carries them; the
/// caller skips the bad entry rather than poisoning its registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A route must traverse at least one en-route map.
    #[error("route {0} has no en-route maps")]
    NoEnRouteMaps(RouteId),

    /// Phase durations may not be negative.
    #[error("route {route} has a negative {field} duration")]
    NegativeDuration {
        route: RouteId,
        field: &'static str,
    },

    /// The cycle must be long enough to contain one full trip.
    #[error("route {0}: boarding + pre-departure + travel exceeds the cycle interval")]
    CycleOverrun(RouteId),

    /// A zero or negative cycle would never advance the planner.
    #[error("route {0} has a non-positive cycle interval")]
    NonPositiveCycle(RouteId),

    /// Vessel turnaround must be non-negative.
    #[error("vessel turnaround delay is negative")]
    NegativeTurnaround,
}

impl ErrorCode for ValidationError {
    fn code(&self) -> &'static str {
        match self {
            Self::NoEnRouteMaps(_) => "CORE_NO_EN_ROUTE_MAPS",
            Self::NegativeDuration { .. } => "CORE_NEGATIVE_DURATION",
            Self::CycleOverrun(_) => "CORE_CYCLE_OVERRUN",
            Self::NonPositiveCycle(_) => "CORE_NON_POSITIVE_CYCLE",
            Self::NegativeTurnaround => "CORE_NEGATIVE_TURNAROUND",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}
