//! Orchestrator transaction errors.

use crate::bus::BusError;
use crate::fetch::FetchError;
use thiserror::Error;
use transit_types::{ErrorCode, MapId};

/// Failure of a single route transaction or logout correction.
///
/// Transactions log these and continue; the next tick re-evaluates.
/// Because only changed transitions act, a retried evaluation is
/// idempotent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrchestratorError {
    /// The warp target has no spawn-point portal without a target;
    /// there is nowhere valid to land a character.
    #[error("map {0} has no valid spawn-point portal")]
    NoSpawnPortal(MapId),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Bus(#[from] BusError),
}

impl ErrorCode for OrchestratorError {
    fn code(&self) -> &'static str {
        match self {
            Self::NoSpawnPortal(_) => "ORCH_NO_SPAWN_PORTAL",
            Self::Fetch(e) => e.code(),
            Self::Bus(e) => e.code(),
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::NoSpawnPortal(_) => false,
            Self::Fetch(e) => e.is_recoverable(),
            Self::Bus(e) => e.is_recoverable(),
        }
    }
}
