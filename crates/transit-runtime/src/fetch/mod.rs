//! Collaborator fetchers.
//!
//! Every external lookup the orchestrator and the loader perform goes
//! through one of the ports below. Implementations return concrete
//! lists plus an error - no lazy sequences leak upward - so test fakes
//! are trivial and transactions can snapshot results. The REST
//! implementations live in [`rest`].

pub mod jsonapi;
mod rest;

pub use rest::{RestCharacterLocator, RestPortalCatalog, RestRouteSource, RestTenantDirectory};

use async_trait::async_trait;
use thiserror::Error;
use transit_core::{Route, SharedVessel};
use transit_types::{ChannelId, CharacterId, ErrorCode, MapId, TenantId, WorldId};

/// Map id marking a portal without a warp target.
pub const NO_TARGET_MAP: MapId = MapId(999_999_999);

/// A portal inside a map, as served by the game data service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Portal {
    pub id: u32,
    pub portal_type: u8,
    pub target_map: MapId,
}

impl Portal {
    /// Spawn points are portal type 0.
    #[must_use]
    pub fn is_spawn_point(&self) -> bool {
        self.portal_type == 0
    }

    #[must_use]
    pub fn has_no_target(&self) -> bool {
        self.target_map == NO_TARGET_MAP
    }
}

/// Filters a map's portals down to valid warp landing spots: spawn
/// points that lead nowhere.
#[must_use]
pub fn spawn_candidates(portals: &[Portal]) -> Vec<Portal> {
    portals
        .iter()
        .filter(|p| p.is_spawn_point() && p.has_no_target())
        .copied()
        .collect()
}

/// Who is standing in a map right now. Backed by the map service.
#[async_trait]
pub trait CharacterLocator: Send + Sync {
    async fn characters_in(
        &self,
        world: WorldId,
        channel: ChannelId,
        map: MapId,
    ) -> Result<Vec<CharacterId>, FetchError>;
}

/// Portal layout of maps. Backed by the game data service.
#[async_trait]
pub trait PortalCatalog: Send + Sync {
    async fn portals_in(&self, map: MapId) -> Result<Vec<Portal>, FetchError>;
}

/// Enumeration of tenants to bootstrap. Backed by the tenant service.
#[async_trait]
pub trait TenantDirectory: Send + Sync {
    async fn tenants(&self) -> Result<Vec<TenantId>, FetchError>;
}

/// Per-tenant route and vessel configuration. Backed by the
/// configuration service.
#[async_trait]
pub trait RouteSource: Send + Sync {
    async fn routes_for(&self, tenant: TenantId) -> Result<Vec<Route>, FetchError>;
    async fn vessels_for(&self, tenant: TenantId) -> Result<Vec<SharedVessel>, FetchError>;
}

/// Collaborator lookup failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The call did not complete within its deadline.
    #[error("collaborator call timed out")]
    Timeout,

    /// Connection-level failure.
    #[error("collaborator transport failure: {0}")]
    Transport(String),

    /// Non-2xx response.
    #[error("collaborator responded with status {0}")]
    Status(u16),

    /// Response body did not match the expected document shape.
    #[error("collaborator response decoding failed: {0}")]
    Decode(String),
}

impl ErrorCode for FetchError {
    fn code(&self) -> &'static str {
        match self {
            Self::Timeout => "FETCH_TIMEOUT",
            Self::Transport(_) => "FETCH_TRANSPORT",
            Self::Status(_) => "FETCH_STATUS",
            Self::Decode(_) => "FETCH_DECODE",
        }
    }

    fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Decode(_))
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}
