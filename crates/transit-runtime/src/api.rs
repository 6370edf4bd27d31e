//! Read queries for the HTTP collaborator.
//!
//! The JSON:API server surface lives outside this crate; it consumes
//! these queries verbatim (`GET /routes`, `GET /routes/{id}`,
//! `GET /routes/{id}/schedule`).

use crate::registry::{RegistryError, RouteRegistry};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use transit_core::{phase, PhaseSnapshot, Route, Trip};
use transit_types::{RouteId, TenantId};

/// Read-only view over the route registry.
#[derive(Clone)]
pub struct ReadApi {
    routes: Arc<RouteRegistry>,
}

impl ReadApi {
    #[must_use]
    pub fn new(routes: Arc<RouteRegistry>) -> Self {
        Self { routes }
    }

    /// # Errors
    ///
    /// Returns [`RegistryError::RouteNotFound`] for an unknown id.
    pub fn route_by_id(&self, tenant: TenantId, id: RouteId) -> Result<Route, RegistryError> {
        self.routes
            .get(tenant, id)
            .ok_or(RegistryError::RouteNotFound(id))
    }

    /// All routes of a tenant, in unspecified order.
    #[must_use]
    pub fn all_routes(&self, tenant: TenantId) -> Vec<Route> {
        self.routes.list(tenant)
    }

    /// Today's trips for one route.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::RouteNotFound`] for an unknown id.
    pub fn schedule_for(
        &self,
        tenant: TenantId,
        id: RouteId,
    ) -> Result<Vec<Trip>, RegistryError> {
        self.route_by_id(tenant, id)
            .map(|route| route.schedule().to_vec())
    }

    /// Current phase with next-departure and boarding-end hints.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::RouteNotFound`] for an unknown id.
    pub fn route_status(
        &self,
        tenant: TenantId,
        id: RouteId,
        now: DateTime<Utc>,
    ) -> Result<PhaseSnapshot, RegistryError> {
        self.route_by_id(tenant, id)
            .map(|route| phase::snapshot(&route, now))
    }
}
