//! Route registry.

use parking_lot::RwLock;
use std::collections::HashMap;
use thiserror::Error;
use transit_core::Route;
use transit_types::{ErrorCode, RouteId, TenantId};

/// Lookup failure in the route registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("route {0} not found")]
    RouteNotFound(RouteId),
}

impl ErrorCode for RegistryError {
    fn code(&self) -> &'static str {
        match self {
            Self::RouteNotFound(_) => "REG_ROUTE_NOT_FOUND",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}

/// Per-tenant `route id → route` mapping.
///
/// Routes enter through [`install`](Self::install) at tenant
/// bootstrap (and on day refresh) and are swapped one at a time by the
/// orchestrator through [`replace`](Self::replace) on phase change. The
/// write lock serializes `replace` against `install` and `list`; reads
/// return owned clones.
#[derive(Debug, Default)]
pub struct RouteRegistry {
    inner: RwLock<HashMap<TenantId, HashMap<RouteId, Route>>>,
}

impl RouteRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges the given routes into the tenant's set, overwriting prior
    /// entries by id. Installing an identical set again is a no-op.
    pub fn install(&self, tenant: TenantId, routes: Vec<Route>) {
        let mut inner = self.inner.write();
        let entry = inner.entry(tenant).or_default();
        for route in routes {
            entry.insert(route.id(), route);
        }
    }

    #[must_use]
    pub fn get(&self, tenant: TenantId, id: RouteId) -> Option<Route> {
        self.inner.read().get(&tenant)?.get(&id).cloned()
    }

    /// Returns the tenant's routes in unspecified order.
    #[must_use]
    pub fn list(&self, tenant: TenantId) -> Vec<Route> {
        self.inner
            .read()
            .get(&tenant)
            .map(|routes| routes.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Atomically replaces a single route value.
    pub fn replace(&self, tenant: TenantId, route: Route) {
        let mut inner = self.inner.write();
        inner.entry(tenant).or_default().insert(route.id(), route);
    }

    /// Tenants currently holding routes; the driver iterates this.
    #[must_use]
    pub fn tenants(&self) -> Vec<TenantId> {
        self.inner.read().keys().copied().collect()
    }
}
