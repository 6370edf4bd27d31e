//! Channel endpoint registry.

use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use transit_types::{ChannelEndpoint, ChannelId, TenantId, WorldId};

/// Per-tenant set of live `(world, channel)` endpoints.
///
/// Mutated reactively by the channel lifecycle consumer; read by the
/// orchestrator, which takes a snapshot at the start of each transaction
/// and works off the copy. Registration is idempotent.
#[derive(Debug, Default)]
pub struct ChannelRegistry {
    inner: RwLock<HashMap<TenantId, HashSet<ChannelEndpoint>>>,
}

impl ChannelRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an endpoint. Re-registering an existing pair is a no-op.
    pub fn register(&self, tenant: TenantId, world: WorldId, channel: ChannelId) {
        let mut inner = self.inner.write();
        inner
            .entry(tenant)
            .or_default()
            .insert(ChannelEndpoint::new(world, channel));
    }

    /// Removes an endpoint if present; drops the tenant entry once its
    /// last endpoint is gone.
    pub fn unregister(&self, tenant: TenantId, world: WorldId, channel: ChannelId) {
        let mut inner = self.inner.write();
        if let Some(endpoints) = inner.get_mut(&tenant) {
            endpoints.remove(&ChannelEndpoint::new(world, channel));
            if endpoints.is_empty() {
                inner.remove(&tenant);
            }
        }
    }

    /// Returns an independent copy of the tenant's endpoints. Later
    /// registry mutation does not reflect into the returned list, and
    /// callers must not assume any ordering.
    #[must_use]
    pub fn snapshot(&self, tenant: TenantId) -> Vec<ChannelEndpoint> {
        self.inner
            .read()
            .get(&tenant)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }
}
