//! Retained planner inputs.

use chrono::NaiveDate;
use parking_lot::RwLock;
use std::collections::HashMap;
use transit_core::SharedVessel;
use transit_types::TenantId;

/// The inputs a tenant's schedule was last planned from.
#[derive(Debug, Clone)]
pub struct DayPlan {
    pub vessels: Vec<SharedVessel>,
    /// UTC day the installed schedules cover.
    pub day: NaiveDate,
}

/// Per-tenant day plans.
///
/// Route configs already live in the route registry; the vessels and
/// the planned day have nowhere else to survive installation, and the
/// driver needs both to re-plan when a tick crosses into a new UTC day.
#[derive(Debug, Default)]
pub struct PlanRegistry {
    inner: RwLock<HashMap<TenantId, DayPlan>>,
}

impl PlanRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn install(&self, tenant: TenantId, vessels: Vec<SharedVessel>, day: NaiveDate) {
        self.inner.write().insert(tenant, DayPlan { vessels, day });
    }

    #[must_use]
    pub fn get(&self, tenant: TenantId) -> Option<DayPlan> {
        self.inner.read().get(&tenant).cloned()
    }

    /// Stamps the day a tenant's schedules now cover.
    pub fn set_day(&self, tenant: TenantId, day: NaiveDate) {
        if let Some(plan) = self.inner.write().get_mut(&tenant) {
            plan.day = day;
        }
    }
}
