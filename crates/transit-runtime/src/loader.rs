//! Tenant bootstrap.
//!
//! At startup every tenant's routes and vessels are fetched from the
//! configuration collaborator, the day's trips are planned and the
//! registries are populated. A tenant whose configuration cannot be
//! fetched is installed empty - the service stays up and serves the
//! tenants it could load.

use crate::fetch::{RouteSource, TenantDirectory};
use crate::registry::{PlanRegistry, RouteRegistry};
use chrono::{DateTime, Utc};
use tracing::{info, warn};
use transit_core::{schedule, Route, SharedVessel};
use transit_types::{ErrorCode, TenantId};

/// Enumerates tenants and installs each one.
///
/// # Errors
///
/// Fails only when the tenant directory itself is unreachable;
/// per-tenant configuration failures degrade to an empty install.
pub async fn bootstrap(
    directory: &dyn TenantDirectory,
    source: &dyn RouteSource,
    routes: &RouteRegistry,
    plans: &PlanRegistry,
    now: DateTime<Utc>,
) -> Result<Vec<TenantId>, crate::fetch::FetchError> {
    let tenants = directory.tenants().await?;
    info!(count = tenants.len(), "bootstrapping tenants");
    for &tenant in &tenants {
        install_tenant(source, routes, plans, tenant, now).await;
    }
    Ok(tenants)
}

/// Fetches one tenant's configuration and installs it, falling back to
/// an empty set when the fetch fails.
pub async fn install_tenant(
    source: &dyn RouteSource,
    routes: &RouteRegistry,
    plans: &PlanRegistry,
    tenant: TenantId,
    now: DateTime<Utc>,
) {
    let fetched = async {
        let route_list = source.routes_for(tenant).await?;
        let vessels = source.vessels_for(tenant).await?;
        Ok::<_, crate::fetch::FetchError>((route_list, vessels))
    }
    .await;

    let (route_list, vessels) = match fetched {
        Ok(config) => config,
        Err(e) => {
            warn!(
                tenant = %tenant,
                code = e.code(),
                error = %e,
                "configuration fetch failed; installing empty route set"
            );
            (Vec::new(), Vec::new())
        }
    };
    install_routes(routes, plans, tenant, route_list, vessels, now);
}

/// Plans the current day and installs the scheduled routes.
pub fn install_routes(
    routes: &RouteRegistry,
    plans: &PlanRegistry,
    tenant: TenantId,
    route_list: Vec<Route>,
    vessels: Vec<SharedVessel>,
    now: DateTime<Utc>,
) {
    let day_start = schedule::day_start_utc(now);
    let trips = schedule::plan_day(&route_list, &vessels, day_start);

    let scheduled: Vec<Route> = route_list
        .into_iter()
        .map(|route| {
            let own = schedule::schedule_for_route(route.id(), &trips);
            route.with_schedule(own)
        })
        .collect();

    info!(
        tenant = %tenant,
        routes = scheduled.len(),
        vessels = vessels.len(),
        trips = trips.len(),
        "installing tenant"
    );
    routes.install(tenant, scheduled);
    plans.install(tenant, vessels, day_start.date_naive());
}
