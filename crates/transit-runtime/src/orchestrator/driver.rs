//! The 1 Hz tick loop.

use super::Orchestrator;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};
use transit_types::TenantId;

/// Drives the orchestrator once per second.
///
/// Tenants are dispatched as independent tasks each tick. A tenant
/// whose previous tick has not finished is skipped rather than queued,
/// so one slow collaborator cannot back the whole driver up. On
/// shutdown the driver stops ticking, waits up to the grace period for
/// in-flight transactions, then aborts whatever remains.
pub struct Driver {
    orchestrator: Arc<Orchestrator>,
    shutdown: watch::Receiver<bool>,
    grace: Duration,
}

impl Driver {
    pub fn new(
        orchestrator: Arc<Orchestrator>,
        shutdown: watch::Receiver<bool>,
        grace: Duration,
    ) -> Self {
        Self {
            orchestrator,
            shutdown,
            grace,
        }
    }

    pub async fn run(self) {
        let mut ticker = tokio::time::interval(Duration::from_secs(1));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut shutdown = self.shutdown.clone();

        let in_flight: Arc<Mutex<HashSet<TenantId>>> = Arc::default();
        let mut tasks = JoinSet::new();
        info!("tick driver started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    while tasks.try_join_next().is_some() {}
                    self.dispatch_tick(&in_flight, &mut tasks);
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("tick driver stopping; draining in-flight transactions");
        let drain = async {
            while tasks.join_next().await.is_some() {}
        };
        if tokio::time::timeout(self.grace, drain).await.is_err() {
            warn!(
                grace_ms = self.grace.as_millis() as u64,
                "grace period elapsed; aborting remaining transactions"
            );
            tasks.abort_all();
        }
        info!("tick driver stopped");
    }

    fn dispatch_tick(
        &self,
        in_flight: &Arc<Mutex<HashSet<TenantId>>>,
        tasks: &mut JoinSet<()>,
    ) {
        let now = chrono::Utc::now();
        for tenant in self.orchestrator.tenants() {
            if !in_flight.lock().insert(tenant) {
                debug!(tenant = %tenant, "previous tick still running; skipping");
                continue;
            }
            let orchestrator = Arc::clone(&self.orchestrator);
            let in_flight = Arc::clone(in_flight);
            tasks.spawn(async move {
                orchestrator.process_tenant(tenant, now).await;
                in_flight.lock().remove(&tenant);
            });
        }
    }
}
