//! transitd - transport route orchestrator service.
//!
//! Boots the runtime: loads configuration from the environment,
//! bootstraps every tenant's routes and schedules, then runs the 1 Hz
//! tick driver and the inbound consumer until SIGINT.
//!
//! # Environment
//!
//! - `COMMAND_TOPIC_CHARACTER`, `EVENT_TOPIC_TRANSPORT_STATUS` - outbound topics
//! - `EVENT_TOPIC_CHANNEL_STATUS`, `EVENT_TOPIC_CHARACTER_STATUS` - inbound topics
//! - `MAPS`, `DATA`, `TENANTS` - collaborator service roots
//! - `REST_PORT` - port the HTTP surface binds (default 8080)
//! - `HTTP_TIMEOUT_MS` - per-call collaborator timeout (default 5000)
//! - `TICK_GRACE_MS` - shutdown grace for in-flight ticks (default 3000)
//! - `RUST_LOG` - tracing filter (default `info`)

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::EnvFilter;
use transit_runtime::bus::{BusSink, LocalBus};
use transit_runtime::consumer::{local_source, run_consumer, ConsumerRouter};
use transit_runtime::fetch::{
    RestCharacterLocator, RestPortalCatalog, RestRouteSource, RestTenantDirectory,
};
use transit_runtime::{
    loader, ChannelRegistry, Driver, Orchestrator, PlanRegistry, ReadApi, RouteRegistry,
    ServiceConfig,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    info!("starting transit service");

    let config = ServiceConfig::from_env().context("loading configuration")?;
    let client = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()
        .context("building http client")?;

    let routes = Arc::new(RouteRegistry::new());
    let channels = Arc::new(ChannelRegistry::new());
    let plans = Arc::new(PlanRegistry::new());

    let directory = RestTenantDirectory::new(client.clone(), config.tenants_root.clone());
    let route_source = RestRouteSource::new(client.clone(), config.tenants_root.clone());
    let locator = Arc::new(RestCharacterLocator::new(
        client.clone(),
        config.maps_root.clone(),
    ));
    let portals = Arc::new(RestPortalCatalog::new(client, config.data_root.clone()));

    let tenants = loader::bootstrap(
        &directory,
        &route_source,
        &routes,
        &plans,
        chrono::Utc::now(),
    )
    .await
    .context("loading tenants")?;
    info!(tenants = tenants.len(), "tenants installed");

    // The broker adapter plugs in at these two seams: it implements
    // BusSink for outbound publishes and feeds inbound envelopes into
    // the consumer source.
    let bus: Arc<dyn BusSink> = Arc::new(LocalBus::new());
    let (inbound_feed, inbound_source) = local_source(1024);

    let orchestrator = Arc::new(Orchestrator::new(
        Arc::clone(&routes),
        Arc::clone(&channels),
        Arc::clone(&plans),
        locator,
        portals,
        Arc::clone(&bus),
        config.topics.clone(),
    ));

    let _api = ReadApi::new(Arc::clone(&routes));
    info!(port = config.rest_port, "read API ready for the HTTP surface");

    let (stop_tx, stop_rx) = watch::channel(false);

    let router = Arc::new(ConsumerRouter::new(
        Arc::clone(&channels),
        Arc::clone(&orchestrator),
        config.topics.clone(),
    ));
    let consumer = tokio::spawn(run_consumer(inbound_source, router, stop_rx.clone()));

    let driver = tokio::spawn(Driver::new(orchestrator, stop_rx, config.tick_grace).run());

    tokio::signal::ctrl_c()
        .await
        .context("listening for shutdown signal")?;
    info!("shutdown signal received");
    stop_tx.send(true).ok();
    drop(inbound_feed);

    driver.await.context("joining driver task")?;
    consumer.await.context("joining consumer task")?;
    info!("transit service stopped");
    Ok(())
}
