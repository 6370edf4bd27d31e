//! Runtime for the transit route orchestrator.
//!
//! This crate owns everything that is neither pure domain logic
//! (`transit-core`) nor process wiring (`transit-svc`):
//!
//! - [`registry`] - the two pieces of shared mutable state (routes and
//!   channel endpoints), plus the retained per-tenant day plan
//! - [`bus`] - outbound message buffer, the [`bus::BusSink`] port the
//!   broker driver implements, and an in-process [`bus::LocalBus`]
//! - [`outbound`] - the wire shapes of warp commands and status events
//! - [`fetch`] - collaborator fetcher ports and their REST
//!   implementations (map, portal, tenant and configuration services)
//! - [`orchestrator`] - the per-route transaction, the logout
//!   correction path and the 1 Hz tick driver
//! - [`consumer`] - inbound channel-lifecycle and character-status
//!   event decoding and dispatch
//! - [`loader`] - startup bootstrap of tenants into the registries
//! - [`api`] - the read queries the HTTP collaborator serves
//! - [`config`] - process configuration from the environment
//! - [`testing`] - in-memory fakes for all of the ports
//!
//! # Concurrency model
//!
//! One driver task ticks at 1 Hz. Per tick, tenants are processed in
//! parallel tasks and a tenant whose previous tick is still running is
//! skipped. Within a tenant, each route runs its own strictly
//! sequential transaction. Registries use reader/writer locks and no
//! lock is ever held across collaborator I/O - transactions work on
//! value snapshots and re-acquire only to swap a route value back in.

pub mod api;
pub mod bus;
pub mod config;
pub mod consumer;
pub mod fetch;
pub mod loader;
pub mod orchestrator;
pub mod outbound;
pub mod registry;
pub mod testing;

pub use api::ReadApi;
pub use config::{ServiceConfig, Topics};
pub use orchestrator::{Driver, Orchestrator};
pub use registry::{ChannelRegistry, PlanRegistry, RouteRegistry};
