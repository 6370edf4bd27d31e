//! Core types for the transit route orchestrator.
//!
//! This crate is the bottom layer of the workspace; every other crate
//! depends on it and it depends on nothing but `serde` and `uuid`.
//!
//! ```text
//! transit-types   : identifiers, ChannelEndpoint, ErrorCode   ◄── HERE
//! transit-core    : Route / Trip / SharedVessel, planner, evaluator
//! transit-runtime : registries, orchestrator, fetchers, bus
//! transit-svc     : service binary
//! ```
//!
//! # Identifier design
//!
//! Tenants, routes and vessels are identified by UUIDs assigned by the
//! configuration service; they are safe to transmit across processes and
//! never minted locally outside of tests. World, channel, map and
//! character ids are the small integers the game protocol uses on the
//! wire (`u16`/`u8`/`u32`); they are newtyped so a map id cannot be
//! handed to a parameter expecting a character id.
//!
//! # Example
//!
//! ```
//! use transit_types::{ChannelEndpoint, ChannelId, MapId, RouteId, WorldId};
//!
//! let route = RouteId::new();
//! let endpoint = ChannelEndpoint::new(WorldId(0), ChannelId(1));
//! assert_eq!(endpoint.to_string(), "w0:c1");
//! let _ = (route, MapId(101000300));
//! ```

mod endpoint;
mod error;
mod id;

pub use endpoint::ChannelEndpoint;
pub use error::{assert_error_code, assert_error_codes, ErrorCode};
pub use id::{ChannelId, CharacterId, MapId, RouteId, TenantId, TripId, VesselId, WorldId};
