//! Pure domain model for the transit route orchestrator.
//!
//! Everything in this crate is deterministic and side-effect free: given
//! the same routes, vessels and clock instant, the planner and the phase
//! evaluator always produce the same answer. The runtime crate layers
//! registries, I/O and the tick loop on top.
//!
//! # Domain
//!
//! A [`Route`] is a directed periodic transport service (a ferry or a
//! train line) between two maps. The [`schedule`] module expands routes
//! and [`SharedVessel`] bindings into the day's concrete [`Trip`]s; the
//! [`phase`] module derives, for any instant, which [`RoutePhase`] a
//! route is in and whether that differs from its recorded phase.
//!
//! ```
//! use chrono::{Duration, TimeZone, Utc};
//! use transit_core::{phase, schedule, Route, RouteConfig, RoutePhase};
//! use transit_types::{MapId, RouteId};
//!
//! let route = Route::new(RouteConfig {
//!     id: RouteId::new(),
//!     name: "Harbor Ferry".into(),
//!     start_map: MapId(100),
//!     staging_map: MapId(101),
//!     en_route_maps: vec![MapId(102)],
//!     destination_map: MapId(103),
//!     observation_map: MapId(104),
//!     boarding_window: Duration::minutes(5),
//!     pre_departure: Duration::minutes(2),
//!     travel: Duration::minutes(10),
//!     cycle_interval: Duration::minutes(30),
//! })
//! .unwrap();
//!
//! let day = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
//! let trips = schedule::plan_day(std::slice::from_ref(&route), &[], day);
//! assert_eq!(trips.len(), 48);
//!
//! let own = schedule::schedule_for_route(route.id(), &trips);
//! let route = route.with_schedule(own);
//! let (now_phase, changed) = phase::evaluate(&route, day + Duration::minutes(1));
//! assert_eq!(now_phase, RoutePhase::OpenEntry);
//! assert!(changed);
//! ```

mod error;
pub mod phase;
mod route;
pub mod schedule;
mod trip;
mod vessel;

pub use error::ValidationError;
pub use phase::{PhaseSnapshot, RoutePhase};
pub use route::{Route, RouteConfig};
pub use trip::Trip;
pub use vessel::SharedVessel;
