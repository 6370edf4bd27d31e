//! Shared mutable state.
//!
//! The channel registry and the route registry are the only two pieces
//! of state shared between the tick driver and the inbound consumers;
//! the plan registry retains the per-tenant planner inputs the driver
//! needs to re-plan a new day. All three use reader/writer locks and
//! hand out owned snapshots - callers never hold a lock across I/O.

mod channel;
mod plan;
mod route;

pub use channel::ChannelRegistry;
pub use plan::{DayPlan, PlanRegistry};
pub use route::{RegistryError, RouteRegistry};
