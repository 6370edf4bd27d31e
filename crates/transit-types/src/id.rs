//! Identifier newtypes.
//!
//! UUID-backed ids (tenant, route, vessel) come from the configuration
//! service; the `new()` constructors mint random v4 values and exist for
//! tests and sample data. Wire-integer ids carry the width the game
//! protocol uses for them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$doc:meta])* $name:ident, $prefix:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Mints a fresh random id.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Returns the inner UUID.
            #[must_use]
            pub fn uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $name {
            fn from(u: Uuid) -> Self {
                Self(u)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, ":{}"), self.0)
            }
        }
    };
}

uuid_id!(
    /// Identifier for an isolated customer partition.
    ///
    /// Every registry in the runtime is keyed by tenant first; no state
    /// is ever observed across tenants.
    TenantId,
    "tenant"
);

uuid_id!(
    /// Identifier for a transport route (a directed periodic service
    /// between two maps).
    RouteId,
    "route"
);

uuid_id!(
    /// Identifier for a shared vessel binding two opposite routes onto
    /// one alternating vehicle.
    VesselId,
    "vessel"
);

/// Identifier for one concrete scheduled run of a route.
///
/// Trip ids are deterministic within a scheduling pass
/// (`{route}_{departure}`) but fresh on every pass; they must not be
/// used as stable cross-process identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TripId(pub String);

impl TripId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TripId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

macro_rules! wire_id {
    ($(#[$doc:meta])* $name:ident, $inner:ty) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(pub $inner);

        impl From<$inner> for $name {
            fn from(v: $inner) -> Self {
                Self(v)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

wire_id!(
    /// A game world.
    WorldId,
    u16
);

wire_id!(
    /// A channel (backend instance) within a world.
    ChannelId,
    u8
);

wire_id!(
    /// An in-game map.
    MapId,
    u32
);

wire_id!(
    /// A player character.
    CharacterId,
    u32
);
