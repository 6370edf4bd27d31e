//! Live channel endpoints.

use crate::{ChannelId, WorldId};
use serde::{Deserialize, Serialize};

/// A live `(world, channel)` backend instance hosting players.
///
/// Endpoints are the fan-out targets for character warps: a warp for a
/// map is issued once per endpoint currently registered for the tenant.
/// Identity is the pair; there is no payload beyond it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChannelEndpoint {
    pub world: WorldId,
    pub channel: ChannelId,
}

impl ChannelEndpoint {
    #[must_use]
    pub fn new(world: WorldId, channel: ChannelId) -> Self {
        Self { world, channel }
    }
}

impl std::fmt::Display for ChannelEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "w{}:c{}", self.world, self.channel)
    }
}
