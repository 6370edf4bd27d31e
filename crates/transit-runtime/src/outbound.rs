//! Wire shapes of outbound messages.
//!
//! Two message families leave this service: `CHANGE_MAP` commands on
//! the character command topic (one per warped character, keyed by the
//! character id) and transport status events (keyed by the route id).

use crate::bus::{BusError, BusMessage};
use serde::{Deserialize, Serialize};
use transit_types::{ChannelEndpoint, CharacterId, MapId, RouteId};

pub const COMMAND_CHANGE_MAP: &str = "CHANGE_MAP";
pub const STATUS_ARRIVED: &str = "ARRIVED";
pub const STATUS_DEPARTED: &str = "DEPARTED";

/// Command asking the character service to move a player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterCommand {
    pub world_id: u16,
    pub character_id: u32,
    #[serde(rename = "type")]
    pub kind: String,
    pub body: ChangeMapBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeMapBody {
    pub channel_id: u8,
    pub map_id: u32,
    pub portal_id: u32,
}

/// Phase-change notification for NPC/UI observers of a transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportStatusEvent {
    pub route_id: RouteId,
    #[serde(rename = "type")]
    pub kind: String,
    pub body: TransportStatusBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportStatusBody {
    pub map_id: u32,
}

/// Builds a warp command for one character, keyed by the character id
/// in decimal string bytes.
pub fn change_map(
    endpoint: ChannelEndpoint,
    character: CharacterId,
    map: MapId,
    portal_id: u32,
) -> Result<BusMessage, BusError> {
    let command = CharacterCommand {
        world_id: endpoint.world.0,
        character_id: character.0,
        kind: COMMAND_CHANGE_MAP.to_string(),
        body: ChangeMapBody {
            channel_id: endpoint.channel.0,
            map_id: map.0,
            portal_id,
        },
    };
    BusMessage::json(character.0.to_string().into_bytes(), &command)
}

/// Builds an `ARRIVED` status event, keyed by the route uuid string.
pub fn route_arrived(route: RouteId, map: MapId) -> Result<BusMessage, BusError> {
    status_event(route, STATUS_ARRIVED, map)
}

/// Builds a `DEPARTED` status event, keyed by the route uuid string.
pub fn route_departed(route: RouteId, map: MapId) -> Result<BusMessage, BusError> {
    status_event(route, STATUS_DEPARTED, map)
}

fn status_event(route: RouteId, kind: &str, map: MapId) -> Result<BusMessage, BusError> {
    let event = TransportStatusEvent {
        route_id: route,
        kind: kind.to_string(),
        body: TransportStatusBody { map_id: map.0 },
    };
    BusMessage::json(route.uuid().to_string().into_bytes(), &event)
}
