//! Events emitted by orchestrator operations.
//!
//! Every mutating room operation returns the events it produced. The
//! gateway collaborator (out of scope) forwards them to the room's
//! connected clients. Events are room-scoped: the gateway already
//! knows which room an operation targeted, so the events carry only
//! the payload a client needs.

use serde::{Deserialize, Serialize};

use crate::{PlayerId, PlayerResult, RoomId};

/// Something observable happened in a room.
///
/// `#[serde(tag = "type")]` gives the gateway a flat, self-describing
/// JSON shape: `{ "type": "TurnChanged", "player_id": "..." }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RoomEvent {
    /// A room came into existence. Never returned by an engine call —
    /// `create_room` yields the new room's overview directly, and the
    /// gateway synthesizes this event from it when announcing the
    /// room to lobby clients.
    RoomCreated { room_id: RoomId },

    /// A player took a seat.
    PlayerJoined { player_id: PlayerId },

    /// A player gave up their seat.
    PlayerLeft { player_id: PlayerId },

    /// The game started (capacity reached or explicit start).
    GameStarted,

    /// The current turn-holder made an accepted move. The move payload
    /// itself is opaque; clients re-read state through the gateway.
    MoveMade { player_id: PlayerId },

    /// The turn passed to a new occupant.
    TurnChanged { player_id: PlayerId },

    /// The game reached a terminal state. `results` is empty for
    /// abandoned games.
    GameEnded { results: Vec<PlayerResult> },

    /// A spectator started watching.
    SpectatorJoined { player_id: PlayerId },

    /// A spectator stopped watching.
    SpectatorLeft { player_id: PlayerId },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Outcome;

    #[test]
    fn test_room_event_room_created_json_format() {
        let room_id = RoomId::new();
        let json = serde_json::to_value(RoomEvent::RoomCreated { room_id }).unwrap();
        assert_eq!(json["type"], "RoomCreated");
        assert_eq!(json["room_id"], serde_json::json!(room_id.0));
    }

    #[test]
    fn test_room_event_turn_changed_json_format() {
        let player_id = PlayerId::new();
        let json = serde_json::to_value(RoomEvent::TurnChanged { player_id }).unwrap();
        assert_eq!(json["type"], "TurnChanged");
        assert_eq!(json["player_id"], serde_json::json!(player_id.0));
    }

    #[test]
    fn test_room_event_game_ended_round_trip() {
        let event = RoomEvent::GameEnded {
            results: vec![PlayerResult {
                player_id: PlayerId::new(),
                outcome: Outcome::Win,
                rating_delta: 25,
            }],
        };
        let bytes = serde_json::to_vec(&event).unwrap();
        let decoded: RoomEvent = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(event, decoded);
    }

    #[test]
    fn test_room_event_unknown_type_fails_to_decode() {
        let unknown = r#"{"type": "RoomExploded"}"#;
        let result: Result<RoomEvent, _> = serde_json::from_str(unknown);
        assert!(result.is_err());
    }
}
