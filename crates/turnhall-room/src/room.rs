//! The room model: occupants, spectators, lifecycle, and turn order.
//!
//! `Room` is plain data plus synchronous rules about membership and
//! rotation. Everything async (serialization of mutations, contract
//! calls, persistence) lives in the actor that owns a `Room`; keeping
//! the model pure makes the turn-order invariants unit-testable.

use std::collections::HashSet;
use std::time::Duration;

use chrono::{DateTime, Utc};
use turnhall_protocol::{GameType, PlayerId, RoomId, RoomSnapshot, RoomState};

use crate::RoomError;

/// A bounded multiplayer session container.
///
/// Occupants are kept in **join order** — the first turn-holder and
/// all rotation are defined over this sequence, never over a map's
/// iteration order.
#[derive(Debug, Clone)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub game_type: GameType,
    pub max_players: usize,
    pub private: bool,
    pub secret: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    pub state: RoomState,
    occupants: Vec<PlayerId>,
    spectators: HashSet<PlayerId>,
    /// Opaque blob owned by the matching rules contract.
    pub rules_state: Option<serde_json::Value>,
    pub current_turn: Option<PlayerId>,
    pub turn_started_at: Option<DateTime<Utc>>,
    pub turn_timeout: Duration,
}

/// What removing an occupant did to the room, beyond the removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveEffect {
    /// Room still going; nothing else changed.
    None,
    /// The leaver held the turn; it passed to this occupant.
    TurnPassed(PlayerId),
    /// Occupancy dropped below 2 mid-game; the room is now Abandoned.
    Abandoned,
    /// The last occupant left; the room should be deleted.
    Empty,
}

impl Room {
    pub fn new(
        id: RoomId,
        name: impl Into<String>,
        game_type: GameType,
        max_players: usize,
        private: bool,
        secret: Option<String>,
        turn_timeout: Duration,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: name.into(),
            game_type,
            max_players,
            private,
            secret,
            created_at: now,
            last_activity: now,
            state: RoomState::Waiting,
            occupants: Vec::new(),
            spectators: HashSet::new(),
            rules_state: None,
            current_turn: None,
            turn_started_at: None,
            turn_timeout,
        }
    }

    /// Occupants in join order.
    pub fn occupants(&self) -> &[PlayerId] {
        &self.occupants
    }

    pub fn occupant_count(&self) -> usize {
        self.occupants.len()
    }

    pub fn is_full(&self) -> bool {
        self.occupants.len() >= self.max_players
    }

    pub fn has_occupant(&self, player_id: PlayerId) -> bool {
        self.occupants.contains(&player_id)
    }

    pub fn spectators(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.spectators.iter().copied()
    }

    pub fn has_spectator(&self, player_id: PlayerId) -> bool {
        self.spectators.contains(&player_id)
    }

    /// Refreshes the last-activity timestamp.
    pub fn touch(&mut self) {
        self.last_activity = Utc::now();
    }

    /// Validates a join attempt and inserts the player at the end of
    /// the join order.
    pub fn add_occupant(
        &mut self,
        player_id: PlayerId,
        secret: Option<&str>,
    ) -> Result<(), RoomError> {
        if !self.state.is_joinable() {
            return Err(RoomError::NotWaiting(self.id));
        }
        if self.occupants.contains(&player_id) {
            return Err(RoomError::AlreadyJoined(player_id, self.id));
        }
        if self.is_full() {
            return Err(RoomError::Full(self.id));
        }
        if let Some(expected) = &self.secret {
            if secret != Some(expected.as_str()) {
                return Err(RoomError::BadSecret(self.id));
            }
        }
        self.occupants.push(player_id);
        self.touch();
        Ok(())
    }

    /// Removes an occupant and reports the knock-on effect.
    ///
    /// Rotation is defined over the *current* occupants: if the leaver
    /// held the turn, the occupant now sitting at the leaver's old
    /// position (wrapping) inherits it, so a departure never stalls
    /// the game.
    pub fn remove_occupant(&mut self, player_id: PlayerId) -> Result<LeaveEffect, RoomError> {
        let pos = self
            .occupants
            .iter()
            .position(|id| *id == player_id)
            .ok_or(RoomError::NotOccupant(player_id, self.id))?;
        self.occupants.remove(pos);
        self.touch();

        if self.occupants.is_empty() {
            return Ok(LeaveEffect::Empty);
        }

        if self.state.is_playing() && self.occupants.len() < 2 {
            self.abandon();
            return Ok(LeaveEffect::Abandoned);
        }

        if self.state.is_playing() && self.current_turn == Some(player_id) {
            let next = self.occupants[pos % self.occupants.len()];
            self.set_turn(next);
            return Ok(LeaveEffect::TurnPassed(next));
        }

        Ok(LeaveEffect::None)
    }

    /// Adds a spectator. Returns `false` (idempotent success) if the
    /// player is already watching.
    pub fn add_spectator(&mut self, player_id: PlayerId) -> Result<bool, RoomError> {
        if self.occupants.contains(&player_id) {
            return Err(RoomError::SpectatorIsOccupant(player_id, self.id));
        }
        Ok(self.spectators.insert(player_id))
    }

    pub fn remove_spectator(&mut self, player_id: PlayerId) -> Result<(), RoomError> {
        if !self.spectators.remove(&player_id) {
            return Err(RoomError::NotSpectating(player_id, self.id));
        }
        Ok(())
    }

    /// Transitions `Waiting` → `Playing` with a freshly initialized
    /// rules-state. The first turn-holder is the first occupant in
    /// join order.
    pub fn start(&mut self, rules_state: serde_json::Value) -> PlayerId {
        let first = self.occupants[0];
        self.rules_state = Some(rules_state);
        self.state = RoomState::Playing;
        self.set_turn(first);
        self.touch();
        first
    }

    /// Advances the turn round-robin past `mover` over the current
    /// occupants, returning the new holder.
    pub fn advance_turn(&mut self, mover: PlayerId) -> PlayerId {
        let pos = self
            .occupants
            .iter()
            .position(|id| *id == mover)
            .expect("turn holder is an occupant");
        let next = self.occupants[(pos + 1) % self.occupants.len()];
        self.set_turn(next);
        next
    }

    fn set_turn(&mut self, player_id: PlayerId) {
        self.current_turn = Some(player_id);
        self.turn_started_at = Some(Utc::now());
    }

    /// Terminal transition for a completed game.
    pub fn finish(&mut self) {
        self.state = RoomState::Finished;
        self.current_turn = None;
        self.turn_started_at = None;
        self.touch();
    }

    /// Terminal transition for an abandoned game.
    pub fn abandon(&mut self) {
        self.state = RoomState::Abandoned;
        self.current_turn = None;
        self.turn_started_at = None;
        self.touch();
    }

    /// Projects the room into its persisted form.
    pub fn to_snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            room_id: self.id,
            name: self.name.clone(),
            game_type: self.game_type.clone(),
            max_players: self.max_players,
            private: self.private,
            secret: self.secret.clone(),
            created_at: self.created_at,
            state: self.state,
            occupants: self.occupants.clone(),
            spectators: self.spectators.iter().copied().collect(),
            rules_state: self.rules_state.clone(),
            current_turn: self.current_turn,
            turn_started_at: self.turn_started_at,
            turn_timeout_secs: self.turn_timeout.as_secs(),
            last_updated: Utc::now(),
        }
    }

    /// Reconstructs a room verbatim from a persisted snapshot,
    /// including rules-state and turn pointer.
    pub fn from_snapshot(snapshot: RoomSnapshot) -> Self {
        Self {
            id: snapshot.room_id,
            name: snapshot.name,
            game_type: snapshot.game_type,
            max_players: snapshot.max_players,
            private: snapshot.private,
            secret: snapshot.secret,
            created_at: snapshot.created_at,
            last_activity: snapshot.last_updated,
            state: snapshot.state,
            occupants: snapshot.occupants,
            spectators: snapshot.spectators.into_iter().collect(),
            rules_state: snapshot.rules_state,
            current_turn: snapshot.current_turn,
            turn_started_at: snapshot.turn_started_at,
            turn_timeout: Duration::from_secs(snapshot.turn_timeout_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(max_players: usize) -> Room {
        Room::new(
            RoomId::new(),
            "test",
            GameType::from("x"),
            max_players,
            false,
            None,
            Duration::from_secs(60),
        )
    }

    fn pid() -> PlayerId {
        PlayerId::new()
    }

    #[test]
    fn test_add_occupant_preserves_join_order() {
        let mut r = room(3);
        let (a, b, c) = (pid(), pid(), pid());
        r.add_occupant(a, None).unwrap();
        r.add_occupant(b, None).unwrap();
        r.add_occupant(c, None).unwrap();
        assert_eq!(r.occupants(), &[a, b, c]);
    }

    #[test]
    fn test_add_occupant_full_room_rejected() {
        let mut r = room(2);
        r.add_occupant(pid(), None).unwrap();
        r.add_occupant(pid(), None).unwrap();
        assert!(matches!(r.add_occupant(pid(), None), Err(RoomError::Full(_))));
        assert!(r.occupant_count() <= r.max_players);
    }

    #[test]
    fn test_add_occupant_twice_rejected() {
        let mut r = room(3);
        let a = pid();
        r.add_occupant(a, None).unwrap();
        assert!(matches!(
            r.add_occupant(a, None),
            Err(RoomError::AlreadyJoined(_, _))
        ));
    }

    #[test]
    fn test_add_occupant_wrong_secret_rejected() {
        let mut r = room(2);
        r.secret = Some("hunter2".into());
        assert!(matches!(
            r.add_occupant(pid(), Some("wrong")),
            Err(RoomError::BadSecret(_))
        ));
        assert!(matches!(
            r.add_occupant(pid(), None),
            Err(RoomError::BadSecret(_))
        ));
        assert!(r.add_occupant(pid(), Some("hunter2")).is_ok());
    }

    #[test]
    fn test_add_occupant_after_start_rejected() {
        let mut r = room(3);
        r.add_occupant(pid(), None).unwrap();
        r.add_occupant(pid(), None).unwrap();
        r.start(serde_json::json!({}));
        assert!(matches!(
            r.add_occupant(pid(), None),
            Err(RoomError::NotWaiting(_))
        ));
    }

    #[test]
    fn test_start_assigns_first_joiner_the_turn() {
        let mut r = room(2);
        let (a, b) = (pid(), pid());
        r.add_occupant(a, None).unwrap();
        r.add_occupant(b, None).unwrap();

        let first = r.start(serde_json::json!({}));

        assert_eq!(first, a);
        assert_eq!(r.current_turn, Some(a));
        assert_eq!(r.state, RoomState::Playing);
        assert!(r.turn_started_at.is_some());
    }

    #[test]
    fn test_advance_turn_is_round_robin() {
        let mut r = room(3);
        let (a, b, c) = (pid(), pid(), pid());
        for p in [a, b, c] {
            r.add_occupant(p, None).unwrap();
        }
        r.start(serde_json::json!({}));

        assert_eq!(r.advance_turn(a), b);
        assert_eq!(r.advance_turn(b), c);
        assert_eq!(r.advance_turn(c), a, "rotation wraps to the first occupant");
    }

    #[test]
    fn test_remove_turn_holder_passes_turn_without_stalling() {
        let mut r = room(3);
        let (a, b, c) = (pid(), pid(), pid());
        for p in [a, b, c] {
            r.add_occupant(p, None).unwrap();
        }
        r.start(serde_json::json!({}));
        r.advance_turn(a); // turn: b

        let effect = r.remove_occupant(b).unwrap();

        assert_eq!(effect, LeaveEffect::TurnPassed(c));
        assert_eq!(r.current_turn, Some(c));
        assert_eq!(r.state, RoomState::Playing);
        // Rotation continues over the survivors.
        assert_eq!(r.advance_turn(c), a);
    }

    #[test]
    fn test_remove_last_position_turn_holder_wraps_to_first() {
        let mut r = room(3);
        let (a, b, c) = (pid(), pid(), pid());
        for p in [a, b, c] {
            r.add_occupant(p, None).unwrap();
        }
        r.start(serde_json::json!({}));
        r.advance_turn(a);
        r.advance_turn(b); // turn: c, last in join order

        let effect = r.remove_occupant(c).unwrap();

        assert_eq!(effect, LeaveEffect::TurnPassed(a));
    }

    #[test]
    fn test_remove_occupant_below_two_while_playing_abandons() {
        let mut r = room(2);
        let (a, b) = (pid(), pid());
        r.add_occupant(a, None).unwrap();
        r.add_occupant(b, None).unwrap();
        r.start(serde_json::json!({}));

        let effect = r.remove_occupant(a).unwrap();

        assert_eq!(effect, LeaveEffect::Abandoned);
        assert_eq!(r.state, RoomState::Abandoned);
        assert_eq!(r.current_turn, None);
    }

    #[test]
    fn test_remove_last_occupant_reports_empty() {
        let mut r = room(2);
        let a = pid();
        r.add_occupant(a, None).unwrap();
        assert_eq!(r.remove_occupant(a).unwrap(), LeaveEffect::Empty);
    }

    #[test]
    fn test_remove_unknown_occupant_rejected() {
        let mut r = room(2);
        assert!(matches!(
            r.remove_occupant(pid()),
            Err(RoomError::NotOccupant(_, _))
        ));
    }

    #[test]
    fn test_spectator_cannot_be_an_occupant() {
        let mut r = room(2);
        let a = pid();
        r.add_occupant(a, None).unwrap();
        assert!(matches!(
            r.add_spectator(a),
            Err(RoomError::SpectatorIsOccupant(_, _))
        ));
    }

    #[test]
    fn test_add_spectator_is_idempotent() {
        let mut r = room(2);
        let s = pid();
        assert!(r.add_spectator(s).unwrap());
        assert!(!r.add_spectator(s).unwrap(), "second add is a no-op success");
    }

    #[test]
    fn test_remove_spectator_unknown_rejected() {
        let mut r = room(2);
        assert!(matches!(
            r.remove_spectator(pid()),
            Err(RoomError::NotSpectating(_, _))
        ));
    }

    #[test]
    fn test_snapshot_round_trip_reconstructs_room_verbatim() {
        let mut r = room(2);
        let (a, b) = (pid(), pid());
        r.add_occupant(a, None).unwrap();
        r.add_occupant(b, None).unwrap();
        r.add_spectator(pid()).unwrap();
        r.start(serde_json::json!({ "board": [0, 1, 2] }));
        r.advance_turn(a);

        let restored = Room::from_snapshot(r.to_snapshot());

        assert_eq!(restored.id, r.id);
        assert_eq!(restored.state, RoomState::Playing);
        assert_eq!(restored.occupants(), r.occupants());
        assert_eq!(restored.current_turn, Some(b));
        assert_eq!(restored.rules_state, r.rules_state);
        assert_eq!(restored.turn_timeout, r.turn_timeout);
    }
}
