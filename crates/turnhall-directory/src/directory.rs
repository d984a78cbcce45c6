//! The player directory: a concurrent registry of known players.

use chrono::{Duration, Utc};
use dashmap::DashMap;
use turnhall_protocol::{PlayerId, PlayerResult};

use crate::{DirectoryError, Player};

/// Tracks every player the server knows about.
///
/// Shared as `Arc<PlayerDirectory>` across connection handlers, the
/// orchestrator, and the matchmaker. All methods take `&self`; the
/// `DashMap` shards writes so unrelated players never contend.
#[derive(Default)]
pub struct PlayerDirectory {
    players: DashMap<PlayerId, Player>,
}

impl PlayerDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self {
            players: DashMap::new(),
        }
    }

    /// Marks a player as connected, creating the record on first sight.
    ///
    /// Reconnecting keeps accumulated statistics but refreshes the
    /// display name and activity timestamp.
    pub fn connect(&self, player_id: PlayerId, name: impl Into<String>) {
        let name = name.into();
        if let Some(mut player) = self.players.get_mut(&player_id) {
            player.connected = true;
            player.name = name;
            player.last_seen = Utc::now();
            tracing::debug!(%player_id, "player reconnected");
            return;
        }
        self.players.insert(player_id, Player::new(player_id, name));
        tracing::info!(%player_id, "player registered");
    }

    /// Marks a player as disconnected. Unknown players are ignored —
    /// a disconnect for a player we never saw is not an error.
    pub fn disconnect(&self, player_id: PlayerId) {
        if let Some(mut player) = self.players.get_mut(&player_id) {
            player.connected = false;
            player.last_seen = Utc::now();
            tracing::debug!(%player_id, "player disconnected");
        }
    }

    /// Refreshes a player's last-activity timestamp.
    pub fn touch(&self, player_id: PlayerId) {
        if let Some(mut player) = self.players.get_mut(&player_id) {
            player.last_seen = Utc::now();
        }
    }

    /// Returns a copy of the player record.
    pub fn get(&self, player_id: PlayerId) -> Option<Player> {
        self.players.get(&player_id).map(|p| p.clone())
    }

    /// Returns a player's current rating, if known.
    pub fn rating(&self, player_id: PlayerId) -> Option<i32> {
        self.players.get(&player_id).map(|p| p.stats.rating)
    }

    /// Applies one game result to a player's statistics.
    ///
    /// # Errors
    /// Returns [`DirectoryError::NotFound`] if the player is unknown;
    /// the caller decides whether that is fatal (the orchestrator
    /// treats it as a logged warning).
    pub fn apply_result(&self, result: &PlayerResult) -> Result<(), DirectoryError> {
        let mut player = self
            .players
            .get_mut(&result.player_id)
            .ok_or(DirectoryError::NotFound(result.player_id))?;
        player.stats.record(result.outcome, result.rating_delta);
        tracing::info!(
            player_id = %result.player_id,
            outcome = ?result.outcome,
            rating = player.stats.rating,
            "game result applied"
        );
        Ok(())
    }

    /// Evicts offline players whose last activity is older than
    /// `window`. Connected players are never evicted, no matter how
    /// idle. Returns the evicted ids.
    pub fn evict_inactive(&self, window: Duration) -> Vec<PlayerId> {
        let cutoff = Utc::now() - window;
        let mut evicted = Vec::new();
        self.players.retain(|id, player| {
            if !player.connected && player.last_seen < cutoff {
                evicted.push(*id);
                false
            } else {
                true
            }
        });
        if !evicted.is_empty() {
            tracing::info!(count = evicted.len(), "evicted inactive players");
        }
        evicted
    }

    /// Number of players currently connected.
    pub fn connected_count(&self) -> usize {
        self.players.iter().filter(|p| p.connected).count()
    }

    /// Number of known players (any status).
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Returns `true` if no players are known.
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use turnhall_protocol::Outcome;

    fn pid() -> PlayerId {
        PlayerId::new()
    }

    #[test]
    fn test_connect_new_player_registers_with_default_stats() {
        let dir = PlayerDirectory::new();
        let id = pid();

        dir.connect(id, "alice");

        let player = dir.get(id).expect("player should exist");
        assert!(player.connected);
        assert_eq!(player.name, "alice");
        assert_eq!(player.stats.played, 0);
        assert_eq!(dir.rating(id), Some(crate::player::INITIAL_RATING));
    }

    #[test]
    fn test_connect_again_preserves_stats() {
        let dir = PlayerDirectory::new();
        let id = pid();
        dir.connect(id, "alice");
        dir.apply_result(&PlayerResult {
            player_id: id,
            outcome: Outcome::Win,
            rating_delta: 10,
        })
        .unwrap();
        dir.disconnect(id);

        dir.connect(id, "alice2");

        let player = dir.get(id).unwrap();
        assert!(player.connected);
        assert_eq!(player.name, "alice2");
        assert_eq!(player.stats.won, 1);
        assert_eq!(player.stats.rating, 1010);
    }

    #[test]
    fn test_disconnect_marks_offline() {
        let dir = PlayerDirectory::new();
        let id = pid();
        dir.connect(id, "bob");

        dir.disconnect(id);

        assert!(!dir.get(id).unwrap().connected);
        assert_eq!(dir.connected_count(), 0);
    }

    #[test]
    fn test_apply_result_unknown_player_returns_not_found() {
        let dir = PlayerDirectory::new();
        let result = dir.apply_result(&PlayerResult {
            player_id: pid(),
            outcome: Outcome::Loss,
            rating_delta: -10,
        });
        assert!(matches!(result, Err(DirectoryError::NotFound(_))));
    }

    #[test]
    fn test_evict_inactive_removes_only_stale_offline_players() {
        let dir = PlayerDirectory::new();
        let offline = pid();
        let online = pid();
        dir.connect(offline, "idle");
        dir.connect(online, "active");
        dir.disconnect(offline);

        // Zero-width window: anything last seen before "now" is stale.
        let evicted = dir.evict_inactive(Duration::zero());

        assert_eq!(evicted, vec![offline]);
        assert!(dir.get(offline).is_none());
        assert!(dir.get(online).is_some(), "connected players survive");
    }

    #[test]
    fn test_evict_inactive_keeps_recent_offline_players() {
        let dir = PlayerDirectory::new();
        let id = pid();
        dir.connect(id, "brief");
        dir.disconnect(id);

        let evicted = dir.evict_inactive(Duration::hours(1));

        assert!(evicted.is_empty());
        assert!(dir.get(id).is_some());
    }
}
