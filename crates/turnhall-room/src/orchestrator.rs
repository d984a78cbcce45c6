//! The room orchestrator: creates rooms, routes operations to their
//! actors, and rebuilds rooms from snapshots on startup.

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use turnhall_directory::PlayerDirectory;
use turnhall_protocol::{
    GameType, PlayerId, PlayerMove, PlayerResult, RoomEvent, RoomId, RoomSnapshot, RoomState,
};
use turnhall_rules::RulesRegistry;
use turnhall_snapshot::{SnapshotError, SnapshotStore};

use crate::actor::{RoomOverview, spawn_room};
use crate::{Room, RoomConfig, RoomError, RoomHandle};

/// Owns the authoritative set of rooms.
///
/// Shared as `Arc<RoomOrchestrator>` — every method takes `&self`.
/// The handle map is a `DashMap`, so concurrent callers touching
/// different rooms never contend; mutations *within* a room are
/// serialized by that room's actor.
pub struct RoomOrchestrator {
    rooms: DashMap<RoomId, RoomHandle>,
    registry: Arc<RulesRegistry>,
    directory: Arc<PlayerDirectory>,
    store: Arc<dyn SnapshotStore>,
    config: RoomConfig,
}

impl RoomOrchestrator {
    pub fn new(
        registry: Arc<RulesRegistry>,
        directory: Arc<PlayerDirectory>,
        store: Arc<dyn SnapshotStore>,
        config: RoomConfig,
    ) -> Self {
        Self {
            rooms: DashMap::new(),
            registry,
            directory,
            store,
            config,
        }
    }

    /// Creates a room in `Waiting` and returns its initial overview.
    ///
    /// Fails early if the game type has no registered contract or the
    /// requested capacity falls outside what the contract allows —
    /// better than discovering it when the room fills up.
    pub fn create_room(
        &self,
        name: impl Into<String>,
        game_type: GameType,
        max_players: usize,
        private: bool,
        secret: Option<String>,
    ) -> Result<RoomOverview, RoomError> {
        let contract = self
            .registry
            .get(&game_type)
            .ok_or_else(|| RoomError::NoRulesForType(game_type.clone()))?;
        let min = contract.min_players().max(2);
        let max = contract.max_players();
        if max_players < min || max_players > max {
            return Err(RoomError::InvalidCapacity {
                requested: max_players,
                min,
                max,
            });
        }

        let room_id = RoomId::new();
        if self.rooms.contains_key(&room_id) {
            return Err(RoomError::DuplicateId(room_id));
        }

        let room = Room::new(
            room_id,
            name,
            game_type,
            max_players,
            private,
            secret,
            self.config.turn_timeout,
        );
        let overview = self.spawn(room);
        tracing::info!(%room_id, game_type = %overview.game_type, "room created");
        Ok(overview)
    }

    /// Seats a player. A join that fills the room also starts the game;
    /// the returned events include `GameStarted`/`TurnChanged` then.
    pub async fn join(
        &self,
        room_id: RoomId,
        player_id: PlayerId,
        secret: Option<String>,
    ) -> Result<Vec<RoomEvent>, RoomError> {
        let handle = self.handle(room_id)?;
        let reply = handle.join(player_id, secret).await?;
        Ok(reply.events)
    }

    /// Unseats a player. Deletes the room (and its snapshot) when the
    /// last occupant leaves; abandons a running game that drops below
    /// two occupants.
    pub async fn leave(
        &self,
        room_id: RoomId,
        player_id: PlayerId,
    ) -> Result<Vec<RoomEvent>, RoomError> {
        let handle = self.handle(room_id)?;
        let reply = handle.leave(player_id).await?;
        if reply.closed {
            self.rooms.remove(&room_id);
        }
        Ok(reply.events)
    }

    /// Starts a waiting game explicitly (joins normally auto-start at
    /// capacity; this covers starting below capacity, at >= 2 players).
    pub async fn start_game(&self, room_id: RoomId) -> Result<Vec<RoomEvent>, RoomError> {
        let handle = self.handle(room_id)?;
        Ok(handle.start().await?.events)
    }

    /// Validates and applies a move through the room's rules contract.
    pub async fn process_move(&self, mv: PlayerMove) -> Result<Vec<RoomEvent>, RoomError> {
        let handle = self.handle(mv.room_id)?;
        Ok(handle.process_move(mv).await?.events)
    }

    /// Forces a terminal state. `Finished` with results applies them to
    /// player statistics; `Abandoned` applies none. Force-ending an
    /// empty waiting room deletes it entirely.
    pub async fn end_game(
        &self,
        room_id: RoomId,
        to: RoomState,
        results: Option<Vec<PlayerResult>>,
    ) -> Result<Vec<RoomEvent>, RoomError> {
        let handle = self.handle(room_id)?;
        let reply = handle.end(to, results).await?;
        if reply.closed {
            self.rooms.remove(&room_id);
        }
        Ok(reply.events)
    }

    pub async fn add_spectator(
        &self,
        room_id: RoomId,
        player_id: PlayerId,
    ) -> Result<Vec<RoomEvent>, RoomError> {
        let handle = self.handle(room_id)?;
        Ok(handle.add_spectator(player_id).await?.events)
    }

    pub async fn remove_spectator(
        &self,
        room_id: RoomId,
        player_id: PlayerId,
    ) -> Result<Vec<RoomEvent>, RoomError> {
        let handle = self.handle(room_id)?;
        Ok(handle.remove_spectator(player_id).await?.events)
    }

    /// Looks up one room. `None` if it doesn't exist (or just closed).
    pub async fn room(&self, room_id: RoomId) -> Option<RoomOverview> {
        let handle = self.rooms.get(&room_id)?.clone();
        handle.overview().await.ok()
    }

    /// Overviews of all live rooms. Rooms whose actor fails to respond
    /// (mid-shutdown) are skipped.
    pub async fn rooms(&self) -> Vec<RoomOverview> {
        let handles: Vec<RoomHandle> = self.rooms.iter().map(|e| e.value().clone()).collect();
        let mut overviews = Vec::with_capacity(handles.len());
        for handle in handles {
            if let Ok(overview) = handle.overview().await {
                overviews.push(overview);
            }
        }
        overviews
    }

    /// Rooms a new player could join: `Waiting`, public, not full.
    pub async fn joinable_rooms(&self) -> Vec<RoomOverview> {
        self.rooms()
            .await
            .into_iter()
            .filter(|o| o.joinable())
            .collect()
    }

    /// Rooms in which the player currently holds a seat.
    pub async fn rooms_with_player(&self, player_id: PlayerId) -> Vec<RoomOverview> {
        self.rooms()
            .await
            .into_iter()
            .filter(|o| o.occupants.contains(&player_id))
            .collect()
    }

    /// Number of live rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Rebuilds rooms from persisted snapshots on startup.
    ///
    /// Snapshots older than the configured staleness threshold are
    /// deleted instead of restored; unreadable ones were already
    /// skipped by the store, and internally inconsistent ones are
    /// skipped here. Returns how many rooms were restored.
    pub async fn recover_from_snapshots(&self) -> Result<usize, SnapshotError> {
        let snapshots = self.store.load_all().await?;
        let stale_after = chrono::Duration::from_std(self.config.snapshot_stale_after)
            .unwrap_or_else(|_| chrono::Duration::hours(24));
        let now = Utc::now();
        let mut restored = 0;

        for snapshot in snapshots {
            if snapshot.age(now) > stale_after {
                tracing::info!(
                    room_id = %snapshot.room_id,
                    last_updated = %snapshot.last_updated,
                    "discarding stale snapshot"
                );
                if let Err(e) = self.store.delete(snapshot.room_id).await {
                    tracing::warn!(
                        room_id = %snapshot.room_id,
                        error = %e,
                        "could not delete stale snapshot"
                    );
                }
                continue;
            }
            if let Some(turn) = snapshot.current_turn {
                // A turn-holder who isn't seated would poison the room's
                // turn rotation. Skip the snapshot rather than restore a
                // room that can never advance.
                if !snapshot.occupants.contains(&turn) {
                    tracing::warn!(
                        room_id = %snapshot.room_id,
                        turn_holder = %turn,
                        "skipping malformed snapshot: turn holder not seated"
                    );
                    continue;
                }
            }
            self.restore(snapshot);
            restored += 1;
        }

        tracing::info!(restored, "snapshot recovery complete");
        Ok(restored)
    }

    fn restore(&self, snapshot: RoomSnapshot) {
        let room_id = snapshot.room_id;
        let room = Room::from_snapshot(snapshot);
        tracing::info!(%room_id, state = %room.state, "room restored from snapshot");
        self.spawn(room);
    }

    /// Stops every room actor. Snapshots stay behind for recovery.
    pub async fn shutdown(&self) {
        let handles: Vec<RoomHandle> = self.rooms.iter().map(|e| e.value().clone()).collect();
        for handle in handles {
            let _ = handle.shutdown().await;
        }
        self.rooms.clear();
        tracing::info!("room orchestrator shut down");
    }

    fn spawn(&self, room: Room) -> RoomOverview {
        let room_id = room.id;
        let overview = overview_of(&room);
        let handle = spawn_room(
            room,
            Arc::clone(&self.registry),
            Arc::clone(&self.directory),
            Arc::clone(&self.store),
            self.config.channel_size,
        );
        self.rooms.insert(room_id, handle);
        overview
    }

    fn handle(&self, room_id: RoomId) -> Result<RoomHandle, RoomError> {
        self.rooms
            .get(&room_id)
            .map(|e| e.value().clone())
            .ok_or(RoomError::NotFound(room_id))
    }
}

fn overview_of(room: &Room) -> RoomOverview {
    RoomOverview {
        room_id: room.id,
        name: room.name.clone(),
        game_type: room.game_type.clone(),
        state: room.state,
        occupants: room.occupants().to_vec(),
        spectators: room.spectators().collect(),
        max_players: room.max_players,
        private: room.private,
        current_turn: room.current_turn,
        turn_started_at: room.turn_started_at,
        turn_timeout: room.turn_timeout,
        created_at: room.created_at,
        last_activity: room.last_activity,
    }
}
