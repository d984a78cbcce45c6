//! The matchmaking queue and its periodic pairing loop.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use turnhall_directory::{INITIAL_RATING, PlayerDirectory};
use turnhall_protocol::{GameType, PlayerId, RoomId, RoomState};
use turnhall_room::RoomOrchestrator;
use turnhall_rules::RulesRegistry;

use crate::queue::plan_pairs;
use crate::{MatchRequest, MatchmakerConfig, MatchmakerError};

/// Pairs queued players into fresh rooms.
///
/// Shared as `Arc<Matchmaker>`; `enqueue`/`dequeue` are the only
/// mutating entry points and both are idempotent. Pairing runs in a
/// background task started by [`spawn`](Self::spawn), or on demand via
/// [`run_tick`](Self::run_tick).
pub struct Matchmaker {
    queue: DashMap<PlayerId, MatchRequest>,
    registry: Arc<RulesRegistry>,
    directory: Arc<PlayerDirectory>,
    orchestrator: Arc<RoomOrchestrator>,
    config: MatchmakerConfig,
}

impl Matchmaker {
    pub fn new(
        registry: Arc<RulesRegistry>,
        directory: Arc<PlayerDirectory>,
        orchestrator: Arc<RoomOrchestrator>,
        config: MatchmakerConfig,
    ) -> Self {
        Self {
            queue: DashMap::new(),
            registry,
            directory,
            orchestrator,
            config,
        }
    }

    /// Queues a player for matching, snapshotting their current
    /// rating. Re-enqueuing replaces the prior request (and resets
    /// the wait clock).
    pub fn enqueue(
        &self,
        player_id: PlayerId,
        game_type: GameType,
        desired_rating: Option<i32>,
    ) -> Result<(), MatchmakerError> {
        if self.registry.get(&game_type).is_none() {
            return Err(MatchmakerError::UnknownGameType(game_type));
        }
        let rating = self.directory.rating(player_id).unwrap_or(INITIAL_RATING);
        let request = MatchRequest {
            player_id,
            game_type: game_type.clone(),
            rating,
            desired_rating,
            enqueued_at: Utc::now(),
        };
        if self.queue.insert(player_id, request).is_some() {
            tracing::debug!(%player_id, %game_type, "match request replaced");
        } else {
            tracing::info!(%player_id, %game_type, rating, "match request enqueued");
        }
        Ok(())
    }

    /// Withdraws a player's request. A player who was never queued is
    /// not an error.
    pub fn dequeue(&self, player_id: PlayerId) {
        if self.queue.remove(&player_id).is_some() {
            tracing::info!(%player_id, "match request withdrawn");
        }
    }

    /// Number of requests currently waiting.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Runs one pairing pass over the queue.
    ///
    /// Normally driven by the background loop; exposed so callers and
    /// tests can force a deterministic tick.
    pub async fn run_tick(&self) {
        let now = Utc::now();
        let mut buckets: HashMap<GameType, Vec<MatchRequest>> = HashMap::new();
        for entry in self.queue.iter() {
            buckets
                .entry(entry.game_type.clone())
                .or_default()
                .push(entry.value().clone());
        }

        for (game_type, mut bucket) in buckets {
            bucket.sort_by_key(|r| r.enqueued_at);
            for (a, b) in plan_pairs(&bucket, now, &self.config) {
                // Either side may have withdrawn since the snapshot.
                if !self.queue.contains_key(&a) || !self.queue.contains_key(&b) {
                    continue;
                }
                match self.place_pair(&game_type, a, b).await {
                    Ok(room_id) => {
                        self.queue.remove(&a);
                        self.queue.remove(&b);
                        tracing::info!(
                            %room_id,
                            %game_type,
                            player_a = %a,
                            player_b = %b,
                            "players matched"
                        );
                    }
                    Err(e) => {
                        // Both stay queued and retry next tick.
                        tracing::warn!(
                            %game_type,
                            player_a = %a,
                            player_b = %b,
                            error = %e,
                            "match placement failed"
                        );
                    }
                }
            }
        }
    }

    /// Creates a private 2-player room and seats both players; the
    /// second join starts the game. Unwinds on partial failure so no
    /// half-placed match is left behind.
    async fn place_pair(
        &self,
        game_type: &GameType,
        a: PlayerId,
        b: PlayerId,
    ) -> Result<RoomId, MatchmakerError> {
        let name = format!("{game_type} match");
        let room = self
            .orchestrator
            .create_room(name, game_type.clone(), 2, true, None)?;
        let room_id = room.room_id;

        if let Err(e) = self.orchestrator.join(room_id, a, None).await {
            self.discard_room(room_id).await;
            return Err(e.into());
        }
        if let Err(e) = self.orchestrator.join(room_id, b, None).await {
            // Pulling the first player back out empties the room,
            // which deletes it.
            if let Err(le) = self.orchestrator.leave(room_id, a).await {
                tracing::warn!(%room_id, error = %le, "could not unwind half-placed match");
            }
            return Err(e.into());
        }
        Ok(room_id)
    }

    async fn discard_room(&self, room_id: RoomId) {
        if let Err(e) = self
            .orchestrator
            .end_game(room_id, RoomState::Abandoned, None)
            .await
        {
            tracing::warn!(%room_id, error = %e, "could not discard empty match room");
        }
    }

    /// Starts the periodic pairing loop.
    ///
    /// The loop observes the shutdown signal between ticks — a tick in
    /// progress always completes, so no pairing is aborted halfway.
    pub fn spawn(self: Arc<Self>) -> MatchmakerHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let matchmaker = self;
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(matchmaker.config.tick_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            tracing::info!(
                interval = ?matchmaker.config.tick_interval,
                "matchmaker loop started"
            );
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        matchmaker.run_tick().await;
                    }
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                    }
                }
            }
            tracing::info!("matchmaker loop stopped");
        });
        MatchmakerHandle { shutdown_tx, task }
    }
}

/// Handle for stopping a running matchmaker loop.
pub struct MatchmakerHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl MatchmakerHandle {
    /// Signals the loop to stop and waits for it to finish its
    /// current tick.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        let _ = self.task.await;
    }
}
