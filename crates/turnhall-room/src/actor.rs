//! The per-room actor: an isolated task that owns one `Room`.
//!
//! Every mutating operation on a room arrives as a command on the
//! actor's channel and is processed one at a time. That is how the
//! core invariant is enforced: occupants, lifecycle state, turn
//! pointer, and rules-state always change atomically as a unit, and
//! within one room moves are totally ordered by acceptance. Contract
//! calls and snapshot writes happen inside the actor, so a slow
//! contract blocks only its own room.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{mpsc, oneshot};
use turnhall_directory::PlayerDirectory;
use turnhall_protocol::{
    GameType, PlayerId, PlayerMove, PlayerResult, RoomEvent, RoomId, RoomState,
};
use turnhall_rules::RulesRegistry;
use turnhall_snapshot::SnapshotStore;

use crate::{Room, RoomError, room::LeaveEffect};

/// A read-only projection of a room for queries and listings.
#[derive(Debug, Clone, Serialize)]
pub struct RoomOverview {
    pub room_id: RoomId,
    pub name: String,
    pub game_type: GameType,
    pub state: RoomState,
    pub occupants: Vec<PlayerId>,
    pub spectators: Vec<PlayerId>,
    pub max_players: usize,
    pub private: bool,
    pub current_turn: Option<PlayerId>,
    pub turn_started_at: Option<DateTime<Utc>>,
    pub turn_timeout: Duration,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

impl RoomOverview {
    pub fn is_full(&self) -> bool {
        self.occupants.len() >= self.max_players
    }

    /// Waiting, public, and not full.
    pub fn joinable(&self) -> bool {
        self.state.is_joinable() && !self.private && !self.is_full()
    }
}

/// The result of a mutating room operation.
pub struct RoomReply {
    /// Events for the gateway to broadcast.
    pub events: Vec<RoomEvent>,
    /// `true` if the room deleted itself (last occupant left, or a
    /// forced end emptied a waiting room). The orchestrator drops the
    /// handle when it sees this.
    pub closed: bool,
}

impl RoomReply {
    fn open(events: Vec<RoomEvent>) -> Self {
        Self {
            events,
            closed: false,
        }
    }
}

type Reply = oneshot::Sender<Result<RoomReply, RoomError>>;

/// Commands sent to a room actor through its channel.
pub(crate) enum RoomCommand {
    Join {
        player_id: PlayerId,
        secret: Option<String>,
        reply: Reply,
    },
    Leave {
        player_id: PlayerId,
        reply: Reply,
    },
    Move {
        mv: PlayerMove,
        reply: Reply,
    },
    Start {
        reply: Reply,
    },
    End {
        to: RoomState,
        results: Option<Vec<PlayerResult>>,
        reply: Reply,
    },
    AddSpectator {
        player_id: PlayerId,
        reply: Reply,
    },
    RemoveSpectator {
        player_id: PlayerId,
        reply: Reply,
    },
    Overview {
        reply: oneshot::Sender<RoomOverview>,
    },
    Shutdown,
}

/// Handle to a running room actor. Cheap to clone.
#[derive(Clone)]
pub struct RoomHandle {
    room_id: RoomId,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    async fn request(
        &self,
        make: impl FnOnce(Reply) -> RoomCommand,
    ) -> Result<RoomReply, RoomError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(make(tx))
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?;
        rx.await.map_err(|_| RoomError::Unavailable(self.room_id))?
    }

    pub async fn join(
        &self,
        player_id: PlayerId,
        secret: Option<String>,
    ) -> Result<RoomReply, RoomError> {
        self.request(|reply| RoomCommand::Join {
            player_id,
            secret,
            reply,
        })
        .await
    }

    pub async fn leave(&self, player_id: PlayerId) -> Result<RoomReply, RoomError> {
        self.request(|reply| RoomCommand::Leave { player_id, reply })
            .await
    }

    pub async fn process_move(&self, mv: PlayerMove) -> Result<RoomReply, RoomError> {
        self.request(|reply| RoomCommand::Move { mv, reply }).await
    }

    pub async fn start(&self) -> Result<RoomReply, RoomError> {
        self.request(|reply| RoomCommand::Start { reply }).await
    }

    pub async fn end(
        &self,
        to: RoomState,
        results: Option<Vec<PlayerResult>>,
    ) -> Result<RoomReply, RoomError> {
        self.request(|reply| RoomCommand::End { to, results, reply })
            .await
    }

    pub async fn add_spectator(&self, player_id: PlayerId) -> Result<RoomReply, RoomError> {
        self.request(|reply| RoomCommand::AddSpectator { player_id, reply })
            .await
    }

    pub async fn remove_spectator(&self, player_id: PlayerId) -> Result<RoomReply, RoomError> {
        self.request(|reply| RoomCommand::RemoveSpectator { player_id, reply })
            .await
    }

    pub async fn overview(&self) -> Result<RoomOverview, RoomError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Overview { reply: tx })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?;
        rx.await.map_err(|_| RoomError::Unavailable(self.room_id))
    }

    pub async fn shutdown(&self) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Shutdown)
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))
    }
}

/// The actor state. Runs inside a tokio task until the room closes.
struct RoomActor {
    room: Room,
    registry: Arc<RulesRegistry>,
    directory: Arc<PlayerDirectory>,
    store: Arc<dyn SnapshotStore>,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl RoomActor {
    async fn run(mut self) {
        tracing::info!(room_id = %self.room.id, state = %self.room.state, "room actor started");
        // Covers both fresh rooms and rooms rebuilt from a snapshot;
        // re-saving an identical snapshot is harmless.
        self.persist().await;

        while let Some(cmd) = self.receiver.recv().await {
            let closed = match cmd {
                RoomCommand::Join {
                    player_id,
                    secret,
                    reply,
                } => {
                    let result = self.handle_join(player_id, secret.as_deref()).await;
                    send_reply(reply, result)
                }
                RoomCommand::Leave { player_id, reply } => {
                    let result = self.handle_leave(player_id).await;
                    send_reply(reply, result)
                }
                RoomCommand::Move { mv, reply } => {
                    let result = self.handle_move(mv).await;
                    send_reply(reply, result)
                }
                RoomCommand::Start { reply } => {
                    let result = self.handle_start().await;
                    send_reply(reply, result)
                }
                RoomCommand::End { to, results, reply } => {
                    let result = self.handle_end(to, results).await;
                    send_reply(reply, result)
                }
                RoomCommand::AddSpectator { player_id, reply } => {
                    let result = self.handle_add_spectator(player_id).await;
                    send_reply(reply, result)
                }
                RoomCommand::RemoveSpectator { player_id, reply } => {
                    let result = self.handle_remove_spectator(player_id).await;
                    send_reply(reply, result)
                }
                RoomCommand::Overview { reply } => {
                    let _ = reply.send(self.overview());
                    false
                }
                RoomCommand::Shutdown => true,
            };
            if closed {
                break;
            }
        }

        tracing::info!(room_id = %self.room.id, "room actor stopped");
    }

    async fn handle_join(
        &mut self,
        player_id: PlayerId,
        secret: Option<&str>,
    ) -> Result<RoomReply, RoomError> {
        self.room.add_occupant(player_id, secret)?;
        self.directory.touch(player_id);
        let mut events = vec![RoomEvent::PlayerJoined { player_id }];
        tracing::info!(
            room_id = %self.room.id,
            %player_id,
            occupants = self.room.occupant_count(),
            "player joined"
        );

        // Reaching capacity starts the game within the same serialized
        // operation. A failed start (e.g. the contract disappeared or
        // errored) leaves the join in effect and the room Waiting; the
        // game can be started explicitly or the room force-ended.
        if self.room.is_full() {
            match self.begin_game() {
                Ok(mut start_events) => events.append(&mut start_events),
                Err(e) => {
                    tracing::warn!(room_id = %self.room.id, error = %e, "auto-start failed");
                }
            }
        }

        self.persist().await;
        Ok(RoomReply::open(events))
    }

    async fn handle_leave(&mut self, player_id: PlayerId) -> Result<RoomReply, RoomError> {
        let effect = self.room.remove_occupant(player_id)?;
        let mut events = vec![RoomEvent::PlayerLeft { player_id }];
        tracing::info!(
            room_id = %self.room.id,
            %player_id,
            occupants = self.room.occupant_count(),
            "player left"
        );

        match effect {
            LeaveEffect::Empty => {
                tracing::info!(room_id = %self.room.id, "room empty, deleting");
                self.delete_snapshot().await;
                return Ok(RoomReply {
                    events,
                    closed: true,
                });
            }
            LeaveEffect::Abandoned => {
                tracing::info!(room_id = %self.room.id, "game abandoned (under-occupancy)");
                events.push(RoomEvent::GameEnded { results: vec![] });
            }
            LeaveEffect::TurnPassed(next) => {
                events.push(RoomEvent::TurnChanged { player_id: next });
            }
            LeaveEffect::None => {}
        }

        self.persist().await;
        Ok(RoomReply::open(events))
    }

    async fn handle_move(&mut self, mv: PlayerMove) -> Result<RoomReply, RoomError> {
        if !self.room.state.is_playing() {
            return Err(RoomError::NotPlaying(self.room.id));
        }
        if self.room.current_turn != Some(mv.player_id) {
            return Err(RoomError::OutOfTurn(mv.player_id));
        }
        let contract = self
            .registry
            .get(&self.room.game_type)
            .ok_or_else(|| RoomError::NoRulesForType(self.room.game_type.clone()))?;
        let state = self
            .room
            .rules_state
            .as_ref()
            .ok_or_else(|| self.contract_failed("rules state missing while playing"))?;

        // Drive the contract to completion before committing anything:
        // a failure at any step leaves the room exactly as it was.
        let valid = contract
            .validate(state, &mv)
            .map_err(|e| self.contract_failed(e))?;
        if !valid {
            return Err(RoomError::InvalidMove(self.room.id));
        }
        let next_state = contract
            .apply(state, &mv)
            .map_err(|e| self.contract_failed(e))?;
        let complete = contract
            .is_complete(&next_state)
            .map_err(|e| self.contract_failed(e))?;
        let results = if complete {
            Some(
                contract
                    .results(&next_state, self.room.occupants())
                    .map_err(|e| self.contract_failed(e))?,
            )
        } else {
            None
        };

        // Commit.
        self.room.rules_state = Some(next_state);
        self.room.touch();
        self.directory.touch(mv.player_id);
        let mut events = vec![RoomEvent::MoveMade {
            player_id: mv.player_id,
        }];

        match results {
            Some(results) => {
                self.room.finish();
                self.apply_results(&results);
                tracing::info!(room_id = %self.room.id, "game finished");
                events.push(RoomEvent::GameEnded { results });
            }
            None => {
                let next = self.room.advance_turn(mv.player_id);
                events.push(RoomEvent::TurnChanged { player_id: next });
            }
        }

        self.persist().await;
        Ok(RoomReply::open(events))
    }

    async fn handle_start(&mut self) -> Result<RoomReply, RoomError> {
        let events = self.begin_game()?;
        self.persist().await;
        Ok(RoomReply::open(events))
    }

    fn begin_game(&mut self) -> Result<Vec<RoomEvent>, RoomError> {
        if !self.room.state.is_joinable() {
            return Err(RoomError::NotWaiting(self.room.id));
        }
        let contract = self
            .registry
            .get(&self.room.game_type)
            .ok_or_else(|| RoomError::NoRulesForType(self.room.game_type.clone()))?;
        let needed = contract.min_players().max(2);
        let actual = self.room.occupant_count();
        if actual < needed {
            return Err(RoomError::TooFewPlayers {
                room_id: self.room.id,
                needed,
                actual,
            });
        }
        let initial = contract
            .initialize(actual)
            .map_err(|e| self.contract_failed(e))?;
        let first = self.room.start(initial);
        tracing::info!(
            room_id = %self.room.id,
            occupants = actual,
            first_turn = %first,
            "game started"
        );
        Ok(vec![
            RoomEvent::GameStarted,
            RoomEvent::TurnChanged { player_id: first },
        ])
    }

    async fn handle_end(
        &mut self,
        to: RoomState,
        results: Option<Vec<PlayerResult>>,
    ) -> Result<RoomReply, RoomError> {
        if !to.is_terminal() || !self.room.state.can_transition_to(to) {
            return Err(RoomError::InvalidTransition {
                room_id: self.room.id,
                from: self.room.state,
                to,
            });
        }

        // Force-ending an empty waiting room removes it outright.
        if self.room.occupant_count() == 0 {
            tracing::info!(room_id = %self.room.id, "empty room force-ended, deleting");
            self.delete_snapshot().await;
            return Ok(RoomReply {
                events: vec![RoomEvent::GameEnded { results: vec![] }],
                closed: true,
            });
        }

        let results = match to {
            RoomState::Finished => {
                self.room.finish();
                let results = results.unwrap_or_default();
                self.apply_results(&results);
                results
            }
            _ => {
                self.room.abandon();
                vec![]
            }
        };
        tracing::info!(room_id = %self.room.id, state = %self.room.state, "game ended");

        self.persist().await;
        Ok(RoomReply::open(vec![RoomEvent::GameEnded { results }]))
    }

    async fn handle_add_spectator(&mut self, player_id: PlayerId) -> Result<RoomReply, RoomError> {
        let added = self.room.add_spectator(player_id)?;
        if !added {
            // Already watching: idempotent success, nothing to announce.
            return Ok(RoomReply::open(vec![]));
        }
        self.persist().await;
        Ok(RoomReply::open(vec![RoomEvent::SpectatorJoined {
            player_id,
        }]))
    }

    async fn handle_remove_spectator(
        &mut self,
        player_id: PlayerId,
    ) -> Result<RoomReply, RoomError> {
        self.room.remove_spectator(player_id)?;
        self.persist().await;
        Ok(RoomReply::open(vec![RoomEvent::SpectatorLeft {
            player_id,
        }]))
    }

    fn overview(&self) -> RoomOverview {
        RoomOverview {
            room_id: self.room.id,
            name: self.room.name.clone(),
            game_type: self.room.game_type.clone(),
            state: self.room.state,
            occupants: self.room.occupants().to_vec(),
            spectators: self.room.spectators().collect(),
            max_players: self.room.max_players,
            private: self.room.private,
            current_turn: self.room.current_turn,
            turn_started_at: self.room.turn_started_at,
            turn_timeout: self.room.turn_timeout,
            created_at: self.room.created_at,
            last_activity: self.room.last_activity,
        }
    }

    /// Applies final results to player statistics, once per player.
    /// An unknown player is logged, not fatal — the game still ended.
    fn apply_results(&self, results: &[PlayerResult]) {
        for result in results {
            if let Err(e) = self.directory.apply_result(result) {
                tracing::warn!(
                    room_id = %self.room.id,
                    player_id = %result.player_id,
                    error = %e,
                    "could not apply game result"
                );
            }
        }
    }

    fn contract_failed(&self, e: impl std::fmt::Display) -> RoomError {
        tracing::warn!(
            room_id = %self.room.id,
            game_type = %self.room.game_type,
            error = %e,
            "rules contract failed"
        );
        RoomError::ContractFailed(self.room.id, e.to_string())
    }

    /// Best-effort persistence: a failed save is logged and the
    /// in-memory mutation stands.
    async fn persist(&self) {
        let snapshot = self.room.to_snapshot();
        if let Err(e) = self.store.save(&snapshot).await {
            tracing::warn!(room_id = %self.room.id, error = %e, "snapshot save failed");
        }
    }

    async fn delete_snapshot(&self) {
        if let Err(e) = self.store.delete(self.room.id).await {
            tracing::warn!(room_id = %self.room.id, error = %e, "snapshot delete failed");
        }
    }
}

fn send_reply(reply: Reply, result: Result<RoomReply, RoomError>) -> bool {
    let closed = matches!(&result, Ok(r) if r.closed);
    let _ = reply.send(result);
    closed
}

/// Spawns a room actor task and returns its handle.
pub(crate) fn spawn_room(
    room: Room,
    registry: Arc<RulesRegistry>,
    directory: Arc<PlayerDirectory>,
    store: Arc<dyn SnapshotStore>,
    channel_size: usize,
) -> RoomHandle {
    let room_id = room.id;
    let (tx, rx) = mpsc::channel(channel_size);
    let actor = RoomActor {
        room,
        registry,
        directory,
        store,
        receiver: rx,
    };
    tokio::spawn(actor.run());
    RoomHandle {
        room_id,
        sender: tx,
    }
}
