//! `Engine` builder and wiring.
//!
//! This is the entry point for embedding Turnhall. It ties together
//! all the layers: rules registry → directory → snapshot store →
//! orchestrator → matchmaker, recovers persisted rooms, and starts
//! the matchmaking loop.

use std::path::PathBuf;
use std::sync::Arc;

use turnhall_directory::PlayerDirectory;
use turnhall_matchmaker::{Matchmaker, MatchmakerConfig, MatchmakerHandle};
use turnhall_room::{RoomConfig, RoomOrchestrator};
use turnhall_rules::{RulesContract, RulesRegistry};
use turnhall_snapshot::{FileSnapshotStore, MemorySnapshotStore, SnapshotStore};

use crate::EngineError;

/// Builder for configuring and starting an engine.
///
/// # Example
///
/// ```rust,ignore
/// use turnhall::prelude::*;
///
/// let engine = Engine::builder()
///     .contract(Arc::new(MyGameRules))
///     .snapshot_dir("/var/lib/turnhall")
///     .build()
///     .await?;
/// ```
pub struct EngineBuilder {
    contracts: Vec<Arc<dyn RulesContract>>,
    room_config: RoomConfig,
    matchmaker_config: MatchmakerConfig,
    store: Option<Arc<dyn SnapshotStore>>,
    snapshot_dir: Option<PathBuf>,
}

impl EngineBuilder {
    /// Creates a builder with default settings and no contracts.
    pub fn new() -> Self {
        Self {
            contracts: Vec::new(),
            room_config: RoomConfig::default(),
            matchmaker_config: MatchmakerConfig::default(),
            store: None,
            snapshot_dir: None,
        }
    }

    /// Registers a rules contract. At least one is required.
    pub fn contract(mut self, contract: Arc<dyn RulesContract>) -> Self {
        self.contracts.push(contract);
        self
    }

    /// Sets the room configuration.
    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.room_config = config;
        self
    }

    /// Sets the matchmaker configuration.
    pub fn matchmaker_config(mut self, config: MatchmakerConfig) -> Self {
        self.matchmaker_config = config;
        self
    }

    /// Uses the given snapshot store instead of the in-memory default.
    pub fn snapshot_store(mut self, store: Arc<dyn SnapshotStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Persists snapshots as JSON files under `dir` (created by
    /// `build` if missing), enabling crash recovery across restarts.
    /// Takes precedence over [`snapshot_store`](Self::snapshot_store).
    pub fn snapshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.snapshot_dir = Some(dir.into());
        self
    }

    /// Builds the engine: wires the layers, recovers persisted rooms,
    /// and starts the matchmaking loop.
    pub async fn build(self) -> Result<Engine, EngineError> {
        if self.contracts.is_empty() {
            return Err(EngineError::NoContracts);
        }
        let mut registry = RulesRegistry::new();
        for contract in self.contracts {
            registry.register(contract);
        }
        let registry = Arc::new(registry);
        let directory = Arc::new(PlayerDirectory::new());
        let store: Arc<dyn SnapshotStore> = match self.snapshot_dir {
            Some(dir) => Arc::new(FileSnapshotStore::open(dir).await?),
            None => self
                .store
                .unwrap_or_else(|| Arc::new(MemorySnapshotStore::new())),
        };

        let orchestrator = Arc::new(RoomOrchestrator::new(
            Arc::clone(&registry),
            Arc::clone(&directory),
            store,
            self.room_config,
        ));
        let restored = orchestrator.recover_from_snapshots().await?;

        let matchmaker = Arc::new(Matchmaker::new(
            Arc::clone(&registry),
            Arc::clone(&directory),
            Arc::clone(&orchestrator),
            self.matchmaker_config,
        ));
        let matchmaker_handle = Arc::clone(&matchmaker).spawn();

        tracing::info!(
            game_types = registry.len(),
            rooms_restored = restored,
            "engine started"
        );
        Ok(Engine {
            registry,
            directory,
            orchestrator,
            matchmaker,
            matchmaker_handle,
        })
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running Turnhall engine.
///
/// The gateway (transport, auth — out of scope) drives it through the
/// [`orchestrator`](Self::orchestrator) and [`matchmaker`](Self::matchmaker)
/// and broadcasts the events those calls return.
pub struct Engine {
    registry: Arc<RulesRegistry>,
    directory: Arc<PlayerDirectory>,
    orchestrator: Arc<RoomOrchestrator>,
    matchmaker: Arc<Matchmaker>,
    matchmaker_handle: MatchmakerHandle,
}

impl Engine {
    /// Creates a new builder.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    pub fn registry(&self) -> &Arc<RulesRegistry> {
        &self.registry
    }

    pub fn directory(&self) -> &Arc<PlayerDirectory> {
        &self.directory
    }

    pub fn orchestrator(&self) -> &Arc<RoomOrchestrator> {
        &self.orchestrator
    }

    pub fn matchmaker(&self) -> &Arc<Matchmaker> {
        &self.matchmaker
    }

    /// Stops the matchmaking loop and every room actor. Snapshots stay
    /// behind, so a rebuilt engine over the same store recovers the
    /// rooms that were live.
    pub async fn shutdown(self) {
        self.matchmaker_handle.shutdown().await;
        self.orchestrator.shutdown().await;
        tracing::info!("engine shut down");
    }
}
