//! The registry mapping game types to their rules contracts.

use std::collections::HashMap;
use std::sync::Arc;

use turnhall_protocol::GameType;

use crate::{RulesContract, RulesError};

/// Holds one [`RulesContract`] per game type.
///
/// Populated once at startup from an explicit list — registration
/// after boot is not supported, which is what lets lookups be
/// lock-free (`&self`, immutable map, `Arc`-shared contracts).
#[derive(Default)]
pub struct RulesRegistry {
    contracts: HashMap<GameType, Arc<dyn RulesContract>>,
}

impl RulesRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            contracts: HashMap::new(),
        }
    }

    /// Registers a contract under its own declared game type.
    ///
    /// Re-registering a game type replaces the previous contract; the
    /// replacement is logged because it usually indicates a
    /// configuration mistake.
    pub fn register(&mut self, contract: Arc<dyn RulesContract>) {
        let game_type = contract.game_type();
        if self.contracts.insert(game_type.clone(), contract).is_some() {
            tracing::warn!(%game_type, "replaced existing rules contract");
        } else {
            tracing::info!(%game_type, "rules contract registered");
        }
    }

    /// Looks up the contract for a game type.
    pub fn get(&self, game_type: &GameType) -> Option<Arc<dyn RulesContract>> {
        self.contracts.get(game_type).cloned()
    }

    /// Like [`get`](Self::get) but returns a typed error, for call
    /// sites that must fail loudly.
    pub fn require(&self, game_type: &GameType) -> Result<Arc<dyn RulesContract>, RulesError> {
        self.get(game_type)
            .ok_or_else(|| RulesError::UnknownGameType(game_type.clone()))
    }

    /// All registered game types.
    pub fn game_types(&self) -> Vec<GameType> {
        self.contracts.keys().cloned().collect()
    }

    /// Number of registered contracts.
    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use turnhall_protocol::{PlayerId, PlayerMove, PlayerResult};

    /// A contract that accepts everything and never finishes.
    struct NopRules(GameType);

    impl RulesContract for NopRules {
        fn game_type(&self) -> GameType {
            self.0.clone()
        }

        fn initialize(&self, _player_count: usize) -> Result<serde_json::Value, RulesError> {
            Ok(serde_json::json!({}))
        }

        fn validate(
            &self,
            _state: &serde_json::Value,
            _mv: &PlayerMove,
        ) -> Result<bool, RulesError> {
            Ok(true)
        }

        fn apply(
            &self,
            state: &serde_json::Value,
            _mv: &PlayerMove,
        ) -> Result<serde_json::Value, RulesError> {
            Ok(state.clone())
        }

        fn is_complete(&self, _state: &serde_json::Value) -> Result<bool, RulesError> {
            Ok(false)
        }

        fn results(
            &self,
            _state: &serde_json::Value,
            _players: &[PlayerId],
        ) -> Result<Vec<PlayerResult>, RulesError> {
            Ok(vec![])
        }
    }

    #[test]
    fn test_register_then_get_returns_contract() {
        let mut registry = RulesRegistry::new();
        registry.register(Arc::new(NopRules(GameType::from("nop"))));

        let contract = registry.get(&GameType::from("nop"));
        assert!(contract.is_some());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_get_unknown_game_type_returns_none() {
        let registry = RulesRegistry::new();
        assert!(registry.get(&GameType::from("missing")).is_none());
    }

    #[test]
    fn test_require_unknown_game_type_returns_error() {
        let registry = RulesRegistry::new();
        let result = registry.require(&GameType::from("missing"));
        assert!(matches!(result, Err(RulesError::UnknownGameType(_))));
    }

    #[test]
    fn test_register_same_type_twice_replaces() {
        let mut registry = RulesRegistry::new();
        registry.register(Arc::new(NopRules(GameType::from("nop"))));
        registry.register(Arc::new(NopRules(GameType::from("nop"))));
        assert_eq!(registry.len(), 1);
    }
}
