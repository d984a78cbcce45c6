//! Error types for the rules layer.

use turnhall_protocol::GameType;

/// Errors produced by rules contracts or the registry.
#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    /// No contract is registered for the requested game type.
    #[error("no rules registered for game type {0}")]
    UnknownGameType(GameType),

    /// A contract was handed a rules-state blob it cannot interpret.
    /// Usually means a snapshot from an incompatible contract version.
    #[error("malformed rules state: {0}")]
    MalformedState(String),

    /// A contract could not make sense of a move payload.
    #[error("malformed move data: {0}")]
    MalformedMove(String),

    /// The contract hit an internal invariant violation.
    #[error("contract failure: {0}")]
    Internal(String),
}
