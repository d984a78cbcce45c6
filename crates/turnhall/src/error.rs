//! Engine-level error type.

use thiserror::Error;
use turnhall_snapshot::SnapshotError;

/// Errors raised while assembling or recovering an engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The builder was given no rules contracts; an engine that can
    /// host no game type is a configuration mistake.
    #[error("no rules contracts registered")]
    NoContracts,

    /// Opening the snapshot store or recovering from it failed.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}
