//! Error types for the operation layer.

use sl_core::{CoreError, EncounterId};
use sl_mechanics::MechError;

use crate::auth::ActorId;
use crate::store::StoreError;

/// Errors returned by session operations. Every operation returns a
/// definitive success or one of these; the engine never retries
/// internally.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The requested encounter does not exist.
    #[error("encounter not found: {0}")]
    EncounterNotFound(EncounterId),

    /// The caller is not the director of the encounter.
    #[error("actor \"{actor}\" is not the director of encounter {encounter}")]
    Forbidden {
        /// The rejected caller.
        actor: ActorId,
        /// The encounter the caller tried to mutate.
        encounter: EncounterId,
    },

    /// A stale or duplicate turn-advance request: the caller's version
    /// marker no longer matches the encounter.
    #[error("turn already advanced: request carried version {expected}, encounter is at {actual}")]
    AlreadyAdvanced {
        /// The version the caller observed.
        expected: u64,
        /// The encounter's current version.
        actual: u64,
    },

    /// An engine-level rejection (no combatants, invalid duration,
    /// insufficient resource, ...).
    #[error(transparent)]
    Mech(#[from] MechError),

    /// A lookup in the encounter state failed.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The store backend failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Convenience result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
